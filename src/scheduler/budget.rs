use std::num::NonZeroUsize;

/// Resolve the concurrency limit from configuration.
///
/// An explicit `parallel` value is used as-is. Zero means auto-detect:
/// `thread_percentage` percent of the available processing units, never
/// less than one.
///
/// ```rust
/// use reposweep::scheduler::budget::resolve_concurrency;
///
/// assert_eq!(resolve_concurrency(6, 100).get(), 6);
/// assert!(resolve_concurrency(0, 100).get() >= 1);
/// assert!(resolve_concurrency(0, 1).get() >= 1);
/// ```
pub fn resolve_concurrency(parallel: usize, thread_percentage: u8) -> NonZeroUsize {
    if let Some(explicit) = NonZeroUsize::new(parallel) {
        return explicit;
    }

    let available_cores = num_cpus::get();
    let workers_by_percentage =
        std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

    NonZeroUsize::new(workers_by_percentage).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_limit_wins() {
        assert_eq!(resolve_concurrency(3, 50).get(), 3);
        assert_eq!(resolve_concurrency(1024, 100).get(), 1024);
    }

    #[test]
    fn test_auto_uses_all_cores_at_full_percentage() {
        assert_eq!(resolve_concurrency(0, 100).get(), num_cpus::get().max(1));
    }

    #[test]
    fn test_auto_never_below_one() {
        assert!(resolve_concurrency(0, 1).get() >= 1);
        assert!(resolve_concurrency(0, 0).get() >= 1);
    }
}
