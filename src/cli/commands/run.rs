use anyhow::{Context, Result};
use crossbeam::channel::{self, Sender};
use tokio::signal;

use crate::cli::Output;
use crate::config::ReposweepConfig;
use crate::progress::{ProgressReporter, TerminalProgress};
use crate::runner::CommandRunner;
use crate::scheduler::budget::resolve_concurrency;
use crate::scheduler::{RunSummary, Scheduler};

/// Exit status after an operator abort (128 + SIGINT)
const ABORTED_EXIT_CODE: i32 = 130;

/// Sweep every repository under the configured root.
pub async fn execute(config: ReposweepConfig, output: &Output) -> Result<()> {
    // Listen before the walk so an abort during discovery is not lost
    let (cancel_tx, cancel_rx) = channel::unbounded();
    let signals = tokio::spawn(forward_signals(cancel_tx));

    let (root, repos) = super::discover(&config, output).await?;

    let runner = CommandRunner::new(config.run.program.as_str(), config.run.args.clone());
    match runner.locate() {
        Some(path) => tracing::debug!("using {}", path.display()),
        None => output.warning(&format!(
            "'{}' was not found on PATH; every repository will fail",
            config.run.program
        )),
    }

    let concurrency = resolve_concurrency(config.run.parallel, config.run.thread_percentage);
    let label = describe(&config, &runner);
    output.verbose(&format!(
        "Running {} on {} repositories under {} ({} at a time)",
        label,
        repos.len(),
        root.display(),
        concurrency
    ));

    let total = repos.len();
    let quiet = output.is_quiet();
    let scheduler =
        Scheduler::new(repos, runner, concurrency).with_cancel_policy(config.run.on_interrupt);
    let summary = tokio::task::spawn_blocking(move || {
        let mut reporter = ProgressReporter::new(total, TerminalProgress::new(quiet));
        let summary = scheduler.run(&mut reporter, &cancel_rx);
        reporter.finish(&summary);
        summary
    })
    .await
    .context("sweep task failed")?;

    signals.abort();
    report(&summary, &label, output);

    if summary.cancelled {
        std::process::exit(ABORTED_EXIT_CODE);
    }
    Ok(())
}

fn describe(config: &ReposweepConfig, runner: &CommandRunner) -> String {
    if config.run.program == "git" && config.run.args == ["gc"] {
        "garbage collection".to_string()
    } else {
        format!("'{}'", runner.display())
    }
}

fn report(summary: &RunSummary, label: &str, output: &Output) {
    if summary.cancelled {
        output.warning(&format!(
            "Aborted after {} of {} repos ({} still running, {} not started)",
            summary.completed(),
            summary.total,
            summary.abandoned,
            summary.total - summary.completed() - summary.abandoned
        ));
    } else {
        output.success(&format!(
            "Done! Ran {} on {} repos in {:.1?}.",
            label, summary.total, summary.elapsed
        ));
    }

    if !summary.failures.is_empty() {
        output.error(&format!("{} repos failed:", summary.failed()));
        for (item, kind) in &summary.failures {
            output.failure_item(&item.to_string(), &kind.to_string());
        }
    }
}

/// Forward every Ctrl+C / SIGTERM to the control loop until it hangs up.
async fn forward_signals(cancel: Sender<()>) {
    loop {
        if let Err(err) = wait_for_shutdown_signal().await {
            tracing::warn!("cannot listen for shutdown signals: {}", err);
            return;
        }
        if cancel.send(()).is_err() {
            return;
        }
    }
}

async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    #[cfg(unix)]
    let terminate = sigterm.recv();

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            tracing::info!("Received Ctrl+C");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::{FailureKind, WorkItem};

    #[test]
    fn test_default_command_is_described_as_gc() {
        let config = ReposweepConfig::default();
        let runner = CommandRunner::git_gc();
        assert_eq!(describe(&config, &runner), "garbage collection");
    }

    #[test]
    fn test_custom_command_is_quoted() {
        let mut config = ReposweepConfig::default();
        config.run.args = vec!["maintenance".into(), "run".into()];
        let runner = CommandRunner::new("git", config.run.args.clone());
        assert_eq!(describe(&config, &runner), "'git maintenance run'");
    }

    #[tokio::test]
    async fn test_signal_listener_idles_without_a_signal() {
        let (tx, _rx) = channel::unbounded();
        let listener = tokio::spawn(forward_signals(tx));
        tokio::task::yield_now().await;
        assert!(!listener.is_finished());
        listener.abort();
    }

    #[test]
    fn test_report_handles_failures_and_abort() {
        let output = Output::new(false, true);
        let mut summary = RunSummary::new(3);
        summary.succeeded = 1;
        summary
            .failures
            .push((WorkItem::from("/r/b"), FailureKind::Exit(1)));
        report(&summary, "garbage collection", &output);

        summary.cancelled = true;
        summary.abandoned = 1;
        report(&summary, "garbage collection", &output);
    }
}
