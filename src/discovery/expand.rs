use std::env;

/// Expand a leading `~` and `$VAR` / `${VAR}` references in `raw`.
///
/// Unset variables expand to the empty string. A `$` not followed by a
/// variable name is kept as-is.
pub fn expand_path(raw: &str) -> String {
    expand_with(raw, |name| env::var(name).ok(), || {
        dirs::home_dir().map(|home| home.to_string_lossy().into_owned())
    })
}

fn expand_with<V, H>(raw: &str, lookup: V, home: H) -> String
where
    V: Fn(&str) -> Option<String>,
    H: Fn() -> Option<String>,
{
    let mut rest = raw;
    let mut expanded = String::with_capacity(raw.len());

    if let Some(after) = rest.strip_prefix('~')
        && (after.is_empty() || after.starts_with(std::path::is_separator))
        && let Some(home) = home()
    {
        expanded.push_str(&home);
        rest = after;
    }

    while let Some(pos) = rest.find('$') {
        expanded.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            expanded.push('$');
            rest = after;
        } else {
            expanded.push_str(&lookup(name).unwrap_or_default());
            rest = &after[consumed..];
        }
    }

    expanded.push_str(rest);
    expanded
}
