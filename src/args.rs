//! Config-file flag detection and injection for the target's
//! argument vector.

/// Flag used by both `prometheus` and `promtail` to name their
/// config file.
pub const DEFAULT_CONFIG_FLAG: &str = "config.file";

/// Returns `true` when `args` already names a config file via
/// `flag`.
///
/// Accepts the single- and double-dash spellings, with the value
/// either attached (`--config.file=x`) or in the next word
/// (`--config.file x`).
///
/// # Example
///
/// ```
/// use overlay::args::has_config_flag;
///
/// let args = vec!["--config.file=/custom.yml".to_string()];
/// assert!(has_config_flag(&args, "config.file"));
/// assert!(!has_config_flag(&args, "web.listen-address"));
/// ```
#[must_use]
pub fn has_config_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| names_flag(arg, flag))
}

/// Append `--<flag>=<path>` to a copy of `args`.
#[must_use]
pub fn with_config_flag(args: &[String], flag: &str, path: &str) -> Vec<String> {
    let mut out = args.to_vec();
    out.push(format!("--{flag}={path}"));
    out
}

fn names_flag(arg: &str, flag: &str) -> bool {
    let Some(rest) = arg
        .strip_prefix("--")
        .or_else(|| arg.strip_prefix('-'))
    else {
        return false;
    };

    rest == flag
        || rest
            .strip_prefix(flag)
            .is_some_and(|tail| tail.starts_with('='))
}
