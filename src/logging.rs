use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const DEFAULT_LOG_FILTER: &str = "overlay=info";

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "OVERLAY_LOG";

/// Install the global subscriber for the `overlay` binary.
///
/// The single informational line of a run goes to stdout next to
/// the target's own output; warnings and debug detail go to
/// stderr. Calling this twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let writer = std::io::stdout
        .with_filter(|meta| *meta.level() == Level::INFO)
        .or_else(std::io::stderr);

    // A subscriber already installed (tests, embedding) wins.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .ok();
}
