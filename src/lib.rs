//! Container entrypoint that resolves an effective config file,
//! then execs the real binary.
//!
//! Images for `prometheus`, `promtail` and friends ship a base
//! config. Operators mount an override or a few extra entries next
//! to it. `overlay` runs as the container entrypoint, combines the
//! two into one effective file, and replaces itself with the target
//! program, adding `--config.file=<effective>` to its arguments.
//!
//! # Overview
//!
//! A run is driven by a [`Resolver`] holding:
//!
//! - the base config path and the output path
//! - a [`Strategy`](strategy::Strategy) deciding how operator files
//!   are combined with the base ([`DeepMerge`] or [`Splice`])
//! - a set of [`Placeholders`] substituted into the result
//!
//! # Lifecycle
//!
//! 1. **Bypass** - if the target arguments already carry the
//!    config-file flag, nothing is generated and they pass through
//!    untouched
//! 2. **Render** - the strategy combines the base with whatever
//!    optional files are present (missing and zero-byte files are
//!    the same thing)
//! 3. **Substitute** - placeholder tokens are replaced
//! 4. **Write** - the result replaces the output file atomically
//! 5. **Exec** - the process image becomes the target program
//!
//! Any failure before step 5 aborts the start with a non-zero exit
//! and leaves no partial file behind.
//!
//! # Examples
//!
//! ## Metrics collector with an optional override
//!
//! ```rust,no_run
//! use overlay::{DeepMerge, Placeholders, Resolver};
//!
//! fn main() -> anyhow::Result<()> {
//!     let resolver = Resolver::new(
//!         "/bin/prometheus",
//!         "/etc/prometheus/base.yml",
//!         "/tmp/prometheus.yml",
//!     )
//!     .strategy(
//!         DeepMerge::new().override_file("/etc/prometheus/override.yml"),
//!     )
//!     .placeholders(Placeholders::new().set("__SERVER_LABEL__", "edge-1"));
//!
//!     let args: Vec<String> = std::env::args().skip(1).collect();
//!     Err(resolver.exec(&args).into())
//! }
//! ```
//!
//! ## Log shipper with endpoints and extra scrape entries
//!
//! ```rust,no_run
//! use overlay::{Layout, Resolver, Splice};
//!
//! let resolver = Resolver::new(
//!     "/usr/bin/promtail",
//!     "/etc/promtail/base.yml",
//!     "/tmp/promtail.yml",
//! )
//! .strategy(
//!     Splice::new()
//!         .endpoints_file("/etc/promtail/clients.yml")
//!         .extra_file("/etc/promtail/extra.yml")
//!         .layout(Layout::Structured),
//! );
//!
//! let launch = resolver.resolve(&[]).unwrap();
//! assert_eq!(launch.args, vec!["--config.file=/tmp/promtail.yml"]);
//! ```
//!
//! ## As a container entrypoint
//!
//! ```sh
//! overlay merge \
//!     --base /etc/prometheus/base.yml \
//!     --override /etc/prometheus/override.yml \
//!     --output /tmp/prometheus.yml \
//!     --placeholder __SERVER_LABEL__=SERVER_LABEL \
//!     -- /bin/prometheus --storage.tsdb.path=/prometheus
//! ```

// Allow noisy pedantic lints that don't add value for an
// entrypoint crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod args;
pub mod cli;
pub mod error;
pub mod exec;
pub mod files;
pub mod logging;
pub mod placeholder;
pub mod resolver;
pub mod strategy;

pub use error::{OverlayError, OverlayResult};
pub use exec::Launch;
pub use placeholder::Placeholders;
pub use resolver::Resolver;
pub use strategy::deep_merge::DeepMerge;
pub use strategy::splice::{Layout, Splice};
