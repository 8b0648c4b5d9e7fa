//! Command-line entrypoint. This is the only place that reads the
//! process environment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::args::DEFAULT_CONFIG_FLAG;
use crate::error::OverlayResult;
use crate::placeholder::Placeholders;
use crate::resolver::Resolver;
use crate::strategy::deep_merge::DeepMerge;
use crate::strategy::splice::{
    DEFAULT_ENDPOINT, DEFAULT_ENDPOINTS_KEY, DEFAULT_EXTRA_KEY, DEFAULT_MARKER, Layout, Splice,
};

#[derive(Debug, Parser)]
#[command(name = "overlay")]
#[command(version, about = "Resolve an effective config, then exec the target")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deep-merge an optional override onto the base config
    Merge {
        #[command(flatten)]
        common: Common,

        /// Override document merged onto the base
        #[arg(long = "override", env = "OVERLAY_OVERRIDE")]
        override_file: Option<PathBuf>,
    },

    /// Add push endpoints and extra scrape entries to the base config
    Splice {
        #[command(flatten)]
        common: Common,

        /// List of endpoint entries replacing the default endpoint
        #[arg(long, env = "OVERLAY_ENDPOINTS")]
        endpoints: Option<PathBuf>,

        /// Extra entries added to the scrape list
        #[arg(long, env = "OVERLAY_EXTRA")]
        extra: Option<PathBuf>,

        /// Endpoint used when no endpoints file is present
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        default_endpoint: String,

        /// How entries are added to the base
        #[arg(long, value_enum, default_value_t = Layout::Marker)]
        layout: Layout,

        /// Marker line the extra fragment follows (marker layout)
        #[arg(long, default_value = DEFAULT_MARKER)]
        marker: String,

        /// Key path of the endpoint list (structured layout)
        #[arg(long, default_value = DEFAULT_ENDPOINTS_KEY)]
        endpoints_key: String,

        /// Key path of the scrape list (structured layout)
        #[arg(long, default_value = DEFAULT_EXTRA_KEY)]
        extra_key: String,
    },
}

#[derive(Debug, Args)]
pub struct Common {
    /// Base config shipped with the image
    #[arg(long, env = "OVERLAY_BASE")]
    pub base: PathBuf,

    /// Where the effective config is written
    #[arg(long, env = "OVERLAY_OUTPUT")]
    pub output: PathBuf,

    /// Replace TOKEN with the value of environment variable VAR
    #[arg(long = "placeholder", value_name = "TOKEN=VAR", value_parser = parse_binding)]
    pub placeholders: Vec<(String, String)>,

    /// Target's config-file flag, without leading dashes
    #[arg(long, env = "OVERLAY_CONFIG_FLAG", default_value = DEFAULT_CONFIG_FLAG)]
    pub config_flag: String,

    /// Print the effective config instead of writing it and exec'ing
    #[arg(long)]
    pub dry_run: bool,

    /// Target program followed by its arguments
    #[arg(last = true, required = true, num_args = 1.., value_name = "PROGRAM")]
    pub target: Vec<String>,
}

impl Cli {
    /// Build the resolver for the chosen subcommand. Placeholder
    /// variables are looked up with `lookup`.
    #[must_use]
    pub fn resolver<F>(&self, lookup: F) -> Resolver
    where
        F: Fn(&str) -> Option<String>,
    {
        let common = self.common();
        let program = common.target.first().map_or("", String::as_str);

        let resolver = Resolver::new(program, &common.base, &common.output)
            .config_flag(&common.config_flag)
            .placeholders(Placeholders::resolve(&common.placeholders, lookup));

        match &self.command {
            Command::Merge { override_file, .. } => {
                let mut merge = DeepMerge::new();
                if let Some(path) = override_file {
                    merge = merge.override_file(path);
                }
                resolver.strategy(merge)
            }
            Command::Splice {
                endpoints,
                extra,
                default_endpoint,
                layout,
                marker,
                endpoints_key,
                extra_key,
                ..
            } => {
                let mut splice = Splice::new()
                    .default_endpoint(default_endpoint)
                    .marker(marker)
                    .endpoints_key(endpoints_key)
                    .extra_key(extra_key)
                    .layout(*layout);
                if let Some(path) = endpoints {
                    splice = splice.endpoints_file(path);
                }
                if let Some(path) = extra {
                    splice = splice.extra_file(path);
                }
                resolver.strategy(splice)
            }
        }
    }

    #[must_use]
    pub const fn common(&self) -> &Common {
        match &self.command {
            Command::Merge { common, .. } | Command::Splice { common, .. } => common,
        }
    }

    /// Arguments meant for the target, program name excluded.
    #[must_use]
    pub fn target_args(&self) -> &[String] {
        self.common().target.get(1..).unwrap_or_default()
    }
}

/// Parse CLI arguments from the process, resolve and exec.
///
/// Returns only on failure, or after a dry run.
pub fn run() -> OverlayResult<()> {
    let cli = Cli::parse();
    let resolver = cli.resolver(|var| std::env::var(var).ok());
    let args = cli.target_args();

    if cli.common().dry_run {
        return dry_run(&resolver, args);
    }

    Err(resolver.exec(args))
}

fn dry_run(resolver: &Resolver, args: &[String]) -> OverlayResult<()> {
    eprintln!("=== Dry run: nothing will be written or executed ===");
    eprintln!();

    if resolver.is_bypass(args) {
        eprintln!("Config flag already supplied; generation skipped.");
        eprintln!("Would exec: {}", resolver.launch(args).command_line());
        return Ok(());
    }

    let rendered = resolver.render()?;
    eprintln!(
        "--- {} ({}) ---",
        resolver.output_path().display(),
        resolver.strategy_name()
    );
    print!("{rendered}");

    eprintln!("--- Command that would be executed ---");
    eprintln!("{}", resolver.launch(args).command_line());

    Ok(())
}

fn parse_binding(raw: &str) -> Result<(String, String), String> {
    let (token, var) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TOKEN=VAR, got '{raw}'"))?;
    if token.is_empty() || var.is_empty() {
        return Err(format!("expected TOKEN=VAR, got '{raw}'"));
    }
    Ok((token.to_string(), var.to_string()))
}
