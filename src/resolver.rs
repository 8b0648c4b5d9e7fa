use std::path::{Path, PathBuf};

use crate::args::{self, DEFAULT_CONFIG_FLAG};
use crate::error::{OverlayError, OverlayResult};
use crate::exec::{self, Launch};
use crate::files;
use crate::placeholder::Placeholders;
use crate::strategy::Strategy;
use crate::strategy::deep_merge::DeepMerge;

/// Resolves the effective config for one target program, then
/// hands the process over to it.
///
/// Runs `bypass check -> render -> substitute -> write -> exec`
/// once per start. When the caller already passes a config-file
/// flag, nothing is generated and the arguments go through
/// untouched.
pub struct Resolver {
    program: String,
    base: PathBuf,
    output: PathBuf,
    strategy: Box<dyn Strategy>,
    placeholders: Placeholders,
    config_flag: String,
}

impl Resolver {
    /// A resolver copying `base` to `output` verbatim. Pick a
    /// different merge with [`Resolver::strategy`].
    #[must_use]
    pub fn new(program: &str, base: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            program: program.to_string(),
            base: base.into(),
            output: output.into(),
            strategy: Box::new(DeepMerge::new()),
            placeholders: Placeholders::new(),
            config_flag: DEFAULT_CONFIG_FLAG.to_string(),
        }
    }

    #[must_use]
    pub fn strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    #[must_use]
    pub fn placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Name of the target's config-file flag, without dashes.
    #[must_use]
    pub fn config_flag(mut self, flag: &str) -> Self {
        self.config_flag = flag.to_string();
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Whether `args` already name a config file.
    #[must_use]
    pub fn is_bypass(&self, args: &[String]) -> bool {
        args::has_config_flag(args, &self.config_flag)
    }

    /// Render the effective config without touching the output
    /// path.
    pub fn render(&self) -> OverlayResult<String> {
        let base = files::read_base(&self.base)?;
        let rendered = self.strategy.render(&self.base, &base)?;
        Ok(self.placeholders.apply(&rendered))
    }

    /// The command [`Resolver::resolve`] hands off to for `args`,
    /// computed without side effects.
    #[must_use]
    pub fn launch(&self, args: &[String]) -> Launch {
        if self.is_bypass(args) {
            return Launch::new(&self.program, args.to_vec());
        }
        let output = self.output.to_string_lossy();
        Launch::new(
            &self.program,
            args::with_config_flag(args, &self.config_flag, &output),
        )
    }

    /// Produce the effective config (unless bypassed) and return
    /// what should be executed.
    pub fn resolve(&self, args: &[String]) -> OverlayResult<Launch> {
        if self.is_bypass(args) {
            tracing::info!(
                flag = %self.config_flag,
                "config file supplied on command line, skipping generation"
            );
            return Ok(self.launch(args));
        }

        let rendered = self.render()?;
        files::write_atomic(&self.output, &rendered)?;
        tracing::info!(
            strategy = self.strategy.name(),
            output = %self.output.display(),
            "effective config written"
        );

        Ok(self.launch(args))
    }

    /// Resolve, then replace this process with the target.
    ///
    /// Returns only on failure, either before the exec or from the
    /// exec itself.
    #[must_use]
    pub fn exec(&self, args: &[String]) -> OverlayError {
        self.resolve(args)
            .map_or_else(|e| e, |launch| exec::exec(&launch))
    }
}
