pub mod deep_merge;
pub mod splice;

use std::path::Path;

use serde_yaml::Value;

use crate::error::{OverlayError, OverlayResult};

/// How the effective config is produced from the base config and
/// whatever operator files the strategy knows about.
pub trait Strategy {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Produce the effective config text from the base config.
    ///
    /// Placeholder substitution is not part of rendering; the
    /// resolver applies it to whatever this returns.
    fn render(&self, base_path: &Path, base: &str) -> OverlayResult<String>;
}

/// Parse YAML text read from `path`, reporting the path on
/// failure.
pub fn parse_yaml(path: &Path, text: &str) -> OverlayResult<Value> {
    serde_yaml::from_str(text).map_err(|source| OverlayError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
