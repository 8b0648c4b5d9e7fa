use std::path::PathBuf;

pub type OverlayResult<T> = Result<T, OverlayError>;

#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("base config not found: {0}")]
    BaseMissing(PathBuf),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("rendered {strategy} config is not valid YAML: {source}")]
    Render {
        strategy: &'static str,
        source: serde_yaml::Error,
    },

    #[error("schema error at '{path}': {message}")]
    Schema { path: String, message: String },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("failed to exec {program}: {source}")]
    Exec {
        program: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
