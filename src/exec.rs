use std::io::ErrorKind;
use std::process::Command;

use crate::error::OverlayError;

/// The program and argument vector the resolver hands off to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    pub program: String,
    pub args: Vec<String>,
}

impl Launch {
    #[must_use]
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Space-joined rendering for logs and dry runs.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Replace the current process image with `launch`.
///
/// Only returns if the exec itself failed; on success the target
/// program owns the PID, signals and exit code.
#[cfg(unix)]
#[must_use]
pub fn exec(launch: &Launch) -> OverlayError {
    use std::os::unix::process::CommandExt;

    tracing::debug!(command = %launch.command_line(), "exec");
    let err = Command::new(&launch.program).args(&launch.args).exec();
    spawn_error(&launch.program, err)
}

/// Run `launch` to completion and exit with its status code.
///
/// Without process-image replacement the closest equivalent is to
/// wait on the child and propagate its exit code.
#[cfg(not(unix))]
#[must_use]
pub fn exec(launch: &Launch) -> OverlayError {
    tracing::debug!(command = %launch.command_line(), "spawn");
    match Command::new(&launch.program).args(&launch.args).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => spawn_error(&launch.program, err),
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> OverlayError {
    if err.kind() == ErrorKind::NotFound {
        OverlayError::CommandNotFound(program.to_string())
    } else {
        OverlayError::Exec {
            program: program.to_string(),
            source: err,
        }
    }
}
