use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{OverlayError, OverlayResult};

/// Read the base config. A missing file is fatal.
pub fn read_base(path: &Path) -> OverlayResult<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            OverlayError::BaseMissing(path.to_path_buf())
        } else {
            OverlayError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read an optional operator-supplied file.
///
/// Returns `None` when the path does not exist, is not a regular
/// file (an empty bind-mount directory, say) or has zero bytes. A
/// file that exists but cannot be read is an error.
pub fn read_optional(path: &Path) -> OverlayResult<Option<String>> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "optional file absent");
            return Ok(None);
        }
        Err(e) => {
            return Err(OverlayError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if !meta.is_file() {
        tracing::debug!(
            path = %path.display(),
            "optional path is not a regular file, treated as absent"
        );
        return Ok(None);
    }

    if meta.len() == 0 {
        tracing::debug!(path = %path.display(), "optional file empty, treated as absent");
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| OverlayError::Read {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write `content` to `path` via a sibling temp file and rename,
/// so readers never observe a partial file. The parent directory
/// is created if needed and the temp file is removed on failure.
pub fn write_atomic(path: &Path, content: &str) -> OverlayResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let tmp = temp_path(&parent, path);
    let written = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temp_path(parent: &Path, target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map_or_else(|| "overlay".into(), |n| n.to_string_lossy());
    parent.join(format!(".{name}.{}.partial", std::process::id()))
}
