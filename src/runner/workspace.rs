//! Binary-directory housekeeping.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{CtestError, CtestResult};

/// Recursively delete `path`. A path that does not exist is not an error; anything else is.
pub fn remove_tree(path: &Path) -> CtestResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed directory");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CtestError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Refuse to clean `target` when it is, or contains, any of the `keep` paths.
///
/// Paths that exist are compared after symlink resolution; the rest are compared as given.
///
/// ## Errors
/// [`CtestError::Validation`] naming the protected path.
pub fn ensure_removable(target: &Path, keep: &[&Path]) -> CtestResult<()> {
    let target = normalize(target);
    for path in keep {
        if normalize(path).starts_with(&target) {
            return Err(CtestError::validation(format!(
                "refusing to clean {}: it contains {}",
                target.display(),
                path.display()
            )));
        }
    }
    Ok(())
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Create `path` and any missing parents.
///
/// ## Errors
/// [`CtestError::Write`] with `path`.
pub fn ensure_dir(path: &Path) -> CtestResult<()> {
    fs::create_dir_all(path).map_err(|source| CtestError::Write {
        path: path.to_path_buf(),
        source,
    })
}
