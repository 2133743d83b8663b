use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::SubstituteError;

/// Source of the files a run may touch, as paths relative to the run root.
pub trait TrackedFiles {
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, SubstituteError>;
}

/// Lists the files committed at `HEAD` using `git ls-tree`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitTrackedFiles;

impl TrackedFiles for GitTrackedFiles {
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, SubstituteError> {
        debug!("Listing tracked files in: {:?}", root);

        let output = Command::new("git")
            .args(["ls-tree", "-r", "-z", "HEAD", "--name-only"])
            .current_dir(root)
            .output()
            .map_err(|e| SubstituteError::TrackedFiles {
                message: format!("failed to run git in {:?}: {}", root, e),
            })?;

        if !output.status.success() {
            return Err(SubstituteError::TrackedFiles {
                message: format!(
                    "git ls-tree exited with {} in {:?}: {}",
                    output.status,
                    root,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let paths = parse_name_only(&output.stdout);
        debug!("Found {} tracked files", paths.len());
        Ok(paths)
    }
}

impl TrackedFiles for [PathBuf] {
    fn list(&self, _root: &Path) -> Result<Vec<PathBuf>, SubstituteError> {
        Ok(self.to_vec())
    }
}

impl TrackedFiles for Vec<PathBuf> {
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, SubstituteError> {
        self.as_slice().list(root)
    }
}

/// Splits NUL-terminated `--name-only -z` output. Names are taken verbatim,
/// without git's quoting of unusual bytes.
fn parse_name_only(stdout: &[u8]) -> Vec<PathBuf> {
    stdout
        .split(|byte| *byte == b'\0')
        .filter(|name| !name.is_empty())
        .map(path_from_bytes)
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
