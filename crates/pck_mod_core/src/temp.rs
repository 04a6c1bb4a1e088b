//! Run-scoped temporary directories.

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Owns every temporary directory created during one run.
///
/// Dropping the registry removes all of them, on the success path and when the
/// run bails out early with `?`. Removal is best-effort: failures are logged
/// and otherwise ignored.
#[derive(Default)]
pub struct TempDirs {
    dirs: Vec<TempDir>,
}

impl TempDirs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh empty directory that lives until the registry is dropped.
    pub fn create(&mut self) -> Result<Utf8PathBuf> {
        let dir = tempfile::Builder::new().prefix("pck-mod-").tempdir()?;
        let path =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).map_err(Error::NonUtf8Path)?;
        self.dirs.push(dir);
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl Drop for TempDirs {
    fn drop(&mut self) {
        for dir in self.dirs.drain(..) {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!("Failed to remove temporary directory {}: {}", path.display(), e);
            }
        }
    }
}
