//! Filesystem helpers shared by the baseline recorder, the overlay
//! synchronizer and the mod merger.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File, FileTimes};
use std::io;
use walkdir::WalkDir;

/// A regular file found under a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Full path on disk.
    pub path: Utf8PathBuf,
    /// Root-relative path with `/` separators.
    pub rel_path: String,
}

/// List every regular file under `root`, sorted by path.
///
/// Entries are visited in file-name order so the result is reproducible across
/// platforms. Symlinks are not followed; a symlinked file is not reported.
pub fn walk_files(root: &Utf8Path) -> Result<Vec<TreeFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root.as_std_path()).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(Error::NonUtf8Path)?;
        let rel_path = to_rel_key(root, &path)?;
        files.push(TreeFile { path, rel_path });
    }

    Ok(files)
}

/// Convert a path under `root` into a forward-slash relative key.
pub fn to_rel_key(root: &Utf8Path, path: &Utf8Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        Error::Io(io::Error::other(format!(
            "{path} is not inside {root}"
        )))
    })?;

    Ok(rel
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Returns `true` if `key` is a plain relative path that cannot escape its root.
pub fn is_safe_rel_key(key: &str) -> bool {
    if key.is_empty() || key.starts_with('/') || key.starts_with('\\') {
        return false;
    }

    let path = Utf8Path::new(key);
    !path.has_root()
        && path
            .components()
            .all(|c| matches!(c, camino::Utf8Component::Normal(_)))
}

/// Copy a file, creating parent directories and carrying over timestamps and
/// permissions.
///
/// Times are set through the open destination handle and permissions are
/// applied last, so read-only sources copy cleanly. An existing read-only
/// destination is replaced.
pub fn copy_with_metadata(src: &Utf8Path, dst: &Utf8Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut reader = File::open(src)?;
    let metadata = reader.metadata()?;

    if fs::symlink_metadata(dst).is_ok_and(|m| m.permissions().readonly()) {
        fs::remove_file(dst)?;
    }

    let mut writer = File::create(dst)?;
    io::copy(&mut reader, &mut writer)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)?;
    drop(writer);

    fs::set_permissions(dst, metadata.permissions())?;

    Ok(())
}
