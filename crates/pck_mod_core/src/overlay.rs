//! Dev-mod overlay synchronization.
//!
//! The overlay holds only the files that differ from the extracted game. Given a
//! [`ChangeSet`], [`OverlaySync::apply`] copies new and modified files from the
//! source tree into the overlay and deletes files that no longer exist in the
//! source, pruning any directories that end up empty.
//!
//! Applying the same change set twice is a no-op the second time. The first
//! failing copy or delete aborts the run; whatever was already applied stays,
//! and the next run reconciles it.

use crate::diff::ChangeSet;
use crate::error::Result;
use crate::utils::copy_with_metadata;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Counts of what a synchronization run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: usize,
    pub removed: usize,
    pub pruned_dirs: usize,
}

/// Applies change sets from a source tree to an overlay tree.
pub struct OverlaySync {
    source_root: Utf8PathBuf,
    overlay_root: Utf8PathBuf,
}

impl OverlaySync {
    pub fn new(source_root: impl Into<Utf8PathBuf>, overlay_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            overlay_root: overlay_root.into(),
        }
    }

    /// Copy added/changed files into the overlay and delete removed ones.
    pub fn apply(&self, changes: &ChangeSet) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for rel_path in &changes.added_or_changed {
            let src = self.source_root.join(rel_path);
            let dst = self.overlay_root.join(rel_path);
            copy_with_metadata(&src, &dst)?;
            tracing::info!("Copied: {}", rel_path);
            report.copied += 1;
        }

        for rel_path in &changes.removed {
            let path = self.overlay_root.join(rel_path);
            if path.is_file() {
                fs::remove_file(&path)?;
                tracing::info!("Removed: {}", rel_path);
                report.removed += 1;
            }

            if let Some(parent) = path.parent() {
                report.pruned_dirs += self.prune_empty_dirs(parent)?;
            }
        }

        Ok(report)
    }

    /// Remove `dir` and its ancestors while they are empty, stopping at the overlay root.
    fn prune_empty_dirs(&self, dir: &Utf8Path) -> Result<usize> {
        let mut pruned = 0;
        let mut current = Some(dir);

        while let Some(dir) = current {
            if dir == self.overlay_root.as_path() || !dir.starts_with(&self.overlay_root) {
                break;
            }

            match fs::read_dir(dir) {
                Ok(mut entries) => {
                    if entries.next().is_some() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    current = dir.parent();
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            fs::remove_dir(dir)?;
            tracing::debug!("Pruned empty directory {}", dir);
            pruned += 1;
            current = dir.parent();
        }

        Ok(pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::FingerprintMap;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        source: Utf8PathBuf,
        overlay: Utf8PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let source = root.join("game-files");
        let overlay = root.join("dev-mod");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&overlay).unwrap();
        Fixture {
            _temp: temp,
            source,
            overlay,
        }
    }

    fn changes(added: &[&str], removed: &[&str]) -> ChangeSet {
        ChangeSet {
            added_or_changed: added.iter().map(|p| p.to_string()).collect(),
            removed: removed.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn tree(root: &Utf8Path) -> BTreeSet<String> {
        walkdir::WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_copies_into_nested_dirs() {
        let fx = fixture();
        fs::create_dir_all(fx.source.join("scenes/levels")).unwrap();
        fs::write(fx.source.join("scenes/levels/one.tscn"), "one").unwrap();

        let report = OverlaySync::new(&fx.source, &fx.overlay)
            .apply(&changes(&["scenes/levels/one.tscn"], &[]))
            .unwrap();

        assert_eq!(report.copied, 1);
        assert_eq!(
            fs::read_to_string(fx.overlay.join("scenes/levels/one.tscn")).unwrap(),
            "one"
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let fx = fixture();
        fs::write(fx.source.join("a.txt"), "new").unwrap();
        fs::write(fx.overlay.join("a.txt"), "old").unwrap();

        OverlaySync::new(&fx.source, &fx.overlay)
            .apply(&changes(&["a.txt"], &[]))
            .unwrap();

        assert_eq!(fs::read_to_string(fx.overlay.join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_remove_prunes_empty_dirs() {
        let fx = fixture();
        fs::create_dir_all(fx.overlay.join("dir/deeper")).unwrap();
        fs::write(fx.overlay.join("dir/deeper/b.txt"), "b").unwrap();
        fs::write(fx.overlay.join("a.txt"), "a").unwrap();

        let report = OverlaySync::new(&fx.source, &fx.overlay)
            .apply(&changes(&[], &["dir/deeper/b.txt"]))
            .unwrap();

        assert_eq!(report.removed, 1);
        assert_eq!(report.pruned_dirs, 2);
        assert!(!fx.overlay.join("dir").exists());
        assert!(fx.overlay.join("a.txt").exists());
        assert!(fx.overlay.exists());
    }

    #[test]
    fn test_prune_stops_at_non_empty_ancestor() {
        let fx = fixture();
        fs::create_dir_all(fx.overlay.join("dir/deeper")).unwrap();
        fs::write(fx.overlay.join("dir/deeper/b.txt"), "b").unwrap();
        fs::write(fx.overlay.join("dir/keep.txt"), "keep").unwrap();

        OverlaySync::new(&fx.source, &fx.overlay)
            .apply(&changes(&[], &["dir/deeper/b.txt"]))
            .unwrap();

        assert!(!fx.overlay.join("dir/deeper").exists());
        assert!(fx.overlay.join("dir/keep.txt").exists());
    }

    #[test]
    fn test_never_removes_overlay_root() {
        let fx = fixture();
        fs::write(fx.overlay.join("only.txt"), "x").unwrap();

        OverlaySync::new(&fx.source, &fx.overlay)
            .apply(&changes(&[], &["only.txt"]))
            .unwrap();

        assert!(fx.overlay.is_dir());
        assert!(tree(&fx.overlay).iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_missing_removed_file_is_skipped() {
        let fx = fixture();

        let report = OverlaySync::new(&fx.source, &fx.overlay)
            .apply(&changes(&[], &["never/existed.txt"]))
            .unwrap();

        assert_eq!(report, SyncReport::default());
    }

    #[test]
    fn test_missing_source_file_fails() {
        let fx = fixture();

        let result = OverlaySync::new(&fx.source, &fx.overlay).apply(&changes(&["ghost.txt"], &[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let fx = fixture();
        fs::create_dir_all(fx.source.join("scenes")).unwrap();
        fs::write(fx.source.join("scenes/main.tscn"), "main").unwrap();
        fs::write(fx.source.join("icon.png"), "icon").unwrap();
        fs::create_dir_all(fx.overlay.join("old")).unwrap();
        fs::write(fx.overlay.join("old/gone.txt"), "gone").unwrap();

        let set = changes(&["icon.png", "scenes/main.tscn"], &["old/gone.txt"]);
        let sync = OverlaySync::new(&fx.source, &fx.overlay);

        sync.apply(&set).unwrap();
        let once = tree(&fx.overlay);
        let second = sync.apply(&set).unwrap();
        let twice = tree(&fx.overlay);

        assert_eq!(once, twice);
        assert_eq!(second.removed, 0);
        assert_eq!(second.pruned_dirs, 0);
        assert_eq!(
            fs::read_to_string(fx.overlay.join("scenes/main.tscn")).unwrap(),
            "main"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_source_syncs_repeatedly() {
        use std::os::unix::fs::PermissionsExt;

        let fx = fixture();
        fs::write(fx.source.join("locked.tres"), "v1").unwrap();
        fs::set_permissions(fx.source.join("locked.tres"), fs::Permissions::from_mode(0o444))
            .unwrap();

        let sync = OverlaySync::new(&fx.source, &fx.overlay);
        let set = changes(&["locked.tres"], &[]);
        assert_eq!(sync.apply(&set).unwrap().copied, 1);
        assert_eq!(sync.apply(&set).unwrap().copied, 1);

        let copied = fx.overlay.join("locked.tres");
        assert_eq!(fs::read_to_string(&copied).unwrap(), "v1");
        assert!(fs::metadata(&copied).unwrap().permissions().readonly());
    }

    #[test]
    fn test_end_to_end_with_fingerprints() {
        let fx = fixture();
        fs::create_dir_all(fx.source.join("dir")).unwrap();
        fs::write(fx.source.join("a.txt"), "a").unwrap();
        fs::write(fx.source.join("dir/b.txt"), "b").unwrap();
        let baseline = FingerprintMap::generate(&fx.source).unwrap();

        // A previous run put the edited file into the overlay.
        fs::create_dir_all(fx.overlay.join("dir")).unwrap();
        fs::write(fx.overlay.join("dir/b.txt"), "b-edited").unwrap();

        fs::remove_file(fx.source.join("dir/b.txt")).unwrap();
        fs::write(fx.source.join("a.txt"), "a-edited").unwrap();
        let current = FingerprintMap::generate(&fx.source).unwrap();

        let set = ChangeSet::between(&baseline, &current);
        OverlaySync::new(&fx.source, &fx.overlay).apply(&set).unwrap();

        assert_eq!(fs::read_to_string(fx.overlay.join("a.txt")).unwrap(), "a-edited");
        assert!(!fx.overlay.join("dir").exists());
    }
}
