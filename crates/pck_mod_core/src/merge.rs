//! Merging a mods directory into one patched archive.
//!
//! # Merge Algorithm
//!
//! 1. Wipe and recreate the pooled staging directory (`mods/pak`).
//! 2. List `mods/` in file-name order, skipping the staging directory. Each
//!    directory is a mod as-is; each `.zip` file is extracted once into a
//!    temporary directory. Anything else is ignored.
//! 3. Copy every mod's files into the staging directory. Mods later in the
//!    listing overwrite earlier ones at the same relative path
//!    (last-walked-wins, no warning).
//! 4. Emit one [`PatchEntry`] per staged file, mapped to `res://<path>`.
//! 5. Emit one more entry per file of every mod, mapped to
//!    `res://mods/<mod-name>/<path>`, so each mod is also reachable under its
//!    own namespace.
//! 6. Hand the combined list to the [`Patcher`] in a single request, or report
//!    [`MergeOutcome::NothingToDo`] if there is nothing to patch.
//!
//! Temporary directories belong to a [`TempDirs`] registry that is dropped when
//! [`ModMerger::run`] returns, whether or not patching succeeded.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::patcher::{PatchEntry, PatchRequest, Patcher};
use crate::temp::TempDirs;
use crate::utils::{copy_with_metadata, walk_files};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use zip::ZipArchive;

const RES_PREFIX: &str = "res://";
const ZIP_EXTENSION: &str = ".zip";

/// How a mod was supplied in the mods directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKind {
    Directory,
    Archive,
}

/// A mod resolved to a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModSource {
    /// Entry name inside the mods directory (`my-mod` or `my-mod.zip`).
    pub name: String,
    /// Directory holding the mod's files (a temp dir for archives).
    pub root: Utf8PathBuf,
    pub kind: ModKind,
}

/// Result of a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No mod files were found; the patcher was not invoked.
    NothingToDo,
    /// The patcher wrote `output` with `entries` patch entries.
    Patched { entries: usize, output: Utf8PathBuf },
}

/// Merges every mod in a mods directory into a patched archive.
pub struct ModMerger {
    mods_root: Utf8PathBuf,
    staging_dir: Utf8PathBuf,
    staging_dir_name: String,
    base_archive: Utf8PathBuf,
    output_archive: Utf8PathBuf,
    strip_archive_extension: bool,
}

impl ModMerger {
    pub fn new(config: &Config) -> Self {
        Self {
            mods_root: config.mods_root.clone(),
            staging_dir: config.staging_dir(),
            staging_dir_name: config.staging_dir_name.clone(),
            base_archive: config.base_archive.clone(),
            output_archive: config.output_archive.clone(),
            strip_archive_extension: config.strip_archive_extension,
        }
    }

    /// Run the whole merge and invoke `patcher` once if there is anything to patch.
    pub fn run(&self, patcher: &dyn Patcher) -> Result<MergeOutcome> {
        let mut temp_dirs = TempDirs::new();

        let entries = self.collect_patch_entries(&mut temp_dirs)?;
        if entries.is_empty() {
            tracing::info!("No patch files found, nothing to do");
            return Ok(MergeOutcome::NothingToDo);
        }

        let request = PatchRequest {
            base_archive: self.base_archive.clone(),
            output_archive: self.output_archive.clone(),
            entries,
        };
        patcher.patch(&request)?;

        tracing::info!("All mods patched into '{}'", self.output_archive);
        Ok(MergeOutcome::Patched {
            entries: request.entries.len(),
            output: request.output_archive,
        })
    }

    /// Stage every mod and build the combined pooled + namespaced patch list.
    ///
    /// Zip mods are extracted into directories owned by `temp_dirs`; the
    /// returned entries point into them, so they must outlive any use of the list.
    pub fn collect_patch_entries(&self, temp_dirs: &mut TempDirs) -> Result<Vec<PatchEntry>> {
        self.prepare_staging()?;

        let mods = self.resolve_mods(temp_dirs)?;
        self.pool_mods(&mods)?;

        let mut entries = self.pooled_entries()?;
        for source in &mods {
            entries.extend(self.namespaced_entries(source)?);
        }

        tracing::debug!(
            "Collected {} patch entries from {} mods",
            entries.len(),
            mods.len()
        );
        Ok(entries)
    }

    fn prepare_staging(&self) -> Result<()> {
        if self.staging_dir.exists() {
            fs::remove_dir_all(&self.staging_dir)?;
        }
        fs::create_dir_all(&self.staging_dir)?;
        Ok(())
    }

    /// List mod entries in file-name order, extracting archives as needed.
    pub fn resolve_mods(&self, temp_dirs: &mut TempDirs) -> Result<Vec<ModSource>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.mods_root)? {
            let entry = entry?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| Error::NonUtf8Path(entry.path()))?;
            names.push(name);
        }
        names.sort();

        let mut mods = Vec::new();
        for name in names {
            if name == self.staging_dir_name {
                continue;
            }

            let path = self.mods_root.join(&name);
            if path.is_dir() {
                mods.push(ModSource {
                    name,
                    root: path,
                    kind: ModKind::Directory,
                });
            } else if name.to_ascii_lowercase().ends_with(ZIP_EXTENSION) {
                let root = temp_dirs.create()?;
                extract_zip(&path, &root)?;
                mods.push(ModSource {
                    name,
                    root,
                    kind: ModKind::Archive,
                });
            } else {
                tracing::debug!("Skipping non-mod entry {}", path);
            }
        }

        Ok(mods)
    }

    fn pool_mods(&self, mods: &[ModSource]) -> Result<()> {
        for source in mods {
            for file in walk_files(&source.root)? {
                copy_with_metadata(&file.path, &self.staging_dir.join(&file.rel_path))?;
            }
        }
        Ok(())
    }

    fn pooled_entries(&self) -> Result<Vec<PatchEntry>> {
        Ok(walk_files(&self.staging_dir)?
            .into_iter()
            .map(|file| PatchEntry::new(file.path, format!("{RES_PREFIX}{}", file.rel_path)))
            .collect())
    }

    fn namespaced_entries(&self, source: &ModSource) -> Result<Vec<PatchEntry>> {
        let namespace = self.namespace(source);
        Ok(walk_files(&source.root)?
            .into_iter()
            .map(|file| {
                PatchEntry::new(
                    file.path,
                    format!("{RES_PREFIX}mods/{namespace}/{}", file.rel_path),
                )
            })
            .collect())
    }

    /// Namespace token for `res://mods/<token>/`. An archive named just `.zip`
    /// keeps its full name so the token is never empty.
    fn namespace<'a>(&self, source: &'a ModSource) -> &'a str {
        match source.kind {
            ModKind::Archive if self.strip_archive_extension => {
                let stem = &source.name[..source.name.len() - ZIP_EXTENSION.len()];
                if stem.is_empty() {
                    source.name.as_str()
                } else {
                    stem
                }
            }
            _ => source.name.as_str(),
        }
    }
}

fn extract_zip(archive_path: &Utf8Path, output_dir: &Utf8Path) -> Result<()> {
    tracing::debug!("Extracting {} into {}", archive_path, output_dir);
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(output_dir)?;
    Ok(())
}
