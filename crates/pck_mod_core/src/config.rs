//! Tool configuration.
//!
//! Every directory and file name the tools touch lives in [`Config`]. The CLI
//! deserializes it from an optional `pck-mod.toml` and then calls
//! [`Config::resolve`] so that every relative path is anchored at the root
//! directory before any component sees it.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Paths and names used by `dev-sync` and `mod-launcher`.
///
/// All fields are optional in the TOML file; missing ones fall back to the
/// defaults below.
///
/// ```toml
/// baseline_root = "game-files"
/// overlay_root = "dev-mod"
/// mods_root = "mods"
/// strip_archive_extension = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Extracted game assets that the baseline is recorded from.
    pub baseline_root: Utf8PathBuf,
    /// Dev-mod overlay that receives changed files.
    pub overlay_root: Utf8PathBuf,
    /// Persisted baseline fingerprint map.
    pub checksum_file: Utf8PathBuf,
    /// Directory holding mod folders and `.zip` mods.
    pub mods_root: Utf8PathBuf,
    /// Name of the pooled staging directory inside `mods_root`. Reserved: an
    /// entry with this name is never treated as a mod.
    pub staging_dir_name: String,
    /// Unmodified game archive.
    pub base_archive: Utf8PathBuf,
    /// Patched archive written by `mod-launcher`.
    pub output_archive: Utf8PathBuf,
    /// Game executable launched after patching.
    pub game_executable: Utf8PathBuf,
    /// External asset tool used for extraction and patching.
    pub tool_executable: Utf8PathBuf,
    /// Drop the `.zip` suffix from namespaced patch paths of zip mods.
    pub strip_archive_extension: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline_root: Utf8PathBuf::from("game-files"),
            overlay_root: Utf8PathBuf::from("dev-mod"),
            checksum_file: Utf8PathBuf::from("baseline_checksums.json"),
            mods_root: Utf8PathBuf::from("mods"),
            staging_dir_name: "pak".to_string(),
            base_archive: Utf8PathBuf::from("spring-dash-windows-64bit.pck"),
            output_archive: Utf8PathBuf::from("spring-dash-windows-64bit_MODDED.pck"),
            game_executable: Utf8PathBuf::from("spring-dash-windows-64bit.exe"),
            tool_executable: Utf8PathBuf::from("gdre_tools.exe"),
            strip_archive_extension: false,
        }
    }
}

impl Config {
    /// Anchor every relative path at `root`. Absolute paths are kept as-is.
    pub fn resolve(mut self, root: &Utf8Path) -> Self {
        for path in [
            &mut self.baseline_root,
            &mut self.overlay_root,
            &mut self.checksum_file,
            &mut self.mods_root,
            &mut self.base_archive,
            &mut self.output_archive,
            &mut self.game_executable,
            &mut self.tool_executable,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Full path of the pooled staging directory.
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.mods_root.join(&self.staging_dir_name)
    }
}
