//! Configuration loading for both binaries.

use crate::errors::CliError;
use camino::{Utf8Path, Utf8PathBuf};
use pck_mod_core::{Config, Error as CoreError};
use std::env;
use std::fs;
use std::io;

/// Name of the optional configuration file inside the root directory.
pub const CONFIG_FILE_NAME: &str = "pck-mod.toml";

/// Returns the absolute root directory: `--root` if given, else the current directory.
pub fn resolve_root(root: Option<String>) -> Result<Utf8PathBuf, CliError> {
    let cwd = env::current_dir().map_err(|_| CliError::invalid_root("."))?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| CliError::invalid_root(p.display().to_string()))?;

    let root = match root {
        Some(root) => {
            let root = Utf8PathBuf::from(root);
            if root.is_absolute() {
                root
            } else {
                cwd.join(root)
            }
        }
        None => cwd,
    };

    if !root.is_dir() {
        return Err(CliError::invalid_root(root.as_str()));
    }
    Ok(root)
}

/// Returns the config file path inside `root`.
pub fn config_path(root: &Utf8Path) -> Utf8PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Loads `pck-mod.toml` from `root` and anchors all paths at `root`.
///
/// A missing file yields the defaults. A file that exists but cannot be
/// parsed is an error rather than being silently ignored.
pub fn load_config(root: &Utf8Path) -> Result<Config, CliError> {
    let path = config_path(root);

    let config = match fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!("Loading configuration from {}", path);
            toml::from_str::<Config>(&content)
                .map_err(|source| CliError::ConfigParseError { path, source })?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(CoreError::Io(e).into()),
    };

    Ok(config.resolve(root))
}
