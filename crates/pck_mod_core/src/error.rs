//! Error types for sync and merge operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. Lower-level failures (`std::io::Error`, `walkdir::Error`,
//! zip and JSON errors) are converted via `From` impls and propagate unchanged.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing an overlay or merging mods.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (hashing, copying, deleting, extracting).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A zip mod could not be opened or extracted.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to serialize the checksum file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The baseline checksum file does not exist. Callers regenerate it.
    #[error("Baseline checksum file not found: {0}")]
    BaselineNotFound(Utf8PathBuf),

    /// The baseline checksum file exists but is malformed.
    #[error("Malformed baseline checksum file {path}: {message}")]
    BaselineParse { path: Utf8PathBuf, message: String },

    /// The external tool (or the game) exited with a non-zero status.
    #[error("{program} exited with {}", describe_exit(.code))]
    Subprocess { program: String, code: Option<i32> },

    /// The external tool (or the game) could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A path on disk is not valid UTF-8.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no exit code".to_string(),
    }
}

impl Error {
    /// Returns `true` for errors a caller can recover from by regenerating state.
    pub fn is_baseline_missing(&self) -> bool {
        matches!(self, Error::BaselineNotFound(_))
    }
}
