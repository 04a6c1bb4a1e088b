//! The external asset tool behind a small trait.
//!
//! Both tools only ever ask the asset tool for two things: unpack the base
//! archive into a directory, and write a new archive with a batch of files
//! patched in. [`Patcher`] captures exactly that, and [`GdreTools`] implements it
//! by running `gdre_tools` as a subprocess.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::process::Command;

/// One file to place inside the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEntry {
    /// File on disk to read from.
    pub source: Utf8PathBuf,
    /// Archive-internal destination, e.g. `res://scenes/main.tscn`.
    pub destination: String,
}

impl PatchEntry {
    pub fn new(source: impl Into<Utf8PathBuf>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Command-line form understood by the asset tool.
    pub fn to_arg(&self) -> String {
        format!("--patch-file={}={}", self.source, self.destination)
    }
}

/// A single batched patch job.
///
/// Entries are applied in order, so a later entry for the same destination
/// replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest {
    pub base_archive: Utf8PathBuf,
    pub output_archive: Utf8PathBuf,
    pub entries: Vec<PatchEntry>,
}

/// Extracts and patches game archives.
pub trait Patcher {
    /// Unpack `archive` into `output_dir`.
    fn extract(&self, archive: &Utf8Path, output_dir: &Utf8Path) -> Result<()>;

    /// Write `request.output_archive` with every entry patched into `request.base_archive`.
    fn patch(&self, request: &PatchRequest) -> Result<()>;
}

/// [`Patcher`] backed by the `gdre_tools` executable.
#[derive(Debug, Clone)]
pub struct GdreTools {
    executable: Utf8PathBuf,
}

impl GdreTools {
    pub fn new(executable: impl Into<Utf8PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(self.executable.as_std_path());
        cmd.args(["--headless", "--verbose"]);
        cmd
    }

    fn extract_args(archive: &Utf8Path, output_dir: &Utf8Path) -> Vec<String> {
        vec![
            format!("--recover={archive}"),
            format!("--output={output_dir}"),
        ]
    }

    fn patch_args(request: &PatchRequest) -> Vec<String> {
        let mut args = Vec::with_capacity(request.entries.len() + 2);
        args.push(format!("--pck-patch={}", request.base_archive));
        args.push(format!("--output={}", request.output_archive));
        args.extend(request.entries.iter().map(PatchEntry::to_arg));
        args
    }

    fn run(&self, mut cmd: Command) -> Result<()> {
        let program = self.executable.to_string();
        tracing::debug!("Running {:?}", cmd);

        let status = cmd.status().map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Subprocess {
                program,
                code: status.code(),
            })
        }
    }
}

impl Patcher for GdreTools {
    fn extract(&self, archive: &Utf8Path, output_dir: &Utf8Path) -> Result<()> {
        tracing::info!("Extracting '{}' into '{}'", archive, output_dir);
        let mut cmd = self.base_command();
        cmd.args(Self::extract_args(archive, output_dir));
        self.run(cmd)
    }

    fn patch(&self, request: &PatchRequest) -> Result<()> {
        tracing::info!(
            "Patching {} files into '{}'",
            request.entries.len(),
            request.output_archive
        );
        let mut cmd = self.base_command();
        cmd.args(Self::patch_args(request));
        self.run(cmd)
    }
}
