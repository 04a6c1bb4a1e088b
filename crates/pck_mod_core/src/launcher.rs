//! Launching the game against a patched archive.

use crate::error::{Error, Result};
use camino::Utf8Path;
use std::ffi::OsStr;
use std::process::{Command, ExitStatus};
use sysinfo::System;

/// Argument list passed to the game so it loads `archive` instead of its bundled pack.
pub fn launch_args(archive: &Utf8Path) -> [&str; 2] {
    ["--main-pack", archive.as_str()]
}

/// Start the game with `--main-pack <archive>` and wait for it to exit.
///
/// Returns the game's exit status. A non-zero status is not turned into an
/// error here; callers decide how much they care about it.
pub fn launch_game(executable: &Utf8Path, archive: &Utf8Path) -> Result<ExitStatus> {
    tracing::info!("Launching {} with --main-pack {}", executable, archive);

    let mut cmd = Command::new(executable.as_std_path());
    cmd.args(launch_args(archive));

    cmd.status().map_err(|source| Error::Spawn {
        program: executable.to_string(),
        source,
    })
}

/// Check whether a process whose executable name matches `executable`'s file name is running.
pub fn is_process_running(executable: &Utf8Path) -> bool {
    let Some(name) = executable.file_name() else {
        return false;
    };

    let system = System::new_all();
    let running = system.processes_by_exact_name(OsStr::new(name)).next().is_some();
    running
}
