//! Core logic for the `dev-sync` and `mod-launcher` tools.
//!
//! This crate provides functionality to:
//!
//! - **Fingerprint** extracted game files and persist a baseline ([`FingerprintMap`])
//! - **Detect changes** between the baseline and the current tree ([`ChangeSet`])
//! - **Sync** changed files into a dev-mod overlay ([`OverlaySync`])
//! - **Merge** directory and zip mods into one patch list ([`ModMerger`])
//! - **Patch and launch** through the external asset tool ([`Patcher`], [`launch_game`])
//!
//! # Example
//!
//! ```no_run
//! use pck_mod_core::{Config, GdreTools, MergeOutcome, ModMerger, launch_game};
//! use camino::Utf8Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default().resolve(Utf8Path::new("/games/spring-dash"));
//! let patcher = GdreTools::new(&config.tool_executable);
//!
//! if let MergeOutcome::Patched { output, .. } = ModMerger::new(&config).run(&patcher)? {
//!     launch_game(&config.game_executable, &output)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dev_sync;
pub mod diff;
pub mod error;
pub mod fingerprint;
pub mod launcher;
pub mod merge;
pub mod overlay;
pub mod patcher;
pub mod temp;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use dev_sync::{run_dev_sync, DevSyncOutcome};
pub use diff::ChangeSet;
pub use error::{Error, Result};
pub use fingerprint::{hash_file, FingerprintMap};
pub use launcher::{is_process_running, launch_game};
pub use merge::{MergeOutcome, ModKind, ModMerger, ModSource};
pub use overlay::{OverlaySync, SyncReport};
pub use patcher::{GdreTools, PatchEntry, PatchRequest, Patcher};
pub use temp::TempDirs;
