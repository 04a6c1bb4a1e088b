//! The `dev-sync` workflow.
//!
//! 1. If the baseline root doesn't exist yet, extract the base archive into it
//!    and record a fresh baseline.
//! 2. Load the baseline, regenerating it if the checksum file is missing.
//! 3. Fingerprint the baseline root as it is now and diff against the baseline.
//! 4. Apply the difference to the dev-mod overlay.

use crate::config::Config;
use crate::diff::ChangeSet;
use crate::error::Result;
use crate::fingerprint::FingerprintMap;
use crate::overlay::{OverlaySync, SyncReport};
use crate::patcher::Patcher;
use std::fs;

/// Summary of one `dev-sync` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevSyncOutcome {
    /// The base archive was extracted during this run.
    pub extracted: bool,
    pub changes: ChangeSet,
    pub report: SyncReport,
}

/// Run the full extract → baseline → diff → overlay pipeline.
pub fn run_dev_sync(config: &Config, patcher: &dyn Patcher) -> Result<DevSyncOutcome> {
    let extracted = ensure_extracted(config, patcher)?;

    let baseline = FingerprintMap::load_or_generate(&config.checksum_file, &config.baseline_root)?;
    let current = FingerprintMap::generate(&config.baseline_root)?;
    let changes = ChangeSet::between(&baseline, &current);

    tracing::info!(
        "{} added or changed, {} removed",
        changes.added_or_changed.len(),
        changes.removed.len()
    );

    let report = OverlaySync::new(&config.baseline_root, &config.overlay_root).apply(&changes)?;

    Ok(DevSyncOutcome {
        extracted,
        changes,
        report,
    })
}

/// Extract the base archive and record its baseline if the baseline root is absent.
///
/// A failed extraction removes the half-created directory so the next run retries.
fn ensure_extracted(config: &Config, patcher: &dyn Patcher) -> Result<bool> {
    if config.baseline_root.exists() {
        tracing::info!("'{}' already exists, skipping extraction", config.baseline_root);
        return Ok(false);
    }

    fs::create_dir_all(&config.baseline_root)?;
    if let Err(e) = patcher.extract(&config.base_archive, &config.baseline_root) {
        if let Err(cleanup) = fs::remove_dir_all(&config.baseline_root) {
            tracing::warn!(
                "Failed to remove partial extraction {}: {}",
                config.baseline_root,
                cleanup
            );
        }
        return Err(e);
    }

    FingerprintMap::generate(&config.baseline_root)?.persist(&config.checksum_file)?;
    tracing::info!("Baseline checksums generated");
    Ok(true)
}
