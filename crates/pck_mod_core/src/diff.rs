//! Change detection between two fingerprint maps.

use crate::fingerprint::FingerprintMap;
use std::collections::BTreeSet;

/// Paths that differ between a baseline and the current tree.
///
/// The two sets are disjoint: a path is either new/modified or gone, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Present in current and either absent from the baseline or with a different digest.
    pub added_or_changed: BTreeSet<String>,
    /// Present in the baseline and absent from current.
    pub removed: BTreeSet<String>,
}

impl ChangeSet {
    /// Classify every path in `baseline` and `current`.
    pub fn between(baseline: &FingerprintMap, current: &FingerprintMap) -> Self {
        let added_or_changed = current
            .iter()
            .filter(|(path, digest)| baseline.get(path) != Some(*digest))
            .map(|(path, _)| path.to_string())
            .collect();

        let removed = baseline
            .iter()
            .filter(|(path, _)| !current.contains(path))
            .map(|(path, _)| path.to_string())
            .collect();

        Self {
            added_or_changed,
            removed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added_or_changed.is_empty() && self.removed.is_empty()
    }
}
