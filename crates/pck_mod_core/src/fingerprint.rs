//! Content fingerprints and the persisted baseline.
//!
//! A [`FingerprintMap`] maps every file under a root directory to the SHA-256
//! digest of its content. `dev-sync` records one for the freshly extracted game
//! files (the *baseline*) and saves it as `baseline_checksums.json`. On every
//! later run it fingerprints the same tree again and compares the two maps
//! with [`ChangeSet::between`](crate::ChangeSet::between).
//!
//! The baseline is never patched incrementally. If the file is missing it is
//! regenerated wholesale from the current tree.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "assets/player.png": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
//!   "project.binary": "60303ae22b998861bce3b28f33eec1be758a213c86c93c076dbe9f558c11c752"
//! }
//! ```

use crate::error::{Error, Result};
use crate::utils::{is_safe_rel_key, walk_files};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;

/// Compute the SHA-256 digest of a file as lowercase hex.
///
/// The file is streamed into the hasher, so memory use does not depend on
/// file size.
pub fn hash_file(path: &Utf8Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;

    Ok(hex::encode(hasher.finalize()))
}

/// Relative path -> hex digest, kept sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintMap {
    entries: BTreeMap<String, String>,
}

impl FingerprintMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint every regular file under `root`.
    pub fn generate(root: &Utf8Path) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for file in walk_files(root)? {
            let digest = hash_file(&file.path)?;
            entries.insert(file.rel_path, digest);
        }

        tracing::debug!("Fingerprinted {} files under {}", entries.len(), root);
        Ok(Self { entries })
    }

    /// Load a persisted map.
    ///
    /// Returns [`Error::BaselineNotFound`] if the file doesn't exist, and
    /// [`Error::BaselineParse`] if it isn't a flat JSON object of strings or
    /// if any key is absolute or escapes its root.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::BaselineNotFound(path.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        let map: Self = serde_json::from_str(&contents).map_err(|e| Error::BaselineParse {
            path: path.to_owned(),
            message: e.to_string(),
        })?;

        if let Some(bad) = map.entries.keys().find(|k| !is_safe_rel_key(k)) {
            return Err(Error::BaselineParse {
                path: path.to_owned(),
                message: format!("entry '{bad}' is not a relative path"),
            });
        }

        Ok(map)
    }

    /// Write the map as pretty JSON, replacing any existing file.
    pub fn persist(&self, path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load the baseline at `path`, regenerating it from `root` if it is missing.
    pub fn load_or_generate(path: &Utf8Path, root: &Utf8Path) -> Result<Self> {
        match Self::load(path) {
            Ok(map) => Ok(map),
            Err(e) if e.is_baseline_missing() => {
                tracing::warn!("Baseline checksum file missing, generating {}", path);
                let map = Self::generate(root)?;
                map.persist(path)?;
                Ok(map)
            }
            Err(e) => Err(e),
        }
    }

    pub fn insert(&mut self, rel_path: impl Into<String>, digest: impl Into<String>) {
        self.entries.insert(rel_path.into(), digest.into());
    }

    pub fn get(&self, rel_path: &str) -> Option<&str> {
        self.entries.get(rel_path).map(String::as_str)
    }

    pub fn contains(&self, rel_path: &str) -> bool {
        self.entries.contains_key(rel_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FingerprintMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_hash_known_value() {
        let temp = TempDir::new().unwrap();
        let path = utf8_root(&temp).join("test.txt");
        fs::write(&path, b"test").unwrap();

        assert_eq!(
            hash_file(&path).unwrap(),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_hash_spans_multiple_chunks() {
        let temp = TempDir::new().unwrap();
        let root = utf8_root(&temp);
        let data: Vec<u8> = (0..3 * 8192 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(root.join("big.bin"), &data).unwrap();

        assert_eq!(
            hash_file(&root.join("big.bin")).unwrap(),
            hex::encode(Sha256::digest(&data))
        );
    }

    #[test]
    fn test_hash_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(hash_file(&utf8_root(&temp).join("nope")).is_err());
    }

    #[test]
    fn test_generate_uses_relative_forward_slash_keys() {
        let temp = TempDir::new().unwrap();
        let root = utf8_root(&temp);
        fs::create_dir_all(root.join("dir/sub")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("dir/sub/b.txt"), "b").unwrap();

        let map = FingerprintMap::generate(&root).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains("a.txt"));
        assert!(map.contains("dir/sub/b.txt"));
        assert_eq!(map.get("a.txt").unwrap().len(), 64);
    }

    #[test]
    fn test_generate_is_stable() {
        let temp = TempDir::new().unwrap();
        let root = utf8_root(&temp);
        fs::write(root.join("x"), "1").unwrap();
        fs::write(root.join("y"), "2").unwrap();

        assert_eq!(
            FingerprintMap::generate(&root).unwrap(),
            FingerprintMap::generate(&root).unwrap()
        );
    }

    #[test]
    fn test_persist_and_load() {
        let temp = TempDir::new().unwrap();
        let path = utf8_root(&temp).join("state/baseline.json");

        let map: FingerprintMap = [("a.txt", "h1"), ("dir/b.txt", "h2")].into_iter().collect();
        map.persist(&path).unwrap();

        assert_eq!(FingerprintMap::load(&path).unwrap(), map);
    }

    #[test]
    fn test_persist_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = utf8_root(&temp).join("baseline.json");

        let first: FingerprintMap = [("a.txt", "h1")].into_iter().collect();
        let second: FingerprintMap = [("b.txt", "h2")].into_iter().collect();
        first.persist(&path).unwrap();
        second.persist(&path).unwrap();

        assert_eq!(FingerprintMap::load(&path).unwrap(), second);
    }

    #[test]
    fn test_load_missing() {
        let temp = TempDir::new().unwrap();
        let result = FingerprintMap::load(&utf8_root(&temp).join("missing.json"));
        assert!(matches!(result, Err(Error::BaselineNotFound(_))));
    }

    #[test]
    fn test_load_malformed() {
        let temp = TempDir::new().unwrap();
        let path = utf8_root(&temp).join("baseline.json");
        fs::write(&path, "{ invalid json }").unwrap();

        assert!(matches!(
            FingerprintMap::load(&path),
            Err(Error::BaselineParse { .. })
        ));
    }

    #[test]
    fn test_load_rejects_escaping_paths() {
        let temp = TempDir::new().unwrap();
        let path = utf8_root(&temp).join("baseline.json");
        fs::write(&path, r#"{"../outside.txt": "h1"}"#).unwrap();

        assert!(matches!(
            FingerprintMap::load(&path),
            Err(Error::BaselineParse { .. })
        ));
    }

    #[test]
    fn test_load_or_generate_regenerates() {
        let temp = TempDir::new().unwrap();
        let root = utf8_root(&temp).join("game-files");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        let path = utf8_root(&temp).join("baseline.json");

        let map = FingerprintMap::load_or_generate(&path, &root).unwrap();
        assert!(map.contains("a.txt"));
        assert!(path.exists());
        assert_eq!(FingerprintMap::load(&path).unwrap(), map);
    }

    #[test]
    fn test_load_or_generate_keeps_existing() {
        let temp = TempDir::new().unwrap();
        let root = utf8_root(&temp).join("game-files");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "changed").unwrap();
        let path = utf8_root(&temp).join("baseline.json");

        let recorded: FingerprintMap = [("a.txt", "h1")].into_iter().collect();
        recorded.persist(&path).unwrap();

        assert_eq!(FingerprintMap::load_or_generate(&path, &root).unwrap(), recorded);
    }

    #[test]
    fn test_serialization_format() {
        let map: FingerprintMap = [("b.txt", "h2"), ("a.txt", "h1")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a.txt":"h1","b.txt":"h2"}"#);
    }
}
