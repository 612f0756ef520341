use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::models::AggregateKey;
use crate::storage::store::DocumentStore;

/// Disk layout: `<aggregate_root>/<language>/<stem>.txt` and
/// `<classification_root>/<language>/<stem>.json`.
#[derive(Debug, Clone)]
pub struct FsStore {
    aggregate_root: PathBuf,
    classification_root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(aggregate_root: P, classification_root: Q) -> Self {
        Self {
            aggregate_root: aggregate_root.as_ref().to_path_buf(),
            classification_root: classification_root.as_ref().to_path_buf(),
        }
    }

    pub fn aggregate_path(&self, key: &AggregateKey) -> PathBuf {
        self.aggregate_root.join(&key.language).join(key.file_name())
    }

    pub fn classification_path(&self, key: &AggregateKey) -> PathBuf {
        self.classification_root
            .join(&key.language)
            .join(key.classification_file_name())
    }

    fn write(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

impl DocumentStore for FsStore {
    fn write_aggregate(&self, key: &AggregateKey, content: &str) -> Result<()> {
        Self::write(&self.aggregate_path(key), content)
    }

    fn list_aggregates(&self) -> Result<Vec<AggregateKey>> {
        if !self.aggregate_root.is_dir() {
            tracing::warn!("Root folder not found: {}", self.aggregate_root.display());
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.aggregate_root).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| Error::Storage(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("txt")
            {
                continue;
            }

            let language = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str());
            let stem = path.file_stem().and_then(|s| s.to_str());

            match (language, stem) {
                (Some(language), Some(stem)) => keys.push(AggregateKey::new(language, stem)),
                _ => tracing::warn!("Ignoring non UTF-8 path: {}", path.display()),
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn read_aggregate(&self, key: &AggregateKey) -> Result<String> {
        Ok(fs::read_to_string(self.aggregate_path(key))?)
    }

    fn write_classification(&self, key: &AggregateKey, json: &str) -> Result<()> {
        Self::write(&self.classification_path(key), json)
    }

    fn read_classification(&self, key: &AggregateKey) -> Result<Option<String>> {
        match fs::read_to_string(self.classification_path(key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FsStore {
        FsStore::new(dir.path().join("root_files"), dir.path().join("classification"))
    }

    #[test]
    fn test_layout_and_listing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store
            .write_aggregate(&AggregateKey::new("python", "octocat_demo"), "readme")
            .unwrap();
        store
            .write_aggregate(&AggregateKey::new("go", "octocat_demo2"), "contributing")
            .unwrap();
        fs::write(dir.path().join("root_files/python/notes.md"), "ignored").unwrap();
        fs::write(dir.path().join("root_files/stray.txt"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join("root_files/python/nested")).unwrap();
        fs::write(dir.path().join("root_files/python/nested/deep.txt"), "ignored").unwrap();

        assert!(dir.path().join("root_files/python/octocat_demo.txt").is_file());
        assert_eq!(
            store.list_aggregates().unwrap(),
            vec![
                AggregateKey::new("go", "octocat_demo2"),
                AggregateKey::new("python", "octocat_demo"),
            ]
        );
        assert_eq!(
            store
                .read_aggregate(&AggregateKey::new("go", "octocat_demo2"))
                .unwrap(),
            "contributing"
        );
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).list_aggregates().unwrap().is_empty());
    }

    #[test]
    fn test_classification_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let key = AggregateKey::new("java", "acme_app");

        assert_eq!(store.read_classification(&key).unwrap(), None);
        store.write_classification(&key, "{}").unwrap();
        assert!(dir.path().join("classification/java/acme_app.json").is_file());
        assert_eq!(store.read_classification(&key).unwrap().as_deref(), Some("{}"));
    }
}
