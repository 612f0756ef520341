use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::models::AggregateKey;
use crate::storage::store::DocumentStore;

/// In-memory [`DocumentStore`]. Clones share the same contents, so a test can keep
/// a handle while the extractor or classifier owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Contents>>,
}

#[derive(Debug, Default)]
struct Contents {
    aggregates: BTreeMap<AggregateKey, String>,
    classifications: BTreeMap<AggregateKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Contents>> {
        self.inner
            .lock()
            .map_err(|_| Error::Storage("memory store lock poisoned".to_string()))
    }

    pub fn classification_count(&self) -> usize {
        self.lock().map(|c| c.classifications.len()).unwrap_or(0)
    }
}

impl DocumentStore for MemoryStore {
    fn write_aggregate(&self, key: &AggregateKey, content: &str) -> Result<()> {
        self.lock()?.aggregates.insert(key.clone(), content.to_string());
        Ok(())
    }

    fn list_aggregates(&self) -> Result<Vec<AggregateKey>> {
        Ok(self.lock()?.aggregates.keys().cloned().collect())
    }

    fn read_aggregate(&self, key: &AggregateKey) -> Result<String> {
        self.lock()?
            .aggregates
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("no aggregate file {}", key)))
    }

    fn write_classification(&self, key: &AggregateKey, json: &str) -> Result<()> {
        self.lock()?
            .classifications
            .insert(key.clone(), json.to_string());
        Ok(())
    }

    fn read_classification(&self, key: &AggregateKey) -> Result<Option<String>> {
        Ok(self.lock()?.classifications.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_contents() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let key = AggregateKey::new("python", "octocat_demo");

        store.write_aggregate(&key, "text").unwrap();
        assert_eq!(handle.list_aggregates().unwrap(), vec![key.clone()]);
        assert_eq!(handle.read_aggregate(&key).unwrap(), "text");
        assert!(handle
            .read_aggregate(&AggregateKey::new("go", "missing"))
            .is_err());
    }
}
