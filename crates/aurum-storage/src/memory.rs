//! In-memory storage backend.
//!
//! Data lives in a `BTreeMap` behind a `RwLock` and is lost when the process
//! exits. This is the default backend for local development and for tests
//! that need a real backend without touching disk.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{StorageBackend, StorageError};

/// An in-memory storage backend backed by a `BTreeMap`.
///
/// Clones share the same underlying map. Keys are kept sorted, so prefix
/// listing is a single range scan.
///
/// # Examples
///
/// ```
/// # use aurum_storage::{MemoryBackend, StorageBackend};
/// # #[tokio::main]
/// # async fn main() -> Result<(), aurum_storage::StorageError> {
/// let backend = MemoryBackend::new();
/// backend.put("loan/params/interestRate", b"0.05").await?;
/// let val = backend.get("loan/params/interestRate").await?;
/// assert_eq!(val, Some(b"0.05".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let data = self.data.read().await;
        let keys = data
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let data = self.data.read().await;
        Ok(data.contains_key(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let backend = MemoryBackend::new();
        let result = backend.get("loan/params/missing").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn put_overwrites_previous_value() {
        let backend = MemoryBackend::new();
        backend.put("loan/params/interestRate", b"0.05").await.unwrap();
        backend.put("loan/params/interestRate", b"0.08").await.unwrap();
        let val = backend.get("loan/params/interestRate").await.unwrap();
        assert_eq!(val, Some(b"0.08".to_vec()));
    }

    #[tokio::test]
    async fn exists_tracks_puts() {
        let backend = MemoryBackend::new();
        assert!(!backend.exists("loan/params/interestRate").await.unwrap());
        backend.put("loan/params/interestRate", b"0.05").await.unwrap();
        assert!(backend.exists("loan/params/interestRate").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_only_prefixed_keys_in_order() {
        let backend = MemoryBackend::new();
        backend.put("loan/params/loanToValueRatio", b"0.7").await.unwrap();
        backend.put("loan/params/interestRate", b"0.05").await.unwrap();
        backend.put("loan/other", b"x").await.unwrap();
        backend.put("sys/version", b"1").await.unwrap();

        let keys = backend.list("loan/params/").await.unwrap();
        assert_eq!(
            keys,
            vec!["loan/params/interestRate", "loan/params/loanToValueRatio"]
        );
    }

    #[tokio::test]
    async fn list_without_matches_is_empty() {
        let backend = MemoryBackend::new();
        backend.put("sys/version", b"1").await.unwrap();
        assert!(backend.list("loan/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        backend.put("key", b"val").await.unwrap();
        assert_eq!(clone.get("key").await.unwrap(), Some(b"val".to_vec()));
    }
}
