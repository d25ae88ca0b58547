//! Content-addressed result cache.
//!
//! Rendered artifacts are expensive (a leased browser session per render),
//! so every flow is fronted by this cache. The key is any serializable
//! tuple of the logical request parameters; it is canonically serialized
//! and SHA-256 hashed to a hex filename under the cache directory.
//! Entries are immutable once written: no eviction, no TTL, no
//! invalidation.

use std::path::{Path, PathBuf};

use {
    serde::Serialize,
    sha2::{Digest, Sha256},
    thiserror::Error,
    tracing::debug,
};

/// Cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to serialize cache key: {0}")]
    Key(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Filesystem-backed content-addressed store.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic hex digest of a logical key.
    pub fn key_hash<K: Serialize>(key: &K) -> Result<String> {
        let canonical = serde_json::to_vec(key)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }

    fn path_for(&self, hash: &str) -> PathBuf {
        self.dir.join(hash)
    }

    /// Look up the blob stored for `key`, if any.
    pub async fn get<K: Serialize>(&self, key: &K) -> Result<Option<Vec<u8>>> {
        let hash = Self::key_hash(key)?;
        let path = self.path_for(&hash);

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(hash, bytes = bytes.len(), "cache hit");
                Ok(Some(bytes))
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(hash, "cache miss");
                Ok(None)
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Store `bytes` under the hash of `key`.
    pub async fn save<K: Serialize>(&self, key: &K, bytes: &[u8]) -> Result<()> {
        let hash = Self::key_hash(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(&hash), bytes).await?;
        debug!(hash, bytes = bytes.len(), "cache store");
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_returns_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());

        let key = ("lauf", "laʊf", "Verb", "to run", "Ich laufe schnell.", 3u32);
        let bytes = b"\x89PNG-pretend-payload".to_vec();

        cache.save(&key, &bytes).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(bytes));
    }

    #[tokio::test]
    async fn unseen_key_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());

        let miss = cache.get(&("entry-card", "unseen")).await.unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn hash_is_deterministic_and_parameter_sensitive() {
        let a = ResultCache::key_hash(&("word", 3u32)).unwrap();
        let b = ResultCache::key_hash(&("word", 3u32)).unwrap();
        let c = ResultCache::key_hash(&("word", 4u32)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
