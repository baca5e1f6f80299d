use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read corrections file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write corrections file: {0}")]
    Write(#[source] std::io::Error),

    #[error("corrections file is not a valid JSON object: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Normalized lookup key for a correction entry. Differently-cased spellings
/// of the same word must collide to one entry.
pub fn normalize_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Persistent mapping from an original word to a corrected ARASAAC search
/// term, stored as one JSON object on disk.
///
/// Writes are a full-file rewrite of the merged mapping. The mutex covers
/// the whole load-modify-store sequence so concurrent in-process corrections
/// cannot lose each other's updates.
pub struct CorrectionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CorrectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read the full mapping. A missing file is an empty mapping, not an
    /// error; unreadable or corrupt content is reported and the caller
    /// decides how to degrade.
    pub async fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Read(e)),
        };

        serde_json::from_slice(&bytes).map_err(StoreError::Corrupt)
    }

    /// Persist one correction, merging it into the existing mapping and
    /// rewriting the whole file. Saving the same pair twice is a no-op for
    /// the stored content.
    pub async fn save(&self, original: &str, resolved: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(e @ StoreError::Corrupt(_)) => {
                // A corrupt file would otherwise block corrections forever;
                // start over from the entry being saved.
                tracing::warn!("discarding corrupt corrections file: {e}");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(
            normalize_key(original),
            resolved.trim().to_string(),
        );

        let json = serde_json::to_vec_pretty(&entries).map_err(StoreError::Corrupt)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(StoreError::Write)
    }

    /// Resolve a stored correction for a word, applying the same key
    /// normalization used on save.
    pub async fn lookup(&self, original: &str) -> Result<Option<String>, StoreError> {
        let entries = self.load().await?;
        Ok(entries.get(&normalize_key(original)).cloned())
    }
}
