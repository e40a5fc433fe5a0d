//! Durable snapshot of the catalog.
//!
//! One JSON document on disk: `{ "lastUpdated": <ms epoch>, "entries": [...] }`.
//! This module only moves bytes; interpreting the entries is the catalog's
//! job. The file has a single writer (the refresher) by design.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors for snapshot IO.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot file is corrupt: {0}")]
    Corrupt(String),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The on-disk document. Entries stay raw JSON here; the catalog normalizes
/// them on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub last_updated: i64,
    pub entries: Vec<Value>,
}

/// Byte-level access to the snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Open the store, creating the file and its parent directories if they
    /// do not exist yet. Failing to create them is a startup-fatal error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let path = path.into();
        if !path.exists() {
            warn!(path = %path.display(), "snapshot file missing, creating it");
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&path)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. An empty file is an empty document (fresh install);
    /// anything unparsable or missing the required top-level fields is
    /// [`SnapshotError::Corrupt`] and must abort startup.
    pub fn load(&self) -> Result<SnapshotDocument, SnapshotError> {
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(SnapshotDocument {
                last_updated: 0,
                entries: Vec::new(),
            });
        }
        serde_json::from_str(&data).map_err(|e| SnapshotError::Corrupt(e.to_string()))
    }

    /// Write the document via a sibling temp file and an atomic rename, so a
    /// crash mid-write never clobbers the last good snapshot.
    pub fn write(&self, document: &SnapshotDocument) -> Result<(), SnapshotError> {
        let data = serde_json::to_vec(document).map_err(SnapshotError::Encode)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, &data)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}
