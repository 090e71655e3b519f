//! Persisted record of the last status seen for every tracked bounty

use crate::types::BountyStatus;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bounty id -> last observed status. A missing id means "never seen".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default)]
    pub bounties: BTreeMap<String, BountyStatus>,
}

impl StateRecord {
    pub fn status_of(&self, id: &str) -> Option<&BountyStatus> {
        self.bounties.get(id)
    }

    pub fn record(&mut self, id: &str, status: BountyStatus) {
        self.bounties.insert(id.to_string(), status);
    }

    pub fn len(&self) -> usize {
        self.bounties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounties.is_empty()
    }
}

/// JSON file backing the state record
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record.
    ///
    /// Never fails: a missing file yields an empty record, and an unreadable
    /// or corrupt one is logged and reset to empty.
    pub async fn load(&self) -> StateRecord {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state file at {}, starting empty", self.path.display());
                return StateRecord::default();
            }
            Err(e) => {
                warn!("Failed to read state file {}: {}, resetting", self.path.display(), e);
                return StateRecord::default();
            }
        };

        match serde_json::from_str::<StateRecord>(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Corrupt state file {}: {}, resetting", self.path.display(), e);
                StateRecord::default()
            }
        }
    }

    /// Overwrite the state file with the given record, pretty-printed
    pub async fn save(&self, state: &StateRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;

        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write state file {}", self.path.display()))?;

        debug!("Saved {} bounty statuses to {}", state.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("bounty-state-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let store = StateStore::new(temp_path());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_resets() {
        let path = temp_path();
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = StateStore::new(&path);
        assert!(store.load().await.is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = temp_path();
        let store = StateStore::new(&path);

        let mut state = StateRecord::default();
        state.record("b-1", BountyStatus::Open);
        state.record("b-2", BountyStatus::from("disputed"));
        store.save(&state).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["bounties"]["b-1"], "open");
        assert_eq!(value["bounties"]["b-2"], "disputed");
        assert!(raw.contains('\n'), "state file should be pretty-printed");

        assert_eq!(store.load().await, state);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let dir = std::env::temp_dir().join(format!("bounty-missing-{}", uuid::Uuid::new_v4()));
        let store = StateStore::new(dir.join("state.json"));
        assert!(store.save(&StateRecord::default()).await.is_err());
    }
}
