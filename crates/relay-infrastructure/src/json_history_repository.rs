//! JSON-file-backed HistoryRepository implementation.

use crate::paths::RelayPaths;
use crate::storage::{AtomicJsonError, AtomicJsonFile};
use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use relay_core::error::{RelayError, Result};
use relay_core::session::{ChatSession, HistoryRepository};
use std::path::PathBuf;

/// Persists the whole chat history as one JSON document on disk.
///
/// The document plays the role of a single key in a key-value store:
/// `save` replaces it wholesale, `erase` removes it, and `load` treats an
/// absent or unreadable document as an empty history - corrupt state is
/// discarded with a warning instead of surfacing to the caller.
pub struct JsonHistoryRepository {
    file: AtomicJsonFile<Vec<ChatSession>>,
}

impl JsonHistoryRepository {
    /// Creates a repository over the given history file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Creates a repository at the default location
    /// (`<data dir>/relay/history.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be resolved.
    pub fn default_location() -> AnyResult<Self> {
        let path = RelayPaths::history_file().context("Failed to resolve history file path")?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryRepository {
    async fn load(&self) -> Result<Vec<ChatSession>> {
        match self.file.load() {
            Ok(Some(history)) => Ok(history),
            Ok(None) => Ok(Vec::new()),
            Err(AtomicJsonError::Json(err)) => {
                tracing::warn!(
                    "discarding unreadable history document {:?}: {err}",
                    self.file.path()
                );
                Ok(Vec::new())
            }
            Err(err) => Err(RelayError::storage(format!(
                "failed to read history document: {err}"
            ))),
        }
    }

    async fn save(&self, history: &[ChatSession]) -> Result<()> {
        self.file
            .save(&history.to_vec())
            .map_err(|err| RelayError::storage(format!("failed to write history document: {err}")))
    }

    async fn erase(&self) -> Result<()> {
        self.file
            .remove()
            .map_err(|err| RelayError::storage(format!("failed to erase history document: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::session::MessageDraft;
    use std::fs;
    use tempfile::TempDir;

    fn sample_history() -> Vec<ChatSession> {
        let mut session = ChatSession::new();
        session.push(MessageDraft::user("persist me"));
        session.push(MessageDraft::assistant("done"));
        vec![session]
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonHistoryRepository::new(temp_dir.path().join("history.json"));

        let history = sample_history();
        repository.save(&history).await.unwrap();

        let loaded = repository.load().await.unwrap();
        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn test_missing_document_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonHistoryRepository::new(temp_dir.path().join("history.json"));

        assert!(repository.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        fs::write(&path, "][ definitely not json").unwrap();

        let repository = JsonHistoryRepository::new(path);
        assert!(repository.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_erase_removes_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        let repository = JsonHistoryRepository::new(path.clone());

        repository.save(&sample_history()).await.unwrap();
        assert!(path.exists());

        repository.erase().await.unwrap();
        assert!(!path.exists());

        // Erasing an absent document is a no-op.
        repository.erase().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_replaces_previous_document() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonHistoryRepository::new(temp_dir.path().join("history.json"));

        repository.save(&sample_history()).await.unwrap();
        repository.save(&[]).await.unwrap();

        assert!(repository.load().await.unwrap().is_empty());
    }
}
