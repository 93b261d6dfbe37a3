//! History repository trait.
//!
//! Defines the interface for history persistence operations.

use super::model::ChatSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for persisting the chat history.
///
/// The history is one logical document: the ordered list of saved sessions,
/// most recently saved first. This trait decouples the session store from
/// the specific storage mechanism (a JSON file on disk, an in-memory fake
/// in tests, a browser key-value store behind a binding).
///
/// # Implementation Notes
///
/// Implementations should treat an absent or unreadable document as an
/// empty history rather than an error where possible; the store never
/// crashes on persistence failures.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Loads the persisted history.
    ///
    /// # Returns
    ///
    /// - `Ok(sessions)`: The stored history (empty when nothing was saved)
    /// - `Err(_)`: Error occurred during retrieval
    async fn load(&self) -> Result<Vec<ChatSession>>;

    /// Replaces the persisted history with the given sessions.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: History saved successfully
    /// - `Err(_)`: Error occurred during save
    async fn save(&self, history: &[ChatSession]) -> Result<()>;

    /// Erases the persisted history entirely.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: History erased (or nothing was stored)
    /// - `Err(_)`: Error occurred during erasure
    async fn erase(&self) -> Result<()>;
}
