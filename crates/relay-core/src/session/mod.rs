//! Session domain module.
//!
//! This module contains the chat session domain models, the repository
//! interface for history persistence, and the session store.
//!
//! # Module Structure
//!
//! - `message`: Message types (`MessageRole`, `Message`, `MessageDraft`)
//! - `model`: Core session domain model (`ChatSession`)
//! - `repository`: Repository trait for history persistence
//! - `store`: Session lifecycle and exchange workflow (`ChatStore`)

mod message;
mod model;
mod repository;
mod store;

// Re-export public API
pub use message::{Message, MessageDraft, MessagePatch, MessageRole};
pub use model::{ChatSession, DEFAULT_SESSION_TITLE, TITLE_MAX_CHARS};
pub use repository::HistoryRepository;
pub use store::{ChatStore, APOLOGY_REPLY};
