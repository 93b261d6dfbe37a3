//! Chat message types.
//!
//! This module contains types for representing messages in a chat session,
//! including roles, finalized messages, and the partial inputs used to
//! append and update them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
}

impl MessageRole {
    /// Display label used in exports and the front-end.
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

/// A single message in a chat session.
///
/// Messages are immutable once finalized; the only in-place update is the
/// one that resolves a pending assistant placeholder (`is_typing`) into its
/// final content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// The content of the message.
    pub content: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// Timestamp when the message was created.
    pub timestamp: DateTime<Utc>,
    /// Transient flag for an assistant placeholder awaiting its reply.
    #[serde(default)]
    pub is_typing: bool,
    /// Reserved for incremental replies; always false today.
    #[serde(default)]
    pub is_streaming: bool,
}

impl Message {
    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: MessagePatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(is_typing) = patch.is_typing {
            self.is_typing = is_typing;
        }
        if let Some(is_streaming) = patch.is_streaming {
            self.is_streaming = is_streaming;
        }
    }
}

/// The input to an append: a message without id and timestamp.
///
/// The store assigns both when the draft is appended.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub content: String,
    pub role: MessageRole,
    pub is_typing: bool,
}

impl MessageDraft {
    /// A user message draft.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: MessageRole::User,
            is_typing: false,
        }
    }

    /// A finalized assistant message draft.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: MessageRole::Assistant,
            is_typing: false,
        }
    }

    /// The empty assistant placeholder appended while a reply is pending.
    pub fn typing_placeholder() -> Self {
        Self {
            content: String::new(),
            role: MessageRole::Assistant,
            is_typing: true,
        }
    }
}

/// A partial message update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub is_typing: Option<bool>,
    pub is_streaming: Option<bool>,
}

impl MessagePatch {
    /// The patch that resolves a typing placeholder into its final reply.
    pub fn finalize(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            is_typing: Some(false),
            is_streaming: None,
        }
    }
}
