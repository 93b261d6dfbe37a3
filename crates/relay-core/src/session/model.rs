//! Chat session domain model.
//!
//! This module contains the core `ChatSession` entity that represents one
//! conversation thread in the application's domain layer.

use super::message::{Message, MessageDraft, MessagePatch, MessageRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a session before its first user message arrives.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Maximum number of characters carried from the first user message into
/// the session title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Represents one conversation thread in the application's domain layer.
///
/// A session contains:
/// - An ordered, append-only list of messages (chronological)
/// - A title, derived once from the first user message
/// - Timestamps for creation and last update
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Messages in append order
    pub messages: Vec<Message>,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the session was last updated
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Creates a new empty session with a fresh id and the default title.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Finalizes a draft (id + timestamp) and appends it.
    ///
    /// The first user-role message rewrites the title, once, to the leading
    /// `TITLE_MAX_CHARS` characters of its content. Returns the finalized
    /// message.
    pub fn push(&mut self, draft: MessageDraft) -> Message {
        let rewrite_title = draft.role == MessageRole::User
            && !self.messages.iter().any(|m| m.role == MessageRole::User);

        let message = Message {
            id: Uuid::new_v4().to_string(),
            content: draft.content,
            role: draft.role,
            timestamp: Utc::now(),
            is_typing: draft.is_typing,
            is_streaming: false,
        };

        if rewrite_title {
            self.title = derive_title(&message.content);
        }

        self.messages.push(message.clone());
        self.updated_at = Utc::now();
        message
    }

    /// Applies a partial update to the message with the given id.
    ///
    /// Returns true if a message was updated; an unknown id is a no-op.
    pub fn patch_message(&mut self, message_id: &str, patch: MessagePatch) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message_id) {
            Some(message) => {
                message.apply(patch);
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a session title from the first user message.
fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_unique_ids_in_order() {
        let mut session = ChatSession::new();
        let first = session.push(MessageDraft::user("one"));
        let second = session.push(MessageDraft::assistant("two"));
        let third = session.push(MessageDraft::user("three"));

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);
        assert_ne!(first.id, third.id);

        let contents: Vec<&str> = session.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_title_from_short_first_user_message() {
        let mut session = ChatSession::new();
        session.push(MessageDraft::user("hello there"));
        assert_eq!(session.title, "hello there");
    }

    #[test]
    fn test_title_truncated_at_fifty_chars() {
        let mut session = ChatSession::new();
        let content = "a".repeat(60);
        session.push(MessageDraft::user(content.clone()));
        assert_eq!(session.title, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_title_rewritten_only_once() {
        let mut session = ChatSession::new();
        session.push(MessageDraft::user("first question"));
        session.push(MessageDraft::assistant("an answer"));
        session.push(MessageDraft::user("second question"));
        assert_eq!(session.title, "first question");
    }

    #[test]
    fn test_assistant_message_never_sets_title() {
        let mut session = ChatSession::new();
        session.push(MessageDraft::assistant("greeting from the assistant"));
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
    }

    #[test]
    fn test_title_exactly_fifty_chars_is_verbatim() {
        let mut session = ChatSession::new();
        let content = "b".repeat(50);
        session.push(MessageDraft::user(content.clone()));
        assert_eq!(session.title, content);
    }

    #[test]
    fn test_patch_message_updates_in_place() {
        let mut session = ChatSession::new();
        let placeholder = session.push(MessageDraft::typing_placeholder());
        assert!(placeholder.is_typing);

        let updated = session.patch_message(&placeholder.id, MessagePatch::finalize("done"));
        assert!(updated);

        let message = &session.messages[0];
        assert_eq!(message.content, "done");
        assert!(!message.is_typing);
    }

    #[test]
    fn test_patch_unknown_id_is_noop() {
        let mut session = ChatSession::new();
        session.push(MessageDraft::user("hi"));
        let updated = session.patch_message("missing", MessagePatch::finalize("x"));
        assert!(!updated);
        assert_eq!(session.messages[0].content, "hi");
    }

    #[test]
    fn test_updated_at_refreshed_on_append() {
        let mut session = ChatSession::new();
        let created = session.updated_at;
        session.push(MessageDraft::user("hi"));
        assert!(session.updated_at >= created);
    }
}
