//! Session store: lifecycle, exchange workflow, debounced persistence.

use super::message::{Message, MessageDraft, MessagePatch};
use super::model::ChatSession;
use super::repository::HistoryRepository;
use crate::error::Result;
use crate::transport::{ChatEnvelope, FileAttachment, ReplyTransport, extract_reply};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Reply shown in place of the placeholder when an exchange fails.
pub const APOLOGY_REPLY: &str =
    "Sorry, I encountered an error while processing your message. Please try again.";

/// Window in which consecutive mutations coalesce into one save.
const SAVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Simulated reply latency when no endpoint is configured.
const DEMO_DELAY: Duration = Duration::from_secs(2);

#[derive(Default)]
struct StoreState {
    current: Option<ChatSession>,
    history: Vec<ChatSession>,
    is_loading: bool,
    last_error: Option<String>,
}

/// Owns the in-memory chat state and mediates persistence and the reply
/// exchange through its injected ports.
///
/// `ChatStore` is responsible for:
/// - Creating, loading, deleting and listing sessions
/// - Appending and resolving messages
/// - The send workflow (demo mode or one webhook round trip)
/// - Debounced autosave of the current session into the history
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct ChatStore {
    state: Arc<RwLock<StoreState>>,
    /// Persistent storage backend for the history document
    repository: Arc<dyn HistoryRepository>,
    /// Reply transport; `None` runs the store in demo mode
    transport: Option<Arc<dyn ReplyTransport>>,
    /// Mutation counter; a scheduled save only fires if still current
    save_seq: Arc<AtomicU64>,
    pending_save: Arc<Mutex<Option<JoinHandle<()>>>>,
    save_debounce: Duration,
    demo_delay: Duration,
}

impl ChatStore {
    /// Creates a new store over the given ports.
    ///
    /// # Arguments
    ///
    /// * `repository` - The storage backend for the history document
    /// * `transport` - The reply transport; pass `None` for demo mode
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        transport: Option<Arc<dyn ReplyTransport>>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            repository,
            transport,
            save_seq: Arc::new(AtomicU64::new(0)),
            pending_save: Arc::new(Mutex::new(None)),
            save_debounce: SAVE_DEBOUNCE,
            demo_delay: DEMO_DELAY,
        }
    }

    /// Overrides the debounce window and demo delay after construction.
    pub fn with_timings(mut self, save_debounce: Duration, demo_delay: Duration) -> Self {
        self.save_debounce = save_debounce;
        self.demo_delay = demo_delay;
        self
    }

    /// Hydrates the history from storage.
    ///
    /// A failed load degrades to an empty history; the error is logged and
    /// the store stays usable against in-memory state.
    pub async fn load_history(&self) {
        match self.repository.load().await {
            Ok(history) => self.state.write().await.history = history,
            Err(err) => {
                tracing::warn!("failed to load chat history, starting empty: {err}");
            }
        }
    }

    /// Creates a new empty session and makes it current.
    ///
    /// The history is untouched; the session only enters it on save.
    pub async fn new_session(&self) -> ChatSession {
        let session = ChatSession::new();
        self.state.write().await.current = Some(session.clone());
        session
    }

    /// Finalizes a draft and appends it to the current session, creating a
    /// session first if none exists. Schedules a debounced save and returns
    /// the finalized message.
    pub async fn append_message(&self, draft: MessageDraft) -> Message {
        let message = {
            let mut state = self.state.write().await;
            let session = state.current.get_or_insert_with(ChatSession::new);
            session.push(draft)
        };
        self.schedule_save().await;
        message
    }

    /// Applies a partial update to a message of the current session.
    ///
    /// An unknown id is a silent no-op.
    pub async fn update_message(&self, message_id: &str, patch: MessagePatch) {
        let changed = {
            let mut state = self.state.write().await;
            match state.current.as_mut() {
                Some(session) => session.patch_message(message_id, patch),
                None => false,
            }
        };
        if changed {
            self.schedule_save().await;
        }
    }

    /// Sends a user message (with optional attachment) and resolves the
    /// assistant reply into a placeholder message.
    ///
    /// No-op when the trimmed content is empty and no file is attached, or
    /// while a previous send is still in flight. The busy flag is cleared
    /// on every path; failures surface as the apology reply plus the error
    /// slot.
    pub async fn send(&self, content: &str, attachment: Option<FileAttachment>) {
        let content = content.trim();
        if content.is_empty() && attachment.is_none() {
            return;
        }
        {
            let mut state = self.state.write().await;
            if state.is_loading {
                return;
            }
            state.is_loading = true;
            state.last_error = None;
        }

        self.append_message(MessageDraft::user(content)).await;
        let placeholder = self.append_message(MessageDraft::typing_placeholder()).await;

        let reply = match self.resolve_reply(content, attachment.as_ref()).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("message exchange failed: {err}");
                self.state.write().await.last_error = Some(err.to_string());
                APOLOGY_REPLY.to_string()
            }
        };

        self.update_message(&placeholder.id, MessagePatch::finalize(reply))
            .await;
        self.state.write().await.is_loading = false;
    }

    /// Produces the reply text: canned acknowledgment in demo mode, one
    /// webhook round trip otherwise.
    async fn resolve_reply(
        &self,
        content: &str,
        attachment: Option<&FileAttachment>,
    ) -> Result<String> {
        let Some(transport) = &self.transport else {
            tokio::time::sleep(self.demo_delay).await;
            let file_note = attachment
                .map(|file| format!(" with file: {}", file.file_name))
                .unwrap_or_default();
            return Ok(format!(
                "I received your message: \"{content}\"{file_note}. \
                 (Demo mode: configure a webhook endpoint for real replies.)"
            ));
        };

        let envelope = match attachment {
            Some(file) => ChatEnvelope::with_attachment(content, file),
            None => ChatEnvelope::text(content),
        };
        let body = transport.exchange(&envelope).await?;
        Ok(extract_reply(&body))
    }

    /// Upserts the current session into the history and persists it.
    ///
    /// Sessions without messages never enter the history.
    pub async fn save_current(&self) {
        let snapshot = {
            let mut state = self.state.write().await;
            let Some(current) = state.current.clone() else {
                return;
            };
            if current.messages.is_empty() {
                return;
            }
            match state.history.iter_mut().find(|s| s.id == current.id) {
                Some(slot) => *slot = current,
                None => state.history.insert(0, current),
            }
            state.history.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Makes the matching history entry current; unknown ids are a no-op.
    pub async fn load_session(&self, session_id: &str) {
        let mut state = self.state.write().await;
        if let Some(session) = state.history.iter().find(|s| s.id == session_id).cloned() {
            state.current = Some(session);
        }
    }

    /// Removes a session from the history (persisting the removal) and
    /// clears the current session if it was the one deleted.
    pub async fn delete_session(&self, session_id: &str) {
        let snapshot = {
            let mut state = self.state.write().await;
            let before = state.history.len();
            state.history.retain(|s| s.id != session_id);
            let removed = state.history.len() != before;
            if state.current.as_ref().is_some_and(|s| s.id == session_id) {
                state.current = None;
            }
            if !removed {
                return;
            }
            state.history.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Empties the history and current session and erases the persisted
    /// document.
    pub async fn clear_all(&self) {
        {
            let mut state = self.state.write().await;
            state.history.clear();
            state.current = None;
        }
        if let Err(err) = self.repository.erase().await {
            tracing::warn!("failed to erase persisted history: {err}");
        }
    }

    /// Cancels any pending debounced save and saves immediately.
    ///
    /// Intended for shutdown paths.
    pub async fn flush(&self) {
        let pending = self.pending_save.lock().await.take();
        if let Some(handle) = pending {
            handle.abort();
        }
        self.save_current().await;
    }

    /// Renders the history as a pretty JSON export document.
    pub async fn export_json(&self) -> Result<crate::export::ExportDocument> {
        crate::export::history_to_json(&self.history().await)
    }

    /// Renders the history as a Markdown export document.
    pub async fn export_markdown(&self) -> crate::export::ExportDocument {
        crate::export::history_to_markdown(&self.history().await)
    }

    /// Snapshot of the current session.
    pub async fn current_session(&self) -> Option<ChatSession> {
        self.state.read().await.current.clone()
    }

    /// Snapshot of the history, most recently saved first.
    pub async fn history(&self) -> Vec<ChatSession> {
        self.state.read().await.history.clone()
    }

    /// Whether a send is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// The last exchange failure, if any; cleared by the next send.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Schedules the debounced save: each mutation bumps the sequence and
    /// replaces the pending timer, so bursts collapse into one write.
    async fn schedule_save(&self) {
        let seq = self.save_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.clone();
        let delay = self.save_debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.save_seq.load(Ordering::SeqCst) == seq {
                store.save_current().await;
            }
        });
        let previous = self.pending_save.lock().await.replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Persistence failures are logged and swallowed; in-memory state stays
    /// authoritative.
    async fn persist(&self, history: &[ChatSession]) {
        if let Err(err) = self.repository.save(history).await {
            tracing::warn!("failed to persist chat history: {err}");
        }
    }
}
