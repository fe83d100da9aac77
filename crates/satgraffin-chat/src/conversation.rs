//! Conversation state: transcript, request status, and error text
//!
//! `Conversation` is the single source of truth. The history store only
//! mirrors it: every message mutation writes through, and on conflict the
//! in-memory transcript wins.

use crate::history::HistoryStore;
use crate::message::ChatMessage;

/// Request lifecycle status.
///
/// `Idle -> Connecting` on submit, then `Success` or `Error` on completion.
/// `Success` and `Error` both return to `Connecting` on the next submit;
/// `clear` forces any state back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Connecting,
    Success,
    Error,
}

impl Status {
    /// Machine-readable label for the status indicator
    pub fn label(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Connecting => "connecting",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

/// Owner of the live conversation state
pub struct Conversation {
    messages: Vec<ChatMessage>,
    status: Status,
    error_message: Option<String>,
    store: Box<dyn HistoryStore>,
}

impl Conversation {
    /// Create a conversation backed by the given store.
    ///
    /// A non-empty persisted transcript fully replaces the seeded welcome
    /// message; otherwise the conversation starts with the greeting.
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        let messages = store
            .load()
            .unwrap_or_else(|| vec![ChatMessage::welcome()]);

        Self {
            messages,
            status: Status::Idle,
            error_message: None,
            store,
        }
    }

    /// Transcript in insertion order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Error text, present only while `status` is `Error`
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether a request is currently between submission and resolution
    pub fn is_in_flight(&self) -> bool {
        self.status == Status::Connecting
    }

    /// Append a user message.
    ///
    /// Returns `None` without touching any state when the trimmed text is
    /// empty, or when a request is already in flight (at most one request
    /// may be outstanding).
    pub fn submit(&mut self, text: &str) -> Option<&ChatMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if self.is_in_flight() {
            tracing::debug!("Submit ignored: a request is already in flight");
            return None;
        }

        self.messages.push(ChatMessage::user(trimmed));
        self.persist();
        self.messages.last()
    }

    /// Append an assistant message with its source links
    pub fn push_assistant(&mut self, text: impl Into<String>, sources: Vec<String>) {
        self.messages.push(ChatMessage::assistant(text, sources));
        self.persist();
    }

    /// Append the fixed connectivity-failure message
    pub fn push_error_fallback(&mut self) {
        self.messages.push(ChatMessage::error_fallback());
        self.persist();
    }

    /// Transition status and drop any stale error text
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.error_message = None;
    }

    /// Transition to `Error` with the text shown in the status indicator
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Status::Error;
        self.error_message = Some(message.into());
    }

    /// Empty the transcript, reset status, and drop the persisted entry
    pub fn clear(&mut self) {
        self.messages.clear();
        self.status = Status::Idle;
        self.error_message = None;
        self.store.clear();
    }

    fn persist(&mut self) {
        self.store.save(&self.messages);
    }
}
