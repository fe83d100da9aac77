//! Pure view projection of the conversation
//!
//! Front ends render from a [`TranscriptView`] and keep no state of their
//! own; everything here is derived from `Conversation` deterministically.

use crate::conversation::{Conversation, Status};
use crate::message::{ChatMessage, Role};

/// One renderable transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewItem {
    Message(MessageView),
    /// Trailing loading marker while a request is in flight
    Loading,
}

/// Render data for a single message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub sources: Vec<String>,
    pub is_error: bool,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role,
            content: message.content.clone(),
            sources: message.sources.clone(),
            is_error: message.is_error,
        }
    }
}

/// Status indicator contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub status: Status,
    /// Error text, present only when `status` is `Error`
    pub detail: Option<String>,
}

/// Deterministic projection of the conversation for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptView {
    /// Messages in transcript order, plus the loading marker when in flight
    pub items: Vec<ViewItem>,
    pub status: StatusLine,
    /// True when there is nothing to show and no request in flight
    pub show_empty_state: bool,
    /// Clear control: only enabled for a non-empty transcript at rest
    pub clear_enabled: bool,
}

impl TranscriptView {
    /// Project the current conversation state
    pub fn project(conversation: &Conversation) -> Self {
        let in_flight = conversation.is_in_flight();

        let mut items: Vec<ViewItem> = conversation
            .messages()
            .iter()
            .map(|m| ViewItem::Message(m.into()))
            .collect();
        if in_flight {
            items.push(ViewItem::Loading);
        }

        Self {
            show_empty_state: conversation.messages().is_empty() && !in_flight,
            clear_enabled: !conversation.messages().is_empty() && !in_flight,
            status: StatusLine {
                status: conversation.status(),
                detail: conversation.error_message().map(str::to_owned),
            },
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistoryStore;

    fn convo() -> Conversation {
        Conversation::new(Box::new(MemoryHistoryStore::new()))
    }

    #[test]
    fn test_empty_state_after_clear() {
        let mut c = convo();
        c.clear();

        let view = TranscriptView::project(&c);
        assert!(view.show_empty_state);
        assert!(view.items.is_empty());
        assert!(!view.clear_enabled);
        assert_eq!(view.status.status, Status::Idle);
    }

    #[test]
    fn test_items_follow_transcript_order() {
        let mut c = convo();
        c.submit("question").unwrap();
        c.push_assistant("answer", vec!["https://mosdac.gov.in/a".into()]);

        let view = TranscriptView::project(&c);
        assert_eq!(view.items.len(), 3);
        let ViewItem::Message(last) = &view.items[2] else {
            panic!("expected a message item");
        };
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.sources, vec!["https://mosdac.gov.in/a"]);
    }

    #[test]
    fn test_loading_marker_while_in_flight() {
        let mut c = convo();
        c.submit("question").unwrap();
        c.set_status(Status::Connecting);

        let view = TranscriptView::project(&c);
        assert_eq!(view.items.last(), Some(&ViewItem::Loading));
        assert!(!view.show_empty_state);
        assert!(!view.clear_enabled);
    }

    #[test]
    fn test_status_line_carries_error_detail() {
        let mut c = convo();
        c.set_error("Request failed with status 500");

        let view = TranscriptView::project(&c);
        assert_eq!(view.status.status, Status::Error);
        assert_eq!(
            view.status.detail.as_deref(),
            Some("Request failed with status 500")
        );
    }

    #[test]
    fn test_error_messages_are_flagged() {
        let mut c = convo();
        c.push_error_fallback();

        let view = TranscriptView::project(&c);
        let ViewItem::Message(last) = view.items.last().unwrap() else {
            panic!("expected a message item");
        };
        assert!(last.is_error);
    }

    #[test]
    fn test_clear_enabled_at_rest_with_messages() {
        let c = convo();
        let view = TranscriptView::project(&c);
        assert!(view.clear_enabled);
    }
}
