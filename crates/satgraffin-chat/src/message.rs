//! Transcript message model

use serde::{Deserialize, Serialize};

/// Fixed id of the seeded welcome message
pub const WELCOME_MESSAGE_ID: &str = "assistant-welcome";

const WELCOME_TEXT: &str = "Hello explorer! I am SatGraffin, your guide to the \
MOSDAC knowledge universe. Ask me about satellite missions, data access \
workflows, instrumentation specs, or anything space-data related.";

const CONNECTIVITY_FALLBACK_TEXT: &str = "I ran into a connectivity issue \
while reaching the knowledge store. Please retry in a moment.";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the transcript.
///
/// Serialized with the v1 camelCase field names so persisted history matches
/// the schema the versioned store name promises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique within a conversation, generated client-side
    pub id: String,
    pub role: Role,
    /// Plain text body
    pub content: String,
    /// Epoch millis
    pub created_at: i64,
    /// Citation URLs backing an assistant response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Marks a synthetic failure message
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
            sources,
            is_error: false,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, vec![])
    }

    /// Create an assistant message with its source links
    pub fn assistant(content: impl Into<String>, sources: Vec<String>) -> Self {
        Self::new(Role::Assistant, content, sources)
    }

    /// The fixed connectivity-failure message shown when a query cycle fails
    pub fn error_fallback() -> Self {
        let mut message = Self::new(Role::Assistant, CONNECTIVITY_FALLBACK_TEXT, vec![]);
        message.is_error = true;
        message
    }

    /// The seeded greeting shown when no persisted transcript exists
    pub fn welcome() -> Self {
        let mut message = Self::new(Role::Assistant, WELCOME_TEXT, vec![]);
        message.id = WELCOME_MESSAGE_ID.to_string();
        message
    }
}
