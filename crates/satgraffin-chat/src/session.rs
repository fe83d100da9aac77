//! Request-cycle driver tying the conversation to a backend

use satgraffin_api::Backend;

use crate::conversation::{Conversation, Status};

/// Drives one query cycle per user submission against a [`Backend`].
///
/// State transitions live here, not in the backend client: submit moves the
/// conversation to `Connecting`, a response appends the assistant message and
/// lands on `Success`, a failure appends the fixed fallback and lands on
/// `Error`.
pub struct ChatSession<B: Backend> {
    conversation: Conversation,
    backend: B,
    user_id: String,
}

impl<B: Backend> ChatSession<B> {
    /// Create a session for the given conversation and backend
    pub fn new(conversation: Conversation, backend: B, user_id: impl Into<String>) -> Self {
        Self {
            conversation,
            backend,
            user_id: user_id.into(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Append the user message and enter `Connecting`.
    ///
    /// Returns the trimmed query text to resolve with [`complete`], or
    /// `None` when the submission was rejected (blank text or a request
    /// already in flight) and nothing changed.
    ///
    /// [`complete`]: ChatSession::complete
    pub fn begin(&mut self, text: &str) -> Option<String> {
        let query = self.conversation.submit(text)?.content.clone();
        self.conversation.set_status(Status::Connecting);
        Some(query)
    }

    /// Resolve the in-flight request: one backend call, then the matching
    /// state transition
    pub async fn complete(&mut self, query: &str) {
        match self.backend.query(query, &self.user_id).await {
            Ok(reply) => {
                self.conversation
                    .push_assistant(reply.response, reply.source_links);
                self.conversation.set_status(Status::Success);
            }
            Err(e) => {
                tracing::warn!("Backend query failed: {}", e);
                self.conversation.push_error_fallback();
                self.conversation.set_error(e.to_string());
            }
        }
    }

    /// Submit user text and run the full request cycle.
    ///
    /// Returns `false` when the submission was rejected and nothing changed.
    pub async fn send(&mut self, text: &str) -> bool {
        match self.begin(text) {
            Some(query) => {
                self.complete(&query).await;
                true
            }
            None => false,
        }
    }

    /// Clear the transcript and its persisted mirror
    pub fn clear(&mut self) {
        self.conversation.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistoryStore;
    use crate::message::Role;
    use async_trait::async_trait;
    use satgraffin_api::{QueryResponse, Result};

    enum Script {
        Reply(QueryResponse),
        Fail(u16),
    }

    struct FakeBackend {
        script: Script,
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn query(&self, _query: &str, _user_id: &str) -> Result<QueryResponse> {
            match &self.script {
                Script::Reply(reply) => Ok(reply.clone()),
                Script::Fail(code) => Err(satgraffin_api::Error::Status(*code)),
            }
        }
    }

    fn session(script: Script) -> ChatSession<FakeBackend> {
        let conversation = Conversation::new(Box::new(MemoryHistoryStore::new()));
        ChatSession::new(conversation, FakeBackend { script }, "test-user")
    }

    #[tokio::test]
    async fn test_successful_cycle_appends_reply_with_sources() {
        let mut s = session(Script::Reply(QueryResponse {
            response: "Mission A, Mission B".into(),
            source_links: vec!["https://mosdac.gov.in/a".into()],
        }));

        assert!(s.send("List MOSDAC missions").await);

        let convo = s.conversation();
        assert_eq!(convo.status(), Status::Success);
        assert!(convo.error_message().is_none());

        // welcome + user + assistant
        let messages = convo.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "List MOSDAC missions");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "Mission A, Mission B");
        assert_eq!(messages[2].sources, vec!["https://mosdac.gov.in/a"]);
        assert!(!messages[2].is_error);
    }

    #[tokio::test]
    async fn test_reply_without_links_has_empty_sources() {
        let mut s = session(Script::Reply(QueryResponse {
            response: "Answer".into(),
            source_links: vec![],
        }));

        s.send("q").await;
        let last = s.conversation().messages().last().unwrap();
        assert!(last.sources.is_empty());
    }

    #[tokio::test]
    async fn test_failed_cycle_appends_exactly_one_fallback() {
        let mut s = session(Script::Fail(500));

        assert!(s.send("anything").await);

        let convo = s.conversation();
        assert_eq!(convo.status(), Status::Error);
        assert_eq!(
            convo.error_message(),
            Some("Request failed with status 500")
        );

        let fallbacks: Vec<_> = convo.messages().iter().filter(|m| m.is_error).collect();
        assert_eq!(fallbacks.len(), 1);
        assert_eq!(fallbacks[0].role, Role::Assistant);
        assert!(fallbacks[0].sources.is_empty());
    }

    #[tokio::test]
    async fn test_begin_enters_connecting_with_user_message() {
        let mut s = session(Script::Fail(500));

        let query = s.begin("  trimmed query  ").unwrap();
        assert_eq!(query, "trimmed query");
        assert_eq!(s.conversation().status(), Status::Connecting);
        assert_eq!(s.conversation().messages().last().unwrap().role, Role::User);

        // At most one in flight: a second begin is refused.
        assert!(s.begin("another").is_none());

        s.complete(&query).await;
        assert_eq!(s.conversation().status(), Status::Error);
    }

    #[tokio::test]
    async fn test_blank_submission_is_rejected() {
        let mut s = session(Script::Fail(500));
        let before = s.conversation().messages().len();

        assert!(!s.send("   ").await);

        assert_eq!(s.conversation().messages().len(), before);
        assert_eq!(s.conversation().status(), Status::Idle);
    }

    #[tokio::test]
    async fn test_error_then_resend_recovers() {
        let mut s = session(Script::Fail(503));
        s.send("first").await;
        assert_eq!(s.conversation().status(), Status::Error);

        s.backend.script = Script::Reply(QueryResponse {
            response: "recovered".into(),
            source_links: vec![],
        });
        s.send("second").await;
        assert_eq!(s.conversation().status(), Status::Success);
        assert!(s.conversation().error_message().is_none());
    }

    #[tokio::test]
    async fn test_clear_after_conversation() {
        let mut s = session(Script::Reply(QueryResponse {
            response: "ok".into(),
            source_links: vec![],
        }));
        s.send("one").await;
        s.send("two").await;
        assert_eq!(s.conversation().messages().len(), 5);

        s.clear();
        assert!(s.conversation().messages().is_empty());
        assert_eq!(s.conversation().status(), Status::Idle);
    }
}
