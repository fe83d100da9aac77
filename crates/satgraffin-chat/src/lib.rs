//! satgraffin-chat: Conversation core for the SatGraffin client
//!
//! This crate owns the transcript: the message model, durable history
//! persistence, the conversation state machine, the request-cycle driver,
//! and the pure view projection consumed by front ends.

pub mod conversation;
pub mod history;
pub mod message;
pub mod session;
pub mod view;

pub use conversation::{Conversation, Status};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
pub use message::{ChatMessage, Role};
pub use session::ChatSession;
pub use view::{MessageView, StatusLine, TranscriptView, ViewItem};
