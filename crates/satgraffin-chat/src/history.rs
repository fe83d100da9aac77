//! Durable persistence of the transcript
//!
//! The store holds a serialized mirror of the in-memory transcript with no
//! independent authority: every fault degrades to a cache-miss on read and
//! is swallowed on write, so the conversation always stays usable.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::message::ChatMessage;

/// Schema version embedded in the store location. Bump on incompatible
/// message-format changes so stale files read as a cache-miss.
pub const HISTORY_VERSION: u32 = 1;

/// Faults raised by the file-backed store internals before they are
/// downgraded to cache-miss semantics
#[derive(Error, Debug)]
enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Contract for transcript persistence
pub trait HistoryStore: Send {
    /// Read a previously persisted transcript.
    ///
    /// Returns `None` on a cache-miss: no entry, an empty transcript, or any
    /// read/parse fault (logged, never surfaced).
    fn load(&self) -> Option<Vec<ChatMessage>>;

    /// Write the full transcript. Write faults are logged and swallowed;
    /// the conversation continues in-memory-only for the session.
    fn save(&mut self, messages: &[ChatMessage]);

    /// Remove the persisted entry entirely
    fn clear(&mut self);
}

/// File-backed store persisting the transcript as one JSON document
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store location under the platform data dir, with the schema
    /// version embedded in the file name
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("satgraffin")
            .join(format!("history.v{}.json", HISTORY_VERSION))
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_transcript(&self) -> Result<Vec<ChatMessage>, HistoryError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_transcript(&self, messages: &[ChatMessage]) -> Result<(), HistoryError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let raw = serde_json::to_string(messages)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Option<Vec<ChatMessage>> {
        if !self.path.exists() {
            return None;
        }

        match self.read_transcript() {
            Ok(messages) if messages.is_empty() => None,
            Ok(messages) => Some(messages),
            Err(e) => {
                tracing::warn!("Failed to read cached history, starting fresh: {}", e);
                None
            }
        }
    }

    fn save(&mut self, messages: &[ChatMessage]) {
        if let Err(e) = self.write_transcript(messages) {
            tracing::warn!("Unable to persist chat history: {}", e);
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove persisted history: {}", e),
        }
    }
}

/// In-memory store for tests and `--ephemeral` runs
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    transcript: Option<Vec<ChatMessage>>,
}

impl MemoryHistoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a transcript
    pub fn with_transcript(messages: Vec<ChatMessage>) -> Self {
        Self {
            transcript: Some(messages),
        }
    }

    /// Inspect the persisted mirror without cache-miss filtering
    pub fn snapshot(&self) -> Option<&[ChatMessage]> {
        self.transcript.as_deref()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Option<Vec<ChatMessage>> {
        match &self.transcript {
            Some(messages) if !messages.is_empty() => Some(messages.clone()),
            _ => None,
        }
    }

    fn save(&mut self, messages: &[ChatMessage]) {
        self.transcript = Some(messages.to_vec());
    }

    fn clear(&mut self) {
        self.transcript = None;
    }
}
