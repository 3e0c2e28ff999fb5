//! Canonical document text and producer status.

use crate::model::error::{DocumentError, ProducerError};

/// Canonical raw text of the generated document.
///
/// Append-only while the producer is running, frozen once it completes.
/// Only [`crate::state::ViewerSession`] holds one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText {
    text: String,
    frozen: bool,
}

impl DocumentText {
    /// Empty, writable text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when nothing has arrived yet.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether further chunks are rejected.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Append a chunk delivered by the producer.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Frozen` once [`freeze`](Self::freeze) was called.
    pub fn push_str(&mut self, chunk: &str) -> Result<(), DocumentError> {
        if self.frozen {
            return Err(DocumentError::Frozen);
        }
        self.text.push_str(chunk);
        Ok(())
    }

    /// Replace the text with a producer snapshot that extends it.
    ///
    /// Producers that redeliver the whole growing string use this instead of
    /// [`push_str`](Self::push_str). Returns the number of bytes appended.
    ///
    /// # Errors
    ///
    /// - `DocumentError::Frozen` if the text is frozen
    /// - `DocumentError::NonMonotonic` if `full` does not start with the current text
    pub fn extend_to(&mut self, full: &str) -> Result<usize, DocumentError> {
        if self.frozen {
            return Err(DocumentError::Frozen);
        }
        match full.strip_prefix(self.text.as_str()) {
            Some(suffix) => {
                let appended = suffix.len();
                self.text.push_str(suffix);
                Ok(appended)
            }
            None => Err(DocumentError::NonMonotonic {
                current_len: self.text.len(),
            }),
        }
    }

    /// Reject further chunks.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Drop all text and unfreeze, ready for a new request.
    pub fn clear(&mut self) {
        self.text.clear();
        self.frozen = false;
    }
}

/// Lifecycle of the current generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerStatus {
    /// Text may still arrive.
    InProgress,
    /// The producer signalled completion; text is frozen.
    Complete,
    /// The producer failed; its message replaces the body.
    Failed(ProducerError),
}

impl ProducerStatus {
    /// True while the producer may still append.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, ProducerStatus::InProgress)
    }
}
