//! Error types for draftview.
//!
//! This module defines the error taxonomy using `thiserror`. Errors fall into
//! two recovery classes:
//!
//! - **Terminal for the current generation**: [`ProducerError`]. The producer
//!   failed; the viewer shows the message verbatim in place of the body until
//!   the collaborator resets the session.
//! - **Local and recoverable**: [`RenderError`] (display degrades to raw text)
//!   and [`ExportError`] (one converter failed; it is reported to the user via a
//!   dismissible message and retrying is always safe).
//!
//! A missing scroll target is not an error at all; see
//! [`crate::state::scroll::ScrollOutcome::TargetMissing`].
//!
//! [`AppError`] is only used by the CLI shell to unify setup failures.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Top-level error for the CLI binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Document input could not be read.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// A requested export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// The producer delivered text the viewer refused.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Writing rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when reading document text from a file or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified document file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// No file argument was given and stdin is an interactive terminal.
    #[error("No input provided. Pass a document file or pipe text into stdin.")]
    NoInput,

    /// Generic I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the text producer.
///
/// The message is shown verbatim in place of the document body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProducerError {
    message: String,
}

impl ProducerError {
    /// Wrap the producer's message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message exactly as the producer sent it.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Rejected mutation of the document text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The producer already signalled completion; the text is frozen.
    #[error("Document is complete; no further text can be appended")]
    Frozen,

    /// The producer already failed for this generation attempt.
    #[error("Generation failed; reset the viewer before appending")]
    ProducerFailed,

    /// A full-text update did not extend the current text.
    #[error("Producer text is not an extension of the current document (had {current_len} bytes)")]
    NonMonotonic {
        /// Length of the text held before the rejected update.
        current_len: usize,
    },
}

/// The structural renderer rejected the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Block or inline nesting exceeded the configured limit.
    #[error("Document nesting depth {depth} exceeds limit of {limit}")]
    NestingTooDeep {
        /// Depth at which rendering was abandoned.
        depth: usize,
        /// Configured maximum depth.
        limit: usize,
    },
}

/// One export converter failed.
///
/// Every variant is recoverable: the document view and the other converters
/// keep working, and the same action may be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Export was requested before the producer completed the document.
    #[error("The document is still being generated")]
    NotReady,

    /// The completed document has no text.
    #[error("The document is empty")]
    EmptyDocument,

    /// The export template could not render the document body.
    #[error("Could not prepare the document for export: {0}")]
    Conversion(#[from] RenderError),

    /// The word-processor encoder is not present in this build.
    #[error("Word document export is not available")]
    EncoderUnavailable,

    /// The word-processor encoder ran and failed.
    #[error("Word document conversion failed: {reason}")]
    Encoder {
        /// Encoder diagnostic.
        reason: String,
    },

    /// A word-processor export for this document is already running.
    #[error("A word document export is already in progress")]
    InFlight,

    /// The system clipboard rejected the write.
    #[error("Could not copy to the clipboard: {reason}")]
    Clipboard {
        /// Clipboard diagnostic.
        reason: String,
    },

    /// Writing an export file failed.
    #[error("Could not save {path}: {reason}")]
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// I/O diagnostic.
        reason: String,
    },

    /// An external handler (composer, browser) could not be launched.
    #[error("Could not open {target}: {reason}")]
    Launch {
        /// URI or file that was being opened.
        target: String,
        /// Launcher diagnostic.
        reason: String,
    },
}

impl ExportError {
    /// Short message suitable for a dismissible notification.
    ///
    /// Internal diagnostics stay in the `Display` output and the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::NotReady => "Please wait until the document has finished generating.",
            ExportError::EmptyDocument => "There is nothing to export yet.",
            ExportError::Conversion(_) => "The document could not be converted for export.",
            ExportError::EncoderUnavailable => {
                "Word export is unavailable right now. Try another format."
            }
            ExportError::Encoder { .. } => "The Word document could not be created. Please try again.",
            ExportError::InFlight => "A Word export is already in progress.",
            ExportError::Clipboard { .. } => "Copying to the clipboard failed.",
            ExportError::Write { .. } => "The file could not be saved.",
            ExportError::Launch { .. } => "The sharing application could not be opened.",
        }
    }
}
