//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod document;
pub mod error;
pub mod locale;
pub mod structured;

// Re-export for convenience
pub use document::{DocumentText, ProducerStatus};
pub use error::{DocumentError, ExportError, InputError, ProducerError, RenderError};
pub use locale::{Direction, InvalidLocale, ViewerLocale};
pub use structured::{parse_records, Record, StructuredPayload};
