//! Viewer state machine.
//!
//! Navigation and scroll decisions are pure functions; [`ViewerSession`] owns
//! the document and drives them through one update cycle per change.

pub mod navigation;
pub mod scroll;
pub mod viewer;

// Re-export for convenience
pub use navigation::{as_signed, next_index, prev_index, reconcile_index};
pub use scroll::{apply_scroll, scroll_mode, ScrollCommand, ScrollMode, ScrollOutcome, Viewport};
pub use viewer::{DocumentView, ExportFailure, ViewerSession, WordExportJob, WordExportTicket};
