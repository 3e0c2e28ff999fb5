//! Auto-scroll controller.
//!
//! The viewport either follows the end of the growing document (STREAMING) or
//! stays put and only moves to the selected search match (IDLE). The mode is
//! derived from two facts and never stored on its own:
//!
//! - STREAMING: the producer is appending and the search panel is closed
//! - IDLE: generation finished, failed, or the search panel is open
//!
//! Opening the search panel therefore supersedes end-tracking immediately.

use crate::search::match_element_id;

/// Viewport tracking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Streaming,
    Idle,
}

/// Scroll request produced by one update cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollCommand {
    /// Leave the viewport where it is.
    None,
    /// Scroll to the end of the document.
    ToEnd,
    /// Bring the element with this id into view, centered.
    ToMatch { element_id: String },
}

impl ScrollCommand {
    /// Centered scroll to the marker of match `index`.
    pub fn to_match(index: usize) -> Self {
        ScrollCommand::ToMatch {
            element_id: match_element_id(index),
        }
    }
}

/// Result of applying a [`ScrollCommand`] to a [`Viewport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Nothing was requested.
    Unchanged,
    /// The viewport moved.
    Scrolled,
    /// The target element was not rendered yet; the request was dropped.
    TargetMissing { element_id: String },
}

/// Host display surface the controller drives.
pub trait Viewport {
    /// Whether an element with `element_id` exists in the current render.
    fn contains_element(&self, element_id: &str) -> bool;

    fn scroll_to_end(&mut self);

    fn scroll_into_view_centered(&mut self, element_id: &str);
}

/// Derive the tracking mode from producer and search-panel state.
pub fn scroll_mode(producer_in_progress: bool, search_open: bool) -> ScrollMode {
    if producer_in_progress && !search_open {
        ScrollMode::Streaming
    } else {
        ScrollMode::Idle
    }
}

/// Apply `command` to `viewport`.
///
/// A missing match element is expected while a render is still pending and is
/// ignored after a debug log.
pub fn apply_scroll(command: &ScrollCommand, viewport: &mut dyn Viewport) -> ScrollOutcome {
    match command {
        ScrollCommand::None => ScrollOutcome::Unchanged,
        ScrollCommand::ToEnd => {
            viewport.scroll_to_end();
            ScrollOutcome::Scrolled
        }
        ScrollCommand::ToMatch { element_id } => {
            if viewport.contains_element(element_id) {
                viewport.scroll_into_view_centered(element_id);
                ScrollOutcome::Scrolled
            } else {
                tracing::debug!(%element_id, "scroll target not rendered, skipping");
                ScrollOutcome::TargetMissing {
                    element_id: element_id.clone(),
                }
            }
        }
    }
}
