//! draftview
//!
//! Streaming document viewer, in-document search and multi-format export
//! engine for generated legal documents.
//!
//! The core (`search`, `render`, `state`, `export::template`) is pure; side
//! effects go through the traits in [`export::sinks`] and the viewport trait
//! in [`state::scroll`].

pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod render;
pub mod search;
pub mod source;
pub mod state;
