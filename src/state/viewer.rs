//! Viewer session.
//!
//! `ViewerSession` exclusively owns the document of one generation attempt
//! together with its search and export state. Every method that changes the
//! text, the query or the current match runs the whole update cycle
//! (index, inject, render) before returning, so callers never observe a match
//! set and a rendered markup that disagree.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::config::ViewerConfig;
use crate::export::converters::{
    copy_to_clipboard, save_docx_bytes, save_html, save_markdown, share,
};
use crate::export::docx::{encode_checked, DocxEncoder};
use crate::export::print::print_document;
use crate::export::sinks::Downloads;
use crate::export::template::{build_export_document, ExportDocument};
use crate::export::{ExportContext, ExportOutcome, ExportTarget};
use crate::model::error::{DocumentError, ExportError, ProducerError};
use crate::model::{DocumentText, ProducerStatus};
use crate::render::{render_display, RenderedMarkup};
use crate::search::{index_matches, inject_highlights, MatchSet};
use crate::state::navigation::{as_signed, next_index, prev_index, reconcile_index};
use crate::state::scroll::{scroll_mode, ScrollCommand, ScrollMode};

// ===== Supporting types =====

/// What the document area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentView<'a> {
    /// Rendered body, possibly still growing.
    Document {
        markup: &'a RenderedMarkup,
        in_progress: bool,
    },
    /// The producer failed; its message replaces the body.
    Failed(&'a ProducerError),
}

/// Export-level error awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    /// Action that failed. A later success of the same action clears it.
    pub target: ExportTarget,
    /// What went wrong.
    pub error: ExportError,
}

impl ExportFailure {
    /// Message suitable for the export error surface.
    pub fn user_message(&self) -> &'static str {
        self.error.user_message()
    }
}

/// Proof that a word export was started for a particular generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordExportTicket {
    generation: u64,
}

/// Snapshot handed out by [`ViewerSession::begin_word_export`].
///
/// The encoder may run anywhere; only the bytes come back to the session.
#[derive(Debug, Clone)]
pub struct WordExportJob {
    /// Snapshot to encode.
    pub document: ExportDocument,
    /// Ticket to hand back to [`ViewerSession::finish_word_export`].
    pub ticket: WordExportTicket,
}

impl WordExportJob {
    /// Run `encoder` on the snapshot, checking availability first.
    pub fn encode(&self, encoder: &dyn DocxEncoder) -> Result<Vec<u8>, ExportError> {
        encode_checked(encoder, &self.document)
    }
}

// ===== ViewerSession =====

/// Document, search and export state of one viewer.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    config: ViewerConfig,

    document: DocumentText,
    status: ProducerStatus,

    /// Active query; empty means no search.
    query: String,
    search_open: bool,

    /// Derived from `document` and `query`.
    matches: MatchSet,
    /// `None` exactly when `matches` is empty.
    current: Option<usize>,
    /// Derived from `document`, `matches` and `current`.
    rendered: RenderedMarkup,

    export_error: Option<ExportFailure>,
    word_export_in_flight: bool,
    /// Bumped by `reset`; invalidates outstanding word export tickets.
    generation: u64,
}

impl ViewerSession {
    /// Empty, streaming session.
    pub fn new(config: ViewerConfig) -> Self {
        let rendered = render_display("", "", &config.render);
        Self {
            config,
            document: DocumentText::new(),
            status: ProducerStatus::InProgress,
            query: String::new(),
            search_open: false,
            matches: MatchSet::empty(),
            current: None,
            rendered,
            export_error: None,
            word_export_in_flight: false,
            generation: 0,
        }
    }

    // ===== Producer interface =====

    /// Append a chunk from the producer.
    ///
    /// # Errors
    ///
    /// - `DocumentError::ProducerFailed` after [`fail`](Self::fail), until reset
    /// - `DocumentError::Frozen` after completion
    pub fn append(&mut self, chunk: &str) -> Result<ScrollCommand, DocumentError> {
        self.ensure_not_failed()?;
        self.document.push_str(chunk)?;
        let previous = self.current;
        self.refresh(false);
        Ok(self.scroll_after(previous))
    }

    /// Accept the producer's accumulated text, which must extend the current one.
    pub fn extend_to(&mut self, full: &str) -> Result<ScrollCommand, DocumentError> {
        self.ensure_not_failed()?;
        if self.document.extend_to(full)? == 0 {
            return Ok(ScrollCommand::None);
        }
        let previous = self.current;
        self.refresh(false);
        Ok(self.scroll_after(previous))
    }

    fn ensure_not_failed(&self) -> Result<(), DocumentError> {
        match self.status {
            ProducerStatus::Failed(_) => Err(DocumentError::ProducerFailed),
            _ => Ok(()),
        }
    }

    /// The producer finished; freeze the text.
    pub fn complete(&mut self) {
        if let ProducerStatus::Failed(_) = self.status {
            tracing::debug!("ignoring completion of a failed generation");
            return;
        }
        self.document.freeze();
        self.status = ProducerStatus::Complete;
        tracing::info!(bytes = self.document.len(), matches = self.matches.len(), "document complete");
    }

    /// The producer failed; `error` is shown instead of the body until reset.
    pub fn fail(&mut self, error: ProducerError) {
        tracing::warn!(error = %error, "producer failed");
        self.document.freeze();
        self.status = ProducerStatus::Failed(error);
    }

    /// Start over for a new request.
    ///
    /// The query and search panel state survive; the document, the export
    /// error and any outstanding word export do not.
    pub fn reset(&mut self) {
        self.document.clear();
        self.status = ProducerStatus::InProgress;
        self.export_error = None;
        self.word_export_in_flight = false;
        self.generation += 1;
        self.current = None;
        self.refresh(false);
        tracing::info!(generation = self.generation, "viewer reset");
    }

    // ===== Search =====

    /// Show the search panel. Stops end-tracking while the panel is open.
    pub fn open_search(&mut self) {
        self.search_open = true;
    }

    /// Hide the search panel and drop the query.
    pub fn close_search(&mut self) -> ScrollCommand {
        self.search_open = false;
        self.query.clear();
        let previous = self.current;
        self.refresh(false);
        self.scroll_after(previous)
    }

    /// Replace the query. Typing a query opens the search panel.
    pub fn set_query(&mut self, query: impl Into<String>) -> ScrollCommand {
        let was_active = !self.query.is_empty();
        self.query = query.into();
        self.search_open = true;

        let previous = self.current;
        self.refresh(!was_active && !self.query.is_empty());
        self.scroll_after(previous)
    }

    /// Select the next match, wrapping to the first.
    pub fn next_match(&mut self) -> ScrollCommand {
        self.navigate(next_index(self.current, self.matches.len()))
    }

    /// Select the previous match, wrapping to the last.
    pub fn prev_match(&mut self) -> ScrollCommand {
        self.navigate(prev_index(self.current, self.matches.len()))
    }

    fn navigate(&mut self, target: Option<usize>) -> ScrollCommand {
        match target {
            Some(index) => {
                self.current = Some(index);
                self.rerender();
                ScrollCommand::to_match(index)
            }
            None => ScrollCommand::None,
        }
    }

    // ===== Update cycle =====

    fn refresh(&mut self, query_became_active: bool) {
        self.matches = index_matches(self.document.as_str(), &self.query);
        self.current = reconcile_index(self.current, self.matches.len(), query_became_active);
        self.rerender();
        tracing::debug!(
            bytes = self.document.len(),
            matches = self.matches.len(),
            current = as_signed(self.current),
            "viewer refreshed"
        );
    }

    fn rerender(&mut self) {
        let text = self.document.as_str();
        let annotated = inject_highlights(text, &self.matches, self.current, self.config.highlight_mode);
        self.rendered = render_display(&annotated, text, &self.config.render);
    }

    fn scroll_after(&self, previous: Option<usize>) -> ScrollCommand {
        match self.current {
            Some(index) if previous != Some(index) => ScrollCommand::to_match(index),
            _ if self.scroll_mode() == ScrollMode::Streaming => ScrollCommand::ToEnd,
            _ => ScrollCommand::None,
        }
    }

    // ===== Accessors =====

    /// Settings the session was created with.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Text received so far.
    pub fn text(&self) -> &str {
        self.document.as_str()
    }

    /// Producer state of the current generation.
    pub fn status(&self) -> &ProducerStatus {
        &self.status
    }

    /// Active search query; empty when no search is running.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the search panel is open.
    pub fn is_search_open(&self) -> bool {
        self.search_open
    }

    /// Hits of the query in the current text.
    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Index of the current hit, `None` without matches.
    pub fn current_match(&self) -> Option<usize> {
        self.current
    }

    /// Current match as `-1..N`.
    pub fn current_match_signed(&self) -> isize {
        as_signed(self.current)
    }

    /// Display markup with highlights applied.
    pub fn rendered(&self) -> &RenderedMarkup {
        &self.rendered
    }

    /// What the host should show in place of the document body.
    pub fn view(&self) -> DocumentView<'_> {
        match &self.status {
            ProducerStatus::Failed(error) => DocumentView::Failed(error),
            status => DocumentView::Document {
                markup: &self.rendered,
                in_progress: status.is_in_progress(),
            },
        }
    }

    /// Streaming while the producer runs with search closed, otherwise idle.
    pub fn scroll_mode(&self) -> ScrollMode {
        scroll_mode(self.status.is_in_progress(), self.search_open)
    }

    // ===== Export =====

    /// Last export failure not yet resolved or dismissed.
    pub fn export_error(&self) -> Option<&ExportFailure> {
        self.export_error.as_ref()
    }

    /// Clear the export error surface.
    pub fn dismiss_export_error(&mut self) {
        self.export_error = None;
    }

    /// Whether a Word export job is outstanding.
    pub fn is_word_export_in_flight(&self) -> bool {
        self.word_export_in_flight
    }

    /// Raw text of a completed, non-empty document.
    fn finished_text(&self) -> Result<&str, ExportError> {
        if self.status != ProducerStatus::Complete {
            return Err(ExportError::NotReady);
        }
        if self.document.is_empty() {
            return Err(ExportError::EmptyDocument);
        }
        Ok(self.document.as_str())
    }

    /// Templated, highlight-free representation of the completed document.
    ///
    /// # Errors
    ///
    /// - `ExportError::NotReady` while generating or after failure
    /// - `ExportError::EmptyDocument` for an empty document
    /// - `ExportError::Conversion` if the renderer rejects the text
    pub fn export_document(&self, now: DateTime<Utc>) -> Result<ExportDocument, ExportError> {
        let text = self.finished_text()?;
        build_export_document(
            text,
            &self.config.locale,
            &self.config.template,
            &self.config.render,
            now,
        )
    }

    /// Run one export to completion.
    ///
    /// Failures are returned and also kept as the session's export error
    /// until dismissed or until the same target succeeds.
    pub fn export(
        &mut self,
        target: ExportTarget,
        ctx: &mut ExportContext<'_>,
        now: DateTime<Utc>,
    ) -> Result<ExportOutcome, ExportError> {
        let basename = self.config.export_basename.as_str();
        let result = match target {
            ExportTarget::Clipboard => self
                .finished_text()
                .and_then(|text| copy_to_clipboard(text, &mut *ctx.clipboard))
                .map(|()| ExportOutcome::Copied),
            ExportTarget::Markdown => self
                .finished_text()
                .and_then(|text| save_markdown(text, basename, &mut *ctx.downloads))
                .map(ExportOutcome::Saved),
            ExportTarget::Html => self
                .export_document(now)
                .and_then(|doc| save_html(&doc, basename, &mut *ctx.downloads))
                .map(ExportOutcome::Saved),
            ExportTarget::Print => self
                .export_document(now)
                .map(|doc| ExportOutcome::Print(print_document(&doc, &mut *ctx.print))),
            ExportTarget::Share(channel) => self
                .finished_text()
                .and_then(|text| share(text, channel, &self.config.share, &mut *ctx.launcher))
                .map(ExportOutcome::Shared),
            ExportTarget::Docx => {
                let job = self.begin_word_export(now)?;
                let encoded = job.encode(ctx.encoder);
                return self
                    .settle_word_export(encoded, &mut *ctx.downloads)
                    .map(ExportOutcome::Saved);
            }
        };
        self.record(target, result)
    }

    /// Start a word export and hand out the snapshot to encode.
    ///
    /// # Errors
    ///
    /// `ExportError::InFlight` while another word export is outstanding, and
    /// the [`export_document`](Self::export_document) errors.
    pub fn begin_word_export(&mut self, now: DateTime<Utc>) -> Result<WordExportJob, ExportError> {
        if self.word_export_in_flight {
            return self.record(ExportTarget::Docx, Err(ExportError::InFlight));
        }
        let document = self.export_document(now);
        let document = self.record(ExportTarget::Docx, document)?;

        self.word_export_in_flight = true;
        tracing::info!(generation = self.generation, "word export started");
        Ok(WordExportJob {
            document,
            ticket: WordExportTicket {
                generation: self.generation,
            },
        })
    }

    /// Deliver the encoder result for `ticket`.
    ///
    /// Returns `None` when the session was reset since the job started; the
    /// result is dropped without touching state.
    pub fn finish_word_export(
        &mut self,
        ticket: WordExportTicket,
        encoded: Result<Vec<u8>, ExportError>,
        downloads: &mut dyn Downloads,
    ) -> Option<Result<PathBuf, ExportError>> {
        if ticket.generation != self.generation || !self.word_export_in_flight {
            tracing::debug!(
                ticket = ticket.generation,
                generation = self.generation,
                "dropping stale word export result"
            );
            return None;
        }
        Some(self.settle_word_export(encoded, downloads))
    }

    fn settle_word_export(
        &mut self,
        encoded: Result<Vec<u8>, ExportError>,
        downloads: &mut dyn Downloads,
    ) -> Result<PathBuf, ExportError> {
        self.word_export_in_flight = false;
        let result = encoded
            .and_then(|bytes| save_docx_bytes(&bytes, &self.config.export_basename, downloads));
        self.record(ExportTarget::Docx, result)
    }

    fn record<T>(&mut self, target: ExportTarget, result: Result<T, ExportError>) -> Result<T, ExportError> {
        match &result {
            Ok(_) => {
                if self.export_error.as_ref().is_some_and(|f| f.target == target) {
                    self.export_error = None;
                }
            }
            Err(error) => {
                tracing::warn!(%target, error = %error, "export failed");
                self.export_error = Some(ExportFailure {
                    target,
                    error: error.clone(),
                });
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "viewer_tests.rs"]
mod tests;
