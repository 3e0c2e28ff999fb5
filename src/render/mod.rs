//! Markdown to display markup.
//!
//! [`render_markdown`] is the single conversion from document text to HTML. It
//! is called with the highlighted text for display and with the original text
//! for export; there is no second implementation.
//!
//! The renderer rejects documents whose nesting exceeds
//! [`RenderOptions::max_nesting_depth`]. Display callers go through
//! [`render_display`], which degrades to the escaped raw text instead of
//! surfacing the error; export callers propagate it.

use pulldown_cmark::{html, Event, Options, Parser};

use crate::model::error::RenderError;

/// Default structural nesting limit.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Renderer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Deepest permitted stack of open blocks and inline containers.
    pub max_nesting_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Markdown extensions enabled for every parse.
///
/// Shared with the highlight injector so both agree on document structure.
pub fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Cached display output.
///
/// A pure function of the text, match set and current match it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkup {
    html: String,
    degraded: bool,
}

impl RenderedMarkup {
    /// Markup ready for the host page.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// `true` when rendering failed and the raw text is shown instead.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Convert Markdown text into HTML.
///
/// # Errors
///
/// Returns `RenderError::NestingTooDeep` when open containers exceed
/// `options.max_nesting_depth`.
pub fn render_markdown(text: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let mut events = Vec::new();
    let mut depth = 0usize;

    for event in Parser::new_ext(text, markdown_options()) {
        match &event {
            Event::Start(_) => {
                depth += 1;
                if depth > options.max_nesting_depth {
                    return Err(RenderError::NestingTooDeep {
                        depth,
                        limit: options.max_nesting_depth,
                    });
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        events.push(event);
    }

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    Ok(out)
}

/// Render for display, never failing.
///
/// `annotated` is the text after highlight injection; `original` is the
/// unannotated text shown if rendering fails.
pub fn render_display(annotated: &str, original: &str, options: &RenderOptions) -> RenderedMarkup {
    match render_markdown(annotated, options) {
        Ok(html) => RenderedMarkup {
            html,
            degraded: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "render failed, showing raw text");
            RenderedMarkup {
                html: raw_fallback(original),
                degraded: true,
            }
        }
    }
}

/// Raw text wrapped for display when structural rendering is unavailable.
pub fn raw_fallback(text: &str) -> String {
    format!("<pre class=\"raw-document\">{}</pre>\n", escape_html(text))
}

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
