//! Highlight Injector.
//!
//! Splices `<mark>` elements around each match span of the raw Markdown text
//! so that the unmodified renderer passes them through as inline HTML. The
//! renderer knows nothing about highlighting.
//!
//! # Modes
//!
//! - [`HighlightMode::Raw`] splices at raw byte offsets. A match inside a fenced
//!   code block or a link destination ends up in a context the renderer does
//!   not treat as text, so the marker shows up escaped or breaks the link.
//! - [`HighlightMode::StructureAware`] first collects the regions the renderer
//!   does not treat as prose (code, raw HTML, link and image destinations,
//!   link reference definitions, entity references) and leaves matches
//!   intersecting them unmarked. Those matches still count for navigation;
//!   their scroll target is simply absent. A marker boundary that would land
//!   right after an escaping backslash is moved over the escaped character.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, LinkType, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Deserialize;

use super::MatchSet;
use crate::render::markdown_options;

/// Prefix of the element id carried by every match marker.
pub const MATCH_ID_PREFIX: &str = "search-match-";

/// Named, decimal and hexadecimal character references.
static ENTITY_REFERENCE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").ok()
});

/// How match markers are placed relative to document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightMode {
    /// Splice at raw byte offsets.
    #[default]
    Raw,
    /// Leave matches in non-prose regions unmarked.
    StructureAware,
}

/// Stable element id for the match at `index`, used as the scroll target.
pub fn match_element_id(index: usize) -> String {
    format!("{MATCH_ID_PREFIX}{index}")
}

/// Annotate `text` with one marker per match.
///
/// With an empty `matches` the input is returned untouched (borrowed), so the
/// rendered output is byte-identical to rendering without this step. Spans
/// that do not fit `text` (a stale set) are skipped.
pub fn inject_highlights<'a>(
    text: &'a str,
    matches: &MatchSet,
    current: Option<usize>,
    mode: HighlightMode,
) -> Cow<'a, str> {
    if matches.is_empty() {
        return Cow::Borrowed(text);
    }

    let protected = match mode {
        HighlightMode::Raw => Vec::new(),
        HighlightMode::StructureAware => protected_regions(text),
    };

    let mut out = String::with_capacity(text.len() + matches.len() * 80);
    let mut cursor = 0;

    for (index, span) in matches.iter().enumerate() {
        let (start, end) = match mode {
            HighlightMode::Raw => (span.offset, span.end()),
            HighlightMode::StructureAware => step_over_escapes(text, span.offset, span.end()),
        };
        if start < cursor || protected.iter().any(|r| intersects(r, start, end)) {
            continue;
        }
        let (Some(before), Some(hit)) = (text.get(cursor..start), text.get(start..end)) else {
            continue;
        };

        out.push_str(before);
        push_open_marker(&mut out, index, current == Some(index));
        out.push_str(hit);
        out.push_str("</mark>");
        cursor = end;
    }
    out.push_str(&text[cursor..]);

    Cow::Owned(out)
}

fn push_open_marker(out: &mut String, index: usize, is_current: bool) {
    let class = if is_current {
        "search-highlight current"
    } else {
        "search-highlight"
    };
    out.push_str(&format!(
        "<mark class=\"{class}\" id=\"{MATCH_ID_PREFIX}{index}\" data-match-index=\"{index}\">"
    ));
}

fn intersects(region: &Range<usize>, start: usize, end: usize) -> bool {
    start < region.end && region.start < end
}

/// Whether the byte at `at` is escaped by an odd run of backslashes before it.
fn is_escaped(text: &str, at: usize) -> bool {
    text.as_bytes()
        .get(..at)
        .is_some_and(|head| head.iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1)
}

/// Widen `start..end` so neither marker tag directly follows an escaping
/// backslash, which would turn the tag's `<` into literal text.
fn step_over_escapes(text: &str, start: usize, end: usize) -> (usize, usize) {
    let start = if is_escaped(text, start) { start - 1 } else { start };
    let end = if is_escaped(text, end) {
        end + text.get(end..).and_then(|tail| tail.chars().next()).map_or(0, char::len_utf8)
    } else {
        end
    };
    (start, end)
}

/// Link under construction while walking parser events.
struct LinkFrame {
    range: Range<usize>,
    text_end: usize,
    whole: bool,
}

/// Byte ranges of `text` whose content the renderer does not emit as prose.
///
/// Covers code blocks, inline code spans, raw HTML, images (alt text becomes
/// an attribute), autolinks, the `](destination "title")` tail of inline
/// links, link reference definitions and character references. The visible
/// text of an inline link stays searchable.
pub fn protected_regions(text: &str) -> Vec<Range<usize>> {
    let parser = Parser::new_ext(text, markdown_options());
    // Reference definitions emit no events.
    let mut regions: Vec<Range<usize>> = parser
        .reference_definitions()
        .iter()
        .map(|(_, definition)| definition.span.clone())
        .collect();
    if let Some(entity) = ENTITY_REFERENCE.as_ref() {
        regions.extend(entity.find_iter(text).map(|m| m.range()));
    }
    let mut links: Vec<LinkFrame> = Vec::new();

    for (event, range) in parser.into_offset_iter() {
        if !matches!(event, Event::End(TagEnd::Link)) {
            if let Some(frame) = links.last_mut() {
                if range.start >= frame.range.start && range.end <= frame.range.end {
                    frame.text_end = frame.text_end.max(range.end);
                }
            }
        }

        match event {
            Event::Start(Tag::CodeBlock(_))
            | Event::Start(Tag::HtmlBlock)
            | Event::Start(Tag::Image { .. })
            | Event::Code(_)
            | Event::Html(_)
            | Event::InlineHtml(_) => regions.push(range),
            Event::Start(Tag::Link { link_type, .. }) => links.push(LinkFrame {
                text_end: range.start,
                whole: matches!(link_type, LinkType::Autolink | LinkType::Email),
                range,
            }),
            Event::End(TagEnd::Link) => {
                if let Some(frame) = links.pop() {
                    if frame.whole {
                        regions.push(frame.range);
                    } else {
                        regions.push(frame.text_end..frame.range.end);
                    }
                }
            }
            _ => {}
        }
    }

    regions
}

#[cfg(test)]
#[path = "highlight_tests.rs"]
mod tests;
