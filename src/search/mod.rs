//! In-document search.
//!
//! [`index_matches`] is the Match Indexer: a pure function from
//! (text, query) to a [`MatchSet`]. The query is user-supplied free text and is
//! always matched literally; matching is case-insensitive and scans left to
//! right without overlaps, so `"aa"` occurs once in `"aaa"`.
//!
//! [`highlight`] splices match markers into the raw text ahead of rendering.

pub mod highlight;

pub use highlight::{inject_highlights, match_element_id, HighlightMode};

use regex::RegexBuilder;

// ===== MatchSpan =====

/// Byte span of one search hit inside the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    /// Byte offset of the first matched byte.
    pub offset: usize,
    /// Length of the hit in bytes of the original text.
    pub len: usize,
}

impl MatchSpan {
    /// Create a span.
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

// ===== MatchSet =====

/// Ordered, non-overlapping search hits.
///
/// Only [`index_matches`] builds non-empty sets, which keeps the ordering
/// invariant out of callers' hands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet(Vec<MatchSpan>);

impl MatchSet {
    /// Set with no hits.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no hits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hit at `index`, in document order.
    pub fn get(&self, index: usize) -> Option<MatchSpan> {
        self.0.get(index).copied()
    }

    /// All hits as a slice.
    pub fn spans(&self) -> &[MatchSpan] {
        &self.0
    }

    /// Iterate hits in document order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchSpan> {
        self.0.iter()
    }
}

// ===== Match Indexer =====

/// Find every literal, case-insensitive occurrence of `query` in `text`.
///
/// Regex metacharacters in `query` are escaped before the matcher is built.
/// Offsets refer to `text` itself, so case folding that changes byte length
/// (for example `ſ` vs `s`) still yields valid spans.
///
/// An empty query yields an empty set.
pub fn index_matches(text: &str, query: &str) -> MatchSet {
    if query.is_empty() || text.is_empty() {
        return MatchSet::empty();
    }

    let matcher = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => matcher,
        Err(e) => {
            // Only reachable through the compiled size limit on huge queries.
            tracing::warn!(error = %e, query_len = query.len(), "search query rejected");
            return MatchSet::empty();
        }
    };

    MatchSet(
        matcher
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| MatchSpan::new(m.start(), m.len()))
            .collect(),
    )
}

// ===== Tests =====

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
