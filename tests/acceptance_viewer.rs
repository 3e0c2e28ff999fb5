//! Acceptance tests for the streaming viewer and in-document search.
//!
//! Each test drives a `ViewerSession` the way a host page would: chunks
//! arrive from the producer, the user searches and navigates, and the host
//! applies the returned scroll commands to its viewport.

use draftview::config::ViewerConfig;
use draftview::model::ProducerError;
use draftview::render::{render_markdown, RenderOptions};
use draftview::search::HighlightMode;
use draftview::state::{
    apply_scroll, DocumentView, ScrollCommand, ScrollMode, ScrollOutcome, ViewerSession, Viewport,
};

const LEASE_FIXTURE: &str = include_str!("fixtures/lease_agreement.md");
const CONTRACT: &str = "Contract Term: 12 months\n\nThe term is 12 months.";

// ===== Test viewport =====

/// Viewport that knows which marker ids the current render contains.
#[derive(Default)]
struct HtmlViewport {
    html: String,
    at_end: usize,
    centered: Vec<String>,
}

impl HtmlViewport {
    fn show(&mut self, viewer: &ViewerSession) {
        self.html = viewer.rendered().html().to_string();
    }
}

impl Viewport for HtmlViewport {
    fn contains_element(&self, element_id: &str) -> bool {
        self.html.contains(&format!("id=\"{element_id}\""))
    }

    fn scroll_to_end(&mut self) {
        self.at_end += 1;
    }

    fn scroll_into_view_centered(&mut self, element_id: &str) {
        self.centered.push(element_id.to_string());
    }
}

fn stream(viewer: &mut ViewerSession, viewport: &mut HtmlViewport, text: &str, chunk: usize) {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let mut end = (start + chunk).min(bytes.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        let scroll = viewer.append(&text[start..end]).expect("producer chunk accepted");
        viewport.show(viewer);
        apply_scroll(&scroll, viewport);
        start = end;
    }
}

// ===== Scenario: streaming display =====

#[test]
fn streaming_document_follows_the_end_until_complete() {
    // GIVEN: A producer streaming a lease in small chunks
    let mut viewer = ViewerSession::new(ViewerConfig::default());
    let mut viewport = HtmlViewport::default();

    // WHEN: All chunks arrive
    stream(&mut viewer, &mut viewport, LEASE_FIXTURE, 16);

    // THEN: Every append scrolled to the end, and the body is the full render
    assert_eq!(viewer.scroll_mode(), ScrollMode::Streaming);
    assert_eq!(viewport.at_end, LEASE_FIXTURE.len().div_ceil(16));
    assert_eq!(
        viewer.rendered().html(),
        render_markdown(LEASE_FIXTURE, &RenderOptions::default()).unwrap()
    );

    viewer.complete();
    assert_eq!(viewer.scroll_mode(), ScrollMode::Idle);
}

#[test]
fn searching_mid_stream_stops_following_the_end() {
    // GIVEN: Half the document has arrived
    let mut viewer = ViewerSession::new(ViewerConfig::default());
    let mut viewport = HtmlViewport::default();
    let (head, tail) = CONTRACT.split_at(26);
    stream(&mut viewer, &mut viewport, head, 64);
    let ends_before_search = viewport.at_end;

    // WHEN: The user opens search and types a query while text keeps arriving
    viewer.open_search();
    let scroll = viewer.set_query("12 months");
    viewport.show(&viewer);
    apply_scroll(&scroll, &mut viewport);
    stream(&mut viewer, &mut viewport, tail, 64);

    // THEN: The viewport stayed on the first match instead of chasing the end
    assert_eq!(viewport.at_end, ends_before_search);
    assert_eq!(viewport.centered, vec!["search-match-0".to_string()]);
    assert_eq!(viewer.matches().len(), 2);
    assert_eq!(viewer.current_match(), Some(0));
}

// ===== Scenario: contract search =====

#[test]
fn contract_search_reports_two_matches_and_wraps() {
    // GIVEN: The completed contract
    let mut viewer = ViewerSession::new(ViewerConfig::default());
    viewer.append(CONTRACT).unwrap();
    viewer.complete();
    let mut viewport = HtmlViewport::default();

    // WHEN: Searching for "12 months"
    let scroll = viewer.set_query("12 months");
    viewport.show(&viewer);

    // THEN: Two matches at offsets 15 and 38, first one current and scrolled to
    let spans: Vec<(usize, usize)> = viewer.matches().iter().map(|m| (m.offset, m.len)).collect();
    assert_eq!(spans, vec![(15, 9), (38, 9)]);
    assert_eq!(apply_scroll(&scroll, &mut viewport), ScrollOutcome::Scrolled);

    // AND: next, next cycles 0 → 1 → 0
    let mut visited = vec![viewer.current_match_signed()];
    for _ in 0..2 {
        let scroll = viewer.next_match();
        viewport.show(&viewer);
        assert_eq!(apply_scroll(&scroll, &mut viewport), ScrollOutcome::Scrolled);
        visited.push(viewer.current_match_signed());
    }
    assert_eq!(visited, vec![0, 1, 0]);
    assert_eq!(
        viewport.centered,
        vec!["search-match-0", "search-match-1", "search-match-0"]
    );
}

#[test]
fn regex_metacharacters_are_searched_literally() {
    let mut viewer = ViewerSession::new(ViewerConfig::default());
    viewer.append("pattern (a+)* vs aaaa").unwrap();
    viewer.complete();

    viewer.set_query("(a+)*");

    assert_eq!(viewer.matches().len(), 1);
    assert_eq!(viewer.matches().get(0).map(|m| m.offset), Some(8));
}

// ===== Scenario: structure-aware highlighting =====

#[test]
fn raw_mode_marks_matches_inside_code_blocks() {
    let mut viewer = ViewerSession::new(ViewerConfig::default());
    viewer.append(LEASE_FIXTURE).unwrap();
    viewer.complete();

    viewer.set_query("12 months");

    assert_eq!(viewer.matches().len(), 3);
    assert_eq!(viewer.rendered().html().matches("<mark ").count(), 2);
    assert!(
        viewer.rendered().html().contains("&lt;mark"),
        "Raw mode leaves the code-block marker escaped"
    );
}

#[test]
fn structure_aware_mode_skips_code_but_keeps_navigation_slots() {
    // GIVEN: Structure-aware highlighting
    let config = ViewerConfig {
        highlight_mode: HighlightMode::StructureAware,
        ..ViewerConfig::default()
    };
    let mut viewer = ViewerSession::new(config);
    viewer.append(LEASE_FIXTURE).unwrap();
    viewer.complete();
    let mut viewport = HtmlViewport::default();

    // WHEN: Searching a term that also appears inside a code block
    viewer.set_query("12 months");
    viewport.show(&viewer);

    // THEN: Only prose matches are marked, and nothing is escaped
    let html = viewer.rendered().html();
    assert_eq!(viewer.matches().len(), 3);
    assert_eq!(html.matches("<mark ").count(), 2);
    assert!(!html.contains("&lt;mark"));

    // AND: Navigating to the code match is a silent no-op for the viewport
    let scroll = viewer.prev_match();
    viewport.show(&viewer);
    assert_eq!(scroll, ScrollCommand::to_match(2));
    assert_eq!(
        apply_scroll(&scroll, &mut viewport),
        ScrollOutcome::TargetMissing {
            element_id: "search-match-2".to_string()
        }
    );
}

// ===== Scenario: producer failure =====

#[test]
fn producer_error_is_shown_verbatim_until_reset() {
    let mut viewer = ViewerSession::new(ViewerConfig::default());
    viewer.append("# Lease").unwrap();

    viewer.fail(ProducerError::new("The assistant is unavailable. Please retry."));

    match viewer.view() {
        DocumentView::Failed(error) => {
            assert_eq!(error.to_string(), "The assistant is unavailable. Please retry.")
        }
        other => panic!("Expected failure view, got {:?}", other),
    }

    viewer.reset();
    viewer.append(CONTRACT).unwrap();
    assert!(matches!(viewer.view(), DocumentView::Document { in_progress: true, .. }));
}

#[test]
fn empty_in_progress_document_has_no_matches_for_any_query() {
    let mut viewer = ViewerSession::new(ViewerConfig::default());

    for query in ["a", " ", "12 months", "(a+)*"] {
        viewer.set_query(query);
        assert!(viewer.matches().is_empty(), "query {query:?}");
        assert_eq!(viewer.current_match(), None);
        assert_eq!(viewer.rendered().html(), "");
    }
}
