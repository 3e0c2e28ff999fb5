//! Tests for the Export Template Builder.

use super::*;
use chrono::TimeZone;

const CONTRACT: &str = "# Lease Agreement\n\nContract Term: 12 months\n\nThe term is 12 months.";

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, hour, 15, 0).unwrap()
}

fn build(text: &str, locale: &str, now: DateTime<Utc>) -> Result<ExportDocument, ExportError> {
    build_export_document(
        text,
        &ViewerLocale::new(locale).unwrap(),
        &TemplateSettings::default(),
        &RenderOptions::default(),
        now,
    )
}

#[test]
fn header_carries_brand_date_and_case_number() {
    let doc = build(CONTRACT, "en-US", at(9)).unwrap();

    assert_eq!(doc.brand, "Legal Assistant");
    assert_eq!(doc.generated_on, "October 14, 2026");
    assert_eq!(doc.case_number, "Case No. ____________");
    assert_eq!(doc.title.as_deref(), Some("Lease Agreement"));
}

#[test]
fn body_is_the_plain_render_of_the_text() {
    let doc = build(CONTRACT, "en-US", at(9)).unwrap();

    assert_eq!(
        doc.body_html,
        render_markdown(CONTRACT, &RenderOptions::default()).unwrap()
    );
    assert_eq!(doc.source_text, CONTRACT);
}

#[test]
fn build_is_idempotent_apart_from_timestamp() {
    let first = build(CONTRACT, "ar-EG", at(9)).unwrap();
    let mut second = build(CONTRACT, "ar-EG", at(17)).unwrap();

    assert_ne!(first.generated_at, second.generated_at);
    second.generated_at = first.generated_at;
    assert_eq!(first, second);
    assert_eq!(first.to_html(), second.to_html());
}

#[test]
fn rtl_locale_sets_direction_and_lang() {
    let html = build(CONTRACT, "ar-EG", at(9)).unwrap().to_html();

    assert!(html.contains("<html lang=\"ar-EG\" dir=\"rtl\">"));
}

#[test]
fn ltr_locale_sets_direction() {
    let html = build(CONTRACT, "en-US", at(9)).unwrap().to_html();

    assert!(html.contains("dir=\"ltr\""));
}

#[test]
fn standalone_html_is_self_contained_and_highlight_free() {
    let html = build(CONTRACT, "en-US", at(9)).unwrap().to_html();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<style>"));
    assert!(html.contains("<meta name=\"generated-at\" content=\"2026-10-14T09:15:00Z\">"));
    assert!(html.contains("<h1>Lease Agreement</h1>"));
    assert!(!html.contains("<mark"));
    assert!(!html.contains("window.print"));
}

#[test]
fn print_html_adds_print_hook() {
    let doc = build(CONTRACT, "en-US", at(9)).unwrap();

    assert!(doc.to_print_html().contains("window.print()"));
}

#[test]
fn header_fields_are_escaped() {
    let settings = TemplateSettings {
        brand: "Smith & <Sons>".to_string(),
        ..TemplateSettings::default()
    };
    let doc = build_export_document(
        "body",
        &ViewerLocale::default(),
        &settings,
        &RenderOptions::default(),
        at(9),
    )
    .unwrap();

    assert!(doc.to_html().contains("Smith &amp; &lt;Sons&gt;"));
}

#[test]
fn renderer_failure_is_a_typed_conversion_error() {
    let deep = format!("{}clause", "> ".repeat(20));
    let result = build_export_document(
        &deep,
        &ViewerLocale::default(),
        &TemplateSettings::default(),
        &RenderOptions {
            max_nesting_depth: 5,
        },
        at(9),
    );

    assert!(matches!(result, Err(ExportError::Conversion(_))));
}

#[test]
fn title_falls_back_to_brand() {
    let doc = build("No heading here.", "en-US", at(9)).unwrap();

    assert_eq!(doc.title, None);
    assert_eq!(doc.display_title(), "Legal Assistant");
}

#[test]
fn title_skips_lower_level_headings() {
    assert_eq!(
        first_title("## Parties\n\n# Agreement `v2`\n").as_deref(),
        Some("Agreement v2")
    );
}
