//! Export Template Builder.
//!
//! Wraps the unhighlighted document in a header block (brand mark, localized
//! generation date, case-number placeholder) and a direction-aware layout.
//! Every export target that needs more than the raw text starts from the
//! [`ExportDocument`] built here.

use chrono::{DateTime, SecondsFormat, Utc};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::model::error::ExportError;
use crate::model::{Direction, ViewerLocale};
use crate::render::{escape_html, markdown_options, render_markdown, RenderOptions};

/// Header content supplied by the caller (labels are resolved upstream).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    /// Brand mark shown at the top of the header.
    pub brand: String,
    /// Placeholder line for the case number.
    pub case_number_placeholder: String,
    /// Label shown before the generation date.
    pub date_label: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            brand: "Legal Assistant".to_string(),
            case_number_placeholder: "Case No. ____________".to_string(),
            date_label: "Date".to_string(),
        }
    }
}

/// Templated, highlight-free export representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// Value of the HTML `lang` attribute.
    pub lang: String,
    /// Layout direction of the page.
    pub direction: Direction,
    /// Brand mark.
    pub brand: String,
    /// Text of the first level-one heading, if any.
    pub title: Option<String>,
    /// Label shown before `generated_on`.
    pub date_label: String,
    /// Localized generation date shown in the header.
    pub generated_on: String,
    /// Call time of the build. The only field that differs between two builds
    /// of the same text and locale on the same day.
    pub generated_at: DateTime<Utc>,
    /// Case-number placeholder.
    pub case_number: String,
    /// Rendered body markup.
    pub body_html: String,
    /// Original document text the body was rendered from.
    pub source_text: String,
}

/// Build the export representation of `text`.
///
/// # Errors
///
/// Returns `ExportError::Conversion` if the renderer rejects the text. No
/// partially-built document is ever returned.
pub fn build_export_document(
    text: &str,
    locale: &ViewerLocale,
    settings: &TemplateSettings,
    render: &RenderOptions,
    now: DateTime<Utc>,
) -> Result<ExportDocument, ExportError> {
    let body_html = render_markdown(text, render)?;

    Ok(ExportDocument {
        lang: locale.tag().to_string(),
        direction: locale.direction(),
        brand: settings.brand.clone(),
        title: first_title(text),
        date_label: settings.date_label.clone(),
        generated_on: locale.format_date(now),
        generated_at: now,
        case_number: settings.case_number_placeholder.clone(),
        body_html,
        source_text: text.to_string(),
    })
}

/// Plain text of the first `#` heading.
fn first_title(text: &str) -> Option<String> {
    let mut in_title = false;
    let mut title = String::new();

    for event in Parser::new_ext(text, markdown_options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_title = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => break,
            Event::Text(t) | Event::Code(t) if in_title => title.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_title => title.push(' '),
            _ => {}
        }
    }

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

const STYLESHEET: &str = "\
body { font-family: 'Times New Roman', 'Noto Naskh Arabic', serif; line-height: 1.6; margin: 2.5cm; color: #111; }
.document-header { border-bottom: 2px solid #1f3a5f; padding-bottom: 12px; margin-bottom: 24px; }
.document-header .brand { font-size: 1.4em; font-weight: bold; color: #1f3a5f; }
.document-header .meta { display: flex; justify-content: space-between; font-size: 0.9em; margin-top: 6px; }
.document-body table { border-collapse: collapse; width: 100%; }
.document-body th, .document-body td { border: 1px solid #999; padding: 4px 8px; }
.document-body pre { background: #f4f4f4; padding: 8px; overflow-x: auto; }
@media print { body { margin: 0; } }
";

const PRINT_HOOK: &str =
    "<script>window.addEventListener('load', function () { window.print(); });</script>\n";

impl ExportDocument {
    /// Self-contained HTML file.
    pub fn to_html(&self) -> String {
        self.write_html(false)
    }

    /// HTML that opens the platform print dialog once loaded.
    pub fn to_print_html(&self) -> String {
        self.write_html(true)
    }

    /// Title for the `<title>` element.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.brand)
    }

    fn write_html(&self, print: bool) -> String {
        let mut out = String::with_capacity(self.body_html.len() + 2048);
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(&format!(
            "<html lang=\"{}\" dir=\"{}\">\n",
            escape_html(&self.lang),
            self.direction
        ));
        out.push_str("<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(&format!(
            "<meta name=\"generated-at\" content=\"{}\">\n",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str(&format!(
            "<title>{}</title>\n",
            escape_html(self.display_title())
        ));
        out.push_str("<style>\n");
        out.push_str(STYLESHEET);
        out.push_str("</style>\n</head>\n<body>\n");
        out.push_str("<header class=\"document-header\">\n");
        out.push_str(&format!(
            "<div class=\"brand\">{}</div>\n",
            escape_html(&self.brand)
        ));
        out.push_str(&format!(
            "<div class=\"meta\"><span class=\"date\">{}: {}</span><span class=\"case-number\">{}</span></div>\n",
            escape_html(&self.date_label),
            escape_html(&self.generated_on),
            escape_html(&self.case_number)
        ));
        out.push_str("</header>\n<main class=\"document-body\">\n");
        out.push_str(&self.body_html);
        out.push_str("</main>\n");
        if print {
            out.push_str(PRINT_HOOK);
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
