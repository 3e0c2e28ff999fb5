//! Word-processor encoder.
//!
//! Converting to `.docx` is the one export that can fail for reasons outside
//! the document (encoder missing from the build, packaging failure). Callers
//! check [`DocxEncoder::is_available`] first and get a typed [`ExportError`]
//! back instead of a panic.
//!
//! The default encoder is built on `docx-rs` and is compiled in with the
//! `docx` cargo feature. It walks the Markdown source of the
//! [`ExportDocument`] and maps blocks onto Word paragraphs and runs.

use crate::export::template::ExportDocument;
use crate::model::error::ExportError;

/// Converts an export document into `.docx` bytes.
pub trait DocxEncoder {
    /// Whether [`encode`](Self::encode) can run at all.
    fn is_available(&self) -> bool;

    /// Produce the packaged document.
    fn encode(&self, doc: &ExportDocument) -> Result<Vec<u8>, ExportError>;
}

/// Encoder used when the build carries no `.docx` support.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableEncoder;

impl DocxEncoder for UnavailableEncoder {
    fn is_available(&self) -> bool {
        false
    }

    fn encode(&self, _doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::EncoderUnavailable)
    }
}

/// The encoder compiled into this build.
pub fn default_encoder() -> Box<dyn DocxEncoder> {
    #[cfg(feature = "docx")]
    {
        Box::new(DocxRsEncoder)
    }
    #[cfg(not(feature = "docx"))]
    {
        Box::new(UnavailableEncoder)
    }
}

/// Check availability, then encode.
///
/// # Errors
///
/// `ExportError::EncoderUnavailable` without invoking the encoder when it is
/// not available; otherwise whatever the encoder reports.
pub fn encode_checked(encoder: &dyn DocxEncoder, doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
    if !encoder.is_available() {
        tracing::warn!("word export requested but encoder unavailable");
        return Err(ExportError::EncoderUnavailable);
    }
    encoder.encode(doc)
}

#[cfg(feature = "docx")]
pub use docx_rs_encoder::DocxRsEncoder;

#[cfg(feature = "docx")]
mod docx_rs_encoder {
    use std::io::Cursor;

    use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts};
    use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

    use super::DocxEncoder;
    use crate::export::template::ExportDocument;
    use crate::model::error::ExportError;
    use crate::model::Direction;
    use crate::render::markdown_options;

    const MONOSPACE: &str = "Courier New";
    // Run sizes are in half-points.
    const BODY_SIZE: usize = 24;
    const BRAND_SIZE: usize = 36;

    fn heading_size(level: HeadingLevel) -> usize {
        match level {
            HeadingLevel::H1 => 36,
            HeadingLevel::H2 => 32,
            HeadingLevel::H3 => 28,
            _ => 26,
        }
    }

    /// `docx-rs` based encoder.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct DocxRsEncoder;

    impl DocxEncoder for DocxRsEncoder {
        fn is_available(&self) -> bool {
            true
        }

        fn encode(&self, doc: &ExportDocument) -> Result<Vec<u8>, ExportError> {
            let mut builder = BodyBuilder::new(doc.direction);

            builder.push_paragraph(vec![Run::new().add_text(&doc.brand).bold().size(BRAND_SIZE)]);
            builder.push_paragraph(vec![Run::new()
                .add_text(format!("{}: {}", doc.date_label, doc.generated_on))
                .size(BODY_SIZE)]);
            builder.push_paragraph(vec![Run::new().add_text(&doc.case_number).size(BODY_SIZE)]);
            builder.push_paragraph(Vec::new());

            builder.walk(&doc.source_text);

            let mut cursor = Cursor::new(Vec::new());
            builder
                .finish()
                .build()
                .pack(&mut cursor)
                .map_err(|e| ExportError::Encoder {
                    reason: e.to_string(),
                })?;
            Ok(cursor.into_inner())
        }
    }

    #[derive(Default, Clone, Copy)]
    struct InlineStyle {
        bold: bool,
        italic: bool,
        mono: bool,
        size: Option<usize>,
    }

    /// Accumulates runs into paragraphs while walking Markdown events.
    struct BodyBuilder {
        paragraphs: Vec<Paragraph>,
        direction: Direction,
        runs: Vec<Run>,
        marker_pending: bool,
        style: InlineStyle,
        lists: Vec<Option<u64>>,
        quote_depth: usize,
    }

    impl BodyBuilder {
        fn new(direction: Direction) -> Self {
            Self {
                paragraphs: Vec::new(),
                direction,
                runs: Vec::new(),
                marker_pending: false,
                style: InlineStyle::default(),
                lists: Vec::new(),
                quote_depth: 0,
            }
        }

        fn alignment(&self) -> AlignmentType {
            match self.direction {
                Direction::Ltr => AlignmentType::Left,
                Direction::Rtl => AlignmentType::Right,
            }
        }

        fn push_paragraph(&mut self, runs: Vec<Run>) {
            let mut paragraph = Paragraph::new().align(self.alignment());
            if self.direction == Direction::Rtl {
                paragraph.property = paragraph.property.bidi(true);
            }
            for run in runs {
                paragraph = paragraph.add_run(run);
            }
            self.paragraphs.push(paragraph);
        }

        fn flush(&mut self) {
            self.marker_pending = false;
            if !self.runs.is_empty() {
                let runs = std::mem::take(&mut self.runs);
                self.push_paragraph(runs);
            }
        }

        fn text_run(&self, text: &str) -> Run {
            let mut run = Run::new()
                .add_text(text)
                .size(self.style.size.unwrap_or(BODY_SIZE));
            if self.style.bold {
                run = run.bold();
            }
            if self.style.italic || self.quote_depth > 0 {
                run = run.italic();
            }
            if self.style.mono {
                run = run.fonts(RunFonts::new().ascii(MONOSPACE).hi_ansi(MONOSPACE));
            }
            run
        }

        fn push_text(&mut self, text: &str) {
            let run = self.text_run(text);
            self.runs.push(run);
        }

        fn walk(&mut self, text: &str) {
            for event in Parser::new_ext(text, markdown_options()) {
                match event {
                    Event::Start(Tag::Heading { level, .. }) => {
                        self.flush();
                        self.style.bold = true;
                        self.style.size = Some(heading_size(level));
                    }
                    Event::End(TagEnd::Heading(_)) => {
                        self.flush();
                        self.style.bold = false;
                        self.style.size = None;
                    }
                    Event::Start(Tag::Paragraph) => {
                        // A loose list item keeps its marker on the first line.
                        if self.marker_pending {
                            self.marker_pending = false;
                        } else {
                            self.flush();
                        }
                    }
                    Event::Start(Tag::TableRow) | Event::Start(Tag::TableHead) => self.flush(),
                    Event::End(TagEnd::Paragraph)
                    | Event::End(TagEnd::TableRow)
                    | Event::End(TagEnd::TableHead)
                    | Event::End(TagEnd::Item) => self.flush(),
                    Event::End(TagEnd::TableCell) => self.push_text("\t"),
                    Event::Start(Tag::BlockQuote { .. }) => {
                        self.flush();
                        self.quote_depth += 1;
                    }
                    Event::End(TagEnd::BlockQuote { .. }) => {
                        self.flush();
                        self.quote_depth = self.quote_depth.saturating_sub(1);
                    }
                    Event::Start(Tag::List(start)) => {
                        self.flush();
                        self.lists.push(start);
                    }
                    Event::End(TagEnd::List(_)) => {
                        self.flush();
                        self.lists.pop();
                    }
                    Event::Start(Tag::Item) => {
                        self.flush();
                        let indent = "    ".repeat(self.lists.len().saturating_sub(1));
                        let marker = match self.lists.last_mut() {
                            Some(Some(n)) => {
                                let marker = format!("{indent}{n}. ");
                                *n += 1;
                                marker
                            }
                            _ => format!("{indent}\u{2022} "),
                        };
                        self.push_text(&marker);
                        self.marker_pending = true;
                    }
                    Event::Start(Tag::CodeBlock(_)) => {
                        self.flush();
                        self.style.mono = true;
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        self.flush();
                        self.style.mono = false;
                    }
                    Event::Start(Tag::Strong) => self.style.bold = true,
                    Event::End(TagEnd::Strong) => self.style.bold = false,
                    Event::Start(Tag::Emphasis) => self.style.italic = true,
                    Event::End(TagEnd::Emphasis) => self.style.italic = false,
                    Event::Text(t) if self.style.mono => {
                        // Keep code block line structure.
                        let mut lines = t.split('\n').peekable();
                        while let Some(line) = lines.next() {
                            if !line.is_empty() {
                                self.push_text(line);
                            }
                            if lines.peek().is_some() {
                                self.runs.push(Run::new().add_break(BreakType::TextWrapping));
                            }
                        }
                    }
                    Event::Text(t) | Event::Html(t) | Event::InlineHtml(t) => self.push_text(&t),
                    Event::Code(t) => {
                        let mono = self.style.mono;
                        self.style.mono = true;
                        self.push_text(&t);
                        self.style.mono = mono;
                    }
                    Event::TaskListMarker(done) => {
                        self.push_text(if done { "\u{2611} " } else { "\u{2610} " })
                    }
                    Event::SoftBreak => self.push_text(" "),
                    Event::HardBreak => self.runs.push(Run::new().add_break(BreakType::TextWrapping)),
                    Event::Rule => {
                        self.flush();
                        self.push_paragraph(vec![Run::new().add_text("\u{2014}".repeat(20))]);
                    }
                    _ => {}
                }
            }
            self.flush();
        }

        fn finish(self) -> Docx {
            self.paragraphs
                .into_iter()
                .fold(Docx::new(), |docx, paragraph| docx.add_paragraph(paragraph))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn built(direction: Direction, text: &str) -> Vec<Paragraph> {
            let mut builder = BodyBuilder::new(direction);
            builder.walk(text);
            builder.paragraphs
        }

        #[test]
        fn rtl_paragraphs_are_bidi_and_right_aligned() {
            let paragraphs = built(Direction::Rtl, "# عقد إيجار\n\nمدة العقد 12 شهرا.\n");

            assert!(!paragraphs.is_empty());
            for paragraph in &paragraphs {
                assert_eq!(paragraph.property.bidi, Some(true));
                assert_eq!(
                    paragraph.property.alignment,
                    Some(docx_rs::Justification::new(AlignmentType::Right.to_string()))
                );
            }
        }

        #[test]
        fn ltr_paragraphs_carry_no_bidi_property() {
            let paragraphs = built(Direction::Ltr, "# Lease\n\nThe term is 12 months.\n");

            assert!(!paragraphs.is_empty());
            assert!(paragraphs.iter().all(|p| p.property.bidi.is_none()));
        }
    }
}
