//! Export engine.
//!
//! The finished document leaves the viewer through one of these targets.
//! Everything except the clipboard, Markdown and sharing targets starts from
//! the templated [`ExportDocument`]; no target ever sees search markers.

pub mod converters;
pub mod docx;
pub mod print;
pub mod share;
pub mod sinks;
pub mod template;

pub use converters::{copy_to_clipboard, save_docx, save_html, save_markdown, share};
pub use docx::{default_encoder, DocxEncoder, UnavailableEncoder};
pub use print::{print_document, PrintOutcome};
pub use share::{build_share_message, ShareChannel, ShareMessage, ShareSettings};
pub use sinks::{Clipboard, Downloads, Launcher, PrintSurface};
pub use template::{build_export_document, ExportDocument, TemplateSettings};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// File stem used for `.md`, `.docx` and `.html` exports.
pub const DEFAULT_BASENAME: &str = "legal-document";

/// One way of getting the document out of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    Clipboard,
    Markdown,
    Html,
    Docx,
    Print,
    Share(ShareChannel),
}

impl ExportTarget {
    /// Every target, in menu order.
    pub const ALL: [ExportTarget; 7] = [
        ExportTarget::Clipboard,
        ExportTarget::Markdown,
        ExportTarget::Docx,
        ExportTarget::Html,
        ExportTarget::Print,
        ExportTarget::Share(ShareChannel::Email),
        ExportTarget::Share(ShareChannel::WhatsApp),
    ];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ExportTarget::Clipboard => "copy",
            ExportTarget::Markdown => "markdown",
            ExportTarget::Html => "html",
            ExportTarget::Docx => "docx",
            ExportTarget::Print => "print",
            ExportTarget::Share(ShareChannel::Email) => "email",
            ExportTarget::Share(ShareChannel::WhatsApp) => "whatsapp",
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised export target name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown export target {0:?} (expected copy, markdown, html, docx, print, email or whatsapp)")]
pub struct UnknownExportTarget(pub String);

impl FromStr for ExportTarget {
    type Err = UnknownExportTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = match name.as_str() {
            "clipboard" => "copy",
            "md" => "markdown",
            "word" => "docx",
            "pdf" => "print",
            other => other,
        };
        ExportTarget::ALL
            .into_iter()
            .find(|target| target.name() == name)
            .ok_or_else(|| UnknownExportTarget(s.to_string()))
    }
}

/// Successful export result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Copied,
    Saved(PathBuf),
    Print(PrintOutcome),
    Shared(ShareMessage),
}

/// Side-effect sinks an export may need.
pub struct ExportContext<'a> {
    /// Destination of the raw-text copy.
    pub clipboard: &'a mut dyn Clipboard,
    /// Receiver of exported files.
    pub downloads: &'a mut dyn Downloads,
    /// Opener for share composers.
    pub launcher: &'a mut dyn Launcher,
    /// Rendering context for the print view.
    pub print: &'a mut dyn PrintSurface,
    /// Word-processor encoder.
    pub encoder: &'a dyn DocxEncoder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_target_round_trips_through_its_name() {
        for target in ExportTarget::ALL {
            assert_eq!(target.name().parse::<ExportTarget>(), Ok(target));
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!("PDF".parse::<ExportTarget>(), Ok(ExportTarget::Print));
        assert_eq!("Word".parse::<ExportTarget>(), Ok(ExportTarget::Docx));
        assert_eq!("md".parse::<ExportTarget>(), Ok(ExportTarget::Markdown));
    }

    #[test]
    fn unknown_target_is_rejected_with_its_name() {
        let err = "fax".parse::<ExportTarget>().unwrap_err();
        assert_eq!(err, UnknownExportTarget("fax".to_string()));
        assert!(err.to_string().contains("fax"));
    }
}
