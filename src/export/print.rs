//! Print / PDF export.
//!
//! Printing opens the export document in a new rendering context; the user
//! picks "Save as PDF" or a printer there. Hosts may block the new context.
//! That is reported as [`PrintOutcome::Blocked`] and logged, never raised.

use crate::export::sinks::PrintSurface;
use crate::export::template::ExportDocument;

/// What happened when printing was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The print context opened.
    Opened,
    /// The host refused to open a print context.
    Blocked { reason: String },
}

/// Open `doc` on `surface` with the print hook armed.
pub fn print_document(doc: &ExportDocument, surface: &mut dyn PrintSurface) -> PrintOutcome {
    match surface.open(&doc.to_print_html()) {
        Ok(()) => {
            tracing::info!("print context opened");
            PrintOutcome::Opened
        }
        Err(e) => {
            tracing::warn!(error = %e, "print context could not be opened");
            PrintOutcome::Blocked {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::template::{build_export_document, TemplateSettings};
    use crate::model::error::ExportError;
    use crate::model::ViewerLocale;
    use crate::render::RenderOptions;
    use chrono::Utc;

    struct BlockedSurface;

    impl PrintSurface for BlockedSurface {
        fn open(&mut self, _print_html: &str) -> Result<(), ExportError> {
            Err(ExportError::Launch {
                target: "print window".to_string(),
                reason: "popup blocked".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct CapturingSurface {
        opened: Vec<String>,
    }

    impl PrintSurface for CapturingSurface {
        fn open(&mut self, print_html: &str) -> Result<(), ExportError> {
            self.opened.push(print_html.to_string());
            Ok(())
        }
    }

    fn doc() -> ExportDocument {
        build_export_document(
            "Body",
            &ViewerLocale::default(),
            &TemplateSettings::default(),
            &RenderOptions::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn opens_print_html_on_surface() {
        let mut surface = CapturingSurface::default();

        assert_eq!(print_document(&doc(), &mut surface), PrintOutcome::Opened);
        assert_eq!(surface.opened.len(), 1);
        assert!(surface.opened[0].contains("window.print()"));
    }

    #[test]
    fn blocked_surface_yields_outcome_not_error() {
        let outcome = print_document(&doc(), &mut BlockedSurface);

        match outcome {
            PrintOutcome::Blocked { reason } => assert!(reason.contains("popup blocked")),
            other => panic!("Expected Blocked, got {:?}", other),
        }
    }
}
