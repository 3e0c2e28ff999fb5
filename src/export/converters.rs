//! File and clipboard converters.
//!
//! Each converter takes the finished document (raw text or the templated
//! [`ExportDocument`]) and one side-effect sink. None of them touch viewer
//! state; failures come back as [`ExportError`] for the session to surface.

use std::ffi::OsStr;
use std::path::PathBuf;

use crate::export::docx::{encode_checked, DocxEncoder};
use crate::export::sinks::{Clipboard, Downloads, Launcher};
use crate::export::share::{build_share_message, ShareChannel, ShareMessage, ShareSettings};
use crate::export::template::ExportDocument;
use crate::model::error::ExportError;

/// `{basename}.md`
pub fn markdown_file_name(basename: &str) -> String {
    format!("{basename}.md")
}

/// `{basename}.html`
pub fn html_file_name(basename: &str) -> String {
    format!("{basename}.html")
}

/// `{basename}.docx`
pub fn docx_file_name(basename: &str) -> String {
    format!("{basename}.docx")
}

/// Copy the raw document text, without any template.
pub fn copy_to_clipboard(text: &str, clipboard: &mut dyn Clipboard) -> Result<(), ExportError> {
    clipboard.set_text(text)?;
    tracing::info!(bytes = text.len(), "document copied to clipboard");
    Ok(())
}

/// Save the raw document text as a Markdown file.
pub fn save_markdown(
    text: &str,
    basename: &str,
    downloads: &mut dyn Downloads,
) -> Result<PathBuf, ExportError> {
    let path = downloads.save(&markdown_file_name(basename), text.as_bytes())?;
    tracing::info!(path = %path.display(), "markdown export saved");
    Ok(path)
}

/// Save the templated document as a standalone HTML file.
pub fn save_html(
    doc: &ExportDocument,
    basename: &str,
    downloads: &mut dyn Downloads,
) -> Result<PathBuf, ExportError> {
    let path = downloads.save(&html_file_name(basename), doc.to_html().as_bytes())?;
    tracing::info!(path = %path.display(), "html export saved");
    Ok(path)
}

/// Save already-encoded Word bytes.
pub fn save_docx_bytes(
    bytes: &[u8],
    basename: &str,
    downloads: &mut dyn Downloads,
) -> Result<PathBuf, ExportError> {
    let path = downloads.save(&docx_file_name(basename), bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "word export saved");
    Ok(path)
}

/// Encode the templated document and save it as a Word file.
///
/// # Errors
///
/// `ExportError::EncoderUnavailable` before anything is written when the
/// encoder is absent; encoder and write failures otherwise.
pub fn save_docx(
    doc: &ExportDocument,
    basename: &str,
    encoder: &dyn DocxEncoder,
    downloads: &mut dyn Downloads,
) -> Result<PathBuf, ExportError> {
    let bytes = encode_checked(encoder, doc)?;
    save_docx_bytes(&bytes, basename, downloads)
}

/// Open the channel's composer prefilled with the raw document text.
pub fn share(
    text: &str,
    channel: ShareChannel,
    settings: &ShareSettings,
    launcher: &mut dyn Launcher,
) -> Result<ShareMessage, ExportError> {
    let message = build_share_message(text, channel, settings);
    launcher.launch(OsStr::new(&message.uri))?;
    tracing::info!(%channel, uri_len = message.uri.len(), "share composer launched");
    Ok(message)
}

#[cfg(test)]
#[path = "converters_tests.rs"]
mod tests;
