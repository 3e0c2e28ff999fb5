//! External side-effect surfaces used by the converters.
//!
//! The clipboard, the download location, the print surface and external URI
//! handlers are unmanaged: each call is fire-and-forget with no retry. Hosts
//! (and tests) substitute their own implementations of these traits.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::model::error::ExportError;

/// Write-only text clipboard.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Destination for exported files.
pub trait Downloads {
    /// Store `bytes` under `file_name` and return where they ended up.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Opener for URIs and local files in an external application.
pub trait Launcher {
    fn launch(&mut self, target: &OsStr) -> Result<(), ExportError>;
}

/// New rendering context that shows a document and starts printing.
pub trait PrintSurface {
    fn open(&mut self, print_html: &str) -> Result<(), ExportError>;
}

// ===== System implementations =====

/// Desktop clipboard through `arboard`.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(text.to_owned()))
            .map_err(|e| ExportError::Clipboard {
                reason: e.to_string(),
            })
    }
}

/// Saves exports into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    /// Save into `dir`, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloads for DirectoryDownloads {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(file_name);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, bytes))
            .map_err(|e| ExportError::Write {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(path)
    }
}

/// Hands targets to the platform opener (`open`, `xdg-open`, `start`).
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, target: &OsStr) -> Result<(), ExportError> {
        let launch_error = |reason: String| ExportError::Launch {
            target: target.to_string_lossy().into_owned(),
            reason,
        };

        #[cfg(target_os = "macos")]
        let status = Command::new("open").arg(target).status();

        #[cfg(all(unix, not(target_os = "macos")))]
        let status = Command::new("xdg-open").arg(target).status();

        #[cfg(target_os = "windows")]
        let status = Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(target)
            .status();

        let status = status.map_err(|e| launch_error(e.to_string()))?;
        if !status.success() {
            return Err(launch_error(format!("opener exited with {status}")));
        }
        Ok(())
    }
}

/// Print surface that writes a temporary page and opens it in the browser.
#[derive(Debug)]
pub struct BrowserPrintSurface<L: Launcher> {
    dir: PathBuf,
    file_name: String,
    launcher: L,
}

impl<L: Launcher> BrowserPrintSurface<L> {
    /// Write the print page to `dir/file_name` and open it with `launcher`.
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>, launcher: L) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            launcher,
        }
    }
}

impl<L: Launcher> PrintSurface for BrowserPrintSurface<L> {
    fn open(&mut self, print_html: &str) -> Result<(), ExportError> {
        let path = DirectoryDownloads::new(&self.dir).save(&self.file_name, print_html.as_bytes())?;
        self.launcher.launch(path.as_os_str())
    }
}
