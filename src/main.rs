//! draftview - Entry Point

use chrono::Utc;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use draftview::export::sinks::{BrowserPrintSurface, DirectoryDownloads, SystemClipboard, SystemLauncher};
use draftview::export::{default_encoder, ExportContext, ExportOutcome, ExportTarget, PrintOutcome};
use draftview::model::error::AppError;
use draftview::search::HighlightMode;
use draftview::state::ViewerSession;

/// draftview - render, search and export a generated legal document
#[derive(Parser, Debug)]
#[command(name = "draftview")]
#[command(version)]
#[command(about = "Render, search and export a generated legal document")]
pub struct Args {
    /// Path to the Markdown document (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Search the document and report matches on stderr
    #[arg(short, long)]
    pub search: Option<String>,

    /// Export target: markdown, html, docx, print, copy, email, whatsapp (repeatable)
    #[arg(short, long = "export", value_name = "FORMAT")]
    pub exports: Vec<ExportTarget>,

    /// Locale tag for export headers and layout direction (e.g. en-US, ar-EG)
    #[arg(long)]
    pub locale: Option<String>,

    /// Directory that receives exported files
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Leave matches inside code and link targets unmarked
    #[arg(long)]
    pub structure_aware: bool,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        // 1. Load config file (or None if missing)
        let config_file = draftview::config::load_config_with_precedence(args.config.clone())?;

        // 2. Merge with defaults
        let merged = draftview::config::merge_config(config_file);

        // 3. Apply environment variable overrides
        let with_env = draftview::config::apply_env_overrides(merged);

        // 4. Apply CLI argument overrides
        // Highlight mode only overrides when the flag was explicitly set
        let highlight_override = args.structure_aware.then_some(HighlightMode::StructureAware);

        draftview::config::apply_cli_overrides(
            with_env,
            args.locale.clone(),
            args.out_dir.clone(),
            highlight_override,
        )
    };

    draftview::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let viewer_config = config.viewer_config()?;
    let mut input_source = draftview::source::detect_input_source(args.file.clone())?;
    let mut viewer = ViewerSession::new(viewer_config);

    if let Some(query) = &args.search {
        viewer.set_query(query.as_str());
    }

    // The reader plays the producer: chunks are appended as they arrive.
    let chunks = input_source.pump(|chunk| {
        viewer.append(chunk)?;
        Ok::<(), AppError>(())
    })?;
    viewer.complete();
    info!(source = %input_source.describe(), chunks, bytes = viewer.text().len(), "input consumed");

    if args.search.is_some() {
        report_matches(&viewer);
    }

    if args.exports.is_empty() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(viewer.rendered().html().as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    run_exports(&mut viewer, &args.exports, config.export_dir)?;
    Ok(())
}

fn report_matches(viewer: &ViewerSession) {
    let offsets: Vec<String> = viewer
        .matches()
        .iter()
        .map(|span| span.offset.to_string())
        .collect();
    eprintln!(
        "{} match(es) for {:?}{}{}",
        viewer.matches().len(),
        viewer.query(),
        if offsets.is_empty() { "" } else { " at byte offsets " },
        offsets.join(", ")
    );
}

/// Run every requested export, continuing past failures.
///
/// Returns the last failure so the exit status reflects it.
fn run_exports(
    viewer: &mut ViewerSession,
    targets: &[ExportTarget],
    export_dir: PathBuf,
) -> Result<(), AppError> {
    let basename = viewer.config().export_basename.clone();
    let mut clipboard = SystemClipboard;
    let mut downloads = DirectoryDownloads::new(&export_dir);
    let mut launcher = SystemLauncher;
    let mut print = BrowserPrintSurface::new(
        std::env::temp_dir(),
        format!("{basename}-print.html"),
        SystemLauncher,
    );
    let encoder = default_encoder();

    let mut ctx = ExportContext {
        clipboard: &mut clipboard,
        downloads: &mut downloads,
        launcher: &mut launcher,
        print: &mut print,
        encoder: encoder.as_ref(),
    };

    let mut last_failure = None;
    for &target in targets {
        match viewer.export(target, &mut ctx, Utc::now()) {
            Ok(ExportOutcome::Copied) => eprintln!("{target}: copied to clipboard"),
            Ok(ExportOutcome::Saved(path)) => eprintln!("{target}: saved {}", path.display()),
            Ok(ExportOutcome::Print(PrintOutcome::Opened)) => eprintln!("{target}: print view opened"),
            Ok(ExportOutcome::Print(PrintOutcome::Blocked { reason })) => {
                eprintln!("{target}: print view could not be opened ({reason})")
            }
            Ok(ExportOutcome::Shared(message)) => {
                if message.exceeds_limit {
                    eprintln!("{target}: composer opened; message may be truncated");
                } else {
                    eprintln!("{target}: composer opened");
                }
            }
            Err(e) => {
                eprintln!("{target}: {} ({e})", e.user_message());
                last_failure = Some(e);
            }
        }
    }

    match last_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use draftview::export::ShareChannel;

    #[test]
    fn test_help_does_not_error() {
        // Help should succeed (exits with code 0)
        let result = Args::try_parse_from(["draftview", "--help"]);
        // Help returns Err with DisplayHelp, which is success
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["draftview", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["draftview"]);
        assert_eq!(args.file, None);
        assert_eq!(args.search, None);
        assert!(args.exports.is_empty());
        assert_eq!(args.locale, None);
        assert_eq!(args.out_dir, None);
        assert_eq!(args.config, None);
        assert!(!args.structure_aware);
    }

    #[test]
    fn test_file_path_populates_file_field() {
        let args = Args::parse_from(["draftview", "lease.md"]);
        assert_eq!(args.file, Some(PathBuf::from("lease.md")));
    }

    #[test]
    fn test_search_short_flag() {
        let args = Args::parse_from(["draftview", "-s", "12 months"]);
        assert_eq!(args.search, Some("12 months".to_string()));
    }

    #[test]
    fn test_export_is_repeatable() {
        let args = Args::parse_from(["draftview", "--export", "markdown", "-e", "whatsapp"]);
        assert_eq!(
            args.exports,
            vec![ExportTarget::Markdown, ExportTarget::Share(ShareChannel::WhatsApp)]
        );
    }

    #[test]
    fn test_export_invalid_rejects() {
        let result = Args::try_parse_from(["draftview", "--export", "fax"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "draftview",
            "lease.md",
            "-s",
            "term",
            "--locale",
            "ar-EG",
            "-o",
            "/tmp/out",
            "--structure-aware",
            "-e",
            "docx",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("lease.md")));
        assert_eq!(args.search, Some("term".to_string()));
        assert_eq!(args.locale, Some("ar-EG".to_string()));
        assert_eq!(args.out_dir, Some(PathBuf::from("/tmp/out")));
        assert!(args.structure_aware);
        assert_eq!(args.exports, vec![ExportTarget::Docx]);
    }

    #[test]
    fn test_locale_flows_through_config_precedence_chain() {
        use draftview::config::{apply_cli_overrides, apply_env_overrides, merge_config, ConfigFile};

        // Simulate full precedence chain: Defaults → Config File → Env Vars → CLI Args
        let config_file = ConfigFile {
            locale: Some("fr-FR".to_string()),
            ..ConfigFile::default()
        };

        // Step 1: Merge with defaults
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.locale, "fr-FR", "Config file should override default locale");

        // Step 2: Apply env override (DRAFTVIEW_LOCALE not set here)
        let with_env = apply_env_overrides(merged);

        // Step 3: Apply CLI override
        let with_cli = apply_cli_overrides(with_env, Some("ar-EG".to_string()), None, None);
        assert_eq!(with_cli.locale, "ar-EG", "CLI locale should override all other sources");
    }
}
