//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ViewerConfig;
use crate::export::share::ShareSettings;
use crate::export::template::TemplateSettings;
use crate::model::ViewerLocale;
use crate::render::{RenderOptions, DEFAULT_MAX_NESTING_DEPTH};
use crate::search::HighlightMode;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DRAFTVIEW_CONFIG";

/// Environment variable overriding the locale.
pub const LOCALE_ENV_VAR: &str = "DRAFTVIEW_LOCALE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// The resolved locale tag is malformed.
    #[error("Invalid locale {0:?}")]
    InvalidLocale(String),
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/draftview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Locale tag (e.g., "en-US", "ar-EG").
    #[serde(default)]
    pub locale: Option<String>,

    /// Brand mark printed in the export header.
    #[serde(default)]
    pub brand: Option<String>,

    /// Case-number placeholder printed in the export header.
    #[serde(default)]
    pub case_number_placeholder: Option<String>,

    /// Label preceding the generation date in the export header.
    #[serde(default)]
    pub date_label: Option<String>,

    /// File stem for exported files.
    #[serde(default)]
    pub export_basename: Option<String>,

    /// Directory that receives exported files.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// "raw" or "structure-aware".
    #[serde(default)]
    pub highlight_mode: Option<HighlightMode>,

    /// Renderer nesting limit.
    #[serde(default)]
    pub max_nesting_depth: Option<usize>,

    /// Subject line for shared messages.
    #[serde(default)]
    pub share_subject: Option<String>,

    /// Text placed before the document in shared messages.
    #[serde(default)]
    pub share_prefix: Option<String>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Locale tag for export headers and layout direction.
    pub locale: String,
    /// Brand mark in the export header.
    pub brand: String,
    /// Case-number placeholder in the export header.
    pub case_number_placeholder: String,
    /// Label shown before the generation date.
    pub date_label: String,
    /// File name stem for exported files.
    pub export_basename: String,
    /// Directory that receives exported files.
    pub export_dir: PathBuf,
    /// Marker placement relative to document structure.
    pub highlight_mode: HighlightMode,
    /// Nesting depth beyond which rendering falls back to raw text.
    pub max_nesting_depth: usize,
    /// Subject line for shared messages.
    pub share_subject: String,
    /// Text placed before the document in shared messages.
    pub share_prefix: String,
    /// Log file written by the tracing subscriber.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let template = TemplateSettings::default();
        let share = ShareSettings::default();
        Self {
            locale: "en-US".to_string(),
            brand: template.brand,
            case_number_placeholder: template.case_number_placeholder,
            date_label: template.date_label,
            export_basename: crate::export::DEFAULT_BASENAME.to_string(),
            export_dir: PathBuf::from("."),
            highlight_mode: HighlightMode::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            share_subject: share.subject,
            share_prefix: share.prefix,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Build the explicit configuration record handed to the viewer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLocale` if the locale tag is malformed.
    pub fn viewer_config(&self) -> Result<ViewerConfig, ConfigError> {
        let locale = ViewerLocale::new(self.locale.clone())
            .map_err(|_| ConfigError::InvalidLocale(self.locale.clone()))?;
        Ok(ViewerConfig {
            locale,
            highlight_mode: self.highlight_mode,
            render: RenderOptions {
                max_nesting_depth: self.max_nesting_depth,
            },
            template: TemplateSettings {
                brand: self.brand.clone(),
                case_number_placeholder: self.case_number_placeholder.clone(),
                date_label: self.date_label.clone(),
            },
            share: ShareSettings {
                subject: self.share_subject.clone(),
                prefix: self.share_prefix.clone(),
            },
            export_basename: self.export_basename.clone(),
        })
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/draftview/draftview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("draftview").join("draftview.log")
    } else {
        PathBuf::from("draftview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/draftview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("draftview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DRAFTVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/draftview/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(env_path));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        locale: config.locale.unwrap_or(defaults.locale),
        brand: config.brand.unwrap_or(defaults.brand),
        case_number_placeholder: config
            .case_number_placeholder
            .unwrap_or(defaults.case_number_placeholder),
        date_label: config.date_label.unwrap_or(defaults.date_label),
        export_basename: config.export_basename.unwrap_or(defaults.export_basename),
        export_dir: config.export_dir.unwrap_or(defaults.export_dir),
        highlight_mode: config.highlight_mode.unwrap_or(defaults.highlight_mode),
        max_nesting_depth: config
            .max_nesting_depth
            .unwrap_or(defaults.max_nesting_depth),
        share_subject: config.share_subject.unwrap_or(defaults.share_subject),
        share_prefix: config.share_prefix.unwrap_or(defaults.share_prefix),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `DRAFTVIEW_LOCALE`: Override locale
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(locale) = std::env::var(LOCALE_ENV_VAR) {
        config.locale = locale;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    locale_override: Option<String>,
    export_dir_override: Option<PathBuf>,
    highlight_override: Option<HighlightMode>,
) -> ResolvedConfig {
    if let Some(locale) = locale_override {
        config.locale = locale;
    }

    if let Some(dir) = export_dir_override {
        config.export_dir = dir;
    }

    if let Some(mode) = highlight_override {
        config.highlight_mode = mode;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
