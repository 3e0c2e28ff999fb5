//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};

use crate::export::share::ShareSettings;
use crate::export::template::TemplateSettings;
use crate::model::ViewerLocale;
use crate::render::RenderOptions;
use crate::search::HighlightMode;

/// Explicit configuration record handed to the viewer engine.
///
/// Nothing in the engine reads process-wide locale or theme state; everything
/// it needs arrives through this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Active locale and layout direction.
    pub locale: ViewerLocale,
    /// Placement of search markers.
    pub highlight_mode: HighlightMode,
    /// Renderer limits.
    pub render: RenderOptions,
    /// Export header content.
    pub template: TemplateSettings,
    /// Message sharing content.
    pub share: ShareSettings,
    /// File stem for `.md`, `.docx` and `.html` exports.
    pub export_basename: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            locale: ViewerLocale::default(),
            highlight_mode: HighlightMode::default(),
            render: RenderOptions::default(),
            template: TemplateSettings::default(),
            share: ShareSettings::default(),
            export_basename: crate::export::DEFAULT_BASENAME.to_string(),
        }
    }
}
