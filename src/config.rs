//! User configuration
//!
//! Read from `$FOLIO_CONFIG` or `~/.config/folio/config.toml`. Every field has
//! a default, so a missing file or a partial file is fine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{PageSize, PaperColor, Px};
use crate::editor::EditorSettings;
use crate::history::DEFAULT_MAX_ENTRIES;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_entries: usize,
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            debounce_ms: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub font_family: String,
    pub font_size: f64,
    pub page_size: PageSize,
    pub paper: PaperColor,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 14.0,
            page_size: PageSize::A4,
            paper: PaperColor::Default,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Raster pixels per page pixel
    pub scale: f32,
    /// Where exports land when no path is given (defaults to the cwd)
    pub directory: Option<PathBuf>,
    /// Font used for families without an entry in `fonts`
    pub default_font: Option<PathBuf>,
    /// Family name to TTF/OTF path. Styled faces may be listed as
    /// "Family Bold", "Family Italic" or "Family Bold Italic".
    pub fonts: HashMap<String, PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            directory: None,
            default_font: None,
            fonts: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Built-in theme name or a path to a theme TOML file
    pub theme: String,
    pub history: HistoryConfig,
    pub defaults: DefaultsConfig,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            history: HistoryConfig::default(),
            defaults: DefaultsConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load from `path` if given, else from the default location. A missing
    /// default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("FOLIO_CONFIG") {
            return Some(PathBuf::from(p));
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join("folio").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_entries == 0 {
            return Err(ConfigError::Invalid("history.max_entries must be at least 1".to_string()));
        }
        if !(self.defaults.font_size.is_finite() && self.defaults.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "defaults.font_size must be positive, got {}",
                self.defaults.font_size
            )));
        }
        if self.defaults.font_family.trim().is_empty() {
            return Err(ConfigError::Invalid("defaults.font_family is empty".to_string()));
        }
        if !(self.export.scale.is_finite() && self.export.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "export.scale must be positive, got {}",
                self.export.scale
            )));
        }
        Ok(())
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            max_entries: self.history.max_entries,
            debounce: Duration::from_millis(self.history.debounce_ms),
            font_family: self.defaults.font_family.clone(),
            font_size: Px(self.defaults.font_size),
            page_size: self.defaults.page_size,
            paper: self.defaults.paper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history.max_entries, 150);
        assert_eq!(config.history.debounce_ms, 500);
        assert_eq!(config.export.scale, 2.0);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::parse(
            r#"
theme = "dark"

[history]
max_entries = 20

[defaults]
font_family = "Georgia"
page_size = "letter"
paper = "inverted"

[export]
default_font = "/fonts/Sans.ttf"

[export.fonts]
"Georgia" = "/fonts/Georgia.ttf"
"Georgia Bold" = "/fonts/Georgia-Bold.ttf"
"#,
        )
        .unwrap();

        assert_eq!(config.theme, "dark");
        assert_eq!(config.history.max_entries, 20);
        assert_eq!(config.history.debounce_ms, 500);
        assert_eq!(config.defaults.font_family, "Georgia");
        assert_eq!(config.defaults.font_size, 14.0);
        assert_eq!(config.defaults.page_size, PageSize::Letter);
        assert_eq!(config.defaults.paper, PaperColor::Inverted);
        assert_eq!(config.export.default_font, Some(PathBuf::from("/fonts/Sans.ttf")));
        assert_eq!(config.export.fonts.len(), 2);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            AppConfig::parse("[history]\nmax_entries = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::parse("[defaults]\nfont_size = -3.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::parse("[export]\nscale = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::parse("[defaults]\npage_size = \"a5\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_editor_settings() {
        let config = AppConfig::parse("[history]\ndebounce_ms = 250\n[defaults]\nfont_size = 18.0").unwrap();
        let settings = config.editor_settings();
        assert_eq!(settings.debounce, Duration::from_millis(250));
        assert_eq!(settings.font_size, Px(18.0));
        assert_eq!(settings.max_entries, 150);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "theme = \"solarized-dark\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.theme, "solarized-dark");

        let missing = file.path().with_extension("missing");
        assert!(matches!(AppConfig::load(Some(&missing)), Err(ConfigError::Read { .. })));
    }
}
