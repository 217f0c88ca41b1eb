use crate::model::journal::MAX_UNDO_DEPTH;
use crate::services::recovery::DEFAULT_AUTO_SAVE_INTERVAL_SECS;
use crate::view::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default number of remembered command lines.
pub const DEFAULT_HISTORY_LIMIT: usize = 800;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme_name")]
    pub theme: String,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Command aliases available from the start, `name -> expansion`
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_theme_name() -> String {
    Theme::Default.name().to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Editor behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Show the line-number gutter when printing
    #[serde(default = "default_false")]
    pub line_numbers: bool,

    /// Keep a `<file>~` copy of the previous contents on save
    #[serde(default = "default_true")]
    pub backup: bool,

    /// Colour output (only ever used when stdout is a terminal)
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Print a one-line buffer summary before each command prompt
    #[serde(default = "default_false")]
    pub status_line: bool,
}

fn default_undo_limit() -> usize {
    MAX_UNDO_DEPTH
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: false,
            backup: true,
            color: true,
            undo_limit: default_undo_limit(),
            history_limit: default_history_limit(),
            status_line: false,
        }
    }
}

/// Crash recovery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_auto_save_interval")]
    pub auto_save_interval_secs: u64,

    /// Where snapshots live; the home directory when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_auto_save_interval() -> u64 {
    DEFAULT_AUTO_SAVE_INTERVAL_SECS
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_save_interval_secs: default_auto_save_interval(),
            directory: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            editor: EditorConfig::default(),
            recovery: RecoveryConfig::default(),
            aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// The configured theme. Only meaningful after [`Config::validate`].
    pub fn theme(&self) -> Theme {
        Theme::from_name(&self.theme).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Theme::from_name(&self.theme).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown theme '{}'",
                self.theme
            )));
        }

        if self.editor.undo_limit == 0 {
            return Err(ConfigError::ValidationError(
                "undo_limit must be greater than 0".to_string(),
            ));
        }

        if self.editor.history_limit == 0 {
            return Err(ConfigError::ValidationError(
                "history_limit must be greater than 0".to_string(),
            ));
        }

        if self.recovery.auto_save_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "auto_save_interval_secs must be greater than 0".to_string(),
            ));
        }

        for (name, expansion) in &self.aliases {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "alias name '{name}' must be a single word"
                )));
            }
            if expansion.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "alias '{name}' has an empty expansion"
                )));
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
