//! Configuration management for spendboard
//!
//! This module handles loading, validation, and management of
//! spendboard configuration from YAML files.

pub mod error;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    /// Endpoint URL for a relative path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the JSON file holding token, user id, user name and theme
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spendboard")
        .join("session.json")
}

/// UI theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Currency and date display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// ISO currency code shown in exports
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    /// Symbol prefixed to amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
    /// chrono format string for list dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Theme used when the session has no stored preference
    #[serde(default)]
    pub theme: Theme,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
            date_format: default_date_format(),
            theme: Theme::default(),
        }
    }
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

fn default_date_format() -> String {
    "%b %-d, %Y".to_string()
}

/// Dashboard behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Sort key used when none is given (date-desc, date-asc, amount-desc, amount-asc)
    #[serde(default = "default_sort")]
    pub default_sort: String,
    /// Maximum rows printed in the expense list (0 = all)
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    /// Percentage at which a budget is flagged as close to its limit
    #[serde(default = "default_budget_warning")]
    pub budget_warning_percent: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            list_limit: default_list_limit(),
            budget_warning_percent: default_budget_warning(),
        }
    }
}

fn default_sort() -> String {
    "date-desc".to_string()
}

fn default_list_limit() -> usize {
    50
}

fn default_budget_warning() -> f64 {
    80.0
}

/// CSV export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session file settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

const SORT_KEYS: [&str; 4] = ["date-desc", "date-asc", "amount-desc", "amount-asc"];
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::IoError)?;

        let config: Config = serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path.to_path_buf())
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.display.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "display.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue {
                field: "display.date_format".to_string(),
                reason: format!("Unsupported date format: {}", self.display.date_format),
            });
        }

        if !SORT_KEYS.contains(&self.dashboard.default_sort.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.default_sort".to_string(),
                reason: format!("Sort key must be one of {}", SORT_KEYS.join(", ")),
            });
        }

        let warning = self.dashboard.budget_warning_percent;
        if !(0.0..=100.0).contains(&warning) {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.budget_warning_percent".to_string(),
                reason: "Warning threshold must be between 0 and 100".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.dashboard.default_sort, "date-desc");
    }

    #[test]
    fn test_generated_template_parses() {
        let config: Config = serde_yaml::from_str(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.currency_code, "INR");
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: \"https://finance.example.com/api\"").unwrap();

        let config = Config::load(file.path().to_path_buf()).unwrap();
        assert_eq!(config.api.base_url, "https://finance.example.com/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.export.delimiter, ',');
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/nonexistent/spendboard.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/spendboard.yaml")).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api: [unclosed").unwrap();
        let err = Config::load(file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8080".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "api.base_url"
        ));

        let mut config = Config::default();
        config.dashboard.default_sort = "name".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_date_specifier() {
        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "display.date_format"),
            other => panic!("expected invalid date format, got {:?}", other),
        }

        config.display.date_format = "%d/%m/%Y".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_url_joins_without_double_slash() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8080/api/".to_string();
        assert_eq!(
            config.api.endpoint_url("/categories/global"),
            "http://localhost:8080/api/categories/global"
        );
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.to_string(), "light");
    }
}
