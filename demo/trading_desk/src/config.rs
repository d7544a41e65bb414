//! Desk configuration management.
//!
//! Handles loading of the desk configuration from TOML files with
//! environment variable override support. Every field has a default, so a
//! missing file or a partial file is valid.

use std::path::{Path, PathBuf};

use bond_services::gui::{DEFAULT_MAX_UPDATES, DEFAULT_THROTTLE_MS};
use bond_services::market_data::DEFAULT_BOOK_DEPTH;
use bond_services::{DeskOptions, FeedFiles};
use desk_inputs::file_source::GeneratorSettings;
use serde::Deserialize;
use thiserror::Error;

/// Largest accepted order book depth.
pub const MAX_BOOK_DEPTH: usize = 50;

/// Feed file names inside the data directory
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedNames {
    /// Price feed
    pub prices: String,
    /// Trade feed
    pub trades: String,
    /// Market data feed
    pub market_data: String,
    /// Inquiry feed
    pub inquiries: String,
}

impl Default for FeedNames {
    fn default() -> Self {
        Self {
            prices: "prices.txt".to_string(),
            trades: "trades.txt".to_string(),
            market_data: "marketdata.txt".to_string(),
            inquiries: "inquiries.txt".to_string(),
        }
    }
}

/// GUI throttle settings
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GuiConfig {
    /// Minimum milliseconds between accepted updates
    pub throttle_ms: u64,
    /// Maximum accepted updates per run
    pub max_updates: usize,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            max_updates: DEFAULT_MAX_UPDATES,
        }
    }
}

/// Sample feed generation settings
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for ids and sampled prices; must be non-zero
    pub seed: u64,
    /// Price lines per product
    pub prices_per_product: usize,
    /// Trades per product
    pub trades_per_product: usize,
    /// Order books per product
    pub books_per_product: usize,
    /// Inquiries per product
    pub inquiries_per_product: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let settings = GeneratorSettings::default();
        Self {
            seed: settings.seed,
            prices_per_product: settings.prices_per_product,
            trades_per_product: settings.trades_per_product,
            books_per_product: settings.books_per_product,
            inquiries_per_product: settings.inquiries_per_product,
        }
    }
}

/// Desk configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeskConfig {
    /// Directory holding the input feeds
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory historical and GUI output is appended to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Feed file names
    #[serde(default)]
    pub feeds: FeedNames,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Levels per side in a market data order book
    #[serde(default = "default_book_depth")]
    pub book_depth: usize,

    /// Seed for execution order ids; entropy when absent
    pub id_seed: Option<u64>,

    /// GUI throttle
    #[serde(default)]
    pub gui: GuiConfig,

    /// Sample feed generation
    #[serde(default)]
    pub generator: GeneratorConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_book_depth() -> usize {
    DEFAULT_BOOK_DEPTH
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            feeds: FeedNames::default(),
            log_level: default_log_level(),
            book_depth: default_book_depth(),
            id_seed: None,
            gui: GuiConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(mut self) -> Self {
        if let Ok(data_dir) = std::env::var("DESK_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(output_dir) = std::env::var("DESK_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("DESK_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(depth) = env_number("DESK_BOOK_DEPTH") {
            self.book_depth = depth;
        }

        if let Some(throttle) = env_number("DESK_GUI_THROTTLE_MS") {
            self.gui.throttle_ms = throttle;
        }

        if let Some(max_updates) = env_number("DESK_GUI_MAX_UPDATES") {
            self.gui.max_updates = max_updates;
        }

        if let Some(seed) = env_number("DESK_SEED") {
            self.generator.seed = seed;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.data_dir.as_os_str().is_empty() {
            errors.push("data_dir cannot be empty".to_string());
        }

        if self.output_dir.as_os_str().is_empty() {
            errors.push("output_dir cannot be empty".to_string());
        }

        for (feed, name) in [
            ("prices", &self.feeds.prices),
            ("trades", &self.feeds.trades),
            ("market_data", &self.feeds.market_data),
            ("inquiries", &self.feeds.inquiries),
        ] {
            if name.trim().is_empty() {
                errors.push(format!("feeds.{} cannot be empty", feed));
            }
        }

        if self.book_depth == 0 || self.book_depth > MAX_BOOK_DEPTH {
            errors.push(format!(
                "book_depth {} must be between 1 and {}",
                self.book_depth, MAX_BOOK_DEPTH
            ));
        }

        if self.gui.max_updates == 0 {
            errors.push("gui.max_updates must be greater than 0".to_string());
        }

        if self.generator.seed == 0 {
            errors.push("generator.seed must be non-zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (or defaults) with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Paths of the four input feeds
    pub fn feed_files(&self) -> FeedFiles {
        FeedFiles {
            prices: self.data_dir.join(&self.feeds.prices),
            trades: self.data_dir.join(&self.feeds.trades),
            market_data: self.data_dir.join(&self.feeds.market_data),
            inquiries: self.data_dir.join(&self.feeds.inquiries),
        }
    }

    /// Pipeline options; GUI updates go to `gui.txt` in the output directory
    pub fn desk_options(&self) -> DeskOptions {
        DeskOptions {
            book_depth: self.book_depth,
            gui_throttle_ms: self.gui.throttle_ms,
            gui_max_updates: self.gui.max_updates,
            gui_output: Some(self.output_dir.join("gui.txt")),
            id_seed: self.id_seed,
        }
    }

    /// Sample feed generator settings
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            seed: self.generator.seed,
            prices_per_product: self.generator.prices_per_product,
            trades_per_product: self.generator.trades_per_product,
            books_per_product: self.generator.books_per_product,
            book_depth: self.book_depth,
            inquiries_per_product: self.generator.inquiries_per_product,
        }
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.trim().parse().ok())
}

/// Configuration error type
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_errors(config: &DeskConfig) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Validation(errors)) => errors,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();
        assert_eq!(config.book_depth, 5);
        assert_eq!(config.gui.throttle_ms, 300);
        assert_eq!(config.gui.max_updates, 100);
        assert_eq!(config.feeds.market_data, "marketdata.txt");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DeskConfig::from_toml(
            r#"
            data_dir = "feeds"
            book_depth = 3

            [gui]
            throttle_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("feeds"));
        assert_eq!(config.book_depth, 3);
        assert_eq!(config.gui.throttle_ms, 0);
        assert_eq!(config.gui.max_updates, 100);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.feeds, FeedNames::default());
    }

    #[test]
    fn test_parse_error() {
        let result = DeskConfig::from_toml("book_depth = \"deep\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = DeskConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn test_env_override() {
        std::env::set_var("DESK_BOOK_DEPTH", "2");
        std::env::set_var("DESK_SEED", "not-a-number");
        let config = DeskConfig::default().with_env_override();
        assert_eq!(config.book_depth, 2);
        assert_eq!(config.generator.seed, 1);
        std::env::remove_var("DESK_BOOK_DEPTH");
        std::env::remove_var("DESK_SEED");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = DeskConfig::default();
        config.log_level = "loud".to_string();
        assert!(validation_errors(&config).iter().any(|e| e.contains("log_level")));
    }

    #[test]
    fn test_validate_valid_log_levels() {
        for level in &["trace", "debug", "info", "warn", "error", "INFO"] {
            let mut config = DeskConfig::default();
            config.log_level = level.to_string();
            assert!(config.validate().is_ok(), "Log level '{}' should be valid", level);
        }
    }

    #[test]
    fn test_validate_book_depth_range() {
        let mut config = DeskConfig::default();
        config.book_depth = 0;
        assert!(validation_errors(&config).iter().any(|e| e.contains("book_depth")));
        config.book_depth = MAX_BOOK_DEPTH + 1;
        assert!(validation_errors(&config).iter().any(|e| e.contains("book_depth")));
    }

    #[test]
    fn test_validate_multiple_errors() {
        let mut config = DeskConfig::default();
        config.data_dir = PathBuf::new();
        config.feeds.trades = " ".to_string();
        config.gui.max_updates = 0;
        config.generator.seed = 0;

        let errors = validation_errors(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("feeds.trades")));
    }

    #[test]
    fn test_derived_settings() {
        let mut config = DeskConfig::default();
        config.data_dir = PathBuf::from("in");
        config.output_dir = PathBuf::from("out");
        config.id_seed = Some(9);

        let files = config.feed_files();
        assert_eq!(files.market_data, PathBuf::from("in/marketdata.txt"));

        let options = config.desk_options();
        assert_eq!(options.gui_output, Some(PathBuf::from("out/gui.txt")));
        assert_eq!(options.id_seed, Some(9));

        assert_eq!(config.generator_settings().book_depth, 5);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Validation(vec!["Error 1".to_string(), "Error 2".to_string()]);
        let display = error.to_string();
        assert!(display.contains("Error 1; Error 2"));
    }
}
