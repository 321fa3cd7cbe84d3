//! Configuration management for the furqan corpus service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{FurqanError, Result};
use crate::core::xdg::{XdgDirs, SNAPSHOT_FILE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Seed dataset locations
///
/// Only consulted when no corpus snapshot exists yet.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Verse records (JSON array)
    #[serde(default)]
    pub verses_file: Option<PathBuf>,

    /// Chapter Arabic name to diacritic-free name mapping
    #[serde(default)]
    pub chapter_names_file: Option<PathBuf>,

    /// Worded part labels keyed by part number
    #[serde(default)]
    pub part_names_file: Option<PathBuf>,

    /// Reject datasets that do not hold the full 30/114/6236 census
    #[serde(default = "default_require_complete")]
    pub require_complete: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the corpus snapshot
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Boost applied to matches on the diacritic-bearing text
    #[serde(default = "default_text_boost")]
    pub text_boost: f32,

    /// Boost applied to matches on the diacritic-free text
    #[serde(default = "default_clean_text_boost")]
    pub clean_text_boost: f32,

    /// Maximum completion options per suggestion
    #[serde(default = "default_completion_cap")]
    pub completion_cap: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Index writer heap budget in MB
    #[serde(default = "default_writer_memory_mb")]
    pub writer_memory_mb: usize,
}

/// Page size configuration shared by listings and search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,
}

// Default value functions
fn default_require_complete() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_text_boost() -> f32 {
    4.0
}

fn default_clean_text_boost() -> f32 {
    2.0
}

fn default_completion_cap() -> usize {
    5
}

fn default_max_query_length() -> usize {
    500
}

fn default_writer_memory_mb() -> usize {
    50
}

fn default_page_size() -> usize {
    100
}

fn default_max_page_size() -> usize {
    200
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            verses_file: None,
            chapter_names_file: None,
            part_names_file: None,
            require_complete: default_require_complete(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Path of the persisted corpus snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            text_boost: default_text_boost(),
            clean_text_boost: default_clean_text_boost(),
            completion_cap: default_completion_cap(),
            max_query_length: default_max_query_length(),
            writer_memory_mb: default_writer_memory_mb(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_sec: default_request_timeout(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| FurqanError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. FURQAN_CONFIG env var
    /// 2. XDG config file (~/.config/furqan/config.toml)
    /// 3. ./furqan.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("FURQAN_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("furqan.toml").exists() {
                Self::from_file("furqan.toml")?
            } else {
                Self::default()
            }
        };

        if env::var("FURQAN_DATA_DIR").is_err() && config.storage.data_dir == default_data_dir() {
            config.storage.data_dir = xdg.data_dir.clone();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Corpus
        if let Ok(path) = env::var("FURQAN_VERSES_FILE") {
            self.corpus.verses_file = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("FURQAN_CHAPTER_NAMES_FILE") {
            self.corpus.chapter_names_file = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("FURQAN_PART_NAMES_FILE") {
            self.corpus.part_names_file = Some(PathBuf::from(path));
        }

        // Storage
        if let Ok(data_dir) = env::var("FURQAN_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        // Search
        if let Some(boost) = parse_env("FURQAN_TEXT_BOOST") {
            self.search.text_boost = boost;
        }
        if let Some(boost) = parse_env("FURQAN_CLEAN_TEXT_BOOST") {
            self.search.clean_text_boost = boost;
        }
        if let Some(cap) = parse_env("FURQAN_COMPLETION_CAP") {
            self.search.completion_cap = cap;
        }
        if let Some(len) = parse_env("FURQAN_MAX_QUERY_LENGTH") {
            self.search.max_query_length = len;
        }

        // Pagination
        if let Some(size) = parse_env("FURQAN_DEFAULT_PAGE_SIZE") {
            self.pagination.default_page_size = size;
        }
        if let Some(size) = parse_env("FURQAN_MAX_PAGE_SIZE") {
            self.pagination.max_page_size = size;
        }

        // Server
        if let Ok(host) = env::var("FURQAN_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("FURQAN_PORT") {
            self.server.port = port;
        }

        // Limits
        if let Some(timeout) = parse_env("FURQAN_REQUEST_TIMEOUT_SEC") {
            self.limits.request_timeout_sec = timeout;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let boost_ok = |b: f32| b.is_finite() && b > 0.0;
        if !boost_ok(self.search.text_boost) || !boost_ok(self.search.clean_text_boost) {
            return Err(FurqanError::ConfigError(
                "Field boosts must be positive".to_string(),
            ));
        }

        if self.search.completion_cap == 0 {
            return Err(FurqanError::ConfigError(
                "Completion cap must be non-zero".to_string(),
            ));
        }

        if self.search.max_query_length == 0 {
            return Err(FurqanError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        if self.search.writer_memory_mb < 15 {
            return Err(FurqanError::ConfigError(
                "Index writer memory must be at least 15 MB".to_string(),
            ));
        }

        if self.pagination.default_page_size == 0 {
            return Err(FurqanError::ConfigError(
                "Default page size must be non-zero".to_string(),
            ));
        }

        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(FurqanError::ConfigError(
                "Default page size cannot exceed max page size".to_string(),
            ));
        }

        if self.limits.request_timeout_sec == 0 {
            return Err(FurqanError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Data dir: {:?}", self.storage.data_dir);
        tracing::info!("  Verses file: {:?}", self.corpus.verses_file);
        tracing::info!("  Chapter names file: {:?}", self.corpus.chapter_names_file);
        tracing::info!("  Part names file: {:?}", self.corpus.part_names_file);
        tracing::info!("  Require complete corpus: {}", self.corpus.require_complete);
        tracing::info!(
            "  Boosts: text^{} clean_text^{}",
            self.search.text_boost,
            self.search.clean_text_boost
        );
        tracing::info!("  Completion cap: {}", self.search.completion_cap);
        tracing::info!(
            "  Page size: {} (max {})",
            self.pagination.default_page_size,
            self.pagination.max_page_size
        );
        tracing::info!("  Request timeout: {}s", self.limits.request_timeout_sec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.text_boost, 4.0);
        assert_eq!(config.search.clean_text_boost, 2.0);
        assert_eq!(config.search.completion_cap, 5);
        assert_eq!(config.pagination.default_page_size, 100);
        assert_eq!(config.pagination.max_page_size, 200);
        assert!(config.corpus.require_complete);
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_page_sizes() {
        let mut config = Config::default();
        config.pagination.default_page_size = 300;
        assert!(config.validate().is_err());

        config = Config::default();
        config.pagination.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_boosts() {
        let mut config = Config::default();
        config.search.clean_text_boost = 0.0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.search.text_boost = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_limits_validation() {
        let mut config = Config::default();
        config.limits.request_timeout_sec = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.search.writer_memory_mb = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_env_var_override() {
        env::set_var("FURQAN_COMPLETION_CAP", "8");
        env::set_var("FURQAN_PORT", "9100");
        env::set_var("FURQAN_VERSES_FILE", "/data/hafs.json");

        let mut config = Config::default();
        config.merge_env();

        assert_eq!(config.search.completion_cap, 8);
        assert_eq!(config.server.port, 9100);
        assert_eq!(
            config.corpus.verses_file,
            Some(PathBuf::from("/data/hafs.json"))
        );

        env::remove_var("FURQAN_COMPLETION_CAP");
        env::remove_var("FURQAN_PORT");
        env::remove_var("FURQAN_VERSES_FILE");
    }

    #[test]
    #[serial]
    fn test_unparsable_env_value_is_ignored() {
        env::set_var("FURQAN_MAX_PAGE_SIZE", "lots");

        let mut config = Config::default();
        config.merge_env();
        assert_eq!(config.pagination.max_page_size, 200);

        env::remove_var("FURQAN_MAX_PAGE_SIZE");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml = r#"
            [corpus]
            verses_file = "/srv/quran/hafsData_v18.json"
            chapter_names_file = "/srv/quran/clean_names.json"
            require_complete = false

            [storage]
            data_dir = "/var/lib/furqan"

            [search]
            text_boost = 3.0
            completion_cap = 10

            [pagination]
            default_page_size = 50
            max_page_size = 150

            [server]
            port = 8080

            [limits]
            request_timeout_sec = 5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.search.text_boost, 3.0);
        assert_eq!(config.search.clean_text_boost, 2.0);
        assert_eq!(config.search.completion_cap, 10);
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(!config.corpus.require_complete);
        assert_eq!(config.corpus.part_names_file, None);
        assert_eq!(
            config.storage.snapshot_path(),
            PathBuf::from("/var/lib/furqan/corpus.json")
        );
    }
}
