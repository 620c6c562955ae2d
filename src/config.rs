use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = ".codescope";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search orchestration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum age of the symbol index before it is rebuilt
    #[serde(default = "default_index_ttl_secs")]
    pub index_ttl_secs: u64,

    /// Maximum age of a cached query result
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Number of results returned when the caller does not ask for a limit
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Lines of context around definitions, usages and semantic hits
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Lines of context around implementation hits
    #[serde(default = "default_implementation_context_lines")]
    pub implementation_context_lines: usize,

    /// Maximum number of related symbol names attached to a result
    #[serde(default = "default_related_symbols_limit")]
    pub related_symbols_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_ttl_secs: default_index_ttl_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            default_max_results: default_max_results(),
            context_lines: default_context_lines(),
            implementation_context_lines: default_implementation_context_lines(),
            related_symbols_limit: default_related_symbols_limit(),
        }
    }
}

impl SearchConfig {
    pub fn index_ttl(&self) -> Duration {
        Duration::from_secs(self.index_ttl_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn default_index_ttl_secs() -> u64 {
    3600
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_max_results() -> usize {
    20
}

fn default_context_lines() -> usize {
    3
}

fn default_implementation_context_lines() -> usize {
    10
}

fn default_related_symbols_limit() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Directory names never descended into (in addition to .gitignore)
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
            follow_links: false,
        }
    }
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "target".to_string(),
        "build".to_string(),
        "dist".to_string(),
        ".git".to_string(),
        ".gradle".to_string(),
        "__pycache__".to_string(),
        ".eggs".to_string(),
        ".venv".to_string(),
        "venv".to_string(),
        "vendor".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a rolling file
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Level for the file log: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory (relative paths resolve against the project root)
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Rotation: minutely, hourly, daily, never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Log file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            rotation: default_rotation(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("logs")
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_file_prefix() -> String {
    "codescope.log".to_string()
}

impl Config {
    /// Load configuration from the .codescope directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .codescope directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .codescope directory
    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    /// Check if codescope has a config in the given directory
    pub fn is_initialized(root: &Path) -> bool {
        Self::config_dir(root).join(CONFIG_FILE).exists()
    }
}
