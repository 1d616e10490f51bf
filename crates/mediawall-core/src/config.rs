use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of masonry columns
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Gap between tiles in pixels
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Outer padding of the grid in pixels
    #[serde(default = "default_padding")]
    pub padding: f64,
    /// Extra margin above and below the viewport that stays mounted
    #[serde(default = "default_viewport_buffer")]
    pub viewport_buffer: f64,
    /// Minimum interval between viewport recomputes, in milliseconds
    #[serde(default = "default_viewport_interval")]
    pub viewport_interval_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            gap: default_gap(),
            padding: default_padding(),
            viewport_buffer: default_viewport_buffer(),
            viewport_interval_ms: default_viewport_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Autoscroll speed multiplier
    #[serde(default = "default_scroll_speed")]
    pub speed: f64,
    /// Start with autoscroll enabled
    #[serde(default)]
    pub autostart: bool,
    /// Tick rate of the frame loop in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed: default_scroll_speed(),
            autostart: false,
            tick_rate_ms: default_tick_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Delay before the single empty-result retry, in milliseconds
    #[serde(default = "default_retry_delay")]
    pub empty_retry_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            empty_retry_delay_ms: default_retry_delay(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.local/share/mediawall")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_columns() -> u32 {
    5
}

fn default_gap() -> f64 {
    6.0
}

fn default_padding() -> f64 {
    30.0
}

fn default_viewport_buffer() -> f64 {
    1500.0
}

fn default_viewport_interval() -> u64 {
    32
}

fn default_scroll_speed() -> f64 {
    1.0
}

fn default_tick_rate() -> u64 {
    33
}

fn default_page_size() -> u32 {
    50
}

fn default_retry_delay() -> u64 {
    2000
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the configuration file path
    /// Always uses ~/.config/mediawall/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("mediawall")
            .join("config.toml")
    }

    /// Get the database file path
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join("mediawall.db")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

/// Expand a leading tilde to the user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
