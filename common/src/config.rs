use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub printer: PrinterConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The printer host running Moonraker and the webcam streamer.
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_websocket_path")]
    pub websocket_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Full snapshot URL. When unset it is built from `printer.host` and `path`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_snapshot_path")]
    pub path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            websocket_path: default_websocket_path(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            url: None,
            path: default_snapshot_path(),
            timeout_secs: default_timeout_secs(),
            base_dir: default_base_dir(),
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Moonraker control channel, e.g. `ws://127.0.0.1/websocket`.
    pub fn websocket_url(&self) -> String {
        format!("ws://{}{}", self.printer.host, self.printer.websocket_path)
    }

    pub fn snapshot_url(&self) -> String {
        match &self.snapshot.url {
            Some(url) => url.clone(),
            None => format!("http://{}{}", self.printer.host, self.snapshot.path),
        }
    }

    pub fn snapshot_timeout(&self) -> Duration {
        Duration::from_secs(self.snapshot.timeout_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_websocket_path() -> String {
    "/websocket".into()
}
fn default_snapshot_path() -> String {
    "/webcam/?action=snapshot".into()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_base_dir() -> PathBuf {
    PathBuf::from("/home/cp/timelapse_frames")
}
fn default_marker() -> String {
    "SNAP".into()
}
fn default_log_level() -> String {
    "info".into()
}
