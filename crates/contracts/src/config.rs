//! TailConfig - Config Loader output
//!
//! Describes the tailed file, the delivery target and the pacing of both loops.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default read chunk size: 512 KiB
pub const DEFAULT_CHUNK_SIZE: usize = 524_288;

/// Largest accepted read chunk size: 64 MiB
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Default seconds between file polls
pub const DEFAULT_INGEST_INTERVAL_SECS: f64 = 1.0;

/// Default seconds between delivery attempts
pub const DEFAULT_FLUSH_INTERVAL_SECS: f64 = 5.0;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TailConfig {
    /// Tailed file and polling
    #[serde(default)]
    pub source: SourceConfig,

    /// Where chunks are delivered
    #[serde(default)]
    pub target: DispatchTarget,

    /// Delivery pacing and notifier selection
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// Tailed file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path of the append-only file (required, may come from the CLI)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum bytes consumed per poll
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Seconds between polls
    #[serde(default = "default_ingest_interval")]
    pub ingest_interval_secs: f64,
}

impl SourceConfig {
    /// Poll interval as a `Duration`
    ///
    /// Negative or non-finite values collapse to zero; validation rejects them
    /// before a pipeline is built.
    pub fn ingest_interval(&self) -> Duration {
        secs_to_duration(self.ingest_interval_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            ingest_interval_secs: DEFAULT_INGEST_INTERVAL_SECS,
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_ingest_interval() -> f64 {
    DEFAULT_INGEST_INTERVAL_SECS
}

/// Delivery target: endpoint address and channel identity.
///
/// Set once at startup, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTarget {
    /// Webhook URL (or any notifier-specific address)
    #[serde(default)]
    pub endpoint: String,

    /// Channel / topic name, e.g. `#alerts`
    #[serde(default)]
    pub topic: String,
}

impl DispatchTarget {
    /// Create a new target
    pub fn new(endpoint: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            topic: topic.into(),
        }
    }
}

/// Delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Cooldown in seconds after every delivery attempt
    #[serde(default = "default_flush_interval")]
    pub flush_interval_secs: f64,

    /// Notifier implementation
    #[serde(default)]
    pub notifier: NotifierKind,

    /// Optional display name attached to posted messages
    #[serde(default)]
    pub username: Option<String>,
}

impl DeliveryConfig {
    /// Cooldown as a `Duration`
    pub fn flush_interval(&self) -> Duration {
        secs_to_duration(self.flush_interval_secs)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            notifier: NotifierKind::default(),
            username: None,
        }
    }
}

fn default_flush_interval() -> f64 {
    DEFAULT_FLUSH_INTERVAL_SECS
}

/// Notifier implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    /// HTTP chat webhook
    #[default]
    Webhook,
    /// Log messages only (dry run)
    Log,
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TailConfig::default();
        assert_eq!(config.source.chunk_size, 524_288);
        assert_eq!(config.source.ingest_interval(), Duration::from_secs(1));
        assert_eq!(config.delivery.flush_interval(), Duration::from_secs(5));
        assert_eq!(config.delivery.notifier, NotifierKind::Webhook);
        assert!(config.source.path.is_none());
    }

    #[test]
    fn test_fractional_intervals() {
        let source = SourceConfig {
            ingest_interval_secs: 0.25,
            ..Default::default()
        };
        assert_eq!(source.ingest_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_interval_collapses_to_zero() {
        let delivery = DeliveryConfig {
            flush_interval_secs: -1.0,
            ..Default::default()
        };
        assert_eq!(delivery.flush_interval(), Duration::ZERO);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: TailConfig = toml::from_str(
            r##"
[target]
endpoint = "https://hooks.example.com/T0/B0"
topic = "#ops"

[delivery]
notifier = "log"
"##,
        )
        .unwrap();
        assert_eq!(config.target.topic, "#ops");
        assert_eq!(config.delivery.notifier, NotifierKind::Log);
        assert_eq!(config.delivery.flush_interval_secs, 5.0);
        assert_eq!(config.source.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_deserialize_json() {
        let config: TailConfig = serde_json::from_str(
            r#"{ "source": { "path": "/var/log/app.log", "ingest_interval_secs": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.source.path, Some(PathBuf::from("/var/log/app.log")));
        assert_eq!(config.source.ingest_interval(), Duration::from_millis(500));
    }
}
