use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "MEDISIM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "medisim.yaml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub tick_interval_secs: u64,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
    pub log_capacity: usize,
    pub http: HttpConf,
    pub mqtt: Option<MqttConf>,
    pub notifier: NotifierKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HttpConf {
    pub bind: SocketAddr,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MqttConf {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_telemetry_topic")]
    pub telemetry_topic: String,
    #[serde(default = "default_alert_topic")]
    pub alert_topic: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Writes alerts to the tracing output only.
    Log,
    /// Publishes alerts on `mqtt.alert_topic`.
    Mqtt,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_client_id() -> String {
    "medisim-monitor".into()
}

fn default_telemetry_topic() -> String {
    "medisim/devices/telemetry@v1".into()
}

fn default_alert_topic() -> String {
    "medisim/devices/alert@v1".into()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 5,
            seed: None,
            log_capacity: 50,
            http: HttpConf::default(),
            mqtt: None,
            notifier: NotifierKind::Log,
        }
    }
}

impl Default for HttpConf {
    fn default() -> Self {
        Self { bind: SocketAddr::from(([0, 0, 0, 0], 8080)) }
    }
}

impl Default for MqttConf {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            client_id: default_client_id(),
            telemetry_topic: default_telemetry_topic(),
            alert_topic: default_alert_topic(),
        }
    }
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_secs == 0 {
            return Err(ConfigError::Invalid("tick_interval_secs must be at least 1".into()));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("log_capacity must be at least 1".into()));
        }
        if self.notifier == NotifierKind::Mqtt && self.mqtt.is_none() {
            return Err(ConfigError::Invalid("notifier 'mqtt' needs an mqtt section".into()));
        }
        Ok(())
    }
}

/// Parses a YAML document. Empty text yields the defaults.
pub fn parse_config(txt: &str) -> Result<MonitorConfig, ConfigError> {
    if txt.trim().is_empty() {
        return Ok(MonitorConfig::default());
    }
    let config: MonitorConfig = serde_yaml::from_str(txt)?;
    config.validate()?;
    Ok(config)
}

pub async fn load_config_from(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
    let txt = fs::read_to_string(path).await?;
    parse_config(&txt)
}

/// Loads `$MEDISIM_CONFIG` (default `medisim.yaml`). A missing or invalid
/// file is reported and replaced by the defaults.
pub async fn load_config() -> MonitorConfig {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    if !Path::new(&path).exists() {
        info!("no {path}, using default configuration");
        return MonitorConfig::default();
    }
    match load_config_from(&path).await {
        Ok(config) => {
            info!("loaded configuration from {path}");
            config
        }
        Err(e) => {
            warn!("invalid configuration in {path}: {e}; using defaults");
            MonitorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("  \n").unwrap(), MonitorConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("tick_interval_secs: 1\nseed: 42\n").unwrap();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_capacity, 50);
        assert_eq!(config.notifier, NotifierKind::Log);
    }

    #[test]
    fn test_mqtt_section_defaults_topics() {
        let yaml = "notifier: mqtt\nmqtt:\n  host: broker.local\n  port: 1884\n";
        let config = parse_config(yaml).unwrap();
        let mqtt = config.mqtt.unwrap();
        assert_eq!(mqtt.host, "broker.local");
        assert_eq!(mqtt.alert_topic, "medisim/devices/alert@v1");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(parse_config("tick_interval_secs: 0"), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse_config("notifier: mqtt"), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse_config("log_capacity: [1, 2]"), Err(ConfigError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medisim.yaml");
        tokio::fs::write(&path, "log_capacity: 10\nhttp:\n  bind: 127.0.0.1:9090\n").await.unwrap();

        let config = load_config_from(&path).await.unwrap();
        assert_eq!(config.log_capacity, 10);
        assert_eq!(config.http.bind, SocketAddr::from(([127, 0, 0, 1], 9090)));
    }
}
