//! Configuration for Mailcast

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IMAP server configuration
    pub imap: ImapConfig,

    /// Harvest pipeline configuration
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Kafka publisher configuration
    pub kafka: KafkaConfig,

    /// Telegram progress notifier configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// IMAP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImapConfig {
    /// IMAP host to harvest from
    pub host: String,

    /// IMAPS port
    #[serde(default = "default_imap_port")]
    pub port: u16,
}

fn default_imap_port() -> u16 {
    993
}

/// Harvest pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Path to the JSON accounts file
    #[serde(default = "default_accounts_file")]
    pub accounts_file: PathBuf,

    /// Messages per page when slicing a folder listing
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Page indices fetched per batch within one folder
    #[serde(default = "default_page_batch")]
    pub page_batch: usize,

    /// Accounts processed concurrently per group
    #[serde(default = "default_account_batch")]
    pub account_batch: usize,

    /// Folder name that is never harvested
    #[serde(default = "default_reserved_folder")]
    pub reserved_folder: String,

    /// Retry count for page fetches
    #[serde(default = "default_fetch_retries")]
    pub fetch_retries: u32,

    /// Delay between fetch retries in seconds
    #[serde(default = "default_fetch_delay_secs")]
    pub fetch_delay_secs: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            accounts_file: default_accounts_file(),
            page_size: default_page_size(),
            page_batch: default_page_batch(),
            account_batch: default_account_batch(),
            reserved_folder: default_reserved_folder(),
            fetch_retries: default_fetch_retries(),
            fetch_delay_secs: default_fetch_delay_secs(),
        }
    }
}

fn default_accounts_file() -> PathBuf {
    PathBuf::from("accounts.json")
}

fn default_page_size() -> u32 {
    200
}

fn default_page_batch() -> usize {
    2
}

fn default_account_batch() -> usize {
    5
}

fn default_reserved_folder() -> String {
    "WEBMAIL_SCHEDULED".to_string()
}

fn default_fetch_retries() -> u32 {
    10
}

fn default_fetch_delay_secs() -> u64 {
    1
}

/// Kafka publisher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Bootstrap broker addresses
    pub bootstrap_servers: Vec<String>,

    /// Topic every message event is published to
    pub topic: String,

    /// Acknowledgment mode (default: wait for all replicas)
    #[serde(default = "default_acks")]
    pub acks: String,

    /// Retry count for connect and publish
    #[serde(default = "default_kafka_retries")]
    pub retries: u32,

    /// Delay between retries in seconds
    #[serde(default = "default_kafka_delay_secs")]
    pub delay_secs: u64,

    /// Per-record delivery timeout in milliseconds
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,

    /// Security protocol (e.g. "SASL_SSL"); plaintext when absent
    pub security_protocol: Option<String>,

    /// SASL mechanism (e.g. "PLAIN", "SCRAM-SHA-512")
    pub sasl_mechanism: Option<String>,

    /// SASL username
    pub sasl_username: Option<String>,

    /// SASL password
    pub sasl_password: Option<String>,
}

fn default_acks() -> String {
    "all".to_string()
}

fn default_kafka_retries() -> u32 {
    3
}

fn default_kafka_delay_secs() -> u64 {
    1
}

fn default_message_timeout_ms() -> u64 {
    30_000
}

/// Telegram progress notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Enable progress notifications
    #[serde(default)]
    pub enabled: bool,

    /// Telegram Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,

    /// Bot API token
    #[serde(default)]
    pub api_token: String,

    /// Chat the progress messages are posted to
    #[serde(default)]
    pub chat_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_telegram_api_url(),
            api_token: String::new(),
            chat_id: String::new(),
            timeout_secs: default_telegram_timeout(),
        }
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_timeout() -> u64 {
    5
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> crate::Result<Self> {
        let paths = [
            std::path::PathBuf::from("./mailcast.toml"),
            std::path::PathBuf::from("/etc/mailcast/mailcast.toml"),
        ];

        for path in paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(crate::Error::Config(
            "No configuration file found".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_harvest_config() {
        let harvest = HarvestConfig::default();
        assert_eq!(harvest.page_size, 200);
        assert_eq!(harvest.page_batch, 2);
        assert_eq!(harvest.account_batch, 5);
        assert_eq!(harvest.reserved_folder, "WEBMAIL_SCHEDULED");
        assert_eq!(harvest.fetch_retries, 10);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[imap]
host = "imap.example.com"

[harvest]
page_size = 100

[kafka]
bootstrap_servers = ["broker1:9092", "broker2:9092"]
topic = "mail-events"

[telegram]
enabled = true
api_token = "token"
chat_id = "42"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.imap.host, "imap.example.com");
        assert_eq!(config.imap.port, 993);
        assert_eq!(config.harvest.page_size, 100);
        assert_eq!(config.harvest.page_batch, 2);
        assert_eq!(config.kafka.bootstrap_servers.len(), 2);
        assert_eq!(config.kafka.acks, "all");
        assert_eq!(config.kafka.security_protocol, None);
        assert!(config.telegram.enabled);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
    }
}
