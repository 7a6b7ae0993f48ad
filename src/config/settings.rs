use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for both the server and the message broker.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the server will bind to, and the log level.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Configuration settings for the broker.
///
/// Controls the at-least-once recovery parameters: how long a consumed
/// message may stay unacknowledged before it is dead-lettered, and how often
/// the expiry sweep runs.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub ack_timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
}

/// Partial server settings.
///
/// Used when loading server configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Partial broker settings.
///
/// Used for broker configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub ack_timeout_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                log_level: "info".to_string(),
            },
            broker: BrokerSettings {
                ack_timeout_secs: 30,
                sweep_interval_secs: 5,
            },
        }
    }
}
