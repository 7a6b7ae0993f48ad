mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::Settings;
pub use settings::{BrokerSettings, ServerSettings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the server and broker configurations
///
/// Environment keys use `__` between the section and the field so that
/// snake_case field names survive the split: `SERVER__PORT=9100`,
/// `BROKER__ACK_TIMEOUT_SECS=60`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("__"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            log_level: partial
                .server
                .as_ref()
                .and_then(|s| s.log_level.clone())
                .unwrap_or(default.server.log_level),
        },
        broker: BrokerSettings {
            ack_timeout_secs: partial
                .broker
                .as_ref()
                .and_then(|b| b.ack_timeout_secs)
                .unwrap_or(default.broker.ack_timeout_secs),
            sweep_interval_secs: partial
                .broker
                .as_ref()
                .and_then(|b| b.sweep_interval_secs)
                .unwrap_or(default.broker.sweep_interval_secs),
        },
    })
}
