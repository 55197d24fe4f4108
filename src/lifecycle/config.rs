//! # Configuration
//!
//! Settings are layered with the `config` crate, later sources overriding earlier ones:
//!
//! 1. `config/default.toml`
//! 2. `config/{RUN_MODE}.toml` (`RUN_MODE` defaults to `development`)
//! 3. `config/local.toml`, meant to stay out of version control
//! 4. Environment variables prefixed with `ORDERS`, using `__` as the separator
//!
//! ```bash
//! ORDERS__FULFILLMENT__USERNAME=svc-orders ORDERS__FULFILLMENT__PASSWORD=secret cargo run
//! ```
//!
//! All file sources are optional; a missing credential is reported when the merged
//! settings are deserialized.
use serde::Deserialize;
use std::env;
use std::fmt;

/// Service account the orchestrator uses to open fulfillment sessions.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct FulfillmentCredentials {
    pub username: String,
    pub password: String,
}

impl FulfillmentCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps the password out of `?credentials` log fields.
impl fmt::Debug for FulfillmentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FulfillmentCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Mailbox capacity of the in-memory fulfillment actor.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    32
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub fulfillment: FulfillmentCredentials,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("ORDERS").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Builds the configuration from an inline TOML document, without touching
    /// the filesystem or the environment.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
