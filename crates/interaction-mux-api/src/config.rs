//! Service configuration.
//!
//! Every section and field has a default so a partial file (or environment
//! overrides alone) produce a complete configuration. Only the application
//! public key has no usable default; [`ServiceConfig::validate`] rejects a
//! configuration without one.

use crate::errors::ConfigError;
use crate::verify::SignatureVerifier;
use interaction_mux_core::{BotToken, Snowflake};
use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Platform application credentials
    pub application: ApplicationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Check values that deserialization cannot reject on its own.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` if the public key is empty, or commands are to
    ///   be registered without a bot token
    /// - `ConfigError::Invalid` if the public key is not a valid hex encoded
    ///   Ed25519 key, the port is zero, or the base path does not start with `/`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application.public_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "application.public_key".to_string(),
            });
        }

        SignatureVerifier::new(&self.application.public_key, self.server.max_body_size)?;

        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must not be 0".to_string(),
            });
        }

        if !self.server.base_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "server.base_path must start with '/', got '{}'",
                    self.server.base_path
                ),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must not be 0".to_string(),
            });
        }

        if self.application.register_commands && self.application.bot_token.is_empty() {
            return Err(ConfigError::Missing {
                key: "application.bot_token".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path interactions are posted to
    pub base_path: String,

    /// Request timeout in seconds. The platform itself gives up after 3
    /// seconds.
    pub timeout_seconds: u64,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/".to_string(),
            timeout_seconds: 10,
            shutdown_timeout_seconds: 30,
            max_body_size: 8 * 1024 * 1024, // 8MB
        }
    }
}

/// Platform application credentials
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Hex encoded Ed25519 public key of the application
    pub public_key: String,

    /// Application id, used by the REST client
    pub application_id: Snowflake,

    /// Bot token for REST calls
    pub bot_token: BotToken,

    /// Overwrite the global command set at startup
    pub register_commands: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
