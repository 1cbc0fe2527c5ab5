//! Server configuration
//!
//! Layered configuration: built-in defaults, overridden by an optional
//! `config/server.toml` file, overridden by `CHAT_`-prefixed environment
//! variables (e.g. `CHAT_PORT=9000`).

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ServerError;

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from defaults, file, and environment.
    pub fn load() -> Result<Self, ServerError> {
        let defaults = ServerConfig::default();
        let settings = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .add_source(File::with_name("config/server").required(false))
            .add_source(Environment::with_prefix("CHAT"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
