// src/config.rs - Process-level configuration (server, database, logging)
//
// Distinct from `models::config::GlobalConfig`, which is a catalogue row
// governing portioning behaviour. This `Config` governs the process: where
// it listens, where its database lives, how verbosely it logs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_permissive: true,
            },
            database: DatabaseConfig {
                url: "sqlite://banquet.db".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults for any missing
    /// section, and finally letting `BANQUET_*` environment variables win.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("BANQUET_DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(port) = std::env::var("BANQUET_PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("BANQUET_PORT is not a valid port: {port}"))?;
        }
        if let Ok(level) = std::env::var("BANQUET_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_binds_to_port_3000() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.server.port, deserialized.server.port);
        assert_eq!(config.database.url, deserialized.database.url);
    }

    #[test]
    fn loads_overrides_from_a_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("banquet_engine.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
host = "127.0.0.1"
port = 8080
cors_permissive = false

[database]
url = "sqlite://test.db"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://test.db");
        assert!(!config.server.cors_permissive);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("does_not_exist.toml");
        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.server.port, Config::default().server.port);
    }
}
