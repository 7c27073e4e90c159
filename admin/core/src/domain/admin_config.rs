// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Admin Configuration Types
//
// Defines the configuration schema for the admin API server:
// - Base domain tenants register under
// - HTTP bind address and port
// - Storage backend (in-memory or PostgreSQL)
// - Logging level and format

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::repository::{PostgresConfig, StorageBackend};

/// Top-level admin configuration (`collab-admin.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared base domain, e.g. `collab.example.com`
    #[serde(default)]
    pub base_domain: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_api_port")]
    pub port: u16,
}

/// Where domains, patterns, records and captured traffic live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Process-local maps; lost on restart
    InMemory,
    Postgres {
        url: String,
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::InMemory
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_domain: String::new(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StorageConfig {
    pub fn to_backend(&self) -> StorageBackend {
        match self {
            Self::InMemory => StorageBackend::InMemory,
            Self::Postgres { url, max_connections } => StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: url.clone(),
                max_connections: *max_connections,
            }),
        }
    }
}

impl AdminConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Config file locations in precedence order:
    /// 1. COLLAB_CONFIG_PATH environment variable
    /// 2. ./collab-admin.yaml (working directory)
    /// 3. ~/.collab/admin.yaml (user home)
    /// 4. /etc/collab/admin.yaml (Unix)
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("COLLAB_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./collab-admin.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".collab").join("admin.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/collab/admin.yaml"));

        paths
    }

    /// First existing file among [`Self::candidate_paths`]
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must load
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            Self::from_yaml_file(config_path)?
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides so container deployments can
    /// configure the server without a file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_domain) = lookup("BASE_DOMAIN") {
            tracing::info!("Environment override: BASE_DOMAIN={}", base_domain);
            self.base_domain = base_domain;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            tracing::info!("Environment override: DATABASE_URL (storage backend set to postgres)");
            let max_connections = match &self.storage {
                StorageConfig::Postgres { max_connections, .. } => *max_connections,
                StorageConfig::InMemory => default_max_connections(),
            };
            self.storage = StorageConfig::Postgres { url, max_connections };
        }

        if let Some(port) = lookup("COLLAB_PORT") {
            match port.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: COLLAB_PORT={}", port);
                    self.server.port = port;
                }
                Err(_) => {
                    tracing::warn!("Invalid value for COLLAB_PORT: '{}'. Ignoring.", port);
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_domain.is_empty() {
            anyhow::bail!("base_domain cannot be empty (set it in the config file or BASE_DOMAIN)");
        }

        if self.base_domain.starts_with('.') || self.base_domain.ends_with('.') {
            anyhow::bail!(
                "base_domain '{}' must not start or end with '.'",
                self.base_domain
            );
        }

        if self.base_domain.chars().any(char::is_whitespace) {
            anyhow::bail!("base_domain '{}' must not contain whitespace", self.base_domain);
        }

        if let StorageConfig::Postgres { url, max_connections } = &self.storage {
            if url.is_empty() {
                anyhow::bail!("storage.url cannot be empty for the postgres backend");
            }
            if *max_connections == 0 {
                anyhow::bail!("storage.max_connections must be at least 1");
            }
        }

        match self.logging.format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("Invalid logging.format: '{}'. Must be 'json' or 'text'", other),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AdminConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.storage, StorageConfig::InMemory);
        assert_eq!(config.logging.level, "info");
        // No base domain: must be configured explicitly
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
base_domain: collab.example.com
server:
  port: 8080
storage:
  backend: postgres
  url: postgres://collab@db/collab
logging:
  format: json
"#;
        let config = AdminConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_domain, "collab.example.com");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(
            config.storage.to_backend(),
            StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: "postgres://collab@db/collab".to_string(),
                max_connections: 5,
            })
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collab-admin.yaml");
        let mut config = AdminConfig::default();
        config.base_domain = "oob.test".to_string();
        std::fs::write(&path, config.to_yaml_string().unwrap()).unwrap();

        let loaded = AdminConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.base_domain, "oob.test");
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AdminConfig::load_or_default(Some(dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BASE_DOMAIN", "env.test"),
            ("DATABASE_URL", "postgres://localhost/collab"),
            ("COLLAB_PORT", "not-a-port"),
        ]);

        let mut config = AdminConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_domain, "env.test");
        assert_eq!(config.server.port, 5000);
        assert!(matches!(config.storage, StorageConfig::Postgres { ref url, .. } if url == "postgres://localhost/collab"));
    }

    #[test]
    fn test_validation() {
        let mut config = AdminConfig {
            base_domain: "collab.test".to_string(),
            ..AdminConfig::default()
        };
        assert!(config.validate().is_ok());

        config.base_domain = ".collab.test".to_string();
        assert!(config.validate().is_err());
        config.base_domain = "collab.test".to_string();

        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
        config.logging.format = "text".to_string();

        config.storage = StorageConfig::Postgres {
            url: String::new(),
            max_connections: 5,
        };
        assert!(config.validate().is_err());
    }
}
