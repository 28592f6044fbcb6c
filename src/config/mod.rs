//! Configuration management
//!
//! Loads configuration for the WeekendExpress catalog from:
//! - config.yml file (optional, defaults apply when absent)
//! - Environment variables for secrets (override file settings):
//!   `ADMIN_EMAIL`, `ADMIN_PASSWORD`, `SESSION_SECRET`
//!
//! Missing optional values are filled with sensible defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Admin identity configuration
    #[serde(default)]
    pub admin: AdminConfig,
    /// Session token configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Description generator configuration
    #[serde(default)]
    pub describer: DescriberConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment
    /// overrides. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Secrets come from the environment when present, so deployments
    /// never need to write them into the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(email) = std::env::var("ADMIN_EMAIL") {
            if !email.is_empty() {
                self.admin.email = Some(email);
            }
        }
        if let Ok(password) = std::env::var("ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.admin.password = Some(password);
            }
        }
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            if !secret.is_empty() {
                self.session.secret = secret;
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Admin identity configuration.
///
/// Exactly one admin exists; it is configured here (or via `ADMIN_EMAIL`
/// / `ADMIN_PASSWORD`), never stored in the entity store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Admin email
    #[serde(default)]
    pub email: Option<String>,
    /// Admin password
    #[serde(default)]
    pub password: Option<String>,
    /// Allow the built-in development credentials when no identity is
    /// configured. Off by default; never enable in production.
    #[serde(default)]
    pub allow_dev_credentials: bool,
}

impl AdminConfig {
    /// Whether a real admin identity is configured.
    pub fn is_configured(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Symmetric signing secret for session tokens
    #[serde(default = "default_session_secret")]
    pub secret: String,
    /// Token validity window in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: default_session_secret(),
            ttl_seconds: default_session_ttl(),
        }
    }
}

fn default_session_secret() -> String {
    // Placeholder for local development; real deployments set
    // SESSION_SECRET in the environment.
    "change-me-to-a-secret-that-is-at-least-32-bytes-long".to_string()
}

fn default_session_ttl() -> i64 {
    crate::auth::DEFAULT_TOKEN_TTL_SECS
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    3600
}

/// External description generator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriberConfig {
    /// Endpoint of the text-generation service. Unset disables the
    /// feature; workshop descriptions are then always typed by hand.
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(!config.admin.is_configured());
        assert!(!config.admin.allow_dev_credentials);
        assert_eq!(config.session.ttl_seconds, 24 * 60 * 60);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert!(config.describer.endpoint.is_none());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
server:
  port: 9000
admin:
  email: admin@weekendexpress.dev
  password: hunter2
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.admin.is_configured());
        assert!(!config.admin.allow_dev_credentials);
    }

    #[test]
    fn test_admin_config_requires_both_fields() {
        let admin = AdminConfig {
            email: Some("admin@weekendexpress.dev".to_string()),
            password: None,
            allow_dev_credentials: false,
        };
        assert!(!admin.is_configured());
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = Config::load(Path::new("does-not-exist.yml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
