//! Server Configuration
//!
//! Bind address, store names, signing secret, request timeout and CORS
//! origins. Read once at startup from the environment.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::auth::JwtConfig;

/// Configuration errors, fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Store host (default: "localhost")
    #[serde(default = "default_db_host")]
    pub db_host: String,

    /// Store port (default: 27017)
    #[serde(default = "default_db_port")]
    pub db_port: u16,

    /// Database name (default: "tronics")
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Products collection (default: "products")
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Users collection (default: "users")
    #[serde(default = "default_users_collection_name")]
    pub users_collection_name: String,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Token signing secret; no default
    pub jwt_token_secret: String,

    /// Per-request time limit in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// CORS allowed origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    27017
}

fn default_db_name() -> String {
    "tronics".to_string()
}

fn default_collection_name() -> String {
    "products".to_string()
}

fn default_users_collection_name() -> String {
    "users".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Defaults everywhere except the secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            db_host: default_db_host(),
            db_port: default_db_port(),
            db_name: default_db_name(),
            collection_name: default_collection_name(),
            users_collection_name: default_users_collection_name(),
            host: default_host(),
            port: default_port(),
            jwt_token_secret: secret.into(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_origins: Vec::new(),
        }
    }

    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Unset or empty variables take their default; `JWT_TOKEN_SECRET`
    /// has none and must be set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secret = get("JWT_TOKEN_SECRET").ok_or(ConfigError::Missing("JWT_TOKEN_SECRET"))?;
        let mut config = Self::with_secret(secret);

        if let Some(v) = get("DB_HOST") {
            config.db_host = v;
        }
        if let Some(v) = get("DB_PORT") {
            config.db_port = parse_var("DB_PORT", v)?;
        }
        if let Some(v) = get("DB_NAME") {
            config.db_name = v;
        }
        if let Some(v) = get("COLLECTION_NAME") {
            config.collection_name = v;
        }
        if let Some(v) = get("USERS_COLLECTION_NAME") {
            config.users_collection_name = v;
        }
        if let Some(v) = get("HOST") {
            config.host = v;
        }
        if let Some(v) = get("PORT") {
            config.port = parse_var("PORT", v)?;
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = get("CORS_ORIGINS") {
            config.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Store location, used to label the store in logs
    pub fn db_target(&self) -> String {
        format!("{}:{}", self.db_host, self.db_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn jwt(&self) -> JwtConfig {
        JwtConfig::new(self.jwt_token_secret.clone())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("collection_name", &self.collection_name)
            .field("users_collection_name", &self.users_collection_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_token_secret", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_TOKEN_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.collection_name, "products");
        assert_eq!(config.users_collection_name, "users");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_missing_secret_is_error() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("PORT", "9000")])).unwrap_err(),
            ConfigError::Missing("JWT_TOKEN_SECRET")
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("JWT_TOKEN_SECRET", "  ")])).unwrap_err(),
            ConfigError::Missing("JWT_TOKEN_SECRET")
        );
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_TOKEN_SECRET", "s3cret"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DB_NAME", "catalog"),
            ("COLLECTION_NAME", "items"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.db_name, "catalog");
        assert_eq!(config.collection_name, "items");
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_bad_port() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_TOKEN_SECRET", "s"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::with_secret("very-secret-value");
        assert!(!format!("{:?}", config).contains("very-secret-value"));
    }
}
