//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Minimum length of `secret`, the key signing session and flash cookies.
pub const MIN_SECRET_LEN: usize = 64;

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Base URL of the lead API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects settings the server cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(format!("secret must be at least {MIN_SECRET_LEN} bytes long"));
        }
        if self.page_size == 0 {
            return Err("page_size must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> ServerConfig {
        ServerConfig {
            domain: "localhost".into(),
            address: "127.0.0.1".into(),
            port: 8080,
            templates_dir: "templates/**/*".into(),
            secret: secret.into(),
            api_base_url: "http://localhost:5000/api".into(),
            page_size: 20,
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(config("short").validate().is_err());
        assert!(config(&"k".repeat(64)).validate().is_ok());
    }

    #[test]
    fn defaults_apply_to_optional_settings() {
        let config: ServerConfig = serde_json::from_value(serde_json::json!({
            "domain": "localhost",
            "address": "0.0.0.0",
            "port": 8080,
            "templates_dir": "templates/**/*",
            "secret": "s",
            "api_base_url": "http://localhost:5000/api"
        }))
        .unwrap();

        assert_eq!(config.page_size, DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
