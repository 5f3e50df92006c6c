//! Service configuration loaded from the environment

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;

/// Development fallback when `JWT_SECRET` is not set
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Which document store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// API service configuration
///
/// # Environment Variables
/// - `PORT`: listening port (default: 10000)
/// - `JWT_SECRET`: HS256 signing secret
/// - `JWT_EXPIRY_SECONDS`: token lifetime (default: 604800, 7 days)
/// - `FRONTEND_URL`: allowed CORS origin (default: http://localhost:3000)
/// - `STORAGE`: `postgres` or `memory` (default: postgres)
/// - `RATE_LIMIT_MAX_REQUESTS`: requests per window and client (default: 100)
/// - `RATE_LIMIT_WINDOW_SECONDS`: window length (default: 900)
/// - `BODY_LIMIT_BYTES`: request body cap (default: 10 MiB)
/// - `APP_ENV`: environment name reported by the health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: u64,
    pub frontend_url: String,
    pub storage: String,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_seconds: u64,
    pub body_limit_bytes: usize,
    pub app_env: String,
}

impl AppConfig {
    /// Load the configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::build(Environment::default().try_parsing(true))
    }

    /// Load the configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::build(Environment::default().try_parsing(true).source(Some(vars)))
    }

    fn build(environment: Environment) -> Result<Self> {
        let config: AppConfig = Config::builder()
            .set_default("port", 10000)?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt_expiry_seconds", 604_800)?
            .set_default("frontend_url", "http://localhost:3000")?
            .set_default("storage", "postgres")?
            .set_default("rate_limit_max_requests", 100)?
            .set_default("rate_limit_window_seconds", 900)?
            .set_default("body_limit_bytes", 10 * 1024 * 1024)?
            .set_default("app_env", "development")?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.storage_backend()?;
        if config.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        Ok(config)
    }

    pub fn storage_backend(&self) -> Result<StorageBackend> {
        match self.storage.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE backend: {}", other),
        }
    }

    /// Configuration for tests: in-memory store, generous rate limit
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_seconds: 3600,
            frontend_url: "http://localhost:3000".to_string(),
            storage: "memory".to_string(),
            rate_limit_max_requests: 10_000,
            rate_limit_window_seconds: 900,
            body_limit_bytes: 10 * 1024 * 1024,
            app_env: "test".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.jwt_expiry_seconds, 604_800);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Postgres);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert_eq!(config.rate_limit_window_seconds, 900);
        assert_eq!(config.body_limit_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("PORT", "8080"),
            ("STORAGE", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_backend().unwrap(), StorageBackend::Memory);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.rate_limit_max_requests, 5);
    }

    #[test]
    fn test_unknown_storage_rejected() {
        assert!(AppConfig::from_vars(vars(&[("STORAGE", "mongo")])).is_err());
    }

    #[test]
    #[serial]
    fn test_load_reads_process_environment() {
        // SAFETY: serialised with the other environment-mutating tests
        unsafe {
            std::env::set_var("PORT", "4321");
        }
        let config = AppConfig::load().unwrap();
        assert_eq!(config.port, 4321);
        unsafe {
            std::env::remove_var("PORT");
        }
    }
}
