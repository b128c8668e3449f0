//! Server configuration from environment variables.

use pantry_core::barcode::DEFAULT_OPENFOODFACTS_URL;
use pantry_core::ConfigError;
use std::env;
use subtle::ConstantTimeEq;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    /// Shared secret for the cron endpoint. When unset every cron call is rejected.
    pub cron_secret: Option<String>,
    pub bind_addr: String,
    pub openfoodfacts_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `CRON_SECRET`
    /// - `PANTRY_BIND_ADDR` (default: "0.0.0.0:3000")
    /// - `OPENFOODFACTS_BASE_URL` (default: "https://world.openfoodfacts.org")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let cron_secret = lookup("CRON_SECRET").filter(|s| !s.is_empty());

        let bind_addr =
            lookup("PANTRY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let openfoodfacts_url = lookup("OPENFOODFACTS_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENFOODFACTS_URL.to_string());

        Ok(Self {
            database_url,
            cron_secret,
            bind_addr,
            openfoodfacts_url,
        })
    }

    /// Constant-time comparison of a presented cron secret.
    pub fn cron_secret_matches(&self, presented: &str) -> bool {
        let Some(expected) = self.cron_secret.as_deref() else {
            return false;
        };
        expected.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}
