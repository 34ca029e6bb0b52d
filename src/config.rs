//! Runtime configuration: where the registry and schemas live, and HTTP settings.

use std::time::Duration;

use url::Url;

use crate::error::{MdsError, Result};

pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/CityOfLosAngeles/mobility-data-specification/dev/providers.csv";

pub const DEFAULT_SCHEMA_BASE_URL: &str =
    "https://raw.githubusercontent.com/CityOfLosAngeles/mobility-data-specification/dev/provider/";

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// CSV listing `provider_name` and `mds_api_url` for every registered provider.
    pub registry_url: Url,
    /// Directory holding `trips.json` and `status_changes.json`. Always ends in `/`.
    pub schema_base_url: Url,
    /// Request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl ValidatorConfig {
    pub fn new(
        registry_url: &str,
        schema_base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        Ok(Self {
            registry_url: parse_url(registry_url)?,
            schema_base_url: parse_directory_url(schema_base_url)?,
            timeout,
        })
    }

    /// Build the shared HTTP client for one run.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|source| MdsError::Client { source })
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        // The defaults are compile-time constants that always parse.
        Self::new(DEFAULT_REGISTRY_URL, DEFAULT_SCHEMA_BASE_URL, None)
            .unwrap_or_else(|e| unreachable!("default URLs are valid: {e}"))
    }
}

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| MdsError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Parse a URL that other paths get joined onto.
fn parse_directory_url(raw: &str) -> Result<Url> {
    if raw.ends_with('/') {
        parse_url(raw)
    } else {
        parse_url(&format!("{raw}/"))
    }
}
