//! Provider registry lookup.
//!
//! The registry is a CSV published alongside the MDS schemas. Only the
//! `provider_name` and `mds_api_url` columns matter here; any other columns
//! are ignored. It is fetched again on every lookup.

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{MdsError, Result};
use crate::http;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryRecord {
    pub provider_name: String,
    #[serde(default)]
    pub mds_api_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<RegistryRecord>,
}

impl Registry {
    pub fn new(records: Vec<RegistryRecord>) -> Self {
        Self { records }
    }

    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let records = reader
            .deserialize::<RegistryRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| MdsError::Registry { source })?;

        debug!("Registry lists {} providers", records.len());
        Ok(Self { records })
    }

    pub fn records(&self) -> &[RegistryRecord] {
        &self.records
    }

    /// Names in registry order, for diagnostics.
    pub fn provider_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.provider_name.clone())
            .collect()
    }

    /// Case-insensitive exact match on `provider_name`.
    ///
    /// Every CSV field is trimmed while parsing, so the returned URL is the stored
    /// value without surrounding whitespace; nothing else about it is changed.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        let wanted = name.trim().to_lowercase();
        let record = self
            .records
            .iter()
            .find(|record| record.provider_name.to_lowercase() == wanted)
            .ok_or_else(|| MdsError::ProviderNotFound {
                name: name.to_string(),
                known: self.provider_names(),
            })?;

        if record.mds_api_url.is_empty() {
            return Err(MdsError::MissingApiUrl {
                name: record.provider_name.clone(),
            });
        }

        Ok(&record.mds_api_url)
    }
}

/// Fetches the registry and resolves provider names to API base URLs.
pub struct ProviderResolver<'a> {
    client: &'a reqwest::Client,
    registry_url: &'a Url,
}

impl<'a> ProviderResolver<'a> {
    pub fn new(client: &'a reqwest::Client, registry_url: &'a Url) -> Self {
        Self {
            client,
            registry_url,
        }
    }

    pub async fn fetch_registry(&self) -> Result<Registry> {
        let text = http::get_text(self.client, self.registry_url, None).await?;
        Registry::from_csv(&text)
    }

    pub async fn resolve(&self, name: &str) -> Result<String> {
        let registry = self.fetch_registry().await?;
        let url = registry.resolve(name)?.to_string();
        info!("Resolved provider {name} to {url}");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY_CSV: &str = "\
provider_name,provider_id,url,mds_api_url,gbfs_api_url
Acme,63f13c48-34ff-49d2-aca7-cf6a5b6171c3,https://acme.test,https://api.acme.test,
Beta,2411d395-04f2-47c9-ab66-d09e9e3c3251,https://beta.test,https://mds.beta.test/v2,https://gbfs.beta.test
Gamma,70aa475d-1fcd-4504-b69c-2eeb2107f7be,https://gamma.test,,
";

    #[test]
    fn test_parse_registry_ignores_extra_columns() {
        let registry = Registry::from_csv(REGISTRY_CSV).unwrap();
        assert_eq!(registry.records().len(), 3);
        assert_eq!(
            registry.records()[1],
            RegistryRecord {
                provider_name: "Beta".to_string(),
                mds_api_url: "https://mds.beta.test/v2".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_any_case() {
        let registry = Registry::from_csv(REGISTRY_CSV).unwrap();
        for name in ["Acme", "acme", "ACME", "aCmE"] {
            assert_eq!(registry.resolve(name).unwrap(), "https://api.acme.test");
        }
    }

    #[test]
    fn test_resolve_unknown_lists_known_names() {
        let registry = Registry::new(vec![
            RegistryRecord {
                provider_name: "Acme".to_string(),
                mds_api_url: "https://api.acme.test".to_string(),
            },
            RegistryRecord {
                provider_name: "Beta".to_string(),
                mds_api_url: "https://api.beta.test".to_string(),
            },
        ]);

        let error = registry.resolve("Ghost").unwrap_err();
        match &error {
            MdsError::ProviderNotFound { name, known } => {
                assert_eq!(name, "Ghost");
                assert_eq!(known, &["Acme".to_string(), "Beta".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = error.to_string();
        assert!(message.contains("Ghost"));
        assert!(message.contains("['Acme', 'Beta']"));
    }

    #[test]
    fn test_resolve_is_exact_not_prefix() {
        let registry = Registry::from_csv(REGISTRY_CSV).unwrap();
        assert!(matches!(
            registry.resolve("Acm"),
            Err(MdsError::ProviderNotFound { .. })
        ));
    }

    #[test]
    fn test_padded_fields_are_trimmed() {
        let registry = Registry::from_csv(
            "provider_name , mds_api_url\n  Acme  ,  https://api.acme.test/mds/v1  \n",
        )
        .unwrap();
        assert_eq!(
            registry.resolve("ACME").unwrap(),
            "https://api.acme.test/mds/v1"
        );
    }

    #[test]
    fn test_resolve_blank_url() {
        let registry = Registry::from_csv(REGISTRY_CSV).unwrap();
        assert!(matches!(
            registry.resolve("gamma"),
            Err(MdsError::MissingApiUrl { name }) if name == "Gamma"
        ));
    }

    #[test]
    fn test_missing_required_column_is_error() {
        let result = Registry::from_csv("name,url\nAcme,https://api.acme.test\n");
        assert!(matches!(result, Err(MdsError::Registry { .. })));
    }
}
