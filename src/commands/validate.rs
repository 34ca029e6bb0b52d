use std::io::Write;

use tracing::info;

use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::feed::{FeedFetcher, endpoint_url};
use crate::provider::{Credential, EndpointKind, Provider};
use crate::registry::ProviderResolver;
use crate::validation::{EndpointReport, Reporter, SchemaSource, SchemaValidator};

#[derive(Debug, Clone)]
pub struct ValidateRequest {
    pub provider: Provider,
    pub credential: Credential,
    pub endpoints: Vec<EndpointKind>,
}

/// Endpoints picked by the `--trips` / `--status-changes` flags; neither means both.
pub fn selected_endpoints(trips: bool, status_changes: bool) -> Vec<EndpointKind> {
    if !trips && !status_changes {
        return EndpointKind::ALL.to_vec();
    }

    let mut endpoints = Vec::new();
    if trips {
        endpoints.push(EndpointKind::Trips);
    }
    if status_changes {
        endpoints.push(EndpointKind::StatusChanges);
    }
    endpoints
}

/// Resolve the provider, then fetch and validate each requested feed in turn.
///
/// Violations are reported and returned; only I/O, registry and schema problems are errors.
pub async fn validate_command<W: Write>(
    request: &ValidateRequest,
    config: &ValidatorConfig,
    reporter: &mut Reporter<W>,
) -> Result<Vec<EndpointReport>> {
    let provider = &request.provider;
    info!("Attempting to validate {}", provider.name());

    let client = config.http_client()?;
    let base_url = ProviderResolver::new(&client, &config.registry_url)
        .resolve(provider.name())
        .await?;

    let schemas = SchemaSource::new(&client, &config.schema_base_url);
    let fetcher = FeedFetcher::new(&client, &request.credential);

    let mut reports = Vec::with_capacity(request.endpoints.len());
    for &kind in &request.endpoints {
        let schema = schemas.fetch(kind).await?;
        let validator = SchemaValidator::compile(&schema)?;

        let url = endpoint_url(&base_url, provider.postfix(), kind)?;
        let document = fetcher.fetch(&url).await?;

        let report = EndpointReport {
            kind,
            url,
            outcome: validator.validate(&document),
        };
        reporter.report(&report)?;
        reports.push(report);
    }

    Ok(reports)
}
