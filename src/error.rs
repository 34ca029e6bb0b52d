//! Error types for the validator

use miette::Diagnostic;
use thiserror::Error;

use crate::provider::EndpointKind;

pub type Result<T, E = MdsError> = std::result::Result<T, E>;

#[derive(Error, Debug, Diagnostic)]
pub enum MdsError {
    #[error("Provider name must not be empty")]
    #[diagnostic(code(mds::provider::empty_name))]
    EmptyProviderName,

    #[error("Provider {name} not in list of providers {}", format_names(.known))]
    #[diagnostic(
        code(mds::registry::provider_not_found),
        help("Provider names are matched case-insensitively against the `provider_name` column of the registry")
    )]
    ProviderNotFound { name: String, known: Vec<String> },

    #[error("Provider {name} has no mds_api_url in the registry")]
    #[diagnostic(code(mds::registry::missing_api_url))]
    MissingApiUrl { name: String },

    #[error("Failed to parse provider registry")]
    #[diagnostic(code(mds::registry::parse))]
    Registry {
        #[source]
        source: csv::Error,
    },

    #[error("Invalid URL: {url}")]
    #[diagnostic(code(mds::url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Request to {url} failed")]
    #[diagnostic(code(mds::http), help("Check network connectivity and the URL"))]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} is not valid JSON")]
    #[diagnostic(code(mds::json))]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to compile {kind} schema: {message}")]
    #[diagnostic(code(mds::schema::compile))]
    SchemaCompile { kind: EndpointKind, message: String },

    #[error("Failed to build HTTP client")]
    #[diagnostic(code(mds::http::client))]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(mds::io))]
    Io(#[from] std::io::Error),
}

/// Render names the way the registry listing is shown to users: `['A', 'B']`.
pub fn format_names(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("'{name}'")).collect();
    format!("[{}]", quoted.join(", "))
}
