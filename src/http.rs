//! Thin GET helpers shared by the registry, feed and schema fetchers.

use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{MdsError, Result};

/// GET `url` and return the body as text.
///
/// The status code is not inspected beyond a warning; callers parse whatever came back.
pub async fn get_text(
    client: &reqwest::Client,
    url: &Url,
    authorization: Option<&str>,
) -> Result<String> {
    debug!("GET {url}");

    let mut request = client.get(url.clone());
    if let Some(value) = authorization {
        request = request.header(AUTHORIZATION, value);
    }

    let http_error = |source: reqwest::Error| MdsError::Http {
        url: url.to_string(),
        source,
    };

    let response = request.send().await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        warn!("GET {url} returned {status}");
    }

    response.text().await.map_err(http_error)
}

/// GET `url` and parse the body as JSON regardless of the status code.
pub async fn get_json(
    client: &reqwest::Client,
    url: &Url,
    authorization: Option<&str>,
) -> Result<Value> {
    let body = get_text(client, url, authorization).await?;
    serde_json::from_str(&body).map_err(|source| MdsError::InvalidJson {
        url: url.to_string(),
        source,
    })
}
