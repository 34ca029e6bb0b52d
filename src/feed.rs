//! Authenticated fetch of a provider feed.

use serde_json::Value;
use tracing::info;
use url::Url;

use crate::config::parse_url;
use crate::error::Result;
use crate::http;
use crate::provider::{Credential, EndpointKind};

/// `<base_url><postfix>/<endpoint>`, concatenated verbatim.
///
/// Plain concatenation keeps any path already present in the registry URL,
/// which `Url::join` would drop.
pub fn endpoint_url(base_url: &str, postfix: &str, kind: EndpointKind) -> Result<Url> {
    parse_url(&format!("{base_url}{postfix}/{}", kind.path_segment()))
}

pub struct FeedFetcher<'a> {
    client: &'a reqwest::Client,
    credential: &'a Credential,
}

impl<'a> FeedFetcher<'a> {
    pub fn new(client: &'a reqwest::Client, credential: &'a Credential) -> Self {
        Self { client, credential }
    }

    pub async fn fetch(&self, url: &Url) -> Result<Value> {
        info!("Fetching feed {url}");
        let authorization = self.credential.authorization();
        http::get_json(self.client, url, Some(&authorization)).await
    }
}
