use std::collections::HashMap;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{MdsError, Result};
use crate::http;
use crate::provider::EndpointKind;

// Meta-schemas bundled with the schema library; never fetched.
const META_SCHEMA_HOST: &str = "json-schema.org";

/// Serves documents referenced by `$ref` that were fetched before compiling.
///
/// Validation never touches the network; anything not prefetched is an error.
#[derive(Debug, Clone, Default)]
pub struct SchemaRetriever {
    documents: HashMap<String, Value>,
}

impl SchemaRetriever {
    pub fn insert(&mut self, url: &Url, document: Value) {
        self.documents.insert(strip_fragment(url).to_string(), document);
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.documents.contains_key(strip_fragment(url).as_str())
    }

    /// Exact match on the absolute URI, ignoring the fragment.
    fn lookup(&self, uri: &str) -> Option<&Value> {
        let key = uri.split('#').next().unwrap_or("");
        self.documents.get(key)
    }
}

impl Retrieve for SchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        match self.lookup(uri.as_str()) {
            Some(document) => Ok(document.clone()),
            None => Err(format!("Unknown schema URI: {uri}").into()),
        }
    }
}

/// A fetched schema together with everything it references.
#[derive(Debug, Clone)]
pub struct Schema {
    pub kind: EndpointKind,
    pub url: Url,
    pub document: Value,
    pub retriever: SchemaRetriever,
}

pub struct SchemaSource<'a> {
    client: &'a reqwest::Client,
    base_url: &'a Url,
}

impl<'a> SchemaSource<'a> {
    pub fn new(client: &'a reqwest::Client, base_url: &'a Url) -> Self {
        Self { client, base_url }
    }

    pub fn schema_url(&self, kind: EndpointKind) -> Result<Url> {
        let file = kind.schema_file();
        self.base_url
            .join(&file)
            .map_err(|source| MdsError::InvalidUrl { url: file, source })
    }

    pub async fn fetch(&self, kind: EndpointKind) -> Result<Schema> {
        let url = self.schema_url(kind)?;
        debug!("Fetching {kind} schema from {url}");

        let document = http::get_json(self.client, &url, None).await?;
        let retriever = self.fetch_references(&url, &document).await?;

        Ok(Schema {
            kind,
            url,
            document,
            retriever,
        })
    }

    /// Fetch every external `$ref` reachable from `document`, transitively.
    async fn fetch_references(&self, url: &Url, document: &Value) -> Result<SchemaRetriever> {
        let mut retriever = SchemaRetriever::default();
        retriever.insert(url, document.clone());

        let mut pending = vec![(document_base(url, document), document.clone())];
        while let Some((base, current)) = pending.pop() {
            for target in external_targets(&base, &current)? {
                if retriever.contains(&target) {
                    continue;
                }

                debug!("Fetching referenced schema {target}");
                let referenced = http::get_json(self.client, &target, None).await?;
                retriever.insert(&target, referenced.clone());
                pending.push((document_base(&target, &referenced), referenced));
            }
        }

        Ok(retriever)
    }
}

/// Absolute, fragment-free URLs of the `$ref`s in `document` that need fetching.
///
/// Local (`#...`) refs and bundled meta-schemas are skipped.
fn external_targets(base: &Url, document: &Value) -> Result<Vec<Url>> {
    let mut refs = Vec::new();
    collect_refs(document, &mut refs);

    let mut targets = Vec::new();
    for reference in refs {
        if reference.starts_with('#') {
            continue;
        }
        let target = base
            .join(&reference)
            .map_err(|source| MdsError::InvalidUrl {
                url: reference.clone(),
                source,
            })?;
        if target.host_str() == Some(META_SCHEMA_HOST) {
            continue;
        }
        targets.push(strip_fragment(&target));
    }
    Ok(targets)
}

/// Draft-04 uses `id`; later drafts use `$id`.
fn document_base(url: &Url, document: &Value) -> Url {
    document
        .get("id")
        .or_else(|| document.get("$id"))
        .and_then(Value::as_str)
        .and_then(|id| url.join(id).ok())
        .unwrap_or_else(|| url.clone())
}

fn strip_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Collect `$ref` targets, skipping literal data such as `enum` values.
fn collect_refs(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match key.as_str() {
                    "$ref" => {
                        if let Some(reference) = child.as_str() {
                            refs.push(reference.to_string());
                        }
                    }
                    "enum" | "const" | "examples" | "default" => {}
                    _ => collect_refs(child, refs),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, refs);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_refs_skips_enum_values() {
        let schema = json!({
            "definitions": {
                "uuid": { "type": "string" }
            },
            "properties": {
                "a": { "$ref": "#/definitions/uuid" },
                "b": { "$ref": "common.json#/definitions/timestamp" },
                "c": { "enum": [{ "$ref": "not-a-ref.json" }] },
                "d": { "items": [{ "$ref": "other.json" }] }
            }
        });

        let mut refs = Vec::new();
        collect_refs(&schema, &mut refs);
        refs.sort();
        assert_eq!(
            refs,
            vec!["#/definitions/uuid", "common.json#/definitions/timestamp", "other.json"]
        );
    }

    #[test]
    fn test_document_base_prefers_id() {
        let url = Url::parse("http://localhost/provider/trips.json").unwrap();
        let with_id = json!({ "id": "https://mds.test/provider/trips.json" });
        assert_eq!(
            document_base(&url, &with_id).as_str(),
            "https://mds.test/provider/trips.json"
        );
        assert_eq!(document_base(&url, &json!({})), url);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut retriever = SchemaRetriever::default();
        let top = Url::parse("http://localhost/schemas/common.json").unwrap();
        let nested = Url::parse("http://localhost/schemas/v2/common.json").unwrap();
        retriever.insert(&top, json!({ "which": "top" }));
        retriever.insert(&nested, json!({ "which": "v2" }));

        for _ in 0..50 {
            assert_eq!(
                retriever.lookup("http://localhost/schemas/common.json#/definitions"),
                Some(&json!({ "which": "top" }))
            );
            assert_eq!(
                retriever.lookup("http://localhost/schemas/v2/common.json"),
                Some(&json!({ "which": "v2" }))
            );
        }
        assert!(retriever.lookup("json-schema:///common.json").is_none());
        assert!(retriever.lookup("http://localhost/schemas/missing.json").is_none());
    }

    #[test]
    fn test_external_targets_skip_local_and_meta_schema_refs() {
        let base = Url::parse("http://localhost/schemas/trips.json").unwrap();
        let schema = json!({
            "properties": {
                "a": { "$ref": "#/definitions/uuid" },
                "b": { "$ref": "http://json-schema.org/draft-04/schema#" },
                "c": { "$ref": "common.json#/definitions/timestamp" },
                "d": { "$ref": "v2/common.json" }
            }
        });

        let mut targets: Vec<String> = external_targets(&base, &schema)
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        targets.sort();
        assert_eq!(
            targets,
            vec![
                "http://localhost/schemas/common.json",
                "http://localhost/schemas/v2/common.json"
            ]
        );
    }

    #[test]
    fn test_schema_url_joins_file_name() {
        let client = reqwest::Client::new();
        let base = Url::parse("http://localhost/mds/0.3/provider/").unwrap();
        let source = SchemaSource::new(&client, &base);
        assert_eq!(
            source.schema_url(EndpointKind::StatusChanges).unwrap().as_str(),
            "http://localhost/mds/0.3/provider/status_changes.json"
        );
    }
}
