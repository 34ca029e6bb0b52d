use std::fmt;

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::schemas::{Schema, SchemaRetriever};
use crate::error::{MdsError, Result};
use crate::provider::EndpointKind;

// MDS provider schemas are written against JSON Schema draft-04
use jsonschema::draft4 as schema_draft;

/// One schema violation found in a feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the document; empty for the root.
    pub instance_path: String,
    /// JSON pointer into the schema to the keyword that failed.
    pub schema_path: String,
    pub message: String,
}

impl Violation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        Self {
            instance_path: error.instance_path.to_string(),
            schema_path: error.schema_path.to_string(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{} at {}", self.message, path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    /// Sorted by their string form, so output is stable across runs.
    Violations(Vec<Violation>),
}

impl ValidationOutcome {
    pub fn from_violations(mut violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            return ValidationOutcome::Pass;
        }
        violations.sort_by_cached_key(|violation| violation.to_string());
        ValidationOutcome::Violations(violations)
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationOutcome::Pass => &[],
            ValidationOutcome::Violations(violations) => violations,
        }
    }
}

/// Result of validating one endpoint of one provider.
#[derive(Debug, Clone)]
pub struct EndpointReport {
    pub kind: EndpointKind,
    pub url: Url,
    pub outcome: ValidationOutcome,
}

fn compile_error(kind: EndpointKind, error: &jsonschema::ValidationError<'_>) -> MdsError {
    MdsError::SchemaCompile {
        kind,
        message: error.to_string(),
    }
}

/// A compiled draft-04 schema for one endpoint kind.
pub struct SchemaValidator {
    kind: EndpointKind,
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile a fetched schema. Relative refs resolve against the schema's own URL
    /// unless the document declares an absolute `id`.
    pub fn compile(schema: &Schema) -> Result<Self> {
        let validator = schema_draft::options()
            .with_base_uri(schema.url.to_string())
            .with_retriever(schema.retriever.clone())
            .build(&schema.document)
            .map_err(|e| compile_error(schema.kind, &e))?;

        Ok(Self {
            kind: schema.kind,
            validator,
        })
    }

    /// Compile a self-contained schema document.
    pub fn from_document(kind: EndpointKind, document: &Value) -> Result<Self> {
        let validator = schema_draft::options()
            .with_retriever(SchemaRetriever::default())
            .build(document)
            .map_err(|e| compile_error(kind, &e))?;

        Ok(Self { kind, validator })
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// Check `document`; if it fails, collect every violation rather than the first.
    pub fn validate(&self, document: &Value) -> ValidationOutcome {
        if self.validator.is_valid(document) {
            debug!("{} document is valid", self.kind);
            return ValidationOutcome::Pass;
        }

        let violations = self
            .validator
            .iter_errors(document)
            .map(|error| Violation::from_error(&error))
            .collect();

        ValidationOutcome::from_violations(violations)
    }
}
