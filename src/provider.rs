use std::fmt;

use crate::error::{MdsError, Result};

/// The two MDS provider feeds this tool knows how to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Trips,
    StatusChanges,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 2] = [EndpointKind::Trips, EndpointKind::StatusChanges];

    /// Path segment appended to the provider base URL.
    pub fn path_segment(self) -> &'static str {
        match self {
            EndpointKind::Trips => "trips",
            EndpointKind::StatusChanges => "status_changes",
        }
    }

    /// File name of the published schema for this feed.
    pub fn schema_file(self) -> String {
        format!("{}.json", self.path_segment())
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A provider as requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    name: String,
    postfix: String,
}

impl Provider {
    pub fn new(name: impl Into<String>, postfix: Option<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(MdsError::EmptyProviderName);
        }

        Ok(Self {
            name,
            postfix: postfix.unwrap_or_default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path fragment (city, version) inserted between the base URL and the endpoint.
    pub fn postfix(&self) -> &str {
        &self.postfix
    }
}

/// Bearer credential for the provider API.
///
/// `Debug` redacts the token so it never shows up in logs.
#[derive(Clone)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .finish()
    }
}
