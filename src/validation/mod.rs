mod reporter;
mod schemas;
mod validator;

pub use reporter::Reporter;
pub use schemas::{Schema, SchemaRetriever, SchemaSource};
pub use validator::{EndpointReport, SchemaValidator, ValidationOutcome, Violation};
