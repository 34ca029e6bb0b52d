mod validate;

pub use validate::{ValidateRequest, selected_endpoints, validate_command};
