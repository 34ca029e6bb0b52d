pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod provider;
pub mod registry;
pub mod validation;

pub use error::{MdsError, Result};
