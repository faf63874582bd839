//! Common types and utilities for openapi-gateway-integrations
//!
//! This crate contains the shared vocabulary used across the translator,
//! synthesis, deploy and CLI components: error types, the HTTP method set,
//! endpoint registrations, CloudFormation resource shells, bounded
//! identifier synthesis and the project configuration file.

pub mod cfn;
pub mod config;
pub mod methods;
pub mod names;

pub use cfn::{Resource, Resources, Template};
pub use config::{OpenApiOptions, ProjectConfig};
pub use methods::{is_http_method, HTTP_METHODS};
pub use names::{bounded_param, bounded_pascal, param_case, pascal_case};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while translating a document or synthesizing
/// and deploying its resources
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Deploy error: {0}")]
    Deploy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for integration operations
pub type Result<T> = std::result::Result<T, IntegrationError>;

/// One (method, path) pair bound to a backend identifier
///
/// The method is stored upper-cased, the path exactly as declared in the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
}

/// Endpoint registrations grouped by backend identifier, in the order the
/// backends were first referenced by the document
pub type EndpointMap = IndexMap<String, Vec<Endpoint>>;

/// Answers whether an identifier names a directly declared compute function
///
/// The translator uses this to decide between the synthesized default
/// function resource identifier and the reference taken verbatim.
pub trait FunctionRegistry {
    fn is_declared(&self, name: &str) -> bool;
}

/// Service identity the host project supplies: the service name and the
/// deployment stage. Both feed synthesized role, policy and stage names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
    pub service: String,
    pub stage: String,
}
