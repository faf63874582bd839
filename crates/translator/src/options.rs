//! Transformation options
//!
//! The options block the host project supplies alongside the document. The
//! gateway key doubles as the logical id of the synthesized RestApi resource
//! and as the prefix of the role, deployment and permission ids derived from
//! it.

use crate::ApiDocument;

/// Logical id of the gateway resource when the options omit one
pub const DEFAULT_GATEWAY_KEY: &str = "ApiGatewayOpenApi";

/// Per-run options driving translation, synthesis and deployment
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// The API document; absent body makes the whole run a no-op
    pub body: Option<ApiDocument>,

    /// Logical id of the gateway resource
    pub key: Option<String>,

    /// Gateway endpoint type; "regional" if absent
    pub endpoint_type: Option<String>,

    /// Whether the post-deploy step creates a new gateway deployment
    pub update_deployment: Option<bool>,

    /// Whether the package version is substituted into the document's
    /// info block before deployment
    pub use_package_version: Option<bool>,
}

impl TransformOptions {
    /// The gateway logical id, explicit or default
    pub fn gateway_key(&self) -> &str {
        self.key.as_deref().unwrap_or(DEFAULT_GATEWAY_KEY)
    }
}
