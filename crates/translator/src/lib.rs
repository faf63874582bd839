//! Vendor-marker translation for API documents
//!
//! This crate holds the document model and the three translators that
//! rewrite vendor-extension markers into gateway-native integration blocks:
//!
//! - [`translate_topics`] — `x-aws-sns` methods become topic-publish
//!   integrations through the shared execution role
//! - [`translate_functions`] — `x-aws-lambda` methods become Lambda proxy
//!   integrations, with the marker resolved against the declared functions
//! - [`translate_cors`] — `x-aws-cors` paths gain a synthesized mock
//!   preflight `options` method
//!
//! Each translator takes a document snapshot and returns the transformed
//! document (the backend translators also return their endpoint
//! registrations); the synthesis engine composes them in a fixed order.

mod cors;
mod document;
mod lambda;
mod options;
mod sns;

pub use cors::{translate_cors, CORS_MARKER};
pub use document::{
    ApiDocument, Info, Integration, IntegrationResponse, MethodSpec, Parameter, PathEntry,
    PathItem,
};
pub use lambda::translate_functions;
pub use options::{TransformOptions, DEFAULT_GATEWAY_KEY};
pub use sns::translate_topics;
