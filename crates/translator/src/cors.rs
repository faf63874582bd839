//! Preflight synthesis
//!
//! Paths carrying an `x-aws-cors` marker and no explicit `options` method
//! gain a synthesized preflight: a mock integration answering 200 with the
//! computed `Access-Control-Allow-*` headers. The marker is removed once
//! consumed; paths that already declare `options` are left untouched,
//! marker included.

use crate::document::{ApiDocument, Integration, IntegrationResponse, MethodSpec};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Value};

/// Path-level vendor marker enabling preflight synthesis
pub const CORS_MARKER: &str = "x-aws-cors";

/// The marker's optional overrides
#[derive(Debug, Clone, Default, Deserialize)]
struct CorsSettings {
    #[serde(default)]
    origin: Option<String>,

    #[serde(default)]
    methods: Option<Vec<String>>,

    #[serde(default)]
    headers: Option<Vec<String>>,
}

/// Synthesize an `options` preflight for every marked path lacking one
pub fn translate_cors(mut document: ApiDocument) -> ApiDocument {
    for (_path, item) in document.paths.iter_mut() {
        let marker = match item.field(CORS_MARKER) {
            Some(value) if is_enabled(value) => value.clone(),
            _ => continue,
        };
        if item.has_method("options") {
            continue;
        }

        let settings: CorsSettings = serde_json::from_value(marker).unwrap_or_default();

        // Header-location parameter names across all methods, first-seen
        // casing wins, in declaration order.
        let mut headers: Vec<String> = Vec::new();
        for (_verb, method) in item.methods() {
            for parameter in &method.parameters {
                if !parameter.location.eq_ignore_ascii_case("header") {
                    continue;
                }
                if !headers
                    .iter()
                    .any(|seen| seen.eq_ignore_ascii_case(&parameter.name))
                {
                    headers.push(parameter.name.clone());
                }
            }
        }

        let verbs: Vec<String> = item.methods().map(|(verb, _)| verb.to_string()).collect();

        let origin = format!("'{}'", settings.origin.as_deref().unwrap_or("*"));
        let allowed_methods = format!(
            "'{}'",
            settings.methods.unwrap_or(verbs).join(",").to_uppercase()
        );
        let allowed_headers = format!("'{}'", settings.headers.unwrap_or(headers).join(","));

        item.insert_method(
            "options",
            preflight_method(&origin, &allowed_methods, &allowed_headers),
        );
        item.remove_field(CORS_MARKER);
    }

    document
}

/// A marker is enabled unless it is explicitly null or false
fn is_enabled(marker: &Value) -> bool {
    !matches!(marker, Value::Null | Value::Bool(false))
}

fn preflight_method(origin: &str, allowed_methods: &str, allowed_headers: &str) -> MethodSpec {
    let mut response_parameters = IndexMap::new();
    response_parameters.insert(
        "method.response.header.Access-Control-Allow-Origin".to_string(),
        origin.to_string(),
    );
    response_parameters.insert(
        "method.response.header.Access-Control-Allow-Methods".to_string(),
        allowed_methods.to_string(),
    );
    response_parameters.insert(
        "method.response.header.Access-Control-Allow-Headers".to_string(),
        allowed_headers.to_string(),
    );

    let mut responses = IndexMap::new();
    responses.insert(
        "default".to_string(),
        IntegrationResponse {
            status_code: 200,
            response_parameters,
            response_templates: IndexMap::new(),
        },
    );

    let mut request_templates = IndexMap::new();
    request_templates.insert(
        "application/json".to_string(),
        Value::String("{\"statusCode\":200}".to_string()),
    );

    let integration = Integration {
        integration_type: "mock".to_string(),
        http_method: None,
        uri: None,
        credentials: None,
        request_parameters: IndexMap::new(),
        request_templates,
        passthrough_behavior: Some("never".to_string()),
        responses,
    };

    let mut method = MethodSpec {
        integration: Some(integration),
        ..Default::default()
    };
    method.extra.insert(
        "responses".to_string(),
        json!({
            "200": {
                "description": "Default CORS response",
                "content": {},
                "headers": {
                    "Access-Control-Allow-Origin": { "schema": { "type": "string" } },
                    "Access-Control-Allow-Methods": { "schema": { "type": "string" } },
                    "Access-Control-Allow-Headers": { "schema": { "type": "string" } }
                }
            }
        }),
    );
    method
}
