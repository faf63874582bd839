//! Compute-backend translation
//!
//! Methods carrying an `x-aws-lambda` marker are rewritten into a Lambda
//! proxy integration. The marker names either a declared function (in which
//! case the integration targets the synthesized default function resource)
//! or an arbitrary resource identifier taken verbatim. The marker field
//! itself is left in place.

use crate::document::{ApiDocument, Integration};
use indexmap::IndexMap;
use openapi_gateway_integrations_common::{cfn, Endpoint, EndpointMap, FunctionRegistry};

/// Suffix of the resource identifier synthesized for a declared function
const FUNCTION_SUFFIX: &str = "LambdaFunction";

/// Rewrite every marked method into a proxy integration
///
/// Returns the transformed document and the endpoint registrations grouped
/// by resolved function identifier, for downstream policy and permission
/// synthesis.
pub fn translate_functions(
    mut document: ApiDocument,
    registry: &dyn FunctionRegistry,
) -> (ApiDocument, EndpointMap) {
    let mut functions = EndpointMap::new();

    for (path, item) in document.paths.iter_mut() {
        for (verb, method) in item.methods_mut() {
            let Some(reference) = method.function_reference.clone() else {
                continue;
            };
            if reference.is_empty() {
                continue;
            }

            let resolved = if registry.is_declared(&reference) {
                default_function_resource(&reference)
            } else {
                reference
            };

            method.integration = Some(proxy_integration(&resolved));

            functions
                .entry(resolved)
                .or_insert_with(Vec::new)
                .push(Endpoint {
                    method: verb.to_uppercase(),
                    path: path.clone(),
                });
        }
    }

    (document, functions)
}

/// The resource identifier a declared function materializes as
fn default_function_resource(reference: &str) -> String {
    let mut chars = reference.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}{}",
            first.to_uppercase(),
            chars.as_str(),
            FUNCTION_SUFFIX
        ),
        None => FUNCTION_SUFFIX.to_string(),
    }
}

fn proxy_integration(resource: &str) -> Integration {
    Integration {
        integration_type: "aws_proxy".to_string(),
        http_method: Some("POST".to_string()),
        uri: Some(cfn::sub(&format!(
            "arn:aws:apigateway:${{AWS::Region}}:lambda:path/2015-03-31/functions/${{{resource}.Arn}}/invocations"
        ))),
        credentials: None,
        request_parameters: IndexMap::new(),
        request_templates: IndexMap::new(),
        passthrough_behavior: Some("when_no_match".to_string()),
        responses: IndexMap::new(),
    }
}
