//! Topic-backend translation
//!
//! Methods carrying an `x-aws-sns` marker are rewritten into an integration
//! that publishes the request to the named topic through the shared
//! execution role. The topic identifier is used verbatim; the marker field
//! is left in place.
//!
//! The request template url-encodes a JSON envelope carrying the HTTP
//! method, resource path, request timestamp, caller identity and raw body,
//! and resolves the topic ARN with a substitution expression. Successful
//! publishes (any 2xx) are normalized to 202 with the publish message id;
//! everything else maps to a fixed 500 body.

use crate::document::{ApiDocument, Integration, IntegrationResponse};
use indexmap::IndexMap;
use openapi_gateway_integrations_common::{cfn, Endpoint, EndpointMap};
use serde_json::{json, Value};

/// Rewrite every marked method into a topic-publish integration
///
/// `gateway_key` is the logical id of the gateway resource; the shared
/// execution role id is derived from it.
pub fn translate_topics(
    mut document: ApiDocument,
    gateway_key: &str,
) -> (ApiDocument, EndpointMap) {
    let role_id = format!("{gateway_key}Role");
    let mut topics = EndpointMap::new();

    for (path, item) in document.paths.iter_mut() {
        for (verb, method) in item.methods_mut() {
            let Some(topic) = method.topic_reference.clone() else {
                continue;
            };
            if topic.is_empty() {
                continue;
            }

            method.integration = Some(publish_integration(&role_id, &topic));

            topics
                .entry(topic)
                .or_insert_with(Vec::new)
                .push(Endpoint {
                    method: verb.to_uppercase(),
                    path: path.clone(),
                });
        }
    }

    (document, topics)
}

fn publish_integration(role_id: &str, topic: &str) -> Integration {
    let mut request_parameters = IndexMap::new();
    request_parameters.insert(
        "integration.request.header.Content-Type".to_string(),
        Value::String("'application/x-www-form-urlencoded'".to_string()),
    );

    let mut request_templates = IndexMap::new();
    request_templates.insert("application/json".to_string(), publish_envelope(topic));

    let mut success_templates = IndexMap::new();
    success_templates.insert(
        "application/json".to_string(),
        "#set ($root=$input.path('$')) { \"requestID\": \"$root.PublishResponse.PublishResult.MessageId\"}"
            .to_string(),
    );

    let mut error_templates = IndexMap::new();
    error_templates.insert(
        "application/json".to_string(),
        "{ \"message\": \"An unexpected error has occurred.\" }".to_string(),
    );

    let mut responses = IndexMap::new();
    responses.insert(
        "2\\d{2}".to_string(),
        IntegrationResponse {
            status_code: 202,
            response_parameters: IndexMap::new(),
            response_templates: success_templates,
        },
    );
    responses.insert(
        "default".to_string(),
        IntegrationResponse {
            status_code: 500,
            response_parameters: IndexMap::new(),
            response_templates: error_templates,
        },
    );

    Integration {
        integration_type: "aws".to_string(),
        http_method: Some("POST".to_string()),
        uri: Some(Value::String(
            "arn:aws:apigateway:${AWS::Region}:sns:path//".to_string(),
        )),
        credentials: Some(cfn::get_att(role_id, "Arn")),
        request_parameters,
        request_templates,
        passthrough_behavior: Some("NEVER".to_string()),
        responses,
    }
}

/// The form-encoded publish envelope, with the topic ARN spliced in through
/// a substitution expression
fn publish_envelope(topic: &str) -> Value {
    cfn::join(
        "",
        vec![
            json!("Action=Publish&"),
            json!("Subject=$context.httpMethod $context.resourcePath&"),
            json!("Message=$util.urlEncode(\"{"),
            json!("\"\"resourcePath\"\":\"\"$context.resourcePath\"\","),
            json!("\"\"httpMethod\"\":\"\"$context.httpMethod\"\","),
            json!("\"\"requestTime\"\":\"\"$context.requestTimeEpoch\"\","),
            json!("\"\"user\"\":\"\"$context.identity.user\"\","),
            json!("\"\"cognitoIdentityId\"\":\"\"$context.identity.cognitoIdentityId\"\","),
            json!("\"\"body\"\":$input.body}\")&"),
            json!("TopicArn=$util.urlEncode('"),
            cfn::sub(&format!("${{{topic}}}")),
            json!("')"),
        ],
    )
}
