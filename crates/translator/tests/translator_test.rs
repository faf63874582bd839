//! Integration tests for the vendor-marker translators

use mockall::mock;
use openapi_gateway_integrations_common::FunctionRegistry;
use openapi_gateway_integrations_translator::{
    translate_cors, translate_functions, translate_topics, ApiDocument, CORS_MARKER,
};
use serde_json::json;

mock! {
    Registry {}

    impl FunctionRegistry for Registry {
        fn is_declared(&self, name: &str) -> bool;
    }
}

#[test]
fn test_declared_reference_resolves_to_default_resource() {
    let document = ApiDocument::from_json(
        r#"{ "paths": { "/items": { "get": { "x-aws-lambda": "listItems" } } } }"#,
    )
    .unwrap();

    let mut registry = MockRegistry::new();
    registry
        .expect_is_declared()
        .returning(|name| name == "listItems");

    let (document, functions) = translate_functions(document, &registry);

    let keys: Vec<&String> = functions.keys().collect();
    assert_eq!(keys, vec!["ListItemsLambdaFunction"]);

    let (_, method) = document.paths["/items"].methods().next().unwrap();
    let uri = serde_json::to_value(method.integration.as_ref().unwrap().uri.as_ref().unwrap())
        .unwrap();
    assert_eq!(
        uri,
        json!({
            "Fn::Sub": "arn:aws:apigateway:${AWS::Region}:lambda:path/2015-03-31/functions/${ListItemsLambdaFunction.Arn}/invocations"
        })
    );
}

#[test]
fn test_undeclared_reference_is_used_verbatim() {
    let document = ApiDocument::from_json(
        r#"{ "paths": { "/items": { "get": { "x-aws-lambda": "SharedBackendFunction" } } } }"#,
    )
    .unwrap();

    let mut registry = MockRegistry::new();
    registry.expect_is_declared().returning(|_| false);

    let (_, functions) = translate_functions(document, &registry);
    let keys: Vec<&String> = functions.keys().collect();
    assert_eq!(keys, vec!["SharedBackendFunction"]);
}

#[test]
fn test_shared_backend_groups_registrations() {
    let document = ApiDocument::from_json(
        r#"{
            "paths": {
                "/items": {
                    "get": { "x-aws-lambda": "items" },
                    "post": { "x-aws-lambda": "items" }
                },
                "/items/{id}": {
                    "delete": { "x-aws-lambda": "items" }
                }
            }
        }"#,
    )
    .unwrap();

    let mut registry = MockRegistry::new();
    registry.expect_is_declared().returning(|_| false);

    let (_, functions) = translate_functions(document, &registry);
    assert_eq!(functions.len(), 1);

    let endpoints = &functions["items"];
    assert_eq!(endpoints.len(), 3);
    assert_eq!(endpoints[0].method, "GET");
    assert_eq!(endpoints[0].path, "/items");
    assert_eq!(endpoints[1].method, "POST");
    assert_eq!(endpoints[2].method, "DELETE");
    assert_eq!(endpoints[2].path, "/items/{id}");
}

#[test]
fn test_topic_registrations_use_verbatim_identifier() {
    let document = ApiDocument::from_json(
        r#"{
            "paths": {
                "/orders": {
                    "post": { "x-aws-sns": "OrdersTopic" },
                    "put": { "x-aws-sns": "OrdersTopic" }
                }
            }
        }"#,
    )
    .unwrap();

    let (document, topics) = translate_topics(document, "ApiGatewayOpenApi");
    assert_eq!(topics["OrdersTopic"].len(), 2);

    let (_, method) = document.paths["/orders"].methods().next().unwrap();
    let integration = method.integration.as_ref().unwrap();
    assert_eq!(integration.integration_type, "aws");
    assert_eq!(integration.passthrough_behavior.as_deref(), Some("NEVER"));

    // The TopicArn segment resolves to ${OrdersTopic} verbatim.
    let template =
        serde_json::to_value(&integration.request_templates["application/json"]).unwrap();
    let parts = template["Fn::Join"][1].as_array().unwrap();
    assert!(parts.contains(&json!({ "Fn::Sub": "${OrdersTopic}" })));
}

#[test]
fn test_cors_skips_paths_with_explicit_options() {
    let raw = r#"{
        "paths": {
            "/items": {
                "get": { "summary": "list" },
                "options": { "summary": "hand-written preflight" },
                "x-aws-cors": {}
            }
        }
    }"#;

    let before = ApiDocument::from_json(raw).unwrap();
    let after = translate_cors(before.clone());

    // Untouched, marker included.
    assert_eq!(before, after);
    assert!(after.paths["/items"].field(CORS_MARKER).is_some());
}

#[test]
fn test_cors_headers_deduplicate_case_insensitively() {
    let document = ApiDocument::from_json(
        r#"{
            "paths": {
                "/items": {
                    "get": {
                        "parameters": [
                            { "name": "X-Trace-Id", "in": "header" },
                            { "name": "X-Api-Key", "in": "Header" },
                            { "name": "limit", "in": "query" }
                        ]
                    },
                    "post": {
                        "parameters": [
                            { "name": "x-trace-id", "in": "header" }
                        ]
                    },
                    "x-aws-cors": {}
                }
            }
        }"#,
    )
    .unwrap();

    let document = translate_cors(document);
    let value = serde_json::to_value(&document).unwrap();

    let headers = &value["paths"]["/items"]["options"]["x-amazon-apigateway-integration"]
        ["responses"]["default"]["responseParameters"]
        ["method.response.header.Access-Control-Allow-Headers"];

    // First-seen casing wins; the query parameter is ignored.
    assert_eq!(*headers, json!("'X-Trace-Id,X-Api-Key'"));
}

#[test]
fn test_cors_preflight_shape() {
    let document = ApiDocument::from_json(
        r#"{
            "paths": {
                "/items": {
                    "get": { "x-aws-lambda": "listItems" },
                    "x-aws-cors": {}
                }
            }
        }"#,
    )
    .unwrap();

    let document = translate_cors(document);
    let value = serde_json::to_value(&document).unwrap();
    let options = &value["paths"]["/items"]["options"];

    assert_eq!(
        options["responses"]["200"]["description"],
        json!("Default CORS response")
    );
    assert_eq!(
        options["responses"]["200"]["headers"]["Access-Control-Allow-Origin"]["schema"]["type"],
        json!("string")
    );

    let integration = &options["x-amazon-apigateway-integration"];
    assert_eq!(integration["type"], json!("mock"));
    assert_eq!(integration["passthroughBehavior"], json!("never"));
    assert_eq!(
        integration["requestTemplates"]["application/json"],
        json!("{\"statusCode\":200}")
    );
    assert_eq!(
        integration["responses"]["default"]["statusCode"],
        json!(200)
    );
    assert_eq!(
        integration["responses"]["default"]["responseParameters"]
            ["method.response.header.Access-Control-Allow-Methods"],
        json!("'GET'")
    );

    // The marker is consumed.
    assert!(value["paths"]["/items"].get("x-aws-cors").is_none());
}

#[test]
fn test_translators_touch_disjoint_markers() {
    let document = ApiDocument::from_json(
        r#"{
            "paths": {
                "/items": { "get": { "x-aws-lambda": "listItems" } },
                "/orders": { "post": { "x-aws-sns": "OrdersTopic" } }
            }
        }"#,
    )
    .unwrap();

    let mut registry = MockRegistry::new();
    registry.expect_is_declared().returning(|_| false);

    let (document, topics) = translate_topics(document, "ApiGatewayOpenApi");
    let (document, functions) = translate_functions(document, &registry);

    assert_eq!(topics.len(), 1);
    assert_eq!(functions.len(), 1);

    let (_, get) = document.paths["/items"].methods().next().unwrap();
    assert_eq!(
        get.integration.as_ref().unwrap().integration_type,
        "aws_proxy"
    );
    let (_, post) = document.paths["/orders"].methods().next().unwrap();
    assert_eq!(post.integration.as_ref().unwrap().integration_type, "aws");
}
