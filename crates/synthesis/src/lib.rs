//! Resource synthesis for translated API documents
//!
//! The engine runs the three translators in a fixed order over the document
//! (topics, then functions, then preflight — the backend passes must run
//! before preflight synthesis inspects the declared parameters), then
//! derives the cross-cutting infrastructure from the accumulated endpoint
//! registrations: the shared execution role with one policy statement per
//! referenced backend, the gateway resource embedding the transformed
//! document, its deployment, and one invoke permission per compute
//! endpoint. Everything lands in the caller's resource collection.

use openapi_gateway_integrations_common::{
    bounded_param, bounded_pascal, cfn, Endpoint, EndpointMap, FunctionRegistry,
    IntegrationError, Resource, Resources, Result, ServiceContext,
};
use openapi_gateway_integrations_translator::{
    translate_cors, translate_functions, translate_topics, ApiDocument, TransformOptions,
};
use serde_json::{json, Value};

pub use openapi_gateway_integrations_translator::DEFAULT_GATEWAY_KEY;

/// Managed policy letting the gateway push execution logs
const LOGS_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AmazonAPIGatewayPushToCloudWatchLogs";

/// The aggregation engine: one transformation pass per build
pub struct GatewaySynthesizer<'a> {
    context: &'a ServiceContext,
    registry: &'a dyn FunctionRegistry,
}

impl<'a> GatewaySynthesizer<'a> {
    pub fn new(context: &'a ServiceContext, registry: &'a dyn FunctionRegistry) -> Self {
        Self { context, registry }
    }

    /// Translate the document and merge the synthesized resources into
    /// `resources`
    ///
    /// An absent body makes the whole run a no-op. Everything else is
    /// assumed well-formed; the only fallible step is re-embedding the
    /// transformed document as a property bag.
    pub fn process_document(
        &self,
        options: TransformOptions,
        resources: &mut Resources,
    ) -> Result<()> {
        let key = options.gateway_key().to_string();
        let endpoint_type = options
            .endpoint_type
            .clone()
            .unwrap_or_else(|| "regional".to_string());

        let Some(body) = options.body else {
            return Ok(());
        };

        let (body, topics) = translate_topics(body, &key);
        let (body, functions) = translate_functions(body, self.registry);
        let body = translate_cors(body);

        self.decorate_rest_api(&key, &endpoint_type, body, &topics, &functions, resources)
    }

    fn decorate_rest_api(
        &self,
        key: &str,
        endpoint_type: &str,
        body: ApiDocument,
        topics: &EndpointMap,
        functions: &EndpointMap,
        resources: &mut Resources,
    ) -> Result<()> {
        let mut policies = Vec::new();
        if !topics.is_empty() {
            policies.push(self.topics_policy(topics));
        }
        if !functions.is_empty() {
            policies.push(self.functions_policy(functions));
        }

        resources.insert(format!("{key}Role"), self.execution_role(policies));

        let body = serde_json::to_value(&body).map_err(|e| {
            IntegrationError::Synthesis(format!("Failed to embed document body: {e}"))
        })?;
        match resources.get_mut(key) {
            Some(existing) => match existing.properties.as_object_mut() {
                Some(properties) => {
                    properties.insert("Body".to_string(), body);
                }
                None => existing.properties = json!({ "Body": body }),
            },
            None => {
                resources.insert(
                    key.to_string(),
                    Resource::new(
                        "AWS::ApiGateway::RestApi",
                        json!({
                            "Body": body,
                            "EndpointConfiguration": { "Types": [endpoint_type] }
                        }),
                    ),
                );
            }
        }

        let mut deployment = Resource::new(
            "AWS::ApiGateway::Deployment",
            json!({
                "RestApiId": cfn::reference(key),
                "StageName": self.context.stage
            }),
        );
        deployment.depends_on = Some(vec![key.to_string()]);
        resources.insert(format!("{key}Deployment"), deployment);

        for (function, endpoints) in functions {
            for endpoint in endpoints {
                resources.insert(
                    permission_id(function, endpoint),
                    self.invoke_permission(key, function, endpoint),
                );
            }
        }

        Ok(())
    }

    fn execution_role(&self, policies: Vec<Value>) -> Resource {
        Resource::new(
            "AWS::IAM::Role",
            json!({
                "RoleName": bounded_param(
                    &format!("{}-open-api", self.context.service),
                    &format!("role-{}", self.context.stage)
                ),
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [
                        {
                            "Effect": "Allow",
                            "Principal": { "Service": "apigateway.amazonaws.com" },
                            "Action": ["sts:AssumeRole"]
                        }
                    ]
                },
                "Policies": policies,
                "ManagedPolicyArns": [LOGS_POLICY_ARN]
            }),
        )
    }

    fn topics_policy(&self, topics: &EndpointMap) -> Value {
        let statements: Vec<Value> = topics
            .keys()
            .map(|topic| {
                json!({
                    "Effect": "Allow",
                    "Action": "sns:Publish",
                    "Resource": cfn::sub(&format!("${{{topic}}}"))
                })
            })
            .collect();

        json!({
            "PolicyName": bounded_param(
                &format!("{}-open-api", self.context.service),
                &format!("topics-policy-{}", self.context.stage)
            ),
            "PolicyDocument": { "Version": "2012-10-17", "Statement": statements }
        })
    }

    fn functions_policy(&self, functions: &EndpointMap) -> Value {
        let statements: Vec<Value> = functions
            .keys()
            .map(|function| {
                json!({
                    "Effect": "Allow",
                    "Action": "lambda:InvokeFunction",
                    "Resource": cfn::sub(&format!("${{{function}.Arn}}"))
                })
            })
            .collect();

        json!({
            "PolicyName": bounded_param(
                &format!("{}-open-api", self.context.service),
                &format!("functions-policy-{}", self.context.stage)
            ),
            "PolicyDocument": { "Version": "2012-10-17", "Statement": statements }
        })
    }

    fn invoke_permission(&self, key: &str, function: &str, endpoint: &Endpoint) -> Resource {
        let path = endpoint.path.strip_suffix('/').unwrap_or(&endpoint.path);
        let source_arn = format!(
            "arn:aws:execute-api:${{AWS::Region}}:${{AWS::AccountId}}:${{{key}}}/*/{}{}",
            endpoint.method, path
        );

        Resource::new(
            "AWS::Lambda::Permission",
            json!({
                "FunctionName": cfn::sub(&format!("${{{function}.Arn}}")),
                "Action": "lambda:InvokeFunction",
                "Principal": cfn::sub("apigateway.${AWS::URLSuffix}"),
                "SourceArn": cfn::sub(&source_arn)
            }),
        )
    }
}

/// Logical id of an endpoint's invoke permission, unique per registration
/// and bounded like every other synthesized name
fn permission_id(function: &str, endpoint: &Endpoint) -> String {
    bounded_pascal(
        &format!("{}-{}-{}", function, endpoint.method, endpoint.path),
        "Permission",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NothingDeclared;

    impl FunctionRegistry for NothingDeclared {
        fn is_declared(&self, _name: &str) -> bool {
            false
        }
    }

    fn context() -> ServiceContext {
        ServiceContext {
            service: "orders".to_string(),
            stage: "dev".to_string(),
        }
    }

    #[test]
    fn test_absent_body_is_a_noop() {
        let context = context();
        let synthesizer = GatewaySynthesizer::new(&context, &NothingDeclared);
        let mut resources = Resources::new();

        synthesizer
            .process_document(TransformOptions::default(), &mut resources)
            .unwrap();
        assert!(resources.is_empty());
    }

    #[test]
    fn test_permission_ids_are_distinct_per_endpoint() {
        let get = Endpoint {
            method: "GET".to_string(),
            path: "/items".to_string(),
        };
        let post = Endpoint {
            method: "POST".to_string(),
            path: "/items".to_string(),
        };

        let a = permission_id("ItemsLambdaFunction", &get);
        let b = permission_id("ItemsLambdaFunction", &post);
        assert_ne!(a, b);
        assert!(a.ends_with("Permission"));
        assert_eq!(a, "ItemsLambdaFunctionGetItemsPermission");
    }

    #[test]
    fn test_role_names_are_stage_scoped() {
        let context = context();
        let synthesizer = GatewaySynthesizer::new(&context, &NothingDeclared);
        let role = synthesizer.execution_role(Vec::new());

        assert_eq!(role.resource_type, "AWS::IAM::Role");
        assert_eq!(
            role.properties["RoleName"],
            serde_json::json!("orders-open-api-role-dev")
        );
        assert_eq!(
            role.properties["ManagedPolicyArns"][0],
            serde_json::json!(LOGS_POLICY_ARN)
        );
    }
}
