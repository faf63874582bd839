//! Post-deploy gateway deployment creation
//!
//! Once the stack update has materialized the gateway, a new API Gateway
//! deployment must be issued for the stage to serve the updated document.
//! The sequence is coordinated I/O with no algorithmic content: look up the
//! gateway's physical id among the deployed stack resources, then issue a
//! single CreateDeployment call. There is no retry layer; any control-plane
//! failure propagates to the caller.
//!
//! The control plane is an injected seam so the sequencing is testable
//! without live credentials; [`AwsControlPlane`] is the production
//! implementation.

use openapi_gateway_integrations_common::{IntegrationError, Result};
use openapi_gateway_integrations_translator::{Info, TransformOptions};

/// One already-deployed stack resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackResource {
    pub logical_id: String,
    pub physical_id: String,
}

/// The two control-plane calls the deployment step needs
pub trait ControlPlane {
    /// List the resources of a deployed stack
    fn stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>>;

    /// Create a new gateway deployment for a stage
    fn create_deployment(&self, rest_api_id: &str, stage_name: &str) -> Result<()>;
}

/// Externally resolved deployment inputs
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub stack_name: String,
    pub stage: String,

    /// Version substituted into the document's info block when the options
    /// request it; resolved by the caller from the project manifest
    pub package_version: Option<String>,
}

/// Outcome of a deployment run, for caller-side reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Deployment updates are disabled in the options
    Skipped,
    Deployed { rest_api_id: String },
}

/// Create a new gateway deployment for the configured stage
///
/// No-op when the options disable deployment updates. A missing gateway
/// resource in the deployed stack is fatal and propagates to the caller.
pub fn deploy_api(
    options: &mut TransformOptions,
    target: &DeployTarget,
    plane: &dyn ControlPlane,
) -> Result<DeployOutcome> {
    if options.update_deployment == Some(false) {
        return Ok(DeployOutcome::Skipped);
    }

    if options.use_package_version.unwrap_or(false) {
        if let (Some(body), Some(version)) =
            (options.body.as_mut(), target.package_version.as_deref())
        {
            body.info.get_or_insert_with(Info::default).version = Some(version.to_string());
        }
    }

    let key = options.gateway_key();
    let deployed = plane.stack_resources(&target.stack_name)?;
    let gateway = deployed
        .iter()
        .find(|resource| resource.logical_id == key)
        .ok_or_else(|| {
            IntegrationError::Deploy(format!(
                "stack {} has no resource {}; was the gateway deployed?",
                target.stack_name, key
            ))
        })?;

    plane.create_deployment(&gateway.physical_id, &target.stage)?;

    Ok(DeployOutcome::Deployed {
        rest_api_id: gateway.physical_id.clone(),
    })
}

/// Live control plane over the AWS SDK
///
/// Owns a current-thread runtime; the SDK calls are the only asynchronous
/// boundary of the whole tool and are awaited to completion.
pub struct AwsControlPlane {
    runtime: tokio::runtime::Runtime,
    cloudformation: aws_sdk_cloudformation::Client,
    apigateway: aws_sdk_apigateway::Client,
}

impl AwsControlPlane {
    /// Resolve credentials and region from the ambient chain, with an
    /// optional explicit region override
    pub fn new(region: Option<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let config = runtime.block_on(async {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(aws_config::Region::new(region));
            }
            loader.load().await
        });

        Ok(Self {
            cloudformation: aws_sdk_cloudformation::Client::new(&config),
            apigateway: aws_sdk_apigateway::Client::new(&config),
            runtime,
        })
    }
}

impl ControlPlane for AwsControlPlane {
    fn stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>> {
        let output = self
            .runtime
            .block_on(
                self.cloudformation
                    .describe_stack_resources()
                    .stack_name(stack_name)
                    .send(),
            )
            .map_err(|e| {
                IntegrationError::Deploy(format!(
                    "DescribeStackResources failed for {stack_name}: {e}"
                ))
            })?;

        Ok(output
            .stack_resources()
            .iter()
            .filter_map(|resource| {
                match (
                    resource.logical_resource_id(),
                    resource.physical_resource_id(),
                ) {
                    (Some(logical), Some(physical)) => Some(StackResource {
                        logical_id: logical.to_string(),
                        physical_id: physical.to_string(),
                    }),
                    _ => None,
                }
            })
            .collect())
    }

    fn create_deployment(&self, rest_api_id: &str, stage_name: &str) -> Result<()> {
        self.runtime
            .block_on(
                self.apigateway
                    .create_deployment()
                    .rest_api_id(rest_api_id)
                    .stage_name(stage_name)
                    .send(),
            )
            .map_err(|e| {
                IntegrationError::Deploy(format!("CreateDeployment failed for {rest_api_id}: {e}"))
            })?;

        Ok(())
    }
}
