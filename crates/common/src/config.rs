//! Project configuration loading
//!
//! The translator is driven by a small YAML file in the host project. It
//! supplies the identity the host framework would otherwise provide (service
//! name, stage, region, stack name), the list of declared compute functions,
//! and the gateway options block.
//!
//! ```yaml
//! service: orders
//! stage: dev
//! region: eu-west-1
//! functions:
//!   - listItems
//!   - createItem
//! openapi:
//!   file: openapi.yml
//!   endpoint_type: regional
//!   update_deployment: true
//! ```

use crate::{FunctionRegistry, IntegrationError, Result, ServiceContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root structure of the project configuration file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Service name, used in synthesized role and policy names
    pub service: String,

    /// Deployment stage (e.g. "dev", "production")
    pub stage: String,

    /// AWS region override; the ambient credential chain decides if absent
    #[serde(default)]
    pub region: Option<String>,

    /// CloudFormation stack name; defaults to `{service}-{stage}`
    #[serde(default)]
    pub stack_name: Option<String>,

    /// Declared compute function identifiers
    #[serde(default)]
    pub functions: Vec<String>,

    /// Gateway options block
    #[serde(default)]
    pub openapi: OpenApiOptions,
}

/// The gateway options block of the configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenApiOptions {
    /// Path to the OpenAPI document, relative to the configuration file
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Logical id of the gateway resource
    #[serde(default)]
    pub key: Option<String>,

    /// Gateway endpoint type ("regional", "edge", "private")
    #[serde(default)]
    pub endpoint_type: Option<String>,

    /// Whether the post-deploy step creates a new gateway deployment
    #[serde(default)]
    pub update_deployment: Option<bool>,

    /// Whether the package version is substituted into the document's
    /// info block before deployment
    #[serde(default)]
    pub use_package_version: Option<bool>,
}

impl ProjectConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IntegrationError::Parse(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            IntegrationError::Parse(format!(
                "Failed to parse configuration file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// The service identity used by the synthesis engine
    pub fn context(&self) -> ServiceContext {
        ServiceContext {
            service: self.service.clone(),
            stage: self.stage.clone(),
        }
    }

    /// The CloudFormation stack name, explicit or derived
    pub fn stack_name(&self) -> String {
        self.stack_name
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.service, self.stage))
    }
}

impl FunctionRegistry for ProjectConfig {
    fn is_declared(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
service: orders
stage: dev
region: eu-west-1
functions:
  - listItems
  - createItem
openapi:
  file: openapi.yml
  key: OrdersApi
  endpoint_type: regional
  update_deployment: false
  use_package_version: true
"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = ProjectConfig::load(file.path()).unwrap();
        assert_eq!(config.service, "orders");
        assert_eq!(config.stage, "dev");
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.openapi.key.as_deref(), Some("OrdersApi"));
        assert_eq!(config.openapi.update_deployment, Some(false));
        assert!(config.is_declared("listItems"));
        assert!(!config.is_declared("deleteItem"));
    }

    #[test]
    fn test_minimal_config_defaults() {
        let yaml = "service: orders\nstage: dev\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.functions.is_empty());
        assert!(config.openapi.key.is_none());
        assert_eq!(config.stack_name(), "orders-dev");
    }

    #[test]
    fn test_explicit_stack_name_wins() {
        let yaml = "service: orders\nstage: dev\nstack_name: orders-infra\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.stack_name(), "orders-infra");
    }
}
