//! CloudFormation resource shells and intrinsic functions
//!
//! Synthesized infrastructure objects are a resource-type tag plus a
//! property bag; anything else a template author attached to a resource
//! (conditions, metadata, deletion policies) is carried through untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A mutable mapping of logical resource name to resource definition
pub type Resources = IndexMap<String, Resource>;

/// One CloudFormation resource: type tag, optional dependencies, property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(rename = "DependsOn", default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,

    #[serde(rename = "Properties", default)]
    pub properties: Value,

    /// Resource-level fields outside the modeled set, preserved as-is
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Resource {
    pub fn new(resource_type: &str, properties: Value) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            depends_on: None,
            properties,
            extra: IndexMap::new(),
        }
    }
}

/// A CloudFormation template: the resource map plus whatever other
/// top-level sections the template declares
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "Resources", default)]
    pub resources: Resources,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Build an `Fn::Sub` expression value
pub fn sub(expression: &str) -> Value {
    json!({ "Fn::Sub": expression })
}

/// Build an `Fn::GetAtt` reference to an attribute of a logical resource
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// Build a `Ref` to a logical resource
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// Build an `Fn::Join` over mixed literal and intrinsic parts
pub fn join(separator: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [separator, parts] })
}
