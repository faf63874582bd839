//! The API document model
//!
//! A lenient, order-preserving representation of an OpenAPI-style document:
//! the fields the translators act on are typed, everything else rides along
//! in flattened property bags. Key order follows document declaration order
//! throughout, so repeated runs over the same input produce identical
//! output.

use indexmap::IndexMap;
use openapi_gateway_integrations_common::{is_http_method, IntegrationError, Result};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// The full API description: a tree of paths, methods and properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// API metadata block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One URL path's entries, in declaration order
///
/// An entry is a method if and only if its key is one of the seven
/// recognized HTTP verbs; every other key (shared parameters, summaries,
/// vendor markers) is an ordinary field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub entries: IndexMap<String, PathEntry>,
}

/// A path item entry: either an HTTP method or any other field
#[derive(Debug, Clone, PartialEq)]
pub enum PathEntry {
    Method(MethodSpec),
    Field(Value),
}

impl PathItem {
    /// The path's methods, in declaration order
    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodSpec)> {
        self.entries.iter().filter_map(|(key, entry)| match entry {
            PathEntry::Method(method) => Some((key.as_str(), method)),
            PathEntry::Field(_) => None,
        })
    }

    /// Mutable variant of [`PathItem::methods`]
    pub fn methods_mut(&mut self) -> impl Iterator<Item = (&str, &mut MethodSpec)> {
        self.entries
            .iter_mut()
            .filter_map(|(key, entry)| match entry {
                PathEntry::Method(method) => Some((key.as_str(), method)),
                PathEntry::Field(_) => None,
            })
    }

    pub fn has_method(&self, verb: &str) -> bool {
        matches!(self.entries.get(verb), Some(PathEntry::Method(_)))
    }

    /// A non-method field by key
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key) {
            Some(PathEntry::Field(value)) => Some(value),
            _ => None,
        }
    }

    /// Append a method; the new entry lands after the existing keys
    pub fn insert_method(&mut self, verb: &str, method: MethodSpec) {
        self.entries
            .insert(verb.to_string(), PathEntry::Method(method));
    }

    /// Remove a non-method field, keeping the remaining entries in order
    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(PathEntry::Field(_)) => match self.entries.shift_remove(key) {
                Some(PathEntry::Field(value)) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut entries = IndexMap::with_capacity(raw.len());

        for (key, value) in raw {
            let entry = if is_http_method(&key) {
                let method = serde_json::from_value(value).map_err(D::Error::custom)?;
                PathEntry::Method(method)
            } else {
                PathEntry::Field(value)
            };
            entries.insert(key, entry);
        }

        Ok(PathItem { entries })
    }
}

impl Serialize for PathItem {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            match entry {
                PathEntry::Method(method) => map.serialize_entry(key, method)?,
                PathEntry::Field(value) => map.serialize_entry(key, value)?,
            }
        }
        map.end()
    }
}

/// One HTTP method on one path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Compute-backend marker; left in place after translation
    #[serde(
        rename = "x-aws-lambda",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub function_reference: Option<String>,

    /// Topic marker; left in place after translation
    #[serde(
        rename = "x-aws-sns",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_reference: Option<String>,

    #[serde(
        rename = "x-amazon-apigateway-integration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub integration: Option<Integration>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A declared request parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Parameter location: query, header, path, cookie
    #[serde(rename = "in")]
    pub location: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A gateway integration block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    #[serde(rename = "type")]
    pub integration_type: String,

    #[serde(rename = "httpMethod", default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,

    #[serde(
        rename = "requestParameters",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_parameters: IndexMap<String, Value>,

    #[serde(
        rename = "requestTemplates",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_templates: IndexMap<String, Value>,

    #[serde(
        rename = "passthroughBehavior",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub passthrough_behavior: Option<String>,

    /// Response mappings; always serialized, the proxy integration carries
    /// an explicit empty map
    #[serde(default)]
    pub responses: IndexMap<String, IntegrationResponse>,
}

/// One integration response mapping, keyed by status pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    #[serde(
        rename = "responseParameters",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub response_parameters: IndexMap<String, String>,

    #[serde(
        rename = "responseTemplates",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub response_templates: IndexMap<String, String>,
}

impl ApiDocument {
    /// Parse a document from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| IntegrationError::Parse(format!("Failed to parse JSON document: {e}")))
    }

    /// Parse a document from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| IntegrationError::Parse(format!("Failed to parse YAML document: {e}")))
    }

    /// Load a document from a file, picking the format by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            IntegrationError::Parse(format!("Failed to read document {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_keys_become_methods() {
        let document = ApiDocument::from_json(
            r#"{
                "paths": {
                    "/items": {
                        "summary": "Items collection",
                        "get": { "x-aws-lambda": "listItems" },
                        "post": { "x-aws-sns": "ItemsTopic" },
                        "x-aws-cors": {}
                    }
                }
            }"#,
        )
        .unwrap();

        let item = &document.paths["/items"];
        let verbs: Vec<&str> = item.methods().map(|(verb, _)| verb).collect();
        assert_eq!(verbs, vec!["get", "post"]);
        assert!(item.field("summary").is_some());
        assert!(item.field("x-aws-cors").is_some());
        assert!(item.field("get").is_none());
    }

    #[test]
    fn test_path_item_with_only_fields_has_no_methods() {
        let document = ApiDocument::from_json(
            r#"{ "paths": { "/items": { "summary": "s", "description": "d" } } }"#,
        )
        .unwrap();

        assert_eq!(document.paths["/items"].methods().count(), 0);
    }

    #[test]
    fn test_roundtrip_preserves_entry_order() {
        let raw = r#"{
            "openapi": "3.0.0",
            "paths": {
                "/items": {
                    "summary": "Items",
                    "get": { "responses": { "200": { "description": "ok" } } },
                    "delete": {}
                }
            }
        }"#;

        let document = ApiDocument::from_json(raw).unwrap();
        let value = serde_json::to_value(&document).unwrap();
        let keys: Vec<&String> = value["paths"]["/items"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["summary", "get", "delete"]);
    }

    #[test]
    fn test_unknown_method_fields_survive() {
        let document = ApiDocument::from_json(
            r#"{
                "paths": {
                    "/items": {
                        "get": {
                            "operationId": "listItems",
                            "parameters": [{ "name": "X-Trace-Id", "in": "header" }]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let (_, method) = document.paths["/items"].methods().next().unwrap();
        assert_eq!(method.extra["operationId"], json!("listItems"));
        assert_eq!(method.parameters[0].name, "X-Trace-Id");
        assert_eq!(method.parameters[0].location, "header");
    }

    #[test]
    fn test_yaml_documents_parse() {
        let document = ApiDocument::from_yaml(
            "openapi: 3.0.0\ninfo:\n  title: Orders\n  version: 1.0.0\npaths:\n  /items:\n    get:\n      x-aws-lambda: listItems\n",
        )
        .unwrap();

        assert_eq!(document.info.unwrap().title.as_deref(), Some("Orders"));
        let (_, method) = document.paths["/items"].methods().next().unwrap();
        assert_eq!(method.function_reference.as_deref(), Some("listItems"));
    }
}
