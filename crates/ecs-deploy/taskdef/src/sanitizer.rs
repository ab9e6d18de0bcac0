//! Register-payload sanitizer
//!
//! The ECS `DescribeTaskDefinition` response and the `RegisterTaskDefinition`
//! request share a schema, but the former carries read-only, server-assigned
//! fields and empty placeholders for unset optional blocks. Submitting those
//! verbatim is rejected by the register call, so every descriptor goes
//! through [`clean`] first.
//!
//! The traversal is a single recursion that carries a [`Scope`] derived from
//! the structural path. Two paths are special:
//!
//! - `proxyConfiguration.properties[*]`: empty strings are meaningful for
//!   App Mesh proxy settings and are kept; every entry ends up with both a
//!   `name` and a `value`.
//! - `containerDefinitions[*].environment[*]`: an entry that survives
//!   cleaning keeps an (empty) `value`.

use serde_json::{Map, Value};
use tracing::debug;

/// Top-level attributes assigned by the service that the register call rejects
pub const IGNORED_ATTRIBUTES: &[&str] = &[
    "compatibilities",
    "taskDefinitionArn",
    "requiresAttributes",
    "revision",
    "status",
    "registeredAt",
    "deregisteredAt",
    "registeredBy",
];

/// Position of a value in the descriptor tree, as far as cleaning cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Nested,
    ProxyConfiguration,
    ProxyProperties,
    ProxyProperty,
    ContainerDefinitions,
    ContainerDefinition,
    Environment,
    EnvironmentEntry,
}

impl Scope {
    /// Scope of the value stored under `key` in a mapping of this scope
    fn child(self, key: &str) -> Scope {
        match (self, key) {
            (Scope::Root, "proxyConfiguration") => Scope::ProxyConfiguration,
            (Scope::ProxyConfiguration, "properties") => Scope::ProxyProperties,
            (Scope::Root, "containerDefinitions") => Scope::ContainerDefinitions,
            (Scope::ContainerDefinition, "environment") => Scope::Environment,
            _ => Scope::Nested,
        }
    }

    /// Scope of the elements of a sequence of this scope
    fn element(self) -> Scope {
        match self {
            Scope::ProxyProperties => Scope::ProxyProperty,
            Scope::ContainerDefinitions => Scope::ContainerDefinition,
            Scope::Environment => Scope::EnvironmentEntry,
            _ => Scope::Nested,
        }
    }
}

/// Reduce a task definition to the minimal payload accepted by
/// `RegisterTaskDefinition`.
///
/// Never fails: values that are neither mappings nor sequences are returned
/// unchanged, and cleaning an already clean descriptor is a no-op.
pub fn clean(descriptor: Value) -> Value {
    let mut cleaned = clean_value(descriptor, Scope::Root);

    if let Value::Object(map) = &mut cleaned {
        for attribute in IGNORED_ATTRIBUTES {
            if map.remove(*attribute).is_some() {
                debug!(attribute, "Dropped read-only task definition attribute");
            }
        }
    }

    cleaned
}

fn clean_value(value: Value, scope: Scope) -> Value {
    match value {
        Value::Object(map) => Value::Object(clean_map(map, scope)),
        Value::Array(items) => Value::Array(clean_sequence(items, scope)),
        other => other,
    }
}

fn clean_map(map: Map<String, Value>, scope: Scope) -> Map<String, Value> {
    let mut cleaned = Map::with_capacity(map.len());

    for (key, value) in map {
        let value = clean_value(value, scope.child(&key));
        if !is_empty(&value, scope == Scope::ProxyProperty) {
            cleaned.insert(key, value);
        }
    }

    match scope {
        Scope::ProxyProperty => {
            cleaned.entry("name").or_insert_with(empty_string);
            cleaned.entry("value").or_insert_with(empty_string);
        }
        Scope::EnvironmentEntry if !cleaned.is_empty() => {
            cleaned.entry("value").or_insert_with(empty_string);
        }
        _ => {}
    }

    cleaned
}

fn clean_sequence(items: Vec<Value>, scope: Scope) -> Vec<Value> {
    let element = scope.element();
    items
        .into_iter()
        .map(|item| clean_value(item, element))
        .filter(|item| !is_empty(item, scope == Scope::ProxyProperties))
        .collect()
}

/// A value that must not be submitted: `null`, `[]`, `{}` and, outside the
/// proxy properties, `""`.
fn is_empty(value: &Value, keep_empty_strings: bool) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() && !keep_empty_strings,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn empty_string() -> Value {
    Value::String(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_keys_are_removed() {
        let cleaned = clean(json!({ "ipcMode": null, "family": "task-def-family" }));
        assert_eq!(cleaned, json!({ "family": "task-def-family" }));
    }

    #[test]
    fn test_empty_arrays_are_removed() {
        let cleaned = clean(json!({ "tags": [], "family": "task-def-family" }));
        assert_eq!(cleaned, json!({ "family": "task-def-family" }));
    }

    #[test]
    fn test_read_only_attributes_are_removed() {
        let cleaned = clean(json!({
            "compatibilities": ["EC2"],
            "taskDefinitionArn": "arn:aws...:task-def-family:1",
            "family": "task-def-family",
            "revision": 1,
            "status": "ACTIVE",
            "requiresAttributes": [{ "name": "ecs.capability.execution-role-awslogs" }],
            "registeredAt": 1611690781,
            "deregisteredAt": 1611690782,
            "registeredBy": "arn:aws:iam::1:user/ci"
        }));
        assert_eq!(cleaned, json!({ "family": "task-def-family" }));
    }

    #[test]
    fn test_read_only_attributes_only_stripped_at_top_level() {
        let cleaned = clean(json!({
            "family": "f",
            "containerDefinitions": [{ "name": "web", "status": "kept" }]
        }));
        assert_eq!(cleaned["containerDefinitions"][0]["status"], "kept");
    }

    #[test]
    fn test_empty_strings_and_objects_are_removed() {
        let cleaned = clean(json!({
            "memory": "",
            "containerDefinitions": [{
                "name": "sample-container",
                "logConfiguration": {},
                "repositoryCredentials": { "credentialsParameter": "" },
                "command": [""],
                "environment": [
                    { "name": "hello", "value": "world" },
                    { "name": "test", "value": "" },
                    { "name": "", "value": "" }
                ],
                "secretOptions": [{ "name": "", "valueFrom": "" }],
                "cpu": 0,
                "essential": false
            }],
            "requiresCompatibilities": ["EC2"],
            "registeredAt": 1611690781,
            "family": "task-def-family"
        }));

        assert_eq!(
            cleaned,
            json!({
                "family": "task-def-family",
                "containerDefinitions": [{
                    "name": "sample-container",
                    "cpu": 0,
                    "essential": false,
                    "environment": [
                        { "name": "hello", "value": "world" },
                        { "name": "test", "value": "" }
                    ]
                }],
                "requiresCompatibilities": ["EC2"]
            })
        );
    }

    #[test]
    fn test_proxy_properties_keep_empty_values() {
        let cleaned = clean(json!({
            "family": "task-def-family",
            "containerDefinitions": [{
                "name": "sample-container",
                "environment": [
                    { "name": "hello", "value": "world" },
                    { "name": "", "value": "" }
                ]
            }],
            "proxyConfiguration": {
                "type": "APPMESH",
                "containerName": "envoy",
                "properties": [
                    { "name": "ProxyIngressPort", "value": "15000" },
                    { "name": "IgnoredGID", "value": "" },
                    { "name": "EgressIgnoredPorts", "value": "" },
                    { "value": "some-value" }
                ]
            }
        }));

        assert_eq!(
            cleaned,
            json!({
                "family": "task-def-family",
                "containerDefinitions": [{
                    "name": "sample-container",
                    "environment": [{ "name": "hello", "value": "world" }]
                }],
                "proxyConfiguration": {
                    "type": "APPMESH",
                    "containerName": "envoy",
                    "properties": [
                        { "name": "ProxyIngressPort", "value": "15000" },
                        { "name": "IgnoredGID", "value": "" },
                        { "name": "EgressIgnoredPorts", "value": "" },
                        { "name": "", "value": "some-value" }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_proxy_exception_is_path_bound() {
        // Same shape outside proxyConfiguration.properties loses the empty value
        let cleaned = clean(json!({
            "family": "f",
            "placementConstraints": [{ "type": "memberOf", "expression": "" }],
            "volumes": [{ "name": "", "host": { "sourcePath": "" } }],
            "properties": [{ "name": "IgnoredGID", "value": "" }]
        }));
        assert_eq!(
            cleaned,
            json!({
                "family": "f",
                "placementConstraints": [{ "type": "memberOf" }],
                "properties": [{ "name": "IgnoredGID" }]
            })
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(clean(json!("")), json!(""));
        assert_eq!(clean(json!(null)), json!(null));
        assert_eq!(clean(json!(42)), json!(42));
    }

    #[test]
    fn test_clean_is_idempotent_on_example() {
        let once = clean(json!({
            "family": "f",
            "containerDefinitions": [{
                "name": "c",
                "environment": [{ "name": "A", "value": "" }, { "value": "" }]
            }],
            "proxyConfiguration": { "properties": [{ "name": "X" }, {}] }
        }));
        assert_eq!(clean(once.clone()), once);
    }
}
