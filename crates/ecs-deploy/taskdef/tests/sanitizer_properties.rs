//! Property tests: cleaned task definitions are minimal and stable.

use ecs_deploy_taskdef::{clean, IGNORED_ATTRIBUTES};
use proptest::prelude::*;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Keys drawn from the paths the sanitizer treats specially, plus a few
/// ordinary and read-only ones.
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("proxyConfiguration"),
        Just("properties"),
        Just("containerDefinitions"),
        Just("environment"),
        Just("name"),
        Just("value"),
        Just("family"),
        Just("status"),
        Just("revision"),
        Just("registeredAt"),
    ]
    .prop_map(String::from)
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i64..3).prop_map(Value::from),
        prop_oneof![Just(""), Just("x"), Just("EC2")].prop_map(Value::from),
    ]
}

/// Generate an arbitrary descriptor tree.
fn arb_descriptor() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(5, 96, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map(arb_key(), inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Generate a descriptor that is always a mapping at the top.
fn arb_task_definition() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(arb_key(), arb_descriptor(), 0..8)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

fn is_proxy_property(path: &[String]) -> bool {
    path == ["proxyConfiguration", "properties", "[]"]
}

fn is_proxy_properties(path: &[String]) -> bool {
    path == ["proxyConfiguration", "properties"]
}

fn is_environment_entry(path: &[String]) -> bool {
    path == ["containerDefinitions", "[]", "environment", "[]"]
}

/// Walk a cleaned tree and return the first placeholder that should not be
/// there, with its path.
fn find_placeholder(value: &Value, path: &mut Vec<String>) -> Option<String> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let allowed_empty_string = is_proxy_property(path)
                    || (key == "value" && is_environment_entry(path));
                let bad = match child {
                    Value::Null => true,
                    Value::String(s) => s.is_empty() && !allowed_empty_string,
                    Value::Array(items) => items.is_empty(),
                    Value::Object(inner) => inner.is_empty(),
                    _ => false,
                };
                if bad {
                    return Some(format!("{}.{} = {}", path.join("."), key, child));
                }
                path.push(key.clone());
                let found = find_placeholder(child, path);
                path.pop();
                if found.is_some() {
                    return found;
                }
            }
            None
        }
        Value::Array(items) => {
            for item in items {
                let bad = match item {
                    Value::Null => true,
                    Value::String(s) => s.is_empty() && !is_proxy_properties(path),
                    Value::Object(inner) => inner.is_empty(),
                    Value::Array(inner) => inner.is_empty(),
                    _ => false,
                };
                if bad {
                    return Some(format!("{}[] = {}", path.join("."), item));
                }
                path.push("[]".into());
                let found = find_placeholder(item, path);
                path.pop();
                if found.is_some() {
                    return found;
                }
            }
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Cleaning a cleaned descriptor changes nothing.
    #[test]
    fn clean_is_idempotent(descriptor in arb_descriptor()) {
        let once = clean(descriptor);
        let twice = clean(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// No null, empty sequence, empty mapping or empty string survives,
    /// except the values the register call needs.
    #[test]
    fn cleaned_descriptor_has_no_placeholders(descriptor in arb_task_definition()) {
        let cleaned = clean(descriptor);
        let found = find_placeholder(&cleaned, &mut Vec::new());
        prop_assert!(found.is_none(), "placeholder survived: {:?}", found);
    }

    /// Read-only attributes never reach the register call.
    #[test]
    fn read_only_attributes_are_stripped(descriptor in arb_task_definition()) {
        let cleaned = clean(descriptor);
        let map = cleaned.as_object().expect("mapping stays a mapping");
        for attribute in IGNORED_ATTRIBUTES {
            prop_assert!(!map.contains_key(*attribute), "{} survived", attribute);
        }
    }

    /// Every proxy property carries a name and a value.
    #[test]
    fn proxy_properties_are_complete(properties in prop::collection::vec(arb_descriptor(), 0..6)) {
        let descriptor = serde_json::json!({
            "family": "f",
            "proxyConfiguration": { "type": "APPMESH", "properties": properties }
        });
        let cleaned = clean(descriptor);
        if let Some(entries) = cleaned
            .pointer("/proxyConfiguration/properties")
            .and_then(Value::as_array)
        {
            for entry in entries.iter().filter_map(Value::as_object) {
                prop_assert!(entry.contains_key("name"));
                prop_assert!(entry.contains_key("value"));
            }
        }
    }
}
