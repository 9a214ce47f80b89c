//! Differ - Compare the prior state of a resource with its desired values
//!
//! Decides which of the four remote operations a resource needs and which
//! attribute paths changed.

use crate::schema::{FieldKind, FieldSpec, ResourceSpec};
use crate::value::{LocalTree, LocalValue, join_path};

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create,
    /// Resource exists with differences -> needs update
    Update { changed_paths: Vec<String> },
    /// Resource exists with no differences -> no action needed
    NoChange,
    /// Resource exists but is no longer desired -> needs deletion
    Delete,
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange)
    }
}

/// Compare prior state with desired values to compute a Diff
pub fn diff(spec: &ResourceSpec, prior: Option<&LocalTree>, desired: Option<&LocalTree>) -> Diff {
    match (prior, desired) {
        (None, None) => Diff::NoChange,
        (None, Some(_)) => Diff::Create,
        (Some(_), None) => Diff::Delete,
        (Some(prior), Some(desired)) => {
            let changed_paths = changed_paths(&spec.fields, prior, desired);
            if changed_paths.is_empty() {
                Diff::NoChange
            } else {
                Diff::Update { changed_paths }
            }
        }
    }
}

/// Paths of declared fields whose values differ
///
/// Object lists present on both sides are compared element by element, and
/// report `field.index.child` paths; an element present on one side only is
/// reported as `field.index`.
pub fn changed_paths(fields: &[FieldSpec], prior: &LocalTree, desired: &LocalTree) -> Vec<String> {
    let mut changed = Vec::new();
    collect_changes(fields, "", prior, desired, &mut changed);
    changed
}

fn collect_changes(
    fields: &[FieldSpec],
    prefix: &str,
    prior: &LocalTree,
    desired: &LocalTree,
    changed: &mut Vec<String>,
) {
    for field in fields {
        let path = join_path(prefix, &field.local_name);
        match (prior.get(&field.local_name), desired.get(&field.local_name)) {
            (None, None) => {}
            (
                Some(LocalValue::List(before)),
                Some(LocalValue::List(after)),
            ) if field.kind == FieldKind::ObjectList => {
                for index in 0..before.len().max(after.len()) {
                    let element_path = format!("{path}.{index}");
                    match (before.get(index), after.get(index)) {
                        (Some(b), Some(a)) => {
                            collect_changes(&field.children, &element_path, b, a, changed)
                        }
                        _ => changed.push(element_path),
                    }
                }
            }
            (Some(before), Some(after)) if before.same_as(after) => {}
            _ => changed.push(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::local_from_json;
    use serde_json::json;

    fn spec() -> ResourceSpec {
        ResourceSpec::new("system_dns_database", "name")
            .field(FieldSpec::scalar("name"))
            .field(FieldSpec::scalar("ttl"))
            .field(FieldSpec::string_set("forwarder"))
            .field(FieldSpec::object_list(
                "dns-entry",
                vec![FieldSpec::scalar("hostname"), FieldSpec::scalar("ip")],
            ))
    }

    fn tree(value: serde_json::Value) -> LocalTree {
        local_from_json(&spec().fields, &value).unwrap()
    }

    #[test]
    fn diff_create_and_delete() {
        let spec = spec();
        let desired = tree(json!({"name": "example.com"}));
        assert_eq!(diff(&spec, None, Some(&desired)), Diff::Create);
        assert_eq!(diff(&spec, Some(&desired), None), Diff::Delete);
        assert_eq!(diff(&spec, None, None), Diff::NoChange);
    }

    #[test]
    fn diff_no_change_when_same() {
        let spec = spec();
        let prior = tree(json!({"name": "example.com", "forwarder": ["1.1.1.1", "8.8.8.8"]}));
        let desired = tree(json!({"name": "example.com", "forwarder": ["8.8.8.8", "1.1.1.1"]}));

        let result = diff(&spec, Some(&prior), Some(&desired));
        assert!(!result.is_change());
    }

    #[test]
    fn diff_update_reports_nested_paths() {
        let spec = spec();
        let prior = tree(json!({
            "name": "example.com",
            "ttl": 300,
            "dns_entry": [{"hostname": "www", "ip": "10.0.0.1"}],
            "undeclared": "a",
        }));
        let desired = tree(json!({
            "name": "example.com",
            "ttl": 600,
            "dns_entry": [
                {"hostname": "www", "ip": "10.0.0.2"},
                {"hostname": "mail", "ip": "10.0.0.3"},
            ],
            "undeclared": "b",
        }));

        match diff(&spec, Some(&prior), Some(&desired)) {
            Diff::Update { changed_paths } => assert_eq!(
                changed_paths,
                vec![
                    "ttl".to_string(),
                    "dns_entry.0.ip".to_string(),
                    "dns_entry.1".to_string(),
                ]
            ),
            other => panic!("Expected Update, got {:?}", other),
        }
    }

    #[test]
    fn removed_attribute_is_a_change() {
        let prior = tree(json!({"name": "example.com", "ttl": 300}));
        let desired = tree(json!({"name": "example.com"}));
        assert_eq!(
            changed_paths(&spec().fields, &prior, &desired),
            vec!["ttl".to_string()]
        );
    }
}
