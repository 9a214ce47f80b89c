//! Resource data - The attribute store the translator reads from and writes to
//!
//! Mirrors the resource-data interface of a Terraform provider SDK: values
//! are addressed by dotted paths (`dns_entry.0.hostname`), `get_ok` hides
//! zero values, and `has_change` compares the prior state with the current
//! values.

use crate::schema::{FieldKind, ResourceSpec};
use crate::value::{LocalTree, LocalValue};

/// Error returned when the store rejects a write
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Unknown attribute '{path}'")]
    UnknownAttribute { path: String },

    #[error("Type mismatch at '{path}': expected {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: FieldKind,
        found: String,
    },
}

/// Attribute store used by flatten and expand
pub trait AttributeStore {
    /// Current value at a path
    fn get(&self, path: &str) -> Option<&LocalValue>;

    /// Current value at a path, if present and not a zero value
    fn get_ok(&self, path: &str) -> Option<&LocalValue> {
        self.get(path).filter(|v| !v.is_zero())
    }

    /// Whether the value at a path differs from the prior state
    fn has_change(&self, path: &str) -> bool;

    /// Write a top-level attribute
    fn set(&mut self, path: &str, value: LocalValue) -> Result<(), StoreError>;

    /// Drop a top-level attribute; undeclared paths are left alone
    fn remove(&mut self, path: &str);

    /// Primary key of the remote object; None when the resource is gone
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: Option<String>);
}

/// In-memory attribute store for one resource
#[derive(Debug, Clone)]
pub struct ResourceData<'a> {
    spec: &'a ResourceSpec,
    id: Option<String>,
    prior: LocalTree,
    current: LocalTree,
}

impl<'a> ResourceData<'a> {
    /// Empty store: no prior state, no current values
    pub fn new(spec: &'a ResourceSpec) -> Self {
        Self {
            spec,
            id: None,
            prior: LocalTree::new(),
            current: LocalTree::new(),
        }
    }

    /// Store for a refresh: prior and current both start from the saved state
    pub fn from_state(spec: &'a ResourceSpec, id: impl Into<String>, state: LocalTree) -> Self {
        Self {
            spec,
            id: Some(id.into()),
            prior: state.clone(),
            current: state,
        }
    }

    pub fn with_prior(mut self, prior: LocalTree) -> Self {
        self.prior = prior;
        self
    }

    /// Set the current values (e.g., the user's configuration)
    pub fn with_config(mut self, config: LocalTree) -> Self {
        self.current = config;
        self
    }

    pub fn spec(&self) -> &'a ResourceSpec {
        self.spec
    }

    pub fn prior(&self) -> &LocalTree {
        &self.prior
    }

    pub fn current(&self) -> &LocalTree {
        &self.current
    }

    pub fn into_tree(self) -> LocalTree {
        self.current
    }

    /// Current scalar at a path, rendered as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        match self.get(path) {
            Some(LocalValue::Scalar(s)) => Some(s.to_string()),
            _ => None,
        }
    }
}

impl AttributeStore for ResourceData<'_> {
    fn get(&self, path: &str) -> Option<&LocalValue> {
        lookup(&self.current, path)
    }

    fn has_change(&self, path: &str) -> bool {
        match (lookup(&self.prior, path), lookup(&self.current, path)) {
            (None, None) => false,
            (Some(before), Some(after)) => !before.same_as(after),
            _ => true,
        }
    }

    fn set(&mut self, path: &str, value: LocalValue) -> Result<(), StoreError> {
        let field = self
            .spec
            .find_local(path)
            .ok_or_else(|| StoreError::UnknownAttribute {
                path: path.to_string(),
            })?;
        field.check(path, &value)?;
        self.current.insert(path.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, path: &str) {
        if self.spec.find_local(path).is_some() {
            self.current.remove(path);
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id.filter(|id| !id.is_empty());
    }
}

/// Resolve a dotted path; numeric segments index into object lists
pub fn lookup<'t>(tree: &'t LocalTree, path: &str) -> Option<&'t LocalValue> {
    let mut segments = path.split('.');
    let mut value = tree.get(segments.next()?)?;

    while let Some(index) = segments.next() {
        let LocalValue::List(items) = value else {
            return None;
        };
        let element = items.get(index.parse::<usize>().ok()?)?;
        value = element.get(segments.next()?)?;
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use crate::value::Scalar;

    fn dns_spec() -> ResourceSpec {
        ResourceSpec::new("system_dns_database", "name")
            .field(FieldSpec::scalar("name"))
            .field(FieldSpec::scalar("ttl"))
            .field(FieldSpec::string_set("forwarder"))
            .field(FieldSpec::object_list(
                "dns-entry",
                vec![FieldSpec::scalar("hostname"), FieldSpec::scalar("ip")],
            ))
    }

    fn entry(hostname: &str, ip: &str) -> LocalTree {
        let mut tree = LocalTree::new();
        tree.insert("hostname".to_string(), LocalValue::string(hostname));
        tree.insert("ip".to_string(), LocalValue::string(ip));
        tree
    }

    #[test]
    fn lookup_resolves_indexed_paths() {
        let mut tree = LocalTree::new();
        tree.insert(
            "dns_entry".to_string(),
            LocalValue::List(vec![entry("www", "10.0.0.1"), entry("mail", "10.0.0.2")]),
        );

        assert_eq!(
            lookup(&tree, "dns_entry.1.hostname"),
            Some(&LocalValue::string("mail"))
        );
        assert!(lookup(&tree, "dns_entry.2.hostname").is_none());
        assert!(lookup(&tree, "dns_entry.x.hostname").is_none());
        assert!(lookup(&tree, "dns_entry.0").is_none());
        assert!(lookup(&tree, "name").is_none());
    }

    #[test]
    fn get_ok_hides_zero_values() {
        let spec = dns_spec();
        let mut config = LocalTree::new();
        config.insert("name".to_string(), LocalValue::string("example.com"));
        config.insert("ttl".to_string(), LocalValue::int(0));
        let data = ResourceData::new(&spec).with_config(config);

        assert!(data.get_ok("name").is_some());
        assert!(data.get("ttl").is_some());
        assert!(data.get_ok("ttl").is_none());
        assert!(data.get_ok("forwarder").is_none());
    }

    #[test]
    fn has_change_compares_prior_and_current() {
        let spec = dns_spec();
        let mut state = LocalTree::new();
        state.insert("name".to_string(), LocalValue::string("example.com"));
        state.insert("forwarder".to_string(), LocalValue::set(["1.1.1.1", "8.8.8.8"]));

        let mut config = state.clone();
        config.insert("forwarder".to_string(), LocalValue::set(["8.8.8.8", "1.1.1.1"]));
        config.insert("ttl".to_string(), LocalValue::int(0));

        let data = ResourceData::new(&spec).with_prior(state).with_config(config);
        assert!(!data.has_change("name"));
        assert!(!data.has_change("forwarder"));
        assert!(data.has_change("ttl"));
        assert!(!data.has_change("dns_entry"));
    }

    #[test]
    fn set_type_checks_against_the_spec() {
        let spec = dns_spec();
        let mut data = ResourceData::new(&spec);

        assert!(data.set("ttl", LocalValue::int(86400)).is_ok());
        assert_eq!(
            data.set("forwarder", LocalValue::string("1.1.1.1")),
            Err(StoreError::TypeMismatch {
                path: "forwarder".to_string(),
                expected: FieldKind::StringSet,
                found: "String".to_string(),
            })
        );
        assert_eq!(
            data.set("dns_entry.0.ip", LocalValue::string("10.0.0.1")),
            Err(StoreError::UnknownAttribute {
                path: "dns_entry.0.ip".to_string()
            })
        );
        assert_eq!(data.get("ttl"), Some(&LocalValue::Scalar(Scalar::Int(86400))));
    }

    #[test]
    fn remove_only_touches_declared_fields() {
        let spec = dns_spec();
        let mut state = LocalTree::new();
        state.insert("ttl".to_string(), LocalValue::int(300));
        state.insert("adom".to_string(), LocalValue::string("root"));
        let mut data = ResourceData::from_state(&spec, "example.com", state);

        data.remove("ttl");
        data.remove("adom");
        assert_eq!(data.get("ttl"), None);
        assert!(data.has_change("ttl"));
        assert_eq!(data.get("adom"), Some(&LocalValue::string("root")));
    }

    #[test]
    fn empty_id_clears_the_resource() {
        let spec = dns_spec();
        let mut data = ResourceData::from_state(&spec, "example.com", LocalTree::new());
        assert_eq!(data.id(), Some("example.com"));

        data.set_id(Some(String::new()));
        assert_eq!(data.id(), None);
    }
}
