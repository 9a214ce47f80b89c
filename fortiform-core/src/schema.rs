//! Schema - Declarative field maps for FortiManager resources
//!
//! A `ResourceSpec` replaces the hand-written flatten/expand function pairs:
//! each `FieldSpec` names the API key, the local attribute name and the shape
//! of the value, and the translator walks these tables.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::StoreError;
use crate::value::{LocalValue, join_path};

/// Shape of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// String, number or boolean
    Scalar,
    /// Unordered set of strings
    StringSet,
    /// Repeated sub-object described by `children`
    ObjectList,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => write!(f, "Scalar"),
            FieldKind::StringSet => write!(f, "StringSet"),
            FieldKind::ObjectList => write!(f, "ObjectList"),
        }
    }
}

/// One attribute of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Key in the API object (e.g., "end-ip")
    pub api_name: String,
    /// Key in the local attribute tree (e.g., "end_ip")
    pub local_name: String,
    pub kind: FieldKind,
    /// Sub-object fields, only for `FieldKind::ObjectList`
    pub children: Vec<FieldSpec>,
    /// Never logged in clear text
    pub sensitive: bool,
    pub description: Option<String>,
}

impl FieldSpec {
    /// Create a field; the local name is the API name with `-` replaced by `_`
    pub fn new(api_name: impl Into<String>, kind: FieldKind) -> Self {
        let api_name = api_name.into();
        Self {
            local_name: api_name.replace('-', "_"),
            api_name,
            kind,
            children: Vec::new(),
            sensitive: false,
            description: None,
        }
    }

    pub fn scalar(api_name: impl Into<String>) -> Self {
        Self::new(api_name, FieldKind::Scalar)
    }

    pub fn string_set(api_name: impl Into<String>) -> Self {
        Self::new(api_name, FieldKind::StringSet)
    }

    pub fn object_list(api_name: impl Into<String>, children: Vec<FieldSpec>) -> Self {
        Self {
            children,
            ..Self::new(api_name, FieldKind::ObjectList)
        }
    }

    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = name.into();
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Find a child field by local name
    pub fn child(&self, local_name: &str) -> Option<&FieldSpec> {
        self.children.iter().find(|c| c.local_name == local_name)
    }

    /// Check that a local value has the shape this field declares
    ///
    /// Keys inside sub-objects that no child declares are not checked.
    pub fn check(&self, path: &str, value: &LocalValue) -> Result<(), StoreError> {
        match (self.kind, value) {
            (FieldKind::Scalar, LocalValue::Scalar(_)) => Ok(()),
            (FieldKind::StringSet, LocalValue::Set(_)) => Ok(()),
            (FieldKind::ObjectList, LocalValue::List(items)) => {
                for (index, element) in items.iter().enumerate() {
                    for (key, item) in element {
                        if let Some(child) = self.child(key) {
                            child.check(&format!("{path}.{index}.{key}"), item)?;
                        }
                    }
                }
                Ok(())
            }
            (expected, found) => Err(StoreError::TypeMismatch {
                path: path.to_string(),
                expected,
                found: found.type_name().to_string(),
            }),
        }
    }
}

/// Schema error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate API name '{name}' at '{scope}'")]
    DuplicateApiName { scope: String, name: String },

    #[error("Duplicate local name '{name}' at '{scope}'")]
    DuplicateLocalName { scope: String, name: String },

    #[error("Identifier field '{name}' is not a top-level scalar")]
    MissingIdField { name: String },

    #[error("Field '{path}' has children but is not an object list")]
    ChildrenOnNonList { path: String },

    #[error("Object list '{path}' declares no children")]
    EmptyObjectList { path: String },
}

/// Field map of one resource type
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    /// Resource type name (e.g., "firewall_address")
    pub resource_type: String,
    /// Local name of the field holding the object's primary key
    pub id_field: String,
    pub fields: Vec<FieldSpec>,
    pub description: Option<String>,
}

impl ResourceSpec {
    pub fn new(resource_type: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id_field: id_field.into(),
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Find a top-level field by local name
    pub fn find_local(&self, local_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.local_name == local_name)
    }

    /// Find a top-level field by API name
    pub fn find_api(&self, api_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.api_name == api_name)
    }

    /// The identifier field, if it is declared as a top-level scalar
    pub fn id_spec(&self) -> Option<&FieldSpec> {
        self.find_local(&self.id_field)
            .filter(|f| f.kind == FieldKind::Scalar)
    }

    /// Validate the field map
    ///
    /// Names must be unique per nesting level, and the identifier must be a
    /// top-level scalar. All violations are reported.
    pub fn validate(&self) -> Result<(), Vec<SchemaError>> {
        let mut errors = Vec::new();

        if self.id_spec().is_none() {
            errors.push(SchemaError::MissingIdField {
                name: self.id_field.clone(),
            });
        }

        validate_level(&self.fields, "", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_level(fields: &[FieldSpec], scope: &str, errors: &mut Vec<SchemaError>) {
    let mut api_names = HashSet::new();
    let mut local_names = HashSet::new();
    let scope_name = if scope.is_empty() { "(root)" } else { scope };

    for field in fields {
        if !api_names.insert(field.api_name.as_str()) {
            errors.push(SchemaError::DuplicateApiName {
                scope: scope_name.to_string(),
                name: field.api_name.clone(),
            });
        }
        if !local_names.insert(field.local_name.as_str()) {
            errors.push(SchemaError::DuplicateLocalName {
                scope: scope_name.to_string(),
                name: field.local_name.clone(),
            });
        }

        let path = join_path(scope, &field.local_name);
        match field.kind {
            FieldKind::ObjectList if field.children.is_empty() => {
                errors.push(SchemaError::EmptyObjectList { path });
            }
            FieldKind::ObjectList => validate_level(&field.children, &path, errors),
            _ if !field.children.is_empty() => {
                errors.push(SchemaError::ChildrenOnNonList { path });
            }
            _ => {}
        }
    }
}
