//! Patch table - Coercions for API values the local schema cannot hold as-is
//!
//! FortiManager sometimes returns a value in a different shape than the
//! resource declares (a one-element list for a scalar, a subnet as an
//! address/mask pair, a number where a string is expected). When the store
//! rejects a flattened value, the translator asks this table for a coerced
//! value and retries once.
//!
//! The table is data. `PatchTable::builtin()` only carries per-kind defaults;
//! field rules come from resource tables or a JSON file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::FieldKind;
use crate::value::{NativeValue, Scalar};

/// Resource name matching every resource type
pub const ANY_RESOURCE: &str = "*";

/// Coercion applied to a native value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    /// `["port1"]` -> `"port1"` (single-element lists only)
    FirstElement,
    /// `"port1"` -> `["port1"]`
    WrapScalar,
    /// `["10.0.0.0", "255.255.255.0"]` -> `"10.0.0.0 255.255.255.0"`
    Join,
    /// `3` -> `"3"`
    Stringify,
    /// `"3"` or `["3"]` -> `3`
    ParseInt,
}

impl Coercion {
    /// Apply the coercion; None when it does not fit the value
    pub fn apply(&self, value: &NativeValue) -> Option<NativeValue> {
        match (self, value) {
            (Coercion::FirstElement, NativeValue::StringList(items)) if items.len() == 1 => {
                Some(NativeValue::string(items[0].clone()))
            }
            (Coercion::WrapScalar, NativeValue::Scalar(s)) => {
                Some(NativeValue::StringList(vec![s.to_string()]))
            }
            (Coercion::Join, NativeValue::StringList(items)) => {
                Some(NativeValue::string(items.join(" ")))
            }
            (Coercion::Stringify, NativeValue::Scalar(s)) => Some(NativeValue::string(s.to_string())),
            (Coercion::Stringify, NativeValue::StringList(items)) if items.len() == 1 => {
                Some(NativeValue::string(items[0].clone()))
            }
            (Coercion::ParseInt, NativeValue::Scalar(Scalar::String(s))) => {
                s.trim().parse::<i64>().ok().map(NativeValue::int)
            }
            (Coercion::ParseInt, NativeValue::StringList(items)) if items.len() == 1 => {
                items[0].trim().parse::<i64>().ok().map(NativeValue::int)
            }
            _ => None,
        }
    }
}

/// One entry of a coercion table file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRule {
    /// Resource type, or `*` for every resource
    pub resource: String,
    /// API names from the resource root, joined by `.` (e.g., "dns-entry.ip")
    pub path: String,
    pub coercion: Coercion,
}

#[derive(Debug, Deserialize)]
struct PatchFile {
    #[serde(default)]
    rules: Vec<PatchRule>,
}

/// Error loading a coercion table
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("Failed to read coercion table {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid coercion table: {0}")]
    Parse(String),
}

/// Coercion lookup table
#[derive(Debug, Clone, Default)]
pub struct PatchTable {
    rules: HashMap<(String, String), Coercion>,
    kind_defaults: HashMap<FieldKind, Coercion>,
}

impl PatchTable {
    /// Empty table: every rejected write fails
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-kind defaults only: unwrap one-element lists for scalars,
    /// wrap scalars for string sets
    pub fn builtin() -> Self {
        Self::new()
            .with_kind_default(FieldKind::Scalar, Coercion::FirstElement)
            .with_kind_default(FieldKind::StringSet, Coercion::WrapScalar)
    }

    pub fn with_rule(
        mut self,
        resource: impl Into<String>,
        path: impl Into<String>,
        coercion: Coercion,
    ) -> Self {
        self.add_rule(PatchRule {
            resource: resource.into(),
            path: path.into(),
            coercion,
        });
        self
    }

    pub fn with_kind_default(mut self, kind: FieldKind, coercion: Coercion) -> Self {
        self.kind_defaults.insert(kind, coercion);
        self
    }

    pub fn add_rule(&mut self, rule: PatchRule) {
        self.rules.insert((rule.resource, rule.path), rule.coercion);
    }

    /// Builtin defaults plus the rules of a JSON document
    ///
    /// ```json
    /// {"rules": [{"resource": "firewall_address", "path": "subnet", "coercion": "join"}]}
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self, PatchError> {
        let file: PatchFile =
            serde_json::from_str(content).map_err(|e| PatchError::Parse(e.to_string()))?;

        let mut table = Self::builtin();
        for rule in file.rules {
            table.add_rule(rule);
        }
        Ok(table)
    }

    pub fn from_file(path: &Path) -> Result<Self, PatchError> {
        let content = std::fs::read_to_string(path).map_err(|e| PatchError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Merge rules from another table; existing rules win
    pub fn merge(&mut self, other: &PatchTable) {
        for (key, coercion) in &other.rules {
            self.rules.entry(key.clone()).or_insert(*coercion);
        }
        for (kind, coercion) in &other.kind_defaults {
            self.kind_defaults.entry(*kind).or_insert(*coercion);
        }
    }

    /// All field rules, sorted by resource and path
    pub fn rules(&self) -> Vec<PatchRule> {
        let mut rules: Vec<PatchRule> = self
            .rules
            .iter()
            .map(|((resource, path), coercion)| PatchRule {
                resource: resource.clone(),
                path: path.clone(),
                coercion: *coercion,
            })
            .collect();
        rules.sort_by(|a, b| (&a.resource, &a.path).cmp(&(&b.resource, &b.path)));
        rules
    }

    /// Find the coercion for a field: exact rule, then wildcard, then kind default
    pub fn lookup(&self, resource: &str, api_path: &str, kind: FieldKind) -> Option<Coercion> {
        self.rules
            .get(&(resource.to_string(), api_path.to_string()))
            .or_else(|| {
                self.rules
                    .get(&(ANY_RESOURCE.to_string(), api_path.to_string()))
            })
            .or_else(|| self.kind_defaults.get(&kind))
            .copied()
    }

    /// Coerce a rejected value, if a rule applies to it
    pub fn coerce(
        &self,
        resource: &str,
        api_path: &str,
        kind: FieldKind,
        value: &NativeValue,
    ) -> Option<NativeValue> {
        self.lookup(resource, api_path, kind)?.apply(value)
    }
}
