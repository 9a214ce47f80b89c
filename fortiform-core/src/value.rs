//! Value - API-side and local-side representations of resource attributes
//!
//! `NativeValue` is what the FortiManager JSON API sends and receives.
//! `LocalValue` is what lives in the Terraform-style attribute tree.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value as Json};

use crate::schema::{FieldKind, FieldSpec};
use crate::translate::{TranslateError, TranslateResult};

/// Scalar attribute value, shared by both representations
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Zero values count as "not set" for `get_ok`
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::String(s) => s.is_empty(),
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Bool(b) => !b,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "String",
            Scalar::Int(_) => "Int",
            Scalar::Float(_) => "Float",
            Scalar::Bool(_) => "Bool",
        }
    }

    /// Convert a JSON scalar; returns None for arrays, objects and null
    pub fn from_json(value: &Json) -> Option<Scalar> {
        match value {
            Json::String(s) => Some(Scalar::String(s.clone())),
            Json::Bool(b) => Some(Scalar::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Scalar::Int(i))
                } else {
                    n.as_f64().map(Scalar::Float)
                }
            }
            _ => None,
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Scalar::String(s) => Json::String(s.clone()),
            Scalar::Int(i) => Json::Number((*i).into()),
            Scalar::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Scalar::Bool(b) => Json::Bool(*b),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// API-side object
pub type NativeObject = BTreeMap<String, NativeValue>;

/// API-side attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Scalar(Scalar),
    StringList(Vec<String>),
    /// Repeated sub-object. Elements may be null on the wire.
    ObjectList(Vec<Option<NativeObject>>),
}

impl NativeValue {
    pub fn string(s: impl Into<String>) -> Self {
        NativeValue::Scalar(Scalar::String(s.into()))
    }

    pub fn int(i: i64) -> Self {
        NativeValue::Scalar(Scalar::Int(i))
    }

    pub fn bool(b: bool) -> Self {
        NativeValue::Scalar(Scalar::Bool(b))
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NativeValue::StringList(items.into_iter().map(Into::into).collect())
    }

    pub fn objects(items: impl IntoIterator<Item = NativeObject>) -> Self {
        NativeValue::ObjectList(items.into_iter().map(Some).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    pub fn type_name(&self) -> String {
        match self {
            NativeValue::Null => "Null".to_string(),
            NativeValue::Scalar(s) => s.type_name().to_string(),
            NativeValue::StringList(_) => "StringList".to_string(),
            NativeValue::ObjectList(_) => "ObjectList".to_string(),
        }
    }

    /// Convert a JSON value received from the API
    ///
    /// Arrays of scalars become string lists (FortiManager sets are string
    /// sets), arrays of objects or nulls become object lists, and an empty
    /// array becomes an empty string list.
    pub fn from_json(path: &str, value: &Json) -> TranslateResult<NativeValue> {
        match value {
            Json::Null => Ok(NativeValue::Null),
            Json::Array(items) => native_list_from_json(path, items),
            Json::Object(_) => Err(TranslateError::InvalidJson {
                path: path.to_string(),
                message: "nested objects must be wrapped in a list".to_string(),
            }),
            scalar => Ok(Scalar::from_json(scalar).map_or(NativeValue::Null, NativeValue::Scalar)),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            NativeValue::Null => Json::Null,
            NativeValue::Scalar(s) => s.to_json(),
            NativeValue::StringList(items) => {
                Json::Array(items.iter().map(|s| Json::String(s.clone())).collect())
            }
            NativeValue::ObjectList(items) => Json::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map_or(Json::Null, native_to_json))
                    .collect(),
            ),
        }
    }
}

fn native_list_from_json(path: &str, items: &[Json]) -> TranslateResult<NativeValue> {
    let has_objects = items.iter().any(Json::is_object);
    let has_scalars = items
        .iter()
        .any(|item| !item.is_object() && !item.is_null());

    if has_objects && has_scalars {
        return Err(TranslateError::InvalidJson {
            path: path.to_string(),
            message: "list mixes objects and scalars".to_string(),
        });
    }

    if has_objects || (!items.is_empty() && !has_scalars) {
        let mut objects = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Json::Object(_) => {
                    objects.push(Some(native_from_json_at(&format!("{path}.{index}"), item)?))
                }
                _ => objects.push(None),
            }
        }
        return Ok(NativeValue::ObjectList(objects));
    }

    let mut strings = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match Scalar::from_json(item) {
            Some(scalar) => strings.push(scalar.to_string()),
            None => {
                return Err(TranslateError::InvalidJson {
                    path: format!("{path}.{index}"),
                    message: "nested lists are not supported".to_string(),
                });
            }
        }
    }
    Ok(NativeValue::StringList(strings))
}

/// Parse a JSON object received from the API
pub fn native_from_json(value: &Json) -> TranslateResult<NativeObject> {
    native_from_json_at("", value)
}

fn native_from_json_at(path: &str, value: &Json) -> TranslateResult<NativeObject> {
    let Json::Object(map) = value else {
        return Err(TranslateError::InvalidJson {
            path: path.to_string(),
            message: "expected a JSON object".to_string(),
        });
    };

    let mut object = NativeObject::new();
    for (key, item) in map {
        let item_path = join_path(path, key);
        object.insert(key.clone(), NativeValue::from_json(&item_path, item)?);
    }
    Ok(object)
}

/// Render an API object as JSON, e.g. for a request body
pub fn native_to_json(object: &NativeObject) -> Json {
    Json::Object(
        object
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<Map<String, Json>>(),
    )
}

/// Local attribute tree, keyed by local name
pub type LocalTree = BTreeMap<String, LocalValue>;

/// Local attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum LocalValue {
    Scalar(Scalar),
    Set(Vec<String>),
    List(Vec<LocalTree>),
}

impl LocalValue {
    pub fn string(s: impl Into<String>) -> Self {
        LocalValue::Scalar(Scalar::String(s.into()))
    }

    pub fn int(i: i64) -> Self {
        LocalValue::Scalar(Scalar::Int(i))
    }

    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LocalValue::Set(items.into_iter().map(Into::into).collect())
    }

    /// Zero value in the Terraform sense (`""`, `0`, `false`, empty collection)
    pub fn is_zero(&self) -> bool {
        match self {
            LocalValue::Scalar(s) => s.is_zero(),
            LocalValue::Set(items) => items.is_empty(),
            LocalValue::List(items) => items.is_empty(),
        }
    }

    /// Whether this value makes a flattened sub-object worth keeping
    pub fn is_populated(&self) -> bool {
        match self {
            LocalValue::Scalar(_) => true,
            LocalValue::Set(items) => !items.is_empty(),
            LocalValue::List(items) => !items.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LocalValue::Scalar(s) => s.type_name(),
            LocalValue::Set(_) => "Set",
            LocalValue::List(_) => "List",
        }
    }

    /// Semantic equality: sets compare without regard to order
    pub fn same_as(&self, other: &LocalValue) -> bool {
        match (self, other) {
            (LocalValue::Set(a), LocalValue::Set(b)) => {
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                b.sort();
                a == b
            }
            (LocalValue::List(a), LocalValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| tree_same_as(x, y))
            }
            (a, b) => a == b,
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            LocalValue::Scalar(s) => s.to_json(),
            LocalValue::Set(items) => {
                Json::Array(items.iter().map(|s| Json::String(s.clone())).collect())
            }
            LocalValue::List(items) => Json::Array(items.iter().map(local_to_json).collect()),
        }
    }

    /// Convert JSON without a schema. Used for keys no field declares.
    fn from_json_untyped(value: &Json) -> Option<LocalValue> {
        match value {
            Json::Null | Json::Object(_) => None,
            Json::Array(items) if items.iter().any(Json::is_object) => Some(LocalValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Json::Object(map) => Some(
                            map.iter()
                                .filter_map(|(k, v)| {
                                    LocalValue::from_json_untyped(v).map(|v| (k.clone(), v))
                                })
                                .collect::<LocalTree>(),
                        ),
                        _ => None,
                    })
                    .collect(),
            )),
            Json::Array(items) => Some(LocalValue::Set(
                items
                    .iter()
                    .filter_map(Scalar::from_json)
                    .map(|s| s.to_string())
                    .collect(),
            )),
            scalar => Scalar::from_json(scalar).map(LocalValue::Scalar),
        }
    }
}

fn tree_same_as(a: &LocalTree, b: &LocalTree) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(k, v)| b.get(k).is_some_and(|other| v.same_as(other)))
}

/// Render a local tree as JSON
pub fn local_to_json(tree: &LocalTree) -> Json {
    Json::Object(
        tree.iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<Map<String, Json>>(),
    )
}

/// Parse a local tree, using the field kinds to tell empty sets from empty lists
///
/// Keys that no field declares are kept untyped; the translator ignores them.
pub fn local_from_json(fields: &[FieldSpec], value: &Json) -> TranslateResult<LocalTree> {
    local_from_json_at(fields, "", value)
}

fn local_from_json_at(fields: &[FieldSpec], path: &str, value: &Json) -> TranslateResult<LocalTree> {
    let Json::Object(map) = value else {
        return Err(TranslateError::InvalidJson {
            path: path.to_string(),
            message: "expected a JSON object".to_string(),
        });
    };

    let mut tree = LocalTree::new();
    for (key, item) in map {
        let item_path = join_path(path, key);
        let field = fields.iter().find(|f| &f.local_name == key);
        let converted = match field {
            Some(field) => local_value_from_json(field, &item_path, item)?,
            None => LocalValue::from_json_untyped(item),
        };
        if let Some(v) = converted {
            tree.insert(key.clone(), v);
        }
    }
    Ok(tree)
}

fn local_value_from_json(
    field: &FieldSpec,
    path: &str,
    value: &Json,
) -> TranslateResult<Option<LocalValue>> {
    match (field.kind, value) {
        (_, Json::Null) => Ok(None),
        (FieldKind::StringSet, Json::Array(items)) => Ok(Some(LocalValue::Set(
            items
                .iter()
                .filter_map(Scalar::from_json)
                .map(|s| s.to_string())
                .collect(),
        ))),
        (FieldKind::ObjectList, Json::Array(items)) => {
            let mut elements = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                if item.is_null() {
                    continue;
                }
                elements.push(local_from_json_at(
                    &field.children,
                    &format!("{path}.{index}"),
                    item,
                )?);
            }
            Ok(Some(LocalValue::List(elements)))
        }
        _ => Ok(LocalValue::from_json_untyped(value)),
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
