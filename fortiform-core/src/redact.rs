//! Redaction of sensitive fields for logs and diagnostics

use serde_json::{Map, Value as Json};

use crate::schema::FieldSpec;
use crate::value::{LocalTree, LocalValue, NativeObject, NativeValue};

/// Placeholder written in place of a sensitive value
pub const REDACTED: &str = "(sensitive)";

/// Render one native value for a log line
pub fn display_native(field: &FieldSpec, value: &NativeValue) -> String {
    if field.sensitive {
        REDACTED.to_string()
    } else {
        redact_native_value(field, value).to_string()
    }
}

/// JSON rendering of an API object with sensitive fields masked at any depth
pub fn redact_native(fields: &[FieldSpec], object: &NativeObject) -> Json {
    Json::Object(
        object
            .iter()
            .map(|(key, value)| {
                let rendered = match fields.iter().find(|f| &f.api_name == key) {
                    Some(field) if field.sensitive => Json::String(REDACTED.to_string()),
                    Some(field) => redact_native_value(field, value),
                    None => value.to_json(),
                };
                (key.clone(), rendered)
            })
            .collect::<Map<String, Json>>(),
    )
}

fn redact_native_value(field: &FieldSpec, value: &NativeValue) -> Json {
    match value {
        NativeValue::ObjectList(items) => Json::Array(
            items
                .iter()
                .map(|item| {
                    item.as_ref()
                        .map_or(Json::Null, |object| redact_native(&field.children, object))
                })
                .collect(),
        ),
        other => other.to_json(),
    }
}

/// JSON rendering of a local tree with sensitive fields masked at any depth
pub fn redact_local(fields: &[FieldSpec], tree: &LocalTree) -> Json {
    Json::Object(
        tree.iter()
            .map(|(key, value)| {
                let rendered = match fields.iter().find(|f| &f.local_name == key) {
                    Some(field) if field.sensitive => Json::String(REDACTED.to_string()),
                    Some(field) => match value {
                        LocalValue::List(items) => Json::Array(
                            items
                                .iter()
                                .map(|element| redact_local(&field.children, element))
                                .collect(),
                        ),
                        other => other.to_json(),
                    },
                    None => value.to_json(),
                };
                (key.clone(), rendered)
            })
            .collect::<Map<String, Json>>(),
    )
}
