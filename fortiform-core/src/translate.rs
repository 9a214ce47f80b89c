//! Translate - Flatten API objects into attribute trees and expand them back
//!
//! One traversal driven by a `ResourceSpec` replaces the per-field
//! flatten/expand functions. Policies:
//!
//! - flatten writes every field through the store and, when the store
//!   rejects a value, retries once with a coerced value from the
//!   `PatchTable`;
//! - object lists that flatten to nothing become an empty list, and
//!   sub-objects with no populated field are dropped;
//! - outside import mode, a top-level object list is only refreshed when the
//!   store already holds a non-empty value for it;
//! - flatten clears fields the object no longer carries;
//! - expand only sends fields that are set (non-zero) or changed, and a
//!   field removed since the prior state is sent as its zero value;
//! - keys no field declares are ignored in both directions.

use log::{debug, warn};

use crate::data::{AttributeStore, ResourceData, StoreError};
use crate::patch::PatchTable;
use crate::redact::display_native;
use crate::schema::{FieldKind, FieldSpec, ResourceSpec};
use crate::value::{LocalTree, LocalValue, NativeObject, NativeValue, join_path};

/// Translation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("Shape mismatch at '{path}': expected {expected}, got {found}")]
    ShapeMismatch {
        path: String,
        expected: FieldKind,
        found: String,
    },

    #[error("Invalid JSON at '{path}': {message}")]
    InvalidJson { path: String, message: String },
}

pub type TranslateResult<T> = Result<T, TranslateError>;

/// Location of a field, in API names (for coercion lookup) and local names
#[derive(Debug, Clone)]
struct FieldPath {
    api: String,
    local: String,
}

impl FieldPath {
    fn root(field: &FieldSpec) -> Self {
        Self {
            api: field.api_name.clone(),
            local: field.local_name.clone(),
        }
    }

    fn child(&self, field: &FieldSpec) -> Self {
        Self {
            api: join_path(&self.api, &field.api_name),
            local: join_path(&self.local, &field.local_name),
        }
    }
}

/// Schema-driven translator for one resource type
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    spec: &'a ResourceSpec,
    patch: &'a PatchTable,
    import_mode: bool,
}

impl<'a> Translator<'a> {
    pub fn new(spec: &'a ResourceSpec, patch: &'a PatchTable) -> Self {
        Self {
            spec,
            patch,
            import_mode: false,
        }
    }

    /// In import mode every object list is discovered, declared or not
    pub fn with_import_mode(mut self, import_mode: bool) -> Self {
        self.import_mode = import_mode;
        self
    }

    pub fn spec(&self) -> &'a ResourceSpec {
        self.spec
    }

    pub fn import_mode(&self) -> bool {
        self.import_mode
    }

    // =========================================================================
    // Flatten
    // =========================================================================

    /// Flatten an API object into the store
    ///
    /// `None` means the object was not found: the store's id is cleared and
    /// nothing is written.
    pub fn flatten<S>(&self, native: Option<&NativeObject>, store: &mut S) -> TranslateResult<()>
    where
        S: AttributeStore + ?Sized,
    {
        let Some(native) = native else {
            debug!("{}: object not found, clearing id", self.spec.resource_type);
            store.set_id(None);
            return Ok(());
        };

        for field in &self.spec.fields {
            if field.kind == FieldKind::ObjectList
                && !self.import_mode
                && store.get_ok(&field.local_name).is_none()
            {
                debug!(
                    "{}: skipping undeclared list '{}' outside import mode",
                    self.spec.resource_type, field.local_name
                );
                continue;
            }

            let value = native.get(&field.api_name);
            if field.kind != FieldKind::ObjectList && value.is_none_or(NativeValue::is_null) {
                debug!(
                    "{}: '{}' is absent, clearing it",
                    self.spec.resource_type, field.local_name
                );
                store.remove(&field.local_name);
                continue;
            }

            let path = FieldPath::root(field);
            self.write_with_fallback(field, &path, value, |value| {
                store.set(&field.local_name, value)
            })?;
        }

        Ok(())
    }

    /// Pure flatten into a fresh tree with no prior state
    pub fn flatten_tree(&self, native: Option<&NativeObject>) -> TranslateResult<LocalTree> {
        let mut data = ResourceData::new(self.spec);
        self.flatten(native, &mut data)?;
        Ok(data.into_tree())
    }

    /// Write a flattened value; on rejection coerce the native value and retry once
    fn write_with_fallback<W>(
        &self,
        field: &FieldSpec,
        path: &FieldPath,
        native: Option<&NativeValue>,
        mut write: W,
    ) -> TranslateResult<()>
    where
        W: FnMut(LocalValue) -> Result<(), StoreError>,
    {
        let Some(candidate) = self.flatten_value(field, path, native)? else {
            return Ok(());
        };

        let rejected = match write(candidate) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        let coerced = native.and_then(|value| {
            self.patch
                .coerce(&self.spec.resource_type, &path.api, field.kind, value)
        });
        let Some(coerced) = coerced else {
            return Err(mismatch(field, path, rejected));
        };

        warn!(
            "{}: coerced '{}' to {}",
            self.spec.resource_type,
            path.api,
            display_native(field, &coerced)
        );

        match self.flatten_value(field, path, Some(&coerced))? {
            Some(candidate) => write(candidate).map_err(|e| mismatch(field, path, e)),
            None => Ok(()),
        }
    }

    /// Convert a native value following the field kind
    ///
    /// Values whose shape does not fit the kind are converted as they are, so
    /// that the writer gets the chance to reject them.
    fn flatten_value(
        &self,
        field: &FieldSpec,
        path: &FieldPath,
        native: Option<&NativeValue>,
    ) -> TranslateResult<Option<LocalValue>> {
        if field.kind != FieldKind::ObjectList {
            return Ok(match native {
                None | Some(NativeValue::Null) => None,
                Some(value) => untyped(value),
            });
        }

        match native {
            None | Some(NativeValue::Null) => Ok(Some(LocalValue::List(Vec::new()))),
            Some(NativeValue::StringList(items)) if items.is_empty() => {
                Ok(Some(LocalValue::List(Vec::new())))
            }
            Some(NativeValue::ObjectList(items)) => {
                if items.first().is_none_or(Option::is_none) {
                    return Ok(Some(LocalValue::List(Vec::new())));
                }

                let mut elements = Vec::with_capacity(items.len());
                for item in items.iter().flatten() {
                    if let Some(element) = self.flatten_element(field, path, item)? {
                        elements.push(element);
                    }
                }
                Ok(Some(LocalValue::List(elements)))
            }
            Some(other) => Ok(untyped(other)),
        }
    }

    /// Flatten one sub-object; None when no child is populated
    fn flatten_element(
        &self,
        field: &FieldSpec,
        path: &FieldPath,
        native: &NativeObject,
    ) -> TranslateResult<Option<LocalTree>> {
        let mut element = LocalTree::new();

        for child in &field.children {
            let child_path = path.child(child);
            self.write_with_fallback(child, &child_path, native.get(&child.api_name), |value| {
                child.check(&child_path.local, &value)?;
                element.insert(child.local_name.clone(), value);
                Ok(())
            })?;
        }

        if element.values().any(LocalValue::is_populated) {
            Ok(Some(element))
        } else {
            debug!(
                "{}: dropping empty element of '{}'",
                self.spec.resource_type, path.local
            );
            Ok(None)
        }
    }

    // =========================================================================
    // Expand
    // =========================================================================

    /// Build the request body from the store's set or changed fields
    pub fn expand<S>(&self, store: &S) -> TranslateResult<NativeObject>
    where
        S: AttributeStore + ?Sized,
    {
        self.expand_fields(&self.spec.fields, "", store)
    }

    /// Pure expand: every value present in the tree counts as set
    pub fn expand_tree(&self, local: &LocalTree) -> TranslateResult<NativeObject> {
        let data = ResourceData::new(self.spec).with_config(local.clone());
        self.expand(&data)
    }

    fn expand_fields<S>(
        &self,
        fields: &[FieldSpec],
        prefix: &str,
        store: &S,
    ) -> TranslateResult<NativeObject>
    where
        S: AttributeStore + ?Sized,
    {
        let mut object = NativeObject::new();

        for field in fields {
            let path = join_path(prefix, &field.local_name);
            let expanded = match store.get_ok(&path) {
                Some(value) => self.expand_value(field, &path, value, store)?,
                None if store.has_change(&path) => match store.get(&path) {
                    Some(value) => self.expand_value(field, &path, value, store)?,
                    // Removed since the prior state: clear it remotely
                    None => zero_value(field.kind),
                },
                None => continue,
            };

            object.insert(field.api_name.clone(), expanded);
        }

        Ok(object)
    }

    fn expand_value<S>(
        &self,
        field: &FieldSpec,
        path: &str,
        value: &LocalValue,
        store: &S,
    ) -> TranslateResult<NativeValue>
    where
        S: AttributeStore + ?Sized,
    {
        match (field.kind, value) {
            (FieldKind::Scalar, LocalValue::Scalar(s)) => Ok(NativeValue::Scalar(s.clone())),
            (FieldKind::StringSet, LocalValue::Set(items)) => {
                Ok(NativeValue::StringList(items.clone()))
            }
            (FieldKind::ObjectList, LocalValue::List(items)) => {
                let mut elements = Vec::with_capacity(items.len());
                for index in 0..items.len() {
                    let element =
                        self.expand_fields(&field.children, &format!("{path}.{index}"), store)?;
                    if !element.is_empty() {
                        elements.push(Some(element));
                    }
                }
                Ok(NativeValue::ObjectList(elements))
            }
            (expected, found) => Err(TranslateError::ShapeMismatch {
                path: path.to_string(),
                expected,
                found: found.type_name().to_string(),
            }),
        }
    }
}

fn mismatch(field: &FieldSpec, path: &FieldPath, rejected: StoreError) -> TranslateError {
    let found = match rejected {
        StoreError::TypeMismatch { found, .. } => found,
        StoreError::UnknownAttribute { .. } => "unknown attribute".to_string(),
    };
    TranslateError::ShapeMismatch {
        path: path.local.clone(),
        expected: field.kind,
        found,
    }
}

fn zero_value(kind: FieldKind) -> NativeValue {
    match kind {
        FieldKind::Scalar => NativeValue::string(""),
        FieldKind::StringSet => NativeValue::StringList(Vec::new()),
        FieldKind::ObjectList => NativeValue::ObjectList(Vec::new()),
    }
}

/// Shape-preserving conversion, used when the value does not need a schema
fn untyped(value: &NativeValue) -> Option<LocalValue> {
    match value {
        NativeValue::Null => None,
        NativeValue::Scalar(s) => Some(LocalValue::Scalar(s.clone())),
        NativeValue::StringList(items) => Some(LocalValue::Set(items.clone())),
        NativeValue::ObjectList(items) => Some(LocalValue::List(
            items
                .iter()
                .flatten()
                .map(|object| {
                    object
                        .iter()
                        .filter_map(|(k, v)| untyped(v).map(|v| (k.clone(), v)))
                        .collect()
                })
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Coercion;
    use crate::value::{Scalar, native_from_json};
    use serde_json::json;

    fn ip_range_spec() -> ResourceSpec {
        ResourceSpec::new("ip_range", "fosid")
            .field(FieldSpec::scalar("end-ip"))
            .field(FieldSpec::scalar("id").with_local_name("fosid"))
    }

    fn address_spec() -> ResourceSpec {
        ResourceSpec::new("firewall_address", "name")
            .field(FieldSpec::scalar("name"))
            .field(FieldSpec::scalar("comment"))
            .field(FieldSpec::scalar("color"))
            .field(FieldSpec::scalar("subnet"))
            .field(FieldSpec::string_set("associated-interface"))
            .field(FieldSpec::object_list(
                "tagging",
                vec![
                    FieldSpec::scalar("name"),
                    FieldSpec::scalar("category"),
                    FieldSpec::string_set("tags"),
                ],
            ))
            .field(FieldSpec::object_list(
                "dynamic_mapping",
                vec![
                    FieldSpec::object_list(
                        "_scope",
                        vec![FieldSpec::scalar("name"), FieldSpec::scalar("vdom")],
                    ),
                    FieldSpec::scalar("comment"),
                ],
            ))
    }

    fn native(value: serde_json::Value) -> NativeObject {
        native_from_json(&value).unwrap()
    }

    fn tree(spec: &ResourceSpec, value: serde_json::Value) -> LocalTree {
        crate::value::local_from_json(&spec.fields, &value).unwrap()
    }

    #[test]
    fn concrete_scenario_round_trips() {
        let spec = ip_range_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch);

        let local = translator
            .flatten_tree(Some(&native(json!({"end-ip": "10.0.0.10", "id": 3}))))
            .unwrap();
        assert_eq!(local, tree(&spec, json!({"end_ip": "10.0.0.10", "fosid": 3})));

        let expanded = translator.expand_tree(&local).unwrap();
        assert_eq!(expanded, native(json!({"end-ip": "10.0.0.10", "id": 3})));
    }

    #[test]
    fn scalar_round_trip_keeps_non_empty_fields() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch);
        let input = native(json!({
            "name": "web",
            "comment": "",
            "color": 5,
            "associated-interface": ["port1", "port2"],
        }));

        let local = translator.flatten_tree(Some(&input)).unwrap();
        let output = translator.expand_tree(&local).unwrap();

        assert_eq!(output["name"], NativeValue::string("web"));
        assert_eq!(output["color"], NativeValue::int(5));
        assert_eq!(
            output["associated-interface"],
            NativeValue::strings(["port1", "port2"])
        );
    }

    #[test]
    fn flatten_of_missing_object_is_empty() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch).with_import_mode(true);

        assert!(translator.flatten_tree(None).unwrap().is_empty());

        let mut data = ResourceData::from_state(&spec, "web", LocalTree::new());
        translator.flatten(None, &mut data).unwrap();
        assert_eq!(data.id(), None);
    }

    #[test]
    fn null_object_list_becomes_empty_list() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch).with_import_mode(true);

        let local = translator
            .flatten_tree(Some(&native(json!({
                "name": "web",
                "tagging": null,
                "dynamic_mapping": [null, {"comment": "x"}],
            }))))
            .unwrap();

        assert_eq!(local.get("tagging"), Some(&LocalValue::List(vec![])));
        assert_eq!(local.get("dynamic_mapping"), Some(&LocalValue::List(vec![])));
        assert!(!local.contains_key("comment"));
    }

    #[test]
    fn empty_sub_objects_are_dropped() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch).with_import_mode(true);

        let local = translator
            .flatten_tree(Some(&native(json!({
                "tagging": [
                    {"name": "env", "tags": ["prod"]},
                    {"unknown": "ignored"},
                    {"name": null, "tags": []},
                    {"category": "owner"},
                ],
            }))))
            .unwrap();

        let Some(LocalValue::List(elements)) = local.get("tagging") else {
            panic!("Expected tagging list");
        };
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0]["name"], LocalValue::string("env"));
        assert_eq!(elements[1]["category"], LocalValue::string("owner"));
    }

    #[test]
    fn nested_object_lists_are_flattened() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch).with_import_mode(true);

        let local = translator
            .flatten_tree(Some(&native(json!({
                "dynamic_mapping": [{
                    "_scope": [{"name": "fgt-01", "vdom": "root"}],
                    "comment": "branch",
                }],
            }))))
            .unwrap();

        assert_eq!(
            local["dynamic_mapping"],
            tree(
                &spec,
                json!({"dynamic_mapping": [{
                    "_scope": [{"name": "fgt-01", "vdom": "root"}],
                    "comment": "branch",
                }]})
            )["dynamic_mapping"]
        );
    }

    #[test]
    fn import_mode_gates_undeclared_lists() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let input = native(json!({
            "name": "web",
            "tagging": [{"name": "env"}],
        }));

        let discovered = Translator::new(&spec, &patch)
            .with_import_mode(true)
            .flatten_tree(Some(&input))
            .unwrap();
        assert!(discovered.contains_key("tagging"));

        let refreshed = Translator::new(&spec, &patch)
            .flatten_tree(Some(&input))
            .unwrap();
        assert!(!refreshed.contains_key("tagging"));
        assert_eq!(refreshed["name"], LocalValue::string("web"));
    }

    #[test]
    fn declared_lists_are_refreshed_outside_import_mode() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let state = tree(&spec, json!({"name": "web", "tagging": [{"name": "old"}]}));
        let mut data = ResourceData::from_state(&spec, "web", state);

        Translator::new(&spec, &patch)
            .flatten(
                Some(&native(json!({"name": "web", "tagging": [{"name": "new"}]}))),
                &mut data,
            )
            .unwrap();

        assert_eq!(
            data.get("tagging.0.name"),
            Some(&LocalValue::string("new"))
        );
    }

    #[test]
    fn refresh_clears_fields_the_object_dropped() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let state = tree(
            &spec,
            json!({
                "name": "web",
                "comment": "old",
                "color": 3,
                "associated_interface": ["port1"],
                "adom": "root",
            }),
        );
        let mut data = ResourceData::from_state(&spec, "web", state);

        Translator::new(&spec, &patch)
            .flatten(
                Some(&native(json!({"name": "web", "color": null}))),
                &mut data,
            )
            .unwrap();

        assert_eq!(data.get("name"), Some(&LocalValue::string("web")));
        assert_eq!(data.get("comment"), None);
        assert_eq!(data.get("color"), None);
        assert_eq!(data.get("associated_interface"), None);
        assert!(data.has_change("comment"));
        // meta attributes are not part of the object
        assert_eq!(data.get("adom"), Some(&LocalValue::string("root")));
        assert_eq!(data.id(), Some("web"));
    }

    #[test]
    fn unknown_native_keys_are_ignored() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch).with_import_mode(true);

        let plain = translator
            .flatten_tree(Some(&native(json!({"name": "web", "tagging": [{"name": "a"}]}))))
            .unwrap();
        let extra = translator
            .flatten_tree(Some(&native(json!({
                "name": "web",
                "tagging": [{"name": "a", "new-field": 1}],
                "added-in-7.6": "enable",
            }))))
            .unwrap();

        assert_eq!(plain, extra);
    }

    #[test]
    fn one_element_list_is_unwrapped_for_scalars() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let local = Translator::new(&spec, &patch)
            .flatten_tree(Some(&native(json!({"name": ["web"], "color": 3}))))
            .unwrap();

        assert_eq!(local["name"], LocalValue::string("web"));
    }

    #[test]
    fn field_rules_apply_inside_sub_objects() {
        let spec = address_spec();
        let patch = PatchTable::builtin().with_rule(
            "firewall_address",
            "subnet",
            Coercion::Join,
        );
        let nested_patch = PatchTable::new().with_rule(
            "firewall_address",
            "tagging.tags",
            Coercion::WrapScalar,
        );

        let local = Translator::new(&spec, &patch)
            .flatten_tree(Some(&native(json!({"subnet": ["10.0.0.0", "255.255.255.0"]}))))
            .unwrap();
        assert_eq!(local["subnet"], LocalValue::string("10.0.0.0 255.255.255.0"));

        let local = Translator::new(&spec, &nested_patch)
            .with_import_mode(true)
            .flatten_tree(Some(&native(json!({"tagging": [{"tags": "prod"}]}))))
            .unwrap();
        assert_eq!(
            local["tagging"],
            LocalValue::List(vec![
                [("tags".to_string(), LocalValue::set(["prod"]))]
                    .into_iter()
                    .collect()
            ])
        );
    }

    #[test]
    fn mismatch_without_rule_fails_with_path() {
        let spec = address_spec();
        let patch = PatchTable::new();
        let translator = Translator::new(&spec, &patch).with_import_mode(true);

        let err = translator
            .flatten_tree(Some(&native(json!({"subnet": ["10.0.0.0", "255.255.255.0"]}))))
            .unwrap_err();
        assert_eq!(
            err,
            TranslateError::ShapeMismatch {
                path: "subnet".to_string(),
                expected: FieldKind::Scalar,
                found: "Set".to_string(),
            }
        );

        let err = translator
            .flatten_tree(Some(&native(json!({"tagging": [{"tags": "prod"}]}))))
            .unwrap_err();
        assert!(matches!(
            err,
            TranslateError::ShapeMismatch { ref path, .. } if path == "tagging.tags"
        ));
    }

    #[test]
    fn builtin_fallback_fails_when_coercion_does_not_fit() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let err = Translator::new(&spec, &patch)
            .flatten_tree(Some(&native(json!({"subnet": ["10.0.0.0", "255.255.255.0"]}))))
            .unwrap_err();
        assert!(matches!(err, TranslateError::ShapeMismatch { .. }));
    }

    #[test]
    fn expand_sends_only_touched_fields() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let local = tree(&spec, json!({"name": "web"}));

        let expanded = Translator::new(&spec, &patch).expand_tree(&local).unwrap();
        assert_eq!(expanded, native(json!({"name": "web"})));
    }

    #[test]
    fn expand_gates_on_set_or_changed() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let state = tree(&spec, json!({"name": "web", "color": 3, "comment": "old"}));
        let config = tree(&spec, json!({"name": "web", "color": 0, "comment": "old"}));
        let data = ResourceData::new(&spec).with_prior(state).with_config(config);

        let expanded = Translator::new(&spec, &patch).expand(&data).unwrap();
        // color changed to a zero value, comment unchanged but set
        assert_eq!(
            expanded,
            native(json!({"name": "web", "color": 0, "comment": "old"}))
        );

        // untouched and absent on both sides: not sent
        assert!(!expanded.contains_key("associated-interface"));
    }

    #[test]
    fn expand_clears_removed_fields() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let state = tree(
            &spec,
            json!({
                "name": "web",
                "comment": "old",
                "associated_interface": ["port1"],
                "tagging": [{"name": "a"}],
            }),
        );
        let config = tree(&spec, json!({"name": "web"}));
        let data = ResourceData::new(&spec).with_prior(state).with_config(config);

        let expanded = Translator::new(&spec, &patch).expand(&data).unwrap();
        assert_eq!(expanded["name"], NativeValue::string("web"));
        assert_eq!(expanded["comment"], NativeValue::string(""));
        assert_eq!(
            expanded["associated-interface"],
            NativeValue::StringList(Vec::new())
        );
        assert_eq!(expanded["tagging"], NativeValue::ObjectList(Vec::new()));
        assert_eq!(expanded.len(), 4);
    }

    #[test]
    fn expand_drops_untouched_elements() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let state = tree(
            &spec,
            json!({"tagging": [{"name": "a"}, {"category": ""}]}),
        );
        let config = tree(
            &spec,
            json!({"tagging": [{"name": ""}, {"category": ""}, {"name": "c"}]}),
        );
        let data = ResourceData::new(&spec).with_prior(state).with_config(config);

        let expanded = Translator::new(&spec, &patch).expand(&data).unwrap();
        // element 0 has a cleared name, which counts as changed;
        // element 1 only holds an unchanged zero value
        assert_eq!(
            expanded,
            native(json!({"tagging": [{"name": ""}, {"name": "c"}]}))
        );

        let config = tree(&spec, json!({"tagging": [{"category": ""}, {"name": "b"}]}));
        let expanded = Translator::new(&spec, &patch).expand_tree(&config).unwrap();
        assert_eq!(
            expanded,
            native(json!({"tagging": [{"category": ""}, {"name": "b"}]}))
        );
    }

    #[test]
    fn expand_ignores_unknown_local_paths() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let translator = Translator::new(&spec, &patch);

        let plain = translator
            .expand_tree(&tree(&spec, json!({"name": "web", "tagging": [{"name": "a"}]})))
            .unwrap();
        let extra = translator
            .expand_tree(&tree(
                &spec,
                json!({
                    "name": "web",
                    "scopetype": "inherit",
                    "tagging": [{"name": "a", "legacy": true}],
                }),
            ))
            .unwrap();

        assert_eq!(plain, extra);
    }

    #[test]
    fn expand_rejects_mis_shaped_values() {
        let spec = address_spec();
        let patch = PatchTable::builtin();
        let mut local = LocalTree::new();
        local.insert(
            "associated_interface".to_string(),
            LocalValue::Scalar(Scalar::String("port1".to_string())),
        );

        let err = Translator::new(&spec, &patch)
            .expand_tree(&local)
            .unwrap_err();
        assert_eq!(
            err,
            TranslateError::ShapeMismatch {
                path: "associated_interface".to_string(),
                expected: FieldKind::StringSet,
                found: "String".to_string(),
            }
        );
    }
}
