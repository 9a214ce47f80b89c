//! FortiManager Provider - CRUD orchestration
//!
//! Resolves the call parameters of a resource, translates between its local
//! tree and the API object, and drives the remote client.

use fortiform_core::client::{CallParams, RemoteClient};
use fortiform_core::redact::{redact_local, redact_native};
use fortiform_core::{
    AttributeStore, NativeObject, NativeValue, PatchTable, ResourceData, Scalar, Translator,
};
use log::{debug, info};

use crate::config::ProviderConfig;
use crate::path;
use crate::schemas::{self, ResourceConfig};
use crate::scope::{adom_checking, meta_string};

/// Error type for provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub resource_type: Option<String>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref resource_type) = self.resource_type {
            write!(f, "[{}] {}", resource_type, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource_type: None,
            cause: None,
        }
    }

    pub fn for_resource(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Wrap a lower-level error with a message and the resource type
fn failed<'a, E>(
    resource: &'a ResourceConfig,
    message: &'a str,
) -> impl FnOnce(E) -> ProviderError + 'a
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| {
        ProviderError::new(format!("{}: {}", message, e))
            .for_resource(resource.resource_type)
            .with_cause(e)
    }
}

/// FortiManager provider over a remote client
pub struct FortiManagerProvider<C> {
    client: C,
    config: ProviderConfig,
    patch: PatchTable,
}

impl<C: RemoteClient> FortiManagerProvider<C> {
    /// Create a provider; the configured coercion table is merged over the
    /// resource tables' rules
    pub fn new(client: C, config: ProviderConfig) -> ProviderResult<Self> {
        let mut patch = config
            .load_patch_table()
            .map_err(|e| ProviderError::new(e.to_string()).with_cause(e))?;
        patch.merge(&schemas::builtin_patch_table());

        Ok(Self {
            client,
            config,
            patch,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn patch_table(&self) -> &PatchTable {
        &self.patch
    }

    /// Translator for a resource, in the provider's import mode
    pub fn translator<'a>(&'a self, resource: &'a ResourceConfig) -> Translator<'a> {
        Translator::new(&resource.spec, &self.patch).with_import_mode(self.config.import_options)
    }

    /// Path parameters (scope and parent keys) and extra parameters of a call
    pub fn call_params<S>(&self, resource: &ResourceConfig, store: &S) -> ProviderResult<CallParams>
    where
        S: AttributeStore + ?Sized,
    {
        let mut params =
            CallParams::new().with_extra("retries", self.config.retries.to_string());

        if resource.scoped {
            let adom = adom_checking(&self.config, store)
                .map_err(failed(resource, "Failed to resolve scope"))?;
            params = params.with_path("adom", adom);
        }

        for key in resource.parent_keys {
            let value = meta_string(store, key.local_name).ok_or_else(|| {
                ProviderError::new(format!("Missing parent key '{}'", key.local_name))
                    .for_resource(resource.resource_type)
            })?;
            params = params.with_path(key.param, value);
        }

        Ok(params)
    }

    fn api_path(&self, resource: &ResourceConfig, params: &CallParams) -> ProviderResult<String> {
        path::render(resource.api_path, &params.path)
            .map_err(failed(resource, "Failed to build API path"))
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Create the remote object from the store's values, then read it back
    pub async fn create_resource(&self, data: &mut ResourceData<'_>) -> ProviderResult<()> {
        let resource = lookup_resource(data)?;
        let params = self.call_params(resource, &*data)?;
        let path = self.api_path(resource, &params)?;

        let body = self
            .translator(resource)
            .expand(&*data)
            .map_err(failed(resource, "Failed to build request"))?;

        info!("Creating {} at {}", resource.resource_type, path);
        debug!("Request body: {}", redact_native(&resource.spec.fields, &body));

        let response = self
            .client
            .create(&path, &body, &params)
            .await
            .map_err(failed(resource, "Create failed"))?;

        let id = mkey_of(resource, &response).or_else(|| mkey_of(resource, &body));
        if id.is_none() {
            return Err(ProviderError::new("Create response carries no identifier")
                .for_resource(resource.resource_type));
        }
        data.set_id(id);

        self.read_resource(data).await
    }

    /// Refresh the store from the remote object; clears the id when it is gone
    pub async fn read_resource(&self, data: &mut ResourceData<'_>) -> ProviderResult<()> {
        let resource = lookup_resource(data)?;
        let Some(mkey) = data.id().map(str::to_string) else {
            debug!("{}: no id, nothing to read", resource.resource_type);
            return Ok(());
        };

        let params = self.call_params(resource, &*data)?;
        let path = self.api_path(resource, &params)?;

        info!("Reading {} {} at {}", resource.resource_type, mkey, path);
        let object = self
            .client
            .read(&path, &mkey, &params)
            .await
            .map_err(failed(resource, "Read failed"))?;

        if object.is_none() {
            info!("{} {} no longer exists", resource.resource_type, mkey);
        }

        self.translator(resource)
            .flatten(object.as_ref(), data)
            .map_err(failed(resource, "Failed to read response"))?;

        debug!(
            "State: {}",
            redact_local(&resource.spec.fields, data.current())
        );
        Ok(())
    }

    /// Send the set or changed values to the remote object, then read it back
    pub async fn update_resource(&self, data: &mut ResourceData<'_>) -> ProviderResult<()> {
        let resource = lookup_resource(data)?;
        let mkey = require_id(resource, data)?;
        let params = self.call_params(resource, &*data)?;
        let path = self.api_path(resource, &params)?;

        let body = self
            .translator(resource)
            .expand(&*data)
            .map_err(failed(resource, "Failed to build request"))?;

        info!("Updating {} {} at {}", resource.resource_type, mkey, path);
        debug!("Request body: {}", redact_native(&resource.spec.fields, &body));

        let response = self
            .client
            .update(&path, &mkey, &body, &params)
            .await
            .map_err(failed(resource, "Update failed"))?;

        if let Some(id) = mkey_of(resource, &response) {
            data.set_id(Some(id));
        }

        self.read_resource(data).await
    }

    /// Delete the remote object and clear the id
    pub async fn delete_resource(&self, data: &mut ResourceData<'_>) -> ProviderResult<()> {
        let resource = lookup_resource(data)?;
        let mkey = require_id(resource, data)?;
        let params = self.call_params(resource, &*data)?;
        let path = self.api_path(resource, &params)?;

        info!("Deleting {} {} at {}", resource.resource_type, mkey, path);
        self.client
            .delete(&path, &mkey, &params)
            .await
            .map_err(failed(resource, "Delete failed"))?;

        data.set_id(None);
        Ok(())
    }
}

fn lookup_resource(data: &ResourceData<'_>) -> ProviderResult<&'static ResourceConfig> {
    let resource_type = &data.spec().resource_type;
    schemas::find(resource_type)
        .ok_or_else(|| ProviderError::new(format!("Unknown resource type '{}'", resource_type)))
}

fn require_id(resource: &ResourceConfig, data: &ResourceData<'_>) -> ProviderResult<String> {
    data.id().map(str::to_string).ok_or_else(|| {
        ProviderError::new("Resource has no id").for_resource(resource.resource_type)
    })
}

/// Identifier value of an API object, read from the id field
fn mkey_of(resource: &ResourceConfig, object: &NativeObject) -> Option<String> {
    let id_field = resource.spec.id_spec()?;
    match object.get(&id_field.api_name)? {
        NativeValue::Scalar(Scalar::String(s)) if s.is_empty() => None,
        NativeValue::Scalar(s) => Some(s.to_string()),
        NativeValue::StringList(items) if items.len() == 1 => Some(items[0].clone()),
        _ => None,
    }
}
