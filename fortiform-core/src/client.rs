//! Client - Trait abstracting the FortiManager JSON-RPC calls
//!
//! The provider talks to the remote API only through this trait. Objects go
//! over the wire in their native shape; transport, sessions and retries
//! belong to the implementation.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::value::NativeObject;

/// Error type for RemoteClient operations
#[derive(Debug)]
pub struct ClientError {
    pub message: String,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Parameters sent along with a call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallParams {
    /// Values substituted into the API path (`adom`, parent keys)
    pub path: BTreeMap<String, String>,
    /// Extra request parameters
    pub extra: BTreeMap<String, String>,
}

impl CallParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Remote FortiManager API
///
/// `path` is the rendered object collection path
/// (e.g., `/pm/config/adom/root/obj/firewall/address`), `mkey` the primary
/// key of one object in it.
pub trait RemoteClient: Send + Sync {
    /// Add an object; returns the response body
    fn create<'a>(
        &'a self,
        path: &'a str,
        object: &'a NativeObject,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<NativeObject>>;

    /// Get one object; None when it does not exist
    fn read<'a>(
        &'a self,
        path: &'a str,
        mkey: &'a str,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<Option<NativeObject>>>;

    /// Update one object; returns the response body
    fn update<'a>(
        &'a self,
        path: &'a str,
        mkey: &'a str,
        object: &'a NativeObject,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<NativeObject>>;

    fn delete<'a>(
        &'a self,
        path: &'a str,
        mkey: &'a str,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<()>>;
}

/// RemoteClient implementation for Box<dyn RemoteClient>
impl RemoteClient for Box<dyn RemoteClient> {
    fn create<'a>(
        &'a self,
        path: &'a str,
        object: &'a NativeObject,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<NativeObject>> {
        (**self).create(path, object, params)
    }

    fn read<'a>(
        &'a self,
        path: &'a str,
        mkey: &'a str,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<Option<NativeObject>>> {
        (**self).read(path, mkey, params)
    }

    fn update<'a>(
        &'a self,
        path: &'a str,
        mkey: &'a str,
        object: &'a NativeObject,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<NativeObject>> {
        (**self).update(path, mkey, object, params)
    }

    fn delete<'a>(
        &'a self,
        path: &'a str,
        mkey: &'a str,
        params: &'a CallParams,
    ) -> BoxFuture<'a, ClientResult<()>> {
        (**self).delete(path, mkey, params)
    }
}
