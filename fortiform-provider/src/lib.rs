//! Fortiform FortiManager Provider
//!
//! ## Module Structure
//!
//! - `config` - Provider settings and environment variables
//! - `scope` - ADOM resolution for scoped resources
//! - `path` - API path templating
//! - `schemas` - Resource tables
//! - `provider` - FortiManagerProvider CRUD orchestration

pub mod config;
pub mod path;
pub mod provider;
pub mod schemas;
pub mod scope;

// Re-export main types
pub use config::ProviderConfig;
pub use provider::{FortiManagerProvider, ProviderError, ProviderResult};
pub use schemas::{ResourceConfig, configs, find, resource_types};
pub use scope::ScopeType;
