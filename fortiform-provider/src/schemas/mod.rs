//! FortiManager resource tables
//!
//! Each resource declares its field tree, its collection path, the parent
//! keys that fill the path placeholders and the coercions its API values
//! need.

use std::sync::OnceLock;

use fortiform_core::{Coercion, PatchTable, ResourceSpec};

pub mod firewall_address;
pub mod firewall_policy;
pub mod system_dns_database;
pub mod vpn_kmip_server;
pub mod vpn_ssl_web_portal;

/// Local attribute holding a parent object's key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentKey {
    /// Meta attribute in the local tree (e.g., "kmip_server")
    pub local_name: &'static str,
    /// Placeholder in the API path (e.g., "kmip-server")
    pub param: &'static str,
}

/// FortiManager resource configuration
pub struct ResourceConfig {
    pub resource_type: &'static str,
    /// Collection path with `{param}` placeholders
    pub api_path: &'static str,
    /// Whether the path contains the `{adom}` placeholder
    pub scoped: bool,
    pub parent_keys: &'static [ParentKey],
    /// Coercion rules keyed by API path
    ///
    /// A rule only runs after the store rejects a value, so a rule on a
    /// scalar field fires for a list value (`["5696"]`) and never for a
    /// string (`"5696"`), which the store accepts as is.
    pub patches: &'static [(&'static str, Coercion)],
    pub spec: ResourceSpec,
}

impl ResourceConfig {
    /// This resource's coercion rules
    pub fn patch_table(&self) -> PatchTable {
        self.patches
            .iter()
            .fold(PatchTable::new(), |table, (path, coercion)| {
                table.with_rule(self.resource_type, *path, *coercion)
            })
    }
}

/// Returns all resource configs
pub fn configs() -> Vec<ResourceConfig> {
    vec![
        firewall_address::firewall_address_config(),
        firewall_policy::firewall_policy_config(),
        system_dns_database::system_dns_database_config(),
        system_dns_database::system_dns_database_dns_entry_config(),
        vpn_ssl_web_portal::vpn_ssl_web_portal_config(),
        vpn_kmip_server::vpn_kmip_server_config(),
        vpn_kmip_server::vpn_kmip_server_server_list_config(),
    ]
}

static REGISTRY: OnceLock<Vec<ResourceConfig>> = OnceLock::new();

/// Get the resource registry (built on first access)
pub fn registry() -> &'static [ResourceConfig] {
    REGISTRY.get_or_init(configs)
}

/// Get a resource config by type name
pub fn find(resource_type: &str) -> Option<&'static ResourceConfig> {
    registry()
        .iter()
        .find(|c| c.resource_type == resource_type)
}

pub fn resource_types() -> Vec<&'static str> {
    registry().iter().map(|c| c.resource_type).collect()
}

/// Coercion rules of every resource table, over the built-in defaults
pub fn builtin_patch_table() -> PatchTable {
    let mut table = PatchTable::builtin();
    for config in registry() {
        table.merge(&config.patch_table());
    }
    table
}
