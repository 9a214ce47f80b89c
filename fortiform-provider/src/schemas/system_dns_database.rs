//! system_dns_database and system_dns_database_dns_entry schema definitions
//!
//! FortiManager objects:
//! - /pm/config/device/{device}/vdom/{vdom}/system/dns-database
//! - /pm/config/device/{device}/vdom/{vdom}/system/dns-database/{database}/dns-entry

use super::{ParentKey, ResourceConfig};
use fortiform_core::{FieldSpec, ResourceSpec};

const DEVICE_KEYS: [ParentKey; 2] = [
    ParentKey {
        local_name: "device_name",
        param: "device",
    },
    ParentKey {
        local_name: "device_vdom",
        param: "vdom",
    },
];

const ENTRY_KEYS: [ParentKey; 3] = [
    DEVICE_KEYS[0],
    DEVICE_KEYS[1],
    ParentKey {
        local_name: "database",
        param: "database",
    },
];

fn dns_entry_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::scalar("id")
            .with_local_name("fosid")
            .with_description("DNS entry ID."),
        FieldSpec::scalar("status"),
        FieldSpec::scalar("type").with_description("Resource record type (A, NS, CNAME, MX, AAAA, PTR)."),
        FieldSpec::scalar("ttl"),
        FieldSpec::scalar("preference"),
        FieldSpec::scalar("ip"),
        FieldSpec::scalar("ipv6"),
        FieldSpec::scalar("hostname"),
        FieldSpec::scalar("canonical-name"),
    ]
}

/// Returns the schema config for system_dns_database
pub fn system_dns_database_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "system_dns_database",
        api_path: "/pm/config/device/{device}/vdom/{vdom}/system/dns-database",
        scoped: false,
        parent_keys: &DEVICE_KEYS,
        patches: &[],
        spec: ResourceSpec::new("system_dns_database", "name")
            .with_description("Configure DNS databases of a managed device.")
            .field(FieldSpec::scalar("name").with_description("Zone name."))
            .field(FieldSpec::scalar("status"))
            .field(FieldSpec::scalar("domain").with_description("Domain name."))
            .field(FieldSpec::scalar("authoritative"))
            .field(FieldSpec::scalar("type").with_description("Zone type (master, slave)."))
            .field(FieldSpec::scalar("view"))
            .field(FieldSpec::scalar("ip-master"))
            .field(FieldSpec::scalar("primary-name"))
            .field(FieldSpec::scalar("contact"))
            .field(FieldSpec::scalar("ttl"))
            .field(FieldSpec::string_set("forwarder"))
            .field(FieldSpec::scalar("source-ip"))
            .field(FieldSpec::scalar("allow-transfer"))
            .field(
                FieldSpec::object_list("dns-entry", dns_entry_fields())
                    .with_description("DNS entry."),
            ),
    }
}

/// Returns the schema config for system_dns_database_dns_entry
pub fn system_dns_database_dns_entry_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "system_dns_database_dns_entry",
        api_path: "/pm/config/device/{device}/vdom/{vdom}/system/dns-database/{database}/dns-entry",
        scoped: false,
        parent_keys: &ENTRY_KEYS,
        patches: &[],
        spec: dns_entry_fields().into_iter().fold(
            ResourceSpec::new("system_dns_database_dns_entry", "fosid")
                .with_description("DNS entry of a DNS database."),
            ResourceSpec::field,
        ),
    }
}
