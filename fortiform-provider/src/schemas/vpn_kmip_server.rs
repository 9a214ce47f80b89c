//! vpn_kmip_server and vpn_kmip_server_server_list schema definitions

use super::{ParentKey, ResourceConfig};
use fortiform_core::{Coercion, FieldSpec, ResourceSpec};

fn server_list_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::scalar("id")
            .with_local_name("fosid")
            .with_description("ID"),
        FieldSpec::scalar("status"),
        FieldSpec::scalar("server").with_description("KMIP server FQDN or IP address."),
        FieldSpec::scalar("port"),
        FieldSpec::string_set("cert").with_description("Client certificate to use for connectivity to the KMIP server."),
    ]
}

/// Returns the schema config for vpn_kmip_server
pub fn vpn_kmip_server_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "vpn_kmip_server",
        api_path: "/pm/config/{adom}/obj/vpn/kmip-server",
        scoped: true,
        parent_keys: &[],
        // port may come back wrapped in a one-element list
        patches: &[("server-list.port", Coercion::ParseInt)],
        spec: ResourceSpec::new("vpn_kmip_server", "name")
            .with_description("KMIP server entry configuration.")
            .field(FieldSpec::scalar("name"))
            .field(FieldSpec::scalar("server-identity-check"))
            .field(FieldSpec::scalar("interface-select-method"))
            .field(FieldSpec::string_set("interface"))
            .field(FieldSpec::string_set("source-ip"))
            .field(FieldSpec::scalar("ssl-min-proto-version"))
            .field(FieldSpec::scalar("username"))
            .field(
                FieldSpec::string_set("password")
                    .sensitive()
                    .with_description("Password to use for connectivity to the KMIP server."),
            )
            .field(
                FieldSpec::object_list("server-list", server_list_fields())
                    .with_description("KMIP server list."),
            ),
    }
}

/// Returns the schema config for vpn_kmip_server_server_list
pub fn vpn_kmip_server_server_list_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "vpn_kmip_server_server_list",
        api_path: "/pm/config/{adom}/obj/vpn/kmip-server/{kmip-server}/server-list",
        scoped: true,
        parent_keys: &[ParentKey {
            local_name: "kmip_server",
            param: "kmip-server",
        }],
        // port may come back wrapped in a one-element list
        patches: &[("port", Coercion::ParseInt)],
        spec: server_list_fields().into_iter().fold(
            ResourceSpec::new("vpn_kmip_server_server_list", "fosid")
                .with_description("KMIP server list."),
            ResourceSpec::field,
        ),
    }
}
