//! firewall_address schema definition
//!
//! FortiManager object: /pm/config/{adom}/obj/firewall/address

use super::ResourceConfig;
use fortiform_core::{Coercion, FieldSpec, ResourceSpec};

/// Returns the schema config for firewall_address
pub fn firewall_address_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "firewall_address",
        api_path: "/pm/config/{adom}/obj/firewall/address",
        scoped: true,
        parent_keys: &[],
        patches: &[
            ("subnet", Coercion::Join),
            ("wildcard", Coercion::Join),
            ("dynamic_mapping.subnet", Coercion::Join),
            ("dynamic_mapping.wildcard", Coercion::Join),
        ],
        spec: ResourceSpec::new("firewall_address", "name")
            .with_description("Configure IPv4 addresses.")
            .field(FieldSpec::scalar("name").with_description("Address name."))
            .field(
                FieldSpec::scalar("type")
                    .with_description("Type of address: ipmask, iprange, fqdn, geography, wildcard."),
            )
            .field(
                FieldSpec::scalar("subnet")
                    .with_description("IP address and subnet mask of address."),
            )
            .field(FieldSpec::scalar("start-ip").with_description("First IP address (inclusive) in the range for the address."))
            .field(FieldSpec::scalar("end-ip").with_description("Final IP address (inclusive) in the range for the address."))
            .field(FieldSpec::scalar("fqdn").with_description("Fully Qualified Domain Name address."))
            .field(FieldSpec::scalar("country").with_description("IP addresses associated to a specific country."))
            .field(FieldSpec::scalar("wildcard").with_description("IP address and wildcard netmask."))
            .field(FieldSpec::scalar("wildcard-fqdn"))
            .field(FieldSpec::scalar("cache-ttl").with_description("Defines the minimal TTL of individual IP addresses in FQDN cache measured in seconds."))
            .field(FieldSpec::string_set("associated-interface").with_description("Network interface associated with address."))
            .field(FieldSpec::scalar("allow-routing").with_description("Enable/disable use of this address in the static route configuration."))
            .field(FieldSpec::scalar("visibility"))
            .field(FieldSpec::scalar("color").with_description("Color of icon on the GUI."))
            .field(FieldSpec::scalar("comment"))
            .field(FieldSpec::scalar("uuid").with_description("Universally Unique Identifier (read-only)."))
            .field(
                FieldSpec::object_list(
                    "tagging",
                    vec![
                        FieldSpec::scalar("name"),
                        FieldSpec::scalar("category"),
                        FieldSpec::string_set("tags"),
                    ],
                )
                .with_description("Config object tagging."),
            )
            .field(
                FieldSpec::object_list("list", vec![FieldSpec::scalar("ip")])
                    .with_description("IP address list."),
            )
            .field(
                FieldSpec::object_list(
                    "dynamic_mapping",
                    vec![
                        FieldSpec::object_list(
                            "_scope",
                            vec![FieldSpec::scalar("name"), FieldSpec::scalar("vdom")],
                        ),
                        FieldSpec::scalar("subnet"),
                        FieldSpec::scalar("start-ip"),
                        FieldSpec::scalar("end-ip"),
                        FieldSpec::scalar("wildcard"),
                        FieldSpec::scalar("comment"),
                        FieldSpec::string_set("associated-interface"),
                    ],
                )
                .with_description("Per-device values of the address."),
            ),
    }
}
