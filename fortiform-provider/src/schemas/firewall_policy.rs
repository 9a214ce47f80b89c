//! firewall_policy schema definition
//!
//! FortiManager object: /pm/config/{adom}/pkg/{pkg}/firewall/policy

use super::{ParentKey, ResourceConfig};
use fortiform_core::{Coercion, FieldSpec, ResourceSpec};

/// Returns the schema config for firewall_policy
pub fn firewall_policy_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "firewall_policy",
        api_path: "/pm/config/{adom}/pkg/{pkg}/firewall/policy",
        scoped: true,
        parent_keys: &[ParentKey {
            local_name: "pkg",
            param: "pkg",
        }],
        patches: &[("comments", Coercion::FirstElement), ("schedule", Coercion::FirstElement)],
        spec: ResourceSpec::new("firewall_policy", "policyid")
            .with_description("Configure IPv4 policies in a policy package.")
            .field(FieldSpec::scalar("policyid").with_description("Policy ID."))
            .field(FieldSpec::scalar("name").with_description("Policy name."))
            .field(FieldSpec::scalar("action").with_description("Policy action (accept, deny, ipsec)."))
            .field(FieldSpec::scalar("status"))
            .field(FieldSpec::string_set("srcintf").with_description("Incoming (ingress) interface."))
            .field(FieldSpec::string_set("dstintf").with_description("Outgoing (egress) interface."))
            .field(FieldSpec::string_set("srcaddr").with_description("Source address and address group names."))
            .field(FieldSpec::string_set("dstaddr").with_description("Destination address and address group names."))
            .field(FieldSpec::string_set("service").with_description("Service and service group names."))
            .field(FieldSpec::scalar("schedule").with_description("Schedule name."))
            .field(FieldSpec::scalar("nat"))
            .field(FieldSpec::scalar("logtraffic"))
            .field(FieldSpec::scalar("comments"))
            .field(FieldSpec::scalar("uuid").with_description("Universally Unique Identifier (read-only)."))
            .field(
                FieldSpec::object_list(
                    "_policy_block",
                    vec![FieldSpec::scalar("name"), FieldSpec::scalar("seq")],
                )
                .with_local_name("policy_block")
                .with_description("Policy block the policy belongs to."),
            ),
    }
}
