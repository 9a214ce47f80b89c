//! vpn_ssl_web_portal schema definition
//!
//! FortiManager object: /pm/config/{adom}/obj/vpn/ssl/web/portal

use super::ResourceConfig;
use fortiform_core::{Coercion, FieldSpec, ResourceSpec};

fn bookmark_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::scalar("name").with_description("Bookmark name."),
        FieldSpec::scalar("apptype").with_description("Application type."),
        FieldSpec::scalar("url"),
        FieldSpec::scalar("host"),
        FieldSpec::scalar("port"),
        FieldSpec::scalar("folder"),
        FieldSpec::scalar("description"),
        FieldSpec::scalar("sso").with_description("Single sign-on."),
        FieldSpec::scalar("sso-credential"),
        FieldSpec::scalar("sso-username"),
        FieldSpec::string_set("sso-password")
            .sensitive()
            .with_description("SSO password."),
        FieldSpec::scalar("logon-user"),
        FieldSpec::string_set("logon-password")
            .sensitive()
            .with_description("Logon password."),
        FieldSpec::object_list(
            "form-data",
            vec![FieldSpec::scalar("name"), FieldSpec::scalar("value")],
        ),
    ]
}

/// Returns the schema config for vpn_ssl_web_portal
pub fn vpn_ssl_web_portal_config() -> ResourceConfig {
    ResourceConfig {
        resource_type: "vpn_ssl_web_portal",
        api_path: "/pm/config/{adom}/obj/vpn/ssl/web/portal",
        scoped: true,
        parent_keys: &[],
        // port may come back wrapped in a one-element list
        patches: &[("bookmark-group.bookmarks.port", Coercion::ParseInt)],
        spec: ResourceSpec::new("vpn_ssl_web_portal", "name")
            .with_description("Portal.")
            .field(FieldSpec::scalar("name").with_description("Portal name."))
            .field(FieldSpec::scalar("web-mode"))
            .field(FieldSpec::scalar("tunnel-mode"))
            .field(FieldSpec::string_set("ip-pools").with_description("IPv4 firewall source address objects reserved for SSL-VPN tunnel mode clients."))
            .field(FieldSpec::scalar("split-tunneling"))
            .field(FieldSpec::string_set("split-tunneling-routing-address"))
            .field(FieldSpec::scalar("dns-server1"))
            .field(FieldSpec::scalar("dns-server2"))
            .field(FieldSpec::scalar("heading").with_description("Web portal heading message."))
            .field(FieldSpec::scalar("theme"))
            .field(FieldSpec::scalar("user-bookmark"))
            .field(FieldSpec::scalar("display-bookmark"))
            .field(
                FieldSpec::object_list(
                    "bookmark-group",
                    vec![
                        FieldSpec::scalar("name").with_description("Bookmark group name."),
                        FieldSpec::object_list("bookmarks", bookmark_fields())
                            .with_description("Bookmark table."),
                    ],
                )
                .with_description("Portal bookmark group."),
            ),
    }
}
