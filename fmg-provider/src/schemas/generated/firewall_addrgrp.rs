//! firewall_addrgrp descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: firewall addrgrp
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[
    PathParam::new("device", "device_name"),
    PathParam::new("vdom", "device_vdom").with_default("root"),
];

/// Returns the schema config for firewall_addrgrp
pub fn firewall_addrgrp_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/vdom/{vdom}/firewall/addrgrp",
        mkey: "name",
        server_assigned_key: false,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("firewall_addrgrp")
                .with_description("Configure IPv4 address groups.")
                .attribute(
                    AttributeSchema::new("allow_routing", types::toggle())
                        .with_description("Enable/disable use of this group in the static route configuration.")
                        .with_provider_name("allow-routing"),
                )
                .attribute(
                    AttributeSchema::new("color", AttributeType::Int)
                        .with_description("Color of icon on the GUI.")
                        .with_provider_name("color"),
                )
                .attribute(
                    AttributeSchema::new("comment", AttributeType::String)
                        .with_description("Comment.")
                        .with_provider_name("comment"),
                )
                .attribute(
                    AttributeSchema::new("exclude", types::toggle())
                        .with_description("Enable/disable address exclusion.")
                        .with_provider_name("exclude"),
                )
                .attribute(
                    AttributeSchema::new("exclude_member", types::string_list())
                        .with_description("Address exclusion member.")
                        .with_provider_name("exclude-member"),
                )
                .attribute(
                    AttributeSchema::new("member", types::string_list())
                        .with_description("Address objects contained within the group.")
                        .with_provider_name("member"),
                )
                .attribute(
                    AttributeSchema::new("name", AttributeType::String)
                        .required()
                        .with_description("Address group name.")
                        .with_provider_name("name"),
                )
                .attribute(
                    AttributeSchema::new("uuid", AttributeType::String)
                        .computed()
                        .with_description("Universally Unique Identifier (UUID; automatically assigned but can be manually reset).")
                        .with_provider_name("uuid"),
                ),
            PARAMS,
        ),
    }
}
