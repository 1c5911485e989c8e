//! router_accesslist descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: router access-list
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[
    PathParam::new("device", "device_name"),
    PathParam::new("vdom", "device_vdom").with_default("root"),
];

/// Returns the schema config for router_accesslist
pub fn router_accesslist_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/vdom/{vdom}/router/access-list",
        mkey: "name",
        server_assigned_key: false,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("router_accesslist")
                .with_description("Configure access lists.")
                .attribute(
                    AttributeSchema::new("comments", AttributeType::String)
                        .with_description("Comment.")
                        .with_provider_name("comments"),
                )
                .attribute(
                    AttributeSchema::new("name", AttributeType::String)
                        .required()
                        .with_description("Name.")
                        .with_provider_name("name"),
                )
                .attribute(
                    AttributeSchema::new(
                        "rule",
                        AttributeType::List(Box::new(AttributeType::Struct {
                            name: "Rule".to_string(),
                            fields: vec![
                                AttributeSchema::new("action", types::options(&["permit", "deny"]))
                                    .with_description("Permit or deny this IP address and netmask prefix.")
                                    .with_provider_name("action"),
                                AttributeSchema::new("exact_match", types::toggle())
                                    .with_description("Enable/disable exact match.")
                                    .with_provider_name("exact-match"),
                                AttributeSchema::new("flags", AttributeType::Int)
                                    .with_description("Flags.")
                                    .with_provider_name("flags"),
                                AttributeSchema::new("id", AttributeType::Int)
                                    .with_description("Rule ID.")
                                    .with_provider_name("id"),
                                AttributeSchema::new("prefix", types::ipv4_mask())
                                    .with_description("IPv4 prefix to define regular filter criteria, such as \"any\" or subnets.")
                                    .with_provider_name("prefix"),
                                AttributeSchema::new("wildcard", AttributeType::String)
                                    .with_description("Wildcard to define Cisco-style wildcard filter criteria.")
                                    .with_provider_name("wildcard"),
                            ],
                        })),
                    )
                    .with_description("Rule.")
                    .with_provider_name("rule"),
                ),
            PARAMS,
        ),
    }
}
