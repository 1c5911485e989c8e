//! router_static descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: router static
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[
    PathParam::new("device", "device_name"),
    PathParam::new("vdom", "device_vdom").with_default("root"),
];

/// Returns the schema config for router_static
pub fn router_static_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/vdom/{vdom}/router/static",
        mkey: "seq-num",
        server_assigned_key: true,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("router_static")
                .with_description("Configure IPv4 static routing tables.")
                .attribute(
                    AttributeSchema::new("blackhole", types::toggle())
                        .with_description("Enable/disable black hole.")
                        .with_provider_name("blackhole"),
                )
                .attribute(
                    AttributeSchema::new("comment", AttributeType::String)
                        .with_description("Optional comments.")
                        .with_provider_name("comment"),
                )
                .attribute(
                    AttributeSchema::new("device", types::string_list())
                        .with_description("Gateway out interface or tunnel.")
                        .with_provider_name("device"),
                )
                .attribute(
                    AttributeSchema::new("distance", types::int_range(1, 255))
                        .with_description("Administrative distance (1 - 255).")
                        .with_provider_name("distance"),
                )
                .attribute(
                    AttributeSchema::new("dst", types::ipv4_mask())
                        .with_description("Destination IP and mask for this route.")
                        .with_provider_name("dst"),
                )
                .attribute(
                    AttributeSchema::new("gateway", types::ipv4())
                        .with_description("Gateway IP for this route.")
                        .with_provider_name("gateway"),
                )
                .attribute(
                    AttributeSchema::new("priority", types::int_range(0, 4294967295))
                        .with_description("Administrative priority (0 - 4294967295).")
                        .with_provider_name("priority"),
                )
                .attribute(
                    AttributeSchema::new("seq_num", types::positive_int())
                        .with_description("Sequence number (assigned by the device when omitted).")
                        .with_provider_name("seq-num"),
                )
                .attribute(
                    AttributeSchema::new("status", types::toggle())
                        .with_description("Enable/disable this static route.")
                        .with_provider_name("status"),
                ),
            PARAMS,
        ),
    }
}
