//! firewall_address descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: firewall address
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[
    PathParam::new("device", "device_name"),
    PathParam::new("vdom", "device_vdom").with_default("root"),
];

/// Returns the schema config for firewall_address
pub fn firewall_address_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/vdom/{vdom}/firewall/address",
        mkey: "name",
        server_assigned_key: false,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("firewall_address")
                .with_description("Configure IPv4 addresses.")
                .attribute(
                    AttributeSchema::new("associated_interface", types::string_list())
                        .with_description("Network interface associated with address.")
                        .with_provider_name("associated-interface"),
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
                    AttributeSchema::new("country", AttributeType::String)
                        .with_description("IP addresses associated to a specific country.")
                        .with_provider_name("country"),
                )
                .attribute(
                    AttributeSchema::new("end_ip", types::ipv4())
                        .with_description("Final IP address (inclusive) in the range for the address.")
                        .with_provider_name("end-ip"),
                )
                .attribute(
                    AttributeSchema::new("fqdn", AttributeType::String)
                        .with_description("Fully Qualified Domain Name address.")
                        .with_provider_name("fqdn"),
                )
                .attribute(
                    AttributeSchema::new("name", AttributeType::String)
                        .required()
                        .with_description("Address name.")
                        .with_provider_name("name"),
                )
                .attribute(
                    AttributeSchema::new("start_ip", types::ipv4())
                        .with_description("First IP address (inclusive) in the range for the address.")
                        .with_provider_name("start-ip"),
                )
                .attribute(
                    AttributeSchema::new("subnet", types::ipv4_mask())
                        .with_description("IP address and subnet mask of address.")
                        .with_provider_name("subnet"),
                )
                .attribute(
                    AttributeSchema::new(
                        "type",
                        types::options(&["ipmask", "iprange", "fqdn", "geography", "wildcard", "dynamic", "interface-subnet"]),
                    )
                    .with_description("Type of address.")
                    .with_provider_name("type"),
                )
                .attribute(
                    AttributeSchema::new("uuid", AttributeType::String)
                        .computed()
                        .with_description("Universally Unique Identifier (UUID; automatically assigned but can be manually reset).")
                        .with_provider_name("uuid"),
                )
                .attribute(
                    AttributeSchema::new("visibility", types::toggle())
                        .with_description("Enable/disable address visibility in the GUI.")
                        .with_provider_name("visibility"),
                ),
            PARAMS,
        ),
    }
}
