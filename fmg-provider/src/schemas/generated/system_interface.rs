//! system_interface descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: system interface
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[PathParam::new("device", "device_name")];

/// Returns the schema config for system_interface
pub fn system_interface_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/global/system/interface",
        mkey: "name",
        server_assigned_key: false,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("system_interface")
                .with_description("Configure interfaces.")
                .attribute(
                    AttributeSchema::new("alias", AttributeType::String)
                        .with_description("Alias will be displayed with the interface name to make it easier to distinguish.")
                        .with_provider_name("alias"),
                )
                .attribute(
                    AttributeSchema::new(
                        "allowaccess",
                        AttributeType::List(Box::new(types::options(&["ping", "https", "ssh", "snmp", "http", "telnet", "fgfm", "radius-acc", "probe-response", "fabric", "ftm"]))),
                    )
                    .with_description("Permitted types of management access to this interface.")
                    .with_provider_name("allowaccess"),
                )
                .attribute(
                    AttributeSchema::new("description", AttributeType::String)
                        .with_description("Description.")
                        .with_provider_name("description"),
                )
                .attribute(
                    AttributeSchema::new("interface", AttributeType::String)
                        .with_description("Interface name.")
                        .with_provider_name("interface"),
                )
                .attribute(
                    AttributeSchema::new("ip", types::ipv4_mask())
                        .with_description("Interface IPv4 address and subnet mask, syntax: X.X.X.X/24.")
                        .with_provider_name("ip"),
                )
                .attribute(
                    AttributeSchema::new("mode", types::options(&["static", "dhcp", "pppoe"]))
                        .with_description("Addressing mode (static, DHCP, PPPoE).")
                        .with_provider_name("mode"),
                )
                .attribute(
                    AttributeSchema::new("mtu", AttributeType::Int)
                        .with_description("MTU value for this interface.")
                        .with_provider_name("mtu"),
                )
                .attribute(
                    AttributeSchema::new("name", AttributeType::String)
                        .required()
                        .with_description("Name.")
                        .with_provider_name("name"),
                )
                .attribute(
                    AttributeSchema::new("role", types::options(&["lan", "wan", "dmz", "undefined"]))
                        .with_description("Interface role.")
                        .with_provider_name("role"),
                )
                .attribute(
                    AttributeSchema::new("status", types::options(&["up", "down"]))
                        .with_description("Bring the interface up or shut the interface down.")
                        .with_provider_name("status"),
                )
                .attribute(
                    AttributeSchema::new(
                        "type",
                        types::options(&["physical", "vlan", "aggregate", "redundant", "tunnel", "vdom-link", "loopback", "switch", "vap-switch", "wl-mesh", "fext-wan", "vxlan", "geneve", "hdlc", "switch-vlan", "emac-vlan"]),
                    )
                    .with_description("Interface type.")
                    .with_provider_name("type"),
                )
                .attribute(
                    AttributeSchema::new("vdom", AttributeType::String)
                        .with_description("Interface is in this virtual domain (VDOM).")
                        .with_provider_name("vdom"),
                )
                .attribute(
                    AttributeSchema::new("vlanid", types::int_range(1, 4094))
                        .with_description("VLAN ID (1 - 4094).")
                        .with_provider_name("vlanid"),
                ),
            PARAMS,
        ),
    }
}
