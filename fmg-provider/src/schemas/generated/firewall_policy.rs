//! firewall_policy descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: firewall policy
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[
    PathParam::new("device", "device_name"),
    PathParam::new("vdom", "device_vdom").with_default("root"),
];

/// Returns the schema config for firewall_policy
pub fn firewall_policy_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/vdom/{vdom}/firewall/policy",
        mkey: "policyid",
        server_assigned_key: true,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("firewall_policy")
                .with_description("Configure IPv4 policies.")
                .attribute(
                    AttributeSchema::new("action", types::options(&["deny", "accept", "ipsec"]))
                        .with_description("Policy action (accept/deny/ipsec).")
                        .with_provider_name("action"),
                )
                .attribute(
                    AttributeSchema::new("comments", AttributeType::String)
                        .with_description("Comment.")
                        .with_provider_name("comments"),
                )
                .attribute(
                    AttributeSchema::new("dstaddr", types::string_list())
                        .with_description("Destination IPv4 address and address group names.")
                        .with_provider_name("dstaddr"),
                )
                .attribute(
                    AttributeSchema::new("dstintf", types::string_list())
                        .with_description("Outgoing (egress) interface.")
                        .with_provider_name("dstintf"),
                )
                .attribute(
                    AttributeSchema::new("logtraffic", types::options(&["disable", "all", "utm"]))
                        .with_description("Enable or disable logging.")
                        .with_provider_name("logtraffic"),
                )
                .attribute(
                    AttributeSchema::new("name", AttributeType::String)
                        .with_description("Policy name.")
                        .with_provider_name("name"),
                )
                .attribute(
                    AttributeSchema::new("nat", types::toggle())
                        .with_description("Enable/disable source NAT.")
                        .with_provider_name("nat"),
                )
                .attribute(
                    AttributeSchema::new("policyid", types::positive_int())
                        .with_description("Policy ID (assigned by the device when omitted).")
                        .with_provider_name("policyid"),
                )
                .attribute(
                    AttributeSchema::new("schedule", AttributeType::String)
                        .with_description("Schedule name.")
                        .with_provider_name("schedule"),
                )
                .attribute(
                    AttributeSchema::new("service", types::string_list())
                        .with_description("Service and service group names.")
                        .with_provider_name("service"),
                )
                .attribute(
                    AttributeSchema::new("srcaddr", types::string_list())
                        .with_description("Source IPv4 address and address group names.")
                        .with_provider_name("srcaddr"),
                )
                .attribute(
                    AttributeSchema::new("srcintf", types::string_list())
                        .with_description("Incoming (ingress) interface.")
                        .with_provider_name("srcintf"),
                )
                .attribute(
                    AttributeSchema::new("status", types::toggle())
                        .with_description("Enable or disable this policy.")
                        .with_provider_name("status"),
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
