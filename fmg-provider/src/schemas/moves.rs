//! Move resource descriptors
//!
//! A move resource has no object of its own on the device. It asks the
//! device to place one entry of an ordered collection (a policy, a rule, a
//! bookmark) immediately before or after a sibling, and on every read
//! reports whether the live order still satisfies that request through the
//! computed `state_pos` attribute.

use fmg_core::resource::Value;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use crate::scope::{DEVICE, PathParam, VDOM};

/// Local attribute naming the sibling to move relative to
pub const TARGET_ATTRIBUTE: &str = "target";
/// Local attribute holding "before" or "after"
pub const OPTION_ATTRIBUTE: &str = "option";
/// Computed attribute holding the reconciliation message
pub const STATE_POS_ATTRIBUTE: &str = "state_pos";

pub struct FmgMoveConfig {
    /// Sibling collection URL template
    pub url: &'static str,
    /// Identifying field of the sibling records (e.g., "policyid", "name")
    pub id_field: &'static str,
    /// Local attribute naming the entry to move
    pub source_attribute: &'static str,
    pub params: &'static [PathParam],
    pub schema: ResourceSchema,
}

impl FmgMoveConfig {
    pub fn resource_type(&self) -> &str {
        &self.schema.resource_type
    }
}

fn move_config(
    resource_type: &str,
    url: &'static str,
    id_field: &'static str,
    source_attribute: &'static str,
    source_type: AttributeType,
    params: &'static [PathParam],
) -> FmgMoveConfig {
    let schema = ResourceSchema::new(resource_type)
        .with_description(format!(
            "Keep a {} entry before or after a sibling.",
            id_field
        ))
        .attribute(
            AttributeSchema::new(source_attribute, source_type.clone())
                .required()
                .with_description("Key of the entry to move."),
        )
        .attribute(
            AttributeSchema::new(TARGET_ATTRIBUTE, source_type)
                .required()
                .with_description("Key of the entry to move relative to."),
        )
        .attribute(
            AttributeSchema::new(OPTION_ATTRIBUTE, types::options(&["before", "after"]))
                .required()
                .with_description("Place the entry before or after the target."),
        )
        .attribute(
            AttributeSchema::new(STATE_POS_ATTRIBUTE, AttributeType::String)
                .computed()
                .with_default(Value::String(String::new()))
                .with_description(
                    "Empty when the live order satisfies the move, otherwise the discrepancy.",
                ),
        );

    FmgMoveConfig {
        url,
        id_field,
        source_attribute,
        params,
        schema: super::generated::with_scope(schema, params),
    }
}

const DEVICE_VDOM: &[PathParam] = &[DEVICE, VDOM];

pub fn firewall_policy_move_config() -> FmgMoveConfig {
    move_config(
        "firewall_policy_move",
        "/pm/config/device/{device}/vdom/{vdom}/firewall/policy",
        "policyid",
        "policyid",
        AttributeType::Int,
        DEVICE_VDOM,
    )
}

pub fn firewall_proxypolicy_move_config() -> FmgMoveConfig {
    move_config(
        "firewall_proxypolicy_move",
        "/pm/config/device/{device}/vdom/{vdom}/firewall/proxy-policy",
        "policyid",
        "policyid",
        AttributeType::Int,
        DEVICE_VDOM,
    )
}

pub fn firewall_shapingpolicy_move_config() -> FmgMoveConfig {
    move_config(
        "firewall_shapingpolicy_move",
        "/pm/config/device/{device}/vdom/{vdom}/firewall/shaping-policy",
        "id",
        "shaping_policy",
        AttributeType::Int,
        DEVICE_VDOM,
    )
}

pub fn router_accesslist_rule_move_config() -> FmgMoveConfig {
    const PARAMS: &[PathParam] = &[DEVICE, VDOM, PathParam::new("access_list", "access_list")];
    move_config(
        "router_accesslist_rule_move",
        "/pm/config/device/{device}/vdom/{vdom}/router/access-list/{access_list}/rule",
        "id",
        "rule",
        AttributeType::Int,
        PARAMS,
    )
}

pub fn vpnsslweb_portal_bookmarkgroup_bookmarks_move_config() -> FmgMoveConfig {
    const PARAMS: &[PathParam] = &[
        DEVICE,
        VDOM,
        PathParam::new("portal", "portal"),
        PathParam::new("bookmark_group", "bookmark_group"),
    ];
    move_config(
        "vpnsslweb_portal_bookmarkgroup_bookmarks_move",
        "/pm/config/device/{device}/vdom/{vdom}/vpn/ssl/web/portal/{portal}/bookmark-group/{bookmark_group}/bookmarks",
        "name",
        "bookmarks",
        AttributeType::String,
        PARAMS,
    )
}

/// Returns all move resource configs
pub fn configs() -> Vec<FmgMoveConfig> {
    vec![
        firewall_policy_move_config(),
        firewall_proxypolicy_move_config(),
        firewall_shapingpolicy_move_config(),
        router_accesslist_rule_move_config(),
        vpnsslweb_portal_bookmarkgroup_bookmarks_move_config(),
    ]
}
