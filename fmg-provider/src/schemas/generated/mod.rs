//! Auto-generated FortiManager object descriptors
//!
//! DO NOT EDIT MANUALLY - regenerate with:
//!   fmg-codegen --file <object>.json --output fmg-provider/src/schemas/generated/<object>.rs

use fmg_core::resource::Value;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use crate::scope::PathParam;

pub mod firewall_address;
pub mod firewall_addrgrp;
pub mod firewall_policy;
pub mod router_accesslist;
pub mod router_static;
pub mod system_interface;
pub mod vpnsslweb_portal_bookmarkgroup_bookmarks;

/// FortiManager object configuration
///
/// Combines the generated ResourceSchema with the URL template, the key
/// field and the path parameter bindings of the object.
pub struct FmgSchemaConfig {
    /// Collection URL template (e.g., "/pm/config/device/{device}/vdom/{vdom}/firewall/address")
    pub url: &'static str,
    /// Remote key field (e.g., "name", "policyid", "seq-num")
    pub mkey: &'static str,
    /// Whether the device assigns the key when it is omitted on create
    pub server_assigned_key: bool,
    pub params: &'static [PathParam],
    /// The resource schema with attribute definitions
    pub schema: ResourceSchema,
}

impl FmgSchemaConfig {
    pub fn resource_type(&self) -> &str {
        &self.schema.resource_type
    }

    /// Local attribute holding the key
    pub fn mkey_attribute(&self) -> String {
        crate::utils::local_name(self.mkey)
    }
}

/// Add one string attribute per path parameter. Parameters with a default
/// are optional.
pub fn with_scope(mut schema: ResourceSchema, params: &[PathParam]) -> ResourceSchema {
    for param in params {
        let mut attr = AttributeSchema::new(param.attribute, AttributeType::String)
            .with_description(format!("Path parameter '{}'", param.placeholder));
        attr = match param.default {
            Some(default) => attr.with_default(Value::String(default.to_string())),
            None => attr.required(),
        };
        schema = schema.attribute(attr);
    }
    schema
}

/// Returns all generated schema configs
pub fn configs() -> Vec<FmgSchemaConfig> {
    vec![
        firewall_address::firewall_address_config(),
        firewall_addrgrp::firewall_addrgrp_config(),
        firewall_policy::firewall_policy_config(),
        router_accesslist::router_accesslist_config(),
        router_static::router_static_config(),
        system_interface::system_interface_config(),
        vpnsslweb_portal_bookmarkgroup_bookmarks::vpnsslweb_portal_bookmarkgroup_bookmarks_config(),
    ]
}

/// Returns all generated schemas
pub fn schemas() -> Vec<ResourceSchema> {
    configs().into_iter().map(|c| c.schema).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mkey_is_an_attribute() {
        for config in configs() {
            let mkey = config.mkey_attribute();
            let attr = config.schema.attributes.get(&mkey).unwrap_or_else(|| {
                panic!("{} has no attribute for mkey {}", config.resource_type(), mkey)
            });
            assert_eq!(attr.provider_name.as_deref(), Some(config.mkey));
        }
    }

    #[test]
    fn every_path_param_is_a_placeholder() {
        for config in configs() {
            let placeholders = crate::scope::placeholders(config.url).unwrap();
            assert_eq!(placeholders.len(), config.params.len(), "{}", config.url);
            for param in config.params {
                assert!(placeholders.iter().any(|p| p == param.placeholder));
                assert!(config.schema.attributes.contains_key(param.attribute));
            }
        }
    }
}
