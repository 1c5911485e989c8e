//! Scope - URL templates and path parameters
//!
//! Device configuration URLs are scoped by device, vdom and parent objects,
//! e.g. `/pm/config/device/{device}/vdom/{vdom}/firewall/policy`. Each
//! placeholder is bound to a resource attribute.

use std::collections::HashMap;

use fmg_core::resource::Value;
use regex::Regex;

const PLACEHOLDER_PATTERN: &str = r"\{([a-z_]+)\}";

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("Missing attribute '{attribute}' for path parameter '{placeholder}'")]
    MissingAttribute {
        placeholder: String,
        attribute: String,
    },

    #[error("Path parameter '{placeholder}' in '{template}' has no binding")]
    Unbound {
        placeholder: String,
        template: String,
    },

    #[error("Invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Binding of a URL placeholder to a resource attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParam {
    /// Placeholder name without braces (e.g., "device")
    pub placeholder: &'static str,
    /// Attribute supplying the value (e.g., "device_name")
    pub attribute: &'static str,
    /// Value used when the attribute is absent
    pub default: Option<&'static str>,
}

impl PathParam {
    pub const fn new(placeholder: &'static str, attribute: &'static str) -> Self {
        Self {
            placeholder,
            attribute,
            default: None,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    fn resolve(&self, attributes: &HashMap<String, Value>) -> Result<String, ScopeError> {
        attributes
            .get(self.attribute)
            .and_then(Value::to_scalar_string)
            .filter(|s| !s.is_empty())
            .or_else(|| self.default.map(str::to_string))
            .ok_or_else(|| ScopeError::MissingAttribute {
                placeholder: self.placeholder.to_string(),
                attribute: self.attribute.to_string(),
            })
    }
}

/// Device-managed URL scope: `device` / `vdom` bound to `device_name` /
/// `device_vdom` (vdom defaults to "root")
pub const DEVICE: PathParam = PathParam::new("device", "device_name");
pub const VDOM: PathParam = PathParam::new("vdom", "device_vdom").with_default("root");

/// Placeholder names in the order they appear in `template`
pub fn placeholders(template: &str) -> Result<Vec<String>, ScopeError> {
    let re = Regex::new(PLACEHOLDER_PATTERN)?;
    Ok(re
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect())
}

/// Substitute every placeholder of `template` from `attributes`.
///
/// Substituted values are escaped like mkeys.
pub fn render_path(
    template: &str,
    params: &[PathParam],
    attributes: &HashMap<String, Value>,
) -> Result<String, ScopeError> {
    let mut rendered = template.to_string();
    for placeholder in placeholders(template)? {
        let param = params
            .iter()
            .find(|p| p.placeholder == placeholder)
            .ok_or_else(|| ScopeError::Unbound {
                placeholder: placeholder.clone(),
                template: template.to_string(),
            })?;
        let value = param.resolve(attributes)?;
        rendered = rendered.replace(&format!("{{{}}}", placeholder), &escape_mkey(&value));
    }
    Ok(rendered)
}

/// Scope attributes to re-attach to state after a read
pub fn scope_attributes(
    params: &[PathParam],
    attributes: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    params
        .iter()
        .filter_map(|p| {
            attributes
                .get(p.attribute)
                .map(|v| (p.attribute.to_string(), v.clone()))
        })
        .collect()
}

/// Escape an object key for use as a URL segment ("a/b" -> "a\/b")
pub fn escape_mkey(mkey: &str) -> String {
    mkey.replace('/', "\\/")
}

/// Object URL for `mkey` inside `collection`
pub fn object_url(collection: &str, mkey: &str) -> String {
    format!("{}/{}", collection, escape_mkey(mkey))
}
