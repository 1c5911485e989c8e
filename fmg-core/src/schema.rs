//! Attribute tables for resource types
//!
//! A [`ResourceSchema`] lists each attribute with its local name, the field
//! name on the device API and its type. Validation and the
//! [`mapper`](crate::mapper) both read from it.

use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use crate::resource::Value;

/// Type of a resource attribute
#[derive(Debug, Clone)]
pub enum AttributeType {
    String,
    Int,
    Bool,
    /// Integer within `min..=max`
    IntRange { min: i64, max: i64 },
    /// One of a fixed set of strings
    Enum(Vec<String>),
    /// `base` plus an extra check on the value. `normalize` rewrites a
    /// valid value into the form the device reports back.
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
        normalize: Option<fn(&Value) -> Value>,
    },
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
    /// Nested object with its own fields (table rows, sub-blocks)
    Struct {
        name: String,
        fields: Vec<AttributeSchema>,
    },
}

impl AttributeType {
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_))
            | (AttributeType::Int, Value::Int(_))
            | (AttributeType::Bool, Value::Bool(_)) => Ok(()),
            (AttributeType::IntRange { min, max }, Value::Int(n)) => {
                if (*min..=*max).contains(n) {
                    Ok(())
                } else {
                    Err(TypeError::ValidationFailed {
                        message: format!("Value {} is out of range {}-{}", n, min, max),
                    })
                }
            }
            (AttributeType::Enum(allowed), Value::String(s)) if allowed.contains(s) => Ok(()),
            (AttributeType::Enum(allowed), Value::String(s)) => Err(TypeError::InvalidEnumVariant {
                value: s.clone(),
                expected: allowed.clone(),
            }),
            (AttributeType::Custom { base, validate, .. }, v) => {
                base.validate(v)?;
                validate(v).map_err(|message| TypeError::ValidationFailed { message })
            }
            (AttributeType::List(item_type), Value::List(items)) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| {
                    item_type
                        .validate(item)
                        .map_err(|e| TypeError::ListItemError {
                            index,
                            inner: Box::new(e),
                        })
                }),
            (AttributeType::Map(value_type), Value::Map(entries)) => {
                entries.iter().try_for_each(|(key, v)| {
                    value_type.validate(v).map_err(|e| nested(key, e))
                })
            }
            (AttributeType::Struct { fields, .. }, Value::Map(entries)) => {
                validate_struct(fields, entries)
            }
            _ => Err(TypeError::TypeMismatch {
                expected: self.to_string(),
                got: value.kind().to_string(),
            }),
        }
    }
}

impl AttributeType {
    /// Rewrite `value` into the form the device echoes back, so a declared
    /// value and its read-back compare equal. Values that do not fit the
    /// type are returned unchanged.
    pub fn normalize(&self, value: &Value) -> Value {
        match (self, value) {
            (AttributeType::Custom { base, normalize, .. }, v) => {
                let v = base.normalize(v);
                match normalize {
                    Some(normalize) => normalize(&v),
                    None => v,
                }
            }
            (AttributeType::List(item_type), Value::List(items)) => {
                Value::List(items.iter().map(|item| item_type.normalize(item)).collect())
            }
            (AttributeType::Map(value_type), Value::Map(entries)) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), value_type.normalize(v)))
                    .collect(),
            ),
            (AttributeType::Struct { fields, .. }, Value::Map(entries)) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| {
                        let v = match fields.iter().find(|f| &f.name == k) {
                            Some(field) => field.attr_type.normalize(v),
                            None => v.clone(),
                        };
                        (k.clone(), v)
                    })
                    .collect(),
            ),
            (_, v) => v.clone(),
        }
    }
}

fn nested(key: &str, inner: TypeError) -> TypeError {
    TypeError::MapValueError {
        key: key.to_string(),
        inner: Box::new(inner),
    }
}

fn validate_struct(
    fields: &[AttributeSchema],
    entries: &HashMap<String, Value>,
) -> Result<(), TypeError> {
    if let Some(missing) = fields
        .iter()
        .find(|f| f.required && !entries.contains_key(&f.name))
    {
        return Err(TypeError::MissingRequired {
            name: missing.name.clone(),
        });
    }
    for (key, v) in entries {
        let Some(field) = fields.iter().find(|f| &f.name == key) else {
            return Err(TypeError::UnknownAttribute { name: key.clone() });
        };
        field.attr_type.validate(v).map_err(|e| nested(key, e))?;
    }
    Ok(())
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => f.write_str("String"),
            AttributeType::Int => f.write_str("Int"),
            AttributeType::IntRange { min, max } => write!(f, "Int({}..={})", min, max),
            AttributeType::Bool => f.write_str("Bool"),
            AttributeType::Enum(allowed) => write!(f, "Enum({})", allowed.join(" | ")),
            AttributeType::Custom { name, .. } | AttributeType::Struct { name, .. } => {
                f.write_str(name)
            }
            AttributeType::List(item_type) => write!(f, "List<{}>", item_type),
            AttributeType::Map(value_type) => write!(f, "Map<{}>", value_type),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("'{value}' is not one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("{message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("Attribute '{name}' is computed and cannot be set")]
    ComputedAttribute { name: String },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("item {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("'{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }
}

/// One attribute of a resource type
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    /// Filled in on read, never sent to the device
    pub computed: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Field name on the device API (e.g. "srcintf", "seq-num"). `None` for
    /// local-only attributes such as scope parameters and move options.
    pub provider_name: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        AttributeSchema {
            name: name.into(),
            attr_type,
            required: false,
            computed: false,
            default: None,
            description: None,
            provider_name: None,
        }
    }

    pub fn required(self) -> Self {
        AttributeSchema {
            required: true,
            ..self
        }
    }

    pub fn computed(self) -> Self {
        AttributeSchema {
            computed: true,
            ..self
        }
    }

    pub fn with_default(self, value: Value) -> Self {
        AttributeSchema {
            default: Some(value),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        AttributeSchema {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn with_provider_name(self, provider_name: impl Into<String>) -> Self {
        AttributeSchema {
            provider_name: Some(provider_name.into()),
            ..self
        }
    }

    fn check(&self, value: &Value) -> Result<(), TypeError> {
        if self.computed && self.default.as_ref() != Some(value) {
            return Err(TypeError::ComputedAttribute {
                name: self.name.clone(),
            });
        }
        self.attr_type
            .validate(value)
            .map_err(|e| TypeError::AttributeError {
                name: self.name.clone(),
                inner: Box::new(e),
            })
    }
}

/// Attribute table of one resource type
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        ResourceSchema {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, attribute: AttributeSchema) -> Self {
        self.attributes.insert(attribute.name.clone(), attribute);
        self
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        ResourceSchema {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn attribute_by_provider_name(&self, provider_name: &str) -> Option<&AttributeSchema> {
        self.attributes
            .values()
            .find(|a| a.provider_name.as_deref() == Some(provider_name))
    }

    /// Insert declared defaults for absent attributes
    pub fn apply_defaults(&self, attributes: &mut HashMap<String, Value>) {
        for attribute in self.attributes.values() {
            if let Some(default) = &attribute.default {
                attributes
                    .entry(attribute.name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
    }

    /// Rewrite declared values into their device form (see
    /// [`AttributeType::normalize`]). Call after [`validate`](Self::validate).
    pub fn normalize(&self, attributes: &mut HashMap<String, Value>) {
        for (name, value) in attributes.iter_mut() {
            if let Some(attribute) = self.attributes.get(name) {
                *value = attribute.attr_type.normalize(value);
            }
        }
    }

    /// Check `attributes` against the table, collecting every problem
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let missing = self
            .attributes
            .values()
            .filter(|a| a.required && a.default.is_none() && !attributes.contains_key(&a.name))
            .map(|a| TypeError::MissingRequired {
                name: a.name.clone(),
            });

        let invalid = attributes.iter().filter_map(|(name, value)| {
            match self.attributes.get(name) {
                Some(attribute) => attribute.check(value).err(),
                None => Some(TypeError::UnknownAttribute { name: name.clone() }),
            }
        });

        let errors: Vec<TypeError> = missing.chain(invalid).collect();
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Attribute types shared by the generated descriptors
pub mod types {
    use super::*;

    fn expect_int(value: &Value) -> Result<i64, String> {
        value.as_int().ok_or_else(|| "Expected integer".to_string())
    }

    fn expect_str(value: &Value) -> Result<&str, String> {
        value.as_str().ok_or_else(|| "Expected string".to_string())
    }

    fn custom(
        name: &str,
        base: AttributeType,
        validate: fn(&Value) -> Result<(), String>,
    ) -> AttributeType {
        AttributeType::Custom {
            name: name.to_string(),
            base: Box::new(base),
            validate,
            normalize: None,
        }
    }

    /// Integer in `min..=max` (distances, priorities, VLAN ids)
    pub fn int_range(min: i64, max: i64) -> AttributeType {
        AttributeType::IntRange { min, max }
    }

    /// Integer greater than zero (policy ids, sequence numbers)
    pub fn positive_int() -> AttributeType {
        custom("PositiveInt", AttributeType::Int, |value| {
            match expect_int(value)? {
                n if n > 0 => Ok(()),
                _ => Err("Value must be positive".to_string()),
            }
        })
    }

    /// Integer in 0-65535 (ports, distances, priorities)
    pub fn port() -> AttributeType {
        custom("Port", AttributeType::Int, |value| {
            let n = expect_int(value)?;
            if (0..=65535).contains(&n) {
                Ok(())
            } else {
                Err(format!("Value {} is out of range 0-65535", n))
            }
        })
    }

    /// "10.0.0.0 255.255.255.0" or "10.0.0.0/24", normalized to the former
    pub fn ipv4_mask() -> AttributeType {
        AttributeType::Custom {
            name: "Ipv4Mask".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| validate_ipv4_mask(expect_str(value)?),
            normalize: Some(ipv4_mask_device_form as fn(&Value) -> Value),
        }
    }

    fn ipv4_mask_device_form(value: &Value) -> Value {
        match value.as_str().and_then(normalize_ipv4_mask) {
            Some(s) => Value::String(s),
            None => value.clone(),
        }
    }

    pub fn ipv4() -> AttributeType {
        custom("Ipv4", AttributeType::String, |value| {
            let s = expect_str(value)?;
            s.parse::<Ipv4Addr>()
                .map(drop)
                .map_err(|_| format!("Invalid IPv4 address '{}'", s))
        })
    }

    /// "enable" / "disable"
    pub fn toggle() -> AttributeType {
        options(&["enable", "disable"])
    }

    pub fn options(values: &[&str]) -> AttributeType {
        AttributeType::Enum(values.iter().map(|v| v.to_string()).collect())
    }

    /// Member and interface name lists
    pub fn string_list() -> AttributeType {
        AttributeType::List(Box::new(AttributeType::String))
    }
}

/// Device form ("address mask") of a valid IPv4 address/netmask pair.
///
/// `"10.0.0.0/24"` becomes `"10.0.0.0 255.255.255.0"`; extra whitespace in
/// the "address mask" form collapses to one space. `None` when `value` is
/// not valid.
pub fn normalize_ipv4_mask(value: &str) -> Option<String> {
    validate_ipv4_mask(value).ok()?;
    if let Some((ip, prefix)) = value.split_once('/') {
        let prefix: u32 = prefix.parse().ok()?;
        let bits = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
        return Some(format!("{} {}", ip.trim(), Ipv4Addr::from(bits)));
    }
    Some(value.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Validate an IPv4 address/netmask pair.
///
/// Accepts the device's native "address mask" form and CIDR notation.
pub fn validate_ipv4_mask(value: &str) -> Result<(), String> {
    let (ip, mask) = if let Some((ip, prefix)) = value.split_once('/') {
        match prefix.parse::<u8>() {
            Ok(p) if p <= 32 => (ip, None),
            Ok(p) => return Err(format!("Invalid prefix length '{}': must be 0-32", p)),
            Err(_) => {
                return Err(format!(
                    "Invalid prefix length '{}': must be a number",
                    prefix
                ));
            }
        }
    } else {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(format!(
                "Invalid address '{}': expected 'IP MASK' or IP/prefix",
                value
            ));
        }
        (parts[0], Some(parts[1]))
    };

    ip.parse::<Ipv4Addr>()
        .map_err(|_| format!("Invalid IPv4 address '{}'", ip))?;

    if let Some(mask) = mask {
        let mask: Ipv4Addr = mask
            .parse()
            .map_err(|_| format!("Invalid netmask '{}'", mask))?;
        let bits = u32::from(mask);
        // Contiguous ones followed by zeros
        if bits.leading_ones() + bits.trailing_zeros() != 32 {
            return Err(format!("Invalid netmask '{}': not contiguous", mask));
        }
    }

    Ok(())
}
