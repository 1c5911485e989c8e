//! Mapper - Generic flatten/expand between attributes and device payloads
//!
//! `expand` turns local attributes into the JSON payload the device API
//! expects, `flatten` turns a device payload back into attributes. Both are
//! driven entirely by the [`ResourceSchema`] field descriptors; the
//! per-type coercions live in [`flatten_value`] and [`expand_value`].

use std::collections::HashMap;

use serde_json::{Map, Number, Value as Json, json};

use crate::resource::Value;
use crate::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Untyped JSON that has no [`Value`] counterpart
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("{0} is not an integer")]
    NotAnInteger(Number),
}

/// Convert local attributes into a device payload keyed by remote names.
///
/// Attributes without a remote name, computed attributes and values whose
/// shape does not match the declared type are skipped.
pub fn expand(schema: &ResourceSchema, attributes: &HashMap<String, Value>) -> Map<String, Json> {
    expand_fields(schema.attributes.values(), attributes)
}

/// Convert a device payload into local attributes.
pub fn flatten(schema: &ResourceSchema, payload: &Map<String, Json>) -> HashMap<String, Value> {
    flatten_fields(schema.attributes.values(), payload)
}

fn expand_fields<'a>(
    fields: impl Iterator<Item = &'a AttributeSchema>,
    attributes: &HashMap<String, Value>,
) -> Map<String, Json> {
    let mut payload = Map::new();
    for field in fields {
        if field.computed {
            continue;
        }
        if let Some(remote_name) = &field.provider_name
            && let Some(value) = attributes.get(&field.name)
        {
            match expand_value(&field.attr_type, value) {
                Some(v) => {
                    payload.insert(remote_name.clone(), v);
                }
                None => log::debug!(
                    "skipping attribute '{}': value does not match {}",
                    field.name,
                    field.attr_type
                ),
            }
        }
    }
    payload
}

fn flatten_fields<'a>(
    fields: impl Iterator<Item = &'a AttributeSchema>,
    payload: &Map<String, Json>,
) -> HashMap<String, Value> {
    let mut attributes = HashMap::new();
    for field in fields {
        if let Some(remote_name) = &field.provider_name
            && let Some(raw) = payload.get(remote_name)
            && let Some(v) = flatten_value(&field.attr_type, raw)
        {
            attributes.insert(field.name.clone(), v);
        }
    }
    attributes
}

/// Convert one local value into its payload form
pub fn expand_value(attr_type: &AttributeType, value: &Value) -> Option<Json> {
    match (attr_type, value) {
        (AttributeType::String | AttributeType::Enum(_), Value::String(s)) => Some(json!(s)),
        (AttributeType::Int | AttributeType::IntRange { .. }, Value::Int(i)) => Some(json!(i)),
        (AttributeType::Bool, Value::Bool(b)) => Some(json!(b)),
        (AttributeType::Custom { base, .. }, v) => expand_value(base, v),
        (AttributeType::List(inner), Value::List(items)) => Some(Json::Array(
            items
                .iter()
                .filter_map(|item| expand_value(inner, item))
                .collect(),
        )),
        (AttributeType::Map(inner), Value::Map(map)) => Some(Json::Object(
            map.iter()
                .filter_map(|(k, v)| expand_value(inner, v).map(|j| (k.clone(), j)))
                .collect(),
        )),
        (AttributeType::Struct { fields, .. }, Value::Map(map)) => {
            Some(Json::Object(expand_fields(fields.iter(), map)))
        }
        _ => None,
    }
}

/// Convert one payload value into its local form, coercing the device's
/// loose typing (numbers as strings, single-element lists for scalars).
pub fn flatten_value(attr_type: &AttributeType, raw: &Json) -> Option<Value> {
    if raw.is_null() {
        return None;
    }
    match attr_type {
        AttributeType::String | AttributeType::Enum(_) => flatten_string(raw).map(Value::String),
        AttributeType::Int | AttributeType::IntRange { .. } => flatten_int(raw).map(Value::Int),
        AttributeType::Bool => flatten_bool(raw).map(Value::Bool),
        AttributeType::Custom { base, .. } => {
            flatten_value(base, raw).map(|v| attr_type.normalize(&v))
        }
        AttributeType::List(inner) => match raw {
            Json::Array(items) => Some(Value::List(
                items
                    .iter()
                    .filter_map(|item| flatten_value(inner, item))
                    .collect(),
            )),
            scalar => flatten_value(inner, scalar).map(|v| Value::List(vec![v])),
        },
        AttributeType::Map(inner) => raw.as_object().map(|obj| {
            Value::Map(
                obj.iter()
                    .filter_map(|(k, v)| flatten_value(inner, v).map(|v| (k.clone(), v)))
                    .collect(),
            )
        }),
        AttributeType::Struct { fields, .. } => match raw {
            Json::Object(obj) => Some(Value::Map(flatten_fields(fields.iter(), obj))),
            Json::Array(items) if items.len() == 1 => flatten_value(attr_type, &items[0]),
            _ => None,
        },
    }
}

fn flatten_string(raw: &Json) -> Option<String> {
    match raw {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        // "subnet": ["10.0.0.0", "255.255.255.0"] -> "10.0.0.0 255.255.255.0"
        Json::Array(items) if !items.is_empty() => {
            let parts: Option<Vec<String>> = items.iter().map(flatten_string).collect();
            parts.map(|p| p.join(" "))
        }
        _ => None,
    }
}

fn flatten_int(raw: &Json) -> Option<i64> {
    match raw {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.trim().parse().ok(),
        Json::Array(items) if items.len() == 1 => flatten_int(&items[0]),
        _ => None,
    }
}

fn flatten_bool(raw: &Json) -> Option<bool> {
    match raw {
        Json::Bool(b) => Some(*b),
        Json::Number(n) => n.as_i64().map(|i| i != 0),
        Json::String(s) => match s.as_str() {
            "enable" | "true" | "1" => Some(true),
            "disable" | "false" | "0" => Some(false),
            _ => None,
        },
        Json::Array(items) if items.len() == 1 => flatten_bool(&items[0]),
        _ => None,
    }
}

/// Convert untyped JSON (configuration files, persisted state) into a Value.
///
/// `null` yields `None`, at any depth. Numbers must be integers.
pub fn json_to_value(value: &Json) -> Result<Option<Value>, ConvertError> {
    let converted = match value {
        Json::Null => return Ok(None),
        Json::String(s) => Value::String(s.clone()),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => return Err(ConvertError::NotAnInteger(n.clone())),
        },
        Json::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                list.extend(json_to_value(item)?);
            }
            Value::List(list)
        }
        Json::Object(obj) => {
            let mut map = HashMap::with_capacity(obj.len());
            for (key, item) in obj {
                if let Some(v) = json_to_value(item)? {
                    map.insert(key.clone(), v);
                }
            }
            Value::Map(map)
        }
    };
    Ok(Some(converted))
}

/// Convert a Value into untyped JSON
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => json!(s),
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => Json::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}
