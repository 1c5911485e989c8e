//! Helper functions for field names and device keys

use heck::ToSnakeCase;
use serde_json::Value as Json;

use fmg_core::reorder::identifier_string;

/// Local attribute name for a remote field (e.g., "seq-num" -> "seq_num")
pub fn local_name(remote: &str) -> String {
    remote.to_snake_case()
}

/// Extract the key of a newly added object from the `add` response data.
///
/// The device answers `{"policyid": 7}` for server-assigned keys; some
/// versions wrap it in a single-element list.
pub fn key_from_response(data: Option<&Json>, mkey: &str) -> Option<String> {
    match data? {
        Json::Object(obj) => obj
            .get(mkey)
            .map(identifier_string)
            .filter(|key| !key.is_empty()),
        Json::Array(items) if items.len() == 1 => key_from_response(items.first(), mkey),
        _ => None,
    }
}
