//! Reorder - Relative position reconciliation for ordered device lists
//!
//! Rule and policy lists on a managed device are evaluated in order. A move
//! resource asks the device to place a source entry immediately before or
//! after a target entry; afterwards every read checks whether the live list
//! still satisfies that request and describes the discrepancy if not.
//!
//! The check never mutates anything. Its result is the `state_pos` string:
//! empty when the order is consistent, otherwise a message such as
//! `policyid(5) is 2 behind target(3)`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value as Json;

/// Requested placement of the source relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Before => "before",
            Placement::After => "after",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ReorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Placement::Before),
            "after" => Ok(Placement::After),
            other => Err(ReorderError::InvalidPlacement(other.to_string())),
        }
    }
}

/// "Place `source_id` immediately before/after `target_id`"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub source_id: String,
    pub target_id: String,
    pub placement: Placement,
}

impl MoveRequest {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        placement: Placement,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            placement,
        }
    }
}

/// Errors raised while reconciling
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// The device returned a record without the identifying field
    #[error("Error reading list entry {position}: {field} doesn't exist")]
    MissingIdentifier { field: String, position: usize },

    #[error("Invalid placement '{0}', expected 'before' or 'after'")]
    InvalidPlacement(String),
}

/// Outcome of comparing the live order against a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    /// The live order satisfies the request
    Consistent,
    SourceDeleted,
    TargetDeleted,
    BothDeleted,
    /// Source sits this many places after the target
    Behind(usize),
    /// Source sits this many places before the target
    Ahead(usize),
}

impl PositionStatus {
    pub fn is_consistent(&self) -> bool {
        matches!(self, PositionStatus::Consistent)
    }

    /// Render the `state_pos` message. `id_field` is the identifying field
    /// of the list entries (e.g. "policyid", "name").
    pub fn describe(&self, id_field: &str, request: &MoveRequest) -> String {
        let source = &request.source_id;
        let target = &request.target_id;
        match self {
            PositionStatus::Consistent => String::new(),
            PositionStatus::BothDeleted => format!(
                "{}({}) and target({}) were deleted",
                id_field, source, target
            ),
            PositionStatus::SourceDeleted => format!("{}({}) was deleted", id_field, source),
            PositionStatus::TargetDeleted => format!("target({}) was deleted", target),
            PositionStatus::Behind(n) => {
                format!("{}({}) is {} behind target({})", id_field, source, n, target)
            }
            PositionStatus::Ahead(n) => {
                format!("{}({}) is {} ahead of target({})", id_field, source, n, target)
            }
        }
    }
}

/// 1-based positions of source and target within a sibling list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Positions {
    pub source: Option<usize>,
    pub target: Option<usize>,
}

impl Positions {
    /// Classify these positions against the requested placement
    pub fn classify(&self, placement: Placement) -> PositionStatus {
        let (source, target) = match (self.source, self.target) {
            (None, None) => return PositionStatus::BothDeleted,
            (None, Some(_)) => return PositionStatus::SourceDeleted,
            (Some(_), None) => return PositionStatus::TargetDeleted,
            (Some(s), Some(t)) => (s, t),
        };

        let consistent = match placement {
            Placement::Before => source + 1 == target,
            Placement::After => source == target + 1,
        };
        if consistent {
            return PositionStatus::Consistent;
        }

        if source > target {
            PositionStatus::Behind(source - target)
        } else {
            PositionStatus::Ahead(target - source)
        }
    }
}

/// Walk `items` and record where source and target sit.
///
/// Every record must carry `id_field`; a record without it (or one that is
/// not an object) aborts the walk. Duplicate identifiers resolve to their
/// first occurrence, but the walk still validates every record.
pub fn locate(
    items: &[Json],
    id_field: &str,
    request: &MoveRequest,
) -> Result<Positions, ReorderError> {
    let mut positions = Positions::default();

    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        let id = item
            .as_object()
            .and_then(|record| record.get(id_field))
            .ok_or_else(|| ReorderError::MissingIdentifier {
                field: id_field.to_string(),
                position,
            })?;
        let id = identifier_string(id);

        if positions.source.is_none() && id == request.source_id {
            positions.source = Some(position);
        }
        if positions.target.is_none() && id == request.target_id {
            positions.target = Some(position);
        }
    }

    Ok(positions)
}

/// Compare the live order in `items` against `request`
pub fn reconcile(
    items: &[Json],
    id_field: &str,
    request: &MoveRequest,
) -> Result<PositionStatus, ReorderError> {
    let positions = locate(items, id_field, request)?;
    let status = positions.classify(request.placement);
    log::debug!(
        "{} {} {}: positions {:?} -> {:?}",
        request.source_id,
        request.placement,
        request.target_id,
        positions,
        status
    );
    Ok(status)
}

/// Reconcile and render the `state_pos` message in one step
pub fn state_pos(
    items: &[Json],
    id_field: &str,
    request: &MoveRequest,
) -> Result<String, ReorderError> {
    reconcile(items, id_field, request).map(|status| status.describe(id_field, request))
}

// Bounds of the floats that convert to i64 exactly
const I64_LOWER: f64 = i64::MIN as f64;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// String form of an identifying value as compared against requested ids
pub fn identifier_string(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&f) => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Json::Bool(b) => b.to_string(),
        Json::Null => String::new(),
        Json::Array(items) => {
            let parts: Vec<String> = items.iter().map(identifier_string).collect();
            format!("[{}]", parts.join(" "))
        }
        Json::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(names: &[&str]) -> Vec<Json> {
        names.iter().map(|n| json!({ "name": n })).collect()
    }

    fn policies(ids: &[i64]) -> Vec<Json> {
        ids.iter().map(|id| json!({ "policyid": id })).collect()
    }

    #[test]
    fn consistent_before() {
        let items = named(&["a", "b", "c"]);
        let request = MoveRequest::new("b", "c", Placement::Before);
        assert_eq!(state_pos(&items, "name", &request).unwrap(), "");
    }

    #[test]
    fn consistent_after() {
        let items = named(&["a", "b", "c"]);
        let request = MoveRequest::new("c", "b", Placement::After);
        assert!(reconcile(&items, "name", &request).unwrap().is_consistent());
    }

    #[test]
    fn after_request_with_source_ahead() {
        let items = named(&["a", "b", "c"]);
        let request = MoveRequest::new("a", "c", Placement::After);
        assert_eq!(
            reconcile(&items, "name", &request).unwrap(),
            PositionStatus::Ahead(2)
        );
        assert_eq!(
            state_pos(&items, "name", &request).unwrap(),
            "name(a) is 2 ahead of target(c)"
        );
    }

    #[test]
    fn offset_sign_convention() {
        let items = policies(&[1, 2, 3, 4, 5]);

        let request = MoveRequest::new("5", "2", Placement::Before);
        assert_eq!(
            state_pos(&items, "policyid", &request).unwrap(),
            "policyid(5) is 3 behind target(2)"
        );

        let request = MoveRequest::new("2", "5", Placement::After);
        assert_eq!(
            state_pos(&items, "policyid", &request).unwrap(),
            "policyid(2) is 3 ahead of target(5)"
        );
    }

    #[test]
    fn adjacent_but_wrong_side() {
        let items = named(&["a", "b"]);
        let request = MoveRequest::new("b", "a", Placement::Before);
        assert_eq!(
            reconcile(&items, "name", &request).unwrap(),
            PositionStatus::Behind(1)
        );
    }

    #[test]
    fn empty_list_reports_both_deleted() {
        let request = MoveRequest::new("x", "y", Placement::Before);
        assert_eq!(
            state_pos(&[], "name", &request).unwrap(),
            "name(x) and target(y) were deleted"
        );
    }

    #[test]
    fn missing_source_or_target() {
        let items = named(&["a", "b"]);

        let request = MoveRequest::new("gone", "b", Placement::Before);
        assert_eq!(
            state_pos(&items, "name", &request).unwrap(),
            "name(gone) was deleted"
        );

        let request = MoveRequest::new("a", "gone", Placement::Before);
        assert_eq!(
            state_pos(&items, "name", &request).unwrap(),
            "target(gone) was deleted"
        );
    }

    #[test]
    fn missing_identifier_is_fatal() {
        let items = vec![json!({ "name": "a" }), json!({ "comment": "no name" })];
        let request = MoveRequest::new("a", "b", Placement::Before);
        assert_eq!(
            reconcile(&items, "name", &request),
            Err(ReorderError::MissingIdentifier {
                field: "name".to_string(),
                position: 2,
            })
        );
    }

    #[test]
    fn non_object_record_is_fatal() {
        let items = vec![json!("a")];
        let request = MoveRequest::new("a", "b", Placement::Before);
        assert!(reconcile(&items, "name", &request).is_err());
    }

    #[test]
    fn missing_identifier_after_matches_still_fails() {
        let items = vec![json!({ "name": "a" }), json!({ "name": "b" }), json!({})];
        let request = MoveRequest::new("a", "b", Placement::Before);
        assert!(reconcile(&items, "name", &request).is_err());
    }

    #[test]
    fn duplicate_identifiers_resolve_to_first_occurrence() {
        let items = named(&["a", "b", "x", "a"]);
        let request = MoveRequest::new("a", "b", Placement::Before);
        assert_eq!(state_pos(&items, "name", &request).unwrap(), "");
    }

    #[test]
    fn numeric_identifiers_compare_as_strings() {
        let items = vec![json!({ "id": 10 }), json!({ "id": "11" }), json!({ "id": 12.0 })];
        let request = MoveRequest::new("10", "12", Placement::Before);
        let positions = locate(&items, "id", &request).unwrap();
        assert_eq!(positions.source, Some(1));
        assert_eq!(positions.target, Some(3));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let items = policies(&[3, 1, 2]);
        let request = MoveRequest::new("2", "3", Placement::Before);
        let first = state_pos(&items, "policyid", &request).unwrap();
        let second = state_pos(&items, "policyid", &request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "policyid(2) is 2 behind target(3)");
    }

    #[test]
    fn consistency_matches_adjacency_for_every_pair() {
        let ids = ["a", "b", "c", "d"];
        let items = named(&ids);
        for (si, source) in ids.iter().enumerate() {
            for (ti, target) in ids.iter().enumerate() {
                if si == ti {
                    continue;
                }
                let before = MoveRequest::new(*source, *target, Placement::Before);
                let after = MoveRequest::new(*source, *target, Placement::After);
                assert_eq!(
                    reconcile(&items, "name", &before).unwrap().is_consistent(),
                    si + 1 == ti
                );
                assert_eq!(
                    reconcile(&items, "name", &after).unwrap().is_consistent(),
                    si == ti + 1
                );
            }
        }
    }

    #[test]
    fn placement_parsing() {
        assert_eq!("before".parse::<Placement>().unwrap(), Placement::Before);
        assert_eq!("after".parse::<Placement>().unwrap(), Placement::After);
        assert!("above".parse::<Placement>().is_err());
        assert_eq!(Placement::After.to_string(), "after");
    }

    #[test]
    fn out_of_range_float_keeps_its_own_form() {
        let huge = json!(1e20);
        assert_eq!(identifier_string(&huge), huge.to_string());
        assert_ne!(identifier_string(&huge), i64::MAX.to_string());

        let request = MoveRequest::new("9223372036854775807", "1", Placement::Before);
        let items = vec![json!({ "policyid": 1 }), json!({ "policyid": 1e20 })];
        assert_eq!(
            state_pos(&items, "policyid", &request).unwrap(),
            "policyid(9223372036854775807) was deleted"
        );
    }

    #[test]
    fn identifier_string_forms() {
        assert_eq!(identifier_string(&json!("web")), "web");
        assert_eq!(identifier_string(&json!(7)), "7");
        assert_eq!(identifier_string(&json!(7.0)), "7");
        assert_eq!(identifier_string(&json!(-3.0)), "-3");
        assert_eq!(identifier_string(&json!(["a", "b"])), "[a b]");
        assert_eq!(identifier_string(&json!(null)), "");
    }
}
