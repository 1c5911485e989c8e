//! Desired configuration vs. what the device reports
//!
//! Declared resources are compared against their current [`State`] and turned
//! into a [`Plan`]. Resources recorded in the state file but no longer
//! declared become deletions at the end of the plan.

use std::collections::{HashMap, HashSet};

use crate::effect::Effect;
use crate::plan::Plan;
use crate::resource::{Resource, ResourceId, State, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    Create(Resource),
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
        /// Sorted names of the attributes that differ
        changed_attributes: Vec<String>,
    },
    NoChange(ResourceId),
    Delete { id: ResourceId, from: State },
}

impl Diff {
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }

    fn into_effect(self) -> Option<Effect> {
        match self {
            Diff::Create(resource) => Some(Effect::Create(resource)),
            Diff::Update { id, from, to, .. } => Some(Effect::Update { id, from, to }),
            Diff::Delete { id, from } => Some(Effect::Delete { id, from }),
            Diff::NoChange(_) => None,
        }
    }
}

pub fn diff(desired: &Resource, current: &State) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let changed_attributes = find_changed_attributes(&desired.attributes, &current.attributes);
    if changed_attributes.is_empty() {
        return Diff::NoChange(desired.id.clone());
    }

    Diff::Update {
        id: desired.id.clone(),
        from: current.clone(),
        to: desired.clone(),
        changed_attributes,
    }
}

/// Names of declared attributes whose current value differs.
///
/// Only keys present in `desired` count, so values the device fills in by
/// itself (uuid, defaults) never show as drift. Keys starting with `_` are
/// internal and ignored.
pub fn find_changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
) -> Vec<String> {
    let mut changed: Vec<String> = desired
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .filter(|(key, value)| current.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    changed.sort();
    changed
}

/// Build the plan for `desired`.
///
/// `current_states` holds what was read for each declared resource; a
/// missing entry means the object does not exist. `tracked` is every state in
/// the state file.
pub fn create_plan(
    desired: &[Resource],
    current_states: &HashMap<ResourceId, State>,
    tracked: &[State],
) -> Plan {
    let mut plan = Plan::new();

    for resource in desired {
        let change = match current_states.get(&resource.id) {
            Some(current) => diff(resource, current),
            None => Diff::Create(resource.clone()),
        };
        if let Some(effect) = change.into_effect() {
            plan.add(effect);
        }
    }

    let declared: HashSet<&ResourceId> = desired.iter().map(|r| &r.id).collect();
    tracked
        .iter()
        .filter(|state| !declared.contains(&state.id))
        .for_each(|state| {
            plan.add(Effect::Delete {
                id: state.id.clone(),
                from: state.clone(),
            })
        });

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(resource_type: &str, name: &str, attrs: &[(&str, Value)]) -> State {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        State::existing(ResourceId::new(resource_type, name), attributes)
    }

    #[test]
    fn missing_object_is_created() {
        let desired = Resource::new("firewall_address", "web");
        let current = State::not_found(desired.id.clone());
        assert!(matches!(diff(&desired, &current), Diff::Create(_)));
    }

    #[test]
    fn device_only_attributes_are_not_drift() {
        let desired = Resource::new("firewall_address", "web")
            .with_attribute("subnet", "10.0.1.0 255.255.255.0");
        let current = live(
            "firewall_address",
            "web",
            &[
                ("subnet", Value::from("10.0.1.0 255.255.255.0")),
                ("uuid", Value::from("9f1c")),
            ],
        );

        let result = diff(&desired, &current);
        assert!(!result.is_change());
    }

    #[test]
    fn move_position_drift_is_an_update() {
        let desired = Resource::new("firewall_policy_move", "web_first").with_attribute("state_pos", "");
        let current = live(
            "firewall_policy_move",
            "web_first",
            &[("state_pos", Value::from("policyid(5) is 2 behind target(3)"))],
        );

        match diff(&desired, &current) {
            Diff::Update {
                changed_attributes, ..
            } => assert_eq!(changed_attributes, vec!["state_pos".to_string()]),
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn internal_keys_are_ignored() {
        let desired: HashMap<String, Value> = [
            ("_scope".to_string(), Value::from("adom")),
            ("color".to_string(), Value::from(3)),
            ("comment".to_string(), Value::from("dmz")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            find_changed_attributes(&desired, &HashMap::new()),
            vec!["color".to_string(), "comment".to_string()]
        );
    }

    #[test]
    fn plan_creates_updates_and_removes_undeclared() {
        let resources = vec![
            Resource::new("firewall_address", "new"),
            Resource::new("firewall_address", "existing").with_attribute("color", 3),
            Resource::new("firewall_address", "same").with_attribute("color", 1),
        ];

        let current_states: HashMap<ResourceId, State> = [
            live("firewall_address", "existing", &[("color", Value::Int(1))]),
            live("firewall_address", "same", &[("color", Value::Int(1))]),
        ]
        .into_iter()
        .map(|state| (state.id.clone(), state))
        .collect();

        let orphan = live("firewall_address", "old", &[]).with_identifier("old");
        let tracked = vec![current_states[&resources[1].id].clone(), orphan];

        let plan = create_plan(&resources, &current_states, &tracked);
        let effects = plan.effects();
        assert_eq!(effects.len(), 3);
        assert!(matches!(&effects[0], Effect::Create(r) if r.id.name == "new"));
        assert!(matches!(&effects[1], Effect::Update { id, .. } if id.name == "existing"));
        assert!(matches!(&effects[2], Effect::Delete { id, .. } if id.name == "old"));
    }
}
