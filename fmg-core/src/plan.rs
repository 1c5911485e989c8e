//! Ordered effects produced by the differ
//!
//! Building a plan never touches the device.

use std::fmt;

use crate::effect::Effect;

#[derive(Debug, Clone, Default)]
pub struct Plan {
    effects: Vec<Effect>,
}

impl Plan {
    pub fn new() -> Self {
        Plan::default()
    }

    pub fn add(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Effects that would change the device
    pub fn mutation_count(&self) -> usize {
        self.effects.iter().filter(|e| e.is_mutating()).count()
    }

    pub fn summary(&self) -> PlanSummary {
        self.effects
            .iter()
            .fold(PlanSummary::default(), |mut summary, effect| {
                let slot = match effect {
                    Effect::Read(_) => &mut summary.read,
                    Effect::Create(_) => &mut summary.create,
                    Effect::Update { .. } => &mut summary.update,
                    Effect::Delete { .. } => &mut summary.delete,
                };
                *slot += 1;
                summary
            })
    }
}

/// Effect counts by kind
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub read: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Plan: {} to create, {} to update, {} to delete",
            self.create, self.update, self.delete
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Resource, ResourceId, State};

    #[test]
    fn empty_plan_has_no_mutations() {
        let plan = Plan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.mutation_count(), 0);
        assert_eq!(plan.summary(), PlanSummary::default());
    }

    #[test]
    fn summary_counts_each_kind() {
        let stale = ResourceId::new("firewall_address", "old");
        let mut plan = Plan::new();
        plan.add(Effect::Create(Resource::new("firewall_address", "web")));
        plan.add(Effect::Read(Resource::new("firewall_policy", "allow_web")));
        plan.add(Effect::Delete {
            id: stale.clone(),
            from: State::not_found(stale),
        });

        assert_eq!(
            plan.summary(),
            PlanSummary {
                read: 1,
                create: 1,
                update: 0,
                delete: 1,
            }
        );
        assert_eq!(plan.mutation_count(), 2);
        assert_eq!(
            plan.summary().to_string(),
            "Plan: 1 to create, 0 to update, 1 to delete"
        );
    }
}
