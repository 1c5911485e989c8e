//! Effect - A side effect represented as a value
//!
//! Effects describe what should happen to a resource on the device.
//! Nothing runs until an [`Interpreter`](crate::interpreter::Interpreter)
//! executes them.

use crate::resource::{Resource, ResourceId, State};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the current state of a resource
    Read(Resource),
    Create(Resource),
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Delete a resource known from persisted state
    Delete { id: ResourceId, from: State },
}

impl Effect {
    /// Returns true if executing this Effect changes the device
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Effect::Read(_))
    }

    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Effect::Read(r) | Effect::Create(r) => &r.id,
            Effect::Update { id, .. } | Effect::Delete { id, .. } => id,
        }
    }
}
