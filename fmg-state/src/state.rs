//! State file structures for persisting device configuration state

use std::collections::HashMap;

use fmg_core::mapper::{json_to_value, value_to_json};
use fmg_core::resource::{ResourceId, State};
use serde::{Deserialize, Serialize};

/// The main state file structure that persists to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number for each state modification
    pub serial: u64,
    /// Unique identifier for this state lineage
    pub lineage: String,
    /// Version of fmg that last modified this state
    pub fmg_version: String,
    /// All managed resources as last read from the device
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage: uuid::Uuid::new_v4().to_string(),
            fmg_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Bump the serial before a write
    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.fmg_version = env!("CARGO_PKG_VERSION").to_string();
    }

    pub fn find(&self, id: &ResourceId) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == id.resource_type && r.name == id.name)
    }

    /// Remote key recorded for a resource
    pub fn identifier(&self, id: &ResourceId) -> Option<&str> {
        self.find(id).and_then(|r| r.identifier.as_deref())
    }

    /// Record the state read back from the device. States that no longer
    /// exist are removed.
    pub fn record(&mut self, state: &State, provider: &str) {
        if !state.exists {
            self.remove(&state.id);
            return;
        }
        let entry = ResourceState::from_state(state, provider);
        match self
            .resources
            .iter_mut()
            .find(|r| r.resource_type == entry.resource_type && r.name == entry.name)
        {
            Some(existing) => *existing = entry,
            None => self.resources.push(entry),
        }
    }

    pub fn remove(&mut self, id: &ResourceId) -> Option<ResourceState> {
        let pos = self
            .resources
            .iter()
            .position(|r| r.resource_type == id.resource_type && r.name == id.name)?;
        Some(self.resources.remove(pos))
    }

    /// Every tracked resource as a core State
    pub fn states(&self) -> Vec<State> {
        self.resources.iter().map(ResourceState::to_state).collect()
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type (e.g., "firewall_policy", "firewall_policy_move")
    pub resource_type: String,
    /// Local name from the configuration file
    pub name: String,
    /// Provider name (e.g., "fortimanager")
    pub provider: String,
    /// Remote key (mkey value, or the source id of a move)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// All attributes of the resource as JSON values
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            provider: provider.into(),
            identifier: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn from_state(state: &State, provider: &str) -> Self {
        Self {
            resource_type: state.id.resource_type.clone(),
            name: state.id.name.clone(),
            provider: provider.to_string(),
            identifier: state.identifier.clone(),
            attributes: state
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        }
    }

    pub fn id(&self) -> ResourceId {
        ResourceId::new(&self.resource_type, &self.name)
    }

    pub fn to_state(&self) -> State {
        let attributes = self
            .attributes
            .iter()
            .filter_map(|(k, v)| match json_to_value(v) {
                Ok(value) => value.map(|v| (k.clone(), v)),
                Err(e) => {
                    log::warn!("{}: dropping recorded attribute '{}': {}", self.id(), k, e);
                    None
                }
            })
            .collect();
        let mut state = State::existing(self.id(), attributes);
        state.identifier = self.identifier.clone();
        state
    }

    /// Reconciliation message of a move resource, if any
    pub fn state_pos(&self) -> Option<&str> {
        self.attributes
            .get("state_pos")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}
