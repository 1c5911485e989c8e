//! Configuration file
//!
//! ```json
//! {
//!   "provider": { "hostname": "fmg.example.net", "token": "..." },
//!   "backend": { "type": "local", "path": "fmg.state.json" },
//!   "resources": [
//!     { "type": "firewall_address", "name": "web", "attributes": { ... } }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use fmg_core::mapper::json_to_value;
use fmg_core::resource::{Resource, ResourceId};
use fmg_provider::ProviderConfig;
use fmg_state::BackendConfig;
use fmg_state::backends::LocalBackend;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfiguration {
    #[serde(default)]
    provider: ProviderConfig,
    #[serde(default)]
    backend: Option<serde_json::Value>,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawResource {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

/// A parsed configuration file
#[derive(Debug)]
pub struct Configuration {
    pub provider: ProviderConfig,
    pub backend: BackendConfig,
    /// Declared resources in file order
    pub resources: Vec<Resource>,
}

pub fn load_config(file: &Path) -> Result<Configuration, String> {
    let content = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    parse_config(&content).map_err(|e| format!("{}: {}", file.display(), e))
}

pub fn parse_config(content: &str) -> Result<Configuration, String> {
    let raw: RawConfiguration =
        serde_json::from_str(content).map_err(|e| format!("Parse error: {}", e))?;

    let backend = match &raw.backend {
        Some(value) => BackendConfig::from_json(value).map_err(|e| e.to_string())?,
        None => BackendConfig::local(LocalBackend::DEFAULT_STATE_FILE),
    };

    let mut seen = HashSet::new();
    let mut resources = Vec::with_capacity(raw.resources.len());
    for entry in raw.resources {
        let id = ResourceId::new(&entry.resource_type, &entry.name);
        if !seen.insert(id.clone()) {
            return Err(format!("Duplicate resource {}", id));
        }

        let mut resource = Resource::new(entry.resource_type, entry.name);
        // null means "leave unset"
        for (key, value) in &entry.attributes {
            let value = json_to_value(value)
                .map_err(|e| format!("{}: attribute '{}': {}", id, key, e))?;
            if let Some(value) = value {
                resource.attributes.insert(key.clone(), value);
            }
        }
        resources.push(resource);
    }

    Ok(Configuration {
        provider: raw.provider,
        backend,
        resources,
    })
}
