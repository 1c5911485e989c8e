//! Where the state file lives

use std::collections::HashMap;

use async_trait::async_trait;
use fmg_core::mapper::json_to_value;
use fmg_core::resource::Value;
use thiserror::Error;

use crate::lock::LockInfo;
use crate::state::StateFile;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("state file held by {who} for {operation} (lock {lock_id})")]
    Locked {
        lock_id: String,
        who: String,
        operation: String,
    },

    #[error("no lock with ID {0}")]
    LockNotFound(String),

    #[error("lock {actual} does not match the held lock {expected}")]
    LockMismatch { expected: String, actual: String },

    #[error("unknown backend type '{0}'")]
    UnsupportedBackend(String),

    #[error("invalid backend block: {0}")]
    Configuration(String),

    #[error("corrupt state file: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("state encoding: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    /// Refusal caused by `lock` being held
    pub fn locked(lock: &LockInfo) -> Self {
        BackendError::Locked {
            lock_id: lock.id.clone(),
            who: lock.who.clone(),
            operation: lock.operation.clone(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Storage for the state file and its lock
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// `None` when no state has been written yet
    async fn read_state(&self) -> BackendResult<Option<StateFile>>;

    async fn write_state(&self, state: &StateFile) -> BackendResult<()>;

    /// Fails while another unexpired lock is held
    async fn acquire_lock(&self, operation: &str) -> BackendResult<LockInfo>;

    async fn release_lock(&self, lock: &LockInfo) -> BackendResult<()>;

    /// Remove a lock by ID regardless of its holder
    async fn force_unlock(&self, lock_id: &str) -> BackendResult<()>;
}

/// The `backend` block of the configuration file
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Only "local" is built in
    pub backend_type: String,
    pub attributes: HashMap<String, Value>,
}

impl BackendConfig {
    pub fn local(path: impl Into<String>) -> Self {
        BackendConfig {
            backend_type: "local".to_string(),
            attributes: [("path".to_string(), Value::String(path.into()))]
                .into_iter()
                .collect(),
        }
    }

    /// Parse `{"type": "local", "path": "..."}`
    pub fn from_json(value: &serde_json::Value) -> BackendResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| BackendError::Configuration("backend must be an object".to_string()))?;
        let backend_type = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BackendError::Configuration("backend.type is required".to_string()))?
            .to_string();
        let mut attributes = HashMap::new();
        for (key, raw) in obj.iter().filter(|(k, _)| k.as_str() != "type") {
            let value = json_to_value(raw)
                .map_err(|e| BackendError::Configuration(format!("backend.{}: {}", key, e)))?;
            if let Some(value) = value {
                attributes.insert(key.clone(), value);
            }
        }
        Ok(BackendConfig {
            backend_type,
            attributes,
        })
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}
