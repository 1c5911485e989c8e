//! Persisted record of managed FortiManager objects
//!
//! After every apply the state file holds, per declared resource, the mkey
//! the device assigned and the attributes last read back (including the
//! `state_pos` message of move resources). Plans diff against it, and
//! resources it tracks that are no longer declared get deleted.
//!
//! A [`LockInfo`] guards the file while a command mutates it.
//!
//! # Usage
//!
//! ```ignore
//! use fmg_state::{create_backend, BackendConfig};
//!
//! let backend = create_backend(&BackendConfig::local("fmg.state.json")).await?;
//! let lock = backend.acquire_lock("apply").await?;
//! let mut state = backend.read_state().await?.unwrap_or_default();
//! // ... apply changes ...
//! state.increment_serial();
//! backend.write_state(&state).await?;
//! backend.release_lock(&lock).await?;
//! ```

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

pub use backend::{BackendConfig, BackendError, BackendResult, StateBackend};
pub use backends::create_backend;
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
