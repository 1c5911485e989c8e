//! FMG Core
//!
//! Core library for managing FortiManager device configuration objects:
//! value model, schema descriptors, the generic field mapper, diff/plan
//! machinery and the relative position reconciler used by move resources.

pub mod differ;
pub mod effect;
pub mod interpreter;
pub mod mapper;
pub mod plan;
pub mod provider;
pub mod reorder;
pub mod resource;
pub mod schema;
