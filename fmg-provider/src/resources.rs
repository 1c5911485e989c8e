//! Resource type definitions for FortiManager
//!
//! This module defines:
//! - The two kinds of resources the provider handles (device objects and
//!   move requests)
//! - Lookup from a resource type name to its descriptor

use fmg_core::provider::ResourceType;
use fmg_core::schema::ResourceSchema;

use crate::schemas::generated::{self, FmgSchemaConfig};
use crate::schemas::moves::{self, FmgMoveConfig};

/// Descriptor of a resource type
pub enum ResourceKind {
    /// A configuration object with its own key (address, policy, route)
    Object(FmgSchemaConfig),
    /// A relative placement of an entry inside an ordered collection
    Move(FmgMoveConfig),
}

impl ResourceKind {
    pub fn schema(&self) -> &ResourceSchema {
        match self {
            ResourceKind::Object(config) => &config.schema,
            ResourceKind::Move(config) => &config.schema,
        }
    }
}

/// Find the descriptor for a resource type name
pub fn find(resource_type: &str) -> Option<ResourceKind> {
    if let Some(config) = generated::configs()
        .into_iter()
        .find(|c| c.resource_type() == resource_type)
    {
        return Some(ResourceKind::Object(config));
    }
    moves::configs()
        .into_iter()
        .find(|c| c.resource_type() == resource_type)
        .map(ResourceKind::Move)
}

/// Schema of a resource type, if the provider knows it
pub fn schema_for(resource_type: &str) -> Option<ResourceSchema> {
    find(resource_type).map(|kind| kind.schema().clone())
}

/// Resource type backed by a descriptor schema
pub struct FmgResourceType {
    schema: ResourceSchema,
}

impl ResourceType for FmgResourceType {
    fn name(&self) -> &str {
        &self.schema.resource_type
    }

    fn schema(&self) -> ResourceSchema {
        self.schema.clone()
    }
}

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    crate::schemas::all_schemas()
        .into_iter()
        .map(|schema| Box::new(FmgResourceType { schema }) as Box<dyn ResourceType>)
        .collect()
}
