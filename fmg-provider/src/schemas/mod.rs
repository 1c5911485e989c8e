//! FortiManager resource schema definitions

pub mod generated;
pub mod moves;

use fmg_core::schema::ResourceSchema;

/// Returns every schema: generated objects followed by move resources
pub fn all_schemas() -> Vec<ResourceSchema> {
    let mut schemas = generated::schemas();
    schemas.extend(moves::configs().into_iter().map(|c| c.schema));
    schemas
}
