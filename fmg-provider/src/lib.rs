//! FortiManager backend for fmg
//!
//! Every object type is a descriptor in [`schemas`]; [`FmgProvider`] turns
//! the descriptor plus a declared resource into JSON-RPC calls made through
//! [`FmgClient`]. Move resources reorder firewall policies instead of
//! creating objects.

pub mod client;
pub mod config;
pub mod provider;
pub mod resources;
pub mod schemas;
pub mod scope;
pub mod utils;

pub use client::{ClientError, FmgClient};
pub use config::ProviderConfig;
pub use provider::FmgProvider;

use fmg_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use fmg_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

impl Provider for FmgProvider {
    fn name(&self) -> &'static str {
        "fortimanager"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types()
    }

    fn read(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&resource, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let to = to.clone();
        Box::pin(async move { self.update_resource(id, &identifier, to).await })
    }

    fn delete(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
    ) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        Box::pin(async move { self.delete_resource(&id, &identifier, &from).await })
    }
}
