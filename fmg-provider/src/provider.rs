//! FortiManager provider implementation
//!
//! One generic engine drives every resource type. Device objects go through
//! `add` / `get` / `update` / `delete` on URLs built from their descriptor;
//! move resources issue a `move` and reconcile the live order on read.

use std::collections::HashMap;

use fmg_core::mapper;
use fmg_core::provider::{ProviderError, ProviderResult};
use fmg_core::reorder::{self, MoveRequest, Placement};
use fmg_core::resource::{Resource, ResourceId, State, Value};
use serde_json::Value as Json;

use crate::client::{ClientError, FmgClient};
use crate::config::ProviderConfig;
use crate::resources::{self, ResourceKind};
use crate::schemas::generated::FmgSchemaConfig;
use crate::schemas::moves::{FmgMoveConfig, OPTION_ATTRIBUTE, STATE_POS_ATTRIBUTE, TARGET_ATTRIBUTE};
use crate::scope::{object_url, render_path, scope_attributes};
use crate::utils::key_from_response;

/// Wrap a lower-level error with the resource it happened on
fn failure(
    id: &ResourceId,
    action: &str,
    err: impl std::error::Error + Send + Sync + 'static,
) -> ProviderError {
    ProviderError::new(format!("Failed to {}: {}", action, err))
        .for_resource(id.clone())
        .with_cause(err)
}

fn lookup(id: &ResourceId) -> ProviderResult<ResourceKind> {
    resources::find(&id.resource_type).ok_or_else(|| {
        ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
            .for_resource(id.clone())
    })
}

fn required_scalar(
    id: &ResourceId,
    attributes: &HashMap<String, Value>,
    name: &str,
) -> ProviderResult<String> {
    attributes
        .get(name)
        .and_then(Value::to_scalar_string)
        .ok_or_else(|| {
            ProviderError::new(format!("Missing required attribute '{}'", name))
                .for_resource(id.clone())
        })
}

/// FortiManager provider
pub struct FmgProvider {
    client: FmgClient,
}

impl FmgProvider {
    /// Create a provider talking to the FortiManager described by `config`
    pub fn new(config: &ProviderConfig) -> Result<Self, ClientError> {
        Ok(Self::with_client(FmgClient::new(config)?))
    }

    pub fn with_client(client: FmgClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FmgClient {
        &self.client
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Read a resource. `resource` supplies the scope attributes.
    pub async fn read_resource(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        match lookup(&resource.id)? {
            ResourceKind::Object(config) => self.read_object(&config, resource, identifier).await,
            ResourceKind::Move(config) => match identifier {
                Some(_) => self.read_move(&config, resource).await,
                None => Ok(State::not_found(resource.id.clone())),
            },
        }
    }

    pub async fn create_resource(&self, resource: Resource) -> ProviderResult<State> {
        match lookup(&resource.id)? {
            ResourceKind::Object(config) => self.create_object(&config, &resource).await,
            ResourceKind::Move(config) => self.apply_move(&config, &resource).await,
        }
    }

    pub async fn update_resource(
        &self,
        id: ResourceId,
        identifier: &str,
        to: Resource,
    ) -> ProviderResult<State> {
        match lookup(&id)? {
            ResourceKind::Object(config) => self.update_object(&config, identifier, &to).await,
            ResourceKind::Move(config) => self.apply_move(&config, &to).await,
        }
    }

    pub async fn delete_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
    ) -> ProviderResult<()> {
        match lookup(id)? {
            ResourceKind::Object(config) => {
                self.delete_object(&config, id, identifier, from).await
            }
            ResourceKind::Move(_) => {
                log::info!("{}: move request forgotten, device order left as is", id);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Device Objects
    // =========================================================================

    async fn read_object(
        &self,
        config: &FmgSchemaConfig,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let id = &resource.id;
        let identifier = match identifier {
            Some(identifier) => identifier.to_string(),
            None => match resource
                .get(&config.mkey_attribute())
                .and_then(Value::to_scalar_string)
            {
                Some(key) => key,
                None => return Ok(State::not_found(id.clone())),
            },
        };

        let collection = render_path(config.url, config.params, &resource.attributes)
            .map_err(|e| failure(id, "build URL", e))?;
        let url = object_url(&collection, &identifier);

        let data = match self
            .client
            .get(&url)
            .await
            .map_err(|e| failure(id, "read object", e))?
        {
            Some(data) => data,
            None => return Ok(State::not_found(id.clone())),
        };

        let payload = match data {
            Json::Object(obj) => obj,
            Json::Array(mut items) if items.len() == 1 => match items.remove(0) {
                Json::Object(obj) => obj,
                _ => return Err(unexpected_payload(id, &url)),
            },
            _ => return Err(unexpected_payload(id, &url)),
        };

        let mut attributes = mapper::flatten(&config.schema, &payload);
        attributes.extend(scope_attributes(config.params, &resource.attributes));

        Ok(State::existing(id.clone(), attributes).with_identifier(identifier))
    }

    async fn create_object(
        &self,
        config: &FmgSchemaConfig,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let id = &resource.id;
        let collection = render_path(config.url, config.params, &resource.attributes)
            .map_err(|e| failure(id, "build URL", e))?;
        let payload = Json::Object(mapper::expand(&config.schema, &resource.attributes));
        let declared_key = resource
            .get(&config.mkey_attribute())
            .and_then(Value::to_scalar_string);

        log::debug!("{}: add on {}", id, collection);
        let data = match self.client.add(&collection, payload.clone()).await {
            Ok(data) => data,
            // Take over an object that already carries the declared key
            Err(e) if e.is_already_exists() && declared_key.is_some() => {
                log::info!("{}: {} already exists, replacing it with set", id, collection);
                self.client
                    .set(&collection, payload)
                    .await
                    .map_err(|e| failure(id, "create object", e))?
            }
            Err(e) => return Err(failure(id, "create object", e)),
        };

        let identifier = declared_key
            .or_else(|| key_from_response(data.as_ref(), config.mkey))
            .ok_or_else(|| {
                ProviderError::new(format!(
                    "Device did not return the {} of the new object",
                    config.mkey
                ))
                .for_resource(id.clone())
            })?;

        self.read_object(config, resource, Some(&identifier)).await
    }

    async fn update_object(
        &self,
        config: &FmgSchemaConfig,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let id = &to.id;
        let collection = render_path(config.url, config.params, &to.attributes)
            .map_err(|e| failure(id, "build URL", e))?;
        let url = object_url(&collection, identifier);

        let mut payload = mapper::expand(&config.schema, &to.attributes);
        if config.server_assigned_key {
            // The key is addressed through the URL; sending it again is rejected
            payload.remove(config.mkey);
        }

        log::debug!("{}: update on {}", id, url);
        self.client
            .update(&url, Json::Object(payload))
            .await
            .map_err(|e| failure(id, "update object", e))?;

        self.read_object(config, to, Some(identifier)).await
    }

    async fn delete_object(
        &self,
        config: &FmgSchemaConfig,
        id: &ResourceId,
        identifier: &str,
        from: &State,
    ) -> ProviderResult<()> {
        let collection = render_path(config.url, config.params, &from.attributes)
            .map_err(|e| failure(id, "build URL", e))?;
        let url = object_url(&collection, identifier);

        log::debug!("{}: delete on {}", id, url);
        match self.client.delete(&url).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                log::warn!("{}: {} was already deleted", id, url);
                Ok(())
            }
            Err(e) => Err(failure(id, "delete object", e)),
        }
    }

    // =========================================================================
    // Move Resources
    // =========================================================================

    fn move_request(
        config: &FmgMoveConfig,
        resource: &Resource,
    ) -> ProviderResult<MoveRequest> {
        let id = &resource.id;
        let source = required_scalar(id, &resource.attributes, config.source_attribute)?;
        let target = required_scalar(id, &resource.attributes, TARGET_ATTRIBUTE)?;
        let placement: Placement = required_scalar(id, &resource.attributes, OPTION_ATTRIBUTE)?
            .parse()
            .map_err(|e| failure(id, "parse option", e))?;
        Ok(MoveRequest::new(source, target, placement))
    }

    /// Issue the move, then read back the resulting order
    async fn apply_move(&self, config: &FmgMoveConfig, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let request = Self::move_request(config, resource)?;
        let collection = render_path(config.url, config.params, &resource.attributes)
            .map_err(|e| failure(id, "build URL", e))?;
        let url = object_url(&collection, &request.source_id);

        log::debug!(
            "{}: move {} {} {}",
            id,
            url,
            request.placement,
            request.target_id
        );
        self.client
            .move_object(&url, request.placement.as_str(), &request.target_id)
            .await
            .map_err(|e| failure(id, "move entry", e))?;

        self.read_move(config, resource).await
    }

    /// Fetch the sibling list and record how it compares to the request
    async fn read_move(&self, config: &FmgMoveConfig, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let request = Self::move_request(config, resource)?;
        let collection = render_path(config.url, config.params, &resource.attributes)
            .map_err(|e| failure(id, "build URL", e))?;

        let items = self
            .client
            .list(&collection)
            .await
            .map_err(|e| failure(id, "read sibling list", e))?;

        let state_pos = reorder::state_pos(&items, config.id_field, &request)
            .map_err(|e| failure(id, "reconcile order", e))?;
        if !state_pos.is_empty() {
            log::warn!("{}: {}", id, state_pos);
        }

        let mut attributes = scope_attributes(config.params, &resource.attributes);
        for name in [config.source_attribute, TARGET_ATTRIBUTE, OPTION_ATTRIBUTE] {
            if let Some(value) = resource.get(name) {
                attributes.insert(name.to_string(), value.clone());
            }
        }
        attributes.insert(STATE_POS_ATTRIBUTE.to_string(), Value::String(state_pos));

        Ok(State::existing(id.clone(), attributes).with_identifier(request.source_id))
    }
}

fn unexpected_payload(id: &ResourceId, url: &str) -> ProviderError {
    ProviderError::new(format!("Unexpected response data for {}", url)).for_resource(id.clone())
}
