//! Remote side of the engine
//!
//! Everything that talks to a FortiManager goes through [`Provider`]. The
//! engine never holds a client of its own: the provider value owns it and is
//! handed to the [`Interpreter`](crate::interpreter::Interpreter).

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceId, State};
use crate::schema::ResourceSchema;

type Cause = Box<dyn Error + Send + Sync>;

/// Failure reported by a provider call
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    /// Declared resource the failure belongs to, when known
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Cause>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        ProviderError {
            message: message.into(),
            resource_id: None,
            cause: None,
        }
    }

    /// Attach the resource this failure is about
    pub fn for_resource(self, id: ResourceId) -> Self {
        ProviderError {
            resource_id: Some(id),
            ..self
        }
    }

    pub fn with_cause(self, cause: impl Error + Send + Sync + 'static) -> Self {
        ProviderError {
            cause: Some(Box::new(cause)),
            ..self
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_id {
            Some(id) => write!(f, "[{}] {}", id, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let cause: &(dyn Error + 'static) = self.cause.as_deref()?;
        Some(cause)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Boxed future returned by provider calls
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One object kind the provider manages, such as `firewall_address`
pub trait ResourceType: Send + Sync {
    fn name(&self) -> &str;

    fn schema(&self) -> ResourceSchema;
}

pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Fetch the live object behind `resource`.
    ///
    /// The scope attributes (device, vdom, parent keys) come from `resource`.
    /// `identifier` is the mkey recorded at creation; when it is `None` the
    /// mkey attribute of `resource` is tried instead. A missing object is
    /// `Ok` with `exists == false`, never an error.
    fn read(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Add the object and return what the remote now holds, with the
    /// identifier set to its mkey.
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// `from` is the last recorded state; its attributes carry the scope.
    fn delete(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
    ) -> BoxFuture<'_, ProviderResult<()>>;
}

impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        self.as_ref().resource_types()
    }

    fn read(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        self.as_ref().read(resource, identifier)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        self.as_ref().create(resource)
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        self.as_ref().update(id, identifier, from, to)
    }

    fn delete(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
    ) -> BoxFuture<'_, ProviderResult<()>> {
        self.as_ref().delete(id, identifier, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Value;

    /// Echoes the desired attributes back and hands out mkey "42"
    struct EchoProvider;

    impl Provider for EchoProvider {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
            Vec::new()
        }

        fn read(
            &self,
            resource: &Resource,
            identifier: Option<&str>,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let state = match identifier {
                Some(mkey) => State::existing(resource.id.clone(), resource.attributes.clone())
                    .with_identifier(mkey),
                None => State::not_found(resource.id.clone()),
            };
            Box::pin(async move { Ok(state) })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let state = State::existing(resource.id.clone(), resource.attributes.clone())
                .with_identifier("42");
            Box::pin(async move { Ok(state) })
        }

        fn update(
            &self,
            id: &ResourceId,
            identifier: &str,
            _from: &State,
            to: &Resource,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let state = State::existing(id.clone(), to.attributes.clone()).with_identifier(identifier);
            Box::pin(async move { Ok(state) })
        }

        fn delete(
            &self,
            _id: &ResourceId,
            _identifier: &str,
            _from: &State,
        ) -> BoxFuture<'_, ProviderResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn read_without_identifier_is_not_found() {
        let address = Resource::new("firewall_address", "web");
        let state = EchoProvider.read(&address, None).await.unwrap();
        assert!(!state.exists);
        assert!(state.identifier.is_none());
    }

    #[tokio::test]
    async fn boxed_provider_dispatches() {
        let provider: Box<dyn Provider> = Box::new(EchoProvider);
        assert_eq!(provider.name(), "echo");

        let address = Resource::new("firewall_address", "web")
            .with_attribute("subnet", Value::String("10.0.0.0 255.0.0.0".into()));
        let state = provider.create(&address).await.unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("42"));
        assert_eq!(state.attributes, address.attributes);
    }

    #[test]
    fn error_display_prefixes_resource() {
        let err = ProviderError::new("object does not exist")
            .for_resource(ResourceId::new("firewall_policy", "allow_web"));
        assert_eq!(err.to_string(), "[firewall_policy.allow_web] object does not exist");
        assert_eq!(ProviderError::new("timeout").to_string(), "timeout");
    }

    #[test]
    fn error_exposes_cause() {
        let io = std::io::Error::other("connection reset");
        let err = ProviderError::new("Failed to read").with_cause(io);
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("connection reset"));
    }
}
