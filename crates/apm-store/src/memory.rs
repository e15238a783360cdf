use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use apm_codec::TypeRegistry;
use apm_types::{Entity, EntityKind};
use bson::Document;
use tracing::debug;

use crate::driver::{validate_target, ClientSettings, StoreDriver};
use crate::error::{StoreError, StoreResult};
use crate::target::ConnectionTarget;

/// Driver that keeps documents in process memory.
///
/// Intended for tests and embedding. Targets are validated like a real
/// connection string but nothing is dialed.
#[derive(Clone, Copy, Debug, Default)]
pub struct InMemoryDriver;

impl StoreDriver for InMemoryDriver {
    type Client = InMemoryClient;

    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn connect(&self, settings: ClientSettings) -> StoreResult<InMemoryClient> {
        validate_target(&settings.target)?;
        debug!(target = %settings.target, "opening in-memory document store");
        Ok(InMemoryClient::new(settings))
    }
}

/// In-memory client: one vector of encoded documents per collection.
///
/// Every write goes through the type registry, so stored documents look
/// exactly as they would in the real store.
pub struct InMemoryClient {
    target: ConnectionTarget,
    registry: Arc<TypeRegistry>,
    collections: RwLock<HashMap<&'static str, Vec<Document>>>,
}

impl InMemoryClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            target: settings.target,
            registry: settings.registry,
            collections: RwLock::new(HashMap::new()),
        }
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Encode `entity` and append it to its collection.
    pub fn insert<T: Entity>(&self, entity: &T) -> StoreResult<()> {
        let doc = self.registry.encode_document(entity)?;
        self.collections
            .write()
            .map_err(|_| StoreError::Poisoned("collection"))?
            .entry(T::KIND.collection())
            .or_default()
            .push(doc);
        Ok(())
    }

    /// Decode every document in `T`'s collection.
    pub fn find_all<T: Entity>(&self) -> StoreResult<Vec<T>> {
        self.raw_documents(T::KIND)?
            .into_iter()
            .map(|doc| self.registry.decode_document(doc).map_err(StoreError::from))
            .collect()
    }

    /// The stored documents of `kind`, as written.
    pub fn raw_documents(&self, kind: EntityKind) -> StoreResult<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Poisoned("collection"))?;
        Ok(collections
            .get(kind.collection())
            .cloned()
            .unwrap_or_default())
    }

    pub fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Poisoned("collection"))?;
        Ok(collections.get(kind.collection()).map_or(0, Vec::len))
    }
}

impl std::fmt::Debug for InMemoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryClient")
            .field("target", &self.target)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apm_codec::{build_registry, DISCRIMINATOR_KEY};
    use apm_types::{CorsConfiguration, DeploymentEnvironments};

    fn client() -> InMemoryClient {
        let settings = ClientSettings::new(
            ConnectionTarget::new("mongodb://localhost:27017/apim"),
            Arc::new(build_registry().unwrap()),
        );
        InMemoryDriver.connect(settings).unwrap()
    }

    #[test]
    fn stores_encoded_documents() {
        let client = client();
        client
            .insert(&CorsConfiguration::AllowAll {
                allow_credentials: true,
            })
            .unwrap();
        client
            .insert(&DeploymentEnvironments::new("production", vec![]))
            .unwrap();

        let cors_docs = client.raw_documents(EntityKind::CorsConfiguration).unwrap();
        assert_eq!(cors_docs[0].get_str(DISCRIMINATOR_KEY).unwrap(), "AllowAll");
        let env_docs = client.raw_documents(EntityKind::DeploymentEnvironments).unwrap();
        assert!(!env_docs[0].contains_key(DISCRIMINATOR_KEY));
    }

    #[test]
    fn find_all_recovers_variants() {
        let client = client();
        let stored = vec![
            CorsConfiguration::Disabled,
            CorsConfiguration::Restricted {
                allow_origins: vec!["*".into()],
                allow_headers: vec![],
                allow_methods: vec!["GET".into()],
                allow_credentials: false,
            },
        ];
        for cors in &stored {
            client.insert(cors).unwrap();
        }
        assert_eq!(client.find_all::<CorsConfiguration>().unwrap(), stored);
        assert_eq!(client.count(EntityKind::CorsConfiguration).unwrap(), 2);
        assert_eq!(client.count(EntityKind::PublisherApi).unwrap(), 0);
    }
}
