//! MongoDB driver, enabled with the `mongodb` feature.

use std::sync::Arc;

use apm_codec::TypeRegistry;
use apm_types::Entity;
use bson::Document;
use mongodb::sync::{Client, Collection, Database};
use tracing::debug;

use crate::driver::{validate_target, ClientSettings, StoreDriver};
use crate::error::{StoreError, StoreResult};
use crate::target::ConnectionTarget;

#[derive(Clone, Copy, Debug, Default)]
pub struct MongoDriver;

impl StoreDriver for MongoDriver {
    type Client = MongoClient;

    fn name(&self) -> &'static str {
        "mongodb"
    }

    fn connect(&self, settings: ClientSettings) -> StoreResult<MongoClient> {
        validate_target(&settings.target)?;
        debug!(target = %settings.target, "creating mongodb client");
        let inner = Client::with_uri_str(settings.target.as_str()).map_err(|e| {
            StoreError::Connect {
                driver: self.name(),
                reason: e.to_string(),
            }
        })?;
        Ok(MongoClient {
            inner,
            target: settings.target,
            registry: settings.registry,
        })
    }
}

/// A MongoDB client paired with the registry its documents are encoded with.
///
/// Collections are opened on raw documents; callers encode and decode
/// through [`MongoClient::encode`] and [`MongoClient::decode`] so every
/// entity passes through its registered codec.
#[derive(Clone, Debug)]
pub struct MongoClient {
    inner: Client,
    target: ConnectionTarget,
    registry: Arc<TypeRegistry>,
}

impl MongoClient {
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Database named in the connection string.
    pub fn default_database(&self) -> StoreResult<Database> {
        self.inner
            .default_database()
            .ok_or_else(|| StoreError::NoDefaultDatabase(self.target.redacted()))
    }

    /// The collection holding documents of `T`.
    pub fn collection<T: Entity>(&self) -> StoreResult<Collection<Document>> {
        Ok(self
            .default_database()?
            .collection::<Document>(T::KIND.collection()))
    }

    pub fn encode<T: Entity>(&self, entity: &T) -> StoreResult<Document> {
        Ok(self.registry.encode_document(entity)?)
    }

    pub fn decode<T: Entity>(&self, doc: Document) -> StoreResult<T> {
        Ok(self.registry.decode_document(doc)?)
    }
}
