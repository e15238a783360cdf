use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The fixed set of entity kinds persisted in the document store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    PublisherApi,
    DeploymentEnvironments,
    CorsConfiguration,
    StoredPublisherApi,
    StoredDevPortalApi,
    DevPortalApi,
}

impl EntityKind {
    /// Every kind, in registration order.
    pub const ALL: [EntityKind; 6] = [
        Self::PublisherApi,
        Self::DeploymentEnvironments,
        Self::CorsConfiguration,
        Self::StoredPublisherApi,
        Self::StoredDevPortalApi,
        Self::DevPortalApi,
    ];

    /// Stable type name. Used as the discriminator value for
    /// non-enum entities and in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PublisherApi => "PublisherAPI",
            Self::DeploymentEnvironments => "DeploymentEnvironments",
            Self::CorsConfiguration => "CORSConfiguration",
            Self::StoredPublisherApi => "MongoDBPublisherAPI",
            Self::StoredDevPortalApi => "MongoDBDevPortalAPI",
            Self::DevPortalApi => "DevPortalAPI",
        }
    }

    /// Collection that documents of this kind live in.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::PublisherApi => "publisherApis",
            Self::DeploymentEnvironments => "deploymentEnvironments",
            Self::CorsConfiguration => "corsConfigurations",
            Self::StoredPublisherApi => "publisherApiDocuments",
            Self::StoredDevPortalApi => "devPortalApiDocuments",
            Self::DevPortalApi => "devPortalApis",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A type that can be stored as a document.
///
/// Implemented by exactly the six types in this crate. The codec registry
/// keys on the concrete type and checks `KIND` against the descriptor it is
/// registered with.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;
}
