use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::cors::CorsConfiguration;
use crate::entity::{Entity, EntityKind};
use crate::environment::DeploymentEnvironments;

// ---------------------------------------------------------------------------
// Publisher view
// ---------------------------------------------------------------------------

/// An API as seen by the publisher portal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub context: String,
    pub version: String,
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle status, e.g. `CREATED` or `PUBLISHED`.
    pub status: String,
    pub visibility: String,
    #[serde(default)]
    pub transports: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_configuration: Option<CorsConfiguration>,
    #[serde(default)]
    pub deployment_environments: Vec<DeploymentEnvironments>,
}

impl Entity for PublisherApi {
    const KIND: EntityKind = EntityKind::PublisherApi;
}

/// Publisher view as stored, keyed by `_id` and scoped to an organization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPublisherApi {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<ObjectId>,
    pub organization: String,
    pub name: String,
    pub context: String,
    pub version: String,
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub visibility: String,
    #[serde(default)]
    pub transports: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_configuration: Option<CorsConfiguration>,
    #[serde(default)]
    pub deployment_environments: Vec<DeploymentEnvironments>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger_definition: Option<String>,
}

impl StoredPublisherApi {
    /// Wrap a publisher view for storage under `organization`.
    pub fn from_api(api: PublisherApi, organization: impl Into<String>) -> Self {
        Self {
            document_id: None,
            organization: organization.into(),
            name: api.name,
            context: api.context,
            version: api.version,
            provider_name: api.provider_name,
            description: api.description,
            status: api.status,
            visibility: api.visibility,
            transports: api.transports,
            tags: api.tags,
            cors_configuration: api.cors_configuration,
            deployment_environments: api.deployment_environments,
            swagger_definition: None,
        }
    }
}

impl Entity for StoredPublisherApi {
    const KIND: EntityKind = EntityKind::StoredPublisherApi;
}

// ---------------------------------------------------------------------------
// Developer portal view
// ---------------------------------------------------------------------------

/// An API as seen by the developer portal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevPortalApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub context: String,
    pub version: String,
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_owner: Option<String>,
    #[serde(default)]
    pub deployment_environments: Vec<DeploymentEnvironments>,
}

impl Entity for DevPortalApi {
    const KIND: EntityKind = EntityKind::DevPortalApi;
}

/// Developer portal view as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDevPortalApi {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<ObjectId>,
    pub organization: String,
    pub name: String,
    pub context: String,
    pub version: String,
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_owner: Option<String>,
    #[serde(default)]
    pub deployment_environments: Vec<DeploymentEnvironments>,
}

impl StoredDevPortalApi {
    pub fn from_api(api: DevPortalApi, organization: impl Into<String>) -> Self {
        Self {
            document_id: None,
            organization: organization.into(),
            name: api.name,
            context: api.context,
            version: api.version,
            provider_name: api.provider_name,
            description: api.description,
            status: api.status,
            tags: api.tags,
            business_owner: api.business_owner,
            deployment_environments: api.deployment_environments,
        }
    }
}

impl Entity for StoredDevPortalApi {
    const KIND: EntityKind = EntityKind::StoredDevPortalApi;
}
