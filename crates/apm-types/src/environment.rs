use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// Gateway environment type an API is deployed to, with its clusters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentEnvironments {
    #[serde(rename = "type")]
    pub environment_type: String,
    #[serde(default)]
    pub cluster_names: Vec<String>,
}

impl DeploymentEnvironments {
    pub fn new(environment_type: impl Into<String>, cluster_names: Vec<String>) -> Self {
        Self {
            environment_type: environment_type.into(),
            cluster_names,
        }
    }
}

impl Entity for DeploymentEnvironments {
    const KIND: EntityKind = EntityKind::DeploymentEnvironments;
}
