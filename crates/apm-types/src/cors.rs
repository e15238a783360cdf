use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};

/// Cross-origin resource sharing policy attached to an API.
///
/// Stored documents carry the variant name under `_t`, which is how the
/// concrete shape is recovered on read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_t")]
pub enum CorsConfiguration {
    /// CORS handling is turned off for the API.
    #[default]
    Disabled,
    /// Any origin, header, and method is accepted.
    AllowAll {
        #[serde(rename = "accessControlAllowCredentials")]
        allow_credentials: bool,
    },
    /// Only the listed origins, headers, and methods are accepted.
    Restricted {
        #[serde(rename = "accessControlAllowOrigins")]
        allow_origins: Vec<String>,
        #[serde(rename = "accessControlAllowHeaders")]
        allow_headers: Vec<String>,
        #[serde(rename = "accessControlAllowMethods")]
        allow_methods: Vec<String>,
        #[serde(rename = "accessControlAllowCredentials")]
        allow_credentials: bool,
    },
}

impl CorsConfiguration {
    /// Discriminator values for every variant.
    pub const VARIANTS: &'static [&'static str] = &["Disabled", "AllowAll", "Restricted"];

    /// The discriminator value written for this variant.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::AllowAll { .. } => "AllowAll",
            Self::Restricted { .. } => "Restricted",
        }
    }
}

impl Entity for CorsConfiguration {
    const KIND: EntityKind = EntityKind::CorsConfiguration;
}
