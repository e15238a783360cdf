use apm_types::{CorsConfiguration, EntityKind};

use crate::error::{CodecError, CodecResult};

/// Declarative description of how one entity kind is mapped to documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    /// Whether stored documents carry a `_t` discriminator naming the
    /// concrete variant.
    pub discriminator: bool,
    /// Discriminator values accepted on read. Empty unless `discriminator`.
    pub variants: &'static [&'static str],
}

impl EntityDescriptor {
    /// A structurally homogeneous entity: no discriminator.
    pub const fn monomorphic(kind: EntityKind) -> Self {
        Self {
            kind,
            discriminator: false,
            variants: &[],
        }
    }

    /// An entity whose concrete shape is recovered from `_t`.
    pub const fn polymorphic(kind: EntityKind, variants: &'static [&'static str]) -> Self {
        Self {
            kind,
            discriminator: true,
            variants,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn collection(&self) -> &'static str {
        self.kind.collection()
    }

    /// Whether `tag` names one of the declared variants.
    pub fn accepts(&self, tag: &str) -> bool {
        self.variants.contains(&tag)
    }

    /// Reject descriptors that could never round-trip.
    pub fn validate(&self) -> CodecResult<()> {
        let invalid = |reason: &str| CodecError::InvalidDescriptor {
            type_name: self.type_name().to_string(),
            reason: reason.to_string(),
        };
        if self.discriminator {
            if self.variants.is_empty() {
                return Err(invalid("discriminator enabled with no variants"));
            }
            if self.variants.iter().any(|v| v.is_empty()) {
                return Err(invalid("empty variant name"));
            }
            for (i, v) in self.variants.iter().enumerate() {
                if self.variants[..i].contains(v) {
                    return Err(invalid(&format!("duplicate variant {v:?}")));
                }
            }
        } else if !self.variants.is_empty() {
            return Err(invalid("variants declared without a discriminator"));
        }
        Ok(())
    }
}

/// The mapping table for every persisted entity. Only the CORS
/// configuration varies in shape.
pub const ENTITY_DESCRIPTORS: [EntityDescriptor; 6] = [
    EntityDescriptor::monomorphic(EntityKind::PublisherApi),
    EntityDescriptor::monomorphic(EntityKind::DeploymentEnvironments),
    EntityDescriptor::polymorphic(EntityKind::CorsConfiguration, CorsConfiguration::VARIANTS),
    EntityDescriptor::monomorphic(EntityKind::StoredPublisherApi),
    EntityDescriptor::monomorphic(EntityKind::StoredDevPortalApi),
    EntityDescriptor::monomorphic(EntityKind::DevPortalApi),
];

/// Look up the descriptor for `kind` in [`ENTITY_DESCRIPTORS`].
pub fn descriptor_for(kind: EntityKind) -> Option<&'static EntityDescriptor> {
    ENTITY_DESCRIPTORS.iter().find(|d| d.kind == kind)
}
