use std::any::{Any, TypeId};
use std::collections::HashMap;

use apm_types::{
    CorsConfiguration, DeploymentEnvironments, DevPortalApi, Entity, EntityKind, PublisherApi,
    StoredDevPortalApi, StoredPublisherApi,
};
use bson::{Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::{DefaultCodecs, EntityCodec};
use crate::descriptor::{EntityDescriptor, ENTITY_DESCRIPTORS};
use crate::error::{CodecError, CodecResult};

/// How the registry will handle a given type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A registered entity codec, described by its descriptor.
    Custom(&'a EntityDescriptor),
    /// The default serde/BSON mapping.
    Default,
}

struct RegisteredCodec {
    type_id: TypeId,
    descriptor: EntityDescriptor,
    codec: Box<dyn Any + Send + Sync>,
}

/// Accumulates entity codecs and validates each one as it is added.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<RegisteredCodec>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `descriptor`.
    ///
    /// Fails if the descriptor is malformed, describes a different kind
    /// than `T`, or if `T` or its kind is already registered.
    pub fn register<T: Entity>(&mut self, descriptor: EntityDescriptor) -> CodecResult<&mut Self> {
        descriptor.validate()?;
        if descriptor.kind != T::KIND {
            return Err(CodecError::DescriptorMismatch {
                descriptor: descriptor.type_name().to_string(),
                actual: T::KIND.type_name().to_string(),
            });
        }
        let type_id = TypeId::of::<T>();
        if self
            .entries
            .iter()
            .any(|e| e.type_id == type_id || e.descriptor.kind == descriptor.kind)
        {
            return Err(CodecError::DuplicateRegistration(
                descriptor.type_name().to_string(),
            ));
        }
        self.entries.push(RegisteredCodec {
            type_id,
            descriptor,
            codec: Box::new(EntityCodec::<T>::new(descriptor)),
        });
        Ok(self)
    }

    /// Register the Rust type that implements `descriptor.kind`.
    pub fn register_descriptor(&mut self, descriptor: EntityDescriptor) -> CodecResult<&mut Self> {
        match descriptor.kind {
            EntityKind::PublisherApi => self.register::<PublisherApi>(descriptor),
            EntityKind::DeploymentEnvironments => {
                self.register::<DeploymentEnvironments>(descriptor)
            }
            EntityKind::CorsConfiguration => self.register::<CorsConfiguration>(descriptor),
            EntityKind::StoredPublisherApi => self.register::<StoredPublisherApi>(descriptor),
            EntityKind::StoredDevPortalApi => self.register::<StoredDevPortalApi>(descriptor),
            EntityKind::DevPortalApi => self.register::<DevPortalApi>(descriptor),
        }
    }

    /// Freeze the registered codecs in front of the default codecs.
    pub fn build(self) -> TypeRegistry {
        let index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.type_id, i))
            .collect();
        TypeRegistry {
            entries: self.entries,
            index,
            defaults: DefaultCodecs,
        }
    }
}

/// Immutable type-mapping registry.
///
/// Registered entity codecs always win; anything else falls through to
/// [`DefaultCodecs`]. Entries keep their registration order for
/// inspection, but lookup is by type and does not depend on that order.
pub struct TypeRegistry {
    entries: Vec<RegisteredCodec>,
    index: HashMap<TypeId, usize>,
    defaults: DefaultCodecs,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn entry<T: 'static>(&self) -> Option<&RegisteredCodec> {
        self.index
            .get(&TypeId::of::<T>())
            .map(|&i| &self.entries[i])
    }

    /// The entity codec registered for `T`, if any.
    pub fn codec<T: 'static>(&self) -> Option<&EntityCodec<T>> {
        self.entry::<T>()
            .and_then(|e| e.codec.downcast_ref::<EntityCodec<T>>())
    }

    pub fn resolve<T: 'static>(&self) -> Resolution<'_> {
        match self.entry::<T>() {
            Some(e) => Resolution::Custom(&e.descriptor),
            None => Resolution::Default,
        }
    }

    /// Descriptor registered for `kind`, if any.
    pub fn descriptor(&self, kind: EntityKind) -> Option<&EntityDescriptor> {
        self.entries
            .iter()
            .map(|e| &e.descriptor)
            .find(|d| d.kind == kind)
    }

    /// Registered descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn defaults(&self) -> &DefaultCodecs {
        &self.defaults
    }

    pub fn encode<T: Serialize + 'static>(&self, value: &T) -> CodecResult<Bson> {
        match self.codec::<T>() {
            Some(codec) => codec.encode(value).map(Bson::Document),
            None => self.defaults.encode(value),
        }
    }

    pub fn decode<T: DeserializeOwned + 'static>(&self, value: Bson) -> CodecResult<T> {
        match self.codec::<T>() {
            Some(codec) => codec.decode_value(value),
            None => self.defaults.decode(value),
        }
    }

    pub fn encode_document<T: Serialize + 'static>(&self, value: &T) -> CodecResult<Document> {
        match self.codec::<T>() {
            Some(codec) => codec.encode(value),
            None => self.defaults.encode_document(value),
        }
    }

    pub fn decode_document<T: DeserializeOwned + 'static>(&self, doc: Document) -> CodecResult<T> {
        match self.codec::<T>() {
            Some(codec) => codec.decode(doc),
            None => self.defaults.decode_document(doc),
        }
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.descriptors().map(|d| d.type_name()).collect();
        f.debug_struct("TypeRegistry")
            .field("entities", &names)
            .finish()
    }
}

/// Build the registry for every entity in [`ENTITY_DESCRIPTORS`].
pub fn build_registry() -> CodecResult<TypeRegistry> {
    let mut builder = RegistryBuilder::new();
    for descriptor in ENTITY_DESCRIPTORS {
        builder.register_descriptor(descriptor)?;
    }
    let registry = builder.build();
    debug!(entities = registry.len(), "type registry built");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DISCRIMINATOR_KEY;
    use crate::descriptor::descriptor_for;
    use proptest::prelude::*;

    fn sample_publisher() -> PublisherApi {
        PublisherApi {
            name: "PizzaShack".into(),
            context: "/pizzashack".into(),
            version: "1.0.0".into(),
            provider_name: "admin".into(),
            status: "CREATED".into(),
            visibility: "PUBLIC".into(),
            cors_configuration: Some(CorsConfiguration::Restricted {
                allow_origins: vec!["https://portal.example.com".into()],
                allow_headers: vec!["authorization".into()],
                allow_methods: vec!["GET".into()],
                allow_credentials: true,
            }),
            deployment_environments: vec![DeploymentEnvironments::new(
                "production",
                vec!["default".into()],
            )],
            ..Default::default()
        }
    }

    fn sample_devportal() -> DevPortalApi {
        DevPortalApi {
            name: "PizzaShack".into(),
            context: "/pizzashack".into(),
            version: "1.0.0".into(),
            provider_name: "admin".into(),
            status: "PUBLISHED".into(),
            ..Default::default()
        }
    }

    #[test]
    fn all_six_entities_resolve_to_custom_codecs() {
        let registry = build_registry().unwrap();
        assert_eq!(registry.len(), 6);
        assert!(matches!(registry.resolve::<PublisherApi>(), Resolution::Custom(_)));
        assert!(matches!(registry.resolve::<DeploymentEnvironments>(), Resolution::Custom(_)));
        assert!(matches!(registry.resolve::<CorsConfiguration>(), Resolution::Custom(_)));
        assert!(matches!(registry.resolve::<StoredPublisherApi>(), Resolution::Custom(_)));
        assert!(matches!(registry.resolve::<StoredDevPortalApi>(), Resolution::Custom(_)));
        assert!(matches!(registry.resolve::<DevPortalApi>(), Resolution::Custom(_)));
    }

    #[test]
    fn other_types_fall_back_to_defaults() {
        let registry = build_registry().unwrap();
        assert_eq!(registry.resolve::<String>(), Resolution::Default);
        assert_eq!(registry.resolve::<i64>(), Resolution::Default);
        assert_eq!(registry.encode(&"x".to_string()).unwrap(), Bson::String("x".into()));
    }

    #[test]
    fn registration_order_preserved() {
        let registry = build_registry().unwrap();
        let kinds: Vec<EntityKind> = registry.descriptors().map(|d| d.kind).collect();
        let expected: Vec<EntityKind> = ENTITY_DESCRIPTORS.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn polymorphic_round_trip_through_registry() {
        let registry = build_registry().unwrap();
        let cors = CorsConfiguration::AllowAll {
            allow_credentials: true,
        };
        let encoded = registry.encode(&cors).unwrap();
        let doc = encoded.as_document().unwrap();
        assert_eq!(doc.get_str(DISCRIMINATOR_KEY).unwrap(), "AllowAll");
        let decoded: CorsConfiguration = registry.decode(encoded).unwrap();
        assert_eq!(decoded, cors);
    }

    #[test]
    fn monomorphic_documents_untagged() {
        let registry = build_registry().unwrap();
        let publisher = registry.encode_document(&sample_publisher()).unwrap();
        assert!(!publisher.contains_key(DISCRIMINATOR_KEY));
        let stored = registry
            .encode_document(&StoredPublisherApi::from_api(sample_publisher(), "carbon.super"))
            .unwrap();
        assert!(!stored.contains_key(DISCRIMINATOR_KEY));
        let devportal = registry.encode_document(&sample_devportal()).unwrap();
        assert!(!devportal.contains_key(DISCRIMINATOR_KEY));
        let stored_dev = registry
            .encode_document(&StoredDevPortalApi::from_api(sample_devportal(), "carbon.super"))
            .unwrap();
        assert!(!stored_dev.contains_key(DISCRIMINATOR_KEY));
    }

    #[test]
    fn nested_cors_keeps_its_variant() {
        let registry = build_registry().unwrap();
        let doc = registry.encode_document(&sample_publisher()).unwrap();
        let cors = doc.get_document("corsConfiguration").unwrap();
        assert_eq!(cors.get_str(DISCRIMINATOR_KEY).unwrap(), "Restricted");
        let back: PublisherApi = registry.decode_document(doc).unwrap();
        assert_eq!(back, sample_publisher());
    }

    #[test]
    fn stored_publisher_round_trip_with_object_id() {
        let registry = build_registry().unwrap();
        let mut stored = StoredPublisherApi::from_api(sample_publisher(), "carbon.super");
        stored.document_id = Some(bson::oid::ObjectId::new());
        let doc = registry.encode_document(&stored).unwrap();
        assert!(matches!(doc.get("_id"), Some(Bson::ObjectId(_))));
        let back: StoredPublisherApi = registry.decode_document(doc).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut builder = RegistryBuilder::new();
        let d = *descriptor_for(EntityKind::PublisherApi).unwrap();
        builder.register::<PublisherApi>(d).unwrap();
        let err = builder.register::<PublisherApi>(d).err().unwrap();
        assert!(matches!(err, CodecError::DuplicateRegistration(_)));
    }

    #[test]
    fn mismatched_descriptor_rejected() {
        let mut builder = RegistryBuilder::new();
        let d = *descriptor_for(EntityKind::DevPortalApi).unwrap();
        let err = builder.register::<PublisherApi>(d).err().unwrap();
        assert!(matches!(err, CodecError::DescriptorMismatch { .. }));
    }

    #[test]
    fn malformed_descriptor_fails_at_build() {
        let mut builder = RegistryBuilder::new();
        let d = EntityDescriptor::polymorphic(EntityKind::CorsConfiguration, &[]);
        assert!(builder.register_descriptor(d).is_err());
        assert!(builder.build().is_empty());
    }

    #[test]
    fn debug_lists_entities() {
        let registry = build_registry().unwrap();
        let rendered = format!("{registry:?}");
        assert!(rendered.contains("CORSConfiguration"));
    }

    proptest! {
        #[test]
        fn resolution_independent_of_registration_order(
            order in Just(ENTITY_DESCRIPTORS.to_vec()).prop_shuffle()
        ) {
            let mut builder = RegistryBuilder::new();
            for d in &order {
                builder.register_descriptor(*d).unwrap();
            }
            let shuffled = builder.build();
            let canonical = build_registry().unwrap();

            for kind in EntityKind::ALL {
                prop_assert_eq!(shuffled.descriptor(kind), canonical.descriptor(kind));
            }
            prop_assert_eq!(
                shuffled.encode_document(&sample_publisher()).unwrap(),
                canonical.encode_document(&sample_publisher()).unwrap()
            );
            let cors = CorsConfiguration::Disabled;
            prop_assert_eq!(
                shuffled.encode(&cors).unwrap(),
                canonical.encode(&cors).unwrap()
            );
        }
    }
}
