use std::any::type_name;
use std::marker::PhantomData;

use bson::{Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::descriptor::EntityDescriptor;
use crate::error::{CodecError, CodecResult};

/// Document field holding the concrete variant of a polymorphic entity.
pub const DISCRIMINATOR_KEY: &str = "_t";

/// Reads the discriminator of `doc`, if any. Non-string tags are rendered
/// as their BSON text so they show up in errors.
pub fn discriminator_of(doc: &Document) -> Option<String> {
    doc.get(DISCRIMINATOR_KEY).map(|tag| match tag {
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    })
}

// ---------------------------------------------------------------------------
// EntityCodec
// ---------------------------------------------------------------------------

/// Codec for one registered entity type.
///
/// The descriptor's discriminator flag decides how `_t` is treated:
/// enabled, every document must carry a declared variant tag in both
/// directions; disabled, encoding must not produce one and a stray tag is
/// dropped on read.
pub struct EntityCodec<T> {
    descriptor: EntityDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityCodec<T> {
    pub fn new(descriptor: EntityDescriptor) -> Self {
        Self {
            descriptor,
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    fn check_tagged(&self, doc: &Document) -> CodecResult<()> {
        match discriminator_of(doc) {
            None => Err(CodecError::MissingDiscriminator {
                type_name: self.descriptor.type_name().to_string(),
            }),
            Some(tag) if !self.descriptor.accepts(&tag) => Err(CodecError::UnknownDiscriminator {
                type_name: self.descriptor.type_name().to_string(),
                tag,
            }),
            Some(_) => Ok(()),
        }
    }
}

impl<T: Serialize> EntityCodec<T> {
    pub fn encode(&self, value: &T) -> CodecResult<Document> {
        let doc = bson::to_document(value).map_err(|e| CodecError::Encode {
            type_name: self.descriptor.type_name().to_string(),
            reason: e.to_string(),
        })?;
        if self.descriptor.discriminator {
            self.check_tagged(&doc)?;
        } else if let Some(tag) = discriminator_of(&doc) {
            return Err(CodecError::UnexpectedDiscriminator {
                type_name: self.descriptor.type_name().to_string(),
                tag,
            });
        }
        Ok(doc)
    }
}

impl<T: DeserializeOwned> EntityCodec<T> {
    pub fn decode(&self, mut doc: Document) -> CodecResult<T> {
        if self.descriptor.discriminator {
            self.check_tagged(&doc)?;
        } else {
            doc.remove(DISCRIMINATOR_KEY);
        }
        bson::from_document(doc).map_err(|e| CodecError::Decode {
            type_name: self.descriptor.type_name().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn decode_value(&self, value: Bson) -> CodecResult<T> {
        match value {
            Bson::Document(doc) => self.decode(doc),
            other => Err(CodecError::NotADocument {
                type_name: self.descriptor.type_name().to_string(),
                found: format!("{:?}", other.element_type()),
            }),
        }
    }
}

impl<T> std::fmt::Debug for EntityCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCodec")
            .field("type_name", &self.descriptor.type_name())
            .field("discriminator", &self.descriptor.discriminator)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// DefaultCodecs
// ---------------------------------------------------------------------------

/// Fallback for everything without a registered codec: primitives,
/// collections, and driver-native BSON types go through plain serde.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCodecs;

impl DefaultCodecs {
    pub fn encode<T: Serialize>(&self, value: &T) -> CodecResult<Bson> {
        bson::to_bson(value).map_err(|e| CodecError::Encode {
            type_name: type_name::<T>().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn decode<T: DeserializeOwned>(&self, value: Bson) -> CodecResult<T> {
        bson::from_bson(value).map_err(|e| CodecError::Decode {
            type_name: type_name::<T>().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn encode_document<T: Serialize>(&self, value: &T) -> CodecResult<Document> {
        bson::to_document(value).map_err(|e| CodecError::Encode {
            type_name: type_name::<T>().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn decode_document<T: DeserializeOwned>(&self, doc: Document) -> CodecResult<T> {
        bson::from_document(doc).map_err(|e| CodecError::Decode {
            type_name: type_name::<T>().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::descriptor_for;
    use apm_types::{CorsConfiguration, DeploymentEnvironments, EntityKind};
    use bson::doc;

    fn cors_codec() -> EntityCodec<CorsConfiguration> {
        EntityCodec::new(*descriptor_for(EntityKind::CorsConfiguration).unwrap())
    }

    fn env_codec() -> EntityCodec<DeploymentEnvironments> {
        EntityCodec::new(*descriptor_for(EntityKind::DeploymentEnvironments).unwrap())
    }

    #[test]
    fn cors_variants_recovered_from_tag() {
        let codec = cors_codec();
        let variants = vec![
            CorsConfiguration::Disabled,
            CorsConfiguration::AllowAll {
                allow_credentials: true,
            },
            CorsConfiguration::Restricted {
                allow_origins: vec!["https://a.example".into()],
                allow_headers: vec![],
                allow_methods: vec!["GET".into()],
                allow_credentials: false,
            },
        ];
        for cors in variants {
            let doc = codec.encode(&cors).unwrap();
            assert_eq!(doc.get_str(DISCRIMINATOR_KEY).unwrap(), cors.variant_name());
            assert_eq!(codec.decode(doc).unwrap(), cors);
        }
    }

    #[test]
    fn monomorphic_document_has_no_tag() {
        let env = DeploymentEnvironments::new("production", vec!["eu-west".into()]);
        let doc = env_codec().encode(&env).unwrap();
        assert!(!doc.contains_key(DISCRIMINATOR_KEY));
        assert_eq!(doc.get_str("type").unwrap(), "production");
    }

    #[test]
    fn stray_tag_ignored_on_monomorphic_read() {
        let doc = doc! { "_t": "DeploymentEnvironments", "type": "sandbox", "clusterNames": [] };
        let env = env_codec().decode(doc).unwrap();
        assert_eq!(env.environment_type, "sandbox");
    }

    #[test]
    fn missing_tag_on_polymorphic_read() {
        let doc = doc! { "accessControlAllowCredentials": true };
        let err = cors_codec().decode(doc).unwrap_err();
        assert!(matches!(err, CodecError::MissingDiscriminator { .. }));
    }

    #[test]
    fn unknown_tag_on_polymorphic_read() {
        let doc = doc! { "_t": "AllowSome" };
        match cors_codec().decode(doc).unwrap_err() {
            CodecError::UnknownDiscriminator { tag, .. } => assert_eq!(tag, "AllowSome"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_document_rejected() {
        let err = cors_codec().decode_value(Bson::Int32(7)).unwrap_err();
        assert!(matches!(err, CodecError::NotADocument { .. }));
    }

    #[test]
    fn tagged_type_under_monomorphic_descriptor_rejected() {
        // Registering the CORS type without a discriminator would lose its shape.
        let codec: EntityCodec<CorsConfiguration> = EntityCodec::new(
            crate::descriptor::EntityDescriptor::monomorphic(EntityKind::CorsConfiguration),
        );
        let err = codec.encode(&CorsConfiguration::Disabled).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedDiscriminator { .. }));
    }

    #[test]
    fn defaults_handle_primitives() {
        let codecs = DefaultCodecs;
        assert_eq!(codecs.encode(&42i32).unwrap(), Bson::Int32(42));
        let back: String = codecs.decode(Bson::String("hi".into())).unwrap();
        assert_eq!(back, "hi");
        let list: Vec<i64> = codecs.decode(bson::bson!([1i64, 2i64])).unwrap();
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn defaults_report_type_on_failure() {
        let err = DefaultCodecs.decode::<i32>(Bson::String("nope".into())).unwrap_err();
        assert!(err.to_string().contains("i32"));
    }
}
