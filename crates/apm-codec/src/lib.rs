//! Type-mapping registry for the API-manager document store.
//!
//! Maps each persisted entity type to a BSON codec. The mapping is driven by
//! an explicit descriptor table ([`ENTITY_DESCRIPTORS`]) rather than
//! annotations: each descriptor names the entity kind and whether its
//! documents carry a `_t` discriminator.
//!
//! # Resolution
//!
//! A [`TypeRegistry`] is an ordered list of entity codecs in front of the
//! [`DefaultCodecs`]. Registered entities always resolve to their own codec;
//! primitives and driver-native types fall through to the defaults.
//!
//! ```rust
//! use apm_codec::{build_registry, Resolution};
//! use apm_types::CorsConfiguration;
//!
//! let registry = build_registry().unwrap();
//! assert!(matches!(registry.resolve::<CorsConfiguration>(), Resolution::Custom(d) if d.discriminator));
//! assert_eq!(registry.resolve::<String>(), Resolution::Default);
//! ```
//!
//! # Design Rules
//!
//! 1. The registry is immutable once built and shared by reference.
//! 2. Malformed descriptors fail at build time, never on first use.
//! 3. Only polymorphic entities write `_t`; monomorphic codecs refuse to.

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod registry;

pub use codec::{discriminator_of, DefaultCodecs, EntityCodec, DISCRIMINATOR_KEY};
pub use descriptor::{descriptor_for, EntityDescriptor, ENTITY_DESCRIPTORS};
pub use error::{CodecError, CodecResult};
pub use registry::{build_registry, RegistryBuilder, Resolution, TypeRegistry};
