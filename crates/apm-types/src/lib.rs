//! Entity types for the API-manager document store.
//!
//! Every document the persistence layer reads or writes maps onto one of the
//! six types in this crate. Each implements [`Entity`], which ties the Rust
//! type to its [`EntityKind`] and, through that, to its collection name and
//! stable type name.
//!
//! # Key Types
//!
//! - [`PublisherApi`] / [`DevPortalApi`] -- API views used by the publisher and developer portal
//! - [`StoredPublisherApi`] / [`StoredDevPortalApi`] -- the same views as stored documents, with `_id` and organization
//! - [`DeploymentEnvironments`] -- gateway environment and cluster bindings
//! - [`CorsConfiguration`] -- the one polymorphic entity; its concrete shape varies per variant

pub mod api;
pub mod cors;
pub mod entity;
pub mod environment;

pub use api::{DevPortalApi, PublisherApi, StoredDevPortalApi, StoredPublisherApi};
pub use cors::CorsConfiguration;
pub use entity::{Entity, EntityKind};
pub use environment::DeploymentEnvironments;
