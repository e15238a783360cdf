//! Shared document-store client for the API manager.
//!
//! Reads the connection string from the deployment's `deployment.toml`,
//! builds the entity type registry, and constructs exactly one store client
//! for the lifetime of the owning [`SharedClient`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use apm_store::{DeploymentLayout, InMemoryDriver, SharedClient};
//! use apm_types::CorsConfiguration;
//!
//! let layout = DeploymentLayout::from_product_home("/opt/apim");
//! let shared = SharedClient::from_layout(InMemoryDriver, &layout);
//!
//! let client = shared.client()?;
//! client.insert(&CorsConfiguration::Disabled)?;
//! # Ok::<(), apm_store::StoreError>(())
//! ```
//!
//! # Drivers
//!
//! All drivers implement the [`StoreDriver`] trait:
//!
//! - [`InMemoryDriver`] -- process-local collections for tests and embedding
//! - `MongoDriver` -- MongoDB via the official driver (requires the `mongodb` feature)
//!
//! # Design Rules
//!
//! 1. At most one client per [`SharedClient`]; it is never closed or replaced.
//! 2. The configuration document is read once and never reloaded.
//! 3. Initialization failures are returned to the caller and publish nothing.
//! 4. Reads after initialization take no lock.

pub mod config;
pub mod driver;
pub mod error;
pub mod lifecycle;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod target;

pub use config::{
    ConfigDocument, ConfigResolver, DeploymentLayout, CONNECTION_STRING_KEY, DEPLOYMENT_FILE,
};
pub use driver::{validate_target, ClientSettings, StoreDriver, ACCEPTED_SCHEMES};
pub use error::{ConfigError, StoreError, StoreResult};
pub use lifecycle::{LifecycleState, SharedClient};
pub use memory::{InMemoryClient, InMemoryDriver};
#[cfg(feature = "mongodb")]
pub use mongo::{MongoClient, MongoDriver};
pub use target::ConnectionTarget;
