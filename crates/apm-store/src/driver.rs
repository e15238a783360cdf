use std::sync::Arc;

use apm_codec::TypeRegistry;

use crate::error::{StoreError, StoreResult};
use crate::target::ConnectionTarget;

/// URI schemes accepted by the document store.
pub const ACCEPTED_SCHEMES: [&str; 2] = ["mongodb", "mongodb+srv"];

/// Check a target's scheme and host list before a driver connects.
pub fn validate_target(target: &ConnectionTarget) -> StoreResult<()> {
    let invalid = |reason: &str| StoreError::InvalidTarget {
        target: target.redacted(),
        reason: reason.to_string(),
    };
    let scheme = target.scheme().ok_or_else(|| invalid("missing scheme"))?;
    if !ACCEPTED_SCHEMES.contains(&scheme) {
        return Err(invalid(&format!("unsupported scheme {scheme:?}")));
    }
    match target.hosts() {
        Some(hosts) if !hosts.is_empty() => Ok(()),
        _ => Err(invalid("no hosts")),
    }
}

/// Everything a driver needs to construct a client.
#[derive(Clone, Debug)]
pub struct ClientSettings {
    pub target: ConnectionTarget,
    pub registry: Arc<TypeRegistry>,
}

impl ClientSettings {
    pub fn new(target: ConnectionTarget, registry: Arc<TypeRegistry>) -> Self {
        Self { target, registry }
    }
}

/// A document-store driver that can construct clients.
///
/// Implementations must return clients that are safe to share across
/// threads; the lifecycle manager hands one instance to every caller.
pub trait StoreDriver: Send + Sync {
    type Client: Send + Sync + 'static;

    /// Short driver name for logs and errors.
    fn name(&self) -> &'static str;

    /// Construct a client from `settings`. Called at most once per
    /// successful lifecycle.
    fn connect(&self, settings: ClientSettings) -> StoreResult<Self::Client>;
}
