use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use apm_codec::{build_registry, CodecResult, TypeRegistry};
use tracing::{debug, error, info};

use crate::config::{ConfigResolver, DeploymentLayout};
use crate::driver::{ClientSettings, StoreDriver};
use crate::error::StoreResult;
use crate::target::ConnectionTarget;

/// Lifecycle of the shared client. `Ready` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
}

impl LifecycleState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Initializing,
            2 => Self::Ready,
            _ => Self::Uninitialized,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Initializing => 1,
            Self::Ready => 2,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// What a successful initialization publishes.
struct Published<C> {
    client: Arc<C>,
    target: ConnectionTarget,
    registry: Arc<TypeRegistry>,
}

/// Owner of the one document-store client shared by the whole process.
///
/// Constructed once by the host's composition root and handed to whoever
/// needs store access. The first [`SharedClient::client`] call resolves the
/// connection target, builds the type registry, and connects; every later
/// call returns the same client.
///
/// # Concurrency
///
/// Construction runs under a mutex with a re-check after the lock is
/// taken, so racing first callers connect exactly once. Once published, the
/// client is read through a `OnceLock` without locking.
///
/// # Failure
///
/// A failed initialization publishes nothing and returns to
/// `Uninitialized`; the next call retries from scratch. The client, its
/// target, and its registry are never replaced once published.
pub struct SharedClient<D: StoreDriver> {
    driver: D,
    resolver: ConfigResolver,
    registry_builder: fn() -> CodecResult<TypeRegistry>,
    published: OnceLock<Published<D::Client>>,
    state: AtomicU8,
    init_lock: Mutex<()>,
}

impl<D: StoreDriver> SharedClient<D> {
    pub fn new(driver: D, resolver: ConfigResolver) -> Self {
        Self {
            driver,
            resolver,
            registry_builder: build_registry,
            published: OnceLock::new(),
            state: AtomicU8::new(LifecycleState::Uninitialized.as_u8()),
            init_lock: Mutex::new(()),
        }
    }

    /// Manager reading `deployment.toml` from `layout`.
    pub fn from_layout(driver: D, layout: &DeploymentLayout) -> Self {
        Self::new(driver, ConfigResolver::new(layout))
    }

    #[cfg(test)]
    pub(crate) fn with_registry_builder(mut self, builder: fn() -> CodecResult<TypeRegistry>) -> Self {
        self.registry_builder = builder;
        self
    }

    /// Current state. Reports `Ready` as soon as a client is published,
    /// even before the publishing thread stores the new state.
    pub fn state(&self) -> LifecycleState {
        if self.published.get().is_some() {
            return LifecycleState::Ready;
        }
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.published.get().is_some()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Initialize if needed. A no-op once ready.
    pub fn initialize(&self) -> StoreResult<()> {
        self.publish().map(|_| ())
    }

    /// The shared client, initializing on first use.
    pub fn client(&self) -> StoreResult<Arc<D::Client>> {
        self.publish().map(|p| Arc::clone(&p.client))
    }

    /// The shared client if already initialized. Never initializes.
    pub fn try_client(&self) -> Option<Arc<D::Client>> {
        self.published.get().map(|p| Arc::clone(&p.client))
    }

    /// Registry the published client was built with.
    pub fn registry(&self) -> Option<Arc<TypeRegistry>> {
        self.published.get().map(|p| Arc::clone(&p.registry))
    }

    /// Target the published client connected to.
    pub fn target(&self) -> Option<&ConnectionTarget> {
        self.published.get().map(|p| &p.target)
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    fn publish(&self) -> StoreResult<&Published<D::Client>> {
        if let Some(published) = self.published.get() {
            return Ok(published);
        }

        // The guarded section holds no data, so a poisoned lock only means a
        // previous attempt panicked; this attempt starts over.
        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(published) = self.published.get() {
            return Ok(published);
        }

        self.set_state(LifecycleState::Initializing);
        let mut attempt = InitAttempt::new(&self.state);
        debug!(driver = self.driver.name(), "initializing document store client");
        match self.construct() {
            Ok(constructed) => {
                let published = self.published.get_or_init(|| constructed);
                self.set_state(LifecycleState::Ready);
                attempt.disarm();
                info!(
                    driver = self.driver.name(),
                    target = %published.target,
                    entities = published.registry.len(),
                    "document store client created"
                );
                Ok(published)
            }
            Err(e) => {
                error!(driver = self.driver.name(), error = %e, "document store client initialization failed");
                Err(e)
            }
        }
    }

    fn construct(&self) -> StoreResult<Published<D::Client>> {
        let target = self.resolver.resolve_connection_target()?;
        let registry = Arc::new((self.registry_builder)()?);
        let settings = ClientSettings::new(target.clone(), Arc::clone(&registry));
        let client = self.driver.connect(settings)?;
        Ok(Published {
            client: Arc::new(client),
            target,
            registry,
        })
    }
}

/// Resets the state to `Uninitialized` when an attempt ends without
/// publishing, including by unwinding out of a driver or registry builder.
struct InitAttempt<'a> {
    state: &'a AtomicU8,
    armed: bool,
}

impl<'a> InitAttempt<'a> {
    fn new(state: &'a AtomicU8) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InitAttempt<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state
                .store(LifecycleState::Uninitialized.as_u8(), Ordering::Release);
        }
    }
}

impl<D: StoreDriver> fmt::Debug for SharedClient<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedClient")
            .field("driver", &self.driver.name())
            .field("config", &self.resolver.path())
            .field("state", &self.state())
            .finish()
    }
}
