use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{debug, error};

use crate::error::ConfigError;
use crate::target::ConnectionTarget;

/// File name of the deployment configuration inside the config directory.
pub const DEPLOYMENT_FILE: &str = "deployment.toml";

/// Key path of the document-store connection string.
pub const CONNECTION_STRING_KEY: &str = "database.reg_db.connectionString";

/// Where the deployment keeps its configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentLayout {
    pub config_dir: PathBuf,
}

impl DeploymentLayout {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Layout of a product installation: `<home>/repository/conf`.
    pub fn from_product_home(home: impl AsRef<Path>) -> Self {
        Self::new(home.as_ref().join("repository").join("conf"))
    }

    pub fn deployment_file(&self) -> PathBuf {
        self.config_dir.join(DEPLOYMENT_FILE)
    }
}

impl Default for DeploymentLayout {
    fn default() -> Self {
        Self::new(PathBuf::from("repository").join("conf"))
    }
}

/// A parsed deployment configuration, queried by dotted key path.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDocument {
    table: toml::Table,
}

impl ConfigDocument {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let table = toml::from_str::<toml::Table>(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { table })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Value at `key`, where `.` separates nested tables.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        let mut segments = key.split('.');
        let mut value = self.table.get(segments.next()?)?;
        for segment in segments {
            value = value.as_table()?.get(segment)?;
        }
        Some(value)
    }

    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        let value = self
            .get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        value.as_str().ok_or_else(|| ConfigError::NotAString {
            key: key.to_string(),
            found: value.type_str(),
        })
    }
}

/// Resolves the connection target from the deployment file.
///
/// The parsed document is cached after the first successful load and is
/// never reloaded, even if the file changes. A failed load leaves the cache
/// empty so a later call reads the file again.
#[derive(Debug)]
pub struct ConfigResolver {
    path: PathBuf,
    document: OnceLock<Arc<ConfigDocument>>,
}

impl ConfigResolver {
    pub fn new(layout: &DeploymentLayout) -> Self {
        Self::from_path(layout.deployment_file())
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a document has been loaded and cached.
    pub fn is_loaded(&self) -> bool {
        self.document.get().is_some()
    }

    pub fn document(&self) -> Result<Arc<ConfigDocument>, ConfigError> {
        if let Some(doc) = self.document.get() {
            return Ok(Arc::clone(doc));
        }
        debug!(path = %self.path.display(), "loading deployment configuration");
        let loaded = ConfigDocument::load(&self.path).inspect_err(|e| {
            error!(path = %self.path.display(), error = %e, "failed to load deployment configuration");
        })?;
        Ok(Arc::clone(self.document.get_or_init(|| Arc::new(loaded))))
    }

    pub fn resolve_connection_target(&self) -> Result<ConnectionTarget, ConfigError> {
        let doc = self.document()?;
        let raw = doc.get_str(CONNECTION_STRING_KEY)?;
        if raw.trim().is_empty() {
            return Err(ConfigError::EmptyValue(CONNECTION_STRING_KEY.to_string()));
        }
        Ok(ConnectionTarget::new(raw))
    }
}
