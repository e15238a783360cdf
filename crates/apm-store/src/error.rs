use std::path::PathBuf;

use apm_codec::CodecError;

/// Errors from reading the deployment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The key path is absent from an otherwise valid document.
    #[error("missing configuration key: {0}")]
    MissingKey(String),

    /// The key is present but does not hold a string.
    #[error("configuration key {key} must be a string, found {found}")]
    NotAString { key: String, found: &'static str },

    /// The key holds an empty string.
    #[error("configuration key {0} is empty")]
    EmptyValue(String),
}

/// Errors surfaced by the shared client lifecycle and its drivers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("type registry error: {0}")]
    Registry(#[from] CodecError),

    /// The driver rejected the connection target before connecting.
    #[error("invalid connection target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The driver failed to construct a client.
    #[error("failed to create {driver} client: {reason}")]
    Connect { driver: &'static str, reason: String },

    /// The connection target names no database to open collections in.
    #[error("connection target {0} has no default database")]
    NoDefaultDatabase(String),

    /// A lock guarding in-process state was poisoned by a panicking thread.
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
