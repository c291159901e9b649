//! Configuration module
//!
//! Handles loading and parsing of Stowage configuration files (stowage.toml).

pub mod model;

use std::path::{Path, PathBuf};
use stowage_core::MAX_BUFFER;
use thiserror::Error;
use url::Url;

pub use self::model::*;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "stowage.toml";

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No bucket was configured
    #[error("No bucket configured; set store.bucket or pass --bucket")]
    MissingBucket,

    /// The endpoint is not a usable base URL
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// Configured endpoint
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },

    /// The store client could not be created
    #[error("Failed to create store client: {0}")]
    Client(#[from] stowage_core::StoreError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl StowageConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default configuration file location (`<config dir>/stowage/stowage.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stowage").join(CONFIG_FILE_NAME))
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }
}

impl StoreConfig {
    /// Create a config for `bucket` with defaults everywhere else.
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Check the settings needed to build a resolver.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::MissingBucket);
        }
        self.endpoint_url().map(|_| ())
    }

    /// Endpoint base URL, falling back to the AWS endpoint for the region.
    pub fn endpoint_url(&self) -> Result<Url> {
        let endpoint = match (&self.endpoint, &self.region) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(region)) => format!("https://s3.{}.amazonaws.com", region),
            (None, None) => "https://s3.amazonaws.com".to_string(),
        };

        let url = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint {
                endpoint,
                reason: "endpoint must be a hierarchical URL with a host".to_string(),
            });
        }

        Ok(url)
    }

    /// Object size ceiling actually applied by the fetcher.
    pub fn effective_max_object_size(&self) -> usize {
        self.max_object_size.clamp(1, MAX_BUFFER)
    }
}
