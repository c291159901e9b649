use serde::{Deserialize, Serialize};
use stowage_core::{DEFAULT_KEY_SUFFIX, MAX_BUFFER};

/// Root configuration from stowage.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StowageConfig {
    /// Remote store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// [store] section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bucket holding the artifacts. Required before a resolver can be built.
    #[serde(default)]
    pub bucket: String,

    /// Store endpoint (defaults to the AWS endpoint for `region`).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Region used to derive the default endpoint.
    #[serde(default)]
    pub region: Option<String>,

    /// How buckets are addressed on the endpoint.
    #[serde(default)]
    pub addressing: Addressing,

    /// Bill transfers to the requester.
    #[serde(default)]
    pub requester_pays: bool,

    /// Suffix appended to artifact keys.
    #[serde(default = "default_key_suffix")]
    pub key_suffix: String,

    /// Largest object the fetcher will buffer, clamped to 2^31 - 1.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: usize,

    /// Network settings.
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            endpoint: None,
            region: None,
            addressing: Addressing::default(),
            requester_pays: false,
            key_suffix: default_key_suffix(),
            max_object_size: default_max_object_size(),
            network: NetworkConfig::default(),
        }
    }
}

/// Bucket addressing style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Addressing {
    /// `https://{bucket}.{host}/{key}`
    #[default]
    VirtualHosted,
    /// `https://{host}/{bucket}/{key}`
    Path,
}

/// [store.network] section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Request timeout in seconds (0 = no timeout).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// HTTP proxy URL.
    #[serde(default)]
    pub http_proxy: Option<String>,

    /// HTTPS proxy URL.
    #[serde(default)]
    pub https_proxy: Option<String>,

    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            http_proxy: None,
            https_proxy: None,
            user_agent: None,
        }
    }
}

fn default_key_suffix() -> String {
    DEFAULT_KEY_SUFFIX.to_string()
}

fn default_max_object_size() -> usize {
    MAX_BUFFER
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}
