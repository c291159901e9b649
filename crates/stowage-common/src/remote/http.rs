//! S3-compatible HTTP store client.

use crate::config::{self, Addressing, NetworkConfig, StoreConfig};
use crate::remote::store::{RemoteStoreClient, StoreObject};
use reqwest::StatusCode;
use std::time::Duration;
use stowage_core::{FetchRequest, ObjectMetadata, StoreError};
use tracing::debug;
use url::Url;

/// Header asking the store to bill the transfer to the requester.
pub const REQUEST_PAYER_HEADER: &str = "x-amz-request-payer";

/// Store client issuing plain GET requests against an S3-compatible endpoint.
///
/// Requests are unsigned, so the bucket must allow anonymous reads or sit
/// behind a proxy that signs on the caller's behalf.
pub struct HttpStore {
    /// Endpoint base URL.
    endpoint: Url,

    /// Bucket addressing style.
    addressing: Addressing,

    /// reqwest client.
    client: reqwest::blocking::Client,
}

impl HttpStore {
    /// Create a new HTTP store client.
    pub fn new(
        endpoint: Url,
        addressing: Addressing,
        network: &NetworkConfig,
    ) -> Result<Self, StoreError> {
        let mut builder = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(network.connect_timeout_secs));

        builder = if network.timeout_secs > 0 {
            builder.timeout(Duration::from_secs(network.timeout_secs))
        } else {
            builder.timeout(None)
        };

        // Set user agent
        if let Some(ref ua) = network.user_agent {
            builder = builder.user_agent(ua);
        } else {
            builder = builder.user_agent(format!("stowage/{}", env!("CARGO_PKG_VERSION")));
        }

        // Only explicitly configured proxies are used
        builder = builder.no_proxy();

        if let Some(ref proxy_url) = network.http_proxy {
            let proxy = reqwest::Proxy::http(proxy_url)
                .map_err(|e| StoreError::Transport(format!("Invalid HTTP proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        if let Some(ref proxy_url) = network.https_proxy {
            let proxy = reqwest::Proxy::https(proxy_url)
                .map_err(|e| StoreError::Transport(format!("Invalid HTTPS proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            addressing,
            client,
        })
    }

    /// Create a client from the [store] section.
    pub fn from_config(config: &StoreConfig) -> config::Result<Self> {
        let endpoint = config.endpoint_url()?;
        Ok(Self::new(endpoint, config.addressing, &config.network)?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL of a bucket (trailing slash) or of an object within it.
    fn object_url(&self, bucket: &str, key: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();

        if self.addressing == Addressing::VirtualHosted {
            let host = self.endpoint.host_str().ok_or_else(|| {
                StoreError::Protocol(format!("Endpoint {} has no host", self.endpoint))
            })?;
            url.set_host(Some(&format!("{}.{}", bucket, host)))
                .map_err(|e| {
                    StoreError::Protocol(format!("Bucket {} cannot form a host name: {}", bucket, e))
                })?;
        }

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::Protocol(format!("Endpoint {} cannot be a base URL", self.endpoint))
            })?;
            segments.pop_if_empty();
            if self.addressing == Addressing::Path {
                segments.push(bucket);
            }
            match key {
                Some(key) => {
                    segments.extend(key.split('/'));
                }
                None => {
                    segments.push("");
                }
            }
        }

        Ok(url)
    }
}

impl RemoteStoreClient for HttpStore {
    fn fetch_object(&self, request: &FetchRequest) -> Result<Option<StoreObject>, StoreError> {
        let url = self.object_url(request.bucket(), Some(request.key()))?;
        debug!("GET {}", url);

        let mut builder = self.client.get(url.as_str());
        if request.requester_pays() {
            builder = builder.header(REQUEST_PAYER_HEADER, "requester");
        }

        let response = builder
            .send()
            .map_err(|e| StoreError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No object at {}", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }

        let size = response
            .content_length()
            .map(|len| i64::try_from(len).unwrap_or(i64::MAX));

        Ok(Some(StoreObject::new(
            ObjectMetadata {
                size_in_bytes: size,
            },
            response,
        )))
    }

    fn url_for(&self, bucket: &str, key: Option<&str>) -> Result<Option<Url>, StoreError> {
        if bucket.is_empty() {
            return Ok(None);
        }
        self.object_url(bucket, key).map(Some)
    }
}
