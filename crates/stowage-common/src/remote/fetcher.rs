//! Artifact fetching.
//!
//! The fetcher turns one name into fully materialized bytes: translate the
//! name, open the object, check the declared size, then drain the stream
//! into a buffer of exactly that size. A stream that ends early is a
//! [`FetchError::TruncatedTransfer`]; short buffers are never returned.

use crate::config::{self, StoreConfig};
use crate::remote::http::HttpStore;
use crate::remote::store::{RemoteStoreClient, StoreObject};
use crate::remote::translate::{BucketTranslator, NameTranslator};
use std::error::Error as StdError;
use std::io::{self, ErrorKind};
use stowage_core::{
    CodeOrigin, FetchError, FetchRequest, MAX_BUFFER, MaterializedArtifact, NameError, Result,
    StoreError, validate_artifact_name,
};
use tracing::{debug, warn};

/// Fetches artifacts from a remote store.
///
/// Holds no mutable state: concurrent calls share the client and translator
/// and own their buffers.
#[derive(Debug, Clone)]
pub struct ArtifactFetcher<C, T> {
    client: C,
    translator: T,
    max_object_size: usize,
}

impl ArtifactFetcher<HttpStore, BucketTranslator> {
    /// Fetcher over the HTTP store described by `config`.
    pub fn from_config(config: &StoreConfig) -> config::Result<Self> {
        config.validate()?;
        let client = HttpStore::from_config(config)?;
        Ok(Self::new(client, BucketTranslator::from_config(config))
            .with_max_object_size(config.effective_max_object_size()))
    }
}

impl<C: RemoteStoreClient, T: NameTranslator> ArtifactFetcher<C, T> {
    pub fn new(client: C, translator: T) -> Self {
        Self {
            client,
            translator,
            max_object_size: MAX_BUFFER,
        }
    }

    /// Lower the largest object that will be buffered. Clamped to [`MAX_BUFFER`].
    pub fn with_max_object_size(mut self, max_object_size: usize) -> Self {
        self.max_object_size = max_object_size.min(MAX_BUFFER);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    /// Fetch the artifact called `name`.
    ///
    /// Invalid names are rejected before the translator or the store is consulted.
    pub fn fetch(&self, name: &str) -> Result<MaterializedArtifact> {
        check_name(name)?;
        let request = self.translator.artifact_request(name);
        self.fetch_checked(name, request.as_ref())
    }

    /// Fetch `name` from an already computed request.
    ///
    /// A missing request is reported as [`FetchError::UnresolvableRequest`].
    pub fn fetch_request(
        &self,
        name: &str,
        request: Option<&FetchRequest>,
    ) -> Result<MaterializedArtifact> {
        check_name(name)?;
        self.fetch_checked(name, request)
    }

    fn fetch_checked(
        &self,
        name: &str,
        request: Option<&FetchRequest>,
    ) -> Result<MaterializedArtifact> {
        let request = request.ok_or_else(|| FetchError::UnresolvableRequest(name.to_string()))?;

        let bytes = self.drain(name, request)?;
        let origin = self.origin_of(request);
        debug!("Fetched {} ({} bytes) from {}", name, bytes.len(), request);

        Ok(MaterializedArtifact::new(name, bytes, origin))
    }

    /// Fetch the bytes of the resource called `name`.
    ///
    /// Resource names are path-like and skip the identifier check; only empty
    /// names are rejected. No provenance is derived.
    pub fn fetch_resource(&self, name: &str) -> Result<Vec<u8>> {
        if name.is_empty() {
            return Err(FetchError::InvalidName {
                name: String::new(),
                reason: NameError::Empty,
            });
        }
        let request = self
            .translator
            .resource_request(name)
            .ok_or_else(|| FetchError::UnresolvableRequest(name.to_string()))?;
        self.drain(name, &request)
    }

    /// Provenance for bytes fetched with `request`: the URL of its bucket.
    ///
    /// Never fails; a store that cannot produce a URL yields an unknown origin.
    pub fn origin_of(&self, request: &FetchRequest) -> CodeOrigin {
        match self.client.url_for(request.bucket(), None) {
            Ok(url) => CodeOrigin::new(url),
            Err(e) => {
                debug!("No origin URL for bucket {}: {}", request.bucket(), e);
                CodeOrigin::unknown()
            }
        }
    }

    fn drain(&self, name: &str, request: &FetchRequest) -> Result<Vec<u8>> {
        debug!("Fetching {} from {}", name, request);

        let object = self
            .client
            .fetch_object(request)
            .map_err(|e| FetchError::store(name, e))?
            .ok_or_else(|| FetchError::NotFound {
                name: name.to_string(),
                bucket: request.bucket().to_string(),
                key: request.key().to_string(),
            })?;

        read_declared(name, object, self.max_object_size)
    }
}

fn check_name(name: &str) -> Result<()> {
    validate_artifact_name(name).map_err(|reason| FetchError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Drain exactly the declared number of bytes from `object`.
///
/// The object is dropped, releasing its stream, on every return path.
fn read_declared(name: &str, mut object: StoreObject, ceiling: usize) -> Result<Vec<u8>> {
    let metadata = object.metadata();
    let len = metadata
        .buffer_len(ceiling)
        .ok_or_else(|| FetchError::InvalidSize {
            name: name.to_string(),
            size: metadata.size_in_bytes,
        })?;

    let mut bytes = vec![0u8; len];
    let content = object.content_mut();
    let mut offset = 0;

    while offset < len {
        let remaining = len - offset;
        match content.read(&mut bytes[offset..]) {
            Ok(0) => return Err(truncated(name, len, offset)),
            Ok(n) if n > remaining => {
                return Err(FetchError::store(
                    name,
                    StoreError::Protocol(format!(
                        "stream reported {} bytes for a {}-byte window",
                        n, remaining
                    )),
                ));
            }
            Ok(n) => offset += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if is_premature_eof(&e) => return Err(truncated(name, len, offset)),
            Err(e) => return Err(FetchError::store(name, e)),
        }
    }

    Ok(bytes)
}

fn truncated(name: &str, expected: usize, received: usize) -> FetchError {
    warn!(
        "Stream for {} ended after {} of {} declared bytes",
        name, received, expected
    );
    FetchError::TruncatedTransfer {
        name: name.to_string(),
        expected,
        received,
    }
}

/// Whether `e` reports a stream that ended before its declared length.
///
/// HTTP clients surface an incomplete body as an opaque error wrapping an
/// `UnexpectedEof` somewhere down the cause chain.
fn is_premature_eof(e: &io::Error) -> bool {
    let mut current = e;
    loop {
        if current.kind() == ErrorKind::UnexpectedEof {
            return true;
        }
        let mut cause = current
            .get_ref()
            .map(|inner| inner as &(dyn StdError + 'static));
        let mut next_io = None;
        while let Some(err) = cause {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                next_io = Some(io_err);
                break;
            }
            cause = err.source();
        }
        match next_io {
            Some(io_err) => current = io_err,
            None => return false,
        }
    }
}
