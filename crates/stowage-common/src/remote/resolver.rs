//! Delegating resolver.
//!
//! Artifacts always come from the remote store. Resources are looked up in a
//! primary resolver first and fall back to the store; failures on that path
//! are logged and reported as absence.

use crate::config::{self, StoreConfig};
use crate::remote::fetcher::ArtifactFetcher;
use crate::remote::http::HttpStore;
use crate::remote::loader::{ArtifactLoader, LoadError};
use crate::remote::store::RemoteStoreClient;
use crate::remote::translate::{BucketTranslator, NameTranslator};
use std::fmt;
use std::io::{Cursor, Read};
use std::iter::FusedIterator;
use stowage_core::{FetchError, MaterializedArtifact, Result};
use tracing::debug;
use url::Url;

/// Resource lookup consulted before the remote store.
pub trait PrimaryResolver: Send + Sync {
    /// Open the resource called `name`, or `None` if this resolver lacks it.
    fn resolve(&self, name: &str) -> Option<Box<dyn Read + Send>>;
}

impl<F> PrimaryResolver for F
where
    F: Fn(&str) -> Option<Box<dyn Read + Send>> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<Box<dyn Read + Send>> {
        self(name)
    }
}

/// URLs produced by [`DelegatingResolver::locate_all`]. Holds zero or one entry.
#[derive(Debug, Clone)]
pub struct LocatedUrls {
    inner: std::option::IntoIter<Url>,
}

impl LocatedUrls {
    fn new(url: Option<Url>) -> Self {
        Self {
            inner: url.into_iter(),
        }
    }
}

impl Default for LocatedUrls {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Iterator for LocatedUrls {
    type Item = Url;

    fn next(&mut self) -> Option<Url> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for LocatedUrls {}

impl FusedIterator for LocatedUrls {}

/// Resolver combining an optional primary resolver with a remote fetcher.
pub struct DelegatingResolver<C, T> {
    fetcher: ArtifactFetcher<C, T>,
    primary: Option<Box<dyn PrimaryResolver>>,
}

impl DelegatingResolver<HttpStore, BucketTranslator> {
    /// Resolver over the HTTP store described by `config`.
    pub fn from_config(config: &StoreConfig) -> config::Result<Self> {
        Ok(Self::new(ArtifactFetcher::from_config(config)?))
    }
}

impl<C: RemoteStoreClient, T: NameTranslator> DelegatingResolver<C, T> {
    pub fn new(fetcher: ArtifactFetcher<C, T>) -> Self {
        Self {
            fetcher,
            primary: None,
        }
    }

    /// Consult `primary` before the store when resolving resources.
    pub fn with_primary(mut self, primary: impl PrimaryResolver + 'static) -> Self {
        self.primary = Some(Box::new(primary));
        self
    }

    pub fn fetcher(&self) -> &ArtifactFetcher<C, T> {
        &self.fetcher
    }

    /// Resolve an artifact from the store. Errors are reported as they occur.
    pub fn resolve_artifact(&self, name: &str) -> Result<MaterializedArtifact> {
        self.fetcher.fetch(name)
    }

    /// Resolve a resource, trying the primary resolver first.
    ///
    /// Any failure of the store fallback is logged at debug level and
    /// reported as `None`.
    pub fn resolve_resource(&self, name: &str) -> Option<Box<dyn Read + Send>> {
        if let Some(primary) = &self.primary {
            if let Some(stream) = primary.resolve(name) {
                debug!("Resource {} served by primary resolver", name);
                return Some(stream);
            }
        }

        match self.fetcher.fetch_resource(name) {
            Ok(bytes) => Some(Box::new(Cursor::new(bytes))),
            Err(e) => {
                debug!("Resource {} unavailable from store: {}", name, e);
                None
            }
        }
    }

    /// Direct URL for a resource, if the store can express one.
    ///
    /// Store failures are logged and reported as `None`. No bytes are fetched.
    pub fn locate(&self, name: &str) -> Option<Url> {
        match self.resource_url(name) {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot locate {}: {}", name, e);
                None
            }
        }
    }

    /// Every URL for a resource: zero or one.
    ///
    /// Unlike [`locate`](Self::locate), store failures are returned.
    pub fn locate_all(&self, name: &str) -> Result<LocatedUrls> {
        self.resource_url(name).map(LocatedUrls::new)
    }

    /// Resolve an artifact and hand it to `loader`.
    pub fn load_with<L: ArtifactLoader>(
        &self,
        name: &str,
        loader: &L,
    ) -> std::result::Result<L::Output, LoadError<L::Error>> {
        let artifact = self.resolve_artifact(name)?;
        loader.load(artifact).map_err(|source| LoadError::Load {
            name: name.to_string(),
            source,
        })
    }

    fn resource_url(&self, name: &str) -> Result<Option<Url>> {
        let Some(request) = self.fetcher.translator().resource_request(name) else {
            return Ok(None);
        };
        self.fetcher
            .client()
            .url_for(request.bucket(), Some(request.key()))
            .map_err(|e| FetchError::store(name, e))
    }
}

impl<C: fmt::Debug, T: fmt::Debug> fmt::Debug for DelegatingResolver<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatingResolver")
            .field("fetcher", &self.fetcher)
            .field("primary", &self.primary.is_some())
            .finish()
    }
}
