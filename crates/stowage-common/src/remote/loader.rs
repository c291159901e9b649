//! Handing materialized artifacts to a consumer.

use stowage_core::{FetchError, MaterializedArtifact};
use thiserror::Error;

/// Turns a materialized artifact into something usable by the host.
///
/// The resolver never interprets artifact bytes itself; a loader decides
/// what they mean (write them out, define a code unit, index them, ...).
pub trait ArtifactLoader {
    /// What a successful load produces.
    type Output;

    /// Why a load failed.
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self, artifact: MaterializedArtifact) -> Result<Self::Output, Self::Error>;
}

/// Failure of a resolve-then-load operation.
#[derive(Debug, Error)]
pub enum LoadError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The artifact could not be resolved
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The loader rejected the artifact
    #[error("Failed to load {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: E,
    },
}

impl<E> LoadError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// True when the artifact does not exist in the store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_not_found())
    }
}
