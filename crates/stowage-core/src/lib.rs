//! Stowage core model.
//!
//! Types shared by every layer of the artifact resolution pipeline:
//!
//! - [`FetchRequest`]: store addressing for one artifact (bucket, key, options)
//! - [`ObjectMetadata`]: what the store declares about an object before transfer
//! - [`MaterializedArtifact`] and [`CodeOrigin`]: fully drained bytes plus provenance
//! - [`FetchError`], [`StoreError`], [`NameError`]: the failure taxonomy
//!
//! Nothing here performs I/O. The store adapters, the fetcher and the
//! delegating resolver live in `stowage-common`.

pub mod artifact;
pub mod error;
pub mod naming;
pub mod request;

pub use artifact::{CodeOrigin, MAX_BUFFER, MaterializedArtifact, ObjectMetadata};
pub use error::{FetchError, NameError, Result, StoreError};
pub use naming::{DEFAULT_KEY_SUFFIX, is_identifier_start, to_object_key, validate_artifact_name};
pub use request::{FetchRequest, RequestOptions};
