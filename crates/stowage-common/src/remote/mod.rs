//! Remote artifact resolution.
//!
//! Artifacts are looked up by logical name (`com.example.Foo`) in an object
//! store and returned fully materialized, together with the URL of the
//! bucket they came from.
//!
//! # Overview
//!
//! - [`NameTranslator`] maps a name to a [`FetchRequest`](stowage_core::FetchRequest)
//!   (bucket, key, requester-pays).
//! - [`RemoteStoreClient`] opens objects. [`HttpStore`] talks to S3-compatible
//!   endpoints; [`MemoryStore`] keeps objects in process.
//! - [`ArtifactFetcher`] drains an object into a buffer of exactly its
//!   declared size.
//! - [`DelegatingResolver`] adds the resource path (primary resolver first,
//!   store second) and URL lookup.
//!
//! # Configuration
//!
//! ```toml
//! [store]
//! bucket = "my-classes"
//! region = "eu-west-1"
//! requester_pays = true
//!
//! [store.network]
//! timeout_secs = 30
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use stowage_common::config::StowageConfig;
//! use stowage_common::remote::DelegatingResolver;
//!
//! let config = StowageConfig::discover(None)?;
//! let resolver = DelegatingResolver::from_config(&config.store)?;
//!
//! let artifact = resolver.resolve_artifact("com.example.Foo")?;
//! println!("{} bytes from {:?}", artifact.len(), artifact.origin().url);
//! ```

pub mod fetcher;
pub mod http;
pub mod loader;
pub mod memory;
pub mod resolver;
pub mod store;
pub mod translate;

pub use fetcher::ArtifactFetcher;
pub use http::{HttpStore, REQUEST_PAYER_HEADER};
pub use loader::{ArtifactLoader, LoadError};
pub use memory::MemoryStore;
pub use resolver::{DelegatingResolver, LocatedUrls, PrimaryResolver};
pub use store::{RemoteStoreClient, StoreObject};
pub use translate::{BucketTranslator, CustomTranslator, NameTranslator};
