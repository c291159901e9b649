//! The remote store port.

use std::fmt;
use std::io::Read;
use std::sync::Arc;
use stowage_core::{FetchRequest, ObjectMetadata, StoreError};
use url::Url;

/// An object returned by the store: declared metadata plus an open content stream.
///
/// Dropping the object releases the stream and any connection behind it.
pub struct StoreObject {
    metadata: ObjectMetadata,
    content: Box<dyn Read + Send>,
}

impl StoreObject {
    pub fn new(metadata: ObjectMetadata, content: impl Read + Send + 'static) -> Self {
        Self {
            metadata,
            content: Box::new(content),
        }
    }

    pub fn metadata(&self) -> ObjectMetadata {
        self.metadata
    }

    /// Borrow the content stream.
    pub fn content_mut(&mut self) -> &mut (dyn Read + Send) {
        self.content.as_mut()
    }

    /// Give up the metadata and keep only the stream.
    pub fn into_content(self) -> Box<dyn Read + Send> {
        self.content
    }
}

impl fmt::Debug for StoreObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreObject")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Client for a remote object store.
///
/// # Contract
///
/// - **`fetch_object(request)`**: `Ok(None)` when the store holds no object at
///   the request's location, `Ok(Some(_))` with an open stream otherwise.
///   Connectivity and permission failures are `Err`.
/// - **`url_for(bucket, key)`**: a direct URL for the object, or for the bucket
///   itself when `key` is `None`. `Ok(None)` when the store cannot express one.
///
/// Implementations are shared between threads and must not require `&mut self`.
pub trait RemoteStoreClient: Send + Sync {
    /// Open the object addressed by `request`.
    fn fetch_object(&self, request: &FetchRequest) -> Result<Option<StoreObject>, StoreError>;

    /// Compute a URL for a bucket or an object within it.
    fn url_for(&self, bucket: &str, key: Option<&str>) -> Result<Option<Url>, StoreError>;
}

impl<C: RemoteStoreClient + ?Sized> RemoteStoreClient for Arc<C> {
    fn fetch_object(&self, request: &FetchRequest) -> Result<Option<StoreObject>, StoreError> {
        (**self).fetch_object(request)
    }

    fn url_for(&self, bucket: &str, key: Option<&str>) -> Result<Option<Url>, StoreError> {
        (**self).url_for(bucket, key)
    }
}

impl<C: RemoteStoreClient + ?Sized> RemoteStoreClient for &C {
    fn fetch_object(&self, request: &FetchRequest) -> Result<Option<StoreObject>, StoreError> {
        (**self).fetch_object(request)
    }

    fn url_for(&self, bucket: &str, key: Option<&str>) -> Result<Option<Url>, StoreError> {
        (**self).url_for(bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_store_object_stream() {
        let mut object = StoreObject::new(ObjectMetadata::new(3), Cursor::new(vec![1, 2, 3]));
        assert_eq!(object.metadata().size_in_bytes, Some(3));

        let mut buf = Vec::new();
        object.content_mut().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_debug_hides_stream() {
        let object = StoreObject::new(ObjectMetadata::without_size(), Cursor::new(Vec::new()));
        let debug = format!("{:?}", object);
        assert!(debug.contains("StoreObject"));
        assert!(debug.contains("size_in_bytes: None"));
    }
}
