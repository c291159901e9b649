use super::store::{RemoteStoreClient, StoreObject};
use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stowage_core::{FetchRequest, ObjectMetadata, StoreError};
use url::Url;

/// In-memory object store (for testing and embedding).
///
/// Objects can be stored with a declared size that differs from their real
/// content, with a read fault part-way through, or behind an injected store
/// failure. Every content stream handed out is counted when it is dropped.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default, Debug)]
struct Inner {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    settings: Mutex<Settings>,
    fetches: AtomicUsize,
    released: Arc<AtomicUsize>,
}

#[derive(Clone, Debug)]
struct StoredObject {
    bytes: Arc<[u8]>,
    declared: Option<i64>,
    fail_after: Option<usize>,
}

#[derive(Clone, Debug)]
struct Settings {
    read_chunk: usize,
    fetch_failure: Option<String>,
    url_failure: Option<String>,
    urls_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            read_chunk: usize::MAX,
            fetch_failure: None,
            url_failure: None,
            urls_enabled: true,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes`, declaring their exact length.
    pub fn put(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        let declared = i64::try_from(bytes.len()).ok();
        self.insert(bucket, key, bytes, declared, None);
    }

    /// Store `bytes` but report `declared` as the object size.
    pub fn put_declared(
        &self,
        bucket: &str,
        key: &str,
        bytes: impl Into<Vec<u8>>,
        declared: Option<i64>,
    ) {
        self.insert(bucket, key, bytes.into(), declared, None);
    }

    /// Store `bytes` whose stream fails with a connection reset after `fail_after` bytes.
    pub fn put_failing(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>, fail_after: usize) {
        let bytes: Vec<u8> = bytes.into();
        let declared = i64::try_from(bytes.len()).ok();
        self.insert(bucket, key, bytes, declared, Some(fail_after));
    }

    fn insert(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        declared: Option<i64>,
        fail_after: Option<usize>,
    ) {
        lock(&self.inner.objects).insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes: bytes.into(),
                declared,
                fail_after,
            },
        );
    }

    /// Remove an object.
    pub fn remove(&self, bucket: &str, key: &str) -> bool {
        lock(&self.inner.objects)
            .remove(&(bucket.to_string(), key.to_string()))
            .is_some()
    }

    /// Limit every read call to at most `chunk` bytes.
    pub fn set_read_chunk(&self, chunk: usize) {
        lock(&self.inner.settings).read_chunk = chunk.max(1);
    }

    /// Make every `fetch_object` call fail with a transport error.
    pub fn fail_fetches(&self, message: impl Into<String>) {
        lock(&self.inner.settings).fetch_failure = Some(message.into());
    }

    /// Make every `url_for` call fail with a transport error.
    pub fn fail_urls(&self, message: impl Into<String>) {
        lock(&self.inner.settings).url_failure = Some(message.into());
    }

    /// Make `url_for` report that no URL can be expressed.
    pub fn disable_urls(&self) {
        lock(&self.inner.settings).urls_enabled = false;
    }

    /// Number of `fetch_object` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Number of content streams that have been dropped.
    pub fn released_count(&self) -> usize {
        self.inner.released.load(Ordering::SeqCst)
    }
}

impl RemoteStoreClient for MemoryStore {
    fn fetch_object(&self, request: &FetchRequest) -> Result<Option<StoreObject>, StoreError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);

        let settings = lock(&self.inner.settings).clone();
        if let Some(message) = settings.fetch_failure {
            return Err(StoreError::Transport(message));
        }

        let stored = lock(&self.inner.objects)
            .get(&(request.bucket().to_string(), request.key().to_string()))
            .cloned();

        Ok(stored.map(|stored| {
            let reader = MemoryReader {
                bytes: stored.bytes,
                position: 0,
                chunk: settings.read_chunk,
                fail_after: stored.fail_after,
                released: Arc::clone(&self.inner.released),
            };
            StoreObject::new(
                ObjectMetadata {
                    size_in_bytes: stored.declared,
                },
                reader,
            )
        }))
    }

    fn url_for(&self, bucket: &str, key: Option<&str>) -> Result<Option<Url>, StoreError> {
        let settings = lock(&self.inner.settings).clone();
        if let Some(message) = settings.url_failure {
            return Err(StoreError::Transport(message));
        }
        if !settings.urls_enabled || bucket.is_empty() {
            return Ok(None);
        }

        let raw = format!("memory://{}/{}", bucket, key.unwrap_or_default());
        Url::parse(&raw)
            .map(Some)
            .map_err(|e| StoreError::Protocol(format!("Cannot express {raw} as a URL: {e}")))
    }
}

struct MemoryReader {
    bytes: Arc<[u8]>,
    position: usize,
    chunk: usize,
    fail_after: Option<usize>,
    released: Arc<AtomicUsize>,
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut end = self.bytes.len();
        if let Some(limit) = self.fail_after {
            if self.position >= limit {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by memory store",
                ));
            }
            end = end.min(limit);
        }

        let available = end.saturating_sub(self.position);
        let n = available.min(buf.len()).min(self.chunk);
        buf[..n].copy_from_slice(&self.bytes[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

impl Drop for MemoryReader {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(object: StoreObject) -> Vec<u8> {
        let mut content = object.into_content();
        let mut buf = Vec::new();
        content.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_put_and_fetch() {
        let store = MemoryStore::new();
        store.put("classes", "a/B.class", b"bytes".to_vec());

        let object = store
            .fetch_object(&FetchRequest::new("classes", "a/B.class"))
            .unwrap()
            .expect("object is present");
        assert_eq!(object.metadata().size_in_bytes, Some(5));
        assert_eq!(read_all(object), b"bytes");
        assert_eq!(store.fetch_count(), 1);
        assert_eq!(store.released_count(), 1);
    }

    #[test]
    fn test_missing_object() {
        let store = MemoryStore::new();
        let object = store
            .fetch_object(&FetchRequest::new("classes", "missing"))
            .unwrap();
        assert!(object.is_none());

        store.put("classes", "gone", b"x".to_vec());
        assert!(store.remove("classes", "gone"));
        assert!(!store.remove("classes", "gone"));
    }

    #[test]
    fn test_read_chunk_limits_each_read() {
        let store = MemoryStore::new();
        store.put("b", "k", vec![7u8; 10]);
        store.set_read_chunk(3);

        let mut object = store
            .fetch_object(&FetchRequest::new("b", "k"))
            .unwrap()
            .unwrap();
        let mut buf = [0u8; 10];
        assert_eq!(object.content_mut().read(&mut buf).unwrap(), 3);
    }

    #[test]
    fn test_failing_stream() {
        let store = MemoryStore::new();
        store.put_failing("b", "k", vec![1u8; 8], 4);

        let mut content = store
            .fetch_object(&FetchRequest::new("b", "k"))
            .unwrap()
            .unwrap()
            .into_content();
        let mut buf = Vec::new();
        let err = content.read_to_end(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_injected_failures() {
        let store = MemoryStore::new();
        store.fail_fetches("no route to host");
        let err = store
            .fetch_object(&FetchRequest::new("b", "k"))
            .unwrap_err();
        assert!(err.to_string().contains("no route to host"));

        store.fail_urls("denied");
        assert!(store.url_for("b", None).is_err());
    }

    #[test]
    fn test_urls() {
        let store = MemoryStore::new();
        let url = store.url_for("classes", Some("a/B.class")).unwrap().unwrap();
        assert_eq!(url.as_str(), "memory://classes/a/B.class");

        assert_eq!(store.url_for("", Some("k")).unwrap(), None);

        store.disable_urls();
        assert_eq!(store.url_for("classes", None).unwrap(), None);
    }
}
