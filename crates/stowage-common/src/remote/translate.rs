//! Mapping logical names to store requests.

use crate::config::StoreConfig;
use std::fmt;
use std::sync::Arc;
use stowage_core::{DEFAULT_KEY_SUFFIX, FetchRequest, to_object_key, validate_artifact_name};

/// Translates logical names into store requests.
///
/// Both operations may return `None` to signal that a name cannot be resolved
/// by this translator. Translation must be deterministic.
pub trait NameTranslator: Send + Sync {
    /// Request for an artifact (dotted name such as `com.example.Foo`).
    fn artifact_request(&self, name: &str) -> Option<FetchRequest>;

    /// Request for an auxiliary resource (path-like name used as given).
    fn resource_request(&self, name: &str) -> Option<FetchRequest>;
}

impl<T: NameTranslator + ?Sized> NameTranslator for Arc<T> {
    fn artifact_request(&self, name: &str) -> Option<FetchRequest> {
        (**self).artifact_request(name)
    }

    fn resource_request(&self, name: &str) -> Option<FetchRequest> {
        (**self).resource_request(name)
    }
}

impl<T: NameTranslator + ?Sized> NameTranslator for Box<T> {
    fn artifact_request(&self, name: &str) -> Option<FetchRequest> {
        (**self).artifact_request(name)
    }

    fn resource_request(&self, name: &str) -> Option<FetchRequest> {
        (**self).resource_request(name)
    }
}

/// Translator bound to a single bucket.
///
/// Artifact names have their dots replaced by slashes and the key suffix
/// appended; resource names are used as keys unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTranslator {
    bucket: String,
    key_suffix: String,
    requester_pays: bool,
}

impl BucketTranslator {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
            requester_pays: false,
        }
    }

    /// Build from the [store] section.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.bucket.clone())
            .with_key_suffix(config.key_suffix.clone())
            .with_requester_pays(config.requester_pays)
    }

    pub fn with_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.key_suffix = suffix.into();
        self
    }

    pub fn with_requester_pays(mut self, requester_pays: bool) -> Self {
        self.requester_pays = requester_pays;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn request(&self, key: String) -> FetchRequest {
        FetchRequest::new(self.bucket.clone(), key).with_requester_pays(self.requester_pays)
    }
}

impl NameTranslator for BucketTranslator {
    fn artifact_request(&self, name: &str) -> Option<FetchRequest> {
        validate_artifact_name(name).ok()?;
        Some(self.request(to_object_key(name, &self.key_suffix)))
    }

    fn resource_request(&self, name: &str) -> Option<FetchRequest> {
        if name.is_empty() {
            return None;
        }
        Some(self.request(name.to_string()))
    }
}

type MapFn = Box<dyn Fn(&str) -> Option<FetchRequest> + Send + Sync>;

/// Translator whose mappings are supplied by the caller.
///
/// Useful when bucket, key layout or billing differ per name. Without a
/// resource mapping, no resource can be resolved.
pub struct CustomTranslator {
    artifacts: MapFn,
    resources: Option<MapFn>,
}

impl CustomTranslator {
    pub fn new<F>(artifacts: F) -> Self
    where
        F: Fn(&str) -> Option<FetchRequest> + Send + Sync + 'static,
    {
        Self {
            artifacts: Box::new(artifacts),
            resources: None,
        }
    }

    pub fn with_resources<F>(mut self, resources: F) -> Self
    where
        F: Fn(&str) -> Option<FetchRequest> + Send + Sync + 'static,
    {
        self.resources = Some(Box::new(resources));
        self
    }
}

impl NameTranslator for CustomTranslator {
    fn artifact_request(&self, name: &str) -> Option<FetchRequest> {
        (self.artifacts)(name)
    }

    fn resource_request(&self, name: &str) -> Option<FetchRequest> {
        self.resources.as_ref().and_then(|map| map(name))
    }
}

impl fmt::Debug for CustomTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTranslator")
            .field("resources", &self.resources.is_some())
            .finish_non_exhaustive()
    }
}
