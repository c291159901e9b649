//! Store addressing for a single artifact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-specific options attached to a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Bill the transfer to the requester instead of the bucket owner.
    #[serde(default)]
    pub requester_pays: bool,
}

/// Where one artifact lives in the remote store.
///
/// Requests are produced by a name translator and are never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    bucket: String,
    key: String,
    #[serde(default)]
    options: RequestOptions,
}

impl FetchRequest {
    /// Create a request with default options.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            options: RequestOptions::default(),
        }
    }

    /// Set whether the requester pays for the transfer.
    pub fn with_requester_pays(mut self, requester_pays: bool) -> Self {
        self.options.requester_pays = requester_pays;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> RequestOptions {
        self.options
    }

    pub fn requester_pays(&self) -> bool {
        self.options.requester_pays
    }
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)?;
        if self.options.requester_pays {
            write!(f, " (requester pays)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = FetchRequest::new("classes", "com/example/Foo.class");
        assert_eq!(request.bucket(), "classes");
        assert_eq!(request.key(), "com/example/Foo.class");
        assert!(!request.requester_pays());

        let request = request.with_requester_pays(true);
        assert!(request.options().requester_pays);
    }

    #[test]
    fn test_display() {
        let request = FetchRequest::new("classes", "a/B.class");
        assert_eq!(request.to_string(), "s3://classes/a/B.class");

        let request = request.with_requester_pays(true);
        assert_eq!(request.to_string(), "s3://classes/a/B.class (requester pays)");
    }

    #[test]
    fn test_serde_defaults_options() {
        let request: FetchRequest =
            serde_json::from_str(r#"{"bucket": "classes", "key": "a/B.class"}"#).unwrap();
        assert_eq!(request, FetchRequest::new("classes", "a/B.class"));

        let json = serde_json::to_string(&request.with_requester_pays(true)).unwrap();
        assert!(json.contains(r#""requesterPays":true"#));
    }
}
