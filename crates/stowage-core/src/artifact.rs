//! Object metadata, provenance and materialized artifacts.

use serde::{Deserialize, Serialize};
use url::Url;

/// Largest object that can be drained into a single buffer (2^31 - 1 bytes).
pub const MAX_BUFFER: usize = i32::MAX as usize;

/// What the store declares about an object before its content is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Declared content length. Stores may omit it or report nonsense.
    pub size_in_bytes: Option<i64>,
}

impl ObjectMetadata {
    pub fn new(size_in_bytes: i64) -> Self {
        Self {
            size_in_bytes: Some(size_in_bytes),
        }
    }

    /// Metadata without a declared size.
    pub fn without_size() -> Self {
        Self {
            size_in_bytes: None,
        }
    }

    /// The declared size as a buffer length, if it lies in `1..=ceiling`.
    ///
    /// `ceiling` is clamped to [`MAX_BUFFER`].
    pub fn buffer_len(&self, ceiling: usize) -> Option<usize> {
        let ceiling = ceiling.min(MAX_BUFFER);
        let size = self.size_in_bytes?;
        if size <= 0 {
            return None;
        }
        usize::try_from(size).ok().filter(|len| *len <= ceiling)
    }
}

/// Provenance of an artifact's bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOrigin {
    /// Location the bytes came from, when the store can express one.
    pub url: Option<Url>,
}

impl CodeOrigin {
    pub fn new(url: Option<Url>) -> Self {
        Self { url }
    }

    pub fn unknown() -> Self {
        Self { url: None }
    }
}

/// Fully drained artifact bytes together with their provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedArtifact {
    name: String,
    bytes: Vec<u8>,
    origin: CodeOrigin,
}

impl MaterializedArtifact {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, origin: CodeOrigin) -> Self {
        Self {
            name: name.into(),
            bytes,
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn origin(&self) -> &CodeOrigin {
        &self.origin
    }

    /// Take ownership of the parts.
    pub fn into_parts(self) -> (String, Vec<u8>, CodeOrigin) {
        (self.name, self.bytes, self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), Some(1))]
    #[case(Some(42), Some(42))]
    #[case(Some(i32::MAX as i64), Some(MAX_BUFFER))]
    #[case(Some(0), None)]
    #[case(Some(-1), None)]
    #[case(Some(i32::MAX as i64 + 1), None)]
    #[case(Some(i64::MAX), None)]
    #[case(None, None)]
    fn test_buffer_len_bounds(#[case] size: Option<i64>, #[case] expected: Option<usize>) {
        let metadata = ObjectMetadata {
            size_in_bytes: size,
        };
        assert_eq!(metadata.buffer_len(MAX_BUFFER), expected);
    }

    #[test]
    fn test_without_size_is_rejected() {
        let metadata = ObjectMetadata::without_size();
        assert_eq!(metadata.size_in_bytes, None);
        assert_eq!(metadata.buffer_len(MAX_BUFFER), None);
    }

    #[test]
    fn test_buffer_len_ceiling_is_clamped() {
        let metadata = ObjectMetadata::new(i32::MAX as i64 + 1);
        assert_eq!(metadata.buffer_len(usize::MAX), None);

        let metadata = ObjectMetadata::new(16);
        assert_eq!(metadata.buffer_len(8), None);
        assert_eq!(metadata.buffer_len(16), Some(16));
    }

    #[test]
    fn test_artifact_parts() {
        let url = Url::parse("https://classes.s3.amazonaws.com/").unwrap();
        let artifact =
            MaterializedArtifact::new("a.B", vec![0xca, 0xfe], CodeOrigin::new(Some(url.clone())));
        assert_eq!(artifact.name(), "a.B");
        assert_eq!(artifact.len(), 2);
        assert!(!artifact.is_empty());
        assert_eq!(artifact.origin().url.as_ref(), Some(&url));

        let (name, bytes, origin) = artifact.into_parts();
        assert_eq!(name, "a.B");
        assert_eq!(bytes, vec![0xca, 0xfe]);
        assert_eq!(origin, CodeOrigin::new(Some(url)));
    }
}
