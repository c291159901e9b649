//! Error types for artifact resolution.

use thiserror::Error;

/// Result type for artifact resolution.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Why an artifact name was rejected before any store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// The name was empty
    #[error("name is empty")]
    Empty,

    /// The first character cannot start an identifier
    #[error("name starts with {0:?}, which cannot start an identifier")]
    InvalidStart(char),
}

/// Failures reported by a remote store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status other than "not found"
    #[error("HTTP error: {status} - {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Connectivity, TLS or request construction failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failure while reading the object content
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store or its stream broke the transfer contract
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Failures of a single artifact resolution.
///
/// Callers usually only need [`FetchError::is_not_found`]: host loaders fall
/// through to another resolver on "not found" and treat everything else as a
/// hard failure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The caller supplied a name that can never be resolved
    #[error("Invalid artifact name {name:?}: {reason}")]
    InvalidName {
        /// Offending name
        name: String,
        /// Why it was rejected
        reason: NameError,
    },

    /// The translator produced no request for the name
    #[error("No fetch request could be computed for {0}")]
    UnresolvableRequest(String),

    /// The store holds no object at the computed location
    #[error("Artifact not found: {name} (s3://{bucket}/{key})")]
    NotFound {
        /// Artifact name
        name: String,
        /// Bucket that was queried
        bucket: String,
        /// Key that was queried
        key: String,
    },

    /// The declared size is missing, non-positive or too large to buffer
    #[error("Invalid declared size for {name}: {}", display_size(.size))]
    InvalidSize {
        /// Artifact name
        name: String,
        /// Size reported by the store, if any
        size: Option<i64>,
    },

    /// The content stream ended before the declared size was reached
    #[error("Truncated transfer for {name}: expected {expected} bytes, received {received}")]
    TruncatedTransfer {
        /// Artifact name
        name: String,
        /// Declared size
        expected: usize,
        /// Bytes received before end of stream
        received: usize,
    },

    /// The store client failed
    #[error("Store error while fetching {name}: {source}")]
    Store {
        /// Artifact name
        name: String,
        /// Underlying cause
        #[source]
        source: StoreError,
    },
}

impl FetchError {
    /// Whether this failure means "nothing to load here" rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FetchError::UnresolvableRequest(_) | FetchError::NotFound { .. }
        )
    }

    /// Name of the artifact the failure belongs to.
    pub fn name(&self) -> &str {
        match self {
            FetchError::InvalidName { name, .. }
            | FetchError::UnresolvableRequest(name)
            | FetchError::NotFound { name, .. }
            | FetchError::InvalidSize { name, .. }
            | FetchError::TruncatedTransfer { name, .. }
            | FetchError::Store { name, .. } => name,
        }
    }

    /// Wrap a store failure for `name`.
    pub fn store(name: &str, source: impl Into<StoreError>) -> Self {
        FetchError::Store {
            name: name.to_string(),
            source: source.into(),
        }
    }
}

fn display_size(size: &Option<i64>) -> String {
    match size {
        Some(size) => size.to_string(),
        None => "absent".to_string(),
    }
}
