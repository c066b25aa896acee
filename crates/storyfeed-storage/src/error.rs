use crate::fetcher::Resource;

/// Errors from bucket access.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The bucket answered with a status other than 200 or 404.
    #[error("failed to fetch {resource} with code {status}")]
    Status { resource: Resource, status: u16 },

    /// The profile's bucket URL does not parse.
    #[error("invalid bucket url {url:?}: {reason}")]
    BucketUrl { url: String, reason: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend failure that is not an HTTP error.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
