use std::fmt;

/// Errors from an identity lookup backend.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The naming service does not know this name.
    #[error("Name not found")]
    NameNotFound,

    /// The naming service answered with an error of its own.
    #[error("{0}")]
    Lookup(String),

    /// The naming service returned an unexpected status code.
    #[error("naming service returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected shape.
    #[error("malformed naming service response: {0}")]
    Decode(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result alias for lookup operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Why a handle did not resolve to a bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotFoundReason {
    UnknownHandle,
    AppNotRegistered,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHandle => f.write_str("not found"),
            Self::AppNotRegistered => f.write_str("is not using the app"),
        }
    }
}

/// Errors from [`HandleResolver::resolve`](crate::HandleResolver::resolve).
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Rendered as `"{handle} not found"` or `"{handle} is not using the app"`.
    #[error("{handle} {reason}")]
    NotFound {
        handle: String,
        reason: NotFoundReason,
    },

    /// Any other lookup failure.
    #[error("identity lookup returned error: {source}")]
    Lookup {
        handle: String,
        #[source]
        source: IdentityError,
    },
}

impl ResolveError {
    pub fn not_found(handle: &str, reason: NotFoundReason) -> Self {
        Self::NotFound {
            handle: handle.to_string(),
            reason,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn handle(&self) -> &str {
        match self {
            Self::NotFound { handle, .. } | Self::Lookup { handle, .. } => handle,
        }
    }
}
