/// Errors from feed assembly and serialization.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A channel field RSS requires is empty.
    #[error("feed is missing required field `{0}`")]
    MissingField(&'static str),

    /// Writing to the output buffer failed.
    #[error("feed serialization failed")]
    Write(#[from] std::fmt::Error),
}

/// Result alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
