use storyfeed_feed::FeedError;
use storyfeed_identity::ResolveError;
use storyfeed_storage::StorageError;

/// How a pipeline failure should be reported to a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The thing asked for does not exist (HTTP 404).
    NotFound,
    /// Something upstream broke (HTTP 500).
    Upstream,
}

/// Errors from the aggregation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Handle did not resolve, or the lookup failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A bucket resource could not be fetched.
    #[error("{handle} {source}")]
    Fetch {
        handle: String,
        #[source]
        source: StorageError,
    },

    /// The collection has no story with this id.
    #[error("{handle} has no story {story_id}")]
    StoryNotFound { handle: String, story_id: String },

    /// Feed serialization failed.
    #[error("failed to build feed for {handle}: {source}")]
    Feed {
        handle: String,
        #[source]
        source: FeedError,
    },
}

impl PipelineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Resolve(e) if e.is_not_found() => ErrorClass::NotFound,
            Self::StoryNotFound { .. } => ErrorClass::NotFound,
            _ => ErrorClass::Upstream,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
