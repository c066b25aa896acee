/// Errors from decoding an encoded document tree.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The body is not valid JSON.
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON has neither a `document` nor a `nodes` member.
    #[error("document envelope not recognised")]
    UnknownEnvelope,

    /// The node list could not be decoded.
    #[error("malformed document nodes: {0}")]
    MalformedNodes(String),
}

/// Result alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
