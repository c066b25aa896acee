use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use storyfeed_pipeline::{ErrorClass, PipelineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("cannot determine the application origin for this request")]
    MissingOrigin,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Pipeline(e) => match e.class() {
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MissingOrigin => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain-text bodies: the message for the caller, with upstream failures
/// also logged.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyfeed_identity::{NotFoundReason, ResolveError};

    #[test]
    fn not_found_maps_to_404() {
        let e = ServerError::from(PipelineError::from(ResolveError::not_found(
            "ghost",
            NotFoundReason::UnknownHandle,
        )));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_failures_map_to_500() {
        assert_eq!(
            ServerError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ServerError::MissingOrigin.status(), StatusCode::BAD_REQUEST);
    }
}
