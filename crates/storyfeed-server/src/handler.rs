use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use storyfeed_pipeline::StoryView;

use crate::error::ServerResult;
use crate::state::AppState;

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "storyfeed",
        "version": env!("CARGO_PKG_VERSION"),
        "app_origin": state.app_origin,
        "renderer": state.pipeline.renderer().sanitizer().provider(),
    }))
}

/// `GET /api/feed/:handle` -- RSS 2.0 for the handle's public stories.
pub async fn feed_handler(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
) -> ServerResult<Response> {
    let origin = state.origin(&headers)?;
    let rss = state.pipeline.feed_rss(&handle, &origin).await?;
    Ok(([(CONTENT_TYPE, storyfeed_feed::CONTENT_TYPE)], rss).into_response())
}

/// `GET /api/stories/:handle/:story_id` -- one story with sanitized HTML.
pub async fn story_handler(
    State(state): State<AppState>,
    Path((handle, story_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ServerResult<Json<StoryView>> {
    let origin = state.origin(&headers)?;
    let view = state.pipeline.story_view(&handle, &story_id, &origin).await?;
    Ok(Json(view))
}
