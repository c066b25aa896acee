use std::sync::Arc;

use storyfeed_identity::HttpIdentityLookup;
use storyfeed_pipeline::AggregationPipeline;
use storyfeed_render::Renderer;
use storyfeed_storage::HttpStorage;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// storyfeed HTTP server.
pub struct StoryfeedServer {
    config: ServerConfig,
    pipeline: AggregationPipeline,
}

impl StoryfeedServer {
    /// Server over the HTTP naming service and HTTP buckets named in
    /// `config`, sharing one client.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let pipeline = http_pipeline(&config)?;
        Ok(Self { config, pipeline })
    }

    /// Server over an already-built pipeline (in-memory backends, embedding).
    pub fn with_pipeline(config: ServerConfig, pipeline: AggregationPipeline) -> Self {
        Self { config, pipeline }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(
            self.pipeline.clone(),
            self.config.app_origin.clone(),
        ))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            naming_url = %self.config.naming_url,
            app_origin = ?self.config.app_origin,
            "storyfeed server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

/// The production pipeline: HTTP lookup, HTTP buckets, headless renderer.
pub fn http_pipeline(config: &ServerConfig) -> ServerResult<AggregationPipeline> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(concat!("storyfeed/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(AggregationPipeline::from_backends(
        Arc::new(HttpIdentityLookup::with_client(client.clone(), &config.naming_url)),
        Arc::new(HttpStorage::with_client(client)),
        Arc::new(Renderer::headless()),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = StoryfeedServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ServerConfig {
            request_timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(
            StoryfeedServer::new(config),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn router_builds() {
        let server = StoryfeedServer::new(ServerConfig::default()).unwrap();
        let _router = server.router();
    }
}
