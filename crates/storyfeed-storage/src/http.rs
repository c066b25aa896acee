use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageResult;
use crate::traits::{FetchResponse, StorageFetch};

/// Bucket reads over HTTP.
#[derive(Clone, Debug, Default)]
pub struct HttpStorage {
    client: reqwest::Client,
}

impl HttpStorage {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Reuse an existing [`reqwest::Client`] (shared pool and timeout).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> StorageResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }
}

#[async_trait]
impl StorageFetch for HttpStorage {
    async fn get(&self, url: &str) -> StorageResult<FetchResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        // Only a 200 body is ever looked at.
        let body = if status == 200 {
            response.bytes().await?
        } else {
            Bytes::new()
        };
        tracing::debug!(url, status, bytes = body.len(), "bucket read");
        Ok(FetchResponse { status, body })
    }
}
