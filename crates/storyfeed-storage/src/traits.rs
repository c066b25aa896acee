use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageResult;

/// Status code and body of one bucket read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(404, Bytes::new())
    }
}

/// Raw GET against a bucket URL.
///
/// Non-success statuses are returned as responses, not errors; only
/// transport failures are `Err`.
#[async_trait]
pub trait StorageFetch: Send + Sync {
    async fn get(&self, url: &str) -> StorageResult<FetchResponse>;
}
