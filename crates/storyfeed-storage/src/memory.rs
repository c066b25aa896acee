use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::error::{StorageError, StorageResult};
use crate::traits::{FetchResponse, StorageFetch};

/// In-memory bucket.
///
/// Intended for tests and embedding. Responses are keyed by full URL;
/// unknown URLs answer 404.
pub struct InMemoryStorage {
    responses: RwLock<HashMap<String, FetchResponse>>,
    failures: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Serve `value` as a 200 JSON body at `url`.
    pub fn put_json(&self, url: impl Into<String>, value: &Value) {
        self.put(url, FetchResponse::new(200, value.to_string()));
    }

    /// Serve a bare status (empty body) at `url`.
    pub fn put_status(&self, url: impl Into<String>, status: u16) {
        self.put(url, FetchResponse::new(status, Bytes::new()));
    }

    pub fn put(&self, url: impl Into<String>, response: FetchResponse) {
        self.responses
            .write()
            .expect("lock poisoned")
            .insert(url.into(), response);
    }

    /// Make reads of `url` fail at the transport level.
    pub fn fail_with(&self, url: impl Into<String>, message: impl Into<String>) {
        self.failures
            .write()
            .expect("lock poisoned")
            .insert(url.into(), message.into());
    }

    pub fn len(&self) -> usize {
        self.responses.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageFetch for InMemoryStorage {
    async fn get(&self, url: &str) -> StorageResult<FetchResponse> {
        if let Some(message) = self.failures.read().expect("lock poisoned").get(url) {
            return Err(StorageError::Backend(message.clone()));
        }
        Ok(self
            .responses
            .read()
            .expect("lock poisoned")
            .get(url)
            .cloned()
            .unwrap_or_else(FetchResponse::not_found))
    }
}
