//! Naming-service client over HTTP.
//!
//! Queries `GET {base}/v1/users/{handle}`, which answers with
//! `{ "<handle>": { "profile": { ... } } }` for a known name and with a 404 or
//! `{ "error": "Name not found" }` for an unknown one.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use storyfeed_types::Profile;

use crate::error::{IdentityError, IdentityResult};
use crate::traits::IdentityLookup;

/// Message the naming service uses for unknown names.
const NAME_NOT_FOUND: &str = "Name not found";

/// HTTP client for a naming service.
#[derive(Clone, Debug)]
pub struct HttpIdentityLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityLookup {
    /// Create a lookup against `base_url`, e.g. `https://core.blockstack.org`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (shared pool and timeout).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create a lookup with its own client and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> IdentityResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, handle: &str) -> String {
        format!("{}/v1/users/{}", self.base_url, handle)
    }
}

#[async_trait]
impl IdentityLookup for HttpIdentityLookup {
    async fn lookup(&self, handle: &str) -> IdentityResult<Profile> {
        let url = self.user_url(handle);
        tracing::debug!(%url, "looking up profile");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IdentityError::NameNotFound);
        }

        // Error payloads come with a JSON body on any status; read it first.
        let body = response.bytes().await?;
        let value: Option<Value> = serde_json::from_slice(&body).ok();
        if let Some(message) = value.as_ref().and_then(error_message) {
            return Err(classify_error(message));
        }
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        let value = value.ok_or_else(|| IdentityError::Decode("body is not JSON".into()))?;
        profile_from_response(handle, value)
    }
}

fn error_message(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}

fn classify_error(message: &str) -> IdentityError {
    if message == NAME_NOT_FOUND {
        IdentityError::NameNotFound
    } else {
        IdentityError::Lookup(message.to_string())
    }
}

/// Extract the profile for `handle` from a naming-service response body.
pub(crate) fn profile_from_response(handle: &str, mut value: Value) -> IdentityResult<Profile> {
    if let Some(message) = error_message(&value) {
        return Err(classify_error(message));
    }
    let entry = value
        .get_mut(handle)
        .map(Value::take)
        .ok_or(IdentityError::NameNotFound)?;
    let profile = match entry {
        Value::Object(mut map) => map.remove("profile").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    if profile.is_null() {
        // Registered name with no published profile: nothing to resolve.
        return Ok(Profile::default());
    }
    serde_json::from_value(profile).map_err(|e| IdentityError::Decode(e.to_string()))
}
