use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageFetch;

/// The bucket resources the pipeline reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    PublicStories,
    Settings,
}

impl Resource {
    /// File name under the bucket prefix.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::PublicStories => "publicStories.json",
            Self::Settings => "settings.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicStories => f.write_str("public stories"),
            Self::Settings => f.write_str("settings"),
        }
    }
}

/// URL of `resource` under `bucket_url`. The bucket URL is treated as a
/// directory whether or not it ends in `/`.
pub fn resource_url(bucket_url: &str, resource: Resource) -> StorageResult<Url> {
    let invalid = |reason: String| StorageError::BucketUrl {
        url: bucket_url.to_string(),
        reason,
    };
    let mut base = Url::parse(bucket_url).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("not a hierarchical url".into()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(resource.file_name())
        .map_err(|e| invalid(e.to_string()))
}

/// Raw payloads of both resources. `None` means the resource does not exist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fetched {
    pub stories_raw: Option<Value>,
    pub settings_raw: Option<Value>,
}

/// Fetches a bucket's resources concurrently.
#[derive(Clone)]
pub struct ContentFetcher {
    storage: Arc<dyn StorageFetch>,
}

impl ContentFetcher {
    pub fn new(storage: Arc<dyn StorageFetch>) -> Self {
        Self { storage }
    }

    /// Fetch `publicStories.json` and `settings.json` under `bucket_url`.
    ///
    /// Both reads run concurrently and both complete before this returns. The
    /// stories error is reported first when both fail.
    pub async fn fetch_all(&self, bucket_url: &str) -> StorageResult<Fetched> {
        let (stories, settings) = tokio::join!(
            self.fetch(bucket_url, Resource::PublicStories),
            self.fetch(bucket_url, Resource::Settings),
        );
        Ok(Fetched {
            stories_raw: stories?,
            settings_raw: settings?,
        })
    }

    /// Fetch one resource: 200 parses, 404 is absent, other statuses fail.
    /// A 200 body that is not JSON is treated as absent.
    pub async fn fetch(
        &self,
        bucket_url: &str,
        resource: Resource,
    ) -> StorageResult<Option<Value>> {
        let url = resource_url(bucket_url, resource)?;
        let response = self.storage.get(url.as_str()).await?;
        match response.status {
            200 => match serde_json::from_slice(&response.body) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    tracing::warn!(
                        %url,
                        %resource,
                        error = %e,
                        "stored resource is not JSON, ignoring"
                    );
                    Ok(None)
                }
            },
            404 => {
                tracing::debug!(%url, "resource absent");
                Ok(None)
            }
            status => Err(StorageError::Status { resource, status }),
        }
    }
}

impl fmt::Debug for ContentFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentFetcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStorage;
    use crate::traits::FetchResponse;
    use serde_json::json;

    const BUCKET: &str = "https://hub.example/alice/";

    fn fetcher(storage: InMemoryStorage) -> ContentFetcher {
        ContentFetcher::new(Arc::new(storage))
    }

    #[test]
    fn urls_get_a_separator() {
        assert_eq!(
            resource_url("https://hub.example/alice/", Resource::PublicStories)
                .unwrap()
                .as_str(),
            "https://hub.example/alice/publicStories.json"
        );
        assert_eq!(
            resource_url("https://hub.example/alice", Resource::Settings)
                .unwrap()
                .as_str(),
            "https://hub.example/alice/settings.json"
        );
        assert_eq!(
            resource_url("https://hub.example", Resource::Settings)
                .unwrap()
                .as_str(),
            "https://hub.example/settings.json"
        );
    }

    #[test]
    fn unparsable_bucket_url_is_rejected() {
        let err = resource_url("not a url", Resource::Settings).unwrap_err();
        assert!(matches!(err, StorageError::BucketUrl { .. }));
        assert!(resource_url("mailto:alice@hub.example", Resource::Settings).is_err());
    }

    #[tokio::test]
    async fn both_present() {
        let storage = InMemoryStorage::new();
        storage.put_json(format!("{BUCKET}publicStories.json"), &json!([{ "id": "a" }]));
        storage.put_json(format!("{BUCKET}settings.json"), &json!({ "siteName": "A" }));

        let fetched = fetcher(storage).fetch_all(BUCKET).await.unwrap();
        assert_eq!(fetched.stories_raw, Some(json!([{ "id": "a" }])));
        assert_eq!(fetched.settings_raw, Some(json!({ "siteName": "A" })));
    }

    #[tokio::test]
    async fn both_absent() {
        let fetched = fetcher(InMemoryStorage::new()).fetch_all(BUCKET).await.unwrap();
        assert_eq!(fetched, Fetched::default());
    }

    #[tokio::test]
    async fn server_error_names_resource_and_status() {
        let storage = InMemoryStorage::new();
        storage.put_status(format!("{BUCKET}publicStories.json"), 500);
        storage.put_json(format!("{BUCKET}settings.json"), &json!({}));

        let err = fetcher(storage).fetch_all(BUCKET).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Status {
                resource: Resource::PublicStories,
                status: 500
            }
        ));
        assert_eq!(err.to_string(), "failed to fetch public stories with code 500");
    }

    #[tokio::test]
    async fn settings_failure_fails_request() {
        let storage = InMemoryStorage::new();
        storage.put_status(format!("{BUCKET}settings.json"), 403);
        let err = fetcher(storage).fetch_all(BUCKET).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to fetch settings with code 403");
    }

    #[tokio::test]
    async fn non_json_body_is_absent() {
        let storage = InMemoryStorage::new();
        storage.put(
            format!("{BUCKET}settings.json"),
            FetchResponse::new(200, "<html>oops</html>"),
        );
        let fetched = fetcher(storage).fetch_all(BUCKET).await.unwrap();
        assert_eq!(fetched.settings_raw, None);
    }

    #[tokio::test]
    async fn truncated_stories_file_is_absent() {
        let storage = InMemoryStorage::new();
        storage.put(
            format!("{BUCKET}publicStories.json"),
            FetchResponse::new(200, r#"{"stories": [{"id":"#),
        );
        storage.put_json(format!("{BUCKET}settings.json"), &json!({ "siteName": "A" }));

        let fetched = fetcher(storage).fetch_all(BUCKET).await.unwrap();
        assert_eq!(fetched.stories_raw, None);
        assert_eq!(fetched.settings_raw, Some(json!({ "siteName": "A" })));
    }
}
