use std::sync::Arc;

use storyfeed_types::Profile;

use crate::error::{IdentityError, NotFoundReason, ResolveError};
use crate::traits::IdentityLookup;

/// A handle resolved to the bucket this application writes to.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub profile: Profile,
    pub bucket_url: String,
}

/// Turns a handle into a profile plus bucket URL for one application origin.
#[derive(Clone)]
pub struct HandleResolver {
    lookup: Arc<dyn IdentityLookup>,
}

impl HandleResolver {
    pub fn new(lookup: Arc<dyn IdentityLookup>) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, handle: &str, app_origin: &str) -> Result<Resolved, ResolveError> {
        if !is_valid_handle(handle) {
            return Err(ResolveError::not_found(handle, NotFoundReason::UnknownHandle));
        }

        let profile = match self.lookup.lookup(handle).await {
            Ok(profile) => profile,
            Err(IdentityError::NameNotFound) => {
                return Err(ResolveError::not_found(handle, NotFoundReason::UnknownHandle));
            }
            Err(source) => {
                return Err(ResolveError::Lookup {
                    handle: handle.to_string(),
                    source,
                });
            }
        };

        let Some(bucket_url) = profile.bucket_for(app_origin).map(str::to_string) else {
            tracing::debug!(handle, app_origin, "profile has no bucket for this origin");
            return Err(ResolveError::not_found(handle, NotFoundReason::AppNotRegistered));
        };

        Ok(Resolved {
            profile,
            bucket_url,
        })
    }
}

impl std::fmt::Debug for HandleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleResolver").finish_non_exhaustive()
    }
}

// Handles end up in a URL path; only name characters pass.
fn is_valid_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle.len() <= 256
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryIdentityLookup;

    const ORIGIN: &str = "https://app.example.io";

    fn resolver() -> HandleResolver {
        let lookup = InMemoryIdentityLookup::new()
            .with_profile(
                "alice.id",
                Profile::default().with_app(ORIGIN, "https://hub.example/alice/"),
            )
            .with_profile(
                "bob.id",
                Profile::default().with_app("https://other.app", "https://hub.example/bob/"),
            );
        lookup.fail_with("broken.id", "timeout");
        HandleResolver::new(Arc::new(lookup))
    }

    #[tokio::test]
    async fn resolves_registered_app() {
        let resolved = resolver().resolve("alice.id", ORIGIN).await.unwrap();
        assert_eq!(resolved.bucket_url, "https://hub.example/alice/");
    }

    #[tokio::test]
    async fn origin_trailing_slash_is_ignored() {
        let resolved = resolver()
            .resolve("alice.id", &format!("{ORIGIN}/"))
            .await
            .unwrap();
        assert_eq!(resolved.bucket_url, "https://hub.example/alice/");
    }

    #[tokio::test]
    async fn unknown_handle() {
        let err = resolver().resolve("ghost", ORIGIN).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NotFound {
                reason: NotFoundReason::UnknownHandle,
                ..
            }
        ));
        assert_eq!(err.to_string(), "ghost not found");
    }

    #[tokio::test]
    async fn app_not_registered() {
        let err = resolver().resolve("bob.id", ORIGIN).await.unwrap_err();
        assert_eq!(err.to_string(), "bob.id is not using the app");
    }

    #[tokio::test]
    async fn lookup_failure_is_not_not_found() {
        let err = resolver().resolve("broken.id", ORIGIN).await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "identity lookup returned error: timeout");
    }

    #[tokio::test]
    async fn invalid_handles_never_reach_lookup() {
        for handle in ["", "a/b", "../etc", "a?b", "a b"] {
            let err = resolver().resolve(handle, ORIGIN).await.unwrap_err();
            assert!(err.is_not_found(), "{handle:?}");
        }
    }
}
