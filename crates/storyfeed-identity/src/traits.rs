use async_trait::async_trait;
use storyfeed_types::Profile;

use crate::error::IdentityResult;

/// Naming-service capability: handle in, public profile out.
///
/// Implementations return [`IdentityError::NameNotFound`](crate::IdentityError::NameNotFound)
/// for names the service does not know, and another variant for every other
/// failure.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn lookup(&self, handle: &str) -> IdentityResult<Profile>;
}
