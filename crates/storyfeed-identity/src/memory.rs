use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use storyfeed_types::Profile;

use crate::error::{IdentityError, IdentityResult};
use crate::traits::IdentityLookup;

/// In-memory identity lookup.
///
/// Intended for tests and embedding. Handles map either to a profile or to a
/// canned failure message; anything else is `NameNotFound`.
pub struct InMemoryIdentityLookup {
    profiles: RwLock<HashMap<String, Profile>>,
    failures: RwLock<HashMap<String, String>>,
}

impl InMemoryIdentityLookup {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_profile(self, handle: impl Into<String>, profile: Profile) -> Self {
        self.insert(handle, profile);
        self
    }

    /// Register or replace the profile for `handle`.
    pub fn insert(&self, handle: impl Into<String>, profile: Profile) {
        self.profiles
            .write()
            .expect("lock poisoned")
            .insert(handle.into(), profile);
    }

    /// Make lookups of `handle` fail with `message`.
    pub fn fail_with(&self, handle: impl Into<String>, message: impl Into<String>) {
        self.failures
            .write()
            .expect("lock poisoned")
            .insert(handle.into(), message.into());
    }

    pub fn len(&self) -> usize {
        self.profiles.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryIdentityLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityLookup for InMemoryIdentityLookup {
    async fn lookup(&self, handle: &str) -> IdentityResult<Profile> {
        if let Some(message) = self.failures.read().expect("lock poisoned").get(handle) {
            return Err(IdentityError::Lookup(message.clone()));
        }
        self.profiles
            .read()
            .expect("lock poisoned")
            .get(handle)
            .cloned()
            .ok_or(IdentityError::NameNotFound)
    }
}
