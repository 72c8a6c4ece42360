//! Common test utilities for vantage-acl integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use vantage_acl::{Guard, SignInReconciler, SignUpService};
use vantage_auth::{IdentityProvider, MemoryIdentityProvider, NewAccount};
use vantage_core::{ClaimSet, ProfileDocument, Role, Status};
use vantage_storage::{DocumentStore, MemoryStore, ProfileRepository, ProfileStore};

/// In-memory identity provider and store, wired together.
pub struct TestHarness {
    /// Identity provider double.
    pub identity: Arc<MemoryIdentityProvider>,
    /// Raw document store behind `profiles`.
    pub store: Arc<MemoryStore>,
    /// Profile store used by the services under test.
    pub profiles: Arc<dyn ProfileStore>,
}

impl TestHarness {
    /// Empty provider and store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            identity: Arc::new(MemoryIdentityProvider::new()),
            profiles: Arc::new(ProfileRepository::new(store.clone())),
            store,
        }
    }

    /// Same identity provider and store, with a different profile store
    /// handed to the services.
    pub fn with_profiles(self, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles, ..self }
    }

    pub fn reconciler(&self) -> SignInReconciler {
        SignInReconciler::new(self.identity.clone(), self.profiles.clone())
    }

    pub fn sign_up_service(&self) -> SignUpService {
        SignUpService::new(self.identity.clone(), self.profiles.clone())
    }

    pub fn guard(&self, roles: &[Role]) -> Guard {
        Guard::new(self.profiles.clone(), roles.iter().copied())
    }

    /// Create an identity record and return claims for it.
    pub async fn account(&self, email: &str) -> ClaimSet {
        let uid = self
            .identity
            .create_account(NewAccount {
                email: email.to_string(),
                password: "password".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        ClaimSet::new(uid, Some(email.to_string()), 1_700_000_000)
    }

    /// Write a profile document directly.
    pub async fn put_profile(&self, uid: &str, role: Option<Role>, status: Option<Status>) {
        let profile = ProfileDocument {
            uid: uid.to_string(),
            email: None,
            role,
            status,
            created_at: None,
        };
        ProfileRepository::new(self.store.clone())
            .set(&profile)
            .await
            .unwrap();
    }

    /// Write a raw document into `users`, bypassing validation.
    pub async fn put_raw_profile(&self, uid: &str, data: Value) {
        self.store
            .set("users", uid, data.as_object().cloned().unwrap_or_default())
            .await
            .unwrap();
    }

    /// Load a profile through the validating repository.
    pub async fn profile(&self, uid: &str) -> Option<ProfileDocument> {
        ProfileRepository::new(self.store.clone())
            .get(uid)
            .await
            .unwrap()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Profile store that loses the first-sign-in race: the initial read sees
/// nothing, and by the time the create lands a concurrent sign-in has
/// already written `winner`.
pub struct RacingProfileStore {
    inner: ProfileRepository,
    winner: ProfileDocument,
    raced: AtomicBool,
}

impl RacingProfileStore {
    pub fn new(store: Arc<MemoryStore>, winner: ProfileDocument) -> Self {
        Self {
            inner: ProfileRepository::new(store),
            winner,
            raced: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ProfileStore for RacingProfileStore {
    async fn get(&self, uid: &str) -> vantage_storage::Result<Option<ProfileDocument>> {
        if !self.raced.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.get(uid).await
    }

    async fn create(&self, profile: &ProfileDocument) -> vantage_storage::Result<()> {
        self.inner.set(&self.winner).await?;
        self.raced.store(true, Ordering::SeqCst);
        self.inner.create(profile).await
    }

    async fn set(&self, profile: &ProfileDocument) -> vantage_storage::Result<()> {
        self.inner.set(profile).await
    }
}

/// Profile store whose every call fails.
pub struct FailingProfileStore;

fn unavailable() -> vantage_storage::Error {
    vantage_storage::Error::Backend {
        status: 503,
        message: "The service is currently unavailable.".to_string(),
    }
}

#[async_trait]
impl ProfileStore for FailingProfileStore {
    async fn get(&self, _uid: &str) -> vantage_storage::Result<Option<ProfileDocument>> {
        Err(unavailable())
    }

    async fn create(&self, _profile: &ProfileDocument) -> vantage_storage::Result<()> {
        Err(unavailable())
    }

    async fn set(&self, _profile: &ProfileDocument) -> vantage_storage::Result<()> {
        Err(unavailable())
    }
}
