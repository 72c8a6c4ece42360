//! Backends and shared application state.

use std::sync::Arc;

use vantage_acl::{SignInReconciler, SignUpService};
use vantage_auth::{IdentityProvider, MemoryIdentityProvider, TokenVerifier};
use vantage_auth_firebase::{FirebaseAdmin, FirebaseTokenVerifier};
use vantage_gcp_auth::{AccessTokenSource, ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource};
use vantage_storage::{
    DocumentStore, FirestoreStore, MemoryStore, ProfileRepository, ProfileStore,
};

use crate::config::{Backend, Config, ConfigError, FirebaseConfig};
use crate::policy::Policy;

/// The external collaborators every request path needs.
#[derive(Clone)]
pub struct Backends {
    /// Bearer-token verification.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Account creation and custom claims.
    pub identity: Arc<dyn IdentityProvider>,
    /// Profile and resource documents.
    pub documents: Arc<dyn DocumentStore>,
    /// The in-process provider when running the memory backend, for
    /// issuing local tokens.
    pub memory: Option<Arc<MemoryIdentityProvider>>,
}

impl Backends {
    /// Build the backends selected by the configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        match config.backend {
            Backend::Firebase => Self::firebase(&config.firebase),
            Backend::Memory => Ok(Self::memory()),
        }
    }

    /// Fresh in-process provider and store.
    pub fn memory() -> Self {
        let provider = Arc::new(MemoryIdentityProvider::new());
        Self {
            verifier: provider.clone(),
            identity: provider.clone(),
            documents: Arc::new(MemoryStore::new()),
            memory: Some(provider),
        }
    }

    /// Firebase Authentication and Firestore, honoring emulator hosts and
    /// endpoint overrides.
    pub fn firebase(config: &FirebaseConfig) -> Result<Self, ConfigError> {
        let project_id = config
            .project_id
            .clone()
            .ok_or(ConfigError::Missing("firebase.project_id"))?;
        let http = reqwest::Client::new();
        let tokens = token_source(config, http.clone())?;

        let mut admin = match &config.auth_emulator_host {
            Some(host) => {
                tracing::info!(host = %host, "Using the Firebase Auth emulator");
                FirebaseAdmin::emulator(host, &project_id, http.clone())
            }
            None => FirebaseAdmin::new(&project_id, http.clone(), tokens.clone()),
        };
        if let Some(url) = &config.identity_toolkit_url {
            admin = admin.with_base_url(url);
        }
        let admin = Arc::new(admin);

        let mut verifier = FirebaseTokenVerifier::new(admin.clone(), http.clone());
        if let Some(url) = &config.jwks_url {
            verifier = verifier.with_jwks_url(url);
        }

        let mut store = match &config.firestore_emulator_host {
            Some(host) => {
                tracing::info!(host = %host, "Using the Firestore emulator");
                FirestoreStore::emulator(host, &project_id, http)
            }
            None => FirestoreStore::new(&project_id, http, tokens),
        };
        if let Some(url) = &config.firestore_url {
            store = store.with_base_url(url);
        }
        if let Some(database) = &config.database {
            store = store.with_database(database);
        }

        tracing::info!(project_id = %project_id, "Firebase backends ready");
        Ok(Self {
            verifier: Arc::new(verifier),
            identity: admin,
            documents: Arc::new(store),
            memory: None,
        })
    }

    /// Profile documents over the configured store.
    pub fn profiles(&self) -> Arc<dyn ProfileStore> {
        Arc::new(ProfileRepository::new(self.documents.clone()))
    }
}

fn token_source(
    config: &FirebaseConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn AccessTokenSource>, ConfigError> {
    if config.fully_emulated() {
        return Ok(Arc::new(StaticTokenSource::emulator()));
    }
    match &config.credentials {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using service account credentials");
            let key = ServiceAccountKey::from_file(path)?;
            Ok(Arc::new(ServiceAccountTokenSource::new(key, http)))
        }
        None => Ok(vantage_gcp_auth::application_default(http)?),
    }
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Bearer-token verification, used by the auth layers.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Resource documents.
    pub documents: Arc<dyn DocumentStore>,
    /// First-sign-in provisioning and claim sync.
    pub reconciler: SignInReconciler,
    /// Self-service sign-up.
    pub signup: SignUpService,
    /// Route guards.
    pub policy: Policy,
}

impl AppState {
    /// Wire the services over the given backends.
    pub fn new(backends: &Backends) -> Self {
        let profiles = backends.profiles();
        Self {
            verifier: backends.verifier.clone(),
            documents: backends.documents.clone(),
            reconciler: SignInReconciler::new(backends.identity.clone(), profiles.clone()),
            signup: SignUpService::new(backends.identity.clone(), profiles.clone()),
            policy: Policy::new(profiles),
        }
    }
}
