//! Server configuration.
//!
//! Settings come from an optional TOML file, then from command-line flags
//! and environment variables, later sources winning:
//!
//! ```toml
//! bind = "0.0.0.0:8000"
//! backend = "firebase"
//!
//! [firebase]
//! project_id = "my-project"
//! credentials = "/secrets/service-account.json"
//!
//! [cors]
//! allowed_origins = ["http://localhost:3000"]
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Which identity provider and document store to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Firebase Authentication and Cloud Firestore (or their emulators).
    #[default]
    Firebase,
    /// In-process provider and store; nothing survives a restart.
    Memory,
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listen address.
    pub bind: SocketAddr,
    /// Backend selection.
    pub backend: Backend,
    /// Firebase settings; required when `backend = "firebase"`.
    pub firebase: FirebaseConfig,
    /// Cross-origin settings.
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            backend: Backend::default(),
            firebase: FirebaseConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

/// Firebase project and endpoint settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirebaseConfig {
    /// Firebase / Google Cloud project id.
    pub project_id: Option<String>,
    /// Service account key file. Application Default Credentials otherwise.
    pub credentials: Option<PathBuf>,
    /// Firestore database name; `(default)` when unset.
    pub database: Option<String>,
    /// Firebase Auth emulator `host:port`.
    pub auth_emulator_host: Option<String>,
    /// Firestore emulator `host:port`.
    pub firestore_emulator_host: Option<String>,
    /// Identity Toolkit endpoint root override.
    pub identity_toolkit_url: Option<String>,
    /// Firestore endpoint root override.
    pub firestore_url: Option<String>,
    /// Signing-key (JWKS) URL override.
    pub jwks_url: Option<String>,
}

impl FirebaseConfig {
    /// Whether both services run against emulators, so no real credentials
    /// are needed.
    pub fn fully_emulated(&self) -> bool {
        self.auth_emulator_host.is_some() && self.firestore_emulator_host.is_some()
    }
}

/// Cross-origin resource sharing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Command-line and environment overrides, shared by every Vantage binary.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Configuration file (TOML)
    #[arg(short, long, env = "VANTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "VANTAGE_BIND")]
    pub bind: Option<SocketAddr>,

    /// Backend to run against
    #[arg(long, env = "VANTAGE_BACKEND", value_enum)]
    pub backend: Option<Backend>,

    /// Firebase project id
    #[arg(long, env = "FIREBASE_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Service account key file
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Firebase Auth emulator host:port
    #[arg(long, env = "FIREBASE_AUTH_EMULATOR_HOST")]
    pub auth_emulator_host: Option<String>,

    /// Firestore emulator host:port
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    pub firestore_emulator_host: Option<String>,

    /// Allowed CORS origin (repeatable, or comma-separated)
    #[arg(long = "cors-origin", env = "VANTAGE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

/// Configuration errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`].
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// A required setting is missing.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting has an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Setting name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Google credentials could not be loaded.
    #[error("Credentials error: {0}")]
    Credentials(#[from] vantage_gcp_auth::Error),
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve the configuration: file (if any), then overrides, then
    /// validation.
    pub fn load(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line / environment overrides.
    pub fn apply(&mut self, args: &ConfigArgs) {
        if let Some(bind) = args.bind {
            self.bind = bind;
        }
        if let Some(backend) = args.backend {
            self.backend = backend;
        }
        let firebase = &mut self.firebase;
        override_with(&mut firebase.project_id, &args.project_id);
        override_with(&mut firebase.credentials, &args.credentials);
        override_with(&mut firebase.auth_emulator_host, &args.auth_emulator_host);
        override_with(
            &mut firebase.firestore_emulator_host,
            &args.firestore_emulator_host,
        );
        if !args.cors_origins.is_empty() {
            self.cors.allowed_origins = args
                .cors_origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
    }

    /// Check settings that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == Backend::Firebase {
            match self.firebase.project_id.as_deref() {
                None => return Err(ConfigError::Missing("firebase.project_id")),
                Some(p) if p.trim().is_empty() => {
                    return Err(ConfigError::Invalid {
                        field: "firebase.project_id",
                        reason: "must not be empty".to_string(),
                    });
                }
                Some(_) => {}
            }
        }
        self.cors.header_values()?;
        Ok(())
    }
}

impl CorsConfig {
    /// Allowed origins as header values; `None` means any origin.
    pub fn header_values(&self) -> Result<Option<Vec<HeaderValue>>, ConfigError> {
        if self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*") {
            return Ok(None);
        }
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                    field: "cors.allowed_origins",
                    reason: format!("{origin:?}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn override_with<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}
