//! # vantage-api
//!
//! HTTP API server for Vantage.
//!
//! This crate puts the access-control services on the wire:
//! - [`config`]: TOML file plus flag / environment overrides
//! - [`state`]: backend construction (Firebase or in-memory) and handler state
//! - [`routes`]: sign-up, sign-in and role-gated resource routes
//! - [`error`]: mapping of every failure to a status code and JSON body
//! - [`seed`]: demo accounts for local development

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod policy;
pub mod routes;
pub mod seed;
pub mod state;

pub use config::{Backend, Config, ConfigArgs, ConfigError};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Backends};

/// Build the full application over already-constructed backends.
pub fn app(backends: &Backends, config: &Config) -> Result<axum::Router, ConfigError> {
    routes::router(AppState::new(backends), &config.cors)
}
