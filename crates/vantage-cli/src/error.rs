//! Error types for vantage-cli

use thiserror::Error;

/// Result type alias for vantage-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vantage-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration could not be resolved or backends could not be built.
    #[error("Configuration error: {0}")]
    Config(#[from] vantage_api::ConfigError),

    /// The resolved configuration could not be rendered.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// Some demo accounts or profiles could not be written.
    #[error("Seeding incomplete: {0} of {1} accounts failed")]
    SeedIncomplete(usize, usize),
}
