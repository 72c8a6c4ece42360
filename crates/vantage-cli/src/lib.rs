//! # vantage-cli
//!
//! Admin CLI for Vantage.
//!
//! - `vantage seed`: create the demo accounts and their profiles
//! - `vantage config show`: print the resolved configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Command, ConfigAction};
pub use error::{Error, Result};
