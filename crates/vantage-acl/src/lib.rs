//! # vantage-acl
//!
//! Access control for Vantage.
//!
//! This crate holds every trust decision and every multi-step write that
//! spans the identity provider and the profile store:
//! - [`Guard`]: role and status gate over the current profile document
//! - [`SignInReconciler`]: provisions a profile on first sign-in and keeps
//!   the role claim in step with it
//! - [`SignUpService`]: self-service account creation for self-assignable
//!   roles
//!
//! Collaborators are passed in as trait objects, so the same code runs
//! against Firebase and against the in-memory doubles.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod guard;
pub mod reconcile;
pub mod signup;

pub use error::{AuthzError, Denial, ReconcileError, SignUpError};
pub use guard::{ensure_owner, Guard};
pub use reconcile::{Reconciled, SignInReconciler};
pub use signup::{SignUpRequest, SignUpService, SignedUp};
