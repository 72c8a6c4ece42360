//! Which roles may reach which routes.

use std::sync::Arc;

use vantage_acl::Guard;
use vantage_core::Role;
use vantage_storage::ProfileStore;

/// The guards used by the resource routes.
#[derive(Clone)]
pub struct Policy {
    /// Startup listing and detail, memos.
    pub investor_or_admin: Guard,
    /// Startup submission and the founder dashboard.
    pub founder: Guard,
}

impl Policy {
    /// Build every guard over one profile store.
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            investor_or_admin: Guard::new(profiles.clone(), [Role::Admin, Role::Consumer]),
            founder: Guard::new(profiles, [Role::Producer]),
        }
    }
}
