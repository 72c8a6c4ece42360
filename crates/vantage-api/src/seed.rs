//! Demo accounts for local development.
//!
//! Creates one identity record per demo account (password [`DEMO_PASSWORD`])
//! and overwrites its profile document. Safe to run repeatedly: accounts
//! that already exist are left as they are.

use vantage_auth::{AuthError, IdentityProvider, NewAccount};
use vantage_core::{ProfileDocument, Role, Status};
use vantage_storage::ProfileStore;

/// Password given to every demo account.
pub const DEMO_PASSWORD: &str = "password";

/// One demo account.
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    /// Fixed uid.
    pub uid: &'static str,
    /// Sign-in email.
    pub email: &'static str,
    /// Profile role.
    pub role: Role,
    /// Profile status.
    pub status: Status,
}

impl DemoAccount {
    fn profile(&self) -> ProfileDocument {
        ProfileDocument {
            uid: self.uid.to_string(),
            email: Some(self.email.to_string()),
            role: Some(self.role),
            status: Some(self.status),
            created_at: None,
        }
    }
}

/// The demo accounts: one per role, plus a pending investor and an
/// inactive founder.
pub const DEMO_ACCOUNTS: [DemoAccount; 5] = [
    DemoAccount {
        uid: "admin-user-01",
        email: "admin@example.com",
        role: Role::Admin,
        status: Status::Active,
    },
    DemoAccount {
        uid: "investor-user-01",
        email: "investor1@example.com",
        role: Role::Consumer,
        status: Status::Active,
    },
    DemoAccount {
        uid: "investor-user-02",
        email: "investor2@example.com",
        role: Role::Consumer,
        status: Status::Pending,
    },
    DemoAccount {
        uid: "founder-user-01",
        email: "founder1@example.com",
        role: Role::Producer,
        status: Status::Active,
    },
    DemoAccount {
        uid: "founder-user-02",
        email: "founder2@example.com",
        role: Role::Producer,
        status: Status::Inactive,
    },
];

/// What happened to one account's identity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountOutcome {
    /// Newly created.
    Created,
    /// The email was already registered.
    AlreadyExists,
    /// The provider refused; the message says why.
    Failed(String),
}

/// Result of seeding one demo account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    /// Demo account uid.
    pub uid: &'static str,
    /// Identity record outcome.
    pub account: AccountOutcome,
    /// Profile write failure, if any.
    pub profile_error: Option<String>,
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// One entry per demo account, in order.
    pub entries: Vec<SeedEntry>,
}

impl SeedReport {
    /// Whether every account exists and every profile was written.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|e| {
            !matches!(e.account, AccountOutcome::Failed(_)) && e.profile_error.is_none()
        })
    }
}

/// Seed the demo accounts and their profiles.
pub async fn seed(identity: &dyn IdentityProvider, profiles: &dyn ProfileStore) -> SeedReport {
    let mut report = SeedReport::default();

    for demo in &DEMO_ACCOUNTS {
        let account = match identity
            .create_account(NewAccount {
                uid: Some(demo.uid.to_string()),
                email: demo.email.to_string(),
                password: DEMO_PASSWORD.to_string(),
                email_verified: true,
            })
            .await
        {
            Ok(_) => {
                tracing::info!(email = demo.email, "Created demo account");
                AccountOutcome::Created
            }
            Err(AuthError::EmailAlreadyExists(_)) => {
                tracing::info!(email = demo.email, "Demo account already exists");
                AccountOutcome::AlreadyExists
            }
            Err(e) => {
                tracing::error!(email = demo.email, error = %e, "Failed to create demo account");
                AccountOutcome::Failed(e.to_string())
            }
        };

        let profile_error = match profiles.set(&demo.profile()).await {
            Ok(()) => {
                tracing::info!(uid = demo.uid, "Wrote demo profile");
                None
            }
            Err(e) => {
                tracing::error!(uid = demo.uid, error = %e, "Failed to write demo profile");
                Some(e.to_string())
            }
        };

        report.entries.push(SeedEntry {
            uid: demo.uid,
            account,
            profile_error,
        });
    }

    report
}
