//! In-process identity provider.
//!
//! Issues opaque random tokens and keeps accounts in memory. Used by the
//! `memory` backend for local development and as a test double; nothing
//! survives a restart.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::{Map, Value};
use vantage_core::ClaimSet;

use crate::{AuthError, AuthFuture, IdentityProvider, NewAccount, TokenVerifier};

#[derive(Debug, Clone)]
struct Account {
    email: String,
    custom: Map<String, Value>,
    disabled: bool,
    valid_since: i64,
}

#[derive(Debug, Clone)]
struct IssuedToken {
    uid: String,
    issued_at: i64,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, IssuedToken>,
    calls: usize,
}

/// Identity provider that lives entirely in process memory.
///
/// Issued tokens are never evicted. Verifying a token reports the account's
/// current custom claims, not the claims it had when the token was issued.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    state: RwLock<State>,
}

impl MemoryIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for an existing account, stamped with the current time.
    pub fn issue_token(&self, uid: &str) -> Result<String, AuthError> {
        self.issue_token_at(uid, Utc::now().timestamp())
    }

    /// Issue a token for an existing account with an explicit issue time.
    pub fn issue_token_at(&self, uid: &str, issued_at: i64) -> Result<String, AuthError> {
        let mut state = self.write()?;
        if !state.accounts.contains_key(uid) {
            return Err(AuthError::UserNotFound(uid.to_string()));
        }
        let token = uuid::Uuid::new_v4().simple().to_string();
        state.tokens.insert(
            token.clone(),
            IssuedToken {
                uid: uid.to_string(),
                issued_at,
            },
        );
        Ok(token)
    }

    /// Revoke every token issued before `at` (seconds since the epoch).
    pub fn revoke_tokens_at(&self, uid: &str, at: i64) -> Result<(), AuthError> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get_mut(uid)
            .ok_or_else(|| AuthError::UserNotFound(uid.to_string()))?;
        account.valid_since = at;
        Ok(())
    }

    /// Enable or disable an account.
    pub fn set_disabled(&self, uid: &str, disabled: bool) -> Result<(), AuthError> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get_mut(uid)
            .ok_or_else(|| AuthError::UserNotFound(uid.to_string()))?;
        account.disabled = disabled;
        Ok(())
    }

    /// Current custom claims of an account.
    pub fn custom_claims(&self, uid: &str) -> Option<Map<String, Value>> {
        let state = self.state.read().ok()?;
        state.accounts.get(uid).map(|a| a.custom.clone())
    }

    /// Number of account operations (create / set claims) served so far.
    pub fn call_count(&self) -> usize {
        self.state.read().map(|s| s.calls).unwrap_or(0)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, AuthError> {
        self.state
            .write()
            .map_err(|e| AuthError::Provider(format!("identity state poisoned: {e}")))
    }

    fn verify_now(&self, token: &str, check_revocation: bool) -> Result<ClaimSet, AuthError> {
        let state = self
            .state
            .read()
            .map_err(|e| AuthError::Provider(format!("identity state poisoned: {e}")))?;

        let issued = state
            .tokens
            .get(token)
            .ok_or_else(|| AuthError::InvalidToken("unknown token".to_string()))?;
        let account = state
            .accounts
            .get(&issued.uid)
            .ok_or_else(|| AuthError::InvalidToken("token subject no longer exists".to_string()))?;

        if check_revocation {
            if account.disabled {
                return Err(AuthError::UserDisabled);
            }
            if issued.issued_at < account.valid_since {
                return Err(AuthError::Revoked);
            }
        }

        Ok(ClaimSet {
            uid: issued.uid.clone(),
            email: Some(account.email.clone()),
            issued_at: issued.issued_at,
            custom: account.custom.clone(),
        })
    }

    fn create_now(&self, account: NewAccount) -> Result<String, AuthError> {
        let mut state = self.write()?;
        state.calls += 1;

        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::EmailAlreadyExists(account.email));
        }
        let uid = account
            .uid
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        if state.accounts.contains_key(&uid) {
            return Err(AuthError::Provider(format!("uid already exists: {uid}")));
        }

        state.accounts.insert(
            uid.clone(),
            Account {
                email: account.email,
                custom: Map::new(),
                disabled: false,
                valid_since: 0,
            },
        );
        Ok(uid)
    }

    fn set_claims_now(&self, uid: &str, claims: Map<String, Value>) -> Result<(), AuthError> {
        let mut state = self.write()?;
        state.calls += 1;
        let account = state
            .accounts
            .get_mut(uid)
            .ok_or_else(|| AuthError::UserNotFound(uid.to_string()))?;
        account.custom = claims;
        Ok(())
    }
}

impl TokenVerifier for MemoryIdentityProvider {
    fn verify<'a>(&'a self, token: &'a str, check_revocation: bool) -> AuthFuture<'a, ClaimSet> {
        Box::pin(async move { self.verify_now(token, check_revocation) })
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn create_account<'a>(&'a self, account: NewAccount) -> AuthFuture<'a, String> {
        Box::pin(async move { self.create_now(account) })
    }

    fn set_custom_claims<'a>(
        &'a self,
        uid: &'a str,
        claims: Map<String, Value>,
    ) -> AuthFuture<'a, ()> {
        Box::pin(async move { self.set_claims_now(uid, claims) })
    }
}
