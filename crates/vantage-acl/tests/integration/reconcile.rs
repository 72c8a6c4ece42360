//! Integration tests for sign-in reconciliation.

use std::sync::Arc;

use vantage_acl::{ReconcileError, Reconciled};
use vantage_core::{ProfileDocument, Role, Status};

use crate::common::{FailingProfileStore, RacingProfileStore, TestHarness};

#[tokio::test]
async fn test_first_sign_in_provisions_default_profile() {
    let harness = TestHarness::new();
    let claims = harness.account("new@example.com").await;

    let outcome = harness.reconciler().reconcile(&claims).await.unwrap();
    assert_eq!(
        outcome,
        Reconciled {
            role: Role::Producer,
            created: true
        }
    );

    let profile = harness.profile(&claims.uid).await.unwrap();
    assert_eq!(profile.role, Some(Role::Producer));
    assert_eq!(profile.status, Some(Status::Active));
    assert_eq!(profile.email.as_deref(), Some("new@example.com"));
    assert!(profile.created_at.is_some());

    let custom = harness.identity.custom_claims(&claims.uid).unwrap();
    assert_eq!(custom["role"], "founder");
}

#[tokio::test]
async fn test_existing_profile_role_is_used() {
    let harness = TestHarness::new();
    let claims = harness.account("inv@example.com").await;
    harness
        .put_profile(&claims.uid, Some(Role::Consumer), Some(Status::Active))
        .await;

    let outcome = harness.reconciler().reconcile(&claims).await.unwrap();
    assert_eq!(outcome.role, Role::Consumer);
    assert!(!outcome.created);
    assert_eq!(
        harness.identity.custom_claims(&claims.uid).unwrap()["role"],
        "investor"
    );
}

#[tokio::test]
async fn test_existing_profile_without_role_gets_default_claim() {
    let harness = TestHarness::new();
    let claims = harness.account("legacy@example.com").await;
    harness
        .put_profile(&claims.uid, None, Some(Status::Active))
        .await;

    let outcome = harness.reconciler().reconcile(&claims).await.unwrap();
    assert_eq!(outcome.role, Role::Producer);
    assert!(!outcome.created);

    // The stored document is left alone.
    assert!(harness.profile(&claims.uid).await.unwrap().role.is_none());
}

#[tokio::test]
async fn test_status_does_not_block_sign_in() {
    let harness = TestHarness::new();
    let claims = harness.account("pending@example.com").await;
    harness
        .put_profile(&claims.uid, Some(Role::Consumer), Some(Status::Pending))
        .await;

    let outcome = harness.reconciler().reconcile(&claims).await.unwrap();
    assert_eq!(outcome.role, Role::Consumer);
}

#[tokio::test]
async fn test_repeated_sign_in_is_stable() {
    let harness = TestHarness::new();
    let claims = harness.account("again@example.com").await;
    let reconciler = harness.reconciler();

    let first = reconciler.reconcile(&claims).await.unwrap();
    let second = reconciler.reconcile(&claims).await.unwrap();
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.role, second.role);
}

#[tokio::test]
async fn test_lost_provisioning_race_uses_winner_role() {
    let harness = TestHarness::new();
    let claims = harness.account("race@example.com").await;

    let winner = ProfileDocument::provision(&claims.uid, None, Role::Consumer);
    let racing = Arc::new(RacingProfileStore::new(harness.store.clone(), winner));
    let harness = harness.with_profiles(racing);

    let outcome = harness.reconciler().reconcile(&claims).await.unwrap();
    assert_eq!(
        outcome,
        Reconciled {
            role: Role::Consumer,
            created: false
        }
    );
    assert_eq!(harness.profile(&claims.uid).await.unwrap().role, Some(Role::Consumer));
    assert_eq!(
        harness.identity.custom_claims(&claims.uid).unwrap()["role"],
        "investor"
    );
}

#[tokio::test]
async fn test_store_failure_writes_no_claim() {
    let harness = TestHarness::new().with_profiles(Arc::new(FailingProfileStore));
    let claims = harness.account("down@example.com").await;

    let err = harness.reconciler().reconcile(&claims).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Store(_)));
    assert!(harness.identity.custom_claims(&claims.uid).unwrap().is_empty());
}

#[tokio::test]
async fn test_claim_failure_is_provider_error() {
    let harness = TestHarness::new();
    // Claims for an account the provider has never heard of.
    let claims = vantage_core::ClaimSet::new("ghost", None, 0);

    let err = harness.reconciler().reconcile(&claims).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Provider(_)));

    // The profile was still provisioned; the next sign-in only retries the claim.
    assert!(harness.profile("ghost").await.is_some());
}
