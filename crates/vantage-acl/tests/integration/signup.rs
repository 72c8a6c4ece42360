//! Integration tests for self-service sign-up.

use std::sync::Arc;

use vantage_acl::{SignUpError, SignUpRequest};
use vantage_core::{ClaimSet, Role, Status};

use crate::common::{FailingProfileStore, TestHarness};

fn request(email: &str, password: &str, role: &str) -> SignUpRequest {
    SignUpRequest {
        email: email.to_string(),
        password: password.to_string(),
        role: role.to_string(),
    }
}

#[tokio::test]
async fn test_sign_up_investor() {
    let harness = TestHarness::new();

    let signed_up = harness
        .sign_up_service()
        .sign_up(request("vc@example.com", "s3cret", "investor"))
        .await
        .unwrap();

    let profile = harness.profile(&signed_up.uid).await.unwrap();
    assert_eq!(profile.role, Some(Role::Consumer));
    assert_eq!(profile.status, Some(Status::Active));
    assert_eq!(profile.email.as_deref(), Some("vc@example.com"));
    assert_eq!(
        harness.identity.custom_claims(&signed_up.uid).unwrap()["role"],
        "investor"
    );
}

#[tokio::test]
async fn test_signed_up_account_passes_the_guard_at_once() {
    let harness = TestHarness::new();

    let investor = harness
        .sign_up_service()
        .sign_up(request("vc@example.com", "s3cret", "investor"))
        .await
        .unwrap();
    let claims = ClaimSet::new(investor.uid.clone(), None, 0);

    let profile = harness
        .guard(&[Role::Consumer, Role::Admin])
        .authorize(&claims)
        .await
        .unwrap();
    assert_eq!(profile.uid, investor.uid);
    assert_eq!(profile.role, Some(Role::Consumer));

    assert!(harness.guard(&[Role::Producer]).authorize(&claims).await.is_err());
}

#[tokio::test]
async fn test_sign_up_founder() {
    let harness = TestHarness::new();

    let signed_up = harness
        .sign_up_service()
        .sign_up(request("f@example.com", "s3cret", "founder"))
        .await
        .unwrap();
    assert_eq!(
        harness.profile(&signed_up.uid).await.unwrap().role,
        Some(Role::Producer)
    );
}

#[tokio::test]
async fn test_rejected_requests_touch_nothing() {
    let harness = TestHarness::new();
    let service = harness.sign_up_service();

    for (req, expect_role_error) in [
        (request("a@example.com", "pw", "admin"), true),
        (request("a@example.com", "pw", "overlord"), true),
        (request("", "pw", "founder"), false),
        (request("a@example.com", "", "investor"), false),
    ] {
        let err = service.sign_up(req).await.unwrap_err();
        if expect_role_error {
            assert!(matches!(err, SignUpError::InvalidRole(_)));
        } else {
            assert!(matches!(err, SignUpError::InvalidRequest(_)));
        }
    }

    assert_eq!(harness.identity.call_count(), 0);
    assert_eq!(harness.store.operation_count(), 0);
}

#[tokio::test]
async fn test_duplicate_email() {
    let harness = TestHarness::new();
    let service = harness.sign_up_service();

    service
        .sign_up(request("dup@example.com", "pw", "founder"))
        .await
        .unwrap();
    let ops_after_first = harness.store.operation_count();

    let err = service
        .sign_up(request("dup@example.com", "pw", "investor"))
        .await
        .unwrap_err();
    assert!(matches!(err, SignUpError::EmailAlreadyExists(ref e) if e == "dup@example.com"));
    assert_eq!(harness.store.operation_count(), ops_after_first);
}

#[tokio::test]
async fn test_profile_failure_leaves_orphaned_account() {
    let harness = TestHarness::new().with_profiles(Arc::new(FailingProfileStore));

    let err = harness
        .sign_up_service()
        .sign_up(request("orphan@example.com", "pw", "investor"))
        .await
        .unwrap_err();
    assert!(matches!(err, SignUpError::Store(_)));

    // The identity record exists but never got a role claim.
    assert_eq!(harness.identity.call_count(), 1);
    let retry = harness
        .sign_up_service()
        .sign_up(request("orphan@example.com", "pw", "investor"))
        .await
        .unwrap_err();
    assert!(matches!(retry, SignUpError::EmailAlreadyExists(_)));
}
