//! Company creation and invite onboarding.

mod common;

use std::sync::Arc;

use common::{onboard_driver, service, service_with, setup_company};
use fahrtenbuch_core::{CompanyDraft, ErrorKind, Invite, Role, User, UserProfile};
use fahrtenbuch_service::{Actor, ConsumeOutcome};
use fahrtenbuch_storage::{Query, RecordReader, fields};

#[tokio::test]
async fn test_invite_is_consumed_into_driver_profile() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;

    let invite = service
        .invite_driver(&c1.admin, "x@y.com", "Xaver")
        .await
        .unwrap();
    assert_eq!(invite.company_id, c1.company.id);
    assert_eq!(service.list_pending_invites(&c1.admin).await.unwrap().len(), 1);

    let driver = Actor::user("u-x").with_email("x@y.com");
    let outcome = service.consume_invite(&driver).await.unwrap();
    assert!(outcome.is_created());

    let profile = outcome.profile();
    assert_eq!(profile.role, Role::Driver);
    assert_eq!(profile.company_id.as_ref(), Some(&c1.company.id));
    assert_eq!(profile.name, "Xaver");
    assert_eq!(profile.email, "x@y.com");

    assert!(service.list_pending_invites(&c1.admin).await.unwrap().is_empty());
    let tx = service.store().begin_read().await.unwrap();
    assert!(tx.fetch::<Invite>(invite.id.as_str()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_second_consume_reports_already_bound() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;
    let driver = onboard_driver(&service, &c1, "d1").await;

    let outcome = service.consume_invite(&driver).await.unwrap();
    match outcome {
        ConsumeOutcome::AlreadyBound(profile) => {
            assert_eq!(profile.company_id.as_ref(), Some(&c1.company.id));
        }
        other => panic!("expected AlreadyBound, got {other:?}"),
    }

    let tx = service.store().begin_read().await.unwrap();
    let profiles: Vec<UserProfile> = tx
        .find(&Query::by(fields::USER_ID, "d1"))
        .await
        .unwrap();
    assert_eq!(profiles.len(), 1);
}

#[tokio::test]
async fn test_concurrent_consume_creates_one_profile() {
    let service = Arc::new(service());
    let c1 = setup_company(&service, "a1", "Anna").await;
    service
        .invite_driver(&c1.admin, "race@example.de", "Renn")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let actor = Actor::user("racer").with_email("race@example.de");
            service.consume_invite(&actor).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_created() {
            created += 1;
        }
    }
    assert_eq!(created, 1);

    let tx = service.store().begin_read().await.unwrap();
    let profiles: Vec<UserProfile> = tx
        .find(&Query::by(fields::USER_ID, "racer"))
        .await
        .unwrap();
    assert_eq!(profiles.len(), 1);
}

#[tokio::test]
async fn test_duplicate_invite_and_existing_profile() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;
    let c2 = setup_company(&service, "a2", "Bernd").await;

    service
        .invite_driver(&c1.admin, "dup@example.de", "Dup")
        .await
        .unwrap();
    // Emails compare case-insensitively by default.
    let err = service
        .invite_driver(&c2.admin, "  DUP@Example.de ", "Dup")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateInvite);

    onboard_driver(&service, &c1, "d1").await;
    let err = service
        .invite_driver(&c2.admin, "d1@example.de", "Dora")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateProfile);
}

#[tokio::test]
async fn test_consume_without_matching_invite() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;
    service
        .invite_driver(&c1.admin, "expected@example.de", "Erik")
        .await
        .unwrap();

    let stranger = Actor::user("s1").with_email("other@example.de");
    let err = service.consume_invite(&stranger).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchingInvite);

    let no_email = Actor::user("s2");
    let err = service.consume_invite(&no_email).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    let err = service.consume_invite(&Actor::anonymous()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    // The invite is still there for its rightful owner.
    assert_eq!(service.list_pending_invites(&c1.admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_admins_manage_invites() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;
    let c2 = setup_company(&service, "a2", "Bernd").await;
    let driver = onboard_driver(&service, &c1, "d1").await;

    let err = service
        .invite_driver(&driver, "friend@example.de", "Freund")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
    let err = service.list_pending_invites(&driver).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);

    let invite = service
        .invite_driver(&c1.admin, "friend@example.de", "Freund")
        .await
        .unwrap();
    let err = service.revoke_invite(&c2.admin, &invite.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);

    service.revoke_invite(&c1.admin, &invite.id).await.unwrap();
    assert!(service.list_pending_invites(&c1.admin).await.unwrap().is_empty());

    let err = service
        .consume_invite(&Actor::user("f1").with_email("friend@example.de"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchingInvite);
}

#[tokio::test]
async fn test_invite_input_validation() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;

    let err = service
        .invite_driver(&c1.admin, "not-an-email", "Name")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    let err = service
        .invite_driver(&c1.admin, "ok@example.de", "  ")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_exact_email_matching_when_normalization_disabled() {
    let service = service_with(|config| config.access.normalize_emails = false);
    let c1 = setup_company(&service, "a1", "Anna").await;
    service
        .invite_driver(&c1.admin, "Case@Example.de", "Case")
        .await
        .unwrap();

    let err = service
        .consume_invite(&Actor::user("c1").with_email("case@example.de"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoMatchingInvite);

    let outcome = service
        .consume_invite(&Actor::user("c1").with_email("Case@Example.de"))
        .await
        .unwrap();
    assert!(outcome.is_created());
}

#[tokio::test]
async fn test_create_company_makes_caller_admin() {
    let service = service();
    let founder = Actor::user("founder").with_email("Founder@Example.de");

    let company = service
        .create_company(&founder, CompanyDraft::new("Gründer AG"))
        .await
        .unwrap();

    let current = service.current_user(&founder).await.unwrap();
    let profile = current.profile.unwrap();
    assert!(current.user.is_none());
    assert_eq!(profile.role, Role::Admin);
    assert_eq!(profile.company_id, Some(company.id));
    assert_eq!(profile.name, "Admin");
    assert_eq!(profile.email, "founder@example.de");

    let err = service
        .create_company(&Actor::anonymous(), CompanyDraft::new("Niemand"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    let err = service
        .create_company(&founder, CompanyDraft::new(" "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_create_company_uses_configured_admin_name() {
    let service = service_with(|config| config.access.default_admin_name = "Chef".into());
    let founder = Actor::user("f").with_email("f@example.de");
    service
        .create_company(&founder, CompanyDraft::new("Chef GmbH"))
        .await
        .unwrap();

    let profile = service.current_user(&founder).await.unwrap().profile.unwrap();
    assert_eq!(profile.name, "Chef");
}

#[tokio::test]
async fn test_current_user_and_profile_update() {
    let service = service();
    assert_eq!(
        service.current_user(&Actor::anonymous()).await.unwrap(),
        Default::default()
    );

    let c1 = setup_company(&service, "a1", "Anna").await;
    let current = service.current_user(&c1.admin).await.unwrap();
    assert_eq!(current.user.as_ref().map(|u| u.id.as_str()), Some("a1"));
    assert_eq!(current.profile.as_ref().map(|p| p.name.as_str()), Some("Anna"));

    service
        .update_profile(&c1.admin, "Anna Schmidt", "Anna.Schmidt@Example.de")
        .await
        .unwrap();
    let current = service.current_user(&c1.admin).await.unwrap();
    let user: User = current.user.unwrap();
    assert_eq!(user.name.as_deref(), Some("Anna Schmidt"));
    assert_eq!(user.email.as_deref(), Some("anna.schmidt@example.de"));
    assert_eq!(current.profile.unwrap().name, "Anna Schmidt");

    let err = service
        .update_profile(&c1.admin, "", "x@example.de")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_company_profiles_listed_for_admin_only() {
    let service = service();
    let c1 = setup_company(&service, "a1", "Anna").await;
    let c2 = setup_company(&service, "a2", "Bernd").await;
    let driver = onboard_driver(&service, &c1, "d1").await;
    onboard_driver(&service, &c2, "d2").await;

    let profiles = service.list_company_profiles(&c1.admin).await.unwrap();
    let mut users: Vec<&str> = profiles.iter().map(|p| p.user_id.as_str()).collect();
    users.sort_unstable();
    assert_eq!(users, vec!["a1", "d1"]);

    let err = service.list_company_profiles(&driver).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAuthorized);
}
