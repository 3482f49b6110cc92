use bazaar_backoffice::domain::types::{AuthEvent, SignInOutcome, SlotKind};
use bazaar_backoffice::error::BackofficeError;
use bazaar_backoffice::usecase::guard::{GuardDecision, Requirement, check};
use bazaar_backoffice::usecase::session::SessionContext;
use bazaar_domain::entity::ServiceType;
use bazaar_domain::role::Role;

use crate::helpers::{
    MockAuth, MockRoleLookup, NOW, account, gate, manager_record, superadmin_record,
};

fn settled() -> SessionContext {
    let mut ctx = SessionContext::new();
    ctx.loading = false;
    ctx
}

// ── sign_in ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_in_superadmin_through_admin_portal() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup.clone());
    let mut ctx = settled();

    let outcome = gate
        .sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();

    assert_eq!(outcome, SignInOutcome::SignedIn { role: Role::Superadmin });
    let slot = ctx.slot(SlotKind::Admin).unwrap();
    assert!(slot.is_complete());
    assert_eq!(slot.identity().id, admin.id);
    assert_eq!(lookup.call_count(), 1);
}

#[tokio::test]
async fn should_reject_bad_password_without_touching_slots() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup.clone());
    let mut ctx = settled();

    let result = gate
        .sign_in(&mut ctx, Role::Superadmin, &admin.email, "wrong")
        .await;

    assert!(matches!(result, Err(BackofficeError::InvalidCredentials)));
    assert!(ctx.admin.is_none());
    assert_eq!(lookup.call_count(), 0);
}

#[tokio::test]
async fn should_sign_out_valid_manager_at_admin_portal() {
    let manager = account("store@bazaar.test");
    let lookup = MockRoleLookup::with(vec![manager_record(&manager, ServiceType::Store, true)]);
    let auth = MockAuth::new(vec![manager.clone()]);
    let log = auth.log.clone();
    let gate = gate(auth, lookup);
    let mut ctx = settled();

    let result = gate
        .sign_in(&mut ctx, Role::Superadmin, &manager.email, &manager.password)
        .await;

    assert!(matches!(result, Err(BackofficeError::WrongRole)));
    assert!(ctx.admin.is_none());
    assert_eq!(log.count("sign_out"), 1);
}

#[tokio::test]
async fn should_fail_closed_when_role_lookup_errors() {
    let admin = account("admin@bazaar.test");
    let gate = gate(MockAuth::new(vec![admin.clone()]), MockRoleLookup::failing());
    let mut ctx = settled();

    let result = gate
        .sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await;

    assert!(matches!(result, Err(BackofficeError::WrongRole)));
    assert!(matches!(
        check(Requirement::Role(Role::Superadmin), &ctx.snapshot()),
        GuardDecision::Redirect("/admin/login")
    ));
}

#[tokio::test]
async fn should_fail_closed_when_no_role_row_exists() {
    let admin = account("admin@bazaar.test");
    let gate = gate(MockAuth::new(vec![admin.clone()]), MockRoleLookup::default());
    let mut ctx = settled();

    let result = gate
        .sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await;

    assert!(matches!(result, Err(BackofficeError::WrongRole)));
    assert!(ctx.admin.is_none());
}

#[tokio::test]
async fn should_reject_manager_with_inactive_assignment() {
    let manager = account("hotel@bazaar.test");
    let lookup = MockRoleLookup::with(vec![manager_record(&manager, ServiceType::Hotel, false)]);
    let gate = gate(MockAuth::new(vec![manager.clone()]), lookup);
    let mut ctx = settled();

    let result = gate
        .sign_in(&mut ctx, Role::HotelManager, &manager.email, &manager.password)
        .await;

    assert!(matches!(result, Err(BackofficeError::WrongRole)));
    assert!(ctx.manager.is_none());
}

#[tokio::test]
async fn should_hold_admin_and_manager_slots_independently() {
    let admin = account("admin@bazaar.test");
    let manager = account("taxi@bazaar.test");
    let lookup = MockRoleLookup::with(vec![
        superadmin_record(&admin, false),
        manager_record(&manager, ServiceType::Taxi, true),
    ]);
    let gate = gate(MockAuth::new(vec![admin.clone(), manager.clone()]), lookup);
    let mut ctx = settled();

    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();
    gate.sign_in(&mut ctx, Role::TaxiManager, &manager.email, &manager.password)
        .await
        .unwrap();

    let snapshot = ctx.snapshot();
    assert_eq!(snapshot.admin.unwrap().role, Role::Superadmin);
    assert_eq!(snapshot.manager.unwrap().role, Role::TaxiManager);
}

// ── role cache ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_cached_role_without_second_read() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup.clone());
    let mut ctx = settled();

    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();
    gate.on_auth_change(&mut ctx, SlotKind::Admin, AuthEvent::SignedIn)
        .await;

    assert_eq!(lookup.call_count(), 1);
    assert_eq!(ctx.role_cache.len(), 1);
}

#[tokio::test]
async fn should_reread_role_after_token_refresh() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup.clone());
    let mut ctx = settled();

    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();
    gate.on_auth_change(&mut ctx, SlotKind::Admin, AuthEvent::TokenRefreshed)
        .await;

    assert_eq!(lookup.call_count(), 2);
    assert_eq!(ctx.admin.as_ref().unwrap().grant.role, Role::Superadmin);
}

#[tokio::test]
async fn should_not_cache_failed_lookups() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::failing();
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup.clone());
    let mut ctx = settled();

    let _ = gate
        .sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await;

    assert!(ctx.role_cache.is_empty());
}

#[tokio::test]
async fn should_clear_role_cache_on_sign_out() {
    let first = account("first@bazaar.test");
    let second = account("second@bazaar.test");
    let lookup = MockRoleLookup::with(vec![
        superadmin_record(&first, false),
        manager_record(&second, ServiceType::Store, true),
    ]);
    let gate = gate(MockAuth::new(vec![first.clone(), second.clone()]), lookup.clone());
    let mut ctx = settled();

    gate.sign_in(&mut ctx, Role::Superadmin, &first.email, &first.password)
        .await
        .unwrap();
    gate.sign_out(&mut ctx, SlotKind::Admin).await;
    assert!(ctx.role_cache.is_empty());

    let result = gate
        .sign_in(&mut ctx, Role::Superadmin, &second.email, &second.password)
        .await;

    assert!(matches!(result, Err(BackofficeError::WrongRole)));
    assert_eq!(lookup.call_count(), 2);
}

#[tokio::test]
async fn should_discard_outstanding_challenge_of_other_slot_on_sign_out() {
    let admin = account("admin@bazaar.test");
    let mut manager = account("store@bazaar.test");
    manager.factors.push(crate::helpers::totp_factor());
    let mut manager_row = manager_record(&manager, ServiceType::Store, true);
    manager_row.requires_2fa = true;
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false), manager_row]);
    let gate = gate(MockAuth::new(vec![admin.clone(), manager.clone()]), lookup);
    let mut ctx = settled();

    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();
    let outcome = gate
        .sign_in(&mut ctx, Role::StoreManager, &manager.email, &manager.password)
        .await
        .unwrap();
    assert!(matches!(outcome, SignInOutcome::MfaRequired { .. }));

    gate.sign_out(&mut ctx, SlotKind::Admin).await;

    assert!(ctx.admin.is_none());
    assert!(ctx.manager.is_none());
}

// ── initialize ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_settle_fresh_context_without_provider_calls() {
    let auth = MockAuth::new(vec![]);
    let log = auth.log.clone();
    let gate = gate(auth, MockRoleLookup::default());
    let mut ctx = SessionContext::new();
    assert!(ctx.needs_restore(NOW));

    gate.initialize(&mut ctx, NOW).await;

    assert!(!ctx.loading);
    assert!(!ctx.needs_restore(NOW));
    assert_eq!(log.count("get_user"), 0);
}

#[tokio::test]
async fn should_keep_slot_when_provider_confirms_session() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let auth = MockAuth::new(vec![admin.clone()]);
    let log = auth.log.clone();
    let gate = gate(auth, lookup);
    let mut ctx = settled();
    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();
    ctx.loading = true;

    gate.initialize(&mut ctx, NOW).await;

    assert!(!ctx.loading);
    assert!(ctx.admin.is_some());
    assert_eq!(log.count("get_user"), 1);
    assert_eq!(log.count("refresh"), 0);
}

#[tokio::test]
async fn should_refresh_rejected_session_once() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let mut auth = MockAuth::new(vec![admin.clone()]);
    auth.sessions_valid = false;
    let log = auth.log.clone();
    let gate = gate(auth, lookup);
    let mut ctx = settled();
    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();
    let old_token = ctx.admin.as_ref().unwrap().session.access_token.clone();
    ctx.loading = true;

    gate.initialize(&mut ctx, NOW).await;

    let slot = ctx.admin.as_ref().unwrap();
    assert_ne!(slot.session.access_token, old_token);
    assert!(slot.is_complete());
    assert_eq!(log.count("refresh"), 1);
}

#[tokio::test]
async fn should_empty_expired_slot_that_cannot_refresh() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, false)]);
    let mut auth = MockAuth::new(vec![admin.clone()]);
    auth.refresh_valid = false;
    let log = auth.log.clone();
    let gate = gate(auth, lookup);
    let mut ctx = settled();
    gate.sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();

    let later = NOW + 7200;
    assert!(ctx.needs_restore(later));
    gate.initialize(&mut ctx, later).await;

    assert!(ctx.admin.is_none());
    assert!(ctx.role_cache.is_empty());
    assert!(!ctx.loading);
    assert_eq!(log.count("get_user"), 0);
}

#[tokio::test]
async fn should_sign_out_slot_whose_assignment_was_revoked() {
    let manager = account("hotel@bazaar.test");
    let lookup = MockRoleLookup::with(vec![manager_record(&manager, ServiceType::Hotel, true)]);
    let gate = gate(MockAuth::new(vec![manager.clone()]), lookup.clone());
    let mut ctx = settled();
    gate.sign_in(&mut ctx, Role::HotelManager, &manager.email, &manager.password)
        .await
        .unwrap();

    lookup.set(manager_record(&manager, ServiceType::Hotel, false));
    gate.initialize(&mut ctx, NOW + 7200).await;

    assert!(ctx.manager.is_none());
}
