use bazaar_backoffice::domain::types::{SignInOutcome, SlotKind};
use bazaar_backoffice::error::BackofficeError;
use bazaar_backoffice::usecase::guard::{GuardDecision, Requirement, check};
use bazaar_backoffice::usecase::mfa::MfaState;
use bazaar_backoffice::usecase::session::{SessionContext, SessionGate};
use bazaar_domain::entity::ServiceType;
use bazaar_domain::role::Role;

use crate::helpers::{
    Account, MockAuth, MockRoleLookup, VALID_CODE, account, gate, manager_record,
    superadmin_record, totp_factor,
};

struct Fixture {
    admin: Account,
    lookup: MockRoleLookup,
    gate: SessionGate<MockAuth, MockRoleLookup>,
    ctx: SessionContext,
}

/// A superadmin with one verified TOTP factor and `requires_2fa` set.
fn fixture() -> Fixture {
    let mut admin = account("admin@bazaar.test");
    admin.factors.push(totp_factor());
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, true)]);
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup.clone());
    let mut ctx = SessionContext::new();
    ctx.loading = false;
    Fixture {
        admin,
        lookup,
        gate,
        ctx,
    }
}

async fn start(f: &mut Fixture) -> SignInOutcome {
    f.gate
        .sign_in(&mut f.ctx, Role::Superadmin, &f.admin.email, &f.admin.password)
        .await
        .unwrap()
}

fn mfa(ctx: &SessionContext) -> MfaState {
    ctx.slot(SlotKind::Admin).unwrap().mfa.clone()
}

#[tokio::test]
async fn should_issue_challenge_for_verified_totp() {
    let mut f = fixture();

    let outcome = start(&mut f).await;

    assert_eq!(
        outcome,
        SignInOutcome::MfaRequired {
            factor_id: f.admin.factors[0].id
        }
    );
    assert!(mfa(&f.ctx).is_outstanding());
}

#[tokio::test]
async fn should_not_grant_while_challenge_outstanding() {
    let mut f = fixture();
    start(&mut f).await;

    let snapshot = f.ctx.snapshot();
    assert!(snapshot.admin.is_none());
    assert!(matches!(
        check(Requirement::Role(Role::Superadmin), &snapshot),
        GuardDecision::Redirect(_)
    ));
}

#[tokio::test]
async fn should_keep_challenge_after_wrong_code() {
    let mut f = fixture();
    start(&mut f).await;
    let before = mfa(&f.ctx).pending().unwrap();

    let result = f
        .gate
        .verify_mfa(&mut f.ctx, Role::Superadmin, "000000")
        .await;

    assert!(matches!(result, Err(BackofficeError::MfaMismatch)));
    let after = mfa(&f.ctx);
    assert_eq!(after.pending(), Some(before));
    assert!(matches!(
        after,
        MfaState::ChallengeIssued {
            failed_attempts: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn should_verify_and_reresolve_role() {
    let mut f = fixture();
    start(&mut f).await;
    assert_eq!(f.lookup.call_count(), 1);

    let _ = f
        .gate
        .verify_mfa(&mut f.ctx, Role::Superadmin, "999999")
        .await;
    let outcome = f
        .gate
        .verify_mfa(&mut f.ctx, Role::Superadmin, VALID_CODE)
        .await
        .unwrap();

    assert_eq!(outcome, SignInOutcome::SignedIn { role: Role::Superadmin });
    assert_eq!(mfa(&f.ctx), MfaState::Verified);
    assert_eq!(f.lookup.call_count(), 2);
    assert!(matches!(
        check(Requirement::Role(Role::Superadmin), &f.ctx.snapshot()),
        GuardDecision::Render(Some(_))
    ));
}

#[tokio::test]
async fn should_reject_malformed_code_without_provider_call() {
    let mut f = fixture();
    start(&mut f).await;

    let result = f.gate.verify_mfa(&mut f.ctx, Role::Superadmin, "12ab").await;

    assert!(matches!(result, Err(BackofficeError::MfaMismatch)));
    assert_eq!(f.gate.auth.log.count("verify"), 0);
    assert!(mfa(&f.ctx).is_outstanding());
}

#[tokio::test]
async fn should_report_missing_challenge() {
    let mut f = fixture();

    let result = f
        .gate
        .verify_mfa(&mut f.ctx, Role::Superadmin, VALID_CODE)
        .await;

    assert!(matches!(result, Err(BackofficeError::NoChallenge)));
}

#[tokio::test]
async fn should_not_accept_code_for_another_portal() {
    let mut f = fixture();
    start(&mut f).await;

    let result = f
        .gate
        .verify_mfa(&mut f.ctx, Role::StoreManager, VALID_CODE)
        .await;

    assert!(matches!(result, Err(BackofficeError::NoChallenge)));
    assert!(mfa(&f.ctx).is_outstanding());
}

#[tokio::test]
async fn should_tear_down_when_role_lost_during_verification() {
    let mut f = fixture();
    start(&mut f).await;
    f.lookup
        .set(manager_record(&f.admin, ServiceType::Store, true));

    let result = f
        .gate
        .verify_mfa(&mut f.ctx, Role::Superadmin, VALID_CODE)
        .await;

    assert!(matches!(result, Err(BackofficeError::WrongRole)));
    assert!(f.ctx.admin.is_none());
    assert!(f.ctx.role_cache.is_empty());
}

#[tokio::test]
async fn should_complete_sign_in_when_no_factor_is_enrolled() {
    let admin = account("admin@bazaar.test");
    let lookup = MockRoleLookup::with(vec![superadmin_record(&admin, true)]);
    let gate = gate(MockAuth::new(vec![admin.clone()]), lookup);
    let mut ctx = SessionContext::new();
    ctx.loading = false;

    let outcome = gate
        .sign_in(&mut ctx, Role::Superadmin, &admin.email, &admin.password)
        .await
        .unwrap();

    assert_eq!(outcome, SignInOutcome::SignedIn { role: Role::Superadmin });
    assert_eq!(gate.auth.log.count("challenge"), 0);
}

#[tokio::test]
async fn should_clear_challenge_on_sign_out() {
    let mut f = fixture();
    start(&mut f).await;

    f.gate.sign_out(&mut f.ctx, SlotKind::Admin).await;

    assert!(f.ctx.admin.is_none());
    let result = f
        .gate
        .verify_mfa(&mut f.ctx, Role::Superadmin, VALID_CODE)
        .await;
    assert!(matches!(result, Err(BackofficeError::NoChallenge)));
}
