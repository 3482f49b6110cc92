use serde::Serialize;

use bazaar_auth_types::token::AssuranceLevel;
use bazaar_domain::id::{ChallengeId, FactorId, UserId};
use bazaar_domain::role::Role;

use crate::domain::repository::{AuthPort, RoleLookupPort};
use crate::domain::types::{AuthEvent, Identity, ProviderSession, SignInOutcome, SlotKind};
use crate::error::BackofficeError;
use crate::usecase::guard::{Grant, GuardSnapshot};
use crate::usecase::mfa::{MfaState, is_well_formed_code, select_factor};
use crate::usecase::role::{RoleCache, RoleGrant, RoleResolver};

/// One signed-in area of a browser session.
#[derive(Debug, Clone)]
pub struct AuthSlot {
    pub session: ProviderSession,
    /// The role the slot was signed in for.
    pub portal: Role,
    pub grant: RoleGrant,
    pub mfa: MfaState,
}

impl AuthSlot {
    pub fn identity(&self) -> &Identity {
        &self.session.identity
    }

    /// Signed in for its portal with no second factor outstanding.
    pub fn is_complete(&self) -> bool {
        !self.mfa.is_outstanding() && self.grant.role == self.portal
    }

    fn is_expired(&self, now: u64) -> bool {
        self.session.expires_at <= now
    }

    fn to_grant(&self) -> Option<Grant> {
        if self.mfa.is_outstanding() {
            return None;
        }
        Some(Grant {
            user_id: self.session.identity.id,
            email: self.session.identity.email.clone(),
            role: self.grant.role,
            assignment: self.grant.assignment.clone(),
            access_token: self.session.access_token.clone(),
        })
    }
}

/// Auth state of one browser session: an admin slot, a manager slot and the
/// role cache they share.
#[derive(Debug)]
pub struct SessionContext {
    pub admin: Option<AuthSlot>,
    pub manager: Option<AuthSlot>,
    pub role_cache: RoleCache,
    /// True until the first `initialize` has settled.
    pub loading: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            admin: None,
            manager: None,
            role_cache: RoleCache::default(),
            loading: true,
        }
    }

    pub fn slot(&self, kind: SlotKind) -> Option<&AuthSlot> {
        match kind {
            SlotKind::Admin => self.admin.as_ref(),
            SlotKind::Manager => self.manager.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, kind: SlotKind) -> &mut Option<AuthSlot> {
        match kind {
            SlotKind::Admin => &mut self.admin,
            SlotKind::Manager => &mut self.manager,
        }
    }

    // Split borrow of a slot and the shared cache.
    fn parts(&mut self, kind: SlotKind) -> (&mut Option<AuthSlot>, &mut RoleCache) {
        match kind {
            SlotKind::Admin => (&mut self.admin, &mut self.role_cache),
            SlotKind::Manager => (&mut self.manager, &mut self.role_cache),
        }
    }

    /// Whether `initialize` must run before the context can be trusted.
    pub fn needs_restore(&self, now: u64) -> bool {
        self.loading
            || SlotKind::ALL
                .iter()
                .filter_map(|kind| self.slot(*kind))
                .any(|slot| slot.is_expired(now))
    }

    pub fn snapshot(&self) -> GuardSnapshot {
        GuardSnapshot {
            loading: self.loading,
            admin: self.admin.as_ref().and_then(AuthSlot::to_grant),
            manager: self.manager.as_ref().and_then(AuthSlot::to_grant),
        }
    }

    pub fn view(&self) -> SessionView {
        let slots = SlotKind::ALL
            .iter()
            .filter_map(|kind| {
                self.slot(*kind).map(|slot| SlotView {
                    slot: *kind,
                    user_id: slot.session.identity.id,
                    email: slot.session.identity.email.clone(),
                    role: slot.grant.role,
                    mfa_pending: slot.mfa.is_outstanding(),
                    aal: slot.session.aal,
                })
            })
            .collect();
        SessionView {
            loading: self.loading,
            slots,
        }
    }
}

/// Public projection of a session for `GET /auth/session`. Tokens are never
/// exposed.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub loading: bool,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Serialize)]
pub struct SlotView {
    pub slot: SlotKind,
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Role,
    pub mfa_pending: bool,
    /// Assurance level of the current provider session.
    pub aal: AssuranceLevel,
}

/// The only writer of a `SessionContext`.
pub struct SessionGate<A, R>
where
    A: AuthPort,
    R: RoleLookupPort,
{
    pub auth: A,
    pub roles: RoleResolver<R>,
}

impl<A, R> SessionGate<A, R>
where
    A: AuthPort,
    R: RoleLookupPort,
{
    /// Re-validate every filled slot against the provider.
    ///
    /// A rejected or expired access token is refreshed once; if that fails too
    /// the slot is signed out. Always ends with `loading = false`.
    pub async fn initialize(&self, ctx: &mut SessionContext, now: u64) {
        for kind in SlotKind::ALL {
            let Some(slot) = ctx.slot(kind) else {
                continue;
            };
            let user_id = slot.identity().id;

            let current = if slot.is_expired(now) {
                None
            } else {
                match self.auth.get_user(&slot.session.access_token).await {
                    Ok(identity) if identity.id == user_id => Some(identity),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::debug!(user_id = %user_id, error = %e, "provider rejected session");
                        None
                    }
                }
            };
            if current.is_some() {
                continue;
            }

            let refresh_token = slot.session.refresh_token.clone();
            match self.auth.refresh(&refresh_token).await {
                Ok(session) if session.identity.id == user_id => {
                    if let Some(slot) = ctx.slot_mut(kind).as_mut() {
                        slot.session = session;
                    }
                    self.on_auth_change(ctx, kind, AuthEvent::TokenRefreshed)
                        .await;
                    let role_lost = ctx
                        .slot(kind)
                        .is_some_and(|s| !s.mfa.is_outstanding() && s.grant.role != s.portal);
                    if role_lost {
                        tracing::warn!(user_id = %user_id, "role changed since sign-in, signing out");
                        self.sign_out(ctx, kind).await;
                    }
                }
                Ok(_) | Err(_) => {
                    tracing::info!(user_id = %user_id, slot = ?kind, "session expired, signing out");
                    ctx.slot_mut(kind).take();
                    self.on_auth_change(ctx, kind, AuthEvent::SignedOut).await;
                }
            }
        }
        ctx.loading = false;
    }

    /// Apply an auth event to the slot of `kind`.
    ///
    /// `SignedOut` clears the whole role cache and any outstanding challenge;
    /// every other event re-resolves the role of the slot's identity.
    pub async fn on_auth_change(&self, ctx: &mut SessionContext, kind: SlotKind, event: AuthEvent) {
        match event {
            AuthEvent::SignedOut => {
                ctx.role_cache.clear();
                ctx.slot_mut(kind).take();
                for other in SlotKind::ALL {
                    if ctx.slot(other).is_some_and(|s| s.mfa.is_outstanding()) {
                        ctx.slot_mut(other).take();
                    }
                }
            }
            AuthEvent::SignedIn | AuthEvent::TokenRefreshed | AuthEvent::MfaChallengeVerified => {
                let (slot, cache) = ctx.parts(kind);
                let Some(slot) = slot.as_mut() else {
                    return;
                };
                // A new token or a passed challenge must see the current role row.
                if matches!(
                    event,
                    AuthEvent::TokenRefreshed | AuthEvent::MfaChallengeVerified
                ) {
                    cache.invalidate(slot.session.identity.id);
                }
                slot.grant = self
                    .roles
                    .resolve(cache, &slot.session.identity, &slot.session.access_token)
                    .await;
            }
        }
    }

    /// Sign in through a portal.
    ///
    /// Credentials and role are checked independently: a valid account whose
    /// resolved role is not the portal's role is signed out again and the
    /// attempt fails with `WrongRole`.
    pub async fn sign_in(
        &self,
        ctx: &mut SessionContext,
        portal: Role,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, BackofficeError> {
        let kind = SlotKind::for_portal(portal).ok_or(BackofficeError::UnknownPortal)?;
        if ctx.slot(kind).is_some() {
            self.sign_out(ctx, kind).await;
        }

        let session = self.auth.sign_in(email, password).await?;
        let user_id = session.identity.id;
        *ctx.slot_mut(kind) = Some(AuthSlot {
            session,
            portal,
            grant: RoleGrant::anonymous(),
            mfa: MfaState::NoChallenge,
        });
        self.on_auth_change(ctx, kind, AuthEvent::SignedIn).await;

        let Some(slot) = ctx.slot(kind) else {
            return Err(BackofficeError::SessionExpired);
        };
        let grant = slot.grant.clone();
        let access_token = slot.session.access_token.clone();
        if grant.role != portal {
            tracing::warn!(user_id = %user_id, role = %grant.role, portal = %portal, "wrong role for portal");
            self.sign_out(ctx, kind).await;
            return Err(BackofficeError::WrongRole);
        }

        if grant.requires_2fa {
            match self.issue_challenge(&access_token).await {
                Ok(Some((factor_id, challenge_id))) => {
                    if let Some(slot) = ctx.slot_mut(kind).as_mut() {
                        slot.mfa.issue(factor_id, challenge_id);
                    }
                    tracing::info!(user_id = %user_id, "second factor required");
                    return Ok(SignInOutcome::MfaRequired { factor_id });
                }
                Ok(None) => {}
                Err(e) => {
                    self.sign_out(ctx, kind).await;
                    return Err(e);
                }
            }
        }

        tracing::info!(user_id = %user_id, role = %grant.role, "signed in");
        Ok(SignInOutcome::SignedIn { role: grant.role })
    }

    async fn issue_challenge(
        &self,
        access_token: &str,
    ) -> Result<Option<(FactorId, ChallengeId)>, BackofficeError> {
        let factors = self.auth.list_factors(access_token).await?;
        let Some(factor_id) = select_factor(&factors) else {
            return Ok(None);
        };
        let challenge_id = self.auth.challenge(access_token, factor_id).await?;
        Ok(Some((factor_id, challenge_id)))
    }

    /// Submit a code for the outstanding challenge of a portal's slot.
    ///
    /// Any failure leaves the challenge in place for a retry. On success the
    /// role is read again before the sign-in counts as complete.
    pub async fn verify_mfa(
        &self,
        ctx: &mut SessionContext,
        portal: Role,
        code: &str,
    ) -> Result<SignInOutcome, BackofficeError> {
        let kind = SlotKind::for_portal(portal).ok_or(BackofficeError::UnknownPortal)?;
        let slot = ctx
            .slot_mut(kind)
            .as_mut()
            .filter(|slot| slot.portal == portal)
            .ok_or(BackofficeError::NoChallenge)?;
        let (factor_id, challenge_id) = slot.mfa.pending().ok_or(BackofficeError::NoChallenge)?;
        let user_id = slot.session.identity.id;

        if !is_well_formed_code(code) {
            slot.mfa.record_failure();
            return Err(BackofficeError::MfaMismatch);
        }

        let session = match self
            .auth
            .verify(&slot.session.access_token, factor_id, challenge_id, code)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                slot.mfa.record_failure();
                tracing::info!(user_id = %user_id, error = %e, "verification failed");
                return Err(e);
            }
        };
        slot.session = session;
        slot.mfa.complete();

        self.on_auth_change(ctx, kind, AuthEvent::MfaChallengeVerified)
            .await;
        let role = ctx.slot(kind).map(|s| s.grant.role).unwrap_or(Role::Anonymous);
        if role != portal {
            tracing::warn!(user_id = %user_id, role = %role, portal = %portal, "role lost after verification");
            self.sign_out(ctx, kind).await;
            return Err(BackofficeError::WrongRole);
        }

        tracing::info!(user_id = %user_id, role = %role, "signed in with second factor");
        Ok(SignInOutcome::SignedIn { role })
    }

    /// Sign the slot out locally and at the provider. Provider errors are
    /// logged only; the local slot is always discarded.
    pub async fn sign_out(&self, ctx: &mut SessionContext, kind: SlotKind) {
        if let Some(slot) = ctx.slot_mut(kind).take() {
            if let Err(e) = self.auth.sign_out(&slot.session.access_token).await {
                tracing::warn!(user_id = %slot.session.identity.id, error = %e, "provider sign-out failed");
            }
        }
        self.on_auth_change(ctx, kind, AuthEvent::SignedOut).await;
    }
}
