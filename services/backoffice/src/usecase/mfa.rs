use bazaar_domain::id::{ChallengeId, FactorId};

use crate::domain::types::{Factor, MFA_CODE_LEN};

/// Second-factor state of one sign-in attempt.
///
/// A failed verification keeps the state at `ChallengeIssued` with the same
/// ids so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MfaState {
    #[default]
    NoChallenge,
    ChallengeIssued {
        factor_id: FactorId,
        challenge_id: ChallengeId,
        failed_attempts: u32,
    },
    Verified,
}

impl MfaState {
    pub fn issue(&mut self, factor_id: FactorId, challenge_id: ChallengeId) {
        *self = Self::ChallengeIssued {
            factor_id,
            challenge_id,
            failed_attempts: 0,
        };
    }

    /// The ids of the outstanding challenge.
    pub fn pending(&self) -> Option<(FactorId, ChallengeId)> {
        match self {
            Self::ChallengeIssued {
                factor_id,
                challenge_id,
                ..
            } => Some((*factor_id, *challenge_id)),
            Self::NoChallenge | Self::Verified => None,
        }
    }

    pub fn is_outstanding(&self) -> bool {
        matches!(self, Self::ChallengeIssued { .. })
    }

    pub fn record_failure(&mut self) {
        if let Self::ChallengeIssued {
            failed_attempts, ..
        } = self
        {
            *failed_attempts += 1;
        }
    }

    pub fn complete(&mut self) {
        *self = Self::Verified;
    }
}

/// A TOTP code is exactly six ASCII digits.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == MFA_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// The factor to challenge: the first verified TOTP factor.
pub fn select_factor(factors: &[Factor]) -> Option<FactorId> {
    factors.iter().find(|f| f.is_verified_totp()).map(|f| f.id)
}
