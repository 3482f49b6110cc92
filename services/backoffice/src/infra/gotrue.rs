use anyhow::Context;
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use bazaar_auth_types::token::validate_access_token;
use bazaar_core::baas::BaasClient;
use bazaar_domain::id::{ChallengeId, FactorId, UserId};

use crate::domain::repository::AuthPort;
use crate::domain::types::{Factor, Identity, ProviderSession};
use crate::error::BackofficeError;

/// Auth provider reached over its GoTrue-compatible REST API.
#[derive(Clone)]
pub struct GoTrueAuth {
    pub baas: BaasClient,
    pub jwt_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    factors: Vec<Factor>,
}

#[derive(Deserialize)]
struct ChallengeResponse {
    id: ChallengeId,
}

impl GoTrueAuth {
    /// Turn a token grant into a session. The identity comes from the
    /// validated access token, not from the response body.
    fn session_from(&self, tokens: TokenResponse) -> Result<ProviderSession, BackofficeError> {
        let info = validate_access_token(&tokens.access_token, &self.jwt_secret)
            .context("provider issued a token that does not validate")?;
        Ok(ProviderSession {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            identity: Identity {
                id: UserId(info.user_id),
                email: info.email,
            },
            expires_at: info.exp,
            aal: info.aal,
        })
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserResponse, BackofficeError> {
        let resp = self
            .baas
            .request(Method::GET, "/auth/v1/user", Some(access_token))
            .send()
            .await
            .context("auth user request failed")?;
        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackofficeError::SessionExpired),
            status if status.is_success() => Ok(resp
                .json::<UserResponse>()
                .await
                .context("invalid auth user response")?),
            status => Err(unexpected("get user", status, resp).await),
        }
    }
}

async fn unexpected(operation: &str, status: StatusCode, resp: Response) -> BackofficeError {
    let body = resp.text().await.unwrap_or_default();
    anyhow::anyhow!("auth provider {operation} returned {status}: {body}").into()
}

impl AuthPort for GoTrueAuth {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, BackofficeError> {
        let resp = self
            .baas
            .request(Method::POST, "/auth/v1/token?grant_type=password", None)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .context("sign-in request failed")?;
        match resp.status() {
            status if status.is_success() => {
                let tokens = resp
                    .json::<TokenResponse>()
                    .await
                    .context("invalid sign-in response")?;
                self.session_from(tokens)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(BackofficeError::InvalidCredentials)
            }
            status => Err(unexpected("sign-in", status, resp).await),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, BackofficeError> {
        let resp = self
            .baas
            .request(Method::POST, "/auth/v1/token?grant_type=refresh_token", None)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .context("refresh request failed")?;
        match resp.status() {
            status if status.is_success() => {
                let tokens = resp
                    .json::<TokenResponse>()
                    .await
                    .context("invalid refresh response")?;
                self.session_from(tokens)
            }
            status if status.is_client_error() => Err(BackofficeError::SessionExpired),
            status => Err(unexpected("refresh", status, resp).await),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<Identity, BackofficeError> {
        let user = self.fetch_user(access_token).await?;
        Ok(Identity {
            id: user.id,
            email: user.email,
        })
    }

    async fn list_factors(&self, access_token: &str) -> Result<Vec<Factor>, BackofficeError> {
        Ok(self.fetch_user(access_token).await?.factors)
    }

    async fn challenge(
        &self,
        access_token: &str,
        factor_id: FactorId,
    ) -> Result<ChallengeId, BackofficeError> {
        let path = format!("/auth/v1/factors/{factor_id}/challenge");
        let resp = self
            .baas
            .request(Method::POST, &path, Some(access_token))
            .json(&json!({}))
            .send()
            .await
            .context("challenge request failed")?;
        match resp.status() {
            status if status.is_success() => Ok(resp
                .json::<ChallengeResponse>()
                .await
                .context("invalid challenge response")?
                .id),
            StatusCode::UNAUTHORIZED => Err(BackofficeError::SessionExpired),
            status => Err(unexpected("challenge", status, resp).await),
        }
    }

    async fn verify(
        &self,
        access_token: &str,
        factor_id: FactorId,
        challenge_id: ChallengeId,
        code: &str,
    ) -> Result<ProviderSession, BackofficeError> {
        let path = format!("/auth/v1/factors/{factor_id}/verify");
        let resp = self
            .baas
            .request(Method::POST, &path, Some(access_token))
            .json(&json!({ "challenge_id": challenge_id, "code": code }))
            .send()
            .await
            .context("verify request failed")?;
        match resp.status() {
            status if status.is_success() => {
                let tokens = resp
                    .json::<TokenResponse>()
                    .await
                    .context("invalid verify response")?;
                self.session_from(tokens)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(BackofficeError::MfaMismatch)
            }
            StatusCode::UNAUTHORIZED => Err(BackofficeError::SessionExpired),
            status => Err(unexpected("verify", status, resp).await),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackofficeError> {
        let resp = self
            .baas
            .request(Method::POST, "/auth/v1/logout", Some(access_token))
            .send()
            .await
            .context("sign-out request failed")?;
        match resp.status() {
            // An already-invalid token is as signed out as it gets.
            status if status.is_success() || status == StatusCode::UNAUTHORIZED => Ok(()),
            status => Err(unexpected("sign-out", status, resp).await),
        }
    }
}
