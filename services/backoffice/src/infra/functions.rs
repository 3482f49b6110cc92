use anyhow::Context;
use reqwest::Method;
use serde::Deserialize;

use bazaar_core::baas::BaasClient;

use crate::domain::repository::AdminFunctionsPort;
use crate::domain::types::AdminFunction;
use crate::error::BackofficeError;

/// Backend edge functions invoked with the admin's token.
#[derive(Clone)]
pub struct EdgeFunctions {
    pub baas: BaasClient,
}

/// `{success}` or `{error}` as returned by every admin function.
#[derive(Debug, Default, Deserialize)]
struct FunctionReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn interpret(status_ok: bool, reply: FunctionReply) -> Result<(), BackofficeError> {
    match reply.error {
        Some(error) => Err(BackofficeError::AdminFunctionRejected(error)),
        None if status_ok && reply.success => Ok(()),
        None if status_ok => Err(BackofficeError::AdminFunctionRejected(
            "function did not report success".into(),
        )),
        None => Err(anyhow::anyhow!("admin function failed without an error message").into()),
    }
}

impl AdminFunctionsPort for EdgeFunctions {
    async fn invoke(
        &self,
        access_token: &str,
        function: AdminFunction,
        payload: serde_json::Value,
    ) -> Result<(), BackofficeError> {
        let path = format!("/functions/v1/{}", function.name());
        let resp = self
            .baas
            .request(Method::POST, &path, Some(access_token))
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("{} request failed", function.name()))?;
        let status = resp.status();
        let reply = resp.json::<FunctionReply>().await.unwrap_or_default();
        if reply.error.is_some() || !status.is_success() {
            tracing::warn!(function = function.name(), status = %status, "admin function rejected");
        }
        interpret(status.is_success(), reply)
    }
}
