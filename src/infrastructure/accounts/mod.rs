//! Client for the hosted account provider. Credential storage, session
//! issuance and email confirmation all live on the provider's side; this
//! service only calls the two endpoints it needs.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:9999";
const USER_AGENT: &str = "pilot-gate";

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("account provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused the request with a message meant for the user
    /// (for example a duplicate email).
    #[error("{0}")]
    Rejected(String),

    #[error("account provider returned status {0}")]
    Upstream(StatusCode),

    #[error("account provider returned an unexpected response")]
    Malformed,
}

#[derive(Clone, Debug)]
pub struct CreatedAccount {
    pub account_id: String,
    /// False when the provider withholds the session until the user
    /// confirms out-of-band (email link).
    pub session_issued: bool,
}

/// Boundary to the account provider: account creation for the signup flow
/// and bearer-token resolution for caller identity. `Ok(None)` from
/// `resolve_identity` is the anonymous state, not a failure.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedAccount, AccountsError>;

    async fn resolve_identity(&self, token: &str) -> Result<Option<String>, AccountsError>;
}

#[derive(Clone, Debug)]
pub struct HostedAccountsClient {
    base_url: String,
    http: Client,
}

impl HostedAccountsClient {
    pub fn new() -> Self {
        let base_url =
            std::env::var("ACCOUNTS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Deserialize)]
struct SignupResponse {
    id: String,
    #[serde(default)]
    session_issued: bool,
}

#[derive(Deserialize)]
struct IdentityResponse {
    id: String,
}

#[derive(Deserialize)]
struct ProviderFailure {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

#[async_trait]
impl AccountProvider for HostedAccountsClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedAccount, AccountsError> {
        let response = self
            .http
            .post(self.endpoint("signup"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let payload: SignupResponse = response
                .json()
                .await
                .map_err(|_| AccountsError::Malformed)?;
            return Ok(CreatedAccount {
                account_id: payload.id,
                session_issued: payload.session_issued,
            });
        }

        if status.is_client_error() {
            let message = response
                .json::<ProviderFailure>()
                .await
                .ok()
                .and_then(|failure| failure.message.or(failure.msg))
                .unwrap_or_else(|| String::from("The account could not be created."));
            return Err(AccountsError::Rejected(message));
        }

        Err(AccountsError::Upstream(status))
    }

    async fn resolve_identity(&self, token: &str) -> Result<Option<String>, AccountsError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let payload: IdentityResponse = response
                    .json()
                    .await
                    .map_err(|_| AccountsError::Malformed)?;
                Ok(Some(payload.id))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => Err(AccountsError::Upstream(status)),
        }
    }
}
