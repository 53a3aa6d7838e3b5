//! OIDC JWT to OCI UPST token exchange.

use crate::jwt;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use upst_core::{Error, Platform, Result, inputs::DOMAIN_BASE_URL};
use url::Url;

pub const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:token-exchange";
pub const REQUESTED_TOKEN_TYPE: &str = "urn:oci:token-type:oci-upst";
pub const SUBJECT_TOKEN_TYPE: &str = "jwt";

/// Path of the token endpoint below the identity domain base URL.
pub const TOKEN_PATH: &str = "/oauth2/v1/token";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned HTTP {status}{}", describe_detail(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("Invalid token exchange response: {0}")]
    InvalidResponse(String),
}

impl ExchangeError {
    /// Transport failures and error statuses are retried. A 2xx without a
    /// usable token is final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExchangeError::InvalidResponse(_))
    }
}

fn describe_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

/// One exchange call chain: constructed once, retried as a whole.
#[derive(Debug)]
pub struct ExchangeRequest {
    pub endpoint: Url,
    /// Base64 of `client_id:client_secret`.
    pub client_credential: SecretString,
    /// Base64 DER public key bound into the session token.
    pub public_key: String,
    /// The OIDC JWT being exchanged.
    pub subject_token: SecretString,
    /// Retries allowed after the first attempt.
    pub retry_budget: u32,
}

#[derive(Debug)]
pub struct ExchangeResult {
    pub token: SecretString,
}

#[derive(Debug, Deserialize)]
struct UpstTokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Build the token endpoint URL from the identity domain base URL.
pub fn token_endpoint(domain_base_url: &str) -> Result<Url> {
    let raw = format!("{}{}", domain_base_url.trim_end_matches('/'), TOKEN_PATH);
    let url = Url::parse(&raw).map_err(|e| Error::InvalidInput {
        name: DOMAIN_BASE_URL.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        scheme => Err(Error::InvalidInput {
            name: DOMAIN_BASE_URL.to_string(),
            reason: format!("unsupported scheme {:?}", scheme),
        }),
    }
}

/// Basic auth credential for the confidential token exchange app.
pub fn client_credential(oidc_client_identifier: &SecretString) -> SecretString {
    SecretString::new(STANDARD.encode(oidc_client_identifier.expose_secret()))
}

/// Linear backoff: the delay before retry `n` (1-based) is `n` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    unit: Duration,
}

impl Backoff {
    pub const fn linear(unit: Duration) -> Self {
        Self { unit }
    }

    /// Delay after failed attempt `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.unit * (attempt + 1)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::linear(Duration::from_secs(1))
    }
}

/// Performs the exchange with bounded retry.
pub struct TokenExchanger {
    client: reqwest::Client,
    backoff: Backoff,
}

impl TokenExchanger {
    /// Create an exchanger whose every attempt is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::TokenExchange {
                attempts: 0,
                source: Box::new(e),
            })?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            backoff: Backoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Exchange the subject token for a session token.
    ///
    /// A budget of `r` allows `r + 1` attempts in total. Once exhausted, or
    /// on a non-retryable failure, the last failure is returned as
    /// [`Error::TokenExchange`].
    pub async fn exchange(
        &self,
        platform: &dyn Platform,
        request: &ExchangeRequest,
    ) -> Result<ExchangeResult> {
        precheck_subject_token(platform, request.subject_token.expose_secret());

        platform.debug(&format!(
            "Token Exchange Request: endpoint={} grant_type={} requested_token_type={} subject_token_type={} public_key_length={}",
            request.endpoint,
            GRANT_TYPE,
            REQUESTED_TOKEN_TYPE,
            SUBJECT_TOKEN_TYPE,
            request.public_key.len()
        ));

        let mut attempt: u32 = 0;
        loop {
            match self.attempt(request).await {
                Ok(result) => {
                    platform.debug(&format!(
                        "Token exchange succeeded on attempt {}",
                        attempt + 1
                    ));
                    return Ok(result);
                }
                Err(err) if err.is_retryable() && attempt < request.retry_budget => {
                    let remaining = request.retry_budget - attempt - 1;
                    platform.warning(&format!(
                        "Token exchange failed, retrying ... ({} retries left)",
                        remaining
                    ));
                    platform.debug(&format!("Attempt {} failed: {}", attempt + 1, err));
                    tokio::time::sleep(self.backoff.delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => {
                    platform.error("Failed to exchange JWT for UPST after multiple attempts");
                    return Err(Error::TokenExchange {
                        attempts: attempt + 1,
                        source: Box::new(err),
                    });
                }
            }
        }
    }

    async fn attempt(
        &self,
        request: &ExchangeRequest,
    ) -> std::result::Result<ExchangeResult, ExchangeError> {
        debug!(endpoint = %request.endpoint, "Posting token exchange request");

        let form = [
            ("grant_type", GRANT_TYPE),
            ("requested_token_type", REQUESTED_TOKEN_TYPE),
            ("public_key", request.public_key.as_str()),
            ("subject_token", request.subject_token.expose_secret().as_str()),
            ("subject_token_type", SUBJECT_TOKEN_TYPE),
        ];

        let response = self
            .client
            .post(request.endpoint.clone())
            .header(
                AUTHORIZATION,
                format!("Basic {}", request.client_credential.expose_secret()),
            )
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<OAuthErrorResponse>()
                .await
                .ok()
                .and_then(|body| match (body.error, body.error_description) {
                    (Some(error), Some(description)) => Some(format!("{}: {}", error, description)),
                    (Some(error), None) => Some(error),
                    (None, description) => description,
                });
            return Err(ExchangeError::Status { status, detail });
        }

        let body: UpstTokenResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        if body.token.is_empty() {
            return Err(ExchangeError::InvalidResponse(
                "response token is empty".to_string(),
            ));
        }

        Ok(ExchangeResult {
            token: SecretString::new(body.token),
        })
    }
}

/// Lenient well-formedness check. Never fails the exchange.
fn precheck_subject_token(platform: &dyn Platform, token: &str) {
    if token.is_empty() {
        return;
    }
    if jwt::segment_count(token) < 3 {
        platform.debug("OIDC token does not appear to be a properly formatted JWT, continuing");
        return;
    }
    match jwt::inspect(token) {
        Ok(inspection) => platform.debug(&format!(
            "JWT appears valid. Issuer: {}",
            inspection.claims.iss.as_deref().unwrap_or("unknown")
        )),
        Err(e) => platform.warning(&format!("Error pre-processing OIDC token: {}", e)),
    }
}
