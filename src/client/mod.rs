//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::config::{ConfigError, PawaPayConfig};
use crate::domain::{
    ActionResponse, ActiveConfiguration, Correspondent, CorrespondentInfo, Country, DepositId,
    DepositRequest, DepositResponse, Msisdn, PaymentPageDeposit, PaymentPageResponse, PayoutId,
    PayoutRequest, PayoutResponse, RejectionReason, TransactionRef, TransactionStatus,
    ValidationError, resolve_correspondent,
};
use crate::transport::{self, TransportError};
use crate::webhook::CallbackVerifier;

mod retry;

pub use retry::RetryPolicy;

const DEFAULT_USER_AGENT: &str = concat!("pawapay-rust/", env!("CARGO_PKG_VERSION"));

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    Timeout,
    Connect,
    Other,
}

#[derive(Debug)]
struct TransportFailure {
    kind: FailureKind,
    source: Box<dyn StdError + Send + Sync>,
}

impl TransportFailure {
    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_connect() {
            FailureKind::Connect
        } else {
            FailureKind::Other
        };
        Self {
            kind,
            source: Box::new(err),
        }
    }

    fn is_transient(&self) -> bool {
        matches!(self.kind, FailureKind::Timeout | FailureKind::Connect)
    }

    fn into_error(self) -> PawaPayError {
        match self.kind {
            FailureKind::Timeout => PawaPayError::Timeout(self.source),
            FailureKind::Connect | FailureKind::Other => PawaPayError::Transport(self.source),
        }
    }
}

trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder
                .send()
                .await
                .map_err(TransportFailure::from_reqwest)?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(TransportFailure::from_reqwest)?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`PawaPayClient`].
///
/// Validation failures ([`PawaPayError::Validation`]) are raised before any
/// network call and are never retried. Use [`PawaPayError::is_retryable`] to
/// tell transient failures apart.
pub enum PawaPayError {
    /// HTTP client / transport failure (DNS, TLS, connection reset, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    #[error("request timed out: {0}")]
    Timeout(#[source] Box<dyn StdError + Send + Sync>),

    /// pawaPay answered with a status other than 200, 201 or 202.
    #[error("API error: HTTP {status} {error_code:?} {error_message:?}")]
    Api {
        status: u16,
        error_code: Option<String>,
        error_message: Option<String>,
        body: Option<String>,
    },

    /// The request was received but not accepted (`status: REJECTED`).
    #[error("request rejected: {code:?} {message:?}")]
    Rejected {
        code: Option<String>,
        message: Option<String>,
    },

    #[error("transaction not found: {id}")]
    NotFound { id: String },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PawaPayError {
    /// Whether the same request may succeed when sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => RetryPolicy::is_retryable_status(*status),
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<TransportError> for PawaPayError {
    fn from(value: TransportError) -> Self {
        Self::Parse(Box::new(value))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`PawaPayClient`].
///
/// Use this when you need to customize the retry policy, timeout, or user-agent.
pub struct PawaPayClientBuilder {
    config: PawaPayConfig,
    retry: Option<RetryPolicy>,
    user_agent: Option<String>,
}

impl PawaPayClientBuilder {
    pub fn new(config: PawaPayConfig) -> Self {
        Self {
            config,
            retry: None,
            user_agent: None,
        }
    }

    /// Set an HTTP client timeout applied to every attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replace the policy derived from `config.max_retries`.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the configuration and build a [`PawaPayClient`].
    pub fn build(self) -> Result<PawaPayClient, PawaPayError> {
        self.config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            )
            .build()
            .map_err(|err| PawaPayError::Transport(Box::new(err)))?;

        let retry = self
            .retry
            .unwrap_or_else(|| RetryPolicy::new(self.config.max_retries));

        Ok(PawaPayClient {
            config: Arc::new(self.config),
            retry,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level pawaPay client.
///
/// Requests are validated locally first: amounts, currencies and phone numbers
/// must be well formed, and a deposit or payout without an explicit
/// correspondent gets one predicted from the phone number. Only then is the
/// request sent, with retries on timeouts, connection failures and HTTP
/// 500/502/503/504.
pub struct PawaPayClient {
    config: Arc<PawaPayConfig>,
    retry: RetryPolicy,
    http: Arc<dyn HttpTransport>,
}

impl PawaPayClient {
    /// Create a client with default HTTP settings.
    ///
    /// For more customization, use [`PawaPayClient::builder`].
    pub fn new(config: PawaPayConfig) -> Result<Self, PawaPayError> {
        PawaPayClientBuilder::new(config).build()
    }

    /// Create a client from `PAWAPAY_*` environment variables.
    pub fn from_env() -> Result<Self, PawaPayError> {
        Self::new(PawaPayConfig::from_env()?)
    }

    pub fn builder(config: PawaPayConfig) -> PawaPayClientBuilder {
        PawaPayClientBuilder::new(config)
    }

    pub fn config(&self) -> &PawaPayConfig {
        &self.config
    }

    /// Fetch the merchant's active configuration (`GET /active-conf`).
    pub async fn active_configuration(&self) -> Result<ActiveConfiguration, PawaPayError> {
        let json = self.execute(HttpMethod::Get, "/active-conf", None).await?;
        Ok(transport::decode_active_conf(&json)?)
    }

    /// All correspondents enabled for the merchant.
    pub async fn correspondents(&self) -> Result<Vec<CorrespondentInfo>, PawaPayError> {
        Ok(self.active_configuration().await?.correspondents())
    }

    pub async fn correspondents_by_country(
        &self,
        country: Country,
    ) -> Result<Vec<CorrespondentInfo>, PawaPayError> {
        Ok(self.active_configuration().await?.correspondents_for(country))
    }

    /// Ask pawaPay which correspondent serves `msisdn`.
    ///
    /// API errors (any non-success HTTP status) yield `Ok(None)`; transport
    /// failures are still returned as errors.
    pub async fn predict_correspondent_remote(
        &self,
        msisdn: &Msisdn,
    ) -> Result<Option<Correspondent>, PawaPayError> {
        let body = transport::encode_predict_body(msisdn)?;
        match self
            .execute(HttpMethod::Post, "/v1/predict-correspondent", Some(body))
            .await
        {
            Ok(json) => Ok(transport::decode_predict_response(&json)?),
            Err(PawaPayError::Api {
                status, error_code, ..
            }) => {
                tracing::debug!(status, ?error_code, "remote correspondent prediction unavailable");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Initiate a deposit (collection) from the payer's wallet.
    ///
    /// Errors:
    /// - [`PawaPayError::Validation`] when no correspondent is given and none can be
    ///   predicted, or the correspondent settles in another currency,
    /// - [`PawaPayError::Rejected`] when pawaPay answers `REJECTED`,
    /// - [`PawaPayError::Api`] for non-success HTTP responses.
    pub async fn request_deposit(
        &self,
        request: DepositRequest,
    ) -> Result<DepositResponse, PawaPayError> {
        let correspondent =
            resolve_correspondent(request.correspondent(), request.payer(), request.money())?;
        if request.correspondent().is_none() {
            tracing::debug!(
                payer = %request.payer(),
                correspondent = %correspondent,
                "using predicted correspondent"
            );
        }

        let body = transport::encode_deposit_body(&request, &correspondent)?;
        let json = self
            .execute(HttpMethod::Post, "/deposits", Some(body))
            .await?;
        let response = transport::decode_deposit_acceptance(&request, &correspondent, &json)?;

        if response.status == TransactionStatus::Rejected {
            return Err(rejected(response.rejection_reason));
        }
        Ok(response)
    }

    /// Look up a deposit (`GET /deposits/{id}`).
    pub async fn check_deposit_status(
        &self,
        deposit_id: DepositId,
    ) -> Result<DepositResponse, PawaPayError> {
        let json = self
            .execute(HttpMethod::Get, &format!("/deposits/{deposit_id}"), None)
            .await?;
        transport::decode_deposit_status(&json)?.ok_or_else(|| PawaPayError::NotFound {
            id: deposit_id.to_string(),
        })
    }

    /// Initiate a payout (disbursement) to the recipient's wallet.
    ///
    /// Errors are the same as for [`PawaPayClient::request_deposit`].
    pub async fn request_payout(
        &self,
        request: PayoutRequest,
    ) -> Result<PayoutResponse, PawaPayError> {
        let correspondent = resolve_correspondent(
            request.correspondent(),
            request.recipient(),
            request.money(),
        )?;
        if request.correspondent().is_none() {
            tracing::debug!(
                recipient = %request.recipient(),
                correspondent = %correspondent,
                "using predicted correspondent"
            );
        }

        let body = transport::encode_payout_body(&request, &correspondent)?;
        let json = self
            .execute(HttpMethod::Post, "/payouts", Some(body))
            .await?;
        let response = transport::decode_payout_acceptance(&request, &correspondent, &json)?;

        if response.status == TransactionStatus::Rejected {
            return Err(rejected(response.rejection_reason));
        }
        Ok(response)
    }

    /// Look up a payout (`GET /payouts/{id}`).
    pub async fn check_payout_status(
        &self,
        payout_id: PayoutId,
    ) -> Result<PayoutResponse, PawaPayError> {
        let json = self
            .execute(HttpMethod::Get, &format!("/payouts/{payout_id}"), None)
            .await?;
        transport::decode_payout_status(&json)?.ok_or_else(|| PawaPayError::NotFound {
            id: payout_id.to_string(),
        })
    }

    pub async fn refund_deposit(
        &self,
        deposit_id: DepositId,
    ) -> Result<ActionResponse, PawaPayError> {
        let json = self
            .execute(
                HttpMethod::Post,
                &format!("/v1/deposits/{deposit_id}/refund"),
                None,
            )
            .await?;
        Ok(transport::decode_action_response(&json)?)
    }

    /// Ask pawaPay to send the last callback for a deposit or payout again.
    pub async fn resend_callback(
        &self,
        transaction: impl Into<TransactionRef>,
    ) -> Result<ActionResponse, PawaPayError> {
        let transaction = transaction.into();
        let path = format!(
            "/v1/{}/{}/resend-callback",
            transaction.kind().path_segment(),
            transaction.id()
        );
        let json = self.execute(HttpMethod::Post, &path, None).await?;
        Ok(transport::decode_action_response(&json)?)
    }

    /// Create a hosted payment page session and return its redirect URL.
    pub async fn create_payment_page_deposit(
        &self,
        request: PaymentPageDeposit,
    ) -> Result<PaymentPageResponse, PawaPayError> {
        let body = transport::encode_payment_page_body(&request)?;
        let json = self
            .execute(HttpMethod::Post, "/v1/payment-page/deposits", Some(body))
            .await?;
        Ok(transport::decode_payment_page_response(&request, &json)?)
    }

    /// Check a callback signature with the configured secret.
    ///
    /// Always `false` when no callback secret is configured.
    pub fn validate_callback(&self, payload: &[u8], signature_header: &str) -> bool {
        match &self.config.callback_secret {
            Some(secret) => {
                CallbackVerifier::new(secret.clone()).verify(payload, signature_header)
            }
            None => false,
        }
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<String, PawaPayError> {
        let request = self.build_request(method, path, body);
        let mut attempt: u32 = 0;

        loop {
            tracing::debug!(?method, path, attempt, "sending pawaPay request");
            let outcome = self.http.send(&request).await;

            let retry_reason = match &outcome {
                Err(failure) if failure.is_transient() => Some(failure.source.to_string()),
                Ok(response) if RetryPolicy::is_retryable_status(response.status) => {
                    Some(format!("HTTP {}", response.status))
                }
                _ => None,
            };

            if let Some(reason) = retry_reason {
                if attempt < self.retry.max_retries {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(path, attempt, ?delay, %reason, "retrying pawaPay request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
            }

            return into_body(outcome);
        }
    }

    fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            (
                "Authorization",
                format!("Bearer {}", self.config.api_token.as_str()),
            ),
            ("Content-Type", "application/json".to_owned()),
            ("Accept", "application/json".to_owned()),
        ];
        if self.config.enable_signed_requests {
            if let Some(body) = &body {
                headers.push(("Content-Digest", content_digest(body)));
            }
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url(), path),
            headers,
            body,
        }
    }
}

fn into_body(outcome: Result<HttpResponse, TransportFailure>) -> Result<String, PawaPayError> {
    let response = outcome.map_err(TransportFailure::into_error)?;
    if matches!(response.status, 200 | 201 | 202) {
        return Ok(response.body);
    }

    let (error_code, error_message) = transport::decode_api_error(&response.body);
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    Err(PawaPayError::Api {
        status: response.status,
        error_code,
        error_message,
        body,
    })
}

fn rejected(reason: Option<RejectionReason>) -> PawaPayError {
    let reason = reason.unwrap_or_default();
    PawaPayError::Rejected {
        code: reason.code,
        message: reason.message,
    }
}

/// `Content-Digest` value for a request body.
fn content_digest(body: &str) -> String {
    format!("sha-256=:{}:", hex::encode(Sha256::digest(body.as_bytes())))
}
