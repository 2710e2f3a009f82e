//! Typed Rust client for the pawaPay mobile-money API.
//!
//! The crate is layered: a domain layer of strong types (amounts, MSISDNs,
//! currencies, correspondents) that validates everything locally, a transport
//! layer for wire-format quirks, a client layer orchestrating requests with
//! retries, and a webhook layer verifying signed callbacks.
//!
//! ```rust,no_run
//! use pawapay::{DepositRequest, Money, Msisdn, PawaPayClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pawapay::PawaPayError> {
//!     let client = PawaPayClient::from_env()?;
//!     let request = DepositRequest::new(
//!         Money::parse("100.00", "KES")?,
//!         Msisdn::new("+254 700 000 001")?,
//!     );
//!     let response = client.request_deposit(request).await?;
//!     println!("{} is {}", response.deposit_id, response.status);
//!     Ok(())
//! }
//! ```
//!
//! Callbacks are verified against the raw request body:
//!
//! ```rust
//! use pawapay::{CallbackSecret, CallbackVerifier};
//!
//! let verifier = CallbackVerifier::new(CallbackSecret::new("s3cret").unwrap());
//! let body = br#"{"depositId":"8917c345-4791-4285-a416-62f24b6982db","status":"COMPLETED"}"#;
//! let signature = verifier.sign(body);
//! assert!(pawapay::validate_callback(body, &signature, "s3cret"));
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
mod transport;
pub mod webhook;

pub use client::{PawaPayClient, PawaPayClientBuilder, PawaPayError, RetryPolicy};
pub use config::{ConfigError, Environment, PawaPayConfig};
pub use domain::{
    ActionResponse, ActiveConfiguration, Amount, ApiToken, CallbackNotification, CallbackSecret,
    Correspondent, CorrespondentCode, CorrespondentInfo, Country, Currency, DepositId,
    DepositRequest, DepositResponse, Money, Msisdn, PaymentPageDeposit, PaymentPageResponse,
    PayoutId, PayoutRequest, PayoutResponse, StatementDescription, TransactionKind,
    TransactionRef, TransactionStatus, ValidationError, normalize_msisdn, predict_correspondent,
    validate_amount, validate_currency, validate_msisdn,
};
pub use webhook::{CallbackError, CallbackVerifier, SIGNATURE_HEADER, validate_callback};
