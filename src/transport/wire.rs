//! Wire pieces shared by every endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Correspondent, Currency, FailureReason, Msisdn, RejectionReason, TransactionStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response field {field} has an invalid value: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("response is missing field {field}")]
    MissingField { field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportStatus {
    Accepted,
    Submitted,
    Enqueued,
    Pending,
    Completed,
    Failed,
    Rejected,
    Cancelled,
    DuplicateIgnored,
    InReconciliation,
}

impl From<TransportStatus> for TransactionStatus {
    fn from(value: TransportStatus) -> Self {
        match value {
            TransportStatus::Accepted => TransactionStatus::Accepted,
            TransportStatus::Submitted => TransactionStatus::Submitted,
            TransportStatus::Enqueued => TransactionStatus::Enqueued,
            TransportStatus::Pending => TransactionStatus::Pending,
            TransportStatus::Completed => TransactionStatus::Completed,
            TransportStatus::Failed => TransactionStatus::Failed,
            TransportStatus::Rejected => TransactionStatus::Rejected,
            TransportStatus::Cancelled => TransactionStatus::Cancelled,
            TransportStatus::DuplicateIgnored => TransactionStatus::DuplicateIgnored,
            TransportStatus::InReconciliation => TransactionStatus::InReconciliation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRejection {
    #[serde(default)]
    rejection_code: Option<String>,
    #[serde(default)]
    rejection_message: Option<String>,
}

impl From<TransportRejection> for RejectionReason {
    fn from(value: TransportRejection) -> Self {
        Self {
            code: value.rejection_code,
            message: value.rejection_message,
        }
    }
}

/// `failureReason` is either a bare message or `{failureCode, failureMessage}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransportFailureReason {
    Message(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        #[serde(default)]
        failure_code: Option<String>,
        #[serde(default)]
        failure_message: Option<String>,
    },
}

impl From<TransportFailureReason> for FailureReason {
    fn from(value: TransportFailureReason) -> Self {
        match value {
            TransportFailureReason::Message(message) => Self {
                code: None,
                message: Some(message),
            },
            TransportFailureReason::Detailed {
                failure_code,
                failure_message,
            } => Self {
                code: failure_code,
                message: failure_message,
            },
        }
    }
}

/// Payer or recipient. Accepts both `{type, address: {value}}` and the flat `{type, value}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportAccount {
    #[serde(default)]
    address: Option<TransportAddress>,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TransportAddress {
    value: String,
}

impl TransportAccount {
    pub fn into_msisdn(self, field: &'static str) -> Result<Msisdn, TransportError> {
        let value = self
            .address
            .map(|address| address.value)
            .or(self.value)
            .ok_or(TransportError::MissingField { field })?;
        Msisdn::new(value.clone()).map_err(|_| TransportError::InvalidField { field, value })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    address: AddressBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
struct AddressBody<'a> {
    value: &'a str,
}

impl<'a> AccountBody<'a> {
    pub fn msisdn(msisdn: &'a Msisdn) -> Self {
        Self {
            kind: "MSISDN",
            address: AddressBody {
                value: msisdn.as_str(),
            },
        }
    }
}

/// RFC 3339 with microseconds and a `Z` suffix, e.g. `2024-01-02T03:04:05.123456Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_currency(value: String) -> Result<Currency, TransportError> {
    Currency::parse(&value).map_err(|_| TransportError::InvalidField {
        field: "currency",
        value,
    })
}

pub fn parse_correspondent(value: String) -> Result<Correspondent, TransportError> {
    Correspondent::new(value.clone()).map_err(|_| TransportError::InvalidField {
        field: "correspondent",
        value,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorJson {
    #[serde(default)]
    error_code: Option<ErrorCode>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ErrorCode {
    Text(String),
    Number(serde_json::Number),
}

/// `errorCode` / `errorMessage` from a non-success response body, if it has them.
pub fn decode_api_error(body: &str) -> (Option<String>, Option<String>) {
    match serde_json::from_str::<ApiErrorJson>(body) {
        Ok(parsed) => (
            parsed.error_code.map(|code| match code {
                ErrorCode::Text(text) => text,
                ErrorCode::Number(number) => number.to_string(),
            }),
            parsed.error_message,
        ),
        Err(_) => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn account_body_uses_address_object() {
        let msisdn = Msisdn::new("254700000001").unwrap();
        let json = serde_json::to_string(&AccountBody::msisdn(&msisdn)).unwrap();
        assert_eq!(json, r#"{"type":"MSISDN","address":{"value":"254700000001"}}"#);
    }

    #[test]
    fn account_accepts_nested_and_flat_forms() {
        let nested: TransportAccount =
            serde_json::from_str(r#"{"type":"MSISDN","address":{"value":"254700000001"}}"#)
                .unwrap();
        assert_eq!(nested.into_msisdn("payer").unwrap().as_str(), "254700000001");

        let flat: TransportAccount =
            serde_json::from_str(r#"{"type":"MSISDN","value":"+233540000001"}"#).unwrap();
        assert_eq!(flat.into_msisdn("recipient").unwrap().as_str(), "233540000001");

        let empty: TransportAccount = serde_json::from_str(r#"{"type":"MSISDN"}"#).unwrap();
        assert!(matches!(
            empty.into_msisdn("payer"),
            Err(TransportError::MissingField { field: "payer" })
        ));
    }

    #[test]
    fn failure_reason_accepts_string_or_object() {
        let text: TransportFailureReason = serde_json::from_str(r#""PAYER_NOT_FOUND""#).unwrap();
        let reason = FailureReason::from(text);
        assert_eq!(reason.message.as_deref(), Some("PAYER_NOT_FOUND"));

        let object: TransportFailureReason = serde_json::from_str(
            r#"{"failureCode":"INSUFFICIENT_BALANCE","failureMessage":"Not enough funds"}"#,
        )
        .unwrap();
        let reason = FailureReason::from(object);
        assert_eq!(reason.code.as_deref(), Some("INSUFFICIENT_BALANCE"));
        assert_eq!(reason.message.as_deref(), Some("Not enough funds"));
    }

    #[test]
    fn timestamps_use_microseconds_and_z() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(timestamp), "2024-01-02T03:04:05.000000Z");
    }

    #[test]
    fn api_error_fields_are_optional() {
        let (code, message) =
            decode_api_error(r#"{"errorCode":"5","errorMessage":"Invalid correspondent"}"#);
        assert_eq!(code.as_deref(), Some("5"));
        assert_eq!(message.as_deref(), Some("Invalid correspondent"));

        let (code, _) = decode_api_error(r#"{"errorCode":401}"#);
        assert_eq!(code.as_deref(), Some("401"));

        assert_eq!(decode_api_error("<html>"), (None, None));
    }
}
