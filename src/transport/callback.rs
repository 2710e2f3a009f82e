use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::amount::WireAmount;
use super::wire::{TransportError, TransportFailureReason, TransportStatus, parse_correspondent};
use crate::domain::{CallbackNotification, TransactionKind};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallbackJson {
    #[serde(default)]
    deposit_id: Option<String>,
    #[serde(default)]
    payout_id: Option<String>,
    #[serde(default)]
    refund_id: Option<String>,
    status: TransportStatus,
    #[serde(default, alias = "requestedAmount")]
    amount: Option<WireAmount>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    correspondent: Option<String>,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    customer_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    failure_reason: Option<TransportFailureReason>,
}

/// Decode a callback body. The transaction kind follows from which id field is present.
pub fn decode_callback(payload: &[u8]) -> Result<CallbackNotification, TransportError> {
    let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(payload)?;
    let parsed: CallbackJson = serde_json::from_slice(payload)?;

    let (kind, field, raw_id) = if let Some(id) = parsed.deposit_id {
        (TransactionKind::Deposit, "depositId", id)
    } else if let Some(id) = parsed.payout_id {
        (TransactionKind::Payout, "payoutId", id)
    } else if let Some(id) = parsed.refund_id {
        (TransactionKind::Refund, "refundId", id)
    } else {
        return Err(TransportError::MissingField { field: "depositId" });
    };

    let id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| TransportError::InvalidField { field, value: raw_id })?;

    Ok(CallbackNotification {
        kind,
        id,
        status: parsed.status.into(),
        amount: parsed.amount.map(WireAmount::into_inner),
        currency: parsed.currency,
        correspondent: parsed.correspondent.map(parse_correspondent).transpose()?,
        created: parsed.created,
        customer_timestamp: parsed.customer_timestamp,
        failure_reason: parsed.failure_reason.map(Into::into),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;

    #[test]
    fn decode_deposit_callback() {
        let payload = br#"{
          "depositId": "8917c345-4791-4285-a416-62f24b6982db",
          "status": "COMPLETED",
          "requestedAmount": "15",
          "depositedAmount": "15",
          "currency": "ZMW",
          "country": "ZMB",
          "correspondent": "MTN_MOMO_ZMB",
          "payer": {"type": "MSISDN", "address": {"value": "260763456789"}},
          "customerTimestamp": "2020-02-21T17:32:28.000Z",
          "created": "2020-02-21T17:32:29.000Z"
        }"#;
        let notification = decode_callback(payload).unwrap();
        assert_eq!(notification.kind, TransactionKind::Deposit);
        assert_eq!(notification.status, TransactionStatus::Completed);
        assert_eq!(notification.amount.as_deref(), Some("15"));
        assert_eq!(
            notification.id.to_string(),
            "8917c345-4791-4285-a416-62f24b6982db"
        );
        assert_eq!(
            notification.fields.get("country").and_then(|v| v.as_str()),
            Some("ZMB")
        );
    }

    #[test]
    fn decode_payout_callback_with_failure() {
        let payload = br#"{
          "payoutId": "b1e3c1f0-7d6a-4c55-9f0e-2f1a7c9f5a11",
          "status": "FAILED",
          "amount": 100,
          "failureReason": {"failureCode": "RECIPIENT_NOT_FOUND"}
        }"#;
        let notification = decode_callback(payload).unwrap();
        assert_eq!(notification.kind, TransactionKind::Payout);
        assert_eq!(notification.amount.as_deref(), Some("100"));
        assert_eq!(
            notification.failure_reason.unwrap().code.as_deref(),
            Some("RECIPIENT_NOT_FOUND")
        );
    }

    #[test]
    fn decode_callback_requires_an_id() {
        assert!(matches!(
            decode_callback(br#"{"status":"COMPLETED"}"#),
            Err(TransportError::MissingField { .. })
        ));
        assert!(matches!(
            decode_callback(br#"{"refundId":"x","status":"COMPLETED"}"#),
            Err(TransportError::InvalidField {
                field: "refundId",
                ..
            })
        ));
        assert!(matches!(
            decode_callback(b"not json"),
            Err(TransportError::Json(_))
        ));
    }
}
