use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::WireAmount;
use super::wire::{
    AccountBody, TransportAccount, TransportError, TransportFailureReason, TransportRejection,
    TransportStatus, format_timestamp, parse_correspondent, parse_currency,
};
use crate::domain::{Correspondent, DepositId, DepositRequest, DepositResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DepositBody<'a> {
    deposit_id: String,
    amount: String,
    currency: &'static str,
    correspondent: &'a str,
    payer: AccountBody<'a>,
    customer_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    statement_description: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositAcceptanceJson {
    deposit_id: String,
    status: TransportStatus,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    rejection_reason: Option<TransportRejection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositRecordJson {
    deposit_id: String,
    status: TransportStatus,
    #[serde(alias = "requestedAmount")]
    amount: WireAmount,
    currency: String,
    correspondent: String,
    payer: TransportAccount,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    customer_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    failure_reason: Option<TransportFailureReason>,
    #[serde(default)]
    rejection_reason: Option<TransportRejection>,
}

/// JSON body for `POST /deposits`. `correspondent` is the already-resolved one.
pub fn encode_deposit_body(
    request: &DepositRequest,
    correspondent: &Correspondent,
) -> Result<String, TransportError> {
    let body = DepositBody {
        deposit_id: request.deposit_id().to_string(),
        amount: request.money().amount.to_string(),
        currency: request.money().currency.as_str(),
        correspondent: correspondent.as_str(),
        payer: AccountBody::msisdn(request.payer()),
        customer_timestamp: format_timestamp(request.customer_timestamp()),
        statement_description: request.statement_description().map(|it| it.as_str()),
    };
    Ok(serde_json::to_string(&body)?)
}

/// Decode the `POST /deposits` answer and merge it with what was sent.
pub fn decode_deposit_acceptance(
    request: &DepositRequest,
    correspondent: &Correspondent,
    json: &str,
) -> Result<DepositResponse, TransportError> {
    let parsed: DepositAcceptanceJson = serde_json::from_str(json)?;

    Ok(DepositResponse {
        deposit_id: parse_deposit_id(parsed.deposit_id)?,
        status: parsed.status.into(),
        amount: request.money().amount.to_string(),
        currency: request.money().currency,
        correspondent: correspondent.clone(),
        payer: request.payer().clone(),
        created: parsed.created,
        customer_timestamp: Some(request.customer_timestamp()),
        failure_reason: None,
        rejection_reason: parsed.rejection_reason.map(Into::into),
    })
}

/// Decode `GET /deposits/{id}`: an array holding zero or one record.
pub fn decode_deposit_status(json: &str) -> Result<Option<DepositResponse>, TransportError> {
    let parsed: Vec<DepositRecordJson> = serde_json::from_str(json)?;
    parsed.into_iter().next().map(into_deposit_response).transpose()
}

fn into_deposit_response(record: DepositRecordJson) -> Result<DepositResponse, TransportError> {
    Ok(DepositResponse {
        deposit_id: parse_deposit_id(record.deposit_id)?,
        status: record.status.into(),
        amount: record.amount.into_inner(),
        currency: parse_currency(record.currency)?,
        correspondent: parse_correspondent(record.correspondent)?,
        payer: record.payer.into_msisdn("payer")?,
        created: record.created,
        customer_timestamp: record.customer_timestamp,
        failure_reason: record.failure_reason.map(Into::into),
        rejection_reason: record.rejection_reason.map(Into::into),
    })
}

fn parse_deposit_id(value: String) -> Result<DepositId, TransportError> {
    DepositId::parse(&value).map_err(|_| TransportError::InvalidField {
        field: DepositId::FIELD,
        value,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{
        CorrespondentCode, Currency, Money, Msisdn, StatementDescription, TransactionStatus,
    };

    const ID: &str = "8917c345-4791-4285-a416-62f24b6982db";

    fn request() -> DepositRequest {
        DepositRequest::new(
            Money::parse("100.50", "KES").unwrap(),
            Msisdn::new("+254 700 000 001").unwrap(),
        )
        .with_deposit_id(DepositId::parse(ID).unwrap())
        .with_customer_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn encode_deposit_body_matches_wire_format() {
        let correspondent = Correspondent::from(CorrespondentCode::MpesaKen);
        let body = encode_deposit_body(&request(), &correspondent).unwrap();
        assert_eq!(
            body,
            concat!(
                r#"{"depositId":"8917c345-4791-4285-a416-62f24b6982db","#,
                r#""amount":"100.50","currency":"KES","correspondent":"MPESA_KEN","#,
                r#""payer":{"type":"MSISDN","address":{"value":"254700000001"}},"#,
                r#""customerTimestamp":"2024-05-01T12:00:00.000000Z"}"#
            )
        );
    }

    #[test]
    fn encode_includes_statement_description_when_set() {
        let correspondent = Correspondent::from(CorrespondentCode::MpesaKen);
        let request =
            request().with_statement_description(StatementDescription::new("Order 42").unwrap());
        let body = encode_deposit_body(&request, &correspondent).unwrap();
        assert!(body.ends_with(r#""statementDescription":"Order 42"}"#));
    }

    #[test]
    fn decode_acceptance_merges_request_fields() {
        let correspondent = Correspondent::from(CorrespondentCode::MpesaKen);
        let json = r#"
        {
          "depositId": "8917c345-4791-4285-a416-62f24b6982db",
          "status": "ACCEPTED",
          "created": "2024-05-01T12:00:01Z"
        }
        "#;
        let response = decode_deposit_acceptance(&request(), &correspondent, json).unwrap();
        assert_eq!(response.status, TransactionStatus::Accepted);
        assert_eq!(response.amount, "100.50");
        assert_eq!(response.currency, Currency::Kes);
        assert_eq!(response.payer.as_str(), "254700000001");
        assert_eq!(
            response.created,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 1).unwrap())
        );
        assert!(response.rejection_reason.is_none());
    }

    #[test]
    fn decode_acceptance_keeps_rejection_reason() {
        let correspondent = Correspondent::from(CorrespondentCode::MpesaKen);
        let json = r#"
        {
          "depositId": "8917c345-4791-4285-a416-62f24b6982db",
          "status": "REJECTED",
          "rejectionReason": {
            "rejectionCode": "AMOUNT_TOO_SMALL",
            "rejectionMessage": "Amount should be greater than 1"
          }
        }
        "#;
        let response = decode_deposit_acceptance(&request(), &correspondent, json).unwrap();
        assert_eq!(response.status, TransactionStatus::Rejected);
        let reason = response.rejection_reason.unwrap();
        assert_eq!(reason.code.as_deref(), Some("AMOUNT_TOO_SMALL"));
    }

    #[test]
    fn decode_status_reads_first_record() {
        let json = r#"
        [
          {
            "depositId": "8917c345-4791-4285-a416-62f24b6982db",
            "status": "FAILED",
            "requestedAmount": 15,
            "currency": "ZMW",
            "country": "ZMB",
            "correspondent": "MTN_MOMO_ZMB",
            "payer": {"type": "MSISDN", "address": {"value": "260763456789"}},
            "customerTimestamp": "2024-05-01T12:00:00Z",
            "created": "2024-05-01T12:00:01Z",
            "failureReason": {"failureCode": "PAYER_NOT_FOUND", "failureMessage": "Unknown payer"}
          }
        ]
        "#;
        let response = decode_deposit_status(json).unwrap().unwrap();
        assert_eq!(response.status, TransactionStatus::Failed);
        assert_eq!(response.amount, "15");
        assert_eq!(response.currency, Currency::Zmw);
        assert_eq!(
            response.correspondent.known(),
            Some(CorrespondentCode::MtnMomoZmb)
        );
        assert_eq!(
            response.failure_reason.unwrap().code.as_deref(),
            Some("PAYER_NOT_FOUND")
        );
    }

    #[test]
    fn decode_status_empty_array_is_none() {
        assert!(decode_deposit_status("[]").unwrap().is_none());
    }

    #[test]
    fn decode_status_rejects_unsupported_currency() {
        let json = r#"
        [{
          "depositId": "8917c345-4791-4285-a416-62f24b6982db",
          "status": "COMPLETED",
          "amount": "1.00",
          "currency": "USD",
          "correspondent": "MPESA_KEN",
          "payer": {"type": "MSISDN", "address": {"value": "254700000001"}}
        }]
        "#;
        assert!(matches!(
            decode_deposit_status(json),
            Err(TransportError::InvalidField {
                field: "currency",
                ..
            })
        ));
    }
}
