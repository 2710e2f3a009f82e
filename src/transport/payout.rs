use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount::WireAmount;
use super::wire::{
    AccountBody, TransportAccount, TransportError, TransportFailureReason, TransportRejection,
    TransportStatus, format_timestamp, parse_correspondent, parse_currency,
};
use crate::domain::{Correspondent, PayoutId, PayoutRequest, PayoutResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayoutBody<'a> {
    payout_id: String,
    amount: String,
    currency: &'static str,
    correspondent: &'a str,
    recipient: AccountBody<'a>,
    customer_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    statement_description: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayoutAcceptanceJson {
    payout_id: String,
    status: TransportStatus,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    rejection_reason: Option<TransportRejection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayoutRecordJson {
    payout_id: String,
    status: TransportStatus,
    amount: WireAmount,
    currency: String,
    correspondent: String,
    recipient: TransportAccount,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    customer_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    failure_reason: Option<TransportFailureReason>,
    #[serde(default)]
    rejection_reason: Option<TransportRejection>,
}

pub fn encode_payout_body(
    request: &PayoutRequest,
    correspondent: &Correspondent,
) -> Result<String, TransportError> {
    let body = PayoutBody {
        payout_id: request.payout_id().to_string(),
        amount: request.money().amount.to_string(),
        currency: request.money().currency.as_str(),
        correspondent: correspondent.as_str(),
        recipient: AccountBody::msisdn(request.recipient()),
        customer_timestamp: format_timestamp(request.customer_timestamp()),
        statement_description: request.statement_description().map(|it| it.as_str()),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn decode_payout_acceptance(
    request: &PayoutRequest,
    correspondent: &Correspondent,
    json: &str,
) -> Result<PayoutResponse, TransportError> {
    let parsed: PayoutAcceptanceJson = serde_json::from_str(json)?;

    Ok(PayoutResponse {
        payout_id: parse_payout_id(parsed.payout_id)?,
        status: parsed.status.into(),
        amount: request.money().amount.to_string(),
        currency: request.money().currency,
        correspondent: correspondent.clone(),
        recipient: request.recipient().clone(),
        created: parsed.created,
        customer_timestamp: Some(request.customer_timestamp()),
        failure_reason: None,
        rejection_reason: parsed.rejection_reason.map(Into::into),
    })
}

pub fn decode_payout_status(json: &str) -> Result<Option<PayoutResponse>, TransportError> {
    let parsed: Vec<PayoutRecordJson> = serde_json::from_str(json)?;
    parsed.into_iter().next().map(into_payout_response).transpose()
}

fn into_payout_response(record: PayoutRecordJson) -> Result<PayoutResponse, TransportError> {
    Ok(PayoutResponse {
        payout_id: parse_payout_id(record.payout_id)?,
        status: record.status.into(),
        amount: record.amount.into_inner(),
        currency: parse_currency(record.currency)?,
        correspondent: parse_correspondent(record.correspondent)?,
        recipient: record.recipient.into_msisdn("recipient")?,
        created: record.created,
        customer_timestamp: record.customer_timestamp,
        failure_reason: record.failure_reason.map(Into::into),
        rejection_reason: record.rejection_reason.map(Into::into),
    })
}

fn parse_payout_id(value: String) -> Result<PayoutId, TransportError> {
    PayoutId::parse(&value).map_err(|_| TransportError::InvalidField {
        field: PayoutId::FIELD,
        value,
    })
}
