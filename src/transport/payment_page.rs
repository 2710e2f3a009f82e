use serde::{Deserialize, Serialize};
use url::Url;

use super::wire::{TransportError, format_timestamp};
use crate::domain::{PaymentPageDeposit, PaymentPageResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentPageBody<'a> {
    deposit_id: String,
    amount: String,
    currency: &'static str,
    return_url: &'a str,
    customer_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    statement_description: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentPageJson {
    #[serde(default, alias = "paymentUrl")]
    redirect_url: Option<String>,
}

pub fn encode_payment_page_body(request: &PaymentPageDeposit) -> Result<String, TransportError> {
    let body = PaymentPageBody {
        deposit_id: request.deposit_id().to_string(),
        amount: request.money().amount.to_string(),
        currency: request.money().currency.as_str(),
        return_url: request.return_url().as_str(),
        customer_timestamp: format_timestamp(request.customer_timestamp()),
        statement_description: request.statement_description().map(|it| it.as_str()),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn decode_payment_page_response(
    request: &PaymentPageDeposit,
    json: &str,
) -> Result<PaymentPageResponse, TransportError> {
    let parsed: PaymentPageJson = serde_json::from_str(json)?;
    let raw = parsed.redirect_url.ok_or(TransportError::MissingField {
        field: "redirectUrl",
    })?;
    let redirect_url = Url::parse(&raw).map_err(|_| TransportError::InvalidField {
        field: "redirectUrl",
        value: raw.clone(),
    })?;

    Ok(PaymentPageResponse {
        deposit_id: request.deposit_id(),
        redirect_url,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{DepositId, Money};

    fn request() -> PaymentPageDeposit {
        PaymentPageDeposit::new(
            Money::parse("20", "RWF").unwrap(),
            Url::parse("https://shop.example/return").unwrap(),
        )
        .with_deposit_id(DepositId::parse("8917c345-4791-4285-a416-62f24b6982db").unwrap())
        .with_customer_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn encode_payment_page_body_params() {
        assert_eq!(
            encode_payment_page_body(&request()).unwrap(),
            concat!(
                r#"{"depositId":"8917c345-4791-4285-a416-62f24b6982db","amount":"20","#,
                r#""currency":"RWF","returnUrl":"https://shop.example/return","#,
                r#""customerTimestamp":"2024-05-01T12:00:00.000000Z"}"#
            )
        );
    }

    #[test]
    fn decode_payment_page_response_parses_redirect() {
        let response = decode_payment_page_response(
            &request(),
            r#"{"redirectUrl":"https://paywith.pawapay.io/?token=abc"}"#,
        )
        .unwrap();
        assert_eq!(response.redirect_url.host_str(), Some("paywith.pawapay.io"));

        let response = decode_payment_page_response(
            &request(),
            r#"{"paymentUrl":"https://paywith.pawapay.io/?token=def"}"#,
        )
        .unwrap();
        assert_eq!(response.redirect_url.query(), Some("token=def"));

        assert!(matches!(
            decode_payment_page_response(&request(), "{}"),
            Err(TransportError::MissingField { .. })
        ));
        assert!(matches!(
            decode_payment_page_response(&request(), r#"{"redirectUrl":"bad"}"#),
            Err(TransportError::InvalidField { .. })
        ));
    }
}
