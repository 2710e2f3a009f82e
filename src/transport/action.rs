use serde::Deserialize;

use super::wire::{TransportError, TransportRejection, TransportStatus};
use crate::domain::ActionResponse;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionJson {
    #[serde(default)]
    status: Option<TransportStatus>,
    #[serde(default)]
    rejection_reason: Option<TransportRejection>,
}

/// Decode refund / resend-callback answers. An empty body is an empty response.
pub fn decode_action_response(json: &str) -> Result<ActionResponse, TransportError> {
    if json.trim().is_empty() {
        return Ok(ActionResponse::default());
    }

    let parsed: ActionJson = serde_json::from_str(json)?;
    Ok(ActionResponse {
        status: parsed.status.map(Into::into),
        rejection_reason: parsed.rejection_reason.map(Into::into),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;

    #[test]
    fn decode_action_response_handles_empty_and_rejected() {
        assert_eq!(decode_action_response("  ").unwrap(), ActionResponse::default());

        let json = r#"
        {
          "depositId": "8917c345-4791-4285-a416-62f24b6982db",
          "status": "REJECTED",
          "rejectionReason": {"rejectionMessage": "Deposit not found"}
        }
        "#;
        let response = decode_action_response(json).unwrap();
        assert_eq!(response.status, Some(TransactionStatus::Rejected));
        assert_eq!(
            response.rejection_reason.unwrap().message.as_deref(),
            Some("Deposit not found")
        );
    }

    #[test]
    fn decode_action_response_rejects_unknown_status() {
        assert!(decode_action_response(r#"{"status":"MAYBE"}"#).is_err());
    }
}
