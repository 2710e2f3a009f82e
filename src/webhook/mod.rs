//! Webhook layer: callback signature checks and payload parsing.

use std::error::Error as StdError;

use crate::domain::{CallbackNotification, CallbackSecret};

mod signature;

pub use signature::{SIGNATURE_HEADER, sign_callback, validate_callback};

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    /// The signature header did not match the payload.
    #[error("callback signature verification failed")]
    InvalidSignature,

    #[error("invalid callback payload: {0}")]
    Payload(#[source] Box<dyn StdError + Send + Sync>),
}

/// Parse a callback body without checking its signature.
pub fn parse_callback(payload: &[u8]) -> Result<CallbackNotification, CallbackError> {
    crate::transport::decode_callback(payload).map_err(|err| CallbackError::Payload(Box::new(err)))
}

#[derive(Debug, Clone)]
/// Verifies callbacks signed with a shared secret.
pub struct CallbackVerifier {
    secret: CallbackSecret,
}

impl CallbackVerifier {
    pub fn new(secret: CallbackSecret) -> Self {
        Self { secret }
    }

    pub fn verify(&self, payload: &[u8], signature_header: &str) -> bool {
        signature::verify_with_key(payload, signature_header, self.secret.as_bytes())
    }

    /// Signature pawaPay would send for `payload`.
    pub fn sign(&self, payload: &[u8]) -> String {
        sign_callback(payload, &self.secret)
    }

    /// Verify, then parse. The payload is not parsed when the signature is wrong.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<CallbackNotification, CallbackError> {
        if !self.verify(payload, signature_header) {
            tracing::debug!("rejected callback with invalid signature");
            return Err(CallbackError::InvalidSignature);
        }
        parse_callback(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionKind, TransactionStatus};

    const PAYLOAD: &[u8] = br#"{"depositId":"8917c345-4791-4285-a416-62f24b6982db","status":"COMPLETED","amount":"15","currency":"ZMW"}"#;

    fn verifier() -> CallbackVerifier {
        CallbackVerifier::new(CallbackSecret::new("s3cret").unwrap())
    }

    #[test]
    fn verify_and_parse_accepts_signed_payload() {
        let verifier = verifier();
        let header = verifier.sign(PAYLOAD);

        let notification = verifier.verify_and_parse(PAYLOAD, &header).unwrap();
        assert_eq!(notification.kind, TransactionKind::Deposit);
        assert_eq!(notification.status, TransactionStatus::Completed);
        assert_eq!(notification.currency.as_deref(), Some("ZMW"));
    }

    #[test]
    fn verify_and_parse_rejects_bad_signature_before_parsing() {
        let verifier = verifier();
        assert!(matches!(
            verifier.verify_and_parse(b"not json", "deadbeef"),
            Err(CallbackError::InvalidSignature)
        ));
        assert!(matches!(
            verifier.verify_and_parse(PAYLOAD, ""),
            Err(CallbackError::InvalidSignature)
        ));
    }

    #[test]
    fn verify_and_parse_reports_bad_payload() {
        let verifier = verifier();
        let payload = b"{\"status\":\"COMPLETED\"}";
        let header = verifier.sign(payload);
        assert!(matches!(
            verifier.verify_and_parse(payload, &header),
            Err(CallbackError::Payload(_))
        ));
    }

    #[test]
    fn verifier_agrees_with_free_function() {
        let verifier = verifier();
        let header = verifier.sign(PAYLOAD);
        assert!(verifier.verify(PAYLOAD, &header));
        assert!(validate_callback(PAYLOAD, &header, "s3cret"));
    }
}
