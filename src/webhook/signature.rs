use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::CallbackSecret;

type HmacSha256 = Hmac<Sha256>;

/// HTTP header carrying the callback signature.
pub const SIGNATURE_HEADER: &str = "Signature";

/// Check that `signature_header` is the hex HMAC-SHA256 of `payload` keyed by `secret`.
///
/// The header is trimmed and may use either hex case. Returns `false` for an
/// empty secret, an empty or non-hex header, or a mismatch.
pub fn validate_callback(payload: &[u8], signature_header: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    verify_with_key(payload, signature_header, secret.as_bytes())
}

pub(super) fn verify_with_key(payload: &[u8], signature_header: &str, key: &[u8]) -> bool {
    let Some(expected) = decode_signature(signature_header) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Lowercase hex HMAC-SHA256 of `payload`.
pub fn sign_callback(payload: &[u8], secret: &CallbackSecret) -> String {
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(payload);
            hex::encode(mac.finalize().into_bytes())
        }
        // HMAC accepts keys of any length.
        Err(_) => String::new(),
    }
}

fn decode_signature(header: &str) -> Option<Vec<u8>> {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        return None;
    }
    hex::decode(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &[u8] = br#"{"depositId":"abc","status":"COMPLETED"}"#;

    fn signature(payload: &[u8], secret: &str) -> String {
        sign_callback(payload, &CallbackSecret::new(secret).unwrap())
    }

    #[test]
    fn matches_rfc_4231_vector() {
        assert_eq!(
            signature(b"what do ya want for nothing?", "Jefe"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
        assert!(validate_callback(
            b"what do ya want for nothing?",
            "5BDCC146BF60754E6A042426089575C75A003F089D2739839DEC58B964EC3843",
            "Jefe"
        ));
    }

    #[test]
    fn accepts_correct_signature() {
        let header = signature(PAYLOAD, "s3cret");
        assert!(validate_callback(PAYLOAD, &header, "s3cret"));
        assert!(validate_callback(PAYLOAD, &format!("  {header}\n"), "s3cret"));
    }

    #[test]
    fn rejects_flipped_bit() {
        let mut raw = hex::decode(signature(PAYLOAD, "s3cret")).unwrap();
        raw[0] ^= 0x01;
        assert!(!validate_callback(PAYLOAD, &hex::encode(raw), "s3cret"));
    }

    #[test]
    fn rejects_modified_payload_and_wrong_secret() {
        let header = signature(PAYLOAD, "s3cret");
        assert!(!validate_callback(
            br#"{"depositId":"abc","status":"FAILED"}"#,
            &header,
            "s3cret"
        ));
        assert!(!validate_callback(PAYLOAD, &header, "other"));
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let header = signature(PAYLOAD, "s3cret");
        assert!(!validate_callback(PAYLOAD, "", "s3cret"));
        assert!(!validate_callback(PAYLOAD, "   ", "s3cret"));
        assert!(!validate_callback(PAYLOAD, "not-hex", "s3cret"));
        assert!(!validate_callback(PAYLOAD, &header[..32], "s3cret"));
        assert!(!validate_callback(PAYLOAD, &header, ""));
    }
}
