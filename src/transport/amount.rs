use serde::de::{Deserialize, Deserializer, Error as DeError, Unexpected};
use serde_json::value::RawValue;

/// `amount` / `requestedAmount` as pawaPay sends it.
///
/// The API documents the field as a decimal string, but some callbacks carry a
/// bare JSON number. Number tokens are taken from the raw document so the
/// scale survives (`100.50` stays `"100.50"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireAmount(String);

impl WireAmount {
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_decimal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

impl<'de> Deserialize<'de> for WireAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let token = raw.get();

        let text = if token.starts_with('"') {
            serde_json::from_str::<String>(token).map_err(D::Error::custom)?
        } else {
            token.to_owned()
        };

        let text = text.trim();
        if is_decimal(text) {
            Ok(Self(text.to_owned()))
        } else {
            Err(D::Error::invalid_value(
                Unexpected::Str(text),
                &"a decimal amount",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Record {
        amount: WireAmount,
    }

    fn amount(json: &str) -> Result<String, serde_json::Error> {
        serde_json::from_str::<Record>(json).map(|record| record.amount.into_inner())
    }

    #[test]
    fn string_and_number_amounts_keep_their_scale() {
        assert_eq!(amount(r#"{"amount": "15.00"}"#).unwrap(), "15.00");
        assert_eq!(amount(r#"{"amount": 100.50}"#).unwrap(), "100.50");
        assert_eq!(amount(r#"{"amount": 100}"#).unwrap(), "100");
    }

    #[test]
    fn non_decimal_amounts_are_rejected() {
        assert!(amount(r#"{"amount": true}"#).is_err());
        assert!(amount(r#"{"amount": ""}"#).is_err());
        assert!(amount(r#"{"amount": "ten"}"#).is_err());
        assert!(amount(r#"{"amount": 1e3}"#).is_err());
        assert!(amount(r#"{"amount": "1."}"#).is_err());
    }
}
