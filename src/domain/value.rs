use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::correspondent::Country;
use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// pawaPay API token sent as `Authorization: Bearer <token>`.
///
/// Invariant: non-empty after trimming. `Debug` never prints the value.
pub struct ApiToken(String);

impl ApiToken {
    /// Field name used in errors and configuration.
    pub const FIELD: &'static str = "apiToken";

    /// Create a validated [`ApiToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Shared secret used to sign callbacks.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct CallbackSecret(String);

impl CallbackSecret {
    /// Field name used in errors and configuration.
    pub const FIELD: &'static str = "callbackSecret";

    /// Create a validated [`CallbackSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for CallbackSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number in international format without a leading `+` (MSISDN).
///
/// Invariant: matches `^[1-9][0-9]{6,14}$`. Construction strips `+`, whitespace,
/// dashes and leading zeros, so normalizing an already-normalized value is a no-op.
pub struct Msisdn(String);

impl Msisdn {
    /// Field name used by pawaPay (`msisdn`).
    pub const FIELD: &'static str = "msisdn";

    /// Minimum number of digits after normalization.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits after normalization (E.164 limit).
    pub const MAX_DIGITS: usize = 15;

    /// Normalize and validate a phone number given in international format.
    pub fn new(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let cleaned = input
            .chars()
            .filter(|ch| !(ch.is_whitespace() || *ch == '+' || *ch == '-'))
            .collect::<String>();

        if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidMsisdn { input });
        }

        let digits = cleaned.trim_start_matches('0');
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(ValidationError::InvalidMsisdn { input });
        }

        Ok(Self(digits.to_owned()))
    }

    /// Parse a number written in the national format of `country`
    /// (e.g. `0712 345 678` in Kenya) into an international MSISDN.
    pub fn parse_local(country: Country, input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(Some(country.region()), raw).map_err(|_| {
            ValidationError::InvalidMsisdn {
                input: raw.to_owned(),
            }
        })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Self::new(e164)
    }

    /// Borrow the normalized digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Msisdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Msisdn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Returns `true` when `input` normalizes to a valid MSISDN.
pub fn validate_msisdn(input: &str) -> bool {
    Msisdn::new(input).is_ok()
}

/// Strip separators and leading zeros from `input` and validate the result.
pub fn normalize_msisdn(input: &str) -> Result<Msisdn, ValidationError> {
    Msisdn::new(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Non-negative decimal amount in major currency units.
///
/// Invariant: at most two fractional digits and no larger than [`Amount::max`].
/// The scale given by the caller is kept on the wire (`"100.50"` stays `"100.50"`).
pub struct Amount(Decimal);

impl Amount {
    /// Field name used by pawaPay (`amount`).
    pub const FIELD: &'static str = "amount";

    /// Maximum number of fractional digits.
    pub const MAX_SCALE: u32 = 2;

    /// Largest accepted amount.
    pub fn max() -> Decimal {
        Decimal::new(9_999_999_999, 0)
    }

    /// Parse and validate a decimal amount such as `"100"` or `"100.50"`.
    ///
    /// Only ASCII digits and a single `.` are accepted: no exponent, no digit
    /// separators, no surrounding whitespace.
    pub fn new(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        if input.is_empty()
            || !input
                .bytes()
                .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
        {
            return Err(ValidationError::InvalidAmount { input });
        }

        let value = match Decimal::from_str(&input) {
            Ok(value) => value,
            Err(_) => return Err(ValidationError::InvalidAmount { input }),
        };

        if value.is_sign_negative() || value.scale() > Self::MAX_SCALE || value > Self::max() {
            return Err(ValidationError::InvalidAmount { input });
        }

        Ok(Self(value))
    }

    /// The underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Amount with trailing fractional zeros removed (`"100.50"` becomes `"100.5"`).
    pub fn normalized(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Returns `true` when `input` is a non-negative decimal with at most two fractional digits.
pub fn validate_amount(input: &str) -> bool {
    Amount::new(input).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Currencies supported by pawaPay correspondents.
pub enum Currency {
    /// Ghana cedi.
    Ghs,
    /// Kenyan shilling.
    Kes,
    /// Ugandan shilling.
    Ugx,
    /// Tanzanian shilling.
    Tzs,
    /// Rwandan franc.
    Rwf,
    /// West African CFA franc.
    Xof,
    /// Central African CFA franc.
    Xaf,
    /// Zambian kwacha.
    Zmw,
    /// Malawian kwacha.
    Mwk,
}

impl Currency {
    /// Field name used by pawaPay (`currency`).
    pub const FIELD: &'static str = "currency";

    /// Every supported currency, one per [`Country`](crate::domain::Country).
    pub const ALL: [Currency; 9] = [
        Self::Ghs,
        Self::Kes,
        Self::Ugx,
        Self::Tzs,
        Self::Rwf,
        Self::Xof,
        Self::Xaf,
        Self::Zmw,
        Self::Mwk,
    ];

    /// Parse an ISO 4217 code (case-insensitive).
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|currency| currency.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| ValidationError::UnsupportedCurrency {
                input: code.to_owned(),
            })
    }

    /// ISO 4217 code as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ghs => "GHS",
            Self::Kes => "KES",
            Self::Ugx => "UGX",
            Self::Tzs => "TZS",
            Self::Rwf => "RWF",
            Self::Xof => "XOF",
            Self::Xaf => "XAF",
            Self::Zmw => "ZMW",
            Self::Mwk => "MWK",
        }
    }

    /// Local display symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Ghs => "₵",
            Self::Kes => "KSh",
            Self::Ugx => "USh",
            Self::Tzs => "TSh",
            Self::Rwf => "RF",
            Self::Xof => "CFA",
            Self::Xaf => "FCFA",
            Self::Zmw => "ZK",
            Self::Mwk => "MK",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns `true` when `code` is one of the supported currencies.
pub fn validate_currency(code: &str) -> bool {
    Currency::parse(code).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// An [`Amount`] in a specific [`Currency`].
pub struct Money {
    /// Validated decimal amount, sent with the caller's scale.
    pub amount: Amount,
    pub currency: Currency,
}

impl Money {
    /// Pair an already-validated amount with its currency.
    pub fn new(amount: Amount, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Validate both parts from raw strings.
    pub fn parse(amount: &str, currency: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            amount: Amount::new(amount)?,
            currency: Currency::parse(currency)?,
        })
    }
}

impl fmt::Display for Money {
    /// Formats as `"<symbol> <amount>"`, e.g. `KSh 100.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency.symbol(), self.amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Client-generated deposit identifier (`depositId`).
pub struct DepositId(Uuid);

impl DepositId {
    /// Field name used by pawaPay (`depositId`).
    pub const FIELD: &'static str = "depositId";

    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier returned by pawaPay or stored by the caller.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId {
                field: Self::FIELD,
                input: input.to_owned(),
            })
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for DepositId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Client-generated payout identifier (`payoutId`).
pub struct PayoutId(Uuid);

impl PayoutId {
    /// Field name used by pawaPay (`payoutId`).
    pub const FIELD: &'static str = "payoutId";

    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier returned by pawaPay or stored by the caller.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidId {
                field: Self::FIELD,
                input: input.to_owned(),
            })
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PayoutId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Text shown on the customer's statement (`statementDescription`).
///
/// Invariant: 4 to 22 characters, ASCII letters, digits or spaces.
pub struct StatementDescription(String);

impl StatementDescription {
    /// Field name used by pawaPay (`statementDescription`).
    pub const FIELD: &'static str = "statementDescription";

    /// Length bounds, in characters.
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 22;

    /// Create a validated [`StatementDescription`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let valid_len = (Self::MIN_LEN..=Self::MAX_LEN).contains(&value.len());
        let valid_chars = value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b' ');
        if !valid_len || !valid_chars {
            return Err(ValidationError::InvalidStatementDescription { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the description.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let token = ApiToken::new("  key ").unwrap();
        assert_eq!(token.as_str(), "key");
        assert!(ApiToken::new("  ").is_err());
        assert_eq!(format!("{token:?}"), "ApiToken(***)");

        let secret = CallbackSecret::new(" secret ").unwrap();
        assert_eq!(secret.as_str(), " secret ");
        assert!(CallbackSecret::new("").is_err());
        assert_eq!(format!("{secret:?}"), "CallbackSecret(***)");

        let description = StatementDescription::new("Order 1234").unwrap();
        assert_eq!(description.as_str(), "Order 1234");
        assert!(StatementDescription::new("abc").is_err());
        assert!(StatementDescription::new("this one is far too long").is_err());
        assert!(StatementDescription::new("Order #1234").is_err());
    }

    #[test]
    fn msisdn_strips_separators_and_leading_zeros() {
        assert_eq!(Msisdn::new("+254 700-000-001").unwrap().as_str(), "254700000001");
        assert_eq!(Msisdn::new("00233540000001").unwrap().as_str(), "233540000001");
        assert_eq!(Msisdn::new("\t256700000001 ").unwrap().as_str(), "256700000001");
    }

    #[test]
    fn msisdn_rejects_non_digits_and_bad_lengths() {
        assert!(Msisdn::new("").is_err());
        assert!(Msisdn::new("+").is_err());
        assert!(Msisdn::new("0000000").is_err());
        assert!(Msisdn::new("25470000000a").is_err());
        assert!(Msisdn::new("(254) 700000001").is_err());
        assert!(Msisdn::new("123456").is_err());
        assert!(Msisdn::new("1234567").is_ok());
        assert!(Msisdn::new("123456789012345").is_ok());
        assert!(Msisdn::new("1234567890123456").is_err());
        assert!(Msisdn::new("٢٥٤٧٠٠٠٠٠٠٠١").is_err());
    }

    #[test]
    fn normalize_msisdn_is_idempotent() {
        let inputs = [
            "+254700000001",
            " 254 700 000 001 ",
            "0254-700-000-001",
            "+00233540000001",
            "1234567",
        ];
        for input in inputs {
            let once = normalize_msisdn(input).unwrap();
            let twice = normalize_msisdn(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {input:?}");
            assert!(validate_msisdn(once.as_str()));
        }
    }

    #[test]
    fn msisdn_parse_local_uses_country_region() {
        let kenya = Msisdn::parse_local(Country::Kenya, "0712 345 678").unwrap();
        assert_eq!(kenya.as_str(), "254712345678");

        let ghana = Msisdn::parse_local(Country::Ghana, "024 123 4567").unwrap();
        assert_eq!(ghana.as_str(), "233241234567");

        assert!(Msisdn::parse_local(Country::Ghana, "   ").is_err());
        assert!(Msisdn::parse_local(Country::Ghana, "not-a-number").is_err());
    }

    #[test]
    fn amount_accepts_non_negative_two_decimal_values() {
        assert!(validate_amount("100.50"));
        assert!(validate_amount("0"));
        assert!(validate_amount("15"));
        assert!(validate_amount("0.01"));
        assert!(validate_amount("9999999999"));

        assert!(!validate_amount("-5"));
        assert!(!validate_amount("abc"));
        assert!(!validate_amount("100.999"));
        assert!(!validate_amount(""));
        assert!(!validate_amount(" 10"));
        assert!(!validate_amount("1e3"));
        assert!(!validate_amount("1_000"));
        assert!(!validate_amount("1.2.3"));
        assert!(!validate_amount("10000000000"));
    }

    #[test]
    fn amount_keeps_caller_scale_on_display() {
        let amount = Amount::new("100.50").unwrap();
        assert_eq!(amount.to_string(), "100.50");
        assert_eq!(amount.normalized(), "100.5");
        assert_eq!(Amount::new("100").unwrap().normalized(), "100");
    }

    #[test]
    fn currency_parsing_is_case_insensitive() {
        assert_eq!(Currency::parse("kes").unwrap(), Currency::Kes);
        assert_eq!("XOF".parse::<Currency>().unwrap(), Currency::Xof);
        assert!(validate_currency("GHS"));
        assert!(!validate_currency("USD"));
        assert!(!validate_currency(""));
        for currency in Currency::ALL {
            assert_eq!(Currency::parse(currency.as_str()).unwrap(), currency);
        }
    }

    #[test]
    fn money_formats_with_symbol() {
        let money = Money::parse("100.00", "kes").unwrap();
        assert_eq!(money.to_string(), "KSh 100.00");
        assert!(Money::parse("1", "EUR").is_err());
        assert!(Money::parse("-1", "KES").is_err());
    }

    #[test]
    fn ids_parse_and_display_hyphenated() {
        let id = DepositId::parse("8917c345-4791-4285-a416-62f24b6982db").unwrap();
        assert_eq!(id.to_string(), "8917c345-4791-4285-a416-62f24b6982db");
        assert!(DepositId::parse("not-a-uuid").is_err());
        assert_ne!(PayoutId::generate(), PayoutId::generate());
    }
}
