use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    InvalidMsisdn {
        input: String,
    },
    InvalidAmount {
        input: String,
    },
    UnsupportedCurrency {
        input: String,
    },
    InvalidStatementDescription {
        input: String,
    },
    InvalidId {
        field: &'static str,
        input: String,
    },
    UnknownCorrespondent {
        msisdn: String,
    },
    CurrencyMismatch {
        correspondent: String,
        expected: String,
        actual: String,
    },
}

impl ValidationError {
    /// Whether this error is a malformed-input error (phone number, amount, currency, ...).
    ///
    /// `UnknownCorrespondent` and `CurrencyMismatch` are well-formed inputs the
    /// client cannot route.
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            Self::UnknownCorrespondent { .. } | Self::CurrencyMismatch { .. }
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidMsisdn { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidAmount { input } => write!(f, "invalid amount: {input}"),
            Self::UnsupportedCurrency { input } => write!(f, "unsupported currency: {input}"),
            Self::InvalidStatementDescription { input } => write!(
                f,
                "invalid statement description: {input:?} (expected 4-22 alphanumeric characters or spaces)"
            ),
            Self::InvalidId { field, input } => write!(f, "invalid {field}: {input}"),
            Self::UnknownCorrespondent { msisdn } => {
                write!(f, "no known correspondent for phone number: {msisdn}")
            }
            Self::CurrencyMismatch {
                correspondent,
                expected,
                actual,
            } => write!(
                f,
                "correspondent {correspondent} settles in {expected}, got {actual}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "apiToken" };
        assert_eq!(err.to_string(), "apiToken must not be empty");

        let err = ValidationError::InvalidMsisdn {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::UnknownCorrespondent {
            msisdn: "4915112345678".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no known correspondent for phone number: 4915112345678"
        );

        let err = ValidationError::CurrencyMismatch {
            correspondent: "MPESA_KEN".to_owned(),
            expected: "KES".to_owned(),
            actual: "GHS".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "correspondent MPESA_KEN settles in KES, got GHS"
        );
    }

    #[test]
    fn routing_errors_are_not_format_errors() {
        assert!(
            ValidationError::InvalidAmount {
                input: "x".to_owned()
            }
            .is_format_error()
        );
        assert!(
            !ValidationError::UnknownCorrespondent {
                msisdn: "1".to_owned()
            }
            .is_format_error()
        );
    }
}
