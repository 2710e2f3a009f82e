use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::domain::correspondent::{Correspondent, Country};
use crate::domain::request::TransactionKind;
use crate::domain::value::{Currency, DepositId, Msisdn, PayoutId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Transaction status as reported by pawaPay.
pub enum TransactionStatus {
    Accepted,
    Submitted,
    Enqueued,
    Pending,
    Completed,
    Failed,
    Rejected,
    Cancelled,
    DuplicateIgnored,
    InReconciliation,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 10] = [
        Self::Accepted,
        Self::Submitted,
        Self::Enqueued,
        Self::Pending,
        Self::Completed,
        Self::Failed,
        Self::Rejected,
        Self::Cancelled,
        Self::DuplicateIgnored,
        Self::InReconciliation,
    ];

    /// Wire value, e.g. `COMPLETED`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Submitted => "SUBMITTED",
            Self::Enqueued => "ENQUEUED",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
            Self::DuplicateIgnored => "DUPLICATE_IGNORED",
            Self::InReconciliation => "IN_RECONCILIATION",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Whether the transaction will not change status anymore.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Rejected | Self::Cancelled
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Why pawaPay refused to accept a request.
pub struct RejectionReason {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Why an accepted transaction failed.
pub struct FailureReason {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositResponse {
    pub deposit_id: DepositId,
    pub status: TransactionStatus,
    pub amount: String,
    pub currency: Currency,
    pub correspondent: Correspondent,
    pub payer: Msisdn,
    pub created: Option<DateTime<Utc>>,
    pub customer_timestamp: Option<DateTime<Utc>>,
    pub failure_reason: Option<FailureReason>,
    pub rejection_reason: Option<RejectionReason>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoutResponse {
    pub payout_id: PayoutId,
    pub status: TransactionStatus,
    pub amount: String,
    pub currency: Currency,
    pub correspondent: Correspondent,
    pub recipient: Msisdn,
    pub created: Option<DateTime<Utc>>,
    pub customer_timestamp: Option<DateTime<Utc>>,
    pub failure_reason: Option<FailureReason>,
    pub rejection_reason: Option<RejectionReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Result of a refund or resend-callback request.
///
/// Both fields are empty when pawaPay answers with an empty body.
pub struct ActionResponse {
    pub status: Option<TransactionStatus>,
    pub rejection_reason: Option<RejectionReason>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPageResponse {
    pub deposit_id: DepositId,
    pub redirect_url: Url,
}

#[derive(Debug, Clone, PartialEq)]
/// Parsed callback body for a deposit, payout or refund status change.
pub struct CallbackNotification {
    pub kind: TransactionKind,
    pub id: Uuid,
    pub status: TransactionStatus,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub correspondent: Option<Correspondent>,
    pub created: Option<DateTime<Utc>>,
    pub customer_timestamp: Option<DateTime<Utc>>,
    pub failure_reason: Option<FailureReason>,
    /// Every top-level field of the payload, including the ones above.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A correspondent enabled for the merchant, from `/active-conf`.
pub struct CorrespondentInfo {
    pub correspondent: Correspondent,
    /// ISO alpha-3 country code as returned by the API.
    pub country: String,
    /// Currency code as returned by the API (may be outside [`Currency`]).
    pub currency: String,
    pub operation_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryConfiguration {
    pub country: String,
    pub correspondents: Vec<CorrespondentInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Merchant configuration returned by `GET /active-conf`.
pub struct ActiveConfiguration {
    pub merchant_id: Option<String>,
    pub merchant_name: Option<String>,
    pub countries: Vec<CountryConfiguration>,
}

impl ActiveConfiguration {
    /// All correspondents across countries, in response order.
    pub fn correspondents(&self) -> Vec<CorrespondentInfo> {
        self.countries
            .iter()
            .flat_map(|country| country.correspondents.iter().cloned())
            .collect()
    }

    /// Correspondents of the first country entry matching `country`.
    pub fn correspondents_for(&self, country: Country) -> Vec<CorrespondentInfo> {
        self.countries
            .iter()
            .find(|entry| entry.country.eq_ignore_ascii_case(country.alpha3()))
            .map(|entry| entry.correspondents.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(correspondent: &str, country: &str, currency: &str) -> CorrespondentInfo {
        CorrespondentInfo {
            correspondent: Correspondent::new(correspondent).unwrap(),
            country: country.to_owned(),
            currency: currency.to_owned(),
            operation_types: Vec::new(),
        }
    }

    #[test]
    fn status_wire_values_round_trip() {
        for status in TransactionStatus::ALL {
            assert_eq!(TransactionStatus::from_wire(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::from_wire("completed"), None);
        assert!(TransactionStatus::Completed.is_final());
        assert!(!TransactionStatus::Submitted.is_final());
    }

    #[test]
    fn active_configuration_groups_correspondents() {
        let conf = ActiveConfiguration {
            merchant_id: None,
            merchant_name: None,
            countries: vec![
                CountryConfiguration {
                    country: "GHA".to_owned(),
                    correspondents: vec![
                        info("MTN_MOMO_GHA", "GHA", "GHS"),
                        info("VODAFONE_GHA", "GHA", "GHS"),
                    ],
                },
                CountryConfiguration {
                    country: "KEN".to_owned(),
                    correspondents: vec![info("MPESA_KEN", "KEN", "KES")],
                },
            ],
        };

        assert_eq!(conf.correspondents().len(), 3);
        let kenya = conf.correspondents_for(Country::Kenya);
        assert_eq!(kenya.len(), 1);
        assert_eq!(kenya[0].correspondent.as_str(), "MPESA_KEN");
        assert!(conf.correspondents_for(Country::Malawi).is_empty());
    }
}
