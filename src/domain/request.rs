use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::correspondent::{Correspondent, predict};
use crate::domain::validation::ValidationError;
use crate::domain::value::{DepositId, Money, Msisdn, PayoutId, StatementDescription};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request a customer to pay the merchant (`POST /deposits`).
///
/// When no correspondent is set, the client predicts it from the payer's
/// phone number before sending.
pub struct DepositRequest {
    deposit_id: DepositId,
    money: Money,
    payer: Msisdn,
    correspondent: Option<Correspondent>,
    customer_timestamp: DateTime<Utc>,
    statement_description: Option<StatementDescription>,
}

impl DepositRequest {
    /// New request with a generated id and the current time as customer timestamp.
    pub fn new(money: Money, payer: Msisdn) -> Self {
        Self {
            deposit_id: DepositId::generate(),
            money,
            payer,
            correspondent: None,
            customer_timestamp: Utc::now(),
            statement_description: None,
        }
    }

    pub fn with_correspondent(mut self, correspondent: impl Into<Correspondent>) -> Self {
        self.correspondent = Some(correspondent.into());
        self
    }

    pub fn with_statement_description(mut self, description: StatementDescription) -> Self {
        self.statement_description = Some(description);
        self
    }

    /// Use a caller-chosen id, e.g. when retrying a request persisted earlier.
    pub fn with_deposit_id(mut self, deposit_id: DepositId) -> Self {
        self.deposit_id = deposit_id;
        self
    }

    pub fn with_customer_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.customer_timestamp = timestamp;
        self
    }

    pub fn deposit_id(&self) -> DepositId {
        self.deposit_id
    }

    pub fn money(&self) -> &Money {
        &self.money
    }

    pub fn payer(&self) -> &Msisdn {
        &self.payer
    }

    pub fn correspondent(&self) -> Option<&Correspondent> {
        self.correspondent.as_ref()
    }

    pub fn customer_timestamp(&self) -> DateTime<Utc> {
        self.customer_timestamp
    }

    pub fn statement_description(&self) -> Option<&StatementDescription> {
        self.statement_description.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request the merchant to pay a recipient (`POST /payouts`).
pub struct PayoutRequest {
    payout_id: PayoutId,
    money: Money,
    recipient: Msisdn,
    correspondent: Option<Correspondent>,
    customer_timestamp: DateTime<Utc>,
    statement_description: Option<StatementDescription>,
}

impl PayoutRequest {
    /// New request with a generated id and the current time as customer timestamp.
    pub fn new(money: Money, recipient: Msisdn) -> Self {
        Self {
            payout_id: PayoutId::generate(),
            money,
            recipient,
            correspondent: None,
            customer_timestamp: Utc::now(),
            statement_description: None,
        }
    }

    pub fn with_correspondent(mut self, correspondent: impl Into<Correspondent>) -> Self {
        self.correspondent = Some(correspondent.into());
        self
    }

    pub fn with_statement_description(mut self, description: StatementDescription) -> Self {
        self.statement_description = Some(description);
        self
    }

    pub fn with_payout_id(mut self, payout_id: PayoutId) -> Self {
        self.payout_id = payout_id;
        self
    }

    pub fn with_customer_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.customer_timestamp = timestamp;
        self
    }

    pub fn payout_id(&self) -> PayoutId {
        self.payout_id
    }

    pub fn money(&self) -> &Money {
        &self.money
    }

    pub fn recipient(&self) -> &Msisdn {
        &self.recipient
    }

    pub fn correspondent(&self) -> Option<&Correspondent> {
        self.correspondent.as_ref()
    }

    pub fn customer_timestamp(&self) -> DateTime<Utc> {
        self.customer_timestamp
    }

    pub fn statement_description(&self) -> Option<&StatementDescription> {
        self.statement_description.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Deposit collected through the hosted payment page (`POST /v1/payment-page/deposits`).
pub struct PaymentPageDeposit {
    deposit_id: DepositId,
    money: Money,
    return_url: Url,
    customer_timestamp: DateTime<Utc>,
    statement_description: Option<StatementDescription>,
}

impl PaymentPageDeposit {
    pub fn new(money: Money, return_url: Url) -> Self {
        Self {
            deposit_id: DepositId::generate(),
            money,
            return_url,
            customer_timestamp: Utc::now(),
            statement_description: None,
        }
    }

    pub fn with_statement_description(mut self, description: StatementDescription) -> Self {
        self.statement_description = Some(description);
        self
    }

    pub fn with_deposit_id(mut self, deposit_id: DepositId) -> Self {
        self.deposit_id = deposit_id;
        self
    }

    pub fn with_customer_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.customer_timestamp = timestamp;
        self
    }

    pub fn deposit_id(&self) -> DepositId {
        self.deposit_id
    }

    pub fn money(&self) -> &Money {
        &self.money
    }

    pub fn return_url(&self) -> &Url {
        &self.return_url
    }

    pub fn customer_timestamp(&self) -> DateTime<Utc> {
        self.customer_timestamp
    }

    pub fn statement_description(&self) -> Option<&StatementDescription> {
        self.statement_description.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of transaction a callback or status lookup refers to.
pub enum TransactionKind {
    Deposit,
    Payout,
    Refund,
}

impl TransactionKind {
    /// Plural path segment used by the API (`deposits`, `payouts`, `refunds`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Deposit => "deposits",
            Self::Payout => "payouts",
            Self::Refund => "refunds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Identifies an existing deposit or payout.
pub enum TransactionRef {
    Deposit(DepositId),
    Payout(PayoutId),
}

impl TransactionRef {
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Deposit(_) => TransactionKind::Deposit,
            Self::Payout(_) => TransactionKind::Payout,
        }
    }

    pub fn id(self) -> String {
        match self {
            Self::Deposit(id) => id.to_string(),
            Self::Payout(id) => id.to_string(),
        }
    }
}

impl From<DepositId> for TransactionRef {
    fn from(value: DepositId) -> Self {
        Self::Deposit(value)
    }
}

impl From<PayoutId> for TransactionRef {
    fn from(value: PayoutId) -> Self {
        Self::Payout(value)
    }
}

/// Pick the correspondent for a transaction.
///
/// An explicit correspondent wins; otherwise it is predicted from `msisdn`.
/// A known correspondent must settle in `money.currency`.
pub(crate) fn resolve_correspondent(
    explicit: Option<&Correspondent>,
    msisdn: &Msisdn,
    money: &Money,
) -> Result<Correspondent, ValidationError> {
    let correspondent = match explicit {
        Some(correspondent) => correspondent.clone(),
        None => Correspondent::from(predict(msisdn)?),
    };

    match correspondent.known() {
        Some(known) if known.currency() != money.currency => {
            return Err(ValidationError::CurrencyMismatch {
                correspondent: correspondent.as_str().to_owned(),
                expected: known.currency().as_str().to_owned(),
                actual: money.currency.as_str().to_owned(),
            });
        }
        _ => {}
    }

    Ok(correspondent)
}
