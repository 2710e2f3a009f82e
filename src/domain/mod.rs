//! Domain layer: strong types with validation and invariants (no I/O).

mod correspondent;
mod request;
mod response;
pub mod sandbox;
mod validation;
mod value;

pub use correspondent::{
    Correspondent, CorrespondentCode, Country, predict, predict_correspondent,
};
pub(crate) use request::resolve_correspondent;
pub use request::{
    DepositRequest, PaymentPageDeposit, PayoutRequest, TransactionKind, TransactionRef,
};
pub use response::{
    ActionResponse, ActiveConfiguration, CallbackNotification, CorrespondentInfo,
    CountryConfiguration, DepositResponse, FailureReason, PaymentPageResponse, PayoutResponse,
    RejectionReason, TransactionStatus,
};
pub use validation::ValidationError;
pub use value::{
    Amount, ApiToken, CallbackSecret, Currency, DepositId, Money, Msisdn, PayoutId,
    StatementDescription, normalize_msisdn, validate_amount, validate_currency,
    validate_msisdn,
};
