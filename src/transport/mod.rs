//! Transport layer: wire-format details (JSON bodies in, typed records out).

mod action;
mod active_conf;
mod callback;
mod deposit;
mod amount;
mod payment_page;
mod payout;
mod predict;
mod wire;

pub use action::decode_action_response;
pub use active_conf::decode_active_conf;
pub use callback::decode_callback;
pub use deposit::{decode_deposit_acceptance, decode_deposit_status, encode_deposit_body};
pub use payment_page::{decode_payment_page_response, encode_payment_page_body};
pub use payout::{decode_payout_acceptance, decode_payout_status, encode_payout_body};
pub use predict::{decode_predict_response, encode_predict_body};
pub use wire::{TransportError, decode_api_error};
