//! HTTP client for the PayU Latam payments API.
//!
//! Wraps `reqwest` with typed request/response handling for the
//! `SUBMIT_TRANSACTION` command and the merchant request signature. The
//! storefront treats this as an opaque payment provider: one request out,
//! one `APPROVED | DECLINED | PENDING | ERROR` outcome back, no retries.

mod client;
mod error;
mod signature;
mod types;

pub use client::GatewayClient;
pub use error::GatewayError;
pub use types::{
    MerchantAccount, PaymentMethodData, PaymentOutcome, PaymentRequest, TransactionState,
};
