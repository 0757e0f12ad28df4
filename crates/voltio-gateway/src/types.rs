//! Request and response types for the gateway boundary.

use serde::{Deserialize, Serialize};

/// Merchant credentials issued by the gateway.
#[derive(Debug, Clone)]
pub struct MerchantAccount {
    pub api_key: String,
    pub merchant_id: String,
    pub account_id: String,
}

/// Payment-method-specific fields collected at checkout.
#[derive(Debug, Clone)]
pub enum PaymentMethodData {
    CreditCard {
        number: String,
        expiration_date: String,
        security_code: String,
        holder_name: String,
    },
    /// PSE bank transfer; `payer_type` is `"N"` (natural) or `"J"` (legal).
    BankTransfer {
        bank_code: String,
        payer_type: String,
        document_type: String,
        document_number: String,
    },
    Cash,
    DigitalWallet,
}

impl PaymentMethodData {
    /// Gateway code for the method, as sent on the wire.
    #[must_use]
    pub fn method_code(&self) -> &'static str {
        match self {
            Self::CreditCard { .. } => "CREDIT_CARD",
            Self::BankTransfer { .. } => "PSE",
            Self::Cash => "CASH",
            Self::DigitalWallet => "NEQUI",
        }
    }
}

/// One payment attempt for an order.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Order id, used as the gateway reference code and in the signature.
    pub order_id: String,
    /// Whole currency units.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub buyer_email: String,
    pub buyer_full_name: String,
    pub method: PaymentMethodData,
}

/// Transaction state reported by the gateway.
///
/// Anything the gateway sends that we do not recognize deserializes as
/// `Error` rather than failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionState {
    Approved,
    Declined,
    Pending,
    #[serde(other)]
    Error,
}

impl TransactionState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
            Self::Pending => "PENDING",
            Self::Error => "ERROR",
        }
    }
}

/// Result of a payment attempt, as surfaced to the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub order_id: String,
    pub state: TransactionState,
    pub response_message: String,
    pub network_response_code: Option<String>,
    pub network_error_message: Option<String>,
}

impl PaymentOutcome {
    /// Outcome used when the gateway could not be reached at all: an
    /// `ERROR` state with a generic message, never the transport detail.
    #[must_use]
    pub fn connection_error(order_id: String) -> Self {
        Self {
            success: false,
            transaction_id: None,
            order_id,
            state: TransactionState::Error,
            response_message: "payment processor unavailable".to_string(),
            network_response_code: None,
            network_error_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_state_parses_wire_strings() {
        for (raw, expected) in [
            ("\"APPROVED\"", TransactionState::Approved),
            ("\"DECLINED\"", TransactionState::Declined),
            ("\"PENDING\"", TransactionState::Pending),
            ("\"ERROR\"", TransactionState::Error),
        ] {
            let state: TransactionState = serde_json::from_str(raw).expect("parse state");
            assert_eq!(state, expected);
            assert_eq!(format!("\"{}\"", state.as_str()), raw);
        }
    }

    #[test]
    fn unknown_transaction_state_falls_back_to_error() {
        let state: TransactionState =
            serde_json::from_str("\"EXPIRED\"").expect("unknown state still parses");
        assert_eq!(state, TransactionState::Error);
    }

    #[test]
    fn method_codes_match_gateway_contract() {
        let card = PaymentMethodData::CreditCard {
            number: "4111111111111111".to_string(),
            expiration_date: "2027/01".to_string(),
            security_code: "123".to_string(),
            holder_name: "APPROVED".to_string(),
        };
        assert_eq!(card.method_code(), "CREDIT_CARD");
        assert_eq!(
            PaymentMethodData::BankTransfer {
                bank_code: "1007".to_string(),
                payer_type: "N".to_string(),
                document_type: "CC".to_string(),
                document_number: "12345678".to_string(),
            }
            .method_code(),
            "PSE"
        );
        assert_eq!(PaymentMethodData::Cash.method_code(), "CASH");
        assert_eq!(PaymentMethodData::DigitalWallet.method_code(), "NEQUI");
    }

    #[test]
    fn connection_error_outcome_is_generic() {
        let outcome = PaymentOutcome::connection_error("order-1".to_string());
        assert!(!outcome.success);
        assert_eq!(outcome.state, TransactionState::Error);
        assert_eq!(outcome.order_id, "order-1");
        assert!(outcome.transaction_id.is_none());
    }
}
