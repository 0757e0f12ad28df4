//! The gateway HTTP client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::signature::sign;
use crate::types::{
    MerchantAccount, PaymentMethodData, PaymentOutcome, PaymentRequest, TransactionState,
};

const PRODUCTION_URL: &str = "https://api.payulatam.com/payments-api/4.0/service.cgi";
const SANDBOX_URL: &str = "https://sandbox.api.payulatam.com/payments-api/4.0/service.cgi";

/// Client for the PayU payments API.
///
/// Holds the HTTP client, merchant credentials, and endpoint URL. Use
/// [`GatewayClient::new`] for the real gateway (sandbox or production) or
/// [`GatewayClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug)]
pub struct GatewayClient {
    client: Client,
    account: MerchantAccount,
    endpoint: Url,
    test_mode: bool,
}

impl GatewayClient {
    /// Creates a client against the sandbox or production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        account: MerchantAccount,
        timeout_secs: u64,
        sandbox: bool,
    ) -> Result<Self, GatewayError> {
        let url = if sandbox { SANDBOX_URL } else { PRODUCTION_URL };
        Self::with_base_url(account, timeout_secs, url)
    }

    /// Creates a client with a custom endpoint URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::Api`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        account: MerchantAccount,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("voltio/0.1 (storefront)")
            .build()?;

        let endpoint = Url::parse(base_url)
            .map_err(|e| GatewayError::Api(format!("invalid gateway URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            account,
            endpoint,
            test_mode: base_url != PRODUCTION_URL,
        })
    }

    /// Submits one payment transaction and returns the gateway's verdict.
    ///
    /// The request is signed over merchant credentials, order id, amount,
    /// and currency. An unrecognized or missing transaction state comes
    /// back as [`TransactionState::Error`] rather than an `Err`: the order
    /// flow treats those the same as a decline.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GatewayError::Deserialize`] if the response body is not JSON.
    pub async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentOutcome, GatewayError> {
        let body = self.build_submit_transaction(request);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let raw = response.text().await?;
        let envelope: GatewayEnvelope =
            serde_json::from_str(&raw).map_err(|e| GatewayError::Deserialize {
                context: format!("SUBMIT_TRANSACTION(order={})", request.order_id),
                source: e,
            })?;

        let tx = envelope.transaction_response;
        let state = tx
            .as_ref()
            .and_then(|t| t.state)
            .unwrap_or(TransactionState::Error);
        let response_message = tx
            .as_ref()
            .and_then(|t| t.response_message.clone())
            .or(envelope.error)
            .unwrap_or_else(|| "unknown gateway response".to_string());

        let outcome = PaymentOutcome {
            success: envelope.code.as_deref() == Some("SUCCESS"),
            transaction_id: tx.as_ref().and_then(|t| t.transaction_id.clone()),
            order_id: request.order_id.clone(),
            state,
            response_message,
            network_response_code: tx
                .as_ref()
                .and_then(|t| t.payment_network_response_code.clone()),
            network_error_message: tx.and_then(|t| t.payment_network_response_error_message),
        };

        tracing::info!(
            order_id = %outcome.order_id,
            state = outcome.state.as_str(),
            success = outcome.success,
            "payment transaction submitted"
        );

        Ok(outcome)
    }

    /// Assembles the `SUBMIT_TRANSACTION` payload.
    ///
    /// Field names follow the gateway's JSON contract, hence camelCase keys
    /// in the literal.
    fn build_submit_transaction(&self, request: &PaymentRequest) -> Value {
        let signature = sign(
            &self.account.api_key,
            &self.account.merchant_id,
            &request.order_id,
            request.amount,
            &request.currency,
        );

        let mut transaction = json!({
            "order": {
                "accountId": self.account.account_id,
                "referenceCode": request.order_id,
                "description": request.description,
                "language": "es",
                "signature": signature,
                "additionalValues": {
                    "TX_VALUE": {
                        "value": request.amount,
                        "currency": request.currency,
                    }
                },
                "buyer": {
                    "fullName": request.buyer_full_name,
                    "emailAddress": request.buyer_email,
                }
            },
            "paymentMethod": request.method.method_code(),
            "paymentCountry": "CO",
            "deviceSessionId": device_session_id(),
            "type": "AUTHORIZATION_AND_CAPTURE",
        });

        match &request.method {
            PaymentMethodData::CreditCard {
                number,
                expiration_date,
                security_code,
                holder_name,
            } => {
                transaction["creditCard"] = json!({
                    "number": number,
                    "expirationDate": expiration_date,
                    "securityCode": security_code,
                    "name": holder_name,
                });
            }
            PaymentMethodData::BankTransfer {
                bank_code,
                payer_type,
                document_type,
                document_number,
            } => {
                transaction["bankCode"] = json!(bank_code);
                transaction["userType"] = json!(payer_type);
                transaction["documentType"] = json!(document_type);
                transaction["documentNumber"] = json!(document_number);
            }
            PaymentMethodData::Cash | PaymentMethodData::DigitalWallet => {}
        }

        json!({
            "language": "es",
            "command": "SUBMIT_TRANSACTION",
            "test": self.test_mode,
            "merchant": {
                "apiKey": self.account.api_key,
                "apiLogin": self.account.merchant_id,
            },
            "transaction": transaction,
        })
    }
}

fn device_session_id() -> String {
    use rand::distr::Alphanumeric;
    use rand::Rng;

    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(22)
        .map(char::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct GatewayEnvelope {
    code: Option<String>,
    error: Option<String>,
    #[serde(rename = "transactionResponse")]
    transaction_response: Option<TransactionResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResponse {
    transaction_id: Option<String>,
    state: Option<TransactionState>,
    response_message: Option<String>,
    payment_network_response_code: Option<String>,
    payment_network_response_error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account() -> MerchantAccount {
        MerchantAccount {
            api_key: "apiKey".to_string(),
            merchant_id: "merchantId".to_string(),
            account_id: "512321".to_string(),
        }
    }

    fn card_request() -> PaymentRequest {
        PaymentRequest {
            order_id: "abc123".to_string(),
            amount: 89_000,
            currency: "COP".to_string(),
            description: "Pedido Voltio abc123".to_string(),
            buyer_email: "ana@example.com".to_string(),
            buyer_full_name: "Ana Pérez".to_string(),
            method: PaymentMethodData::CreditCard {
                number: "4111111111111111".to_string(),
                expiration_date: "2027/01".to_string(),
                security_code: "123".to_string(),
                holder_name: "ANA PEREZ".to_string(),
            },
        }
    }

    #[test]
    fn submit_transaction_payload_carries_signature_and_amount() {
        let client = GatewayClient::with_base_url(test_account(), 30, "http://localhost:1")
            .expect("client");
        let body = client.build_submit_transaction(&card_request());

        assert_eq!(body["command"], "SUBMIT_TRANSACTION");
        assert_eq!(body["merchant"]["apiLogin"], "merchantId");
        let order = &body["transaction"]["order"];
        assert_eq!(order["referenceCode"], "abc123");
        assert_eq!(order["additionalValues"]["TX_VALUE"]["value"], 89_000);
        assert_eq!(order["additionalValues"]["TX_VALUE"]["currency"], "COP");
        // md5("apiKey~merchantId~abc123~89000~COP")
        assert_eq!(order["signature"], "edfbfe37419d927fc524041d9ef4958f");
        assert_eq!(body["transaction"]["paymentMethod"], "CREDIT_CARD");
        assert_eq!(
            body["transaction"]["creditCard"]["number"],
            "4111111111111111"
        );
    }

    #[test]
    fn bank_transfer_fields_are_flattened_onto_transaction() {
        let client = GatewayClient::with_base_url(test_account(), 30, "http://localhost:1")
            .expect("client");
        let mut request = card_request();
        request.method = PaymentMethodData::BankTransfer {
            bank_code: "1007".to_string(),
            payer_type: "N".to_string(),
            document_type: "CC".to_string(),
            document_number: "12345678".to_string(),
        };

        let body = client.build_submit_transaction(&request);
        assert_eq!(body["transaction"]["paymentMethod"], "PSE");
        assert_eq!(body["transaction"]["bankCode"], "1007");
        assert_eq!(body["transaction"]["userType"], "N");
        assert!(body["transaction"]["creditCard"].is_null());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = GatewayClient::with_base_url(test_account(), 30, "not a url").unwrap_err();
        assert!(matches!(err, GatewayError::Api(_)));
    }

    #[test]
    fn device_session_id_is_22_alphanumeric_chars() {
        let id = device_session_id();
        assert_eq!(id.len(), 22);
        assert!(id.chars().all(char::is_alphanumeric));
    }
}
