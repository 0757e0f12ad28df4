//! Integration tests for `GatewayClient` using wiremock HTTP mocks.

use serde_json::Value;
use voltio_gateway::{
    GatewayClient, GatewayError, MerchantAccount, PaymentMethodData, PaymentRequest,
    TransactionState,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn test_client(base_url: &str) -> GatewayClient {
    GatewayClient::with_base_url(
        MerchantAccount {
            api_key: "4Vj8eK4rloUd272L48hsrarnUA".to_string(),
            merchant_id: "508029".to_string(),
            account_id: "512321".to_string(),
        },
        30,
        base_url,
    )
    .expect("client construction should not fail")
}

fn card_request(order_id: &str, amount: i64) -> PaymentRequest {
    PaymentRequest {
        order_id: order_id.to_string(),
        amount,
        currency: "COP".to_string(),
        description: format!("Pedido Voltio {order_id}"),
        buyer_email: "ana@example.com".to_string(),
        buyer_full_name: "Ana Pérez".to_string(),
        method: PaymentMethodData::CreditCard {
            number: "4111111111111111".to_string(),
            expiration_date: "2027/01".to_string(),
            security_code: "123".to_string(),
            holder_name: "APPROVED".to_string(),
        },
    }
}

#[tokio::test]
async fn approved_transaction_yields_successful_outcome() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "code": "SUCCESS",
        "transactionResponse": {
            "transactionId": "tx-0001",
            "state": "APPROVED",
            "responseCode": "APPROVED",
            "responseMessage": "Aprobada",
        }
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({
            "command": "SUBMIT_TRANSACTION",
            "merchant": { "apiLogin": "508029" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .process_payment(&card_request("ORDER-100", 423_000))
        .await
        .expect("payment should parse");

    assert!(outcome.success);
    assert_eq!(outcome.state, TransactionState::Approved);
    assert_eq!(outcome.transaction_id.as_deref(), Some("tx-0001"));
    assert_eq!(outcome.order_id, "ORDER-100");
    assert_eq!(outcome.response_message, "Aprobada");
}

#[tokio::test]
async fn request_carries_signature_over_order_amount_currency() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "SUCCESS",
            "transactionResponse": { "state": "PENDING", "responseMessage": "En proceso" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .process_payment(&card_request("ORDER-100", 423_000))
        .await
        .expect("payment");

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let sent: Value = parse_body(&requests[0]);
    // md5("4Vj8eK4rloUd272L48hsrarnUA~508029~ORDER-100~423000~COP")
    assert_eq!(
        sent["transaction"]["order"]["signature"],
        "1a54485bd10d9e95efaa08b52109796e"
    );
    assert_eq!(
        sent["transaction"]["order"]["additionalValues"]["TX_VALUE"]["value"],
        423_000
    );
}

#[tokio::test]
async fn declined_transaction_is_not_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "SUCCESS",
            "transactionResponse": {
                "transactionId": "tx-0002",
                "state": "DECLINED",
                "responseMessage": "Rechazada por el banco",
                "paymentNetworkResponseCode": "05",
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .process_payment(&card_request("ORDER-101", 89_000))
        .await
        .expect("payment");

    // code SUCCESS means the gateway processed the request; the card was
    // still declined.
    assert!(outcome.success);
    assert_eq!(outcome.state, TransactionState::Declined);
    assert_eq!(outcome.network_response_code.as_deref(), Some("05"));
}

#[tokio::test]
async fn gateway_level_error_maps_to_error_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "ERROR",
            "error": "Invalid signature",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = client
        .process_payment(&card_request("ORDER-102", 89_000))
        .await
        .expect("payment");

    assert!(!outcome.success);
    assert_eq!(outcome.state, TransactionState::Error);
    assert_eq!(outcome.response_message, "Invalid signature");
}

#[tokio::test]
async fn http_500_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .process_payment(&card_request("ORDER-103", 89_000))
        .await
        .expect_err("500 must surface as an error");

    assert!(matches!(err, GatewayError::Http(_)));
}

#[tokio::test]
async fn non_json_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .process_payment(&card_request("ORDER-104", 89_000))
        .await
        .expect_err("html body must fail to parse");

    assert!(matches!(err, GatewayError::Deserialize { .. }));
}

fn parse_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body should be JSON")
}
