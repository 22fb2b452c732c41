use std::time::Duration;

use common::{env_config::GatewayConfig, error::ChargeError};
use gateway::{ChargeAttempt, ChargeRequest, CustomerContact, PaymentCode, PixClient};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

const CODE: &str = "00020101021226850014br.gov.bcb.pix0123fadasartesanais6304ABCD";

fn contact() -> CustomerContact {
    CustomerContact {
        name: "Maria Souza".to_string(),
        email: "maria@example.com".to_string(),
        phone: "(11) 98765-4321".to_string(),
        document: "529.982.247-25".to_string(),
    }
}

fn client_for(server: &MockServer) -> PixClient {
    PixClient::new(&GatewayConfig::new(server.uri(), "secret-token")).unwrap()
}

#[tokio::test]
async fn paid_shipping_charge_returns_pix_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(query_param("api_token", "secret-token"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "amount": 8980,
            "offer_hash": "ld4kumu4vp",
            "payment_method": "pix",
            "customer": { "phone_number": "11987654321", "document": "52998224725" },
            "cart": [{ "price": 8980, "quantity": 1, "title": "Kit Fadas Artesanais" }],
            "installments": 1,
            "expire_in_days": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "pix_qr_code": CODE }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req =
        ChargeRequest::new(dec!(89.80), &contact(), "ld4kumu4vp", "Kit Fadas Artesanais").unwrap();
    let result = client_for(&server).request_charge(&req).await.unwrap();

    assert_eq!(result.payment_code, PaymentCode::Pix(CODE.to_string()));
    assert_eq!(result.qr_image_source, "");
    assert!(result.reference_id.starts_with("tx_"));
}

#[tokio::test]
async fn validation_errors_are_flattened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": { "document": ["invalid"], "amount": ["too low"] }
        })))
        .mount(&server)
        .await;

    let req = ChargeRequest::new(dec!(0.50), &contact(), "gmvowuyoib", "Kit").unwrap();
    let err = client_for(&server).request_charge(&req).await.unwrap_err();

    match err {
        ChargeError::GatewayRejected { status, detail } => {
            assert_eq!(status, 422);
            assert_eq!(detail, "invalid, too low");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway down</html>"))
        .mount(&server)
        .await;

    let req = ChargeRequest::new(dec!(79.90), &contact(), "gmvowuyoib", "Kit").unwrap();
    let err = client_for(&server).request_charge(&req).await.unwrap_err();

    assert!(matches!(err, ChargeError::InvalidResponseBody { status: 200, .. }));
}

#[tokio::test]
async fn html_error_page_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("<html><h1>502 Bad Gateway</h1></html>"),
        )
        .mount(&server)
        .await;

    let req = ChargeRequest::new(dec!(79.90), &contact(), "gmvowuyoib", "Kit").unwrap();
    let err = client_for(&server).request_charge(&req).await.unwrap_err();

    // the body is checked before the status
    assert!(matches!(err, ChargeError::InvalidResponseBody { status: 502, .. }));
}

#[tokio::test]
async fn success_without_code_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": "abc", "status": "waiting_payment" }
        })))
        .mount(&server)
        .await;

    let req = ChargeRequest::new(dec!(79.90), &contact(), "gmvowuyoib", "Kit").unwrap();
    let err = client_for(&server).request_charge(&req).await.unwrap_err();

    assert!(matches!(err, ChargeError::NoPaymentCodeFound));
}

#[tokio::test]
async fn checkout_url_becomes_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "trx_9",
            "payment_url": "https://checkout.example.com/trx_9"
        })))
        .mount(&server)
        .await;

    let req = ChargeRequest::new(dec!(79.90), &contact(), "gmvowuyoib", "Kit").unwrap();
    let result = client_for(&server).request_charge(&req).await.unwrap();

    assert_eq!(result.redirect_url(), Some("https://checkout.example.com/trx_9"));
    assert_eq!(result.reference_id, "trx_9");
}

#[tokio::test]
async fn slow_gateway_is_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "pix_code": CODE }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = GatewayConfig::new(server.uri(), "secret-token");
    config.timeout_secs = 1;
    let client = PixClient::new(&config).unwrap();

    let req = ChargeRequest::new(dec!(79.90), &contact(), "gmvowuyoib", "Kit").unwrap();
    let err = client.request_charge(&req).await.unwrap_err();

    assert!(matches!(err, ChargeError::NetworkFailure(_)));
}

#[tokio::test]
async fn fallback_stops_at_first_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "offer_hash": "T1" })))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "offer disabled" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "offer_hash": "T2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "hash": "from_t2", "pix": { "pix_code": CODE } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "offer_hash": "T3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pix_code": CODE })))
        .expect(0)
        .mount(&server)
        .await;

    let attempts = [
        ChargeAttempt::new("T1", "first", dec!(89.80)),
        ChargeAttempt::new("T2", "second", dec!(79.90)),
        ChargeAttempt::new("T3", "third", dec!(59.90)),
    ];
    let result = client_for(&server)
        .request_charge_with_fallback(&contact(), &attempts)
        .await
        .unwrap();

    assert_eq!(result.reference_id, "from_t2");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn fallback_exhaustion_keeps_last_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "offer_hash": "A" })))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "first failure" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "offer_hash": "B" })))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "last failure" })),
        )
        .mount(&server)
        .await;

    let attempts = [
        ChargeAttempt::new("A", "a", dec!(10)),
        ChargeAttempt::new("B", "b", dec!(10)),
    ];
    let err = client_for(&server)
        .request_charge_with_fallback(&contact(), &attempts)
        .await
        .unwrap_err();

    assert!(matches!(err, ChargeError::FallbackExhausted { attempts: 2, .. }));
    assert_eq!(err.detail(), "last failure");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn empty_fallback_list_makes_no_call() {
    let server = MockServer::start().await;

    let err = client_for(&server)
        .request_charge_with_fallback(&contact(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, ChargeError::NoAttempts));
    assert!(server.received_requests().await.unwrap().is_empty());
}
