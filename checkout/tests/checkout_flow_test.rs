use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use actix_web::{App, http::StatusCode, test, web};
use common::env_config::{CheckoutConfig, Config, GatewayConfig, OfferTable, StoreConfig};
use gateway::PixClient;
use serde_json::{Value, json};
use store::OrderRecorder;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

const CODE: &str = "00020101021226850014br.gov.bcb.pix0123fadasartesanais6304ABCD";

fn config(gateway: &MockServer, store: &MockServer) -> Arc<Config> {
    Arc::new(Config {
        environment: "development".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        num_workers: 1,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        console_logging_enabled: false,
        log_file: "checkout.log".to_string(),
        gateway: GatewayConfig::new(gateway.uri(), "gw-token"),
        store: StoreConfig::new(store.uri(), "store-key"),
        offers: OfferTable::default(),
        checkout: CheckoutConfig {
            recovery_delay_ms: 10,
            ..CheckoutConfig::default()
        },
    })
}

fn checkout_body(shipping: &str) -> Value {
    json!({
        "personal": {
            "name": "Maria Souza",
            "email": "maria@example.com",
            "phone": "11987654321",
            "cpf": "52998224725"
        },
        "address": {
            "zip_code": "01001-000",
            "street": "Praça da Sé",
            "number": "100",
            "neighborhood": "Sé",
            "city": "São Paulo",
            "state": "SP"
        },
        "shipping": shipping
    })
}

macro_rules! app {
    ($config:expr) => {{
        let config = $config;
        let gateway = Arc::new(PixClient::new(&config.gateway).unwrap());
        let store = Arc::new(OrderRecorder::new(&config.store).unwrap());
        test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::new(gateway))
                .app_data(web::Data::new(store))
                .service(web::scope("/api").service(checkout::mount_checkout())),
        )
        .await
    }};
}

#[actix_web::test]
async fn summary_adds_standard_shipping() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    let app = app!(config(&gateway, &store));

    let req = test::TestRequest::get()
        .uri("/api/checkout/summary?shipping=standard")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["subtotal"], json!(79.9));
    assert_eq!(body["shipping"], json!(9.9));
    assert_eq!(body["total"], json!(89.8));
    assert_eq!(body["items"][0]["name"], json!("FADA ARTESANAL"));
}

#[actix_web::test]
async fn pix_checkout_uses_paid_shipping_offer() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(body_partial_json(json!({ "offer_hash": "ld4kumu4vp", "amount": 8980 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "hash": "trx_1", "pix": { "pix_qr_code": CODE } }
        })))
        .expect(1)
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .and(body_partial_json(json!({
            "payment_method": "pix",
            "customer_phone": "(11) 98765-4321"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&store)
        .await;
    let app = app!(config(&gateway, &store));

    let req = test::TestRequest::post()
        .uri("/api/checkout/pix")
        .set_json(checkout_body("standard"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["payment"]["payment_code"], json!(CODE));
    assert_eq!(body["payment"]["reference_id"], json!("trx_1"));
    assert!(
        body["payment"]["qr_image_source"]
            .as_str()
            .unwrap()
            .starts_with("https://api.qrserver.com/")
    );
    assert_eq!(body["amount"], json!(89.8));
    assert_eq!(body["order_saved"], json!(true));
    assert_eq!(body["card_declined"], json!(false));
    assert_eq!(body["customer"]["cpf"], json!("529.982.247-25"));
}

#[actix_web::test]
async fn store_outage_does_not_block_pix() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "offer_hash": "gmvowuyoib", "amount": 7990 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pix_code": CODE })))
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&store)
        .await;
    let app = app!(config(&gateway, &store));

    let req = test::TestRequest::post()
        .uri("/api/checkout/pix")
        .set_json(checkout_body("free"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["payment"]["payment_code"], json!(CODE));
    assert_eq!(body["order_saved"], json!(false));
}

#[actix_web::test]
async fn hung_store_does_not_withhold_payment_code() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pix_code": CODE })))
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(60)))
        .mount(&store)
        .await;
    let mut hung = (*config(&gateway, &store)).clone();
    hung.store.timeout_secs = 1;
    let app = app!(Arc::new(hung));

    let started = Instant::now();
    let req = test::TestRequest::post()
        .uri("/api/checkout/pix")
        .set_json(checkout_body("free"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(body["payment"]["payment_code"], json!(CODE));
    assert_eq!(body["order_saved"], json!(false));
}

#[actix_web::test]
async fn missing_cpf_is_bad_request() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    let app = app!(config(&gateway, &store));

    let mut body = checkout_body("free");
    body["personal"]["cpf"] = json!("");
    let req = test::TestRequest::post()
        .uri("/api/checkout/pix")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(gateway.received_requests().await.unwrap().is_empty());
}

#[actix_web::test]
async fn gateway_mismatch_is_reworded() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Offer amount mismatch" })),
        )
        .mount(&gateway)
        .await;
    let app = app!(config(&gateway, &store));

    let req = test::TestRequest::post()
        .uri("/api/checkout/pix")
        .set_json(checkout_body("free"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(res).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Erro de configuração"));
    // nothing is recorded when no PIX was issued
    assert!(store.received_requests().await.unwrap().is_empty());
}

#[actix_web::test]
async fn card_checkout_offers_recovery_pix() {
    let gateway = MockServer::start().await;
    let store = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "offer_hash": "offer_5990_discount",
            "amount": 5990,
            "cart": [{ "title": "OFERTA EXCLUSIVA - RECUPERAÇÃO" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 77,
            "pix_code": CODE,
            "qr_code_url": "https://gw.example.com/qr/77.png"
        })))
        .expect(1)
        .mount(&gateway)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "payment_method": "credit_card",
            "card_number": "1234",
            "card_name": "MARIA SOUZA"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&store)
        .await;
    let app = app!(config(&gateway, &store));

    let mut body = checkout_body("standard");
    body["card"] = json!({
        "number": "4111 1111 1111 1234",
        "name": "MARIA SOUZA",
        "expiry": "12/30",
        "cvv": "123",
        "installments": "1"
    });
    let req = test::TestRequest::post()
        .uri("/api/checkout/card")
        .set_json(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["card_declined"], json!(true));
    assert_eq!(body["order_saved"], json!(true));
    assert_eq!(body["amount"], json!(59.9));
    assert_eq!(body["payment"]["reference_id"], json!("77"));
    assert_eq!(
        body["payment"]["qr_image_source"],
        json!("https://gw.example.com/qr/77.png")
    );

    let stored = store.received_requests().await.unwrap();
    let row: Value = serde_json::from_slice(&stored[0].body).unwrap();
    assert_eq!(row["total_amount"], json!(89.8));
}
