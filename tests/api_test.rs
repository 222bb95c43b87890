use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use donation_ledger::{
    config::PaypalEnvironment,
    handlers::AppState,
    services::{LedgerStore, OrderService, PaypalClient},
    startup::build_router,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::{path::Path, sync::Arc, time::Duration};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    ledger: Arc<LedgerStore>,
    _data: TempDir,
}

fn spawn_app(upstream: &ServerGuard, credentials: bool, static_dir: Option<&Path>) -> TestApp {
    let data = tempfile::tempdir().unwrap();
    let ledger = Arc::new(LedgerStore::new(data.path().join("data").join("store.json")));

    let (client_id, secret) = if credentials {
        (Some("client".to_string()), Some("secret".to_string()))
    } else {
        (None, None)
    };
    let gateway = Arc::new(
        PaypalClient::new(
            &upstream.url(),
            client_id,
            secret,
            Duration::from_secs(5),
            "Donation",
        )
        .unwrap(),
    );
    let orders = Arc::new(OrderService::new(gateway, ledger.clone()));
    let state = AppState::new(orders, ledger.clone(), PaypalEnvironment::Sandbox);

    TestApp {
        router: build_router(state, static_dir),
        ledger,
        _data: data,
    }
}

async fn mock_token(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/v1/oauth2/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"tok","token_type":"Bearer","expires_in":32400}"#)
        .expect_at_least(1)
        .create_async()
        .await
}

async fn mock_capture(server: &mut ServerGuard, order_id: &str, capture_id: &str, value: &str, currency: &str) -> mockito::Mock {
    server
        .mock("POST", format!("/v2/checkout/orders/{}/capture", order_id).as_str())
        .match_header("authorization", "Bearer tok")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": order_id,
                "status": "COMPLETED",
                "payer": {
                    "name": {"given_name": "Asha", "surname": "Rao"},
                    "email_address": "asha@example.com"
                },
                "purchase_units": [{
                    "payments": {"captures": [{
                        "id": capture_id,
                        "status": "COMPLETED",
                        "amount": {"value": value, "currency_code": currency}
                    }]}
                }]
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn donation_flow_updates_total() {
    let mut upstream = Server::new_async().await;
    let token = mock_token(&mut upstream).await;
    let order = upstream
        .mock("POST", "/v2/checkout/orders")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::PartialJson(json!({
            "intent": "CAPTURE",
            "purchase_units": [{"amount": {"currency_code": "INR", "value": "25.00"}}]
        })))
        .with_status(201)
        .with_body(r#"{"id":"O1","status":"CREATED"}"#)
        .create_async()
        .await;
    let capture = mock_capture(&mut upstream, "O1", "C1", "25.00", "INR").await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) =
        post_json(&app, "/api/create-order", json!({"amount": 25, "currency": "INR"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"orderID": "O1"}));

    let (status, body) = post_json(&app, "/api/capture-order", json!({"orderID": "O1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "captureId": "C1"}));

    let (status, body) = get_json(&app, "/api/total").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalINR"].as_f64(), Some(25.0));
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["id"], "C1");
    assert_eq!(transactions[0]["orderID"], "O1");
    assert_eq!(transactions[0]["currency"], "INR");
    assert_eq!(transactions[0]["payer"], json!({"name": "Asha Rao", "email": "asha@example.com"}));
    assert_eq!(transactions[0]["raw"]["status"], "COMPLETED");

    token.assert_async().await;
    order.assert_async().await;
    capture.assert_async().await;
}

#[tokio::test]
async fn create_order_defaults_amount_and_currency() {
    let mut upstream = Server::new_async().await;
    let _token = mock_token(&mut upstream).await;
    let order = upstream
        .mock("POST", "/v2/checkout/orders")
        .match_body(Matcher::PartialJson(json!({
            "purchase_units": [{"amount": {"currency_code": "INR", "value": "10.00"}}]
        })))
        .with_status(201)
        .with_body(r#"{"id":"O-default"}"#)
        .create_async()
        .await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) = post_json(&app, "/api/create-order", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderID"], "O-default");
    order.assert_async().await;
}

#[tokio::test]
async fn create_order_without_credentials_fails() {
    let upstream = Server::new_async().await;
    let app = spawn_app(&upstream, false, None);

    let (status, body) = post_json(&app, "/api/create-order", json!({"amount": 5})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "PayPal credentials not set on server");
    assert_eq!(body["error_code"], "CREDENTIALS_MISSING");
}

#[tokio::test]
async fn create_order_surfaces_upstream_details() {
    let mut upstream = Server::new_async().await;
    let _token = mock_token(&mut upstream).await;
    let _mock = upstream
        .mock("POST", "/v2/checkout/orders")
        .with_status(400)
        .with_body(r#"{"name":"INVALID_REQUEST","message":"Request is not well-formed"}"#)
        .create_async()
        .await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) =
        post_json(&app, "/api/create-order", json!({"amount": 5, "currency": "ZZZ"})).await;

    assert!(status.is_server_error());
    assert_eq!(body["error"], "Could not create order");
    assert_eq!(body["details"]["name"], "INVALID_REQUEST");
}

#[tokio::test]
async fn rejected_token_exchange_is_reported() {
    let mut upstream = Server::new_async().await;
    let _mock = upstream
        .mock("POST", "/v1/oauth2/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_client"}"#)
        .create_async()
        .await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) = post_json(&app, "/api/create-order", json!({})).await;

    assert!(status.is_server_error());
    assert_eq!(body["error_code"], "UPSTREAM_AUTH_ERROR");
    assert!(body["error"].as_str().unwrap().contains("invalid_client"));
}

#[tokio::test]
async fn capture_without_order_id_is_a_validation_error() {
    let mut upstream = Server::new_async().await;
    let token = upstream
        .mock("POST", "/v1/oauth2/token")
        .expect(0)
        .create_async()
        .await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) = post_json(&app, "/api/capture-order", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "orderID required");

    let (status, _) = post_json(&app, "/api/capture-order", json!({"orderID": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(!app.ledger.path().exists());
    token.assert_async().await;
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let upstream = Server::new_async().await;
    let app = spawn_app(&upstream, true, None);

    let request = Request::builder()
        .method("POST")
        .uri("/api/capture-order")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{orderID"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn capture_error_status_leaves_ledger_untouched() {
    let mut upstream = Server::new_async().await;
    let _token = mock_token(&mut upstream).await;
    let _mock = upstream
        .mock("POST", "/v2/checkout/orders/O2/capture")
        .with_status(200)
        .with_body(r#"{"status":"ERROR"}"#)
        .create_async()
        .await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) = post_json(&app, "/api/capture-order", json!({"orderID": "O2"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Capture failed");
    assert_eq!(body["details"]["status"], "ERROR");
    assert!(app.ledger.read().await.transactions.is_empty());
}

#[tokio::test]
async fn partial_capture_is_recorded_with_warnings() {
    let mut upstream = Server::new_async().await;
    let _token = mock_token(&mut upstream).await;
    let _mock = upstream
        .mock("POST", "/v2/checkout/orders/O3/capture")
        .with_status(201)
        .with_body(r#"{"status":"COMPLETED"}"#)
        .create_async()
        .await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) = post_json(&app, "/api/capture-order", json!({"orderID": "O3"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["captureId"], "O3");
    assert!(!body["warnings"].as_array().unwrap().is_empty());

    let (_, totals) = get_json(&app, "/api/total").await;
    assert_eq!(totals["totalINR"].as_f64(), Some(0.0));
    assert_eq!(totals["transactions"][0]["amount"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn non_inr_capture_is_kept_but_not_totalled() {
    let mut upstream = Server::new_async().await;
    let _token = mock_token(&mut upstream).await;
    let _c1 = mock_capture(&mut upstream, "O1", "C1", "25.00", "INR").await;
    let _c2 = mock_capture(&mut upstream, "O2", "C2", "10.00", "USD").await;
    let _c3 = mock_capture(&mut upstream, "O3", "C3", "12.50", "INR").await;
    let app = spawn_app(&upstream, true, None);

    for order_id in ["O1", "O2", "O3"] {
        let (status, _) = post_json(&app, "/api/capture-order", json!({"orderID": order_id})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get_json(&app, "/api/total").await;
    assert_eq!(body["totalINR"].as_f64(), Some(37.5));
    let ids: Vec<&str> = body["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["C3", "C2", "C1"]);
}

#[tokio::test]
async fn total_on_fresh_ledger_is_zero() {
    let upstream = Server::new_async().await;
    let app = spawn_app(&upstream, true, None);

    let (status, body) = get_json(&app, "/api/total").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalINR"].as_f64(), Some(0.0));
    assert_eq!(body["transactions"], json!([]));
}

#[tokio::test]
async fn health_reports_missing_credentials() {
    let upstream = Server::new_async().await;
    let app = spawn_app(&upstream, false, None);

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["paypal_environment"], "sandbox");
    assert_eq!(body["credentials_configured"], false);
}

#[tokio::test]
async fn unmatched_paths_fall_back_to_index() {
    let upstream = Server::new_async().await;
    let public = tempfile::tempdir().unwrap();
    std::fs::write(public.path().join("index.html"), "<h1>Donate</h1>").unwrap();
    std::fs::write(public.path().join("client.js"), "console.log('hi');").unwrap();
    let app = spawn_app(&upstream, true, Some(public.path()));

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/client.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"console.log('hi');");

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/campaign/thanks").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>Donate</h1>");
}
