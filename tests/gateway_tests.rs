mod common;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Form, Json, Router};
use common::*;
use serde_json::{Value, json};
use startup_pulse::application::checkout::PricePolicy;
use startup_pulse::domain::payment::PaymentStatus;
use startup_pulse::domain::signature;
use startup_pulse::infrastructure::gateway::{RazorpayGateway, StripeGateway};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Seen = Arc<Mutex<Vec<(HeaderMap, Value)>>>;

/// Serves `provider` on an ephemeral local port and returns its base URL.
async fn spawn(provider: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, provider).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_orders(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let reply = json!({
        "id": "order_live_1",
        "entity": "order",
        "amount": body["amount"],
        "currency": body["currency"],
        "status": "created",
    });
    seen.lock().unwrap().push((headers, body));
    Json(reply)
}

async fn fake_intents(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    let amount: i64 = form["amount"].parse().unwrap();
    let reply = json!({
        "id": "pi_live_1",
        "object": "payment_intent",
        "client_secret": "pi_live_1_secret_abc",
        "amount": amount,
        "currency": form["currency"],
    });
    seen.lock().unwrap().push((headers, json!(form)));
    Json(reply)
}

#[tokio::test]
async fn test_razorpay_order_round_trip() {
    let seen = Seen::default();
    let base = spawn(
        Router::new()
            .route("/v1/orders", post(fake_orders))
            .with_state(seen.clone()),
    )
    .await;
    let gateway = RazorpayGateway::new("rzp_live_id", "rzp_live_secret", base, Duration::from_secs(5)).unwrap();
    let (app, stores) = app_with(Arc::new(gateway), PricePolicy::Trust);

    let (status, body) = post_json(
        &app,
        "/api/create-payment-order",
        json!({"amount": 250, "serviceType": "self-evaluation"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": "order_live_1", "amount": 25000, "currency": "INR", "key": "rzp_live_id"})
    );

    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (headers, request) = &seen[0];
        let auth = headers[header::AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with("Basic "));
        assert_eq!(request["amount"], 25000);
        assert_eq!(request["currency"], "INR");
        assert_eq!(request["receipt"], "receipt_1");
        assert_eq!(request["notes"]["serviceType"], "self-evaluation");
    }

    let callback = json!({
        "razorpay_order_id": "order_live_1",
        "razorpay_payment_id": "pay_live_1",
        "razorpay_signature": signature::sign("rzp_live_secret", "order_live_1", "pay_live_1").unwrap(),
    });
    let (status, _) = post_json(&app, "/api/verify-payment", callback).await;
    assert_eq!(status, StatusCode::OK);

    let payment = &stores.payments.all().await.unwrap()[0];
    assert_eq!(payment.reference.as_deref(), Some("order_live_1"));
    assert_eq!(payment.status, PaymentStatus::Succeeded);
}

#[tokio::test]
async fn test_stripe_intent_round_trip() {
    let seen = Seen::default();
    let base = spawn(
        Router::new()
            .route("/v1/payment_intents", post(fake_intents))
            .with_state(seen.clone()),
    )
    .await;
    let gateway = StripeGateway::new(
        "sk_live_key",
        "pk_live_key",
        "whsec_live",
        base,
        Duration::from_secs(5),
    )
    .unwrap();
    let (app, stores) = app_with(Arc::new(gateway), PricePolicy::Trust);

    let (status, body) = post_json(
        &app,
        "/api/create-payment-intent",
        json!({"amount": 1000, "serviceType": "consultancy"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "pi_live_1",
            "clientSecret": "pi_live_1_secret_abc",
            "amount": 100000,
            "currency": "INR",
            "key": "pk_live_key"
        })
    );

    {
        let seen = seen.lock().unwrap();
        let (headers, form) = &seen[0];
        assert_eq!(headers[header::AUTHORIZATION], "Bearer sk_live_key");
        assert_eq!(form["currency"], "inr");
        assert_eq!(form["metadata[serviceType]"], "consultancy");
        assert_eq!(form["metadata[receipt]"], "receipt_1");
    }

    let callback = json!({
        "payment_intent": "pi_live_1",
        "paymentId": "ch_live_1",
        "signature": signature::sign("whsec_live", "pi_live_1", "ch_live_1").unwrap(),
    });
    let (status, _) = post_json(&app, "/api/verify-payment", callback).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stores.payments.all().await.unwrap()[0].status,
        PaymentStatus::Succeeded
    );
}

#[tokio::test]
async fn test_provider_error_keeps_pending_payment() {
    let base = spawn(Router::new().route(
        "/v1/orders",
        post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": {"code": "BAD_REQUEST_ERROR"}}))) }),
    ))
    .await;
    let gateway = RazorpayGateway::new("rzp_id", "rzp_secret", base, Duration::from_secs(5)).unwrap();
    let (app, stores) = app_with(Arc::new(gateway), PricePolicy::Trust);

    let (status, body) = post_json(
        &app,
        "/api/create-payment-order",
        json!({"amount": 250, "serviceType": "self-evaluation"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["retryable"], true);

    let payments = stores.payments.all().await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Pending);
    assert!(payments[0].reference.is_none());
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let base = spawn(Router::new().route(
        "/v1/orders",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"id": "order_late", "amount": 25000, "currency": "INR"}))
        }),
    ))
    .await;
    let gateway = RazorpayGateway::new("rzp_id", "rzp_secret", base, Duration::from_millis(200)).unwrap();
    let (app, stores) = app_with(Arc::new(gateway), PricePolicy::Trust);

    let (status, body) = post_json(
        &app,
        "/api/create-payment-order",
        json!({"amount": 250, "serviceType": "self-evaluation"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["retryable"], true);
    assert_eq!(stores.payments.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreadable_provider_reply() {
    let base = spawn(Router::new().route("/v1/orders", post(|| async { "<html>oops</html>" }))).await;
    let gateway = RazorpayGateway::new("rzp_id", "rzp_secret", base, Duration::from_secs(5)).unwrap();
    let (app, _) = app_with(Arc::new(gateway), PricePolicy::Trust);

    let (status, body) = post_json(
        &app,
        "/api/create-payment-order",
        json!({"amount": 250, "serviceType": "self-evaluation"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["retryable"], true);
}
