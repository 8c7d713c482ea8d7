#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::{Value, json};
use startup_pulse::application::checkout::{CheckoutService, PricePolicy};
use startup_pulse::application::intake::IntakeService;
use startup_pulse::domain::ports::SharedGateway;
use startup_pulse::infrastructure::Stores;
use startup_pulse::infrastructure::gateway::MockGateway;
use startup_pulse::interfaces::http::{AppState, router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Router in mock mode over fresh in-memory stores.
pub fn mock_app() -> (Router, Stores) {
    app_with(Arc::new(MockGateway::new()), PricePolicy::Trust)
}

pub fn app_with(gateway: SharedGateway, price_policy: PricePolicy) -> (Router, Stores) {
    let stores = Stores::in_memory();
    let checkout = CheckoutService::new(stores.payments.clone(), gateway, "INR".to_string())
        .with_timeout(Duration::from_secs(2))
        .with_price_policy(price_policy);
    let state = AppState::new(IntakeService::new(stores.clone()), checkout);
    let app = router(state, &[]).expect("router");
    (app, stores)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response")
    };
    (status, body)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

pub fn self_evaluation_body() -> Value {
    json!({
        "founderName": "Jane Doe",
        "founderEmail": "jane@x.com",
        "startupName": "Acme",
        "industry": "technology",
        "businessDescription": "We build widgets.",
        "stage": "idea",
        "funding": "no",
        "teamSize": "solo",
        "challenges": ["funding"]
    })
}

pub fn consultation_body() -> Value {
    json!({
        "name": "Ravi Kumar",
        "email": "ravi@example.in",
        "consultant": "finance",
        "date": "2026-11-02",
        "time": "11:00",
        "topics": "Unit economics and a seed round plan"
    })
}

pub fn mentorship_body() -> Value {
    json!({
        "name": "Mei Chen",
        "email": "mei@example.com",
        "startupName": "Loop Labs",
        "industry": "ecommerce",
        "stage": "revenue",
        "team": "small-team",
        "goals": "Scale to three new cities this year"
    })
}

pub fn contact_body() -> Value {
    json!({
        "name": "Sam Taylor",
        "email": "sam@example.org",
        "subject": "Partnership",
        "message": "We would like to sponsor your next cohort."
    })
}

fn word(rng: &mut impl Rng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A valid contact submission with random content.
pub fn random_contact(rng: &mut impl Rng) -> Value {
    let name_len = rng.gen_range(2..=40);
    let subject_len = rng.gen_range(5..=60);
    let message_len = rng.gen_range(10..=300);
    json!({
        "name": word(rng, name_len),
        "email": format!("{}@example.com", word(rng, 8).to_lowercase()),
        "subject": word(rng, subject_len),
        "message": word(rng, message_len),
    })
}
