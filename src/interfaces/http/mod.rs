//! JSON HTTP API.
//!
//! Routes:
//! - `POST /api/contact`, `/api/self-evaluation`, `/api/book-consultation`,
//!   `/api/mentorship-enrollment` store form submissions (201).
//! - `POST /api/create-payment-order`, `/api/create-payment-intent` open a checkout.
//! - `POST /api/verify-payment` checks a checkout callback.
//! - `GET /api/payments/:reference` reports a payment's status.
//! - `GET /health` reports liveness and the gateway mode.

pub mod dto;
pub mod error;
pub mod forms;
pub mod payments;

use crate::application::checkout::CheckoutService;
use crate::application::intake::IntakeService;
use crate::error::{PulseError, Result};
use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use dto::HealthResponse;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<IntakeService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppState {
    pub fn new(intake: IntakeService, checkout: CheckoutService) -> Self {
        Self {
            intake: Arc::new(intake),
            checkout: Arc::new(checkout),
        }
    }
}

/// Builds the application router. An empty `cors_origins` allows any origin.
pub fn router(state: AppState, cors_origins: &[String]) -> Result<Router> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/contact", post(forms::contact))
        .route("/api/self-evaluation", post(forms::self_evaluation))
        .route("/api/book-consultation", post(forms::book_consultation))
        .route("/api/mentorship-enrollment", post(forms::mentorship_enrollment))
        .route("/api/create-payment-order", post(payments::create_order))
        .route("/api/create-payment-intent", post(payments::create_intent))
        .route("/api/verify-payment", post(payments::verify_payment))
        .route("/api/payments/:reference", get(payments::payment_status))
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    Ok(router)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        info!("CORS: allowing all origins");
        return Ok(cors.allow_origin(Any));
    }

    let allowed = origins
        .iter()
        .map(|origin| {
            origin
                .trim()
                .parse::<HeaderValue>()
                .map_err(|_| PulseError::ConfigError(format!("invalid CORS origin '{origin}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(origins = ?origins, "CORS: allowing configured origins");
    Ok(cors.allow_origin(allowed))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mode: state.checkout.mode(),
    })
}
