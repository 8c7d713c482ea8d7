use super::AppState;
use super::dto::{IntentResponse, OrderResponse, PaymentVerified, VerifyPaymentBody};
use super::error::{ErrorBody, json_body};
use crate::domain::payment::{CheckoutFlow, CheckoutSubmission, Payment};
use crate::domain::ports::{PaymentCallback, Verdict};
use crate::error::{PulseError, Result};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

type Body<T> = std::result::Result<Json<T>, JsonRejection>;

pub async fn create_order(
    State(state): State<AppState>,
    payload: Body<CheckoutSubmission>,
) -> Result<Json<OrderResponse>> {
    let checkout = state
        .checkout
        .initiate(CheckoutFlow::Order, json_body(payload)?)
        .await?;
    Ok(Json(checkout.session.into()))
}

pub async fn create_intent(
    State(state): State<AppState>,
    payload: Body<CheckoutSubmission>,
) -> Result<Json<IntentResponse>> {
    let checkout = state
        .checkout
        .initiate(CheckoutFlow::Intent, json_body(payload)?)
        .await?;
    let session = checkout.session;
    let client_secret = session
        .client_secret
        .ok_or_else(|| PulseError::GatewayError("intent has no client secret".to_string()))?;

    Ok(Json(IntentResponse {
        id: session.reference,
        client_secret,
        amount: session.amount,
        currency: session.currency,
        key: session.public_key,
        mock: session.mock,
    }))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Body<VerifyPaymentBody>,
) -> Result<Response> {
    let callback: PaymentCallback = json_body(payload)?.into();
    let response = match state.checkout.verify(&callback).await? {
        Verdict::Verified {
            payment_id,
            order_id,
            signature,
        } => Json(PaymentVerified {
            success: true,
            payment_id,
            order_id,
            signature,
        })
        .into_response(),
        Verdict::Rejected => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                success: false,
                message: "Payment verification failed".to_string(),
                errors: None,
                retryable: false,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

pub async fn payment_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<Payment>> {
    Ok(Json(state.checkout.payment_by_reference(&reference).await?))
}
