use crate::domain::validation::FieldErrors;
use crate::error::{PulseError, Result};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            retryable: false,
        }
    }
}

impl PulseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PulseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retryable = self.is_retryable();
        let body = match self {
            Self::ValidationError(errors) => ErrorBody {
                errors: Some(errors),
                ..ErrorBody::new("Invalid data")
            },
            Self::MalformedBody(_) | Self::NotFound(_) | Self::Conflict(_) => {
                ErrorBody::new(self.to_string())
            }
            Self::GatewayError(_) | Self::GatewayTimeout(_) => {
                warn!(error = %self, "checkout failed");
                ErrorBody {
                    retryable,
                    ..ErrorBody::new(self.to_string())
                }
            }
            other => {
                // details stay in the log
                error!(error = %other, "request failed");
                ErrorBody::new("Internal server error")
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for PulseError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

/// Unwraps a JSON body, turning any rejection into a 400.
pub fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(value) = payload?;
    Ok(value)
}
