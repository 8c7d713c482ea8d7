//! Payment gateway adapters.
//!
//! [`RazorpayGateway`] drives the order flow, [`StripeGateway`] the intent
//! flow, and [`MockGateway`] stands in for both when no credentials are
//! configured.

pub mod mock;
pub mod razorpay;
pub mod stripe;

pub use mock::MockGateway;
pub use razorpay::RazorpayGateway;
pub use stripe::StripeGateway;

use crate::error::{PulseError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::error;

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| PulseError::ConfigError(format!("cannot build HTTP client: {err}")))
}

fn transport_error(provider: &str, timeout: Duration, err: reqwest::Error) -> PulseError {
    if err.is_timeout() {
        error!(provider, ?timeout, "payment gateway timed out");
        PulseError::GatewayTimeout(timeout)
    } else {
        error!(provider, ?err, "failed to talk to payment gateway");
        PulseError::GatewayError(format!("unable to reach {provider}"))
    }
}

/// Turns a gateway reply into `T`, mapping transport failures, non-2xx
/// statuses and unexpected bodies to gateway errors.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    timeout: Duration,
    response: reqwest::Result<reqwest::Response>,
) -> Result<T> {
    let response = response.map_err(|err| transport_error(provider, timeout, err))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| transport_error(provider, timeout, err))?;

    if !status.is_success() {
        error!(provider, %status, body = %body, "payment gateway rejected the request");
        return Err(PulseError::GatewayError(format!(
            "{provider} rejected the request ({status})"
        )));
    }

    serde_json::from_str(&body).map_err(|err| {
        error!(provider, ?err, body = %body, "failed to parse payment gateway response");
        PulseError::GatewayError(format!("unexpected response from {provider}"))
    })
}
