//! Checkout callback signatures: lowercase hex HMAC-SHA256 over `orderId|paymentId`.

use crate::error::{PulseError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PulseError::InternalError(Box::new(std::io::Error::other(e.to_string()))))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Computes the signature a gateway attaches to a completed checkout.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> Result<String> {
    Ok(hex::encode(mac(secret, order_id, payment_id)?.finalize().into_bytes()))
}

/// Checks `signature` against the expected one in constant time.
///
/// Only the canonical lowercase encoding is accepted.
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    if hex::encode(&provided) != signature {
        return false;
    }
    match mac(secret, order_id, payment_id) {
        Ok(mac) => mac.verify_slice(&provided).is_ok(),
        Err(_) => false,
    }
}
