//! Command-line and environment configuration.

use crate::application::checkout::PricePolicy;
use crate::domain::money::{DEFAULT_CURRENCY, parse_currency};
use crate::domain::ports::SharedGateway;
use crate::error::{PulseError, Result};
use crate::infrastructure::gateway::{MockGateway, RazorpayGateway, StripeGateway, razorpay, stripe};
use clap::{Args, Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Which provider serves checkouts when credentials are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GatewayChoice {
    /// Order-based checkout.
    #[default]
    Razorpay,
    /// Intent-based checkout.
    Stripe,
}

/// Gateway credentials. Empty values count as absent.
#[derive(Args, Clone, Default)]
pub struct GatewayKeys {
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: Option<String>,

    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: Option<String>,

    #[arg(long, env = "RAZORPAY_API_BASE", default_value = razorpay::DEFAULT_API_BASE)]
    pub razorpay_api_base: String,

    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: Option<String>,

    #[arg(long, env = "STRIPE_PUBLISHABLE_KEY")]
    pub stripe_publishable_key: Option<String>,

    #[arg(long, env = "STRIPE_SIGNING_SECRET", hide_env_values = true)]
    pub stripe_signing_secret: Option<String>,

    #[arg(long, env = "STRIPE_API_BASE", default_value = stripe::DEFAULT_API_BASE)]
    pub stripe_api_base: String,
}

#[derive(Parser)]
#[command(author, version, about = "Startup mentorship intake and checkout API", long_about = None)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "PULSE_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PULSE_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Payment gateway used when its credentials are configured
    #[arg(long, env = "PULSE_GATEWAY", value_enum, default_value_t = GatewayChoice::Razorpay)]
    pub gateway: GatewayChoice,

    #[command(flatten)]
    pub keys: GatewayKeys,

    /// ISO 4217 code charged for every checkout
    #[arg(long, env = "PULSE_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Seconds to wait for the payment gateway
    #[arg(long, env = "PULSE_GATEWAY_TIMEOUT_SECS", default_value_t = 10)]
    pub gateway_timeout_secs: u64,

    /// Reject order checkouts whose amount differs from the listed price
    #[arg(long, env = "PULSE_ENFORCE_CANONICAL_PRICE")]
    pub enforce_canonical_price: bool,

    /// Allowed browser origins (repeatable or comma separated); any origin if unset
    #[arg(long = "cors-origin", env = "PULSE_FRONTEND_URL", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Resolve the configuration, report the gateway mode and exit
    #[arg(long)]
    pub check_config: bool,
}

impl Config {
    pub fn gateway_timeout(&self) -> Result<Duration> {
        if self.gateway_timeout_secs == 0 {
            return Err(PulseError::ConfigError(
                "gateway timeout must be at least one second".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.gateway_timeout_secs))
    }

    pub fn currency(&self) -> Result<String> {
        parse_currency(&self.currency)
    }

    pub fn price_policy(&self) -> PricePolicy {
        if self.enforce_canonical_price {
            PricePolicy::Enforce
        } else {
            PricePolicy::Trust
        }
    }

    pub fn gateway_settings(&self) -> Result<GatewaySettings> {
        GatewaySettings::resolve(self.gateway, &self.keys)
    }
}

/// The gateway the service will run with, credentials included.
#[derive(Clone, PartialEq, Eq)]
pub enum GatewaySettings {
    Mock,
    Razorpay {
        key_id: String,
        key_secret: String,
        api_base: String,
    },
    Stripe {
        secret_key: String,
        publishable_key: String,
        signing_secret: String,
        api_base: String,
    },
}

impl GatewaySettings {
    /// All credentials of the chosen gateway select it. The mock is chosen
    /// only when no credential of any gateway is set; anything else is a
    /// configuration error.
    pub fn resolve(choice: GatewayChoice, keys: &GatewayKeys) -> Result<Self> {
        let configured = [
            keys.razorpay_key_id.as_deref(),
            keys.razorpay_key_secret.as_deref(),
            keys.stripe_secret_key.as_deref(),
            keys.stripe_publishable_key.as_deref(),
            keys.stripe_signing_secret.as_deref(),
        ]
        .into_iter()
        .any(|value| present(value).is_some());

        match choice {
            GatewayChoice::Razorpay => {
                let found = credentials(
                    "razorpay",
                    [
                        ("RAZORPAY_KEY_ID", keys.razorpay_key_id.as_deref()),
                        ("RAZORPAY_KEY_SECRET", keys.razorpay_key_secret.as_deref()),
                    ],
                    configured,
                )?;
                Ok(match found {
                    Some([key_id, key_secret]) => Self::Razorpay {
                        key_id,
                        key_secret,
                        api_base: keys.razorpay_api_base.clone(),
                    },
                    None => Self::Mock,
                })
            }
            GatewayChoice::Stripe => {
                let found = credentials(
                    "stripe",
                    [
                        ("STRIPE_SECRET_KEY", keys.stripe_secret_key.as_deref()),
                        ("STRIPE_PUBLISHABLE_KEY", keys.stripe_publishable_key.as_deref()),
                        ("STRIPE_SIGNING_SECRET", keys.stripe_signing_secret.as_deref()),
                    ],
                    configured,
                )?;
                Ok(match found {
                    Some([secret_key, publishable_key, signing_secret]) => Self::Stripe {
                        secret_key,
                        publishable_key,
                        signing_secret,
                        api_base: keys.stripe_api_base.clone(),
                    },
                    None => Self::Mock,
                })
            }
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Razorpay { .. } => "razorpay",
            Self::Stripe { .. } => "stripe",
        }
    }

    pub fn build(&self, timeout: Duration) -> Result<SharedGateway> {
        Ok(match self {
            Self::Mock => Arc::new(MockGateway::new()),
            Self::Razorpay {
                key_id,
                key_secret,
                api_base,
            } => Arc::new(RazorpayGateway::new(
                key_id.as_str(),
                key_secret.as_str(),
                api_base.as_str(),
                timeout,
            )?),
            Self::Stripe {
                secret_key,
                publishable_key,
                signing_secret,
                api_base,
            } => Arc::new(StripeGateway::new(
                secret_key.as_str(),
                publishable_key.as_str(),
                signing_secret.as_str(),
                api_base.as_str(),
                timeout,
            )?),
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `None` when nothing is set anywhere, the chosen gateway's values when all
/// are set, an error naming the missing ones otherwise.
fn credentials<const N: usize>(
    gateway: &str,
    fields: [(&'static str, Option<&str>); N],
    any_configured: bool,
) -> Result<Option<[String; N]>> {
    let fields = fields.map(|(name, value)| (name, present(value)));
    let missing = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(Some(fields.map(|(_, value)| value.unwrap_or_default().to_string())))
    } else if missing.len() < N {
        Err(PulseError::ConfigError(format!(
            "{gateway} credentials are incomplete, missing {}",
            missing.join(", ")
        )))
    } else if any_configured {
        Err(PulseError::ConfigError(format!(
            "{gateway} is selected but only another gateway's credentials are set, missing {}",
            missing.join(", ")
        )))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn razorpay_keys(id: Option<&str>, secret: Option<&str>) -> GatewayKeys {
        GatewayKeys {
            razorpay_key_id: id.map(String::from),
            razorpay_key_secret: secret.map(String::from),
            razorpay_api_base: razorpay::DEFAULT_API_BASE.to_string(),
            ..GatewayKeys::default()
        }
    }

    #[test]
    fn test_no_credentials_means_mock() {
        let settings = GatewaySettings::resolve(GatewayChoice::Razorpay, &razorpay_keys(None, None)).unwrap();
        assert!(settings == GatewaySettings::Mock);
        assert!(settings.build(Duration::from_secs(1)).unwrap().is_mock());

        // blank values count as absent
        let blank = razorpay_keys(Some(""), Some("  "));
        assert_eq!(
            GatewaySettings::resolve(GatewayChoice::Razorpay, &blank).unwrap().mode(),
            "mock"
        );
    }

    #[test]
    fn test_full_credentials_select_gateway() {
        let settings =
            GatewaySettings::resolve(GatewayChoice::Razorpay, &razorpay_keys(Some("rzp_id"), Some("rzp_secret")))
                .unwrap();
        assert_eq!(settings.mode(), "razorpay");
        let gateway = settings.build(Duration::from_secs(1)).unwrap();
        assert!(!gateway.is_mock());
        assert_eq!(gateway.name(), "razorpay");
    }

    #[test]
    fn test_partial_credentials_are_rejected() {
        let result = GatewaySettings::resolve(GatewayChoice::Razorpay, &razorpay_keys(Some("rzp_id"), None));
        let Err(PulseError::ConfigError(message)) = result else {
            panic!("partial credentials must not start the service");
        };
        assert!(message.contains("RAZORPAY_KEY_SECRET"));
        assert!(!message.contains("RAZORPAY_KEY_ID"));
    }

    #[test]
    fn test_stripe_needs_all_three_keys() {
        let mut keys = GatewayKeys {
            stripe_secret_key: Some("sk_test".to_string()),
            stripe_publishable_key: Some("pk_test".to_string()),
            ..GatewayKeys::default()
        };
        assert!(GatewaySettings::resolve(GatewayChoice::Stripe, &keys).is_err());

        keys.stripe_signing_secret = Some("whsec".to_string());
        let settings = GatewaySettings::resolve(GatewayChoice::Stripe, &keys).unwrap();
        assert_eq!(settings.mode(), "stripe");
    }

    #[test]
    fn test_other_gateway_credentials_never_fall_back_to_mock() {
        let only_razorpay = razorpay_keys(Some("rzp_id"), Some("rzp_secret"));
        let Err(PulseError::ConfigError(message)) = GatewaySettings::resolve(GatewayChoice::Stripe, &only_razorpay)
        else {
            panic!("stripe without its keys must not run the mock");
        };
        assert!(message.contains("STRIPE_SECRET_KEY"));
        assert!(message.contains("STRIPE_SIGNING_SECRET"));

        let only_stripe = GatewayKeys {
            stripe_publishable_key: Some("pk_live".to_string()),
            ..GatewayKeys::default()
        };
        let Err(PulseError::ConfigError(message)) = GatewaySettings::resolve(GatewayChoice::Razorpay, &only_stripe)
        else {
            panic!("razorpay without its keys must not run the mock");
        };
        assert!(message.contains("RAZORPAY_KEY_ID"));
    }

    #[test]
    fn test_flag_credentials_for_other_gateway_are_rejected() {
        let config = Config::try_parse_from([
            "startup-pulse",
            "--gateway",
            "stripe",
            "--razorpay-key-id",
            "rzp_live_id",
            "--razorpay-key-secret",
            "rzp_live_secret",
        ])
        .ok()
        .unwrap();
        assert!(config.gateway_settings().is_err());
    }

    #[test]
    fn test_flags_parse() {
        let config = Config::try_parse_from([
            "startup-pulse",
            "--bind",
            "127.0.0.1:8080",
            "--gateway",
            "stripe",
            "--currency",
            "usd",
            "--gateway-timeout-secs",
            "3",
            "--enforce-canonical-price",
            "--cors-origin",
            "http://localhost:3000,https://example.com",
        ])
        .ok()
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.gateway, GatewayChoice::Stripe);
        assert_eq!(config.currency().unwrap(), "USD");
        assert_eq!(config.gateway_timeout().unwrap(), Duration::from_secs(3));
        assert_eq!(config.price_policy(), PricePolicy::Enforce);
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = Config::try_parse_from(["startup-pulse", "--gateway-timeout-secs", "0"])
            .ok()
            .unwrap();
        assert!(config.gateway_timeout().is_err());
    }
}
