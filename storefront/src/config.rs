//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that are missing or do not parse fall back to the default.

use crate::checkout::PricingPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Storefront configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Simulated identity provider latency in milliseconds
    pub auth_latency_ms: u64,
    /// Simulated order processing time in milliseconds
    pub checkout_delay_ms: u64,
    /// How long a session waits for a sign-in outcome, in milliseconds
    pub response_timeout_ms: u64,
    /// How long ending a session waits for in-flight effects, in milliseconds
    pub shutdown_timeout_ms: u64,
    /// Shipping and tax rules
    pub pricing: PricingPolicy,
    /// `tracing` filter directive used by the binary
    pub log_filter: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            auth_latency_ms: 500,
            checkout_delay_ms: 2000,
            response_timeout_ms: 5000,
            shutdown_timeout_ms: 5000,
            pricing: PricingPolicy::default(),
            log_filter: "storefront=info".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse().ok());

        Self {
            auth_latency_ms: parsed("STOREFRONT_AUTH_LATENCY_MS").unwrap_or(defaults.auth_latency_ms),
            checkout_delay_ms: parsed("STOREFRONT_CHECKOUT_DELAY_MS")
                .unwrap_or(defaults.checkout_delay_ms),
            response_timeout_ms: parsed("STOREFRONT_RESPONSE_TIMEOUT_MS")
                .unwrap_or(defaults.response_timeout_ms),
            shutdown_timeout_ms: parsed("STOREFRONT_SHUTDOWN_TIMEOUT_MS")
                .unwrap_or(defaults.shutdown_timeout_ms),
            pricing: PricingPolicy {
                free_shipping_threshold: lookup("STOREFRONT_FREE_SHIPPING_THRESHOLD")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.pricing.free_shipping_threshold),
                flat_shipping: lookup("STOREFRONT_FLAT_SHIPPING")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.pricing.flat_shipping),
                tax_rate: lookup("STOREFRONT_TAX_RATE")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.pricing.tax_rate),
            },
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// Configuration for tests and demos: no simulated delays
    #[must_use]
    pub fn instant() -> Self {
        Self {
            auth_latency_ms: 0,
            checkout_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Identity provider latency
    #[must_use]
    pub const fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }

    /// Order processing delay
    #[must_use]
    pub const fn checkout_delay(&self) -> Duration {
        Duration::from_millis(self.checkout_delay_ms)
    }

    /// Sign-in response timeout
    #[must_use]
    pub const fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Session shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
