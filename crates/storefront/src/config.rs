//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ATELIER_CART_PATH` - File backing the persisted cart (default: .atelier/cart.json)
//! - `ATELIER_CART_QUOTA_BYTES` - Maximum serialized cart size (default: 5242880)
//! - `ATELIER_CURRENCY` - Display currency (default: USD)
//! - `ATELIER_SHIPPING` - Flat shipping charge (default: 0)
//! - `ATELIER_POINTS_AVAILABLE` - Shopper loyalty-point balance (default: 250)

use std::path::PathBuf;
use std::str::FromStr;

use atelier_core::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::FileCartStore;
use crate::cart::store::DEFAULT_QUOTA_BYTES;
use crate::totals::Pricing;

const DEFAULT_CART_PATH: &str = ".atelier/cart.json";
const DEFAULT_POINTS_AVAILABLE: u32 = 250;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// File backing the persisted cart slot
    pub cart_path: PathBuf,
    /// Maximum serialized cart size in bytes
    pub cart_quota_bytes: usize,
    /// Display currency
    pub currency: CurrencyCode,
    /// Flat shipping charge
    pub shipping: Decimal,
    /// Shopper loyalty-point balance
    pub points_available: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_path: PathBuf::from(DEFAULT_CART_PATH),
            cart_quota_bytes: DEFAULT_QUOTA_BYTES,
            currency: CurrencyCode::default(),
            shipping: Decimal::ZERO,
            points_available: DEFAULT_POINTS_AVAILABLE,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cart_path = lookup("ATELIER_CART_PATH").map_or(defaults.cart_path, PathBuf::from);
        let cart_quota_bytes =
            parse_or_default(&lookup, "ATELIER_CART_QUOTA_BYTES", defaults.cart_quota_bytes)?;
        let currency = parse_or_default(&lookup, "ATELIER_CURRENCY", defaults.currency)?;
        let shipping = parse_or_default(&lookup, "ATELIER_SHIPPING", defaults.shipping)?;
        if shipping.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "ATELIER_SHIPPING".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let points_available =
            parse_or_default(&lookup, "ATELIER_POINTS_AVAILABLE", defaults.points_available)?;

        Ok(Self {
            cart_path,
            cart_quota_bytes,
            currency,
            shipping,
            points_available,
        })
    }

    /// Pricing inputs for totals.
    #[must_use]
    pub const fn pricing(&self) -> Pricing {
        Pricing {
            currency: self.currency,
            shipping: self.shipping,
            points_available: self.points_available,
        }
    }

    /// File-backed cart store for the configured path and quota.
    #[must_use]
    pub fn cart_store(&self) -> FileCartStore {
        FileCartStore::new(&self.cart_path).with_quota(self.cart_quota_bytes)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use the default.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
