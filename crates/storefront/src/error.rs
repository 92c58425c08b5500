//! Unified error handling.
//!
//! Each module defines its own error enum; `StorefrontError` wraps them
//! for callers that drive several modules at once, such as the CLI.

use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Top-level error type for the storefront library.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Product data could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl StorefrontError {
    /// Whether the shopper can fix this by changing their input.
    ///
    /// Validation failures and unknown cart lines are user-correctable;
    /// everything else is an environment or data problem.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Cart(CartError::Validation(_) | CartError::LineNotFound(_))
        )
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
