//! Integration tests for Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `add_to_bag` - Product page selection through to the persisted cart
//! - `browse` - Catalog listing filters and sort orders
//! - `cart_totals` - Order summary and loyalty-point redemption
//! - `file_store` - Cart persistence on disk
//!
//! Tests run against the bundled `data/catalog.json` and a cart file in a
//! fresh temporary directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use atelier_storefront::cart::FileCartStore;
use atelier_storefront::catalog::CatalogError;
use atelier_storefront::{CartService, Catalog};
use tempfile::TempDir;

/// Path to the bundled sample catalog.
#[must_use]
pub fn catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/catalog.json")
}

/// Load the bundled sample catalog.
///
/// # Errors
///
/// Returns an error if the catalog file is missing or malformed.
pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    Catalog::load(&catalog_path())
}

/// A cart service backed by a file in its own temporary directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub cart: CartService<FileCartStore>,
}

impl TestContext {
    /// Create a context with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let cart = CartService::new(FileCartStore::new(Self::cart_file(&dir)));
        Ok(Self { dir, cart })
    }

    /// Path of the persisted cart.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        Self::cart_file(&self.dir)
    }

    /// A second service over the same cart file, as another page would see it.
    #[must_use]
    pub fn reopen(&self) -> CartService<FileCartStore> {
        CartService::new(FileCartStore::new(self.cart_path()))
    }

    fn cart_file(dir: &TempDir) -> PathBuf {
        dir.path().join("state").join("cart.json")
    }
}
