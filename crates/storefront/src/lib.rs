//! Atelier Storefront library.
//!
//! Variant selection and cart logic for the storefront product pages:
//!
//! - [`catalog`] - Product data contract and catalog loading
//! - [`browse`] - Catalog listing with category/price filters and sorting
//! - [`inventory`] - Color/size stock index and availability queries
//! - [`selection`] - Shopper selection and add-to-cart validation
//! - [`page`] - Product page state driving the add-to-bag flow
//! - [`cart`] - Cart lines, consolidation, persistence and notifications
//! - [`totals`] - Subtotal, shipping and loyalty-point redemption
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browse;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod inventory;
pub mod page;
pub mod selection;
pub mod totals;

pub use browse::{BrowseFilter, PriceRange, SortOrder};
pub use cart::{Cart, CartLineItem, CartService, LineKey};
pub use catalog::{Catalog, Product};
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use inventory::{Availability, InventoryIndex, InventoryRecord};
pub use page::ProductPage;
pub use selection::{Selection, SelectionError};
pub use totals::{CartTotals, Pricing};
