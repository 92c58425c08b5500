//! Atelier Core - Shared types library.
//!
//! This crate provides common types used across all Atelier components:
//! - `storefront` - Catalog, variant selection, cart and totals
//! - `cli` - Command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, colors, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
