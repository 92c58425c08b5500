//! Shopping cart model.
//!
//! A [`Cart`] is an ordered list of [`CartLineItem`]s holding at most one
//! line per [`LineKey`] (product, color name, size). Adding an item whose
//! key is already present sums the quantities instead of appending.
//!
//! Persistence lives in [`store`], and [`service`] ties loading, merging,
//! saving and change notification together.

pub mod service;
pub mod store;

use std::fmt;

use atelier_core::{ColorHex, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Product;
use crate::selection::ValidSelection;

pub use service::{CartError, CartEvent, CartEventKind, CartService};
pub use store::{CartStore, FileCartStore, MemoryCartStore, StoreError};

// =============================================================================
// Line Identity
// =============================================================================

/// Identity of a cart line: one per product, color and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    pub product_id: ProductId,
    pub color_name: String,
    pub size: String,
}

impl LineKey {
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        color_name: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            color_name: color_name.into(),
            size: size.into(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.product_id, self.color_name, self.size)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// One line of the cart, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    /// Unit price captured when the line was first added.
    pub price: Decimal,
    pub color_name: String,
    #[serde(default)]
    pub color_hex: ColorHex,
    pub size: String,
    pub quantity: u32,
    /// Always `price * quantity`.
    pub total_price: Decimal,
    #[serde(default)]
    pub image: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl CartLineItem {
    /// Build a line for a validated selection of `product`.
    ///
    /// The image is the first display image for the chosen color, or empty.
    #[must_use]
    pub fn from_selection(
        product: &Product,
        selection: &ValidSelection<'_>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let image = product
            .primary_image(Some(selection.color))
            .map(|img| img.url.clone())
            .unwrap_or_default();

        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            color_name: selection.color.to_owned(),
            color_hex: product.color_hex(selection.color),
            size: selection.size.to_owned(),
            quantity: selection.quantity,
            total_price: line_total(product.price, selection.quantity),
            image,
            timestamp,
            material: product.material.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
        }
    }

    /// The merge identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), &self.color_name, &self.size)
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id
            && self.color_name == key.color_name
            && self.size == key.size
    }

    /// Set the quantity and recompute the line total from the unit price.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total_price = line_total(self.price, quantity);
    }
}

/// Unit price times quantity, saturating at [`Decimal::MAX`].
fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price.saturating_mul(Decimal::from(quantity))
}

// =============================================================================
// Cart
// =============================================================================

/// What [`Cart::merge`] did with an incoming line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No line had the key; the item was appended.
    Appended,
    /// An existing line absorbed the quantity.
    Combined {
        /// Quantity of the combined line.
        quantity: u32,
    },
}

/// A persisted cart line that cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum CartPayloadError {
    #[error("cart line {0} has zero quantity")]
    ZeroQuantity(LineKey),
}

/// Ordered cart contents.
///
/// Deserializing goes through [`Cart::from_lines`], so a loaded cart holds
/// one line per key with totals matching its quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let lines = Vec::<CartLineItem>::deserialize(deserializer)?;
        Self::from_lines(lines).map_err(serde::de::Error::custom)
    }
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from stored lines.
    ///
    /// Line totals are recomputed from unit price and quantity, and lines
    /// sharing a key are merged.
    ///
    /// # Errors
    ///
    /// Returns [`CartPayloadError::ZeroQuantity`] if any line has a
    /// quantity of 0.
    pub fn from_lines(lines: Vec<CartLineItem>) -> Result<Self, CartPayloadError> {
        if let Some(empty) = lines.iter().find(|line| line.quantity == 0) {
            return Err(CartPayloadError::ZeroQuantity(empty.key()));
        }

        Ok(lines
            .into_iter()
            .map(|mut line| {
                line.set_quantity(line.quantity);
                line
            })
            .collect())
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.total_price))
    }

    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.matches(key))
    }

    fn get_mut(&mut self, key: &LineKey) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.matches(key))
    }

    /// Merge a line into the cart.
    ///
    /// An existing line with the same key keeps its own unit price and
    /// gains the incoming quantity; otherwise the item is appended as is.
    pub fn merge(&mut self, item: CartLineItem) -> MergeOutcome {
        let key = item.key();
        if let Some(existing) = self.get_mut(&key) {
            let quantity = existing.quantity.saturating_add(item.quantity);
            existing.set_quantity(quantity);
            MergeOutcome::Combined { quantity }
        } else {
            self.items.push(item);
            MergeOutcome::Appended
        }
    }

    /// Add one unit to a line. Returns `false` if the line is absent.
    pub fn increase(&mut self, key: &LineKey) -> bool {
        self.get_mut(key).is_some_and(|item| {
            item.set_quantity(item.quantity.saturating_add(1));
            true
        })
    }

    /// Take one unit from a line, never below 1.
    ///
    /// Returns `false` if the line is absent.
    pub fn decrease(&mut self, key: &LineKey) -> bool {
        self.get_mut(key).is_some_and(|item| {
            if item.quantity > 1 {
                item.set_quantity(item.quantity - 1);
            }
            true
        })
    }

    /// Remove a line, returning it if it was present.
    pub fn remove(&mut self, key: &LineKey) -> Option<CartLineItem> {
        let position = self.items.iter().position(|item| item.matches(key))?;
        Some(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<CartLineItem> for Cart {
    fn from_iter<T: IntoIterator<Item = CartLineItem>>(iter: T) -> Self {
        let mut cart = Self::new();
        for item in iter {
            cart.merge(item);
        }
        cart
    }
}
