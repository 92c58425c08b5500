//! Shopper variant selection and its validation.
//!
//! A [`Selection`] is the transient color/size/quantity state of one
//! product page. [`Selection::validate`] gates adding to the cart; its
//! checks run in a fixed order and only the first failure is reported,
//! so the inline message a shopper sees is deterministic.

use atelier_core::SelectionStage;
use thiserror::Error;

use crate::inventory::Availability;

/// Why a selection cannot be added to the cart.
///
/// Variants are listed in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("color required")]
    ColorRequired,

    #[error("size required")]
    SizeRequired,

    #[error("quantity must be positive")]
    QuantityNotPositive,

    #[error("size unavailable for color")]
    SizeUnavailable,

    /// Fewer units remain than requested.
    #[error("insufficient stock: only {available} available in this size and color")]
    InsufficientStock {
        /// Units left for the chosen variant.
        available: u32,
    },
}

/// A selection that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidSelection<'s> {
    pub color: &'s str,
    pub size: &'s str,
    pub quantity: u32,
}

/// Color, size and quantity picked on a product page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    color: Option<String>,
    size: Option<String>,
    quantity: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    /// Nothing picked, quantity 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            color: None,
            size: None,
            quantity: 1,
        }
    }

    /// Start with a color already chosen, e.g. from a `?color=` link.
    #[must_use]
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Choose a color.
    ///
    /// Clears the size if it cannot be bought in the new color; quantity
    /// is kept. Returns `true` when the size was cleared.
    pub fn select_color(&mut self, color: impl Into<String>, availability: &Availability<'_>) -> bool {
        let color = color.into();
        let cleared = self
            .size
            .as_deref()
            .is_some_and(|size| !availability.is_size_available(Some(&color), size));
        if cleared {
            tracing::debug!(%color, size = ?self.size, "Clearing size unavailable in new color");
            self.size = None;
        }
        self.color = Some(color);
        cleared
    }

    pub fn select_size(&mut self, size: impl Into<String>) {
        self.size = Some(size.into());
    }

    pub fn clear_size(&mut self) {
        self.size = None;
    }

    pub const fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Step the quantity down, never below 1.
    pub const fn decrement(&mut self) {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
    }

    /// Reset the quantity after a successful add, keeping color and size.
    pub const fn reset_quantity(&mut self) {
        self.quantity = 1;
    }

    /// How far through the color -> size flow the shopper is.
    #[must_use]
    pub fn stage(&self) -> SelectionStage {
        match (&self.color, &self.size) {
            (None, _) => SelectionStage::NoColor,
            (Some(_), None) => SelectionStage::ColorChosen,
            (Some(_), Some(_)) => SelectionStage::ColorAndSizeChosen,
        }
    }

    /// Check the selection against current availability.
    ///
    /// A size recorded for the color with zero units passes the
    /// availability check and fails on stock, so the shopper is told how
    /// many are left.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`SelectionError`] in declaration order.
    pub fn validate(&self, availability: &Availability<'_>) -> Result<ValidSelection<'_>, SelectionError> {
        let color = self.color.as_deref().ok_or(SelectionError::ColorRequired)?;
        let size = self.size.as_deref().ok_or(SelectionError::SizeRequired)?;

        if self.quantity == 0 {
            return Err(SelectionError::QuantityNotPositive);
        }

        if !availability.is_offered(color, size) {
            return Err(SelectionError::SizeUnavailable);
        }

        let available = availability.stock_for(Some(color), size);
        if available < self.quantity {
            return Err(SelectionError::InsufficientStock { available });
        }

        Ok(ValidSelection {
            color,
            size,
            quantity: self.quantity,
        })
    }
}
