//! Product detail page state.
//!
//! [`ProductPage`] binds one product to its inventory index and the
//! shopper's [`Selection`], and runs the add-to-bag flow:
//!
//! ```text
//! NoColor -> ColorChosen -> ColorAndSizeChosen -> Added
//!                                  |                ^
//!                                  v                |
//!                               Invalid ------------+ (after a fix)
//! ```
//!
//! A successful add resets the quantity to 1 and keeps color and size so
//! the same variant can be added again.

use atelier_core::SelectionStage;
use chrono::Utc;

use crate::cart::{Cart, CartError, CartLineItem, CartService, CartStore};
use crate::catalog::{Product, ProductImage};
use crate::inventory::{Availability, InventoryIndex, SizeSlot};
use crate::selection::Selection;

/// Message shown after an item is added.
pub const ADDED_MESSAGE: &str = "Item added to bag successfully!";

/// Message shown when the cart could not be saved.
pub const ADD_FAILED_MESSAGE: &str = "failed to add item to cart";

/// State of one product detail page.
#[derive(Debug, Clone)]
pub struct ProductPage<'p> {
    product: &'p Product,
    index: InventoryIndex,
    selection: Selection,
    outcome: Option<SelectionStage>,
    error: Option<String>,
    success: Option<&'static str>,
}

impl<'p> ProductPage<'p> {
    /// Open a product with nothing selected.
    #[must_use]
    pub fn new(product: &'p Product) -> Self {
        Self::with_selection(product, Selection::new())
    }

    /// Open a product with a color preselected, e.g. from a `?color=` link.
    #[must_use]
    pub fn with_color(product: &'p Product, color: impl Into<String>) -> Self {
        Self::with_selection(product, Selection::with_color(color))
    }

    fn with_selection(product: &'p Product, selection: Selection) -> Self {
        Self {
            product,
            index: product.index(),
            selection,
            outcome: None,
            error: None,
            success: None,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &'p Product {
        self.product
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn index(&self) -> &InventoryIndex {
        &self.index
    }

    /// Availability queries for this product.
    #[must_use]
    pub fn availability(&self) -> Availability<'_> {
        Availability::new(&self.index, &self.product.sizes)
    }

    /// Current stage, including the outcome of the last add attempt.
    #[must_use]
    pub fn stage(&self) -> SelectionStage {
        self.outcome.unwrap_or_else(|| self.selection.stage())
    }

    /// Inline error from the last add attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation from the last successful add.
    #[must_use]
    pub const fn success(&self) -> Option<&'static str> {
        self.success
    }

    /// Size picker rows for the current color.
    #[must_use]
    pub fn size_board(&self) -> Vec<SizeSlot> {
        self.availability().size_board(self.selection.color())
    }

    /// Gallery images for the current color.
    #[must_use]
    pub fn display_images(&self) -> &'p [ProductImage] {
        self.product.display_images(self.selection.color())
    }

    /// Choose a color. Returns `true` if the size was cleared.
    pub fn select_color(&mut self, color: impl Into<String>) -> bool {
        self.outcome = None;
        let availability = Availability::new(&self.index, &self.product.sizes);
        self.selection.select_color(color, &availability)
    }

    pub fn select_size(&mut self, size: impl Into<String>) {
        self.outcome = None;
        self.selection.select_size(size);
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.outcome = None;
        self.selection.set_quantity(quantity);
    }

    pub fn increment(&mut self) {
        self.outcome = None;
        self.selection.increment();
    }

    pub fn decrement(&mut self) {
        self.outcome = None;
        self.selection.decrement();
    }

    /// Validate the selection and merge it into the cart.
    ///
    /// On a validation failure the reason becomes the inline error and the
    /// selection is kept. On a storage failure the selection is also kept
    /// and a generic message is shown.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] or [`CartError::Storage`].
    pub fn add_to_bag<S: CartStore>(
        &mut self,
        cart: &mut CartService<S>,
    ) -> Result<Cart, CartError> {
        self.success = None;

        let availability = Availability::new(&self.index, &self.product.sizes);
        let item = match self.selection.validate(&availability) {
            Ok(valid) => CartLineItem::from_selection(self.product, &valid, Utc::now()),
            Err(reason) => {
                tracing::debug!(product = %self.product.id, %reason, "Selection rejected");
                self.error = Some(reason.to_string());
                self.outcome = Some(SelectionStage::Invalid);
                return Err(reason.into());
            }
        };

        match cart.add(item) {
            Ok(updated) => {
                self.selection.reset_quantity();
                self.error = None;
                self.success = Some(ADDED_MESSAGE);
                self.outcome = Some(SelectionStage::Added);
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(product = %self.product.id, error = %e, "Failed to add item to cart");
                self.error = Some(ADD_FAILED_MESSAGE.to_string());
                self.outcome = None;
                Err(e)
            }
        }
    }
}
