//! Cart service: load, merge, save, notify.
//!
//! Every mutation reads the persisted cart, applies the change, writes the
//! whole cart back in one call and then broadcasts a [`CartEvent`] so
//! listeners such as a cart badge can refresh. A failed write leaves the
//! stored cart as it was and sends no event.

use tokio::sync::broadcast;
use tracing::instrument;

use super::store::{CartStore, StoreError};
use super::{Cart, CartLineItem, LineKey, MergeOutcome};
use crate::selection::SelectionError;
use crate::totals::{CartTotals, Pricing};

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 16;

/// Cart operation failures.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// The selection did not pass validation.
    #[error(transparent)]
    Validation(#[from] SelectionError),

    /// The cart could not be persisted.
    #[error("failed to save cart: {0}")]
    Storage(#[from] StoreError),

    /// No line with the key exists.
    #[error("no cart line for {0}")]
    LineNotFound(LineKey),
}

/// Kind of change a [`CartEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEventKind {
    Added,
    Updated,
    Removed,
    Cleared,
}

/// Broadcast after every successful cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEvent {
    pub kind: CartEventKind,
    /// Total units in the cart after the change.
    pub item_count: u32,
}

/// Owns the cart store and the change-notification channel.
#[derive(Debug)]
pub struct CartService<S> {
    store: S,
    events: broadcast::Sender<CartEvent>,
}

impl<S: CartStore> CartService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    /// Listen for cart changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted cart.
    ///
    /// An absent slot, an unreadable slot or a malformed payload all load
    /// as an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        let payload = match self.store.read() {
            Ok(Some(payload)) => payload,
            Ok(None) => return Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart, starting empty");
                return Cart::new();
            }
        };

        serde_json::from_str(&payload).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Malformed cart payload, starting empty");
            Cart::new()
        })
    }

    /// Persist the whole cart in one write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), StoreError> {
        let payload = serde_json::to_string(cart)?;
        self.store.write(&payload)
    }

    /// Merge a line into the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the updated cart cannot be saved.
    #[instrument(skip(self, item), fields(line = %item.key(), quantity = item.quantity))]
    pub fn add(&mut self, item: CartLineItem) -> Result<Cart, CartError> {
        let mut cart = self.load();
        let outcome = cart.merge(item);
        self.commit(&cart, CartEventKind::Added)?;

        match outcome {
            MergeOutcome::Appended => tracing::info!(lines = cart.len(), "Added cart line"),
            MergeOutcome::Combined { quantity } => {
                tracing::info!(quantity, "Combined with existing cart line");
            }
        }
        Ok(cart)
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the line is absent, or
    /// [`CartError::Storage`] if saving fails.
    #[instrument(skip(self), fields(line = %key))]
    pub fn increase(&mut self, key: &LineKey) -> Result<Cart, CartError> {
        let mut cart = self.load();
        if !cart.increase(key) {
            return Err(CartError::LineNotFound(key.clone()));
        }
        self.commit(&cart, CartEventKind::Updated)?;
        Ok(cart)
    }

    /// Take one unit from a line, never below 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the line is absent, or
    /// [`CartError::Storage`] if saving fails.
    #[instrument(skip(self), fields(line = %key))]
    pub fn decrease(&mut self, key: &LineKey) -> Result<Cart, CartError> {
        let mut cart = self.load();
        if !cart.decrease(key) {
            return Err(CartError::LineNotFound(key.clone()));
        }
        self.commit(&cart, CartEventKind::Updated)?;
        Ok(cart)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the line is absent, or
    /// [`CartError::Storage`] if saving fails.
    #[instrument(skip(self), fields(line = %key))]
    pub fn remove(&mut self, key: &LineKey) -> Result<Cart, CartError> {
        let mut cart = self.load();
        if cart.remove(key).is_none() {
            return Err(CartError::LineNotFound(key.clone()));
        }
        self.commit(&cart, CartEventKind::Removed)?;
        tracing::info!(lines = cart.len(), "Removed cart line");
        Ok(cart)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if saving fails.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(&Cart::new(), CartEventKind::Cleared)?;
        tracing::info!("Cleared cart");
        Ok(())
    }

    /// Totals for the persisted cart.
    #[must_use]
    pub fn totals(&self, pricing: &Pricing, requested_points: i64) -> CartTotals {
        CartTotals::calculate(&self.load(), pricing, requested_points)
    }

    fn commit(&mut self, cart: &Cart, kind: CartEventKind) -> Result<(), StoreError> {
        if let Err(e) = self.save(cart) {
            tracing::warn!(error = %e, "Failed to save cart");
            return Err(e);
        }

        // No subscribers is fine; the send result only reports that.
        let _ = self.events.send(CartEvent {
            kind,
            item_count: cart.item_count(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::store::MemoryCartStore;
    use crate::cart::tests::line;
    use rust_decimal::Decimal;

    #[test]
    fn test_load_absent_is_empty() {
        let service = CartService::new(MemoryCartStore::new());
        assert!(service.load().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let service = CartService::new(MemoryCartStore::with_payload("{not a cart"));
        assert!(service.load().is_empty());

        let service = CartService::new(MemoryCartStore::with_payload(r#"{"id": 1}"#));
        assert!(service.load().is_empty());
    }

    #[test]
    fn test_add_persists_and_merges() {
        let mut service = CartService::new(MemoryCartStore::new());
        service.add(line("p1", "Navy", "M", 45, 2)).unwrap();
        let cart = service.add(line("p1", "Navy", "M", 45, 3)).unwrap();

        assert_eq!(cart.len(), 1);
        let reloaded = service.load();
        assert_eq!(reloaded, cart);
        let item = reloaded.items().first().unwrap();
        assert_eq!(item.quantity, 5);
        assert_eq!(item.total_price, Decimal::from(225));
    }

    #[test]
    fn test_add_over_malformed_payload_starts_fresh() {
        let mut service = CartService::new(MemoryCartStore::with_payload("garbage"));
        let cart = service.add(line("p1", "Navy", "M", 45, 1)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(service.load().len(), 1);
    }

    #[test]
    fn test_add_emits_event() {
        let mut service = CartService::new(MemoryCartStore::new());
        let mut events = service.subscribe();

        service.add(line("p1", "Navy", "M", 45, 2)).unwrap();
        service.add(line("p1", "Navy", "L", 45, 1)).unwrap();

        let first = events.try_recv().unwrap();
        assert_eq!(first.kind, CartEventKind::Added);
        assert_eq!(first.item_count, 2);
        assert_eq!(events.try_recv().unwrap().item_count, 3);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_add_without_subscribers_succeeds() {
        let mut service = CartService::new(MemoryCartStore::new());
        assert!(service.add(line("p1", "Navy", "M", 45, 1)).is_ok());
    }

    #[test]
    fn test_write_failure_keeps_stored_cart() {
        let store = MemoryCartStore::new().with_quota(300);
        let mut service = CartService::new(store);
        service.add(line("p1", "Navy", "M", 45, 1)).unwrap();
        let before = service.store().payload().map(str::to_owned);
        let mut events = service.subscribe();

        let err = service.add(line("p2", "White", "L", 64, 1)).unwrap_err();
        assert!(matches!(
            err,
            CartError::Storage(StoreError::QuotaExceeded { .. })
        ));
        assert_eq!(service.store().payload().map(str::to_owned), before);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_line_maintenance() {
        let mut service = CartService::new(MemoryCartStore::new());
        service.add(line("p1", "Navy", "M", 45, 1)).unwrap();
        let key = LineKey::new("p1", "Navy", "M");
        let mut events = service.subscribe();

        let cart = service.increase(&key).unwrap();
        assert_eq!(cart.get(&key).unwrap().quantity, 2);
        assert_eq!(events.try_recv().unwrap().kind, CartEventKind::Updated);

        let cart = service.decrease(&key).unwrap();
        assert_eq!(cart.get(&key).unwrap().quantity, 1);

        let cart = service.remove(&key).unwrap();
        assert!(cart.is_empty());
        assert!(service.load().is_empty());
    }

    #[test]
    fn test_missing_line() {
        let mut service = CartService::new(MemoryCartStore::new());
        let key = LineKey::new("p1", "Navy", "M");
        assert!(matches!(
            service.increase(&key),
            Err(CartError::LineNotFound(_))
        ));
        assert!(matches!(
            service.remove(&key),
            Err(CartError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut service = CartService::new(MemoryCartStore::new());
        service.add(line("p1", "Navy", "M", 45, 1)).unwrap();
        let mut events = service.subscribe();
        service.clear().unwrap();
        assert!(service.load().is_empty());
        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, CartEventKind::Cleared);
        assert_eq!(event.item_count, 0);
    }

    #[test]
    fn test_stored_duplicates_consolidate_on_load() {
        let payload = serde_json::to_string(&[
            line("p1", "Navy", "M", 45, 2),
            line("p1", "Navy", "M", 45, 1),
        ])
        .unwrap();
        let mut service = CartService::new(MemoryCartStore::with_payload(payload));
        assert_eq!(service.load().len(), 1);

        let cart = service.add(line("p1", "Navy", "M", 45, 3)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().unwrap().quantity, 6);
    }

    #[test]
    fn test_stored_zero_quantity_loads_empty() {
        let payload = serde_json::to_string(&[
            line("p1", "Navy", "M", 999, 0),
            line("p2", "White", "L", 64, 1),
        ])
        .unwrap();
        let service = CartService::new(MemoryCartStore::with_payload(payload));
        let cart = service.load();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }
}
