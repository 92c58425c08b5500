//! Cart totals with loyalty-point redemption.
//!
//! One loyalty point is worth one unit of the display currency. Points
//! applied are capped by the shopper's balance and by the subtotal, so the
//! total never drops below the shipping charge.

use atelier_core::{CurrencyCode, Price};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::cart::Cart;

/// Checkout pricing inputs that do not come from the cart itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub currency: CurrencyCode,
    /// Flat shipping charge.
    pub shipping: Decimal,
    /// Loyalty-point balance of the shopper.
    pub points_available: u32,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            shipping: Decimal::ZERO,
            points_available: 0,
        }
    }
}

/// Order summary derived from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub currency: CurrencyCode,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub points_applied: u32,
    pub total: Decimal,
}

impl CartTotals {
    /// Derive totals for a cart.
    ///
    /// Requested points are clamped into `0..=min(points_available,
    /// subtotal)`; asking for more than that is not an error.
    #[must_use]
    pub fn calculate(cart: &Cart, pricing: &Pricing, requested_points: i64) -> Self {
        let subtotal = cart.subtotal();
        let points_applied = clamp_points(requested_points, pricing.points_available, subtotal);
        let total = subtotal
            .saturating_add(pricing.shipping)
            .saturating_sub(Decimal::from(points_applied));

        Self {
            currency: pricing.currency,
            subtotal,
            shipping: pricing.shipping,
            points_applied,
            total,
        }
    }

    #[must_use]
    pub const fn subtotal_price(&self) -> Price {
        Price::new(self.subtotal, self.currency)
    }

    #[must_use]
    pub const fn shipping_price(&self) -> Price {
        Price::new(self.shipping, self.currency)
    }

    /// Value of the applied points.
    #[must_use]
    pub fn discount_price(&self) -> Price {
        Price::new(Decimal::from(self.points_applied), self.currency)
    }

    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::new(self.total, self.currency)
    }
}

fn clamp_points(requested: i64, available: u32, subtotal: Decimal) -> u32 {
    let requested = u32::try_from(requested.max(0)).unwrap_or(u32::MAX);
    let redeemable = subtotal.floor().to_u32().unwrap_or(if subtotal.is_sign_negative() {
        0
    } else {
        u32::MAX
    });
    requested.min(available).min(redeemable)
}
