//! Cart commands against the configured cart file.
//!
//! # Usage
//!
//! ```bash
//! atelier add -p product-1 -c "Navy Blue" -s M -q 2
//! atelier cart show --points 50
//! atelier cart inc -p product-1 -c "Navy Blue" -s M
//! atelier cart clear
//! ```

use std::path::Path;

use atelier_core::{Price, ProductId};
use atelier_storefront::cart::FileCartStore;
use atelier_storefront::{
    Cart, CartService, CartTotals, Catalog, LineKey, ProductPage, StorefrontConfig,
    StorefrontError,
};
use tracing::info;

fn service(config: &StorefrontConfig) -> CartService<FileCartStore> {
    CartService::new(config.cart_store())
}

/// Validate a selection and add it to the bag.
///
/// # Errors
///
/// Returns an error if the product is unknown, the selection is invalid or
/// the cart cannot be saved.
pub fn add(
    config: &StorefrontConfig,
    catalog_path: &Path,
    product_id: &str,
    color: &str,
    size: &str,
    quantity: u32,
) -> Result<(), StorefrontError> {
    let catalog = Catalog::load(catalog_path)?;
    let product = catalog.get(&ProductId::new(product_id))?;

    let mut page = ProductPage::with_color(product, color);
    page.select_size(size);
    page.set_quantity(quantity);

    let mut cart = service(config);
    let updated = page.add_to_bag(&mut cart)?;

    if let Some(message) = page.success() {
        info!("{message}");
    }
    print_cart(&updated, config, 0);
    Ok(())
}

/// Show the cart with its totals.
pub fn show(config: &StorefrontConfig, points: i64) {
    let cart = service(config).load();
    print_cart(&cart, config, points);
}

/// Add one unit to a line.
///
/// # Errors
///
/// Returns an error if the line is absent or the cart cannot be saved.
pub fn increase(config: &StorefrontConfig, key: &LineKey) -> Result<(), StorefrontError> {
    let cart = service(config).increase(key)?;
    print_cart(&cart, config, 0);
    Ok(())
}

/// Take one unit from a line, never below 1.
///
/// # Errors
///
/// Returns an error if the line is absent or the cart cannot be saved.
pub fn decrease(config: &StorefrontConfig, key: &LineKey) -> Result<(), StorefrontError> {
    let cart = service(config).decrease(key)?;
    print_cart(&cart, config, 0);
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the line is absent or the cart cannot be saved.
pub fn remove(config: &StorefrontConfig, key: &LineKey) -> Result<(), StorefrontError> {
    let cart = service(config).remove(key)?;
    print_cart(&cart, config, 0);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear(config: &StorefrontConfig) -> Result<(), StorefrontError> {
    service(config).clear()?;
    Ok(())
}

fn print_cart(cart: &Cart, config: &StorefrontConfig, points: i64) {
    if cart.is_empty() {
        info!("Your bag is empty");
        return;
    }

    let pricing = config.pricing();
    info!(currency = pricing.currency.code(), lines = cart.len(), "Bag");
    for item in cart.items() {
        info!(
            "  {} / {} / {}  x{}  {}",
            item.name,
            item.color_name,
            item.size,
            item.quantity,
            Price::new(item.total_price, pricing.currency).display()
        );
    }

    let totals = CartTotals::calculate(cart, &pricing, points);
    info!(items = cart.item_count(), "Subtotal {}", totals.subtotal_price().display());
    info!("Shipping {}", totals.shipping_price().display());
    if totals.points_applied > 0 {
        info!(points = totals.points_applied, "Points -{}", totals.discount_price().display());
    }
    info!("Total {}", totals.total_price().display());
}
