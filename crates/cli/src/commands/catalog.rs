//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Size picker for a product, before and after choosing a color
//! atelier sizes -p product-1
//! atelier sizes -p product-1 -c "Navy Blue"
//!
//! # Shirts between $25 and $50, cheapest first
//! atelier list --category shirts --price 25-50 --sort price-low
//!
//! # Report data-quality problems in the catalog
//! atelier audit
//! ```

use std::path::Path;

use atelier_core::{Price, ProductId};
use atelier_storefront::catalog::Catalog;
use atelier_storefront::{Availability, BrowseFilter, SortOrder, StorefrontConfig, StorefrontError};
use tracing::{info, warn};

/// List products matching a filter.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn list(
    config: &StorefrontConfig,
    catalog_path: &Path,
    filter: &BrowseFilter,
    order: SortOrder,
) -> Result<(), StorefrontError> {
    let catalog = Catalog::load(catalog_path)?;
    let listed = catalog.browse(filter, order);

    info!(
        shown = listed.len(),
        total = catalog.len(),
        categories = ?catalog.categories(),
        "Products"
    );
    for product in listed {
        info!(
            "  {:<12} {:<28} {:<12} {}",
            product.id.as_str(),
            product.name,
            product.category,
            Price::new(product.price, config.currency).display()
        );
    }
    Ok(())
}

/// Show the size picker for a product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the product is
/// unknown.
pub fn sizes(catalog_path: &Path, product_id: &str, color: Option<&str>) -> Result<(), StorefrontError> {
    let catalog = Catalog::load(catalog_path)?;
    let product = catalog.get(&ProductId::new(product_id))?;
    let index = product.index();
    let availability = Availability::for_product(product, &index);

    info!(product = %product.name, color = color.unwrap_or("(none)"), "Sizes");
    for slot in availability.size_board(color) {
        info!(
            "  {:<5} {:<10} stock={:<4} {}",
            slot.name,
            slot.status.to_string(),
            slot.stock,
            if slot.selectable { "selectable" } else { "disabled" }
        );
    }

    if let Some(color) = color {
        if product.color(color).is_none() {
            warn!(%color, "Color is not in the product's color catalog");
        }
        let images = product.display_images(Some(color));
        info!(images = images.len(), "Gallery");
    }

    Ok(())
}

/// Audit every product in the catalog.
///
/// Issues are reported as warnings; the command only fails if the catalog
/// cannot be loaded.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn audit(catalog_path: &Path) -> Result<(), StorefrontError> {
    let catalog = Catalog::load(catalog_path)?;

    let mut total = 0usize;
    for product in catalog.products() {
        let issues = product.audit();
        total += issues.len();
        for issue in issues {
            warn!(product = %product.id, "{issue}");
        }
    }

    info!(products = catalog.len(), issues = total, "Audit complete");
    Ok(())
}
