//! Product catalog boundary types.
//!
//! Product data enters the storefront as JSON from an external product
//! source. These types mirror that contract (`_id`, camelCase keys) and
//! are the only place raw product data is parsed. Missing catalogs
//! (colors, sizes, images, inventory) deserialize as empty rather than
//! failing, so a sparse product still renders.

use std::collections::HashSet;
use std::path::Path;

use atelier_core::{ColorHex, ColorHexError, ColorId, ProductId, SizeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inventory::{InventoryIndex, InventoryRecord};

/// Errors raised while loading product data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog payload is not valid product JSON.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product carries a negative unit price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// No product with the requested ID exists.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
}

// =============================================================================
// Product Types
// =============================================================================

/// A color a product is offered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    #[serde(rename = "_id")]
    pub id: ColorId,
    /// Display name, also the key used by inventory records.
    pub name: String,
    /// Raw hex code as supplied by the product source.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub is_available: bool,
}

impl ColorOption {
    /// Parse the raw code into a [`ColorHex`].
    ///
    /// # Errors
    ///
    /// Returns the parse failure when the product source sent a bad code.
    pub fn hex(&self) -> Result<ColorHex, ColorHexError> {
        ColorHex::parse(&self.code)
    }
}

/// A size in the product's size catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeOption {
    #[serde(rename = "_id")]
    pub id: SizeId,
    pub name: String,
    /// Whether the size is ever offered, independent of color.
    #[serde(default)]
    pub is_available: bool,
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// Images specific to one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorImages {
    pub color: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// Vendor contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
}

/// The vendor selling a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vendor {
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub total_reviews: u32,
    pub location: String,
    pub established_year: Option<u16>,
    pub specialties: Vec<String>,
    pub certifications: Vec<String>,
    pub shipping_policy: String,
    pub return_policy: String,
    pub contact_info: ContactInfo,
}

/// A product as supplied by the product source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    #[serde(default)]
    pub default_images: Vec<ProductImage>,
    #[serde(default)]
    pub color_images: Vec<ColorImages>,
    #[serde(default)]
    pub inventory: Vec<InventoryRecord>,
    #[serde(default)]
    pub vendor: Option<Vendor>,
}

impl Product {
    /// Look up a color option by name.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<&ColorOption> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// Look up a size option by name.
    #[must_use]
    pub fn size(&self, name: &str) -> Option<&SizeOption> {
        self.sizes.iter().find(|s| s.name == name)
    }

    /// Hex code for a color, falling back to black for unknown colors or
    /// unparseable codes.
    #[must_use]
    pub fn color_hex(&self, name: &str) -> ColorHex {
        self.color(name)
            .and_then(|c| c.hex().ok())
            .unwrap_or_default()
    }

    /// Build the color -> size -> stock index for this product.
    #[must_use]
    pub fn index(&self) -> InventoryIndex {
        InventoryIndex::build(&self.inventory)
    }

    /// Images to show for the current color.
    ///
    /// Color-specific images win when a color is chosen and has any;
    /// otherwise the default images are used. May be empty.
    #[must_use]
    pub fn display_images(&self, color: Option<&str>) -> &[ProductImage] {
        color
            .and_then(|name| self.color_images.iter().find(|ci| ci.color == name))
            .map(|ci| ci.images.as_slice())
            .filter(|images| !images.is_empty())
            .unwrap_or(&self.default_images)
    }

    /// First display image for the current color, if any.
    #[must_use]
    pub fn primary_image(&self, color: Option<&str>) -> Option<&ProductImage> {
        self.display_images(color).first()
    }

    /// Report data-quality problems without rejecting the product.
    #[must_use]
    pub fn audit(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for color in &self.colors {
            if let Err(error) = color.hex() {
                issues.push(CatalogIssue::InvalidColorCode {
                    color: color.name.clone(),
                    error,
                });
            }
        }

        let mut seen = HashSet::new();
        let mut unknown_colors = HashSet::new();
        let mut unknown_sizes = HashSet::new();
        for record in &self.inventory {
            if !seen.insert((record.color.as_str(), record.size.as_str())) {
                issues.push(CatalogIssue::DuplicateInventory {
                    color: record.color.clone(),
                    size: record.size.clone(),
                });
            }
            if self.color(&record.color).is_none() && unknown_colors.insert(&record.color) {
                issues.push(CatalogIssue::UnknownInventoryColor(record.color.clone()));
            }
            if self.size(&record.size).is_none() && unknown_sizes.insert(&record.size) {
                issues.push(CatalogIssue::UnknownInventorySize(record.size.clone()));
            }
        }

        issues
    }
}

/// A data-quality problem found by [`Product::audit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogIssue {
    #[error("duplicate inventory record for {color}/{size}; last record wins")]
    DuplicateInventory { color: String, size: String },

    #[error("inventory references color {0:?} missing from the color catalog")]
    UnknownInventoryColor(String),

    #[error("inventory references size {0:?} missing from the size catalog")]
    UnknownInventorySize(String),

    #[error("color {color:?} has an invalid code: {error}")]
    InvalidColorCode { color: String, error: ColorHexError },
}

// =============================================================================
// Catalog
// =============================================================================

/// An in-memory set of products loaded from the product source.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from already-parsed products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NegativePrice`] if any product has a
    /// negative unit price.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if let Some(bad) = products.iter().find(|p| p.price.is_sign_negative()) {
            return Err(CatalogError::NegativePrice(bad.id.clone()));
        }
        Ok(Self { products })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed or a price is negative.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a JSON array of products from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Find a product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product matches.
    pub fn get(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }

    /// All products, in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const POLO_JSON: &str = r##"{
        "_id": "product-1",
        "name": "Loro Piana Polo Shirt",
        "price": 45,
        "material": "100% Premium Cotton",
        "category": "Shirts",
        "description": "Premium polo shirt.",
        "colors": [
            { "_id": "color-1", "name": "Navy Blue", "code": "#1e3a8a", "isAvailable": true },
            { "_id": "color-2", "name": "White", "code": "#ffffff", "isAvailable": true }
        ],
        "sizes": [
            { "_id": "size-1", "name": "M", "isAvailable": true },
            { "_id": "size-2", "name": "L", "isAvailable": true },
            { "_id": "size-3", "name": "XXL", "isAvailable": false }
        ],
        "defaultImages": [ { "url": "/images/product-polo.png", "alt": "Front" } ],
        "colorImages": [
            { "color": "Navy Blue", "images": [ { "url": "/images/navy.png", "alt": "Navy" } ] },
            { "color": "White", "images": [] }
        ],
        "inventory": [
            { "color": "Navy Blue", "size": "M", "stock": 12 },
            { "color": "Navy Blue", "size": "L", "stock": 0 },
            { "color": "White", "size": "M", "stock": 3 }
        ],
        "vendor": {
            "name": "Premium Clothing Co.",
            "rating": 4.8,
            "totalReviews": 1247,
            "establishedYear": 1985,
            "contactInfo": { "email": "support@premiumclothing.com" }
        }
    }"##;

    pub(crate) fn polo() -> Product {
        serde_json::from_str(POLO_JSON).unwrap()
    }

    #[test]
    fn test_parse_product_contract() {
        let product = polo();
        assert_eq!(product.id.as_str(), "product-1");
        assert_eq!(product.price, Decimal::from(45));
        assert_eq!(product.colors.len(), 2);
        assert_eq!(product.inventory.len(), 3);
        let vendor = product.vendor.unwrap();
        assert_eq!(vendor.total_reviews, 1247);
        assert_eq!(vendor.established_year, Some(1985));
        assert_eq!(vendor.contact_info.email, "support@premiumclothing.com");
    }

    #[test]
    fn test_sparse_product_defaults_to_empty() {
        let product: Product =
            serde_json::from_str(r#"{ "_id": "p", "name": "Bare", "price": 10 }"#).unwrap();
        assert!(product.colors.is_empty());
        assert!(product.inventory.is_empty());
        assert!(product.display_images(Some("Navy Blue")).is_empty());
        assert!(product.vendor.is_none());
    }

    #[test]
    fn test_display_images_prefers_color() {
        let product = polo();
        let images = product.display_images(Some("Navy Blue"));
        assert_eq!(images.first().unwrap().url, "/images/navy.png");
    }

    #[test]
    fn test_display_images_falls_back_to_defaults() {
        let product = polo();
        // White has an empty image list, Gray has none at all.
        assert_eq!(
            product.primary_image(Some("White")).unwrap().url,
            "/images/product-polo.png"
        );
        assert_eq!(
            product.primary_image(Some("Gray")).unwrap().url,
            "/images/product-polo.png"
        );
        assert_eq!(
            product.primary_image(None).unwrap().url,
            "/images/product-polo.png"
        );
    }

    #[test]
    fn test_color_hex_fallback() {
        let mut product = polo();
        assert_eq!(product.color_hex("Navy Blue").as_str(), "#1e3a8a");
        assert_eq!(product.color_hex("Gray").as_str(), "#000000");

        product.colors.first_mut().unwrap().code = "navy".to_string();
        assert_eq!(product.color_hex("Navy Blue").as_str(), "#000000");
    }

    #[test]
    fn test_audit_clean_product() {
        assert!(polo().audit().is_empty());
    }

    #[test]
    fn test_audit_reports_issues() {
        let mut product = polo();
        product.inventory.push(InventoryRecord::new("Navy Blue", "M", 4));
        product.inventory.push(InventoryRecord::new("Teal", "M", 1));
        product.inventory.push(InventoryRecord::new("Teal", "S", 1));
        product.colors.last_mut().unwrap().code = "#zzz".to_string();

        let issues = product.audit();
        assert!(issues.contains(&CatalogIssue::DuplicateInventory {
            color: "Navy Blue".to_string(),
            size: "M".to_string(),
        }));
        assert!(issues.contains(&CatalogIssue::UnknownInventoryColor("Teal".to_string())));
        assert!(issues.contains(&CatalogIssue::UnknownInventorySize("S".to_string())));
        assert!(
            issues
                .iter()
                .any(|i| matches!(i, CatalogIssue::InvalidColorCode { color, .. } if color == "White"))
        );
        // Teal is reported once even though it appears twice.
        assert_eq!(
            issues
                .iter()
                .filter(|i| matches!(i, CatalogIssue::UnknownInventoryColor(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_catalog_get() {
        let catalog = Catalog::from_json(&format!("[{POLO_JSON}]")).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(&ProductId::new("product-1")).is_ok());
        assert!(matches!(
            catalog.get(&ProductId::new("missing")),
            Err(CatalogError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_negative_price() {
        let json = r#"[{ "_id": "p", "name": "Refund", "price": -1 }]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_malformed() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(CatalogError::Parse(_))
        ));
        // Negative stock does not fit the stock type.
        let json = r#"[{ "_id": "p", "name": "x", "price": 1,
            "inventory": [{ "color": "Red", "size": "M", "stock": -2 }] }]"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Parse(_))));
    }
}
