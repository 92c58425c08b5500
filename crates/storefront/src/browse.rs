//! Catalog listing with category and price filters.
//!
//! Price buckets share their edges: a $50 product appears under both
//! `25-50` and `50-75`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::{Catalog, Product};

/// An unrecognised filter or sort name.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseBrowseError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Price bucket for the listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    /// Strictly below 25.
    Under25,
    /// 25 to 50 inclusive.
    From25To50,
    /// 50 to 75 inclusive.
    From50To75,
    /// 75 to 100 inclusive.
    From75To100,
    /// Strictly above 100.
    Over100,
}

impl PriceRange {
    const NAMES: &'static str = "under-25, 25-50, 50-75, 75-100, over-100";

    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        let within = |low: i64, high: i64| price >= Decimal::from(low) && price <= Decimal::from(high);
        match self {
            Self::Under25 => price < Decimal::from(25),
            Self::From25To50 => within(25, 50),
            Self::From50To75 => within(50, 75),
            Self::From75To100 => within(75, 100),
            Self::Over100 => price > Decimal::from(100),
        }
    }
}

impl FromStr for PriceRange {
    type Err = ParseBrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under-25" => Ok(Self::Under25),
            "25-50" => Ok(Self::From25To50),
            "50-75" => Ok(Self::From50To75),
            "75-100" => Ok(Self::From75To100),
            "over-100" => Ok(Self::Over100),
            _ => Err(ParseBrowseError {
                kind: "price range",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Under25 => "under-25",
            Self::From25To50 => "25-50",
            Self::From50To75 => "50-75",
            Self::From75To100 => "75-100",
            Self::Over100 => "over-100",
        })
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog source order.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    /// Case-insensitive by product name.
    Name,
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => Ordering::Equal,
            Self::PriceLowToHigh => a.price.cmp(&b.price),
            Self::PriceHighToLow => b.price.cmp(&a.price),
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseBrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" | "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLowToHigh),
            "price-high" => Ok(Self::PriceHighToLow),
            "name" => Ok(Self::Name),
            _ => Err(ParseBrowseError {
                kind: "sort order",
                value: s.to_string(),
                expected: "default, price-low, price-high, name",
            }),
        }
    }
}

/// Which products to list. The default lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseFilter {
    /// Category name, compared case-insensitively.
    pub category: Option<String>,
    pub price: Option<PriceRange>,
}

impl BrowseFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.category.eq_ignore_ascii_case(category));
        let price_ok = self.price.is_none_or(|range| range.contains(product.price));
        category_ok && price_ok
    }
}

impl Catalog {
    /// Products passing `filter`, in `order`.
    ///
    /// Sorting is stable, so ties keep catalog order.
    #[must_use]
    pub fn browse(&self, filter: &BrowseFilter, order: SortOrder) -> Vec<&Product> {
        let mut listed: Vec<&Product> = self
            .products()
            .iter()
            .filter(|product| filter.matches(product))
            .collect();
        listed.sort_by(|a, b| order.compare(a, b));
        listed
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in self.products() {
            let category = product.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}
