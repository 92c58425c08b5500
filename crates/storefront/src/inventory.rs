//! Inventory indexing and availability resolution.
//!
//! A product's inventory arrives as a flat list of `(color, size, stock)`
//! records. [`InventoryIndex`] nests it by color then size, and
//! [`Availability`] answers the two questions the product page asks:
//! can this size be picked, and how many are left.

use std::collections::BTreeMap;

use atelier_core::StockStatus;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, SizeOption};

/// One inventory row of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub color: String,
    pub size: String,
    pub stock: u32,
}

impl InventoryRecord {
    #[must_use]
    pub fn new(color: impl Into<String>, size: impl Into<String>, stock: u32) -> Self {
        Self {
            color: color.into(),
            size: size.into(),
            stock,
        }
    }
}

/// Stock counts keyed by color, then size.
///
/// Derived from a product's inventory list and never mutated afterwards;
/// rebuild it when the list changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryIndex {
    by_color: BTreeMap<String, BTreeMap<String, u32>>,
}

impl InventoryIndex {
    /// Index a list of inventory records.
    ///
    /// A repeated `(color, size)` pair overwrites the earlier record.
    #[must_use]
    pub fn build(records: &[InventoryRecord]) -> Self {
        let mut by_color: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

        for record in records {
            let sizes = by_color.entry(record.color.clone()).or_default();
            if let Some(previous) = sizes.insert(record.size.clone(), record.stock) {
                tracing::warn!(
                    color = %record.color,
                    size = %record.size,
                    previous,
                    stock = record.stock,
                    "Duplicate inventory record, keeping the last one"
                );
            }
        }

        tracing::debug!(
            records = records.len(),
            colors = by_color.len(),
            "Built inventory index"
        );

        Self { by_color }
    }

    /// Stock recorded for a variant, `None` if the pair was never recorded.
    #[must_use]
    pub fn stock(&self, color: &str, size: &str) -> Option<u32> {
        self.by_color.get(color)?.get(size).copied()
    }

    /// Whether any record exists for the color.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.by_color.contains_key(color)
    }

    /// Size -> stock for one color.
    #[must_use]
    pub fn sizes_for(&self, color: &str) -> Option<&BTreeMap<String, u32>> {
        self.by_color.get(color)
    }

    /// Colors with at least one record, in name order.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.by_color.keys().map(String::as_str)
    }

    /// Number of distinct `(color, size)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_color.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_color.is_empty()
    }
}

/// One row of the size picker for the current color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeSlot {
    pub name: String,
    /// Whether the size button is enabled.
    pub selectable: bool,
    /// Units left for the chosen color, 0 when no color is chosen.
    pub stock: u32,
    pub status: StockStatus,
}

/// Read-only availability queries over an index and a size catalog.
#[derive(Debug, Clone, Copy)]
pub struct Availability<'a> {
    index: &'a InventoryIndex,
    sizes: &'a [SizeOption],
}

impl<'a> Availability<'a> {
    #[must_use]
    pub const fn new(index: &'a InventoryIndex, sizes: &'a [SizeOption]) -> Self {
        Self { index, sizes }
    }

    /// Availability for a product using a prebuilt index.
    #[must_use]
    pub fn for_product(product: &'a Product, index: &'a InventoryIndex) -> Self {
        Self::new(index, &product.sizes)
    }

    /// Whether a size can be picked.
    ///
    /// With a color, the variant must have stock. Without one, per-color
    /// stock is unknown and the size catalog's static flag is used.
    #[must_use]
    pub fn is_size_available(&self, color: Option<&str>, size: &str) -> bool {
        match color {
            Some(color) => self.index.stock(color, size).is_some_and(|stock| stock > 0),
            None => self
                .sizes
                .iter()
                .find(|s| s.name == size)
                .is_some_and(|s| s.is_available),
        }
    }

    /// Units left for a variant, 0 when absent or no color is chosen.
    #[must_use]
    pub fn stock_for(&self, color: Option<&str>, size: &str) -> u32 {
        color
            .and_then(|color| self.index.stock(color, size))
            .unwrap_or(0)
    }

    /// Whether the variant appears in inventory at all, sold out or not.
    #[must_use]
    pub fn is_offered(&self, color: &str, size: &str) -> bool {
        self.index.stock(color, size).is_some()
    }

    /// Size picker rows for the current color, in size-catalog order.
    #[must_use]
    pub fn size_board(&self, color: Option<&str>) -> Vec<SizeSlot> {
        self.sizes
            .iter()
            .map(|size| {
                let stock = self.stock_for(color, &size.name);
                let status = match color {
                    Some(_) => StockStatus::from_stock(stock),
                    None => StockStatus::Unknown,
                };
                SizeSlot {
                    name: size.name.clone(),
                    selectable: self.is_size_available(color, &size.name),
                    stock,
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::polo;
    use proptest::prelude::*;

    fn navy_records() -> Vec<InventoryRecord> {
        vec![
            InventoryRecord::new("Navy", "M", 12),
            InventoryRecord::new("Navy", "L", 0),
        ]
    }

    #[test]
    fn test_build_empty() {
        let index = InventoryIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_build_nests_by_color() {
        let index = InventoryIndex::build(&navy_records());
        assert_eq!(index.stock("Navy", "M"), Some(12));
        assert_eq!(index.stock("Navy", "L"), Some(0));
        assert_eq!(index.stock("Navy", "S"), None);
        assert_eq!(index.stock("Red", "M"), None);
        assert!(index.has_color("Navy"));
        assert_eq!(index.sizes_for("Navy").unwrap().len(), 2);
        assert_eq!(index.colors().collect::<Vec<_>>(), vec!["Navy"]);
    }

    #[test]
    fn test_build_last_duplicate_wins() {
        let records = vec![
            InventoryRecord::new("Navy", "M", 12),
            InventoryRecord::new("Navy", "M", 4),
        ];
        let index = InventoryIndex::build(&records);
        assert_eq!(index.stock("Navy", "M"), Some(4));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_is_size_available_with_color() {
        let index = InventoryIndex::build(&navy_records());
        let availability = Availability::new(&index, &[]);
        assert!(availability.is_size_available(Some("Navy"), "M"));
        assert!(!availability.is_size_available(Some("Navy"), "L"));
        assert!(!availability.is_size_available(Some("Navy"), "XL"));
    }

    #[test]
    fn test_is_size_available_without_color_uses_catalog_flag() {
        let product = polo();
        let index = product.index();
        let availability = Availability::for_product(&product, &index);
        assert!(availability.is_size_available(None, "L"));
        assert!(!availability.is_size_available(None, "XXL"));
        assert!(!availability.is_size_available(None, "XS"));
    }

    #[test]
    fn test_stock_for() {
        let index = InventoryIndex::build(&navy_records());
        let availability = Availability::new(&index, &[]);
        assert_eq!(availability.stock_for(Some("Navy"), "M"), 12);
        assert_eq!(availability.stock_for(Some("Navy"), "XL"), 0);
        assert_eq!(availability.stock_for(None, "M"), 0);
    }

    #[test]
    fn test_is_offered_includes_sold_out() {
        let index = InventoryIndex::build(&navy_records());
        let availability = Availability::new(&index, &[]);
        assert!(availability.is_offered("Navy", "L"));
        assert!(!availability.is_offered("Navy", "XL"));
    }

    #[test]
    fn test_size_board_with_color() {
        let product = polo();
        let index = product.index();
        let board = Availability::for_product(&product, &index).size_board(Some("Navy Blue"));

        let names: Vec<_> = board.iter().map(|slot| slot.name.as_str()).collect();
        assert_eq!(names, vec!["M", "L", "XXL"]);

        let medium = board.first().unwrap();
        assert!(medium.selectable);
        assert_eq!(medium.stock, 12);
        assert_eq!(medium.status, StockStatus::InStock);

        let large = board.get(1).unwrap();
        assert!(!large.selectable);
        assert_eq!(large.status, StockStatus::SoldOut);
    }

    #[test]
    fn test_size_board_without_color() {
        let product = polo();
        let index = product.index();
        let board = Availability::for_product(&product, &index).size_board(None);
        assert!(board.iter().all(|slot| slot.status == StockStatus::Unknown));
        assert!(board.iter().all(|slot| slot.stock == 0));
        assert!(!board.last().unwrap().selectable);
    }

    fn unique_records() -> impl Strategy<Value = Vec<InventoryRecord>> {
        prop::collection::btree_map(("[A-E]", "[a-e]"), 0u32..50, 0..20).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|((color, size), stock)| InventoryRecord::new(color, size, stock))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn index_matches_every_record(records in unique_records()) {
            let index = InventoryIndex::build(&records);
            prop_assert_eq!(index.len(), records.len());
            for record in &records {
                prop_assert_eq!(index.stock(&record.color, &record.size), Some(record.stock));
            }
        }

        #[test]
        fn unknown_color_has_no_sizes(records in unique_records(), size in "[a-e]") {
            let index = InventoryIndex::build(&records);
            let availability = Availability::new(&index, &[]);
            // Generated colors are uppercase A-E, so "Z" never appears.
            prop_assert!(!availability.is_size_available(Some("Z"), &size));
            prop_assert_eq!(availability.stock_for(Some("Z"), &size), 0);
        }
    }
}
