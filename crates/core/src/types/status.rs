//! Status enums for variant selection.

use serde::{Deserialize, Serialize};

/// Stock level of one (color, size) variant as shown on the size board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// No color chosen yet, so per-variant stock is not known.
    #[default]
    Unknown,
    /// More than the low-stock threshold remains.
    InStock,
    /// Between one unit and the low-stock threshold remains.
    LowStock,
    /// Recorded in inventory with zero units, or not recorded at all.
    SoldOut,
}

impl StockStatus {
    /// Units at or below which a variant counts as low stock.
    pub const LOW_STOCK_THRESHOLD: u32 = 5;

    /// Classify a known stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::SoldOut,
            n if n <= Self::LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }

    /// Whether at least one unit can be bought.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        matches!(self, Self::InStock | Self::LowStock)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::InStock => write!(f, "in_stock"),
            Self::LowStock => write!(f, "low_stock"),
            Self::SoldOut => write!(f, "sold_out"),
        }
    }
}

/// Where a shopper is in the product-detail selection flow.
///
/// `NoColor -> ColorChosen -> ColorAndSizeChosen`, from which an add to
/// bag either succeeds (`Added`) or fails validation (`Invalid`, which
/// keeps color and size so the shopper can correct and retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    NoColor,
    ColorChosen,
    ColorAndSizeChosen,
    Invalid,
    Added,
}

impl std::fmt::Display for SelectionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoColor => write!(f, "no_color"),
            Self::ColorChosen => write!(f, "color_chosen"),
            Self::ColorAndSizeChosen => write!(f, "color_and_size_chosen"),
            Self::Invalid => write!(f, "invalid"),
            Self::Added => write!(f, "added"),
        }
    }
}
