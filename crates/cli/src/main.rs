//! Atelier CLI - Size pickers, bag and order summary from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Size picker for a product in one color
//! atelier sizes -p product-1 -c "Navy Blue"
//!
//! # Add two Navy Blue M to the bag
//! atelier add -p product-1 -c "Navy Blue" -s M -q 2
//!
//! # Order summary, redeeming 50 points
//! atelier cart show --points 50
//! ```
//!
//! # Commands
//!
//! - `list` - List products with category/price filters and sorting
//! - `sizes` - Show size availability for a product
//! - `add` - Validate a selection and add it to the bag
//! - `cart` - Show, adjust or clear the bag
//! - `audit` - Report catalog data problems
//!
//! The cart file, currency, shipping and point balance come from
//! `ATELIER_*` environment variables (see `StorefrontConfig`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use atelier_storefront::{BrowseFilter, LineKey, PriceRange, SortOrder, StorefrontConfig, StorefrontError};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier storefront CLI tools")]
struct Cli {
    /// Product catalog JSON file
    #[arg(long, global = true, default_value = "data/catalog.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    List {
        /// Category to show (e.g. Shirts)
        #[arg(long)]
        category: Option<String>,

        /// Price bucket: under-25, 25-50, 50-75, 75-100, over-100
        #[arg(long)]
        price: Option<PriceRange>,

        /// Order: default, price-low, price-high, name
        #[arg(long, default_value = "default")]
        sort: SortOrder,
    },
    /// Show size availability for a product
    Sizes {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Color to check sizes for
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Add a product variant to the bag
    Add {
        #[command(flatten)]
        line: LineArgs,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Manage the bag
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Report catalog data problems
    Audit,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the bag and order summary
    Show {
        /// Loyalty points to redeem
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        points: i64,
    },
    /// Add one unit to a line
    Inc(LineArgs),
    /// Take one unit from a line
    Dec(LineArgs),
    /// Remove a line
    Remove(LineArgs),
    /// Empty the bag
    Clear,
}

/// Identifies one product variant.
#[derive(Args)]
struct LineArgs {
    /// Product ID
    #[arg(short, long)]
    product: String,

    /// Color name
    #[arg(short, long)]
    color: String,

    /// Size name
    #[arg(short, long)]
    size: String,
}

impl LineArgs {
    fn key(&self) -> LineKey {
        LineKey::new(self.product.as_str(), &self.color, &self.size)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        let correctable = e
            .downcast_ref::<StorefrontError>()
            .is_some_and(StorefrontError::is_user_correctable);
        if correctable {
            tracing::warn!("{e}");
            std::process::exit(2);
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::List {
            category,
            price,
            sort,
        } => {
            let config = StorefrontConfig::from_env()?;
            let filter = BrowseFilter { category, price };
            commands::catalog::list(&config, &cli.catalog, &filter, sort)?;
        }
        Commands::Sizes { product, color } => {
            commands::catalog::sizes(&cli.catalog, &product, color.as_deref())?;
        }
        Commands::Audit => commands::catalog::audit(&cli.catalog)?,
        Commands::Add { line, quantity } => {
            let config = StorefrontConfig::from_env()?;
            commands::cart::add(
                &config,
                &cli.catalog,
                &line.product,
                &line.color,
                &line.size,
                quantity,
            )?;
        }
        Commands::Cart { action } => {
            let config = StorefrontConfig::from_env()?;
            match action {
                CartAction::Show { points } => commands::cart::show(&config, points),
                CartAction::Inc(line) => commands::cart::increase(&config, &line.key())?,
                CartAction::Dec(line) => commands::cart::decrease(&config, &line.key())?,
                CartAction::Remove(line) => commands::cart::remove(&config, &line.key())?,
                CartAction::Clear => commands::cart::clear(&config)?,
            }
        }
    }
    Ok(())
}
