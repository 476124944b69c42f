//! Luxemarket CLI - Inspect and edit the persisted shopping state.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! lm-cli cart add --product-id p1 --name "Silk scarf" --price 49.90 --stock 5
//!
//! # Show cart lines and the total
//! lm-cli cart show
//!
//! # Toggle a favorite
//! lm-cli favorites toggle p1
//!
//! # Filter a catalog export
//! lm-cli catalog search --listings products.json --query shirt --sort price-asc
//! ```
//!
//! # Commands
//!
//! - `cart` - Add, remove, set quantity, clear and show cart lines
//! - `favorites` - Add, remove, toggle and list favorite products
//! - `catalog` - Filter/sort a listings export and add listed products to the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use luxemarket_core::ProductId;
use luxemarket_store::{CartCandidate, CatalogQuery, ShopState, StoreError};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::CommandError;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "lm-cli")]
#[command(author, version, about = "Luxemarket shopping state tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage cart lines
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorite products
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Work with a catalog listings export
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        product_id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price (decimal, e.g. 49.90)
        #[arg(long)]
        price: String,

        /// Units in stock
        #[arg(long)]
        stock: u32,

        /// Image reference
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        product_id: String,
    },
    /// Set a product's quantity (zero or less removes it)
    SetQuantity {
        /// Product ID
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
    /// Show lines and totals
    Show,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Mark a product as favorite
    Add { product_id: String },
    /// Unmark a product
    Remove { product_id: String },
    /// Flip a product's favorite state
    Toggle { product_id: String },
    /// List favorite product IDs
    List,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Filter and sort listings
    Search {
        /// JSON file with an array of listings
        #[arg(long)]
        listings: PathBuf,

        /// Case-insensitive text matched against name and description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category ID, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Price bracket (`all`, `under-50`, `50-100`, `100-200`, `over-200`)
        #[arg(short, long, default_value = "all")]
        price: String,

        /// Sort key (`name`, `price-asc`, `price-desc`, `rating`, `newest`)
        #[arg(short, long, default_value = "name")]
        sort: String,
    },
    /// Add one unit of a listed product to the cart
    AddToCart {
        /// JSON file with an array of listings
        #[arg(long)]
        listings: PathBuf,

        /// Product ID
        product_id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lm_cli=info,luxemarket_store=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            sentry::capture_error(&e);
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), CommandError> {
    let currency = config.store.currency;
    let mut state = ShopState::load(config.store.file_store(), &config.store.snapshot_key);
    // Already logged by the load; only a save made by this command fails it.
    let _ = state.take_persist_error();

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                name,
                price,
                stock,
                image,
            } => {
                let candidate = CartCandidate {
                    product_id: ProductId::new(product_id),
                    name,
                    unit_price: commands::cart::parse_price(&price)?,
                    image_ref: image,
                    stock_limit: stock,
                };
                let outcome = state.add_to_cart(candidate);
                tracing::info!("Add to cart: {outcome:?}");
            }
            CartAction::Remove { product_id } => {
                state.remove_from_cart(&ProductId::new(product_id));
            }
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => {
                state.update_quantity(&ProductId::new(product_id), quantity);
            }
            CartAction::Clear => state.clear_cart(),
            CartAction::Show => {
                for line in commands::cart::summary(&state, currency) {
                    tracing::info!("{line}");
                }
                return Ok(());
            }
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::Add { product_id } => {
                state.add_to_favorites(ProductId::new(product_id));
            }
            FavoritesAction::Remove { product_id } => {
                state.remove_from_favorites(&ProductId::new(product_id));
            }
            FavoritesAction::Toggle { product_id } => {
                let now_favorite = state.toggle_favorite(ProductId::new(product_id));
                tracing::info!("Favorite: {now_favorite}");
            }
            FavoritesAction::List => {
                for id in commands::favorites::list(&state) {
                    tracing::info!("{id}");
                }
                return Ok(());
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Search {
                listings,
                query,
                category,
                price,
                sort,
            } => {
                let listings = commands::catalog::load_listings(&listings)?;
                let query = CatalogQuery::parse(&query, &category, &price, &sort)
                    .map_err(StoreError::from)?;
                let found = commands::catalog::search(&listings, &query, currency);
                tracing::info!("{} product(s)", found.len());
                for line in found {
                    tracing::info!("{line}");
                }
                return Ok(());
            }
            CatalogAction::AddToCart {
                listings,
                product_id,
            } => {
                let listings = commands::catalog::load_listings(&listings)?;
                let outcome = commands::catalog::add_to_cart(
                    &mut state,
                    &listings,
                    &ProductId::new(product_id),
                )?;
                tracing::info!("Add to cart: {outcome:?}");
            }
        },
    }

    if let Some(e) = state.last_persist_error() {
        return Err(CommandError::NotPersisted(e.to_string()));
    }

    for line in commands::cart::summary(&state, currency) {
        tracing::info!("{line}");
    }
    Ok(())
}
