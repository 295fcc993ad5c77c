//! ShopHub CLI - browse the catalog, manage the cart and wishlist, check out.
//!
//! # Usage
//!
//! ```bash
//! # Browse and search
//! shophub products --category smartphones --sort price-low
//! shophub products --query laptop --min-price 500 --page 2
//! shophub product 1
//! shophub categories
//!
//! # Cart
//! shophub cart add 1 --quantity 2 --color Red --size L
//! shophub cart show --promo SAVE10
//! shophub cart update 1-Red-L-1717000000000 3
//!
//! # Checkout
//! shophub checkout --name "Asha Rao" --email asha@example.in \
//!     --phone 9876543210 --address "12 MG Road" --city Bengaluru --pincode 560001
//! ```
//!
//! Cart and wishlist persist in `SHOPHUB_DATA_DIR`. Promo codes apply to a
//! single invocation.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use shophub_core::{CheckoutForm, ProductId, SortKey};
use shophub_storefront::{AppError, Storefront, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::catalog::ListingArgs;

#[derive(Parser)]
#[command(name = "shophub")]
#[command(author, version, about = "ShopHub storefront in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with filters, sorting and pagination
    Products {
        /// Category slug
        #[arg(long)]
        category: Option<String>,

        /// Brand name
        #[arg(long)]
        brand: Option<String>,

        /// Lowest list price
        #[arg(long)]
        min_price: Option<Decimal>,

        /// Highest list price (default 2000)
        #[arg(long)]
        max_price: Option<Decimal>,

        /// Minimum rating
        #[arg(long)]
        rating: Option<f64>,

        /// Search title, description and brand
        #[arg(short, long)]
        query: Option<String>,

        /// relevance, price-low, price-high, rating or newest
        #[arg(short, long, default_value = "relevance")]
        sort: SortKey,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Products per page (default `SHOPHUB_PAGE_SIZE`)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one product and related products
    Product {
        /// Product id
        id: ProductId,
    },
    /// List products in a category
    Category {
        /// Category slug
        slug: String,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List known categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Place an order for the cart
    Checkout {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        pincode: String,

        /// Promo code to apply
        #[arg(long)]
        promo: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show {
        /// Promo code to apply
        #[arg(long)]
        promo: Option<String>,
    },
    /// Add a product
    Add {
        /// Product id
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(short, long, default_value = "Black")]
        color: String,

        #[arg(short, long, default_value = "M")]
        size: String,
    },
    /// Remove a line by its cart item id
    Remove { line: String },
    /// Set a line's quantity (minimum 1)
    Update { line: String, quantity: u32 },
    /// Try a promo code against the cart
    Promo { code: String },
    /// Show the cart without a promo code
    Unpromo,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Add or remove a product
    Toggle {
        /// Product id
        id: ProductId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
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
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
#[allow(clippy::print_stdout, clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    // Configuration comes first so Sentry can start before tracing
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shophub_storefront=info,shophub_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(AppError::from(e)),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            e.report();
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<String, AppError> {
    if let Commands::Categories = cli.command {
        return Ok(commands::catalog::categories());
    }

    let mut storefront = Storefront::open(config)?;

    match cli.command {
        Commands::Products {
            category,
            brand,
            min_price,
            max_price,
            rating,
            query,
            sort,
            page,
            limit,
        } => {
            let args = ListingArgs {
                category,
                brand,
                min_price,
                max_price,
                rating,
                query,
                sort,
                page,
                per_page: limit,
            };
            commands::catalog::products(&mut storefront, args).await
        }
        Commands::Product { id } => commands::catalog::product(&storefront, id).await,
        Commands::Category { slug, page } => {
            commands::catalog::category(&storefront, &slug, page).await
        }
        Commands::Categories => Ok(commands::catalog::categories()),
        Commands::Cart { action } => match action {
            CartAction::Show { promo } => commands::cart::show(&mut storefront, promo.as_deref()),
            CartAction::Add {
                id,
                quantity,
                color,
                size,
            } => commands::cart::add(&mut storefront, id, quantity, &color, &size).await,
            CartAction::Remove { line } => commands::cart::remove(&mut storefront, &line),
            CartAction::Update { line, quantity } => {
                commands::cart::update(&mut storefront, &line, quantity)
            }
            CartAction::Promo { code } => commands::cart::promo(&mut storefront, &code),
            CartAction::Unpromo => commands::cart::unpromo(&mut storefront),
            CartAction::Clear => commands::cart::clear(&mut storefront),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => Ok(commands::wishlist::show(&storefront)),
            WishlistAction::Toggle { id } => {
                commands::wishlist::toggle(&mut storefront, id).await
            }
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
            city,
            pincode,
            promo,
        } => {
            let form = CheckoutForm {
                name,
                email,
                phone,
                address,
                city,
                pincode,
            };
            commands::checkout::place_order(&mut storefront, &form, promo.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_listing_flags() {
        let cli = Cli::try_parse_from([
            "shophub", "products", "--category", "laptops", "--sort", "Price-High", "--max-price",
            "1500.50", "--page", "2",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Products {
            category,
            sort,
            max_price,
            page,
            ..
        } = cli.command
        else {
            panic!("expected products command");
        };
        assert_eq!(category.as_deref(), Some("laptops"));
        assert_eq!(sort, SortKey::PriceHigh);
        assert_eq!(max_price, Some(Decimal::new(150_050, 2)));
        assert_eq!(page, 2);
    }

    #[test]
    fn test_cart_add_defaults() {
        let cli = Cli::try_parse_from(["shophub", "cart", "add", "5"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Cart {
            action:
                CartAction::Add {
                    id,
                    quantity,
                    color,
                    size,
                },
        } = cli.command
        else {
            panic!("expected cart add");
        };
        assert_eq!(id, ProductId::new(5));
        assert_eq!(quantity, 1);
        assert_eq!(color, "Black");
        assert_eq!(size, "M");
    }

    #[test]
    fn test_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["shophub", "products", "--sort", "cheapest"]).is_err());
    }
}
