//! iShop CLI - browse the catalog, manage the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! ishop products list
//! ishop products search "چای"
//!
//! # Cart
//! ishop cart add 12
//! ishop cart set 12 3
//! ishop cart show --fa
//!
//! # Account and checkout
//! ishop login -u 09123456789 -p '...'
//! ishop checkout
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the persisted cart
//! - `products`, `banners` - Read the catalog
//! - `login`, `register`, `logout`, `whoami`, `orders` - Account
//! - `checkout` - Submit the cart as an order
//! - `health` - Backend health report

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use ishop_storefront::{AppState, StorefrontConfig};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ishop")]
#[command(author, version, about = "iShop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// List homepage banners
    Banners,
    /// Sign in with a username, email or mobile number
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "ISHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Email address or mobile number
        #[arg(short, long)]
        contact: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "ISHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List your orders
    Orders {
        /// Show amounts and statuses in Persian
        #[arg(long)]
        fa: bool,
    },
    /// Submit the cart as an order
    Checkout,
    /// Check that the backend is reachable
    Health,
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart contents and subtotal
    Show {
        /// Persian digits and Toman labels
        #[arg(long)]
        fa: bool,
    },
    /// Add one unit of a product
    Add { product_id: i64 },
    /// Remove a product line
    Remove { product_id: i64 },
    /// Set a line's quantity; values below 1 become 1
    Set {
        product_id: i64,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List {
        #[arg(long)]
        fa: bool,
    },
    /// Search products by name
    Search {
        query: String,

        #[arg(short, long, default_value_t = ishop_storefront::api::DEFAULT_SEARCH_LIMIT)]
        limit: u32,

        #[arg(long)]
        fa: bool,
    },
    /// Show one product
    Show {
        product_id: i64,

        #[arg(long)]
        fa: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ishop_cli=info,ishop_storefront=info,ishop_core=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false),
        )
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = AppState::new(config)?;

    let outcome = match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { fa } => {
                commands::cart::show(&state, fa);
                Ok(())
            }
            CartAction::Add { product_id } => commands::cart::add(&mut state, product_id).await,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&mut state, product_id);
                Ok(())
            }
            CartAction::Set {
                product_id,
                quantity,
            } => {
                commands::cart::set(&mut state, product_id, quantity);
                Ok(())
            }
            CartAction::Clear => {
                commands::cart::clear(&mut state);
                Ok(())
            }
        },
        Commands::Products { action } => match action {
            ProductsAction::List { fa } => commands::catalog::list(&state, fa).await,
            ProductsAction::Search { query, limit, fa } => {
                commands::catalog::search(&state, &query, limit, fa).await
            }
            ProductsAction::Show { product_id, fa } => {
                commands::catalog::show(&state, product_id, fa).await
            }
        },
        Commands::Banners => commands::catalog::banners(&state).await,
        Commands::Login { username, password } => {
            commands::account::login(&mut state, &username, &password).await
        }
        Commands::Register {
            first_name,
            last_name,
            contact,
            username,
            password,
        } => {
            commands::account::register(
                &mut state,
                commands::account::RegisterForm {
                    first_name,
                    last_name,
                    contact,
                    username,
                    password,
                },
            )
            .await
        }
        Commands::Logout => {
            commands::account::logout(&mut state);
            Ok(())
        }
        Commands::Whoami => commands::account::whoami(&mut state).await,
        Commands::Orders { fa } => commands::account::orders(&mut state, fa).await,
        Commands::Checkout => commands::checkout::run(&mut state).await,
        Commands::Health => commands::catalog::health(&state).await,
    };

    outcome.map_err(|e| {
        e.report();
        e.user_message().into()
    })
}
