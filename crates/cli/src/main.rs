//! RocketShoes CLI - Drive a local cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the saved cart
//! rs-cli --catalog-url http://localhost:3333 show
//!
//! # Add one unit of product 1
//! rs-cli add 1
//!
//! # Set product 1 to 3 units
//! rs-cli update 1 3
//!
//! # Remove product 1, or empty the cart
//! rs-cli remove 1
//! rs-cli clear
//! ```
//!
//! `CATALOG_BASE_URL`, `CATALOG_API_TOKEN` and `CART_STORAGE_DIR` are read
//! from the environment (or `.env`) when the flags are not given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Catalog service base URL
    #[arg(long, env = "CATALOG_BASE_URL")]
    catalog_url: String,

    /// Catalog bearer token
    #[arg(long, env = "CATALOG_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Directory holding the saved cart
    #[arg(long, env = "CART_STORAGE_DIR", default_value = ".rocketshoes")]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the saved cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: i32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: i32,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: i32,

        /// New quantity (values below 1 are ignored)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env fallbacks
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CommandError> {
    let mut session =
        commands::cart::CartSession::open(&cli.catalog_url, cli.api_token, &cli.storage_dir)?;

    match cli.command {
        Commands::Show => session.show(),
        Commands::Add { product_id } => session.add(product_id).await,
        Commands::Remove { product_id } => session.remove(product_id),
        Commands::Update { product_id, amount } => session.update(product_id, amount).await,
        Commands::Clear => session.clear(),
    }
}
