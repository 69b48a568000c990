//! Galeria CLI - Catalog checks and cart inspection.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, newest first
//! galeria-cli catalog list
//!
//! # Check a catalog file before deploying it
//! galeria-cli catalog validate data/catalog.json
//!
//! # Show a visitor's saved cart
//! galeria-cli cart show 3f2a9c0e8b7d4e1f9a6b5c4d3e2f1a0b
//!
//! # Print the WhatsApp quote link for a saved cart
//! galeria-cli cart link 3f2a9c0e8b7d4e1f9a6b5c4d3e2f1a0b
//! ```
//!
//! # Commands
//!
//! - `catalog list` - List products
//! - `catalog validate` - Report catalog problems
//! - `cart show` - Show a saved cart
//! - `cart link` - Print a cart's checkout link
//! - `cart clear` - Empty a saved cart

#![cfg_attr(not(test), forbid(unsafe_code))]
// Listings and links are the commands' output
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "galeria-cli")]
#[command(author, version, about = "Galeria CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect saved carts
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, newest first
    List {
        /// Catalog file (default: `GALERIA_CATALOG_FILE` or `<data dir>/catalog.json`)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Report problems in a catalog file
    Validate {
        /// Catalog file to check
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the items in a saved cart
    Show {
        /// Cart key from the visitor's session
        key: String,

        /// Data directory (default: `GALERIA_DATA_DIR` or `data`)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the WhatsApp quote link for a saved cart
    Link {
        /// Cart key from the visitor's session
        key: String,

        /// Data directory (default: `GALERIA_DATA_DIR` or `data`)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Empty a saved cart
    Clear {
        /// Cart key from the visitor's session
        key: String,

        /// Data directory (default: `GALERIA_DATA_DIR` or `data`)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { file } => {
                let file = file.unwrap_or_else(commands::default_catalog_file);
                commands::catalog::list(&file).await?;
            }
            CatalogAction::Validate { file } => commands::catalog::validate(&file).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show { key, data_dir } => {
                let data_dir = data_dir.unwrap_or_else(commands::default_data_dir);
                commands::cart::show(&data_dir, &key)?;
            }
            CartAction::Link { key, data_dir } => {
                let data_dir = data_dir.unwrap_or_else(commands::default_data_dir);
                commands::cart::link(&data_dir, &key)?;
            }
            CartAction::Clear { key, data_dir } => {
                let data_dir = data_dir.unwrap_or_else(commands::default_data_dir);
                commands::cart::clear(&data_dir, &key)?;
            }
        },
    }
    Ok(())
}
