mod catalog;
mod routing;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "foodcart-cli")]
#[command(about = "Foodcart order routing command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Upsert restaurants and products from JSON seed files
    Seed {
        /// Path to the restaurants seed file
        #[arg(long, default_value = "./data/restaurants.json")]
        restaurants_path: PathBuf,
        /// Path to the products seed file
        #[arg(long, default_value = "./data/products.json")]
        products_path: PathBuf,
        /// Mark every product available in every restaurant
        #[arg(long)]
        set_available: bool,
    },
    /// Resolve addresses to coordinates through the geocode cache
    Geocode {
        /// Addresses to resolve, matched by exact text
        #[arg(required = true)]
        addresses: Vec<String>,
        /// Use a throwaway in-memory cache instead of the `places` table
        #[arg(long)]
        no_store: bool,
    },
    /// Print pending orders with candidate restaurants ranked by distance, as JSON
    Rank {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = foodcart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Migrate) => catalog::run_migrate(&config).await?,
        Some(Commands::Seed {
            restaurants_path,
            products_path,
            set_available,
        }) => {
            catalog::run_seed(&config, &restaurants_path, &products_path, set_available).await?;
        }
        Some(Commands::Geocode {
            addresses,
            no_store,
        }) => routing::run_geocode(&config, &addresses, no_store).await?,
        Some(Commands::Rank { pretty }) => routing::run_rank(&config, pretty).await?,
        None => println!("foodcart-cli: no command given; see --help"),
    }

    Ok(())
}
