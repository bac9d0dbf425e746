//! Dineview CLI - explore restaurant listings
//!
//! # Commands
//!
//! ```bash
//! dineview serve --data zomato_chennai.csv       # Start HTTP server (port 3000)
//! dineview normalize listings.csv -o rows.json   # Exploded rows as JSON
//! dineview options listings.csv --location Adyar # Next cascading choice
//! dineview explore listings.csv --location Adyar --cuisine "South Indian" \
//!     -r "Annapoorna" -r "Amma Mess"              # Summary + chart payloads
//! ```

use clap::{Parser, Subcommand};
use dineview::{server::start_server, Explorer, Selection, Settings};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dineview")]
#[command(about = "Filter, aggregate and chart restaurant listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Listing CSV (default: $DINEVIEW_DATA or zomato_chennai.csv)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Port to listen on (default: $DINEVIEW_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Normalize a listing CSV and output one JSON row per (cuisine, dish, feature)
    Normalize {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the next cascading choice: locations, cuisines or restaurants
    Options {
        /// Input CSV file
        input: PathBuf,

        /// Location to list cuisines for
        #[arg(short, long)]
        location: Option<String>,

        /// Cuisine to list restaurants for (requires --location)
        #[arg(short, long, requires = "location")]
        cuisine: Option<String>,
    },

    /// Aggregate selected restaurants and output the report as JSON
    Explore {
        /// Input CSV file
        input: PathBuf,

        #[arg(short, long)]
        location: String,

        #[arg(short, long)]
        cuisine: String,

        /// Restaurant name (repeatable)
        #[arg(short, long = "restaurant")]
        restaurants: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { data, port } => cmd_serve(data, port).await,

        Commands::Normalize { input, output } => cmd_normalize(&input, output.as_deref()),

        Commands::Options {
            input,
            location,
            cuisine,
        } => cmd_options(&input, location.as_deref(), cuisine.as_deref()),

        Commands::Explore {
            input,
            location,
            cuisine,
            restaurants,
            output,
        } => cmd_explore(
            &input,
            Selection::new(location, cuisine, restaurants),
            output.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(data: Option<PathBuf>, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env().with_overrides(data, port);
    let explorer = Explorer::from_path(&settings.data_path)?;
    start_server(explorer, settings.port).await?;
    Ok(())
}

fn cmd_normalize(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let explorer = Explorer::from_path(input)?;
    let json = serde_json::to_string_pretty(&explorer.table().rows)?;
    write_output(&json, output)
}

fn cmd_options(
    input: &Path,
    location: Option<&str>,
    cuisine: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let explorer = Explorer::from_path(input)?;

    let options = match (location, cuisine) {
        (Some(location), Some(cuisine)) => explorer.restaurants(location, cuisine),
        (Some(location), None) => explorer.cuisines(location),
        _ => explorer.locations(),
    };

    for option in options {
        println!("{}", option);
    }
    Ok(())
}

fn cmd_explore(
    input: &Path,
    selection: Selection,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let explorer = Explorer::from_path(input)?;
    let outcome = explorer.explore(&selection)?;
    let json = serde_json::to_string_pretty(&outcome)?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
