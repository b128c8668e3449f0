mod fixture;
mod offline;
mod seed;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pantry_core::barcode::DEFAULT_OPENFOODFACTS_URL;
use pantry_core::{lookup_barcode, ReqwestClient};
use serde::Deserialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Pantry CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the server (unauthenticated)
    Ping {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Rank fixture recipes against the fixture pantry
    Match {
        /// JSON file with `pantry` and `recipes` arrays
        #[arg(long)]
        fixture: PathBuf,
        /// Only use items from this pantry
        #[arg(long)]
        pantry_id: Option<Uuid>,
        /// Number of matches to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Log a suggestion email for the best match to this address
        #[arg(long)]
        notify: Option<String>,
    },
    /// Suggest a meal plan from the fixture
    Plan {
        #[arg(long)]
        fixture: PathBuf,
        #[arg(long, default_value_t = 3)]
        days: u32,
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
        /// First day of the plan (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Preferred cuisine or tag; repeatable
        #[arg(long = "prefer")]
        preferences: Vec<String>,
    },
    /// Look up a product by barcode
    Barcode {
        code: String,
        #[arg(long, default_value = DEFAULT_OPENFOODFACTS_URL)]
        base_url: String,
    },
    /// Create a user and load fixture recipes and pantry items into a server
    Seed {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        fixture: PathBuf,
        /// Username for the seed user
        #[arg(long)]
        username: String,
        /// Password for the seed user
        #[arg(long)]
        password: String,
    },
}

#[derive(Deserialize)]
struct PingResponse {
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ping { server } => {
            ping(&server).await?;
        }
        Commands::Match {
            fixture,
            pantry_id,
            limit,
            notify,
        } => {
            let fixture = fixture::Fixture::load(&fixture)?;
            offline::run_match(&fixture, pantry_id, limit, notify.as_deref()).await?;
        }
        Commands::Plan {
            fixture,
            days,
            seed,
            start,
            preferences,
        } => {
            let fixture = fixture::Fixture::load(&fixture)?;
            offline::run_plan(&fixture, days, seed, start, preferences).await?;
        }
        Commands::Barcode { code, base_url } => {
            barcode(&code, &base_url).await?;
        }
        Commands::Seed {
            server,
            fixture,
            username,
            password,
        } => {
            let fixture = fixture::Fixture::load(&fixture)?;
            seed::seed(&server, &fixture, &username, &password).await?;
        }
    }

    Ok(())
}

async fn ping(server: &str) -> Result<()> {
    let url = format!("{}/api/test/unauthed-ping", server.trim_end_matches('/'));
    let response: PingResponse = reqwest::get(&url)
        .await?
        .error_for_status()?
        .json()
        .await?;

    println!("{}", response.message);

    Ok(())
}

async fn barcode(code: &str, base_url: &str) -> Result<()> {
    let client = ReqwestClient::new()?;
    match lookup_barcode(&client, base_url, code).await? {
        Some(product) => println!("{}", serde_json::to_string_pretty(&product)?),
        None => println!("No product found for {}", code),
    }
    Ok(())
}
