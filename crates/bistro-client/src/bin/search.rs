//! # Restaurant Search
//!
//! Runs one search against the configured API and prints the result.
//!
//! ## Usage
//! ```bash
//! # Restaurants around Paris, any day
//! cargo run -p bistro-client --bin search -- --lat 48.85 --lng 2.35
//!
//! # Only those delivering on March 1st
//! cargo run -p bistro-client --bin search -- --lat 48.85 --lng 2.35 --date 2024-03-01
//!
//! # Against a local API, with request logs
//! BISTRO_API_URL=http://localhost:8000 RUST_LOG=debug cargo run -p bistro-client --bin search -- ...
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use bistro_client::{ClientConfig, HttpTransport, SearchWorkflow};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Bistro Restaurant Search");
    println!();
    println!("Usage: search --lat <LAT> --lng <LNG> [OPTIONS]");
    println!();
    println!("Options:");
    println!("      --lat <LAT>        Latitude of the delivery address");
    println!("      --lng <LNG>        Longitude of the delivery address");
    println!("  -d, --date <DATE>      Only restaurants open that day (YYYY-MM-DD)");
    println!("  -c, --config <PATH>    Config file (default: platform config dir)");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bistro=debug")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut date: Option<NaiveDate> = None;
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--lat" => {
                latitude = value.map(|v| v.parse::<f64>()).transpose()?;
                i += 1;
            }
            "--lng" => {
                longitude = value.map(|v| v.parse::<f64>()).transpose()?;
                i += 1;
            }
            "--date" | "-d" => {
                date = value
                    .map(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d"))
                    .transpose()?;
                i += 1;
            }
            "--config" | "-c" => {
                config_path = value.map(PathBuf::from);
                i += 1;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        print_usage();
        std::process::exit(2);
    };

    let config = ClientConfig::load(config_path)?;
    println!("API: {}", config.api.base_url);
    println!(
        "Searching around {},{}{}",
        latitude,
        longitude,
        date.map(|d| format!(" for {}", d)).unwrap_or_default()
    );
    println!();

    let workflow = SearchWorkflow::new(Arc::new(HttpTransport::new(&config.api)?));
    let restaurants = workflow.search(latitude, longitude, date).await?;

    for restaurant in &restaurants {
        let menu = match restaurant.menu().and_then(|m| m.iri()) {
            Some(iri) => iri.to_string(),
            None => "inline menu".to_string(),
        };
        let name = if restaurant.name.is_empty() {
            restaurant.id.as_str()
        } else {
            restaurant.name.as_str()
        };
        println!("  {:<32} {}", name, menu);
    }

    println!();
    println!("✓ {} restaurant(s)", restaurants.len());
    Ok(())
}
