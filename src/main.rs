//! bnmrates - Official exchange rates of the National Bank of Moldova
//!
//! Fetches the rates for one or more days and prints them as a table or JSON.
//! Documents are kept in an in-memory LRU cache for the lifetime of the run,
//! so repeated dates are downloaded once.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bnmrates::cli::{Cli, RunConfig};
use bnmrates::data::decode_xml;
use bnmrates::fetch::HttpFetcher;
use bnmrates::output::{render_json, render_table};
use bnmrates::{BoundedCache, Client, Rates};

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(config: &RunConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the client from the run configuration
fn build_client(config: &RunConfig) -> Result<Client, Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new().with_timeout(config.timeout);

    let mut client = Client::from_parts(fetcher.into_fetch_fn(), decode_xml)
        .with_notifier(|err| warn!(error = %err, "cache write failed"));

    if let Some(capacity) = config.cache_capacity {
        client = client.with_cache(Arc::new(BoundedCache::<Rates>::new(capacity)?));
    }

    Ok(client)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    init_tracing(&config);

    let client = build_client(&config)?;

    let mut failed = false;
    let mut documents = Vec::new();

    for query in &config.queries {
        match client.fetch(query).await {
            Ok(rates) => documents.push(rates),
            Err(e) => {
                eprintln!("Error: {}: {}", query.date, e);
                failed = true;
            }
        }
    }

    if config.json {
        println!("{}", render_json(&documents, &config.codes)?);
    } else {
        for rates in &documents {
            println!("{}", render_table(rates, &config.codes));
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
