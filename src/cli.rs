//! Command-line interface parsing for bnmrates
//!
//! This module handles parsing of CLI arguments using clap and validating
//! them into a [`RunConfig`] the binary runs from.

use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;

use crate::data::{Lang, Query};

/// Default number of documents kept in memory
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified language is not recognized
    #[error("Invalid language: '{0}'. Valid languages: ro, ru, en")]
    InvalidLang(String),

    /// The specified date is not in YYYY-MM-DD form
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// bnmrates - Official exchange rates of the National Bank of Moldova
#[derive(Parser, Debug)]
#[command(name = "bnmrates")]
#[command(about = "Official exchange rates of the National Bank of Moldova")]
#[command(version)]
pub struct Cli {
    /// Day to fetch rates for (YYYY-MM-DD), repeatable; defaults to today
    ///
    /// Examples:
    ///   bnmrates --date 2025-01-01
    ///   bnmrates --date 2025-01-01 --date 2025-01-02 EUR
    #[arg(short, long = "date", value_name = "DATE")]
    pub dates: Vec<String>,

    /// Language of currency names: ro, ru, en
    #[arg(short, long, default_value = "en")]
    pub lang: String,

    /// Number of documents kept in the in-memory cache; 0 disables caching
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Request timeout in seconds (at least 1)
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Print a JSON array, one object per date, instead of tables
    #[arg(long)]
    pub json: bool,

    /// Log cache and request activity to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Currency codes to show (e.g. EUR USD); all when omitted
    #[arg(value_name = "CODE")]
    pub codes: Vec<String>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Documents to fetch, in order
    pub queries: Vec<Query>,
    /// Cache capacity, `None` when caching is disabled
    pub cache_capacity: Option<usize>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Whether to print JSON
    pub json: bool,
    /// Whether debug logging is on
    pub verbose: bool,
    /// Upper-cased currency codes to show; empty means all
    pub codes: Vec<String>,
}

/// Parses a language argument.
///
/// # Returns
/// * `Ok(Lang)` if the string is a known language code
/// * `Err(CliError::InvalidLang)` otherwise
pub fn parse_lang_arg(s: &str) -> Result<Lang, CliError> {
    s.parse().map_err(|_| CliError::InvalidLang(s.to_string()))
}

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::InvalidDate(s.to_string()))
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with one query per requested date (today if none)
    /// * `Err(CliError)` if the language or a date is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let lang = parse_lang_arg(&cli.lang)?;

        let queries = if cli.dates.is_empty() {
            vec![Query::today(lang)]
        } else {
            cli.dates
                .iter()
                .map(|d| parse_date_arg(d).map(|date| Query::new(date, lang)))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(RunConfig {
            queries,
            cache_capacity: (cli.cache_capacity > 0).then_some(cli.cache_capacity),
            timeout: Duration::from_secs(cli.timeout),
            json: cli.json,
            verbose: cli.verbose,
            codes: cli.codes.iter().map(|c| c.to_uppercase()).collect(),
        })
    }

    /// Default log filter when `RUST_LOG` is unset. Verbose output is
    /// limited to this crate so HTTP internals stay quiet.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,bnmrates=debug"
        } else {
            "warn"
        }
    }
}
