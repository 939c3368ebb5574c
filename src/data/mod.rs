//! Core data models for BNM exchange rates
//!
//! This module contains the query type used to address a rates document, the
//! decoded document itself, and the decoders that turn raw response bodies
//! into it.

pub mod query;
pub mod response;

pub use query::{Lang, Query, QueryError};
pub use response::{decode_json, decode_xml, DecodeError};

use serde::{Deserialize, Serialize};

/// A currency and its official rate against the Moldovan leu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// BNM internal identifier
    pub id: String,
    /// ISO 4217 numeric code
    pub num_code: u32,
    /// ISO 4217 three-letter code (e.g. "EUR")
    pub code: String,
    /// Number of units the rate is quoted for
    pub nominal: u32,
    /// Localized currency name
    pub name: String,
    /// Price in MDL of `nominal` units
    pub value: f64,
}

/// The official rates published for one day, in one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Date as published, `dd.mm.yyyy`
    pub date: String,
    /// Title of the document
    pub name: String,
    /// Every currency quoted that day
    pub currencies: Vec<Currency>,
}

impl Rates {
    /// Searches for a currency by its three-letter code
    pub fn find_by_code(&self, code: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.code == code)
    }
}
