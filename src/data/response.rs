//! Decoders for BNM response bodies
//!
//! The site serves the rates as an XML `ValCurs` document. The wire structs
//! below mirror that document and are converted into [`Rates`] once parsed.

use serde::Deserialize;
use thiserror::Error;

use super::{Currency, Rates};

/// Errors that can occur when decoding a response body
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not a well-formed rates document
    #[error("unmarshal xml: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// The body is not valid rates JSON
    #[error("unmarshal json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Root element of the XML document
#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "@Date", default)]
    date: String,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "Valute", default)]
    valutes: Vec<Valute>,
}

/// One currency entry of the XML document
#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "@ID", default)]
    id: String,
    #[serde(rename = "NumCode")]
    num_code: u32,
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Nominal")]
    nominal: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value")]
    value: f64,
}

impl From<Valute> for Currency {
    fn from(v: Valute) -> Self {
        Currency {
            id: v.id,
            num_code: v.num_code,
            code: v.char_code,
            nominal: v.nominal,
            name: v.name,
            value: v.value,
        }
    }
}

impl From<ValCurs> for Rates {
    fn from(doc: ValCurs) -> Self {
        Rates {
            date: doc.date,
            name: doc.name,
            currencies: doc.valutes.into_iter().map(Currency::from).collect(),
        }
    }
}

/// Parses the XML document served by BNM
///
/// This is the default decoder of the client.
pub fn decode_xml(data: &[u8]) -> Result<Rates, DecodeError> {
    let doc: ValCurs = quick_xml::de::from_reader(data)?;
    Ok(doc.into())
}

/// Parses rates previously serialized as JSON
pub fn decode_json(data: &[u8]) -> Result<Rates, DecodeError> {
    Ok(serde_json::from_slice(data)?)
}
