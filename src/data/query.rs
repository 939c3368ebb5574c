//! Rate queries: which day and which site language to ask BNM for
//!
//! A query identifies exactly one published document, so its [`Query::id`]
//! doubles as the cache key.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL of the National Bank of Moldova website
const BNM_BASE_URL: &str = "https://www.bnm.md";

/// Date format used by the BNM API, both in requests and in responses
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Errors that can occur when building a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// The language code is not one the site publishes in
    #[error("unknown language: '{0}'. Valid languages: ro, ru, en")]
    UnknownLang(String),
}

/// Languages the rates document is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ro,
    Ru,
    #[default]
    En,
}

impl Lang {
    /// Two-letter code used in the request path
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ro => "ro",
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ro" => Ok(Lang::Ro),
            "ru" => Ok(Lang::Ru),
            "en" => Ok(Lang::En),
            _ => Err(QueryError::UnknownLang(s.to_string())),
        }
    }
}

/// Identifies one official exchange rate document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    /// Day the rates apply to
    pub date: NaiveDate,
    /// Language of currency names in the document
    pub lang: Lang,
}

impl Query {
    pub fn new(date: NaiveDate, lang: Lang) -> Self {
        Self { date, lang }
    }

    /// Query for today's rates in the local timezone
    pub fn today(lang: Lang) -> Self {
        Self::new(Local::now().date_naive(), lang)
    }

    /// Date formatted the way the API expects it (`dd.mm.yyyy`)
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Stable identifier, used as the cache key
    pub fn id(&self) -> String {
        format!("{}_{}", self.lang, self.date_string())
    }

    /// URL of the XML document for this query
    pub fn request_url(&self) -> String {
        format!(
            "{}/{}/official_exchange_rates?get_xml=1&date={}",
            BNM_BASE_URL,
            self.lang,
            self.date_string()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specific_query() -> Query {
        Query::new(NaiveDate::from_ymd_opt(2017, 8, 5).unwrap(), Lang::Ro)
    }

    #[test]
    fn test_date_string() {
        assert_eq!(specific_query().date_string(), "05.08.2017");
    }

    #[test]
    fn test_request_url() {
        assert_eq!(
            specific_query().request_url(),
            "https://www.bnm.md/ro/official_exchange_rates?get_xml=1&date=05.08.2017"
        );
    }

    #[test]
    fn test_id() {
        assert_eq!(specific_query().id(), "ro_05.08.2017");
    }

    #[test]
    fn test_id_is_stable_and_distinguishes_fields() {
        let query = specific_query();
        assert_eq!(query.id(), specific_query().id());

        let other_lang = Query::new(query.date, Lang::En);
        let other_day = Query::new(NaiveDate::from_ymd_opt(2017, 8, 6).unwrap(), Lang::Ro);
        assert_ne!(query.id(), other_lang.id());
        assert_ne!(query.id(), other_day.id());
    }

    #[test]
    fn test_lang_from_str() {
        assert_eq!("ro".parse::<Lang>().unwrap(), Lang::Ro);
        assert_eq!("RU".parse::<Lang>().unwrap(), Lang::Ru);
        assert_eq!("En".parse::<Lang>().unwrap(), Lang::En);

        let err = "fr".parse::<Lang>().unwrap_err();
        assert!(err.to_string().contains("unknown language"));
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_lang_default_is_english() {
        assert_eq!(Lang::default(), Lang::En);
    }
}
