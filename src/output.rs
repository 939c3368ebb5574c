//! Rendering of fetched rates for the terminal

use std::fmt::Write;

use crate::data::{Currency, Rates};

/// Keeps only the currencies listed in `codes` (already upper-cased), in the
/// order requested. An empty filter keeps everything.
pub fn select<'a>(rates: &'a Rates, codes: &[String]) -> Vec<&'a Currency> {
    if codes.is_empty() {
        return rates.currencies.iter().collect();
    }
    codes.iter().filter_map(|code| rates.find_by_code(code)).collect()
}

/// Renders one document as a plain text table
///
/// Requested codes that the document does not contain get a "not found" row.
pub fn render_table(rates: &Rates, codes: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", rates.name, rates.date);
    let _ = writeln!(out, "{:<5} {:>7} {:>10}  {}", "CODE", "NOMINAL", "MDL", "NAME");

    if codes.is_empty() {
        for currency in &rates.currencies {
            write_row(&mut out, currency);
        }
        return out;
    }

    for code in codes {
        match rates.find_by_code(code) {
            Some(currency) => write_row(&mut out, currency),
            None => {
                let _ = writeln!(out, "{:<5} not found", code);
            }
        }
    }
    out
}

fn write_row(out: &mut String, currency: &Currency) {
    let _ = writeln!(
        out,
        "{:<5} {:>7} {:>10.4}  {}",
        currency.code, currency.nominal, currency.value, currency.name
    );
}

fn filtered(rates: &Rates, codes: &[String]) -> Rates {
    Rates {
        date: rates.date.clone(),
        name: rates.name.clone(),
        currencies: select(rates, codes).into_iter().cloned().collect(),
    }
}

/// Renders all fetched documents as one pretty JSON array, in fetch order,
/// filtered like the table
pub fn render_json(documents: &[Rates], codes: &[String]) -> serde_json::Result<String> {
    let all: Vec<Rates> = documents.iter().map(|rates| filtered(rates, codes)).collect();
    serde_json::to_string_pretty(&all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rates {
        let currency = |code: &str, name: &str, value: f64| Currency {
            id: String::new(),
            num_code: 0,
            code: code.to_string(),
            nominal: 1,
            name: name.to_string(),
            value,
        };
        Rates {
            date: "05.08.2017".to_string(),
            name: "Official exchange rate".to_string(),
            currencies: vec![
                currency("EUR", "Euro", 21.2997),
                currency("USD", "US Dollar", 17.9948),
            ],
        }
    }

    #[test]
    fn test_select_all_when_no_codes() {
        let rates = sample();
        assert_eq!(select(&rates, &[]).len(), 2);
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let rates = sample();
        let codes = vec!["USD".to_string(), "XYZ".to_string(), "EUR".to_string()];
        let picked: Vec<_> = select(&rates, &codes).iter().map(|c| c.code.as_str()).collect();
        assert_eq!(picked, vec!["USD", "EUR"]);
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&sample(), &[]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines[0], "Official exchange rate (05.08.2017)");
        assert!(lines[1].starts_with("CODE"));
        assert_eq!(lines[2], "EUR         1    21.2997  Euro");
        assert_eq!(lines[3], "USD         1    17.9948  US Dollar");
    }

    #[test]
    fn test_render_table_reports_missing_codes() {
        let table = render_table(&sample(), &["XYZ".to_string(), "USD".to_string()]);

        assert!(table.contains("XYZ   not found"));
        assert!(table.contains("US Dollar"));
        assert!(!table.contains("Euro"));
    }

    #[test]
    fn test_render_json_filters() {
        let json = render_json(&[sample()], &["EUR".to_string()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["date"], "05.08.2017");
        assert_eq!(value[0]["currencies"].as_array().unwrap().len(), 1);
        assert_eq!(value[0]["currencies"][0]["code"], "EUR");
    }

    #[test]
    fn test_render_json_is_one_array_across_dates() {
        let mut second = sample();
        second.date = "06.08.2017".to_string();

        let json = render_json(&[sample(), second], &["USD".to_string()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let documents = value.as_array().expect("expected a JSON array");
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["date"], "05.08.2017");
        assert_eq!(documents[1]["date"], "06.08.2017");
        assert_eq!(documents[1]["currencies"][0]["code"], "USD");
    }

    #[test]
    fn test_render_json_empty() {
        assert_eq!(render_json(&[], &[]).unwrap(), "[]");
    }
}
