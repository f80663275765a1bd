//! Locale-aware conversion of article date strings into epoch milliseconds.
//!
//! Every source prints publication dates its own way. A source describes its
//! convention with a [`DateFormat`] and a [`Locale`], and picks a
//! [`DatePolicy`] deciding whether an unparseable date fails the article or
//! degrades to [`UNKNOWN_TIMESTAMP`].

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use odra_core::{Error, Result, UNKNOWN_TIMESTAMP};
use tracing::warn;

const POLISH_MONTH_NAMES: [&[&str]; 12] = [
    &["styczeń", "stycznia", "sty"],
    &["luty", "lutego", "lut"],
    &["marzec", "marca", "mar"],
    &["kwiecień", "kwietnia", "kwi"],
    &["maj", "maja"],
    &["czerwiec", "czerwca", "cze"],
    &["lipiec", "lipca", "lip"],
    &["sierpień", "sierpnia", "sie"],
    &["wrzesień", "września", "wrz"],
    &["październik", "października", "paź"],
    &["listopad", "listopada", "lis"],
    &["grudzień", "grudnia", "gru"],
];

const GERMAN_MONTH_NAMES: [&[&str]; 12] = [
    &["januar", "jan", "jänner"],
    &["februar", "feb"],
    &["märz", "mär", "maerz"],
    &["april", "apr"],
    &["mai"],
    &["juni", "jun"],
    &["juli", "jul"],
    &["august", "aug"],
    &["september", "sep", "sept"],
    &["oktober", "okt"],
    &["november", "nov"],
    &["dezember", "dez"],
];

lazy_static! {
    static ref POLISH_MONTHS: HashMap<&'static str, u32> = month_table(&POLISH_MONTH_NAMES);
    static ref GERMAN_MONTHS: HashMap<&'static str, u32> = month_table(&GERMAN_MONTH_NAMES);
}

fn month_table(months: &[&[&'static str]; 12]) -> HashMap<&'static str, u32> {
    months
        .iter()
        .enumerate()
        .flat_map(|(index, names)| names.iter().map(move |name| (*name, index as u32 + 1)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Polish,
    German,
}

impl Locale {
    /// 1-based month number for a month name in this locale.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        let name = name.trim().trim_end_matches(['.', ',']).to_lowercase();
        let table = match self {
            Locale::Polish => &*POLISH_MONTHS,
            Locale::German => &*GERMAN_MONTHS,
        };
        table.get(name.as_str()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFormat {
    /// `15 stycznia 2021`: day, locale month name, year.
    DayMonthNameYear,
    /// A chrono format string such as `%d.%m.%Y`.
    Pattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePolicy {
    /// Unparseable dates fail the article.
    Strict,
    /// Unparseable dates become `UNKNOWN_TIMESTAMP`.
    Lenient,
}

/// Parses `raw` into midnight UTC of the given date, in epoch milliseconds.
pub fn normalize(raw: &str, format: &DateFormat, locale: Locale) -> Result<i64> {
    let date = match format {
        DateFormat::DayMonthNameYear => parse_month_name(raw, locale)?,
        DateFormat::Pattern(pattern) => NaiveDate::parse_and_remainder(raw.trim(), pattern)
            .map(|(date, _)| date)
            .map_err(|e| Error::date_parse(raw, e))?,
    };
    midnight_millis(raw, date)
}

/// Like [`normalize`], applying `policy` to failures.
pub fn normalize_with_policy(
    raw: &str,
    format: &DateFormat,
    locale: Locale,
    policy: DatePolicy,
) -> Result<i64> {
    match (normalize(raw, format, locale), policy) {
        (Ok(timestamp), _) => Ok(timestamp),
        (Err(e), DatePolicy::Strict) => Err(e),
        (Err(e), DatePolicy::Lenient) => {
            warn!(raw, error = %e, "Falling back to unknown creation date");
            Ok(UNKNOWN_TIMESTAMP)
        }
    }
}

fn parse_month_name(raw: &str, locale: Locale) -> Result<NaiveDate> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(Error::date_parse(raw, "expected `day month year`"));
    }

    let day = tokens[0].trim_end_matches('.');
    let month = locale
        .month_number(tokens[1])
        .ok_or_else(|| Error::date_parse(raw, format!("unknown month name {:?}", tokens[1])))?;
    let year: String = tokens[2].chars().take_while(|c| c.is_ascii_digit()).collect();

    NaiveDate::parse_from_str(&format!("{}.{}.{}", day, month, year), "%d.%m.%Y")
        .map_err(|e| Error::date_parse(raw, e))
}

fn midnight_millis(raw: &str, date: NaiveDate) -> Result<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::date_parse(raw, "no midnight for date"))?;
    Ok(Utc.from_utc_datetime(&midnight).timestamp_millis())
}
