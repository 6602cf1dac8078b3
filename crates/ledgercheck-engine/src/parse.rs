//! Value checkers for the semantic types
//!
//! Amounts accept an optional currency marker (`$`, `€`, `£`, `COP`, `USD`,
//! `EUR`), `,` thousands grouping and a `.` decimal point. A decimal comma
//! (`12.345,67`) is rejected rather than guessed.

use chrono::NaiveDate;
use ledgercheck_core::SemanticType;
use once_cell::sync::Lazy;
use regex::Regex;

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<lead>[+-])?\s*(?P<sym>[$€£]|COP|USD|EUR)?\s*(?P<sign>[+-])?\s*(?P<num>[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]+)?|[0-9]+(?:\.[0-9]+)?|\.[0-9]+)\s*(?P<code>COP|USD|EUR)?$",
    )
    .expect("amount pattern is valid")
});

/// A parsed monetary or numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    pub value: f64,

    /// Whether the raw text carried a currency symbol or code
    pub marked: bool,
}

/// Sign, ungrouped digits and marker of an amount, before any float conversion
struct AmountParts {
    negative: bool,
    digits: String,
    marked: bool,
}

fn amount_parts(raw: &str) -> Option<AmountParts> {
    let caps = AMOUNT_RE.captures(raw.trim())?;

    // "-$-5" is not a number
    if caps.name("lead").is_some() && caps.name("sign").is_some() {
        return None;
    }

    Some(AmountParts {
        negative: caps
            .name("lead")
            .or_else(|| caps.name("sign"))
            .is_some_and(|m| m.as_str() == "-"),
        digits: caps["num"].chars().filter(|c| *c != ',').collect(),
        marked: caps.name("sym").is_some() || caps.name("code").is_some(),
    })
}

/// Parse an amount, tolerating currency markers and thousands grouping
///
/// Magnitudes too large for `f64` saturate to `f64::MAX` so range checks
/// still see them as huge.
pub fn parse_amount(raw: &str) -> Option<Amount> {
    let parts = amount_parts(raw)?;
    let mut magnitude: f64 = parts.digits.parse().ok()?;
    if magnitude.is_infinite() {
        magnitude = f64::MAX;
    }

    Some(Amount {
        value: if parts.negative { -magnitude } else { magnitude },
        marked: parts.marked,
    })
}

/// Exact canonical text of an amount, computed on the digits
///
/// Grouping, markers, leading integer zeros and trailing fractional zeros are
/// dropped, so `$1,000.50`, `1000.5` and `001000.500` agree while distinct
/// 20-digit identifiers stay distinct.
pub fn canonical_amount(raw: &str) -> Option<String> {
    let parts = amount_parts(raw)?;
    let (int_part, frac_part) = match parts.digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (parts.digits.as_str(), ""),
    };

    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');

    let mut canonical = String::with_capacity(parts.digits.len() + 1);
    if int_part.is_empty() && frac_part.is_empty() {
        return Some("0".to_string());
    }
    if parts.negative {
        canonical.push('-');
    }
    canonical.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        canonical.push('.');
        canonical.push_str(frac_part);
    }
    Some(canonical)
}

/// Checks raw values against the semantic types
#[derive(Debug, Clone)]
pub struct ValueParser<'a> {
    date_formats: &'a [String],
}

impl<'a> ValueParser<'a> {
    pub fn new(date_formats: &'a [String]) -> Self {
        Self { date_formats }
    }

    /// Parse a calendar date with any of the configured layouts
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }

    /// Whether a non-empty value fits `ty`
    ///
    /// `monetary` marks a column whose plain numbers count as currency.
    pub fn matches(&self, ty: SemanticType, raw: &str, monetary: bool) -> bool {
        match ty {
            SemanticType::Date => self.parse_date(raw).is_some(),
            SemanticType::Currency => parse_amount(raw).is_some_and(|a| a.marked || monetary),
            SemanticType::Numeric => parse_amount(raw).is_some_and(|a| !a.marked),
            SemanticType::Text => true,
        }
    }
}
