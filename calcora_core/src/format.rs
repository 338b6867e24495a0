//! # Value Formatting
//!
//! Turns raw result values into display strings: currency symbols from a
//! single ISO-code table, locale punctuation, and unit suffixes taken from the
//! active language's `values` map.
//!
//! Raw values are never rounded here in place; rounding happens only in the
//! produced string, so `CalculatorResults::values` keeps full precision.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::format::{format_currency, format_number};
//! use calcora_core::locale::Language;
//!
//! assert_eq!(format_currency(1234.5, "USD", Language::En), "$1,234.50");
//! assert_eq!(format_currency(1234.5, "BRL", Language::Pt), "R$ 1.234,50");
//! assert_eq!(format_number(69.853, 2, Language::Es), "69,85");
//! ```

use serde::Serialize;

use crate::calculations::{ResultValue, TextContext};
use crate::config::ResultFormat;
use crate::locale::Language;

// ============================================================================
// Currency table
// ============================================================================

/// Display data for one ISO 4217 currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Digits after the decimal separator (0 for JPY)
    pub minor_digits: u8,
    /// Put a space between symbol and amount ("R$ 10,00")
    pub spaced: bool,
}

impl CurrencyInfo {
    const fn new(code: &'static str, symbol: &'static str, minor_digits: u8, spaced: bool) -> Self {
        Self { code, symbol, minor_digits, spaced }
    }
}

/// Every currency the calculators know a symbol for.
pub const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo::new("USD", "$", 2, false),
    CurrencyInfo::new("EUR", "€", 2, false),
    CurrencyInfo::new("GBP", "£", 2, false),
    CurrencyInfo::new("BRL", "R$", 2, true),
    CurrencyInfo::new("JPY", "¥", 0, false),
    CurrencyInfo::new("MXN", "MX$", 2, false),
    CurrencyInfo::new("CAD", "CA$", 2, false),
    CurrencyInfo::new("AUD", "A$", 2, false),
    CurrencyInfo::new("INR", "₹", 2, false),
];

pub const DEFAULT_CURRENCY: &str = "USD";

/// Look up a currency by ISO code (case-insensitive).
pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

// ============================================================================
// Number formatting
// ============================================================================

/// Thousands and decimal separators for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Punctuation {
    pub thousands: char,
    pub decimal: char,
}

impl Punctuation {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Punctuation { thousands: ',', decimal: '.' },
            Language::Es | Language::Pt => Punctuation { thousands: '.', decimal: ',' },
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a number with grouping and a fixed number of decimals.
pub fn format_number(value: f64, decimals: u8, language: Language) -> String {
    let punct = Punctuation::for_language(language);
    let rounded = round_to(value, decimals);
    let negative = rounded < 0.0;
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(punct.thousands);
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(punct.decimal);
        out.push_str(frac);
    }
    out
}

/// Format a monetary amount with the currency's symbol and minor digits.
///
/// Unknown codes fall back to the upper-cased code as a spaced prefix
/// ("CHF 12.00").
pub fn format_currency(value: f64, code: &str, language: Language) -> String {
    let (symbol, digits, spaced) = match currency_info(code) {
        Some(info) => (info.symbol.to_string(), info.minor_digits, info.spaced),
        None => (code.trim().to_ascii_uppercase(), 2, true),
    };
    let amount = format_number(value.abs(), digits, language);
    let sign = if round_to(value, digits) < 0.0 { "-" } else { "" };
    let gap = if spaced { " " } else { "" };
    format!("{sign}{symbol}{gap}{amount}")
}

pub fn format_percent(value: f64, decimals: u8, language: Language) -> String {
    format!("{}%", format_number(value, decimals, language))
}

pub fn format_with_suffix(value: f64, decimals: u8, suffix: &str, language: Language) -> String {
    format!("{} {}", format_number(value, decimals, language), suffix)
}

// ============================================================================
// Result formatter
// ============================================================================

/// Formats result values according to their declared [`ResultFormat`].
///
/// Built once per evaluation from the active [`TextContext`] and the chosen
/// currency, then shared by every result slot.
#[derive(Debug, Clone)]
pub struct ValueFormatter<'a> {
    language: Language,
    currency: String,
    text: Option<&'a TextContext>,
}

impl<'a> ValueFormatter<'a> {
    pub fn new(text: Option<&'a TextContext>, currency: impl Into<String>) -> Self {
        ValueFormatter {
            language: text.map(|t| t.language).unwrap_or_default(),
            currency: currency.into(),
            text,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Unit suffix or option label from the active `values` map, falling
    /// back to the key itself.
    pub fn text_value(&self, key: &str) -> String {
        self.text
            .and_then(|t| t.values.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn money(&self, value: f64) -> String {
        format_currency(value, &self.currency, self.language)
    }

    pub fn number(&self, value: f64, decimals: u8) -> String {
        format_number(value, decimals, self.language)
    }

    pub fn format(&self, value: &ResultValue, format: &ResultFormat) -> String {
        let number = match (value, format) {
            (ResultValue::Text(code), ResultFormat::Label) => return self.text_value(code),
            (ResultValue::Text(s), _) => return s.clone(),
            (ResultValue::Number(n), _) => *n,
        };
        match format {
            ResultFormat::Currency => self.money(number),
            ResultFormat::Number { decimals } => self.number(number, *decimals),
            ResultFormat::Percent { decimals } => format_percent(number, *decimals, self.language),
            ResultFormat::Unit { suffix, decimals } => {
                format_with_suffix(number, *decimals, &self.text_value(suffix), self.language)
            }
            ResultFormat::Calories => {
                format_with_suffix(number, 0, &self.text_value("kcal"), self.language)
            }
            ResultFormat::Text | ResultFormat::Label => self.number(number, 2),
        }
    }
}
