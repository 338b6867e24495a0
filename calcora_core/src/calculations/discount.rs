//! # Discount Calculator
//!
//! Sale price after a percentage discount, with an optional sales tax applied
//! to the discounted price.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::calculations::{CalculationInput, Calculator, DiscountCalculator};
//!
//! let input = CalculationInput::new()
//!     .with("originalPrice", 150.0)
//!     .with("discountPercent", 30.0);
//! let results = DiscountCalculator::calculate(&input);
//!
//! assert!(results.is_valid);
//! assert_eq!(results.formatted["finalPrice"], "$105.00");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{formatted_token, Calculator, ResultKey, ResultValue, ValueReader};
use crate::config::{
    CalculatorCategory, CalculatorConfig, InfoCard, InputField, Preset, Reference, ResultFormat, ResultKind,
    UnitType,
};
use crate::equations::{discount_breakdown, DiscountBreakdown};
use crate::errors::{CalcError, CalcResult};
use crate::format::ValueFormatter;

pub const ID: &str = "discount";

/// Typed discount inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountParams {
    /// Price before discount
    pub original_price: f64,
    /// Discount, 0-100 %
    pub discount_pct: f64,
    /// Sales tax on the discounted price, 0-100 %
    pub tax_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountOutput {
    pub params: DiscountParams,
    pub breakdown: DiscountBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKey {
    YouSave,
    SalePrice,
    TaxAmount,
    FinalPrice,
}

impl ResultKey for DiscountKey {
    const ALL: &'static [Self] = &[
        DiscountKey::FinalPrice,
        DiscountKey::YouSave,
        DiscountKey::SalePrice,
        DiscountKey::TaxAmount,
    ];

    fn id(self) -> &'static str {
        match self {
            DiscountKey::YouSave => "youSave",
            DiscountKey::SalePrice => "salePrice",
            DiscountKey::TaxAmount => "taxAmount",
            DiscountKey::FinalPrice => "finalPrice",
        }
    }

    fn kind(self) -> ResultKind {
        match self {
            DiscountKey::FinalPrice | DiscountKey::YouSave => ResultKind::Primary,
            _ => ResultKind::Secondary,
        }
    }

    fn format(self) -> ResultFormat {
        ResultFormat::Currency
    }
}

pub struct DiscountCalculator;

impl Calculator for DiscountCalculator {
    const ID: &'static str = ID;
    const DEFAULT_SUMMARY: &'static str =
        "You save {saved} ({percent}% off). Final price: {final}.";

    type Params = DiscountParams;
    type Output = DiscountOutput;
    type Key = DiscountKey;

    fn config() -> CalculatorConfig {
        CalculatorConfig {
            id: ID.to_string(),
            version: "1.0.0".to_string(),
            category: CalculatorCategory::Finance,
            icon: "tag".to_string(),
            inputs: vec![
                InputField::number("originalPrice")
                    .required()
                    .range(0.0, 1_000_000_000.0)
                    .step(0.01)
                    .unit(UnitType::Currency),
                InputField::number("discountPercent")
                    .required()
                    .range(0.0, 100.0)
                    .step(1.0)
                    .suffix("%")
                    .unit(UnitType::Percent),
                InputField::number("taxRate")
                    .range(0.0, 100.0)
                    .step(0.25)
                    .default_value(0.0)
                    .suffix("%")
                    .unit(UnitType::Percent),
            ],
            results: DiscountKey::slots(),
            presets: vec![
                Preset::new("blackFriday", "shopping-bag")
                    .with("originalPrice", 150.0)
                    .with("discountPercent", 30.0)
                    .with("taxRate", 0.0),
                Preset::new("clearance", "percent")
                    .with("originalPrice", 80.0)
                    .with("discountPercent", 40.0)
                    .with("taxRate", 8.0),
                Preset::new("electronics", "laptop")
                    .with("originalPrice", 1299.0)
                    .with("discountPercent", 15.0)
                    .with("taxRate", 7.25),
            ],
            info_cards: vec![
                InfoCard::showing("savings", "piggy-bank", &["youSave", "salePrice"]),
                InfoCard::showing("checkout", "receipt", &["taxAmount", "finalPrice"]),
            ],
            education_sections: vec!["howDiscountsWork".to_string(), "stackedDiscounts".to_string()],
            faqs: vec!["taxBeforeOrAfter".to_string(), "percentVsAmount".to_string()],
            references: vec![Reference {
                title: "Sales tax basics".to_string(),
                url: "https://www.investopedia.com/terms/s/salestax.asp".to_string(),
            }],
            related_calculators: vec!["budget".to_string()],
        }
    }

    fn read(reader: &ValueReader<'_>) -> CalcResult<DiscountParams> {
        Ok(DiscountParams {
            original_price: reader.number("originalPrice")?,
            discount_pct: reader.number("discountPercent")?,
            tax_pct: reader.number("taxRate")?,
        })
    }

    fn compute(params: &DiscountParams) -> CalcResult<DiscountOutput> {
        if params.original_price <= 0.0 {
            return Err(CalcError::invalid_input(
                "originalPrice",
                params.original_price.to_string(),
                "Price must be greater than zero",
            ));
        }
        Ok(DiscountOutput {
            params: *params,
            breakdown: discount_breakdown(params.original_price, params.discount_pct, params.tax_pct),
        })
    }

    fn value(output: &DiscountOutput, key: DiscountKey, _fmt: &ValueFormatter<'_>) -> ResultValue {
        let b = &output.breakdown;
        match key {
            DiscountKey::YouSave => b.savings.into(),
            DiscountKey::SalePrice => b.sale_price.into(),
            DiscountKey::TaxAmount => b.tax.into(),
            DiscountKey::FinalPrice => b.final_price.into(),
        }
    }

    fn summary_tokens(
        output: &DiscountOutput,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("saved", formatted_token(formatted, "youSave")),
            ("percent", fmt.number(output.params.discount_pct, 0)),
            ("final", formatted_token(formatted, "finalPrice")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CalculationInput;

    fn input(price: f64, discount: f64, tax: f64) -> CalculationInput {
        CalculationInput::new()
            .with("originalPrice", price)
            .with("discountPercent", discount)
            .with("taxRate", tax)
    }

    #[test]
    fn test_discount_without_tax() {
        let r = DiscountCalculator::calculate(&input(150.0, 30.0, 0.0));
        assert!(r.is_valid);
        assert!((r.number("youSave").unwrap() - 45.0).abs() < 1e-9);
        assert!((r.number("salePrice").unwrap() - 105.0).abs() < 1e-9);
        assert!((r.number("finalPrice").unwrap() - 105.0).abs() < 1e-9);
        assert_eq!(r.formatted["youSave"], "$45.00");
        assert_eq!(r.summary, "You save $45.00 (30% off). Final price: $105.00.");
    }

    #[test]
    fn test_discount_with_tax() {
        let r = DiscountCalculator::calculate(&input(80.0, 40.0, 8.0));
        assert!(r.is_valid);
        assert!((r.number("taxAmount").unwrap() - 3.84).abs() < 1e-9);
        assert!((r.number("finalPrice").unwrap() - 51.84).abs() < 1e-9);
        assert_eq!(r.formatted["finalPrice"], "$51.84");
    }

    #[test]
    fn test_tax_defaults_to_zero() {
        let input = CalculationInput::new()
            .with("originalPrice", 100.0)
            .with("discountPercent", 10.0)
            .with_null("taxRate");
        let r = DiscountCalculator::calculate(&input);
        assert!(r.is_valid);
        assert_eq!(r.number("taxAmount"), Some(0.0));
    }

    #[test]
    fn test_missing_price_is_invalid() {
        let input = CalculationInput::new()
            .with_null("originalPrice")
            .with("discountPercent", 20.0);
        let r = DiscountCalculator::calculate(&input);
        assert!(!r.is_valid);
        assert!(r.values.is_empty());
        assert!(r.formatted.is_empty());
        assert_eq!(r.summary, "");

        let err = DiscountCalculator::try_calculate(&input).unwrap_err();
        assert_eq!(err, CalcError::missing_field("originalPrice"));
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert!(!DiscountCalculator::calculate(&input(100.0, 120.0, 0.0)).is_valid);
        assert!(!DiscountCalculator::calculate(&input(100.0, -5.0, 0.0)).is_valid);
        assert!(!DiscountCalculator::calculate(&input(0.0, 10.0, 0.0)).is_valid);
    }

    #[test]
    fn test_currency_follows_field_unit() {
        let eur_input = input(80.0, 40.0, 8.0).with_unit("originalPrice", "EUR");
        let r = DiscountCalculator::calculate(&eur_input);
        assert_eq!(r.formatted["finalPrice"], "€51.84");

        let padded = input(80.0, 40.0, 8.0).with_unit("originalPrice", " eur");
        let r = DiscountCalculator::calculate(&padded);
        assert!(r.is_valid);
        assert_eq!(r.formatted["finalPrice"], "€51.84");
    }

    #[test]
    fn test_config_is_valid() {
        DiscountCalculator::config().validate().unwrap();
    }
}
