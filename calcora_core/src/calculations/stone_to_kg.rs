//! # Stone to Kilograms
//!
//! Converts UK stones to kilograms and pounds, and shows the familiar
//! "st + lbs" split.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{formatted_token, Calculator, ResultKey, ResultValue, ValueReader};
use crate::config::{
    CalculatorCategory, CalculatorConfig, InfoCard, InputField, Preset, Reference, ResultFormat, ResultKind,
};
use crate::errors::{CalcError, CalcResult};
use crate::format::ValueFormatter;
use crate::units::{Kilograms, Pounds, StonePounds, Stones};

pub const ID: &str = "stone-to-kg";

/// Trim trailing zeros for echoing user input ("11", "11.5").
pub(crate) fn echo_number(fmt: &ValueFormatter<'_>, value: f64) -> String {
    let decimals = if (value - value.round()).abs() < 1e-9 { 0 } else { 2 };
    fmt.number(value, decimals)
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> CalcResult<()> {
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Weight must be greater than zero"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoneToKgOutput {
    pub stones: Stones,
    pub kilograms: Kilograms,
    pub pounds: Pounds,
    pub split: StonePounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoneToKgKey {
    Kilograms,
    Pounds,
    StonePounds,
}

impl ResultKey for StoneToKgKey {
    const ALL: &'static [Self] = &[StoneToKgKey::Kilograms, StoneToKgKey::Pounds, StoneToKgKey::StonePounds];

    fn id(self) -> &'static str {
        match self {
            StoneToKgKey::Kilograms => "kilograms",
            StoneToKgKey::Pounds => "pounds",
            StoneToKgKey::StonePounds => "stonePounds",
        }
    }

    fn kind(self) -> ResultKind {
        match self {
            StoneToKgKey::Kilograms => ResultKind::Primary,
            _ => ResultKind::Secondary,
        }
    }

    fn format(self) -> ResultFormat {
        match self {
            StoneToKgKey::Kilograms => ResultFormat::Unit {
                suffix: "kg".to_string(),
                decimals: 2,
            },
            StoneToKgKey::Pounds => ResultFormat::Unit {
                suffix: "lbs".to_string(),
                decimals: 1,
            },
            StoneToKgKey::StonePounds => ResultFormat::Text,
        }
    }
}

pub struct StoneToKgCalculator;

impl Calculator for StoneToKgCalculator {
    const ID: &'static str = ID;
    const DEFAULT_SUMMARY: &'static str = "{stones} stone equals {kilograms} ({pounds}).";

    type Params = Stones;
    type Output = StoneToKgOutput;
    type Key = StoneToKgKey;

    fn config() -> CalculatorConfig {
        CalculatorConfig {
            id: ID.to_string(),
            version: "1.0.0".to_string(),
            category: CalculatorCategory::Conversion,
            icon: "scale".to_string(),
            inputs: vec![InputField::number("stoneValue")
                .required()
                .range(0.0, 100.0)
                .step(0.1)
                .suffix("st")],
            results: StoneToKgKey::slots(),
            presets: vec![
                Preset::new("tenStone", "user").with("stoneValue", 10.0),
                Preset::new("elevenStone", "user").with("stoneValue", 11.0),
                Preset::new("fifteenHalf", "user").with("stoneValue", 15.5),
            ],
            info_cards: vec![InfoCard::showing("conversion", "repeat", &["kilograms", "pounds", "stonePounds"])],
            education_sections: vec!["whatIsStone".to_string()],
            faqs: vec!["whyStone".to_string()],
            references: vec![Reference {
                title: "Weights and Measures Act 1985".to_string(),
                url: "https://www.legislation.gov.uk/ukpga/1985/72".to_string(),
            }],
            related_calculators: vec!["kg-to-stone".to_string()],
        }
    }

    fn read(reader: &ValueReader<'_>) -> CalcResult<Stones> {
        reader.number("stoneValue").map(Stones)
    }

    fn compute(stones: &Stones) -> CalcResult<StoneToKgOutput> {
        ensure_positive("stoneValue", stones.value())?;
        Ok(StoneToKgOutput {
            stones: *stones,
            kilograms: (*stones).into(),
            pounds: (*stones).into(),
            split: StonePounds::from_stones(*stones),
        })
    }

    fn value(output: &StoneToKgOutput, key: StoneToKgKey, fmt: &ValueFormatter<'_>) -> ResultValue {
        match key {
            StoneToKgKey::Kilograms => output.kilograms.value().into(),
            StoneToKgKey::Pounds => output.pounds.value().into(),
            StoneToKgKey::StonePounds => output
                .split
                .display_with(&fmt.text_value("st"), &fmt.text_value("lbs"))
                .into(),
        }
    }

    fn summary_tokens(
        output: &StoneToKgOutput,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("stones", echo_number(fmt, output.stones.value())),
            ("kilograms", formatted_token(formatted, "kilograms")),
            ("pounds", formatted_token(formatted, "pounds")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CalculationInput;

    #[test]
    fn test_eleven_stone() {
        let r = StoneToKgCalculator::calculate(&CalculationInput::new().with("stoneValue", 11.0));
        assert!(r.is_valid);
        assert!((r.number("kilograms").unwrap() - 69.85322498).abs() < 1e-6);
        assert_eq!(r.formatted["kilograms"], "69.85 kg");
        assert!((r.number("pounds").unwrap() - 154.0).abs() < 1e-9);
        assert_eq!(r.formatted["pounds"], "154.0 lbs");
        assert_eq!(r.formatted["stonePounds"], "11 st 0 lbs");
        assert_eq!(r.summary, "11 stone equals 69.85 kg (154.0 lbs).");
    }

    #[test]
    fn test_string_input_accepted() {
        let r = StoneToKgCalculator::calculate(&CalculationInput::new().with("stoneValue", "15.5"));
        assert!(r.is_valid);
        assert_eq!(r.formatted["stonePounds"], "15 st 7 lbs");
    }

    #[test]
    fn test_zero_and_missing_are_invalid() {
        assert!(!StoneToKgCalculator::calculate(&CalculationInput::new().with("stoneValue", 0.0)).is_valid);
        assert!(!StoneToKgCalculator::calculate(&CalculationInput::new()).is_valid);
        assert!(!StoneToKgCalculator::calculate(&CalculationInput::new().with("stoneValue", "heavy")).is_valid);
    }

    #[test]
    fn test_config_is_valid() {
        StoneToKgCalculator::config().validate().unwrap();
    }
}
