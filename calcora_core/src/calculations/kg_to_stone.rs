//! # Kilograms to Stone
//!
//! Converts kilograms to decimal stones, pounds, and the "st + lbs" split.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stone_to_kg::{echo_number, ensure_positive};
use super::{formatted_token, Calculator, ResultKey, ResultValue, ValueReader};
use crate::config::{
    CalculatorCategory, CalculatorConfig, InfoCard, InputField, Preset, ResultFormat, ResultKind, UnitType,
};
use crate::errors::CalcResult;
use crate::format::ValueFormatter;
use crate::units::{Kilograms, Pounds, StonePounds, Stones};

pub const ID: &str = "kg-to-stone";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KgToStoneOutput {
    pub kilograms: Kilograms,
    pub stones: Stones,
    pub pounds: Pounds,
    pub split: StonePounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KgToStoneKey {
    Stones,
    Pounds,
    StonePounds,
}

impl ResultKey for KgToStoneKey {
    const ALL: &'static [Self] = &[KgToStoneKey::Stones, KgToStoneKey::Pounds, KgToStoneKey::StonePounds];

    fn id(self) -> &'static str {
        match self {
            KgToStoneKey::Stones => "stones",
            KgToStoneKey::Pounds => "pounds",
            KgToStoneKey::StonePounds => "stonePounds",
        }
    }

    fn kind(self) -> ResultKind {
        match self {
            KgToStoneKey::Stones | KgToStoneKey::StonePounds => ResultKind::Primary,
            KgToStoneKey::Pounds => ResultKind::Secondary,
        }
    }

    fn format(self) -> ResultFormat {
        match self {
            KgToStoneKey::Stones => ResultFormat::Unit {
                suffix: "st".to_string(),
                decimals: 2,
            },
            KgToStoneKey::Pounds => ResultFormat::Unit {
                suffix: "lbs".to_string(),
                decimals: 1,
            },
            KgToStoneKey::StonePounds => ResultFormat::Text,
        }
    }
}

pub struct KgToStoneCalculator;

impl Calculator for KgToStoneCalculator {
    const ID: &'static str = ID;
    const DEFAULT_SUMMARY: &'static str = "{kilograms} kg is {stonePounds} ({stones}).";

    type Params = Kilograms;
    type Output = KgToStoneOutput;
    type Key = KgToStoneKey;

    fn config() -> CalculatorConfig {
        CalculatorConfig {
            id: ID.to_string(),
            version: "1.0.0".to_string(),
            category: CalculatorCategory::Conversion,
            icon: "scale".to_string(),
            inputs: vec![InputField::number("kgValue")
                .required()
                .range(0.0, 650.0)
                .step(0.1)
                .suffix("kg")
                .unit(UnitType::Weight)],
            results: KgToStoneKey::slots(),
            presets: vec![
                Preset::new("sixtyKg", "user").with("kgValue", 60.0),
                Preset::new("seventyFiveKg", "user").with("kgValue", 75.0),
                Preset::new("hundredKg", "user").with("kgValue", 100.0),
            ],
            info_cards: vec![InfoCard::showing("conversion", "repeat", &["stones", "pounds", "stonePounds"])],
            education_sections: vec!["readingStone".to_string()],
            faqs: vec!["roundingPounds".to_string()],
            references: vec![],
            related_calculators: vec!["stone-to-kg".to_string(), "bmr".to_string()],
        }
    }

    fn read(reader: &ValueReader<'_>) -> CalcResult<Kilograms> {
        reader.number("kgValue").map(Kilograms)
    }

    fn compute(kilograms: &Kilograms) -> CalcResult<KgToStoneOutput> {
        ensure_positive("kgValue", kilograms.value())?;
        let stones: Stones = (*kilograms).into();
        Ok(KgToStoneOutput {
            kilograms: *kilograms,
            stones,
            pounds: (*kilograms).into(),
            split: StonePounds::from_stones(stones),
        })
    }

    fn value(output: &KgToStoneOutput, key: KgToStoneKey, fmt: &ValueFormatter<'_>) -> ResultValue {
        match key {
            KgToStoneKey::Stones => output.stones.value().into(),
            KgToStoneKey::Pounds => output.pounds.value().into(),
            KgToStoneKey::StonePounds => output
                .split
                .display_with(&fmt.text_value("st"), &fmt.text_value("lbs"))
                .into(),
        }
    }

    fn summary_tokens(
        output: &KgToStoneOutput,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("kilograms", echo_number(fmt, output.kilograms.value())),
            ("stonePounds", formatted_token(formatted, "stonePounds")),
            ("stones", formatted_token(formatted, "stones")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CalculationInput;

    #[test]
    fn test_seventy_five_kg() {
        let r = KgToStoneCalculator::calculate(&CalculationInput::new().with("kgValue", 75.0));
        assert!(r.is_valid);
        assert!((r.number("stones").unwrap() - 75.0 / 6.35029318).abs() < 1e-12);
        assert_eq!(r.formatted["stones"], "11.81 st");
        assert_eq!(r.formatted["stonePounds"], "11 st 11 lbs");
        assert!((r.number("pounds").unwrap() - 75.0 * 2.20462).abs() < 1e-9);
        assert_eq!(r.summary, "75 kg is 11 st 11 lbs (11.81 st).");
    }

    #[test]
    fn test_pound_input_is_converted() {
        // 165.3465 lb is 75 kg
        let input = CalculationInput::new()
            .with("kgValue", 165.3465)
            .with_unit("kgValue", "lb");
        let r = KgToStoneCalculator::calculate(&input);
        assert_eq!(r.formatted["stonePounds"], "11 st 11 lbs");
    }

    #[test]
    fn test_negative_is_invalid() {
        let r = KgToStoneCalculator::calculate(&CalculationInput::new().with("kgValue", -1.0));
        assert!(!r.is_valid);
        assert_eq!(r.summary, "");
    }

    #[test]
    fn test_config_is_valid() {
        KgToStoneCalculator::config().validate().unwrap();
    }
}
