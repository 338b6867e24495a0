//! # BMR Calculator
//!
//! Basal metabolic rate by the selected equation, lean body mass, and the
//! daily energy expenditure at each activity level.
//!
//! ## Assumptions
//!
//! - Weight and height are converted to kg/cm before any formula runs
//! - Katch-McArdle uses the supplied body fat, else 20 % (male) / 28 % (female)
//! - Lean body mass is always reported, using the same body-fat rule

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{formatted_token, Calculator, ResultKey, ResultValue, ValueReader};
use crate::config::{
    CalculatorCategory, CalculatorConfig, InfoCard, InputField, Preset, Reference, ResultFormat, ResultKind,
    UnitType,
};
use crate::equations::{tdee, ActivityLevel, BmrFormula, BodyProfile};
use crate::errors::CalcResult;
use crate::format::ValueFormatter;

pub const ID: &str = "bmr";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrParams {
    pub profile: BodyProfile,
    pub formula: BmrFormula,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrOutput {
    pub formula: BmrFormula,
    pub bmr: f64,
    pub lean_body_mass: f64,
    /// TDEE per level, in [`ActivityLevel::ALL`] order
    pub tdee: [f64; 5],
}

impl BmrOutput {
    pub fn tdee_for(&self, level: ActivityLevel) -> f64 {
        let index = ActivityLevel::ALL.iter().position(|l| *l == level).unwrap_or(0);
        self.tdee[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmrKey {
    Bmr,
    LeanBodyMass,
    Tdee(ActivityLevel),
}

impl ResultKey for BmrKey {
    const ALL: &'static [Self] = &[
        BmrKey::Bmr,
        BmrKey::LeanBodyMass,
        BmrKey::Tdee(ActivityLevel::Sedentary),
        BmrKey::Tdee(ActivityLevel::Light),
        BmrKey::Tdee(ActivityLevel::Moderate),
        BmrKey::Tdee(ActivityLevel::Active),
        BmrKey::Tdee(ActivityLevel::Extreme),
    ];

    fn id(self) -> &'static str {
        match self {
            BmrKey::Bmr => "bmr",
            BmrKey::LeanBodyMass => "leanBodyMass",
            BmrKey::Tdee(ActivityLevel::Sedentary) => "tdeeSedentary",
            BmrKey::Tdee(ActivityLevel::Light) => "tdeeLight",
            BmrKey::Tdee(ActivityLevel::Moderate) => "tdeeModerate",
            BmrKey::Tdee(ActivityLevel::Active) => "tdeeActive",
            BmrKey::Tdee(ActivityLevel::Extreme) => "tdeeExtreme",
        }
    }

    fn kind(self) -> ResultKind {
        match self {
            BmrKey::Bmr => ResultKind::Primary,
            _ => ResultKind::Secondary,
        }
    }

    fn format(self) -> ResultFormat {
        match self {
            BmrKey::LeanBodyMass => ResultFormat::Unit {
                suffix: "kg".to_string(),
                decimals: 1,
            },
            BmrKey::Bmr | BmrKey::Tdee(_) => ResultFormat::Calories,
        }
    }
}

/// Inputs shared with the calorie calculator.
pub(crate) fn body_inputs() -> Vec<InputField> {
    vec![
        InputField::select("sex", &["male", "female"]).required(),
        InputField::number("age")
            .required()
            .range(15.0, 100.0)
            .step(1.0)
            .unit(UnitType::Age),
        InputField::number("weight")
            .required()
            .range(20.0, 300.0)
            .step(0.1)
            .unit(UnitType::Weight),
        InputField::number("height")
            .required()
            .range(100.0, 250.0)
            .step(0.5)
            .unit(UnitType::Length),
    ]
}

pub(crate) fn read_profile(reader: &ValueReader<'_>, body_fat: Option<f64>) -> CalcResult<BodyProfile> {
    Ok(BodyProfile {
        sex: reader.choice("sex")?,
        age: reader.number("age")?,
        weight_kg: reader.number("weight")?,
        height_cm: reader.number("height")?,
        body_fat_pct: body_fat,
    })
}

pub struct BmrCalculator;

impl Calculator for BmrCalculator {
    const ID: &'static str = ID;
    const DEFAULT_SUMMARY: &'static str =
        "Your BMR is {bmr} ({formula}). With moderate exercise you burn about {tdee} per day.";

    type Params = BmrParams;
    type Output = BmrOutput;
    type Key = BmrKey;

    fn config() -> CalculatorConfig {
        let mut inputs = body_inputs();
        inputs.push(InputField::select("formula", &["mifflin", "harris", "katch"]).default_value("mifflin"));
        inputs.push(
            InputField::number("bodyFat")
                .range(2.0, 70.0)
                .step(0.5)
                .suffix("%")
                .unit(UnitType::Percent),
        );

        CalculatorConfig {
            id: ID.to_string(),
            version: "1.0.0".to_string(),
            category: CalculatorCategory::Health,
            icon: "flame".to_string(),
            inputs,
            results: BmrKey::slots(),
            presets: vec![
                Preset::new("averageMan", "user")
                    .with("sex", "male")
                    .with("age", 30)
                    .with("weight", 77.0)
                    .with("height", 178.0),
                Preset::new("averageWoman", "user")
                    .with("sex", "female")
                    .with("age", 30)
                    .with("weight", 63.0)
                    .with("height", 165.0),
                Preset::new("athlete", "dumbbell")
                    .with("sex", "male")
                    .with("age", 25)
                    .with("weight", 185.0)
                    .with_unit("weight", "lb")
                    .with("height", 72.0)
                    .with_unit("height", "in")
                    .with("formula", "katch")
                    .with("bodyFat", 12.0),
            ],
            info_cards: vec![
                InfoCard::showing("metabolism", "flame", &["bmr", "leanBodyMass"]),
                InfoCard::showing(
                    "activity",
                    "activity",
                    &["tdeeSedentary", "tdeeLight", "tdeeModerate", "tdeeActive", "tdeeExtreme"],
                ),
            ],
            education_sections: vec!["whatIsBmr".to_string(), "choosingFormula".to_string()],
            faqs: vec!["bmrVsTdee".to_string(), "mostAccurate".to_string()],
            references: vec![
                Reference {
                    title: "Mifflin MD et al. A new predictive equation for resting energy expenditure (1990)".to_string(),
                    url: "https://pubmed.ncbi.nlm.nih.gov/2305711/".to_string(),
                },
                Reference {
                    title: "Roza AM, Shizgal HM. The Harris Benedict equation reevaluated (1984)".to_string(),
                    url: "https://pubmed.ncbi.nlm.nih.gov/6741850/".to_string(),
                },
            ],
            related_calculators: vec!["calorie".to_string()],
        }
    }

    fn read(reader: &ValueReader<'_>) -> CalcResult<BmrParams> {
        let body_fat = reader.optional_number("bodyFat")?;
        Ok(BmrParams {
            profile: read_profile(reader, body_fat)?,
            formula: reader.choice("formula")?,
        })
    }

    fn compute(params: &BmrParams) -> CalcResult<BmrOutput> {
        let bmr = params.profile.bmr(params.formula);
        let mut table = [0.0; 5];
        for (slot, level) in table.iter_mut().zip(ActivityLevel::ALL) {
            *slot = tdee(bmr, *level);
        }
        Ok(BmrOutput {
            formula: params.formula,
            bmr,
            lean_body_mass: params.profile.lean_body_mass(),
            tdee: table,
        })
    }

    fn value(output: &BmrOutput, key: BmrKey, _fmt: &ValueFormatter<'_>) -> ResultValue {
        match key {
            BmrKey::Bmr => output.bmr.into(),
            BmrKey::LeanBodyMass => output.lean_body_mass.into(),
            BmrKey::Tdee(level) => output.tdee_for(level).into(),
        }
    }

    fn summary_tokens(
        output: &BmrOutput,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("bmr", formatted_token(formatted, "bmr")),
            ("formula", fmt.text_value(output.formula.code())),
            ("tdee", formatted_token(formatted, "tdeeModerate")),
        ]
    }

    fn metadata(output: &BmrOutput) -> Option<serde_json::Value> {
        let levels: Vec<_> = ActivityLevel::ALL
            .iter()
            .map(|level| {
                json!({
                    "level": level.code(),
                    "multiplier": level.multiplier(),
                    "calories": output.tdee_for(*level).round(),
                })
            })
            .collect();
        Some(json!({ "formula": output.formula.code(), "activityLevels": levels }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CalculationInput;

    fn male() -> CalculationInput {
        CalculationInput::new()
            .with("sex", "male")
            .with("age", 30)
            .with("weight", 77.0)
            .with("height", 178.0)
    }

    #[test]
    fn test_mifflin_default() {
        let r = BmrCalculator::calculate(&male());
        assert!(r.is_valid);
        assert!((r.number("bmr").unwrap() - 1737.5).abs() < 1e-9);
        assert_eq!(r.formatted["bmr"], "1,738 kcal");
        assert!((r.number("tdeeModerate").unwrap() - 1737.5 * 1.55).abs() < 1e-9);
    }

    #[test]
    fn test_formula_selection() {
        let harris = BmrCalculator::calculate(&male().with("formula", "harris"));
        let katch = BmrCalculator::calculate(&male().with("formula", "katch"));
        assert!((katch.number("bmr").unwrap() - 1700.56).abs() < 1e-9);
        assert!((harris.number("bmr").unwrap() - 1737.5).abs() > 1.0);
    }

    #[test]
    fn test_body_fat_changes_katch() {
        let lean = BmrCalculator::calculate(&male().with("formula", "katch").with("bodyFat", 10.0));
        // LBM = 77 * 0.9 = 69.3
        assert!((lean.number("leanBodyMass").unwrap() - 69.3).abs() < 1e-9);
        assert_eq!(lean.formatted["leanBodyMass"], "69.3 kg");
    }

    #[test]
    fn test_imperial_units_match_metric() {
        let imperial = CalculationInput::new()
            .with("sex", "male")
            .with("age", 30)
            .with("weight", 77.0 * 2.20462)
            .with_unit("weight", "lb")
            .with("height", 178.0 / 2.54)
            .with_unit("height", "in");
        let r = BmrCalculator::calculate(&imperial);
        assert!((r.number("bmr").unwrap() - 1737.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_positive_weight_is_invalid() {
        assert!(!BmrCalculator::calculate(&male().with("weight", 0.0)).is_valid);
        assert!(!BmrCalculator::calculate(&male().with("weight", -70.0)).is_valid);
    }

    #[test]
    fn test_unknown_formula_is_invalid() {
        assert!(!BmrCalculator::calculate(&male().with("formula", "cunningham")).is_valid);
    }

    #[test]
    fn test_metadata_lists_activity_levels() {
        let r = BmrCalculator::calculate(&male());
        let meta = r.metadata.unwrap();
        assert_eq!(meta["activityLevels"].as_array().unwrap().len(), 5);
        assert_eq!(meta["formula"], "mifflin");
    }

    #[test]
    fn test_config_is_valid() {
        BmrCalculator::config().validate().unwrap();
    }
}
