//! # Calorie Calculator
//!
//! Daily calorie target for a weight goal, built on Mifflin-St Jeor BMR and
//! the activity multiplier, plus BMI and an optional zigzag week.
//!
//! ## Assumptions
//!
//! - Lose/gain move the target 500 kcal below/above TDEE
//! - A losing target never drops under 1500 kcal (male) / 1200 kcal (female)
//! - The weekly total is `7 · round(dailyTarget)` with or without zigzag

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::bmr::{body_inputs, read_profile};
use super::{formatted_token, Calculator, ResultKey, ResultValue, ValueReader};
use crate::config::{
    CalculatorCategory, CalculatorConfig, InfoCard, InputField, Preset, Reference, ResultFormat, ResultKind,
};
use crate::equations::{
    goal_target, tdee, zigzag_week, ActivityLevel, BmiCategory, BmrFormula, BodyProfile, Goal,
};
use crate::errors::CalcResult;
use crate::format::ValueFormatter;

pub const ID: &str = "calorie";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieParams {
    pub profile: BodyProfile,
    pub activity: ActivityLevel,
    pub goal: Goal,
    pub zigzag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieOutput {
    pub goal: Goal,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_target: f64,
    pub weekly_total: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    /// Monday-first day targets when zigzag is on
    pub zigzag: Option<[i64; 7]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalorieKey {
    DailyTarget,
    Bmr,
    Tdee,
    WeeklyTotal,
    Bmi,
    BmiCategory,
}

impl ResultKey for CalorieKey {
    const ALL: &'static [Self] = &[
        CalorieKey::DailyTarget,
        CalorieKey::Bmr,
        CalorieKey::Tdee,
        CalorieKey::WeeklyTotal,
        CalorieKey::Bmi,
        CalorieKey::BmiCategory,
    ];

    fn id(self) -> &'static str {
        match self {
            CalorieKey::DailyTarget => "dailyTarget",
            CalorieKey::Bmr => "bmr",
            CalorieKey::Tdee => "tdee",
            CalorieKey::WeeklyTotal => "weeklyTotal",
            CalorieKey::Bmi => "bmi",
            CalorieKey::BmiCategory => "bmiCategory",
        }
    }

    fn kind(self) -> ResultKind {
        match self {
            CalorieKey::DailyTarget => ResultKind::Primary,
            _ => ResultKind::Secondary,
        }
    }

    fn format(self) -> ResultFormat {
        match self {
            CalorieKey::Bmi => ResultFormat::Number { decimals: 1 },
            CalorieKey::BmiCategory => ResultFormat::Label,
            CalorieKey::DailyTarget | CalorieKey::Bmr | CalorieKey::Tdee | CalorieKey::WeeklyTotal => {
                ResultFormat::Calories
            }
        }
    }
}

pub struct CalorieCalculator;

impl Calculator for CalorieCalculator {
    const ID: &'static str = ID;
    const DEFAULT_SUMMARY: &'static str =
        "Eat about {target} per day to {goal}. Your BMI is {bmi} ({category}).";

    type Params = CalorieParams;
    type Output = CalorieOutput;
    type Key = CalorieKey;

    fn config() -> CalculatorConfig {
        let mut inputs = body_inputs();
        inputs.push(
            InputField::select("activityLevel", &["sedentary", "light", "moderate", "active", "extreme"])
                .default_value("moderate"),
        );
        inputs.push(InputField::select("goal", &["lose", "maintain", "gain"]).default_value("maintain"));
        inputs.push(InputField::toggle("zigzag").default_value(false));

        CalculatorConfig {
            id: ID.to_string(),
            version: "1.0.0".to_string(),
            category: CalculatorCategory::Health,
            icon: "apple".to_string(),
            inputs,
            results: CalorieKey::slots(),
            presets: vec![
                Preset::new("loseWeight", "trending-down")
                    .with("sex", "female")
                    .with("age", 35)
                    .with("weight", 72.0)
                    .with("height", 165.0)
                    .with("activityLevel", "light")
                    .with("goal", "lose"),
                Preset::new("maintain", "minus")
                    .with("sex", "male")
                    .with("age", 30)
                    .with("weight", 77.0)
                    .with("height", 178.0)
                    .with("activityLevel", "moderate")
                    .with("goal", "maintain"),
                Preset::new("bulk", "trending-up")
                    .with("sex", "male")
                    .with("age", 24)
                    .with("weight", 11.5)
                    .with_unit("weight", "st")
                    .with("height", 5.9)
                    .with_unit("height", "ft")
                    .with("activityLevel", "active")
                    .with("goal", "gain")
                    .with("zigzag", true),
            ],
            info_cards: vec![
                InfoCard::showing("energy", "flame", &["bmr", "tdee", "dailyTarget"]),
                InfoCard::showing("body", "scale", &["bmi", "bmiCategory"]),
            ],
            education_sections: vec!["energyBalance".to_string(), "zigzagDieting".to_string()],
            faqs: vec!["safeDeficit".to_string(), "whyFloor".to_string()],
            references: vec![Reference {
                title: "WHO: Body mass index".to_string(),
                url: "https://www.who.int/data/gho/data/themes/topics/topic-details/GHO/body-mass-index".to_string(),
            }],
            related_calculators: vec!["bmr".to_string(), "kg-to-stone".to_string()],
        }
    }

    fn read(reader: &ValueReader<'_>) -> CalcResult<CalorieParams> {
        Ok(CalorieParams {
            profile: read_profile(reader, None)?,
            activity: reader.choice("activityLevel")?,
            goal: reader.choice("goal")?,
            zigzag: reader.flag("zigzag")?,
        })
    }

    fn compute(params: &CalorieParams) -> CalcResult<CalorieOutput> {
        let profile = &params.profile;
        let bmr = profile.bmr(BmrFormula::Mifflin);
        let tdee = tdee(bmr, params.activity);
        let daily_target = goal_target(tdee, params.goal, profile.sex);
        let bmi = profile.bmi();

        Ok(CalorieOutput {
            goal: params.goal,
            bmr,
            tdee,
            daily_target,
            weekly_total: 7.0 * daily_target.round(),
            bmi,
            bmi_category: BmiCategory::from_bmi(bmi),
            zigzag: params.zigzag.then(|| zigzag_week(daily_target)),
        })
    }

    fn value(output: &CalorieOutput, key: CalorieKey, _fmt: &ValueFormatter<'_>) -> ResultValue {
        match key {
            CalorieKey::DailyTarget => output.daily_target.into(),
            CalorieKey::Bmr => output.bmr.into(),
            CalorieKey::Tdee => output.tdee.into(),
            CalorieKey::WeeklyTotal => output.weekly_total.into(),
            CalorieKey::Bmi => output.bmi.into(),
            CalorieKey::BmiCategory => ResultValue::Text(output.bmi_category.code().to_string()),
        }
    }

    fn summary_tokens(
        output: &CalorieOutput,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("target", formatted_token(formatted, "dailyTarget")),
            ("goal", fmt.text_value(output.goal.code())),
            ("bmi", formatted_token(formatted, "bmi")),
            ("category", formatted_token(formatted, "bmiCategory")),
        ]
    }

    fn metadata(output: &CalorieOutput) -> Option<serde_json::Value> {
        let week = output.zigzag?;
        Some(json!({
            "zigzag": week,
            "weeklyTotal": week.iter().sum::<i64>(),
        }))
    }
}
