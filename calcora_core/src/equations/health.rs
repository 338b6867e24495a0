//! # Energy Expenditure Formulas
//!
//! Basal metabolic rate, activity-scaled expenditure, body-mass index and
//! calorie cycling. All inputs are metric: weight in kg, height in cm, age
//! in years. Outputs are kcal/day unless stated otherwise.
//!
//! ## References
//!
//! - Mifflin MD, St Jeor ST et al. (1990), Am J Clin Nutr 51:241-247
//! - Roza AM, Shizgal HM (1984), Am J Clin Nutr 40:168-182 (revised Harris-Benedict)
//! - McArdle WD, Katch FI, Katch VL, Exercise Physiology (Katch-McArdle)
//! - WHO BMI classification

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

// =============================================================================
// Domain enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Body-fat percentage assumed by Katch-McArdle when none is supplied
    pub fn estimated_body_fat_pct(self) -> f64 {
        match self {
            Sex::Male => 20.0,
            Sex::Female => 28.0,
        }
    }

    /// Lowest daily target the calorie calculator will suggest
    pub fn calorie_floor(self) -> f64 {
        match self {
            Sex::Male => 1500.0,
            Sex::Female => 1200.0,
        }
    }
}

impl FromStr for Sex {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(CalcError::invalid_input("sex", other, "Expected male or female")),
        }
    }
}

/// BMR equation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmrFormula {
    Mifflin,
    Harris,
    Katch,
}

impl BmrFormula {
    pub const ALL: &'static [BmrFormula] = &[BmrFormula::Mifflin, BmrFormula::Harris, BmrFormula::Katch];

    pub fn code(self) -> &'static str {
        match self {
            BmrFormula::Mifflin => "mifflin",
            BmrFormula::Harris => "harris",
            BmrFormula::Katch => "katch",
        }
    }
}

impl FromStr for BmrFormula {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mifflin" => Ok(BmrFormula::Mifflin),
            "harris" => Ok(BmrFormula::Harris),
            "katch" => Ok(BmrFormula::Katch),
            other => Err(CalcError::invalid_input("formula", other, "Expected mifflin, harris or katch")),
        }
    }
}

/// Physical activity level, sedentary through extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extreme,
}

impl ActivityLevel {
    pub const ALL: &'static [ActivityLevel] = &[
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::Extreme,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::Extreme => "extreme",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .iter()
            .copied()
            .find(|level| level.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::invalid_input("activityLevel", s, "Unknown activity level"))
    }
}

/// Weight goal for the calorie calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    /// Daily kcal offset from TDEE (about 0.5 kg per week)
    pub fn daily_adjustment(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 500.0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }
}

impl FromStr for Goal {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            other => Err(CalcError::invalid_input("goal", other, "Expected lose, maintain or gain")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// WHO adult cut-offs
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// BMR
// =============================================================================

/// Mifflin-St Jeor BMR
///
/// # Formulas
/// - Male:   BMR = 10·W + 6.25·H - 5·A + 5
/// - Female: BMR = 10·W + 6.25·H - 5·A - 161
#[inline]
pub fn bmr_mifflin(sex: Sex, weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Revised Harris-Benedict BMR (Roza & Shizgal, 1984)
///
/// # Formulas
/// - Male:   BMR = 88.362 + 13.397·W + 4.799·H - 5.677·A
/// - Female: BMR = 447.593 + 9.247·W + 3.098·H - 4.330·A
#[inline]
pub fn bmr_harris(sex: Sex, weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    }
}

/// Lean body mass
///
/// # Formula
/// LBM = W · (1 - BF/100)
#[inline]
pub fn lean_body_mass(weight_kg: f64, body_fat_pct: f64) -> f64 {
    weight_kg * (1.0 - body_fat_pct / 100.0)
}

/// Katch-McArdle BMR
///
/// # Formula
/// BMR = 370 + 21.6 · LBM
#[inline]
pub fn bmr_katch(lean_mass_kg: f64) -> f64 {
    370.0 + 21.6 * lean_mass_kg
}

/// Inputs shared by every BMR equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProfile {
    pub sex: Sex,
    pub age: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Measured body fat; Katch-McArdle estimates it from sex when absent
    pub body_fat_pct: Option<f64>,
}

impl BodyProfile {
    pub fn body_fat_or_estimate(&self) -> f64 {
        self.body_fat_pct
            .unwrap_or_else(|| self.sex.estimated_body_fat_pct())
    }

    pub fn lean_body_mass(&self) -> f64 {
        lean_body_mass(self.weight_kg, self.body_fat_or_estimate())
    }

    /// BMR by the selected equation
    pub fn bmr(&self, formula: BmrFormula) -> f64 {
        match formula {
            BmrFormula::Mifflin => bmr_mifflin(self.sex, self.weight_kg, self.height_cm, self.age),
            BmrFormula::Harris => bmr_harris(self.sex, self.weight_kg, self.height_cm, self.age),
            BmrFormula::Katch => bmr_katch(self.lean_body_mass()),
        }
    }

    pub fn bmi(&self) -> f64 {
        bmi(self.weight_kg, self.height_cm)
    }
}

// =============================================================================
// Expenditure, BMI, cycling
// =============================================================================

/// Total daily energy expenditure
///
/// # Formula
/// TDEE = BMR · multiplier(activity)
#[inline]
pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Body-mass index
///
/// # Formula
/// BMI = W / (H/100)²
#[inline]
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let h_m = height_cm / 100.0;
    weight_kg / (h_m * h_m)
}

/// Daily calorie target for a goal. Losing weight never goes below the
/// sex-specific floor.
pub fn goal_target(tdee: f64, goal: Goal, sex: Sex) -> f64 {
    let target = tdee + goal.daily_adjustment();
    match goal {
        Goal::Lose => target.max(sex.calorie_floor()),
        Goal::Maintain | Goal::Gain => target,
    }
}

/// Multipliers for a zigzag (calorie-cycling) week, Monday first.
pub const ZIGZAG_PATTERN: [f64; 7] = [1.0, 1.15, 0.85, 1.0, 1.2, 0.9, 0.9];

/// Spread a daily target over a zigzag week.
///
/// Each day is `round(target) · pattern[i]` rounded to whole kcal; the last
/// day absorbs the rounding residual so the week sums to exactly
/// `7 · round(target)`.
pub fn zigzag_week(daily_target: f64) -> [i64; 7] {
    let target = daily_target.round() as i64;
    let mut days = [0i64; 7];
    for (day, factor) in days.iter_mut().zip(ZIGZAG_PATTERN.iter()).take(6) {
        *day = (target as f64 * factor).round() as i64;
    }
    let first_six: i64 = days[..6].iter().sum();
    days[6] = 7 * target - first_six;
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex) -> BodyProfile {
        BodyProfile {
            sex,
            age: 30.0,
            weight_kg: 77.0,
            height_cm: 178.0,
            body_fat_pct: None,
        }
    }

    #[test]
    fn test_mifflin() {
        // 770 + 1112.5 - 150 + 5
        assert!((bmr_mifflin(Sex::Male, 77.0, 178.0, 30.0) - 1737.5).abs() < 1e-9);
        // 770 + 1112.5 - 150 - 161
        assert!((bmr_mifflin(Sex::Female, 77.0, 178.0, 30.0) - 1571.5).abs() < 1e-9);
    }

    #[test]
    fn test_harris() {
        let expected = 88.362 + 13.397 * 77.0 + 4.799 * 178.0 - 5.677 * 30.0;
        assert!((bmr_harris(Sex::Male, 77.0, 178.0, 30.0) - expected).abs() < 1e-9);
        let expected = 447.593 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 40.0;
        assert!((bmr_harris(Sex::Female, 60.0, 165.0, 40.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_katch_with_estimated_body_fat() {
        let p = profile(Sex::Male);
        // LBM = 77 * 0.8 = 61.6 ; BMR = 370 + 21.6 * 61.6
        assert!((p.lean_body_mass() - 61.6).abs() < 1e-9);
        assert!((p.bmr(BmrFormula::Katch) - 1700.56).abs() < 1e-9);

        let f = profile(Sex::Female);
        assert!((f.lean_body_mass() - 77.0 * 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_formulas_distinct() {
        let p = profile(Sex::Male);
        let values: Vec<f64> = BmrFormula::ALL.iter().map(|f| p.bmr(*f)).collect();
        assert!((values[0] - values[1]).abs() > 1.0);
        assert!((values[1] - values[2]).abs() > 1.0);
        assert!((values[0] - values[2]).abs() > 1.0);
    }

    #[test]
    fn test_tdee_multipliers() {
        assert!((tdee(1000.0, ActivityLevel::Sedentary) - 1200.0).abs() < 1e-9);
        assert!((tdee(1000.0, ActivityLevel::Light) - 1375.0).abs() < 1e-9);
        assert!((tdee(1000.0, ActivityLevel::Moderate) - 1550.0).abs() < 1e-9);
        assert!((tdee(1000.0, ActivityLevel::Active) - 1725.0).abs() < 1e-9);
        assert!((tdee(1000.0, ActivityLevel::Extreme) - 1900.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_categories() {
        let value = bmi(77.0, 178.0);
        assert!((value - 24.30).abs() < 0.01);
        assert_eq!(BmiCategory::from_bmi(value), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_goal_floor() {
        assert_eq!(goal_target(2500.0, Goal::Lose, Sex::Male), 2000.0);
        assert_eq!(goal_target(1600.0, Goal::Lose, Sex::Female), 1200.0);
        assert_eq!(goal_target(1600.0, Goal::Gain, Sex::Female), 2100.0);
        assert_eq!(goal_target(1100.0, Goal::Maintain, Sex::Female), 1100.0);
    }

    #[test]
    fn test_zigzag_preserves_weekly_total() {
        for target in [1200.0, 1737.5, 1999.4, 2345.67, 3001.0, 4999.5] {
            let week = zigzag_week(target);
            let expected = 7 * target.round() as i64;
            assert_eq!(week.iter().sum::<i64>(), expected, "target {target}");
        }
    }

    #[test]
    fn test_zigzag_shape() {
        let week = zigzag_week(2000.0);
        assert_eq!(week, [2000, 2300, 1700, 2000, 2400, 1800, 1800]);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("KATCH".parse::<BmrFormula>().unwrap(), BmrFormula::Katch);
        assert_eq!("moderate".parse::<ActivityLevel>().unwrap(), ActivityLevel::Moderate);
        assert!("couch".parse::<ActivityLevel>().is_err());
        assert!("bulk".parse::<Goal>().is_err());
    }
}
