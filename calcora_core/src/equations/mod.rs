//! # Calculator Equations
//!
//! Every closed-form formula the calculators use, kept apart from input
//! parsing and formatting so each can be checked against its source.
//!
//! ## Modules
//!
//! - [`health`] - BMR (Mifflin-St Jeor, Harris-Benedict, Katch-McArdle), TDEE, BMI, zigzag cycling
//! - [`finance`] - Discount/tax breakdown, 50/30/20 budget targets
//!
//! Weight and length conversions live in [`crate::units`].

pub mod finance;
pub mod health;

pub use finance::{
    budget_targets,
    discount_breakdown,
    percent_of,
    BudgetTargets,
    DiscountBreakdown,
};

pub use health::{
    bmi,
    bmr_harris,
    bmr_katch,
    bmr_mifflin,
    goal_target,
    lean_body_mass,
    tdee,
    zigzag_week,
    ActivityLevel,
    BmiCategory,
    BmrFormula,
    BodyProfile,
    Goal,
    Sex,
    ZIGZAG_PATTERN,
};
