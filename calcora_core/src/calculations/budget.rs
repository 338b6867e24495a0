//! # 50/30/20 Budget Calculator
//!
//! Splits monthly net income into needs (50 %), wants (30 %) and savings
//! (20 %) targets and compares them with actual spending.
//!
//! ## Assumptions
//!
//! - Amounts are monthly and in one currency
//! - Actual percentages are 0 when income is 0
//! - `remaining` may be negative when spending exceeds income

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{formatted_token, Calculator, ResultKey, ResultValue, ValueReader};
use crate::config::{
    CalculatorCategory, CalculatorConfig, InfoCard, InputField, Preset, Reference, ResultFormat, ResultKind,
    UnitType,
};
use crate::equations::finance::{NEEDS_SHARE_PCT, SAVINGS_SHARE_PCT, WANTS_SHARE_PCT};
use crate::equations::{budget_targets, percent_of, BudgetTargets};
use crate::errors::CalcResult;
use crate::format::ValueFormatter;

pub const ID: &str = "budget";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetParams {
    pub income: f64,
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetOutput {
    pub params: BudgetParams,
    pub targets: BudgetTargets,
    pub needs_pct: f64,
    pub wants_pct: f64,
    pub savings_pct: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetKey {
    NeedsTarget,
    WantsTarget,
    SavingsTarget,
    NeedsPercent,
    WantsPercent,
    SavingsPercent,
    Remaining,
}

impl ResultKey for BudgetKey {
    const ALL: &'static [Self] = &[
        BudgetKey::NeedsTarget,
        BudgetKey::WantsTarget,
        BudgetKey::SavingsTarget,
        BudgetKey::NeedsPercent,
        BudgetKey::WantsPercent,
        BudgetKey::SavingsPercent,
        BudgetKey::Remaining,
    ];

    fn id(self) -> &'static str {
        match self {
            BudgetKey::NeedsTarget => "needsTarget",
            BudgetKey::WantsTarget => "wantsTarget",
            BudgetKey::SavingsTarget => "savingsTarget",
            BudgetKey::NeedsPercent => "needsPercent",
            BudgetKey::WantsPercent => "wantsPercent",
            BudgetKey::SavingsPercent => "savingsPercent",
            BudgetKey::Remaining => "remaining",
        }
    }

    fn kind(self) -> ResultKind {
        match self {
            BudgetKey::NeedsTarget | BudgetKey::WantsTarget | BudgetKey::SavingsTarget => ResultKind::Primary,
            _ => ResultKind::Secondary,
        }
    }

    fn format(self) -> ResultFormat {
        match self {
            BudgetKey::NeedsPercent | BudgetKey::WantsPercent | BudgetKey::SavingsPercent => {
                ResultFormat::Percent { decimals: 1 }
            }
            BudgetKey::NeedsTarget | BudgetKey::WantsTarget | BudgetKey::SavingsTarget | BudgetKey::Remaining => {
                ResultFormat::Currency
            }
        }
    }
}

fn money_input(id: &str) -> InputField {
    InputField::number(id)
        .range(0.0, 1_000_000_000.0)
        .step(10.0)
        .unit(UnitType::Currency)
}

pub struct BudgetCalculator;

impl Calculator for BudgetCalculator {
    const ID: &'static str = ID;
    const DEFAULT_SUMMARY: &'static str =
        "Of {income}, aim for {needs} on needs, {wants} on wants and {savings} in savings. Left over: {remaining}.";

    type Params = BudgetParams;
    type Output = BudgetOutput;
    type Key = BudgetKey;

    fn config() -> CalculatorConfig {
        CalculatorConfig {
            id: ID.to_string(),
            version: "1.0.0".to_string(),
            category: CalculatorCategory::Finance,
            icon: "wallet".to_string(),
            inputs: vec![
                money_input("monthlyIncome").required(),
                money_input("needsSpending").required(),
                money_input("wantsSpending").required(),
                money_input("savingsAmount").default_value(0.0),
            ],
            results: BudgetKey::slots(),
            presets: vec![
                Preset::new("student", "graduation-cap")
                    .with("monthlyIncome", 1500.0)
                    .with("needsSpending", 900.0)
                    .with("wantsSpending", 400.0)
                    .with("savingsAmount", 100.0),
                Preset::new("family", "home")
                    .with("monthlyIncome", 6000.0)
                    .with("needsSpending", 3200.0)
                    .with("wantsSpending", 1500.0)
                    .with("savingsAmount", 900.0),
                Preset::new("brazil", "globe")
                    .with("monthlyIncome", 4500.0)
                    .with_unit("monthlyIncome", "BRL")
                    .with("needsSpending", 2500.0)
                    .with("wantsSpending", 1200.0)
                    .with("savingsAmount", 500.0),
            ],
            info_cards: vec![
                InfoCard::showing("targets", "target", &["needsTarget", "wantsTarget", "savingsTarget"]),
                InfoCard::showing("actual", "pie-chart", &["needsPercent", "wantsPercent", "savingsPercent", "remaining"]),
            ],
            education_sections: vec!["theRule".to_string(), "needsVsWants".to_string()],
            faqs: vec!["grossOrNet".to_string(), "debtPayments".to_string()],
            references: vec![Reference {
                title: "Warren E, Tyagi A. All Your Worth (2005)".to_string(),
                url: "https://www.simonandschuster.com/books/All-Your-Worth/Elizabeth-Warren/9780743269889".to_string(),
            }],
            related_calculators: vec!["discount".to_string()],
        }
    }

    fn read(reader: &ValueReader<'_>) -> CalcResult<BudgetParams> {
        Ok(BudgetParams {
            income: reader.number("monthlyIncome")?,
            needs: reader.number("needsSpending")?,
            wants: reader.number("wantsSpending")?,
            savings: reader.number("savingsAmount")?,
        })
    }

    fn compute(p: &BudgetParams) -> CalcResult<BudgetOutput> {
        Ok(BudgetOutput {
            params: *p,
            targets: budget_targets(p.income),
            needs_pct: percent_of(p.needs, p.income),
            wants_pct: percent_of(p.wants, p.income),
            savings_pct: percent_of(p.savings, p.income),
            remaining: p.income - p.needs - p.wants - p.savings,
        })
    }

    fn value(output: &BudgetOutput, key: BudgetKey, _fmt: &ValueFormatter<'_>) -> ResultValue {
        let value = match key {
            BudgetKey::NeedsTarget => output.targets.needs,
            BudgetKey::WantsTarget => output.targets.wants,
            BudgetKey::SavingsTarget => output.targets.savings,
            BudgetKey::NeedsPercent => output.needs_pct,
            BudgetKey::WantsPercent => output.wants_pct,
            BudgetKey::SavingsPercent => output.savings_pct,
            BudgetKey::Remaining => output.remaining,
        };
        value.into()
    }

    fn summary_tokens(
        output: &BudgetOutput,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("income", fmt.money(output.params.income)),
            ("needs", formatted_token(formatted, "needsTarget")),
            ("wants", formatted_token(formatted, "wantsTarget")),
            ("savings", formatted_token(formatted, "savingsTarget")),
            ("remaining", formatted_token(formatted, "remaining")),
        ]
    }

    fn metadata(output: &BudgetOutput) -> Option<serde_json::Value> {
        let p = &output.params;
        let t = &output.targets;
        Some(json!({
            "categories": [
                { "id": "needs", "target": t.needs, "actual": p.needs,
                  "targetPercent": NEEDS_SHARE_PCT, "actualPercent": output.needs_pct },
                { "id": "wants", "target": t.wants, "actual": p.wants,
                  "targetPercent": WANTS_SHARE_PCT, "actualPercent": output.wants_pct },
                { "id": "savings", "target": t.savings, "actual": p.savings,
                  "targetPercent": SAVINGS_SHARE_PCT, "actualPercent": output.savings_pct },
            ]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::CalculationInput;

    fn input(income: f64, needs: f64, wants: f64, savings: f64) -> CalculationInput {
        CalculationInput::new()
            .with("monthlyIncome", income)
            .with("needsSpending", needs)
            .with("wantsSpending", wants)
            .with("savingsAmount", savings)
    }

    #[test]
    fn test_targets_and_percentages() {
        let r = BudgetCalculator::calculate(&input(4000.0, 2200.0, 1000.0, 500.0));
        assert!(r.is_valid);
        assert_eq!(r.number("needsTarget"), Some(2000.0));
        assert_eq!(r.number("wantsTarget"), Some(1200.0));
        assert_eq!(r.number("savingsTarget"), Some(800.0));
        assert!((r.number("needsPercent").unwrap() - 55.0).abs() < 1e-9);
        assert_eq!(r.formatted["wantsPercent"], "25.0%");
        assert_eq!(r.number("remaining"), Some(300.0));
        assert_eq!(r.formatted["remaining"], "$300.00");
    }

    #[test]
    fn test_zero_income_guards_division() {
        let r = BudgetCalculator::calculate(&input(0.0, 100.0, 50.0, 0.0));
        assert!(r.is_valid);
        assert_eq!(r.number("needsPercent"), Some(0.0));
        assert_eq!(r.number("wantsPercent"), Some(0.0));
        assert_eq!(r.formatted["remaining"], "-$150.00");
    }

    #[test]
    fn test_savings_defaults_to_zero() {
        let input = CalculationInput::new()
            .with("monthlyIncome", 3000.0)
            .with("needsSpending", 1500.0)
            .with("wantsSpending", 900.0);
        let r = BudgetCalculator::calculate(&input);
        assert!(r.is_valid);
        assert_eq!(r.number("savingsPercent"), Some(0.0));
        assert_eq!(r.number("remaining"), Some(600.0));
    }

    #[test]
    fn test_missing_income_is_invalid() {
        let input = CalculationInput::new()
            .with_null("monthlyIncome")
            .with("needsSpending", 1500.0)
            .with("wantsSpending", 900.0);
        assert!(!BudgetCalculator::calculate(&input).is_valid);
    }

    #[test]
    fn test_config_is_valid() {
        BudgetCalculator::config().validate().unwrap();
    }
}
