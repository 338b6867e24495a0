//! # Money Formulas
//!
//! Discount/tax arithmetic and the 50/30/20 budgeting rule. Amounts are in
//! whatever currency the caller uses; nothing here rounds.

use serde::{Deserialize, Serialize};

/// Price breakdown after a percentage discount and a sales tax on the
/// discounted price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub savings: f64,
    pub sale_price: f64,
    pub tax: f64,
    pub final_price: f64,
}

/// Apply a discount, then tax the discounted price.
///
/// # Formulas
/// - savings = P · d/100
/// - sale    = P - savings
/// - tax     = sale · t/100
/// - final   = sale + tax
#[inline]
pub fn discount_breakdown(price: f64, discount_pct: f64, tax_pct: f64) -> DiscountBreakdown {
    let savings = price * discount_pct / 100.0;
    let sale_price = price - savings;
    let tax = sale_price * tax_pct / 100.0;
    DiscountBreakdown {
        savings,
        sale_price,
        tax,
        final_price: sale_price + tax,
    }
}

/// Share of `part` in `whole` as a percentage; 0 when `whole <= 0`.
#[inline]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Target shares of net income under the 50/30/20 rule.
pub const NEEDS_SHARE_PCT: f64 = 50.0;
pub const WANTS_SHARE_PCT: f64 = 30.0;
pub const SAVINGS_SHARE_PCT: f64 = 20.0;

/// Recommended needs/wants/savings amounts for a net income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetTargets {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

/// # Formulas
/// - needs   = I · 0.50
/// - wants   = I · 0.30
/// - savings = I · 0.20
#[inline]
pub fn budget_targets(net_income: f64) -> BudgetTargets {
    BudgetTargets {
        needs: net_income * NEEDS_SHARE_PCT / 100.0,
        wants: net_income * WANTS_SHARE_PCT / 100.0,
        savings: net_income * SAVINGS_SHARE_PCT / 100.0,
    }
}
