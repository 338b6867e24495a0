//! # Calculator Catalog
//!
//! Renders `CALCULATORS.md`, a reference of every registered calculator:
//! inputs with their bounds and units, result slots, formulas, presets and
//! the languages it ships in. Regenerate with `cargo run --bin gen-catalog`.

use std::fmt::Write;

use crate::config::{CalculatorCategory, CalculatorConfig, InputType, ResultFormat, ResultKind};
use crate::locale::{Language, LocaleStore};
use crate::registry::{CalculatorKind, Registry};

/// Plain-text formulas shown for each calculator.
pub fn formulas(kind: CalculatorKind) -> &'static [&'static str] {
    match kind {
        CalculatorKind::Discount => &[
            "youSave = originalPrice × discountPercent / 100",
            "salePrice = originalPrice − youSave",
            "taxAmount = salePrice × taxRate / 100",
            "finalPrice = salePrice + taxAmount",
        ],
        CalculatorKind::Bmr => &[
            "Mifflin-St Jeor: 10·W + 6.25·H − 5·A + 5 (male), − 161 (female)",
            "Harris-Benedict: 88.362 + 13.397·W + 4.799·H − 5.677·A (male), 447.593 + 9.247·W + 3.098·H − 4.330·A (female)",
            "Katch-McArdle: 370 + 21.6·LBM, LBM = W·(1 − BF/100), BF defaults to 20 % / 28 %",
            "TDEE = BMR × 1.2 | 1.375 | 1.55 | 1.725 | 1.9",
        ],
        CalculatorKind::Calorie => &[
            "BMR by Mifflin-St Jeor, TDEE = BMR × activity multiplier",
            "dailyTarget = TDEE − 500 | TDEE | TDEE + 500, never below 1500 (male) / 1200 (female) when losing",
            "BMI = W / (H/100)², WHO categories at 18.5 / 25 / 30",
            "zigzag week = round(dailyTarget) × [1.0, 1.15, 0.85, 1.0, 1.2, 0.9, 0.9], last day absorbs rounding",
        ],
        CalculatorKind::StoneToKg => &[
            "kilograms = stones × 6.35029318",
            "pounds = stones × 14",
        ],
        CalculatorKind::KgToStone => &[
            "stones = kilograms / 6.35029318",
            "pounds = kilograms × 2.20462",
        ],
        CalculatorKind::Budget => &[
            "needsTarget = income × 0.50, wantsTarget = income × 0.30, savingsTarget = income × 0.20",
            "xPercent = amount / income × 100 (0 when income ≤ 0)",
            "remaining = income − needs − wants − savings",
        ],
    }
}

fn input_type_label(input_type: &InputType) -> String {
    match input_type {
        InputType::Number => "number".to_string(),
        InputType::Select { options } => format!("select ({})", options.join(", ")),
        InputType::Toggle => "toggle".to_string(),
    }
}

fn format_label(format: &ResultFormat) -> String {
    match format {
        ResultFormat::Currency => "currency".to_string(),
        ResultFormat::Number { decimals } => format!("number, {decimals} dp"),
        ResultFormat::Percent { decimals } => format!("percent, {decimals} dp"),
        ResultFormat::Unit { suffix, decimals } => format!("{suffix}, {decimals} dp"),
        ResultFormat::Calories => "kcal".to_string(),
        ResultFormat::Text => "text".to_string(),
        ResultFormat::Label => "label".to_string(),
    }
}

fn bound(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn write_calculator(out: &mut String, kind: CalculatorKind, config: &CalculatorConfig, locales: &LocaleStore) {
    let text = |key: &str| locales.text(&config.id, Language::En, key);

    let _ = writeln!(out, "### {} (`{}`)\n", text("name"), config.id);
    let description = text("seo.description");
    if description != "seo.description" {
        let _ = writeln!(out, "{description}\n");
    }

    out.push_str("**Inputs:**\n\n");
    out.push_str("| Id | Label | Type | Min | Max | Default | Unit | Required |\n");
    out.push_str("|----|-------|------|-----|-----|---------|------|----------|\n");
    for field in &config.inputs {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {} | {} | {} | {} | {} |",
            field.id,
            text(&format!("inputs.{}.label", field.id)),
            input_type_label(&field.input_type),
            bound(field.min),
            bound(field.max),
            field.default_value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
            field.unit_type.map(|u| u.base_unit()).unwrap_or("-"),
            if field.required { "yes" } else { "no" },
        );
    }
    out.push('\n');

    out.push_str("**Results:**\n\n");
    out.push_str("| Id | Label | Kind | Format |\n");
    out.push_str("|----|-------|------|--------|\n");
    for slot in &config.results {
        let kind_label = match slot.kind {
            ResultKind::Primary => "primary",
            ResultKind::Secondary => "secondary",
        };
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {} |",
            slot.id,
            text(&format!("results.{}.label", slot.id)),
            kind_label,
            format_label(&slot.format),
        );
    }
    out.push('\n');

    out.push_str("**Formulas:**\n\n");
    for formula in formulas(kind) {
        let _ = writeln!(out, "- `{formula}`");
    }
    out.push('\n');

    let _ = writeln!(out, "**Summary:** {}\n", text("formats.summary"));

    if !config.presets.is_empty() {
        let presets: Vec<String> = config
            .presets
            .iter()
            .map(|p| format!("{} (`{}`)", text(&format!("presets.{}", p.id)), p.id))
            .collect();
        let _ = writeln!(out, "**Presets:** {}\n", presets.join(", "));
    }

    let languages: Vec<&str> = locales.languages(&config.id).iter().map(|l| l.code()).collect();
    let _ = writeln!(out, "**Languages:** {}\n", languages.join(", "));

    if !config.related_calculators.is_empty() {
        let related: Vec<String> = config.related_calculators.iter().map(|r| format!("`{r}`")).collect();
        let _ = writeln!(out, "**Related:** {}\n", related.join(", "));
    }

    if !config.references.is_empty() {
        out.push_str("**References:**\n");
        for reference in &config.references {
            let _ = writeln!(out, "- [{}]({})", reference.title, reference.url);
        }
        out.push('\n');
    }
}

/// Render the full catalog.
pub fn generate_catalog_markdown(registry: &Registry, locales: &LocaleStore) -> String {
    let mut out = String::with_capacity(16_000);

    out.push_str(
        "# Calcora Calculators\n\n\
         > **Auto-generated from source code. Do not edit manually.**\n\
         >\n\
         > Regenerate with: `cargo run --bin gen-catalog`\n\n\
         Weights are in kg, heights in cm and money in the chosen currency unless a field unit says otherwise.\n\n\
         ---\n\n",
    );

    for category in [
        CalculatorCategory::Finance,
        CalculatorCategory::Health,
        CalculatorCategory::Conversion,
    ] {
        let configs: Vec<&CalculatorConfig> = registry.all().filter(|c| c.category == category).collect();
        if configs.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## {}\n", category.display_name());
        for config in configs {
            if let Some(kind) = registry.get(&config.id) {
                write_calculator(&mut out, kind, config, locales);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LOCALES;
    use crate::registry::REGISTRY;

    #[test]
    fn test_catalog_lists_every_calculator() {
        let markdown = generate_catalog_markdown(&REGISTRY, &LOCALES);
        for id in REGISTRY.ids() {
            assert!(markdown.contains(&format!("(`{id}`)")), "missing {id}");
        }
        assert!(markdown.contains("## Health & Fitness"));
        assert!(markdown.contains("kilograms = stones × 6.35029318"));
    }

    #[test]
    fn test_every_kind_has_formulas() {
        for kind in CalculatorKind::ALL {
            assert!(!formulas(*kind).is_empty());
        }
    }
}
