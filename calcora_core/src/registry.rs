//! # Calculator Registry
//!
//! The catalog of every calculator, keyed by id. Configs are built once on
//! first use and shared; dispatch goes through [`CalculatorKind`] so each
//! call lands on the typed calculator without boxing.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::calculations::CalculationInput;
//! use calcora_core::locale::Language;
//! use calcora_core::registry::REGISTRY;
//!
//! let input = CalculationInput::new()
//!     .with("originalPrice", 80.0)
//!     .with("discountPercent", 40.0)
//!     .with("taxRate", 8.0)
//!     .with_text(REGISTRY.text_context("discount", Language::En).unwrap());
//!
//! let results = REGISTRY.calculate("discount", &input).unwrap();
//! assert_eq!(results.formatted["finalPrice"], "$51.84");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::calculations::{
    evaluate, try_evaluate, BmrCalculator, BudgetCalculator, CalculationInput, Calculator, CalculatorResults,
    CalorieCalculator, DiscountCalculator, KgToStoneCalculator, StoneToKgCalculator, TextContext,
};
use crate::config::CalculatorConfig;
use crate::errors::{CalcError, CalcResult};
use crate::locale::{Language, LocaleStore, LOCALES};

/// Every calculator the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorKind {
    Discount,
    Bmr,
    Calorie,
    StoneToKg,
    KgToStone,
    Budget,
}

impl CalculatorKind {
    pub const ALL: &'static [CalculatorKind] = &[
        CalculatorKind::Discount,
        CalculatorKind::Bmr,
        CalculatorKind::Calorie,
        CalculatorKind::StoneToKg,
        CalculatorKind::KgToStone,
        CalculatorKind::Budget,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CalculatorKind::Discount => DiscountCalculator::ID,
            CalculatorKind::Bmr => BmrCalculator::ID,
            CalculatorKind::Calorie => CalorieCalculator::ID,
            CalculatorKind::StoneToKg => StoneToKgCalculator::ID,
            CalculatorKind::KgToStone => KgToStoneCalculator::ID,
            CalculatorKind::Budget => BudgetCalculator::ID,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == id)
    }

    pub fn config(self) -> CalculatorConfig {
        match self {
            CalculatorKind::Discount => DiscountCalculator::config(),
            CalculatorKind::Bmr => BmrCalculator::config(),
            CalculatorKind::Calorie => CalorieCalculator::config(),
            CalculatorKind::StoneToKg => StoneToKgCalculator::config(),
            CalculatorKind::KgToStone => KgToStoneCalculator::config(),
            CalculatorKind::Budget => BudgetCalculator::config(),
        }
    }

    /// English summary template compiled into the calculator.
    pub fn default_summary(self) -> &'static str {
        match self {
            CalculatorKind::Discount => DiscountCalculator::DEFAULT_SUMMARY,
            CalculatorKind::Bmr => BmrCalculator::DEFAULT_SUMMARY,
            CalculatorKind::Calorie => CalorieCalculator::DEFAULT_SUMMARY,
            CalculatorKind::StoneToKg => StoneToKgCalculator::DEFAULT_SUMMARY,
            CalculatorKind::KgToStone => KgToStoneCalculator::DEFAULT_SUMMARY,
            CalculatorKind::Budget => BudgetCalculator::DEFAULT_SUMMARY,
        }
    }

    fn evaluate(self, config: &CalculatorConfig, input: &CalculationInput) -> CalculatorResults {
        match self {
            CalculatorKind::Discount => evaluate::<DiscountCalculator>(config, input),
            CalculatorKind::Bmr => evaluate::<BmrCalculator>(config, input),
            CalculatorKind::Calorie => evaluate::<CalorieCalculator>(config, input),
            CalculatorKind::StoneToKg => evaluate::<StoneToKgCalculator>(config, input),
            CalculatorKind::KgToStone => evaluate::<KgToStoneCalculator>(config, input),
            CalculatorKind::Budget => evaluate::<BudgetCalculator>(config, input),
        }
    }

    fn try_evaluate(self, config: &CalculatorConfig, input: &CalculationInput) -> CalcResult<CalculatorResults> {
        match self {
            CalculatorKind::Discount => try_evaluate::<DiscountCalculator>(config, input),
            CalculatorKind::Bmr => try_evaluate::<BmrCalculator>(config, input),
            CalculatorKind::Calorie => try_evaluate::<CalorieCalculator>(config, input),
            CalculatorKind::StoneToKg => try_evaluate::<StoneToKgCalculator>(config, input),
            CalculatorKind::KgToStone => try_evaluate::<KgToStoneCalculator>(config, input),
            CalculatorKind::Budget => try_evaluate::<BudgetCalculator>(config, input),
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    kind: CalculatorKind,
    config: CalculatorConfig,
}

/// Catalog of calculators with their configs.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<Entry>,
}

/// The built-in catalog.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

impl Registry {
    pub fn builtin() -> Self {
        let entries: Vec<Entry> = CalculatorKind::ALL
            .iter()
            .map(|kind| Entry {
                kind: *kind,
                config: kind.config(),
            })
            .collect();
        tracing::info!(calculators = entries.len(), "calculator registry built");
        Registry { entries }
    }

    fn entry(&self, id: &str) -> CalcResult<&Entry> {
        self.entries
            .iter()
            .find(|e| e.config.id == id)
            .ok_or_else(|| CalcError::calculator_not_found(id))
    }

    pub fn get(&self, id: &str) -> Option<CalculatorKind> {
        self.entry(id).ok().map(|e| e.kind)
    }

    pub fn config(&self, id: &str) -> CalcResult<&CalculatorConfig> {
        self.entry(id).map(|e| &e.config)
    }

    /// Configs in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &CalculatorConfig> {
        self.entries.iter().map(|e| &e.config)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.config.id.as_str())
    }

    /// Run a calculator. Only an unknown id is an error; bad input yields
    /// an invalid result bundle.
    pub fn calculate(&self, id: &str, input: &CalculationInput) -> CalcResult<CalculatorResults> {
        let entry = self.entry(id)?;
        Ok(entry.kind.evaluate(&entry.config, input))
    }

    /// Run a calculator, reporting why an input was rejected.
    pub fn try_calculate(&self, id: &str, input: &CalculationInput) -> CalcResult<CalculatorResults> {
        let entry = self.entry(id)?;
        entry.kind.try_evaluate(&entry.config, input)
    }

    /// The input a preset fills in, with the language's text attached.
    pub fn preset_input(&self, id: &str, preset_id: &str, language: Language) -> CalcResult<CalculationInput> {
        let entry = self.entry(id)?;
        let preset = entry
            .config
            .preset(preset_id)
            .ok_or_else(|| CalcError::preset_not_found(id, preset_id))?;
        Ok(CalculationInput::from_preset(preset).with_text(LOCALES.text_context(id, language)))
    }

    pub fn run_preset(&self, id: &str, preset_id: &str, language: Language) -> CalcResult<CalculatorResults> {
        let input = self.preset_input(id, preset_id, language)?;
        self.calculate(id, &input)
    }

    /// `values`/`formats` maps handed to a calculation.
    pub fn text_context(&self, id: &str, language: Language) -> CalcResult<TextContext> {
        self.entry(id)?;
        Ok(LOCALES.text_context(id, language))
    }

    /// Validate the catalog against the embedded locale bundles.
    pub fn validate(&self) -> CalcResult<()> {
        self.validate_with(&LOCALES)
    }

    /// Check every config, cross-calculator links, and that `locales` has a
    /// complete English bundle with matching placeholders in every language.
    pub fn validate_with(&self, locales: &LocaleStore) -> CalcResult<()> {
        let ids: BTreeSet<&str> = self.ids().collect();
        if ids.len() != self.entries.len() {
            return Err(CalcError::internal("duplicate calculator ids in registry"));
        }

        for entry in &self.entries {
            let config = &entry.config;
            config.validate()?;

            for related in &config.related_calculators {
                if !ids.contains(related.as_str()) {
                    return Err(CalcError::config_invalid(
                        &config.id,
                        format!("related calculator '{related}' is not registered"),
                    ));
                }
            }

            check_bundle_coverage(config, locales)?;
            locales.check_consistency(&config.id)?;
        }

        tracing::debug!(calculators = self.entries.len(), "registry validated");
        Ok(())
    }
}

/// The English bundle must label every input, result, preset, info card,
/// education section and FAQ the config declares.
fn check_bundle_coverage(config: &CalculatorConfig, locales: &LocaleStore) -> CalcResult<()> {
    let bundle = locales.get(&config.id, Language::En).ok_or_else(|| CalcError::LocaleNotFound {
        calculator: config.id.clone(),
        language: Language::En.code().to_string(),
    })?;

    let mut keys: Vec<String> = vec!["name".to_string(), "formats.summary".to_string()];
    keys.extend(config.inputs.iter().map(|f| format!("inputs.{}.label", f.id)));
    keys.extend(config.results.iter().map(|r| format!("results.{}.label", r.id)));
    keys.extend(config.presets.iter().map(|p| format!("presets.{}", p.id)));
    keys.extend(config.info_cards.iter().map(|c| format!("infoCards.{}", c.id)));
    keys.extend(config.education_sections.iter().map(|s| format!("education.{s}.title")));
    keys.extend(config.faqs.iter().map(|q| format!("faqs.{q}.question")));

    match keys.iter().find(|key| bundle.lookup(key).is_none()) {
        Some(missing) => Err(CalcError::config_invalid(
            &config.id,
            format!("English bundle has no text for '{missing}'"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for kind in CalculatorKind::ALL {
            assert_eq!(CalculatorKind::from_id(kind.id()), Some(*kind));
        }
        assert_eq!(CalculatorKind::from_id("mortgage"), None);
    }

    #[test]
    fn test_lookup() {
        let registry = Registry::builtin();
        assert_eq!(registry.get("bmr"), Some(CalculatorKind::Bmr));
        assert_eq!(registry.all().count(), CalculatorKind::ALL.len());
        assert!(matches!(
            registry.config("mortgage"),
            Err(CalcError::CalculatorNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_preset() {
        let err = REGISTRY.run_preset("discount", "cyberMonday", Language::En).unwrap_err();
        assert!(matches!(err, CalcError::PresetNotFound { .. }));
    }

    #[test]
    fn test_calculate_invalid_input_is_not_an_error() {
        let results = REGISTRY.calculate("discount", &CalculationInput::new()).unwrap();
        assert!(!results.is_valid);
        assert!(REGISTRY.try_calculate("discount", &CalculationInput::new()).is_err());
    }

    #[test]
    fn test_missing_bundle_fails_validation() {
        let registry = Registry::builtin();
        let err = registry.validate_with(&LocaleStore::default()).unwrap_err();
        assert!(matches!(err, CalcError::LocaleNotFound { .. }));
    }

    #[test]
    fn test_builtin_validates() {
        REGISTRY.validate().unwrap();
    }
}
