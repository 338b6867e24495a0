//! # Calculator Configuration
//!
//! The declarative half of a calculator: which inputs to collect, with what
//! bounds and units, which result slots the calculation fills, the preset
//! library, and the ids of the static display content (info cards,
//! education sections, FAQs) whose text lives in the locale bundles.
//!
//! A config is authored once in code and never mutated. [`CalculatorConfig::validate`]
//! checks the invariants that tie its parts together.
//!
//! ## JSON Example (one input field)
//!
//! ```json
//! {
//!   "id": "discountPercent",
//!   "inputType": { "type": "Number" },
//!   "defaultValue": 20,
//!   "min": 0,
//!   "max": 100,
//!   "step": 1,
//!   "suffix": "%",
//!   "unitType": "Percent",
//!   "required": true
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calculations::InputValue;
use crate::errors::{CalcError, CalcResult};
use crate::format::currency_info;
use crate::units::{LengthUnit, WeightUnit};

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorCategory {
    Finance,
    Health,
    Conversion,
}

impl CalculatorCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculatorCategory::Finance => "Finance",
            CalculatorCategory::Health => "Health & Fitness",
            CalculatorCategory::Conversion => "Unit Conversion",
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    Number,
    Select { options: Vec<String> },
    Toggle,
}

/// Physical meaning of a numeric input. Weight and length fields accept a
/// per-field unit in `field_units`; bounds are always in the base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Weight,
    Length,
    Currency,
    Percent,
    Age,
    Energy,
}

impl UnitType {
    pub fn base_unit(self) -> &'static str {
        match self {
            UnitType::Weight => "kg",
            UnitType::Length => "cm",
            UnitType::Currency => "USD",
            UnitType::Percent => "%",
            UnitType::Age => "years",
            UnitType::Energy => "kcal",
        }
    }

    /// Convert a raw value in `unit` to the base unit.
    pub fn to_base(self, value: f64, unit: Option<&str>) -> CalcResult<f64> {
        let Some(unit) = unit else {
            return Ok(value);
        };
        match self {
            UnitType::Weight => Ok(unit.parse::<WeightUnit>()?.to_kilograms(value).value()),
            UnitType::Length => Ok(unit.parse::<LengthUnit>()?.to_centimeters(value).value()),
            UnitType::Currency => {
                // Money is never converted, the code only picks the symbol
                let unit = unit.trim();
                if unit.len() != 3 || !unit.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(CalcError::invalid_input("currency", unit, "Not an ISO 4217 code"));
                }
                if currency_info(unit).is_none() {
                    tracing::debug!(currency = unit, "no symbol for currency, code will be shown");
                }
                Ok(value)
            }
            UnitType::Percent | UnitType::Age | UnitType::Energy => Ok(value),
        }
    }
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub id: String,
    pub input_type: InputType,
    #[serde(default)]
    pub default_value: Option<InputValue>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub unit_type: Option<UnitType>,
    /// Required fields have no sensible domain default; a missing value
    /// makes the whole result invalid.
    pub required: bool,
}

impl InputField {
    fn new(id: impl Into<String>, input_type: InputType) -> Self {
        InputField {
            id: id.into(),
            input_type,
            default_value: None,
            min: None,
            max: None,
            step: None,
            suffix: None,
            unit_type: None,
            required: false,
        }
    }

    pub fn number(id: impl Into<String>) -> Self {
        Self::new(id, InputType::Number)
    }

    pub fn select(id: impl Into<String>, options: &[&str]) -> Self {
        Self::new(
            id,
            InputType::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        )
    }

    pub fn toggle(id: impl Into<String>) -> Self {
        Self::new(id, InputType::Toggle)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn default_value(mut self, value: impl Into<InputValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn unit(mut self, unit_type: UnitType) -> Self {
        self.unit_type = Some(unit_type);
        self
    }

    /// Check a number already converted to the base unit against the bounds.
    pub fn check_bounds(&self, value: f64) -> CalcResult<()> {
        if !value.is_finite() {
            return Err(CalcError::invalid_input(&self.id, value.to_string(), "Value must be a finite number"));
        }
        if let Some(min) = self.min {
            if value < min {
                return Err(CalcError::invalid_input(
                    &self.id,
                    value.to_string(),
                    format!("Value must be at least {min}"),
                ));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(CalcError::invalid_input(
                    &self.id,
                    value.to_string(),
                    format!("Value must be at most {max}"),
                ));
            }
        }
        Ok(())
    }

    /// Convert a raw number in `unit` to the base unit and bounds-check it.
    pub fn base_number(&self, raw: f64, unit: Option<&str>) -> CalcResult<f64> {
        let value = match self.unit_type {
            Some(unit_type) => unit_type
                .to_base(raw, unit)
                .map_err(|_| CalcError::invalid_input(&self.id, unit.unwrap_or_default(), "Unsupported unit"))?,
            None => raw,
        };
        self.check_bounds(value)?;
        Ok(value)
    }

    /// Check that a present, non-blank value matches this field's type and
    /// constraints.
    pub fn check(&self, value: &InputValue, unit: Option<&str>) -> CalcResult<()> {
        match &self.input_type {
            InputType::Number => {
                let raw = value.as_number().ok_or_else(|| {
                    CalcError::invalid_input(&self.id, value.to_string(), "Expected a number")
                })?;
                self.base_number(raw, unit).map(|_| ())
            }
            InputType::Select { options } => {
                let choice = value.as_text().ok_or_else(|| {
                    CalcError::invalid_input(&self.id, value.to_string(), "Expected an option")
                })?;
                if options.iter().any(|o| o == choice.trim()) {
                    Ok(())
                } else {
                    Err(CalcError::invalid_input(
                        &self.id,
                        choice,
                        format!("Expected one of: {}", options.join(", ")),
                    ))
                }
            }
            InputType::Toggle => value.as_bool().map(|_| ()).ok_or_else(|| {
                CalcError::invalid_input(&self.id, value.to_string(), "Expected true or false")
            }),
        }
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    Primary,
    Secondary,
}

/// How a result value is turned into a display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResultFormat {
    /// Currency symbol prefix, currency minor digits
    Currency,
    Number { decimals: u8 },
    Percent { decimals: u8 },
    /// Number followed by a localized suffix looked up under `suffix`
    Unit { suffix: String, decimals: u8 },
    /// Whole kilocalories
    Calories,
    /// Preformatted text
    Text,
    /// Raw code in `values`, shown as its label from the `values` bundle
    Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSlot {
    pub id: String,
    pub kind: ResultKind,
    pub format: ResultFormat,
}

// ============================================================================
// Presets and display content
// ============================================================================

/// A named example input set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub icon: String,
    pub values: BTreeMap<String, InputValue>,
    #[serde(default)]
    pub field_units: BTreeMap<String, String>,
}

impl Preset {
    pub fn new(id: impl Into<String>, icon: impl Into<String>) -> Self {
        Preset {
            id: id.into(),
            icon: icon.into(),
            values: BTreeMap::new(),
            field_units: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn with_unit(mut self, field: impl Into<String>, unit: impl Into<String>) -> Self {
        self.field_units.insert(field.into(), unit.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoItem {
    /// Key into the bundle's `results` labels
    pub label_key: String,
    /// Result id whose formatted value is shown
    pub value_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoCard {
    pub id: String,
    pub icon: String,
    pub items: Vec<InfoItem>,
}

impl InfoCard {
    /// Card whose items show the given result ids under their own labels.
    pub fn showing(id: impl Into<String>, icon: impl Into<String>, result_ids: &[&str]) -> Self {
        InfoCard {
            id: id.into(),
            icon: icon.into(),
            items: result_ids
                .iter()
                .map(|r| InfoItem {
                    label_key: format!("results.{r}.label"),
                    value_key: r.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
}

// ============================================================================
// Calculator config
// ============================================================================

/// Declarative descriptor of one calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorConfig {
    pub id: String,
    pub version: String,
    pub category: CalculatorCategory,
    pub icon: String,
    pub inputs: Vec<InputField>,
    pub results: Vec<ResultSlot>,
    pub presets: Vec<Preset>,
    pub info_cards: Vec<InfoCard>,
    pub education_sections: Vec<String>,
    pub faqs: Vec<String>,
    pub references: Vec<Reference>,
    pub related_calculators: Vec<String>,
}

impl CalculatorConfig {
    pub fn input(&self, id: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.id == id)
    }

    pub fn result(&self, id: &str) -> Option<&ResultSlot> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn primary_results(&self) -> impl Iterator<Item = &ResultSlot> {
        self.results.iter().filter(|r| r.kind == ResultKind::Primary)
    }

    /// Check the invariants that tie inputs, results, presets and info
    /// cards together. Links to other calculators are checked by the
    /// registry, which knows the full catalog.
    pub fn validate(&self) -> CalcResult<()> {
        let fail = |reason: String| CalcError::config_invalid(&self.id, reason);

        unique_ids(self.inputs.iter().map(|f| f.id.as_str()))
            .map_err(|id| fail(format!("duplicate input '{id}'")))?;
        unique_ids(self.results.iter().map(|r| r.id.as_str()))
            .map_err(|id| fail(format!("duplicate result '{id}'")))?;
        unique_ids(self.presets.iter().map(|p| p.id.as_str()))
            .map_err(|id| fail(format!("duplicate preset '{id}'")))?;

        if self.primary_results().next().is_none() {
            return Err(fail("no primary result".to_string()));
        }

        for field in &self.inputs {
            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    return Err(fail(format!("input '{}' has min > max", field.id)));
                }
            }
            if let Some(default) = &field.default_value {
                field
                    .check(default, None)
                    .map_err(|e| fail(format!("default of '{}': {e}", field.id)))?;
            }
        }

        for preset in &self.presets {
            for (id, value) in &preset.values {
                let field = self
                    .input(id)
                    .ok_or_else(|| fail(format!("preset '{}' sets unknown input '{id}'", preset.id)))?;
                field
                    .check(value, preset.field_units.get(id).map(String::as_str))
                    .map_err(|e| fail(format!("preset '{}': {e}", preset.id)))?;
            }
            for field in self.inputs.iter().filter(|f| f.required) {
                if !preset.values.contains_key(&field.id) {
                    return Err(fail(format!(
                        "preset '{}' leaves required input '{}' unset",
                        preset.id, field.id
                    )));
                }
            }
        }

        for card in &self.info_cards {
            for item in &card.items {
                if self.result(&item.value_key).is_none() {
                    return Err(fail(format!(
                        "info card '{}' shows unknown result '{}'",
                        card.id, item.value_key
                    )));
                }
            }
        }

        if self.related_calculators.iter().any(|r| *r == self.id) {
            return Err(fail("calculator lists itself as related".to_string()));
        }

        Ok(())
    }
}

fn unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(id.to_string());
        }
    }
    Ok(())
}
