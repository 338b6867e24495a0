//! # Calculators
//!
//! Every calculator follows the same pattern:
//!
//! - a [`CalculatorConfig`] describing inputs, result slots and presets
//! - a typed `*Params` struct read from the raw form values
//! - a typed `*Output` struct produced by a pure `compute`
//! - a `*Key` enum naming each result slot, matched exhaustively when the
//!   output is flattened into the `values`/`formatted` maps
//!
//! The [`Calculator`] trait ties these together and [`evaluate`] runs the
//! shared pipeline: check inputs, read params, compute, format, render the
//! summary. Any missing or invalid input short-circuits to
//! [`CalculatorResults::invalid`]; nothing here panics or performs I/O.
//!
//! ## Available Calculators
//!
//! - [`discount`] - Sale price after discount and sales tax
//! - [`bmr`] - Basal metabolic rate by three equations, plus TDEE table
//! - [`calorie`] - Daily calorie target, BMI, zigzag week
//! - [`stone_to_kg`] / [`kg_to_stone`] - UK stone conversions
//! - [`budget`] - 50/30/20 budget split

pub mod bmr;
pub mod budget;
pub mod calorie;
pub mod discount;
pub mod kg_to_stone;
pub mod stone_to_kg;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{CalculatorConfig, InputField, Preset, ResultFormat, ResultKind, ResultSlot, UnitType};
use crate::errors::{CalcError, CalcResult};
use crate::format::{ValueFormatter, DEFAULT_CURRENCY};
use crate::template;

pub use crate::locale::TextContext;

pub use bmr::BmrCalculator;
pub use budget::BudgetCalculator;
pub use calorie::CalorieCalculator;
pub use discount::DiscountCalculator;
pub use kg_to_stone::KgToStoneCalculator;
pub use stone_to_kg::StoneToKgCalculator;

// ============================================================================
// Input
// ============================================================================

/// A raw form value. Numeric fields also accept numeric strings, since form
/// inputs usually arrive as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl InputValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            InputValue::Number(n) => Some(*n),
            InputValue::Text(s) => s.trim().parse::<f64>().ok(),
            InputValue::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Bool(b) => Some(*b),
            InputValue::Number(n) if *n == 0.0 => Some(false),
            InputValue::Number(n) if *n == 1.0 => Some(true),
            InputValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(true),
                "false" | "off" | "no" | "0" => Some(false),
                _ => None,
            },
            InputValue::Number(_) => None,
        }
    }

    /// An empty string counts as "unset", same as null.
    pub fn is_blank(&self) -> bool {
        matches!(self, InputValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Bool(b) => write!(f, "{b}"),
            InputValue::Number(n) => write!(f, "{n}"),
            InputValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for InputValue {
    fn from(n: f64) -> Self {
        InputValue::Number(n)
    }
}

impl From<i32> for InputValue {
    fn from(n: i32) -> Self {
        InputValue::Number(n as f64)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

/// Everything a calculation reads: raw values (null = unset), the unit the
/// user picked per field, and the active language's text maps.
///
/// ## JSON Example
///
/// ```json
/// {
///   "values": { "originalPrice": 80, "discountPercent": 40, "taxRate": null },
///   "fieldUnits": { "originalPrice": "BRL" },
///   "t": { "language": "pt", "values": {}, "formats": { "summary": "..." } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    #[serde(default)]
    pub values: BTreeMap<String, Option<InputValue>>,
    #[serde(default)]
    pub field_units: BTreeMap<String, String>,
    #[serde(default)]
    pub t: Option<TextContext>,
}

impl CalculationInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input pre-filled from a preset's values and units.
    pub fn from_preset(preset: &Preset) -> Self {
        CalculationInput {
            values: preset
                .values
                .iter()
                .map(|(k, v)| (k.clone(), Some(v.clone())))
                .collect(),
            field_units: preset.field_units.clone(),
            t: None,
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.values.insert(field.into(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, field: impl Into<String>) -> Self {
        self.values.insert(field.into(), None);
        self
    }

    pub fn with_unit(mut self, field: impl Into<String>, unit: impl Into<String>) -> Self {
        self.field_units.insert(field.into(), unit.into());
        self
    }

    pub fn with_text(mut self, text: TextContext) -> Self {
        self.t = Some(text);
        self
    }

    /// Present, non-null, non-blank value for a field.
    pub fn get(&self, field: &str) -> Option<&InputValue> {
        self.values
            .get(field)
            .and_then(Option::as_ref)
            .filter(|v| !v.is_blank())
    }

    pub fn unit(&self, field: &str) -> Option<&str> {
        self.field_units.get(field).map(String::as_str)
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
}

impl ResultValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResultValue::Number(n) => Some(*n),
            ResultValue::Text(_) => None,
        }
    }
}

impl From<f64> for ResultValue {
    fn from(n: f64) -> Self {
        ResultValue::Number(n)
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        ResultValue::Text(s)
    }
}

/// The bundle handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResults {
    /// Unrounded values keyed by result id
    pub values: BTreeMap<String, ResultValue>,
    /// Display strings keyed by result id
    pub formatted: BTreeMap<String, String>,
    pub summary: String,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CalculatorResults {
    /// Empty maps, empty summary, `is_valid = false`.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn number(&self, id: &str) -> Option<f64> {
        self.values.get(id).and_then(ResultValue::as_number)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.formatted.get(id).map(String::as_str)
    }
}

// ============================================================================
// Calculator trait
// ============================================================================

/// Names one result slot of a calculator. Implemented by a fieldless enum
/// whose `ALL` lists every variant; the config's result slots are built from
/// it, so a declared slot can never go unpopulated.
pub trait ResultKey: Copy + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn id(self) -> &'static str;

    fn format(self) -> ResultFormat;

    fn kind(self) -> ResultKind {
        ResultKind::Secondary
    }

    fn slot(self) -> ResultSlot {
        ResultSlot {
            id: self.id().to_string(),
            kind: self.kind(),
            format: self.format(),
        }
    }

    fn slots() -> Vec<ResultSlot> {
        Self::ALL.iter().map(|k| k.slot()).collect()
    }
}

/// One calculator: config plus typed, pure calculation.
pub trait Calculator {
    const ID: &'static str;

    /// English summary used when the active bundle has no usable template.
    const DEFAULT_SUMMARY: &'static str;

    type Params;
    type Output;
    type Key: ResultKey;

    fn config() -> CalculatorConfig;

    /// Read typed parameters; base units, bounds and defaults are applied by
    /// the reader.
    fn read(reader: &ValueReader<'_>) -> CalcResult<Self::Params>;

    /// Domain checks beyond field bounds, then the formulas.
    fn compute(params: &Self::Params) -> CalcResult<Self::Output>;

    /// Raw value for one slot.
    fn value(output: &Self::Output, key: Self::Key, fmt: &ValueFormatter<'_>) -> ResultValue;

    /// Tokens for the summary template; `formatted` already holds every slot.
    fn summary_tokens(
        output: &Self::Output,
        formatted: &BTreeMap<String, String>,
        fmt: &ValueFormatter<'_>,
    ) -> Vec<(&'static str, String)>;

    fn metadata(_output: &Self::Output) -> Option<serde_json::Value> {
        None
    }

    /// Evaluate against this calculator's own config.
    fn calculate(input: &CalculationInput) -> CalculatorResults {
        evaluate::<Self>(&Self::config(), input)
    }

    /// Like [`Calculator::calculate`] but reports why the input was rejected.
    fn try_calculate(input: &CalculationInput) -> CalcResult<CalculatorResults> {
        try_evaluate::<Self>(&Self::config(), input)
    }
}

/// Look up an owned formatted string for a summary token.
pub(crate) fn formatted_token(formatted: &BTreeMap<String, String>, id: &str) -> String {
    formatted.get(id).cloned().unwrap_or_default()
}

// ============================================================================
// Value reader
// ============================================================================

/// Typed access to a [`CalculationInput`], restricted to the inputs the
/// config declares.
#[derive(Debug, Clone, Copy)]
pub struct ValueReader<'a> {
    config: &'a CalculatorConfig,
    input: &'a CalculationInput,
}

impl<'a> ValueReader<'a> {
    pub fn new(config: &'a CalculatorConfig, input: &'a CalculationInput) -> Self {
        ValueReader { config, input }
    }

    fn field(&self, id: &str) -> CalcResult<&'a InputField> {
        self.config.input(id).ok_or_else(|| {
            CalcError::internal(format!("'{}' reads undeclared input '{id}'", self.config.id))
        })
    }

    /// Every required input must be present, and every present input must
    /// satisfy its field's type and bounds.
    pub fn check_all(&self) -> CalcResult<()> {
        for field in &self.config.inputs {
            match self.input.get(&field.id) {
                Some(value) => field.check(value, self.input.unit(&field.id))?,
                None if field.required => return Err(CalcError::missing_field(&field.id)),
                None => {}
            }
        }
        Ok(())
    }

    /// Supplied value, else the field's default.
    fn value(&self, field: &'a InputField) -> Option<&'a InputValue> {
        self.input.get(&field.id).or(field.default_value.as_ref())
    }

    /// A number in the field's base unit (kg, cm, ...), bounds-checked.
    pub fn number(&self, id: &str) -> CalcResult<f64> {
        self.optional_number(id)?
            .ok_or_else(|| CalcError::missing_field(id))
    }

    pub fn optional_number(&self, id: &str) -> CalcResult<Option<f64>> {
        let field = self.field(id)?;
        let Some(value) = self.value(field) else {
            return Ok(None);
        };
        let raw = value
            .as_number()
            .ok_or_else(|| CalcError::invalid_input(id, value.to_string(), "Expected a number"))?;
        // Defaults are authored in the base unit
        let unit = self.input.get(id).and_then(|_| self.input.unit(id));
        field.base_number(raw, unit).map(Some)
    }

    /// A select option parsed into its domain enum.
    pub fn choice<T>(&self, id: &str) -> CalcResult<T>
    where
        T: FromStr<Err = CalcError>,
    {
        let field = self.field(id)?;
        let value = self.value(field).ok_or_else(|| CalcError::missing_field(id))?;
        let text = value
            .as_text()
            .ok_or_else(|| CalcError::invalid_input(id, value.to_string(), "Expected an option"))?;
        text.parse()
    }

    pub fn flag(&self, id: &str) -> CalcResult<bool> {
        let field = self.field(id)?;
        match self.value(field) {
            Some(value) => value
                .as_bool()
                .ok_or_else(|| CalcError::invalid_input(id, value.to_string(), "Expected true or false")),
            None => Ok(false),
        }
    }

    /// Currency code of the first currency field, or USD.
    pub fn currency(&self) -> String {
        self.config
            .inputs
            .iter()
            .filter(|f| f.unit_type == Some(UnitType::Currency))
            .find_map(|f| self.input.unit(&f.id))
            .map(|code| code.trim().to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
    }
}

// ============================================================================
// Evaluation pipeline
// ============================================================================

/// Run a calculator, returning the reason when the input cannot be
/// evaluated.
pub fn try_evaluate<C: Calculator + ?Sized>(
    config: &CalculatorConfig,
    input: &CalculationInput,
) -> CalcResult<CalculatorResults> {
    let reader = ValueReader::new(config, input);
    reader.check_all()?;
    let params = C::read(&reader)?;
    let output = C::compute(&params)?;

    let formatter = ValueFormatter::new(input.t.as_ref(), reader.currency());
    let mut values = BTreeMap::new();
    let mut formatted = BTreeMap::new();
    for key in C::Key::ALL {
        let value = C::value(&output, *key, &formatter);
        formatted.insert(key.id().to_string(), formatter.format(&value, &key.format()));
        values.insert(key.id().to_string(), value);
    }

    let tokens = C::summary_tokens(&output, &formatted, &formatter);
    let localized = input.t.as_ref().and_then(|t| t.format("summary"));
    let summary = template::resolve(localized, C::DEFAULT_SUMMARY, &tokens);

    Ok(CalculatorResults {
        values,
        formatted,
        summary,
        is_valid: true,
        metadata: C::metadata(&output),
    })
}

/// Run a calculator; missing or invalid input yields
/// [`CalculatorResults::invalid`].
pub fn evaluate<C: Calculator + ?Sized>(config: &CalculatorConfig, input: &CalculationInput) -> CalculatorResults {
    match try_evaluate::<C>(config, input) {
        Ok(results) => results,
        Err(err) if err.is_input_error() => {
            tracing::debug!(calculator = C::ID, error = %err, "input not evaluable");
            CalculatorResults::invalid()
        }
        Err(err) => {
            tracing::warn!(calculator = C::ID, code = err.error_code(), error = %err, "calculation failed");
            CalculatorResults::invalid()
        }
    }
}
