//! # calcora_core - Calculator Configuration and Evaluation Engine
//!
//! `calcora_core` holds the calculators behind Calcora: a declarative config
//! per calculator (inputs, presets, result slots, display content) paired
//! with a pure function that turns raw form values into formatted, localized
//! results. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: calculations are pure functions of their input
//! - **JSON-First**: every public type implements Serialize/Deserialize
//! - **Never Panics on Input**: bad input yields `isValid: false`
//! - **Localized**: text comes from per-language bundles with English fallback
//!
//! ## Quick Start
//!
//! ```rust
//! use calcora_core::calculations::CalculationInput;
//! use calcora_core::locale::Language;
//! use calcora_core::registry::REGISTRY;
//!
//! let input = CalculationInput::new()
//!     .with("kgValue", 75.0)
//!     .with_text(REGISTRY.text_context("kg-to-stone", Language::En).unwrap());
//! let results = REGISTRY.calculate("kg-to-stone", &input).unwrap();
//!
//! assert!(results.is_valid);
//! assert_eq!(results.formatted["stonePounds"], "11 st 11 lbs");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The calculators and the shared evaluation pipeline
//! - [`equations`] - Closed-form health and finance formulas
//! - [`config`] - Calculator configuration schema and invariants
//! - [`registry`] - Catalog of calculators, dispatch, presets
//! - [`locale`] - Language bundles and the locale store
//! - [`template`] - `{token}` substitution
//! - [`format`] - Currency and number formatting
//! - [`units`] - Type-safe unit wrappers
//! - [`session`] - One-shot tracking and history payloads
//! - [`settings`] - Engine defaults from file and environment
//! - [`catalog`] - Markdown catalog generation
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod config;
pub mod equations;
pub mod errors;
pub mod format;
pub mod locale;
pub mod registry;
pub mod session;
pub mod settings;
pub mod template;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationInput, Calculator, CalculatorResults, InputValue, ResultValue};
pub use errors::{CalcError, CalcResult};
pub use locale::{Language, LOCALES};
pub use registry::{CalculatorKind, Registry, REGISTRY};
pub use settings::EngineSettings;
