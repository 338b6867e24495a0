//! # Unit Types
//!
//! Type-safe wrappers for the body-measurement units the health and
//! conversion calculators accept. They are plain `f64` newtypes so JSON stays
//! clean (just numbers) while the compiler keeps kilograms and pounds apart.
//!
//! Calculations run in metric base units (kg, cm). Values arrive in whatever
//! unit the user picked per field (`field_units`), parsed into [`WeightUnit`]
//! or [`LengthUnit`] and converted once at the input boundary.
//!
//! ## Example
//!
//! ```rust
//! use calcora_core::units::{Kilograms, Stones, StonePounds};
//!
//! let weight: Kilograms = Stones(11.0).into();
//! assert!((weight.0 - 69.853_225_0).abs() < 1e-6);
//!
//! let split = StonePounds::from_stones(Stones(11.81));
//! assert_eq!(split.to_string(), "11 st 11 lbs");
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Kilograms per stone (exact by definition of the avoirdupois pound).
pub const KG_PER_STONE: f64 = 6.35029318;

/// Pounds per stone
pub const POUNDS_PER_STONE: f64 = 14.0;

/// Pounds per kilogram, to the precision the calculators display.
pub const POUNDS_PER_KG: f64 = 2.20462;

pub const CM_PER_INCH: f64 = 2.54;

// ============================================================================
// Weight Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in pounds (avoirdupois)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

/// Mass in stones (14 lb)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stones(pub f64);

impl From<Stones> for Kilograms {
    fn from(st: Stones) -> Self {
        Kilograms(st.0 * KG_PER_STONE)
    }
}

impl From<Kilograms> for Stones {
    fn from(kg: Kilograms) -> Self {
        Stones(kg.0 / KG_PER_STONE)
    }
}

impl From<Stones> for Pounds {
    fn from(st: Stones) -> Self {
        Pounds(st.0 * POUNDS_PER_STONE)
    }
}

impl From<Kilograms> for Pounds {
    fn from(kg: Kilograms) -> Self {
        Pounds(kg.0 * POUNDS_PER_KG)
    }
}

impl From<Pounds> for Kilograms {
    fn from(lb: Pounds) -> Self {
        Kilograms(lb.0 / POUNDS_PER_KG)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Inches> for Centimeters {
    fn from(inches: Inches) -> Self {
        Centimeters(inches.0 * CM_PER_INCH)
    }
}

impl From<Centimeters> for Inches {
    fn from(cm: Centimeters) -> Self {
        Inches(cm.0 / CM_PER_INCH)
    }
}

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Feet> for Centimeters {
    fn from(ft: Feet) -> Self {
        Inches::from(ft).into()
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

// ============================================================================
// Unit selectors (parsed from `field_units`)
// ============================================================================

/// Unit the user picked for a weight field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
    St,
}

impl WeightUnit {
    /// Codes accepted in `field_units` for weight fields
    pub const CODES: &'static [&'static str] = &["kg", "lb", "lbs", "st"];

    pub fn to_kilograms(self, value: f64) -> Kilograms {
        match self {
            WeightUnit::Kg => Kilograms(value),
            WeightUnit::Lb => Pounds(value).into(),
            WeightUnit::St => Stones(value).into(),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lbs",
            WeightUnit::St => "st",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            "lb" | "lbs" => Ok(WeightUnit::Lb),
            "st" | "stone" => Ok(WeightUnit::St),
            other => Err(CalcError::invalid_input("unit", other, "Unknown weight unit")),
        }
    }
}

/// Unit the user picked for a length (height) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Cm,
    M,
    In,
    Ft,
}

impl LengthUnit {
    /// Codes accepted in `field_units` for length fields
    pub const CODES: &'static [&'static str] = &["cm", "m", "in", "ft"];

    pub fn to_centimeters(self, value: f64) -> Centimeters {
        match self {
            LengthUnit::Cm => Centimeters(value),
            LengthUnit::M => Meters(value).into(),
            LengthUnit::In => Inches(value).into(),
            LengthUnit::Ft => Feet(value).into(),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" => Ok(LengthUnit::Cm),
            "m" => Ok(LengthUnit::M),
            "in" | "inch" => Ok(LengthUnit::In),
            "ft" | "feet" => Ok(LengthUnit::Ft),
            other => Err(CalcError::invalid_input("unit", other, "Unknown length unit")),
        }
    }
}

// ============================================================================
// Stone-and-pounds display form
// ============================================================================

/// Whole stones plus whole pounds, e.g. "11 st 11 lbs".
///
/// The fractional stone is multiplied by 14 and rounded; a remainder that
/// rounds up to 14 lb carries into the next stone, so the pounds part is
/// always in `0..14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StonePounds {
    pub stones: u32,
    pub pounds: u32,
}

impl StonePounds {
    pub fn from_stones(st: Stones) -> Self {
        let value = st.0.max(0.0);
        let mut stones = value.trunc() as u32;
        let mut pounds = ((value - value.trunc()) * POUNDS_PER_STONE).round() as u32;
        if pounds >= POUNDS_PER_STONE as u32 {
            stones += 1;
            pounds -= POUNDS_PER_STONE as u32;
        }
        StonePounds { stones, pounds }
    }

    /// Render with localized unit suffixes.
    pub fn display_with(&self, stone_suffix: &str, pound_suffix: &str) -> String {
        format!("{} {} {} {}", self.stones, stone_suffix, self.pounds, pound_suffix)
    }
}

impl fmt::Display for StonePounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with("st", "lbs"))
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Kilograms);
impl_arithmetic!(Pounds);
impl_arithmetic!(Stones);
impl_arithmetic!(Centimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Inches);
impl_arithmetic!(Feet);

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_close(a: f64, b: f64) -> bool {
        ((a - b) / b).abs() < 1e-9
    }

    #[test]
    fn test_stone_kg_roundtrip() {
        for x in [0.1, 1.0, 11.0, 75.0, 250.5, 10_000.0] {
            let kg: Kilograms = Stones::from(Kilograms(x)).into();
            assert!(rel_close(kg.0, x), "kg roundtrip failed for {x}");

            let st: Stones = Kilograms::from(Stones(x)).into();
            assert!(rel_close(st.0, x), "stone roundtrip failed for {x}");
        }
    }

    #[test]
    fn test_stone_to_pounds() {
        let lb: Pounds = Stones(11.0).into();
        assert_eq!(lb.0, 154.0);
    }

    #[test]
    fn test_stone_pounds_split() {
        let split = StonePounds::from_stones(Stones(11.0));
        assert_eq!(split, StonePounds { stones: 11, pounds: 0 });

        let split = StonePounds::from_stones(Kilograms(75.0).into());
        assert_eq!(split.to_string(), "11 st 11 lbs");
    }

    #[test]
    fn test_stone_pounds_carry() {
        // 10.98 st -> 0.98 * 14 = 13.72 -> 14 lb, carried into the next stone
        let split = StonePounds::from_stones(Stones(10.98));
        assert_eq!(split, StonePounds { stones: 11, pounds: 0 });
    }

    #[test]
    fn test_length_conversions() {
        let cm: Centimeters = Inches(70.0).into();
        assert!((cm.0 - 177.8).abs() < 1e-9);

        let cm = LengthUnit::Ft.to_centimeters(6.0);
        assert!((cm.0 - 182.88).abs() < 1e-9);

        let m: Meters = Centimeters(178.0).into();
        assert!((m.0 - 1.78).abs() < 1e-12);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("KG".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert_eq!("lbs".parse::<WeightUnit>().unwrap(), WeightUnit::Lb);
        assert_eq!("in".parse::<LengthUnit>().unwrap(), LengthUnit::In);
        assert!("furlong".parse::<LengthUnit>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Kilograms(10.0);
        let b = Kilograms(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let kg = Kilograms(77.5);
        let json = serde_json::to_string(&kg).unwrap();
        assert_eq!(json, "77.5");
        let roundtrip: Kilograms = serde_json::from_str(&json).unwrap();
        assert_eq!(kg, roundtrip);
    }
}
