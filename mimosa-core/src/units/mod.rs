//! Units of configuration quantities.
//!
//! Configuration values such as carbon budgets are written with their unit
//! (`"700 GtCO2"`, `"2 trillion_USD"`). They are parsed into a [`Quantity`] and
//! converted into the unit a component works in, with a dimensional check so that a
//! budget given in `GtCO2` cannot be read as a temperature.
//!
//! ```
//! use mimosa_core::units::{Quantity, Unit};
//!
//! let budget = Quantity::parse("1000 GtC").unwrap();
//! let in_gtco2 = budget.value_in(&Unit::parse("GtCO2").unwrap()).unwrap();
//! assert!((in_gtco2 - 3666.67).abs() < 0.01);
//! ```
//!
//! - [`dimension`]: base dimensions and their arithmetic
//! - [`registry`]: known symbols, prefixes and factors
//! - [`parser`]: unit string grammar

pub mod dimension;
pub mod parser;
pub mod registry;

pub use dimension::Dimension;
pub use parser::ParsedUnit;
pub use registry::{UnitInfo, UnitRegistry, UNIT_REGISTRY};

use crate::errors::MimosaError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse or convert a unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("invalid exponent `{0}`")]
    InvalidExponent(String),
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("{0}")]
    Syntax(String),
    #[error("`{from}` ({from_dim}) cannot be converted to `{to}` ({to_dim})")]
    Incompatible {
        from: String,
        to: String,
        from_dim: Dimension,
        to_dim: Dimension,
    },
    #[error("invalid quantity `{0}`, expected a number followed by a unit")]
    InvalidQuantity(String),
}

impl UnitError {
    /// Attach the option that held the offending value.
    pub fn in_context(self, context: impl Into<String>) -> MimosaError {
        MimosaError::Unit {
            context: context.into(),
            details: self.to_string(),
        }
    }
}

/// A parsed unit with its dimension and base-unit factor resolved.
#[derive(Debug, Clone)]
pub struct Unit {
    original: String,
    parsed: ParsedUnit,
    dimension: Dimension,
    factor: f64,
}

impl Unit {
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        let parsed = ParsedUnit::parse(input)?;
        Ok(Self {
            original: input.trim().to_string(),
            dimension: parsed.dimension()?,
            factor: parsed.factor()?,
            parsed,
        })
    }

    pub fn dimensionless() -> Self {
        Self {
            original: "1".to_string(),
            parsed: ParsedUnit::dimensionless(),
            dimension: Dimension::DIMENSIONLESS,
            factor: 1.0,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_compatible(&self, other: &Self) -> bool {
        self.dimension == other.dimension
    }

    /// Multiplier converting a value in `self` into `other`.
    pub fn conversion_factor(&self, other: &Self) -> Result<f64, UnitError> {
        if !self.is_compatible(other) {
            return Err(UnitError::Incompatible {
                from: self.original.clone(),
                to: other.original.clone(),
                from_dim: self.dimension,
                to_dim: other.dimension,
            });
        }
        Ok(self.factor / other.factor)
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.parsed == other.parsed
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// A number with a unit, written `"<value> <unit>"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A bare number, already in the unit the consumer expects.
    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, Unit::dimensionless())
    }

    pub fn parse(input: &str) -> Result<Self, UnitError> {
        let input = input.trim();
        let (number, unit) = input.split_at(number_prefix_len(input));
        let value: f64 = number
            .parse()
            .map_err(|_| UnitError::InvalidQuantity(input.to_string()))?;
        Ok(Self::new(value, Unit::parse(unit)?))
    }

    /// The value converted into `unit`.
    ///
    /// A quantity written without a unit is taken to be in `unit` already.
    pub fn value_in(&self, unit: &Unit) -> Result<f64, UnitError> {
        if self.unit.parsed == ParsedUnit::dimensionless() {
            return Ok(self.value);
        }
        Ok(self.value * self.unit.conversion_factor(unit)?)
    }

    /// Like [`Quantity::value_in`] with the target unit given as text.
    pub fn value_in_str(&self, unit: &str) -> Result<f64, UnitError> {
        self.value_in(&Unit::parse(unit)?)
    }
}

/// Length of the leading number in `input`, including a decimal exponent.
fn number_prefix_len(input: &str) -> usize {
    let bytes = input.as_bytes();
    let mut end = 0;
    while end < bytes.len() {
        let c = bytes[end];
        let is_exponent = (c == b'e' || c == b'E')
            && end > 0
            && bytes
                .get(end + 1)
                .is_some_and(|n| n.is_ascii_digit() || *n == b'-' || *n == b'+');
        if c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+' || is_exponent {
            end += 1;
        } else {
            break;
        }
    }
    end
}

impl FromStr for Quantity {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    /// Accepts `"700 GtCO2"` or a bare number.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Quantity::dimensionless(v)),
            Raw::Text(s) => Quantity::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
