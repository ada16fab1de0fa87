//! Physical dimensions used by the model.
//!
//! Carbon mass is tracked as its own base dimension, separate from the mass of
//! commodities, so that `GtCO2` and `Mt` of steel can never be converted into each other.
//! Currency is a base dimension as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Integer exponents of the base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Dimension {
    /// Carbon mass (C)
    pub carbon: i8,
    /// Mass (M)
    pub mass: i8,
    /// Length (L)
    pub length: i8,
    /// Time (T)
    pub time: i8,
    /// Temperature (Θ)
    pub temperature: i8,
    /// Currency ($)
    pub currency: i8,
}

impl Dimension {
    #[must_use]
    pub const fn new(
        carbon: i8,
        mass: i8,
        length: i8,
        time: i8,
        temperature: i8,
        currency: i8,
    ) -> Self {
        Self {
            carbon,
            mass,
            length,
            time,
            temperature,
            currency,
        }
    }

    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0, 0, 0);
    pub const CARBON: Self = Self::new(1, 0, 0, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 1, 0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(0, 0, 1, 0, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 0, 1, 0, 0);
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 0, 1, 0);
    pub const CURRENCY: Self = Self::new(0, 0, 0, 0, 0, 1);
    /// Energy (M·L²·T⁻²).
    pub const ENERGY: Self = Self::new(0, 1, 2, -2, 0, 0);
    /// Power (M·L²·T⁻³).
    pub const POWER: Self = Self::new(0, 1, 2, -3, 0, 0);

    #[must_use]
    pub const fn is_dimensionless(&self) -> bool {
        self.carbon == 0
            && self.mass == 0
            && self.length == 0
            && self.time == 0
            && self.temperature == 0
            && self.currency == 0
    }

    #[must_use]
    pub const fn pow(&self, exp: i8) -> Self {
        Self::new(
            self.carbon * exp,
            self.mass * exp,
            self.length * exp,
            self.time * exp,
            self.temperature * exp,
            self.currency * exp,
        )
    }
}

impl Add for Dimension {
    type Output = Self;

    /// Dimension of a product of two quantities.
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.carbon + rhs.carbon,
            self.mass + rhs.mass,
            self.length + rhs.length,
            self.time + rhs.time,
            self.temperature + rhs.temperature,
            self.currency + rhs.currency,
        )
    }
}

impl Sub for Dimension {
    type Output = Self;

    /// Dimension of a quotient of two quantities.
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Neg for Dimension {
    type Output = Self;

    fn neg(self) -> Self {
        self.pow(-1)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let parts: Vec<String> = [
            ("C", self.carbon),
            ("M", self.mass),
            ("L", self.length),
            ("T", self.time),
            ("Θ", self.temperature),
            ("$", self.currency),
        ]
        .iter()
        .filter(|(_, e)| *e != 0)
        .map(|(s, e)| match e {
            1 => s.to_string(),
            e => format!("{s}^{e}"),
        })
        .collect();
        write!(f, "{}", parts.join("·"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let rate = Dimension::CARBON - Dimension::TIME;
        assert_eq!(rate, Dimension::new(1, 0, 0, -1, 0, 0));
        assert_eq!(rate + Dimension::TIME, Dimension::CARBON);
        assert!((Dimension::MASS - Dimension::MASS).is_dimensionless());
        assert_eq!(Dimension::POWER + Dimension::TIME, Dimension::ENERGY);
    }

    #[test]
    fn display() {
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "1");
        assert_eq!((Dimension::CARBON - Dimension::TIME).to_string(), "C·T^-1");
    }
}
