//! Marginal abatement cost curves
//!
//! A curve gives the carbon price needed to abate a fraction `a` of baseline emissions
//! (`MAC`) and the total cost of that abatement per unit of baseline emissions (`AC`).
//! `AC(a)` is always the integral of `MAC` from 0 to `a`, so every curve supplies both
//! as an exact antiderivative pair.

use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::expr::{soft_min, Expr};
use mimosa_core::registry::ModelView;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Scale of the smoothed floor applied before fractional powers.
const FLOOR_SCALE: f64 = 1e-4;

pub trait MacCurve: Debug + Send + Sync {
    /// Marginal abatement cost at abatement `a`.
    fn mac(&self, a: Expr) -> Expr;

    /// Abatement cost, the integral of [`MacCurve::mac`] from 0 to `a`.
    fn ac(&self, a: Expr) -> Expr;

    fn mac_value(&self, a: f64) -> f64;

    fn ac_value(&self, a: f64) -> f64;
}

/// `MAC(a) = gamma * a^beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerMac {
    pub gamma: f64,
    pub beta: f64,
}

impl PowerMac {
    pub fn new(gamma: f64, beta: f64) -> MimosaResult<Self> {
        if beta <= -1.0 {
            return Err(MimosaError::invalid_option(
                "MAC_beta",
                "the exponent must be larger than -1 for the cost to be integrable",
            ));
        }
        Ok(Self { gamma, beta })
    }

    /// Read `gamma` and `beta` from two scalar parameters.
    pub fn resolve(view: &ModelView, gamma: &str, beta: &str) -> MimosaResult<Self> {
        Self::new(view.scalar(gamma)?, view.scalar(beta)?)
    }

    fn base(&self, a: Expr) -> Expr {
        if self.beta.fract() == 0.0 {
            a
        } else {
            soft_min(a, FLOOR_SCALE)
        }
    }
}

impl MacCurve for PowerMac {
    fn mac(&self, a: Expr) -> Expr {
        self.gamma * self.base(a).powf(self.beta)
    }

    fn ac(&self, a: Expr) -> Expr {
        self.gamma * self.base(a).powf(self.beta + 1.0) / (self.beta + 1.0)
    }

    fn mac_value(&self, a: f64) -> f64 {
        self.gamma * a.powf(self.beta)
    }

    fn ac_value(&self, a: f64) -> f64 {
        self.gamma * a.powf(self.beta + 1.0) / (self.beta + 1.0)
    }
}

/// `MAC(a) = sum_k c_k a^k`, with coefficients from the lowest power up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialMac {
    coefficients: Vec<f64>,
}

impl PolynomialMac {
    pub fn new(coefficients: Vec<f64>) -> MimosaResult<Self> {
        if coefficients.is_empty() {
            return Err(MimosaError::invalid_option(
                "mac_coefficients",
                "a polynomial needs at least one coefficient",
            ));
        }
        Ok(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl MacCurve for PolynomialMac {
    fn mac(&self, a: Expr) -> Expr {
        Expr::sum(
            self.coefficients
                .iter()
                .enumerate()
                .filter(|(_, c)| **c != 0.0)
                .map(|(k, c)| *c * a.clone().powf(k as f64)),
        )
    }

    fn ac(&self, a: Expr) -> Expr {
        Expr::sum(
            self.coefficients
                .iter()
                .enumerate()
                .filter(|(_, c)| **c != 0.0)
                .map(|(k, c)| *c / (k as f64 + 1.0) * a.clone().powf(k as f64 + 1.0)),
        )
    }

    fn mac_value(&self, a: f64) -> f64 {
        // Horner
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * a + c)
    }

    fn ac_value(&self, a: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .rev()
            .fold(0.0, |acc, (k, c)| acc * a + c / (k as f64 + 1.0))
            * a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Composite Simpson rule with `n` (even) intervals.
    fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
        let h = (b - a) / n as f64;
        let interior: f64 = (1..n)
            .map(|i| {
                let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
                weight * f(a + i as f64 * h)
            })
            .sum();
        (f(a) + f(b) + interior) * h / 3.0
    }

    fn curves() -> Vec<Box<dyn MacCurve>> {
        vec![
            Box::new(PowerMac::new(1.146, 3.0).unwrap()),
            Box::new(PowerMac::new(2.0, 2.5).unwrap()),
            Box::new(PowerMac::new(0.6, 1.0).unwrap()),
            Box::new(PolynomialMac::new(vec![0.0, 0.0, 0.0, 0.8]).unwrap()),
            Box::new(PolynomialMac::new(vec![0.1, -0.3, 1.2, 0.5]).unwrap()),
        ]
    }

    #[test]
    fn abatement_cost_integrates_marginal_cost() {
        for curve in curves() {
            for a in [0.0, 0.05, 0.2, 0.5, 0.73, 1.0, 1.4, 2.5] {
                let integral = simpson(|x| curve.mac_value(x), 0.0, a, 2000);
                assert_relative_eq!(
                    curve.ac_value(a),
                    integral,
                    epsilon = 1e-9,
                    max_relative = 1e-8
                );
            }
        }
    }

    #[test]
    fn expressions_match_values() {
        for curve in curves() {
            for a in [0.0, 0.3, 1.0, 1.7] {
                let x = [a];
                assert_relative_eq!(
                    curve.mac(Expr::Var(0)).eval(&x),
                    curve.mac_value(a),
                    epsilon = 1e-6
                );
                assert_relative_eq!(
                    curve.ac(Expr::Var(0)).eval(&x),
                    curve.ac_value(a),
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn fractional_power_is_guarded() {
        let curve = PowerMac::new(2.0, 2.5).unwrap();
        let value = curve.mac(Expr::Var(0)).eval(&[-0.1]);
        assert!(value.is_finite());
        assert!(value >= 0.0);
    }

    #[test]
    fn invalid_curves() {
        assert!(PowerMac::new(1.0, -1.0).is_err());
        assert!(PolynomialMac::new(vec![]).is_err());
    }
}
