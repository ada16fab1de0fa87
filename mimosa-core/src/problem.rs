//! The flat nonlinear program handed to a solver.

use crate::component::{Objective, Sense};
use crate::expr::Relation;
use crate::grid::Index;
use crate::registry::Bounds;
use serde::{Deserialize, Serialize};

/// One solver column: a single value of a declared variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub variable: String,
    pub index: Index,
    pub bounds: Bounds,
    pub initial: f64,
}

/// A single relation of the merged model, attributed to the constraint and component
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledConstraint {
    pub name: String,
    pub component: String,
    pub index: Index,
    pub relation: Relation,
}

/// A constraint relation that is not satisfied at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation<'a> {
    pub constraint: &'a AssembledConstraint,
    pub amount: f64,
}

/// Variables with bounds and starting values, the assembled constraints and the
/// objective of a model.
#[derive(Debug, Clone)]
pub struct Problem<'a> {
    pub columns: Vec<Column>,
    pub constraints: &'a [AssembledConstraint],
    pub objective: &'a Objective,
}

impl<'a> Problem<'a> {
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn sense(&self) -> Sense {
        self.objective.sense
    }

    /// Starting point, with every initial value moved inside its bounds.
    pub fn initial_point(&self) -> Vec<f64> {
        self.columns
            .iter()
            .map(|c| c.bounds.clamp(c.initial))
            .collect()
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.expr.eval(x)
    }

    /// Violation of `relation` scaled by the magnitude of its right-hand side.
    pub fn scaled_violation(relation: &Relation, x: &[f64]) -> f64 {
        let violation = relation.violation(x);
        let scale = 1.0 + relation.rhs.eval(x).abs();
        if scale.is_finite() {
            violation / scale
        } else {
            f64::INFINITY
        }
    }

    /// Constraints violated by more than `tolerance` (scaled) at `x`.
    pub fn violations(&self, x: &[f64], tolerance: f64) -> Vec<Violation<'a>> {
        let constraints: &'a [AssembledConstraint] = self.constraints;
        constraints
            .iter()
            .filter_map(|c| {
                let amount = Self::scaled_violation(&c.relation, x);
                (amount > tolerance).then_some(Violation {
                    constraint: c,
                    amount,
                })
            })
            .collect()
    }

    /// Columns whose value at `x` lies outside their bounds.
    pub fn bound_violations(&self, x: &[f64], tolerance: f64) -> Vec<&Column> {
        self.columns
            .iter()
            .zip(x)
            .filter(|(c, &v)| v < c.bounds.lower - tolerance || v > c.bounds.upper + tolerance)
            .map(|(c, _)| c)
            .collect()
    }
}
