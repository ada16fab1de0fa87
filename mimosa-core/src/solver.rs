//! Solver interface.
//!
//! A [`Solver`] receives the flat [`Problem`] and returns a terminal [`SolveStatus`] with a
//! point. The call is blocking and is never retried by the model.
//!
//! [`FixedPointSolver`] is a bundled back-end that does not optimise. It propagates the
//! defining equalities of the model (`x[c] == f(...)`) from the starting point until
//! they stop changing, then reports whether every constraint holds. This evaluates a
//! scenario at fixed decision variables, which is what the test suite and the `run`
//! command use when no optimiser is plugged in.

use crate::errors::MimosaResult;
use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Terminal status reported by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    IterationLimit,
    TimeLimit,
    Error,
}

impl SolveStatus {
    /// Whether the returned point can be used as a solution.
    pub fn is_success(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::IterationLimit => "iteration limit",
            SolveStatus::TimeLimit => "time limit",
            SolveStatus::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// Limits and tolerances passed to the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    /// Maximum number of iterations.
    ///
    /// Default: 1000
    pub max_iterations: usize,
    /// Feasibility tolerance, relative to the magnitude of each constraint.
    ///
    /// Default: 1e-6
    pub tolerance: f64,
    /// Wall-clock limit in seconds. No limit if absent.
    ///
    /// Default: none
    pub time_limit: Option<f64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            time_limit: None,
        }
    }
}

impl SolverOptions {
    pub fn deadline(&self, start: Instant) -> Option<Instant> {
        self.time_limit
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| start + Duration::from_secs_f64(s))
    }
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub status: SolveStatus,
    /// One value per solver column.
    pub point: Vec<f64>,
    pub objective: f64,
    pub iterations: usize,
    pub message: String,
}

/// A nonlinear program solver.
pub trait Solver {
    fn name(&self) -> &str;

    /// Solve `problem`, blocking until a terminal status is reached.
    ///
    /// An `Err` is reserved for failures of the solver itself. An infeasible or
    /// unbounded problem is reported through the outcome's status.
    fn solve(&self, problem: &Problem, options: &SolverOptions) -> MimosaResult<SolverOutcome>;
}

/// Gauss-Seidel propagation of defining equalities.
#[derive(Debug, Clone, Default)]
pub struct FixedPointSolver;

impl FixedPointSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for FixedPointSolver {
    fn name(&self) -> &str {
        "fixed-point"
    }

    fn solve(&self, problem: &Problem, options: &SolverOptions) -> MimosaResult<SolverOutcome> {
        let start = Instant::now();
        let deadline = options.deadline(start);
        let mut x = problem.initial_point();

        let definitions: Vec<_> = problem
            .constraints
            .iter()
            .filter_map(|c| c.relation.defined_column().map(|col| (col, &c.relation.rhs)))
            .collect();
        debug!(
            columns = problem.n_columns(),
            definitions = definitions.len(),
            "starting fixed-point propagation"
        );

        let mut iterations = 0;
        let mut converged = false;
        while iterations < options.max_iterations {
            if deadline.is_some_and(|d| Instant::now() > d) {
                let objective = problem.objective_value(&x);
                return Ok(SolverOutcome {
                    status: SolveStatus::TimeLimit,
                    point: x,
                    objective,
                    iterations,
                    message: format!("time limit reached after {iterations} sweeps"),
                });
            }
            iterations += 1;

            let mut max_change: f64 = 0.0;
            for (col, rhs) in &definitions {
                let value = rhs.eval(&x);
                let change = (value - x[*col]).abs() / (1.0 + value.abs());
                max_change = max_change.max(if change.is_nan() { f64::INFINITY } else { change });
                x[*col] = value;
            }
            if max_change <= options.tolerance * 1e-3 {
                converged = true;
                break;
            }
        }

        let objective = problem.objective_value(&x);
        if x.iter().any(|v| !v.is_finite()) || !objective.is_finite() {
            warn!("fixed-point propagation produced non-finite values");
            return Ok(SolverOutcome {
                status: SolveStatus::Error,
                point: x,
                objective,
                iterations,
                message: "non-finite value in propagated point".to_string(),
            });
        }
        if !converged {
            return Ok(SolverOutcome {
                status: SolveStatus::IterationLimit,
                point: x,
                objective,
                iterations,
                message: format!(
                    "defining equalities did not settle within {} sweeps",
                    options.max_iterations
                ),
            });
        }

        let violations = problem.violations(&x, options.tolerance);
        let out_of_bounds = problem.bound_violations(&x, options.tolerance);
        let (status, message) = if violations.is_empty() && out_of_bounds.is_empty() {
            (SolveStatus::Feasible, "all constraints satisfied".to_string())
        } else {
            let first = violations
                .first()
                .map(|v| {
                    format!(
                        "`{}` at {:?} violated by {:.3e}",
                        v.constraint.name, v.constraint.index, v.amount
                    )
                })
                .or_else(|| {
                    out_of_bounds
                        .first()
                        .map(|c| format!("`{}` at {:?} outside its bounds", c.variable, c.index))
                });
            (
                SolveStatus::Infeasible,
                format!(
                    "{} constraint(s) and {} bound(s) violated, first: {}",
                    violations.len(),
                    out_of_bounds.len(),
                    first.unwrap_or_default()
                ),
            )
        };
        info!(%status, iterations, objective, "fixed-point solve finished");

        Ok(SolverOutcome {
            status,
            point: x,
            objective,
            iterations,
            message,
        })
    }
}
