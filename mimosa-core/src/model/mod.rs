//! A model is a set of swappable components combined into one nonlinear program.
//!
//! Each component contributes variables, parameters and constraints to a shared
//! namespace keyed by time and region. The builder runs the two declaration and
//! resolution phases over all components, folds their constraint lists into one flat
//! set, and checks the structural invariants of the result:
//!
//! - constraint names are unique across all components
//! - every emitted relation references at least one variable
//! - every variable with a `t - 1` recurrence is pinned at the initial period
//!
//! Exactly one component must provide the objective.

mod assembly;
mod builder;
mod runtime;
mod types;

#[cfg(test)]
mod tests;

// Public re-exports
pub use builder::ModelBuilder;
pub use runtime::Model;
pub use types::{CGraph, C};
