pub mod component;
pub mod config;
pub mod constraint;
#[cfg(test)]
mod example_components;
pub mod expr;
pub mod grid;
pub mod model;
pub mod problem;
pub mod registry;
pub mod results;
pub mod series;
pub mod solver;
pub mod units;

pub mod errors;
