//! Equation components for the MIMOSA integrated assessment model
//!
//! Each component fills one slot of the model with one variant, and the catalog
//! assembles a model from a configuration document.
//!
//! # Module Organisation
//!
//! - `components`: the equation modules, grouped by slot
//!   (economics, emissions, mitigation, industry, emission trade, damages, objective)
//! - `parameters`: one parameters struct per component, with documented defaults
//! - `config`: the configuration document (time grid, regions, scenario data, variant
//!   selection and component sections)
//! - `catalog`: the variant factory and [`catalog::build_model`]
//!
//! # Example
//!
//! ```no_run
//! use mimosa_components::catalog::build_model;
//! use mimosa_components::config::ModelConfig;
//! use mimosa_core::solver::FixedPointSolver;
//!
//! let config = ModelConfig::from_path("configs/default.toml".as_ref()).unwrap();
//! let model = build_model(&config).unwrap();
//! let results = model
//!     .solve(&FixedPointSolver::new(), &config.solver, "default")
//!     .unwrap();
//! println!("{:?}", results.time_series("temperature"));
//! ```

pub mod catalog;
pub mod components;
pub mod config;
pub mod parameters;
