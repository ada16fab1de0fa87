//! Basic model tests: build, solve, dot, builder errors.

use crate::component::{Component, Objective};
use crate::constraint::Constraint;
use crate::errors::{ErrorKind, MimosaError, MimosaResult};
use crate::example_components::{ToyResponse, ToyStock, ToyStockParameters};
use crate::grid::{Grid, Index, RegionSet, TimeGrid};
use crate::model::{Model, ModelBuilder};
use crate::registry::{Declarations, ModelView, VariableDeclaration};
use crate::solver::{FixedPointSolver, SolveStatus, SolverOptions};
use is_close::is_close;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn grid() -> Grid {
    Grid::new(
        TimeGrid::uniform(2020.0, 2060.0, 10.0).unwrap(),
        RegionSet::new(["World"]).unwrap(),
    )
}

fn toy_model(response: ToyResponse) -> MimosaResult<Model> {
    ModelBuilder::new(grid())
        .with_component(Arc::new(ToyStock::from_parameters(
            ToyStockParameters::default(),
        )))
        .with_component(Arc::new(response))
        .build()
}

#[derive(Debug, Serialize, Deserialize)]
struct SecondObjective {}

#[typetag::serde]
impl Component for SecondObjective {
    fn slot(&self) -> &'static str {
        "objective"
    }

    fn variant(&self) -> &'static str {
        "second"
    }

    fn declare(&self, _declarations: &mut Declarations) -> MimosaResult<()> {
        Ok(())
    }

    fn constraints(&self, _view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        Ok(vec![])
    }

    fn objective(&self, view: &ModelView) -> MimosaResult<Option<Objective>> {
        let emissions = view.time_var("emissions")?;
        Ok(Some(Objective::maximize(emissions.at(0))))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Collider {}

#[typetag::serde]
impl Component for Collider {
    fn slot(&self) -> &'static str {
        "collider"
    }

    fn variant(&self) -> &'static str {
        "default"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declarations.variable(VariableDeclaration::time_region("emissions"))
    }

    fn constraints(&self, _view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        Ok(vec![])
    }
}

#[test]
fn build_and_count() {
    let model = toy_model(ToyResponse::default()).unwrap();

    assert_eq!(model.constraint_count("emissions"), 5);
    assert_eq!(model.constraint_count("stock"), 4);
    assert_eq!(model.constraint_count("stock_init"), 1);
    assert_eq!(model.constraint_count("response"), 5);
    assert_eq!(model.constraints().len(), 15);
    assert_eq!(model.registry().n_columns(), 15);
    assert_eq!(model.objective_owner(), "stock:toy");

    let names: Vec<_> = model.components().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["stock:toy", "response:linear"]);
}

#[test]
fn solve() {
    let model = toy_model(ToyResponse::default()).unwrap();
    let results = model
        .solve(&FixedPointSolver::new(), &SolverOptions::default(), "toy")
        .unwrap();

    assert_eq!(results.status, SolveStatus::Feasible);
    let stock = results.time_series("stock").unwrap();
    for (t, value) in stock.iter().enumerate() {
        assert!(is_close!(*value, 100.0 * t as f64), "stock[{t}] = {value}");
    }
    assert!(is_close!(results.get("response", Index::Time(4)).unwrap(), 200.0));
    assert!(is_close!(results.objective, 400.0));
}

#[test]
fn infeasible_solve_is_an_error() {
    let model = ModelBuilder::new(grid())
        .with_component(Arc::new(ToyStock::from_parameters(ToyStockParameters {
            rate: -10.0,
            ..Default::default()
        })))
        .build()
        .unwrap();

    let err = model
        .solve(&FixedPointSolver::new(), &SolverOptions::default(), "toy")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Solver);
    match err {
        MimosaError::Solver { status, .. } => assert_eq!(status, SolveStatus::Infeasible),
        other => panic!("unexpected error {other:?}"),
    }

    // The outcome itself is still available to the caller
    let outcome = model
        .run(&FixedPointSolver::new(), &SolverOptions::default())
        .unwrap();
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(is_close!(outcome.point[5 + 4], -400.0));
}

#[test]
fn dot() {
    let model = toy_model(ToyResponse::default()).unwrap();
    let dot = model.as_dot();
    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("label = \"exogenous\""));
    assert!(dot.contains("label = \"stock:toy\""));
    assert!(dot.contains("label = \"response:linear\""));
    assert!(dot.contains("0 -> 1"));
    assert!(dot.contains("1 -> 2"));

    assert!(model.as_dot_with_links().contains("label = \"stock\""));
}

#[test]
fn missing_objective() {
    let err = ModelBuilder::new(grid())
        .with_component(Arc::new(ToyStock::from_parameters(ToyStockParameters {
            objective: false,
            ..Default::default()
        })))
        .build()
        .unwrap_err();
    assert!(matches!(err, MimosaError::MissingObjective));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn multiple_objectives() {
    let err = ModelBuilder::new(grid())
        .with_component(Arc::new(ToyStock::from_parameters(
            ToyStockParameters::default(),
        )))
        .with_component(Arc::new(SecondObjective {}))
        .build()
        .unwrap_err();
    match err {
        MimosaError::MultipleObjectives { first, second } => {
            assert_eq!(first, "stock:toy");
            assert_eq!(second, "objective:second");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn duplicate_slot() {
    let err = ModelBuilder::new(grid())
        .with_component(Arc::new(ToyStock::from_parameters(
            ToyStockParameters::default(),
        )))
        .with_component(Arc::new(ToyStock::from_parameters(
            ToyStockParameters::default(),
        )))
        .build()
        .unwrap_err();
    assert!(matches!(err, MimosaError::DuplicateSlot { slot, .. } if slot == "stock"));
}

#[test]
fn name_collision() {
    let err = ModelBuilder::new(grid())
        .with_component(Arc::new(ToyStock::from_parameters(
            ToyStockParameters::default(),
        )))
        .with_component(Arc::new(Collider {}))
        .build()
        .unwrap_err();
    match err {
        MimosaError::NameCollision {
            name,
            component,
            existing,
        } => {
            assert_eq!(name, "emissions");
            assert_eq!(component, "collider:default");
            assert_eq!(existing, "stock:toy");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn collision_with_exogenous_parameter() {
    let err = ModelBuilder::new(grid())
        .with_parameter("rate", 3.0)
        .with_component(Arc::new(ToyStock::from_parameters(
            ToyStockParameters::default(),
        )))
        .build()
        .unwrap_err();
    assert!(
        matches!(err, MimosaError::NameCollision { existing, .. } if existing == "exogenous")
    );
}

#[test]
fn undeclared_name() {
    let err = toy_model(ToyResponse {
        source: "missing".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assembly);
    match err {
        MimosaError::UndeclaredName { component, name } => {
            assert_eq!(component, "response:linear");
            assert_eq!(name, "missing");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn parameter_used_as_variable() {
    let err = toy_model(ToyResponse {
        source: "rate".to_string(),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, MimosaError::ShapeMismatch { name, .. } if name == "rate"));
}

#[test]
fn components_serialise() {
    let component: Arc<dyn Component> = Arc::new(ToyResponse::default());
    let json = serde_json::to_string(&component).unwrap();
    let restored: Box<dyn Component> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.name(), "response:linear");
}
