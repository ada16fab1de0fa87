//! Structural checks applied when the constraint lists are merged.

use crate::component::{Component, Objective};
use crate::constraint::Constraint;
use crate::errors::{ErrorKind, MimosaError, MimosaResult};
use crate::example_components::{ToyResponse, ToyStock, ToyStockParameters};
use crate::expr::Expr;
use crate::grid::{Grid, Index, RegionSet, TimeGrid};
use crate::model::{Model, ModelBuilder};
use crate::registry::{Bounds, Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn grid() -> Grid {
    Grid::new(
        TimeGrid::uniform(2020.0, 2060.0, 10.0).unwrap(),
        RegionSet::new(["North", "South"]).unwrap(),
    )
}

fn build(components: Vec<Arc<dyn Component>>) -> MimosaResult<Model> {
    let mut builder = ModelBuilder::new(grid());
    for component in components {
        builder.with_component(component);
    }
    builder.build()
}

/// Emits a relation between constants.
#[derive(Debug, Serialize, Deserialize)]
struct ConstantRelation {}

#[typetag::serde]
impl Component for ConstantRelation {
    fn slot(&self) -> &'static str {
        "constant"
    }

    fn variant(&self) -> &'static str {
        "default"
    }

    fn declare(&self, _declarations: &mut Declarations) -> MimosaResult<()> {
        Ok(())
    }

    fn constraints(&self, _view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        Ok(vec![Constraint::global("always", |_| {
            Expr::constant(1.0).at_most(2.0)
        })])
    }
}

/// References a column that was never declared.
#[derive(Debug, Serialize, Deserialize)]
struct StrayColumn {}

#[typetag::serde]
impl Component for StrayColumn {
    fn slot(&self) -> &'static str {
        "stray"
    }

    fn variant(&self) -> &'static str {
        "default"
    }

    fn declare(&self, _declarations: &mut Declarations) -> MimosaResult<()> {
        Ok(())
    }

    fn constraints(&self, _view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        Ok(vec![Constraint::global_init("stray", || {
            Expr::Var(10_000).at_least(0.0)
        })])
    }
}

/// A regional stock, anchored everywhere except in the regions listed in `unanchored`
/// and optionally pinned at the initial period by its bounds instead.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegionalStock {
    unanchored: Vec<usize>,
    pinned: bool,
}

#[typetag::serde]
impl Component for RegionalStock {
    fn slot(&self) -> &'static str {
        "stock"
    }

    fn variant(&self) -> &'static str {
        "regional"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        let declaration = VariableDeclaration::time_region("capital");
        let declaration = if self.pinned {
            declaration.bounds_by(|_, index| {
                if index.period() == Some(0) {
                    Bounds::fixed(1.0)
                } else {
                    Bounds::non_negative()
                }
            })
        } else {
            declaration.bounds(Bounds::non_negative())
        };
        declarations.variable(declaration)
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let capital = view.regional_var("capital")?;
        let unanchored = self.unanchored.clone();
        Ok(vec![
            Constraint::regional("capital", move |t, r| {
                capital.at(t, r).equals(0.9 * capital.at(t - 1, r) + 1.0)
            })
            .skip_initial(),
            Constraint::regional_init("capital_init", move |r| capital.at(0, r).equals(1.0))
                .when(move |index| !index.region().is_some_and(|r| unanchored.contains(&r))),
        ])
    }

    fn objective(&self, view: &ModelView) -> MimosaResult<Option<Objective>> {
        let capital = view.regional_var("capital")?;
        Ok(Some(Objective::maximize(
            capital.sum_regions(view.grid().final_period()),
        )))
    }
}

#[test]
fn duplicate_constraint_name() {
    let err = build(vec![
        Arc::new(ToyStock::from_parameters(ToyStockParameters::default())),
        Arc::new(ToyResponse {
            constraint: "stock".to_string(),
            ..Default::default()
        }),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    match err {
        MimosaError::DuplicateConstraint {
            name,
            component,
            existing,
        } => {
            assert_eq!(name, "stock");
            assert_eq!(component, "response:linear");
            assert_eq!(existing, "stock:toy");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn constant_relation_is_malformed() {
    let err = build(vec![
        Arc::new(ToyStock::from_parameters(ToyStockParameters::default())),
        Arc::new(ConstantRelation {}),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assembly);
    match err {
        MimosaError::MalformedConstraint {
            constraint,
            component,
            index,
            ..
        } => {
            assert_eq!(constraint, "always");
            assert_eq!(component, "constant:default");
            assert_eq!(index, Index::Time(0));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn column_outside_model_is_malformed() {
    let err = build(vec![
        Arc::new(ToyStock::from_parameters(ToyStockParameters::default())),
        Arc::new(StrayColumn {}),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        MimosaError::MalformedConstraint { constraint, details, .. }
            if constraint == "stray" && details.contains("10000")
    ));
}

#[test]
fn unanchored_recurrence() {
    let err = build(vec![Arc::new(ToyStock::from_parameters(
        ToyStockParameters {
            anchored: false,
            ..Default::default()
        },
    ))])
    .unwrap_err();
    match err {
        MimosaError::UnanchoredRecurrence { variable, index } => {
            assert_eq!(variable, "stock");
            assert_eq!(index, Index::Time(0));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn regional_recurrence_anchored_everywhere() {
    let model = build(vec![Arc::new(RegionalStock::default())]).unwrap();
    assert_eq!(model.constraint_count("capital"), 8);
    assert_eq!(model.constraint_count("capital_init"), 2);
}

#[test]
fn regional_recurrence_missing_one_region() {
    let err = build(vec![Arc::new(RegionalStock {
        unanchored: vec![1],
        pinned: false,
    })])
    .unwrap_err();
    match err {
        MimosaError::UnanchoredRecurrence { variable, index } => {
            assert_eq!(variable, "capital");
            assert_eq!(index, Index::TimeRegion(0, 1));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn recurrence_pinned_by_bounds() {
    let model = build(vec![Arc::new(RegionalStock {
        unanchored: vec![0, 1],
        pinned: true,
    })])
    .unwrap();
    assert_eq!(model.constraint_count("capital_init"), 0);

    let problem = model.problem();
    let first = &problem.columns[0];
    assert_eq!(first.index, Index::TimeRegion(0, 0));
    assert_eq!(first.bounds, Bounds::fixed(1.0));
    assert_eq!(problem.initial_point()[0], 1.0);
}

#[test]
fn constraints_keep_component_order() {
    let model = build(vec![
        Arc::new(ToyStock::from_parameters(ToyStockParameters::default())),
        Arc::new(ToyResponse::default()),
    ])
    .unwrap();
    let owners: Vec<_> = model
        .constraints()
        .iter()
        .map(|c| c.component.as_str())
        .collect();
    let first_response = owners.iter().position(|o| *o == "response:linear").unwrap();
    assert!(owners[..first_response].iter().all(|o| *o == "stock:toy"));
    assert!(owners[first_response..].iter().all(|o| *o == "response:linear"));

    // Global constraints are emitted for every region-free period
    let stock: Vec<_> = model
        .constraints()
        .iter()
        .filter(|c| c.name == "stock")
        .map(|c| c.index)
        .collect();
    assert_eq!(
        stock,
        vec![Index::Time(1), Index::Time(2), Index::Time(3), Index::Time(4)]
    );
}
