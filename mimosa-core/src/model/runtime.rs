//! Model struct and solve orchestration.

use crate::component::Objective;
use crate::errors::{MimosaError, MimosaResult};
use crate::grid::Grid;
use crate::problem::{AssembledConstraint, Column, Problem};
use crate::registry::Registry;
use crate::results::ResultTable;
use crate::solver::{Solver, SolverOptions, SolverOutcome};
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;
use petgraph::visit::Bfs;
use std::collections::BTreeSet;
use tracing::info;

use super::types::{CGraph, C};

/// A fully assembled model: the frozen namespace, the merged constraint set and the
/// objective.
///
/// The model is read-only. Solving evaluates it at points chosen by the solver and never
/// changes the declarations or the constraints.
pub struct Model {
    registry: Registry,
    /// Components as nodes, with an edge from the owner of each name to every component
    /// that resolved it.
    components: CGraph,
    /// The node owning exogenous data, from which every component is reachable.
    initial_node: NodeIndex,
    constraints: Vec<AssembledConstraint>,
    objective: Objective,
    objective_owner: String,
}

impl Model {
    pub(crate) fn new(
        registry: Registry,
        components: CGraph,
        initial_node: NodeIndex,
        constraints: Vec<AssembledConstraint>,
        objective: Objective,
        objective_owner: String,
    ) -> Self {
        Self {
            registry,
            components,
            initial_node,
            constraints,
            objective,
            objective_owner,
        }
    }

    pub fn grid(&self) -> &Grid {
        self.registry.grid()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Every emitted relation, in component then constraint order.
    pub fn constraints(&self) -> &[AssembledConstraint] {
        &self.constraints
    }

    /// Number of relations emitted under `name`.
    pub fn constraint_count(&self, name: &str) -> usize {
        self.constraints.iter().filter(|c| c.name == name).count()
    }

    /// Names of constraints that emitted at least one relation.
    pub fn constraint_names(&self) -> BTreeSet<&str> {
        self.constraints.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// The component that provided the objective.
    pub fn objective_owner(&self) -> &str {
        &self.objective_owner
    }

    /// Components in dependency order, starting from the exogenous data node.
    pub fn components(&self) -> Vec<C> {
        let mut bfs = Bfs::new(&self.components, self.initial_node);
        let mut order = Vec::new();
        while let Some(nx) = bfs.next(&self.components) {
            if nx != self.initial_node {
                order.push(self.components[nx].clone());
            }
        }
        order
    }

    /// The solver-facing description of the model.
    ///
    /// Per-index bound rules and initializers are evaluated here.
    pub fn problem(&self) -> Problem<'_> {
        let grid = self.grid();
        let columns = self
            .registry
            .variables()
            .iter()
            .flat_map(|v| {
                v.shape.indices(grid).into_iter().map(move |index| Column {
                    variable: v.name.clone(),
                    index,
                    bounds: v.bounds.at(grid, index),
                    initial: v.initial,
                })
            })
            .collect();
        Problem {
            columns,
            constraints: &self.constraints,
            objective: &self.objective,
        }
    }

    /// Hand the problem to `solver` and return its outcome, whatever the status.
    pub fn run(&self, solver: &dyn Solver, options: &SolverOptions) -> MimosaResult<SolverOutcome> {
        let problem = self.problem();
        info!(
            solver = solver.name(),
            columns = problem.n_columns(),
            constraints = self.constraints.len(),
            "solving model"
        );
        solver.solve(&problem, options)
    }

    /// Solve the model and collect the results.
    ///
    /// A terminal status other than optimal or feasible is returned as
    /// [`MimosaError::Solver`].
    pub fn solve(
        &self,
        solver: &dyn Solver,
        options: &SolverOptions,
        name: &str,
    ) -> MimosaResult<ResultTable> {
        let outcome = self.run(solver, options)?;
        if !outcome.status.is_success() {
            return Err(MimosaError::Solver {
                solver: solver.name().to_string(),
                status: outcome.status,
                message: outcome.message,
            });
        }
        Ok(self.results(name, &outcome))
    }

    /// Result table of an outcome, regardless of its status.
    pub fn results(&self, name: &str, outcome: &SolverOutcome) -> ResultTable {
        ResultTable::from_point(
            name,
            &self.registry,
            &outcome.point,
            outcome.status,
            outcome.objective,
        )
    }

    /// Graphviz representation of the component dependency graph.
    pub fn as_dot(&self) -> String {
        let named = self
            .components
            .map(|_, component| component.name(), |_, link| link.clone());
        format!("{}", Dot::with_config(&named, &[Config::EdgeNoLabel]))
    }

    /// Like [`Model::as_dot`], with the linking names on the edges.
    pub fn as_dot_with_links(&self) -> String {
        let named = self
            .components
            .map(|_, component| component.name(), |_, link| link.clone());
        format!("{}", Dot::new(&named))
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("components", &self.components.node_count())
            .field("columns", &self.registry.n_columns())
            .field("constraints", &self.constraints.len())
            .field("objective_owner", &self.objective_owner)
            .finish()
    }
}
