//! Model builder for assembling a model from components.

use crate::component::{Component, Objective};
use crate::errors::{MimosaError, MimosaResult};
use crate::grid::Grid;
use crate::registry::{Declarations, ModelView, ParameterValue, Registry, EXOGENOUS_OWNER};
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use super::assembly::assemble;
use super::runtime::Model;
use super::types::{CGraph, ComponentOutput, ExogenousData, C};

/// Build a new model from a set of components.
///
/// Components are held in the order they were added, which is the order their
/// constraints appear in the assembled model. Name resolution does not depend on this
/// order because every component declares its names before any component resolves them.
pub struct ModelBuilder {
    grid: Grid,
    components: Vec<C>,
    parameters: Vec<(String, ParameterValue)>,
}

impl ModelBuilder {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            components: vec![],
            parameters: vec![],
        }
    }

    /// Register a component with the builder.
    pub fn with_component(&mut self, component: Arc<dyn Component>) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Supply a parameter that is not owned by any component, such as exogenous series.
    pub fn with_parameter(&mut self, name: &str, value: impl Into<ParameterValue>) -> &mut Self {
        self.parameters.push((name.to_string(), value.into()));
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Declare, resolve and assemble every component into a model.
    ///
    /// Returns the first configuration or assembly error encountered. No partial model is
    /// ever produced.
    pub fn build(&self) -> MimosaResult<Model> {
        self.check_slots()?;

        let mut registry = Registry::new(self.grid.clone());
        for (name, value) in &self.parameters {
            registry.declare_parameter(name, value.clone(), EXOGENOUS_OWNER)?;
        }

        // Phase 1: declarations
        for component in &self.components {
            let name = component.name();
            debug!(component = name.as_str(), "declaring");
            component.declare(&mut Declarations::new(&mut registry, &name))?;
        }

        // Phase 2: resolution
        let mut outputs = Vec::with_capacity(self.components.len());
        let mut objective: Option<(Objective, String)> = None;
        for component in &self.components {
            let name = component.name();
            let view = ModelView::new(&registry, &name);
            let constraints = component.constraints(&view)?;
            if let Some(found) = component.objective(&view)? {
                if let Some((_, first)) = &objective {
                    return Err(MimosaError::MultipleObjectives {
                        first: first.clone(),
                        second: name.clone(),
                    });
                }
                objective = Some((found, name.clone()));
            }
            debug!(
                component = name.as_str(),
                constraints = constraints.len(),
                "resolved"
            );
            outputs.push(ComponentOutput {
                lookups: view.into_lookups(),
                name,
                constraints,
            });
        }
        let (objective, objective_owner) = objective.ok_or(MimosaError::MissingObjective)?;

        let (graph, initial_node) = self.dependency_graph(&registry, &outputs);
        let constraints = assemble(&registry, &outputs)?;

        info!(
            components = self.components.len(),
            variables = registry.variables().len(),
            columns = registry.n_columns(),
            constraints = constraints.len(),
            "model built"
        );

        Ok(Model::new(
            registry,
            graph,
            initial_node,
            constraints,
            objective,
            objective_owner,
        ))
    }

    /// Exactly one variant per slot.
    fn check_slots(&self) -> MimosaResult<()> {
        let mut slots: HashMap<&str, String> = HashMap::new();
        for component in &self.components {
            if let Some(first) = slots.insert(component.slot(), component.name()) {
                return Err(MimosaError::DuplicateSlot {
                    slot: component.slot().to_string(),
                    first,
                    second: component.name(),
                });
            }
        }
        Ok(())
    }

    /// Link the owner of every resolved name to the component that resolved it.
    fn dependency_graph(
        &self,
        registry: &Registry,
        outputs: &[ComponentOutput],
    ) -> (CGraph, NodeIndex) {
        let mut graph: CGraph = Graph::new();
        let initial_node = graph.add_node(Arc::new(ExogenousData {}));

        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        nodes.insert(EXOGENOUS_OWNER.to_string(), initial_node);
        for component in &self.components {
            nodes.insert(component.name(), graph.add_node(component.clone()));
        }

        for output in outputs {
            let node = nodes[&output.name];
            let mut seen = HashSet::new();
            let mut has_dependencies = false;
            for name in &output.lookups {
                let Some(owner) = registry.owner(name) else {
                    continue;
                };
                if owner == output.name || !seen.insert(name.as_str()) {
                    continue;
                }
                if let Some(&producer) = nodes.get(owner) {
                    graph.add_edge(producer, node, name.clone());
                    has_dependencies = true;
                }
            }
            if !has_dependencies {
                // Keep the graph connected to the root
                graph.add_edge(initial_node, node, String::new());
            }
        }

        (graph, initial_node)
    }
}
