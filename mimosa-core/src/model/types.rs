//! Type definitions for the model module.

use crate::component::Component;
use crate::constraint::Constraint;
use crate::errors::MimosaResult;
use crate::registry::{Declarations, ModelView};
use petgraph::Graph;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Type alias for a component wrapped in an Arc for shared ownership.
pub type C = Arc<dyn Component>;

/// Component dependency graph. Edges carry the name that links two components.
pub type CGraph = Graph<C, String>;

/// Root node of the dependency graph, owning the parameters supplied directly to the
/// builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ExogenousData {}

#[typetag::serde]
impl Component for ExogenousData {
    fn slot(&self) -> &'static str {
        "exogenous"
    }

    fn variant(&self) -> &'static str {
        "data"
    }

    fn name(&self) -> String {
        crate::registry::EXOGENOUS_OWNER.to_string()
    }

    fn declare(&self, _declarations: &mut Declarations) -> MimosaResult<()> {
        Ok(())
    }

    fn constraints(&self, _view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        Ok(vec![])
    }
}

/// Constraints and objective returned by one component in the second build phase.
pub(crate) struct ComponentOutput {
    pub name: String,
    pub constraints: Vec<Constraint>,
    pub lookups: Vec<String>,
}
