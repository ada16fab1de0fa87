//! The contract implemented by every equation module.

use crate::constraint::Constraint;
use crate::errors::MimosaResult;
use crate::expr::Expr;
use crate::registry::{Declarations, ModelView};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Direction of optimisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// The scalar objective of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub expr: Expr,
    pub sense: Sense,
}

impl Objective {
    pub fn minimize(expr: Expr) -> Self {
        Self {
            expr,
            sense: Sense::Minimize,
        }
    }

    pub fn maximize(expr: Expr) -> Self {
        Self {
            expr,
            sense: Sense::Maximize,
        }
    }
}

/// A swappable equation module.
///
/// Each component fills one slot of the model (for example `damages`) with one variant
/// (for example `coacch`). A model holds exactly one variant per slot.
///
/// Building happens in two phases: every component declares its variables and
/// parameters in [`Component::declare`], then every component resolves the names it
/// needs and returns its constraints in [`Component::constraints`].
/// Because all declarations are complete before any constraint is built, a component
/// may refer to names declared by any other component regardless of ordering.
#[typetag::serde]
pub trait Component: Debug + Send + Sync {
    /// The slot this component fills.
    fn slot(&self) -> &'static str;

    /// The variant name within the slot.
    fn variant(&self) -> &'static str;

    /// `slot:variant`, used to attribute errors and graph nodes.
    fn name(&self) -> String {
        format!("{}:{}", self.slot(), self.variant())
    }

    /// Declare the variables and parameters owned by this component.
    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()>;

    /// Resolve the required names and build the ordered list of constraints.
    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>>;

    /// The scalar objective, for the component that provides it.
    fn objective(&self, _view: &ModelView) -> MimosaResult<Option<Objective>> {
        Ok(None)
    }
}
