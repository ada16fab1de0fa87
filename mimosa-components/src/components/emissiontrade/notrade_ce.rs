use super::{
    circular_economy_constraints, circular_economy_curve, declare_circular_economy,
    mitigation_costs,
};
use crate::parameters::EmissionTradeParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::registry::{Declarations, ModelView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Regional carbon prices with a circular-economy channel.
///
/// The circular-economy reduction is bounded by its ceiling schedule and its costs are
/// shared out by labour together with the industry costs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoTradeCircularEconomy {
    parameters: EmissionTradeParameters,
}

impl NoTradeCircularEconomy {
    pub fn from_parameters(parameters: EmissionTradeParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for NoTradeCircularEconomy {
    fn slot(&self) -> &'static str {
        "emissiontrade"
    }

    fn variant(&self) -> &'static str {
        "notrade_ce"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declare_circular_economy(declarations, &self.parameters.circular_economy)
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let curve = Arc::new(circular_economy_curve(&self.parameters.circular_economy)?);
        let industry_costs = view.time_var("industry_mitigation_costs_global")?;
        let ce_costs = view.time_var("circular_economy_costs_global")?;

        let mut constraints = circular_economy_constraints(view, curve)?;
        constraints.push(mitigation_costs(view, vec![industry_costs, ce_costs])?);
        Ok(constraints)
    }
}
