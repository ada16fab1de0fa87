use super::{
    circular_economy_constraints, circular_economy_curve, declare_circular_economy,
    mitigation_costs,
};
use crate::components::mitigation::mac::MacCurve;
use crate::components::mitigation::PRICE_UNIT;
use crate::parameters::EmissionTradeParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::registry::{Bounds, Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single global carbon price with a circular-economy channel.
///
/// The global price is the price of the first region. Every other regional price and
/// the marginal cost of the circular-economy channel are tied to it, so all abatement
/// happens at equal marginal cost.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalPrice {
    parameters: EmissionTradeParameters,
}

impl GlobalPrice {
    pub fn from_parameters(parameters: EmissionTradeParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for GlobalPrice {
    fn slot(&self) -> &'static str {
        "emissiontrade"
    }

    fn variant(&self) -> &'static str {
        "globalprice"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declare_circular_economy(declarations, &self.parameters.circular_economy)?;
        declarations.variable(
            VariableDeclaration::time("global_carbonprice")
                .unit(PRICE_UNIT)
                .bounds(Bounds::non_negative()),
        )
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let curve = Arc::new(circular_economy_curve(&self.parameters.circular_economy)?);
        let learning = view.time_param("learning_factor")?;
        let industry_costs = view.time_var("industry_mitigation_costs_global")?;
        let ce_costs = view.time_var("circular_economy_costs_global")?;
        let carbonprice = view.regional_var("carbonprice")?;
        let global_price = view.time_var("global_carbonprice")?;
        let circular = view.time_var("emissions_industry_global_relative_reduction_from_CE")?;

        let mut constraints = circular_economy_constraints(view, curve.clone())?;
        constraints.push(mitigation_costs(view, vec![industry_costs, ce_costs])?);
        constraints.extend([
            Constraint::global("global_carbonprice", move |t| {
                global_price.at(t).equals(carbonprice.at(t, 0))
            }),
            Constraint::regional("carbonprice_equalisation", move |t, r| {
                (carbonprice.at(t, r) - global_price.at(t)).equals(0.0)
            })
            .when(|index| index.region().is_some_and(|r| r > 0)),
            Constraint::global("ce_carbonprice", move |t| {
                (global_price.at(t) - learning[t] * curve.mac(circular.at(t))).equals(0.0)
            }),
        ]);
        Ok(constraints)
    }
}
