//! Global costs objective
//!
//! Minimises the net present value of abatement costs and damages, summed over
//! regions and discounted at the pure rate of time preference.

use crate::parameters::GlobalCostsParameters;
use mimosa_core::component::{Component, Objective};
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::expr::Expr;
use mimosa_core::registry::{Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalCosts {
    parameters: GlobalCostsParameters,
}

impl GlobalCosts {
    pub fn from_parameters(parameters: GlobalCostsParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for GlobalCosts {
    fn slot(&self) -> &'static str {
        "objective"
    }

    fn variant(&self) -> &'static str {
        "globalcosts"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declarations.parameter("PRTP", self.parameters.prtp)?;
        declarations.variable(VariableDeclaration::time("NPV").unit("trillion_USD"))
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let prtp = view.scalar("PRTP")?;
        let npv = view.time_var("NPV")?;
        let abatement_costs = view.regional_var("abatement_costs")?;
        let damage_costs = view.regional_var("damage_costs")?;
        let gdp_gross = view.regional_var("GDP_gross")?;
        let grid = view.grid().clone();
        let begin = grid.time.begin_year();

        Ok(vec![
            Constraint::global("NPV", move |t| {
                let discount = (-prtp * (grid.year(t) - begin)).exp();
                let damages = Expr::sum(
                    grid.regions().map(|r| damage_costs.at(t, r) * gdp_gross.at(t, r)),
                );
                npv.at(t).equals(
                    npv.at(t - 1)
                        + grid.dt(t) * discount * (abatement_costs.sum_regions(t) + damages),
                )
            })
            .skip_initial(),
            Constraint::global_init("NPV_init", move || npv.at(0).equals(0.0)),
        ])
    }

    fn objective(&self, view: &ModelView) -> MimosaResult<Option<Objective>> {
        let npv = view.time_var("NPV")?;
        Ok(Some(Objective::minimize(npv.at(view.grid().final_period()))))
    }
}
