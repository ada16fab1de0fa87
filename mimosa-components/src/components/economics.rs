//! Exogenous economy
//!
//! Gross GDP follows the `GDP` scenario series. Net GDP is what remains after damages
//! (a fraction of gross GDP) and abatement costs.
//!
//! # Exogenous inputs
//!
//! - `GDP` (trillion USD/yr)
//! - `population` (million people), used for labour shares
//!
//! # Outputs
//!
//! - `GDP_gross[t, r]`, `GDP_net[t, r]`
//!
//! # Requires
//!
//! - `damage_costs[t, r]` from the damages slot
//! - `abatement_costs[t, r]` from the mitigation slot

use crate::parameters::EconomicsParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::registry::{Bounds, Declarations, ModelView, VariableDeclaration};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Name of the GDP scenario series.
pub const GDP_SERIES: &str = "GDP";
/// Name of the population scenario series.
pub const POPULATION_SERIES: &str = "population";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExogenousEconomics {
    parameters: EconomicsParameters,
}

impl ExogenousEconomics {
    pub fn from_parameters(parameters: EconomicsParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for ExogenousEconomics {
    fn slot(&self) -> &'static str {
        "economics"
    }

    fn variant(&self) -> &'static str {
        "exogenous"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declarations.parameter("dk", self.parameters.dk)?;
        declarations.variable(
            VariableDeclaration::time_region("GDP_gross")
                .unit("trillion_USD/yr")
                .bounds(Bounds::non_negative()),
        )?;
        declarations.variable(VariableDeclaration::time_region("GDP_net").unit("trillion_USD/yr"))
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let gdp = view.series(GDP_SERIES)?;
        let gdp_gross = view.regional_var("GDP_gross")?;
        let gdp_net = view.regional_var("GDP_net")?;
        let damage_costs = view.regional_var("damage_costs")?;
        let abatement_costs = view.regional_var("abatement_costs")?;

        Ok(vec![
            Constraint::regional("GDP_gross", move |t, r| {
                gdp_gross.at(t, r).equals(gdp[[t, r]])
            }),
            Constraint::regional("GDP_net", move |t, r| {
                gdp_net.at(t, r).equals(
                    gdp_gross.at(t, r) * (1.0 - damage_costs.at(t, r)) - abatement_costs.at(t, r),
                )
            }),
        ])
    }
}

/// Share of each region in the total population, `L(year, r) / sum_x L(year, x)`, as a
/// `(periods, regions)` array.
///
/// Periods without any population are shared equally.
pub fn labour_share(view: &ModelView) -> MimosaResult<Array2<f64>> {
    let population = view.series(POPULATION_SERIES)?;
    let n_regions = view.grid().n_regions() as f64;
    let mut share = population.as_ref().clone();
    for mut row in share.rows_mut() {
        let total: f64 = row.sum();
        if total > 0.0 {
            row.mapv_inplace(|l| l / total);
        } else {
            row.fill(1.0 / n_regions);
        }
    }
    Ok(share)
}
