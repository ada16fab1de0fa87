//! Regional mitigation
//!
//! The carbon price of each region follows from its abatement through a power-law
//! marginal abatement cost curve. Abatement costs are assembled by the emission trade
//! slot, which knows whether industry and circular-economy costs are shared out.
//!
//! # Outputs
//!
//! - `carbonprice[t, r]`, in trillion USD per GtCO2 (thousands of USD per tCO2)
//! - `abatement_costs[t, r]`
//! - `learning_factor[t]`, the time-indexed cost multiplier
//!
//! # Requires
//!
//! - `emissions_other_regional_relative_abatement[t, r]` from the emissions slot

pub mod mac;

use crate::parameters::MitigationParameters;
use mac::{MacCurve, PowerMac};
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::grid::Grid;
use mimosa_core::registry::{
    Bounds, Declarations, ModelView, ParameterValue, VariableDeclaration,
};
use serde::{Deserialize, Serialize};

pub(crate) const PRICE_UNIT: &str = "trillion_USD/GtCO2";
pub(crate) const COST_UNIT: &str = "trillion_USD/yr";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mitigation {
    parameters: MitigationParameters,
}

impl Mitigation {
    pub fn from_parameters(parameters: MitigationParameters) -> Self {
        Self { parameters }
    }
}

/// `exp(-rate * (year(t) - year(0)))` for every period.
pub fn learning_factor(grid: &Grid, rate: f64) -> Vec<f64> {
    let begin = grid.time.begin_year();
    grid.periods()
        .map(|t| (-rate * (grid.year(t) - begin)).exp())
        .collect()
}

#[typetag::serde]
impl Component for Mitigation {
    fn slot(&self) -> &'static str {
        "mitigation"
    }

    fn variant(&self) -> &'static str {
        "default"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        let p = &self.parameters;
        let gamma = p
            .mac_gamma
            .value_in_str(PRICE_UNIT)
            .map_err(|e| e.in_context("mitigation.MAC_gamma"))?;
        declarations.parameter("MAC_gamma", gamma)?;
        declarations.parameter("MAC_beta", p.mac_beta)?;
        declarations.parameter("lot_rate", p.lot_rate)?;
        let factor = learning_factor(declarations.grid(), p.lot_rate);
        declarations.parameter("learning_factor", ParameterValue::Time(factor))?;

        declarations.variable(
            VariableDeclaration::time_region("carbonprice")
                .unit(PRICE_UNIT)
                .bounds(Bounds::non_negative()),
        )?;
        declarations.variable(VariableDeclaration::time_region("abatement_costs").unit(COST_UNIT))
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let curve = PowerMac::resolve(view, "MAC_gamma", "MAC_beta")?;
        let learning = view.time_param("learning_factor")?;
        let carbonprice = view.regional_var("carbonprice")?;
        let abatement = view.regional_var("emissions_other_regional_relative_abatement")?;

        Ok(vec![Constraint::regional("carbonprice", move |t, r| {
            carbonprice
                .at(t, r)
                .equals(learning[t] * curve.mac(abatement.at(t, r)))
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use mimosa_core::grid::{RegionSet, TimeGrid};

    #[test]
    fn learning_lowers_costs_over_time() {
        let grid = Grid::new(
            TimeGrid::uniform(2020.0, 2040.0, 10.0).unwrap(),
            RegionSet::new(["World"]).unwrap(),
        );
        let factor = learning_factor(&grid, 0.01);
        assert_eq!(factor[0], 1.0);
        assert!(is_close!(factor[2], (-0.2f64).exp()));
        assert!(learning_factor(&grid, 0.0).iter().all(|f| *f == 1.0));
    }
}
