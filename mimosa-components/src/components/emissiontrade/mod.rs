//! Emission trade and mitigation costs
//!
//! Each variant assembles the regional `abatement_costs[t, r]`: the cost of abating
//! non-industry emissions along the regional MAC curve plus a labour share of the
//! global industry (and circular-economy) costs.
//!
//! | Variant | Circular economy | Carbon price |
//! |---------|------------------|--------------|
//! | `notrade` | absent | regional |
//! | `notrade_ce` | bounded by a ceiling schedule | regional |
//! | `globalprice` | bounded by a ceiling schedule | one global price |

mod globalprice;
mod notrade;
mod notrade_ce;

pub use globalprice::GlobalPrice;
pub use notrade::NoTrade;
pub use notrade_ce::NoTradeCircularEconomy;

use crate::components::economics::labour_share;
use crate::components::mitigation::mac::{MacCurve, PolynomialMac, PowerMac};
use crate::components::mitigation::COST_UNIT;
use crate::parameters::CircularEconomyParameters;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::expr::Expr;
use mimosa_core::grid::Grid;
use mimosa_core::registry::{Declarations, ModelView, ParameterValue, TimeVar, VariableDeclaration};
use mimosa_core::series::RegionalSeries;
use std::sync::Arc;

const CE_OPTION: &str = "emissiontrade.circular_economy";

/// Regional abatement costs, with the listed global cost streams shared out by labour.
fn mitigation_costs(view: &ModelView, global_costs: Vec<TimeVar>) -> MimosaResult<Constraint> {
    let curve = PowerMac::resolve(view, "MAC_gamma", "MAC_beta")?;
    let learning = Arc::new(view.time_param("learning_factor")?);
    let shares = Arc::new(labour_share(view)?);
    let abatement_costs = view.regional_var("abatement_costs")?;
    let abatement = view.regional_var("emissions_other_regional_relative_abatement")?;
    let other_baseline = view.regional_var("emissions_other_regional_baseline")?;

    Ok(Constraint::regional("mitigation_costs", move |t, r| {
        let shared = Expr::sum(global_costs.iter().map(|costs| costs.at(t)));
        abatement_costs.at(t, r).equals(
            learning[t] * curve.ac(abatement.at(t, r)) * other_baseline.at(t, r)
                + shares[[t, r]] * shared,
        )
    }))
}

/// Ceiling on the circular-economy reduction in every period of the grid.
fn ceiling_on_grid(grid: &Grid, parameters: &CircularEconomyParameters) -> MimosaResult<Vec<f64>> {
    let schedule = &parameters.max_reduction;
    if schedule.values.iter().any(|v| !(0.0..=1.0).contains(v)) {
        return Err(MimosaError::invalid_option(
            format!("{CE_OPTION}.max_reduction"),
            "values must lie between 0 and 1",
        ));
    }
    let series = RegionalSeries::new(schedule.years.clone(), vec![schedule.values.clone()])
        .map_err(|e| MimosaError::invalid_option(format!("{CE_OPTION}.max_reduction"), e))?;
    Ok(grid.periods().map(|t| series.at(grid.year(t), 0)).collect())
}

/// Circular-economy MAC curve from its coefficients.
fn circular_economy_curve(parameters: &CircularEconomyParameters) -> MimosaResult<PolynomialMac> {
    PolynomialMac::new(parameters.mac_coefficients.clone())
        .map_err(|e| MimosaError::invalid_option(format!("{CE_OPTION}.mac_coefficients"), e))
}

/// Declare the circular-economy ceiling and cost variable.
fn declare_circular_economy(
    declarations: &mut Declarations,
    parameters: &CircularEconomyParameters,
) -> MimosaResult<()> {
    circular_economy_curve(parameters)?;
    let ceiling = ceiling_on_grid(declarations.grid(), parameters)?;
    declarations.parameter("CE_max_reduction", ParameterValue::Time(ceiling))?;
    declarations.variable(
        VariableDeclaration::time("circular_economy_costs_global").unit(COST_UNIT),
    )
}

/// Ceiling and cost constraints of the circular-economy channel.
///
/// Costs carry the learning factor, so the marginal cost per unit of baseline industry
/// emissions is `learning[t] * mac(CE)`.
fn circular_economy_constraints(
    view: &ModelView,
    curve: Arc<PolynomialMac>,
) -> MimosaResult<Vec<Constraint>> {
    let ceiling = view.time_param("CE_max_reduction")?;
    let learning = view.time_param("learning_factor")?;
    let reduction = view.time_var("emissions_industry_global_relative_reduction_from_CE")?;
    let baseline = view.time_var("emissions_industry_global_baseline")?;
    let costs = view.time_var("circular_economy_costs_global")?;

    Ok(vec![
        Constraint::global("ce_max_reduction", move |t| {
            reduction.at(t).at_most(ceiling[t])
        }),
        Constraint::global("circular_economy_costs", move |t| {
            costs
                .at(t)
                .equals(learning[t] * curve.ac(reduction.at(t)) * baseline.at(t))
        }),
    ])
}
