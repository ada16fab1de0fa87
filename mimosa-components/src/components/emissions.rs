//! Emissions and temperature
//!
//! Baseline emissions are split into a global industry part and regional non-industry
//! parts. Non-industry emissions are abated regionally; industry emissions are set by
//! the industry slot. Global emissions accumulate into cumulative emissions, which
//! drive temperature linearly through the TCRE.
//!
//! # Exogenous inputs
//!
//! - `baseline_emissions` (GtCO2/yr)
//! - `carbon_intensity` (GtCO2 per trillion USD), when baseline emissions follow GDP
//! - `population`, for the regional share of industry emissions
//!
//! # Policy constraints
//!
//! Every policy constraint can be switched off. Year thresholds resolve to the first
//! period at or after the threshold; a threshold beyond the grid switches the
//! constraint off.
//!
//! | Constraint | Applies |
//! |------------|---------|
//! | `carbon_budget` | from `budget_year` |
//! | `net_zero_after_budget_year` | from `budget_year` |
//! | `cumulative_emissions_non_negative` | every period |
//! | `global_inertia`, `regional_inertia` | after the initial period |
//! | `non_increasing_emissions_after_2100` | when the previous period is after 2100 |
//! | `global_min_level`, `regional_min_level` | every period |
//! | `temperature_target` | from `temperature_target_year` |

use crate::components::economics::labour_share;
use crate::parameters::EmissionsParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::expr::Expr;
use mimosa_core::grid::Grid;
use mimosa_core::registry::{Bounds, Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Name of the baseline emissions scenario series.
pub const BASELINE_EMISSIONS_SERIES: &str = "baseline_emissions";
/// Name of the carbon intensity scenario series.
pub const CARBON_INTENSITY_SERIES: &str = "carbon_intensity";

const EMISSIONS_RATE: &str = "GtCO2/yr";
const EMISSIONS: &str = "GtCO2";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Emissions {
    parameters: EmissionsParameters,
}

impl Emissions {
    pub fn from_parameters(parameters: EmissionsParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &EmissionsParameters {
        &self.parameters
    }

    fn has_overshoot(&self) -> bool {
        self.parameters.perc_reversible_damages < 1.0
    }
}

/// Cumulative baseline emissions from the initial period, by the trapezoidal rule over
/// the grid.
fn baseline_cumulative(grid: &Grid, global_baseline: &[f64]) -> Vec<f64> {
    let mut cumulative = vec![0.0; grid.n_periods()];
    for t in 1..grid.n_periods() {
        cumulative[t] =
            cumulative[t - 1] + grid.dt(t) * (global_baseline[t] + global_baseline[t - 1]) / 2.0;
    }
    cumulative
}

#[typetag::serde]
impl Component for Emissions {
    fn slot(&self) -> &'static str {
        "emissions"
    }

    fn variant(&self) -> &'static str {
        "default"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        let p = &self.parameters;
        if !(0.0..=1.0).contains(&p.industry_scaling_baseline) {
            return Err(MimosaError::invalid_option(
                "emissions.industry_scaling_baseline",
                "must lie between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&p.perc_reversible_damages) {
            return Err(MimosaError::invalid_option(
                "emissions.perc_reversible_damages",
                "must lie between 0 and 1",
            ));
        }

        declarations.parameter("baseline_carbon_intensity", p.baseline_carbon_intensity)?;
        declarations.parameter("cumulative_emissions_trapz", p.cumulative_emissions_trapz)?;
        declarations.parameter("industry_scaling_baseline", p.industry_scaling_baseline)?;
        declarations.parameter("T0", p.t0)?;
        let tcre = p
            .tcre
            .value_in_str("delta_degC/GtCO2")
            .map_err(|e| e.in_context("emissions.TCRE"))?;
        declarations.parameter("TCRE", tcre)?;
        declarations.parameter("temperature_target", p.temperature_target.to_parameter())?;
        declarations.parameter("temperature_target_year", p.temperature_target_year)?;
        declarations.parameter(
            "budget",
            p.budget.to_parameter_in(EMISSIONS, "emissions.budget")?,
        )?;
        declarations.parameter("budget_year", p.budget_year)?;
        declarations.parameter(
            "no_pos_emissions_after_budget_year",
            p.no_pos_emissions_after_budget_year,
        )?;
        declarations.parameter(
            "non_negative_cumulative_emissions",
            p.non_negative_cumulative_emissions,
        )?;
        declarations.parameter("inertia_global", p.inertia_global.to_parameter())?;
        declarations.parameter("inertia_regional", p.inertia_regional.to_parameter())?;
        declarations.parameter(
            "non_increasing_emissions_after_2100",
            p.non_increasing_emissions_after_2100,
        )?;
        declarations.parameter(
            "global_min_level",
            p.global_min_level
                .to_parameter_in(EMISSIONS_RATE, "emissions.global_min_level")?,
        )?;
        declarations.parameter(
            "regional_min_level",
            p.regional_min_level
                .to_parameter_in(EMISSIONS_RATE, "emissions.regional_min_level")?,
        )?;
        declarations.parameter("perc_reversible_damages", p.perc_reversible_damages)?;

        // Baseline emissions
        for name in [
            "emissions_total_regional_baseline",
            "emissions_other_regional_baseline",
        ] {
            declarations.variable(VariableDeclaration::time_region(name).unit(EMISSIONS_RATE))?;
        }
        declarations.variable(
            VariableDeclaration::time("emissions_industry_global_baseline").unit(EMISSIONS_RATE),
        )?;

        // Emissions after mitigation
        declarations.variable(
            VariableDeclaration::time("emissions_total_global_mitigation").unit(EMISSIONS_RATE),
        )?;
        declarations.variable(
            VariableDeclaration::time_region("emissions_other_regional_mitigation")
                .unit(EMISSIONS_RATE),
        )?;
        declarations.variable(
            VariableDeclaration::time("emissions_industry_global_mitigation").unit(EMISSIONS_RATE),
        )?;
        declarations.variable(VariableDeclaration::time("cumulative_emissions").unit(EMISSIONS))?;

        // Reductions relative to the baseline
        declarations.variable(
            VariableDeclaration::time_region("emissions_total_regional_absolute_reduction")
                .unit(EMISSIONS_RATE),
        )?;
        declarations.variable(
            VariableDeclaration::time_region("emissions_other_regional_relative_abatement")
                .unit("fraction_of_baseline_emissions")
                .bounds(Bounds::between(0.0, 2.5))
                .initial(0.0),
        )?;
        declarations.variable(
            VariableDeclaration::time("emissions_industry_global_relative_abatement")
                .unit("fraction_of_baseline_emissions")
                .bounds(Bounds::between(0.0, 2.5))
                .initial(0.0),
        )?;
        declarations.variable(
            VariableDeclaration::time("emissions_industry_global_relative_reduction_from_CE")
                .unit("fraction_of_baseline_emissions")
                .bounds(Bounds::between(0.0, 0.7))
                .initial(0.0),
        )?;

        declarations.variable(
            VariableDeclaration::time("temperature")
                .unit("degC_above_PI")
                .initial(p.t0),
        )?;
        declarations.variable(VariableDeclaration::time("emission_relative_cumulative").initial(1.0))?;

        if self.has_overshoot() {
            declarations.variable(
                VariableDeclaration::time("netnegative_emissions").unit(EMISSIONS_RATE),
            )?;
            declarations.variable(
                VariableDeclaration::time("overshoot")
                    .unit(EMISSIONS)
                    .initial(0.0),
            )?;
        }
        Ok(())
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let grid = view.grid().clone();
        let mut constraints = Vec::new();

        let baseline_emissions = view.series(BASELINE_EMISSIONS_SERIES)?;
        let shares = Arc::new(labour_share(view)?);
        let industry_scaling = view.scalar("industry_scaling_baseline")?;

        let total_baseline = view.regional_var("emissions_total_regional_baseline")?;
        let other_baseline = view.regional_var("emissions_other_regional_baseline")?;
        let industry_baseline = view.time_var("emissions_industry_global_baseline")?;
        let global_emissions = view.time_var("emissions_total_global_mitigation")?;
        let other_emissions = view.regional_var("emissions_other_regional_mitigation")?;
        let industry_emissions = view.time_var("emissions_industry_global_mitigation")?;
        let cumulative = view.time_var("cumulative_emissions")?;
        let absolute_reduction =
            view.regional_var("emissions_total_regional_absolute_reduction")?;
        let abatement = view.regional_var("emissions_other_regional_relative_abatement")?;

        // Baseline emissions, either exogenous or from carbon intensity and net GDP
        if view.flag("baseline_carbon_intensity")? {
            let carbon_intensity = view.series(CARBON_INTENSITY_SERIES)?;
            let gdp_net = view.regional_var("GDP_net")?;
            constraints.push(Constraint::regional("baseline_emissions", move |t, r| {
                total_baseline
                    .at(t, r)
                    .equals(carbon_intensity[[t, r]] * gdp_net.at(t, r))
            }));
        } else {
            let baseline = baseline_emissions.clone();
            constraints.push(Constraint::regional("baseline_emissions", move |t, r| {
                total_baseline.at(t, r).equals(baseline[[t, r]])
            }));
        }

        let initial_global_baseline: f64 = baseline_emissions.row(0).sum();
        let initial_regional_baseline: Vec<f64> = baseline_emissions.row(0).to_vec();

        constraints.extend([
            Constraint::global("industry_baseline_emissions", move |t| {
                industry_baseline
                    .at(t)
                    .equals(industry_scaling * total_baseline.sum_regions(t))
            }),
            Constraint::regional("other_baseline_emissions", move |t, r| {
                other_baseline
                    .at(t, r)
                    .equals((1.0 - industry_scaling) * total_baseline.at(t, r))
            }),
            Constraint::regional("regional_abatement", move |t, r| {
                other_emissions
                    .at(t, r)
                    .equals((1.0 - abatement.at(t, r)) * other_baseline.at(t, r))
            })
            .skip_initial(),
            Constraint::regional_init("regional_abatement_init", move |r| {
                other_emissions.at(0, r).equals(other_baseline.at(0, r))
            }),
            Constraint::regional("absolute_reduction", move |t, r| {
                absolute_reduction.at(t, r).equals(
                    total_baseline.at(t, r)
                        - other_emissions.at(t, r)
                        - shares[[t, r]] * industry_emissions.at(t),
                )
            }),
            Constraint::global("global_emissions", move |t| {
                global_emissions
                    .at(t)
                    .equals(other_emissions.sum_regions(t) + industry_emissions.at(t))
            })
            .skip_initial(),
            Constraint::global_init("global_emissions_init", move || {
                global_emissions.at(0).equals(initial_global_baseline)
            }),
        ]);

        // Cumulative emissions
        let trapz = view.flag("cumulative_emissions_trapz")?;
        let integration_grid = grid.clone();
        constraints.extend([
            Constraint::global("cumulative_emissions", move |t| {
                let dt = integration_grid.dt(t);
                let increment = if trapz {
                    dt * (global_emissions.at(t) + global_emissions.at(t - 1)) / 2.0
                } else {
                    dt * global_emissions.at(t)
                };
                cumulative.at(t).equals(cumulative.at(t - 1) + increment)
            })
            .skip_initial(),
            Constraint::global_init("cumulative_emissions_init", move || {
                cumulative.at(0).equals(0.0)
            }),
        ]);

        // Temperature
        let temperature = view.time_var("temperature")?;
        let t0 = view.scalar("T0")?;
        let tcre = view.scalar("TCRE")?;
        constraints.extend([
            Constraint::global("temperature", move |t| {
                temperature.at(t).equals(t0 + tcre * cumulative.at(t))
            })
            .skip_initial(),
            Constraint::global_init("temperature_init", move || temperature.at(0).equals(t0)),
        ]);
        if let Some(target) = view.toggle("temperature_target")? {
            let first = grid
                .time
                .first_period_at_or_after(view.scalar("temperature_target_year")?);
            constraints.push(
                Constraint::global("temperature_target", move |t| {
                    temperature.at(t).at_most(target)
                })
                .from_period(first),
            );
        }

        // Overshoot of the budget through net-negative emissions
        let reversible = view.scalar("perc_reversible_damages")?;
        let budget_year = view.scalar("budget_year")?;
        let budget_period = grid.time.first_period_at_or_after(budget_year);
        let overshoot = if self.has_overshoot() {
            let netnegative = view.time_var("netnegative_emissions")?;
            let overshoot = view.time_var("overshoot")?;
            let overshoot_grid = grid.clone();
            constraints.extend([
                Constraint::global("netnegative_emissions", move |t| {
                    let e = global_emissions.at(t);
                    netnegative
                        .at(t)
                        .equals(e.clone() * (1.0 - (10.0 * e).tanh()) / 2.0)
                }),
                Constraint::global("overshoot", move |t| {
                    let increment = if overshoot_grid.year(t) <= budget_year {
                        overshoot_grid.dt(t) * netnegative.at(t)
                    } else {
                        Expr::constant(0.0)
                    };
                    overshoot.at(t).equals(overshoot.at(t - 1) + increment)
                })
                .skip_initial(),
                Constraint::global_init("overshoot_init", move || overshoot.at(0).equals(0.0)),
            ]);
            Some(overshoot)
        } else {
            None
        };

        // Carbon budget
        if let Some(budget) = view.toggle("budget")? {
            constraints.push(
                Constraint::global("carbon_budget", move |t| {
                    let allowed = match overshoot {
                        Some(overshoot) => budget + overshoot.at(t) * (1.0 - reversible),
                        None => Expr::constant(budget),
                    };
                    cumulative.at(t).at_most(allowed)
                })
                .from_period(budget_period),
            );
            if view.flag("no_pos_emissions_after_budget_year")? {
                constraints.push(
                    Constraint::global("net_zero_after_budget_year", move |t| {
                        global_emissions.at(t).at_most(0.0)
                    })
                    .from_period(budget_period),
                );
            }
        }

        if view.flag("non_negative_cumulative_emissions")? {
            constraints.push(Constraint::global(
                "cumulative_emissions_non_negative",
                move |t| cumulative.at(t).at_least(0.0),
            ));
        }

        // Inertia
        if let Some(inertia) = view.toggle("inertia_global")? {
            let inertia_grid = grid.clone();
            constraints.push(
                Constraint::global("global_inertia", move |t| {
                    (global_emissions.at(t) - global_emissions.at(t - 1))
                        .at_least(inertia_grid.dt(t) * inertia * initial_global_baseline)
                })
                .skip_initial(),
            );
        }
        if let Some(inertia) = view.toggle("inertia_regional")? {
            let inertia_grid = grid.clone();
            constraints.push(
                Constraint::regional("regional_inertia", move |t, r| {
                    (other_emissions.at(t, r) - other_emissions.at(t - 1, r))
                        .at_least(inertia_grid.dt(t) * inertia * initial_regional_baseline[r])
                })
                .skip_initial(),
            );
        }
        if view.flag("non_increasing_emissions_after_2100")? {
            let threshold_grid = grid.clone();
            constraints.push(
                Constraint::regional("non_increasing_emissions_after_2100", move |t, r| {
                    (other_emissions.at(t, r) - other_emissions.at(t - 1, r)).at_most(0.0)
                })
                .when(move |index| {
                    index
                        .period()
                        .is_some_and(|t| t > 0 && threshold_grid.year(t - 1) > 2100.0)
                }),
            );
        }

        // Minimum levels
        if let Some(level) = view.toggle("global_min_level")? {
            constraints.push(Constraint::global("global_min_level", move |t| {
                global_emissions.at(t).at_least(level)
            }));
        }
        if let Some(level) = view.toggle("regional_min_level")? {
            constraints.push(Constraint::regional("regional_min_level", move |t, r| {
                other_emissions.at(t, r).at_least(level)
            }));
        }

        // Cumulative emissions relative to the baseline
        let global_baseline: Vec<f64> = baseline_emissions
            .rows()
            .into_iter()
            .map(|row| row.sum())
            .collect();
        let baseline_cumulative = Arc::new(baseline_cumulative(&grid, &global_baseline));
        let relative = view.time_var("emission_relative_cumulative")?;
        let positive = baseline_cumulative.clone();
        constraints.extend([
            Constraint::global("relative_cumulative_emissions", move |t| {
                relative
                    .at(t)
                    .equals(cumulative.at(t) / baseline_cumulative[t])
            })
            .skip_initial()
            .when(move |index| index.period().is_some_and(|t| positive[t] > 0.0)),
            Constraint::global_init("relative_cumulative_emissions_init", move || {
                relative.at(0).equals(1.0)
            }),
        ]);

        debug!(
            regions = grid.n_regions(),
            constraints = constraints.len(),
            "emission constraints built"
        );
        Ok(constraints)
    }
}
