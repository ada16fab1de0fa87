//! Emissions and temperature parameters

use mimosa_core::config::Toggle;
use mimosa_core::units::Quantity;
use serde::{Deserialize, Serialize};

/// Parameters of the emissions and temperature component.
///
/// Policy constraints are switched off with `false`. A switched-off constraint is absent
/// from the model, it is never replaced by a trivially satisfied relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionsParameters {
    /// Derive baseline emissions from the `carbon_intensity` scenario series and net
    /// GDP instead of the `baseline_emissions` series.
    ///
    /// Default: false
    pub baseline_carbon_intensity: bool,

    /// Integrate cumulative emissions with the trapezoidal rule. Otherwise each period
    /// contributes `dt * E[t]`.
    ///
    /// Default: true
    pub cumulative_emissions_trapz: bool,

    /// Share of baseline emissions attributed to the global industry sector.
    ///
    /// Default: 0.25
    pub industry_scaling_baseline: f64,

    /// Temperature at the initial period (degC above pre-industrial).
    ///
    /// Default: 1.1
    #[serde(rename = "T0")]
    pub t0: f64,

    /// Transient climate response to cumulative emissions.
    ///
    /// Default: 0.62 delta_degC/TtCO2
    #[serde(rename = "TCRE")]
    pub tcre: Quantity,

    /// Maximum temperature from `temperature_target_year` onwards.
    ///
    /// Default: false
    pub temperature_target: Toggle<f64>,

    /// Default: 2100
    pub temperature_target_year: f64,

    /// Maximum cumulative emissions from `budget_year` onwards, for example
    /// `"700 GtCO2"`.
    ///
    /// Default: false
    pub budget: Toggle<Quantity>,

    /// Default: 2100
    pub budget_year: f64,

    /// Forbid positive global emissions from `budget_year` onwards. Only applies when
    /// a budget is set.
    ///
    /// Default: true
    pub no_pos_emissions_after_budget_year: bool,

    /// Default: true
    pub non_negative_cumulative_emissions: bool,

    /// Largest decline of global emissions per year, as a fraction of initial baseline
    /// emissions.
    ///
    /// Default: false
    pub inertia_global: Toggle<f64>,

    /// Largest decline of regional emissions per year, as a fraction of initial
    /// regional baseline emissions.
    ///
    /// Default: false
    pub inertia_regional: Toggle<f64>,

    /// Forbid increasing regional emissions after 2100.
    ///
    /// Default: false
    pub non_increasing_emissions_after_2100: bool,

    /// Lower bound on global emissions.
    ///
    /// Default: false
    pub global_min_level: Toggle<Quantity>,

    /// Lower bound on the non-industry emissions of each region.
    ///
    /// Default: false
    pub regional_min_level: Toggle<Quantity>,

    /// Fraction of damages from an overshoot that are reversed once emissions come
    /// back down. Below 1 the carbon budget is relaxed by the irreversible part of
    /// the net-negative emissions.
    ///
    /// Default: 1.0
    pub perc_reversible_damages: f64,
}

impl Default for EmissionsParameters {
    fn default() -> Self {
        Self {
            baseline_carbon_intensity: false,
            cumulative_emissions_trapz: true,
            industry_scaling_baseline: 0.25,
            t0: 1.1,
            // degC per GtCO2 when written without a unit
            tcre: Quantity::dimensionless(0.62e-3),
            temperature_target: Toggle::Disabled,
            temperature_target_year: 2100.0,
            budget: Toggle::Disabled,
            budget_year: 2100.0,
            no_pos_emissions_after_budget_year: true,
            non_negative_cumulative_emissions: true,
            inertia_global: Toggle::Disabled,
            inertia_regional: Toggle::Disabled,
            non_increasing_emissions_after_2100: false,
            global_min_level: Toggle::Disabled,
            regional_min_level: Toggle::Disabled,
            perc_reversible_damages: 1.0,
        }
    }
}
