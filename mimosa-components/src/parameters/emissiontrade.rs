use serde::{Deserialize, Serialize};

/// Options of the emission trade variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionTradeParameters {
    /// Used by the variants with a circular-economy channel.
    pub circular_economy: CircularEconomyParameters,
}

/// The circular-economy (CE) abatement channel of industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircularEconomyParameters {
    /// Coefficients `c_k` of the polynomial MAC curve `sum_k c_k a^k`, lowest power
    /// first, in trillion USD per GtCO2.
    ///
    /// Default: [0.0, 0.0, 0.0, 0.8]
    pub mac_coefficients: Vec<f64>,

    /// Largest share of industry emissions the channel can remove, by calendar year.
    ///
    /// Default: 0 in 2020, 0.35 in 2050, 0.7 from 2100
    pub max_reduction: CeilingSchedule,
}

impl Default for CircularEconomyParameters {
    fn default() -> Self {
        Self {
            mac_coefficients: vec![0.0, 0.0, 0.0, 0.8],
            max_reduction: CeilingSchedule::default(),
        }
    }
}

/// A piecewise-linear value by calendar year, held constant outside its years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CeilingSchedule {
    pub years: Vec<f64>,
    pub values: Vec<f64>,
}

impl Default for CeilingSchedule {
    fn default() -> Self {
        Self {
            years: vec![2020.0, 2050.0, 2100.0],
            values: vec![0.0, 0.35, 0.7],
        }
    }
}
