//! Industry parameters
//!
//! Both industry variants read their options from the `[industry]` section, each from
//! its own sub-table.

use mimosa_core::units::Quantity;
use serde::{Deserialize, Serialize};

/// Options of every industry variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndustryParameters {
    pub mac: IndustryMacParameters,
    pub energy: IndustryEnergyParameters,
}

/// Industry abated through its own marginal abatement cost curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndustryMacParameters {
    /// Industry carbon price at full abatement.
    ///
    /// Default: 1146 USD/tCO2
    #[serde(rename = "MAC_gamma")]
    pub mac_gamma: Quantity,

    /// Default: 3.0
    #[serde(rename = "MAC_beta")]
    pub mac_beta: f64,

    /// Region whose carbon price the industry price is matched to. The first region
    /// if unset.
    ///
    /// Default: none
    pub reference_region: Option<String>,

    /// Match the industry price to the labour-weighted mean of the regional prices
    /// instead of a single region.
    ///
    /// Default: false
    pub labour_weighted_price: bool,
}

impl Default for IndustryMacParameters {
    fn default() -> Self {
        Self {
            mac_gamma: Quantity::dimensionless(1.146),
            mac_beta: 3.0,
            reference_region: None,
            labour_weighted_price: false,
        }
    }
}

/// Industry emissions as energy throughput times carbon intensity.
///
/// Throughput and baseline intensity are held at fixed values. This is a calibration
/// configuration and a legitimate model choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndustryEnergyParameters {
    /// Energy used for primary material production.
    ///
    /// Default: 100 EJ/yr
    pub primary_material_energy: f64,

    /// Energy used for secondary material production.
    ///
    /// Default: 100 EJ/yr
    pub secondary_material_energy: f64,

    /// Baseline carbon intensity of industrial energy.
    ///
    /// Default: 0.05 GtCO2/EJ
    pub carbon_intensity: f64,

    /// Coefficient of the intensity reduction cost curve `c * a^e`.
    ///
    /// Default: 0.6
    pub mac_coefficient: f64,

    /// Default: 3.0
    pub mac_exponent: f64,

    /// Region whose carbon price the industry prices are matched to. The first region
    /// if unset.
    ///
    /// Default: none
    pub reference_region: Option<String>,
}

impl Default for IndustryEnergyParameters {
    fn default() -> Self {
        Self {
            primary_material_energy: 100.0,
            secondary_material_energy: 100.0,
            carbon_intensity: 0.05,
            mac_coefficient: 0.6,
            mac_exponent: 3.0,
            reference_region: None,
        }
    }
}
