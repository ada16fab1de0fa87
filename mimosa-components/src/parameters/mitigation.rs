use mimosa_core::units::Quantity;
use serde::{Deserialize, Serialize};

/// Parameters of the regional marginal abatement cost curve.
///
/// The curve is a power law `MAC(a) = learning_factor[t] * gamma * a^beta`, with the
/// learning factor `exp(-lot_rate * (year(t) - year(0)))` lowering costs over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MitigationParameters {
    /// Carbon price at full abatement (`a = 1`).
    ///
    /// Default: 1146 USD/tCO2
    #[serde(rename = "MAC_gamma")]
    pub mac_gamma: Quantity,

    /// Exponent of the curve.
    ///
    /// Default: 3.0
    #[serde(rename = "MAC_beta")]
    pub mac_beta: f64,

    /// Learning over time: annual decline rate of abatement costs.
    ///
    /// Default: 0.0 per year
    pub lot_rate: f64,
}

impl Default for MitigationParameters {
    fn default() -> Self {
        Self {
            // trillion USD per GtCO2 when written without a unit
            mac_gamma: Quantity::dimensionless(1.146),
            mac_beta: 3.0,
            lot_rate: 0.0,
        }
    }
}
