use serde::{Deserialize, Serialize};

/// Parameters of the exogenous economy.
///
/// Gross output follows the `GDP` scenario series. Net output subtracts damages and
/// abatement costs from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsParameters {
    /// Annual depreciation rate of capital, also used for the adaptation stock.
    ///
    /// Default: 0.1 per year
    pub dk: f64,
}

impl Default for EconomicsParameters {
    fn default() -> Self {
        Self { dk: 0.1 }
    }
}
