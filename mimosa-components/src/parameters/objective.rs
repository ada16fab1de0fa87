use serde::{Deserialize, Serialize};

/// Parameters of the global costs objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalCostsParameters {
    /// Pure rate of time preference used to discount costs.
    ///
    /// Default: 0.015 per year
    pub prtp: f64,
}

impl Default for GlobalCostsParameters {
    fn default() -> Self {
        Self { prtp: 0.015 }
    }
}
