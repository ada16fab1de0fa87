//! Component parameters
//!
//! Each component has a parameters struct with documented defaults. The structs are
//! also the sections of the configuration document, so every field can be set from
//! TOML and unknown fields are rejected.

mod damages;
mod economics;
mod emissions;
mod emissiontrade;
mod industry;
mod mitigation;
mod objective;

pub use damages::{
    AdRice2012Parameters, CoacchParameters, DamageForm, DamageFunctionParameters,
    DamagesParameters, Quantile, QuantileFactors, SeaLevelParameters,
};
pub use economics::EconomicsParameters;
pub use emissions::EmissionsParameters;
pub use emissiontrade::{CeilingSchedule, CircularEconomyParameters, EmissionTradeParameters};
pub use industry::{IndustryEnergyParameters, IndustryMacParameters, IndustryParameters};
pub use mitigation::MitigationParameters;
pub use objective::GlobalCostsParameters;
