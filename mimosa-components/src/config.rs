//! The configuration document of a model run
//!
//! A TOML document with one section per concern:
//!
//! ```toml
//! [time]
//! begin = 2020
//! end = 2100
//! dt = 5
//!
//! [regions]
//! labels = ["North", "South"]
//!
//! [scenario]
//! baseline_emissions = { years = [2020, 2100], values = { North = [20, 30], South = [15, 25] } }
//! population = { North = 1500, South = 6500 }
//! GDP = { years = [2020, 2100], values = [60, 250] }
//!
//! [components]
//! damages = "coacch"
//!
//! [emissions]
//! budget = "700 GtCO2"
//! inertia_global = false
//! ```
//!
//! Every section is optional and every field has a documented default. Unknown fields
//! are rejected when the document is read.

use crate::parameters::{
    DamagesParameters, EconomicsParameters, EmissionTradeParameters, EmissionsParameters,
    GlobalCostsParameters, IndustryParameters, MitigationParameters,
};
use mimosa_core::config::RegionalValue;
use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::grid::{Grid, RegionSet, TimeGrid};
use mimosa_core::series::RegionalSeries;
use mimosa_core::solver::SolverOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub time: TimeConfig,
    pub regions: RegionsConfig,
    pub scenario: ScenarioConfig,
    pub components: ComponentSelection,
    pub economics: EconomicsParameters,
    pub emissions: EmissionsParameters,
    pub mitigation: MitigationParameters,
    pub industry: IndustryParameters,
    pub emissiontrade: EmissionTradeParameters,
    pub damages: DamagesParameters,
    pub objective: GlobalCostsParameters,
    pub solver: SolverOptions,
}

impl ModelConfig {
    pub fn from_toml_str(input: &str) -> MimosaResult<Self> {
        toml::from_str(input).map_err(|e| MimosaError::Configuration(e.to_string()))
    }

    pub fn from_path(path: &Path) -> MimosaResult<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input).map_err(|e| match e {
            MimosaError::Configuration(details) => {
                MimosaError::Configuration(format!("{}: {details}", path.display()))
            }
            other => other,
        })
    }

    /// The time and region grid described by the `time` and `regions` sections.
    pub fn grid(&self) -> MimosaResult<Grid> {
        Ok(Grid::new(
            TimeGrid::uniform(self.time.begin, self.time.end, self.time.dt)?,
            RegionSet::new(self.regions.labels.iter().cloned())?,
        ))
    }
}

/// Uniform time grid from `begin` to `end` inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeConfig {
    /// Default: 2020
    pub begin: f64,
    /// Default: 2150
    pub end: f64,
    /// Years between periods.
    ///
    /// Default: 5
    pub dt: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            begin: 2020.0,
            end: 2150.0,
            dt: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionsConfig {
    /// Region labels in model order.
    ///
    /// Default: ["World"]
    pub labels: Vec<String>,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            labels: vec!["World".to_string()],
        }
    }
}

/// Exogenous scenario data.
///
/// Baseline emissions, population and GDP are required. Carbon intensity is only read
/// when baseline emissions follow GDP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// GtCO2/yr
    pub baseline_emissions: Option<SeriesConfig>,
    /// Million people
    pub population: Option<SeriesConfig>,
    /// Trillion USD/yr
    #[serde(rename = "GDP")]
    pub gdp: Option<SeriesConfig>,
    /// GtCO2 per trillion USD
    pub carbon_intensity: Option<SeriesConfig>,
}

/// Regional data, either constant in time or given at a list of years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesConfig {
    Table(SeriesTable),
    Constant(RegionalValue<f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesTable {
    pub years: Vec<f64>,
    /// One value per year, for all regions or per region label.
    pub values: RegionalValue<Vec<f64>>,
}

impl SeriesConfig {
    pub fn to_series(&self, regions: &RegionSet, option: &str) -> MimosaResult<RegionalSeries> {
        match self {
            SeriesConfig::Constant(value) => {
                Ok(RegionalSeries::constant(value.resolve(regions, option)?))
            }
            SeriesConfig::Table(table) => {
                let values = table.values.resolve(regions, option)?;
                RegionalSeries::new(table.years.clone(), values).map_err(|e| match e {
                    MimosaError::InvalidOption { details, .. } => {
                        MimosaError::invalid_option(option, details)
                    }
                    other => other,
                })
            }
        }
    }
}

/// The variant used for each slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentSelection {
    /// Default: "exogenous"
    pub economics: String,
    /// Default: "default"
    pub emissions: String,
    /// Default: "default"
    pub mitigation: String,
    /// Default: "mac"
    pub industry: String,
    /// Default: "notrade"
    pub emissiontrade: String,
    /// Default: "ad_rice2012"
    pub damages: String,
    /// Default: "globalcosts"
    pub objective: String,
}

impl ComponentSelection {
    /// `(slot, variant)` pairs in model order.
    pub fn slots(&self) -> [(&'static str, &str); 7] {
        [
            ("economics", &self.economics),
            ("emissions", &self.emissions),
            ("mitigation", &self.mitigation),
            ("industry", &self.industry),
            ("emissiontrade", &self.emissiontrade),
            ("damages", &self.damages),
            ("objective", &self.objective),
        ]
    }
}

impl Default for ComponentSelection {
    fn default() -> Self {
        Self {
            economics: "exogenous".to_string(),
            emissions: "default".to_string(),
            mitigation: "default".to_string(),
            industry: "mac".to_string(),
            emissiontrade: "notrade".to_string(),
            damages: "ad_rice2012".to_string(),
            objective: "globalcosts".to_string(),
        }
    }
}
