//! Building a model from its configuration

use crate::components::damages::{AdRice2012, Coacch};
use crate::components::economics::{ExogenousEconomics, GDP_SERIES, POPULATION_SERIES};
use crate::components::emissions::{Emissions, BASELINE_EMISSIONS_SERIES, CARBON_INTENSITY_SERIES};
use crate::components::emissiontrade::{GlobalPrice, NoTrade, NoTradeCircularEconomy};
use crate::components::industry::{IndustryEnergy, IndustryMac};
use crate::components::mitigation::Mitigation;
use crate::components::objective::GlobalCosts;
use crate::config::{ModelConfig, SeriesConfig};
use mimosa_core::component::Component;
use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::model::{Model, ModelBuilder};
use std::sync::Arc;
use tracing::info;

/// Variants available for each slot, in model order.
pub const VARIANTS: [(&str, &[&str]); 7] = [
    ("economics", &["exogenous"]),
    ("emissions", &["default"]),
    ("mitigation", &["default"]),
    ("industry", &["mac", "energy"]),
    ("emissiontrade", &["notrade", "notrade_ce", "globalprice"]),
    ("damages", &["ad_rice2012", "coacch"]),
    ("objective", &["globalcosts"]),
];

/// Create the component for `variant` of `slot` with its options from `config`.
pub fn component(
    slot: &str,
    variant: &str,
    config: &ModelConfig,
) -> MimosaResult<Arc<dyn Component>> {
    let component: Arc<dyn Component> = match (slot, variant) {
        ("economics", "exogenous") => Arc::new(ExogenousEconomics::from_parameters(
            config.economics.clone(),
        )),
        ("emissions", "default") => {
            Arc::new(Emissions::from_parameters(config.emissions.clone()))
        }
        ("mitigation", "default") => {
            Arc::new(Mitigation::from_parameters(config.mitigation.clone()))
        }
        ("industry", "mac") => Arc::new(IndustryMac::from_parameters(config.industry.mac.clone())),
        ("industry", "energy") => Arc::new(IndustryEnergy::from_parameters(
            config.industry.energy.clone(),
        )),
        ("emissiontrade", "notrade") => Arc::new(NoTrade::default()),
        ("emissiontrade", "notrade_ce") => Arc::new(NoTradeCircularEconomy::from_parameters(
            config.emissiontrade.clone(),
        )),
        ("emissiontrade", "globalprice") => {
            Arc::new(GlobalPrice::from_parameters(config.emissiontrade.clone()))
        }
        ("damages", "ad_rice2012") => Arc::new(AdRice2012::from_parameters(config.damages.clone())),
        ("damages", "coacch") => Arc::new(Coacch::from_parameters(config.damages.clone())),
        ("objective", "globalcosts") => {
            Arc::new(GlobalCosts::from_parameters(config.objective.clone()))
        }
        _ => {
            return Err(MimosaError::UnknownVariant {
                slot: slot.to_string(),
                variant: variant.to_string(),
            })
        }
    };
    Ok(component)
}

/// Variant pairs that do not form one equation set.
///
/// The energy industry variant computes emissions from its own throughput, so a
/// circular-economy channel would be charged without removing any emissions.
const INCOMPATIBLE: [((&str, &str), (&str, &str)); 2] = [
    (("industry", "energy"), ("emissiontrade", "notrade_ce")),
    (("industry", "energy"), ("emissiontrade", "globalprice")),
];

fn check_compatible(slots: &[(&'static str, &str)]) -> MimosaResult<()> {
    for (first, second) in INCOMPATIBLE {
        if slots.contains(&first) && slots.contains(&second) {
            return Err(MimosaError::invalid_option(
                format!("components.{}", second.0),
                format!(
                    "`{}` cannot be combined with {} = \"{}\"",
                    second.1, first.0, first.1
                ),
            ));
        }
    }
    Ok(())
}

fn required<'a>(series: &'a Option<SeriesConfig>, option: &str) -> MimosaResult<&'a SeriesConfig> {
    series
        .as_ref()
        .ok_or_else(|| MimosaError::invalid_option(option, "this scenario series is required"))
}

/// Build the model described by `config`.
///
/// The scenario series are registered as exogenous parameters, then one component per
/// slot is added in slot order.
pub fn build_model(config: &ModelConfig) -> MimosaResult<Model> {
    let slots = config.components.slots();
    check_compatible(&slots)?;
    let grid = config.grid()?;
    let regions = grid.regions.clone();
    let scenario = &config.scenario;

    let mut builder = ModelBuilder::new(grid);
    for (name, series, option) in [
        (
            BASELINE_EMISSIONS_SERIES,
            &scenario.baseline_emissions,
            "scenario.baseline_emissions",
        ),
        (POPULATION_SERIES, &scenario.population, "scenario.population"),
        (GDP_SERIES, &scenario.gdp, "scenario.GDP"),
    ] {
        let series = required(series, option)?.to_series(&regions, option)?;
        builder.with_parameter(name, series);
    }
    match &scenario.carbon_intensity {
        Some(series) => {
            let series = series.to_series(&regions, "scenario.carbon_intensity")?;
            builder.with_parameter(CARBON_INTENSITY_SERIES, series);
        }
        None if config.emissions.baseline_carbon_intensity => {
            return Err(MimosaError::invalid_option(
                "scenario.carbon_intensity",
                "required when emissions.baseline_carbon_intensity is set",
            ));
        }
        None => {}
    }

    for (slot, variant) in slots {
        builder.with_component(component(slot, variant, config)?);
    }
    let model = builder.build()?;
    info!(
        regions = regions.len(),
        periods = model.grid().n_periods(),
        constraints = model.constraints().len(),
        "model built from configuration"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_variant_exists() {
        let config = ModelConfig::default();
        for (slot, variants) in VARIANTS {
            for variant in variants {
                let component = component(slot, variant, &config).unwrap();
                assert_eq!(component.slot(), slot);
                assert_eq!(component.variant(), *variant);
            }
        }
    }

    #[test]
    fn unknown_variant() {
        let err = component("damages", "dice", &ModelConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            MimosaError::UnknownVariant { ref slot, ref variant } if slot == "damages" && variant == "dice"
        ));
    }

    #[test]
    fn energy_industry_without_circular_economy() {
        let mut selection = ModelConfig::default().components;
        selection.industry = "energy".to_string();
        assert!(check_compatible(&selection.slots()).is_ok());

        for trade in ["notrade_ce", "globalprice"] {
            selection.emissiontrade = trade.to_string();
            let err = check_compatible(&selection.slots()).unwrap_err();
            assert!(matches!(
                err,
                MimosaError::InvalidOption { ref option, .. } if option == "components.emissiontrade"
            ));
            assert!(err.to_string().contains(trade), "{err}");
        }
    }

    #[test]
    fn missing_scenario_series() {
        let err = build_model(&ModelConfig::default()).unwrap_err();
        assert!(err.to_string().contains("scenario.baseline_emissions"));
    }
}
