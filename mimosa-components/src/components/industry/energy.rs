use super::{declare_reference, resolve_reference};
use crate::components::mitigation::mac::{MacCurve, PowerMac};
use crate::components::mitigation::COST_UNIT;
use crate::parameters::IndustryEnergyParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::registry::{Bounds, Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ENERGY_RATE: &str = "EJ/yr";
const INTENSITY: &str = "GtCO2/EJ";

/// Industry emissions from energy throughput and its carbon intensity.
///
/// Emissions are `(primary + secondary) * intensity`. Mitigation lowers the intensity
/// by the fraction `relative_reduction_energy_carbon_intensity`, priced along a power
/// curve that is matched to the carbon price of the reference region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndustryEnergy {
    parameters: IndustryEnergyParameters,
}

impl IndustryEnergy {
    pub fn from_parameters(parameters: IndustryEnergyParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for IndustryEnergy {
    fn slot(&self) -> &'static str {
        "industry"
    }

    fn variant(&self) -> &'static str {
        "energy"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        let p = &self.parameters;
        for (option, value) in [
            ("primary_material_energy", p.primary_material_energy),
            ("secondary_material_energy", p.secondary_material_energy),
            ("carbon_intensity", p.carbon_intensity),
        ] {
            if value < 0.0 {
                return Err(MimosaError::invalid_option(
                    format!("industry.energy.{option}"),
                    "must not be negative",
                ));
            }
        }
        declarations.parameter("industry_primary_material_energy", p.primary_material_energy)?;
        declarations.parameter(
            "industry_secondary_material_energy",
            p.secondary_material_energy,
        )?;
        declarations.parameter("industry_energy_carbon_intensity", p.carbon_intensity)?;
        declarations.parameter("industry_energy_mac_coefficient", p.mac_coefficient)?;
        declarations.parameter("industry_energy_mac_exponent", p.mac_exponent)?;
        declare_reference(
            declarations,
            p.reference_region.as_deref(),
            "industry.energy.reference_region",
        )?;

        declarations.variable(
            VariableDeclaration::time("baseline_energy_primary_material").unit(ENERGY_RATE),
        )?;
        declarations.variable(
            VariableDeclaration::time("baseline_energy_secondary_material").unit(ENERGY_RATE),
        )?;
        declarations.variable(
            VariableDeclaration::time("baseline_energy_carbon_intensity").unit(INTENSITY),
        )?;
        declarations.variable(
            VariableDeclaration::time("mitigated_energy_carbon_intensity").unit(INTENSITY),
        )?;
        declarations.variable(
            VariableDeclaration::time("relative_reduction_energy_carbon_intensity")
                .bounds(Bounds::between(0.0, 1.0))
                .initial(0.0),
        )?;
        declarations.variable(
            VariableDeclaration::time("industry_mitigation_costs_global").unit(COST_UNIT),
        )
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let primary_energy = view.scalar("industry_primary_material_energy")?;
        let secondary_energy = view.scalar("industry_secondary_material_energy")?;
        let intensity = view.scalar("industry_energy_carbon_intensity")?;
        let curve = PowerMac::resolve(
            view,
            "industry_energy_mac_coefficient",
            "industry_energy_mac_exponent",
        )?;
        let learning = Arc::new(view.time_param("learning_factor")?);

        let primary = view.time_var("baseline_energy_primary_material")?;
        let secondary = view.time_var("baseline_energy_secondary_material")?;
        let baseline_intensity = view.time_var("baseline_energy_carbon_intensity")?;
        let mitigated_intensity = view.time_var("mitigated_energy_carbon_intensity")?;
        let reduction = view.time_var("relative_reduction_energy_carbon_intensity")?;
        let emissions = view.time_var("emissions_industry_global_mitigation")?;
        let costs = view.time_var("industry_mitigation_costs_global")?;
        let carbonprice = view.regional_var("carbonprice")?;

        let reference = resolve_reference(view)?;
        let price_learning = learning.clone();

        Ok(vec![
            Constraint::global("fixed_energy_carbon_intensity", move |t| {
                baseline_intensity.at(t).equals(intensity)
            }),
            Constraint::global("fixed_primary_material_energy", move |t| {
                primary.at(t).equals(primary_energy)
            }),
            Constraint::global("fixed_secondary_material_energy", move |t| {
                secondary.at(t).equals(secondary_energy)
            }),
            Constraint::global("mitigated_energy_carbon_intensity", move |t| {
                mitigated_intensity
                    .at(t)
                    .equals((1.0 - reduction.at(t)) * baseline_intensity.at(t))
            }),
            Constraint::global("energy_carbon_intensity_carbonprice", move |t| {
                (price_learning[t] * curve.mac(reduction.at(t)))
                    .equals(carbonprice.at(t, reference))
            }),
            Constraint::global("industry_emissions", move |t| {
                emissions
                    .at(t)
                    .equals((primary.at(t) + secondary.at(t)) * mitigated_intensity.at(t))
            }),
            Constraint::global("industry_mitigation_costs", move |t| {
                costs.at(t).equals(
                    learning[t]
                        * curve.ac(reduction.at(t))
                        * baseline_intensity.at(t)
                        * (primary.at(t) + secondary.at(t)),
                )
            }),
        ])
    }
}
