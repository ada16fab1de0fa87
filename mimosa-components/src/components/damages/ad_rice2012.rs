use super::sealevel::{declare_sea_level, sea_level_constraints};
use super::{declare_damage_outputs, FLOOR_SCALE};
use crate::parameters::DamagesParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::expr::{soft_min, Expr};
use mimosa_core::registry::{
    Bounds, Declarations, ModelView, ParameterValue, VariableDeclaration,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Smoothing of the adaptation inputs before the power mean.
const ADAPTATION_FLOOR_SCALE: f64 = 0.005;

/// RICE 2012 damages with adaptation.
///
/// Gross damages grow with temperature as `a1 * T + a2 * T^a3`, measured from the
/// initial temperature. Adaptation divides them by `1 + adapt_level`, where the level
/// is a nested power mean of flow adaptation (`adapt_FAD`) and an adaptation stock
/// (`adapt_SAD`) accumulated from investment (`adapt_IAD`). Sea-level-rise damages
/// scale with the square root of the square root of GDP growth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdRice2012 {
    parameters: DamagesParameters,
}

impl AdRice2012 {
    pub fn from_parameters(parameters: DamagesParameters) -> Self {
        Self { parameters }
    }
}

/// Regional power-law damage coefficients.
#[derive(Debug, Clone)]
struct PowerDamage {
    a1: Vec<f64>,
    a2: Vec<f64>,
    a3: Vec<f64>,
}

impl PowerDamage {
    fn expr(&self, r: usize, temperature: Expr) -> Expr {
        self.a1[r] * temperature.clone() + self.a2[r] * temperature.powf(self.a3[r])
    }

    fn value(&self, r: usize, temperature: f64) -> f64 {
        self.a1[r] * temperature + self.a2[r] * temperature.powf(self.a3[r])
    }
}

#[typetag::serde]
impl Component for AdRice2012 {
    fn slot(&self) -> &'static str {
        "damages"
    }

    fn variant(&self) -> &'static str {
        "ad_rice2012"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declare_sea_level(declarations, &self.parameters.sea_level)?;

        let p = &self.parameters.ad_rice2012;
        if p.adapt_rho == 0.0 {
            return Err(MimosaError::invalid_option(
                "damages.ad_rice2012.adapt_rho",
                "the substitution exponent must not be zero",
            ));
        }
        let regions = declarations.grid().regions.clone();
        for (name, value) in [
            ("damage_a1", &p.damage_a1),
            ("damage_a2", &p.damage_a2),
            ("damage_a3", &p.damage_a3),
            ("adap1", &p.adap1),
            ("adap2", &p.adap2),
            ("adap3", &p.adap3),
            ("SLRdam1", &p.slr_dam1),
            ("SLRdam2", &p.slr_dam2),
        ] {
            let values = value.resolve(&regions, &format!("damages.ad_rice2012.{name}"))?;
            declarations.parameter(name, ParameterValue::Regional(values))?;
        }
        declarations.parameter("damage_scale_factor", p.damage_scale_factor)?;
        declarations.parameter("adapt_rho", p.adapt_rho)?;
        declarations.parameter("fixed_adaptation", p.fixed_adaptation)?;

        declare_damage_outputs(declarations)?;
        declarations.variable(VariableDeclaration::time_region("gross_damages"))?;
        declarations.variable(
            VariableDeclaration::time_region("adapt_level").bounds(Bounds::non_negative()),
        )?;
        declarations.variable(VariableDeclaration::time_region("adapt_costs"))?;
        for name in ["adapt_FAD", "adapt_IAD"] {
            declarations.variable(
                VariableDeclaration::time_region(name)
                    .bounds(Bounds::between(0.0, 0.15))
                    .initial(0.0),
            )?;
        }
        declarations.variable(
            VariableDeclaration::time_region("adapt_SAD")
                .bounds(Bounds::non_negative())
                .initial(0.01),
        )
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let mut constraints = sea_level_constraints(view)?;

        let t0 = view.scalar("T0")?;
        let dk = view.scalar("dk")?;
        let scale = view.scalar("damage_scale_factor")?;
        let damage = Arc::new(PowerDamage {
            a1: view.regional("damage_a1")?,
            a2: view.regional("damage_a2")?,
            a3: view.regional("damage_a3")?,
        });
        let slr_dam1 = view.regional("SLRdam1")?;
        let slr_dam2 = view.regional("SLRdam2")?;
        let adap1 = view.regional("adap1")?;
        let adap2 = view.regional("adap2")?;
        let adap3 = view.regional("adap3")?;
        let rho = view.scalar("adapt_rho")?;

        let temperature = view.time_var("temperature")?;
        let total_slr = view.time_var("total_SLR")?;
        let gdp_gross = view.regional_var("GDP_gross")?;
        let damage_costs = view.regional_var("damage_costs")?;
        let gross_damages = view.regional_var("gross_damages")?;
        let resid_damages = view.regional_var("resid_damages")?;
        let slr_damages = view.regional_var("SLR_damages")?;
        let level = view.regional_var("adapt_level")?;
        let adapt_costs = view.regional_var("adapt_costs")?;
        let fad = view.regional_var("adapt_FAD")?;
        let iad = view.regional_var("adapt_IAD")?;
        let sad = view.regional_var("adapt_SAD")?;
        let grid = view.grid().clone();

        constraints.extend([
            Constraint::regional("SLR_damages", move |t, r| {
                let s = total_slr.at(t);
                let growth = soft_min(gdp_gross.at(t, r) / gdp_gross.at(0, r), FLOOR_SCALE);
                slr_damages.at(t, r).equals(
                    4.0 * (slr_dam1[r] * s.clone() + slr_dam2[r] * s.powf(2.0)) * growth.powf(0.25),
                )
            }),
            Constraint::regional("gross_damages", move |t, r| {
                let warming = soft_min(temperature.at(t), FLOOR_SCALE);
                gross_damages
                    .at(t, r)
                    .equals(scale * (damage.expr(r, warming) - damage.value(r, t0)))
            }),
            Constraint::regional("resid_damages", move |t, r| {
                resid_damages
                    .at(t, r)
                    .equals(gross_damages.at(t, r) / (1.0 + level.at(t, r)) + slr_damages.at(t, r))
            }),
            Constraint::regional("adapt_SAD", move |t, r| {
                sad.at(t, r)
                    .equals((1.0 - dk).powf(grid.dt(t)) * sad.at(t - 1, r) + iad.at(t, r))
            })
            .skip_initial(),
            Constraint::regional_init("adapt_SAD_init", move |r| sad.at(0, r).equals(0.0)),
            Constraint::regional_init("adapt_IAD_init", move |r| iad.at(0, r).equals(0.0)),
            Constraint::regional_init("adapt_FAD_init", move |r| fad.at(0, r).equals(0.0)),
            Constraint::regional("adapt_level", move |t, r| {
                if t == 0 {
                    return level.at(0, r).equals(0.0);
                }
                let flow = soft_min(fad.at(t, r), ADAPTATION_FLOOR_SCALE).powf(rho);
                let stock = soft_min(sad.at(t, r), ADAPTATION_FLOOR_SCALE).powf(rho);
                level.at(t, r).equals(
                    adap1[r] * (adap2[r] * flow + (1.0 - adap2[r]) * stock).powf(adap3[r] / rho),
                )
            }),
            Constraint::regional("adapt_costs", move |t, r| {
                adapt_costs.at(t, r).equals(fad.at(t, r) + iad.at(t, r))
            }),
            Constraint::regional("damage_costs", move |t, r| {
                damage_costs
                    .at(t, r)
                    .equals(resid_damages.at(t, r) + adapt_costs.at(t, r))
            }),
        ]);

        if view.flag("fixed_adaptation")? {
            constraints.push(
                Constraint::regional("fixed_adaptation", move |t, r| iad.at(t, r).equals(0.0))
                    .skip_initial(),
            );
        }
        Ok(constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_vanishes_at_initial_temperature() {
        let damage = PowerDamage {
            a1: vec![0.0, 0.01],
            a2: vec![0.00236, 0.002],
            a3: vec![2.0, 2.5],
        };
        for r in 0..2 {
            let at_t0 = damage.expr(r, Expr::constant(1.1)).eval(&[]) - damage.value(r, 1.1);
            assert_eq!(at_t0, 0.0);
        }
        approx::assert_relative_eq!(damage.value(0, 3.0), 0.00236 * 9.0);
    }
}
