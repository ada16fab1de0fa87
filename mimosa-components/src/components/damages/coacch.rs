use super::declare_damage_outputs;
use super::sealevel::{declare_sea_level, sea_level_constraints};
use crate::parameters::{DamageForm, DamageFunctionParameters, DamagesParameters, Quantile};
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::expr::Expr;
use mimosa_core::grid::RegionSet;
use mimosa_core::registry::{Declarations, ModelView, ParameterValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// COACCH reduced-form damages.
///
/// Temperature damages (measured from the initial temperature) and sea-level-rise
/// damages each follow a per-region functional form. Coefficients give damages in
/// percent of GDP and are scaled by the factor of the selected quantile. There is no
/// adaptation channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Coacch {
    parameters: DamagesParameters,
}

impl Coacch {
    pub fn from_parameters(parameters: DamagesParameters) -> Self {
        Self { parameters }
    }
}

/// A damage function resolved for every region.
#[derive(Debug, Clone)]
struct DamageFunction {
    form: Vec<DamageForm>,
    a: Vec<f64>,
    b1: Vec<f64>,
    b2: Vec<f64>,
    b3: Vec<f64>,
}

impl DamageFunction {
    /// Damages in fraction of GDP for region `r`.
    fn expr(&self, r: usize, x: Expr) -> Expr {
        let (a, b1, b2, b3) = (self.a[r], self.b1[r], self.b2[r], self.b3[r]);
        let percent = match self.form[r] {
            DamageForm::RobustLinear | DamageForm::OlsLinear => b1 * x,
            DamageForm::RobustQuadratic | DamageForm::OlsQuadratic => {
                b1 * x.clone() + b2 * x.powf(2.0)
            }
            DamageForm::RobustLogistic | DamageForm::OlsLogistic => {
                b1 / (1.0 + b2 * (-b3 * x).exp()) - b1 / (1.0 + b2)
            }
        };
        a * percent / 100.0
    }

    fn value(&self, r: usize, x: f64) -> f64 {
        self.expr(r, Expr::constant(x)).eval(&[])
    }

    fn from_view(view: &ModelView, prefix: &str) -> MimosaResult<Self> {
        let form = view
            .regional_text(&format!("damage_{prefix}_form"))?
            .iter()
            .map(|label| label.parse())
            .collect::<MimosaResult<Vec<DamageForm>>>()?;
        Ok(Self {
            form,
            a: view.regional(&format!("damage_{prefix}_a"))?,
            b1: view.regional(&format!("damage_{prefix}_b1"))?,
            b2: view.regional(&format!("damage_{prefix}_b2"))?,
            b3: view.regional(&format!("damage_{prefix}_b3"))?,
        })
    }
}

fn declare_damage_function(
    declarations: &mut Declarations,
    regions: &RegionSet,
    quantile: Quantile,
    prefix: &str,
    parameters: &DamageFunctionParameters,
) -> MimosaResult<()> {
    let option = |field: &str| format!("damages.coacch.{prefix}.{field}");
    let forms = parameters.form.resolve(regions, &option("form"))?;
    declarations.parameter(
        &format!("damage_{prefix}_form"),
        ParameterValue::RegionalText(forms.iter().map(|f| f.label().to_string()).collect()),
    )?;
    for (field, value) in [
        ("b1", &parameters.b1),
        ("b2", &parameters.b2),
        ("b3", &parameters.b3),
        ("a", parameters.a.select(quantile)),
    ] {
        let values = value.resolve(regions, &option(field))?;
        declarations.parameter(
            &format!("damage_{prefix}_{field}"),
            ParameterValue::Regional(values),
        )?;
    }
    Ok(())
}

#[typetag::serde]
impl Component for Coacch {
    fn slot(&self) -> &'static str {
        "damages"
    }

    fn variant(&self) -> &'static str {
        "coacch"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declare_sea_level(declarations, &self.parameters.sea_level)?;

        let p = &self.parameters.coacch;
        let regions = declarations.grid().regions.clone();
        declare_damage_function(declarations, &regions, p.quantile, "noslr", &p.noslr)?;
        declare_damage_function(declarations, &regions, p.quantile, "slr", &p.slr)?;
        declare_damage_outputs(declarations)
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let mut constraints = sea_level_constraints(view)?;

        let t0 = view.scalar("T0")?;
        let noslr = Arc::new(DamageFunction::from_view(view, "noslr")?);
        let slr = Arc::new(DamageFunction::from_view(view, "slr")?);
        let temperature = view.time_var("temperature")?;
        let total_slr = view.time_var("total_SLR")?;
        let damage_costs = view.regional_var("damage_costs")?;
        let resid_damages = view.regional_var("resid_damages")?;
        let slr_damages = view.regional_var("SLR_damages")?;

        constraints.extend([
            Constraint::regional("resid_damages", move |t, r| {
                resid_damages
                    .at(t, r)
                    .equals(noslr.expr(r, temperature.at(t)) - noslr.value(r, t0))
            }),
            Constraint::regional("SLR_damages", move |t, r| {
                slr_damages.at(t, r).equals(slr.expr(r, total_slr.at(t)))
            }),
            Constraint::regional("damage_costs", move |t, r| {
                damage_costs
                    .at(t, r)
                    .equals(resid_damages.at(t, r) + slr_damages.at(t, r))
            }),
        ]);
        Ok(constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single(form: DamageForm, b1: f64, b2: f64, b3: f64) -> DamageFunction {
        DamageFunction {
            form: vec![form],
            a: vec![1.8],
            b1: vec![b1],
            b2: vec![b2],
            b3: vec![b3],
        }
    }

    #[test]
    fn functional_forms() {
        let linear = single(DamageForm::OlsLinear, 2.0, 0.0, 0.0);
        assert_relative_eq!(linear.value(0, 3.0), 1.8 * 2.0 * 3.0 / 100.0);

        let quadratic = single(DamageForm::RobustQuadratic, 0.1, 0.3, 0.0);
        assert_relative_eq!(
            quadratic.value(0, 2.0),
            1.8 * (0.1 * 2.0 + 0.3 * 4.0) / 100.0
        );

        let logistic = single(DamageForm::RobustLogistic, 10.0, 50.0, 1.2);
        assert_relative_eq!(logistic.value(0, 0.0), 0.0);
        let expected = 1.8 * (10.0 / (1.0 + 50.0 * (-1.2f64 * 2.5).exp()) - 10.0 / 51.0) / 100.0;
        assert_relative_eq!(logistic.value(0, 2.5), expected, epsilon = 1e-12);
    }

    #[test]
    fn expression_matches_value() {
        let logistic = single(DamageForm::OlsLogistic, 10.0, 50.0, 1.2);
        let expr = logistic.expr(0, Expr::Var(0));
        assert_relative_eq!(expr.eval(&[1.7]), logistic.value(0, 1.7), epsilon = 1e-12);
    }
}
