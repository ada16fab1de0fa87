use super::{declare_reference, resolve_reference};
use crate::components::economics::labour_share;
use crate::components::mitigation::mac::{MacCurve, PowerMac};
use crate::components::mitigation::{COST_UNIT, PRICE_UNIT};
use crate::parameters::IndustryMacParameters;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::expr::Expr;
use mimosa_core::registry::{Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Industry abatement along its own power-law cost curve.
///
/// Industry emissions are baseline industry emissions reduced by the circular-economy
/// channel and then by the industry abatement `a_ind`:
/// `(1 - CE) * (1 - a_ind) * baseline`. The industry marginal cost is matched to the
/// carbon price of the reference region, or to the labour-weighted mean price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndustryMac {
    parameters: IndustryMacParameters,
}

impl IndustryMac {
    pub fn from_parameters(parameters: IndustryMacParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for IndustryMac {
    fn slot(&self) -> &'static str {
        "industry"
    }

    fn variant(&self) -> &'static str {
        "mac"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        let p = &self.parameters;
        let gamma = p
            .mac_gamma
            .value_in_str(PRICE_UNIT)
            .map_err(|e| e.in_context("industry.mac.MAC_gamma"))?;
        declarations.parameter("industry_MAC_gamma", gamma)?;
        declarations.parameter("industry_MAC_beta", p.mac_beta)?;
        declare_reference(
            declarations,
            p.reference_region.as_deref(),
            "industry.mac.reference_region",
        )?;
        declarations.parameter("industry_labour_weighted_price", p.labour_weighted_price)?;

        declarations.variable(
            VariableDeclaration::time("industry_mitigation_costs_global").unit(COST_UNIT),
        )
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let curve = PowerMac::resolve(view, "industry_MAC_gamma", "industry_MAC_beta")?;
        let learning = Arc::new(view.time_param("learning_factor")?);
        let baseline = view.time_var("emissions_industry_global_baseline")?;
        let emissions = view.time_var("emissions_industry_global_mitigation")?;
        let abatement = view.time_var("emissions_industry_global_relative_abatement")?;
        let circular = view.time_var("emissions_industry_global_relative_reduction_from_CE")?;
        let carbonprice = view.regional_var("carbonprice")?;
        let costs = view.time_var("industry_mitigation_costs_global")?;

        let reference = resolve_reference(view)?;

        let mut constraints = vec![
            Constraint::global("industry_abatement", move |t| {
                emissions.at(t).equals(
                    (1.0 - circular.at(t)) * (1.0 - abatement.at(t)) * baseline.at(t),
                )
            })
            .skip_initial(),
            Constraint::global_init("industry_abatement_init", move || {
                emissions.at(0).equals(baseline.at(0))
            }),
        ];

        let price_learning = learning.clone();
        if view.flag("industry_labour_weighted_price")? {
            let shares = Arc::new(labour_share(view)?);
            let n_regions = view.grid().n_regions();
            constraints.push(Constraint::global("industry_carbonprice", move |t| {
                let weighted =
                    Expr::sum((0..n_regions).map(|r| shares[[t, r]] * carbonprice.at(t, r)));
                (price_learning[t] * curve.mac(abatement.at(t))).equals(weighted)
            }));
        } else {
            constraints.push(Constraint::global("industry_carbonprice", move |t| {
                (price_learning[t] * curve.mac(abatement.at(t))).equals(carbonprice.at(t, reference))
            }));
        }

        constraints.push(Constraint::global("industry_mitigation_costs", move |t| {
            costs
                .at(t)
                .equals(learning[t] * curve.ac(abatement.at(t)) * baseline.at(t))
        }));
        Ok(constraints)
    }
}
