use super::mitigation_costs;
use mimosa_core::component::Component;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::registry::{Declarations, ModelView};
use serde::{Deserialize, Serialize};

/// Regional carbon prices without a circular-economy channel.
///
/// The circular-economy reduction is held at zero and only the industry costs are
/// shared out by labour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoTrade {}

#[typetag::serde]
impl Component for NoTrade {
    fn slot(&self) -> &'static str {
        "emissiontrade"
    }

    fn variant(&self) -> &'static str {
        "notrade"
    }

    fn declare(&self, _declarations: &mut Declarations) -> MimosaResult<()> {
        Ok(())
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let industry_costs = view.time_var("industry_mitigation_costs_global")?;
        let circular = view.time_var("emissions_industry_global_relative_reduction_from_CE")?;

        Ok(vec![
            mitigation_costs(view, vec![industry_costs])?,
            Constraint::global("no_circular_economy", move |t| {
                circular.at(t).equals(0.0)
            }),
        ])
    }
}
