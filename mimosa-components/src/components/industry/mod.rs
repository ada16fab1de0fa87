//! Industry
//!
//! Industry emissions are global. Both variants set
//! `emissions_industry_global_mitigation[t]` and `industry_mitigation_costs_global[t]`,
//! which the emission trade slot apportions to regions.
//!
//! | Variant | Abatement |
//! |---------|-----------|
//! | `mac` | own marginal abatement cost curve, price matched to the regional price |
//! | `energy` | reduction of the carbon intensity of a fixed energy throughput |
//!
//! The `energy` variant has no circular-economy channel and is only combined with the
//! `notrade` emission trade variant.

mod energy;
mod mac;

pub use energy::IndustryEnergy;
pub use mac::IndustryMac;

use mimosa_core::errors::{MimosaError, MimosaResult};
use mimosa_core::grid::RegionSet;
use mimosa_core::registry::{Declarations, ModelView, ParameterValue};

const REFERENCE_PARAMETER: &str = "industry_reference_region";

/// Index of the region whose carbon price industry follows, the first region if unset.
fn reference_region(
    regions: &RegionSet,
    label: Option<&str>,
    option: &str,
) -> MimosaResult<usize> {
    match label {
        None => Ok(0),
        Some(label) => regions.index_of(label).ok_or_else(|| {
            MimosaError::invalid_option(option, format!("unknown region `{label}`"))
        }),
    }
}

/// Declare the reference region as a text parameter, always naming a region of the grid.
pub(crate) fn declare_reference(
    declarations: &mut Declarations,
    label: Option<&str>,
    option: &str,
) -> MimosaResult<()> {
    let regions = &declarations.grid().regions;
    let r = reference_region(regions, label, option)?;
    let value = ParameterValue::Text(regions.label(r).to_string());
    declarations.parameter(REFERENCE_PARAMETER, value)
}

/// Index of the declared reference region.
pub(crate) fn resolve_reference(view: &ModelView) -> MimosaResult<usize> {
    let label = view.text(REFERENCE_PARAMETER)?;
    reference_region(&view.grid().regions, Some(&label), REFERENCE_PARAMETER)
}
