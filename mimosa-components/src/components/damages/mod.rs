//! Damages
//!
//! Every variant sets `damage_costs[t, r]`, the regional damages and adaptation costs
//! as a fraction of gross GDP, and shares the sea-level-rise sub-model.
//!
//! | Variant | Temperature damages | Adaptation |
//! |---------|---------------------|------------|
//! | `ad_rice2012` | power law per region | flow and stock adaptation |
//! | `coacch` | linear, quadratic or logistic per region and quantile | none |

mod ad_rice2012;
mod coacch;
mod sealevel;

pub use ad_rice2012::AdRice2012;
pub use coacch::Coacch;

use mimosa_core::errors::MimosaResult;
use mimosa_core::registry::{Declarations, VariableDeclaration};

/// Scale of the smoothed floor applied before fractional powers.
const FLOOR_SCALE: f64 = 1e-4;

/// The damage variables every variant sets.
fn declare_damage_outputs(declarations: &mut Declarations) -> MimosaResult<()> {
    for name in ["damage_costs", "resid_damages", "SLR_damages"] {
        declarations
            .variable(VariableDeclaration::time_region(name).unit("fraction_of_GDP"))?;
    }
    Ok(())
}
