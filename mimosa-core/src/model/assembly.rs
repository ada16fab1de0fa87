//! Folding the constraint lists of all components into one flat constraint set.

use crate::errors::{MimosaError, MimosaResult};
use crate::expr::{Expr, RelOp};
use crate::grid::Index;
use crate::problem::AssembledConstraint;
use crate::registry::Registry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::types::ComponentOutput;

/// Expand every constraint of every component at its applicable indices.
///
/// Fails if a constraint name is used twice, if an emitted relation does not reference
/// any variable, or if it references a column outside the registry.
pub(crate) fn assemble(
    registry: &Registry,
    outputs: &[ComponentOutput],
) -> MimosaResult<Vec<AssembledConstraint>> {
    let grid = registry.grid();
    let mut owners: HashMap<&str, &str> = HashMap::new();
    let mut assembled = Vec::new();

    for output in outputs {
        for constraint in &output.constraints {
            if let Some(existing) = owners.insert(constraint.name(), output.name.as_str()) {
                return Err(MimosaError::DuplicateConstraint {
                    name: constraint.name().to_string(),
                    component: output.name.clone(),
                    existing: existing.to_string(),
                });
            }

            let emitted = constraint.expand(grid);
            debug!(
                component = output.name.as_str(),
                constraint = constraint.name(),
                instances = emitted.len(),
                "expanded constraint"
            );
            for (index, relation) in emitted {
                let columns = relation.columns();
                let malformed = |details: String| MimosaError::MalformedConstraint {
                    constraint: constraint.name().to_string(),
                    component: output.name.clone(),
                    index,
                    details,
                };
                if columns.is_empty() {
                    return Err(malformed("relation does not reference any variable".into()));
                }
                if let Some(col) = columns.iter().find(|c| **c >= registry.n_columns()) {
                    return Err(malformed(format!("column {col} is outside the model")));
                }
                assembled.push(AssembledConstraint {
                    name: constraint.name().to_string(),
                    component: output.name.clone(),
                    index,
                    relation,
                });
            }
        }
    }

    check_recurrences(registry, &assembled)?;
    Ok(assembled)
}

/// Every variable that follows a recurrence `x[t] == f(x[t-1], ...)` must be pinned at the
/// initial period by an equality `x[0] == g(...)`.
fn check_recurrences(registry: &Registry, assembled: &[AssembledConstraint]) -> MimosaResult<()> {
    let grid = registry.grid();

    let anchored: HashSet<usize> = assembled
        .iter()
        .filter(|c| c.index.period() == Some(0))
        .filter_map(|c| c.relation.defined_column())
        .collect();

    let mut checked = HashSet::new();
    for c in assembled {
        let (RelOp::Eq, Expr::Var(col)) = (c.relation.op, &c.relation.lhs) else {
            continue;
        };
        let Some((variable, index)) = registry.locate(*col) else {
            continue;
        };
        let (previous, initial) = match index {
            Index::Time(t) if t > 0 => (Index::Time(t - 1), Index::Time(0)),
            Index::TimeRegion(t, r) if t > 0 => (Index::TimeRegion(t - 1, r), Index::TimeRegion(0, r)),
            _ => continue,
        };
        let Some(previous_col) = variable.column(grid, previous) else {
            continue;
        };
        if !c.relation.rhs.references(previous_col) {
            continue;
        }
        let Some(initial_col) = variable.column(grid, initial) else {
            continue;
        };
        if !checked.insert(initial_col) {
            continue;
        }
        let bounds = variable.bounds.at(grid, initial);
        let pinned = bounds.lower == bounds.upper;
        if !anchored.contains(&initial_col) && !pinned {
            return Err(MimosaError::UnanchoredRecurrence {
                variable: variable.name.clone(),
                index: initial,
            });
        }
    }
    Ok(())
}
