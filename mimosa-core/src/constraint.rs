//! Tagged constraint rules returned by components.
//!
//! A [`Constraint`] is a named rule in one of four shapes. The rule is a closure over
//! handles and parameter values that were resolved when the component built it, and it
//! produces a [`Relation`] for each index it is asked about.
//!
//! An optional applicability predicate is evaluated before the rule. An index that is not
//! applicable emits no relation at all, leaving the index free rather than forcing a
//! trivially true relation into the model.

use crate::expr::Relation;
use crate::grid::{Grid, Index};
use crate::registry::Shape;
use std::fmt;

type Predicate = Box<dyn Fn(Index) -> bool + Send + Sync>;

/// The rule of a constraint, tagged by its shape.
pub enum Rule {
    /// One relation per period `t`.
    Global(Box<dyn Fn(usize) -> Relation + Send + Sync>),
    /// A single relation at `t = 0`.
    GlobalInit(Box<dyn Fn() -> Relation + Send + Sync>),
    /// One relation per period `t` and region `r`.
    Regional(Box<dyn Fn(usize, usize) -> Relation + Send + Sync>),
    /// One relation per region `r` at `t = 0`.
    RegionalInit(Box<dyn Fn(usize) -> Relation + Send + Sync>),
}

/// A named constraint rule.
pub struct Constraint {
    name: String,
    rule: Rule,
    applies: Option<Predicate>,
}

impl Constraint {
    pub fn global(
        name: impl Into<String>,
        rule: impl Fn(usize) -> Relation + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, Rule::Global(Box::new(rule)))
    }

    pub fn global_init(
        name: impl Into<String>,
        rule: impl Fn() -> Relation + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, Rule::GlobalInit(Box::new(rule)))
    }

    pub fn regional(
        name: impl Into<String>,
        rule: impl Fn(usize, usize) -> Relation + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, Rule::Regional(Box::new(rule)))
    }

    pub fn regional_init(
        name: impl Into<String>,
        rule: impl Fn(usize) -> Relation + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, Rule::RegionalInit(Box::new(rule)))
    }

    fn new(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
            applies: None,
        }
    }

    /// Restrict the constraint to the indices accepted by `predicate`.
    ///
    /// Calling this more than once requires every predicate to accept the index.
    pub fn when(mut self, predicate: impl Fn(Index) -> bool + Send + Sync + 'static) -> Self {
        let combined: Predicate = match self.applies.take() {
            None => Box::new(predicate),
            Some(existing) => Box::new(move |index| existing(index) && predicate(index)),
        };
        self.applies = Some(combined);
        self
    }

    /// Skip the initial period, for relations that refer to `t - 1`.
    pub fn skip_initial(self) -> Self {
        self.when(|index| index.period().is_some_and(|t| t > 0))
    }

    /// Only apply from period `first` onwards. `None` disables the constraint everywhere.
    pub fn from_period(self, first: Option<usize>) -> Self {
        self.when(move |index| match (first, index.period()) {
            (Some(first), Some(t)) => t >= first,
            _ => false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Index shape of the relations this constraint emits.
    pub fn shape(&self) -> Shape {
        match self.rule {
            Rule::Global(_) | Rule::GlobalInit(_) => Shape::Time,
            Rule::Regional(_) | Rule::RegionalInit(_) => Shape::TimeRegion,
        }
    }

    pub fn is_initial(&self) -> bool {
        matches!(self.rule, Rule::GlobalInit(_) | Rule::RegionalInit(_))
    }

    /// Whether the rule applies at `index`.
    pub fn applies(&self, index: Index) -> bool {
        self.applies.as_ref().map_or(true, |p| p(index))
    }

    /// Candidate indices of this constraint on `grid`, before applicability.
    pub fn candidate_indices(&self, grid: &Grid) -> Vec<Index> {
        match self.rule {
            Rule::Global(_) => grid.periods().map(Index::Time).collect(),
            Rule::GlobalInit(_) => vec![Index::Time(0)],
            Rule::Regional(_) => Shape::TimeRegion.indices(grid),
            Rule::RegionalInit(_) => grid.regions().map(|r| Index::TimeRegion(0, r)).collect(),
        }
    }

    /// Evaluate the rule at every applicable index.
    pub fn expand(&self, grid: &Grid) -> Vec<(Index, Relation)> {
        self.candidate_indices(grid)
            .into_iter()
            .filter(|index| self.applies(*index))
            .map(|index| (index, self.evaluate(index)))
            .collect()
    }

    fn evaluate(&self, index: Index) -> Relation {
        match (&self.rule, index) {
            (Rule::Global(f), Index::Time(t)) => f(t),
            (Rule::GlobalInit(f), _) => f(),
            (Rule::Regional(f), Index::TimeRegion(t, r)) => f(t, r),
            (Rule::RegionalInit(f), Index::TimeRegion(_, r)) => f(r),
            // candidate_indices only produces indices matching the rule shape
            (_, index) => unreachable!("index {index:?} does not match constraint shape"),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.rule {
            Rule::Global(_) => "Global",
            Rule::GlobalInit(_) => "GlobalInit",
            Rule::Regional(_) => "Regional",
            Rule::RegionalInit(_) => "RegionalInit",
        };
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("conditional", &self.applies.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::grid::{RegionSet, TimeGrid};

    fn grid() -> Grid {
        Grid::new(
            TimeGrid::uniform(2020.0, 2060.0, 10.0).unwrap(),
            RegionSet::new(["A", "B"]).unwrap(),
        )
    }

    #[test]
    fn expansion_counts() {
        let grid = grid();
        let global = Constraint::global("g", |t| Expr::Var(t).equals(1.0));
        let init = Constraint::global_init("g_init", || Expr::Var(0).equals(0.0));
        let regional = Constraint::regional("r", |t, r| Expr::Var(t * 2 + r).at_least(0.0));
        let regional_init = Constraint::regional_init("r_init", |r| Expr::Var(r).equals(0.0));

        assert_eq!(global.expand(&grid).len(), 5);
        assert_eq!(init.expand(&grid).len(), 1);
        assert_eq!(regional.expand(&grid).len(), 10);
        assert_eq!(regional_init.expand(&grid).len(), 2);
        assert!(regional_init.is_initial());
        assert_eq!(regional_init.shape(), Shape::TimeRegion);
    }

    #[test]
    fn skipped_indices_emit_nothing() {
        let grid = grid();
        let c = Constraint::regional("r", |t, r| Expr::Var(t * 2 + r).at_least(0.0)).skip_initial();
        let emitted = c.expand(&grid);
        assert_eq!(emitted.len(), 8);
        assert!(emitted.iter().all(|(index, _)| index.period() != Some(0)));
    }

    #[test]
    fn predicates_combine() {
        let grid = grid();
        let c = Constraint::global("g", |t| Expr::Var(t).equals(1.0))
            .skip_initial()
            .when(|index| index.period() != Some(3));
        let periods: Vec<_> = c
            .expand(&grid)
            .into_iter()
            .filter_map(|(index, _)| index.period())
            .collect();
        assert_eq!(periods, vec![1, 2, 4]);
    }

    #[test]
    fn from_period() {
        let grid = grid();
        let c = Constraint::global("g", |t| Expr::Var(t).at_most(1.0)).from_period(Some(3));
        assert_eq!(c.expand(&grid).len(), 2);
        let off = Constraint::global("g", |t| Expr::Var(t).at_most(1.0)).from_period(None);
        assert!(off.expand(&grid).is_empty());
    }
}
