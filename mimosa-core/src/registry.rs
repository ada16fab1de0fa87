//! The shared namespace of variables and parameters.
//!
//! Building a model happens in two phases.
//! In the first phase every component declares its variables and parameters through
//! [`Declarations`], which rejects a name that is already taken.
//! In the second phase the registry is frozen and components resolve the names they
//! need through a [`ModelView`] into typed handles and plain values.
//! Resolution fails fast on names that were never declared, so the constraint rules
//! built from the resolved handles cannot fail.

use crate::errors::{MimosaError, MimosaResult};
use crate::expr::Expr;
use crate::grid::{Grid, Index};
use crate::series::RegionalSeries;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The index set of a variable or constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Scalar,
    Time,
    TimeRegion,
}

impl Shape {
    /// Number of values of this shape on `grid`.
    pub fn len(&self, grid: &Grid) -> usize {
        match self {
            Shape::Scalar => 1,
            Shape::Time => grid.n_periods(),
            Shape::TimeRegion => grid.n_periods() * grid.n_regions(),
        }
    }

    /// Every index of this shape, in column order.
    pub fn indices(&self, grid: &Grid) -> Vec<Index> {
        match self {
            Shape::Scalar => vec![Index::Scalar],
            Shape::Time => grid.periods().map(Index::Time).collect(),
            Shape::TimeRegion => grid
                .periods()
                .flat_map(|t| grid.regions().map(move |r| Index::TimeRegion(t, r)))
                .collect(),
        }
    }

    /// The index at position `offset` within a block of this shape.
    pub fn index_at(&self, grid: &Grid, offset: usize) -> Index {
        match self {
            Shape::Scalar => Index::Scalar,
            Shape::Time => Index::Time(offset),
            Shape::TimeRegion => {
                Index::TimeRegion(offset / grid.n_regions(), offset % grid.n_regions())
            }
        }
    }

    /// Position of `index` within a block of this shape.
    pub fn offset(&self, grid: &Grid, index: Index) -> Option<usize> {
        match (self, index) {
            (Shape::Scalar, Index::Scalar) => Some(0),
            (Shape::Time, Index::Time(t)) if t < grid.n_periods() => Some(t),
            (Shape::TimeRegion, Index::TimeRegion(t, r))
                if t < grid.n_periods() && r < grid.n_regions() =>
            {
                Some(t * grid.n_regions() + r)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::Time => "time-indexed",
            Shape::TimeRegion => "time-region-indexed",
        };
        write!(f, "{name}")
    }
}

/// Inclusive interval a variable value must lie in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn free() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    pub fn non_negative() -> Self {
        Self::at_least(0.0)
    }

    pub fn at_least(lower: f64) -> Self {
        Self {
            lower,
            upper: f64::INFINITY,
        }
    }

    pub fn at_most(upper: f64) -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper,
        }
    }

    pub fn between(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn fixed(value: f64) -> Self {
        Self::between(value, value)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::free()
    }
}

type IndexFn<T> = Arc<dyn Fn(&Grid, Index) -> T + Send + Sync>;

/// Bounds of a variable, either the same everywhere or computed per index.
///
/// Per-index rules are evaluated once, when the solver problem is built.
#[derive(Clone)]
pub enum BoundRule {
    Uniform(Bounds),
    PerIndex(IndexFn<Bounds>),
}

impl BoundRule {
    pub fn at(&self, grid: &Grid, index: Index) -> Bounds {
        match self {
            BoundRule::Uniform(b) => *b,
            BoundRule::PerIndex(f) => f(grid, index),
        }
    }
}

impl fmt::Debug for BoundRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundRule::Uniform(b) => write!(f, "Uniform({}, {})", b.lower, b.upper),
            BoundRule::PerIndex(_) => write!(f, "PerIndex"),
        }
    }
}

/// Declaration of a decision variable.
///
/// ```
/// use mimosa_core::registry::{Bounds, VariableDeclaration};
///
/// let declaration = VariableDeclaration::time_region("relative_abatement")
///     .unit("1")
///     .bounds(Bounds::between(0.0, 2.0));
/// ```
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub name: String,
    pub shape: Shape,
    pub unit: String,
    pub bounds: BoundRule,
    /// Starting value handed to the solver. Not a constraint.
    pub initial: f64,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            unit: String::new(),
            bounds: BoundRule::Uniform(Bounds::free()),
            initial: 0.0,
        }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Scalar)
    }

    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Time)
    }

    pub fn time_region(name: impl Into<String>) -> Self {
        Self::new(name, Shape::TimeRegion)
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = BoundRule::Uniform(bounds);
        self
    }

    pub fn bounds_by(
        mut self,
        rule: impl Fn(&Grid, Index) -> Bounds + Send + Sync + 'static,
    ) -> Self {
        self.bounds = BoundRule::PerIndex(Arc::new(rule));
        self
    }

    pub fn initial(mut self, value: f64) -> Self {
        self.initial = value;
        self
    }
}

/// A declared variable and the block of solver columns it owns.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub shape: Shape,
    pub unit: String,
    pub bounds: BoundRule,
    pub initial: f64,
    pub owner: String,
    pub first_column: usize,
    pub n_columns: usize,
}

impl Variable {
    pub fn column(&self, grid: &Grid, index: Index) -> Option<usize> {
        self.shape
            .offset(grid, index)
            .map(|offset| self.first_column + offset)
    }
}

/// Value of a parameter.
///
/// `Disabled` and `Flag(false)` both mark a feature as absent. Only a numeric value
/// switches a tri-state feature on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Scalar(f64),
    Flag(bool),
    Text(String),
    Disabled,
    /// One value per period.
    Time(Vec<f64>),
    /// One value per region.
    Regional(Vec<f64>),
    RegionalText(Vec<String>),
    Series(RegionalSeries),
}

impl ParameterValue {
    fn kind(&self) -> &'static str {
        match self {
            ParameterValue::Scalar(_) => "scalar",
            ParameterValue::Flag(_) => "flag",
            ParameterValue::Text(_) => "text",
            ParameterValue::Disabled => "disabled",
            ParameterValue::Time(_) => "time-indexed",
            ParameterValue::Regional(_) => "regional",
            ParameterValue::RegionalText(_) => "regional text",
            ParameterValue::Series(_) => "series",
        }
    }

    /// Numeric value of a tri-state parameter, `None` if the feature is absent.
    pub fn as_toggle(&self) -> Option<Option<f64>> {
        match self {
            ParameterValue::Disabled | ParameterValue::Flag(false) => Some(None),
            ParameterValue::Scalar(v) => Some(Some(*v)),
            _ => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Scalar(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Flag(value)
    }
}

impl From<Option<f64>> for ParameterValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(ParameterValue::Disabled, ParameterValue::Scalar)
    }
}

impl From<RegionalSeries> for ParameterValue {
    fn from(value: RegionalSeries) -> Self {
        ParameterValue::Series(value)
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
    pub owner: String,
}

/// Owner recorded for parameters supplied directly to the model builder.
pub const EXOGENOUS_OWNER: &str = "exogenous";

/// Canonical namespace of a model instance.
#[derive(Debug, Clone)]
pub struct Registry {
    grid: Grid,
    variables: Vec<Variable>,
    parameters: Vec<Parameter>,
    names: HashMap<String, Entry>,
    n_columns: usize,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Variable(usize),
    Parameter(usize),
}

impl Registry {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            variables: Vec::new(),
            parameters: Vec::new(),
            names: HashMap::new(),
            n_columns: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Total number of solver columns.
    pub fn n_columns(&self) -> usize {
        self.n_columns
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        match self.names.get(name) {
            Some(Entry::Variable(i)) => Some(&self.variables[*i]),
            _ => None,
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        match self.names.get(name) {
            Some(Entry::Parameter(i)) => Some(&self.parameters[*i]),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// The component that declared `name`.
    pub fn owner(&self, name: &str) -> Option<&str> {
        match self.names.get(name)? {
            Entry::Variable(i) => Some(self.variables[*i].owner.as_str()),
            Entry::Parameter(i) => Some(self.parameters[*i].owner.as_str()),
        }
    }

    /// The variable owning solver column `col` and the index it represents.
    pub fn locate(&self, col: usize) -> Option<(&Variable, Index)> {
        let i = self
            .variables
            .partition_point(|v| v.first_column + v.n_columns <= col);
        let variable = self.variables.get(i)?;
        if col < variable.first_column {
            return None;
        }
        let index = variable
            .shape
            .index_at(&self.grid, col - variable.first_column);
        Some((variable, index))
    }

    fn check_free(&self, name: &str, owner: &str) -> MimosaResult<()> {
        match self.owner(name) {
            Some(existing) => Err(MimosaError::NameCollision {
                name: name.to_string(),
                component: owner.to_string(),
                existing: existing.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn declare_variable(
        &mut self,
        declaration: VariableDeclaration,
        owner: &str,
    ) -> MimosaResult<()> {
        self.check_free(&declaration.name, owner)?;
        let n_columns = declaration.shape.len(&self.grid);
        self.names.insert(
            declaration.name.clone(),
            Entry::Variable(self.variables.len()),
        );
        self.variables.push(Variable {
            name: declaration.name,
            shape: declaration.shape,
            unit: declaration.unit,
            bounds: declaration.bounds,
            initial: declaration.initial,
            owner: owner.to_string(),
            first_column: self.n_columns,
            n_columns,
        });
        self.n_columns += n_columns;
        Ok(())
    }

    pub fn declare_parameter(
        &mut self,
        name: &str,
        value: ParameterValue,
        owner: &str,
    ) -> MimosaResult<()> {
        self.check_free(name, owner)?;
        let expected = match &value {
            ParameterValue::Time(v) => Some((v.len(), self.grid.n_periods(), "periods")),
            ParameterValue::Regional(v) => Some((v.len(), self.grid.n_regions(), "regions")),
            ParameterValue::RegionalText(v) => Some((v.len(), self.grid.n_regions(), "regions")),
            ParameterValue::Series(s) => Some((s.n_regions(), self.grid.n_regions(), "regions")),
            _ => None,
        };
        if let Some((actual, expected, what)) = expected {
            if actual != expected {
                return Err(MimosaError::ShapeMismatch {
                    name: name.to_string(),
                    component: owner.to_string(),
                    expected: format!("{expected} {what}"),
                    actual: format!("{actual} {what}"),
                });
            }
        }
        self.names
            .insert(name.to_string(), Entry::Parameter(self.parameters.len()));
        self.parameters.push(Parameter {
            name: name.to_string(),
            value,
            owner: owner.to_string(),
        });
        Ok(())
    }
}

/// Phase-one access to the registry for a single component.
pub struct Declarations<'a> {
    registry: &'a mut Registry,
    owner: &'a str,
}

impl<'a> Declarations<'a> {
    pub fn new(registry: &'a mut Registry, owner: &'a str) -> Self {
        Self { registry, owner }
    }

    pub fn grid(&self) -> &Grid {
        self.registry.grid()
    }

    pub fn variable(&mut self, declaration: VariableDeclaration) -> MimosaResult<()> {
        self.registry.declare_variable(declaration, self.owner)
    }

    pub fn parameter(&mut self, name: &str, value: impl Into<ParameterValue>) -> MimosaResult<()> {
        self.registry
            .declare_parameter(name, value.into(), self.owner)
    }
}

/// Handle to a scalar variable.
#[derive(Debug, Clone, Copy)]
pub struct ScalarVar {
    column: usize,
}

impl ScalarVar {
    pub fn get(&self) -> Expr {
        Expr::Var(self.column)
    }
}

/// Handle to a time-indexed variable.
#[derive(Debug, Clone, Copy)]
pub struct TimeVar {
    first_column: usize,
}

impl TimeVar {
    /// Value at period `t`.
    pub fn at(&self, t: usize) -> Expr {
        Expr::Var(self.first_column + t)
    }
}

/// Handle to a time- and region-indexed variable.
#[derive(Debug, Clone, Copy)]
pub struct RegionalVar {
    first_column: usize,
    n_regions: usize,
}

impl RegionalVar {
    /// Value at period `t` in region `r`.
    pub fn at(&self, t: usize, r: usize) -> Expr {
        Expr::Var(self.first_column + t * self.n_regions + r)
    }

    /// Sum over all regions at period `t`.
    pub fn sum_regions(&self, t: usize) -> Expr {
        Expr::sum((0..self.n_regions).map(|r| self.at(t, r)))
    }
}

/// Phase-two, read-only access to the registry for a single component.
///
/// Every name resolved through the view is recorded so the model can link the
/// component to the components it depends on.
pub struct ModelView<'a> {
    registry: &'a Registry,
    component: &'a str,
    lookups: RefCell<Vec<String>>,
}

impl<'a> ModelView<'a> {
    pub fn new(registry: &'a Registry, component: &'a str) -> Self {
        Self {
            registry,
            component,
            lookups: RefCell::new(Vec::new()),
        }
    }

    pub fn grid(&self) -> &Grid {
        self.registry.grid()
    }

    pub fn component(&self) -> &str {
        self.component
    }

    /// Names resolved so far, in lookup order.
    pub fn into_lookups(self) -> Vec<String> {
        self.lookups.into_inner()
    }

    fn undeclared(&self, name: &str) -> MimosaError {
        MimosaError::UndeclaredName {
            component: self.component.to_string(),
            name: name.to_string(),
        }
    }

    fn mismatch(&self, name: &str, expected: impl ToString, actual: impl ToString) -> MimosaError {
        MimosaError::ShapeMismatch {
            name: name.to_string(),
            component: self.component.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    fn record(&self, name: &str) {
        self.lookups.borrow_mut().push(name.to_string());
    }

    fn variable(&self, name: &str, shape: Shape) -> MimosaResult<&'a Variable> {
        let registry: &'a Registry = self.registry;
        match registry.variable(name) {
            Some(v) if v.shape == shape => {
                self.record(name);
                Ok(v)
            }
            Some(v) => Err(self.mismatch(name, shape, v.shape)),
            None if registry.contains(name) => Err(self.mismatch(name, "variable", "parameter")),
            None => Err(self.undeclared(name)),
        }
    }

    fn parameter(&self, name: &str) -> MimosaResult<&'a ParameterValue> {
        let registry: &'a Registry = self.registry;
        match registry.parameter(name) {
            Some(p) => {
                self.record(name);
                Ok(&p.value)
            }
            None if registry.contains(name) => Err(self.mismatch(name, "parameter", "variable")),
            None => Err(self.undeclared(name)),
        }
    }

    pub fn scalar_var(&self, name: &str) -> MimosaResult<ScalarVar> {
        let v = self.variable(name, Shape::Scalar)?;
        Ok(ScalarVar {
            column: v.first_column,
        })
    }

    pub fn time_var(&self, name: &str) -> MimosaResult<TimeVar> {
        let v = self.variable(name, Shape::Time)?;
        Ok(TimeVar {
            first_column: v.first_column,
        })
    }

    pub fn regional_var(&self, name: &str) -> MimosaResult<RegionalVar> {
        let v = self.variable(name, Shape::TimeRegion)?;
        Ok(RegionalVar {
            first_column: v.first_column,
            n_regions: self.grid().n_regions(),
        })
    }

    /// A numeric scalar parameter.
    pub fn scalar(&self, name: &str) -> MimosaResult<f64> {
        match self.parameter(name)? {
            ParameterValue::Scalar(v) => Ok(*v),
            other => Err(self.mismatch(name, "scalar", other.kind())),
        }
    }

    /// A boolean parameter. A disabled parameter reads as `false`.
    pub fn flag(&self, name: &str) -> MimosaResult<bool> {
        match self.parameter(name)? {
            ParameterValue::Flag(v) => Ok(*v),
            ParameterValue::Disabled => Ok(false),
            other => Err(self.mismatch(name, "flag", other.kind())),
        }
    }

    /// A tri-state parameter: `None` when the feature is switched off.
    pub fn toggle(&self, name: &str) -> MimosaResult<Option<f64>> {
        let value = self.parameter(name)?;
        value
            .as_toggle()
            .ok_or_else(|| self.mismatch(name, "number or false", value.kind()))
    }

    pub fn text(&self, name: &str) -> MimosaResult<String> {
        match self.parameter(name)? {
            ParameterValue::Text(v) => Ok(v.clone()),
            other => Err(self.mismatch(name, "text", other.kind())),
        }
    }

    /// One value per period.
    pub fn time_param(&self, name: &str) -> MimosaResult<Vec<f64>> {
        match self.parameter(name)? {
            ParameterValue::Time(v) => Ok(v.clone()),
            ParameterValue::Scalar(v) => Ok(vec![*v; self.grid().n_periods()]),
            other => Err(self.mismatch(name, "time-indexed", other.kind())),
        }
    }

    /// One value per region. Scalars are broadcast to every region.
    pub fn regional(&self, name: &str) -> MimosaResult<Vec<f64>> {
        match self.parameter(name)? {
            ParameterValue::Regional(v) => Ok(v.clone()),
            ParameterValue::Scalar(v) => Ok(vec![*v; self.grid().n_regions()]),
            other => Err(self.mismatch(name, "regional", other.kind())),
        }
    }

    pub fn regional_text(&self, name: &str) -> MimosaResult<Vec<String>> {
        match self.parameter(name)? {
            ParameterValue::RegionalText(v) => Ok(v.clone()),
            ParameterValue::Text(v) => Ok(vec![v.clone(); self.grid().n_regions()]),
            other => Err(self.mismatch(name, "regional text", other.kind())),
        }
    }

    /// An exogenous series sampled at every `(t, r)` of the grid.
    pub fn series(&self, name: &str) -> MimosaResult<Arc<Array2<f64>>> {
        match self.parameter(name)? {
            ParameterValue::Series(s) => Ok(Arc::new(s.on_grid(self.grid())?)),
            other => Err(self.mismatch(name, "series", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RegionSet, TimeGrid};

    fn grid() -> Grid {
        Grid::new(
            TimeGrid::uniform(2020.0, 2040.0, 10.0).unwrap(),
            RegionSet::new(["A", "B"]).unwrap(),
        )
    }

    #[test]
    fn columns_are_contiguous() {
        let mut registry = Registry::new(grid());
        registry
            .declare_variable(VariableDeclaration::scalar("s"), "c")
            .unwrap();
        registry
            .declare_variable(VariableDeclaration::time("x"), "c")
            .unwrap();
        registry
            .declare_variable(VariableDeclaration::time_region("y"), "c")
            .unwrap();
        assert_eq!(registry.n_columns(), 1 + 3 + 6);

        let view = ModelView::new(&registry, "c");
        assert_eq!(view.time_var("x").unwrap().at(2), Expr::Var(3));
        assert_eq!(view.regional_var("y").unwrap().at(1, 1), Expr::Var(4 + 3));

        let (variable, index) = registry.locate(7).unwrap();
        assert_eq!(variable.name, "y");
        assert_eq!(index, Index::TimeRegion(1, 1));
        let (variable, index) = registry.locate(0).unwrap();
        assert_eq!(variable.name, "s");
        assert_eq!(index, Index::Scalar);
        assert!(registry.locate(10).is_none());
    }

    #[test]
    fn collisions_are_rejected() {
        let mut registry = Registry::new(grid());
        registry
            .declare_variable(VariableDeclaration::time("x"), "first")
            .unwrap();
        let err = registry
            .declare_parameter("x", ParameterValue::Scalar(1.0), "second")
            .unwrap_err();
        match err {
            MimosaError::NameCollision {
                name,
                component,
                existing,
            } => {
                assert_eq!(name, "x");
                assert_eq!(component, "second");
                assert_eq!(existing, "first");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parameter_shapes_are_checked() {
        let mut registry = Registry::new(grid());
        let err = registry
            .declare_parameter("p", ParameterValue::Regional(vec![1.0]), "c")
            .unwrap_err();
        assert!(matches!(err, MimosaError::ShapeMismatch { .. }));
    }

    #[test]
    fn undeclared_names_name_the_component() {
        let registry = Registry::new(grid());
        let view = ModelView::new(&registry, "damages:coacch");
        match view.regional_var("damage_costs").unwrap_err() {
            MimosaError::UndeclaredName { component, name } => {
                assert_eq!(component, "damages:coacch");
                assert_eq!(name, "damage_costs");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn tri_state_parameters() {
        let mut registry = Registry::new(grid());
        registry
            .declare_parameter("off", ParameterValue::Disabled, "c")
            .unwrap();
        registry
            .declare_parameter("false", ParameterValue::Flag(false), "c")
            .unwrap();
        registry
            .declare_parameter("zero", ParameterValue::Scalar(0.0), "c")
            .unwrap();
        registry
            .declare_parameter("true", ParameterValue::Flag(true), "c")
            .unwrap();

        let view = ModelView::new(&registry, "c");
        assert_eq!(view.toggle("off").unwrap(), None);
        assert_eq!(view.toggle("false").unwrap(), None);
        assert_eq!(view.toggle("zero").unwrap(), Some(0.0));
        assert!(view.toggle("true").is_err());
        assert!(!view.flag("off").unwrap());
    }

    #[test]
    fn lookups_are_recorded() {
        let mut registry = Registry::new(grid());
        registry
            .declare_parameter("p", ParameterValue::Scalar(2.0), "a")
            .unwrap();
        registry
            .declare_variable(VariableDeclaration::time("x"), "a")
            .unwrap();
        let view = ModelView::new(&registry, "b");
        view.scalar("p").unwrap();
        view.time_var("x").unwrap();
        assert!(view.scalar("x").is_err());
        assert_eq!(view.into_lookups(), vec!["p".to_string(), "x".to_string()]);
    }
}
