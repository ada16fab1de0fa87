//! Algebraic expressions over solver columns.
//!
//! Constraint rules build [`Expr`] trees from variable handles, parameters and constants
//! using ordinary arithmetic operators. Parameters are folded in as constants so the
//! solver only ever sees decision columns as unknowns.
//!
//! Every function that is only defined on part of the real line (fractional powers of a
//! possibly negative base) is expected to be guarded by [`soft_min`] when the base can
//! become negative at a trial point.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Const(f64),
    /// Value of solver column `n`.
    Var(usize),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Sum(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    Sqrt(Box<Expr>),
    Tanh(Box<Expr>),
    /// Smoothed `max(x, 0)` with smoothing scale `s`, see [`soft_min`].
    SoftMin(Box<Expr>, f64),
}

/// Smoothed approximation of `max(x, 0)`.
///
/// `(x + sqrt(x^2 + s^2)) / 2` is strictly positive for `s > 0`, continuously
/// differentiable, and tends to `x` for `x >> s` and to `0` for `x << -s`.
/// It is the floor applied to every base raised to a fractional power.
pub fn soft_min(x: Expr, scale: f64) -> Expr {
    match x {
        Expr::Const(v) => Expr::Const(soft_min_value(v, scale)),
        x => Expr::SoftMin(Box::new(x), scale),
    }
}

/// Numeric twin of [`soft_min`].
///
/// For negative `x` the algebraically equal form `s^2 / (2 (sqrt(x^2 + s^2) - x))` is
/// used, which avoids cancelling two nearly equal numbers.
pub fn soft_min_value(x: f64, scale: f64) -> f64 {
    let h = x.hypot(scale);
    if x >= 0.0 {
        0.5 * (x + h)
    } else {
        0.5 * scale * scale / (h - x)
    }
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    /// Sum of a sequence of expressions.
    ///
    /// Constant terms are folded into a single constant.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut constant = 0.0;
        let mut rest = Vec::new();
        for term in terms {
            match term {
                Expr::Const(v) => constant += v,
                Expr::Sum(inner) => rest.extend(inner),
                other => rest.push(other),
            }
        }
        if constant != 0.0 || rest.is_empty() {
            rest.push(Expr::Const(constant));
        }
        match rest.len() {
            1 => rest.pop().unwrap_or(Expr::Const(0.0)),
            _ => Expr::Sum(rest),
        }
    }

    /// Raise to a constant power.
    pub fn powf(self, exponent: f64) -> Self {
        match (self, exponent) {
            (x, e) if e == 1.0 => x,
            (Expr::Const(v), e) => Expr::Const(v.powf(e)),
            (x, e) => Expr::Pow(Box::new(x), Box::new(Expr::Const(e))),
        }
    }

    /// Raise to a power given by another expression.
    pub fn pow(self, exponent: Expr) -> Self {
        match exponent {
            Expr::Const(e) => self.powf(e),
            e => Expr::Pow(Box::new(self), Box::new(e)),
        }
    }

    pub fn exp(self) -> Self {
        match self {
            Expr::Const(v) => Expr::Const(v.exp()),
            x => Expr::Exp(Box::new(x)),
        }
    }

    pub fn sqrt(self) -> Self {
        match self {
            Expr::Const(v) => Expr::Const(v.sqrt()),
            x => Expr::Sqrt(Box::new(x)),
        }
    }

    pub fn tanh(self) -> Self {
        match self {
            Expr::Const(v) => Expr::Const(v.tanh()),
            x => Expr::Tanh(Box::new(x)),
        }
    }

    /// Evaluate at a point given as one value per solver column.
    pub fn eval(&self, x: &[f64]) -> f64 {
        match self {
            Expr::Const(v) => *v,
            Expr::Var(col) => x[*col],
            Expr::Neg(a) => -a.eval(x),
            Expr::Add(a, b) => a.eval(x) + b.eval(x),
            Expr::Sub(a, b) => a.eval(x) - b.eval(x),
            Expr::Mul(a, b) => a.eval(x) * b.eval(x),
            Expr::Div(a, b) => a.eval(x) / b.eval(x),
            Expr::Sum(terms) => terms.iter().map(|t| t.eval(x)).sum(),
            Expr::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Expr::Exp(a) => a.eval(x).exp(),
            Expr::Sqrt(a) => a.eval(x).sqrt(),
            Expr::Tanh(a) => a.eval(x).tanh(),
            Expr::SoftMin(a, s) => soft_min_value(a.eval(x), *s),
        }
    }

    /// The value of this expression if it references no columns.
    pub fn as_constant(&self) -> Option<f64> {
        if self.columns().is_empty() {
            Some(self.eval(&[]))
        } else {
            None
        }
    }

    /// All solver columns referenced by this expression.
    pub fn columns(&self) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut BTreeSet<usize>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(col) => {
                out.insert(*col);
            }
            Expr::Neg(a) | Expr::Exp(a) | Expr::Sqrt(a) | Expr::Tanh(a) | Expr::SoftMin(a, _) => {
                a.collect_columns(out)
            }
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => {
                a.collect_columns(out);
                b.collect_columns(out);
            }
            Expr::Sum(terms) => terms.iter().for_each(|t| t.collect_columns(out)),
        }
    }

    /// Whether `col` appears anywhere in this expression.
    pub fn references(&self, col: usize) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var(c) => *c == col,
            Expr::Neg(a) | Expr::Exp(a) | Expr::Sqrt(a) | Expr::Tanh(a) | Expr::SoftMin(a, _) => {
                a.references(col)
            }
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::Div(a, b)
            | Expr::Pow(a, b) => a.references(col) || b.references(col),
            Expr::Sum(terms) => terms.iter().any(|t| t.references(col)),
        }
    }

    /// Equality relation `self == rhs`.
    pub fn equals(self, rhs: impl Into<Expr>) -> Relation {
        Relation::new(self, RelOp::Eq, rhs.into())
    }

    /// Inequality relation `self <= rhs`.
    pub fn at_most(self, rhs: impl Into<Expr>) -> Relation {
        Relation::new(self, RelOp::Le, rhs.into())
    }

    /// Inequality relation `self >= rhs`.
    pub fn at_least(self, rhs: impl Into<Expr>) -> Relation {
        Relation::new(self, RelOp::Ge, rhs.into())
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Const(v) => Expr::Const(-v),
            Expr::Neg(inner) => *inner,
            x => Expr::Neg(Box::new(x)),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
            (Expr::Const(z), x) | (x, Expr::Const(z)) if z == 0.0 => x,
            (a, b) => Expr::Add(Box::new(a), Box::new(b)),
        }
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
            (x, Expr::Const(z)) if z == 0.0 => x,
            (Expr::Const(z), x) if z == 0.0 => -x,
            (a, b) => Expr::Sub(Box::new(a), Box::new(b)),
        }
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
            (Expr::Const(o), x) | (x, Expr::Const(o)) if o == 1.0 => x,
            (a, b) => Expr::Mul(Box::new(a), Box::new(b)),
        }
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a / b),
            (x, Expr::Const(o)) if o == 1.0 => x,
            (a, b) => Expr::Div(Box::new(a), Box::new(b)),
        }
    }
}

macro_rules! impl_scalar_ops {
    ($($trait:ident, $method:ident);*) => {
        $(
            impl $trait<f64> for Expr {
                type Output = Expr;

                fn $method(self, rhs: f64) -> Expr {
                    $trait::$method(self, Expr::Const(rhs))
                }
            }

            impl $trait<Expr> for f64 {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    $trait::$method(Expr::Const(self), rhs)
                }
            }
        )*
    };
}

impl_scalar_ops!(Add, add; Sub, sub; Mul, mul; Div, div);

/// Relational operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelOp {
    Eq,
    Le,
    Ge,
}

impl std::fmt::Display for RelOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            RelOp::Eq => "==",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        };
        write!(f, "{symbol}")
    }
}

/// A relation `lhs op rhs` produced by a constraint rule at a single index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub lhs: Expr,
    pub op: RelOp,
    pub rhs: Expr,
}

impl Relation {
    pub fn new(lhs: Expr, op: RelOp, rhs: Expr) -> Self {
        Self { lhs, op, rhs }
    }

    /// `lhs - rhs` at the point `x`.
    pub fn residual(&self, x: &[f64]) -> f64 {
        self.lhs.eval(x) - self.rhs.eval(x)
    }

    /// How far the point `x` is from satisfying this relation (zero when satisfied).
    pub fn violation(&self, x: &[f64]) -> f64 {
        let r = self.residual(x);
        let v = match self.op {
            RelOp::Eq => r.abs(),
            RelOp::Le => r.max(0.0),
            RelOp::Ge => (-r).max(0.0),
        };
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    }

    /// Columns referenced on either side.
    pub fn columns(&self) -> BTreeSet<usize> {
        let mut cols = self.lhs.columns();
        cols.extend(self.rhs.columns());
        cols
    }

    /// The column this relation defines, if it has the form `x[c] == f(...)`
    /// with `c` not appearing in `f`.
    pub fn defined_column(&self) -> Option<usize> {
        match (&self.op, &self.lhs) {
            (RelOp::Eq, Expr::Var(col)) if !self.rhs.references(*col) => Some(*col),
            _ => None,
        }
    }
}
