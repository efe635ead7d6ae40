//! Angle expressions for rotation gates.
//!
//! Angles are kept as small expression trees rather than bare floats so
//! that a circuit can carry a free symbol until it is bound, and so that
//! negating a constant for an inverse gate stays a constant.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Div, Mul, Neg};

use crate::error::{IrError, IrResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Constant(f64),
    /// A named free parameter, e.g. `theta`.
    Symbol(String),
    Pi,
    Neg(Box<ParameterExpression>),
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

use ParameterExpression as Expr;

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        Expr::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn pi() -> Self {
        Expr::Pi
    }

    pub fn is_symbolic(&self) -> bool {
        self.first_symbol().is_some()
    }

    /// Numeric value, or `None` if a symbol is free or a divisor is zero.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expr::Constant(v) => Some(*v),
            Expr::Pi => Some(PI),
            Expr::Symbol(_) => None,
            Expr::Neg(e) => e.as_f64().map(|v| -v),
            Expr::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            Expr::Div(a, b) => {
                let (n, d) = (a.as_f64()?, b.as_f64()?);
                (d != 0.0).then(|| n / d)
            }
        }
    }

    /// Like [`as_f64`](Self::as_f64), but says which symbol is missing.
    pub fn evaluate(&self) -> IrResult<f64> {
        self.as_f64().ok_or_else(|| {
            IrError::UnboundParameter(
                self.first_symbol()
                    .map_or_else(|| self.to_string(), str::to_string),
            )
        })
    }

    /// Leftmost free symbol.
    pub fn first_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(name) => Some(name),
            Expr::Constant(_) | Expr::Pi => None,
            Expr::Neg(e) => e.first_symbol(),
            Expr::Mul(a, b) | Expr::Div(a, b) => a.first_symbol().or_else(|| b.first_symbol()),
        }
    }

    /// Replace every occurrence of symbol `name` with `value`.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        let rebind = |e: &Expr| Box::new(e.bind(name, value));
        match self {
            Expr::Symbol(n) if n == name => Expr::Constant(value),
            Expr::Constant(_) | Expr::Pi | Expr::Symbol(_) => self.clone(),
            Expr::Neg(e) => Expr::Neg(rebind(e)),
            Expr::Mul(a, b) => Expr::Mul(rebind(a), rebind(b)),
            Expr::Div(a, b) => Expr::Div(rebind(a), rebind(b)),
        }
    }

    /// Collapse to a `Constant` when no symbol is free.
    pub fn simplify(&self) -> Self {
        self.as_f64().map_or_else(|| self.clone(), Expr::Constant)
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Expr::Symbol(name) => f.write_str(name),
            Expr::Pi => f.write_str("π"),
            Expr::Neg(e) => write!(f, "-({e})"),
            Expr::Mul(a, b) => write!(f, "({a} * {b})"),
            Expr::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}

impl Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl Neg for ParameterExpression {
    type Output = Self;

    /// Constants negate in place and double negation cancels.
    fn neg(self) -> Self {
        match self {
            Expr::Constant(v) => Expr::Constant(-v),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_and_pi() {
        assert_eq!(Expr::constant(1.5).as_f64(), Some(1.5));
        assert!(!Expr::pi().is_symbolic());

        let quarter = Expr::pi() / Expr::constant(4.0);
        assert!((quarter.as_f64().unwrap() - PI / 4.0).abs() < 1e-12);
        assert_eq!(quarter.simplify(), Expr::Constant(PI / 4.0));
    }

    #[test]
    fn test_division_by_zero_has_no_value() {
        let p = Expr::pi() / Expr::constant(0.0);
        assert_eq!(p.as_f64(), None);
        assert!(matches!(p.evaluate(), Err(IrError::UnboundParameter(_))));
    }

    #[test]
    fn test_evaluate_reports_free_symbol() {
        let p = Expr::pi() * Expr::symbol("theta");
        assert!(p.is_symbolic());
        match p.evaluate() {
            Err(IrError::UnboundParameter(name)) => assert_eq!(name, "theta"),
            other => panic!("expected unbound parameter, got {other:?}"),
        }
        assert!((Expr::pi().evaluate().unwrap() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_bind() {
        let p = Expr::constant(4.0) * Expr::symbol("phi");
        let bound = p.bind("phi", 0.25);
        assert!(!bound.is_symbolic());
        assert!((bound.as_f64().unwrap() - 1.0).abs() < 1e-12);

        // Other symbols are left alone.
        assert_eq!(p.bind("theta", 1.0), p);
    }

    #[test]
    fn test_negation_stays_flat() {
        assert_eq!(-Expr::constant(0.5), Expr::Constant(-0.5));
        assert_eq!(-(-Expr::symbol("theta")), Expr::symbol("theta"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{:.3}", Expr::constant(PI / 2.0)), "1.571");
        assert_eq!((Expr::pi() / Expr::constant(2.0)).to_string(), "(π / 2)");
    }
}
