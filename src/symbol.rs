//! Ergonomic expression building: symbols, literals and operator overloading
//!
//! # Example
//! ```ignore
//! use symengine_jni::{int, sym};
//!
//! let probe = int(5).sin();           // sin(5)
//! let poly = sym("x").pow(2) + 1.0;   // x^2 + 1.0
//! ```

use crate::ast::{Constant, Expr};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Named free variable
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn to_expr(&self) -> Expr {
        Expr::symbol(&self.0)
    }

    /// Raise to a power
    pub fn pow(self, exp: impl Into<Expr>) -> Expr {
        Expr::pow(self.to_expr(), exp.into())
    }

    /// Two-argument arctangent: `y.atan2(x)` → `atan2(y, x)`
    pub fn atan2(self, x: impl Into<Expr>) -> Expr {
        self.to_expr().atan2(x)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate single-argument function methods for a type
macro_rules! impl_math_functions {
    ($type:ty, $converter:expr, $($fn_name:ident => $func_str:literal),* $(,)?) => {
        impl $type {
            $(
                pub fn $fn_name(self) -> Expr {
                    Expr::func($func_str, $converter(self))
                }
            )*
        }
    };
}

// Keep in sync with the single-argument entries of `functions::definitions`
macro_rules! math_function_list {
    ($macro_name:ident, $type:ty, $converter:expr) => {
        $macro_name!($type, $converter,
            sin => "sin", cos => "cos", tan => "tan",
            cot => "cot", sec => "sec", csc => "csc",
            asin => "asin", acos => "acos", atan => "atan",
            sinh => "sinh", cosh => "cosh", tanh => "tanh",
            asinh => "asinh", acosh => "acosh", atanh => "atanh",
            exp => "exp", ln => "ln", log10 => "log10", log2 => "log2",
            sqrt => "sqrt", cbrt => "cbrt",
            abs => "abs", sign => "sign", floor => "floor", ceil => "ceil",
        );
    };
}

math_function_list!(impl_math_functions, Symbol, |s: Symbol| s.to_expr());
math_function_list!(impl_math_functions, Expr, |e: Expr| e);

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        s.to_expr()
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::number(n)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::integer(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::integer(i64::from(n))
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Expr::constant(c)
    }
}

macro_rules! impl_binary_ops {
    ($lhs:ty, $rhs:ty, $to_lhs:expr, $to_rhs:expr) => {
        impl Add<$rhs> for $lhs {
            type Output = Expr;
            fn add(self, rhs: $rhs) -> Expr {
                Expr::add_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Sub<$rhs> for $lhs {
            type Output = Expr;
            fn sub(self, rhs: $rhs) -> Expr {
                Expr::sub_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Mul<$rhs> for $lhs {
            type Output = Expr;
            fn mul(self, rhs: $rhs) -> Expr {
                Expr::mul_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
        impl Div<$rhs> for $lhs {
            type Output = Expr;
            fn div(self, rhs: $rhs) -> Expr {
                Expr::div_expr($to_lhs(self), $to_rhs(rhs))
            }
        }
    };
}

impl_binary_ops!(Symbol, Symbol, |s: Symbol| s.to_expr(), |r: Symbol| r.to_expr());
impl_binary_ops!(Symbol, Expr, |s: Symbol| s.to_expr(), |r: Expr| r);
impl_binary_ops!(Symbol, f64, |s: Symbol| s.to_expr(), Expr::number);
impl_binary_ops!(Symbol, i64, |s: Symbol| s.to_expr(), Expr::integer);

impl_binary_ops!(Expr, Expr, |s: Expr| s, |r: Expr| r);
impl_binary_ops!(Expr, Symbol, |s: Expr| s, |r: Symbol| r.to_expr());
impl_binary_ops!(Expr, f64, |s: Expr| s, Expr::number);
impl_binary_ops!(Expr, i64, |s: Expr| s, Expr::integer);

impl Mul<Expr> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::mul_expr(Expr::number(self), rhs)
    }
}

impl Mul<Symbol> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Symbol) -> Expr {
        Expr::mul_expr(Expr::number(self), rhs.to_expr())
    }
}

impl Neg for Symbol {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul_expr(Expr::integer(-1), self.to_expr())
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul_expr(Expr::integer(-1), self)
    }
}

impl Expr {
    /// Raise to a power (Rust's `^` is XOR)
    #[inline]
    pub fn pow_of(self, exp: impl Into<Expr>) -> Expr {
        Expr::pow(self, exp.into())
    }

    /// Two-argument arctangent: `y.atan2(x)` → `atan2(y, x)`
    pub fn atan2(self, x: impl Into<Expr>) -> Expr {
        Expr::func_multi("atan2", vec![self, x.into()])
    }
}

/// Create a Symbol
pub fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

/// Exact integer literal, the equivalent of `Expression(n)`
pub fn int(n: i64) -> Expr {
    Expr::integer(n)
}

/// Real-double literal
pub fn num(n: f64) -> Expr {
    Expr::number(n)
}

pub fn pi() -> Expr {
    Expr::constant(Constant::Pi)
}

pub fn e() -> Expr {
    Expr::constant(Constant::E)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExprKind;

    #[test]
    fn test_symbol_basic() {
        let x = sym("x");
        assert_eq!(x.name(), "x");
        assert_eq!(format!("{}", x.to_expr()), "x");
    }

    #[test]
    fn test_symbol_arithmetic() {
        let x = sym("x");
        let y = sym("y");
        assert_eq!(format!("{}", x.clone() + y.clone()), "x + y");
        assert_eq!(format!("{}", x * y), "x * y");
    }

    #[test]
    fn test_int_literal_stays_exact() {
        let five = int(5);
        assert!(matches!(five.kind, ExprKind::Integer(5)));
        let also_five: Expr = 5i32.into();
        assert_eq!(five, also_five);
    }

    #[test]
    fn test_function_methods() {
        assert_eq!(format!("{}", int(5).sin()), "sin(5)");
        assert_eq!(format!("{}", sym("x").cos()), "cos(x)");
        assert_eq!(format!("{}", sym("y").atan2(sym("x"))), "atan2(y, x)");
        assert_eq!(sym("y").atan2(1i64), sym("y").to_expr().atan2(int(1)));
    }

    #[test]
    fn test_negation() {
        assert_eq!(format!("{}", -sym("x")), "-x");
    }
}
