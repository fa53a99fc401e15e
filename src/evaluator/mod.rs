//! Numeric evaluation of expression trees
//!
//! [`Evalf`] reduces a closed expression (no free symbols, or only symbols
//! bound with [`Evalf::bind`]) to a floating-point value.
//!
//! # Precision
//! | bits | `evalf` result | scalar |
//! |------|----------------|--------|
//! | 1..=24 | real double | `f32` |
//! | 25..=53 | real double | `f64` |
//! | 54..=96 | extended real | `Decimal` (see [`decimal`]) |
//!
//! Larger requests are clamped to 96 bits.
//!
//! # Example
//! ```
//! use symengine_jni::{Evalf, int};
//!
//! let value = Evalf::new().eval_double(&int(5).sin()).unwrap();
//! assert!((value - 5.0f64.sin()).abs() < 1e-15);
//! ```

pub(crate) mod decimal;

use crate::error::EvalError;
use crate::functions::Registry;
use crate::math::{eval_builtin, eval_pow};
use crate::traits::MathScalar;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, DEFAULT_PRECISION_BITS, Expr, ExprKind};
use decimal::{DECIMAL_MANTISSA_BITS, DecimalError};
use rust_decimal::prelude::ToPrimitive;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Builder for numeric evaluation
#[derive(Debug, Clone)]
pub struct Evalf {
    precision: u32,
    max_depth: usize,
    max_nodes: usize,
    bindings: FxHashMap<String, f64>,
}

impl Default for Evalf {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION_BITS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            bindings: FxHashMap::default(),
        }
    }
}

impl Evalf {
    /// Double precision, default safety limits, no bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested mantissa precision in bits.
    ///
    /// Up to 24 bits evaluates in single precision and up to 53 in double.
    /// Above that [`evalf`](Self::evalf) works on a 96-bit decimal; larger
    /// requests are clamped to 96 bits.
    pub fn precision(mut self, bits: u32) -> Self {
        let max = DECIMAL_MANTISSA_BITS;
        self.precision = if bits > max {
            warn!(
                requested = bits,
                clamped = max,
                "precision beyond 96 bits is not supported"
            );
            max
        } else {
            bits.max(1)
        };
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Give a free symbol a numeric value for this evaluation
    pub fn bind(mut self, name: impl Into<String>, value: f64) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    /// Effective precision in bits after clamping
    pub fn precision_bits(&self) -> u32 {
        self.precision
    }

    /// Reduce an expression to a numeric leaf
    ///
    /// Up to double precision the result is a real double. Above it the
    /// result is an extended real, unless some part of the expression has no
    /// decimal kernel or leaves the decimal range; then it is a real double.
    pub fn evalf(&self, expr: &Expr) -> Result<Expr, EvalError> {
        if self.precision > <f64 as MathScalar>::MANTISSA_BITS {
            self.check_limits(expr)?;
            match decimal::eval(expr, &self.bindings) {
                Ok(value) => return Ok(Expr::decimal(value)),
                Err(DecimalError::Eval(e)) => return Err(e),
                Err(DecimalError::Unrepresentable) => {
                    debug!(%expr, "no extended-precision result, evaluating in double");
                }
            }
        }
        self.eval_double(expr).map(Expr::number)
    }

    /// Reduce an expression to an `f64`
    ///
    /// Precision of 24 bits or less evaluates in `f32`; anything above yields
    /// the double value.
    pub fn eval_double(&self, expr: &Expr) -> Result<f64, EvalError> {
        if self.precision <= <f32 as MathScalar>::MANTISSA_BITS {
            self.eval_as::<f32>(expr).map(f64::from)
        } else {
            self.eval_as::<f64>(expr)
        }
    }

    /// Reduce an expression to any supported scalar type
    pub fn eval_as<T: MathScalar>(&self, expr: &Expr) -> Result<T, EvalError> {
        self.check_limits(expr)?;
        self.eval_node(expr)
    }

    fn check_limits(&self, expr: &Expr) -> Result<(), EvalError> {
        if expr.max_depth() > self.max_depth {
            return Err(EvalError::MaxDepthExceeded);
        }
        if expr.node_count() > self.max_nodes {
            return Err(EvalError::MaxNodesExceeded);
        }
        Ok(())
    }

    fn eval_node<T: MathScalar>(&self, expr: &Expr) -> Result<T, EvalError> {
        match &expr.kind {
            ExprKind::Integer(n) => T::from_i64(*n).ok_or(EvalError::NonFinite),
            ExprKind::Number(n) => T::from_f64(*n).ok_or(EvalError::NonFinite),
            ExprKind::Decimal(d) => d
                .to_f64()
                .and_then(T::from_f64)
                .ok_or(EvalError::NonFinite),
            ExprKind::Constant(c) => T::from_f64(c.value()).ok_or(EvalError::NonFinite),
            ExprKind::Symbol(s) => match self.bindings.get(s.as_ref()) {
                Some(v) => T::from_f64(*v).ok_or(EvalError::NonFinite),
                None => Err(EvalError::free_symbol(s.as_ref())),
            },
            ExprKind::FunctionCall { name, args } => {
                let def = Registry::get(name).ok_or_else(|| EvalError::UnknownFunction {
                    name: name.clone(),
                })?;
                if !def.validate_arity(args.len()) {
                    return Err(EvalError::InvalidArity {
                        name: name.clone(),
                        expected: def.arity.clone(),
                        got: args.len(),
                    });
                }
                let values = args
                    .iter()
                    .map(|a| self.eval_node::<T>(a))
                    .collect::<Result<Vec<T>, _>>()?;
                let result = eval_builtin(def.kind, def.name, &values)?;
                check_finite(result, &values)
            }
            ExprKind::Add(a, b) => self.binary(a, b, |x: T, y: T| Ok(x + y)),
            ExprKind::Sub(a, b) => self.binary(a, b, |x: T, y: T| Ok(x - y)),
            ExprKind::Mul(a, b) => self.binary(a, b, |x: T, y: T| Ok(x * y)),
            ExprKind::Div(a, b) => self.binary(a, b, |x: T, y: T| {
                if y.is_zero() {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(x / y)
                }
            }),
            // 0^0 evaluates to 1 following IEEE 754 pow
            ExprKind::Pow(a, b) => self.binary(a, b, |x: T, y: T| Ok(eval_pow(x, y))),
        }
    }

    fn binary<T, F>(&self, a: &Expr, b: &Expr, op: F) -> Result<T, EvalError>
    where
        T: MathScalar,
        F: Fn(T, T) -> Result<T, EvalError>,
    {
        let x = self.eval_node::<T>(a)?;
        let y = self.eval_node::<T>(b)?;
        check_finite(op(x, y)?, &[x, y])
    }
}

/// A NaN or infinity is only an error when finite inputs produced it here.
/// Non-finite inputs propagate.
fn check_finite<T: MathScalar>(result: T, inputs: &[T]) -> Result<T, EvalError> {
    if !result.is_finite() && inputs.iter().all(|v| v.is_finite()) {
        Err(EvalError::NonFinite)
    } else {
        Ok(result)
    }
}

/// Reduce an expression to a real-double expression with default settings
pub fn evalf(expr: &Expr) -> Result<Expr, EvalError> {
    Evalf::new().evalf(expr)
}

/// Double value of a closed expression with default settings
pub fn eval_double(expr: &Expr) -> Result<f64, EvalError> {
    Evalf::new().eval_double(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Constant, int, num, pi, sym};

    #[test]
    fn test_sin_five() {
        let value = eval_double(&int(5).sin()).unwrap();
        assert_eq!(value, 5.0f64.sin());
    }

    #[test]
    fn test_evalf_returns_real_double() {
        let folded = evalf(&int(5).sin()).unwrap();
        assert!(matches!(folded.kind, ExprKind::Number(_)));
        assert_eq!(eval_double(&folded).unwrap(), 5.0f64.sin());
    }

    #[test]
    fn test_constants_and_arithmetic() {
        assert_eq!(eval_double(&pi()).unwrap(), std::f64::consts::PI);
        let expr = (int(2) * pi()).cos() + num(0.5);
        assert!((eval_double(&expr).unwrap() - 1.5).abs() < 1e-15);
        let gamma = Expr::constant(Constant::EulerGamma);
        assert!((eval_double(&gamma).unwrap() - 0.5772156649015329).abs() < 1e-15);
    }

    #[test]
    fn test_free_symbol_rejected() {
        let err = eval_double(&sym("x").sin()).unwrap_err();
        assert_eq!(err, EvalError::free_symbol("x"));
    }

    #[test]
    fn test_bound_symbol() {
        let value = Evalf::new()
            .bind("x", 5.0)
            .eval_double(&sym("x").sin())
            .unwrap();
        assert_eq!(value, 5.0f64.sin());
    }

    #[test]
    fn test_unknown_function_and_arity() {
        let unknown = Expr::func("besselj", int(1));
        assert_eq!(
            eval_double(&unknown),
            Err(EvalError::UnknownFunction {
                name: "besselj".into()
            })
        );

        let bad = Expr::func_multi("sin", vec![int(1), int(2)]);
        assert!(matches!(
            eval_double(&bad),
            Err(EvalError::InvalidArity { got: 2, .. })
        ));
    }

    #[test]
    fn test_division_by_zero() {
        let expr = int(1) / int(0);
        assert_eq!(eval_double(&expr), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_nan_is_reported() {
        let expr = Expr::pow(int(-8), num(1.0 / 3.0));
        assert_eq!(eval_double(&expr), Err(EvalError::NonFinite));

        // NaN given as input propagates untouched
        let passthrough = num(f64::NAN) + int(1);
        assert!(eval_double(&passthrough).unwrap().is_nan());
    }

    #[test]
    fn test_bound_nan_propagates_through_checked_functions() {
        let evalf = Evalf::new().bind("x", f64::NAN);
        let x = sym("x");
        for expr in [x.clone().ln(), x.clone().sqrt(), x.clone().asin(), x.clone().sin()] {
            let value = evalf.eval_double(&expr).unwrap();
            assert!(value.is_nan(), "{} should give NaN", expr);
        }
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(eval_double(&int(1000).exp()), Err(EvalError::NonFinite));
        assert_eq!(
            eval_double(&Expr::pow(num(10.0), int(400))),
            Err(EvalError::NonFinite)
        );
        assert_eq!(eval_double(&int(0).cot()), Err(EvalError::NonFinite));

        // An infinite input is carried, not reported
        let carried = Evalf::new()
            .bind("x", f64::INFINITY)
            .eval_double(&(sym("x") + 1i64))
            .unwrap();
        assert_eq!(carried, f64::INFINITY);
    }

    #[test]
    fn test_precision_clamp_and_single() {
        let evalf = Evalf::new().precision(256);
        assert_eq!(evalf.precision_bits(), 96);
        assert_eq!(Evalf::new().precision(0).precision_bits(), 1);

        let single = Evalf::new().precision(24).eval_double(&int(5).sin()).unwrap();
        assert_eq!(single, f64::from(5.0f32.sin()));
    }

    #[test]
    fn test_extended_precision_evalf() {
        let high = Evalf::new().precision(256);

        let folded = high.evalf(&pi()).unwrap();
        assert!(matches!(folded.kind, ExprKind::Decimal(_)));
        assert_eq!(folded.to_string(), "3.1415926535897932384626433833");
        assert!((high.eval_double(&folded).unwrap() - std::f64::consts::PI).abs() < 1e-15);

        let sin5 = high.evalf(&int(5).sin()).unwrap();
        assert!(sin5.to_string().starts_with("-0.958924274663138468893154"));

        let bound = high.clone().bind("x", 0.5).evalf(&sym("x").exp()).unwrap();
        assert!(bound.to_string().starts_with("1.648721270700128146848650"));
    }

    #[test]
    fn test_extended_precision_falls_back_to_double() {
        let high = Evalf::new().precision(96);

        // No decimal kernel for asin
        let folded = high.evalf(&int(1).asin()).unwrap();
        assert!(matches!(folded.kind, ExprKind::Number(_)));

        // Outside the decimal range
        let big = high.evalf(&num(1e300)).unwrap();
        assert_eq!(big.as_number(), Some(1e300));

        // Errors are still errors
        assert_eq!(high.evalf(&(int(1) / int(0))), Err(EvalError::DivisionByZero));
        assert_eq!(high.evalf(&sym("y").sin()), Err(EvalError::free_symbol("y")));
        assert_eq!(
            high.clone().max_depth(1).evalf(&int(5).sin()),
            Err(EvalError::MaxDepthExceeded)
        );
    }

    #[test]
    fn test_limits() {
        let mut deep: Expr = sym("x").into();
        for _ in 0..10 {
            deep = deep.sin();
        }
        let strict = Evalf::new().bind("x", 1.0).max_depth(5);
        assert_eq!(strict.eval_double(&deep), Err(EvalError::MaxDepthExceeded));

        let tiny = Evalf::new().max_nodes(2);
        assert_eq!(
            tiny.eval_double(&(int(1) + int(2))),
            Err(EvalError::MaxNodesExceeded)
        );
    }
}
