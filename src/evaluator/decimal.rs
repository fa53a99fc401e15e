//! Extended-precision evaluation on `rust_decimal::Decimal`
//!
//! Used by [`Evalf::evalf`](super::Evalf::evalf) when more than double
//! precision is requested. A `Decimal` carries a 96-bit mantissa, roughly 28
//! significant digits, and a range of about ±7.9e28.
//!
//! The elementary kernels (sin, cos, exp, ln, sqrt and those derived from
//! them) are evaluated by series until a term drops below 1e-28.
//!
//! Functions without a decimal kernel, non-finite inputs and values outside
//! the decimal range yield [`DecimalError::Unrepresentable`]; the caller then
//! evaluates in double instead.

use crate::ast::{Constant, Expr, ExprKind};
use crate::error::EvalError;
use crate::functions::{BuiltinFn, Registry};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rustc_hash::FxHashMap;

/// Mantissa width of `Decimal` in bits
pub(crate) const DECIMAL_MANTISSA_BITS: u32 = 96;

const MAX_SERIES_TERMS: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DecimalError {
    /// Not computable on `Decimal`; retry in double
    Unrepresentable,
    Eval(EvalError),
}

impl From<EvalError> for DecimalError {
    fn from(e: EvalError) -> Self {
        DecimalError::Eval(e)
    }
}

// 28 fractional digits each
fn pi() -> Decimal {
    Decimal::from_i128_with_scale(31_415_926_535_897_932_384_626_433_833, 28)
}

fn euler() -> Decimal {
    Decimal::from_i128_with_scale(27_182_818_284_590_452_353_602_874_714, 28)
}

fn euler_gamma() -> Decimal {
    Decimal::from_i128_with_scale(5_772_156_649_015_328_606_065_120_901, 28)
}

fn ln_2() -> Decimal {
    Decimal::from_i128_with_scale(6_931_471_805_599_453_094_172_321_215, 28)
}

fn ln_10() -> Decimal {
    Decimal::from_i128_with_scale(2_302_585_092_994_045_684_017_991_455, 27)
}

fn epsilon() -> Decimal {
    Decimal::new(1, 28)
}

fn constant_value(c: Constant) -> Decimal {
    match c {
        Constant::Pi => pi(),
        Constant::E => euler(),
        Constant::EulerGamma => euler_gamma(),
    }
}

fn from_f64(n: f64) -> Result<Decimal, DecimalError> {
    Decimal::from_f64_retain(n).ok_or(DecimalError::Unrepresentable)
}

fn representable(value: Option<Decimal>) -> Result<Decimal, DecimalError> {
    value.ok_or(DecimalError::Unrepresentable)
}

/// Evaluate `expr` with every leaf and intermediate held as a `Decimal`
pub(crate) fn eval(
    expr: &Expr,
    bindings: &FxHashMap<String, f64>,
) -> Result<Decimal, DecimalError> {
    match &expr.kind {
        ExprKind::Integer(n) => Ok(Decimal::from(*n)),
        ExprKind::Number(n) => from_f64(*n),
        ExprKind::Decimal(d) => Ok(*d),
        ExprKind::Constant(c) => Ok(constant_value(*c)),
        ExprKind::Symbol(s) => match bindings.get(s.as_ref()) {
            Some(v) => from_f64(*v),
            None => Err(EvalError::free_symbol(s.as_ref()).into()),
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
                }
                .into());
            }
            // Every decimal kernel is unary
            if args.len() != 1 {
                return Err(DecimalError::Unrepresentable);
            }
            let x = eval(&args[0], bindings)?;
            kernel(def.kind, def.name, x)
        }
        ExprKind::Add(a, b) => representable(eval(a, bindings)?.checked_add(eval(b, bindings)?)),
        ExprKind::Sub(a, b) => representable(eval(a, bindings)?.checked_sub(eval(b, bindings)?)),
        ExprKind::Mul(a, b) => representable(eval(a, bindings)?.checked_mul(eval(b, bindings)?)),
        ExprKind::Div(a, b) => {
            let num = eval(a, bindings)?;
            let den = eval(b, bindings)?;
            if den.is_zero() {
                return Err(EvalError::DivisionByZero.into());
            }
            representable(num.checked_div(den))
        }
        ExprKind::Pow(a, b) => pow(eval(a, bindings)?, eval(b, bindings)?),
    }
}

fn kernel(func: BuiltinFn, name: &str, x: Decimal) -> Result<Decimal, DecimalError> {
    let require = |ok: bool| {
        if ok {
            Ok(())
        } else {
            Err(DecimalError::Eval(EvalError::domain(
                name,
                x.to_f64().unwrap_or(f64::NAN),
            )))
        }
    };
    let one = Decimal::ONE;

    let value = match func {
        BuiltinFn::Sin => sin(x),
        BuiltinFn::Cos => cos(x),
        BuiltinFn::Tan => sin(x).zip(cos(x)).and_then(|(s, c)| s.checked_div(c)),
        BuiltinFn::Cot => sin(x).zip(cos(x)).and_then(|(s, c)| c.checked_div(s)),
        BuiltinFn::Sec => cos(x).and_then(|c| one.checked_div(c)),
        BuiltinFn::Csc => sin(x).and_then(|s| one.checked_div(s)),

        BuiltinFn::Exp => exp(x),
        BuiltinFn::Ln => {
            require(x > Decimal::ZERO)?;
            ln(x)
        }
        BuiltinFn::Log10 => {
            require(x > Decimal::ZERO)?;
            ln(x).and_then(|l| l.checked_div(ln_10()))
        }
        BuiltinFn::Log2 => {
            require(x > Decimal::ZERO)?;
            ln(x).and_then(|l| l.checked_div(ln_2()))
        }
        BuiltinFn::Sqrt => {
            require(x >= Decimal::ZERO)?;
            sqrt(x)
        }

        BuiltinFn::Abs => Some(x.abs()),
        BuiltinFn::Sign => Some(if x.is_zero() {
            Decimal::ZERO
        } else if x.is_sign_negative() {
            Decimal::NEGATIVE_ONE
        } else {
            one
        }),
        BuiltinFn::Floor => Some(x.floor()),
        BuiltinFn::Ceil => Some(x.ceil()),

        _ => None,
    };
    representable(value)
}

/// Sum `first + t1 + t2 + ...` where `t(k+1) = -t(k) * x2 / ((n+1)(n+2))`
fn alternating_series(first: Decimal, x2: Decimal, offset: u32) -> Option<Decimal> {
    let mut sum = first;
    let mut term = first;
    let mut n = offset;
    for _ in 0..MAX_SERIES_TERMS {
        let denom = Decimal::from((n + 1) * (n + 2));
        term = (-term).checked_mul(x2)?.checked_div(denom)?;
        n += 2;
        if term.abs() < epsilon() {
            return Some(sum);
        }
        sum = sum.checked_add(term)?;
    }
    Some(sum)
}

/// Reduce an angle into [-pi, pi]
fn reduce_angle(x: Decimal) -> Option<Decimal> {
    let two_pi = pi().checked_mul(Decimal::from(2))?;
    let turns = x.checked_div(two_pi)?.round();
    x.checked_sub(turns.checked_mul(two_pi)?)
}

fn sin(x: Decimal) -> Option<Decimal> {
    let r = reduce_angle(x)?;
    alternating_series(r, r.checked_mul(r)?, 1)
}

fn cos(x: Decimal) -> Option<Decimal> {
    let r = reduce_angle(x)?;
    alternating_series(Decimal::ONE, r.checked_mul(r)?, 0)
}

/// `exp(x) = exp(x / 2^k)^(2^k)` with the inner value from its Taylor series
fn exp(x: Decimal) -> Option<Decimal> {
    // e^66 is the last power that fits; below e^-25 fewer digits survive
    // the fixed 28-digit scale than a double keeps
    if x > Decimal::from(64) || x < Decimal::from(-25) {
        return None;
    }
    let half = Decimal::new(5, 1);
    let mut r = x;
    let mut halvings = 0u32;
    while r.abs() > half {
        r = r.checked_div(Decimal::from(2))?;
        halvings += 1;
    }

    let mut sum = Decimal::ONE;
    let mut term = Decimal::ONE;
    for n in 1..MAX_SERIES_TERMS {
        term = term.checked_mul(r)?.checked_div(Decimal::from(n))?;
        if term.abs() < epsilon() {
            break;
        }
        sum = sum.checked_add(term)?;
    }

    for _ in 0..halvings {
        sum = sum.checked_mul(sum)?;
    }
    Some(sum)
}

/// `ln(m * 2^k) = 2 atanh((m - 1) / (m + 1)) + k ln 2` with m in [0.5, 1)
fn ln(x: Decimal) -> Option<Decimal> {
    if x <= Decimal::ZERO {
        return None;
    }
    let two = Decimal::from(2);
    let half = Decimal::new(5, 1);
    let mut m = x;
    let mut k = 0i64;
    while m >= Decimal::ONE {
        m = m.checked_div(two)?;
        k += 1;
    }
    while m < half {
        m = m.checked_mul(two)?;
        k -= 1;
    }

    let z = (m - Decimal::ONE).checked_div(m + Decimal::ONE)?;
    let z2 = z.checked_mul(z)?;
    let mut power = z;
    let mut sum = z;
    for n in 1..MAX_SERIES_TERMS {
        power = power.checked_mul(z2)?;
        let term = power.checked_div(Decimal::from(2 * n + 1))?;
        if term.abs() < epsilon() {
            break;
        }
        sum = sum.checked_add(term)?;
    }

    sum.checked_mul(two)?
        .checked_add(ln_2().checked_mul(Decimal::from(k))?)
}

/// Newton iteration seeded from the double square root
fn sqrt(x: Decimal) -> Option<Decimal> {
    if x.is_zero() {
        return Some(Decimal::ZERO);
    }
    let two = Decimal::from(2);
    let mut g = Decimal::from_f64_retain(x.to_f64()?.sqrt())?;
    for _ in 0..4 {
        g = g.checked_add(x.checked_div(g)?)?.checked_div(two)?;
    }
    Some(g)
}

/// Exponentiation by squaring for integral exponents, `exp(y ln x)` otherwise
fn pow(base: Decimal, exponent: Decimal) -> Result<Decimal, DecimalError> {
    if exponent.fract().is_zero() {
        let n = exponent.to_i64().ok_or(DecimalError::Unrepresentable)?;
        if n < 0 && base.is_zero() {
            return Err(DecimalError::Unrepresentable);
        }
        let mut result = Decimal::ONE;
        let mut factor = base;
        let mut bits = n.unsigned_abs();
        while bits > 0 {
            if bits & 1 == 1 {
                result = representable(result.checked_mul(factor))?;
            }
            bits >>= 1;
            if bits > 0 {
                factor = representable(factor.checked_mul(factor))?;
            }
        }
        return if n < 0 {
            representable(Decimal::ONE.checked_div(result))
        } else {
            Ok(result)
        };
    }
    if base.is_sign_negative() {
        // No real value, same as the double path
        return Err(EvalError::NonFinite.into());
    }
    if base.is_zero() {
        return if exponent > Decimal::ZERO {
            Ok(Decimal::ZERO)
        } else {
            Err(DecimalError::Unrepresentable)
        };
    }
    let log = representable(ln(base))?;
    representable(exponent.checked_mul(log).and_then(exp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{int, num, sym};

    fn eval_plain(expr: &Expr) -> Result<Decimal, DecimalError> {
        eval(expr, &FxHashMap::default())
    }

    fn close(a: Decimal, b: Decimal, digits: u32) -> bool {
        (a - b).abs() < Decimal::new(1, digits)
    }

    #[test]
    fn test_constants_carry_extra_digits() {
        let value = eval_plain(&crate::pi()).unwrap();
        assert_eq!(value.to_string(), "3.1415926535897932384626433833");
        for (d, f) in [
            (value, std::f64::consts::PI),
            (euler(), std::f64::consts::E),
            (ln_2(), std::f64::consts::LN_2),
            (ln_10(), std::f64::consts::LN_10),
            (euler_gamma(), Constant::EulerGamma.value()),
        ] {
            assert!((d.to_f64().unwrap() - f).abs() < 1e-15, "{}", d);
        }
    }

    #[test]
    fn test_sin_five_agrees_with_double() {
        let value = eval_plain(&int(5).sin()).unwrap();
        assert!((value.to_f64().unwrap() - 5.0f64.sin()).abs() < 1e-15);
        // sin(5) = -0.95892427466313846889315440615599...
        let reference = Decimal::from_i128_with_scale(-9_589_242_746_631_384_688_931_544_062, 28);
        assert!(close(value, reference, 24), "{}", value);
    }

    #[test]
    fn test_pythagorean_identity() {
        for x in [int(5), int(-7), num(0.25), crate::pi()] {
            let s = eval_plain(&x.clone().sin()).unwrap();
            let c = eval_plain(&x.cos()).unwrap();
            assert!(close(s * s + c * c, Decimal::ONE, 24));
        }
    }

    #[test]
    fn test_exp_and_ln_are_inverse() {
        let e = eval_plain(&int(1).exp()).unwrap();
        assert!(close(e, euler(), 25), "{}", e);

        for x in [num(0.5), int(3), int(1000), num(1e-6)] {
            let back = eval_plain(&x.clone().ln().exp()).unwrap();
            let original = eval_plain(&x).unwrap();
            assert!(close(back / original, Decimal::ONE, 18), "{}", back);
        }

        let ln10 = eval_plain(&int(10).ln()).unwrap();
        assert!(close(ln10, ln_10(), 25));
        assert_eq!(eval_plain(&int(100).log10()).map(|v| v.round_dp(20)), Ok(Decimal::from(2)));
    }

    #[test]
    fn test_sqrt_and_pow() {
        let root = eval_plain(&int(2).sqrt()).unwrap();
        assert!(close(root * root, Decimal::from(2), 25));

        assert_eq!(eval_plain(&Expr::pow(int(2), int(10))), Ok(Decimal::from(1024)));
        assert_eq!(
            eval_plain(&Expr::pow(int(2), int(-2))),
            Ok(Decimal::new(25, 2))
        );
        let cube_root = eval_plain(&Expr::pow(int(8), int(1) / int(3))).unwrap();
        assert!(close(cube_root, Decimal::from(2), 22), "{}", cube_root);
    }

    #[test]
    fn test_exact_arithmetic() {
        let third = int(1) / int(3);
        let value = eval_plain(&(third * int(3))).unwrap();
        assert!(close(value, Decimal::ONE, 25));
    }

    #[test]
    fn test_errors_match_double_path() {
        assert_eq!(
            eval_plain(&(int(1) / int(0))),
            Err(DecimalError::Eval(EvalError::DivisionByZero))
        );
        assert!(matches!(
            eval_plain(&int(-1).ln()),
            Err(DecimalError::Eval(EvalError::DomainError { .. }))
        ));
        assert!(matches!(
            eval_plain(&sym("x").sin()),
            Err(DecimalError::Eval(EvalError::FreeSymbol { .. }))
        ));
        assert!(matches!(
            eval_plain(&Expr::func("zeta", int(2))),
            Err(DecimalError::Eval(EvalError::UnknownFunction { .. }))
        ));
        assert_eq!(
            eval_plain(&Expr::pow(int(-8), num(0.5))),
            Err(DecimalError::Eval(EvalError::NonFinite))
        );
    }

    #[test]
    fn test_unrepresentable_cases() {
        // No decimal kernel
        assert_eq!(eval_plain(&int(1).asin()), Err(DecimalError::Unrepresentable));
        // Outside the decimal range
        assert_eq!(eval_plain(&num(1e300)), Err(DecimalError::Unrepresentable));
        assert_eq!(eval_plain(&int(100).exp()), Err(DecimalError::Unrepresentable));
        assert_eq!(eval_plain(&num(f64::NAN)), Err(DecimalError::Unrepresentable));
    }
}
