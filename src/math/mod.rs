//! Numeric kernels for built-in functions
//!
//! Every kernel is generic over [`MathScalar`] so the evaluator can reduce to
//! `f32` or `f64` with the same code.
//!
//! # Domain Validation
//!
//! Real-valued kernels reject arguments outside their real domain instead of
//! returning NaN:
//!
//! - **Logarithms**: non-positive inputs
//! - **Square root**: negative inputs
//! - **asin / acos**: |x| > 1
//! - **acosh**: x < 1
//! - **atanh**: |x| >= 1
//!
//! A NaN argument skips the domain checks and yields NaN.
//!
//! Poles of tan, cot, sec and csc are not checked here; the evaluator reports
//! an infinite result as `NonFinite`.

use crate::error::EvalError;
use crate::functions::BuiltinFn;
use crate::traits::{MathScalar, to_f64};

/// Apply a built-in kernel to already-evaluated arguments.
///
/// The caller validates arity against the registry before calling.
pub(crate) fn eval_builtin<T: MathScalar>(
    func: BuiltinFn,
    name: &str,
    args: &[T],
) -> Result<T, EvalError> {
    if args.iter().any(|a| a.is_nan()) {
        return Ok(T::nan());
    }
    let x = args[0];
    let one = T::one();
    let require = |ok: bool| {
        if ok {
            Ok(())
        } else {
            Err(EvalError::domain(name, to_f64(x)))
        }
    };

    let value = match func {
        BuiltinFn::Sin => x.sin(),
        BuiltinFn::Cos => x.cos(),
        BuiltinFn::Tan => x.tan(),
        BuiltinFn::Cot => one / x.tan(),
        BuiltinFn::Sec => one / x.cos(),
        BuiltinFn::Csc => one / x.sin(),

        BuiltinFn::Asin => {
            require(x.abs() <= one)?;
            x.asin()
        }
        BuiltinFn::Acos => {
            require(x.abs() <= one)?;
            x.acos()
        }
        BuiltinFn::Atan => x.atan(),
        BuiltinFn::Atan2 => x.atan2(args[1]),

        BuiltinFn::Sinh => x.sinh(),
        BuiltinFn::Cosh => x.cosh(),
        BuiltinFn::Tanh => x.tanh(),
        BuiltinFn::Asinh => x.asinh(),
        BuiltinFn::Acosh => {
            require(x >= one)?;
            x.acosh()
        }
        BuiltinFn::Atanh => {
            require(x.abs() < one)?;
            x.atanh()
        }

        BuiltinFn::Exp => x.exp(),
        BuiltinFn::Ln => {
            require(x > T::zero())?;
            x.ln()
        }
        BuiltinFn::Log10 => {
            require(x > T::zero())?;
            x.log10()
        }
        BuiltinFn::Log2 => {
            require(x > T::zero())?;
            x.log2()
        }

        BuiltinFn::Sqrt => {
            require(x >= T::zero())?;
            x.sqrt()
        }
        BuiltinFn::Cbrt => x.cbrt(),

        BuiltinFn::Abs => x.abs(),
        BuiltinFn::Sign => eval_sign(x),
        BuiltinFn::Floor => x.floor(),
        BuiltinFn::Ceil => x.ceil(),
    };
    Ok(value)
}

/// sign(0) is 0, unlike `Float::signum`
pub(crate) fn eval_sign<T: MathScalar>(x: T) -> T {
    if x.is_zero() { T::zero() } else { x.signum() }
}

/// Power with an exact path for integral exponents
pub(crate) fn eval_pow<T: MathScalar>(base: T, exponent: T) -> T {
    if exponent.fract().is_zero()
        && let Some(n) = exponent.to_i32()
    {
        return base.powi(n);
    }
    base.powf(exponent)
}
