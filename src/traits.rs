use num_traits::{Float, FloatConst, FromPrimitive, ToPrimitive};
use std::fmt::{Debug, Display};

/// Scalar types the evaluator can reduce an expression to.
///
/// `num_traits::Float` supplies the elementary functions and `FloatConst`
/// the named constants. Implemented for `f32` and `f64`.
pub trait MathScalar:
    Float + FloatConst + FromPrimitive + ToPrimitive + Debug + Display + Send + Sync + 'static
{
    /// Mantissa width in bits, including the implicit leading bit
    const MANTISSA_BITS: u32;
}

impl MathScalar for f32 {
    const MANTISSA_BITS: u32 = f32::MANTISSA_DIGITS;
}

impl MathScalar for f64 {
    const MANTISSA_BITS: u32 = f64::MANTISSA_DIGITS;
}

/// Widen a scalar for error reporting; NaN if the value cannot be represented
#[inline]
pub(crate) fn to_f64<T: MathScalar>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mantissa_bits() {
        assert_eq!(<f32 as MathScalar>::MANTISSA_BITS, 24);
        assert_eq!(<f64 as MathScalar>::MANTISSA_BITS, 53);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(1.5f32), 1.5);
        assert!(to_f64(f64::NAN).is_nan());
    }
}
