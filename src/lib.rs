//! Native symbolic evaluation bridge
//!
//! Builds a small symbolic expression, evaluates it to a double and hands the
//! text across a foreign-function boundary.
//!
//! # Surfaces
//! - **JVM** (feature `jni`, on by default): the native half of
//!   `com.ensody.nativebuilds.example.symengine.SymengineWrapper`.
//! - **C**: handle-based functions (`basic_new_heap`, `basic_evalf`, ...) for
//!   Kotlin/Native cinterop and other native callers.
//!
//! # Usage
//! ```
//! use symengine_jni::{Evalf, format_double, int, probe_string};
//!
//! let expr = int(5).sin();
//! assert_eq!(expr.to_string(), "sin(5)");
//!
//! let value = Evalf::new().eval_double(&expr).unwrap();
//! assert_eq!(format_double(value), probe_string().unwrap());
//! ```

mod ast;
pub mod bindings;
mod display;
mod error;
mod evaluator;
pub mod functions;
pub mod logging;
pub(crate) mod math;
mod symbol;
pub mod traits;


pub use ast::{Constant, Expr, ExprKind};
pub use display::{format_decimal, format_double};
pub use error::EvalError;
pub use evaluator::{Evalf, eval_double, evalf};
pub use symbol::{Symbol, e, int, num, pi, sym};

/// Default evaluation precision in bits (IEEE 754 double)
pub const DEFAULT_PRECISION_BITS: u32 = 53;
/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Argument of the probe expression `sin(5)`
pub const PROBE_ARGUMENT: i64 = 5;

/// The fixed expression the bridge evaluates: `sin(5)` with an exact 5
pub fn probe_expr() -> Expr {
    int(PROBE_ARGUMENT).sin()
}

/// Evaluate the probe expression and render the double as text
///
/// This is what the JVM export returns. The value only depends on the
/// platform's `sin`, so repeated calls yield identical text.
///
/// # Example
/// ```
/// let text = symengine_jni::probe_string().unwrap();
/// let value: f64 = text.parse().unwrap();
/// assert!((value - (-0.9589242746631385)).abs() < 1e-15);
/// ```
pub fn probe_string() -> Result<String, EvalError> {
    let folded = evalf(&probe_expr())?;
    let value = eval_double(&folded)?;
    Ok(format_double(value))
}

/// Numeric value of pi at `bits` of precision, rendered as text
///
/// Above 53 bits the value carries up to 28 decimal places; requests beyond
/// 96 bits are clamped.
///
/// ```
/// assert_eq!(symengine_jni::pi_string(53).unwrap(), "3.141592653589793");
/// assert_eq!(
///     symengine_jni::pi_string(256).unwrap(),
///     "3.1415926535897932384626433833"
/// );
/// ```
pub fn pi_string(bits: u32) -> Result<String, EvalError> {
    Evalf::new()
        .precision(bits)
        .evalf(&pi())
        .map(|value| value.to_string())
}
