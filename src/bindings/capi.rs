//! C ABI for native (non-JVM) callers
//!
//! Mirrors the handle-based shape of the SymEngine C wrapper so Kotlin/Native
//! cinterop code can drive the same evaluation without the JVM:
//!
//! ```c
//! Basic *pi = basic_new_heap();
//! Basic *num = basic_new_heap();
//! basic_const_pi(pi);
//! basic_evalf(num, pi, 53);
//! CharBuffer *buf = basic_str(num);
//! puts(char_buffer_c_str(buf));   // 3.141592653589793
//! char_buffer_free(buf);
//! basic_free_heap(num);
//! basic_free_heap(pi);
//! ```
//!
//! Every entry point checks for null handles and catches panics. Handles
//! never nest deeper than [`DEFAULT_MAX_DEPTH`], so no entry point recurses
//! further than evaluation allows.
//!
//! # Safety
//!
//! Non-null handle arguments must come from the matching constructor of this
//! module and must not have been freed. Handles are not synchronised; a handle
//! must not be used from two threads at once.

use crate::ast::{Constant, Expr, ExprKind};
use crate::error::EvalError;
use crate::evaluator::Evalf;
use crate::{DEFAULT_MAX_DEPTH, probe_string};
use std::ffi::{CString, c_char, c_long, c_ulong};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;

/// Opaque expression handle
pub struct Basic(Expr);

/// Owned, NUL-terminated string handed to C
pub struct CharBuffer(CString);

/// Result codes, numbered like the SymEngine C wrapper
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CWrapperOutput {
    NoException = 0,
    RuntimeError = 1,
    DivByZero = 2,
    NotImplemented = 3,
    DomainError = 4,
}

impl From<&EvalError> for CWrapperOutput {
    fn from(e: &EvalError) -> Self {
        match e {
            EvalError::DivisionByZero => CWrapperOutput::DivByZero,
            EvalError::UnknownFunction { .. } => CWrapperOutput::NotImplemented,
            EvalError::DomainError { .. } => CWrapperOutput::DomainError,
            EvalError::FreeSymbol { .. }
            | EvalError::InvalidArity { .. }
            | EvalError::NonFinite
            | EvalError::MaxDepthExceeded
            | EvalError::MaxNodesExceeded => CWrapperOutput::RuntimeError,
        }
    }
}

fn guarded<F>(f: F) -> CWrapperOutput
where
    F: FnOnce() -> CWrapperOutput,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or(CWrapperOutput::RuntimeError)
}

/// Store `value` into `s`, reading nothing from it
///
/// `s` must be null or a live handle.
unsafe fn assign(s: *mut Basic, value: Expr) -> CWrapperOutput {
    if s.is_null() {
        return CWrapperOutput::RuntimeError;
    }
    unsafe { (*s).0 = value };
    CWrapperOutput::NoException
}

/// Clone the expression behind a handle
///
/// `a` must be null or a live handle.
unsafe fn read(a: *const Basic) -> Option<Expr> {
    if a.is_null() {
        None
    } else {
        Some(unsafe { (*a).0.clone() })
    }
}

/// `s = build(a)`, refused when the result would exceed the depth limit
///
/// `s` and `a` must each be null or a live handle.
unsafe fn apply_unary(s: *mut Basic, a: *const Basic, build: fn(Expr) -> Expr) -> CWrapperOutput {
    let Some(arg) = (unsafe { read(a) }) else {
        return CWrapperOutput::RuntimeError;
    };
    if arg.max_depth() >= DEFAULT_MAX_DEPTH {
        return CWrapperOutput::RuntimeError;
    }
    unsafe { assign(s, build(arg)) }
}

fn to_buffer(text: String) -> *mut CharBuffer {
    match CString::new(text) {
        Ok(c) => Box::into_raw(Box::new(CharBuffer(c))),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Handle lifecycle
// ============================================================================

/// Allocate a handle holding the integer 0.
#[unsafe(no_mangle)]
pub extern "C" fn basic_new_heap() -> *mut Basic {
    Box::into_raw(Box::new(Basic(Expr::integer(0))))
}

/// Free a handle from [`basic_new_heap`]. Null is ignored.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_free_heap(s: *mut Basic) {
    if !s.is_null() {
        drop(unsafe { Box::from_raw(s) });
    }
}

// ============================================================================
// Construction
// ============================================================================

#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_const_pi(s: *mut Basic) {
    let _ = guarded(|| unsafe { assign(s, Expr::constant(Constant::Pi)) });
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_const_e(s: *mut Basic) {
    let _ = guarded(|| unsafe { assign(s, Expr::constant(Constant::E)) });
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn integer_set_si(s: *mut Basic, value: c_long) -> CWrapperOutput {
    guarded(|| unsafe { assign(s, Expr::integer(i64::from(value))) })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn real_double_set_d(s: *mut Basic, value: f64) -> CWrapperOutput {
    guarded(|| unsafe { assign(s, Expr::number(value)) })
}

/// `s = sin(a)`; `s` and `a` may be the same handle. Fails with
/// `RuntimeError` once the result would nest deeper than evaluation allows.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_sin(s: *mut Basic, a: *const Basic) -> CWrapperOutput {
    guarded(|| unsafe { apply_unary(s, a, Expr::sin) })
}

/// `s = cos(a)`; `s` and `a` may be the same handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_cos(s: *mut Basic, a: *const Basic) -> CWrapperOutput {
    guarded(|| unsafe { apply_unary(s, a, Expr::cos) })
}

// ============================================================================
// Evaluation
// ============================================================================

/// `s = evalf(b)` at `bits` of precision.
///
/// Up to 53 bits `s` becomes a real double; above that an extended real
/// with up to 28 decimal places (clamped at 96 bits).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_evalf(
    s: *mut Basic,
    b: *const Basic,
    bits: c_ulong,
) -> CWrapperOutput {
    guarded(|| {
        let Some(expr) = (unsafe { read(b) }) else {
            return CWrapperOutput::RuntimeError;
        };
        let bits = u32::try_from(bits).unwrap_or(u32::MAX);
        match Evalf::new().precision(bits).evalf(&expr) {
            Ok(value) => unsafe { assign(s, value) },
            Err(e) => CWrapperOutput::from(&e),
        }
    })
}

/// Value of a real-double handle; NaN for anything else.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn real_double_get_d(s: *const Basic) -> f64 {
    if s.is_null() {
        return f64::NAN;
    }
    match unsafe { &(*s).0.kind } {
        ExprKind::Number(n) => *n,
        _ => f64::NAN,
    }
}

// ============================================================================
// Strings
// ============================================================================

/// Printed form of a handle. Free with [`char_buffer_free`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn basic_str(s: *const Basic) -> *mut CharBuffer {
    catch_unwind(|| match unsafe { read(s) } {
        Some(expr) => to_buffer(expr.to_string()),
        None => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

/// Borrow the C string inside a buffer; valid until the buffer is freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn char_buffer_c_str(buf: *const CharBuffer) -> *const c_char {
    if buf.is_null() {
        return ptr::null();
    }
    unsafe { (*buf).0.as_ptr() }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn char_buffer_free(buf: *mut CharBuffer) {
    if !buf.is_null() {
        drop(unsafe { Box::from_raw(buf) });
    }
}

/// Same text the JVM export returns; null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn symengine_probe() -> *mut CharBuffer {
    match catch_unwind(probe_string) {
        Ok(Ok(text)) => to_buffer(text),
        _ => ptr::null_mut(),
    }
}

/// Library version as a static C string. Do not free.
#[unsafe(no_mangle)]
pub extern "C" fn symengine_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr().cast()
}
