//! JVM entry points
//!
//! Native half of `com.ensody.nativebuilds.example.symengine.SymengineWrapper`:
//!
//! ```kotlin
//! internal object SymengineWrapper {
//!     external fun getSymengineVersion(): String
//! }
//! ```
//!
//! Nothing may unwind into the JVM. Failures become a pending Java exception
//! and the export returns `null`.

use crate::logging::{LoggingOptions, init_logging};
use crate::{EvalError, probe_string};
use jni::JNIEnv;
use jni::objects::JObject;
use jni::sys::{JNI_VERSION_1_6, JavaVM, jint, jstring};
use std::any::Any;
use std::ffi::c_void;
use std::fmt;
use std::panic;
use tracing::{debug, error};

const ARITHMETIC_EXCEPTION: &str = "java/lang/ArithmeticException";
const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

/// Failure modes of a bridge call
#[derive(Debug)]
pub(crate) enum BridgeError {
    Eval(EvalError),
    Jni(jni::errors::Error),
    Panic(String),
}

impl BridgeError {
    /// Java exception class thrown for this failure
    fn exception_class(&self) -> &'static str {
        match self {
            BridgeError::Eval(_) => ARITHMETIC_EXCEPTION,
            BridgeError::Jni(_) | BridgeError::Panic(_) => RUNTIME_EXCEPTION,
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Eval(e) => write!(f, "{}", e),
            BridgeError::Jni(e) => write!(f, "JNI error: {}", e),
            BridgeError::Panic(msg) => write!(f, "native panic: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<EvalError> for BridgeError {
    fn from(e: EvalError) -> Self {
        BridgeError::Eval(e)
    }
}

impl From<jni::errors::Error> for BridgeError {
    fn from(e: jni::errors::Error) -> Self {
        BridgeError::Jni(e)
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn probe_jstring(env: &mut JNIEnv<'_>) -> Result<jstring, BridgeError> {
    let text = panic::catch_unwind(probe_string)
        .map_err(|payload| BridgeError::Panic(panic_message(payload.as_ref())))??;
    debug!(value = %text, "evaluated probe expression");
    let jstr = env.new_string(text)?;
    Ok(jstr.into_raw())
}

fn raise(env: &mut JNIEnv<'_>, err: &BridgeError) {
    error!(%err, "native call failed");
    // Keep an exception the JVM already raised (e.g. OutOfMemoryError)
    if env.exception_check().unwrap_or(false) {
        return;
    }
    if let Err(throw_err) = env.throw_new(err.exception_class(), err.to_string()) {
        error!(%throw_err, "could not raise Java exception");
    }
}

/// `SymengineWrapper.getSymengineVersion(): String`
///
/// Returns the double value of `sin(5)` as text.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_ensody_nativebuilds_example_symengine_SymengineWrapper_getSymengineVersion<
    'local,
>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    match probe_jstring(&mut env) {
        Ok(value) => value,
        Err(err) => {
            raise(&mut env, &err);
            std::ptr::null_mut()
        }
    }
}

#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(_vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    let _ = panic::catch_unwind(|| init_logging(&LoggingOptions::default()));
    JNI_VERSION_1_6
}


#[cfg(all(test, feature = "jvm-tests"))]
mod jvm_tests {
    use super::*;
    use jni::objects::{JString, JThrowable};
    use jni::{InitArgsBuilder, JNIVersion, JavaVM};
    use std::sync::OnceLock;

    // One JVM per process
    fn vm() -> &'static JavaVM {
        static VM: OnceLock<JavaVM> = OnceLock::new();
        VM.get_or_init(|| {
            let args = InitArgsBuilder::new()
                .version(JNIVersion::V8)
                .option("-Xcheck:jni")
                .build()
                .unwrap();
            JavaVM::new(args).unwrap()
        })
    }

    fn take_exception<'local>(env: &mut JNIEnv<'local>) -> JThrowable<'local> {
        assert!(env.exception_check().unwrap());
        let thrown = env.exception_occurred().unwrap();
        env.exception_clear().unwrap();
        thrown
    }

    fn message_of(env: &mut JNIEnv<'_>, thrown: &JThrowable<'_>) -> String {
        let msg = env
            .call_method(thrown, "getMessage", "()Ljava/lang/String;", &[])
            .unwrap()
            .l()
            .unwrap();
        env.get_string(&JString::from(msg)).unwrap().into()
    }

    #[test]
    fn test_export_returns_sin_five() {
        let mut guard = vm().attach_current_thread().unwrap();
        let raw_env = unsafe { JNIEnv::from_raw(guard.get_raw()) }.unwrap();

        let raw = Java_com_ensody_nativebuilds_example_symengine_SymengineWrapper_getSymengineVersion(
            raw_env,
            JObject::null(),
        );
        assert!(!raw.is_null());
        assert!(!guard.exception_check().unwrap());

        let jstr = unsafe { JString::from_raw(raw) };
        let text: String = guard.get_string(&jstr).unwrap().into();
        assert_eq!(text, "-0.9589242746631385");
        assert_eq!(text.parse::<f64>().unwrap(), 5.0f64.sin());
    }

    #[test]
    fn test_evaluation_failure_throws_arithmetic_exception() {
        let mut guard = vm().attach_current_thread().unwrap();
        let env: &mut JNIEnv<'_> = &mut guard;

        raise(env, &BridgeError::from(EvalError::DivisionByZero));
        let thrown = take_exception(env);
        assert!(env.is_instance_of(&thrown, ARITHMETIC_EXCEPTION).unwrap());
        assert_eq!(message_of(env, &thrown), "Division by zero");
    }

    #[test]
    fn test_panic_throws_runtime_exception() {
        let mut guard = vm().attach_current_thread().unwrap();
        let env: &mut JNIEnv<'_> = &mut guard;

        raise(env, &BridgeError::Panic("boom".into()));
        let thrown = take_exception(env);
        assert!(env.is_instance_of(&thrown, RUNTIME_EXCEPTION).unwrap());
        assert!(!env.is_instance_of(&thrown, ARITHMETIC_EXCEPTION).unwrap());
        assert_eq!(message_of(env, &thrown), "native panic: boom");
    }

    #[test]
    fn test_pending_exception_is_kept() {
        let mut guard = vm().attach_current_thread().unwrap();
        let env: &mut JNIEnv<'_> = &mut guard;

        env.throw_new("java/lang/IllegalStateException", "already pending")
            .unwrap();
        raise(env, &BridgeError::from(EvalError::NonFinite));
        let thrown = take_exception(env);
        assert!(
            env.is_instance_of(&thrown, "java/lang/IllegalStateException")
                .unwrap()
        );
        assert_eq!(message_of(env, &thrown), "already pending");
    }

    #[test]
    fn test_export_helper_builds_java_string() {
        let mut guard = vm().attach_current_thread().unwrap();
        let env: &mut JNIEnv<'_> = &mut guard;

        let raw = probe_jstring(env).unwrap();
        let jstr = unsafe { JString::from_raw(raw) };
        let text: String = env.get_string(&jstr).unwrap().into();
        assert_eq!(text, probe_string().unwrap());
    }
}
