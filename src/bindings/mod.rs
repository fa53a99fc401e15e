//! Foreign-function surfaces (JVM, C)

pub mod capi;

#[cfg(feature = "jni")]
pub mod jvm;
