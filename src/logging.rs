//! Subscriber installation for the loaded native library
//!
//! The host process owns stderr, so the library only installs a subscriber
//! when asked to (the JVM path does so from `JNI_OnLoad`) and never replaces
//! one the host already registered.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Filter used when no directive is given
pub const DEFAULT_LOG_DIRECTIVE: &str = "symengine_jni=warn";

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// `EnvFilter` directive, e.g. `"symengine_jni=debug"`
    pub directive: String,
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            directive: DEFAULT_LOG_DIRECTIVE.to_string(),
            ansi: false,
        }
    }
}

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install a stderr `fmt` subscriber once per process.
///
/// Returns whether this library's subscriber is the active global one. A
/// malformed directive falls back to [`DEFAULT_LOG_DIRECTIVE`].
pub fn init_logging(opts: &LoggingOptions) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_new(&opts.directive)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

        let subscriber = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(opts.ansi)
                .with_target(true),
        );

        tracing::subscriber::set_global_default(subscriber).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init_logging(&LoggingOptions::default());
        let second = init_logging(&LoggingOptions {
            directive: "not a [valid directive".into(),
            ansi: true,
        });
        assert_eq!(first, second);
    }
}
