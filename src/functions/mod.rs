//! Built-in function registry
//!
//! Single source of truth for which function names the evaluator understands
//! and how many arguments each accepts.

pub(crate) mod definitions;
pub(crate) mod registry;

pub(crate) use definitions::BuiltinFn;
pub(crate) use registry::Registry;

/// Whether `name` is a function the evaluator can reduce numerically
pub fn is_builtin(name: &str) -> bool {
    Registry::get(name).is_some()
}

/// Names of all built-in functions, sorted
pub fn builtin_names() -> Vec<&'static str> {
    let mut names = Registry::names();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(is_builtin("sin"));
        assert!(is_builtin("atan2"));
        assert!(!is_builtin("besselj"));
    }

    #[test]
    fn test_names_sorted_and_unique() {
        let names = builtin_names();
        let mut sorted = names.clone();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }
}
