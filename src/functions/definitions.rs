//! Built-in function table
//!
//! Domain rules for each kernel live in `math::eval_builtin`.

use super::registry::FunctionDefinition;

/// Numeric kernel selector for a built-in function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum BuiltinFn {
    // Trigonometric
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    // Inverse trigonometric
    Asin,
    Acos,
    Atan,
    Atan2,
    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    // Exponential / logarithmic
    Exp,
    Ln,
    Log10,
    Log2,
    // Roots
    Sqrt,
    Cbrt,
    // Piecewise
    Abs,
    Sign,
    Floor,
    Ceil,
}

macro_rules! unary {
    ($name:literal, $kind:ident) => {
        FunctionDefinition {
            name: $name,
            arity: 1..=1,
            kind: BuiltinFn::$kind,
        }
    };
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        unary!("sin", Sin),
        unary!("cos", Cos),
        unary!("tan", Tan),
        unary!("cot", Cot),
        unary!("sec", Sec),
        unary!("csc", Csc),
        unary!("asin", Asin),
        unary!("acos", Acos),
        unary!("atan", Atan),
        FunctionDefinition {
            name: "atan2",
            arity: 2..=2,
            kind: BuiltinFn::Atan2,
        },
        unary!("sinh", Sinh),
        unary!("cosh", Cosh),
        unary!("tanh", Tanh),
        unary!("asinh", Asinh),
        unary!("acosh", Acosh),
        unary!("atanh", Atanh),
        unary!("exp", Exp),
        unary!("ln", Ln),
        unary!("log10", Log10),
        unary!("log2", Log2),
        unary!("sqrt", Sqrt),
        unary!("cbrt", Cbrt),
        unary!("abs", Abs),
        unary!("sign", Sign),
        unary!("floor", Floor),
        unary!("ceil", Ceil),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicate_names_or_kinds() {
        let defs = all_definitions();
        let names: HashSet<_> = defs.iter().map(|d| d.name).collect();
        let kinds: HashSet<_> = defs.iter().map(|d| d.kind).collect();
        assert_eq!(names.len(), defs.len());
        assert_eq!(kinds.len(), defs.len());
    }
}
