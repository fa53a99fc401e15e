use std::fmt;
use std::ops::RangeInclusive;

/// Errors that can occur while numerically evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A free variable was reached; `evalf` only reduces closed expressions
    FreeSymbol {
        name: String,
    },
    UnknownFunction {
        name: String,
    },
    InvalidArity {
        name: String,
        expected: RangeInclusive<usize>,
        got: usize,
    },
    /// Argument outside the real domain of the function
    DomainError {
        function: String,
        value: f64,
    },
    DivisionByZero,
    /// Finite inputs gave an infinite or NaN result, as on overflow or at a
    /// pole. Non-finite inputs propagate instead.
    NonFinite,

    // Safety limits
    MaxDepthExceeded,
    MaxNodesExceeded,
}

impl EvalError {
    pub fn free_symbol(name: impl Into<String>) -> Self {
        EvalError::FreeSymbol { name: name.into() }
    }

    pub fn domain(function: impl Into<String>, value: f64) -> Self {
        EvalError::DomainError {
            function: function.into(),
            value,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::FreeSymbol { name } => {
                write!(f, "Cannot evaluate free symbol '{}' numerically", name)
            }
            EvalError::UnknownFunction { name } => write!(f, "Unknown function '{}'", name),
            EvalError::InvalidArity {
                name,
                expected,
                got,
            } => {
                if expected.start() == expected.end() {
                    write!(
                        f,
                        "Function '{}' expects {} argument(s), got {}",
                        name,
                        expected.start(),
                        got
                    )
                } else {
                    write!(
                        f,
                        "Function '{}' expects {}-{} arguments, got {}",
                        name,
                        expected.start(),
                        expected.end(),
                        got
                    )
                }
            }
            EvalError::DomainError { function, value } => {
                write!(f, "Argument {} is outside the domain of '{}'", value, function)
            }
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::NonFinite => write!(f, "Evaluation produced a non-finite value"),
            EvalError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
            EvalError::MaxNodesExceeded => {
                write!(f, "Expression size exceeds maximum node count limit")
            }
        }
    }
}

impl std::error::Error for EvalError {}
