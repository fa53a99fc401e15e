// Display formatting for AST
use crate::{Expr, ExprKind};
use rust_decimal::Decimal;
use std::fmt;

/// Render a double the way the bridge hands it to callers
///
/// Finite values use the shortest representation that parses back to the same
/// bits. Integral values keep a trailing `.0` so a real double never prints
/// like an exact integer. Non-finite values use the spellings accepted by
/// `java.lang.Double.parseDouble`.
pub fn format_double(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        let s = n.to_string();
        if s.contains(['.', 'e', 'E']) {
            s
        } else {
            format!("{s}.0")
        }
    }
}

/// Render an extended-precision real with every significant digit
///
/// Trailing zeros are dropped; integral values keep a trailing `.0` like
/// [`format_double`].
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if s.contains('.') { s } else { format!("{s}.0") }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Integer(n) => write!(f, "{}", n),

            ExprKind::Number(n) => write!(f, "{}", format_double(*n)),

            ExprKind::Decimal(d) => write!(f, "{}", format_decimal(*d)),

            ExprKind::Constant(c) => write!(f, "{}", c.name()),

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::FunctionCall { name, args } => {
                let args_str: Vec<String> = args.iter().map(|arg| format!("{}", arg)).collect();
                write!(f, "{}({})", name, args_str.join(", "))
            }

            ExprKind::Add(u, v) => {
                let right_str = if is_negative(v) {
                    format!("({})", v)
                } else {
                    format!("{}", v)
                };
                write!(f, "{} + {}", u, right_str)
            }

            ExprKind::Sub(u, v) => {
                // a - (b + c) must keep its grouping
                let right_str = match &v.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", v),
                    _ if is_negative(v) => format!("({})", v),
                    _ => format!("{}", v),
                };
                write!(f, "{} - {}", u, right_str)
            }

            ExprKind::Mul(u, v) => {
                if matches!(u.kind, ExprKind::Integer(-1)) {
                    write!(f, "-{}", format_mul_operand(v))
                } else {
                    let right_str = if is_negative(v) {
                        format!("({})", v)
                    } else {
                        format_mul_operand(v)
                    };
                    write!(f, "{} * {}", format_mul_operand(u), right_str)
                }
            }

            ExprKind::Div(u, v) => {
                let formatted_num = match &u.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", u),
                    _ => format!("{}", u),
                };
                let formatted_denom = if is_simple_operand(v) {
                    format!("{}", v)
                } else {
                    format!("({})", v)
                };
                write!(f, "{} / {}", formatted_num, formatted_denom)
            }

            ExprKind::Pow(u, v) => {
                let formatted_base = match &u.kind {
                    ExprKind::Add(_, _)
                    | ExprKind::Sub(_, _)
                    | ExprKind::Mul(_, _)
                    | ExprKind::Div(_, _)
                    | ExprKind::Pow(_, _) => format!("({})", u),
                    ExprKind::Integer(n) if *n < 0 => format!("({})", u),
                    ExprKind::Number(n) if *n < 0.0 => format!("({})", u),
                    ExprKind::Decimal(d) if d.is_sign_negative() => format!("({})", u),
                    _ => format!("{}", u),
                };
                let formatted_exp = if is_simple_operand(v) {
                    format!("{}", v)
                } else {
                    format!("({})", v)
                };
                write!(f, "{}^{}", formatted_base, formatted_exp)
            }
        }
    }
}

fn is_simple_operand(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Integer(n) => *n >= 0,
        ExprKind::Number(n) => *n >= 0.0,
        ExprKind::Decimal(d) => !d.is_sign_negative(),
        ExprKind::Constant(_) | ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } => true,
        _ => false,
    }
}

/// Whether the printed form starts with a minus sign
fn is_negative(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Integer(n) => *n < 0,
        ExprKind::Number(n) => n.is_sign_negative() && !n.is_nan(),
        ExprKind::Decimal(d) => d.is_sign_negative(),
        ExprKind::Mul(u, _) | ExprKind::Div(u, _) => is_negative(u),
        _ => false,
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", expr),
        _ => format!("{}", expr),
    }
}
