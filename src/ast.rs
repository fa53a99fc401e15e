//! Abstract Syntax Tree for symbolic expressions

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// Named mathematical constants that stay symbolic until `evalf`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    EulerGamma,
}

impl Constant {
    /// Printed name of the constant
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::EulerGamma => "EulerGamma",
        }
    }

    /// Double-precision value of the constant
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::EulerGamma => 0.577_215_664_901_532_9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Exact integer (e.g., the `5` in `sin(5)`)
    Integer(i64),

    /// Real double, produced by numeric evaluation or built directly
    Number(f64),

    /// Extended-precision real, produced by `evalf` above double precision
    Decimal(Decimal),

    /// Named constant such as pi
    Constant(Constant),

    /// Free variable
    Symbol(Arc<str>),

    /// Function call (built-in or unknown)
    FunctionCall { name: String, args: Vec<Arc<Expr>> },

    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Eq for ExprKind {}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind }
    }

    /// Create an exact integer expression
    pub fn integer(n: i64) -> Self {
        Expr::new(ExprKind::Integer(n))
    }

    /// Create a real-double expression
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    pub fn decimal(d: Decimal) -> Self {
        Expr::new(ExprKind::Decimal(d))
    }

    /// Create a named constant expression
    pub fn constant(c: Constant) -> Self {
        Expr::new(ExprKind::Constant(c))
    }

    /// Create a symbol expression
    pub fn symbol(s: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Symbol(Arc::from(s.as_ref())))
    }

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    /// Create a power expression
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// Create a function call expression (single argument convenience)
    pub fn func(name: impl Into<String>, content: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![Arc::new(content)],
        })
    }

    /// Create a multi-argument function call expression
    pub fn func_multi(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: args.into_iter().map(Arc::new).collect(),
        })
    }

    /// Value of a numeric leaf, rounded to double
    ///
    /// # Example
    /// ```ignore
    /// assert_eq!(Expr::integer(5).as_number(), Some(5.0));
    /// assert_eq!(Expr::symbol("x").as_number(), None);
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            ExprKind::Integer(n) => Some(*n as f64),
            ExprKind::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Integer(_)
            | ExprKind::Number(_)
            | ExprKind::Decimal(_)
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Integer(_)
            | ExprKind::Number(_)
            | ExprKind::Decimal(_)
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check if the expression contains a specific variable
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Integer(_)
            | ExprKind::Number(_)
            | ExprKind::Decimal(_)
            | ExprKind::Constant(_) => false,
            ExprKind::Symbol(s) => s.as_ref() == var,
            ExprKind::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var(var)),
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => l.contains_var(var) || r.contains_var(var),
        }
    }

    /// Collect all variables in the expression
    pub fn variables(&self) -> HashSet<String> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut HashSet<String>) {
        match &self.kind {
            ExprKind::Symbol(s) => {
                vars.insert(s.to_string());
            }
            ExprKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
            ExprKind::Integer(_)
            | ExprKind::Number(_)
            | ExprKind::Decimal(_)
            | ExprKind::Constant(_) => {}
        }
    }

    /// Transform the expression tree by applying a function to each node
    ///
    /// Nodes are visited in post-order (children before parent).
    pub fn map<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr + Copy,
    {
        let transformed = match &self.kind {
            ExprKind::Integer(_)
            | ExprKind::Number(_)
            | ExprKind::Decimal(_)
            | ExprKind::Constant(_)
            | ExprKind::Symbol(_) => self.clone(),
            ExprKind::FunctionCall { name, args } => Expr::new(ExprKind::FunctionCall {
                name: name.clone(),
                args: args.iter().map(|arg| Arc::new(arg.map(f))).collect(),
            }),
            ExprKind::Add(a, b) => Expr::add_expr(a.map(f), b.map(f)),
            ExprKind::Sub(a, b) => Expr::sub_expr(a.map(f), b.map(f)),
            ExprKind::Mul(a, b) => Expr::mul_expr(a.map(f), b.map(f)),
            ExprKind::Div(a, b) => Expr::div_expr(a.map(f), b.map(f)),
            ExprKind::Pow(a, b) => Expr::pow(a.map(f), b.map(f)),
        };
        f(&transformed)
    }

    /// Substitute a variable with another expression
    ///
    /// # Example
    /// ```ignore
    /// let expr = sym("x").sin();
    /// let five = expr.substitute("x", &Expr::integer(5)); // sin(5)
    /// ```
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        self.map(|node| {
            if let ExprKind::Symbol(s) = &node.kind
                && s.as_ref() == var
            {
                return replacement.clone();
            }
            node.clone()
        })
    }
}

// Hash needs the bit pattern of floats, so it cannot be derived
impl std::hash::Hash for ExprKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ExprKind::Integer(n) => n.hash(state),
            ExprKind::Number(n) => n.to_bits().hash(state),
            ExprKind::Decimal(d) => d.hash(state),
            ExprKind::Constant(c) => c.hash(state),
            ExprKind::Symbol(s) => s.hash(state),
            ExprKind::FunctionCall { name, args } => {
                name.hash(state);
                args.hash(state);
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.hash(state);
                r.hash(state);
            }
        }
    }
}
