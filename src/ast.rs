use std::fmt;

use crate::value::Value;

/// Operator codes carried by [`Ast::Operator`] nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`, binary sum/concatenation or unary identity
    Plus,
    /// `-`, binary difference or unary negation
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Division,
    /// `%`, operands truncated to integers
    Modulo,
    /// `^`
    Power,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
    /// `!`, unary only
    LogicalNot,
    /// `==`
    CmpEq,
    /// `!=`
    CmpNe,
    /// `>`
    CmpGt,
    /// `>=`
    CmpGe,
    /// `<`
    CmpLt,
    /// `<=`
    CmpLe,
}

impl Operator {
    /// The source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Division => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::LogicalAnd => "&&",
            Operator::LogicalOr => "||",
            Operator::LogicalNot => "!",
            Operator::CmpEq => "==",
            Operator::CmpNe => "!=",
            Operator::CmpGt => ">",
            Operator::CmpGe => ">=",
            Operator::CmpLt => "<",
            Operator::CmpLe => "<=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::CmpEq
                | Operator::CmpNe
                | Operator::CmpGt
                | Operator::CmpGe
                | Operator::CmpLt
                | Operator::CmpLe
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Operator::LogicalAnd | Operator::LogicalOr)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed expression tree.
///
/// Every node exclusively owns its children, so `clone` is a full deep copy.
/// Operator nodes always have a right operand; a missing left operand marks a
/// unary operator (`+x`, `-x`, `!x`).
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    /// Numeric literal (e.g. 1, 3.14e-2)
    Number(f64),
    /// String literal, stored without its quotes
    String(String),
    /// `true` / `false`
    Boolean(bool),
    /// A name resolved against bindings at evaluation time (e.g. x, a.f(y, "z"))
    Symbol(String),
    /// Unary or binary operator application
    Operator {
        op: Operator,
        left: Option<Box<Ast>>,
        right: Box<Ast>,
    },
}

impl Ast {
    pub fn number(n: f64) -> Self {
        Ast::Number(n)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Ast::String(s.into())
    }

    pub fn boolean(b: bool) -> Self {
        Ast::Boolean(b)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Ast::Symbol(name.into())
    }

    pub fn unary(op: Operator, right: Ast) -> Self {
        Ast::Operator {
            op,
            left: None,
            right: Box::new(right),
        }
    }

    pub fn binary(op: Operator, left: Ast, right: Ast) -> Self {
        Ast::Operator {
            op,
            left: Some(Box::new(left)),
            right: Box::new(right),
        }
    }

    /// True for number, string and boolean literals.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Ast::Number(_) | Ast::String(_) | Ast::Boolean(_))
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Ast::Operator { left, right, .. } => {
                let l = left.as_ref().map_or(0, |l| l.depth());
                1 + l.max(right.depth())
            }
            _ => 1,
        }
    }
}

impl From<Value> for Ast {
    fn from(v: Value) -> Self {
        match v {
            Value::Number(n) => Ast::Number(n),
            Value::String(s) => Ast::String(s),
            Value::Boolean(b) => Ast::Boolean(b),
        }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Number(n) => write!(f, "{}", n),
            Ast::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")
            }
            Ast::Boolean(b) => write!(f, "{}", b),
            Ast::Symbol(name) => f.write_str(name),
            Ast::Operator { op, left: None, right } => write!(f, "({}{})", op, right),
            Ast::Operator {
                op,
                left: Some(left),
                right,
            } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
