use thiserror::Error;

use crate::ast::Operator;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("no expression is given")]
    NoExpression,
    #[error("{message} before '{near}'")]
    Syntax { message: String, near: String },
    #[error("unprocessed components at the end, maybe there is more than one expression given (near '{near}')")]
    TrailingInput { near: String },
    #[error("expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("unsolvable symbol `{0}`")]
    UnboundSymbol(String),
    #[error("operator '{op}' cannot be applied to {operand}")]
    UnaryType { op: Operator, operand: &'static str },
    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    BinaryType {
        op: Operator,
        left: &'static str,
        right: &'static str,
    },
    #[error("divide by 0")]
    DivideByZero,
    #[error("modulo by 0")]
    ModuloByZero,
    #[error("string repetition result is too large")]
    RepeatOverflow,
    #[error("unrecognizable parameter type for `{name}`")]
    UnsupportedParam { name: String },
}

impl ExprError {
    /// Builds a syntax error, substituting `the end` when nothing follows.
    pub(crate) fn syntax(message: impl Into<String>, near: &str) -> Self {
        ExprError::Syntax {
            message: message.into(),
            near: near_or_end(near),
        }
    }

    pub(crate) fn trailing(near: &str) -> Self {
        ExprError::TrailingInput {
            near: near_or_end(near),
        }
    }

    /// Errors raised while turning text into a tree.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            ExprError::Syntax { .. } | ExprError::TrailingInput { .. } | ExprError::TooDeep { .. }
        )
    }

    /// Errors raised while reducing a tree against bindings.
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            ExprError::UnboundSymbol(_)
                | ExprError::UnaryType { .. }
                | ExprError::BinaryType { .. }
                | ExprError::DivideByZero
                | ExprError::ModuloByZero
                | ExprError::RepeatOverflow
        )
    }
}

fn near_or_end(near: &str) -> String {
    if near.is_empty() {
        "the end".to_string()
    } else {
        near.to_string()
    }
}
