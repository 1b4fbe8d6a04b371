//! A small embeddable expression language.
//!
//! Text is parsed into an [`Ast`] and evaluated against caller-supplied
//! [`Bindings`] to a typed [`Value`]:
//!
//! ```
//! use ariadne_expr::{Expression, NoBindings, Value};
//!
//! let mut e = Expression::new("\"n=\" + (1 + 2) * 2");
//! assert_eq!(e.eval(&NoBindings).unwrap(), Value::from("n=6"));
//! ```
mod ast;
mod bindings;
mod collect;
mod error;
mod eval;
mod expression;
mod lexer;
mod options;
mod param;
mod parser;
mod value;

pub use ast::{Ast, Operator};
pub use bindings::{Bindings, NoBindings};
pub use collect::collect_symbols;
pub use error::ExprError;
pub use eval::evaluate;
pub use expression::Expression;
pub use lexer::{Lexer, Token};
pub use options::Options;
pub use param::{Param, Parameter, ParameterList};
pub use parser::Parser;
pub use value::Value;
