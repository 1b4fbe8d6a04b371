use std::str::FromStr;

use foldhash::{HashMap, HashMapExt};
use log::debug;

use crate::ast::Ast;
use crate::bindings::{Bindings, NoBindings};
use crate::collect::collect_symbols;
use crate::error::ExprError;
use crate::eval::evaluate;
use crate::options::Options;
use crate::param::ParameterList;
use crate::parser::Parser;
use crate::value::Value;

/// A parsed expression: parse once, list its symbols, evaluate many times.
///
/// The wrapper remembers the outcome of the latest operation, so callers that
/// prefer status checks over `Result`s can use [`is_ok`](Self::is_ok) and
/// [`message`](Self::message).
///
/// ```
/// use ariadne_expr::{Expression, Value};
/// use std::collections::HashMap;
///
/// let mut e = Expression::new("price * qty >= 100");
/// assert!(e.is_ok());
/// assert_eq!(e.symbols(), ["price", "qty"]);
///
/// let mut vars = HashMap::new();
/// vars.insert("price".to_string(), Value::from(12.5));
/// vars.insert("qty".to_string(), Value::from(8));
/// assert_eq!(e.eval(&vars).unwrap(), Value::Boolean(true));
/// ```
#[derive(Clone, Debug)]
pub struct Expression {
    ast: Option<Ast>,
    symbols: Vec<String>,
    error: Option<ExprError>,
    options: Options,
}

impl Default for Expression {
    fn default() -> Self {
        Self::empty()
    }
}

impl Expression {
    /// An expression with nothing to evaluate.
    pub fn empty() -> Self {
        Self {
            ast: None,
            symbols: Vec::new(),
            error: Some(ExprError::NoExpression),
            options: Options::default(),
        }
    }

    pub fn new(src: &str) -> Self {
        Self::with_options(src, Options::default())
    }

    pub fn with_options(src: &str, options: Options) -> Self {
        let mut e = Self {
            options,
            ..Self::empty()
        };
        // The outcome is recorded on `e`.
        let _ = e.parse(src);
        e
    }

    /// Replaces the current tree with the parse of `src`. Blank input is the
    /// "no expression" state rather than a syntax error.
    pub fn parse(&mut self, src: &str) -> Result<(), ExprError> {
        self.ast = None;
        self.symbols.clear();
        if src.trim().is_empty() {
            self.error = Some(ExprError::NoExpression);
            return Err(ExprError::NoExpression);
        }
        match Parser::with_options(src, self.options).parse() {
            Ok(ast) => {
                self.symbols = collect_symbols(&ast);
                self.ast = Some(ast);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                debug!("failed to parse {:?}: {}", src, e);
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Whether the latest parse or evaluation succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The latest diagnostic, `"no error"` after a success.
    pub fn message(&self) -> String {
        match &self.error {
            Some(e) => e.to_string(),
            None => "no error".to_string(),
        }
    }

    pub fn error(&self) -> Option<&ExprError> {
        self.error.as_ref()
    }

    pub fn ast(&self) -> Option<&Ast> {
        self.ast.as_ref()
    }

    /// Free symbols in first-appearance order; empty without a tree.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn eval<B: Bindings + ?Sized>(&mut self, bindings: &B) -> Result<Value, ExprError> {
        let ast = match &self.ast {
            Some(ast) => ast,
            None => return Err(self.error.clone().unwrap_or(ExprError::NoExpression)),
        };
        let res = evaluate(ast, bindings);
        match &res {
            Ok(v) => debug!("evaluated {} to {:?}", ast, v),
            Err(e) => debug!("evaluation of {} failed: {}", ast, e),
        }
        self.error = res.as_ref().err().cloned();
        res
    }

    /// Evaluates against legacy parameters. Boolean or undefined parameters
    /// are rejected before evaluation starts.
    pub fn eval_params(&mut self, params: &ParameterList) -> Result<Value, ExprError> {
        if self.ast.is_none() {
            return self.eval(&NoBindings);
        }
        let mut table: HashMap<String, Value> = HashMap::with_capacity(params.len());
        for p in params {
            match p.value.to_value(&p.name) {
                Ok(v) => {
                    table.insert(p.name.clone(), v);
                }
                Err(e) => {
                    self.error = Some(e.clone());
                    return Err(e);
                }
            }
        }
        self.eval(&table)
    }
}

impl FromStr for Expression {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let e = Expression::new(s);
        if let Some(err) = e.error.clone() {
            return Err(err);
        }
        Ok(e)
    }
}
