//! Named parameter container used to pass values across the expression
//! boundary.

use std::fmt;

use crate::error::ExprError;
use crate::value::Value;

/// A loosely typed parameter value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Param {
    #[default]
    Undefined,
    Char(char),
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
}

impl Param {
    pub fn type_name(&self) -> &'static str {
        match self {
            Param::Undefined => "undefined",
            Param::Char(_) => "char",
            Param::Integer(_) => "integer",
            Param::Real(_) => "real",
            Param::Text(_) => "string",
            Param::Boolean(_) => "boolean",
        }
    }

    /// Converts to an evaluator value. Booleans and undefined parameters are
    /// not accepted as bindings.
    pub fn to_value(&self, name: &str) -> Result<Value, ExprError> {
        match self {
            Param::Real(r) => Ok(Value::Number(*r)),
            Param::Integer(i) => Ok(Value::Number(*i as f64)),
            Param::Text(s) => Ok(Value::String(s.clone())),
            Param::Char(c) => Ok(Value::String(c.to_string())),
            Param::Boolean(_) | Param::Undefined => Err(ExprError::UnsupportedParam {
                name: name.to_string(),
            }),
        }
    }
}

/// Booleans come back as `Real(1)` / `Real(0)`.
impl From<Value> for Param {
    fn from(v: Value) -> Self {
        match v {
            Value::Number(n) => Param::Real(n),
            Value::String(s) => Param::Text(s),
            Value::Boolean(b) => Param::Real(if b { 1.0 } else { 0.0 }),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Undefined => f.write_str("<undefined>"),
            Param::Char(c) => write!(f, "{}", c),
            Param::Integer(i) => write!(f, "{}", i),
            Param::Real(r) => write!(f, "{}", r),
            Param::Text(s) => f.write_str(s),
            Param::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A parameter with a name, a free-form description and an enabled flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub status: bool,
    pub value: Param,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Param) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            status: true,
            value,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

/// Ordered list of parameters with unique names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterList {
    items: Vec<Parameter>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&Parameter> {
        self.items.iter().find(|p| p.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.items.iter_mut().find(|p| p.name == name)
    }

    /// Appends `p`, replacing any parameter of the same name in place.
    pub fn push_back(&mut self, p: Parameter) {
        match self.position(&p.name) {
            Some(i) => self.items[i] = p,
            None => self.items.push(p),
        }
    }

    /// Prepends `p`, dropping any parameter of the same name.
    pub fn push_front(&mut self, p: Parameter) {
        self.erase(&p.name);
        self.items.insert(0, p);
    }

    /// Binds `name` to `value`, keeping the existing description if any.
    pub fn insert(&mut self, name: &str, value: Param) {
        match self.find_mut(name) {
            Some(p) => p.value = value,
            None => self.items.push(Parameter::new(name, value)),
        }
    }

    pub fn erase(&mut self, name: &str) -> Option<Parameter> {
        self.position(name).map(|i| self.items.remove(i))
    }

    /// Renames `old` to `new`. Returns false if `old` is missing or `new` is
    /// already taken.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.contains(new) {
            return false;
        }
        match self.find_mut(old) {
            Some(p) => {
                p.name = new.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_description(&mut self, name: &str, description: &str) -> bool {
        match self.find_mut(name) {
            Some(p) => {
                p.description = description.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, name: &str, status: bool) -> bool {
        match self.find_mut(name) {
            Some(p) => {
                p.status = status;
                true
            }
            None => false,
        }
    }

    pub fn front(&self) -> Option<&Parameter> {
        self.items.first()
    }

    pub fn back(&self) -> Option<&Parameter> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Parameter> for ParameterList {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut list = ParameterList::new();
        for p in iter {
            list.push_back(p);
        }
        list
    }
}
