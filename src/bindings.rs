use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::value::Value;

/// A read-only table mapping symbol names to values.
///
/// Implement this trait to let the evaluator look symbols up in your own
/// storage. Implementations must not hand out shared state: every call returns
/// an owned value, so the evaluator never aliases the caller's data.
pub trait Bindings {
    /// Returns the value bound to `name`, or `None` if it is unbound.
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// The empty binding table. Any symbol is unbound.
pub struct NoBindings;

impl Bindings for NoBindings {
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl<S: BuildHasher> Bindings for HashMap<String, Value, S> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Bindings for BTreeMap<String, Value> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<F: Fn(&str) -> Option<Value>> Bindings for F {
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}
