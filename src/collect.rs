use std::collections::HashSet;

use crate::ast::Ast;

/// Free symbols of `ast`, deduplicated, in left-to-right first-appearance order.
pub fn collect_symbols(ast: &Ast) -> Vec<String> {
    fn walk(node: &Ast, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        match node {
            Ast::Number(_) | Ast::String(_) | Ast::Boolean(_) => {}
            Ast::Symbol(name) => {
                if !seen.contains(name) {
                    seen.insert(name.clone());
                    out.push(name.clone());
                }
            }
            Ast::Operator { left, right, .. } => {
                if let Some(l) = left {
                    walk(l, seen, out);
                }
                walk(right, seen, out);
            }
        }
    }
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    walk(ast, &mut seen, &mut out);
    out
}
