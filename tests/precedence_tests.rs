use std::collections::HashMap;

use ariadne_expr::{ExprError, Expression, NoBindings, Value};

fn eval(src: &str) -> Result<Value, ExprError> {
    Expression::new(src).eval(&NoBindings)
}

fn num(src: &str) -> f64 {
    match eval(src) {
        Ok(Value::Number(n)) => n,
        other => panic!("{src}: expected a number, got {other:?}"),
    }
}

#[test]
fn arithmetic_precedence_mul_before_add() {
    assert_eq!(num("1 + 2 * 3"), 7.0);
}

#[test]
fn parentheses_override() {
    assert_eq!(num("(1 + 2) * 3"), 9.0);
}

#[test]
fn unary_minus_precedence() {
    // -A * B == (-A) * B
    let mut vars = HashMap::new();
    vars.insert("A".to_string(), Value::from(2));
    vars.insert("B".to_string(), Value::from(3));
    let mut e = Expression::new("-A * B");
    assert_eq!(e.eval(&vars).unwrap(), Value::Number(-6.0));
}

#[test]
fn left_associativity() {
    assert_eq!(num("10 - 2 - 3"), 5.0);
    assert_eq!(num("10 / 5 / 2"), 1.0);
    assert_eq!(num("17 % 10 % 4"), 3.0);
}

#[test]
fn power_binds_tighter_than_mul() {
    assert_eq!(num("2 * 3 ^ 2"), 18.0);
    assert_eq!(num("(2 ^ 3) ^ 2"), 64.0);
    assert_eq!(num("2 ^ (3 ^ 2)"), 512.0);
}

#[test]
fn comparison_below_arithmetic() {
    assert_eq!(eval("1 + 1 == 2").unwrap(), Value::Boolean(true));
    assert_eq!(eval("2 * 3 > 5 + 0.5").unwrap(), Value::Boolean(true));
}

#[test]
fn logical_operators_lowest_and_right_associative() {
    assert_eq!(eval("1 < 2 && 3 > 2").unwrap(), Value::Boolean(true));
    // false && (true || true), not (false && true) || true
    assert_eq!(eval("false && true || true").unwrap(), Value::Boolean(false));
}

#[test]
fn chained_power_leaves_trailing_input() {
    let e = Expression::new("2^3^4");
    assert!(!e.is_ok());
    assert_eq!(
        e.error(),
        Some(&ExprError::TrailingInput { near: "^4".into() })
    );
}

#[test]
fn chained_comparison_leaves_trailing_input() {
    let e = Expression::new("1 < 2 < 3");
    assert!(matches!(e.error(), Some(ExprError::TrailingInput { .. })));
}
