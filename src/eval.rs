use log::trace;

use crate::ast::{Ast, Operator};
use crate::bindings::Bindings;
use crate::error::ExprError;
use crate::value::Value;

/// Reduces `ast` to a single value, looking symbols up in `bindings`.
///
/// Both operands of every binary operator are evaluated, `&&` and `||`
/// included, before the operator is applied. The first error aborts the whole
/// evaluation. Neither the tree nor the bindings are modified.
pub fn evaluate<B: Bindings + ?Sized>(ast: &Ast, bindings: &B) -> Result<Value, ExprError> {
    match ast {
        Ast::Number(n) => Ok(Value::Number(*n)),
        Ast::String(s) => Ok(Value::String(s.clone())),
        Ast::Boolean(b) => Ok(Value::Boolean(*b)),
        Ast::Symbol(name) => bindings.resolve(name).ok_or_else(|| {
            trace!("symbol {} is unbound", name);
            ExprError::UnboundSymbol(name.clone())
        }),
        Ast::Operator {
            op,
            left: None,
            right,
        } => {
            let operand = evaluate(right.as_ref(), bindings)?;
            apply_unary(*op, operand)
        }
        Ast::Operator {
            op,
            left: Some(left),
            right,
        } => {
            let l = evaluate(left.as_ref(), bindings)?;
            let r = evaluate(right.as_ref(), bindings)?;
            apply_binary(*op, l, r)
        }
    }
}

fn apply_unary(op: Operator, operand: Value) -> Result<Value, ExprError> {
    match (op, operand) {
        (Operator::Plus, Value::Number(n)) => Ok(Value::Number(n)),
        (Operator::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
        (Operator::LogicalNot, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, v) => Err(ExprError::UnaryType {
            op,
            operand: v.type_name(),
        }),
    }
}

fn apply_binary(op: Operator, l: Value, r: Value) -> Result<Value, ExprError> {
    use Value::{Boolean as B, Number as N, String as S};

    let out = match (op, &l, &r) {
        (Operator::Plus, N(a), N(b)) => N(a + b),
        (Operator::Plus, N(a), S(b)) => S(format!("{}{}", a, b)),
        (Operator::Plus, S(a), N(b)) => S(format!("{}{}", a, b)),
        (Operator::Plus, S(a), S(b)) => S(format!("{}{}", a, b)),

        (Operator::Minus, N(a), N(b)) => N(a - b),

        (Operator::Multiply, N(a), N(b)) => N(a * b),
        (Operator::Multiply, N(n), S(s)) | (Operator::Multiply, S(s), N(n)) => S(repeat(s, *n)?),

        (Operator::Division, N(_), N(b)) if *b == 0.0 => return Err(ExprError::DivideByZero),
        (Operator::Division, N(a), N(b)) => N(a / b),

        (Operator::Modulo, N(a), N(b)) => {
            let (a, b) = (*a as i64, *b as i64);
            if b == 0 {
                return Err(ExprError::ModuloByZero);
            }
            N(a.wrapping_rem(b) as f64)
        }

        (Operator::Power, N(a), N(b)) => N(a.powf(*b)),

        (Operator::LogicalAnd, B(a), B(b)) => B(*a && *b),
        (Operator::LogicalOr, B(a), B(b)) => B(*a || *b),

        (Operator::CmpEq | Operator::CmpNe, B(a), B(b)) => B((a == b) == (op == Operator::CmpEq)),
        (Operator::CmpEq | Operator::CmpNe, S(a), S(b)) => B((a == b) == (op == Operator::CmpEq)),
        (Operator::CmpEq | Operator::CmpNe, N(a), N(b)) => B((a == b) == (op == Operator::CmpEq)),

        (Operator::CmpGt, N(a), N(b)) => B(a > b),
        (Operator::CmpGe, N(a), N(b)) => B(a >= b),
        (Operator::CmpLt, N(a), N(b)) => B(a < b),
        (Operator::CmpLe, N(a), N(b)) => B(a <= b),
        (Operator::CmpGt, S(a), S(b)) => B(a > b),
        (Operator::CmpGe, S(a), S(b)) => B(a >= b),
        (Operator::CmpLt, S(a), S(b)) => B(a < b),
        (Operator::CmpLe, S(a), S(b)) => B(a <= b),

        _ => {
            return Err(ExprError::BinaryType {
                op,
                left: l.type_name(),
                right: r.type_name(),
            })
        }
    };
    Ok(out)
}

/// `s` repeated `⌊n⌋` times; counts below one give the empty string.
fn repeat(s: &str, n: f64) -> Result<String, ExprError> {
    let count = if n >= 1.0 { n as usize } else { 0 };
    if s.is_empty() || count == 0 {
        return Ok(String::new());
    }
    let total = s
        .len()
        .checked_mul(count)
        .ok_or(ExprError::RepeatOverflow)?;
    let mut out = String::new();
    out.try_reserve_exact(total)
        .map_err(|_| ExprError::RepeatOverflow)?;
    for _ in 0..count {
        out.push_str(s);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::NoBindings;

    fn num(n: f64) -> Ast {
        Ast::number(n)
    }

    #[test]
    fn modulo_truncates_both_operands() {
        let ast = Ast::binary(Operator::Modulo, num(7.9), num(2.5));
        assert_eq!(evaluate(&ast, &NoBindings).unwrap(), Value::Number(1.0));

        let ast = Ast::binary(Operator::Modulo, num(-7.0), num(2.0));
        assert_eq!(evaluate(&ast, &NoBindings).unwrap(), Value::Number(-1.0));

        let ast = Ast::binary(Operator::Modulo, num(7.0), num(0.5));
        assert_eq!(evaluate(&ast, &NoBindings), Err(ExprError::ModuloByZero));
    }

    #[test]
    fn repeat_counts() {
        assert_eq!(repeat("ab", 2.9).unwrap(), "abab");
        assert_eq!(repeat("ab", 0.5).unwrap(), "");
        assert_eq!(repeat("ab", -3.0).unwrap(), "");
        assert_eq!(repeat("ab", f64::NAN).unwrap(), "");
        assert_eq!(repeat("ab", f64::INFINITY), Err(ExprError::RepeatOverflow));
        assert_eq!(repeat("", 1e300).unwrap(), "");
    }

    #[test]
    fn unallocatable_repeat_is_an_error() {
        let ast = Ast::binary(Operator::Multiply, Ast::string("ab"), num(1e15));
        assert_eq!(evaluate(&ast, &NoBindings), Err(ExprError::RepeatOverflow));
    }

    #[test]
    fn unary_plus_requires_a_number() {
        for operand in [Ast::boolean(true), Ast::string("s")] {
            let ast = Ast::unary(Operator::Plus, operand);
            assert!(matches!(
                evaluate(&ast, &NoBindings),
                Err(ExprError::UnaryType {
                    op: Operator::Plus,
                    ..
                })
            ));
        }
    }

    #[test]
    fn binary_only_operator_in_unary_position() {
        let ast = Ast::unary(Operator::Multiply, num(2.0));
        assert_eq!(
            evaluate(&ast, &NoBindings),
            Err(ExprError::UnaryType {
                op: Operator::Multiply,
                operand: "number"
            })
        );
    }

    #[test]
    fn negative_zero_divisor() {
        let ast = Ast::binary(Operator::Division, num(1.0), num(-0.0));
        assert_eq!(evaluate(&ast, &NoBindings), Err(ExprError::DivideByZero));
    }
}
