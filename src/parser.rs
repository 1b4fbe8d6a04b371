use log::{debug, trace};

use crate::ast::{Ast, Operator};
use crate::error::ExprError;
use crate::lexer::{Lexer, Token};
use crate::options::Options;

/// Predictive recursive-descent parser over a single buffered lookahead token.
///
/// Grammar, lowest precedence first:
///
/// ```text
/// expression    := cmp ( ("&&" | "||") expression )?
/// cmp           := plus_minus ( ("==" | "!=" | ">" | ">=" | "<" | "<=") plus_minus )?
/// plus_minus    := mul_div_mod ( ("+" | "-") mul_div_mod )*
/// mul_div_mod   := deniable(pot) ( ("*" | "/" | "%") deniable(pot) )*
/// pot           := atomic ( "^" deniable(atomic) )?
/// deniable(x)   := ("+" | "-" | "!") x | x
/// atomic        := NUMBER | STRING | "true" | "false" | SYMBOL | "(" expression ")"
/// ```
///
/// Comparisons and `^` are consumed at most once per level; whatever follows
/// is left in the lookahead for the caller.
pub struct Parser<'a> {
    lex: Lexer<'a>,
    look: Token,
    look_pos: usize,
    depth: usize,
    options: Options,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self::with_options(s, Options::default())
    }

    pub fn with_options(s: &'a str, options: Options) -> Self {
        let mut lex = Lexer::new(s);
        let look_pos = lex.offset();
        let look = lex.next_token();
        Self {
            lex,
            look,
            look_pos,
            depth: 0,
            options,
        }
    }

    fn bump(&mut self) {
        self.look_pos = self.lex.offset();
        self.look = self.lex.next_token();
        trace!("lookahead {:?} at {}", self.look, self.look_pos);
    }

    /// A syntax error positioned at the word following the lookahead.
    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError::syntax(message, self.lex.upcoming_word())
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        if self.depth >= self.options.max_depth {
            return Err(ExprError::TooDeep {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Whether all input has been consumed.
    pub fn at_end(&self) -> bool {
        matches!(self.look, Token::End)
    }

    /// Parses exactly one complete expression; trailing input is an error.
    pub fn parse(mut self) -> Result<Ast, ExprError> {
        let ast = self.parse_expression()?;
        if !self.at_end() {
            return Err(ExprError::trailing(self.lex.word_at(self.look_pos)));
        }
        debug!("parsed expression {}", ast);
        Ok(ast)
    }

    /// `cmp ( ("&&" | "||") expression )?`, right-associative.
    pub fn parse_expression(&mut self) -> Result<Ast, ExprError> {
        self.enter()?;
        let res = self.expression_inner();
        self.leave();
        res
    }

    fn expression_inner(&mut self) -> Result<Ast, ExprError> {
        let left = self.parse_cmp()?;
        match self.look {
            Token::Op(op) if op.is_logical() => {
                self.bump();
                let right = self.parse_expression()?;
                Ok(Ast::binary(op, left, right))
            }
            _ => Ok(left),
        }
    }

    pub fn parse_cmp(&mut self) -> Result<Ast, ExprError> {
        let left = self.parse_plus_minus()?;
        match self.look {
            Token::Op(op) if op.is_comparison() => {
                self.bump();
                let right = self.parse_plus_minus()?;
                Ok(Ast::binary(op, left, right))
            }
            _ => Ok(left),
        }
    }

    pub fn parse_plus_minus(&mut self) -> Result<Ast, ExprError> {
        let mut node = self.parse_mul_div_mod()?;
        while let Token::Op(op @ (Operator::Plus | Operator::Minus)) = self.look {
            self.bump();
            let rhs = self.parse_mul_div_mod()?;
            node = Ast::binary(op, node, rhs);
        }
        Ok(node)
    }

    pub fn parse_mul_div_mod(&mut self) -> Result<Ast, ExprError> {
        let mut node = self.parse_deniable_pot()?;
        while let Token::Op(op @ (Operator::Multiply | Operator::Division | Operator::Modulo)) =
            self.look
        {
            self.bump();
            let rhs = self.parse_deniable_pot()?;
            node = Ast::binary(op, node, rhs);
        }
        Ok(node)
    }

    pub fn parse_deniable_pot(&mut self) -> Result<Ast, ExprError> {
        self.deniable(Self::parse_pot)
    }

    pub fn parse_deniable_atomic(&mut self) -> Result<Ast, ExprError> {
        self.deniable(Self::parse_atomic)
    }

    /// Optional unary prefix. A leading `+` produces no node.
    fn deniable(
        &mut self,
        operand: fn(&mut Self) -> Result<Ast, ExprError>,
    ) -> Result<Ast, ExprError> {
        let op = match self.look {
            Token::Op(op) => op,
            _ => return operand(self),
        };
        match op {
            Operator::Plus | Operator::Minus | Operator::LogicalNot => {
                self.bump();
                self.enter()?;
                let res = operand(self);
                self.leave();
                let right = res?;
                if op == Operator::Plus {
                    Ok(right)
                } else {
                    Ok(Ast::unary(op, right))
                }
            }
            _ => Err(self.error(format!("unacceptable operator '{}'", op))),
        }
    }

    /// `atomic ( "^" deniable(atomic) )?`
    pub fn parse_pot(&mut self) -> Result<Ast, ExprError> {
        let base = self.parse_atomic()?;
        if let Token::Op(Operator::Power) = self.look {
            self.bump();
            let exp = self.parse_deniable_atomic()?;
            return Ok(Ast::binary(Operator::Power, base, exp));
        }
        Ok(base)
    }

    pub fn parse_atomic(&mut self) -> Result<Ast, ExprError> {
        match self.look.clone() {
            Token::Number(v) => {
                self.bump();
                Ok(Ast::number(v))
            }
            Token::Str(s) => {
                self.bump();
                Ok(Ast::string(s))
            }
            Token::Bool(b) => {
                self.bump();
                Ok(Ast::boolean(b))
            }
            Token::Symbol(s) => {
                self.bump();
                Ok(Ast::symbol(s))
            }
            Token::LParen => {
                self.bump();
                let e = self.parse_expression()?;
                if !matches!(self.look, Token::RParen) {
                    return Err(self.error("expect ')'"));
                }
                self.bump();
                Ok(e)
            }
            Token::End => Err(self.error("unexpected end")),
            Token::Error(msg) => Err(self.error(msg)),
            Token::RParen | Token::Op(_) => Err(self.error("expect an operand")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        src: &'static str,
        level: fn(&mut Parser<'static>) -> Result<Ast, ExprError>,
    ) -> String {
        let mut p = Parser::new(src);
        match level(&mut p) {
            Ok(ast) => ast.to_string(),
            Err(e) => panic!("{src:?} failed: {e}"),
        }
    }

    #[test]
    fn atomic_compound_symbol() {
        let mut p = Parser::new("A.f(x,(y),z).x");
        assert_eq!(p.parse_atomic().unwrap(), Ast::symbol("A.f(x,(y),z).x"));
        assert!(p.at_end());
    }

    #[test]
    fn atomic_number() {
        let mut p = Parser::new("3.14e-3");
        assert_eq!(p.parse_atomic().unwrap(), Ast::number(3.14e-3));
    }

    #[test]
    fn deniable_atomic() {
        let mut p = Parser::new("!false");
        assert_eq!(
            p.parse_deniable_atomic().unwrap(),
            Ast::unary(Operator::LogicalNot, Ast::boolean(false))
        );

        let mut p = Parser::new("!(false)");
        assert_eq!(
            p.parse_deniable_atomic().unwrap(),
            Ast::unary(Operator::LogicalNot, Ast::boolean(false))
        );

        let mut p = Parser::new("-1");
        assert_eq!(
            p.parse_deniable_atomic().unwrap(),
            Ast::unary(Operator::Minus, Ast::number(1.0))
        );

        // unary plus is absorbed
        let mut p = Parser::new("+1");
        assert_eq!(p.parse_deniable_atomic().unwrap(), Ast::number(1.0));

        let mut p = Parser::new("true");
        assert_eq!(p.parse_deniable_atomic().unwrap(), Ast::boolean(true));
    }

    #[test]
    fn pot_spacing_variants() {
        for src in ["a^b", " a ^ b", "a ^b", "a^ b"] {
            assert_eq!(render(src, Parser::parse_pot), "(a ^ b)");
        }
        for src in ["a^-b", " a ^ -b", "a ^-b", "a^- b"] {
            assert_eq!(render(src, Parser::parse_pot), "(a ^ (-b))");
        }
    }

    #[test]
    fn mul_div_mod_with_negated_operands() {
        assert_eq!(
            render("a^-b%-c^-d", Parser::parse_mul_div_mod),
            "((a ^ (-b)) % (-(c ^ (-d))))"
        );
        for src in ["a*-b", " a * -b", "a *-b", "a*- b"] {
            assert_eq!(render(src, Parser::parse_mul_div_mod), "(a * (-b))");
        }
        for src in ["a/-b", " a / -b", "a /-b", "a/- b"] {
            assert_eq!(render(src, Parser::parse_mul_div_mod), "(a / (-b))");
        }
    }

    #[test]
    fn plus_minus_is_left_associative() {
        for src in ["a+-b", " a + -b", "a +-b", "a+- b"] {
            assert_eq!(render(src, Parser::parse_plus_minus), "(a + (-b))");
        }
        for src in ["a--b", " a - -b", "a --b", "a-- b"] {
            assert_eq!(render(src, Parser::parse_plus_minus), "(a - (-b))");
        }
        assert_eq!(render("a-b-c", Parser::parse_plus_minus), "((a - b) - c)");
        assert_eq!(render("a*b/c%d", Parser::parse_mul_div_mod), "(((a * b) / c) % d)");
    }

    #[test]
    fn every_comparison_operator() {
        let cases = [
            ("a==-b", "=="),
            ("a!=-b", "!="),
            ("a<-b", "<"),
            ("a<=-b", "<="),
            ("a>-b", ">"),
            ("a>=-b", ">="),
        ];
        for (src, op) in cases {
            assert_eq!(render(src, Parser::parse_cmp), format!("(a {op} (-b))"));
        }
    }

    #[test]
    fn logical_operators_are_right_associative() {
        assert_eq!(
            render("a&&b||c", Parser::parse_expression),
            "(a && (b || c))"
        );
        assert_eq!(
            render("a+c^(2*b.x.f(y+x))!=3||b||c", Parser::parse_expression),
            "(((a + (c ^ (2 * b.x.f(y+x)))) != 3) || (b || c))"
        );
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(render("-2^30", Parser::parse_expression), "(-(2 ^ 30))");
    }

    #[test]
    fn chained_power_consumes_one_caret() {
        let mut p = Parser::new("2^3^4");
        assert_eq!(p.parse_expression().unwrap().to_string(), "(2 ^ 3)");
        assert!(!p.at_end());

        let err = Parser::new("2^3^4").parse().unwrap_err();
        assert_eq!(err, ExprError::TrailingInput { near: "^4".into() });

        let mut p = Parser::new("a&&b||c^2^3^4*5");
        assert!(p.parse_expression().is_ok());
        assert!(!p.at_end());
    }

    #[test]
    fn chained_comparison_consumes_one_operator() {
        let mut p = Parser::new("a<b<c");
        assert_eq!(p.parse_expression().unwrap().to_string(), "(a < b)");
        assert_eq!(
            Parser::new("a<b<c").parse().unwrap_err(),
            ExprError::TrailingInput { near: "<c".into() }
        );
    }

    #[test]
    fn diagnostics_name_the_next_word() {
        let cases = [
            ("1**2", "unacceptable operator '*'", "2"),
            ("1^^2", "unacceptable operator '^'", "2"),
            ("(1+2", "expect ')'", "the end"),
            ("1+", "unexpected end", "the end"),
            ("f(", "unmatched parentheses", "the end"),
            ("\"", "unmatched quote", "the end"),
            ("1 + ) 2", "expect an operand", "2"),
            ("1 + # 2", "invalid symbol #", "2"),
        ];
        for (src, message, near) in cases {
            let err = Parser::new(src).parse().unwrap_err();
            assert_eq!(
                err,
                ExprError::Syntax {
                    message: message.into(),
                    near: near.into()
                },
                "{src}"
            );
        }
    }

    #[test]
    fn trailing_input() {
        for (src, near) in [("a 1", "1"), ("b!2", "!2"), ("1+2)", ")")] {
            assert_eq!(
                Parser::new(src).parse().unwrap_err(),
                ExprError::TrailingInput { near: near.into() },
                "{src}"
            );
        }
    }

    #[test]
    fn nesting_limit() {
        let opts = Options::new().max_depth(4);
        assert!(Parser::with_options("((1))", opts).parse().is_ok());
        let err = Parser::with_options("((((1))))", opts).parse().unwrap_err();
        assert_eq!(err, ExprError::TooDeep { limit: 4 });

        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            Parser::new(&deep).parse(),
            Err(ExprError::TooDeep { .. })
        ));
    }
}
