use crate::ast::Operator;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Bool(bool),
    Symbol(String),
    Op(Operator),
    LParen,
    RParen,
    End,
    /// A lexing failure; the payload is the diagnostic.
    Error(String),
}

/// On-demand tokenizer. Each call to [`Lexer::next_token`] consumes exactly one
/// token and leaves the cursor right after it.
pub struct Lexer<'a> {
    src: &'a str,
    i: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { src: s, i: 0 }
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.i
    }

    /// The next whitespace-delimited word, without consuming it.
    pub fn upcoming_word(&self) -> &'a str {
        self.word_at(self.i)
    }

    /// The whitespace-delimited word starting at or after byte offset `pos`.
    pub fn word_at(&self, pos: usize) -> &'a str {
        let rest = self.src[pos.min(self.src.len())..]
            .trim_start_matches(|c: char| c.is_ascii_whitespace());
        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        &rest[..end]
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.i).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.i += 1;
        }
        ch
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.i += 1;
            } else {
                break;
            }
        }
    }

    fn op(&mut self, op: Operator) -> Token {
        self.bump();
        Token::Op(op)
    }

    /// `<`, `>` and `!`, each optionally followed by `=`.
    fn op_or_eq(&mut self, single: Operator, with_eq: Operator) -> Token {
        self.bump();
        if self.peek() == Some(b'=') {
            self.bump();
            Token::Op(with_eq)
        } else {
            Token::Op(single)
        }
    }

    /// `&&`, `||` and `==` have no single-character form.
    fn doubled(&mut self, c: u8, op: Operator) -> Token {
        self.bump();
        if self.peek() == Some(c) {
            self.bump();
            Token::Op(op)
        } else {
            let c = c as char;
            Token::Error(format!(
                "operator '{c}' not understandable, do you mean '{c}{c}' ?"
            ))
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_ws();
        let c = match self.peek() {
            Some(c) => c,
            None => return Token::End,
        };
        match c {
            b'(' => {
                self.bump();
                Token::LParen
            }
            b')' => {
                self.bump();
                Token::RParen
            }
            b'+' => self.op(Operator::Plus),
            b'-' => self.op(Operator::Minus),
            b'*' => self.op(Operator::Multiply),
            b'/' => self.op(Operator::Division),
            b'%' => self.op(Operator::Modulo),
            b'^' => self.op(Operator::Power),
            b'&' => self.doubled(b'&', Operator::LogicalAnd),
            b'|' => self.doubled(b'|', Operator::LogicalOr),
            b'=' => self.doubled(b'=', Operator::CmpEq),
            b'<' => self.op_or_eq(Operator::CmpLt, Operator::CmpLe),
            b'>' => self.op_or_eq(Operator::CmpGt, Operator::CmpGe),
            b'!' => self.op_or_eq(Operator::LogicalNot, Operator::CmpNe),
            b'"' => match self.lex_quoted() {
                Ok(s) => Token::Str(s),
                Err(msg) => Token::Error(msg),
            },
            c if c.is_ascii_digit() => self.lex_number(),
            c if c.is_ascii_alphabetic() => self.lex_symbol(),
            _ => {
                let ch = self.src[self.i..].chars().next().unwrap_or('?');
                self.i += ch.len_utf8();
                Token::Error(format!("invalid symbol {}", ch))
            }
        }
    }

    fn lex_number(&mut self) -> Token {
        let start = self.i;
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else if c == b'.' && !seen_dot && !seen_exp {
                seen_dot = true;
                self.i += 1;
            } else if (c == b'e' || c == b'E') && !seen_exp {
                seen_exp = true;
                self.i += 1;
                if let Some(b'+' | b'-') = self.peek() {
                    self.i += 1;
                }
                // A missing exponent is left for parse() to reject.
                while let Some(b'0'..=b'9') = self.peek() {
                    self.i += 1;
                }
            } else {
                break;
            }
        }
        let s = &self.src[start..self.i];
        match s.parse::<f64>() {
            Ok(v) => Token::Number(v),
            Err(e) => Token::Error(format!("invalid number '{}': {}", s, e)),
        }
    }

    /// A symbol is an alphanumeric run, optionally continued by `.name`
    /// segments and bracketed call-like suffixes. Whitespace between the
    /// pieces is skipped and not kept.
    fn lex_symbol(&mut self) -> Token {
        let mut text = String::new();
        loop {
            let start = self.i;
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() {
                    self.i += 1;
                } else {
                    break;
                }
            }
            text.push_str(&self.src[start..self.i]);
            self.skip_ws();
            match self.peek() {
                Some(b'.') => {
                    self.bump();
                    text.push('.');
                    continue;
                }
                Some(b'(') => {
                    let start = self.i;
                    if let Err(msg) = self.take_brackets() {
                        return Token::Error(msg);
                    }
                    text.push_str(&self.src[start..self.i]);
                }
                _ => {}
            }
            match self.peek() {
                Some(c) if c.is_ascii_alphabetic() || c == b'.' => {}
                _ => break,
            }
        }
        match text.as_str() {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => Token::Symbol(text),
        }
    }

    /// Skips a balanced `( ... )` group. Quoted strings inside may contain
    /// brackets.
    fn take_brackets(&mut self) -> Result<(), String> {
        self.bump();
        loop {
            match self.peek() {
                None => return Err("unmatched parentheses".into()),
                Some(b')') => {
                    self.bump();
                    return Ok(());
                }
                Some(b'"') => {
                    self.lex_quoted()?;
                }
                Some(b'(') => self.take_brackets()?,
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Scans `"..."` with `\"` and `\\` escapes and returns the unescaped body.
    fn lex_quoted(&mut self) -> Result<String, String> {
        self.bump();
        let mut out = String::new();
        let mut seg = self.i;
        loop {
            match self.peek() {
                None => return Err("unmatched quote".into()),
                Some(b'"') => {
                    out.push_str(&self.src[seg..self.i]);
                    self.bump();
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.src[seg..self.i]);
                    self.bump();
                    match self.peek() {
                        Some(c @ (b'"' | b'\\')) => {
                            out.push(c as char);
                            self.bump();
                        }
                        _ => out.push('\\'),
                    }
                    seg = self.i;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}
