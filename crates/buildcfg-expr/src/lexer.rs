//! Tokenizer for header expressions

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),
    Op(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the token start.
    pub position: usize,
}

/// Operators, longest first so that `//` wins over `/`.
const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "//", "<", ">", "+", "-", "*", "/", "%", "(", ")", "[", "]", "{",
    "}", ",", ".", ":",
];

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_ws();
            let position = self.pos;
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    position,
                });
                return Ok(tokens);
            };

            let kind = if c.is_ascii_digit()
                || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
            {
                self.number()?
            } else if c == '\'' || c == '"' {
                TokenKind::Str(self.string(false)?)
            } else if (c == 'r' || c == 'R') && matches!(self.peek_at(1), Some('\'' | '"')) {
                self.pos += 1;
                TokenKind::Str(self.string(true)?)
            } else if c.is_alphabetic() || c == '_' {
                TokenKind::Name(self.identifier())
            } else if let Some(&op) = OPERATORS.iter().find(|op| self.starts_with(op)) {
                self.pos += op.chars().count();
                TokenKind::Op(op)
            } else {
                return Err(Error::syntax(format!("unexpected character '{c}'"), position));
            };
            tokens.push(Token { kind, position });
        }
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.pos += 1;
            } else if c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let mut text = String::new();
        let mut is_float = false;

        self.digits(&mut text);
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            text.push('.');
            self.pos += 1;
            self.digits(&mut text);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                text.push('e');
                self.pos += 1;
                if sign {
                    text.extend(self.next());
                }
                self.digits(&mut text);
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|e| Error::syntax(format!("invalid float literal: {e}"), start))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| Error::syntax("integer literal too large", start))
        }
    }

    fn string(&mut self, raw: bool) -> Result<String> {
        let start = self.pos;
        let Some(quote) = self.next() else {
            return Err(Error::syntax("expected string literal", start));
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let Some(c) = self.next() else {
                return Err(Error::syntax("unterminated string literal", start));
            };
            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    return Ok(out);
                }
                out.push(c);
            } else if c == '\n' && !triple {
                return Err(Error::syntax("unterminated string literal", start));
            } else if c == '\\' && !raw {
                self.escape(&mut out)?;
            } else if c == '\\' {
                // Raw strings still cannot end on an escaped quote.
                out.push(c);
                if let Some(next) = self.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<()> {
        let position = self.pos;
        let Some(c) = self.next() else {
            return Err(Error::syntax("unterminated escape sequence", position));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' | '\'' | '"' => out.push(c),
            '\n' => {}
            'x' => out.push(self.hex_escape(2, position)?),
            'u' => out.push(self.hex_escape(4, position)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, width: usize, position: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..width {
            let digit = self
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| Error::syntax("truncated hexadecimal escape", position))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| Error::syntax("invalid escape code point", position))
    }
}

/// Split an expression into tokens, ending with `TokenKind::Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators_prefer_longest() {
        assert_eq!(
            kinds("1 // 2 <= 3"),
            vec![
                TokenKind::Int(1),
                TokenKind::Op("//"),
                TokenKind::Int(2),
                TokenKind::Op("<="),
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_hex_escapes_in_strings() {
        assert_eq!(
            kinds(r"'\x23\x3b'"),
            vec![TokenKind::Str("#;".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_triple_quoted_string() {
        assert_eq!(
            kinds(r"'''a'b'''"),
            vec![TokenKind::Str("a'b".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_raw_string_keeps_backslashes() {
        assert_eq!(
            kinds(r"r'\x23'"),
            vec![TokenKind::Str(r"\x23".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 2.5 1e3 1_000"),
            vec![
                TokenKind::Int(42),
                TokenKind::Float(2.5),
                TokenKind::Float(1000.0),
                TokenKind::Int(1000),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(matches!(
            tokenize("'abc"),
            Err(Error::Syntax { position: 0, .. })
        ));
    }
}
