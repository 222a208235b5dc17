//! Recursive-descent parser for header expressions.
//!
//! Precedence, lowest first:
//! - `a if cond else b`
//! - `or`, `and`, `not`
//! - comparisons: `== != < <= > >= in not in is is not` (chainable)
//! - `+ -`, then `* / // %`
//! - unary `- +`
//! - postfix call, index `x[i]` and attribute `x.name`

use crate::ast::{BinaryOp, CompareOp, Expr, UnaryOp};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind, tokenize};
use crate::value::Value;

/// Words that can never be used as a name.
const KEYWORDS: &[&str] = &[
    "and", "or", "not", "in", "is", "if", "else", "lambda", "for",
];

/// Deepest syntax tree a header expression may build.
const MAX_DEPTH: usize = 200;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn position(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].position
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn is_op(&self, op: &str) -> bool {
        matches!(self.peek(), TokenKind::Op(o) if *o == op)
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.is_op(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: &str) -> Result<()> {
        if self.eat_op(op) {
            Ok(())
        } else {
            Err(Error::syntax(
                format!("expected '{op}', found {}", describe(self.peek())),
                self.position(),
            ))
        }
    }

    fn is_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        matches!(self.peek_at(offset), TokenKind::Name(n) if n == keyword)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.is_keyword_at(0, keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Count one more level of tree nesting, failing past [`MAX_DEPTH`].
    fn deepen(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::syntax("expression nested too deeply", self.position()));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one level deeper, restoring the depth afterwards.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Expr>) -> Result<Expr> {
        let base = self.depth;
        self.deepen()?;
        let expr = parse(self);
        self.depth = base;
        expr
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> Result<Expr> {
        let body = self.parse_or()?;
        if self.eat_keyword("if") {
            let condition = self.parse_or()?;
            if !self.eat_keyword("else") {
                return Err(Error::syntax(
                    "expected 'else' in conditional expression",
                    self.position(),
                ));
            }
            let otherwise = self.parse_expr()?;
            return Ok(Expr::Conditional {
                condition: Box::new(condition),
                then: Box::new(body),
                otherwise: Box::new(otherwise),
            });
        }
        Ok(body)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let base = self.depth;
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            self.deepen()?;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let base = self.depth;
        let mut left = self.parse_not()?;
        while self.eat_keyword("and") {
            self.deepen()?;
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        self.depth = base;
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.eat_keyword("not") {
            let operand = self.nested(Self::parse_not)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn compare_op(&mut self) -> Option<CompareOp> {
        let (op, width) = match self.peek() {
            TokenKind::Op("==") => (CompareOp::Eq, 1),
            TokenKind::Op("!=") => (CompareOp::Ne, 1),
            TokenKind::Op("<") => (CompareOp::Lt, 1),
            TokenKind::Op("<=") => (CompareOp::Le, 1),
            TokenKind::Op(">") => (CompareOp::Gt, 1),
            TokenKind::Op(">=") => (CompareOp::Ge, 1),
            TokenKind::Name(n) if n == "in" => (CompareOp::In, 1),
            TokenKind::Name(n) if n == "not" && self.is_keyword_at(1, "in") => {
                (CompareOp::NotIn, 2)
            }
            TokenKind::Name(n) if n == "is" && self.is_keyword_at(1, "not") => {
                (CompareOp::IsNot, 2)
            }
            TokenKind::Name(n) if n == "is" => (CompareOp::Is, 1),
            _ => return None,
        };
        self.pos += width;
        Some(op)
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let first = self.parse_arith()?;
        let mut rest = Vec::new();
        while let Some(op) = self.compare_op() {
            rest.push((op, self.parse_arith()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn parse_arith(&mut self) -> Result<Expr> {
        let base = self.depth;
        let mut left = self.parse_term()?;
        loop {
            let op = if self.eat_op("+") {
                BinaryOp::Add
            } else if self.eat_op("-") {
                BinaryOp::Sub
            } else {
                self.depth = base;
                return Ok(left);
            };
            self.deepen()?;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let base = self.depth;
        let mut left = self.parse_factor()?;
        loop {
            let op = if self.eat_op("*") {
                BinaryOp::Mul
            } else if self.eat_op("//") {
                BinaryOp::FloorDiv
            } else if self.eat_op("/") {
                BinaryOp::Div
            } else if self.eat_op("%") {
                BinaryOp::Mod
            } else {
                self.depth = base;
                return Ok(left);
            };
            self.deepen()?;
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_factor(&mut self) -> Result<Expr> {
        let op = if self.eat_op("-") {
            UnaryOp::Neg
        } else if self.eat_op("+") {
            UnaryOp::Pos
        } else {
            return self.parse_postfix();
        };
        let operand = self.nested(Self::parse_factor)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let base = self.depth;
        let mut expr = self.parse_atom()?;
        loop {
            if self.eat_op("[") {
                self.deepen()?;
                let index = self.parse_expr()?;
                self.expect_op("]")?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.eat_op(".") {
                self.deepen()?;
                let position = self.position();
                match self.advance() {
                    TokenKind::Name(name) => {
                        expr = Expr::Attribute {
                            target: Box::new(expr),
                            name,
                        }
                    }
                    other => {
                        return Err(Error::syntax(
                            format!("expected attribute name, found {}", describe(&other)),
                            position,
                        ));
                    }
                }
            } else if self.is_op("(") {
                return Err(Error::syntax(
                    "only builtin functions can be called",
                    self.position(),
                ));
            } else {
                self.depth = base;
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn parse_sequence(&mut self, close: &str) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.eat_op(close) {
            items.push(self.parse_expr()?);
            if !self.eat_op(",") {
                self.expect_op(close)?;
                break;
            }
        }
        Ok(items)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let position = self.position();
        match self.advance() {
            TokenKind::Int(i) => Ok(Expr::Literal(Value::Int(i))),
            TokenKind::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            TokenKind::Str(mut s) => {
                while let TokenKind::Str(next) = self.peek() {
                    s.push_str(next);
                    self.pos += 1;
                }
                Ok(Expr::Literal(Value::Str(s)))
            }
            TokenKind::Name(name) => match name.as_str() {
                "True" => Ok(Expr::Literal(Value::Bool(true))),
                "False" => Ok(Expr::Literal(Value::Bool(false))),
                "None" => Ok(Expr::Literal(Value::None)),
                "lambda" => Err(Error::syntax(
                    "lambda expressions are not supported",
                    position,
                )),
                kw if KEYWORDS.contains(&kw) => Err(Error::syntax(
                    format!("unexpected keyword '{kw}'"),
                    position,
                )),
                _ if self.eat_op("(") => {
                    let args = self.parse_sequence(")")?;
                    Ok(Expr::Call {
                        function: name,
                        args,
                    })
                }
                _ => Ok(Expr::Name(name)),
            },
            TokenKind::Op("(") => {
                if self.eat_op(")") {
                    return Ok(Expr::List(Vec::new()));
                }
                let first = self.parse_expr()?;
                if self.eat_op(")") {
                    return Ok(first);
                }
                self.expect_op(",")?;
                let mut items = vec![first];
                items.extend(self.parse_sequence(")")?);
                Ok(Expr::List(items))
            }
            TokenKind::Op("[") => Ok(Expr::List(self.parse_sequence("]")?)),
            other => Err(Error::syntax(
                format!("unexpected {}", describe(&other)),
                position,
            )),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(i) => format!("number {i}"),
        TokenKind::Float(f) => format!("number {f}"),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Name(n) => format!("name '{n}'"),
        TokenKind::Op(op) => format!("'{op}'"),
        TokenKind::Eof => "end of expression".to_string(),
    }
}

/// Parse an expression string into a syntax tree.
///
/// # Example
/// ```
/// use buildcfg_expr::{Expr, parse};
///
/// let expr = parse("os == 'linux'").unwrap();
/// assert!(matches!(expr, Expr::Compare { .. }));
/// ```
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    match parser.peek() {
        TokenKind::Eof => Ok(expr),
        other => Err(Error::syntax(
            format!("unexpected {} after expression", describe(other)),
            parser.position(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn int(i: i64) -> Expr {
        Expr::Literal(Value::Int(i))
    }

    #[test]
    fn test_arithmetic_precedence() {
        let expr = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(int(1)),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    left: Box::new(int(2)),
                    right: Box::new(int(3)),
                }),
            }
        );
    }

    #[test]
    fn test_not_in_is_single_operator() {
        let expr = parse("'a' not in x").unwrap();
        let Expr::Compare { rest, .. } = expr else {
            panic!("expected comparison");
        };
        assert_eq!(rest[0].0, CompareOp::NotIn);
    }

    #[test]
    fn test_tuple_and_parenthesized() {
        assert_eq!(parse("(1)").unwrap(), int(1));
        assert_eq!(parse("(1,)").unwrap(), Expr::List(vec![int(1)]));
        assert_eq!(parse("('2', '3',)").unwrap(), {
            Expr::List(vec![
                Expr::Literal(Value::from("2")),
                Expr::Literal(Value::from("3")),
            ])
        });
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        assert_eq!(
            parse("'a' \"b\"").unwrap(),
            Expr::Literal(Value::from("ab"))
        );
    }

    #[test]
    fn test_lambda_is_rejected() {
        assert!(matches!(
            parse("map(lambda i: i, [])"),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert!(matches!(parse("1 2"), Err(Error::Syntax { position: 2, .. })));
    }

    #[rstest]
    #[case::unary_minus("-".repeat(200_000) + "1")]
    #[case::not_chain("not ".repeat(200_000) + "x")]
    #[case::parentheses("(".repeat(200_000) + "1" + &")".repeat(200_000))]
    #[case::lists("[".repeat(200_000) + &"]".repeat(200_000))]
    #[case::addition(vec!["1"; 200_000].join(" + "))]
    #[case::indexing("x".to_string() + &"[0]".repeat(200_000))]
    fn test_deep_nesting_is_rejected(#[case] source: String) {
        let err = parse(&source).unwrap_err();
        assert!(
            matches!(&err, Error::Syntax { message, .. } if message.contains("nested too deeply")),
            "{err:?}"
        );
    }

    #[test]
    fn test_moderate_nesting_and_long_lists_parse() {
        let source = "(".repeat(50) + "1" + &")".repeat(50);
        assert_eq!(parse(&source).unwrap(), int(1));

        let items = vec!["1"; 5_000].join(", ");
        let Expr::List(parsed) = parse(&format!("[{items}]")).unwrap() else {
            panic!("expected list");
        };
        assert_eq!(parsed.len(), 5_000);
    }
}
