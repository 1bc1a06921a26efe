//! Parser for the canonical formula syntax.
//!
//! Grammar (whitespace is insignificant, connective names are
//! case-insensitive, identifiers are case-sensitive):
//!
//! ```text
//! expr  := ident
//!        | "not" "(" expr ")"
//!        | ("and" | "or" | "if" | "iff") "(" expr "," expr ")"
//!        | "(" expr ")"
//! ident := [A-Za-z0-9_]+
//! ```
//!
//! There is no operator precedence: nesting is always explicit.

use std::str::FromStr;

use thiserror::Error;

use crate::ast::Expr;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("empty formula")]
    Empty,
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected character '{found}' at {offset}, expected {expected}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expected: &'static str,
    },
    #[error("unknown connective '{name}' at {offset}")]
    UnknownConnective { name: String, offset: usize },
    #[error("connective '{name}' at {offset} takes {expected} argument(s), found {found}")]
    Arity {
        name: String,
        offset: usize,
        expected: usize,
        found: usize,
    },
    #[error("trailing input at {offset}")]
    TrailingInput { offset: usize },
}

/// Parse a formula written in canonical connective-call syntax.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser { src: text, pos: 0 };
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(ParseError::Empty);
    }
    let expr = parser.expr()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(ParseError::TrailingInput { offset: parser.pos });
    }
    Ok(expr)
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == want => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(ParseError::UnexpectedChar {
                found,
                offset: self.pos,
                expected,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn ident(&mut self) -> &str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            None => return Err(ParseError::UnexpectedEnd { expected: "formula" }),
            Some('(') => {
                self.pos += 1;
                let inner = self.expr()?;
                self.expect(')', "')'")?;
                return Ok(inner);
            }
            Some(c) if !(c.is_ascii_alphanumeric() || c == '_') => {
                return Err(ParseError::UnexpectedChar {
                    found: c,
                    offset: start,
                    expected: "formula",
                });
            }
            Some(_) => {}
        }

        let name = self.ident().to_string();
        self.skip_whitespace();
        if self.peek() != Some('(') {
            return Ok(Expr::Literal(name));
        }
        self.pos += 1;

        let mut args = vec![self.expr()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    args.push(self.expr()?);
                }
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some(found) => {
                    return Err(ParseError::UnexpectedChar {
                        found,
                        offset: self.pos,
                        expected: "',' or ')'",
                    })
                }
                None => return Err(ParseError::UnexpectedEnd { expected: "',' or ')'" }),
            }
        }

        let lower = name.to_ascii_lowercase();
        let found = args.len();
        let mut args = args.into_iter();
        let expr = match (lower.as_str(), args.next(), args.next()) {
            ("not", Some(a), None) => Expr::not(a),
            ("and", Some(a), Some(b)) if found == 2 => Expr::and(a, b),
            ("or", Some(a), Some(b)) if found == 2 => Expr::or(a, b),
            ("if", Some(a), Some(b)) if found == 2 => Expr::implies(a, b),
            ("iff", Some(a), Some(b)) if found == 2 => Expr::iff(a, b),
            ("not" | "and" | "or" | "if" | "iff", ..) => {
                let expected = if lower == "not" { 1 } else { 2 };
                return Err(ParseError::Arity {
                    name,
                    offset: start,
                    expected,
                    found,
                });
            }
            _ => return Err(ParseError::UnknownConnective { name, offset: start }),
        };
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        assert_eq!(parse("a").unwrap(), Expr::literal("a"));
        assert_eq!(parse("  A_1 ").unwrap(), Expr::literal("A_1"));
    }

    #[test]
    fn test_nested() {
        let e = parse("and(a, not(or(b,c)))").unwrap();
        assert_eq!(e.to_string(), "and(a,not(or(b,c)))");
    }

    #[test]
    fn test_connectives_case_insensitive() {
        assert_eq!(parse("And(a,b )").unwrap(), parse("and(a,b)").unwrap());
        assert_eq!(parse("OR( b, a)").unwrap().to_string(), "or(b,a)");
        assert_ne!(parse("a").unwrap(), parse("A").unwrap());
    }

    #[test]
    fn test_enclosing_parentheses() {
        assert_eq!(parse("(and(a,b))").unwrap(), parse("and(a,b)").unwrap());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert!(matches!(parse("and(a)"), Err(ParseError::Arity { expected: 2, found: 1, .. })));
        assert!(matches!(parse("not(a,b)"), Err(ParseError::Arity { expected: 1, found: 2, .. })));
        assert!(matches!(parse("xor(a,b)"), Err(ParseError::UnknownConnective { .. })));
        assert!(matches!(parse("and(a,b"), Err(ParseError::UnexpectedEnd { .. })));
        assert!(matches!(parse("a b"), Err(ParseError::TrailingInput { offset: 2 })));
        assert!(matches!(parse("&(a,b)"), Err(ParseError::UnexpectedChar { found: '&', .. })));
    }

    #[test]
    fn test_from_str() {
        let e: Expr = "iff(p,q)".parse().unwrap();
        assert_eq!(e, Expr::iff(Expr::literal("p"), Expr::literal("q")));
    }
}
