//! Parse key kind expressions
//!
//! Grammar:
//!
//! ```text
//! kind  := prim | "fn" | "&" kind
//!        | "[" kind "]" | "[" kind ";" N "]"
//!        | "(" [kind ("," kind)* [","]] ")"
//!        | "vec" "<" kind ">" | "set" "<" kind ">"
//!        | "map" "<" kind "," kind ">"
//! prim  := int | uint | float | bool | char | string
//! ```

use std::iter::Peekable;
use std::str::Chars;

use super::{KeyKind, Primitive};
use crate::error_codes::ProbeError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Number(usize),
    Punct(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "`{}`", s),
            Token::Number(n) => write!(f, "`{}`", n),
            Token::Punct(c) => write!(f, "`{}`", c),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<Chars> = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' | ']' | '(' | ')' | '<' | '>' | ',' | ';' | '&' => {
                tokens.push(Token::Punct(ch));
                chars.next();
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let n = digits
                    .parse::<usize>()
                    .map_err(|_| format!("array length `{}` is too large", digits))?;
                tokens.push(Token::Number(n));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if !(d.is_ascii_alphanumeric() || d == '_') {
                        break;
                    }
                    ident.push(d);
                    chars.next();
                }
                tokens.push(Token::Ident(ident.to_ascii_lowercase()));
            }
            other => return Err(format!("unexpected character `{}`", other)),
        }
    }

    Ok(tokens)
}

/// Deepest nesting accepted before parsing gives up
const MAX_NESTING: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, punct: char) -> Result<(), String> {
        match self.next() {
            Some(Token::Punct(c)) if c == punct => Ok(()),
            Some(other) => Err(format!("expected `{}`, found {}", punct, other)),
            None => Err(format!("expected `{}`, found end of input", punct)),
        }
    }

    fn eat(&mut self, punct: char) -> bool {
        if self.peek() == Some(&Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_kind(&mut self) -> Result<KeyKind, String> {
        if self.depth >= MAX_NESTING {
            return Err("key kind nested too deeply".to_string());
        }
        self.depth += 1;
        let kind = self.parse_kind_inner();
        self.depth -= 1;
        kind
    }

    fn parse_kind_inner(&mut self) -> Result<KeyKind, String> {
        match self.next() {
            Some(Token::Punct('&')) => Ok(KeyKind::Reference(Box::new(self.parse_kind()?))),
            Some(Token::Punct('[')) => {
                let element = self.parse_kind()?;
                if self.eat(';') {
                    let len = match self.next() {
                        Some(Token::Number(n)) => n,
                        Some(other) => return Err(format!("expected array length, found {}", other)),
                        None => return Err("expected array length, found end of input".to_string()),
                    };
                    self.expect(']')?;
                    Ok(KeyKind::FixedArray { element: Box::new(element), len })
                } else {
                    self.expect(']')?;
                    Ok(KeyKind::Sequence(Box::new(element)))
                }
            }
            Some(Token::Punct('(')) => {
                let mut fields = Vec::new();
                while !self.eat(')') {
                    fields.push(self.parse_kind()?);
                    if !self.eat(',') {
                        self.expect(')')?;
                        break;
                    }
                }
                Ok(KeyKind::Tuple(fields))
            }
            Some(Token::Ident(name)) => self.parse_named(&name),
            Some(other) => Err(format!("unexpected {}", other)),
            None => Err("empty key kind".to_string()),
        }
    }

    fn parse_named(&mut self, name: &str) -> Result<KeyKind, String> {
        if let Some(prim) = Primitive::from_name(name) {
            return Ok(KeyKind::Primitive(prim));
        }

        match name {
            "fn" | "func" | "function" => Ok(KeyKind::Function),
            "vec" | "list" | "slice" => {
                self.expect('<')?;
                let element = self.parse_kind()?;
                self.expect('>')?;
                Ok(KeyKind::Sequence(Box::new(element)))
            }
            "set" => {
                self.expect('<')?;
                let element = self.parse_kind()?;
                self.expect('>')?;
                Ok(KeyKind::Set(Box::new(element)))
            }
            "map" | "dict" => {
                self.expect('<')?;
                let key = self.parse_kind()?;
                self.expect(',')?;
                let value = self.parse_kind()?;
                self.expect('>')?;
                Ok(KeyKind::Mapping { key: Box::new(key), value: Box::new(value) })
            }
            other => Err(format!("unknown kind `{}`", other)),
        }
    }
}

/// Parse a key kind expression such as `[int; 3]` or `map<string, int>`.
pub fn parse_key_kind(input: &str) -> Result<KeyKind, ProbeError> {
    let invalid = |detail: String| ProbeError::InvalidKeyKind {
        input: input.to_string(),
        detail,
    };

    let tokens = tokenize(input).map_err(invalid)?;
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let kind = parser.parse_kind().map_err(invalid)?;

    if let Some(extra) = parser.peek() {
        return Err(invalid(format!("trailing input starting at {}", extra)));
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse_key_kind("int").unwrap(), KeyKind::Primitive(Primitive::Int));
        assert_eq!(parse_key_kind(" String ").unwrap(), KeyKind::Primitive(Primitive::Str));
        assert_eq!(parse_key_kind("u64").unwrap(), KeyKind::Primitive(Primitive::Uint));
    }

    #[test]
    fn test_parse_fixed_array_and_sequence() {
        assert_eq!(
            parse_key_kind("[int; 3]").unwrap(),
            KeyKind::FixedArray { element: Box::new(KeyKind::Primitive(Primitive::Int)), len: 3 }
        );
        assert_eq!(
            parse_key_kind("[int]").unwrap(),
            KeyKind::Sequence(Box::new(KeyKind::Primitive(Primitive::Int)))
        );
    }

    #[test]
    fn test_parse_nested() {
        let kind = parse_key_kind("map<(string, bool), vec<&int>>").unwrap();
        assert_eq!(kind.to_string(), "map<(string, bool), [&int]>");
    }

    #[test]
    fn test_parse_tuple_trailing_comma() {
        assert_eq!(
            parse_key_kind("(int,)").unwrap(),
            KeyKind::Tuple(vec![KeyKind::Primitive(Primitive::Int)])
        );
        assert_eq!(parse_key_kind("()").unwrap(), KeyKind::Tuple(vec![]));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("{}int", "&".repeat(100));
        assert!(parse_key_kind(&ok).is_ok());

        let deep = format!("{}int", "&".repeat(100_000));
        match parse_key_kind(&deep).unwrap_err() {
            ProbeError::InvalidKeyKind { detail, .. } => assert_eq!(detail, "key kind nested too deeply"),
            other => panic!("unexpected error {:?}", other),
        }

        let brackets = format!("{}int{}", "[".repeat(500), "]".repeat(500));
        assert_eq!(parse_key_kind(&brackets).unwrap_err().code(), "invalid-key-kind");
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "widget", "[int; x]", "map<int>", "(int", "int int", "int?"] {
            let err = parse_key_kind(bad).unwrap_err();
            assert_eq!(err.code(), "invalid-key-kind", "input {:?}", bad);
        }
    }
}
