//! Reader for the literal form, e.g.
//!
//! ```text
//! Docstring(**{
//!     'summary': 'Summary.',
//!     'parameters': [{'name': 'a', 'types': ['str']}],
//! })
//! ```
//!
//! Accepts the subset of Python literals the literal renderer produces and a
//! bit more: both quote styles, implicit string concatenation (also inside
//! parentheses), lists, tuples, dicts, `None`/`True`/`False`, numbers,
//! trailing commas, comments, and either `Name(**{...})`, `Name(key=value, ...)`
//! or a bare dict at the top level.

use crate::error::{Error, Result};
use crate::model::SectionMap;
use serde_json::{Map, Number, Value};

/// Deepest nesting of brackets accepted before giving up.
const MAX_DEPTH: usize = 64;

/// Parse the literal form into section data.
pub fn parse_literal(text: &str) -> Result<SectionMap> {
    let mut reader = Reader {
        src: text,
        pos: 0,
        depth: 0,
    };
    let value = reader.top()?;
    reader.skip_blank();
    if reader.pos < text.len() {
        return Err(reader.error("unexpected trailing input"));
    }
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Err(Error::Literal {
            offset: 0,
            message: "expected a mapping of sections".to_string(),
        }),
    }
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Reader<'_> {
    fn top(&mut self) -> Result<Value> {
        self.skip_blank();
        if !self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return self.value();
        }
        let name = self.identifier();
        self.skip_blank();
        if !self.eat('(') {
            return Err(self.error(&format!("expected `(` after `{}`", name)));
        }
        self.skip_blank();
        if !self.src[self.pos..].starts_with("**") {
            return self.keyword_arguments();
        }
        self.pos += 2;
        let value = self.value()?;
        self.skip_blank();
        self.eat(',');
        self.expect(')')?;
        Ok(value)
    }

    /// `key=value, ...` up to and including the closing parenthesis.
    fn keyword_arguments(&mut self) -> Result<Value> {
        let mut map = Map::new();
        loop {
            self.skip_blank();
            if self.eat(')') {
                return Ok(Value::Object(map));
            }
            let key = self.identifier();
            if key.is_empty() {
                return Err(self.error("expected a keyword argument"));
            }
            self.expect('=')?;
            let value = self.value()?;
            map.insert(key, value);
            if !self.separator(')')? {
                return Ok(Value::Object(map));
            }
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_blank();
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = self.item();
        self.depth -= 1;
        value
    }

    fn item(&mut self) -> Result<Value> {
        match self.peek() {
            Some('\'' | '"') => self.strings(),
            Some('[') => {
                self.pos += 1;
                Ok(Value::Array(self.sequence(']')?))
            }
            Some('(') => self.parenthesized(),
            Some('{') => self.dict(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => match self.identifier().as_str() {
                "None" => Ok(Value::Null),
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                other => Err(self.error(&format!("unexpected name `{}`", other))),
            },
            Some(c) => Err(self.error(&format!("unexpected `{}`", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// `(x)` is `x`; `()`, `(x,)` and `(x, y)` are tuples.
    fn parenthesized(&mut self) -> Result<Value> {
        self.pos += 1;
        self.skip_blank();
        if self.eat(')') {
            return Ok(Value::Array(Vec::new()));
        }
        let first = self.value()?;
        self.skip_blank();
        if self.eat(')') {
            return Ok(first);
        }
        let mut items = vec![first];
        if self.separator(')')? {
            items.extend(self.sequence(')')?);
        }
        Ok(Value::Array(items))
    }

    /// Items up to and including `close`; the opening bracket is consumed.
    fn sequence(&mut self, close: char) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_blank();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.value()?);
            if !self.separator(close)? {
                return Ok(items);
            }
        }
    }

    fn dict(&mut self) -> Result<Value> {
        self.pos += 1;
        let mut map = Map::new();
        loop {
            self.skip_blank();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(key) => key,
                _ => return Err(self.error("mapping keys must be strings")),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            if !self.separator('}')? {
                return Ok(Value::Object(map));
            }
        }
    }

    /// After an item: `,` continues (true), `close` ends (false, consumed).
    fn separator(&mut self, close: char) -> Result<bool> {
        self.skip_blank();
        if self.eat(',') {
            return Ok(true);
        }
        if self.eat(close) {
            return Ok(false);
        }
        Err(self.error(&format!("expected `,` or `{}`", close)))
    }

    /// One string literal, or several adjacent ones concatenated.
    fn strings(&mut self) -> Result<Value> {
        let mut out = String::new();
        while matches!(self.peek(), Some('\'' | '"')) {
            self.string(&mut out)?;
            let save = self.pos;
            self.skip_blank();
            if !matches!(self.peek(), Some('\'' | '"')) {
                self.pos = save;
            }
        }
        Ok(Value::String(out))
    }

    fn string(&mut self, out: &mut String) -> Result<()> {
        let start = self.pos;
        let quote = self.next().ok_or_else(|| self.error("expected a string"))?;
        loop {
            match self.next() {
                None | Some('\n') => {
                    return Err(Error::Literal {
                        offset: start,
                        message: "unterminated string".to_string(),
                    })
                }
                Some(c) if c == quote => return Ok(()),
                Some('\\') => match self.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some('\n') => {}
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => {
                        return Err(Error::Literal {
                            offset: start,
                            message: "unterminated string".to_string(),
                        })
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
        {
            self.pos += 1;
        }
        let literal = self.src[start..self.pos].replace('_', "");
        let number = match literal.parse::<i64>() {
            Ok(n) => Some(Number::from(n)),
            Err(_) => literal.parse::<f64>().ok().and_then(Number::from_f64),
        };
        number.map(Value::Number).ok_or(Error::Literal {
            offset: start,
            message: format!("invalid number `{}`", literal),
        })
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            self.pos += self.peek().map_or(0, char::len_utf8);
        }
        self.src[start..self.pos].to_string()
    }

    /// Whitespace and `#` comments.
    fn skip_blank(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                Some('#') => {
                    let rest = &self.src[self.pos..];
                    self.pos += rest.find('\n').unwrap_or(rest.len());
                }
                _ => return,
            }
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_blank();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{}`", c)))
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: &str) -> Error {
        Error::Literal {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}
