//! Literal values returned by the engine and the parser that reads them.
//!
//! The engine answers with literal expressions: numbers, quoted strings and
//! parenthesised or bracketed sequences of those. Anything outside that
//! grammar is rejected here and handled by the caller as raw text.

/// A parsed literal
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Tuple or list; the two are not distinguished
    Seq(Vec<Value>),
}

impl Value {
    /// Numeric view of the value, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }
}

/// Why a literal could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub position: usize,
    pub reason: &'static str,
}

/// Parse a complete literal. Leading and trailing whitespace is allowed;
/// anything else after the literal is an error. A bare comma-separated
/// list such as `1.5, 2.5` is a tuple.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        pos: 0,
    };
    let mut value = parser.value()?;
    parser.skip_ws();
    if parser.peek() == Some(',') {
        let mut items = vec![value];
        while parser.peek() == Some(',') {
            parser.bump();
            parser.skip_ws();
            if parser.peek().is_none() {
                break;
            }
            items.push(parser.value()?);
            parser.skip_ws();
        }
        value = Value::Seq(items);
    }
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, reason: &'static str) -> LiteralError {
        let position = self
            .chars
            .get(self.pos)
            .map_or_else(|| self.chars.last().map_or(0, |(i, c)| i + c.len_utf8()), |(i, _)| *i);
        LiteralError { position, reason }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("expected a value")),
            Some('(') => self.parenthesised(),
            Some('[') => self.list(),
            Some('"') | Some('\'') => self.string().map(Value::Str),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    /// `(x)` is the bare value; `()`, `(x,)` and `(x, y)` are tuples
    fn parenthesised(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let (items, trailing_comma) = self.items(')')?;
        if items.len() == 1 && !trailing_comma {
            return Ok(items.into_iter().next().unwrap_or(Value::None));
        }
        Ok(Value::Seq(items))
    }

    fn list(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let (items, _) = self.items(']')?;
        Ok(Value::Seq(items))
    }

    /// Comma-separated values up to `close`; reports whether the last item
    /// was followed by a comma
    fn items(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }
            if !items.is_empty() && !trailing_comma {
                return Err(self.error("expected `,` between items"));
            }
            items.push(self.value()?);
            self.skip_ws();
            trailing_comma = if self.peek() == Some(',') {
                self.bump();
                true
            } else {
                false
            };
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().unwrap_or('"');
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek() {
            self.bump();
            text.push(sign);
            self.skip_ws();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    text.push(c);
                    self.bump();
                    if let Some(sign @ ('-' | '+')) = self.peek() {
                        text.push(sign);
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            text.push(c);
            self.bump();
        }

        let parsed = if is_float {
            text.parse::<f64>().ok().map(Value::Float)
        } else {
            text.parse::<i64>()
                .ok()
                .map(Value::Int)
                .or_else(|| text.parse::<f64>().ok().map(Value::Float))
        };
        parsed.ok_or_else(|| {
            self.pos = start;
            self.error("malformed number")
        })
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            word.push(c);
            self.bump();
        }
        match word.as_str() {
            "None" => Ok(Value::None),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            _ => {
                self.pos = start;
                Err(self.error("unknown name"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(parse_literal("42"), Ok(Value::Int(42)));
        assert_eq!(parse_literal(" -2.5e-3 "), Ok(Value::Float(-2.5e-3)));
        assert_eq!(parse_literal("1E6"), Ok(Value::Float(1e6)));
        assert_eq!(parse_literal(".5"), Ok(Value::Float(0.5)));
        assert_eq!(parse_literal("'coil'"), Ok(Value::Str("coil".into())));
        assert_eq!(parse_literal("None"), Ok(Value::None));
        assert_eq!(parse_literal("True"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            parse_literal("[1.5, 2, 'a']"),
            Ok(Value::Seq(vec![
                Value::Float(1.5),
                Value::Int(2),
                Value::Str("a".into())
            ]))
        );
        assert_eq!(
            parse_literal("((1, 2), [])"),
            Ok(Value::Seq(vec![
                Value::Seq(vec![Value::Int(1), Value::Int(2)]),
                Value::Seq(vec![]),
            ]))
        );
        assert_eq!(parse_literal("()"), Ok(Value::Seq(vec![])));
    }

    #[test]
    fn test_parenthesised_single_value_is_bare() {
        assert_eq!(parse_literal("(42.0)"), Ok(Value::Float(42.0)));
        assert_eq!(
            parse_literal("(42.0,)"),
            Ok(Value::Seq(vec![Value::Float(42.0)]))
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse_literal(r#""a\"b\\c""#),
            Ok(Value::Str("a\"b\\c".into()))
        );
    }

    #[test]
    fn test_bare_comma_list_is_a_tuple() {
        assert_eq!(
            parse_literal("1.5, 2.5"),
            Ok(Value::Seq(vec![Value::Float(1.5), Value::Float(2.5)]))
        );
        assert_eq!(
            parse_literal("'a', (1, 2),"),
            Ok(Value::Seq(vec![
                Value::Str("a".into()),
                Value::Seq(vec![Value::Int(1), Value::Int(2)]),
            ]))
        );
        assert!(parse_literal("1, 2 3").is_err());
        assert!(parse_literal("1,, 2").is_err());
    }

    #[test]
    fn test_rejects_non_literals() {
        assert!(parse_literal("").is_err());
        assert!(parse_literal("abc").is_err());
        assert!(parse_literal("1 2").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("1+2").is_err());
        assert!(parse_literal("'open").is_err());
        assert!(parse_literal("-").is_err());
        assert!(parse_literal("1e").is_err());
    }
}
