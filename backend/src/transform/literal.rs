//! Literal expression parser for list-encoded cells.
//!
//! Listing exports store multi-valued columns as printed literals, e.g.
//! `['North Indian', 'Chinese']`. This module reads that notation back:
//!
//! | Input                    | Result                               |
//! |--------------------------|--------------------------------------|
//! | `['a', "b"]`             | `Sequence(["a", "b"])`               |
//! | `('a',)`                 | `Sequence(["a"])`                    |
//! | `'a'`                    | `Scalar("a")`                        |
//! | `42`                     | `Scalar("42")`                       |
//! | `Biryani`, `['a'`        | parse error → wrapped as `Scalar`    |
//!
//! Supported atoms: single/double quoted strings (with escapes and implicit
//! concatenation), integers, floats, `True`, `False`, `None`.

use std::fmt;

use crate::models::CellValue;

/// Deepest container nesting accepted before a cell is rejected.
pub const MAX_DEPTH: usize = 64;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
}

impl Literal {
    /// Text of this literal as a cell value.
    ///
    /// Strings are shown bare; containers use their printed form.
    pub fn to_text(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => {
                // Prefer single quotes unless the text contains one and no double quote.
                let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
                write!(f, "{}", quote)?;
                for c in s.chars() {
                    match c {
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        c if c == quote => write!(f, "\\{}", c)?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "{}", quote)
            }
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::None => write!(f, "None"),
            Literal::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Literal parsing error with position.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

impl LiteralError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for LiteralError {}

/// Parse a complete literal expression. Surrounding whitespace is allowed.
pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(input);
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if let Some(c) = parser.peek() {
        return Err(LiteralError::new(
            parser.pos,
            format!("unexpected trailing character '{}'", c),
        ));
    }
    Ok(value)
}

/// Parse a list-encoded cell into a [`CellValue`].
///
/// Lists and tuples become `Sequence`; other literals become `Scalar`
/// holding their text.
pub fn parse_cell(text: &str) -> Result<CellValue, LiteralError> {
    Ok(match parse(text)? {
        Literal::List(items) | Literal::Tuple(items) => {
            CellValue::Sequence(items.iter().map(Literal::to_text).collect())
        }
        scalar => CellValue::Scalar(scalar.to_text()),
    })
}

/// A list cell after parse-or-wrap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadCell {
    pub value: CellValue,
    /// The text did not parse and was kept whole.
    pub wrapped: bool,
}

/// Parse a cell, falling back to the trimmed original text on failure.
pub fn parse_or_wrap(cell: Option<&str>) -> ReadCell {
    match cell {
        None => ReadCell {
            value: CellValue::Missing,
            wrapped: false,
        },
        Some(text) => match parse_cell(text) {
            Ok(value) => ReadCell {
                value,
                wrapped: false,
            },
            Err(_) => ReadCell {
                value: CellValue::Scalar(text.trim().to_string()),
                wrapped: true,
            },
        },
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::new(
                self.pos,
                format!("nesting deeper than {}", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        self.pos += 1;
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
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

    fn value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            Some('[') => {
                self.enter()?;
                let (items, _) = self.items(']')?;
                self.depth -= 1;
                Ok(Literal::List(items))
            }
            Some('(') => {
                self.enter()?;
                let (mut items, trailing_comma) = self.items(')')?;
                self.depth -= 1;
                // `(x)` is just a parenthesised value, `(x,)` is a tuple
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::Tuple(items))
                }
            }
            Some('\'') | Some('"') => self.strings(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(LiteralError::new(self.pos, format!("unexpected character '{}'", c))),
            None => Err(LiteralError::new(self.pos, "unexpected end of input")),
        }
    }

    /// Comma separated values up to `close`. Returns whether the last
    /// element was followed by a comma.
    fn items(&mut self, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, trailing_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => trailing_comma = true,
                Some(c) if c == close => return Ok((items, false)),
                Some(c) => {
                    return Err(LiteralError::new(
                        self.pos - 1,
                        format!("expected ',' or '{}', found '{}'", close, c),
                    ))
                }
                None => {
                    return Err(LiteralError::new(self.pos, format!("missing closing '{}'", close)))
                }
            }
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut out = self.string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            match self.peek() {
                Some('\'') | Some('"') => out.push_str(&self.string()?),
                _ => {
                    self.pos = save;
                    return Ok(Literal::Str(out));
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = self
            .bump()
            .ok_or_else(|| LiteralError::new(start, "expected string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(LiteralError::new(start, "unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some('\n') => {}
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(LiteralError::new(start, "unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek() {
            text.push(sign);
            self.pos += 1;
            self.skip_ws();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => text.push(c),
                '_' => {}
                '.' => {
                    is_float = true;
                    text.push(c);
                }
                'e' | 'E' => {
                    is_float = true;
                    text.push(c);
                    if let Some(sign @ ('-' | '+')) = self.chars.get(self.pos + 1).copied() {
                        text.push(sign);
                        self.pos += 1;
                    }
                }
                _ => break,
            }
            self.pos += 1;
        }

        let invalid = || LiteralError::new(start, format!("invalid number '{}'", text));
        if is_float {
            text.parse::<f64>().map(Literal::Float).map_err(|_| invalid())
        } else {
            // Leading zeros are not a valid integer literal (`007`)
            let digits = text.trim_start_matches(['-', '+']);
            if digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
                return Err(invalid());
            }
            text.parse::<i64>().map(Literal::Int).map_err(|_| invalid())
        }
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        match word.as_str() {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => Err(LiteralError::new(start, format!("unknown name '{}'", word))),
        }
    }
}
