//! Recursive-descent parser for the restricted literal grammar.
//!
//! Nothing is ever evaluated: identifiers other than the literal keywords,
//! calls, member access and binary operators are syntax errors.

use crate::error::{LiteralError, LiteralErrorKind};

use super::value::Literal;

/// Maximum nesting of arrays, objects, parentheses and unary signs.
pub const MAX_DEPTH: usize = 64;

type Result<T> = std::result::Result<T, LiteralError>;

pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl<'a> Parser<'a> {
    pub(crate) const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse exactly one literal, allowing trailing trivia and one `;`.
    pub(crate) fn parse_document(mut self) -> Result<Literal> {
        let value = self.parse_value()?;
        self.skip_trivia()?;
        if self.peek() == Some(';') {
            self.bump();
            self.skip_trivia()?;
        }
        if self.pos < self.src.len() {
            return Err(self.error(LiteralErrorKind::TrailingInput));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, kind: LiteralErrorKind) -> LiteralError {
        LiteralError::new(kind, self.pos)
    }

    fn unexpected(&self, expected: &'static str) -> LiteralError {
        match self.peek() {
            Some(c) => self.error(LiteralErrorKind::UnexpectedChar(c)),
            None => self.error(LiteralErrorKind::UnexpectedEnd { expected }),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(LiteralErrorKind::TooDeep { limit: MAX_DEPTH }));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while self.peek().is_some_and(|c| !is_line_terminator(c)) {
                        self.bump();
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let rest = &self.src[self.pos + 2..];
                    match rest.find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => {
                            self.pos = self.src.len();
                            return Err(self.error(LiteralErrorKind::UnexpectedEnd {
                                expected: "'*/'",
                            }));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Literal> {
        self.skip_trivia()?;
        match self.peek() {
            None => Err(self.error(LiteralErrorKind::UnexpectedEnd {
                expected: "a value",
            })),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some(q @ ('\'' | '"' | '`')) => self.parse_string(q).map(Literal::String),
            Some('(') => {
                self.enter()?;
                self.bump();
                let value = self.parse_value()?;
                self.skip_trivia()?;
                if self.peek() != Some(')') {
                    return Err(self.unexpected("')'"));
                }
                self.bump();
                self.leave();
                Ok(value)
            }
            Some(sign @ ('+' | '-')) => {
                let start = self.pos;
                self.enter()?;
                self.bump();
                // `--5` and `++5` are update operators, not two signs.
                if self.peek() == Some(sign) {
                    return Err(self.error(LiteralErrorKind::UnexpectedChar(sign)));
                }
                let operand = self.parse_value()?;
                self.leave();
                match operand {
                    Literal::Number(n) if sign == '-' => Ok(Literal::Number(-n)),
                    Literal::Number(n) => Ok(Literal::Number(n)),
                    _ => Err(LiteralError::new(
                        LiteralErrorKind::UnexpectedChar(sign),
                        start,
                    )),
                }
            }
            Some(c) if c.is_ascii_digit() => self.parse_number().map(Literal::Number),
            Some('.') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number().map(Literal::Number)
            }
            Some(c) if is_ident_start(c) => self.parse_keyword(),
            Some(c) => Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
        }
    }

    fn parse_array(&mut self) -> Result<Literal> {
        self.enter()?;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                // Elision: `[a,,b]` has a hole at index 1.
                Some(',') => {
                    self.bump();
                    items.push(Literal::Undefined);
                    continue;
                }
                None => return Err(self.unexpected("']'")),
                Some(_) => {}
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
        self.leave();
        Ok(Literal::Array(items))
    }

    fn parse_object(&mut self) -> Result<Literal> {
        self.enter()?;
        self.bump();
        let mut entries = Vec::new();
        loop {
            self.skip_trivia()?;
            let key = match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(q @ ('\'' | '"')) => self.parse_string(q)?,
                Some(c) if c.is_ascii_digit() || c == '.' => {
                    Literal::Number(self.parse_number()?).to_string()
                }
                Some(c) if is_ident_start(c) => self.read_identifier().to_string(),
                _ => return Err(self.unexpected("a property key or '}'")),
            };
            self.skip_trivia()?;
            if self.peek() != Some(':') {
                return Err(self.unexpected("':'"));
            }
            self.bump();
            let value = self.parse_value()?;
            entries.push((key, value));
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
        self.leave();
        Ok(Literal::object_from_entries(entries))
    }

    fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn parse_keyword(&mut self) -> Result<Literal> {
        let start = self.pos;
        let word = self.read_identifier();
        Ok(match word {
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            "null" => Literal::Null,
            "undefined" => Literal::Undefined,
            "Infinity" => Literal::Number(f64::INFINITY),
            "NaN" => Literal::Number(f64::NAN),
            other => {
                return Err(LiteralError::new(
                    LiteralErrorKind::UnknownIdentifier(other.to_string()),
                    start,
                ))
            }
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut buf = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(LiteralError::new(
                    LiteralErrorKind::UnterminatedString,
                    start,
                ));
            };
            match c {
                c if c == quote => return Ok(buf),
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(LiteralError::new(
                        LiteralErrorKind::TemplateInterpolation,
                        self.pos - 1,
                    ));
                }
                '\\' => self.parse_escape(&mut buf, start)?,
                '\r' if quote == '`' => {
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    buf.push('\n');
                }
                '\n' | '\r' if quote != '`' => {
                    return Err(LiteralError::new(
                        LiteralErrorKind::UnterminatedString,
                        start,
                    ));
                }
                c => buf.push(c),
            }
        }
    }

    fn parse_escape(&mut self, buf: &mut String, string_start: usize) -> Result<()> {
        let escape_start = self.pos - 1;
        let invalid = || LiteralError::new(LiteralErrorKind::InvalidEscape, escape_start);
        let Some(c) = self.bump() else {
            return Err(LiteralError::new(
                LiteralErrorKind::UnterminatedString,
                string_start,
            ));
        };
        match c {
            'n' => buf.push('\n'),
            'r' => buf.push('\r'),
            't' => buf.push('\t'),
            'b' => buf.push('\u{8}'),
            'f' => buf.push('\u{c}'),
            'v' => buf.push('\u{b}'),
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => buf.push('\0'),
            '0'..='9' => return Err(invalid()),
            'x' => {
                let code = self.read_hex(2).ok_or_else(invalid)?;
                buf.push(char::from_u32(code).ok_or_else(invalid)?);
            }
            'u' => {
                let code = self.read_unicode_escape().ok_or_else(invalid)?;
                if (0xD800..0xDC00).contains(&code) {
                    // High surrogate: pair it with a following `\uDC00`-`\uDFFF`.
                    let checkpoint = self.pos;
                    let low = if self.src[self.pos..].starts_with("\\u") {
                        self.pos += 2;
                        self.read_unicode_escape()
                            .filter(|low| (0xDC00..0xE000).contains(low))
                    } else {
                        None
                    };
                    match low {
                        Some(low) => {
                            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            buf.push(char::from_u32(combined).ok_or_else(invalid)?);
                        }
                        None => {
                            self.pos = checkpoint;
                            buf.push(char::REPLACEMENT_CHARACTER);
                        }
                    }
                } else {
                    buf.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            // Line continuation.
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => buf.push(other),
        }
        Ok(())
    }

    fn read_hex(&mut self, count: usize) -> Option<u32> {
        let digits = self.src.get(self.pos..self.pos + count)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.pos += count;
        Some(code)
    }

    fn read_unicode_escape(&mut self) -> Option<u32> {
        if self.peek() == Some('{') {
            let rest = &self.src[self.pos + 1..];
            let end = rest.find('}')?;
            let digits = &rest[..end];
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let code = u32::from_str_radix(digits, 16).ok().filter(|&c| c <= 0x10_FFFF)?;
            self.pos += 1 + end + 1;
            Some(code)
        } else {
            self.read_hex(4)
        }
    }

    /// Digits of `radix` with `_` separators allowed only between digits.
    fn read_digits(&mut self, radix: u32) -> String {
        let mut digits = String::new();
        loop {
            match self.peek() {
                Some(c) if c.is_digit(radix) => {
                    digits.push(c);
                    self.bump();
                }
                Some('_')
                    if !digits.is_empty()
                        && self.peek_second().is_some_and(|c| c.is_digit(radix)) =>
                {
                    self.bump();
                }
                _ => return digits,
            }
        }
    }

    fn parse_number(&mut self) -> Result<f64> {
        let start = self.pos;
        let radix = match (self.peek(), self.peek_second()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let value = if let Some(radix) = radix {
            self.pos += 2;
            let digits = self.read_digits(radix);
            if digits.is_empty() {
                return Err(self.invalid_number(start));
            }
            digits.chars().fold(0.0_f64, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            })
        } else {
            let mut text = self.read_digits(10);
            if self.peek() == Some('.') {
                self.bump();
                text.push('.');
                text.push_str(&self.read_digits(10));
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                text.push('e');
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    self.bump();
                    text.push(sign);
                }
                let exponent = self.read_digits(10);
                if exponent.is_empty() {
                    return Err(self.invalid_number(start));
                }
                text.push_str(&exponent);
            }
            text.parse::<f64>()
                .map_err(|_| self.invalid_number(start))?
        };

        // `10n`, `3px` and friends.
        if self.peek().is_some_and(is_ident_continue) {
            while self.peek().is_some_and(is_ident_continue) {
                self.bump();
            }
            return Err(self.invalid_number(start));
        }
        Ok(value)
    }

    fn invalid_number(&self, start: usize) -> LiteralError {
        let end = self.pos.max(start);
        LiteralError::new(
            LiteralErrorKind::InvalidNumber(self.src[start..end].to_string()),
            start,
        )
    }
}
