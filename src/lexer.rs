//! TON lexer.
//!
//! Converts raw text into a [`Token`] stream. Single forward pass with an
//! explicit cursor snapshot/restore for the GUID lookahead, which is
//! expected to fail often (most hex-looking tokens are plain numbers).
//!
//! ## Overview
//!
//! - Whitespace, `// line` and `/* block */` comments are skipped;
//!   `/*` followed by another `/` is a wildcard schema-path segment,
//!   not a comment opener
//! - Strings: single or double quoted; triple-quoted strings are
//!   multi-line and dedented after scanning
//! - Numbers: decimal (with fraction/exponent), `0x` hex, `0b` binary;
//!   a digit run immediately followed by letters re-scans as an
//!   identifier (`2ndProperty`)
//! - GUIDs: 8-4-4-4-12 hex groups, optionally `{}`-wrapped
//! - `|a|` enum, `|a|b|` enum set, `||` empty enum set
//! - `#@` header marker, `#!` schema marker, `$ % & ^` type hints
//!
//! Every token carries the 1-based line/column of its first character.

use crate::error::{Result, TonError};
use crate::token::{NumberLit, NumberValue, Token, TokenKind};
use crate::value::IntegerBase;
use uuid::Uuid;

/// Tokenizes `text`, failing on unrecognized input or an unterminated
/// literal.
///
/// # Examples
///
/// ```rust
/// use ton_format::lexer::tokenize;
///
/// let tokens = tokenize("{enabled = true}").unwrap();
/// assert_eq!(tokens.len(), 6); // { identifier = boolean } EOF
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    Lexer::new(text).tokenize()
}

/// Saved cursor state for backtracking lookahead.
#[derive(Clone, Copy)]
struct Cursor {
    position: usize,
    line: usize,
    column: usize,
}

/// The TON lexer.
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(text: &str) -> Self {
        Lexer {
            chars: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Consumes the input and produces the token stream, terminated by an
    /// `EndOfFile` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.at_end() {
                break;
            }
            tokens.push(self.next_token()?);
        }
        tokens.push(Token::new(TokenKind::EndOfFile, self.line, self.column));
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        let line = self.line;
        let column = self.column;
        let Some(ch) = self.peek(0) else {
            return Ok(Token::new(TokenKind::EndOfFile, line, column));
        };

        let simple = |kind: TokenKind| Token::new(kind, line, column);

        match ch {
            '{' => {
                // A brace may open an object or wrap a GUID.
                if let Some(guid) = self.try_scan_guid() {
                    return Ok(simple(TokenKind::Guid(guid)));
                }
                self.advance();
                Ok(simple(TokenKind::LeftBrace))
            }
            '}' => {
                self.advance();
                Ok(simple(TokenKind::RightBrace))
            }
            '[' => {
                self.advance();
                Ok(simple(TokenKind::LeftBracket))
            }
            ']' => {
                self.advance();
                Ok(simple(TokenKind::RightBracket))
            }
            '(' => {
                self.advance();
                Ok(simple(TokenKind::LeftParen))
            }
            ')' => {
                self.advance();
                Ok(simple(TokenKind::RightParen))
            }
            '=' => {
                self.advance();
                Ok(simple(TokenKind::Equals))
            }
            ':' => {
                self.advance();
                Ok(simple(TokenKind::Colon))
            }
            ',' => {
                self.advance();
                Ok(simple(TokenKind::Comma))
            }
            '/' => {
                self.advance();
                Ok(simple(TokenKind::Slash))
            }
            '*' => {
                self.advance();
                Ok(simple(TokenKind::Star))
            }
            '@' => {
                self.advance();
                Ok(simple(TokenKind::At))
            }
            '$' => {
                self.advance();
                Ok(simple(TokenKind::StringHint))
            }
            '%' => {
                self.advance();
                Ok(simple(TokenKind::NumberHint))
            }
            '&' => {
                self.advance();
                Ok(simple(TokenKind::GuidHint))
            }
            '^' => {
                self.advance();
                Ok(simple(TokenKind::DateHint))
            }
            '#' => match self.peek(1) {
                Some('@') => {
                    self.advance();
                    self.advance();
                    Ok(simple(TokenKind::HeaderMarker))
                }
                Some('!') => {
                    self.advance();
                    self.advance();
                    Ok(simple(TokenKind::SchemaMarker))
                }
                _ => Ok(simple(self.scan_identifier_or_keyword())),
            },
            '|' => self.scan_enum(line, column),
            '"' | '\'' => self.scan_string(ch, line, column),
            _ => {
                if ch.is_ascii_hexdigit() {
                    if let Some(guid) = self.try_scan_guid() {
                        return Ok(simple(TokenKind::Guid(guid)));
                    }
                }
                if ch.is_ascii_digit()
                    || (ch == '-' && self.peek(1).is_some_and(|c| c.is_ascii_digit()))
                {
                    return self.scan_number(line, column);
                }
                if ch.is_ascii_alphabetic() || ch == '_' {
                    return Ok(simple(self.scan_identifier_or_keyword()));
                }
                Err(TonError::lex(
                    line,
                    column,
                    format!("Unexpected character '{}'", ch),
                ))
            }
        }
    }

    // ---- strings ----

    fn scan_string(&mut self, quote: char, line: usize, column: usize) -> Result<Token> {
        if self.peek(1) == Some(quote) && self.peek(2) == Some(quote) {
            return self.scan_triple_string(quote, line, column);
        }

        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek(0) {
                None => {
                    return Err(TonError::lex(line, column, "Unterminated string"));
                }
                Some('\n') => {
                    return Err(TonError::lex(line, column, "Unterminated string"));
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(Token::new(TokenKind::String(value), line, column));
                }
                Some('\\') => {
                    self.advance();
                    value.push(self.scan_escape()?);
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn scan_escape(&mut self) -> Result<char> {
        let line = self.line;
        let column = self.column;
        let ch = self.advance().ok_or_else(|| {
            TonError::lex(line, column, "Unterminated string")
        })?;
        match ch {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '\\' => Ok('\\'),
            '"' => Ok('"'),
            '\'' => Ok('\''),
            '`' => Ok('`'),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .advance()
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| {
                            TonError::lex(
                                line,
                                column,
                                "Invalid unicode escape (expected 4 hex digits)",
                            )
                        })?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).ok_or_else(|| {
                    TonError::lex(line, column, "Invalid unicode code point in escape")
                })
            }
            other => Err(TonError::lex(
                line,
                column,
                format!("Invalid escape sequence '\\{}'", other),
            )),
        }
    }

    fn scan_triple_string(&mut self, quote: char, line: usize, column: usize) -> Result<Token> {
        for _ in 0..3 {
            self.advance();
        }

        let mut content = String::new();
        loop {
            if self.peek(0) == Some(quote)
                && self.peek(1) == Some(quote)
                && self.peek(2) == Some(quote)
            {
                for _ in 0..3 {
                    self.advance();
                }
                let processed = dedent_multiline(&content);
                return Ok(Token::new(TokenKind::String(processed), line, column));
            }
            match self.advance() {
                Some(c) => content.push(c),
                None => {
                    return Err(TonError::lex(line, column, "Unterminated string"));
                }
            }
        }
    }

    // ---- numbers and identifiers ----

    fn scan_number(&mut self, line: usize, column: usize) -> Result<Token> {
        let start = self.snapshot();
        let mut raw = String::new();

        if self.peek(0) == Some('-') {
            raw.push('-');
            self.advance();
        }
        let negative = raw.starts_with('-');

        if self.peek(0) == Some('0') {
            match self.peek(1) {
                Some('x') | Some('X') => {
                    return self.scan_radix_number(raw, 16, line, column);
                }
                Some('b') | Some('B') => {
                    return self.scan_radix_number(raw, 2, line, column);
                }
                _ => {}
            }
        }

        self.take_digits(&mut raw);

        let mut is_float = false;
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            raw.push('.');
            self.advance();
            self.take_digits(&mut raw);
        }

        if let Some(e @ ('e' | 'E')) = self.peek(0) {
            let exponent_digit = match self.peek(1) {
                Some('+') | Some('-') => self.peek(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent_digit {
                is_float = true;
                raw.push(e);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek(0) {
                    raw.push(sign);
                    self.advance();
                }
                self.take_digits(&mut raw);
            }
        }

        // A digit run flowing straight into letters is not a number: it
        // is a bare identifier like `2ndProperty` or `2023rev`.
        if self.peek(0).is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
            if !is_float && !negative {
                self.restore(start);
                return Ok(Token::new(self.scan_loose_identifier(), line, column));
            }
            return Err(TonError::lex(line, column, "Invalid number literal"));
        }

        let kind = if is_float {
            let value: f64 = raw
                .parse()
                .map_err(|_| TonError::lex(line, column, "Invalid number literal"))?;
            TokenKind::Number(NumberLit {
                raw,
                value: NumberValue::Float(value),
            })
        } else {
            match raw.parse::<i64>() {
                Ok(value) => TokenKind::Number(NumberLit {
                    raw,
                    value: NumberValue::Integer {
                        value,
                        base: IntegerBase::Decimal,
                    },
                }),
                // Out of i64 range: keep the value as a float.
                Err(_) => {
                    let value: f64 = raw
                        .parse()
                        .map_err(|_| TonError::lex(line, column, "Invalid number literal"))?;
                    TokenKind::Number(NumberLit {
                        raw,
                        value: NumberValue::Float(value),
                    })
                }
            }
        };
        Ok(Token::new(kind, line, column))
    }

    fn scan_radix_number(
        &mut self,
        mut raw: String,
        radix: u32,
        line: usize,
        column: usize,
    ) -> Result<Token> {
        for _ in 0..2 {
            if let Some(c) = self.advance() {
                raw.push(c); // 0x / 0b prefix
            }
        }
        let digits_start = raw.len();

        while let Some(c) = self.peek(0) {
            if !c.is_digit(radix) {
                break;
            }
            raw.push(c);
            self.advance();
        }

        if raw.len() == digits_start {
            return Err(TonError::lex(line, column, "Invalid number literal"));
        }
        if self
            .peek(0)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(TonError::lex(line, column, "Invalid number literal"));
        }

        let negative = raw.starts_with('-');
        let magnitude = i64::from_str_radix(&raw[digits_start..], radix)
            .map_err(|_| TonError::lex(line, column, "Number literal out of range"))?;
        let value = if negative { -magnitude } else { magnitude };
        let base = if radix == 16 {
            IntegerBase::Hex
        } else {
            IntegerBase::Binary
        };

        Ok(Token::new(
            TokenKind::Number(NumberLit {
                raw,
                value: NumberValue::Integer { value, base },
            }),
            line,
            column,
        ))
    }

    fn scan_identifier_or_keyword(&mut self) -> TokenKind {
        let mut value = String::new();
        if self.peek(0) == Some('#') {
            value.push('#');
            self.advance();
        }
        self.take_word(&mut value);

        match value.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            _ => {
                if value.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                    TokenKind::ClassName(value)
                } else {
                    TokenKind::Identifier(value)
                }
            }
        }
    }

    /// Identifier that may begin with a digit (`2ndProperty`, `123abc`).
    fn scan_loose_identifier(&mut self) -> TokenKind {
        let mut value = String::new();
        self.take_word(&mut value);
        TokenKind::Identifier(value)
    }

    fn take_word(&mut self, out: &mut String) {
        while let Some(c) = self.peek(0) {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            out.push(c);
            self.advance();
        }
    }

    fn take_digits(&mut self, out: &mut String) {
        while let Some(c) = self.peek(0) {
            if !c.is_ascii_digit() {
                break;
            }
            out.push(c);
            self.advance();
        }
    }

    // ---- enums ----

    fn scan_enum(&mut self, line: usize, column: usize) -> Result<Token> {
        self.advance(); // opening |
        let mut values: Vec<String> = Vec::new();
        let mut current = String::new();

        loop {
            match self.peek(0) {
                None => {
                    return Err(TonError::lex(line, column, "Unterminated enum value"));
                }
                Some('|') => {
                    self.advance();
                    if !current.is_empty() {
                        values.push(std::mem::take(&mut current));
                    }
                    // Another name straight after the bar means the set
                    // continues; anything else closes it.
                    if !self
                        .peek(0)
                        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        break;
                    }
                }
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    current.push(c);
                    self.advance();
                }
                Some(c) => {
                    return Err(TonError::lex(
                        self.line,
                        self.column,
                        format!("Unexpected character '{}' in enum value", c),
                    ));
                }
            }
        }

        let kind = if values.len() == 1 {
            TokenKind::Enum(values.remove(0))
        } else {
            TokenKind::EnumSet(values)
        };
        Ok(Token::new(kind, line, column))
    }

    // ---- GUID lookahead ----

    /// Attempts to scan an 8-4-4-4-12 GUID, optionally `{}`-wrapped.
    /// Restores the cursor and returns `None` on any mismatch.
    fn try_scan_guid(&mut self) -> Option<Uuid> {
        const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
        let start = self.snapshot();

        let braced = self.peek(0) == Some('{');
        if braced {
            self.advance();
        }

        let mut text = String::with_capacity(36);
        for (i, group_len) in GROUPS.iter().enumerate() {
            if i > 0 {
                if self.peek(0) != Some('-') {
                    self.restore(start);
                    return None;
                }
                text.push('-');
                self.advance();
            }
            for _ in 0..*group_len {
                match self.peek(0) {
                    Some(c) if c.is_ascii_hexdigit() => {
                        text.push(c);
                        self.advance();
                    }
                    _ => {
                        self.restore(start);
                        return None;
                    }
                }
            }
        }

        if braced {
            if self.peek(0) != Some('}') {
                self.restore(start);
                return None;
            }
            self.advance();
        } else if self
            .peek(0)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            // Trailing word characters mean this was a longer token.
            self.restore(start);
            return None;
        }

        match Uuid::parse_str(&text) {
            Ok(guid) => Some(guid),
            Err(_) => {
                self.restore(start);
                None
            }
        }
    }

    // ---- trivia ----

    fn skip_trivia(&mut self) {
        loop {
            match self.peek(0) {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek(1) == Some('/') => {
                    while self.peek(0).is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                // `/*/` is a wildcard schema-path segment, not a
                // comment opener.
                Some('/') if self.peek(1) == Some('*') && self.peek(2) != Some('/') => {
                    self.advance();
                    self.advance();
                    while !self.at_end() {
                        if self.peek(0) == Some('*') && self.peek(1) == Some('/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // ---- cursor ----

    fn snapshot(&self) -> Cursor {
        Cursor {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, cursor: Cursor) {
        self.position = cursor.position;
        self.line = cursor.line;
        self.column = cursor.column;
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.position).copied()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }
}

/// Dedents the body of a triple-quoted string: drops one leading blank
/// line (content starting after the opening quotes) and one trailing
/// blank line (the closing-quote line), then strips the minimum leading
/// whitespace of the non-blank lines from every non-blank line. Line
/// endings are normalized to `\n` first.
fn dedent_multiline(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = normalized.split('\n').collect();

    if lines.len() > 1 && lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.len() > 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.iter().all(|l| l.trim().is_empty()) {
        return String::new();
    }

    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                *l
            } else {
                let cut = l.char_indices().nth(min_indent).map_or(l.len(), |(i, _)| i);
                &l[cut..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
