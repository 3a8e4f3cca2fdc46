//! Token model: the lexer → parser handoff.
//!
//! Tokens are ephemeral; nothing outside the [`Lexer`](crate::lexer::Lexer) and
//! [`Parser`](crate::parser::Parser) holds them. Every token carries the
//! 1-based line and column of its first character, used verbatim in error
//! messages.

use crate::value::IntegerBase;
use uuid::Uuid;

/// A scanned numeric literal. Keeps the raw spelling so numeric property
/// names (`{3.14 = 'pi'}`) survive exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLit {
    pub raw: String,
    pub value: NumberValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberValue {
    Integer { value: i64, base: IntegerBase },
    Float(f64),
}

/// Token kinds of the TON grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Structural
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Equals,
    Colon,
    Comma,
    Slash,
    Star,
    At,

    /// `#@`, introduces the document header line.
    HeaderMarker,
    /// `#!`, introduces a schema block.
    SchemaMarker,

    // Type hints: single reserved character preceding the hinted literal.
    StringHint, // $
    NumberHint, // %
    GuidHint,   // &
    DateHint,   // ^

    // Literals
    String(String),
    Number(NumberLit),
    Boolean(bool),
    Null,
    Undefined,
    Guid(Uuid),
    Enum(String),
    EnumSet(Vec<String>),

    /// Bare name. May start with a digit (`2ndProperty`).
    Identifier(String),
    /// Identifier beginning with an uppercase letter. Advisory only; the
    /// parser treats it like any identifier where a name is expected.
    ClassName(String),

    EndOfFile,
}

impl TokenKind {
    /// Short description for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Equals => "'='",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Slash => "'/'",
            TokenKind::Star => "'*'",
            TokenKind::At => "'@'",
            TokenKind::HeaderMarker => "'#@'",
            TokenKind::SchemaMarker => "'#!'",
            TokenKind::StringHint => "'$'",
            TokenKind::NumberHint => "'%'",
            TokenKind::GuidHint => "'&'",
            TokenKind::DateHint => "'^'",
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Boolean(_) => "boolean",
            TokenKind::Null => "null",
            TokenKind::Undefined => "undefined",
            TokenKind::Guid(_) => "GUID",
            TokenKind::Enum(_) => "enum",
            TokenKind::EnumSet(_) => "enum set",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::ClassName(_) => "class name",
            TokenKind::EndOfFile => "end of input",
        }
    }
}

/// A positioned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Token { kind, line, column }
    }
}
