//! # ton-format
//!
//! Parser, serializer, and schema validator for TON (Text Object
//! Notation), a human-readable superset of JSON with class-tagged
//! objects, enums, GUIDs, hex/binary numbers, multi-line strings, and a
//! slash-path validation language.
//!
//! ```text
//! #@ tonVersion = '1'
//! {(Person)
//!     name = 'Ada',
//!     age = 36,
//!     id = 550e8400-e29b-41d4-a716-446655440000,
//!     status = |active|
//! }
//! #! enum(status) [active, inactive]
//! #! {(Person) /name = string(required), /age = int(min(0), max(150))}
//! ```
//!
//! ## Parsing and access
//!
//! ```rust
//! use ton_format::parse;
//!
//! let doc = parse("{(Person) name = 'Ada', scores = [1, 2, 3]}").unwrap();
//! assert_eq!(doc.get_string("/name"), Some("Ada"));
//! assert_eq!(doc.get_integer("/scores/0"), Some(1));
//! ```
//!
//! ## Serialization
//!
//! ```rust
//! use ton_format::{parse, serialize_with_options, SerializeOptions};
//!
//! let doc = parse("{flags = 0b1010, note = null}").unwrap();
//! let text = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
//! assert_eq!(text, "{flags = 0b1010}");
//! ```
//!
//! ## Validation
//!
//! ```rust
//! use ton_format::{parse, validate};
//!
//! let doc = parse("{(person) age = 200}\n#! {(person) /age = int(max(150))}").unwrap();
//! let result = validate(&doc);
//! assert_eq!(result.errors().len(), 1);
//! ```
//!
//! ## Building values in code
//!
//! ```rust
//! use ton_format::ton;
//!
//! let value = ton!({"name": "Ada", "active": true});
//! assert!(value.is_object());
//! ```
//!
//! All components are pure transformations over in-memory strings and
//! trees; documents can be processed concurrently as long as each one is
//! mutated from a single thread.

pub mod document;
pub mod error;
pub mod formatter;
pub mod lexer;
pub mod map;
mod macros;
pub mod object;
pub mod options;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod token;
pub mod validator;
pub mod value;

pub use document::{TonDocument, TonHeader};
pub use error::{Result, TonError};
pub use formatter::{format, format_sorted, TonFormatStyle};
pub use map::TonMap;
pub use object::TonObject;
pub use options::SerializeOptions;
pub use parser::{parse, parse_with_options, ParseOptions};
pub use schema::{
    BaseType, ClassSchema, EnumDefinition, FormatKind, SchemaCollection, SchemaProperty,
    ValidationRule,
};
pub use serializer::{serialize, serialize_object, serialize_with_options};
pub use token::{Token, TokenKind};
pub use validator::{validate, validate_with_schemas, ValidationError, ValidationResult};
pub use value::{EnumValue, IntegerBase, TonValue, TypeHint};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serialize_validate_pipeline() {
        let text = "{(person) name = 'Ada', status = |0|}\n#! enum(status) [active, inactive]\n#! {(person) /name = string(required), /status = enum:status}";
        let doc = parse(text).unwrap();
        assert!(validate(&doc).is_valid());

        let out = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
        let reparsed = parse(&out).unwrap();
        assert_eq!(reparsed.get_string("/name"), Some("Ada"));
        match reparsed.get_value("/status") {
            Some(TonValue::Enum(member)) => assert_eq!(member.canonical(), "active"),
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_format_entry_point() {
        let out = format("{x=1}", TonFormatStyle::Compact).unwrap();
        assert_eq!(out, "{x = 1}");
    }
}
