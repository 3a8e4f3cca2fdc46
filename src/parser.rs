//! TON parser.
//!
//! Turns a token stream into a [`TonDocument`]: an optional `#@` header
//! line, exactly one root value, and zero or more trailing `#!` schema
//! blocks. Structural problems surface as [`TonError::Parse`] with the
//! line and column of the offending token; empty input is an argument
//! error so callers can tell "nothing there" from "malformed".
//!
//! When the document carries inline schemas, a post-parse pass resolves
//! enum values (by name or zero-based index) against their definitions
//! so later equality and serialization see canonical member names.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::document::{TonDocument, TonHeader};
use crate::error::{Result, TonError};
use crate::lexer;
use crate::object::TonObject;
use crate::schema::{
    BaseType, ClassSchema, EnumDefinition, FormatKind, SchemaCollection, SchemaProperty,
    ValidationRule,
};
use crate::token::{NumberValue, Token, TokenKind};
use crate::value::{EnumValue, TonValue, TypeHint};

/// Parsing behavior switches.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Require every property assignment in an object body to precede
    /// all anonymous child objects of that body.
    pub enforce_property_ordering: bool,
    /// Maximum `{`/`[` nesting depth before parsing fails.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            enforce_property_ordering: false,
            max_nesting_depth: 100,
        }
    }
}

/// Parses TON text with default options.
///
/// # Examples
///
/// ```rust
/// use ton_format::parse;
///
/// let doc = parse("{name = 'Ada', age = 36}").unwrap();
/// assert_eq!(doc.get_integer("/age"), Some(36));
/// ```
pub fn parse(text: &str) -> Result<TonDocument> {
    parse_with_options(text, &ParseOptions::default())
}

/// Parses TON text with explicit options.
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<TonDocument> {
    Parser::new(options.clone()).parse(text)
}

/// The TON parser. Owns the token stream and a cursor into it.
pub struct Parser {
    options: ParseOptions,
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Parser {
            options,
            tokens: Vec::new(),
            current: 0,
            depth: 0,
        }
    }

    pub fn parse(&mut self, text: &str) -> Result<TonDocument> {
        self.tokens = lexer::tokenize(text)?;
        self.current = 0;
        self.depth = 0;

        if self.is_at_end() {
            return Err(TonError::argument("document cannot be empty"));
        }

        let header = if self.check(&TokenKind::HeaderMarker) {
            Some(self.parse_header()?)
        } else {
            None
        };

        if self.is_at_end() {
            return Err(TonError::argument("document cannot be empty"));
        }
        if self.check(&TokenKind::SchemaMarker) {
            let token = self.peek();
            return Err(TonError::parse(
                token.line,
                token.column,
                "Schema blocks must appear after the root value",
            ));
        }

        let mut root = self.parse_value()?;
        let schemas = self.parse_schema_section()?;

        if !self.is_at_end() {
            let token = self.peek();
            return Err(TonError::parse(
                token.line,
                token.column,
                "Unexpected content after root value",
            ));
        }

        if let Some(schemas) = &schemas {
            resolve_enums_in_value(&mut root, schemas);
        }

        let mut document = TonDocument::new(root);
        if let Some(header) = header {
            document.set_header(header);
        }
        if let Some(schemas) = schemas {
            document.set_schemas(schemas);
        }
        Ok(document)
    }

    // ---- header ----

    fn parse_header(&mut self) -> Result<TonHeader> {
        self.advance(); // #@
        let mut header = TonHeader::new();

        loop {
            if !self.at_header_pair() {
                break;
            }
            let at_prefixed = self.check(&TokenKind::At);
            if at_prefixed {
                self.advance();
            }
            let name_token = self.advance().clone();
            let name = property_name(&name_token).ok_or_else(|| {
                TonError::parse(name_token.line, name_token.column, "Expected attribute name")
            })?;
            let key = if at_prefixed {
                format!("@{}", name)
            } else {
                name
            };
            self.consume_equals()?;
            let value = self.parse_value()?;

            match key.as_str() {
                "tonVersion" => header.set_ton_version(header_text(&value)),
                "@schema" | "schemaFile" => header.set_schema_file(header_text(&value)),
                _ => header.set_attribute(key, value),
            }

            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        Ok(header)
    }

    /// Two-token lookahead: a header pair is `name =` (optionally
    /// `@name =`). Anything else ends the header line.
    fn at_header_pair(&self) -> bool {
        let (first, second) = if self.check(&TokenKind::At) {
            (self.peek_at(1), self.peek_at(2))
        } else {
            (Some(self.peek()), self.peek_at(1))
        };
        let named = first.is_some_and(|t| property_name(t).is_some());
        named && second.is_some_and(|t| t.kind == TokenKind::Equals)
    }

    // ---- values ----

    fn parse_value(&mut self) -> Result<TonValue> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::LeftBrace => Ok(TonValue::Object(self.parse_object()?)),
            TokenKind::LeftBracket => Ok(TonValue::Array(self.parse_array()?)),
            TokenKind::String(s) => {
                let value = TonValue::String(s.clone());
                self.advance();
                Ok(value)
            }
            TokenKind::Number(lit) => {
                let value = match lit.value {
                    NumberValue::Integer { value, base } => TonValue::integer(value, base),
                    NumberValue::Float(value) => TonValue::Float(value),
                };
                self.advance();
                Ok(value)
            }
            TokenKind::Boolean(b) => {
                let value = TonValue::Boolean(*b);
                self.advance();
                Ok(value)
            }
            TokenKind::Null => {
                self.advance();
                Ok(TonValue::Null)
            }
            TokenKind::Undefined => {
                self.advance();
                Ok(TonValue::Undefined)
            }
            TokenKind::Guid(guid) => {
                let value = TonValue::Guid(*guid);
                self.advance();
                Ok(value)
            }
            TokenKind::Enum(name) => {
                let value = TonValue::Enum(EnumValue::new(name.clone()));
                self.advance();
                Ok(value)
            }
            TokenKind::EnumSet(names) => {
                let value = TonValue::EnumSet(names.clone());
                self.advance();
                Ok(value)
            }
            TokenKind::StringHint => self.parse_hinted_value(TypeHint::String),
            TokenKind::NumberHint => self.parse_hinted_value(TypeHint::Number),
            TokenKind::GuidHint => self.parse_hinted_value(TypeHint::Guid),
            TokenKind::DateHint => self.parse_hinted_value(TypeHint::Date),
            other => Err(TonError::parse(
                token.line,
                token.column,
                format!("Unexpected token: {}", other.describe()),
            )),
        }
    }

    /// A type-hint marker precedes the literal it annotates. `&` and `^`
    /// coerce a following string into a GUID or RFC 3339 date when it
    /// parses as one; otherwise the hint is advisory and the literal is
    /// kept as lexed.
    fn parse_hinted_value(&mut self, hint: TypeHint) -> Result<TonValue> {
        self.advance(); // the hint marker
        let value = self.parse_value()?;
        Ok(match (hint, value) {
            (TypeHint::Guid, TonValue::String(s)) => match Uuid::parse_str(&s) {
                Ok(guid) => TonValue::Guid(guid),
                Err(_) => TonValue::String(s),
            },
            (TypeHint::Date, TonValue::String(s)) => match DateTime::parse_from_rfc3339(&s) {
                Ok(date) => TonValue::Date(date.with_timezone(&Utc)),
                Err(_) => TonValue::String(s),
            },
            (_, value) => value,
        })
    }

    fn parse_object(&mut self) -> Result<TonObject> {
        let open = self.expect(&TokenKind::LeftBrace, "Expected '{'")?;
        self.enter_nesting(&open)?;

        let mut object = TonObject::new();

        // Optional class clause right after the brace.
        if self.check(&TokenKind::LeftParen) {
            self.parse_class_clause(&mut object)?;
        }

        let mut seen_child = false;
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            if self.check(&TokenKind::LeftBrace) {
                let child = self.parse_object()?;
                object.add_child(child);
                seen_child = true;
            } else {
                if seen_child && self.options.enforce_property_ordering {
                    let token = self.peek();
                    return Err(TonError::parse(
                        token.line,
                        token.column,
                        "Properties must appear before child objects",
                    ));
                }
                if self.check(&TokenKind::At) {
                    self.advance(); // cosmetic prefix
                }
                let name_token = self.advance().clone();
                let name = property_name(&name_token).ok_or_else(|| {
                    TonError::parse(name_token.line, name_token.column, "Expected property name")
                })?;
                self.consume_equals()?;
                let value = self.parse_value()?;
                object.set(name, value);
            }

            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if !self.check(&TokenKind::RightBrace) {
                let token = self.peek();
                return Err(TonError::parse(
                    token.line,
                    token.column,
                    "Expected ',' or '}'",
                ));
            }
        }

        self.expect(&TokenKind::RightBrace, "Expected '}'")?;
        self.depth -= 1;
        Ok(object)
    }

    fn parse_class_clause(&mut self, object: &mut TonObject) -> Result<()> {
        self.advance(); // (
        let name_token = self.advance().clone();
        let name = match &name_token.kind {
            TokenKind::ClassName(name) | TokenKind::Identifier(name) => name.clone(),
            _ => {
                return Err(TonError::parse(
                    name_token.line,
                    name_token.column,
                    "Expected class name",
                ));
            }
        };
        object.set_class_name(Some(name));

        if self.check(&TokenKind::Colon) {
            self.advance();
            let count_token = self.advance().clone();
            let count = match &count_token.kind {
                TokenKind::Number(lit) => match lit.value {
                    NumberValue::Integer { value, .. } if value >= 0 => Some(value),
                    _ => None,
                },
                _ => None,
            };
            let count = count.ok_or_else(|| {
                TonError::parse(count_token.line, count_token.column, "Expected instance count")
            })?;
            object.set_instance_count(Some(count));
        }

        self.expect(&TokenKind::RightParen, "Expected ')'")?;
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Vec<TonValue>> {
        let open = self.expect(&TokenKind::LeftBracket, "Expected '['")?;
        self.enter_nesting(&open)?;

        let mut items = Vec::new();
        while !self.check(&TokenKind::RightBracket) && !self.is_at_end() {
            items.push(self.parse_value()?);

            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if !self.check(&TokenKind::RightBracket) {
                let token = self.peek();
                return Err(TonError::parse(
                    token.line,
                    token.column,
                    "Expected ',' or ']'",
                ));
            }
        }

        self.expect(&TokenKind::RightBracket, "Expected ']'")?;
        self.depth -= 1;
        Ok(items)
    }

    // ---- schema blocks ----

    fn parse_schema_section(&mut self) -> Result<Option<SchemaCollection>> {
        if !self.check(&TokenKind::SchemaMarker) {
            return Ok(None);
        }

        let mut schemas = SchemaCollection::new();
        while !self.is_at_end() {
            if self.check(&TokenKind::SchemaMarker) {
                self.advance();
                continue;
            }
            self.parse_schema_item(&mut schemas)?;
        }
        Ok(Some(schemas))
    }

    fn parse_schema_item(&mut self, schemas: &mut SchemaCollection) -> Result<()> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Identifier(word) if word == "enum" || word == "enumSet" => {
                let is_set = word == "enumSet";
                self.advance();
                let definition = self.parse_enum_definition(is_set)?;
                schemas.add_enum(definition);
                Ok(())
            }
            TokenKind::LeftBrace => {
                let class = self.parse_class_schema()?;
                schemas.add_class(class);
                Ok(())
            }
            other => Err(TonError::parse(
                token.line,
                token.column,
                format!("Expected schema declaration, found {}", other.describe()),
            )),
        }
    }

    /// `enum(Name) [v1, v2, ...]` or `enumSet(Name) [v1, v2, ...]`.
    fn parse_enum_definition(&mut self, is_set: bool) -> Result<EnumDefinition> {
        self.expect(&TokenKind::LeftParen, "Expected '('")?;
        let name_token = self.advance().clone();
        let name = property_name(&name_token).ok_or_else(|| {
            TonError::parse(name_token.line, name_token.column, "Expected enum name")
        })?;
        self.expect(&TokenKind::RightParen, "Expected ')'")?;

        self.expect(&TokenKind::LeftBracket, "Expected '['")?;
        let mut values = Vec::new();
        while !self.check(&TokenKind::RightBracket) && !self.is_at_end() {
            let value_token = self.advance().clone();
            let value = property_name(&value_token).ok_or_else(|| {
                TonError::parse(value_token.line, value_token.column, "Expected enum value")
            })?;
            values.push(value);
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(&TokenKind::RightBracket, "Expected ']'")?;

        Ok(if is_set {
            EnumDefinition::new_set(name, values)
        } else {
            EnumDefinition::new(name, values)
        })
    }

    /// `{(ClassName) /path = type(rule, rule(arg), ...), ...}`
    fn parse_class_schema(&mut self) -> Result<ClassSchema> {
        self.expect(&TokenKind::LeftBrace, "Expected '{'")?;
        self.expect(&TokenKind::LeftParen, "Expected '('")?;
        let name_token = self.advance().clone();
        let name = match &name_token.kind {
            TokenKind::ClassName(name) | TokenKind::Identifier(name) => name.clone(),
            _ => {
                return Err(TonError::parse(
                    name_token.line,
                    name_token.column,
                    "Expected class name",
                ));
            }
        };
        self.expect(&TokenKind::RightParen, "Expected ')'")?;

        let mut class = ClassSchema::new(name);
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let property = self.parse_schema_property()?;
            class.add_property(property);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else if !self.check(&TokenKind::RightBrace) {
                let token = self.peek();
                return Err(TonError::parse(
                    token.line,
                    token.column,
                    "Expected ',' or '}'",
                ));
            }
        }
        self.expect(&TokenKind::RightBrace, "Expected '}'")?;
        Ok(class)
    }

    fn parse_schema_property(&mut self) -> Result<SchemaProperty> {
        let path = self.parse_schema_path()?;
        self.consume_equals()?;

        let type_token = self.peek().clone();
        let type_text = self.parse_type_name()?;
        let base_type = BaseType::parse(&type_text).ok_or_else(|| {
            TonError::parse(
                type_token.line,
                type_token.column,
                format!("Unknown type '{}'", type_text),
            )
        })?;

        let mut rules = Vec::new();
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            while !self.check(&TokenKind::RightParen) && !self.is_at_end() {
                rules.push(self.parse_validation_rule()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
            }
            self.expect(&TokenKind::RightParen, "Expected ')'")?;
        }

        Ok(SchemaProperty::with_rules(path, base_type, rules))
    }

    /// `/seg/seg` where a segment is a name or the `*` wildcard.
    fn parse_schema_path(&mut self) -> Result<String> {
        let mut path = String::new();
        let slash = self.expect(&TokenKind::Slash, "Expected '/'")?;
        loop {
            path.push('/');
            if self.check(&TokenKind::Star) {
                self.advance();
                path.push('*');
            } else {
                let segment_token = self.advance().clone();
                let segment = property_name(&segment_token).ok_or_else(|| {
                    TonError::parse(slash.line, slash.column, "Expected path segment")
                })?;
                path.push_str(&segment);
            }
            if self.check(&TokenKind::Slash) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(path)
    }

    /// Type names may chain with colons: `array:int`, `enum:status`,
    /// `array:array:string`.
    fn parse_type_name(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            let token = self.advance().clone();
            match &token.kind {
                TokenKind::Identifier(word) | TokenKind::ClassName(word) => {
                    text.push_str(word);
                }
                _ => {
                    return Err(TonError::parse(token.line, token.column, "Expected type name"));
                }
            }
            if self.check(&TokenKind::Colon) {
                self.advance();
                text.push(':');
            } else {
                break;
            }
        }
        Ok(text)
    }

    fn parse_validation_rule(&mut self) -> Result<ValidationRule> {
        let name_token = self.advance().clone();
        let name = match &name_token.kind {
            TokenKind::Identifier(word) | TokenKind::ClassName(word) => word.clone(),
            _ => {
                return Err(TonError::parse(
                    name_token.line,
                    name_token.column,
                    "Expected rule name",
                ));
            }
        };

        let fail = |msg: &str| TonError::parse(name_token.line, name_token.column, msg);

        match name.as_str() {
            "required" => Ok(ValidationRule::Required),
            "notNull" => Ok(ValidationRule::NotNull),
            "nonEmpty" => Ok(ValidationRule::NonEmpty),
            "unique" => Ok(ValidationRule::Unique),
            "sorted" => Ok(ValidationRule::Sorted),
            "minLength" => Ok(ValidationRule::MinLength(
                self.rule_count_arg().ok_or_else(|| fail("Expected count argument"))?,
            )),
            "maxLength" => Ok(ValidationRule::MaxLength(
                self.rule_count_arg().ok_or_else(|| fail("Expected count argument"))?,
            )),
            "minCount" => Ok(ValidationRule::MinCount(
                self.rule_count_arg().ok_or_else(|| fail("Expected count argument"))?,
            )),
            "maxCount" => Ok(ValidationRule::MaxCount(
                self.rule_count_arg().ok_or_else(|| fail("Expected count argument"))?,
            )),
            "min" => Ok(ValidationRule::Min(
                self.rule_number_arg().ok_or_else(|| fail("Expected numeric argument"))?,
            )),
            "max" => Ok(ValidationRule::Max(
                self.rule_number_arg().ok_or_else(|| fail("Expected numeric argument"))?,
            )),
            "pattern" => Ok(ValidationRule::Pattern(
                self.rule_string_arg().ok_or_else(|| fail("Expected string argument"))?,
            )),
            "format" => {
                let word = self
                    .rule_word_arg()
                    .ok_or_else(|| fail("Expected format name"))?;
                let kind = FormatKind::parse(&word)
                    .ok_or_else(|| fail("Unknown format name"))?;
                Ok(ValidationRule::Format(kind))
            }
            "default" => {
                self.expect(&TokenKind::LeftParen, "Expected '('")?;
                let value = self.parse_value()?;
                self.expect(&TokenKind::RightParen, "Expected ')'")?;
                Ok(ValidationRule::Default(value))
            }
            _ => Err(TonError::parse(
                name_token.line,
                name_token.column,
                format!("Unknown validation rule '{}'", name),
            )),
        }
    }

    fn rule_count_arg(&mut self) -> Option<usize> {
        let n = self.rule_number_arg()?;
        if n >= 0.0 && n.fract() == 0.0 {
            Some(n as usize)
        } else {
            None
        }
    }

    fn rule_number_arg(&mut self) -> Option<f64> {
        if !self.check(&TokenKind::LeftParen) {
            return None;
        }
        self.advance();
        let value = match &self.advance().kind {
            TokenKind::Number(lit) => match lit.value {
                NumberValue::Integer { value, .. } => value as f64,
                NumberValue::Float(value) => value,
            },
            _ => return None,
        };
        if self.check(&TokenKind::RightParen) {
            self.advance();
            Some(value)
        } else {
            None
        }
    }

    fn rule_string_arg(&mut self) -> Option<String> {
        if !self.check(&TokenKind::LeftParen) {
            return None;
        }
        self.advance();
        let value = match &self.advance().kind {
            TokenKind::String(s) => s.clone(),
            _ => return None,
        };
        if self.check(&TokenKind::RightParen) {
            self.advance();
            Some(value)
        } else {
            None
        }
    }

    fn rule_word_arg(&mut self) -> Option<String> {
        if !self.check(&TokenKind::LeftParen) {
            return None;
        }
        self.advance();
        let value = match &self.advance().kind {
            TokenKind::Identifier(word) | TokenKind::ClassName(word) => word.clone(),
            TokenKind::String(s) => s.clone(),
            _ => return None,
        };
        if self.check(&TokenKind::RightParen) {
            self.advance();
            Some(value)
        } else {
            None
        }
    }

    // ---- cursor ----

    fn enter_nesting(&mut self, open: &Token) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_nesting_depth {
            return Err(TonError::parse(
                open.line,
                open.column,
                format!(
                    "Maximum nesting depth {} exceeded",
                    self.options.max_nesting_depth
                ),
            ));
        }
        Ok(())
    }

    fn consume_equals(&mut self) -> Result<()> {
        self.expect(&TokenKind::Equals, "Expected '='")?;
        Ok(())
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let token = self.peek();
        Err(TonError::parse(token.line, token.column, message))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && &self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.current + offset)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndOfFile
    }
}

/// A token usable as a property, attribute, or enum-member name. Quoted
/// strings pass through verbatim; numbers contribute their raw source
/// text so `{3.14 = 'pi'}` keeps the name `3.14`.
fn property_name(token: &Token) -> Option<String> {
    match &token.kind {
        TokenKind::Identifier(name) | TokenKind::ClassName(name) => Some(name.clone()),
        TokenKind::String(name) => Some(name.clone()),
        TokenKind::Number(lit) => Some(lit.raw.clone()),
        _ => None,
    }
}

/// Header attribute values for the typed fields are stored as text.
fn header_text(value: &TonValue) -> String {
    match value {
        TonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---- post-parse enum resolution ----

fn resolve_enums_in_value(value: &mut TonValue, schemas: &SchemaCollection) {
    match value {
        TonValue::Object(object) => resolve_enums_in_object(object, schemas),
        TonValue::Array(items) => {
            for item in items {
                resolve_enums_in_value(item, schemas);
            }
        }
        _ => {}
    }
}

fn resolve_enums_in_object(object: &mut TonObject, schemas: &SchemaCollection) {
    let class_name = object.class_name().map(str::to_string);
    if let Some(class) = class_name.as_deref().and_then(|name| schemas.class(name)) {
        for property in class.properties() {
            let enum_name = match property.base_type() {
                BaseType::Enum(name) | BaseType::EnumSet(name) => name.clone(),
                _ => continue,
            };
            let Some(definition) = schemas.enum_definition(&enum_name) else {
                continue;
            };
            if property.path().contains('*') {
                continue;
            }
            if let Some(target) = path_value_mut(object, property.path()) {
                resolve_enum_value(target, definition);
            }
        }
    }

    for (_, value) in object.properties_mut().iter_mut() {
        resolve_enums_in_value(value, schemas);
    }
    for child in object.children_mut() {
        resolve_enums_in_object(child, schemas);
    }
}

fn resolve_enum_value(value: &mut TonValue, definition: &EnumDefinition) {
    match value {
        TonValue::Enum(member) => {
            if let Some(canonical) = definition.resolve(member.raw()) {
                let canonical = canonical.to_string();
                member.set_resolved(canonical);
            }
        }
        TonValue::EnumSet(members) => {
            for member in members.iter_mut() {
                if let Some(canonical) = definition.resolve(member) {
                    *member = canonical.to_string();
                }
            }
        }
        _ => {}
    }
}

/// Descends through nested object-valued properties along a schema path
/// without wildcards.
fn path_value_mut<'a>(object: &'a mut TonObject, path: &str) -> Option<&'a mut TonValue> {
    let mut segments = path.trim_matches('/').split('/').peekable();
    let mut current = object;
    loop {
        let segment = segments.next()?;
        if segments.peek().is_none() {
            return current.properties_mut().get_mut(segment);
        }
        match current.properties_mut().get_mut(segment)? {
            TonValue::Object(inner) => current = inner,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_property_last_wins() {
        let doc = parse("{name='first', name='second'}").unwrap();
        assert_eq!(doc.get_string("/name"), Some("second"));
        assert_eq!(doc.root_object().unwrap().len(), 1);
    }

    #[test]
    fn test_numeric_property_names() {
        let doc = parse("{123 = 'v'}").unwrap();
        assert_eq!(doc.get_string("/123"), Some("v"));

        let doc = parse("{2022=1,2023=2}").unwrap();
        assert_eq!(doc.get_integer("/2022"), Some(1));
        assert_eq!(doc.get_integer("/2023"), Some(2));
    }

    #[test]
    fn test_empty_input_is_argument_error() {
        assert!(matches!(parse(""), Err(TonError::Argument(_))));
        assert!(matches!(parse("  // just a comment\n"), Err(TonError::Argument(_))));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let text = "{a = {b = {c = {d = {e = {f = 1}}}}}}";
        let options = ParseOptions {
            max_nesting_depth: 5,
            ..ParseOptions::default()
        };
        let err = parse_with_options(text, &options).unwrap_err();
        match err {
            TonError::Parse { msg, .. } => {
                assert!(msg.contains("Maximum nesting depth 5"), "{}", msg);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_class_clause_with_instance_count() {
        let doc = parse("{(person:2) name = 'x'}").unwrap();
        let root = doc.root_object().unwrap();
        assert_eq!(root.class_name(), Some("person"));
        assert_eq!(root.instance_count(), Some(2));
    }

    #[test]
    fn test_property_ordering_enforced() {
        let text = "{{inner = 1}, after = 2}";
        assert!(parse(text).is_ok());

        let options = ParseOptions {
            enforce_property_ordering: true,
            ..ParseOptions::default()
        };
        let err = parse_with_options(text, &options).unwrap_err();
        match err {
            TonError::Parse { msg, .. } => {
                assert_eq!(msg, "Properties must appear before child objects");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_line() {
        let doc = parse("#@ tonVersion = '1', @schema = 'types.ton', author = 'dev'\n{a = 1}").unwrap();
        let header = doc.header().unwrap();
        assert_eq!(header.ton_version(), Some("1"));
        assert_eq!(header.schema_file(), Some("types.ton"));
        assert_eq!(
            header.attribute("author").and_then(TonValue::as_str),
            Some("dev")
        );
    }

    #[test]
    fn test_schema_block_after_root() {
        let text = "{(person) status = |1|}\n#! enum(status) [active, inactive]\n#! {(person) /status = enum:status}";
        let doc = parse(text).unwrap();
        let schemas = doc.schemas().unwrap();
        assert!(schemas.enum_definition("status").is_some());

        // Index resolution happened at parse time.
        match doc.get_value("/status") {
            Some(TonValue::Enum(member)) => assert_eq!(member.canonical(), "inactive"),
            other => panic!("expected enum value, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_block_before_root_fails() {
        let text = "#! enum(status) [a, b]\n{x = 1}";
        let err = parse(text).unwrap_err();
        match err {
            TonError::Parse { msg, .. } => {
                assert_eq!(msg, "Schema blocks must appear after the root value");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_class_schema_with_rules() {
        let text = "{(person) name = 'x'}\n#! {(person) /name = string(required, minLength(2)), /age = int(min(0), max(150))}";
        let doc = parse(text).unwrap();
        let class = doc.schemas().unwrap().class("person").unwrap();
        assert_eq!(class.properties().len(), 2);
        assert!(class.property("/name").unwrap().is_required());
        assert_eq!(
            class.property("/age").unwrap().base_type(),
            &BaseType::Int
        );
    }

    #[test]
    fn test_hint_coercions() {
        let doc = parse("{id = &'550e8400-e29b-41d4-a716-446655440000', at = ^'2024-01-15T10:30:00Z'}").unwrap();
        assert!(matches!(doc.get_value("/id"), Some(TonValue::Guid(_))));
        assert!(matches!(doc.get_value("/at"), Some(TonValue::Date(_))));
    }

    #[test]
    fn test_array_and_scalar_roots() {
        let doc = parse("[1, 2, 3]").unwrap();
        assert!(matches!(doc.root(), TonValue::Array(items) if items.len() == 3));

        let doc = parse("42").unwrap();
        assert_eq!(doc.root().as_integer(), Some(42));
    }

    #[test]
    fn test_trailing_comma_tolerated() {
        assert!(parse("{a = 1, b = 2,}").is_ok());
        assert!(parse("[1, 2, 3,]").is_ok());
    }

    #[test]
    fn test_missing_comma_rejected() {
        let err = parse("{a = 1 b = 2}").unwrap_err();
        assert!(matches!(err, TonError::Parse { .. }));
    }

    #[test]
    fn test_at_prefix_is_cosmetic() {
        let doc = parse("{@name = 'Ada'}").unwrap();
        assert_eq!(doc.get_string("/name"), Some("Ada"));
    }
}
