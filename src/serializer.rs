//! TON serializer.
//!
//! Renders a [`TonDocument`] (or a bare object) back to text. The output
//! style is driven entirely by [`SerializeOptions`]; whatever the style,
//! re-parsing the output yields a tree semantically equal to the input,
//! except for values the options explicitly drop (omitted nulls,
//! undefineds, empty collections).
//!
//! Property names are emitted unquoted only when the lexer would scan
//! them back to the identical identifier or number token; anything else
//! is quoted and escaped.

use chrono::SecondsFormat;

use crate::document::{TonDocument, TonHeader};
use crate::error::{Result, TonError};
use crate::lexer;
use crate::object::TonObject;
use crate::options::SerializeOptions;
use crate::schema::{SchemaCollection, ValidationRule};
use crate::token::TokenKind;
use crate::value::{IntegerBase, TonValue};

/// Depth guard for hand-built trees; parsed documents are bounded by the
/// parser's own limit.
const MAX_SERIALIZE_DEPTH: usize = 500;

/// Serializes a document with the pretty preset.
///
/// # Examples
///
/// ```rust
/// use ton_format::{parse, serialize};
///
/// let doc = parse("{name = 'Ada'}").unwrap();
/// let text = serialize(&doc).unwrap();
/// assert!(text.contains("name = $'Ada'"));
/// ```
pub fn serialize(document: &TonDocument) -> Result<String> {
    serialize_with_options(document, &SerializeOptions::pretty())
}

/// Serializes a document with explicit options.
pub fn serialize_with_options(
    document: &TonDocument,
    options: &SerializeOptions,
) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.write_document(document)?;
    Ok(serializer.out)
}

/// Serializes a single object without header or schema context.
pub fn serialize_object(object: &TonObject, options: &SerializeOptions) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.write_object(object, 0)?;
    Ok(serializer.out)
}

struct Serializer<'a> {
    options: &'a SerializeOptions,
    out: String,
}

impl<'a> Serializer<'a> {
    fn new(options: &'a SerializeOptions) -> Self {
        Serializer {
            options,
            out: String::new(),
        }
    }

    fn write_document(&mut self, document: &TonDocument) -> Result<()> {
        if self.options.include_header {
            if let Some(header) = document.header() {
                if !header.is_empty() {
                    self.write_header(header)?;
                    self.out.push('\n');
                }
            }
        }

        self.write_value(document.root(), 0)?;

        if self.options.include_schema {
            if let Some(schemas) = document.schemas() {
                if !schemas.is_empty() {
                    self.out.push('\n');
                    self.write_schemas(schemas)?;
                }
            }
        }
        Ok(())
    }

    // ---- header ----

    fn write_header(&mut self, header: &TonHeader) -> Result<()> {
        let mut pairs: Vec<(String, TonValue)> = Vec::new();
        if let Some(version) = header.ton_version() {
            pairs.push((
                "tonVersion".to_string(),
                TonValue::String(version.to_string()),
            ));
        }
        if let Some(file) = header.schema_file() {
            pairs.push(("@schema".to_string(), TonValue::String(file.to_string())));
        }
        for (key, value) in header.attributes().iter() {
            pairs.push((key.clone(), value.clone()));
        }

        self.out.push_str("#@ ");
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(key);
            self.out.push_str(" = ");
            self.write_value(value, 0)?;
        }
        Ok(())
    }

    // ---- values ----

    fn write_value(&mut self, value: &TonValue, level: usize) -> Result<()> {
        if level > MAX_SERIALIZE_DEPTH {
            return Err(TonError::serialize("Maximum nesting depth exceeded"));
        }
        match value {
            TonValue::String(s) => {
                if self.options.include_type_hints {
                    self.out.push('$');
                }
                self.write_string(s, level);
                Ok(())
            }
            TonValue::Integer { value, base } => {
                if self.options.include_type_hints {
                    self.out.push('%');
                }
                self.write_integer(*value, *base);
                Ok(())
            }
            TonValue::Float(f) => {
                if self.options.include_type_hints {
                    self.out.push('%');
                }
                self.write_float(*f)
            }
            TonValue::Boolean(b) => {
                self.out.push_str(if *b { "true" } else { "false" });
                Ok(())
            }
            TonValue::Null => {
                self.out.push_str("null");
                Ok(())
            }
            TonValue::Undefined => {
                self.out.push_str("undefined");
                Ok(())
            }
            TonValue::Guid(guid) => {
                if self.options.include_type_hints {
                    self.out.push('&');
                }
                let text = guid.to_string();
                if self.options.lowercase_guids {
                    self.out.push_str(&text);
                } else {
                    self.out.push_str(&text.to_uppercase());
                }
                Ok(())
            }
            TonValue::Date(date) => {
                // The date hint is always emitted so the value survives
                // a round trip as a date rather than a string.
                self.out.push('^');
                let text = date.to_rfc3339_opts(SecondsFormat::AutoSi, true);
                let quote = self.options.quote_char;
                self.out.push(quote);
                self.out.push_str(&text);
                self.out.push(quote);
                Ok(())
            }
            TonValue::Enum(member) => {
                let name = if self.options.prefer_enum_names {
                    member.canonical()
                } else {
                    member.raw()
                };
                self.out.push('|');
                self.out.push_str(name);
                self.out.push('|');
                Ok(())
            }
            TonValue::EnumSet(members) => {
                self.out.push('|');
                if members.is_empty() {
                    self.out.push('|');
                } else {
                    for member in members {
                        self.out.push_str(member);
                        self.out.push('|');
                    }
                }
                Ok(())
            }
            TonValue::Array(items) => self.write_array(items, level),
            TonValue::Object(object) => self.write_object(object, level),
        }
    }

    fn write_object(&mut self, object: &TonObject, level: usize) -> Result<()> {
        if level > MAX_SERIALIZE_DEPTH {
            return Err(TonError::serialize("Maximum nesting depth exceeded"));
        }

        self.out.push('{');
        if let Some(name) = object.class_name() {
            self.out.push('(');
            self.out.push_str(name);
            if let Some(count) = object.instance_count() {
                self.out.push(':');
                self.out.push_str(&count.to_string());
            }
            self.out.push(')');
        }

        let mut names: Vec<&str> = object
            .keys()
            .map(String::as_str)
            .filter(|name| !object.get(name).is_some_and(|v| self.omitted(v)))
            .collect();
        if self.options.sort_properties {
            names.sort_unstable();
        }

        let entry_count = names.len() + object.children().len();
        if entry_count == 0 {
            self.out.push('}');
            return Ok(());
        }

        let multi = self.options.is_multi_line();
        let mut first = true;
        for name in names {
            self.separate(&mut first, multi, level + 1);
            self.write_property_name(name, level + 1);
            self.out.push_str(" = ");
            if let Some(value) = object.get(name) {
                self.write_value(value, level + 1)?;
            }
        }
        for child in object.children() {
            self.separate(&mut first, multi, level + 1);
            self.write_object(child, level + 1)?;
        }

        if multi {
            self.newline_indent(level);
        }
        self.out.push('}');
        Ok(())
    }

    fn write_array(&mut self, items: &[TonValue], level: usize) -> Result<()> {
        self.out.push('[');
        if items.is_empty() {
            self.out.push(']');
            return Ok(());
        }

        // Inline scalar arrays stay on one line even in pretty mode;
        // arrays holding structures get one element per line.
        let multi = self.options.is_multi_line()
            && items
                .iter()
                .any(|item| matches!(item, TonValue::Object(_) | TonValue::Array(_)));

        let mut first = true;
        for item in items {
            self.separate(&mut first, multi, level + 1);
            self.write_value(item, level + 1)?;
        }

        if multi {
            self.newline_indent(level);
        }
        self.out.push(']');
        Ok(())
    }

    fn separate(&mut self, first: &mut bool, multi: bool, level: usize) {
        if !*first {
            self.out.push(',');
            if !multi {
                self.out.push(' ');
            }
        }
        if multi {
            self.newline_indent(level);
        }
        *first = false;
    }

    fn newline_indent(&mut self, level: usize) {
        self.out.push('\n');
        if let Some(unit) = &self.options.indentation {
            for _ in 0..level {
                self.out.push_str(unit);
            }
        }
    }

    fn omitted(&self, value: &TonValue) -> bool {
        match value {
            TonValue::Null => self.options.omit_nulls,
            TonValue::Undefined => self.options.omit_undefined,
            TonValue::Array(items) => self.options.omit_empty_collections && items.is_empty(),
            TonValue::EnumSet(members) => {
                self.options.omit_empty_collections && members.is_empty()
            }
            _ => false,
        }
    }

    // ---- names and strings ----

    fn write_property_name(&mut self, name: &str, level: usize) {
        if self.options.use_at_prefix {
            self.out.push('@');
        }
        if name_round_trips(name) {
            self.out.push_str(name);
        } else {
            self.write_string(name, level);
        }
    }

    fn write_string(&mut self, text: &str, level: usize) {
        if self.can_triple_quote(text) {
            self.write_triple_quoted(text, level);
        } else {
            self.write_quoted(text);
        }
    }

    fn write_quoted(&mut self, text: &str) {
        let quote = self.options.quote_char;
        self.out.push(quote);
        for ch in text.chars() {
            match ch {
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                c if c == quote => {
                    self.out.push('\\');
                    self.out.push(c);
                }
                c if (c as u32) < 0x20 => {
                    self.out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.out.push(c),
            }
        }
        self.out.push(quote);
    }

    /// Triple-quoted form is only safe when the dedent pass will recover
    /// the exact content: multi-line, at the configured threshold, no
    /// embedded triple quote, no other control characters, and no shared
    /// leading whitespace the dedent would strip away.
    fn can_triple_quote(&self, text: &str) -> bool {
        if !self.options.use_multi_line_strings || !self.options.is_multi_line() {
            return false;
        }
        if !text.contains('\n') {
            return false;
        }
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < self.options.multi_line_threshold {
            return false;
        }
        let quote = self.options.quote_char;
        let triple: String = std::iter::repeat(quote).take(3).collect();
        if text.contains(&triple) {
            return false;
        }
        if text
            .chars()
            .any(|c| (c as u32) < 0x20 && c != '\n' && c != '\t')
        {
            return false;
        }
        let min_indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').count())
            .min();
        min_indent == Some(0)
    }

    fn write_triple_quoted(&mut self, text: &str, level: usize) {
        let quote = self.options.quote_char;
        for _ in 0..3 {
            self.out.push(quote);
        }
        for line in text.split('\n') {
            self.out.push('\n');
            if !line.trim().is_empty() {
                if let Some(unit) = &self.options.indentation {
                    for _ in 0..level {
                        self.out.push_str(unit);
                    }
                }
            }
            self.out.push_str(line);
        }
        self.newline_indent(level);
        for _ in 0..3 {
            self.out.push(quote);
        }
    }

    // ---- numbers ----

    fn write_integer(&mut self, value: i64, base: IntegerBase) {
        let base = if self.options.preserve_number_bases {
            base
        } else {
            IntegerBase::Decimal
        };
        match base {
            IntegerBase::Decimal => self.out.push_str(&value.to_string()),
            IntegerBase::Hex => {
                let magnitude = value.unsigned_abs();
                if value < 0 {
                    self.out.push('-');
                }
                if self.options.lowercase_hex {
                    self.out.push_str(&format!("0x{:x}", magnitude));
                } else {
                    self.out.push_str(&format!("0x{:X}", magnitude));
                }
            }
            IntegerBase::Binary => {
                let magnitude = value.unsigned_abs();
                if value < 0 {
                    self.out.push('-');
                }
                self.out.push_str(&format!("0b{:b}", magnitude));
            }
        }
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(TonError::serialize(format!(
                "Cannot serialize non-finite number {}",
                value
            )));
        }
        // A whole float keeps its decimal point so it re-parses as a
        // float rather than an integer.
        if value.fract() == 0.0 {
            self.out.push_str(&format!("{:.1}", value));
        } else {
            self.out.push_str(&value.to_string());
        }
        Ok(())
    }

    // ---- schemas ----

    fn write_schemas(&mut self, schemas: &SchemaCollection) -> Result<()> {
        let mut first = true;
        for definition in schemas.enums() {
            if !first {
                self.out.push('\n');
            }
            first = false;
            self.out.push_str(if definition.is_set() {
                "#! enumSet("
            } else {
                "#! enum("
            });
            self.out.push_str(definition.name());
            self.out.push_str(") [");
            for (i, member) in definition.values().iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.out.push_str(member);
            }
            self.out.push(']');
        }

        for class in schemas.classes() {
            if !first {
                self.out.push('\n');
            }
            first = false;
            self.out.push_str("#! {(");
            self.out.push_str(class.name());
            self.out.push(')');
            for (i, property) in class.properties().iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.out.push(' ');
                self.out.push_str(property.path());
                self.out.push_str(" = ");
                self.out.push_str(&property.base_type().describe());
                self.write_rules(property.rules())?;
            }
            self.out.push('}');
        }
        Ok(())
    }

    fn write_rules(&mut self, rules: &[ValidationRule]) -> Result<()> {
        if rules.is_empty() {
            return Ok(());
        }
        self.out.push('(');
        for (i, rule) in rules.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            match rule {
                ValidationRule::Required => self.out.push_str("required"),
                ValidationRule::NotNull => self.out.push_str("notNull"),
                ValidationRule::NonEmpty => self.out.push_str("nonEmpty"),
                ValidationRule::Unique => self.out.push_str("unique"),
                ValidationRule::Sorted => self.out.push_str("sorted"),
                ValidationRule::MinLength(n) => {
                    self.out.push_str(&format!("minLength({})", n));
                }
                ValidationRule::MaxLength(n) => {
                    self.out.push_str(&format!("maxLength({})", n));
                }
                ValidationRule::MinCount(n) => {
                    self.out.push_str(&format!("minCount({})", n));
                }
                ValidationRule::MaxCount(n) => {
                    self.out.push_str(&format!("maxCount({})", n));
                }
                ValidationRule::Min(n) => {
                    self.out.push_str("min(");
                    self.write_rule_number(*n);
                    self.out.push(')');
                }
                ValidationRule::Max(n) => {
                    self.out.push_str("max(");
                    self.write_rule_number(*n);
                    self.out.push(')');
                }
                ValidationRule::Pattern(pattern) => {
                    self.out.push_str("pattern(");
                    self.write_quoted(pattern);
                    self.out.push(')');
                }
                ValidationRule::Format(kind) => {
                    self.out.push_str(&format!("format({})", kind.describe()));
                }
                ValidationRule::Default(value) => {
                    self.out.push_str("default(");
                    self.write_value(value, 0)?;
                    self.out.push(')');
                }
            }
        }
        self.out.push(')');
        Ok(())
    }

    fn write_rule_number(&mut self, n: f64) {
        if n.fract() == 0.0 && n.abs() < 1e15 {
            self.out.push_str(&format!("{}", n as i64));
        } else {
            self.out.push_str(&n.to_string());
        }
    }
}

/// A name is emitted bare only if the lexer scans it back to the single
/// identical identifier or number token. Reserved leading characters and
/// anything with spaces, `@`, or other punctuation quotes.
fn name_round_trips(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.starts_with(['#', '{', '[', '(']) {
        return false;
    }
    let Ok(tokens) = lexer::tokenize(name) else {
        return false;
    };
    if tokens.len() != 2 {
        return false;
    }
    match &tokens[0].kind {
        TokenKind::Identifier(scanned) | TokenKind::ClassName(scanned) => scanned == name,
        TokenKind::Number(lit) => lit.raw == name,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn compact(text: &str) -> String {
        let doc = parse(text).unwrap();
        serialize_with_options(&doc, &SerializeOptions::compact()).unwrap()
    }

    #[test]
    fn test_compact_single_line() {
        assert_eq!(compact("{name = 'Ada', age = 36}"), "{name = 'Ada', age = 36}");
    }

    #[test]
    fn test_compact_omits_nulls() {
        assert_eq!(compact("{a = 1, b = null, c = undefined}"), "{a = 1}");
    }

    #[test]
    fn test_pretty_layout() {
        let doc = parse("{(Person) name = 'Ada'}").unwrap();
        let text = serialize(&doc).unwrap();
        assert_eq!(text, "{(Person)\n    name = $'Ada'\n}");
    }

    #[test]
    fn test_name_quoting_policy() {
        assert!(name_round_trips("name"));
        assert!(name_round_trips("2ndProperty"));
        assert!(name_round_trips("123"));
        assert!(name_round_trips("3.14"));
        assert!(!name_round_trips("has space"));
        assert!(!name_round_trips("true"));
        assert!(!name_round_trips("#tag"));
        assert!(!name_round_trips("a@b"));
        assert!(!name_round_trips("550e8400-e29b-41d4-a716-446655440000"));
    }

    #[test]
    fn test_quoted_name_emission() {
        assert_eq!(compact("{'has space' = 1}"), "{'has space' = 1}");
    }

    #[test]
    fn test_number_bases_preserved() {
        assert_eq!(compact("{h = 0xFF, b = 0b1010}"), "{h = 0xff, b = 0b1010}");
        let doc = parse("{h = 0xFF}").unwrap();
        let options = SerializeOptions::compact().with_preserved_number_bases(false);
        assert_eq!(serialize_with_options(&doc, &options).unwrap(), "{h = 255}");
    }

    #[test]
    fn test_whole_float_keeps_point() {
        assert_eq!(compact("{x = 1.0}"), "{x = 1.0}");
    }

    #[test]
    fn test_guid_casing() {
        let doc = parse("{id = 550E8400-E29B-41D4-A716-446655440000}").unwrap();
        let lower = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
        assert!(lower.contains("550e8400-e29b-41d4-a716-446655440000"));

        let options = SerializeOptions::compact().with_lowercase_guids(false);
        let upper = serialize_with_options(&doc, &options).unwrap();
        assert!(upper.contains("550E8400-E29B-41D4-A716-446655440000"));
    }

    #[test]
    fn test_date_always_hinted() {
        let doc = parse("{at = ^'2024-01-15T10:30:00Z'}").unwrap();
        let text = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
        assert_eq!(text, "{at = ^'2024-01-15T10:30:00Z'}");
    }

    #[test]
    fn test_sorted_properties() {
        let doc = parse("{b = 1, a = 2}").unwrap();
        let options = SerializeOptions::compact().with_sorted_properties(true);
        assert_eq!(serialize_with_options(&doc, &options).unwrap(), "{a = 2, b = 1}");
    }

    #[test]
    fn test_triple_quoted_emission() {
        let doc = parse("{text = 'line one\\nline two\\nline three'}").unwrap();
        let text = serialize(&doc).unwrap();
        assert!(text.contains("'''"), "{}", text);

        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed.get_string("/text"), Some("line one\nline two\nline three"));
    }

    #[test]
    fn test_indented_string_falls_back_to_escapes() {
        // Shared leading whitespace would be eaten by the dedent pass.
        let doc = parse("{text = '  a\\n  b'}").unwrap();
        let text = serialize(&doc).unwrap();
        assert!(!text.contains("'''"));
        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed.get_string("/text"), Some("  a\n  b"));
    }

    #[test]
    fn test_non_finite_float_fails() {
        let mut object = TonObject::new();
        object.set("x", TonValue::Float(f64::NAN));
        let doc = TonDocument::new(object);
        assert!(matches!(
            serialize_with_options(&doc, &SerializeOptions::compact()),
            Err(TonError::Serialize(_))
        ));
    }

    #[test]
    fn test_header_and_schema_emission() {
        let text = "#@ tonVersion = '1', @schema = 'types.ton'\n{(person) status = |active|}\n#! enum(status) [active, inactive]\n#! {(person) /status = enum:status(required)}";
        let doc = parse(text).unwrap();
        let out = serialize(&doc).unwrap();
        assert!(out.starts_with("#@ tonVersion = $'1', @schema = $'types.ton'\n"));
        assert!(out.contains("#! enum(status) [active, inactive]"));
        assert!(out.contains("#! {(person) /status = enum:status(required)}"));
    }

    #[test]
    fn test_enum_set_keyword_round_trips() {
        let text = "{(account) perms = |read|write|}\n#! enumSet(perms) [read, write, admin]\n#! {(account) /perms = enumSet:perms}";
        let doc = parse(text).unwrap();
        let out = serialize(&doc).unwrap();
        assert!(out.contains("#! enumSet(perms) [read, write, admin]"));
        let again = parse(&out).unwrap();
        let definition = &again.schemas().unwrap().enums()[0];
        assert!(definition.is_set());
    }

    #[test]
    fn test_at_prefix_option() {
        let doc = parse("{name = 'Ada'}").unwrap();
        let options = SerializeOptions::compact().with_at_prefix(true);
        assert_eq!(
            serialize_with_options(&doc, &options).unwrap(),
            "{@name = 'Ada'}"
        );
    }

    #[test]
    fn test_empty_object_and_array() {
        assert_eq!(compact("{a = {}, b = []}"), "{a = {}, b = []}");
    }
}
