//! Schema validator.
//!
//! Walks a document against a [`SchemaCollection`] and collects every
//! violation into a [`ValidationResult`]; validation never stops at the
//! first failure. Objects are matched to class schemas by their
//! `className` (case-insensitively), and child objects are validated
//! recursively against their own class names.

use std::cmp::Ordering;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::document::TonDocument;
use crate::object::TonObject;
use crate::schema::{BaseType, FormatKind, SchemaCollection, SchemaProperty, ValidationRule};
use crate::value::TonValue;

/// Depth guard against hand-built pathological trees; parsed documents
/// are already bounded by the parser's own limit.
const MAX_VALIDATION_DEPTH: usize = 500;

/// A single schema violation: the resolved path it occurred at and a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

/// The outcome of validating a document: valid, or a list of every
/// violation found.
///
/// # Examples
///
/// ```rust
/// use ton_format::{parse, validate};
///
/// let doc = parse("{(person) age = 200}\n#! {(person) /name = string(required), /age = int(min(0), max(150))}").unwrap();
/// let result = validate(&doc);
/// assert!(!result.is_valid());
/// assert_eq!(result.errors().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validates a document against its own inline schemas. A document
/// without schemas is trivially valid.
pub fn validate(document: &TonDocument) -> ValidationResult {
    match document.schemas() {
        Some(schemas) => validate_with_schemas(document, schemas),
        None => ValidationResult::valid(),
    }
}

/// Validates a document against an explicit schema collection,
/// ignoring any inline schemas the document carries.
pub fn validate_with_schemas(
    document: &TonDocument,
    schemas: &SchemaCollection,
) -> ValidationResult {
    let mut validator = Validator {
        schemas,
        result: ValidationResult::valid(),
    };
    validator.check_value(document.root(), "", 0);
    validator.result
}

struct Validator<'a> {
    schemas: &'a SchemaCollection,
    result: ValidationResult,
}

/// Outcome of resolving one schema path against one object.
enum Resolution<'a> {
    Found(String, &'a TonValue),
    Missing(String),
}

impl<'a> Validator<'a> {
    fn check_value(&mut self, value: &TonValue, base_path: &str, depth: usize) {
        if depth > MAX_VALIDATION_DEPTH {
            self.result.push(base_path, "Maximum nesting depth exceeded");
            return;
        }
        match value {
            TonValue::Object(object) => self.check_object(object, base_path, depth),
            TonValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let path = format!("{}/{}", base_path, index);
                    self.check_value(item, &path, depth + 1);
                }
            }
            _ => {}
        }
    }

    fn check_object(&mut self, object: &TonObject, base_path: &str, depth: usize) {
        let schemas = self.schemas;
        if let Some(class) = object.class_name().and_then(|name| schemas.class(name)) {
            for property in class.properties() {
                self.check_property(object, property, base_path);
            }
        }

        // Recurse into object-valued properties so nested class-tagged
        // objects get their own pass.
        for (name, value) in object.properties().iter() {
            let path = format!("{}/{}", base_path, name);
            self.check_value(value, &path, depth + 1);
        }
        for child in object.children() {
            let label = child.class_name().unwrap_or("(anonymous)");
            let path = format!("{}/{}", base_path, label);
            self.check_object(child, &path, depth + 1);
        }
    }

    fn check_property(&mut self, object: &TonObject, property: &SchemaProperty, base_path: &str) {
        let segments: Vec<&str> = property.path().trim_matches('/').split('/').collect();
        let mut matches = Vec::new();
        collect_matches(object, &segments, base_path, &mut matches);

        let required = property.is_required();
        for resolution in matches {
            match resolution {
                Resolution::Missing(path) => {
                    if required {
                        self.result.push(path, "Required property missing");
                    }
                }
                Resolution::Found(path, value) => {
                    self.check_rules(value, property, &path);
                }
            }
        }
    }

    fn check_rules(&mut self, value: &TonValue, property: &SchemaProperty, path: &str) {
        for rule in property.rules() {
            if let ValidationRule::NotNull = rule {
                if value.is_null() {
                    self.result.push(path, "Value must not be null");
                }
            }
        }

        // Null and undefined satisfy the type when allowed; the NotNull
        // rule above is the only thing that constrains them.
        if value.is_null() || value.is_undefined() {
            return;
        }

        self.check_type(value, property.base_type(), path);

        for rule in property.rules() {
            match rule {
                ValidationRule::Required
                | ValidationRule::NotNull
                | ValidationRule::Default(_) => {}
                ValidationRule::MinLength(min) => {
                    if let Some(s) = value.as_str() {
                        if s.chars().count() < *min {
                            self.result.push(
                                path,
                                format!("String is shorter than minimum length {}", min),
                            );
                        }
                    }
                }
                ValidationRule::MaxLength(max) => {
                    if let Some(s) = value.as_str() {
                        if s.chars().count() > *max {
                            self.result.push(
                                path,
                                format!("String is longer than maximum length {}", max),
                            );
                        }
                    }
                }
                ValidationRule::Min(min) => {
                    if let Some(n) = value.as_float() {
                        if n < *min {
                            self.result
                                .push(path, format!("Value is below minimum {}", min));
                        }
                    }
                }
                ValidationRule::Max(max) => {
                    if let Some(n) = value.as_float() {
                        if n > *max {
                            self.result
                                .push(path, format!("Value is above maximum {}", max));
                        }
                    }
                }
                ValidationRule::Pattern(pattern) => {
                    if let Some(s) = value.as_str() {
                        self.check_pattern(s, pattern, path);
                    }
                }
                ValidationRule::Format(kind) => {
                    if let Some(s) = value.as_str() {
                        if !matches_format(s, *kind) {
                            self.result.push(
                                path,
                                format!("Value does not match format '{}'", kind.describe()),
                            );
                        }
                    }
                }
                ValidationRule::MinCount(min) => {
                    if let Some(count) = collection_len(value) {
                        if count < *min {
                            self.result.push(
                                path,
                                format!("Collection has fewer than {} elements", min),
                            );
                        }
                    }
                }
                ValidationRule::MaxCount(max) => {
                    if let Some(count) = collection_len(value) {
                        if count > *max {
                            self.result.push(
                                path,
                                format!("Collection has more than {} elements", max),
                            );
                        }
                    }
                }
                ValidationRule::NonEmpty => {
                    if collection_len(value) == Some(0) {
                        self.result.push(path, "Collection must not be empty");
                    }
                }
                ValidationRule::Unique => {
                    if let TonValue::Array(items) = value {
                        if !all_unique(items) {
                            self.result.push(path, "Array elements must be unique");
                        }
                    }
                }
                ValidationRule::Sorted => {
                    if let TonValue::Array(items) = value {
                        if !is_sorted(items) {
                            self.result
                                .push(path, "Array elements must be in ascending order");
                        }
                    }
                }
            }
        }
    }

    fn check_pattern(&mut self, text: &str, pattern: &str, path: &str) {
        // Full-text match: the pattern is anchored on both ends.
        match Regex::new(&format!("^(?:{})$", pattern)) {
            Ok(regex) => {
                if !regex.is_match(text) {
                    self.result
                        .push(path, format!("Value does not match pattern '{}'", pattern));
                }
            }
            Err(_) => {
                self.result
                    .push(path, format!("Invalid pattern '{}'", pattern));
            }
        }
    }

    fn check_type(&mut self, value: &TonValue, expected: &BaseType, path: &str) {
        match expected {
            BaseType::Enum(name) => self.check_enum(value, name, false, path),
            BaseType::EnumSet(name) => self.check_enum(value, name, true, path),
            BaseType::Array(element) => match value {
                TonValue::Array(items) => {
                    if let Some(element) = element {
                        for (index, item) in items.iter().enumerate() {
                            let item_path = format!("{}/{}", path, index);
                            self.check_type(item, element, &item_path);
                        }
                    }
                }
                _ => self.push_type_mismatch(expected, value, path),
            },
            _ => {
                let ok = match expected {
                    BaseType::String => value.is_string(),
                    BaseType::Int => value.is_integer(),
                    // An integer is an acceptable float.
                    BaseType::Float => value.is_float() || value.is_integer(),
                    BaseType::Boolean => value.is_boolean(),
                    BaseType::Guid => value.is_guid(),
                    BaseType::Date => value.is_date(),
                    _ => unreachable!(),
                };
                if !ok {
                    self.push_type_mismatch(expected, value, path);
                }
            }
        }
    }

    fn check_enum(&mut self, value: &TonValue, enum_name: &str, set: bool, path: &str) {
        let schemas = self.schemas;
        let Some(definition) = schemas.enum_definition(enum_name) else {
            self.result
                .push(path, format!("Unknown enum '{}'", enum_name));
            return;
        };
        match (set, value) {
            (false, TonValue::Enum(member)) => {
                if definition.resolve(member.raw()).is_none() {
                    self.result.push(
                        path,
                        format!(
                            "Unknown enum value '{}' for enum '{}'",
                            member.raw(),
                            enum_name
                        ),
                    );
                }
            }
            (true, TonValue::EnumSet(members)) => {
                for member in members {
                    if definition.resolve(member).is_none() {
                        self.result.push(
                            path,
                            format!("Unknown enum value '{}' for enum '{}'", member, enum_name),
                        );
                    }
                }
            }
            _ => {
                let expected = if set {
                    BaseType::EnumSet(enum_name.to_string())
                } else {
                    BaseType::Enum(enum_name.to_string())
                };
                self.push_type_mismatch(&expected, value, path);
            }
        }
    }

    fn push_type_mismatch(&mut self, expected: &BaseType, value: &TonValue, path: &str) {
        self.result.push(
            path,
            format!(
                "Type mismatch: expected {}, found {}",
                expected.describe(),
                value.kind_name()
            ),
        );
    }
}

/// Resolves a schema path against an object, expanding `*` wildcards
/// over array elements and object properties.
fn collect_matches<'a>(
    object: &'a TonObject,
    segments: &[&str],
    base_path: &str,
    out: &mut Vec<Resolution<'a>>,
) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if *head == "*" {
        for (name, value) in object.properties().iter() {
            let path = format!("{}/{}", base_path, name);
            descend(value, rest, &path, out);
        }
        return;
    }

    let path = format!("{}/{}", base_path, head);
    match object.get(head) {
        Some(value) => descend(value, rest, &path, out),
        // Report the full rule path, not just the segment that was
        // absent.
        None if rest.is_empty() => out.push(Resolution::Missing(path)),
        None => out.push(Resolution::Missing(format!("{}/{}", path, rest.join("/")))),
    }
}

fn descend<'a>(
    value: &'a TonValue,
    rest: &[&str],
    path: &str,
    out: &mut Vec<Resolution<'a>>,
) {
    if rest.is_empty() {
        out.push(Resolution::Found(path.to_string(), value));
        return;
    }
    match value {
        TonValue::Object(inner) => collect_matches(inner, rest, path, out),
        TonValue::Array(items) if rest[0] == "*" => {
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{}/{}", path, index);
                descend(item, &rest[1..], &item_path, out);
            }
        }
        _ => out.push(Resolution::Missing(format!("{}/{}", path, rest.join("/")))),
    }
}

fn collection_len(value: &TonValue) -> Option<usize> {
    match value {
        TonValue::Array(items) => Some(items.len()),
        TonValue::EnumSet(members) => Some(members.len()),
        TonValue::String(s) => Some(s.chars().count()),
        _ => None,
    }
}

fn all_unique(items: &[TonValue]) -> bool {
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if a == b {
                return false;
            }
        }
    }
    true
}

/// Non-decreasing under the element type's natural order. Incomparable
/// element pairs fail the rule.
fn is_sorted(items: &[TonValue]) -> bool {
    items
        .windows(2)
        .all(|pair| matches!(value_cmp(&pair[0], &pair[1]), Some(Ordering::Less | Ordering::Equal)))
}

fn value_cmp(a: &TonValue, b: &TonValue) -> Option<Ordering> {
    match (a, b) {
        (TonValue::String(x), TonValue::String(y)) => Some(x.cmp(y)),
        (TonValue::Boolean(x), TonValue::Boolean(y)) => Some(x.cmp(y)),
        (TonValue::Date(x), TonValue::Date(y)) => Some(x.cmp(y)),
        _ => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

fn matches_format(text: &str, kind: FormatKind) -> bool {
    match kind {
        FormatKind::Email => Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .map(|r| r.is_match(text))
            .unwrap_or(false),
        FormatKind::Url => Regex::new(r"^https?://\S+$")
            .map(|r| r.is_match(text))
            .unwrap_or(false),
        FormatKind::Date => {
            chrono::DateTime::parse_from_rfc3339(text).is_ok()
                || chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        }
        FormatKind::Guid => Uuid::parse_str(text).is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_document_without_schemas_is_valid() {
        let doc = parse("{a = 1}").unwrap();
        assert!(validate(&doc).is_valid());
    }

    #[test]
    fn test_aggregates_all_errors() {
        let doc = parse(
            "{(person) age = 200}\n#! {(person) /name = string(required), /age = int(min(0), max(150))}",
        )
        .unwrap();
        let result = validate(&doc);
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.errors()[0].path, "/name");
        assert_eq!(result.errors()[0].message, "Required property missing");
        assert_eq!(result.errors()[1].path, "/age");
    }

    #[test]
    fn test_enum_by_index_validates() {
        let doc = parse(
            "{(person) status = |1|}\n#! enum(status) [active, inactive]\n#! {(person) /status = enum:status}",
        )
        .unwrap();
        assert!(validate(&doc).is_valid());

        let doc = parse(
            "{(person) status = |archived|}\n#! enum(status) [active, inactive]\n#! {(person) /status = enum:status}",
        )
        .unwrap();
        let result = validate(&doc);
        assert!(!result.is_valid());
        assert!(result.errors()[0].message.contains("archived"));
    }

    #[test]
    fn test_type_mismatch() {
        let doc = parse("{(person) name = 7}\n#! {(person) /name = string}").unwrap();
        let result = validate(&doc);
        assert_eq!(
            result.errors()[0].message,
            "Type mismatch: expected string, found int"
        );
    }

    #[test]
    fn test_null_skips_type_check_but_not_notnull() {
        let doc = parse("{(person) name = null}\n#! {(person) /name = string}").unwrap();
        assert!(validate(&doc).is_valid());

        let doc = parse("{(person) name = null}\n#! {(person) /name = string(notNull)}").unwrap();
        let result = validate(&doc);
        assert_eq!(result.errors()[0].message, "Value must not be null");
    }

    #[test]
    fn test_array_rules() {
        let doc = parse(
            "{(box) items = [3, 1, 1]}\n#! {(box) /items = array:int(unique, sorted, minCount(2))}",
        )
        .unwrap();
        let result = validate(&doc);
        let messages: Vec<&str> = result.errors().iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"Array elements must be unique"));
        assert!(messages.contains(&"Array elements must be in ascending order"));
        assert_eq!(result.errors().len(), 2);
    }

    #[test]
    fn test_wildcard_path() {
        let doc = parse(
            "{(fleet) servers = [{port = 80}, {port = 99999}]}\n#! {(fleet) /servers/*/port = int(max(65535))}",
        )
        .unwrap();
        let result = validate(&doc);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "/servers/1/port");
    }

    #[test]
    fn test_nested_path_and_formats() {
        let doc = parse(
            "{(person) details = {email = 'not-an-email'}}\n#! {(person) /details/email = string(format(email))}",
        )
        .unwrap();
        let result = validate(&doc);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "/details/email");
    }

    #[test]
    fn test_missing_intermediate_segment_reports_full_path() {
        let doc = parse(
            "{(person) name = 'Ada'}\n#! {(person) /details/bio = string(required)}",
        )
        .unwrap();
        let result = validate(&doc);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "/details/bio");
    }

    #[test]
    fn test_pattern_full_match() {
        let doc = parse(
            "{(person) code = 'ab1'}\n#! {(person) /code = string(pattern('[a-z]+'))}",
        )
        .unwrap();
        let result = validate(&doc);
        assert!(!result.is_valid());

        let doc = parse(
            "{(person) code = 'abc'}\n#! {(person) /code = string(pattern('[a-z]+'))}",
        )
        .unwrap();
        assert!(validate(&doc).is_valid());
    }

    #[test]
    fn test_child_objects_validated_by_class() {
        let doc = parse(
            "{(company) name = 'x', {(person) age = -1}}\n#! {(person) /age = int(min(0))}",
        )
        .unwrap();
        let result = validate(&doc);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].path, "/person/age");
    }
}
