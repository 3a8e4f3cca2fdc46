//! Parsed TON document: optional header, optional inline schemas, and
//! the root value.

use serde::ser::{Serialize, Serializer};

use crate::map::TonMap;
use crate::object::TonObject;
use crate::schema::SchemaCollection;
use crate::value::TonValue;

/// The `#@` header line of a document.
///
/// Reserved attributes (`tonVersion`, `@schema`) are exposed directly;
/// everything else lands in [`attributes`](TonHeader::attributes) in
/// source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TonHeader {
    ton_version: Option<String>,
    schema_file: Option<String>,
    attributes: TonMap,
}

impl TonHeader {
    pub fn new() -> Self {
        TonHeader::default()
    }

    pub fn ton_version(&self) -> Option<&str> {
        self.ton_version.as_deref()
    }

    pub fn set_ton_version(&mut self, version: impl Into<String>) {
        self.ton_version = Some(version.into());
    }

    /// The external schema file referenced by `@schema`, if any.
    pub fn schema_file(&self) -> Option<&str> {
        self.schema_file.as_deref()
    }

    pub fn set_schema_file(&mut self, file: impl Into<String>) {
        self.schema_file = Some(file.into());
    }

    pub fn attributes(&self) -> &TonMap {
        &self.attributes
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<TonValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&TonValue> {
        self.attributes.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.ton_version.is_none() && self.schema_file.is_none() && self.attributes.is_empty()
    }
}

/// A complete parsed document.
///
/// The root is usually an object, but a document may also consist of a
/// single array or bare scalar.
///
/// # Examples
///
/// ```rust
/// use ton_format::parse;
///
/// let doc = parse("{(Person) name = 'Ada', age = 36}").unwrap();
/// assert_eq!(doc.root_object().and_then(|o| o.class_name()), Some("Person"));
/// assert_eq!(doc.get_string("/name"), Some("Ada"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TonDocument {
    header: Option<TonHeader>,
    schemas: Option<SchemaCollection>,
    root: TonValue,
}

enum Resolved<'a> {
    Value(&'a TonValue),
    Object(&'a TonObject),
}

impl TonDocument {
    pub fn new(root: impl Into<TonValue>) -> Self {
        TonDocument {
            header: None,
            schemas: None,
            root: root.into(),
        }
    }

    pub fn header(&self) -> Option<&TonHeader> {
        self.header.as_ref()
    }

    pub fn set_header(&mut self, header: TonHeader) {
        self.header = Some(header);
    }

    /// Schemas parsed from inline `#!` blocks, if the document had any.
    pub fn schemas(&self) -> Option<&SchemaCollection> {
        self.schemas.as_ref()
    }

    pub fn set_schemas(&mut self, schemas: SchemaCollection) {
        self.schemas = Some(schemas);
    }

    pub fn root(&self) -> &TonValue {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut TonValue {
        &mut self.root
    }

    /// The root as an object, when it is one.
    pub fn root_object(&self) -> Option<&TonObject> {
        self.root.as_object()
    }

    pub fn root_object_mut(&mut self) -> Option<&mut TonObject> {
        match &mut self.root {
            TonValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Resolves a `/`-separated path against the document.
    ///
    /// Each segment is tried as a property name first, then as the class
    /// name of a child object (case-insensitively), then as a numeric
    /// index when the current value is an array. Returns `None` when the
    /// path is empty, leads nowhere, or ends on a nested child object
    /// rather than a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ton_format::parse;
    ///
    /// let doc = parse("{server = {ports = [80, 443]}}").unwrap();
    /// assert_eq!(doc.get_value("/server/ports/1").and_then(|v| v.as_integer()), Some(443));
    /// ```
    pub fn get_value(&self, path: &str) -> Option<&TonValue> {
        match self.resolve(path)? {
            Resolved::Value(value) => Some(value),
            Resolved::Object(_) => None,
        }
    }

    /// Like [`get_value`](TonDocument::get_value) but resolves to an
    /// object: either an object-valued property or a nested child
    /// addressed by class name. The empty path resolves to the root
    /// object.
    pub fn get_object(&self, path: &str) -> Option<&TonObject> {
        if path.trim_matches('/').is_empty() {
            return self.root_object();
        }
        match self.resolve(path)? {
            Resolved::Value(TonValue::Object(object)) => Some(object),
            Resolved::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get_value(path).and_then(TonValue::as_str)
    }

    pub fn get_integer(&self, path: &str) -> Option<i64> {
        self.get_value(path).and_then(TonValue::as_integer)
    }

    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get_value(path).and_then(TonValue::as_float)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_value(path).and_then(TonValue::as_bool)
    }

    fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        let mut current = Resolved::Value(&self.root);
        for segment in trimmed.split('/') {
            current = match current {
                Resolved::Object(object) => step_object(object, segment)?,
                Resolved::Value(TonValue::Object(object)) => step_object(object, segment)?,
                Resolved::Value(TonValue::Array(items)) => {
                    let index: usize = segment.parse().ok()?;
                    Resolved::Value(items.get(index)?)
                }
                Resolved::Value(_) => return None,
            };
        }
        Some(current)
    }
}

fn step_object<'a>(object: &'a TonObject, segment: &str) -> Option<Resolved<'a>> {
    if let Some(value) = object.get(segment) {
        return Some(Resolved::Value(value));
    }
    object
        .children()
        .iter()
        .find(|child| {
            child
                .class_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(segment))
        })
        .map(Resolved::Object)
}

impl Serialize for TonDocument {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TonDocument {
        let mut address = TonObject::with_class("Address");
        address.set("city", "Athens");

        let mut root = TonObject::with_class("Person");
        root.set("name", "Ada");
        root.set("scores", TonValue::Array(vec![1.into(), 2.into(), 3.into()]));
        root.add_child(address);
        TonDocument::new(root)
    }

    #[test]
    fn test_path_lookup() {
        let doc = sample();
        assert_eq!(doc.get_string("/name"), Some("Ada"));
        assert_eq!(doc.get_string("name"), Some("Ada"));
        assert_eq!(doc.get_integer("/scores/2"), Some(3));
        assert_eq!(doc.get_value("/missing"), None);
        assert_eq!(doc.get_value(""), None);
    }

    #[test]
    fn test_child_lookup_by_class_name() {
        let doc = sample();
        assert_eq!(doc.get_string("/Address/city"), Some("Athens"));
        assert_eq!(doc.get_string("/address/city"), Some("Athens"));
        assert!(doc.get_object("/Address").is_some());
        // A child object is not itself a value.
        assert_eq!(doc.get_value("/Address"), None);
    }

    #[test]
    fn test_scalar_root() {
        let doc = TonDocument::new(42);
        assert_eq!(doc.root().as_integer(), Some(42));
        assert!(doc.root_object().is_none());
        assert_eq!(doc.get_value("/anything"), None);
    }

    #[test]
    fn test_header_attributes() {
        let mut header = TonHeader::new();
        header.set_ton_version("1");
        header.set_attribute("author", "tools-team");
        assert_eq!(header.ton_version(), Some("1"));
        assert_eq!(
            header.attribute("author").and_then(TonValue::as_str),
            Some("tools-team")
        );
        assert!(!header.is_empty());
    }
}
