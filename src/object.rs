//! TON object model.
//!
//! A [`TonObject`] is an optionally class-tagged collection of ordered
//! properties plus a list of anonymous child objects (nested `{...}`
//! blocks written without a `name =` prefix). Children are distinct from
//! properties whose value happens to be an object.
//!
//! Objects own their subtree exclusively and hold no parent references,
//! so a parser-built tree can never contain a cycle.
//!
//! ## Examples
//!
//! ```rust
//! use ton_format::{TonObject, TonValue};
//!
//! let mut person = TonObject::with_class("Person");
//! person.set("name", "Alice");
//! person.set("age", 30);
//!
//! assert_eq!(person.class_name(), Some("Person"));
//! assert_eq!(person.get("age").and_then(|v| v.as_integer()), Some(30));
//! ```

use crate::map::TonMap;
use crate::value::TonValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An object: optional class name, optional instance count, ordered
/// properties, and anonymous child objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TonObject {
    class_name: Option<String>,
    instance_count: Option<i64>,
    properties: TonMap,
    children: Vec<TonObject>,
}

impl TonObject {
    /// Creates an empty object with no class name.
    #[must_use]
    pub fn new() -> Self {
        TonObject::default()
    }

    /// Creates an empty object tagged with a class name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ton_format::TonObject;
    ///
    /// let obj = TonObject::with_class("Server");
    /// assert_eq!(obj.class_name(), Some("Server"));
    /// ```
    #[must_use]
    pub fn with_class(class_name: impl Into<String>) -> Self {
        TonObject {
            class_name: Some(class_name.into()),
            ..Default::default()
        }
    }

    /// The class tag, if any (`{(Name) ...}`).
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Sets or clears the class tag.
    pub fn set_class_name(&mut self, class_name: Option<String>) {
        self.class_name = class_name;
    }

    /// The instance count, if any (`{(Name:N) ...}`).
    #[must_use]
    pub fn instance_count(&self) -> Option<i64> {
        self.instance_count
    }

    /// Sets or clears the instance count.
    pub fn set_instance_count(&mut self, count: Option<i64>) {
        self.instance_count = count;
    }

    /// Sets a property. Last assignment wins; the name keeps its original
    /// position in the insertion order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<TonValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Returns the property value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TonValue> {
        self.properties.get(key)
    }

    /// Returns `true` if the property exists (even if its value is null).
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Removes a property, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<TonValue> {
        self.properties.remove(key)
    }

    /// Property names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.properties.keys()
    }

    /// Number of properties (children not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the object has no properties and no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.children.is_empty()
    }

    /// The ordered property map.
    #[must_use]
    pub fn properties(&self) -> &TonMap {
        &self.properties
    }

    /// The ordered property map, mutably.
    pub fn properties_mut(&mut self) -> &mut TonMap {
        &mut self.properties
    }

    /// Appends an anonymous child object.
    pub fn add_child(&mut self, child: TonObject) {
        self.children.push(child);
    }

    /// The anonymous child objects, in document order.
    #[must_use]
    pub fn children(&self) -> &[TonObject] {
        &self.children
    }

    /// The anonymous child objects, mutably.
    pub fn children_mut(&mut self) -> &mut Vec<TonObject> {
        &mut self.children
    }
}

impl Serialize for TonObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let extra = usize::from(self.class_name.is_some())
            + usize::from(self.instance_count.is_some())
            + usize::from(!self.children.is_empty());
        let mut map = serializer.serialize_map(Some(self.properties.len() + extra))?;
        if let Some(class_name) = &self.class_name {
            map.serialize_entry("_className", class_name)?;
        }
        if let Some(count) = self.instance_count {
            map.serialize_entry("_instanceCount", &count)?;
        }
        for (key, value) in self.properties.iter() {
            map.serialize_entry(key, value)?;
        }
        if !self.children.is_empty() {
            map.serialize_entry("_children", &self.children)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut obj = TonObject::new();
        obj.set("name", "Alice");
        obj.set("name", "Bob");

        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Bob"));
    }

    #[test]
    fn test_children_are_not_properties() {
        let mut obj = TonObject::new();
        obj.set("inline", TonObject::with_class("Inline"));
        obj.add_child(TonObject::with_class("Child"));

        assert_eq!(obj.len(), 1);
        assert_eq!(obj.children().len(), 1);
        assert_eq!(obj.children()[0].class_name(), Some("Child"));
    }
}
