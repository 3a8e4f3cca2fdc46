//! Dynamic value representation for TON data.
//!
//! This module provides the [`TonValue`] enum, the closed sum type at the
//! heart of the engine. Every parsed literal, array, and nested object is
//! a `TonValue`; the serializer, validator, and path lookup all walk it.
//!
//! ## Core Types
//!
//! - [`TonValue`]: any TON value (string, integer, float, boolean, null,
//!   undefined, GUID, date, enum, enum set, array, object)
//! - [`EnumValue`]: an enum reference by name or zero-based index, with
//!   the schema-resolved name once known
//! - [`IntegerBase`]: the lexical origin of an integer literal (decimal,
//!   hex, binary), kept for serialization fidelity only
//!
//! ## Usage Patterns
//!
//! ```rust
//! use ton_format::TonValue;
//!
//! let value = TonValue::from(42);
//! assert!(value.is_integer());
//! assert_eq!(value.as_integer(), Some(42));
//!
//! let text = TonValue::from("hello");
//! assert_eq!(text.as_str(), Some("hello"));
//! ```
//!
//! Equality on `TonValue` is semantic: it ignores [`IntegerBase`] (so
//! `0xFF` equals `255`) and compares enum references by their canonical
//! name. This is the equality the round-trip guarantee is stated in.

use crate::object::TonObject;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use uuid::Uuid;

/// Lexical base of an integer literal. Preserved so `0xFF` can serialize
/// back as hex when the serializer is told to keep number bases; never
/// part of value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerBase {
    #[default]
    Decimal,
    Hex,
    Binary,
}

/// Type-hint markers: one reserved character each, preceding the value
/// they annotate. Purely a serialization-style concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    /// `$`: string
    String,
    /// `%`: number
    Number,
    /// `&`: GUID
    Guid,
    /// `^`: date or array
    Date,
}

impl TypeHint {
    /// The marker character for this hint.
    #[must_use]
    pub const fn marker(&self) -> char {
        match self {
            TypeHint::String => '$',
            TypeHint::Number => '%',
            TypeHint::Guid => '&',
            TypeHint::Date => '^',
        }
    }
}

/// An enum or enum-set member reference.
///
/// TON writes enum values as `|name|` or `|index|`; which enum they draw
/// from is only known once a schema is attached, so the reference keeps
/// the raw spelling and, after resolution, the declared name.
///
/// # Examples
///
/// ```rust
/// use ton_format::EnumValue;
///
/// let mut level = EnumValue::new("1");
/// assert_eq!(level.canonical(), "1");
///
/// level.set_resolved("warning");
/// assert_eq!(level.canonical(), "warning");
/// assert_eq!(level.raw(), "1");
/// ```
#[derive(Debug, Clone, Eq)]
pub struct EnumValue {
    raw: String,
    resolved: Option<String>,
}

impl EnumValue {
    /// Creates an unresolved enum reference from its literal spelling.
    pub fn new(raw: impl Into<String>) -> Self {
        EnumValue {
            raw: raw.into(),
            resolved: None,
        }
    }

    /// The spelling as written: a name or a zero-based index.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The schema-declared name, once resolved.
    #[must_use]
    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// The resolved name if known, otherwise the raw spelling.
    #[must_use]
    pub fn canonical(&self) -> &str {
        self.resolved.as_deref().unwrap_or(&self.raw)
    }

    /// Records the schema-declared name for this reference.
    pub fn set_resolved(&mut self, name: impl Into<String>) {
        self.resolved = Some(name.into());
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl From<&str> for EnumValue {
    fn from(raw: &str) -> Self {
        EnumValue::new(raw)
    }
}

/// A dynamically-typed representation of any valid TON value.
///
/// Arrays are heterogeneous; nesting depth is unbounded except where the
/// parser's `max_nesting_depth` (or the serializer/validator depth guard)
/// applies. Objects own their subtree outright: there are no parent
/// pointers and no way to construct a cycle.
///
/// # Examples
///
/// ```rust
/// use ton_format::TonValue;
///
/// let null = TonValue::Null;
/// let num = TonValue::from(42);
/// let text = TonValue::from("hello");
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Debug, Clone, Default)]
pub enum TonValue {
    String(String),
    Integer {
        value: i64,
        base: IntegerBase,
    },
    Float(f64),
    Boolean(bool),
    #[default]
    Null,
    Undefined,
    Guid(Uuid),
    Date(DateTime<Utc>),
    Enum(EnumValue),
    EnumSet(Vec<String>),
    Array(Vec<TonValue>),
    Object(TonObject),
}

impl TonValue {
    /// Creates an integer value with a recorded lexical base.
    #[must_use]
    pub const fn integer(value: i64, base: IntegerBase) -> Self {
        TonValue::Integer { value, base }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, TonValue::Null)
    }

    /// Returns `true` if the value is undefined.
    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, TonValue::Undefined)
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, TonValue::String(_))
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, TonValue::Integer { .. })
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, TonValue::Float(_))
    }

    /// Returns `true` if the value is an integer or a float.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, TonValue::Integer { .. } | TonValue::Float(_))
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, TonValue::Boolean(_))
    }

    /// Returns `true` if the value is a GUID.
    #[inline]
    #[must_use]
    pub const fn is_guid(&self) -> bool {
        matches!(self, TonValue::Guid(_))
    }

    /// Returns `true` if the value is a date.
    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, TonValue::Date(_))
    }

    /// Returns `true` if the value is an enum reference.
    #[inline]
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, TonValue::Enum(_))
    }

    /// Returns `true` if the value is an enum set.
    #[inline]
    #[must_use]
    pub const fn is_enum_set(&self) -> bool {
        matches!(self, TonValue::EnumSet(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, TonValue::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, TonValue::Object(_))
    }

    /// If the value is a string, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TonValue::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// If the value is numeric, returns it as `f64`. Otherwise `None`.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TonValue::Integer { value, .. } => Some(*value as f64),
            TonValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a GUID, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_guid(&self) -> Option<&Uuid> {
        match self {
            TonValue::Guid(g) => Some(g),
            _ => None,
        }
    }

    /// If the value is a date, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            TonValue::Date(dt) => Some(dt),
            _ => None,
        }
    }

    /// If the value is an enum reference, returns it. Otherwise `None`.
    #[inline]
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            TonValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// If the value is an array, returns its elements. Otherwise `None`.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<TonValue>> {
        match self {
            TonValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&TonObject> {
        match self {
            TonValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// If the value is an object, returns it mutably. Otherwise `None`.
    pub fn as_object_mut(&mut self) -> Option<&mut TonObject> {
        match self {
            TonValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Runtime kind name, as used in validator messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TonValue::String(_) => "string",
            TonValue::Integer { .. } => "int",
            TonValue::Float(_) => "float",
            TonValue::Boolean(_) => "boolean",
            TonValue::Null => "null",
            TonValue::Undefined => "undefined",
            TonValue::Guid(_) => "guid",
            TonValue::Date(_) => "date",
            TonValue::Enum(_) => "enum",
            TonValue::EnumSet(_) => "enumSet",
            TonValue::Array(_) => "array",
            TonValue::Object(_) => "object",
        }
    }

    /// The type hint the serializer would place before this value, if any.
    #[must_use]
    pub const fn type_hint(&self) -> Option<TypeHint> {
        match self {
            TonValue::String(_) => Some(TypeHint::String),
            TonValue::Integer { .. } | TonValue::Float(_) => Some(TypeHint::Number),
            TonValue::Guid(_) => Some(TypeHint::Guid),
            TonValue::Date(_) | TonValue::Array(_) => Some(TypeHint::Date),
            _ => None,
        }
    }
}

// Semantic equality: integer base is spelling, enum references compare by
// canonical name. Everything else is structural.
impl PartialEq for TonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TonValue::String(a), TonValue::String(b)) => a == b,
            (TonValue::Integer { value: a, .. }, TonValue::Integer { value: b, .. }) => a == b,
            (TonValue::Float(a), TonValue::Float(b)) => a == b,
            (TonValue::Boolean(a), TonValue::Boolean(b)) => a == b,
            (TonValue::Null, TonValue::Null) => true,
            (TonValue::Undefined, TonValue::Undefined) => true,
            (TonValue::Guid(a), TonValue::Guid(b)) => a == b,
            (TonValue::Date(a), TonValue::Date(b)) => a == b,
            (TonValue::Enum(a), TonValue::Enum(b)) => a == b,
            (TonValue::EnumSet(a), TonValue::EnumSet(b)) => a == b,
            (TonValue::Array(a), TonValue::Array(b)) => a == b,
            (TonValue::Object(a), TonValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TonValue::String(s) => write!(f, "{}", s),
            TonValue::Integer { value, .. } => write!(f, "{}", value),
            TonValue::Float(fl) => write!(f, "{}", fl),
            TonValue::Boolean(b) => write!(f, "{}", b),
            TonValue::Null => write!(f, "null"),
            TonValue::Undefined => write!(f, "undefined"),
            TonValue::Guid(g) => write!(f, "{}", g),
            TonValue::Date(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TonValue::Enum(e) => write!(f, "|{}|", e.canonical()),
            TonValue::EnumSet(names) => write!(f, "|{}|", names.join("|")),
            TonValue::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            TonValue::Object(_) => write!(f, "{{object}}"),
        }
    }
}

// Serde export so callers can push documents and validation reports
// through serde-based tooling. Deliberately serialization-only: reading
// other formats back into TON is out of scope.
impl Serialize for TonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TonValue::String(s) => serializer.serialize_str(s),
            TonValue::Integer { value, .. } => serializer.serialize_i64(*value),
            TonValue::Float(f) => serializer.serialize_f64(*f),
            TonValue::Boolean(b) => serializer.serialize_bool(*b),
            TonValue::Null | TonValue::Undefined => serializer.serialize_unit(),
            TonValue::Guid(g) => serializer.serialize_str(&g.to_string()),
            TonValue::Date(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TonValue::Enum(e) => serializer.serialize_str(e.canonical()),
            TonValue::EnumSet(names) => {
                let mut seq = serializer.serialize_seq(Some(names.len()))?;
                for name in names {
                    seq.serialize_element(name)?;
                }
                seq.end()
            }
            TonValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            TonValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl From<bool> for TonValue {
    fn from(value: bool) -> Self {
        TonValue::Boolean(value)
    }
}

impl From<i32> for TonValue {
    fn from(value: i32) -> Self {
        TonValue::integer(value as i64, IntegerBase::Decimal)
    }
}

impl From<i64> for TonValue {
    fn from(value: i64) -> Self {
        TonValue::integer(value, IntegerBase::Decimal)
    }
}

impl From<u32> for TonValue {
    fn from(value: u32) -> Self {
        TonValue::integer(value as i64, IntegerBase::Decimal)
    }
}

impl From<f64> for TonValue {
    fn from(value: f64) -> Self {
        TonValue::Float(value)
    }
}

impl From<&str> for TonValue {
    fn from(value: &str) -> Self {
        TonValue::String(value.to_string())
    }
}

impl From<String> for TonValue {
    fn from(value: String) -> Self {
        TonValue::String(value)
    }
}

impl From<Uuid> for TonValue {
    fn from(value: Uuid) -> Self {
        TonValue::Guid(value)
    }
}

impl From<DateTime<Utc>> for TonValue {
    fn from(value: DateTime<Utc>) -> Self {
        TonValue::Date(value)
    }
}

impl From<Vec<TonValue>> for TonValue {
    fn from(value: Vec<TonValue>) -> Self {
        TonValue::Array(value)
    }
}

impl From<TonObject> for TonValue {
    fn from(value: TonObject) -> Self {
        TonValue::Object(value)
    }
}
