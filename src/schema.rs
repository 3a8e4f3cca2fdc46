//! Schema definitions for TON documents.
//!
//! A schema describes the expected shape of the data: which classes
//! exist, which properties they carry at which `/`-separated paths, and
//! the validation rules attached to each property. Schemas arrive either
//! inline (in `#!` blocks of the document itself) or as a separately
//! parsed collection handed to the validator.
//!
//! Class and enum lookups are case-insensitive, so `#! {Person ...}`
//! matches an object declared `(person)`.

use crate::value::TonValue;

/// The primitive type a schema property expects.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    String,
    Int,
    Float,
    Boolean,
    Guid,
    Date,
    /// Single enum value drawn from the named enum definition.
    Enum(String),
    /// Multi-value enum set drawn from the named enum definition.
    EnumSet(String),
    /// Array, optionally constrained to an element type.
    Array(Option<Box<BaseType>>),
}

impl BaseType {
    /// Parses a type name as written in a schema (`string`, `int`,
    /// `array:int`, `enum:status`, `enumSet:permissions`).
    pub fn parse(name: &str) -> Option<BaseType> {
        if let Some(rest) = name.strip_prefix("array:") {
            return Some(BaseType::Array(Some(Box::new(BaseType::parse(rest)?))));
        }
        if let Some(rest) = name.strip_prefix("enum:") {
            return Some(BaseType::Enum(rest.to_string()));
        }
        if let Some(rest) = name.strip_prefix("enumSet:") {
            return Some(BaseType::EnumSet(rest.to_string()));
        }
        match name {
            "string" => Some(BaseType::String),
            "int" => Some(BaseType::Int),
            "float" => Some(BaseType::Float),
            "boolean" | "bool" => Some(BaseType::Boolean),
            "guid" => Some(BaseType::Guid),
            "date" => Some(BaseType::Date),
            "array" => Some(BaseType::Array(None)),
            _ => None,
        }
    }

    /// Human-readable name used in validation messages.
    pub fn describe(&self) -> String {
        match self {
            BaseType::String => "string".to_string(),
            BaseType::Int => "int".to_string(),
            BaseType::Float => "float".to_string(),
            BaseType::Boolean => "boolean".to_string(),
            BaseType::Guid => "guid".to_string(),
            BaseType::Date => "date".to_string(),
            BaseType::Enum(name) => format!("enum:{}", name),
            BaseType::EnumSet(name) => format!("enumSet:{}", name),
            BaseType::Array(None) => "array".to_string(),
            BaseType::Array(Some(inner)) => format!("array:{}", inner.describe()),
        }
    }
}

/// Format constraint applied through the `format(...)` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Email,
    Url,
    Date,
    Guid,
}

impl FormatKind {
    pub fn parse(name: &str) -> Option<FormatKind> {
        match name {
            "email" => Some(FormatKind::Email),
            "url" => Some(FormatKind::Url),
            "date" => Some(FormatKind::Date),
            "guid" => Some(FormatKind::Guid),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            FormatKind::Email => "email",
            FormatKind::Url => "url",
            FormatKind::Date => "date",
            FormatKind::Guid => "guid",
        }
    }
}

/// A single validation rule attached to a schema property.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    /// Property must be present (missing is an error).
    Required,
    /// Property, when present, must not be `null`.
    NotNull,
    /// Minimum string length (characters).
    MinLength(usize),
    /// Maximum string length (characters).
    MaxLength(usize),
    /// Inclusive numeric lower bound.
    Min(f64),
    /// Inclusive numeric upper bound.
    Max(f64),
    /// Full-match regular expression on string values.
    Pattern(String),
    /// Well-known string format.
    Format(FormatKind),
    /// Minimum element count for arrays and enum sets.
    MinCount(usize),
    /// Maximum element count for arrays and enum sets.
    MaxCount(usize),
    /// Collection must have at least one element.
    NonEmpty,
    /// Collection elements must be pairwise distinct.
    Unique,
    /// Collection elements must be in ascending order.
    Sorted,
    /// Fallback value recorded for the property; not enforced, but kept
    /// so tooling can fill absent properties.
    Default(TonValue),
}

/// Schema entry for one property of a class: its path, expected type,
/// and the rules that constrain it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaProperty {
    path: String,
    base_type: BaseType,
    rules: Vec<ValidationRule>,
}

impl SchemaProperty {
    pub fn new(path: impl Into<String>, base_type: BaseType) -> Self {
        SchemaProperty {
            path: path.into(),
            base_type,
            rules: Vec::new(),
        }
    }

    pub fn with_rules(
        path: impl Into<String>,
        base_type: BaseType,
        rules: Vec<ValidationRule>,
    ) -> Self {
        SchemaProperty {
            path: path.into(),
            base_type,
            rules,
        }
    }

    /// The `/`-separated path of the property relative to its class
    /// (`/name`, `/address/city`, `/items/*`).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn base_type(&self) -> &BaseType {
        &self.base_type
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn add_rule(&mut self, rule: ValidationRule) {
        self.rules.push(rule);
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, ValidationRule::Required))
    }

    /// Whether a null value passes this property's rules.
    pub fn allows_null(&self) -> bool {
        !self.rules.iter().any(|r| matches!(r, ValidationRule::NotNull))
    }

    /// The recorded default value, if the property declares one.
    pub fn default_value(&self) -> Option<&TonValue> {
        self.rules.iter().find_map(|r| match r {
            ValidationRule::Default(value) => Some(value),
            _ => None,
        })
    }
}

/// Schema for one class: its name and the property entries keyed by path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassSchema {
    name: String,
    properties: Vec<SchemaProperty>,
}

impl ClassSchema {
    pub fn new(name: impl Into<String>) -> Self {
        ClassSchema {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_property(&mut self, property: SchemaProperty) {
        self.properties.push(property);
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    /// Looks up a property by its exact path.
    pub fn property(&self, path: &str) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.path == path)
    }
}

/// A named enum definition: the ordered list of allowed values.
///
/// Enum values in a document may be given by name (`|active|`) or by
/// zero-based index (`|0|`); the definition resolves both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDefinition {
    name: String,
    values: Vec<String>,
    is_set: bool,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        EnumDefinition {
            name: name.into(),
            values,
            is_set: false,
        }
    }

    /// Declares an `enumSet`: a value may combine several members.
    pub fn new_set(name: impl Into<String>, values: Vec<String>) -> Self {
        EnumDefinition {
            name: name.into(),
            values,
            is_set: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this was declared with the `enumSet` keyword.
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether `raw` names a member, case-insensitively.
    pub fn contains(&self, raw: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(raw))
    }

    /// Resolves a raw token (name or zero-based index) to the canonical
    /// member name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ton_format::EnumDefinition;
    ///
    /// let def = EnumDefinition::new("status", vec!["active".into(), "inactive".into()]);
    /// assert_eq!(def.resolve("ACTIVE"), Some("active"));
    /// assert_eq!(def.resolve("1"), Some("inactive"));
    /// assert_eq!(def.resolve("archived"), None);
    /// ```
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        if let Some(found) = self
            .values
            .iter()
            .find(|v| v.eq_ignore_ascii_case(raw))
        {
            return Some(found.as_str());
        }
        if raw.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = raw.parse::<usize>() {
                return self.values.get(index).map(String::as_str);
            }
        }
        None
    }

    /// Zero-based index of a member name, case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.values.iter().position(|v| v.eq_ignore_ascii_case(name))
    }
}

/// All schemas known for a document: class schemas plus enum definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaCollection {
    classes: Vec<ClassSchema>,
    enums: Vec<EnumDefinition>,
}

impl SchemaCollection {
    pub fn new() -> Self {
        SchemaCollection::default()
    }

    pub fn add_class(&mut self, schema: ClassSchema) {
        self.classes.push(schema);
    }

    pub fn add_enum(&mut self, definition: EnumDefinition) {
        self.enums.push(definition);
    }

    pub fn classes(&self) -> &[ClassSchema] {
        &self.classes
    }

    pub fn enums(&self) -> &[EnumDefinition] {
        &self.enums
    }

    /// Case-insensitive class lookup.
    pub fn class(&self, name: &str) -> Option<&ClassSchema> {
        self.classes
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive enum lookup.
    pub fn enum_definition(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.enums.is_empty()
    }

    /// Merges another collection into this one. Later classes and enums
    /// win on name collision.
    pub fn merge(&mut self, other: SchemaCollection) {
        for class in other.classes {
            self.classes
                .retain(|c| !c.name.eq_ignore_ascii_case(&class.name));
            self.classes.push(class);
        }
        for definition in other.enums {
            self.enums
                .retain(|e| !e.name.eq_ignore_ascii_case(&definition.name));
            self.enums.push(definition);
        }
    }
}
