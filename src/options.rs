//! Configuration options for TON serialization.
//!
//! [`SerializeOptions`] controls every aspect of the emitted text:
//! indentation, header and schema emission, type hints, value omission,
//! quoting, and number/GUID casing. Two presets cover the common cases:
//!
//! - [`SerializeOptions::pretty`]: indented multi-line output with the
//!   header and type hints, nulls kept (the default)
//! - [`SerializeOptions::compact`]: a single line with no header, no
//!   hints, and nulls omitted
//!
//! ## Examples
//!
//! ```rust
//! use ton_format::{parse, serialize_with_options, SerializeOptions};
//!
//! let doc = parse("{name = 'Ada', note = null}").unwrap();
//!
//! let compact = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
//! assert_eq!(compact, "{name = 'Ada'}");
//! ```

/// Configuration options for TON serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOptions {
    /// Indentation unit for nested structures; `None` produces
    /// single-line output.
    pub indentation: Option<String>,
    /// Emit properties in alphabetical order instead of insertion order.
    pub sort_properties: bool,
    /// Emit the `#@` header line when the document carries one.
    pub include_header: bool,
    /// Emit trailing `#!` schema blocks when the document carries them.
    pub include_schema: bool,
    /// Emit `$ % &` type-hint markers before values. The `^` date hint
    /// is always emitted so dates survive a round trip.
    pub include_type_hints: bool,
    /// Prefix every property name with `@`.
    pub use_at_prefix: bool,
    /// Drop properties whose value is null.
    pub omit_nulls: bool,
    /// Drop properties whose value is undefined.
    pub omit_undefined: bool,
    /// Drop properties whose value is an empty array or enum set.
    pub omit_empty_collections: bool,
    /// Quote character for strings and quoted property names.
    pub quote_char: char,
    /// Use triple-quoted form for strings spanning at least
    /// [`multi_line_threshold`](Self::multi_line_threshold) lines.
    pub use_multi_line_strings: bool,
    /// Line count at which a string switches to triple-quoted form.
    pub multi_line_threshold: usize,
    /// Emit hex literals with lowercase digits.
    pub lowercase_hex: bool,
    /// Emit GUIDs with lowercase digits.
    pub lowercase_guids: bool,
    /// Emit enum values by canonical name rather than raw token.
    pub prefer_enum_names: bool,
    /// Keep the hex/binary notation an integer was parsed with.
    pub preserve_number_bases: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions::pretty()
    }
}

impl SerializeOptions {
    /// Pretty preset: indented output, header and schemas emitted, type
    /// hints on, nulls kept, insertion order preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ton_format::SerializeOptions;
    ///
    /// let options = SerializeOptions::pretty();
    /// assert_eq!(options.indentation.as_deref(), Some("    "));
    /// assert!(options.include_header);
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        SerializeOptions {
            indentation: Some("    ".to_string()),
            sort_properties: false,
            include_header: true,
            include_schema: true,
            include_type_hints: true,
            use_at_prefix: false,
            omit_nulls: false,
            omit_undefined: false,
            omit_empty_collections: false,
            quote_char: '\'',
            use_multi_line_strings: true,
            multi_line_threshold: 2,
            lowercase_hex: true,
            lowercase_guids: true,
            prefer_enum_names: true,
            preserve_number_bases: true,
        }
    }

    /// Compact preset: one line, no header or schemas, no type hints,
    /// nulls and undefineds omitted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ton_format::SerializeOptions;
    ///
    /// let options = SerializeOptions::compact();
    /// assert!(options.indentation.is_none());
    /// assert!(options.omit_nulls);
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        SerializeOptions {
            indentation: None,
            sort_properties: false,
            include_header: false,
            include_schema: false,
            include_type_hints: false,
            use_at_prefix: false,
            omit_nulls: true,
            omit_undefined: true,
            omit_empty_collections: false,
            quote_char: '\'',
            use_multi_line_strings: false,
            multi_line_threshold: 2,
            lowercase_hex: true,
            lowercase_guids: true,
            prefer_enum_names: true,
            preserve_number_bases: true,
        }
    }

    /// Whether output spreads over multiple indented lines.
    #[must_use]
    pub fn is_multi_line(&self) -> bool {
        self.indentation.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Sets the indentation unit. An empty string means single-line.
    #[must_use]
    pub fn with_indentation(mut self, indentation: impl Into<String>) -> Self {
        let indentation = indentation.into();
        self.indentation = if indentation.is_empty() {
            None
        } else {
            Some(indentation)
        };
        self
    }

    #[must_use]
    pub fn with_sorted_properties(mut self, sort: bool) -> Self {
        self.sort_properties = sort;
        self
    }

    #[must_use]
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, include: bool) -> Self {
        self.include_schema = include;
        self
    }

    #[must_use]
    pub fn with_type_hints(mut self, include: bool) -> Self {
        self.include_type_hints = include;
        self
    }

    #[must_use]
    pub fn with_at_prefix(mut self, use_prefix: bool) -> Self {
        self.use_at_prefix = use_prefix;
        self
    }

    #[must_use]
    pub fn with_omit_nulls(mut self, omit: bool) -> Self {
        self.omit_nulls = omit;
        self
    }

    #[must_use]
    pub fn with_omit_undefined(mut self, omit: bool) -> Self {
        self.omit_undefined = omit;
        self
    }

    #[must_use]
    pub fn with_omit_empty_collections(mut self, omit: bool) -> Self {
        self.omit_empty_collections = omit;
        self
    }

    #[must_use]
    pub fn with_quote_char(mut self, quote: char) -> Self {
        self.quote_char = quote;
        self
    }

    #[must_use]
    pub fn with_multi_line_strings(mut self, use_multi_line: bool, threshold: usize) -> Self {
        self.use_multi_line_strings = use_multi_line;
        self.multi_line_threshold = threshold.max(1);
        self
    }

    #[must_use]
    pub fn with_lowercase_hex(mut self, lowercase: bool) -> Self {
        self.lowercase_hex = lowercase;
        self
    }

    #[must_use]
    pub fn with_lowercase_guids(mut self, lowercase: bool) -> Self {
        self.lowercase_guids = lowercase;
        self
    }

    #[must_use]
    pub fn with_enum_names(mut self, prefer_names: bool) -> Self {
        self.prefer_enum_names = prefer_names;
        self
    }

    #[must_use]
    pub fn with_preserved_number_bases(mut self, preserve: bool) -> Self {
        self.preserve_number_bases = preserve;
        self
    }
}
