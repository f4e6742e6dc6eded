//! Designated attribute keys
//!
//! Fixed per document format, not discovered at runtime.

/// Attribute whose values are indexed for cross-references
pub const DEFAULT_REFERENCE_KEY: &str = "ref";
/// Prefix that marks an attribute value as a followable reference
pub const DEFAULT_REFERENCE_PREFIX: &str = "OpaqueRef:";
/// Attribute preferred over the element name in labels
pub const DEFAULT_LABEL_KEY: &str = "name";
/// Attribute shown as a hint after a label
pub const DEFAULT_LABEL_HINT_KEY: &str = "name__label";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    pub reference_key: String,
    pub reference_prefix: String,
    pub label_key: String,
    pub label_hint_key: String,
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            reference_key: DEFAULT_REFERENCE_KEY.to_string(),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            label_key: DEFAULT_LABEL_KEY.to_string(),
            label_hint_key: DEFAULT_LABEL_HINT_KEY.to_string(),
        }
    }
}

impl Keys {
    pub fn with_reference_key(mut self, key: impl Into<String>) -> Self {
        self.reference_key = key.into();
        self
    }

    pub fn with_reference_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reference_prefix = prefix.into();
        self
    }

    /// Whether a consumer should offer to follow `value`
    #[inline]
    pub fn is_followable(&self, value: &str) -> bool {
        value.starts_with(&self.reference_prefix)
    }
}
