//! Keys: named tree nodes with a value, metadata, order and comments.

use std::collections::BTreeMap;

use crate::{Comments, KeyName, array_index};

/// Metadata attribute names.
pub mod meta {
    /// Value type (see [`ValueType`](super::ValueType)).
    pub const TYPE: &str = "type";
    /// TOML syntax the value came from (see [`TomlType`](super::TomlType)).
    pub const TOML_TYPE: &str = "tomltype";
    /// Source spelling, present when it differs from the stored value.
    pub const ORIG_VALUE: &str = "origvalue";
    /// Array marker: empty on a fresh array, else the last element index.
    pub const ARRAY: &str = "array";
    /// Present on keys holding a binary value.
    pub const BINARY: &str = "binary";
}

/// The value stored in a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    /// Text value.
    String(String),
    /// Binary value; empty for an explicit null.
    Binary(Vec<u8>),
}

/// Value of the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    LongLong,
    UnsignedLongLong,
    Double,
    String,
    Binary,
}

impl ValueType {
    /// Attribute spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::LongLong => "long_long",
            ValueType::UnsignedLongLong => "unsigned_long_long",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Binary => "binary",
        }
    }

    /// Parse an attribute spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => ValueType::Boolean,
            "long_long" => ValueType::LongLong,
            "unsigned_long_long" => ValueType::UnsignedLongLong,
            "double" => ValueType::Double,
            "string" => ValueType::String,
            "binary" => ValueType::Binary,
            _ => return None,
        })
    }
}

/// Value of the `tomltype` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TomlType {
    StringBasic,
    StringMlBasic,
    StringLiteral,
    StringMlLiteral,
    SimpleTable,
    TableArray,
    InlineTable,
}

impl TomlType {
    /// Attribute spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            TomlType::StringBasic => "string_basic",
            TomlType::StringMlBasic => "string_ml_basic",
            TomlType::StringLiteral => "string_literal",
            TomlType::StringMlLiteral => "string_ml_literal",
            TomlType::SimpleTable => "simpletable",
            TomlType::TableArray => "tablearray",
            TomlType::InlineTable => "inlinetable",
        }
    }

    /// Parse an attribute spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string_basic" => TomlType::StringBasic,
            "string_ml_basic" => TomlType::StringMlBasic,
            "string_literal" => TomlType::StringLiteral,
            "string_ml_literal" => TomlType::StringMlLiteral,
            "simpletable" => TomlType::SimpleTable,
            "tablearray" => TomlType::TableArray,
            "inlinetable" => TomlType::InlineTable,
            _ => return None,
        })
    }
}

/// A node of the key tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    name: KeyName,
    value: Option<KeyValue>,
    meta: BTreeMap<String, String>,
    order: Option<u64>,
    comments: Comments,
}

impl Key {
    /// Create a key without value or metadata.
    pub fn new(name: KeyName) -> Self {
        Self {
            name,
            value: None,
            meta: BTreeMap::new(),
            order: None,
            comments: Comments::default(),
        }
    }

    pub fn name(&self) -> &KeyName {
        &self.name
    }

    /// Mutable access to the name, for building a key segment by segment.
    pub fn name_mut(&mut self) -> &mut KeyName {
        &mut self.name
    }

    pub fn value(&self) -> Option<&KeyValue> {
        self.value.as_ref()
    }

    /// The value if it is a string.
    pub fn string(&self) -> Option<&str> {
        match &self.value {
            Some(KeyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set_string(&mut self, value: impl Into<String>) {
        self.meta.remove(meta::BINARY);
        self.value = Some(KeyValue::String(value.into()));
    }

    /// Store a binary value and mark the key binary.
    pub fn set_binary(&mut self, value: Vec<u8>) {
        self.meta.insert(meta::BINARY.to_string(), String::new());
        self.value = Some(KeyValue::Binary(value));
    }

    pub fn is_binary(&self) -> bool {
        self.meta.contains_key(meta::BINARY)
    }

    /// Look up a metadata attribute.
    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    pub fn set_meta(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(name.into(), value.into());
    }

    pub fn remove_meta(&mut self, name: &str) -> Option<String> {
        self.meta.remove(name)
    }

    /// All metadata attributes in name order.
    pub fn meta_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.meta.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.meta(meta::TYPE).and_then(ValueType::from_name)
    }

    pub fn set_value_type(&mut self, ty: ValueType) {
        self.set_meta(meta::TYPE, ty.as_str());
    }

    pub fn toml_type(&self) -> Option<TomlType> {
        self.meta(meta::TOML_TYPE).and_then(TomlType::from_name)
    }

    pub fn set_toml_type(&mut self, ty: TomlType) {
        self.set_meta(meta::TOML_TYPE, ty.as_str());
    }

    pub fn is_table_array(&self) -> bool {
        self.toml_type() == Some(TomlType::TableArray)
    }

    pub fn orig_value(&self) -> Option<&str> {
        self.meta(meta::ORIG_VALUE)
    }

    /// Record `orig` as the source spelling if it differs from the string value.
    pub fn set_orig_value_if_different(&mut self, orig: &str) {
        if self.string() != Some(orig) {
            self.set_meta(meta::ORIG_VALUE, orig);
        }
    }

    /// The array marker: `Some("")` on an array without elements.
    pub fn array_marker(&self) -> Option<&str> {
        self.meta(meta::ARRAY)
    }

    /// Mark the key as an array without elements.
    pub fn mark_array(&mut self) {
        self.set_meta(meta::ARRAY, "");
    }

    /// Record `index` as the array's last element.
    pub fn set_array_last(&mut self, index: usize) {
        self.set_meta(meta::ARRAY, array_index(index));
    }

    pub fn order(&self) -> Option<u64> {
        self.order
    }

    pub fn set_order(&mut self, order: u64) {
        self.order = Some(order);
    }

    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Comments {
        &mut self.comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_typed_meta() {
        let mut key = Key::new(KeyName::parse("user:/a"));
        key.set_value_type(ValueType::UnsignedLongLong);
        key.set_toml_type(TomlType::TableArray);
        assert_eq!(key.meta("type"), Some("unsigned_long_long"));
        assert_eq!(key.value_type(), Some(ValueType::UnsignedLongLong));
        assert!(key.is_table_array());

        key.set_meta("tomltype", "bogus");
        assert_eq!(key.toml_type(), None);
    }

    #[test]
    fn test_orig_value_only_when_different() {
        let mut key = Key::new(KeyName::parse("user:/a"));
        key.set_string("26");
        key.set_orig_value_if_different("26");
        assert_eq!(key.orig_value(), None);
        key.set_orig_value_if_different("0x1A");
        assert_eq!(key.orig_value(), Some("0x1A"));
    }

    #[test]
    fn test_array_marker() {
        let mut key = Key::new(KeyName::parse("user:/a"));
        assert_eq!(key.array_marker(), None);
        key.mark_array();
        assert_eq!(key.array_marker(), Some(""));
        key.set_array_last(12);
        assert_eq!(key.array_marker(), Some("#_12"));
    }

    #[test]
    fn test_binary_value() {
        let mut key = Key::new(KeyName::parse("user:/a"));
        key.set_binary(Vec::new());
        assert!(key.is_binary());
        assert_eq!(key.value(), Some(&KeyValue::Binary(Vec::new())));
        assert_eq!(key.string(), None);
        key.set_string("x");
        assert!(!key.is_binary());
    }
}
