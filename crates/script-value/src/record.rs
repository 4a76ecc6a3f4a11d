//! `Record`: the language's named, immutable attribute bag.
//!
//! Host code builds records (usually through the marshaling layer) and hands them to
//! scripts, which only read attributes. Attribute names are always identifiers.

use crate::error::{Result, ValueError};
use crate::value::Value;
use indexmap::IndexMap;

/// A named set of attributes, e.g. `File(path = "/a", size = 3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    type_name: String,
    attrs: IndexMap<String, Value>,
}

impl Record {
    /// Type name used for records built without a host type behind them.
    pub const DEFAULT_TYPE_NAME: &'static str = "struct";

    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attrs: IndexMap::new(),
        }
    }

    /// A record with the default `struct` type name.
    pub fn anonymous() -> Self {
        Self::new(Self::DEFAULT_TYPE_NAME)
    }

    /// Build a record from name/value pairs; later duplicates overwrite earlier ones.
    pub fn with_attrs<I, S>(type_name: impl Into<String>, attrs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut record = Self::new(type_name);
        for (name, value) in attrs {
            record.set(name, value)?;
        }
        Ok(record)
    }

    /// Set an attribute. Fails when `name` is not an identifier.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(ValueError::InvalidAttribute(name));
        }
        self.attrs.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, extended to Unicode letters and digits.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
