//! `Dynamic`: the native "any" destination.
//!
//! When the destination's exact shape is unknown the decoder picks the representation
//! from the script value's variant: integers become `Int` when they fit `i64` and
//! `UInt` when they only fit `u64`; lists, tuples and sets become `List`; dicts become
//! an any-keyed `Map` at every nesting level. Records and callables have no dynamic
//! form and are rejected.

use crate::decoder::{mismatch, FromScript};
use crate::error::{ConvertError, Result};
use crate::shape::{self, Shape, ToScript};
use indexmap::IndexMap;
use num_traits::ToPrimitive;
use ordered_float::OrderedFloat;
use script_value::Value;
use serde::ser::{Serialize, Serializer};
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::mem;

/// A native value of open shape.
#[derive(Debug, Clone, Default)]
pub enum Dynamic {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Dynamic>),
    Map(IndexMap<Dynamic, Dynamic>),
}

impl Dynamic {
    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Dynamic::Int(i) => Some(*i),
            Dynamic::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Dynamic::Int(i) => u64::try_from(*i).ok(),
            Dynamic::UInt(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Dynamic::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Dynamic, Dynamic>> {
        match self {
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a text key in a `Map`.
    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        self.as_map()?.get(&Dynamic::Str(key.to_owned()))
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dynamic::Null, Dynamic::Null) => true,
            (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
            (Dynamic::Int(a), Dynamic::Int(b)) => a == b,
            (Dynamic::UInt(a), Dynamic::UInt(b)) => a == b,
            (Dynamic::Float(a), Dynamic::Float(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Dynamic::Str(a), Dynamic::Str(b)) => a == b,
            (Dynamic::Bytes(a), Dynamic::Bytes(b)) => a == b,
            (Dynamic::List(a), Dynamic::List(b)) => a == b,
            (Dynamic::Map(a), Dynamic::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Dynamic {}

impl Hash for Dynamic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Dynamic::Null => {}
            Dynamic::Bool(b) => b.hash(state),
            Dynamic::Int(i) => i.hash(state),
            Dynamic::UInt(u) => u.hash(state),
            Dynamic::Float(f) => OrderedFloat(*f).hash(state),
            Dynamic::Str(s) => s.hash(state),
            Dynamic::Bytes(b) => b.hash(state),
            Dynamic::List(items) => items.hash(state),
            // Map equality ignores order.
            Dynamic::Map(map) => map.len().hash(state),
        }
    }
}

impl FromScript for Dynamic {
    fn expected() -> String {
        "dynamic value".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Dynamic::Null),
            Value::Bool(b) => Ok(Dynamic::Bool(*b)),
            Value::Int(i) => {
                if let Some(v) = i.to_i64() {
                    Ok(Dynamic::Int(v))
                } else if let Some(v) = i.to_u64() {
                    Ok(Dynamic::UInt(v))
                } else {
                    Err(ConvertError::OutOfRange {
                        value: i.to_string(),
                        target: "i64 or u64",
                    })
                }
            }
            Value::Float(f) => Ok(Dynamic::Float(*f)),
            Value::Text(s) => Ok(Dynamic::Str(s.clone())),
            Value::Bytes(b) => Ok(Dynamic::Bytes(b.clone())),
            Value::List(_) | Value::Tuple(_) | Value::Set(_) => {
                Vec::<Dynamic>::from_script(value).map(Dynamic::List)
            }
            Value::Dict(_) => IndexMap::<Dynamic, Dynamic>::from_script(value).map(Dynamic::Map),
            Value::Callable(_) | Value::Record(_) => Err(mismatch::<Self>(value)),
        }
    }
}

impl ToScript for Dynamic {
    fn shape(&self) -> Shape<'_> {
        match self {
            Dynamic::Null => Shape::Nil,
            Dynamic::Bool(b) => Shape::Bool(*b),
            Dynamic::Int(i) => Shape::Signed(*i),
            Dynamic::UInt(u) => Shape::Unsigned(*u),
            Dynamic::Float(f) => Shape::Float(*f),
            Dynamic::Str(s) => Shape::Str(Cow::Borrowed(s)),
            Dynamic::Bytes(b) => Shape::Bytes(b),
            Dynamic::List(items) => shape::seq(items.iter()),
            Dynamic::Map(map) => shape::map(map.iter()),
        }
    }
}

impl Serialize for Dynamic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Dynamic::Null => serializer.serialize_unit(),
            Dynamic::Bool(b) => serializer.serialize_bool(*b),
            Dynamic::Int(i) => serializer.serialize_i64(*i),
            Dynamic::UInt(u) => serializer.serialize_u64(*u),
            Dynamic::Float(f) => serializer.serialize_f64(*f),
            Dynamic::Str(s) => serializer.serialize_str(s),
            Dynamic::Bytes(b) => serializer.serialize_bytes(b),
            Dynamic::List(items) => serializer.collect_seq(items),
            Dynamic::Map(map) => serializer.collect_map(map),
        }
    }
}

impl From<bool> for Dynamic {
    fn from(v: bool) -> Self {
        Dynamic::Bool(v)
    }
}

impl From<i64> for Dynamic {
    fn from(v: i64) -> Self {
        Dynamic::Int(v)
    }
}

impl From<u64> for Dynamic {
    fn from(v: u64) -> Self {
        Dynamic::UInt(v)
    }
}

impl From<f64> for Dynamic {
    fn from(v: f64) -> Self {
        Dynamic::Float(v)
    }
}

impl From<&str> for Dynamic {
    fn from(v: &str) -> Self {
        Dynamic::Str(v.to_owned())
    }
}

impl From<String> for Dynamic {
    fn from(v: String) -> Self {
        Dynamic::Str(v)
    }
}

impl From<Vec<Dynamic>> for Dynamic {
    fn from(v: Vec<Dynamic>) -> Self {
        Dynamic::List(v)
    }
}

impl From<IndexMap<Dynamic, Dynamic>> for Dynamic {
    fn from(v: IndexMap<Dynamic, Dynamic>) -> Self {
        Dynamic::Map(v)
    }
}
