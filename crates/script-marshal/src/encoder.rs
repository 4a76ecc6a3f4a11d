//! Native to script conversion (strict path).
//!
//! The caller names the script kind it wants through [`Target`]; the encoder inspects
//! the native value's [`Shape`] and either produces that kind or fails with a mismatch
//! naming both sides (`cannot convert native string to script int`).
//!
//! Rules by shape:
//!
//! - scalars map one to one (`Bool`, `Int`, `Float`, `Text`, `Bytes`); floats are never
//!   collapsed to ints on this path
//! - sequences become `List` (the default for [`Target::Any`]), `Tuple` or `Set`; set
//!   insertion silently drops duplicates and unhashable elements
//! - maps become `Dict` in the map's own iteration order
//! - declared structs become a `Record` named after the struct
//! - `None`/`()` become `Null` only for [`Target::Any`]
//! - channels and other shapes outside the value model are unsupported
//!
//! Elements, entries and fields are always encoded with [`Target::Any`].

use crate::error::{ConvertError, Result};
use crate::shape::{Shape, StructShape, ToScript};
use indexmap::IndexMap;
use num_bigint::BigInt;
use script_value::{Dict, Kind, Record, Set, Value};
use std::fmt;
use tracing::debug;

/// Maximum container nesting the encoders will follow.
pub const MAX_DEPTH: usize = 256;

/// The script kind an encode call should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Any script value; the encoder picks the natural representation.
    Any,
    Bool,
    Int,
    Float,
    Text,
    Bytes,
    List,
    Tuple,
    Set,
    Dict,
    Record,
    Callable,
}

impl Target {
    /// The script kind this target stands for, `None` for [`Target::Any`].
    pub fn kind(self) -> Option<Kind> {
        match self {
            Target::Any => None,
            Target::Bool => Some(Kind::Bool),
            Target::Int => Some(Kind::Int),
            Target::Float => Some(Kind::Float),
            Target::Text => Some(Kind::Text),
            Target::Bytes => Some(Kind::Bytes),
            Target::List => Some(Kind::List),
            Target::Tuple => Some(Kind::Tuple),
            Target::Set => Some(Kind::Set),
            Target::Dict => Some(Kind::Dict),
            Target::Record => Some(Kind::Record),
            Target::Callable => Some(Kind::Callable),
        }
    }

    pub fn accepts(self, kind: Kind) -> bool {
        self.kind().is_none_or(|k| k == kind)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            None => f.write_str("any script value"),
            Some(kind) => write!(f, "script {kind}"),
        }
    }
}

/// Encode a native value as the requested script kind.
///
/// ```
/// use script_marshal::{encode, Target, Value};
///
/// let v = encode(&vec![1u8, 2, 3], Target::Tuple).unwrap();
/// assert_eq!(v, Value::tuple([1, 2, 3]));
///
/// assert!(encode("text", Target::Int).is_err());
/// ```
pub fn encode<T: ToScript + ?Sized>(value: &T, target: Target) -> Result<Value> {
    Encoder::default().encode(&value, target, 0)
}

/// Encode a declared struct as a named record.
pub fn encode_record<T: ToScript + ?Sized>(value: &T) -> Result<Record> {
    match encode(value, Target::Record)? {
        Value::Record(record) => Ok(record),
        other => Err(ConvertError::mismatch(
            format!("script {}", other.type_name()),
            Target::Record,
        )),
    }
}

/// The encoded attributes of a declared struct, keyed by attribute name.
pub fn struct_attributes<T: ToScript + ?Sized>(value: &T) -> Result<IndexMap<String, Value>> {
    let record = encode_record(value)?;
    Ok(record
        .iter()
        .map(|(name, v)| (name.to_string(), v.clone()))
        .collect())
}

/// Encode a sequence as a set, also returning how many elements were dropped as
/// duplicates or unhashable.
pub fn encode_set_counting<T: ToScript + ?Sized>(value: &T) -> Result<(Set, usize)> {
    let mut encoder = Encoder::default();
    match encoder.encode(&value, Target::Set, 0)? {
        Value::Set(set) => Ok((set, encoder.dropped)),
        other => Err(ConvertError::mismatch(
            format!("script {}", other.type_name()),
            Target::Set,
        )),
    }
}

#[derive(Default)]
struct Encoder {
    dropped: usize,
}

impl Encoder {
    fn encode(&mut self, value: &dyn ToScript, target: Target, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(ConvertError::TooDeep(MAX_DEPTH));
        }
        let shape = value.shape();
        let encoded = match &shape {
            Shape::Nil => Value::Null,
            Shape::Bool(b) => Value::Bool(*b),
            Shape::Signed(i) => Value::Int(BigInt::from(*i)),
            Shape::Unsigned(u) => Value::Int(BigInt::from(*u)),
            Shape::Big(i) => Value::Int(i.clone()),
            Shape::Float(f) => Value::Float(*f),
            Shape::Str(s) => Value::Text(s.to_string()),
            Shape::Bytes(b) => Value::Bytes(b.to_vec()),
            Shape::Callable(c) => Value::Callable((*c).clone()),
            Shape::Script(v) => (*v).clone(),
            Shape::Seq(items) => return self.sequence(items, target, depth),
            Shape::Map(entries) => return self.map(entries, target, depth),
            Shape::Struct(s) => return self.record(s, target, depth),
            Shape::Unsupported(name) => return Err(ConvertError::Unsupported(name.to_string())),
        };
        // Null has no target of its own: only `Any` takes it.
        if target.accepts(encoded.kind()) {
            Ok(encoded)
        } else {
            Err(ConvertError::mismatch(shape.describe(), target))
        }
    }

    fn elements(&mut self, items: &[&dyn ToScript], depth: usize) -> Result<Vec<Value>> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.encode(*item, Target::Any, depth + 1)
                    .map_err(|e| e.context(format!("[{i}]")))
            })
            .collect()
    }

    fn sequence(&mut self, items: &[&dyn ToScript], target: Target, depth: usize) -> Result<Value> {
        match target {
            Target::Any | Target::List => Ok(Value::List(self.elements(items, depth)?)),
            Target::Tuple => Ok(Value::Tuple(self.elements(items, depth)?)),
            Target::Set => {
                let elements = self.elements(items, depth)?;
                let total = elements.len();
                let mut set = Set::with_capacity(total);
                for element in elements {
                    if let Err(err) = set.insert(element) {
                        debug!(error = %err, "dropping set element");
                    }
                }
                self.dropped += total - set.len();
                Ok(Value::Set(set))
            }
            other => Err(ConvertError::mismatch("native sequence", other)),
        }
    }

    fn map(
        &mut self,
        entries: &[(&dyn ToScript, &dyn ToScript)],
        target: Target,
        depth: usize,
    ) -> Result<Value> {
        if !matches!(target, Target::Any | Target::Dict) {
            return Err(ConvertError::mismatch("native map", target));
        }
        let mut dict = Dict::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self
                .encode(*key, Target::Any, depth + 1)
                .map_err(|e| e.context("dict key"))?;
            let value = self
                .encode(*value, Target::Any, depth + 1)
                .map_err(|e| e.context(format!("dict[{key}]")))?;
            dict.insert(key.clone(), value)
                .map_err(|e| ConvertError::from(e).context(format!("dict key {key}")))?;
        }
        Ok(Value::Dict(dict))
    }

    fn record(&mut self, shape: &StructShape<'_>, target: Target, depth: usize) -> Result<Value> {
        if !matches!(target, Target::Any | Target::Record) {
            return Err(ConvertError::mismatch(
                format!("native struct {}", shape.type_name),
                target,
            ));
        }
        let mut record = Record::new(shape.type_name);
        for (name, field) in &shape.fields {
            let value = self
                .encode(*field, Target::Any, depth + 1)
                .map_err(|e| e.context(format!("{}.{name}", shape.type_name)))?;
            record.set(*name, value)?;
        }
        Ok(Value::Record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display_names_script_kind() {
        assert_eq!(Target::Any.to_string(), "any script value");
        assert_eq!(Target::Text.to_string(), "script string");
        assert_eq!(Target::Record.to_string(), "script struct");
    }

    #[test]
    fn any_accepts_every_kind() {
        assert!(Target::Any.accepts(Kind::Null));
        assert!(Target::Dict.accepts(Kind::Dict));
        assert!(!Target::Dict.accepts(Kind::Record));
    }
}
