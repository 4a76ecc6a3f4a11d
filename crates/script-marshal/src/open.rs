//! Open (JSON-style) conversions for values whose shape is not known ahead of time.
//!
//! These entry points differ from the strict encoder and decoder in a few deliberate ways:
//!
//! - [`encode_open`] turns integral, finite floats into `Int` (JSON has one number type)
//! - maps are encoded with their keys sorted by the `str()` form of the encoded key, ties
//!   broken by its `repr`, so repeated encodes of equal maps produce the same dict order
//! - [`decode_open`] never fails on an unfamiliar variant; it falls back to the value's
//!   printed form, and integers beyond `i64` become decimal strings
//!
//! The native side of the open decoder is `serde_json::Value`.

use crate::decoder::FromScript;
use crate::encoder::{Target, MAX_DEPTH};
use crate::error::{ConvertError, Result};
use crate::shape::{Shape, ToScript};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use script_value::{Dict, Value};
use serde_json::{Map, Number, Value as Json};

/// Encode a value of open shape using JSON-style rules.
///
/// ```
/// use script_marshal::{encode_open, Value};
///
/// assert_eq!(encode_open(&3.0f64).unwrap(), Value::from(3));
/// assert_eq!(encode_open(&2.5f64).unwrap(), Value::Float(2.5));
/// ```
pub fn encode_open<T: ToScript + ?Sized>(value: &T) -> Result<Value> {
    open_value(&value, 0)
}

/// Encode a native map as a dict with sorted keys; anything else is a mismatch.
pub fn encode_open_dict<T: ToScript + ?Sized>(value: &T) -> Result<Dict> {
    let shape = value.shape();
    match &shape {
        Shape::Map(entries) => open_entries(entries, 0),
        _ => Err(ConvertError::mismatch(shape.describe(), Target::Dict)),
    }
}

/// Encode a native sequence as list elements; anything else is a mismatch.
pub fn encode_open_list<T: ToScript + ?Sized>(value: &T) -> Result<Vec<Value>> {
    let shape = value.shape();
    match &shape {
        Shape::Seq(items) => open_items(items, 0),
        _ => Err(ConvertError::mismatch(shape.describe(), Target::List)),
    }
}

fn open_value(value: &dyn ToScript, depth: usize) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(ConvertError::TooDeep(MAX_DEPTH));
    }
    match value.shape() {
        Shape::Nil => Ok(Value::Null),
        Shape::Bool(b) => Ok(Value::Bool(b)),
        Shape::Signed(i) => Ok(Value::Int(BigInt::from(i))),
        Shape::Unsigned(u) => Ok(Value::Int(BigInt::from(u))),
        Shape::Big(i) => Ok(Value::Int(i)),
        Shape::Float(f) => Ok(json_number(f)),
        Shape::Str(s) => Ok(Value::Text(s.into_owned())),
        Shape::Bytes(b) => Ok(Value::Bytes(b.to_vec())),
        Shape::Callable(c) => Ok(Value::Callable(c.clone())),
        Shape::Script(v) => Ok(v.clone()),
        Shape::Seq(items) => open_items(&items, depth).map(Value::List),
        Shape::Map(entries) => open_entries(&entries, depth).map(Value::Dict),
        Shape::Struct(s) => Err(ConvertError::Unsupported(format!("struct {}", s.type_name))),
        Shape::Unsupported(name) => Err(ConvertError::Unsupported(name.to_string())),
    }
}

fn json_number(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 {
        if let Some(i) = BigInt::from_f64(f) {
            return Value::Int(i);
        }
    }
    Value::Float(f)
}

fn open_items(items: &[&dyn ToScript], depth: usize) -> Result<Vec<Value>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| open_value(*item, depth + 1).map_err(|e| e.context(format!("list[{i}]"))))
        .collect()
}

fn open_entries(entries: &[(&dyn ToScript, &dyn ToScript)], depth: usize) -> Result<Dict> {
    let mut encoded = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let key = open_value(*key, depth + 1).map_err(|e| e.context("dict key"))?;
        let value = open_value(*value, depth + 1).map_err(|e| e.context(format!("dict[{key}]")))?;
        encoded.push(((key.to_str(), key.to_string()), key, value));
    }
    // `str()` first, then `repr` for keys that print alike (`1` and `"1"`).
    encoded.sort_by(|a, b| a.0.cmp(&b.0));

    let mut dict = Dict::with_capacity(encoded.len());
    for (_, key, value) in encoded {
        dict.insert(key.clone(), value)
            .map_err(|e| ConvertError::from(e).context(format!("dict key {key}")))?;
    }
    Ok(dict)
}

/// Decode any script value into a JSON value.
///
/// ```
/// use script_marshal::{decode_open, Value};
/// use serde_json::json;
///
/// let v = Value::list([Value::from(1), Value::from("a"), Value::Null]);
/// assert_eq!(decode_open(&v).unwrap(), json!([1, "a", null]));
/// ```
pub fn decode_open(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => match i.to_i64() {
            Some(v) => Json::from(v),
            None => Json::String(i.to_string()),
        },
        Value::Float(f) => Number::from_f64(*f).map_or_else(|| Json::String(value.to_string()), Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::List(items) | Value::Tuple(items) => Json::Array(decode_items(value.type_name(), items)?),
        Value::Dict(dict) => Json::Object(decode_entries(dict)?),
        other => Json::String(other.to_string()),
    })
}

/// Decode a script dict into a JSON object. Keys must be text.
pub fn decode_open_map(value: &Value) -> Result<Map<String, Json>> {
    match value {
        Value::Dict(dict) => decode_entries(dict),
        other => Err(ConvertError::mismatch(
            format!("script {}", other.type_name()),
            "native JSON object",
        )),
    }
}

/// Decode a script list into JSON array elements.
pub fn decode_open_list(value: &Value) -> Result<Vec<Json>> {
    match value {
        Value::List(items) => decode_items("list", items),
        other => Err(ConvertError::mismatch(
            format!("script {}", other.type_name()),
            "native JSON array",
        )),
    }
}

fn decode_items(kind: &str, items: &[Value]) -> Result<Vec<Json>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode_open(item).map_err(|e| e.context(format!("{kind}[{i}]"))))
        .collect()
}

fn decode_entries(dict: &Dict) -> Result<Map<String, Json>> {
    let mut map = Map::with_capacity(dict.len());
    for (key, value) in dict {
        let Value::Text(name) = key else {
            return Err(ConvertError::mismatch(
                format!("script {} dict key", key.type_name()),
                "native string key",
            ));
        };
        let decoded = decode_open(value).map_err(|e| e.context(format!("dict[{key}]")))?;
        map.insert(name.clone(), decoded);
    }
    Ok(map)
}

impl FromScript for Json {
    fn expected() -> String {
        "JSON value".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        decode_open(value)
    }
}
