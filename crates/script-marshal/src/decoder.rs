//! Script to native conversion.
//!
//! The destination type drives the conversion: every native type that can receive a
//! script value implements [`FromScript`], which checks the value's variant against
//! what the type can hold and recurses into elements, map entries and record
//! attributes. Mismatches name both sides: `cannot convert script string to native i32`.
//!
//! Pointer-like destinations follow allocate-on-write semantics: `Option<T>` stays
//! `None` for `Null` and is allocated for everything else; `Box<T>` always allocates.

use crate::error::{ConvertError, Result};
use crate::shape::ByteString;
use indexmap::IndexMap;
use num_bigint::{BigInt, Sign};
use script_value::{Callable, Dict, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};
use std::num::Wrapping;

/// A native type that can be built from a script value.
pub trait FromScript: Sized {
    /// The native type as it should read in an error message, e.g. `i32`, `Vec<String>`.
    fn expected() -> String;

    fn from_script(value: &Value) -> Result<Self>;

    /// Element hook used by `Vec<T>` to accept script `bytes`. Only `u8` opts in.
    #[doc(hidden)]
    fn from_byte_string(_bytes: &[u8]) -> Option<Vec<Self>> {
        None
    }
}

/// Object-safe form of [`FromScript`] used to decode into struct fields in place.
pub trait DecodeInto {
    fn decode_from(&mut self, value: &Value) -> Result<()>;
}

impl<T: FromScript> DecodeInto for T {
    fn decode_from(&mut self, value: &Value) -> Result<()> {
        *self = T::from_script(value)?;
        Ok(())
    }
}

/// Decode a script value into a new native value.
pub fn decode<T: FromScript>(value: &Value) -> Result<T> {
    T::from_script(value)
}

/// Decode a script value into existing storage. `dest` is only overwritten on success.
pub fn decode_into<T: FromScript>(value: &Value, dest: &mut T) -> Result<()> {
    dest.decode_from(value)
}

pub(crate) fn mismatch<T: FromScript>(value: &Value) -> ConvertError {
    ConvertError::mismatch(
        format!("script {}", value.type_name()),
        format!("native {}", T::expected()),
    )
}

// ============================================================================
// Pass-through destinations
// ============================================================================

impl FromScript for Value {
    fn expected() -> String {
        "script value".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromScript for Callable {
    fn expected() -> String {
        "callable".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Callable(c) => Ok(c.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromScript for ByteString {
    fn expected() -> String {
        "ByteString".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(ByteString(b.clone())),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

// ============================================================================
// Scalars
// ============================================================================

impl FromScript for bool {
    fn expected() -> String {
        "bool".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

fn narrow<T>(value: &Value, target: &'static str) -> Result<T>
where
    T: FromScript + for<'a> TryFrom<&'a BigInt>,
{
    match value {
        Value::Int(i) => T::try_from(i).map_err(|_| ConvertError::OutOfRange {
            value: i.to_string(),
            target,
        }),
        other => Err(mismatch::<T>(other)),
    }
}

macro_rules! int_from_script {
    ($($t:ty),*) => {
        $(
            impl FromScript for $t {
                fn expected() -> String {
                    stringify!($t).to_string()
                }

                fn from_script(value: &Value) -> Result<Self> {
                    narrow(value, stringify!($t))
                }
            }
        )*
    };
}

int_from_script!(i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);

impl FromScript for u8 {
    fn expected() -> String {
        "u8".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        narrow(value, "u8")
    }

    fn from_byte_string(bytes: &[u8]) -> Option<Vec<Self>> {
        Some(bytes.to_vec())
    }
}

/// The integer reduced modulo 2^128, as two's complement.
fn low_bits(i: &BigInt) -> i128 {
    let fill = if i.sign() == Sign::Minus { 0xff } else { 0 };
    let mut buf = [fill; 16];
    for (dst, src) in buf.iter_mut().zip(i.to_signed_bytes_le()) {
        *dst = src;
    }
    i128::from_le_bytes(buf)
}

macro_rules! wrapping_from_script {
    ($($t:ty),*) => {
        $(
            impl FromScript for Wrapping<$t> {
                fn expected() -> String {
                    concat!("Wrapping<", stringify!($t), ">").to_string()
                }

                fn from_script(value: &Value) -> Result<Self> {
                    match value {
                        Value::Int(i) => Ok(Wrapping(low_bits(i) as $t)),
                        other => Err(mismatch::<Self>(other)),
                    }
                }
            }
        )*
    };
}

wrapping_from_script!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromScript for BigInt {
    fn expected() -> String {
        "BigInt".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(i.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromScript for f64 {
    fn expected() -> String {
        "f64".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromScript for f32 {
    fn expected() -> String {
        "f32".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Float(f) => Ok(*f as f32),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromScript for String {
    fn expected() -> String {
        "String".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl FromScript for char {
    fn expected() -> String {
        "char".to_string()
    }

    fn from_script(value: &Value) -> Result<Self> {
        let Value::Text(s) = value else {
            return Err(mismatch::<Self>(value));
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConvertError::mismatch(
                format!("script string of length {}", s.chars().count()),
                "native char",
            )),
        }
    }
}

// ============================================================================
// Pointers
// ============================================================================

impl<T: FromScript> FromScript for Option<T> {
    fn expected() -> String {
        format!("Option<{}>", T::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_script(other).map(Some),
        }
    }
}

impl<T: FromScript> FromScript for Box<T> {
    fn expected() -> String {
        T::expected()
    }

    fn from_script(value: &Value) -> Result<Self> {
        T::from_script(value).map(Box::new)
    }
}

// ============================================================================
// Sequences
// ============================================================================

fn decode_elements<'a, T, C>(kind: &str, items: impl Iterator<Item = &'a Value>) -> Result<C>
where
    T: FromScript,
    C: FromIterator<T>,
{
    items
        .enumerate()
        .map(|(i, item)| T::from_script(item).map_err(|e| e.context(format!("{kind}[{i}]"))))
        .collect()
}

/// Elements of a List, Tuple or Set, in iteration order.
fn decode_sequence<T, C>(value: &Value) -> Option<Result<C>>
where
    T: FromScript,
    C: FromIterator<T>,
{
    match value {
        Value::List(items) | Value::Tuple(items) => {
            Some(decode_elements::<T, C>(value.type_name(), items.iter()))
        }
        Value::Set(set) => Some(decode_elements::<T, C>("set", set.iter())),
        _ => None,
    }
}

impl<T: FromScript> FromScript for Vec<T> {
    fn expected() -> String {
        format!("Vec<{}>", T::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        if let Value::Bytes(bytes) = value {
            return T::from_byte_string(bytes).ok_or_else(|| mismatch::<Self>(value));
        }
        decode_sequence::<T, _>(value).unwrap_or_else(|| Err(mismatch::<Self>(value)))
    }
}

impl<T: FromScript, const N: usize> FromScript for [T; N] {
    fn expected() -> String {
        format!("[{}; {N}]", T::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        let items = Vec::<T>::from_script(value).map_err(|e| match e {
            ConvertError::Mismatch { .. } => mismatch::<Self>(value),
            other => other,
        })?;
        let len = items.len();
        items.try_into().map_err(|_| {
            ConvertError::mismatch(
                format!("script {} of length {len}", value.type_name()),
                format!("native {}", Self::expected()),
            )
        })
    }
}

impl<T, S> FromScript for HashSet<T, S>
where
    T: FromScript + Eq + Hash,
    S: BuildHasher + Default,
{
    fn expected() -> String {
        format!("HashSet<{}>", T::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        decode_sequence::<T, _>(value).unwrap_or_else(|| Err(mismatch::<Self>(value)))
    }
}

impl<T: FromScript + Ord> FromScript for BTreeSet<T> {
    fn expected() -> String {
        format!("BTreeSet<{}>", T::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        decode_sequence::<T, _>(value).unwrap_or_else(|| Err(mismatch::<Self>(value)))
    }
}

// ============================================================================
// Maps
// ============================================================================

fn decode_entries<K, V, C>(dict: &Dict) -> Result<C>
where
    K: FromScript,
    V: FromScript,
    C: FromIterator<(K, V)>,
{
    dict.iter()
        .map(|(k, v)| -> Result<(K, V)> {
            let key = K::from_script(k).map_err(|e| e.context(format!("dict key {k}")))?;
            let value = V::from_script(v).map_err(|e| e.context(format!("dict[{k}]")))?;
            Ok((key, value))
        })
        .collect()
}

impl<K, V, S> FromScript for HashMap<K, V, S>
where
    K: FromScript + Eq + Hash,
    V: FromScript,
    S: BuildHasher + Default,
{
    fn expected() -> String {
        format!("HashMap<{}, {}>", K::expected(), V::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Dict(dict) => decode_entries::<K, V, _>(dict),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<K: FromScript + Ord, V: FromScript> FromScript for BTreeMap<K, V> {
    fn expected() -> String {
        format!("BTreeMap<{}, {}>", K::expected(), V::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Dict(dict) => decode_entries::<K, V, _>(dict),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<K, V, S> FromScript for IndexMap<K, V, S>
where
    K: FromScript + Eq + Hash,
    V: FromScript,
    S: BuildHasher + Default,
{
    fn expected() -> String {
        format!("IndexMap<{}, {}>", K::expected(), V::expected())
    }

    fn from_script(value: &Value) -> Result<Self> {
        match value {
            Value::Dict(dict) => decode_entries::<K, V, _>(dict),
            other => Err(mismatch::<Self>(other)),
        }
    }
}
