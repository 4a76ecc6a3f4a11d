//! Native shapes: what the encoder sees when it inspects a host value.
//!
//! Host types describe themselves through [`ToScript::shape`], returning one case of
//! the closed [`Shape`] enumeration. The encoder ([`crate::encoder`]) and the open
//! encoder ([`crate::open`]) dispatch on that shape, so a new host type only has to
//! say which shape it has; the conversion rules stay in one place.
//!
//! Containers expose their elements as `&dyn ToScript` so nested values are inspected
//! lazily, one level per recursion step.

use indexmap::IndexMap;
use num_bigint::BigInt;
use script_value::{Callable, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::Arc;

/// A host value that can be converted into a script value.
pub trait ToScript {
    fn shape(&self) -> Shape<'_>;
}

/// The runtime shape of a host value.
pub enum Shape<'a> {
    /// An absent value: `None`, `()`.
    Nil,
    Bool(bool),
    Signed(i64),
    /// Kept apart from `Signed` so values above `i64::MAX` survive.
    Unsigned(u64),
    /// Integers wider than 64 bits.
    Big(BigInt),
    Float(f64),
    Str(Cow<'a, str>),
    Bytes(&'a [u8]),
    Seq(Vec<&'a dyn ToScript>),
    Map(Vec<(&'a dyn ToScript, &'a dyn ToScript)>),
    Struct(StructShape<'a>),
    Callable(&'a Callable),
    /// A value that is already a script value.
    Script(&'a Value),
    /// Anything outside the value model, named for the error message.
    Unsupported(&'static str),
}

/// The public fields of a host struct, in declaration order, with resolved names.
pub struct StructShape<'a> {
    pub type_name: &'static str,
    pub fields: Vec<(&'static str, &'a dyn ToScript)>,
}

impl Shape<'_> {
    /// Human-readable description used in mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            Shape::Nil => "native nil".to_string(),
            Shape::Bool(_) => "native bool".to_string(),
            Shape::Signed(_) => "native signed integer".to_string(),
            Shape::Unsigned(_) => "native unsigned integer".to_string(),
            Shape::Big(_) => "native big integer".to_string(),
            Shape::Float(_) => "native float".to_string(),
            Shape::Str(_) => "native string".to_string(),
            Shape::Bytes(_) => "native byte string".to_string(),
            Shape::Seq(_) => "native sequence".to_string(),
            Shape::Map(_) => "native map".to_string(),
            Shape::Struct(s) => format!("native struct {}", s.type_name),
            Shape::Callable(_) => "native callable".to_string(),
            Shape::Script(v) => format!("script {}", v.type_name()),
            Shape::Unsupported(name) => format!("native {name}"),
        }
    }
}

/// An opaque byte string. Encodes to script `bytes` and decodes only from `bytes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteString(pub Vec<u8>);

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        ByteString(bytes)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        ByteString(bytes.to_vec())
    }
}

impl ToScript for ByteString {
    fn shape(&self) -> Shape<'_> {
        Shape::Bytes(&self.0)
    }
}

// ============================================================================
// Scalars
// ============================================================================

impl ToScript for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Bool(*self)
    }
}

macro_rules! signed_shape {
    ($($t:ty),*) => {
        $(
            impl ToScript for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Signed(*self as i64)
                }
            }
        )*
    };
}

macro_rules! unsigned_shape {
    ($($t:ty),*) => {
        $(
            impl ToScript for $t {
                fn shape(&self) -> Shape<'_> {
                    Shape::Unsigned(*self as u64)
                }
            }
        )*
    };
}

signed_shape!(i8, i16, i32, i64, isize);
unsigned_shape!(u8, u16, u32, u64, usize);

impl ToScript for i128 {
    fn shape(&self) -> Shape<'_> {
        match i64::try_from(*self) {
            Ok(v) => Shape::Signed(v),
            Err(_) => Shape::Big(BigInt::from(*self)),
        }
    }
}

impl ToScript for u128 {
    fn shape(&self) -> Shape<'_> {
        match u64::try_from(*self) {
            Ok(v) => Shape::Unsigned(v),
            Err(_) => Shape::Big(BigInt::from(*self)),
        }
    }
}

impl ToScript for BigInt {
    fn shape(&self) -> Shape<'_> {
        Shape::Big(self.clone())
    }
}

impl ToScript for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Float(f64::from(*self))
    }
}

impl ToScript for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Float(*self)
    }
}

impl ToScript for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(Cow::Owned(self.to_string()))
    }
}

impl ToScript for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(Cow::Borrowed(self))
    }
}

impl ToScript for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(Cow::Borrowed(self))
    }
}

impl ToScript for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Nil
    }
}

// ============================================================================
// Pointers
// ============================================================================

impl<T: ToScript> ToScript for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(v) => v.shape(),
            None => Shape::Nil,
        }
    }
}

impl<T: ToScript + ?Sized> ToScript for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: ToScript + ?Sized> ToScript for Box<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: ToScript + ?Sized> ToScript for Rc<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: ToScript + ?Sized> ToScript for Arc<T> {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

// ============================================================================
// Sequences
// ============================================================================

pub(crate) fn seq<'a, T: ToScript + 'a>(items: impl Iterator<Item = &'a T>) -> Shape<'a> {
    Shape::Seq(items.map(|v| v as &dyn ToScript).collect())
}

impl<T: ToScript> ToScript for [T] {
    fn shape(&self) -> Shape<'_> {
        seq(self.iter())
    }
}

impl<T: ToScript, const N: usize> ToScript for [T; N] {
    fn shape(&self) -> Shape<'_> {
        seq(self.iter())
    }
}

impl<T: ToScript> ToScript for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        seq(self.iter())
    }
}

impl<T: ToScript> ToScript for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        seq(self.iter())
    }
}

impl<T: ToScript, S> ToScript for HashSet<T, S> {
    fn shape(&self) -> Shape<'_> {
        seq(self.iter())
    }
}

impl<T: ToScript> ToScript for BTreeSet<T> {
    fn shape(&self) -> Shape<'_> {
        seq(self.iter())
    }
}

// ============================================================================
// Maps
// ============================================================================

pub(crate) fn map<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> Shape<'a>
where
    K: ToScript + 'a,
    V: ToScript + 'a,
{
    Shape::Map(
        entries
            .map(|(k, v)| (k as &dyn ToScript, v as &dyn ToScript))
            .collect(),
    )
}

impl<K: ToScript, V: ToScript, S> ToScript for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        map(self.iter())
    }
}

impl<K: ToScript, V: ToScript> ToScript for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        map(self.iter())
    }
}

impl<K: ToScript, V: ToScript, S: BuildHasher> ToScript for IndexMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        map(self.iter())
    }
}

// ============================================================================
// Script-side values and JSON
// ============================================================================

impl ToScript for Value {
    fn shape(&self) -> Shape<'_> {
        Shape::Script(self)
    }
}

impl ToScript for Callable {
    fn shape(&self) -> Shape<'_> {
        Shape::Callable(self)
    }
}

impl ToScript for serde_json::Value {
    fn shape(&self) -> Shape<'_> {
        use serde_json::Value as Json;
        match self {
            Json::Null => Shape::Nil,
            Json::Bool(b) => Shape::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Shape::Signed(i)
                } else if let Some(u) = n.as_u64() {
                    Shape::Unsigned(u)
                } else {
                    n.as_f64()
                        .map_or(Shape::Unsupported("number"), Shape::Float)
                }
            }
            Json::String(s) => Shape::Str(Cow::Borrowed(s)),
            Json::Array(items) => seq(items.iter()),
            Json::Object(entries) => map(entries.iter()),
        }
    }
}

// ============================================================================
// Outside the value model
// ============================================================================

impl<T> ToScript for Sender<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Unsupported("channel")
    }
}

impl<T> ToScript for SyncSender<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Unsupported("channel")
    }
}

impl<T> ToScript for Receiver<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Unsupported("channel")
    }
}
