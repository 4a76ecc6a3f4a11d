//! Per-type field tables for host structs.
//!
//! A struct that crosses the boundary as a record, or receives call arguments, declares
//! its fields once with [`script_struct!`](crate::script_struct). The macro produces a
//! static [`FieldSpec`] table plus the [`ScriptStruct`], [`ToScript`] and
//! [`FromScript`](crate::FromScript) impls. Fields left out of the table are private to
//! the host: never encoded, decoded, or bound.
//!
//! ```
//! use script_marshal::{script_struct, ScriptStruct};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct CopyArgs {
//!     src: String,
//!     dest: String,
//!     mode: Option<u32>,
//! }
//!
//! script_struct!(CopyArgs {
//!     src: name("src").position(0).required(true),
//!     dest: name("dest").position(1).required(true),
//!     mode: name("mode"),
//! });
//!
//! assert_eq!(CopyArgs::FIELDS[1].position, Some(1));
//! assert_eq!(CopyArgs::FIELDS[2].attr_name(), "mode");
//! ```

use crate::decoder::DecodeInto;
use crate::error::{ConvertError, Result};
use crate::shape::{Shape, StructShape, ToScript};
use script_value::Value;

/// Binding metadata for one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The Rust field identifier.
    pub ident: &'static str,
    /// Keyword and attribute name.
    pub name: Option<&'static str>,
    /// Zero-based positional index.
    pub position: Option<usize>,
    /// Consulted by [`bind_args`](crate::bind_args); fields are optional by default.
    pub required: bool,
    /// Consulted by [`bind_kwargs`](crate::bind_kwargs); fields are required by default.
    pub optional: bool,
}

impl FieldSpec {
    /// A raw identifier such as `r#type` is stored without its `r#` prefix.
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident: strip_raw(ident),
            name: None,
            position: None,
            required: false,
            optional: false,
        }
    }

    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub const fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub const fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// The attribute name written by the encoder: the name annotation, else the identifier.
    pub const fn attr_name(&self) -> &'static str {
        match self.name {
            Some(name) => name,
            None => self.ident,
        }
    }

    /// Whether [`bind_args`](crate::bind_args) binds this field at all.
    pub const fn is_bound(&self) -> bool {
        self.name.is_some() || self.position.is_some()
    }

    /// How a missing-argument error refers to this field.
    pub(crate) fn label(&self) -> String {
        match (self.name, self.position) {
            (Some(name), _) => name.to_string(),
            (None, Some(position)) => format!("position {position}"),
            (None, None) => self.ident.to_string(),
        }
    }
}

/// A host struct with a declared field table. Implemented by [`script_struct!`](crate::script_struct).
pub trait ScriptStruct: Default {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    /// Every table field, in [`Self::FIELDS`] order.
    fn fields(&self) -> Vec<&dyn ToScript>;

    fn fields_mut(&mut self) -> Vec<&mut dyn DecodeInto>;
}

/// The `Struct` shape of a declared struct: table fields in declaration order.
pub fn struct_shape<T: ScriptStruct>(value: &T) -> Shape<'_> {
    let fields = T::FIELDS
        .iter()
        .zip(value.fields())
        .map(|(spec, field)| (spec.attr_name(), field))
        .collect();
    Shape::Struct(StructShape {
        type_name: T::TYPE_NAME,
        fields,
    })
}

/// Build a declared struct from a script record.
///
/// Each attribute is matched to a field by name annotation (ignoring case), else by
/// comparing capitalized attribute and field identifier. Unmatched attributes are
/// ignored; unset fields keep their `Default` value.
pub fn decode_record<T: ScriptStruct>(value: &Value) -> Result<T> {
    let Value::Record(record) = value else {
        return Err(ConvertError::mismatch(
            format!("script {}", value.type_name()),
            format!("native struct {}", T::TYPE_NAME),
        ));
    };
    let mut dest = T::default();
    let mut fields = dest.fields_mut();
    for (attr, attr_value) in record.iter() {
        let Some(index) = resolve_attribute(T::FIELDS, attr) else {
            continue;
        };
        if let Some(field) = fields.get_mut(index) {
            field
                .decode_from(attr_value)
                .map_err(|e| e.context(format!("{}.{attr}", T::TYPE_NAME)))?;
        }
    }
    drop(fields);
    Ok(dest)
}

/// Decode `value` into the field at `index` of `fields`, used by the binders.
pub(crate) fn decode_field(
    record: &'static str,
    fields: &mut [&mut dyn DecodeInto],
    index: usize,
    value: &Value,
) -> Result<()> {
    match fields.get_mut(index) {
        Some(field) => field.decode_from(value),
        None => Err(ConvertError::Malformed {
            record,
            message: format!("field table entry {index} has no storage"),
        }),
    }
}

const fn strip_raw(ident: &'static str) -> &'static str {
    match ident.as_bytes() {
        [b'r', b'#', rest @ ..] => match std::str::from_utf8(rest) {
            Ok(bare) => bare,
            Err(_) => ident,
        },
        _ => ident,
    }
}

fn resolve_attribute(fields: &[FieldSpec], attr: &str) -> Option<usize> {
    fields
        .iter()
        .position(|f| f.name.is_some_and(|name| name.eq_ignore_ascii_case(attr)))
        .or_else(|| {
            let wanted = capitalize(attr);
            fields.iter().position(|f| capitalize(f.ident) == wanted)
        })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Declare the field table of a struct with named fields.
///
/// Each listed field may carry a chain of [`FieldSpec`] builders:
/// `name("x")`, `position(0)`, `required(true)`, `optional(true)`.
/// The struct must implement `Default`, and every listed field type must implement
/// both [`ToScript`](crate::ToScript) and [`FromScript`](crate::FromScript).
#[macro_export]
macro_rules! script_struct {
    ($ty:ident {
        $( $field:ident $( : $head:ident ( $($hargs:expr),* ) $( . $tail:ident ( $($targs:expr),* ) )* )? ),* $(,)?
    }) => {
        impl $crate::ScriptStruct for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            const FIELDS: &'static [$crate::FieldSpec] = &[
                $(
                    $crate::FieldSpec::new(stringify!($field))
                        $( .$head($($hargs),*) $( .$tail($($targs),*) )* )?
                ),*
            ];

            fn fields(&self) -> ::std::vec::Vec<&dyn $crate::ToScript> {
                let $ty { $($field,)* .. } = self;
                ::std::vec![$($field as &dyn $crate::ToScript),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::DecodeInto> {
                let $ty { $($field,)* .. } = self;
                ::std::vec![$($field as &mut dyn $crate::DecodeInto),*]
            }
        }

        impl $crate::ToScript for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::fields::struct_shape(self)
            }
        }

        impl $crate::FromScript for $ty {
            fn expected() -> ::std::string::String {
                ::std::format!("struct {}", stringify!($ty))
            }

            fn from_script(value: &$crate::Value) -> $crate::Result<Self> {
                $crate::fields::decode_record(value)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("path"), "Path");
        assert_eq!(capitalize("éte"), "Éte");
    }

    #[test]
    fn annotation_beats_identifier() {
        let fields = [
            FieldSpec::new("path"),
            FieldSpec::new("target").name("Path"),
        ];
        assert_eq!(resolve_attribute(&fields, "path"), Some(1));
        assert_eq!(resolve_attribute(&fields, "target"), Some(1));
        assert_eq!(resolve_attribute(&fields, "size"), None);
    }

    #[test]
    fn raw_identifiers_lose_their_prefix() {
        assert_eq!(FieldSpec::new("r#type").ident, "type");
        assert_eq!(FieldSpec::new("r#type").attr_name(), "type");
        assert_eq!(FieldSpec::new("rtype").ident, "rtype");
    }

    #[derive(Default)]
    struct Wide {
        a: i64,
        b: i64,
        c: i64,
        borrows: usize,
    }

    impl ScriptStruct for Wide {
        const TYPE_NAME: &'static str = "Wide";
        const FIELDS: &'static [FieldSpec] =
            &[FieldSpec::new("a"), FieldSpec::new("b"), FieldSpec::new("c")];

        fn fields(&self) -> Vec<&dyn ToScript> {
            vec![&self.a, &self.b, &self.c]
        }

        fn fields_mut(&mut self) -> Vec<&mut dyn DecodeInto> {
            self.borrows += 1;
            vec![&mut self.a, &mut self.b, &mut self.c]
        }
    }

    #[test]
    fn record_decode_borrows_the_table_once() {
        let record = script_value::Record::with_attrs(
            "Wide",
            [("c", Value::from(3)), ("a", Value::from(1)), ("b", Value::from(2))],
        )
        .unwrap();
        let wide: Wide = decode_record(&Value::Record(record)).unwrap();
        assert_eq!((wide.a, wide.b, wide.c), (1, 2, 3));
        assert_eq!(wide.borrows, 1);
    }

    #[test]
    fn missing_storage_is_malformed() {
        let mut a = 0i64;
        let mut fields: Vec<&mut dyn DecodeInto> = vec![&mut a];
        decode_field("Wide", &mut fields, 0, &Value::from(7)).unwrap();
        let err = decode_field("Wide", &mut fields, 2, &Value::from(7)).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { record: "Wide", .. }));
        assert_eq!(a, 7);
    }

    #[test]
    fn label_prefers_name_then_position() {
        assert_eq!(FieldSpec::new("a").name("alpha").position(0).label(), "alpha");
        assert_eq!(FieldSpec::new("a").position(2).label(), "position 2");
    }
}
