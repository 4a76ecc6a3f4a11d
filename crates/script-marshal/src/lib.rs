//! # script-marshal
//!
//! Bidirectional marshaling between native Rust values and the value model of an
//! embedded scripting language ([`script_value`]).
//!
//! Host code exposes structs, maps, sequences and scalars to scripts with [`encode`],
//! receives script results back into typed destinations with [`decode`], and binds a
//! script call's positional and keyword arguments onto a parameter struct with
//! [`bind_args`] or [`bind_kwargs`]. Structs declare their field table once with
//! [`script_struct!`]; there is no runtime reflection.
//!
//! ## Quick start
//!
//! ```rust
//! use script_marshal::{decode, encode, script_struct, Target, Value};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct File {
//!     path: String,
//!     size: i64,
//! }
//!
//! script_struct!(File {
//!     path: name("path"),
//!     size: name("size"),
//! });
//!
//! let file = File { path: "/a".into(), size: 5 };
//!
//! // Native → script
//! let value = encode(&file, Target::Record).unwrap();
//! assert_eq!(value.to_string(), r#"File(path = "/a", size = 5)"#);
//!
//! // Script → native (roundtrip)
//! let back: File = decode(&value).unwrap();
//! assert_eq!(back, file);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`]: native → script, strict path (`encode`, `Target`)
//! - [`decoder`]: script → native (`decode`, `FromScript`)
//! - [`open`]: JSON-style open conversions (`encode_open`, `decode_open`)
//! - [`dynamic`]: `Dynamic`, the native "any" destination
//! - [`fields`]: per-struct field tables and the `script_struct!` macro
//! - [`args`]: positional + keyword argument binding
//! - [`kwargs`]: keyword-only argument binding
//! - [`shape`]: `ToScript`, how native values describe their shape
//! - [`error`]: `ConvertError`

pub mod args;
pub mod decoder;
pub mod dynamic;
pub mod encoder;
pub mod error;
pub mod fields;
pub mod kwargs;
pub mod open;
pub mod shape;

pub use args::bind_args;
pub use decoder::{decode, decode_into, DecodeInto, FromScript};
pub use dynamic::Dynamic;
pub use encoder::{encode, encode_record, encode_set_counting, struct_attributes, Target, MAX_DEPTH};
pub use error::{ConvertError, Result};
pub use fields::{FieldSpec, ScriptStruct};
pub use kwargs::bind_kwargs;
pub use open::{decode_open, decode_open_list, decode_open_map, encode_open, encode_open_dict, encode_open_list};
pub use shape::{ByteString, Shape, StructShape, ToScript};

pub use script_value::{BigInt, Callable, Dict, Kind, Record, Set, Value, ValueError};
