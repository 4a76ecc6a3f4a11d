//! # script-value
//!
//! The closed value model of the embedded scripting language, as seen from the host
//! side of the boundary. The language's parser and evaluator live elsewhere; this crate
//! only defines the values they hand across.
//!
//! ## Quick start
//!
//! ```rust
//! use script_value::{Dict, Record, Value};
//!
//! let mut dict = Dict::new();
//! dict.insert(Value::from("name"), Value::from("Alice")).unwrap();
//! dict.insert(Value::from("scores"), Value::list([95, 87])).unwrap();
//! assert_eq!(Value::from(dict).to_string(), r#"{"name": "Alice", "scores": [95, 87]}"#);
//!
//! let mut record = Record::new("File");
//! record.set("path", Value::from("/a")).unwrap();
//! assert_eq!(Value::from(record).to_string(), r#"File(path = "/a")"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value`, `Kind`, equality, hashing and `repr`
//! - [`collections`]: `Dict` and `Set` (insertion ordered, hashable keys only)
//! - [`record`]: `Record`, the named attribute bag
//! - [`callable`]: `Callable`, a named handle to a host function
//! - [`error`]: `ValueError`

pub mod callable;
pub mod collections;
pub mod error;
pub mod record;
pub mod value;

pub use callable::Callable;
pub use collections::{Dict, Set};
pub use error::ValueError;
pub use num_bigint::BigInt;
pub use record::{is_identifier, Record};
pub use value::{Kind, Value};
