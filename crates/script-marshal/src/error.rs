//! Error types for conversion and argument binding.

use script_value::ValueError;
use std::fmt::Display;
use thiserror::Error;

/// Errors that can occur while converting between native and script values or while
/// binding call arguments.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The source shape cannot be represented as the requested destination.
    /// Both sides are named, e.g. `cannot convert script string to native i32`.
    #[error("cannot convert {found} to {expected}")]
    Mismatch { found: String, expected: String },

    /// An integer does not fit the destination's width or signedness.
    #[error("integer {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("unknown keyword argument: {0}")]
    UnknownKeyword(String),

    #[error("unexpected positional argument at index {0}")]
    UnexpectedPositional(usize),

    /// Carries the argument's name, or `position N` for unnamed positional fields.
    #[error("missing required argument: {0}")]
    MissingRequired(String),

    /// The parameter record's field table cannot be bound (e.g. two fields claim the
    /// same position).
    #[error("malformed parameter record {record}: {message}")]
    Malformed {
        record: &'static str,
        message: String,
    },

    /// The native value has a shape outside the script value model.
    #[error("unsupported native type: {0}")]
    Unsupported(String),

    #[error("nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error(transparent)]
    Value(#[from] ValueError),

    /// Location prefix for a failure inside a container or argument list.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub fn mismatch(found: impl Display, expected: impl Display) -> Self {
        ConvertError::Mismatch {
            found: found.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Wrap the error with a location such as `list[3]` or `keyword arg 'path'`.
    pub fn context(self, context: impl Display) -> Self {
        ConvertError::Context {
            context: context.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with every `Context` layer removed.
    pub fn root(&self) -> &ConvertError {
        let mut err = self;
        while let ConvertError::Context { source, .. } = err {
            err = &**source;
        }
        err
    }
}

/// Convenience alias used throughout script-marshal.
pub type Result<T> = std::result::Result<T, ConvertError>;
