//! Error types for building script values.

use crate::value::Kind;
use thiserror::Error;

/// Errors raised while constructing containers of script values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A list, dict or set (or a tuple/record holding one) was used as a dict key
    /// or set element.
    #[error("unhashable type: '{0}'")]
    Unhashable(Kind),

    /// A record attribute name is not a valid identifier.
    #[error("invalid attribute name: {0:?}")]
    InvalidAttribute(String),
}

/// Convenience alias used throughout script-value.
pub type Result<T> = std::result::Result<T, ValueError>;
