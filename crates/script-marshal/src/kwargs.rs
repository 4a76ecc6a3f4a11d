//! Keyword-only argument binding.
//!
//! Only fields with a name annotation take part. Each is looked up by its name, or by
//! its Rust identifier, and the first matching keyword wins. A `None` argument counts
//! as absent. Fields are required unless declared `optional(true)`, the opposite
//! default from [`bind_args`](crate::bind_args). Keywords that match no field are
//! ignored.

use crate::error::{ConvertError, Result};
use crate::fields::{decode_field, ScriptStruct};
use script_value::Value;
use tracing::trace;

/// Bind keyword-only call arguments onto `dest`.
pub fn bind_kwargs<K, T>(kwargs: &[(K, Value)], dest: &mut T) -> Result<()>
where
    K: AsRef<str>,
    T: ScriptStruct,
{
    trace!(record = T::TYPE_NAME, keyword = kwargs.len(), "binding keyword arguments");
    let mut fields = dest.fields_mut();
    for (index, spec) in T::FIELDS.iter().enumerate() {
        let Some(name) = spec.name else {
            continue;
        };
        let found = kwargs
            .iter()
            .find(|(key, _)| {
                let key: &str = key.as_ref();
                key == name || key == spec.ident
            })
            .map(|(_, value)| value)
            .filter(|value| !value.is_null());

        match found {
            Some(value) => decode_field(T::TYPE_NAME, &mut fields, index, value)
                .map_err(|e| e.context(format!("keyword arg '{name}'")))?,
            None if spec.optional => {}
            None => return Err(ConvertError::MissingRequired(name.to_string())),
        }
    }
    Ok(())
}
