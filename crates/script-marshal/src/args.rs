//! Positional plus keyword argument binding.
//!
//! Positional arguments bind by `position`, keyword arguments by `name`. Keywords are
//! applied after positionals, so a keyword wins when both supply the same field. A
//! field is optional unless declared `required(true)`; fields with neither a name nor
//! a position are not bound at all.

use crate::error::{ConvertError, Result};
use crate::fields::{decode_field, FieldSpec, ScriptStruct};
use script_value::Value;
use std::collections::HashMap;
use tracing::trace;

/// Bind a script call's positional and keyword arguments onto `dest`.
///
/// ```
/// use script_marshal::{bind_args, script_struct, Value};
///
/// #[derive(Default)]
/// struct Open {
///     path: String,
///     mode: String,
/// }
///
/// script_struct!(Open {
///     path: name("path").position(0).required(true),
///     mode: name("mode").position(1),
/// });
///
/// let mut params = Open::default();
/// bind_args(&[Value::from("/etc/hosts")], &[("mode", Value::from("r"))], &mut params).unwrap();
/// assert_eq!(params.path, "/etc/hosts");
/// assert_eq!(params.mode, "r");
/// ```
pub fn bind_args<K, T>(args: &[Value], kwargs: &[(K, Value)], dest: &mut T) -> Result<()>
where
    K: AsRef<str>,
    T: ScriptStruct,
{
    trace!(
        record = T::TYPE_NAME,
        positional = args.len(),
        keyword = kwargs.len(),
        "binding call arguments"
    );
    let table = ParamTable::build(T::TYPE_NAME, T::FIELDS)?;
    let mut set = vec![false; T::FIELDS.len()];
    let mut fields = dest.fields_mut();

    for (i, arg) in args.iter().enumerate() {
        let index = table
            .positions
            .get(&i)
            .copied()
            .ok_or(ConvertError::UnexpectedPositional(i))?;
        decode_field(T::TYPE_NAME, &mut fields, index, arg)
            .map_err(|e| e.context(format!("positional arg {i}")))?;
        set[index] = true;
    }

    for (name, value) in kwargs {
        let name: &str = name.as_ref();
        let index = table
            .names
            .get(name)
            .copied()
            .ok_or_else(|| ConvertError::UnknownKeyword(name.to_string()))?;
        decode_field(T::TYPE_NAME, &mut fields, index, value)
            .map_err(|e| e.context(format!("keyword arg '{name}'")))?;
        set[index] = true;
    }

    for (spec, was_set) in T::FIELDS.iter().zip(&set) {
        if spec.is_bound() && spec.required && !was_set {
            return Err(ConvertError::MissingRequired(spec.label()));
        }
    }
    Ok(())
}

/// Position and name lookups over a field table.
struct ParamTable {
    positions: HashMap<usize, usize>,
    names: HashMap<&'static str, usize>,
}

impl ParamTable {
    /// Fails when two fields claim the same position or the same name.
    fn build(record: &'static str, fields: &[FieldSpec]) -> Result<Self> {
        let mut table = ParamTable {
            positions: HashMap::new(),
            names: HashMap::new(),
        };
        for (index, spec) in fields.iter().enumerate() {
            if let Some(position) = spec.position {
                if let Some(previous) = table.positions.insert(position, index) {
                    return Err(ConvertError::Malformed {
                        record,
                        message: format!(
                            "fields '{}' and '{}' both claim position {position}",
                            fields[previous].ident, spec.ident
                        ),
                    });
                }
            }
            if let Some(name) = spec.name {
                if let Some(previous) = table.names.insert(name, index) {
                    return Err(ConvertError::Malformed {
                        record,
                        message: format!(
                            "fields '{}' and '{}' both claim name '{name}'",
                            fields[previous].ident, spec.ident
                        ),
                    });
                }
            }
        }
        Ok(table)
    }
}
