//! Named handles to host functions that scripts can invoke.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type NativeFn = dyn Fn(&[Value], &[(String, Value)]) -> anyhow::Result<Value> + Send + Sync;

/// A callable script value backed by a host closure.
///
/// Clones share the same closure; two callables are equal only when they are clones
/// of each other.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl Callable {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value], &[(String, Value)]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the host function with positional and keyword arguments.
    pub fn call(&self, args: &[Value], kwargs: &[(String, Value)]) -> anyhow::Result<Value> {
        (self.func)(args, kwargs)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for Callable {}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish()
    }
}
