//! Type-erased native function implementations.
//!
//! Built-in and synthesized functions carry a closure instead of a body.
//! The closure is type-erased behind an `Arc` so function declarations stay
//! cheaply cloneable and the same synthesized implementation can be shared
//! by every call site that resolves to it.

use std::fmt;
use std::sync::Arc;

use crate::{Memory, Span, TrapError, Value};

/// The callable signature of a native implementation.
///
/// Arguments arrive already evaluated, in declaration order. The span is the
/// resolved call site's origin, used only for trap messages.
pub trait NativeCallable:
    Fn(&[Value], &dyn Memory, Span) -> Result<Value, TrapError> + Send + Sync
{
}

impl<F> NativeCallable for F where
    F: Fn(&[Value], &dyn Memory, Span) -> Result<Value, TrapError> + Send + Sync
{
}

/// A shared, type-erased native implementation.
pub struct NativeImpl {
    inner: Arc<dyn NativeCallable>,
}

impl NativeImpl {
    /// Wrap a closure as a native implementation.
    pub fn new<F>(f: F) -> Self
    where
        F: NativeCallable + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke the implementation.
    pub fn call(
        &self,
        args: &[Value],
        memory: &dyn Memory,
        span: Span,
    ) -> Result<Value, TrapError> {
        (self.inner)(args, memory, span)
    }

    /// Whether two handles share the same underlying closure.
    pub fn ptr_eq(&self, other: &NativeImpl) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Clone for NativeImpl {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for NativeImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeImpl").finish_non_exhaustive()
    }
}
