//! Live-state introspection interface.
//!
//! This crate never reads simulator memory directly. A host (a debugger's
//! scripting layer, or the replay driver) implements [`Introspector`], and the
//! window walker and event handlers read everything through it:
//! 1. **Resolution:** Look up a named live value by symbol.
//! 2. **Dereference:** Read a named field of a structured value.
//! 3. **Paths:** Provided helpers follow dotted field paths and check value kinds.
//!
//! Handles are opaque and compared by identity. Two handles are equal exactly
//! when they refer to the same live object, regardless of its contents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{CaptureError, Result};

/// In-memory heap snapshot implementing the introspector.
pub mod heap;

/// Builder that lays out a simulator window inside a heap snapshot.
pub mod layout;

pub use heap::{HeapObject, HeapSnapshot, Slot};
pub use layout::{OpSpec, WindowLayout};

/// Opaque, non-owning reference to a live structured value.
///
/// Valid only for the duration of one introspection call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A value read from live state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    /// Integer, boolean, or enum encoding.
    Scalar(u64),
    /// Reference to a structure.
    Struct(Handle),
    /// Null pointer.
    Null,
}

/// Read-only access to named live state.
///
/// Implementors supply [`resolve`](Introspector::resolve) and
/// [`field`](Introspector::field); the remaining methods are derived.
pub trait Introspector {
    /// Resolves a top-level symbol in the current context.
    fn resolve(&self, name: &str) -> Result<Value>;

    /// Reads field `name` of the structure behind `handle`.
    fn field(&self, handle: Handle, name: &str) -> Result<Value>;

    /// Follows a dotted field path starting at `handle`.
    fn path(&self, handle: Handle, path: &str) -> Result<Value> {
        let mut value = Value::Struct(handle);
        for (depth, segment) in path.split('.').enumerate() {
            value = match value {
                Value::Struct(h) => self.field(h, segment)?,
                _ => {
                    let prefix = path.split('.').take(depth).collect::<Vec<_>>().join(".");
                    return Err(CaptureError::ExpectedStructure(prefix));
                }
            };
        }
        Ok(value)
    }

    /// Resolves a symbol that must be a scalar.
    fn resolve_scalar(&self, name: &str) -> Result<u64> {
        match self.resolve(name)? {
            Value::Scalar(v) => Ok(v),
            _ => Err(CaptureError::ExpectedScalar(name.to_string())),
        }
    }

    /// Resolves a symbol that must be a non-null structure.
    fn resolve_struct(&self, name: &str) -> Result<Handle> {
        match self.resolve(name)? {
            Value::Struct(h) => Ok(h),
            _ => Err(CaptureError::ExpectedStructure(name.to_string())),
        }
    }

    /// Reads a scalar at a dotted path below `handle`.
    fn scalar_at(&self, handle: Handle, path: &str) -> Result<u64> {
        match self.path(handle, path)? {
            Value::Scalar(v) => Ok(v),
            _ => Err(CaptureError::ExpectedScalar(path.to_string())),
        }
    }

    /// Reads a non-null structure at a dotted path below `handle`.
    fn struct_at(&self, handle: Handle, path: &str) -> Result<Handle> {
        match self.path(handle, path)? {
            Value::Struct(h) => Ok(h),
            _ => Err(CaptureError::ExpectedStructure(path.to_string())),
        }
    }

    /// Reads a possibly-null structure at a dotted path below `handle`.
    fn link_at(&self, handle: Handle, path: &str) -> Result<Option<Handle>> {
        match self.path(handle, path)? {
            Value::Struct(h) => Ok(Some(h)),
            Value::Null => Ok(None),
            Value::Scalar(_) => Err(CaptureError::ExpectedStructure(path.to_string())),
        }
    }
}
