//! Heap snapshot: an arena-backed introspector.
//!
//! A `HeapSnapshot` is a frozen copy of the parts of simulator memory the
//! handlers read. Objects live in an arena and are addressed by index, so a
//! [`Handle`] is simply the arena slot and identity comparison is index
//! equality. Snapshots deserialize from JSON, which is how the replay driver
//! feeds dumped debugger state back into the event handlers:
//!
//! ```json
//! {
//!   "globals": { "cycle_count": 120, "op": { "ref": 2 } },
//!   "objects": [ { "node_head": { "ref": 1 } }, { "done_cycle": 0, "next_node": null } ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Handle, Introspector, Value};
use crate::common::{CaptureError, Result};

/// A stored field or global value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot {
    /// Integer or enum encoding.
    Scalar(u64),
    /// Boolean, read back as 0 or 1.
    Flag(bool),
    /// Reference to another object in the arena.
    Ref {
        /// Arena index of the referenced object.
        #[serde(rename = "ref")]
        target: u64,
    },
    /// Null pointer.
    Null,
}

impl Slot {
    /// Creates a reference slot pointing at `handle`.
    pub const fn to(handle: Handle) -> Self {
        Self::Ref { target: handle.0 }
    }

    /// Creates a reference slot, or a null slot when `handle` is `None`.
    pub const fn link(handle: Option<Handle>) -> Self {
        match handle {
            Some(h) => Self::to(h),
            None => Self::Null,
        }
    }

    const fn value(self) -> Value {
        match self {
            Self::Scalar(v) => Value::Scalar(v),
            Self::Flag(b) => Value::Scalar(b as u64),
            Self::Ref { target } => Value::Struct(Handle(target)),
            Self::Null => Value::Null,
        }
    }
}

impl From<u64> for Slot {
    fn from(v: u64) -> Self {
        Self::Scalar(v)
    }
}

impl From<bool> for Slot {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// A single structured object: a map from field name to slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeapObject {
    /// Field values keyed by name.
    pub fields: BTreeMap<String, Slot>,
}

impl HeapObject {
    /// Creates an object with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field, returning the object for chaining.
    #[must_use]
    pub fn with(mut self, name: &str, slot: impl Into<Slot>) -> Self {
        let _ = self.fields.insert(name.to_string(), slot.into());
        self
    }
}

/// Arena of objects plus a global symbol table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapSnapshot {
    /// Top-level symbols visible to [`Introspector::resolve`].
    #[serde(default)]
    pub globals: BTreeMap<String, Slot>,
    /// Object arena; a handle is an index into this vector.
    #[serde(default)]
    pub objects: Vec<HeapObject>,
}

impl HeapSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of objects in the arena.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the arena holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Moves `object` into the arena and returns its handle.
    pub fn alloc(&mut self, object: HeapObject) -> Handle {
        self.objects.push(object);
        Handle((self.objects.len() - 1) as u64)
    }

    /// Binds a top-level symbol.
    pub fn set_global(&mut self, name: &str, slot: impl Into<Slot>) {
        let _ = self.globals.insert(name.to_string(), slot.into());
    }

    /// Removes a top-level symbol, as when the frame that defined it is left.
    pub fn unset_global(&mut self, name: &str) {
        let _ = self.globals.remove(name);
    }

    /// Returns the object behind `handle`.
    pub fn object(&self, handle: Handle) -> Result<&HeapObject> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|i| self.objects.get(i))
            .ok_or(CaptureError::DanglingHandle(handle))
    }

    fn object_mut(&mut self, handle: Handle) -> Result<&mut HeapObject> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|i| self.objects.get_mut(i))
            .ok_or(CaptureError::DanglingHandle(handle))
    }

    /// Sets a field at a dotted path below `handle`, allocating intermediate
    /// objects that do not exist yet.
    pub fn set_path(&mut self, handle: Handle, path: &str, slot: impl Into<Slot>) -> Result<()> {
        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };

        let mut current = handle;
        for segment in parents.into_iter().flat_map(|p| p.split('.')) {
            let existing = self.object(current)?.fields.get(segment).copied();
            current = match existing {
                Some(Slot::Ref { target }) => Handle(target),
                Some(_) => return Err(CaptureError::ExpectedStructure(segment.to_string())),
                None => {
                    let child = self.alloc(HeapObject::new());
                    let _ = self
                        .object_mut(current)?
                        .fields
                        .insert(segment.to_string(), Slot::to(child));
                    child
                }
            };
        }

        let _ = self
            .object_mut(current)?
            .fields
            .insert(leaf.to_string(), slot.into());
        Ok(())
    }
}

impl Introspector for HeapSnapshot {
    fn resolve(&self, name: &str) -> Result<Value> {
        self.globals
            .get(name)
            .map(|slot| slot.value())
            .ok_or_else(|| CaptureError::UnresolvedSymbol(name.to_string()))
    }

    fn field(&self, handle: Handle, name: &str) -> Result<Value> {
        self.object(handle)?
            .fields
            .get(name)
            .map(|slot| slot.value())
            .ok_or_else(|| CaptureError::MissingField {
                handle,
                field: name.to_string(),
            })
    }
}
