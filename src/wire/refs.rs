use std::collections::HashMap;
use std::sync::Arc;

use crate::error::WireError;
use crate::value::ObjRef;

// -----------------------------------------------------------------------------
// Write side

/// What the write-side table says about an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceOutcome {
    /// Not seen before; the caller must emit the full encoding. The index is
    /// what later back-references will carry.
    FirstSeen(u32),
    /// Already encoded; the caller emits a back-reference to the index.
    AlreadySeen(u32),
}

/// The write-side object reference table.
///
/// Keys are `Arc` pointer identities, so two clones of one `ObjRef` compact
/// while two structurally-equal but distinct objects do not. Indices are
/// assigned in pre-order, before the object's body is written, which is what
/// lets a graph reference an ancestor still being encoded.
///
/// One table lives exactly as long as one top-level write.
#[derive(Default)]
pub struct ReferenceTable {
    by_identity: HashMap<usize, u32>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, obj: &ObjRef) -> ReferenceOutcome {
        let key = Arc::as_ptr(obj) as *const () as usize;
        if let Some(&index) = self.by_identity.get(&key) {
            return ReferenceOutcome::AlreadySeen(index);
        }
        let index = self.by_identity.len() as u32;
        self.by_identity.insert(key, index);
        ReferenceOutcome::FirstSeen(index)
    }

    pub fn len(&self) -> usize {
        self.by_identity.len()
    }
}

// -----------------------------------------------------------------------------
// Read side

/// The read-side mirror of [`ReferenceTable`].
///
/// Slots are reserved in the same pre-order the writer assigned indices in,
/// and filled once the instance has materialized. A back-reference into a
/// slot that is reserved but unfilled is a true back-edge (an object
/// reachable from inside its own constructor arguments), which
/// constructor-based reconstruction cannot satisfy.
#[derive(Default)]
pub struct ReadReferences {
    slots: Vec<Option<ObjRef>>,
}

impl ReadReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the next index, before the object body is read.
    pub fn reserve(&mut self) -> u32 {
        self.slots.push(None);
        (self.slots.len() - 1) as u32
    }

    /// Publishes the materialized instance for its index.
    pub fn fill(&mut self, index: u32, obj: ObjRef) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            *slot = Some(obj);
        }
    }

    /// Resolves a back-reference to a materialized instance.
    pub fn resolve(&self, index: u32) -> Result<ObjRef, WireError> {
        self.slots
            .get(index as usize)
            .and_then(Option::as_ref)
            .cloned()
            .ok_or(WireError::MissingReference(index))
    }
}
