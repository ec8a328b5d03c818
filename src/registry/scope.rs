use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::shape::ClassShape;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// The type-loading scope: resolves wire type names back to descriptor
/// tables.
///
/// Every scope gets a process-unique id; the factory cache is keyed by it,
/// so two scopes never share compiled serializers even when they register
/// the same type names.
pub struct LoadingScope {
    id: u64,
    by_name: HashMap<&'static str, &'static ClassShape>,
}

impl LoadingScope {
    /// A fresh scope, pre-populated with the built-in shapes.
    pub fn new() -> Self {
        let mut scope = Self {
            id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
            by_name: HashMap::new(),
        };
        for shape in crate::registry::builtin::builtin_shapes() {
            scope.register(shape);
        }
        scope
    }

    #[inline]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Registers a shape under its full name. Re-registration replaces.
    pub fn register(&mut self, shape: &'static ClassShape) -> &mut Self {
        self.by_name.insert(shape.name(), shape);
        self
    }

    pub fn register_all(&mut self, shapes: &[&'static ClassShape]) -> &mut Self {
        for shape in shapes {
            self.register(shape);
        }
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&'static ClassShape> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }
}

impl Default for LoadingScope {
    fn default() -> Self {
        Self::new()
    }
}
