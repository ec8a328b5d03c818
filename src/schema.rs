//! Schema fragments for documentation and peer negotiation.
//!
//! Fragments are produced from compiled serializers alone; no live instance
//! is ever constructed or read. They serialize with `serde`, so callers can
//! emit JSON (or anything else) for tooling.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

use crate::registry::Compiled;

// -----------------------------------------------------------------------------
// Fragments

/// One property in a schema fragment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the wire value may be null.
    pub mandatory: bool,
}

/// The wire-visible description of one type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaFragment {
    /// The full type name, as written on the wire.
    pub name: String,
    /// The human-facing label from the descriptor table.
    pub label: String,
    /// Names of every transitively satisfied supertype.
    pub provides: Vec<String>,
    /// How the type is serialized: `"introspected"` or `"custom"`.
    pub source: &'static str,
    pub fields: Vec<SchemaField>,
}

/// Produces the schema fragment for a compiled serializer.
pub fn describe(compiled: &Compiled) -> SchemaFragment {
    match compiled {
        Compiled::Custom(custom) => custom.describe(),
        Compiled::Object(plan) => {
            let shape = plan.shape();
            let mut provides = Vec::new();
            supertype_closure(shape, &mut provides);
            SchemaFragment {
                name: shape.name().to_owned(),
                label: shape.label().to_owned(),
                provides,
                source: "introspected",
                fields: plan
                    .properties()
                    .iter()
                    .map(|info| SchemaField {
                        name: info.name().to_owned(),
                        ty: info.ty().to_string(),
                        mandatory: !info.ty().is_nullable(),
                    })
                    .collect(),
            }
        }
    }
}

/// Every class in the supertype lattice, depth-first, deduplicated by name.
fn supertype_closure(shape: &'static crate::shape::ClassShape, out: &mut Vec<String>) {
    for supertype in shape.supertypes() {
        let Some(class) = supertype.class() else {
            continue;
        };
        if out.iter().any(|name| name == class.name()) {
            continue;
        }
        out.push(class.name().to_owned());
        supertype_closure(class, out);
    }
}

// -----------------------------------------------------------------------------
// Schema

/// An ordered collection of fragments.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Schema {
    fragments: Vec<SchemaFragment>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fragment: SchemaFragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    pub fn fragments(&self) -> &[SchemaFragment] {
        &self.fragments
    }

    /// The fragments reordered so that a type's field types precede it.
    ///
    /// Only references to types present in this schema count as
    /// dependencies; cyclic leftovers keep their insertion order.
    pub fn ordered(&self) -> Vec<SchemaFragment> {
        dependency_order(
            self.fragments.clone(),
            |fragment| fragment.name.clone(),
            |fragment| fragment.fields.iter().map(|f| f.ty.clone()).collect(),
        )
    }
}

/// Stable topological sort.
///
/// Emits items whose (present) dependencies have all been emitted,
/// preserving input order among ready items; anything still blocked at the
/// end (a cycle) is appended in input order rather than dropped.
pub fn dependency_order<T, K>(
    items: Vec<T>,
    key: impl Fn(&T) -> K,
    deps: impl Fn(&T) -> Vec<K>,
) -> Vec<T>
where
    K: Eq + Hash,
{
    let known: HashSet<K> = items.iter().map(&key).collect();
    let mut emitted: HashSet<K> = HashSet::new();
    let mut pending: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(pending.len());

    loop {
        let mut progressed = false;
        for slot in pending.iter_mut() {
            let ready = slot.as_ref().is_some_and(|item| {
                deps(item)
                    .iter()
                    .all(|d| !known.contains(d) || emitted.contains(d) || *d == key(item))
            });
            if ready {
                if let Some(item) = slot.take() {
                    emitted.insert(key(&item));
                    out.push(item);
                    progressed = true;
                }
            }
        }
        if !progressed {
            break;
        }
    }

    // Cycles: emit what is left, input order.
    out.extend(pending.into_iter().flatten());
    out
}
