use std::sync::Arc;

use crate::error::WireError;
use crate::schema::SchemaFragment;
use crate::shape::ClassShape;
use crate::value::{ObjRef, Reflected};
use crate::wire::{SerializationContext, WireReader, WireWriter};

// -----------------------------------------------------------------------------
// CustomSerializer

/// Takes over the wire encoding of one type entirely.
///
/// When the factory finds a match here, the generic introspection pipeline
/// never runs for that type: no property discovery, no constructor
/// selection. The type-name header and reference bookkeeping stay with the
/// drivers; the serializer owns everything between.
pub trait CustomSerializer: Send + Sync {
    /// The shape this serializer is registered for.
    fn target(&self) -> &'static ClassShape;

    /// Whether this serializer takes the given type. The default matches the
    /// target by name; override for families of types.
    fn handles(&self, shape: &ClassShape) -> bool {
        shape.name() == self.target().name()
    }

    /// Encodes the object body.
    fn write(
        &self,
        obj: &dyn Reflected,
        writer: &mut WireWriter,
        ctx: &SerializationContext,
    ) -> Result<(), WireError>;

    /// Decodes one object body.
    fn read(&self, reader: &mut WireReader<'_>, ctx: &SerializationContext)
    -> Result<ObjRef, WireError>;

    /// The schema fragment for the target type, produced without an
    /// instance.
    fn describe(&self) -> SchemaFragment;
}

// -----------------------------------------------------------------------------
// Registration

/// A plugin entry: a thunk constructing one serializer.
///
/// With the `auto_register` feature, entries submitted through
/// [`inventory::submit!`] are discovered process-wide the first time a
/// factory is built without an explicit serializer list.
pub struct RegisteredSerializer {
    construct: fn() -> Arc<dyn CustomSerializer>,
}

impl RegisteredSerializer {
    pub const fn new(construct: fn() -> Arc<dyn CustomSerializer>) -> Self {
        Self { construct }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(RegisteredSerializer);

/// Discovery runs once per process, lazily; every later caller gets clones
/// of the same serializer instances.
#[cfg(feature = "auto_register")]
fn discovered() -> Vec<Arc<dyn CustomSerializer>> {
    static DISCOVERED: std::sync::OnceLock<Vec<Arc<dyn CustomSerializer>>> =
        std::sync::OnceLock::new();
    DISCOVERED
        .get_or_init(|| {
            let found: Vec<Arc<dyn CustomSerializer>> = inventory::iter::<RegisteredSerializer>
                .into_iter()
                .map(|entry| (entry.construct)())
                .collect();
            log::debug!("discovered {} registered custom serializers", found.len());
            found
        })
        .clone()
}

#[cfg(not(feature = "auto_register"))]
fn discovered() -> Vec<Arc<dyn CustomSerializer>> {
    Vec::new()
}

// -----------------------------------------------------------------------------
// CustomRegistry

/// The ordered set of custom serializers a factory consults.
///
/// Registration order is precedence: the first serializer whose
/// [`handles`](CustomSerializer::handles) accepts a shape wins.
pub struct CustomRegistry {
    serializers: Vec<Arc<dyn CustomSerializer>>,
}

impl CustomRegistry {
    /// An explicit list. Built-ins are appended after, so callers can
    /// shadow them.
    pub fn with_serializers(mut serializers: Vec<Arc<dyn CustomSerializer>>) -> Self {
        serializers.extend(crate::registry::builtin::builtin_serializers());
        Self { serializers }
    }

    /// Plugin discovery plus built-ins. Used when no explicit list was
    /// supplied.
    pub fn discovering() -> Self {
        Self::with_serializers(discovered())
    }

    /// The first registered serializer accepting the shape.
    pub fn find(&self, shape: &ClassShape) -> Option<Arc<dyn CustomSerializer>> {
        self.serializers
            .iter()
            .find(|s| s.handles(shape))
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CustomSerializer>> {
        self.serializers.iter()
    }
}
