use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::registry::LoadingScope;

/// The current wire format revision, written into every blob header.
pub const WIRE_VERSION: u8 = 1;

/// Why a serialization is happening. Schemes may refuse use cases they do
/// not support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UseCase {
    /// Peer-to-peer messaging between live nodes.
    P2p,
    /// Durable storage.
    Storage,
    /// Whole-system state snapshots. The default scheme refuses this.
    Checkpoint,
    RpcClient,
    RpcServer,
    Testing,
}

impl UseCase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::P2p => "p2p",
            Self::Storage => "storage",
            Self::Checkpoint => "checkpoint",
            Self::RpcClient => "rpc client",
            Self::RpcServer => "rpc server",
            Self::Testing => "testing",
        }
    }
}

/// The immutable parameters of one serialization or deserialization.
///
/// Contexts are cheap to clone and adjusted with the `with_*` builders;
/// nothing mutates a context once the drivers hold it.
#[derive(Clone)]
pub struct SerializationContext {
    wire_version: u8,
    scope: Arc<LoadingScope>,
    use_case: UseCase,
    properties: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
    object_references: bool,
}

impl SerializationContext {
    pub fn new(scope: Arc<LoadingScope>) -> Self {
        Self {
            wire_version: WIRE_VERSION,
            scope,
            use_case: UseCase::P2p,
            properties: HashMap::new(),
            object_references: true,
        }
    }

    #[inline]
    pub const fn wire_version(&self) -> u8 {
        self.wire_version
    }

    #[inline]
    pub fn scope(&self) -> &Arc<LoadingScope> {
        &self.scope
    }

    #[inline]
    pub const fn use_case(&self) -> UseCase {
        self.use_case
    }

    /// Whether repeated objects compact into back-references.
    #[inline]
    pub const fn object_references(&self) -> bool {
        self.object_references
    }

    pub fn with_wire_version(mut self, version: u8) -> Self {
        self.wire_version = version;
        self
    }

    pub fn with_use_case(mut self, use_case: UseCase) -> Self {
        self.use_case = use_case;
        self
    }

    pub fn with_object_references(mut self, enabled: bool) -> Self {
        self.object_references = enabled;
        self
    }

    /// Attaches an opaque side-channel value for custom serializers.
    pub fn with_property(
        mut self,
        key: &'static str,
        value: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Reads back a side-channel value by key and type.
    pub fn property<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.properties
            .get(key)
            .cloned()
            .and_then(|value| value.downcast().ok())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{SerializationContext, UseCase};
    use crate::registry::LoadingScope;

    #[test]
    fn builders_copy_rather_than_mutate() {
        let base = SerializationContext::new(Arc::new(LoadingScope::new()));
        let storage = base.clone().with_use_case(UseCase::Storage);
        assert_eq!(base.use_case(), UseCase::P2p);
        assert_eq!(storage.use_case(), UseCase::Storage);
    }

    #[test]
    fn property_bag_is_typed() {
        let ctx = SerializationContext::new(Arc::new(LoadingScope::new()))
            .with_property("tenant", Arc::new(42u32));
        assert_eq!(ctx.property::<u32>("tenant").as_deref(), Some(&42));
        assert!(ctx.property::<String>("tenant").is_none());
        assert!(ctx.property::<u32>("missing").is_none());
    }
}
