use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::WireError;
use crate::introspect::{plan_object, ObjectPlan};
use crate::registry::{CustomRegistry, CustomSerializer, Whitelist};
use crate::shape::{ClassShape, TypeShape};
use crate::value::{downcast_object, ObjRef, Shaped};
use crate::wire::{ReadDriver, SerializationContext, UseCase, WriteDriver};

// -----------------------------------------------------------------------------
// Compiled

/// What the factory compiles a type into.
pub enum Compiled {
    /// A registered serializer owns the body encoding.
    Custom(Arc<dyn CustomSerializer>),
    /// The generic pipeline: introspected plan, ctor- or setter-driven.
    Object(ObjectPlan),
}

// -----------------------------------------------------------------------------
// SerializerFactory

type CacheKey = (u64, &'static str);

/// Compiles and caches serializers, and runs the top-level wire operations.
///
/// The cache is keyed by (loading-scope id, type name): each scope compiles
/// its own serializers once, and concurrent first uses of a type still
/// produce a single compilation (the build happens under the write lock).
pub struct SerializerFactory {
    whitelist: Whitelist,
    customs: CustomRegistry,
    cache: RwLock<HashMap<CacheKey, Arc<Compiled>>>,
}

impl std::fmt::Debug for SerializerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializerFactory").finish_non_exhaustive()
    }
}

impl SerializerFactory {
    pub fn new(whitelist: Whitelist, customs: CustomRegistry) -> Self {
        Self {
            whitelist,
            customs,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Standard whitelist plus plugin-discovered custom serializers.
    pub fn with_defaults() -> Self {
        Self::new(Whitelist::standard(), CustomRegistry::discovering())
    }

    /// The compiled serializer for a type, building it on first use.
    ///
    /// The whitelist gate runs before anything else, on every call: a cache
    /// hit never bypasses it.
    pub fn get(
        &self,
        shape: &'static ClassShape,
        ctx: &SerializationContext,
    ) -> Result<Arc<Compiled>, WireError> {
        self.whitelist.require_authorized(shape)?;

        let key = (ctx.scope().id(), shape.name());
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // A racing thread may have built it between the two locks.
        if let Some(hit) = cache.get(&key) {
            return Ok(Arc::clone(hit));
        }
        log::trace!(
            "compiling serializer for `{}` in scope {}",
            shape.name(),
            ctx.scope().id()
        );
        let compiled = Arc::new(self.compile(shape)?);
        cache.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    fn compile(&self, shape: &'static ClassShape) -> Result<Compiled, WireError> {
        if let Some(custom) = self.customs.find(shape) {
            return Ok(Compiled::Custom(custom));
        }
        Ok(Compiled::Object(plan_object(
            shape,
            &TypeShape::Class(shape),
        )?))
    }

    /// Encodes one object graph into a standalone wire blob.
    pub fn serialize(
        &self,
        obj: &ObjRef,
        ctx: &SerializationContext,
    ) -> Result<Vec<u8>, WireError> {
        refuse_checkpoint(ctx)?;
        WriteDriver::new(self, ctx).write_graph(obj)
    }

    /// Decodes a wire blob back into an object graph.
    pub fn deserialize(
        &self,
        bytes: &[u8],
        ctx: &SerializationContext,
    ) -> Result<ObjRef, WireError> {
        refuse_checkpoint(ctx)?;
        ReadDriver::new(self, ctx).read_graph(bytes)
    }

    /// [`deserialize`](Self::deserialize) plus a downcast to the expected
    /// concrete type.
    pub fn deserialize_as<T: Shaped>(
        &self,
        bytes: &[u8],
        ctx: &SerializationContext,
    ) -> Result<Arc<T>, WireError> {
        downcast_object(self.deserialize(bytes, ctx)?)
    }
}

fn refuse_checkpoint(ctx: &SerializationContext) -> Result<(), WireError> {
    if ctx.use_case() == UseCase::Checkpoint {
        Err(WireError::UnsupportedUseCase(UseCase::Checkpoint.name()))
    } else {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Environment

/// Supplies purpose-built factories for the RPC use cases.
pub trait FactorySelector: Send + Sync {
    fn rpc_client(
        &self,
        _ctx: &SerializationContext,
    ) -> Result<Arc<SerializerFactory>, WireError> {
        Err(WireError::NotSupported("rpc client factory"))
    }

    fn rpc_server(
        &self,
        _ctx: &SerializationContext,
    ) -> Result<Arc<SerializerFactory>, WireError> {
        Err(WireError::NotSupported("rpc server factory"))
    }
}

/// The long-lived owner of the default factory and the optional RPC
/// selector. One environment per process is the expected deployment.
pub struct SerializationEnvironment {
    default_factory: Arc<SerializerFactory>,
    selector: Option<Box<dyn FactorySelector>>,
}

impl SerializationEnvironment {
    pub fn new(default_factory: Arc<SerializerFactory>) -> Self {
        Self {
            default_factory,
            selector: None,
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn FactorySelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn default_factory(&self) -> &Arc<SerializerFactory> {
        &self.default_factory
    }

    /// Picks the factory for a context's use case.
    pub fn factory_for(
        &self,
        ctx: &SerializationContext,
    ) -> Result<Arc<SerializerFactory>, WireError> {
        match ctx.use_case() {
            UseCase::Checkpoint => Err(WireError::UnsupportedUseCase(UseCase::Checkpoint.name())),
            UseCase::RpcClient => match &self.selector {
                Some(selector) => selector.rpc_client(ctx),
                None => Err(WireError::NotSupported("rpc client factory")),
            },
            UseCase::RpcServer => match &self.selector {
                Some(selector) => selector.rpc_server(ctx),
                None => Err(WireError::NotSupported("rpc server factory")),
            },
            _ => Ok(Arc::clone(&self.default_factory)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{SerializationEnvironment, SerializerFactory};
    use crate::error::WireError;
    use crate::registry::LoadingScope;
    use crate::shape::{ClassKind, ClassShape};
    use crate::wire::{SerializationContext, UseCase};

    static MARKED: ClassShape =
        ClassShape::new("t::Marked", ClassKind::Interface).with_marker();

    fn ctx() -> SerializationContext {
        SerializationContext::new(Arc::new(LoadingScope::new()))
    }

    #[test]
    fn repeated_gets_share_one_compilation() {
        let factory = SerializerFactory::with_defaults();
        let ctx = ctx();
        let first = factory.get(&MARKED, &ctx).unwrap();
        let second = factory.get(&MARKED, &ctx).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn scopes_do_not_share_cache_entries() {
        let factory = SerializerFactory::with_defaults();
        let first = factory.get(&MARKED, &ctx()).unwrap();
        let second = factory.get(&MARKED, &ctx()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn checkpoint_use_case_is_refused() {
        let factory = SerializerFactory::with_defaults();
        let ctx = ctx().with_use_case(UseCase::Checkpoint);
        let err = factory.deserialize(&[], &ctx).unwrap_err();
        assert!(matches!(err, WireError::UnsupportedUseCase(_)));
    }

    #[test]
    fn rpc_use_cases_require_a_selector() {
        let env = SerializationEnvironment::new(Arc::new(SerializerFactory::with_defaults()));
        assert!(env.factory_for(&ctx()).is_ok());
        let err = env
            .factory_for(&ctx().with_use_case(UseCase::RpcClient))
            .unwrap_err();
        assert!(matches!(err, WireError::NotSupported(_)));
    }
}
