mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{demo_ctx, Sneaky, SNEAKY_CONSTRUCTED, SNEAKY_SHAPE};
use typewire::{
    CustomRegistry, ObjRef, SerializerFactory, Whitelist, WhitelistProvider, WireError,
};

struct AllowSneaky;
impl WhitelistProvider for AllowSneaky {
    fn allowed_types(&self) -> &[&'static str] {
        &["demo::Sneaky"]
    }
}

fn permissive_factory() -> SerializerFactory {
    SerializerFactory::new(
        Whitelist::from_providers(&[&AllowSneaky]),
        CustomRegistry::with_serializers(Vec::new()),
    )
}

#[test]
fn hostile_blobs_cannot_trigger_constructor_side_effects() {
    let ctx = demo_ctx();

    // Craft a valid blob naming the unauthorized type, using a deliberately
    // permissive factory. Serialization only reads getters, so the flag
    // stays untouched.
    let sneaky: ObjRef = Arc::new(Sneaky { tag: 7 });
    let blob = permissive_factory().serialize(&sneaky, &ctx).unwrap();
    assert!(!SNEAKY_CONSTRUCTED.load(Ordering::SeqCst));

    // The default gate refuses the type before anything is instantiated.
    let err = SerializerFactory::with_defaults()
        .deserialize(&blob, &ctx)
        .unwrap_err();
    assert!(matches!(err, WireError::NotWhitelisted(name) if name == "demo::Sneaky"));
    assert!(!SNEAKY_CONSTRUCTED.load(Ordering::SeqCst));

    // Control: the permissive factory does run the constructor, so the side
    // effect above is real and the gate is what prevented it.
    let back = permissive_factory().deserialize(&blob, &ctx).unwrap();
    assert!(SNEAKY_CONSTRUCTED.load(Ordering::SeqCst));
    assert_eq!(back.downcast_ref::<Sneaky>().unwrap().tag, 7);
}

#[test]
fn serialization_is_gated_too() {
    let sneaky: ObjRef = Arc::new(Sneaky { tag: 1 });
    let err = SerializerFactory::with_defaults()
        .serialize(&sneaky, &demo_ctx())
        .unwrap_err();
    assert!(matches!(err, WireError::NotWhitelisted(_)));
}

#[test]
fn gate_runs_for_nested_types_not_just_the_root() {
    // A whitelisted root with an unauthorized nested object still fails.
    let ctx = demo_ctx();
    let carton: ObjRef = Arc::new(common::Carton {
        payload: Arc::new(Sneaky { tag: 2 }),
    });
    let err = SerializerFactory::with_defaults()
        .serialize(&carton, &ctx)
        .unwrap_err();
    assert!(matches!(err.root(), WireError::NotWhitelisted(_)));
}

#[test]
fn the_scope_knows_the_type_only_the_gate_refuses_it() {
    assert!(demo_ctx().scope().resolve(SNEAKY_SHAPE.name()).is_some());
}
