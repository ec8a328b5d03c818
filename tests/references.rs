mod common;

use std::sync::Arc;

use common::{demo_ctx, Address, Person};
use typewire::{ObjRef, SerializerFactory};

fn shared_address_person() -> ObjRef {
    let shared = Arc::new(Address {
        street: "1 Elm St".into(),
        city: "Springfield".into(),
    });
    Arc::new(Person {
        name: "Ada".into(),
        home: Arc::clone(&shared),
        work: shared,
    })
}

#[test]
fn shared_objects_compact_and_keep_identity() {
    let factory = SerializerFactory::with_defaults();
    let ctx = demo_ctx();
    let person = shared_address_person();

    let bytes = factory.serialize(&person, &ctx).unwrap();
    let back: Arc<Person> = factory.deserialize_as(&bytes, &ctx).unwrap();

    // One full encoding, one back-reference: the two fields must come back
    // as the same instance, not equal copies.
    assert!(Arc::ptr_eq(&back.home, &back.work));
    assert_eq!(back.home.street, "1 Elm St");
}

#[test]
fn compaction_actually_shrinks_the_blob() {
    let factory = SerializerFactory::with_defaults();
    let person = shared_address_person();

    let compact = factory
        .serialize(&person, &demo_ctx().with_object_references(true))
        .unwrap();
    let expanded = factory
        .serialize(&person, &demo_ctx().with_object_references(false))
        .unwrap();
    assert!(compact.len() < expanded.len());
}

#[test]
fn disabling_references_yields_distinct_instances() {
    let factory = SerializerFactory::with_defaults();
    let ctx = demo_ctx().with_object_references(false);
    let person = shared_address_person();

    let bytes = factory.serialize(&person, &ctx).unwrap();
    let back: Arc<Person> = factory.deserialize_as(&bytes, &ctx).unwrap();

    assert!(!Arc::ptr_eq(&back.home, &back.work));
    assert_eq!(back.home.street, back.work.street);
}
