#![allow(dead_code)]

//! Shared fixture types for the integration suites.

use std::any::Any;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use typewire::shape::{
    ClassKind, ClassShape, ConstructorShape, MethodShape, ParamShape, Primitive, TypeParamShape,
    TypeShape, TypeThunk,
};
use typewire::{
    expect_args, LoadingScope, ObjRef, Reflected, SerializationContext, Shaped, Value, WireError,
};

fn str_ty() -> TypeShape {
    TypeShape::Primitive(Primitive::Str)
}
fn i64_ty() -> TypeShape {
    TypeShape::Primitive(Primitive::I64)
}
fn bytes_list_ty() -> TypeShape {
    TypeShape::array_of(TypeShape::Primitive(Primitive::Bytes))
}
fn address_ty() -> TypeShape {
    TypeShape::Class(&ADDRESS_SHAPE)
}
fn variable_t() -> TypeShape {
    TypeShape::variable("T")
}

// -----------------------------------------------------------------------------
// Address

pub struct Address {
    pub street: String,
    pub city: String,
}

impl Reflected for Address {
    fn shape(&self) -> &'static ClassShape {
        &ADDRESS_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Shaped for Address {
    fn class_shape() -> &'static ClassShape {
        &ADDRESS_SHAPE
    }
}

fn address_street(obj: &dyn Reflected) -> Value {
    Value::Str(obj.downcast_ref::<Address>().unwrap().street.clone())
}
fn address_city(obj: &dyn Reflected) -> Value {
    Value::Str(obj.downcast_ref::<Address>().unwrap().city.clone())
}
fn address_new(args: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
    let [street, city] = expect_args(args, "demo::Address")?;
    Ok(Box::new(Address {
        street: street.expect_str()?,
        city: city.expect_str()?,
    }))
}

pub static ADDRESS_SHAPE: ClassShape = ClassShape::new("demo::Address", ClassKind::Concrete)
    .with_marker()
    .with_methods(&[
        MethodShape::getter("get_street", str_ty, address_street),
        MethodShape::getter("get_city", str_ty, address_city),
    ])
    .with_constructors(&[ConstructorShape::new(
        &[
            ParamShape::new("street", str_ty),
            ParamShape::new("city", str_ty),
        ],
        address_new,
    )]);

// -----------------------------------------------------------------------------
// Person (two address references, possibly shared)

pub struct Person {
    pub name: String,
    pub home: Arc<Address>,
    pub work: Arc<Address>,
}

impl Reflected for Person {
    fn shape(&self) -> &'static ClassShape {
        &PERSON_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Shaped for Person {
    fn class_shape() -> &'static ClassShape {
        &PERSON_SHAPE
    }
}

fn person_name(obj: &dyn Reflected) -> Value {
    Value::Str(obj.downcast_ref::<Person>().unwrap().name.clone())
}
fn person_home(obj: &dyn Reflected) -> Value {
    Value::Object(obj.downcast_ref::<Person>().unwrap().home.clone())
}
fn person_work(obj: &dyn Reflected) -> Value {
    Value::Object(obj.downcast_ref::<Person>().unwrap().work.clone())
}
fn person_new(args: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
    let [name, home, work] = expect_args(args, "demo::Person")?;
    Ok(Box::new(Person {
        name: name.expect_str()?,
        home: home.expect_instance()?,
        work: work.expect_instance()?,
    }))
}

pub static PERSON_SHAPE: ClassShape = ClassShape::new("demo::Person", ClassKind::Concrete)
    .with_marker()
    .with_methods(&[
        MethodShape::getter("get_name", str_ty, person_name),
        MethodShape::getter("get_home", address_ty, person_home),
        MethodShape::getter("get_work", address_ty, person_work),
    ])
    .with_constructors(&[ConstructorShape::new(
        &[
            ParamShape::new("name", str_ty),
            ParamShape::new("home", address_ty),
            ParamShape::new("work", address_ty),
        ],
        person_new,
    )]);

// -----------------------------------------------------------------------------
// Counter (setter-driven bean, one unpaired getter)

#[derive(Default)]
pub struct Counter {
    pub count: i64,
    pub note: String,
}

impl Reflected for Counter {
    fn shape(&self) -> &'static ClassShape {
        &COUNTER_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Shaped for Counter {
    fn class_shape() -> &'static ClassShape {
        &COUNTER_SHAPE
    }
}

fn counter_count(obj: &dyn Reflected) -> Value {
    Value::I64(obj.downcast_ref::<Counter>().unwrap().count)
}
fn counter_note(obj: &dyn Reflected) -> Value {
    Value::Str(obj.downcast_ref::<Counter>().unwrap().note.clone())
}
fn counter_snapshot(obj: &dyn Reflected) -> Value {
    let counter = obj.downcast_ref::<Counter>().unwrap();
    Value::Str(format!("{}@{}", counter.note, counter.count))
}
fn counter_set_count(obj: &mut dyn Reflected, value: Value) -> Result<(), WireError> {
    obj.downcast_mut::<Counter>().unwrap().count = value.expect_i64()?;
    Ok(())
}
fn counter_set_note(obj: &mut dyn Reflected, value: Value) -> Result<(), WireError> {
    obj.downcast_mut::<Counter>().unwrap().note = value.expect_str()?;
    Ok(())
}
fn counter_new(_: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
    Ok(Box::new(Counter::default()))
}

static I64_PARAM: &[TypeThunk] = &[i64_ty];
static STR_PARAM: &[TypeThunk] = &[str_ty];

pub static COUNTER_SHAPE: ClassShape = ClassShape::new("demo::Counter", ClassKind::Concrete)
    .with_marker()
    .with_methods(&[
        MethodShape::getter("get_count", i64_ty, counter_count),
        MethodShape::getter("get_note", str_ty, counter_note),
        // No matching setter: must not be carried on the wire.
        MethodShape::getter("get_snapshot", str_ty, counter_snapshot),
        MethodShape::setter("set_count", I64_PARAM, counter_set_count),
        MethodShape::setter("set_note", STR_PARAM, counter_set_note),
    ])
    .with_constructors(&[ConstructorShape::new(&[], counter_new)]);

// -----------------------------------------------------------------------------
// Sneaky (constructor with an observable side effect, never authorized)

pub static SNEAKY_CONSTRUCTED: AtomicBool = AtomicBool::new(false);

pub struct Sneaky {
    pub tag: i64,
}

impl Reflected for Sneaky {
    fn shape(&self) -> &'static ClassShape {
        &SNEAKY_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

fn sneaky_tag(obj: &dyn Reflected) -> Value {
    Value::I64(obj.downcast_ref::<Sneaky>().unwrap().tag)
}
fn sneaky_new(args: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
    SNEAKY_CONSTRUCTED.store(true, std::sync::atomic::Ordering::SeqCst);
    let [tag] = expect_args(args, "demo::Sneaky")?;
    Ok(Box::new(Sneaky {
        tag: tag.expect_i64()?,
    }))
}

pub static SNEAKY_SHAPE: ClassShape = ClassShape::new("demo::Sneaky", ClassKind::Concrete)
    .with_methods(&[MethodShape::getter("get_tag", i64_ty, sneaky_tag)])
    .with_constructors(&[ConstructorShape::new(
        &[ParamShape::new("tag", i64_ty)],
        sneaky_new,
    )]);

// -----------------------------------------------------------------------------
// BlobHolder (byte buffers never compact)

pub struct BlobHolder {
    pub blobs: Vec<Vec<u8>>,
}

impl Reflected for BlobHolder {
    fn shape(&self) -> &'static ClassShape {
        &BLOB_HOLDER_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Shaped for BlobHolder {
    fn class_shape() -> &'static ClassShape {
        &BLOB_HOLDER_SHAPE
    }
}

fn blob_holder_blobs(obj: &dyn Reflected) -> Value {
    let holder = obj.downcast_ref::<BlobHolder>().unwrap();
    Value::List(holder.blobs.iter().map(|b| Value::Bytes(b.clone())).collect())
}
fn blob_holder_new(args: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
    let [blobs] = expect_args(args, "demo::BlobHolder")?;
    let blobs = blobs
        .expect_list()?
        .into_iter()
        .map(Value::expect_bytes)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(BlobHolder { blobs }))
}

pub static BLOB_HOLDER_SHAPE: ClassShape =
    ClassShape::new("demo::BlobHolder", ClassKind::Concrete)
        .with_marker()
        .with_methods(&[MethodShape::getter(
            "get_blobs",
            bytes_list_ty,
            blob_holder_blobs,
        )])
        .with_constructors(&[ConstructorShape::new(
            &[ParamShape::new("blobs", bytes_list_ty)],
            blob_holder_new,
        )]);

// -----------------------------------------------------------------------------
// Carton<T> (a generic wrapper over any reflected payload)

pub struct Carton {
    pub payload: ObjRef,
}

impl Reflected for Carton {
    fn shape(&self) -> &'static ClassShape {
        &CARTON_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Shaped for Carton {
    fn class_shape() -> &'static ClassShape {
        &CARTON_SHAPE
    }
}

fn carton_payload(obj: &dyn Reflected) -> Value {
    Value::Object(obj.downcast_ref::<Carton>().unwrap().payload.clone())
}
fn carton_new(args: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
    let [payload] = expect_args(args, "demo::Carton")?;
    Ok(Box::new(Carton {
        payload: payload.expect_object()?,
    }))
}

pub static CARTON_SHAPE: ClassShape = ClassShape::new("demo::Carton", ClassKind::Concrete)
    .with_marker()
    .with_type_params(&[TypeParamShape::new("T", &[])])
    .with_methods(&[MethodShape::getter("get_payload", variable_t, carton_payload)])
    .with_constructors(&[ConstructorShape::new(
        &[ParamShape::new("payload", variable_t)],
        carton_new,
    )]);

// -----------------------------------------------------------------------------
// Helpers

pub fn demo_scope() -> Arc<LoadingScope> {
    let mut scope = LoadingScope::new();
    scope.register_all(&[
        &ADDRESS_SHAPE,
        &PERSON_SHAPE,
        &COUNTER_SHAPE,
        &SNEAKY_SHAPE,
        &BLOB_HOLDER_SHAPE,
        &CARTON_SHAPE,
    ]);
    Arc::new(scope)
}

pub fn demo_ctx() -> SerializationContext {
    SerializationContext::new(demo_scope())
}
