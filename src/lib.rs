#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

pub mod error;
pub mod introspect;
pub mod registry;
pub mod schema;
pub mod shape;
pub mod value;
pub mod wire;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::WireError;
pub use registry::{
    Compiled, CustomRegistry, CustomSerializer, FactorySelector, LoadingScope,
    RegisteredSerializer, SerializationEnvironment, SerializerFactory, Whitelist,
    WhitelistProvider,
};
pub use schema::{describe, Schema, SchemaField, SchemaFragment};
pub use value::{downcast_object, expect_args, ObjRef, Reflected, Shaped, Value};
pub use wire::{SerializationContext, UseCase, WireReader, WireWriter, WIRE_VERSION};

#[cfg(feature = "auto_register")]
pub use inventory;
