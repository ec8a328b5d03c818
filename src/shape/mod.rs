//! Type descriptor tables and the generic type resolver.
//!
//! ## Menu
//!
//! - [`TypeShape`]: the runtime handle to a possibly-generic type; classifies
//!   a type as class, array, parameterized, variable, wildcard or primitive,
//!   and provides structural assignability plus a type-erased form.
//! - [`Primitive`]: the scalar kinds the wire format encodes directly.
//! - [`ClassShape`]: the per-type descriptor table (fields, accessor
//!   methods, constructors, supertypes, generic parameters and the
//!   serializable marker) with function-pointer hooks for access and
//!   construction.
//! - [`FieldShape`], [`MethodShape`], [`ConstructorShape`], [`ParamShape`],
//!   [`TypeParamShape`]: the table entries.
//! - [`AccessorHook`]: the invocation capability a method entry carries.
//! - [`resolve`]: resolves generic type variables against a concrete
//!   enclosing context type.

// -----------------------------------------------------------------------------
// Modules

mod class_shape;
mod resolver;
mod type_shape;

// -----------------------------------------------------------------------------
// Exports

pub use class_shape::{AccessorHook, ClassKind, ClassShape, ConstructorShape};
pub use class_shape::{FieldShape, GetFn, MethodShape, ParamShape, SetFn, TypeParamShape, TypeThunk};
pub use resolver::resolve;
pub use type_shape::{Primitive, TypeShape};
