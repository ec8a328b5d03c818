//! The serializer factory and everything it consults.
//!
//! ## Menu
//!
//! - [`Whitelist`]: the security gate; runs before introspection, every time.
//! - [`CustomSerializer`] / [`CustomRegistry`]: type-owned encodings with
//!   registration-order precedence, discovered via `inventory` when the
//!   `auto_register` feature is on.
//! - [`builtin`]: serializers for `std::time::SystemTime` and
//!   `std::time::Duration`.
//! - [`LoadingScope`]: wire type name to descriptor table resolution.
//! - [`SerializerFactory`]: compile-once cache plus the top-level
//!   serialize/deserialize entry points.
//! - [`SerializationEnvironment`] / [`FactorySelector`]: per-use-case
//!   factory selection.

// -----------------------------------------------------------------------------
// Modules

pub mod builtin;
mod custom;
mod factory;
mod scope;
mod whitelist;

// -----------------------------------------------------------------------------
// Exports

pub use custom::{CustomRegistry, CustomSerializer, RegisteredSerializer};
pub use factory::{Compiled, FactorySelector, SerializationEnvironment, SerializerFactory};
pub use scope::LoadingScope;
pub use whitelist::{Whitelist, WhitelistProvider};
