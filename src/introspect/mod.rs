//! Turns a descriptor table into a property access plan.
//!
//! ## Menu
//!
//! - [`describe_properties`]: walks a type and its supertypes, pairing
//!   declared fields with accessor-convention methods into a
//!   [`PropertyMap`] of [`PropertyDescriptor`]s.
//! - [`select_constructor`]: picks the one constructor used for
//!   reconstruction, by a deterministic precedence policy.
//! - [`plan_object`]: combines both into an [`ObjectPlan`], the ordered
//!   [`PropertyInfo`] strategies used to read a type's state on write and to
//!   rebuild an instance on read.

// -----------------------------------------------------------------------------
// Modules

mod constructors;
mod plan;
mod properties;

// -----------------------------------------------------------------------------
// Exports

pub use constructors::select_constructor;
pub use plan::{plan_object, ObjectPlan, PropertyInfo};
pub use properties::{describe_properties, PropertyDescriptor, PropertyMap};
