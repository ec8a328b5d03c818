//! The wire format and the graph walkers that drive it.
//!
//! ## Menu
//!
//! - [`WireWriter`] / [`WireReader`]: the tagged little-endian byte layer.
//! - [`SerializationContext`] / [`UseCase`]: the immutable per-call
//!   parameters.
//! - [`ReferenceTable`] / [`ReadReferences`]: object reference compaction,
//!   scoped to one top-level call.
//! - [`WriteDriver`] / [`ReadDriver`]: the graph walkers the factory's
//!   `serialize`/`deserialize` entry points run.

// -----------------------------------------------------------------------------
// Modules

mod context;
mod object;
mod reader;
mod refs;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use context::{SerializationContext, UseCase, WIRE_VERSION};
pub use object::{ReadDriver, WriteDriver};
pub use reader::WireReader;
pub use refs::{ReadReferences, ReferenceOutcome, ReferenceTable};
pub use writer::WireWriter;

/// Every blob starts with these four bytes.
pub(crate) const MAGIC: [u8; 4] = *b"TWIR";

/// Wire tags, one per [`crate::value::Value`] variant plus the
/// back-reference.
pub(crate) mod tag {
    pub const NULL: u8 = 0;
    pub const FALSE: u8 = 1;
    pub const TRUE: u8 = 2;
    pub const I32: u8 = 3;
    pub const I64: u8 = 4;
    pub const F64: u8 = 5;
    pub const STR: u8 = 6;
    pub const BYTES: u8 = 7;
    pub const LIST: u8 = 8;
    pub const OBJECT: u8 = 9;
    pub const REF: u8 = 10;
}
