//! Dynamic values and the object capability traits.
//!
//! ## Menu
//!
//! - [`Reflected`]: implemented by every object that can cross the wire;
//!   exposes the runtime [`ClassShape`] and `Any`-based downcasting.
//! - [`Shaped`]: the static companion of `Reflected`, naming a type's
//!   descriptor table without an instance.
//! - [`ObjRef`]: a shared, identity-carrying reference to a reflected object.
//! - [`Value`]: the dynamic value representation produced by accessor hooks
//!   and consumed by constructor hooks.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::WireError;
use crate::shape::ClassShape;

// -----------------------------------------------------------------------------
// Reflected / Shaped

/// A shared reference to a reflected object.
///
/// Identity of the `Arc` (not value equality) is what the object reference
/// table tracks, so two `ObjRef`s cloned from one another compact into a
/// single wire encoding plus a back-reference.
pub type ObjRef = Arc<dyn Reflected>;

/// An object that can cross the serialization boundary.
///
/// Implementations pair an ordinary Rust type with its static descriptor
/// table. The accessor and constructor hooks inside that table downcast
/// through [`as_any`](Reflected::as_any) to reach the concrete type.
pub trait Reflected: Any + Send + Sync {
    /// The descriptor table for this object's runtime type.
    fn shape(&self) -> &'static ClassShape;

    /// Upcast for downcasting by reference.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting by mutable reference (used by setter hooks).
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Upcast a shared reference for downcasting without cloning the value.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl dyn Reflected {
    /// Downcasts by reference to a concrete type.
    #[inline]
    pub fn downcast_ref<T: Reflected>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcasts by mutable reference to a concrete type.
    #[inline]
    pub fn downcast_mut<T: Reflected>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

impl fmt::Debug for dyn Reflected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflected(`{}`)", self.shape().name())
    }
}

/// Names the descriptor table of a type without needing an instance.
pub trait Shaped: Reflected {
    /// The descriptor table for this type.
    fn class_shape() -> &'static ClassShape;
}

/// Downcasts a shared object reference to its concrete type.
pub fn downcast_object<T: Reflected>(obj: ObjRef) -> Result<Arc<T>, WireError> {
    let found = obj.shape().name();
    obj.into_any()
        .downcast::<T>()
        .map_err(|_| WireError::UnexpectedValue {
            expected: std::any::type_name::<T>(),
            found,
        })
}

// -----------------------------------------------------------------------------
// Value

/// A dynamic property value.
///
/// Only [`Value::Object`] participates in object-reference compaction.
/// Byte buffers and primitive scalars are distinct variants, so trying to
/// back-reference them is unrepresentable rather than merely forbidden.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Object(ObjRef),
}

impl Value {
    /// Wraps a reflected value into a freshly shared object reference.
    #[inline]
    pub fn object<T: Reflected>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// A short name for the value's kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    fn unexpected(&self, expected: &'static str) -> WireError {
        WireError::UnexpectedValue {
            expected,
            found: self.kind(),
        }
    }

    pub fn expect_bool(self) -> Result<bool, WireError> {
        match self {
            Self::Bool(v) => Ok(v),
            other => Err(other.unexpected("bool")),
        }
    }

    pub fn expect_i32(self) -> Result<i32, WireError> {
        match self {
            Self::I32(v) => Ok(v),
            other => Err(other.unexpected("i32")),
        }
    }

    pub fn expect_i64(self) -> Result<i64, WireError> {
        match self {
            Self::I64(v) => Ok(v),
            other => Err(other.unexpected("i64")),
        }
    }

    pub fn expect_f64(self) -> Result<f64, WireError> {
        match self {
            Self::F64(v) => Ok(v),
            other => Err(other.unexpected("f64")),
        }
    }

    pub fn expect_str(self) -> Result<String, WireError> {
        match self {
            Self::Str(v) => Ok(v),
            other => Err(other.unexpected("string")),
        }
    }

    pub fn expect_bytes(self) -> Result<Vec<u8>, WireError> {
        match self {
            Self::Bytes(v) => Ok(v),
            other => Err(other.unexpected("bytes")),
        }
    }

    pub fn expect_list(self) -> Result<Vec<Value>, WireError> {
        match self {
            Self::List(v) => Ok(v),
            other => Err(other.unexpected("list")),
        }
    }

    pub fn expect_object(self) -> Result<ObjRef, WireError> {
        match self {
            Self::Object(v) => Ok(v),
            other => Err(other.unexpected("object")),
        }
    }

    /// Extracts a shared reference to a concrete reflected type.
    pub fn expect_instance<T: Reflected>(self) -> Result<Arc<T>, WireError> {
        downcast_object(self.expect_object()?)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::I32(v) => write!(f, "I32({v})"),
            Self::I64(v) => write!(f, "I64({v})"),
            Self::F64(v) => write!(f, "F64({v})"),
            Self::Str(v) => write!(f, "Str({v:?})"),
            Self::Bytes(v) => write!(f, "Bytes({} bytes)", v.len()),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Object(v) => write!(f, "Object(`{}`)", v.shape().name()),
        }
    }
}

/// Unpacks constructor arguments into a fixed-arity array.
///
/// The drivers validate the wire property count against the compiled plan,
/// so a mismatch here means the constructor hook and the descriptor table
/// disagree on arity.
pub fn expect_args<const N: usize>(
    args: Vec<Value>,
    type_name: &'static str,
) -> Result<[Value; N], WireError> {
    let found = args.len();
    args.try_into().map_err(|_| WireError::PropertyCount {
        type_name: type_name.into(),
        expected: N,
        found,
    })
}
