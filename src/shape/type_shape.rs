use std::fmt;

use crate::shape::{ClassKind, ClassShape};

// -----------------------------------------------------------------------------
// Primitive

/// The scalar kinds the wire format encodes directly.
///
/// Scalars never participate in object-reference compaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    I32,
    I64,
    F64,
    Str,
    Bytes,
}

impl Primitive {
    /// A stable name, used by [`TypeShape`]'s display form and the schema
    /// emitter.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F64 => "f64",
            Self::Str => "string",
            Self::Bytes => "bytes",
        }
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// The runtime handle to a possibly-generic type.
///
/// A `TypeShape` is what descriptor tables hand around for field types,
/// accessor return types and constructor parameter types. It is immutable
/// once built; [`resolve`](crate::shape::resolve) produces new shapes rather
/// than mutating existing ones.
#[derive(Clone, Debug)]
pub enum TypeShape {
    /// The universal "any object" type. Every value is assignable to it; an
    /// unresolved type variable with no bounds collapses to it.
    Any,
    /// An unbounded wildcard argument, resolved to [`TypeShape::Any`].
    Wildcard,
    Primitive(Primitive),
    /// A non-generic nominal type, or a generic one used in raw (erased) form.
    Class(&'static ClassShape),
    /// A generic nominal type applied to concrete (or variable) arguments.
    Parameterized {
        class: &'static ClassShape,
        args: Box<[TypeShape]>,
    },
    /// A homogeneous sequence of the component type.
    Array(Box<TypeShape>),
    /// An unresolved type variable with its declared bounds.
    Variable {
        name: &'static str,
        bounds: Box<[TypeShape]>,
    },
}

impl TypeShape {
    /// Synthesizes an array shape for the given element type.
    #[inline]
    pub fn array_of(component: TypeShape) -> Self {
        Self::Array(Box::new(component))
    }

    /// A variable with no bounds.
    #[inline]
    pub fn variable(name: &'static str) -> Self {
        Self::Variable {
            name,
            bounds: Box::new([]),
        }
    }

    /// The nominal class behind this shape, if any.
    pub fn class(&self) -> Option<&'static ClassShape> {
        match self {
            Self::Class(class) | Self::Parameterized { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Whether this is a class shape that can actually be instantiated.
    pub fn is_concrete_class(&self) -> bool {
        self.class()
            .is_some_and(|class| class.kind() == ClassKind::Concrete)
    }

    /// The component type, if this is an array.
    pub fn component(&self) -> Option<&TypeShape> {
        match self {
            Self::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Whether a value of this shape may legitimately be null on the wire.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            Self::Any | Self::Wildcard | Self::Class(_) | Self::Parameterized { .. } | Self::Variable { .. }
        )
    }

    /// The type-erased form: generic applications lose their arguments,
    /// variables and wildcards collapse to [`TypeShape::Any`].
    pub fn erased(&self) -> TypeShape {
        match self {
            Self::Parameterized { class, .. } => Self::Class(*class),
            Self::Array(component) => Self::array_of(component.erased()),
            Self::Variable { .. } | Self::Wildcard => Self::Any,
            other => other.clone(),
        }
    }

    /// Structural assignability: can a value of `source` stand where `self`
    /// is expected?
    ///
    /// Deliberately permissive around generics: a raw class is accepted where
    /// a parameterization of the same class is expected, and argument lists
    /// of mismatched length are not compared.
    pub fn assignable_from(&self, source: &TypeShape) -> bool {
        match (self, source) {
            (Self::Any | Self::Wildcard, _) => true,
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.assignable_from(b),
            (Self::Class(target), _) => source.class().is_some_and(|s| s.extends(target)),
            (Self::Parameterized { class: target, args }, Self::Parameterized { class, args: sargs }) => {
                class.extends(target)
                    && (args.len() != sargs.len()
                        || args.iter().zip(sargs.iter()).all(|(a, s)| a.assignable_from(s)))
            }
            // Raw source where a parameterization is expected.
            (Self::Parameterized { class: target, .. }, Self::Class(class)) => class.extends(target),
            // An unresolved variable as target accepts what all its bounds accept.
            (Self::Variable { bounds, .. }, _) => bounds.iter().all(|b| b.assignable_from(source)),
            // An unresolved variable as source satisfies a target one of its
            // bounds satisfies.
            (_, Self::Variable { bounds, .. }) => bounds.iter().any(|b| self.assignable_from(b)),
            _ => false,
        }
    }
}

impl PartialEq for TypeShape {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Any, Self::Any) | (Self::Wildcard, Self::Wildcard) => true,
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => a.name() == b.name(),
            (
                Self::Parameterized { class: a, args: aa },
                Self::Parameterized { class: b, args: ba },
            ) => a.name() == b.name() && aa == ba,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Variable { name: a, .. }, Self::Variable { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Wildcard => f.write_str("?"),
            Self::Primitive(p) => f.write_str(p.name()),
            Self::Class(class) => f.write_str(class.name()),
            Self::Parameterized { class, args } => {
                write!(f, "{}<", class.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Array(component) => write!(f, "[{component}]"),
            Self::Variable { name, .. } => f.write_str(name),
        }
    }
}
