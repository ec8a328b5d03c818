//! The error taxonomy of the engine.
//!
//! Every error here describes a structural property of a type or of a wire
//! blob. None of them are transient: they are raised at serializer
//! construction (first use of a type) or while decoding, and propagate
//! unchanged to the top-level caller. There is no retry path.

use std::borrow::Cow;

use thiserror::Error;

/// Errors raised while compiling a serializer for a type or while moving a
/// value across the wire.
#[derive(Debug, Error)]
pub enum WireError {
    /// The whitelist gate refused the type. Raised before any introspection
    /// or constructor hook runs.
    #[error("type `{0}` is not authorized for serialization by the active whitelist")]
    NotWhitelisted(Cow<'static, str>),

    /// No constructor survived the selection policy.
    #[error("no suitable constructor found for type `{0}`")]
    NoSuitableConstructor(Cow<'static, str>),

    /// More than one constructor carries the deserialization mark.
    #[error("more than one constructor of `{0}` is marked for deserialization")]
    AmbiguousConstructor(Cow<'static, str>),

    /// The selected constructor captures its enclosing instance.
    #[error("the selected constructor of `{0}` captures its enclosing instance")]
    SyntheticParameter(Cow<'static, str>),

    /// A constructor parameter matches no introspected property.
    #[error("constructor parameter `{param}` of `{type_name}` matches no property")]
    UnmatchedParameter {
        type_name: Cow<'static, str>,
        param: Cow<'static, str>,
    },

    /// A constructor parameter matched a property with neither a readable
    /// accessor nor a backing field.
    #[error("property `{property}` of `{type_name}` has neither a getter nor a backing field")]
    NoBackingField {
        type_name: Cow<'static, str>,
        property: Cow<'static, str>,
    },

    /// A getter's resolved return type is not assignable to the matched
    /// constructor parameter, even after type erasure.
    #[error(
        "getter for `{property}` of `{type_name}` returns `{found}`, \
         which is not assignable to parameter type `{expected}`"
    )]
    PropertyTypeMismatch {
        type_name: Cow<'static, str>,
        property: Cow<'static, str>,
        expected: String,
        found: String,
    },

    /// A setter participating in a setter plan does not take exactly one
    /// argument.
    #[error("setter for `{property}` of `{type_name}` must take exactly one argument")]
    TooManyArguments {
        type_name: Cow<'static, str>,
        property: Cow<'static, str>,
    },

    /// Field, getter and setter of a setter-plan property disagree on type.
    #[error("field, getter and setter for `{property}` of `{type_name}` disagree on type")]
    TypeConsistency {
        type_name: Cow<'static, str>,
        property: Cow<'static, str>,
    },

    /// A type variable declares more than one bound.
    #[error("type variable `{0}` has more than one bound, which is not supported")]
    UnsupportedGenerics(Cow<'static, str>),

    /// A back-reference points to an index that was never registered, or to
    /// an instance that has not finished materializing (a true back-edge
    /// into an object still under construction).
    #[error("back-reference {0} does not resolve to a materialized instance")]
    MissingReference(u32),

    /// The invoked scheme deliberately refuses this use case.
    #[error("use case `{0}` is not supported by this serialization scheme")]
    UnsupportedUseCase(&'static str),

    /// A factory-selection hook was invoked but no factory is installed.
    #[error("no serializer factory is installed for `{0}`")]
    NotSupported(&'static str),

    /// The wire blob ended before a complete value was read.
    #[error("unexpected end of input")]
    Truncated,

    /// The wire blob does not start with the expected magic bytes.
    #[error("input is not a typewire blob")]
    BadMagic,

    /// The blob's declared wire version is zero or newer than this reader
    /// understands.
    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u8),

    /// An unknown wire tag was encountered.
    #[error("invalid wire tag {0:#04x}")]
    InvalidTag(u8),

    /// A string payload was not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// The wire blob names a type the loading scope cannot resolve.
    #[error("wire data declares a type `{0}` unknown to the loading scope")]
    UnknownType(String),

    /// A dynamic value had the wrong kind for the requested extraction.
    #[error("expected a {expected} value, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    /// A wire object carries a different number of properties than the
    /// compiled plan expects.
    #[error("wire object for `{type_name}` carries {found} properties, expected {expected}")]
    PropertyCount {
        type_name: Cow<'static, str>,
        expected: usize,
        found: usize,
    },

    /// An error raised somewhere inside a nested object graph, annotated
    /// with the traversal path that led to it.
    #[error("at `{path}`: {source}")]
    InGraph {
        path: String,
        #[source]
        source: Box<WireError>,
    },
}

impl WireError {
    /// Prepends a traversal segment to the breadcrumb path, wrapping the
    /// error on first use.
    ///
    /// Nested graph recursion calls this on the way out, so the final path
    /// reads outermost-first (`home.street` rather than `street.home`).
    pub fn at(self, segment: &str) -> Self {
        match self {
            Self::InGraph { path, source } => Self::InGraph {
                path: format!("{segment}.{path}"),
                source,
            },
            other => Self::InGraph {
                path: segment.to_owned(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with any breadcrumb wrapping stripped.
    pub fn root(&self) -> &Self {
        match self {
            Self::InGraph { source, .. } => source.root(),
            other => other,
        }
    }
}
