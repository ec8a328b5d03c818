use std::fmt;

use crate::error::WireError;
use crate::shape::TypeShape;
use crate::value::{Reflected, Value};

// -----------------------------------------------------------------------------
// Hooks

/// A lazily-evaluated type reference.
///
/// Descriptor tables live in statics, and [`TypeShape`] allocates, so table
/// entries store a thunk and build the shape on access. This also breaks
/// cycles between mutually-referential descriptor tables.
pub type TypeThunk = fn() -> TypeShape;

/// Reads a property value out of a reflected object.
pub type GetFn = fn(&dyn Reflected) -> Value;

/// Writes a property value into a default-constructed object.
pub type SetFn = fn(&mut dyn Reflected, Value) -> Result<(), WireError>;

/// The invocation capability a method entry carries.
#[derive(Clone, Copy)]
pub enum AccessorHook {
    /// A zero-argument read accessor.
    Get(GetFn),
    /// A single-argument write accessor.
    Set(SetFn),
    /// The method exists but is not usable for serialization.
    None,
}

// -----------------------------------------------------------------------------
// ClassKind

/// Whether a nominal type can be instantiated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Concrete,
    Abstract,
    Interface,
}

// -----------------------------------------------------------------------------
// Table entries

/// A declared storage field.
#[derive(Clone, Copy)]
pub struct FieldShape {
    name: &'static str,
    ty: TypeThunk,
    get: GetFn,
}

impl FieldShape {
    #[inline]
    pub const fn new(name: &'static str, ty: TypeThunk, get: GetFn) -> Self {
        Self { name, ty, get }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The field's declared type.
    #[inline]
    pub fn ty(&self) -> TypeShape {
        (self.ty)()
    }

    /// Reads the field directly, bypassing accessors.
    #[inline]
    pub fn read(&self, obj: &dyn Reflected) -> Value {
        (self.get)(obj)
    }

    /// The raw read hook, for plans that cache it.
    #[inline]
    pub const fn get_hook(&self) -> GetFn {
        self.get
    }
}

/// A public method, named by the accessor convention
/// (`get_x` / `set_x` / `is_x`).
#[derive(Clone, Copy)]
pub struct MethodShape {
    name: &'static str,
    params: &'static [TypeThunk],
    ret: Option<TypeThunk>,
    hook: AccessorHook,
}

impl MethodShape {
    /// A zero-argument read accessor.
    #[inline]
    pub const fn getter(name: &'static str, ret: TypeThunk, get: GetFn) -> Self {
        Self {
            name,
            params: &[],
            ret: Some(ret),
            hook: AccessorHook::Get(get),
        }
    }

    /// A write accessor. `params` normally holds exactly one entry; the plan
    /// builder rejects other arities.
    #[inline]
    pub const fn setter(name: &'static str, params: &'static [TypeThunk], set: SetFn) -> Self {
        Self {
            name,
            params,
            ret: None,
            hook: AccessorHook::Set(set),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn params(&self) -> &'static [TypeThunk] {
        self.params
    }

    /// The declared return type, if any.
    #[inline]
    pub fn return_shape(&self) -> Option<TypeShape> {
        self.ret.map(|thunk| thunk())
    }

    /// The declared type of the single parameter, if any.
    #[inline]
    pub fn param_shape(&self) -> Option<TypeShape> {
        self.params.first().map(|thunk| thunk())
    }

    #[inline]
    pub const fn get_hook(&self) -> Option<GetFn> {
        match self.hook {
            AccessorHook::Get(f) => Some(f),
            _ => None,
        }
    }

    #[inline]
    pub const fn set_hook(&self) -> Option<SetFn> {
        match self.hook {
            AccessorHook::Set(f) => Some(f),
            _ => None,
        }
    }
}

/// A constructor parameter: name plus declared type.
#[derive(Clone, Copy, Debug)]
pub struct ParamShape {
    name: &'static str,
    ty: TypeThunk,
}

impl ParamShape {
    #[inline]
    pub const fn new(name: &'static str, ty: TypeThunk) -> Self {
        Self { name, ty }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn ty(&self) -> TypeShape {
        (self.ty)()
    }
}

/// A declared constructor, with the flags the selection policy reads.
#[derive(Clone, Copy, Debug)]
pub struct ConstructorShape {
    params: &'static [ParamShape],
    primary: bool,
    for_deserialization: bool,
    captures_enclosing: bool,
    invoke: fn(Vec<Value>) -> Result<Box<dyn Reflected>, WireError>,
}

impl ConstructorShape {
    #[inline]
    pub const fn new(
        params: &'static [ParamShape],
        invoke: fn(Vec<Value>) -> Result<Box<dyn Reflected>, WireError>,
    ) -> Self {
        Self {
            params,
            primary: false,
            for_deserialization: false,
            captures_enclosing: false,
            invoke,
        }
    }

    /// Marks this as the type's primary constructor (the language-convention
    /// candidate of the selection policy).
    #[inline]
    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Marks this constructor as explicitly chosen for deserialization,
    /// overriding the rest of the selection policy.
    #[inline]
    pub const fn for_deserialization(mut self) -> Self {
        self.for_deserialization = true;
        self
    }

    /// Flags a synthetic enclosing-instance capture in first position.
    #[inline]
    pub const fn capturing_enclosing(mut self) -> Self {
        self.captures_enclosing = true;
        self
    }

    #[inline]
    pub const fn params(&self) -> &'static [ParamShape] {
        self.params
    }

    #[inline]
    pub const fn is_zero_arg(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }

    #[inline]
    pub const fn is_for_deserialization(&self) -> bool {
        self.for_deserialization
    }

    #[inline]
    pub const fn captures_enclosing(&self) -> bool {
        self.captures_enclosing
    }

    /// Instantiates the type from values in declared parameter order.
    #[inline]
    pub fn invoke(&self, args: Vec<Value>) -> Result<Box<dyn Reflected>, WireError> {
        (self.invoke)(args)
    }
}

/// A declared generic type parameter with its bounds.
#[derive(Clone, Copy)]
pub struct TypeParamShape {
    name: &'static str,
    bounds: &'static [TypeThunk],
}

impl TypeParamShape {
    #[inline]
    pub const fn new(name: &'static str, bounds: &'static [TypeThunk]) -> Self {
        Self { name, bounds }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn bounds(&self) -> &'static [TypeThunk] {
        self.bounds
    }
}

// -----------------------------------------------------------------------------
// ClassShape

/// The per-type descriptor table.
///
/// A `ClassShape` is the static equivalent of what runtime reflection would
/// enumerate: declared fields, accessor-convention methods, constructors,
/// supertypes, generic parameters and the serializable marker. Declared once
/// per participating type, usually as a `static`:
///
/// ```
/// use typewire::shape::{ClassKind, ClassShape};
///
/// static TOKEN_SHAPE: ClassShape = ClassShape::new("demo::Token", ClassKind::Concrete);
/// assert_eq!(TOKEN_SHAPE.name(), "demo::Token");
/// assert!(!TOKEN_SHAPE.has_marker());
/// ```
pub struct ClassShape {
    name: &'static str,
    label: &'static str,
    kind: ClassKind,
    type_params: &'static [TypeParamShape],
    supertypes: &'static [TypeThunk],
    fields: &'static [FieldShape],
    methods: &'static [MethodShape],
    constructors: &'static [ConstructorShape],
    marker: bool,
}

impl ClassShape {
    /// Creates an empty table. Populate it with the `with_*` builders; all of
    /// them are `const`, so the whole declaration can live in a `static`.
    #[inline]
    pub const fn new(name: &'static str, kind: ClassKind) -> Self {
        Self {
            name,
            label: name,
            kind,
            type_params: &[],
            supertypes: &[],
            fields: &[],
            methods: &[],
            constructors: &[],
            marker: false,
        }
    }

    /// A concrete type with no introspectable structure. Such types are only
    /// serializable through a custom serializer.
    #[inline]
    pub const fn opaque(name: &'static str) -> Self {
        Self::new(name, ClassKind::Concrete)
    }

    #[inline]
    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    #[inline]
    pub const fn with_type_params(mut self, type_params: &'static [TypeParamShape]) -> Self {
        self.type_params = type_params;
        self
    }

    #[inline]
    pub const fn with_supertypes(mut self, supertypes: &'static [TypeThunk]) -> Self {
        self.supertypes = supertypes;
        self
    }

    #[inline]
    pub const fn with_fields(mut self, fields: &'static [FieldShape]) -> Self {
        self.fields = fields;
        self
    }

    #[inline]
    pub const fn with_methods(mut self, methods: &'static [MethodShape]) -> Self {
        self.methods = methods;
        self
    }

    #[inline]
    pub const fn with_constructors(mut self, constructors: &'static [ConstructorShape]) -> Self {
        self.constructors = constructors;
        self
    }

    /// Attaches the serializable marker. The whitelist gate accepts a type
    /// whose shape, or any supertype's shape, carries it.
    #[inline]
    pub const fn with_marker(mut self) -> Self {
        self.marker = true;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub const fn kind(&self) -> ClassKind {
        self.kind
    }

    #[inline]
    pub const fn type_params(&self) -> &'static [TypeParamShape] {
        self.type_params
    }

    #[inline]
    pub const fn fields(&self) -> &'static [FieldShape] {
        self.fields
    }

    #[inline]
    pub const fn methods(&self) -> &'static [MethodShape] {
        self.methods
    }

    #[inline]
    pub const fn constructors(&self) -> &'static [ConstructorShape] {
        self.constructors
    }

    #[inline]
    pub const fn has_marker(&self) -> bool {
        self.marker
    }

    /// The declared direct supertypes (superclass and interfaces).
    pub fn supertypes(&self) -> impl Iterator<Item = TypeShape> {
        self.supertypes.iter().map(|thunk| thunk())
    }

    /// The index of a generic parameter, if declared.
    pub fn type_param_index(&self, name: &str) -> Option<usize> {
        self.type_params.iter().position(|p| p.name() == name)
    }

    /// Whether `self` is `other` or transitively extends/implements it.
    pub fn extends(&self, other: &ClassShape) -> bool {
        if self.name == other.name {
            return true;
        }
        self.supertypes().any(|s| {
            s.class().is_some_and(|class| class.extends(other))
        })
    }

    /// Whether this shape, or any shape in its supertype lattice, carries
    /// the serializable marker.
    pub fn has_marker_recursive(&self) -> bool {
        if self.marker {
            return true;
        }
        self.supertypes().any(|s| {
            s.class().is_some_and(ClassShape::has_marker_recursive)
        })
    }
}

impl fmt::Debug for ClassShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassShape")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("constructors", &self.constructors.len())
            .field("marker", &self.marker)
            .finish()
    }
}
