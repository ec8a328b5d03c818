use std::collections::HashMap;

use crate::shape::{ClassShape, FieldShape, MethodShape, Primitive, TypeShape};

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// Everything discovered about one logical property: the backing field (if
/// any) and the accessors matched to it by naming convention.
///
/// Any of the parts may be absent. An accessor with no backing field still
/// defines a property; constructor parameters are frequently exposed only
/// through a getter.
#[derive(Clone, Copy, Default)]
pub struct PropertyDescriptor {
    field: Option<&'static FieldShape>,
    getter: Option<&'static MethodShape>,
    setter: Option<&'static MethodShape>,
    is_getter: Option<&'static MethodShape>,
}

impl PropertyDescriptor {
    #[inline]
    pub const fn field(&self) -> Option<&'static FieldShape> {
        self.field
    }

    #[inline]
    pub const fn getter(&self) -> Option<&'static MethodShape> {
        self.getter
    }

    #[inline]
    pub const fn setter(&self) -> Option<&'static MethodShape> {
        self.setter
    }

    #[inline]
    pub const fn is_getter(&self) -> Option<&'static MethodShape> {
        self.is_getter
    }

    /// The preferred read accessor: the getter, falling back to the boolean
    /// query accessor.
    #[inline]
    pub const fn read_accessor(&self) -> Option<&'static MethodShape> {
        match self.getter {
            Some(getter) => Some(getter),
            None => self.is_getter,
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyMap

/// The properties of one type, in encounter order.
#[derive(Default)]
pub struct PropertyMap {
    by_name: HashMap<&'static str, PropertyDescriptor>,
    order: Vec<&'static str>,
}

impl PropertyMap {
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name)
    }

    /// Exact-name lookup with a case-insensitive fallback, returning the
    /// canonical property name alongside the descriptor.
    pub fn get_with_fallback(&self, name: &str) -> Option<(&'static str, &PropertyDescriptor)> {
        if let Some((key, descriptor)) = self.by_name.get_key_value(name) {
            return Some((key, descriptor));
        }
        self.order
            .iter()
            .find(|key| key.eq_ignore_ascii_case(name))
            .map(|key| (*key, &self.by_name[key]))
    }

    /// Iterates properties in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyDescriptor)> {
        self.order.iter().map(|name| (*name, &self.by_name[name]))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    fn entry(&mut self, name: &'static str) -> &mut PropertyDescriptor {
        self.by_name.entry(name).or_insert_with(|| {
            self.order.push(name);
            PropertyDescriptor::default()
        })
    }
}

// -----------------------------------------------------------------------------
// Introspection

/// Discovers the logical properties of a type.
///
/// Walks the type and every ancestor supertype, most-derived first. The
/// first pass collects declared storage fields by name (a subtype's
/// declaration shadows a supertype's). The second pass matches every method
/// against the accessor convention:
///
/// - `get_x` with zero parameters registers a getter for `x`,
/// - `is_x` with zero parameters registers a boolean query accessor, but
///   only when it actually returns `bool`,
/// - `set_x` registers a setter (arity is validated later, at plan time).
///
/// A method matching no known field still registers a property with no
/// backing field. When two accessors compete for the same property (e.g.
/// covariant narrowing in a subtype), the one with the narrower type wins.
pub fn describe_properties(shape: &'static ClassShape) -> PropertyMap {
    let classes = lineage(shape);
    let mut map = PropertyMap::default();

    for class in &classes {
        for field in class.fields() {
            let slot = &mut map.entry(field.name()).field;
            if slot.is_none() {
                *slot = Some(field);
            }
        }
    }

    for class in &classes {
        for method in class.methods() {
            if let Some(name) = method.name().strip_prefix("get_") {
                if method.params().is_empty() && method.get_hook().is_some() {
                    register_getter(map.entry(name), method, false);
                }
            } else if let Some(name) = method.name().strip_prefix("is_") {
                let boolean = method.return_shape() == Some(TypeShape::Primitive(Primitive::Bool));
                if method.params().is_empty() && method.get_hook().is_some() && boolean {
                    register_getter(map.entry(name), method, true);
                }
            } else if let Some(name) = method.name().strip_prefix("set_") {
                if method.set_hook().is_some() {
                    register_setter(map.entry(name), method);
                }
            }
        }
    }

    map
}

fn register_getter(descriptor: &mut PropertyDescriptor, method: &'static MethodShape, query: bool) {
    let slot = if query {
        &mut descriptor.is_getter
    } else {
        &mut descriptor.getter
    };
    match slot {
        None => *slot = Some(method),
        Some(existing) => {
            if narrower(method.return_shape(), existing.return_shape()) {
                *slot = Some(method);
            }
        }
    }
}

fn register_setter(descriptor: &mut PropertyDescriptor, method: &'static MethodShape) {
    match descriptor.setter {
        None => descriptor.setter = Some(method),
        Some(existing) => {
            if narrower(method.param_shape(), existing.param_shape()) {
                descriptor.setter = Some(method);
            }
        }
    }
}

/// Whether `candidate` is strictly more specific than `current`.
fn narrower(candidate: Option<TypeShape>, current: Option<TypeShape>) -> bool {
    match (candidate, current) {
        (Some(candidate), Some(current)) => {
            current.assignable_from(&candidate) && !candidate.assignable_from(&current)
        }
        _ => false,
    }
}

/// The type and its ancestor classes, most-derived first, deduplicated.
fn lineage(shape: &'static ClassShape) -> Vec<&'static ClassShape> {
    let mut out: Vec<&'static ClassShape> = Vec::new();
    let mut pending = vec![shape];
    while let Some(class) = pending.pop() {
        if out.iter().any(|seen| seen.name() == class.name()) {
            continue;
        }
        out.push(class);
        // Depth-first over declared supertypes keeps more-derived tables
        // ahead of the ones they shadow.
        for supertype in class.supertypes() {
            if let Some(class) = supertype.class() {
                pending.push(class);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::describe_properties;
    use crate::shape::{ClassKind, ClassShape, MethodShape, Primitive, TypeShape};
    use crate::value::{Reflected, Value};

    fn str_ty() -> TypeShape {
        TypeShape::Primitive(Primitive::Str)
    }
    // Deliberately not bool, to prove `is_` accessors get filtered.
    fn claims_bool_ty() -> TypeShape {
        TypeShape::Primitive(Primitive::I64)
    }
    fn null_get(_: &dyn Reflected) -> Value {
        Value::Null
    }

    static BASE: ClassShape = ClassShape::new("t::Base", ClassKind::Abstract).with_methods(&[
        MethodShape::getter("get_name", str_ty, null_get),
        MethodShape::getter("is_active", claims_bool_ty, null_get),
    ]);
    static CHILD: ClassShape = ClassShape::new("t::Child", ClassKind::Concrete)
        .with_supertypes(&[|| TypeShape::Class(&BASE)])
        .with_methods(&[MethodShape::getter("get_nickname", str_ty, null_get)]);

    #[test]
    fn accessors_without_fields_still_define_properties() {
        let map = describe_properties(&CHILD);
        assert!(map.get("name").is_some());
        assert!(map.get("nickname").is_some());
        assert!(map.get("name").unwrap().field().is_none());
    }

    #[test]
    fn is_accessor_must_return_bool() {
        // `is_active` above claims i64, so it must not register.
        let map = describe_properties(&CHILD);
        assert!(map.get("active").is_none());
    }

    #[test]
    fn fallback_lookup_is_case_insensitive() {
        let map = describe_properties(&CHILD);
        assert!(map.get_with_fallback("NICKNAME").is_some());
        assert!(map.get_with_fallback("missing").is_none());
    }
}
