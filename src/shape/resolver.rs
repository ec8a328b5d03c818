use crate::error::WireError;
use crate::shape::TypeShape;

/// Resolves generic type variables in `candidate` against a concrete
/// `enclosing` context type.
///
/// A variable is first looked up among the enclosing type's bindings (the
/// argument supplied for the parameter of the same name, when the enclosing
/// shape is a parameterization). An unbound variable falls back to its
/// declared bounds:
///
/// - zero bounds resolve to the universal [`TypeShape::Any`],
/// - exactly one bound resolves recursively to that bound,
/// - more than one bound fails with [`WireError::UnsupportedGenerics`].
///
/// ```
/// use typewire::shape::{resolve, TypeShape};
///
/// let unbounded = TypeShape::variable("T");
/// assert_eq!(resolve(&unbounded, &TypeShape::Any).unwrap(), TypeShape::Any);
/// ```
pub fn resolve(candidate: &TypeShape, enclosing: &TypeShape) -> Result<TypeShape, WireError> {
    match candidate {
        TypeShape::Any | TypeShape::Primitive(_) | TypeShape::Class(_) => Ok(candidate.clone()),
        TypeShape::Wildcard => Ok(TypeShape::Any),
        TypeShape::Array(component) => Ok(TypeShape::array_of(resolve(component, enclosing)?)),
        TypeShape::Parameterized { class, args } => {
            let args = args
                .iter()
                .map(|arg| resolve(arg, enclosing))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeShape::Parameterized {
                class: *class,
                args: args.into_boxed_slice(),
            })
        }
        TypeShape::Variable { name, bounds } => {
            if let Some(bound) = binding(name, enclosing) {
                return resolve(&bound, enclosing);
            }
            match bounds.len() {
                0 => Ok(TypeShape::Any),
                1 => resolve(&bounds[0], enclosing),
                _ => Err(WireError::UnsupportedGenerics((*name).into())),
            }
        }
    }
}

/// The argument the enclosing parameterization supplies for a variable, if
/// any.
fn binding(name: &str, enclosing: &TypeShape) -> Option<TypeShape> {
    if let TypeShape::Parameterized { class, args } = enclosing {
        let index = class.type_param_index(name)?;
        return args.get(index).cloned();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::error::WireError;
    use crate::shape::{ClassKind, ClassShape, Primitive, TypeParamShape, TypeShape};

    static BOUND: ClassShape = ClassShape::new("t::Bound", ClassKind::Interface);
    static OTHER_BOUND: ClassShape = ClassShape::new("t::OtherBound", ClassKind::Interface);
    static BOX_SHAPE: ClassShape = ClassShape::new("t::Box", ClassKind::Concrete)
        .with_type_params(&[TypeParamShape::new("T", &[])]);

    #[test]
    fn unbounded_variable_resolves_to_any() {
        let resolved = resolve(&TypeShape::variable("T"), &TypeShape::Any).unwrap();
        assert_eq!(resolved, TypeShape::Any);
    }

    #[test]
    fn single_bound_resolves_recursively() {
        let inner = TypeShape::Variable {
            name: "U",
            bounds: Box::new([TypeShape::Class(&BOUND)]),
        };
        let outer = TypeShape::Variable {
            name: "T",
            bounds: Box::new([inner]),
        };
        let resolved = resolve(&outer, &TypeShape::Any).unwrap();
        assert_eq!(resolved, TypeShape::Class(&BOUND));
    }

    #[test]
    fn multiple_bounds_are_rejected() {
        let shape = TypeShape::Variable {
            name: "T",
            bounds: Box::new([TypeShape::Class(&BOUND), TypeShape::Class(&OTHER_BOUND)]),
        };
        let err = resolve(&shape, &TypeShape::Any).unwrap_err();
        assert!(matches!(err, WireError::UnsupportedGenerics(name) if name == "T"));
    }

    #[test]
    fn enclosing_parameterization_binds_the_variable() {
        let enclosing = TypeShape::Parameterized {
            class: &BOX_SHAPE,
            args: Box::new([TypeShape::Primitive(Primitive::I64)]),
        };
        let resolved = resolve(&TypeShape::variable("T"), &enclosing).unwrap();
        assert_eq!(resolved, TypeShape::Primitive(Primitive::I64));
    }

    #[test]
    fn arrays_and_parameterizations_resolve_componentwise() {
        let enclosing = TypeShape::Parameterized {
            class: &BOX_SHAPE,
            args: Box::new([TypeShape::Primitive(Primitive::Str)]),
        };
        let candidate = TypeShape::array_of(TypeShape::variable("T"));
        let resolved = resolve(&candidate, &enclosing).unwrap();
        assert_eq!(
            resolved,
            TypeShape::array_of(TypeShape::Primitive(Primitive::Str))
        );

        let wildcard = TypeShape::Parameterized {
            class: &BOX_SHAPE,
            args: Box::new([TypeShape::Wildcard]),
        };
        let resolved = resolve(&wildcard, &TypeShape::Any).unwrap();
        assert_eq!(
            resolved,
            TypeShape::Parameterized {
                class: &BOX_SHAPE,
                args: Box::new([TypeShape::Any]),
            }
        );
    }
}
