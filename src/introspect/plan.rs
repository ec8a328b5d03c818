use crate::error::WireError;
use crate::introspect::{describe_properties, select_constructor, PropertyMap};
use crate::shape::{resolve, ClassShape, ConstructorShape, GetFn, SetFn, TypeShape};
use crate::value::{ObjRef, Reflected, Value};

// -----------------------------------------------------------------------------
// PropertyInfo

/// One property access strategy inside an [`ObjectPlan`].
///
/// All entries of a plan share one strategy: constructor-driven plans hold
/// `Getter` and `Field` entries whose positions follow constructor-parameter
/// order; setter-driven plans hold only `Setter` entries positioned in
/// encounter order.
pub enum PropertyInfo {
    /// Read via accessor, matched to a constructor parameter by position.
    Getter {
        position: usize,
        name: &'static str,
        get: GetFn,
        /// The accessor's return type, resolved against the declaring type.
        ty: TypeShape,
    },
    /// Read via direct field access; no accessor exists for the parameter.
    Field {
        position: usize,
        name: &'static str,
        get: GetFn,
        ty: TypeShape,
    },
    /// Applied after default construction; only used when the selected
    /// constructor takes no parameters.
    Setter {
        position: usize,
        name: &'static str,
        get: GetFn,
        set: SetFn,
        ty: TypeShape,
    },
}

impl PropertyInfo {
    pub const fn position(&self) -> usize {
        match self {
            Self::Getter { position, .. }
            | Self::Field { position, .. }
            | Self::Setter { position, .. } => *position,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Getter { name, .. } | Self::Field { name, .. } | Self::Setter { name, .. } => {
                name
            }
        }
    }

    pub const fn ty(&self) -> &TypeShape {
        match self {
            Self::Getter { ty, .. } | Self::Field { ty, .. } | Self::Setter { ty, .. } => ty,
        }
    }

    /// Reads this property's current value out of an instance.
    pub fn read(&self, obj: &dyn Reflected) -> Value {
        match self {
            Self::Getter { get, .. } | Self::Field { get, .. } | Self::Setter { get, .. } => {
                get(obj)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectPlan

/// The compiled access plan for one type: how to read its state and, for
/// concrete types, how to rebuild an instance.
pub struct ObjectPlan {
    shape: &'static ClassShape,
    /// `None` for abstract classes and interfaces (descriptive-only).
    constructor: Option<&'static ConstructorShape>,
    properties: Vec<PropertyInfo>,
    setter_strategy: bool,
}

impl std::fmt::Debug for ObjectPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPlan")
            .field("shape", &self.shape.name())
            .field("reconstructible", &self.constructor.is_some())
            .field("properties", &self.properties.len())
            .field("setter_strategy", &self.setter_strategy)
            .finish()
    }
}

impl ObjectPlan {
    #[inline]
    pub const fn shape(&self) -> &'static ClassShape {
        self.shape
    }

    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether this plan can rebuild instances at all.
    #[inline]
    pub const fn is_reconstructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Rebuilds an instance from property values in plan order.
    pub fn reconstruct(&self, values: Vec<Value>) -> Result<ObjRef, WireError> {
        let Some(constructor) = self.constructor else {
            return Err(WireError::NoSuitableConstructor(self.shape.name().into()));
        };
        if !self.setter_strategy {
            return Ok(ObjRef::from(constructor.invoke(values)?));
        }

        let mut instance = constructor.invoke(Vec::new())?;
        for (info, value) in self.properties.iter().zip(values) {
            let PropertyInfo::Setter { set, name, .. } = info else {
                // Setter plans hold only Setter entries.
                continue;
            };
            set(&mut *instance, value).map_err(|e| e.at(name))?;
        }
        Ok(ObjRef::from(instance))
    }
}

// -----------------------------------------------------------------------------
// Plan construction

/// Builds the property plan for a type.
///
/// `enclosing` supplies generic bindings when the type is used as a
/// parameterization; pass `TypeShape::Class(shape)` when none exist.
///
/// Strategy selection: when the selected constructor takes no parameters and
/// at least one property has both a getter and a setter, a setter plan is
/// built from exactly those pairs (unpaired members are silently excluded).
/// Otherwise each constructor parameter is matched to a property by exact
/// name, then case-insensitively, preferring its getter and falling back to
/// direct field access.
pub fn plan_object(
    shape: &'static ClassShape,
    enclosing: &TypeShape,
) -> Result<ObjectPlan, WireError> {
    let descriptors = describe_properties(shape);

    let Some(constructor) = select_constructor(shape)? else {
        // Descriptive-only: every readable property, in encounter order.
        let mut properties = Vec::new();
        for (name, descriptor) in descriptors.iter() {
            let Some(getter) = descriptor.read_accessor() else {
                continue;
            };
            let Some(get) = getter.get_hook() else {
                continue;
            };
            let ty = resolve(&getter.return_shape().unwrap_or(TypeShape::Any), enclosing)?;
            properties.push(PropertyInfo::Getter {
                position: properties.len(),
                name,
                get,
                ty,
            });
        }
        return Ok(ObjectPlan {
            shape,
            constructor: None,
            properties,
            setter_strategy: false,
        });
    };

    if constructor.is_zero_arg() {
        let properties = setter_plan(shape, &descriptors, enclosing)?;
        if !properties.is_empty() {
            return Ok(ObjectPlan {
                shape,
                constructor: Some(constructor),
                properties,
                setter_strategy: true,
            });
        }
        // A stateless type: zero-argument constructor, nothing to carry.
        return Ok(ObjectPlan {
            shape,
            constructor: Some(constructor),
            properties: Vec::new(),
            setter_strategy: false,
        });
    }

    let mut properties = Vec::with_capacity(constructor.params().len());
    for (position, param) in constructor.params().iter().enumerate() {
        let Some((name, descriptor)) = descriptors.get_with_fallback(param.name()) else {
            return Err(WireError::UnmatchedParameter {
                type_name: shape.name().into(),
                param: param.name().into(),
            });
        };

        if let Some(getter) = descriptor.read_accessor() {
            let declared = getter.return_shape().unwrap_or(TypeShape::Any);
            let ty = resolve(&declared, enclosing)?;
            let expected = resolve(&param.ty(), enclosing)?;
            let literal_ok = expected.assignable_from(&ty);
            let erased_ok = expected.erased().assignable_from(&ty.erased());
            if !literal_ok && !erased_ok {
                return Err(WireError::PropertyTypeMismatch {
                    type_name: shape.name().into(),
                    property: name.into(),
                    expected: expected.to_string(),
                    found: ty.to_string(),
                });
            }
            let get = getter.get_hook().expect("read accessor carries a get hook");
            properties.push(PropertyInfo::Getter {
                position,
                name,
                get,
                ty,
            });
        } else if let Some(field) = descriptor.field() {
            properties.push(PropertyInfo::Field {
                position,
                name,
                get: field.get_hook(),
                ty: resolve(&field.ty(), enclosing)?,
            });
        } else {
            return Err(WireError::NoBackingField {
                type_name: shape.name().into(),
                property: name.into(),
            });
        }
    }

    Ok(ObjectPlan {
        shape,
        constructor: Some(constructor),
        properties,
        setter_strategy: false,
    })
}

fn setter_plan(
    shape: &'static ClassShape,
    descriptors: &PropertyMap,
    enclosing: &TypeShape,
) -> Result<Vec<PropertyInfo>, WireError> {
    let mut properties = Vec::new();
    for (name, descriptor) in descriptors.iter() {
        let (Some(getter), Some(setter)) = (descriptor.read_accessor(), descriptor.setter())
        else {
            continue;
        };
        if setter.params().len() != 1 {
            return Err(WireError::TooManyArguments {
                type_name: shape.name().into(),
                property: name.into(),
            });
        }

        let getter_ty = resolve(&getter.return_shape().unwrap_or(TypeShape::Any), enclosing)?;
        let setter_ty = resolve(&setter.param_shape().unwrap_or(TypeShape::Any), enclosing)?;
        let mut consistent = compatible(&getter_ty, &setter_ty);
        if let Some(field) = descriptor.field() {
            let field_ty = resolve(&field.ty(), enclosing)?;
            consistent = consistent
                && compatible(&field_ty, &getter_ty)
                && compatible(&field_ty, &setter_ty);
        }
        if !consistent {
            return Err(WireError::TypeConsistency {
                type_name: shape.name().into(),
                property: name.into(),
            });
        }

        let get = getter.get_hook().expect("read accessor carries a get hook");
        let set = setter.set_hook().expect("setter carries a set hook");
        properties.push(PropertyInfo::Setter {
            position: properties.len(),
            name,
            get,
            set,
            ty: getter_ty,
        });
    }
    Ok(properties)
}

/// Pairwise compatibility for setter plans: assignable in either direction,
/// tolerating generic-vs-erased mismatches.
fn compatible(a: &TypeShape, b: &TypeShape) -> bool {
    a.assignable_from(b) || b.assignable_from(a) || a.erased() == b.erased()
}
