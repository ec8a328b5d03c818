use crate::error::WireError;
use crate::shape::{ClassKind, ClassShape, ConstructorShape};

/// Picks the one constructor used to reconstruct instances of a type.
///
/// Returns `Ok(None)` for abstract classes and interfaces, which are
/// serialized property-wise without reconstruction.
///
/// For concrete types the precedence is deterministic:
///
/// 1. a single declared constructor is selected,
/// 2. a zero-argument constructor plus exactly one other selects the other,
/// 3. the constructor flagged primary is the initial candidate,
/// 4. a constructor marked for deserialization overrides steps 1-3; two such
///    marks fail with [`WireError::AmbiguousConstructor`],
/// 5. no candidate fails with [`WireError::NoSuitableConstructor`].
///
/// A selected constructor that captures its enclosing instance is rejected
/// with [`WireError::SyntheticParameter`]; such types cannot be rebuilt from
/// the wire.
pub fn select_constructor(
    shape: &'static ClassShape,
) -> Result<Option<&'static ConstructorShape>, WireError> {
    if shape.kind() != ClassKind::Concrete {
        return Ok(None);
    }

    let constructors = shape.constructors();

    let mut marked = constructors.iter().filter(|c| c.is_for_deserialization());
    let selected = match (marked.next(), marked.next()) {
        (Some(_), Some(_)) => return Err(WireError::AmbiguousConstructor(shape.name().into())),
        (Some(marked), None) => marked,
        (None, _) => {
            let candidate = match constructors {
                [only] => Some(only),
                [a, b] if a.is_zero_arg() != b.is_zero_arg() => {
                    Some(if a.is_zero_arg() { b } else { a })
                }
                _ => constructors.iter().find(|c| c.is_primary()),
            };
            match candidate {
                Some(candidate) => candidate,
                None => return Err(WireError::NoSuitableConstructor(shape.name().into())),
            }
        }
    };

    if selected.captures_enclosing() {
        return Err(WireError::SyntheticParameter(shape.name().into()));
    }
    Ok(Some(selected))
}
