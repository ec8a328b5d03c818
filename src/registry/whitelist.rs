use std::collections::HashSet;

use crate::error::WireError;
use crate::shape::ClassShape;

/// Contributes explicitly authorized type names to the whitelist.
///
/// Providers are consulted once, when the whitelist is assembled; the union
/// of all contributions (plus the built-in defaults) forms the allow-set.
pub trait WhitelistProvider: Send + Sync {
    fn allowed_types(&self) -> &[&'static str];
}

/// The security gate in front of the serializer factory.
///
/// A type passes when its full name appears in the assembled allow-set, or
/// when its shape (or any transitive supertype's shape) carries the
/// serializable marker. The gate runs before any introspection or
/// constructor hook, so an unauthorized type in a wire blob can never cause
/// instantiation side effects.
pub struct Whitelist {
    allowed: HashSet<&'static str>,
}

impl Whitelist {
    /// Assembles the gate from the given providers plus the built-in
    /// defaults (the types the crate ships custom serializers for).
    pub fn from_providers(providers: &[&dyn WhitelistProvider]) -> Self {
        let mut allowed: HashSet<&'static str> =
            crate::registry::builtin::BUILTIN_TYPE_NAMES.iter().copied().collect();
        for provider in providers {
            allowed.extend(provider.allowed_types().iter().copied());
        }
        Self { allowed }
    }

    /// Defaults only.
    pub fn standard() -> Self {
        Self::from_providers(&[])
    }

    pub fn is_authorized(&self, shape: &ClassShape) -> bool {
        self.allowed.contains(shape.name()) || shape.has_marker_recursive()
    }

    pub fn require_authorized(&self, shape: &ClassShape) -> Result<(), WireError> {
        if self.is_authorized(shape) {
            Ok(())
        } else {
            log::warn!("refusing unauthorized type `{}`", shape.name());
            Err(WireError::NotWhitelisted(shape.name().into()))
        }
    }
}
