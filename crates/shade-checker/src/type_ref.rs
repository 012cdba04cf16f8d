//! The type-reference layer.
//!
//! Decides once, consistently, whether a value is held directly or through
//! an implicit reference. Lvalues (variable reads) carry
//! [`Type::ImplicitRef`]; everything crossing a call boundary is normalized
//! through [`TypeRef`] so overload resolution and synthesis only ever see
//! unwrapped value types, and resolved result types are written back to the
//! AST in unwrapped form.

use shade_core::Type;

/// A normalized type: at most one level of implicit reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef(Type);

impl TypeRef {
    /// Normalize a type into the wrapper. Idempotent: wrapping an already
    /// wrapped type collapses nested implicit references to one level.
    pub fn wrap(ty: Type) -> TypeRef {
        match ty {
            Type::ImplicitRef(inner) => match *inner {
                // Collapse &&T to &T.
                Type::ImplicitRef(deeper) => TypeRef::wrap(Type::ImplicitRef(deeper)),
                direct => TypeRef(Type::ImplicitRef(Box::new(direct))),
            },
            direct => TypeRef(direct),
        }
    }

    /// The direct value type, with any implicit reference stripped.
    pub fn unwrap(self) -> Type {
        match self.0 {
            Type::ImplicitRef(inner) => *inner,
            direct => direct,
        }
    }

    /// Whether the value is held through an implicit reference.
    pub fn is_reference(&self) -> bool {
        matches!(self.0, Type::ImplicitRef(_))
    }

    /// Borrow the normalized type.
    pub fn ty(&self) -> &Type {
        &self.0
    }
}
