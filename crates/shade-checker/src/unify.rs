//! Structural unification of candidate parameter types against concrete
//! argument types.
//!
//! Unification is one-directional: the parameter side may contain type
//! variables, the argument side is always concrete. A variable binds on
//! first contact and every later occurrence inside the same candidate must
//! agree with that binding. Concrete-to-concrete positions require exact
//! structural equality, except that the null literal's type unifies with
//! any pointer or array-reference parameter.

use rustc_hash::FxHashMap;
use shade_core::Type;
use thiserror::Error;

/// Type-variable bindings accumulated while evaluating one candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(FxHashMap<String, Type>);

impl Bindings {
    /// Empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable's binding.
    pub fn get(&self, var: &str) -> Option<&Type> {
        self.0.get(var)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Why a single position failed to unify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// Structural mismatch between parameter and argument.
    #[error("expected '{expected}', got '{got}'")]
    Mismatch {
        /// The parameter type, printed.
        expected: String,
        /// The argument type, printed.
        got: String,
    },
    /// A variable would be bound to two different concrete types.
    #[error("type variable '{var}' bound to both '{first}' and '{second}'")]
    Inconsistent {
        /// The variable's name.
        var: String,
        /// The existing binding, printed.
        first: String,
        /// The conflicting type, printed.
        second: String,
    },
}

/// Unify a (possibly generic) parameter type with a concrete argument type.
pub fn unify(param: &Type, arg: &Type, bindings: &mut Bindings) -> Result<(), UnifyError> {
    match (param, arg) {
        (Type::Var(name), concrete) => match bindings.0.get(name) {
            Some(bound) if bound == concrete => Ok(()),
            Some(bound) => Err(UnifyError::Inconsistent {
                var: name.clone(),
                first: bound.to_string(),
                second: concrete.to_string(),
            }),
            None => {
                bindings.0.insert(name.clone(), concrete.clone());
                Ok(())
            }
        },
        (
            Type::Array {
                elem: param_elem,
                len: param_len,
            },
            Type::Array {
                elem: arg_elem,
                len: arg_len,
            },
        ) if param_len == arg_len => unify(param_elem, arg_elem, bindings),
        (
            Type::ArrayRef {
                space: param_space,
                elem: param_elem,
            },
            Type::ArrayRef {
                space: arg_space,
                elem: arg_elem,
            },
        ) if param_space == arg_space => unify(param_elem, arg_elem, bindings),
        (
            Type::Ptr {
                space: param_space,
                elem: param_elem,
            },
            Type::Ptr {
                space: arg_space,
                elem: arg_elem,
            },
        ) if param_space == arg_space => unify(param_elem, arg_elem, bindings),
        // The null literal unifies with any reference-shaped parameter.
        (Type::Ptr { .. }, Type::Null) | (Type::ArrayRef { .. }, Type::Null) => Ok(()),
        (concrete_param, concrete_arg) if concrete_param == concrete_arg => Ok(()),
        (expected, got) => Err(UnifyError::Mismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }),
    }
}

/// Replace bound type variables in a type with their concrete bindings.
///
/// Unbound variables survive substitution; callers decide whether that is
/// an error (it is, for a resolved call's return type).
pub fn substitute(ty: &Type, bindings: &Bindings) -> Type {
    match ty {
        Type::Var(name) => bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        Type::Array { elem, len } => Type::Array {
            elem: Box::new(substitute(elem, bindings)),
            len: *len,
        },
        Type::ArrayRef { space, elem } => Type::ArrayRef {
            space: *space,
            elem: Box::new(substitute(elem, bindings)),
        },
        Type::Ptr { space, elem } => Type::Ptr {
            space: *space,
            elem: Box::new(substitute(elem, bindings)),
        },
        Type::ImplicitRef(inner) => Type::ImplicitRef(Box::new(substitute(inner, bindings))),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_core::AddressSpace;

    #[test]
    fn concrete_requires_exact_equality() {
        let mut b = Bindings::new();
        assert!(unify(&Type::Int, &Type::Int, &mut b).is_ok());
        assert!(matches!(
            unify(&Type::Int, &Type::Uint, &mut b),
            Err(UnifyError::Mismatch { .. })
        ));
        assert!(b.is_empty());
    }

    #[test]
    fn variable_binds_once_and_stays_consistent() {
        let mut b = Bindings::new();
        let t = Type::var("T");
        unify(&t, &Type::Int, &mut b).unwrap();
        assert_eq!(b.get("T"), Some(&Type::Int));

        // Same binding is fine, a different one is not.
        unify(&t, &Type::Int, &mut b).unwrap();
        let err = unify(&t, &Type::Float, &mut b).unwrap_err();
        assert_eq!(
            err,
            UnifyError::Inconsistent {
                var: "T".to_string(),
                first: "int".to_string(),
                second: "float".to_string(),
            }
        );
    }

    #[test]
    fn variables_bind_through_structure() {
        let mut b = Bindings::new();
        let param = Type::array_ref(AddressSpace::Thread, Type::var("T"));
        let arg = Type::array_ref(AddressSpace::Thread, Type::Float);
        unify(&param, &arg, &mut b).unwrap();
        assert_eq!(b.get("T"), Some(&Type::Float));
    }

    #[test]
    fn address_spaces_must_agree() {
        let mut b = Bindings::new();
        let param = Type::array_ref(AddressSpace::Thread, Type::var("T"));
        let arg = Type::array_ref(AddressSpace::Device, Type::Float);
        assert!(unify(&param, &arg, &mut b).is_err());
    }

    #[test]
    fn array_lengths_must_agree() {
        let mut b = Bindings::new();
        assert!(unify(&Type::array(Type::Int, 4), &Type::array(Type::Int, 4), &mut b).is_ok());
        assert!(unify(&Type::array(Type::Int, 4), &Type::array(Type::Int, 5), &mut b).is_err());
    }

    #[test]
    fn null_unifies_with_reference_shapes() {
        let mut b = Bindings::new();
        let ptr = Type::ptr(AddressSpace::Thread, Type::Int);
        assert!(unify(&ptr, &Type::Null, &mut b).is_ok());
        let aref = Type::array_ref(AddressSpace::Device, Type::Int);
        assert!(unify(&aref, &Type::Null, &mut b).is_ok());
        // But not with scalars.
        assert!(unify(&Type::Int, &Type::Null, &mut b).is_err());
    }

    #[test]
    fn substitution_rebuilds_structure() {
        let mut b = Bindings::new();
        unify(&Type::var("T"), &Type::Uint, &mut b).unwrap();
        let ptr = Type::ptr(AddressSpace::Thread, Type::var("T"));
        assert_eq!(
            substitute(&ptr, &b),
            Type::ptr(AddressSpace::Thread, Type::Uint)
        );
        // Unbound variables survive.
        assert_eq!(substitute(&Type::var("U"), &b), Type::var("U"));
    }
}
