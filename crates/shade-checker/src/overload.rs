//! Overload resolution for function calls.
//!
//! Given a candidate set gathered by name lookup and the concrete argument
//! types at a call site, selects the function to bind.
//!
//! ## Algorithm
//!
//! 1. Gate each candidate on exact arity (no variadics, no defaults)
//! 2. Unify every parameter position against the concrete argument type,
//!    accumulating type-variable bindings that must stay consistent within
//!    the candidate
//! 3. If the call is a cast, unify the candidate's return type with the
//!    cast target under the same bindings
//! 4. The first fully satisfiable candidate in declaration order wins;
//!    there is deliberately no "most specific" ranking
//! 5. Every rejected candidate contributes a reason, so a total failure can
//!    enumerate the whole considered set
//!
//! Resolution never mutates the program: intrinsic synthesis and
//! registration happen a level up, in the call resolver.

use shade_core::{CandidateFailure, Program, RejectReason, Type, TypeHash};

use crate::unify::{substitute, unify, Bindings, UnifyError};

/// Result of successful overload resolution.
#[derive(Debug, Clone)]
pub struct OverloadMatch {
    /// The selected function's table hash.
    pub func: TypeHash,
    /// Type-variable bindings established by the arguments.
    pub bindings: Bindings,
    /// The fully substituted, concrete return type.
    pub return_type: Type,
}

/// Resolve an overloaded call against a candidate set.
///
/// Candidates are tried in the order given, which callers must keep equal
/// to declaration order. An empty candidate list is valid and fails with an
/// empty rejection list.
///
/// # Arguments
///
/// * `program` - Function table, for candidate lookup (read-only)
/// * `candidates` - Function hashes to consider, in declaration order
/// * `arg_types` - Unwrapped concrete argument types at the call site
/// * `cast_return` - Explicit cast target, if the call uses cast syntax
///
/// # Returns
///
/// * `Ok(OverloadMatch)` - The first fully satisfiable candidate
/// * `Err(reasons)` - One rejection reason per considered candidate
pub fn resolve_overload(
    program: &Program,
    candidates: &[TypeHash],
    arg_types: &[Type],
    cast_return: Option<&Type>,
) -> Result<OverloadMatch, Vec<CandidateFailure>> {
    let mut failures = Vec::new();

    for &hash in candidates {
        match try_match_candidate(program, hash, arg_types, cast_return) {
            Ok(matched) => return Ok(matched),
            Err(failure) => failures.push(failure),
        }
    }

    Err(failures)
}

/// Try to unify the call against a single candidate.
fn try_match_candidate(
    program: &Program,
    hash: TypeHash,
    arg_types: &[Type],
    cast_return: Option<&Type>,
) -> Result<OverloadMatch, CandidateFailure> {
    let func = program
        .get_function(hash)
        .unwrap_or_else(|| panic!("candidate {hash:?} missing from function table"));
    let signature = func.signature();
    let reject = |reason| CandidateFailure {
        signature: signature.clone(),
        reason,
    };

    if func.params.len() != arg_types.len() {
        return Err(reject(RejectReason::ArityMismatch {
            expected: func.params.len(),
            got: arg_types.len(),
        }));
    }

    let mut bindings = Bindings::new();
    for (index, (param, arg)) in func.params.iter().zip(arg_types.iter()).enumerate() {
        match unify(&param.ty, arg, &mut bindings) {
            Ok(()) => {}
            Err(UnifyError::Mismatch { expected, got }) => {
                return Err(reject(RejectReason::ParameterMismatch {
                    index,
                    expected,
                    got,
                }));
            }
            Err(UnifyError::Inconsistent { var, first, second }) => {
                return Err(reject(RejectReason::InconsistentBinding { var, first, second }));
            }
        }
    }

    if let Some(target) = cast_return {
        match unify(&func.return_type, target, &mut bindings) {
            Ok(()) => {}
            Err(UnifyError::Mismatch { expected, .. }) => {
                return Err(reject(RejectReason::ReturnMismatch {
                    declared: expected,
                    target: target.to_string(),
                }));
            }
            Err(UnifyError::Inconsistent { var, first, second }) => {
                return Err(reject(RejectReason::InconsistentBinding { var, first, second }));
            }
        }
    }

    let return_type = substitute(&func.return_type, &bindings);
    if let Some(var) = first_unbound_var(&return_type) {
        return Err(reject(RejectReason::UnboundReturnVariable { var }));
    }

    Ok(OverloadMatch {
        func: hash,
        bindings,
        return_type,
    })
}

/// Find an unbound variable left in a substituted type, if any.
fn first_unbound_var(ty: &Type) -> Option<String> {
    match ty {
        Type::Var(name) => Some(name.clone()),
        Type::Array { elem, .. }
        | Type::ArrayRef { elem, .. }
        | Type::Ptr { elem, .. }
        | Type::ImplicitRef(elem) => first_unbound_var(elem),
        _ => None,
    }
}
