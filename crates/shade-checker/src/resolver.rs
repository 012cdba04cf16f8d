//! The call-site driver.
//!
//! Entry point the checker invokes when it reaches a call expression whose
//! children are already typed. Tries ordinary overload resolution first,
//! falls back to intrinsic synthesis for the closed operator set, registers
//! synthesized functions in the program (checking the memo cache first, so
//! a fixed `(operator, argument types)` key is synthesized at most once per
//! compilation), and records the outcome on the AST node.
//!
//! Resolution is attempted exactly once per call node: success writes the
//! function back-reference and the unwrapped result type; failure is
//! terminal for the enclosing declaration.

use shade_core::ast::CallExpr;
use shade_core::{CandidateFailure, Program, RejectReason, Type, TypeError, TypeHash};

use crate::intrinsics;
use crate::overload::{resolve_overload, OverloadMatch};
use crate::type_ref::TypeRef;

/// Resolve a call expression against its overload set.
///
/// `candidates` is the overload set supplied by name lookup, in declaration
/// order. The program is mutated only when an intrinsic is synthesized.
/// Argument expressions must already carry resolved types; an untyped
/// argument is a traversal-order bug and asserts.
pub fn resolve_call(
    call: &mut CallExpr,
    candidates: &[TypeHash],
    program: &mut Program,
) -> Result<Type, TypeError> {
    assert!(!call.is_resolved(), "call expression resolved twice");

    let arg_types: Vec<Type> = call
        .arguments
        .iter()
        .map(|arg| {
            let ty = arg
                .ty()
                .unwrap_or_else(|| panic!("argument visited without a resolved type"))
                .clone();
            TypeRef::wrap(ty).unwrap()
        })
        .collect();

    let failures = match resolve_overload(program, candidates, &arg_types, call.cast_return.as_ref())
    {
        Ok(matched) => return Ok(finish(call, matched)),
        Err(failures) => failures,
    };

    if intrinsics::is_intrinsic_name(&call.name) {
        let synthesized = resolve_intrinsic(call, &arg_types, program, failures)?;
        return Ok(finish(call, synthesized));
    }

    Err(failure_error(call, &arg_types, failures))
}

/// Fall back to the intrinsic synthesizer after ordinary resolution failed.
///
/// The memo cache is consulted before synthesis; a cache hit reuses the
/// existing function-table entry. The synthesized function is then run
/// through the ordinary engine as the sole candidate so cast targets and
/// null unification are checked by exactly one code path.
fn resolve_intrinsic(
    call: &CallExpr,
    arg_types: &[Type],
    program: &mut Program,
    mut failures: Vec<CandidateFailure>,
) -> Result<OverloadMatch, TypeError> {
    let arg_hashes: Vec<TypeHash> = arg_types.iter().map(Type::type_hash).collect();
    let key = TypeHash::from_operator(&call.name, &arg_hashes);

    let func_hash = match program.cached_intrinsic(key) {
        Some(cached) => cached,
        None => {
            let func = intrinsics::synthesize(&call.name, arg_types, call.span)?;
            program.insert_intrinsic(key, func)
        }
    };

    match resolve_overload(program, &[func_hash], arg_types, call.cast_return.as_ref()) {
        Ok(matched) => Ok(matched),
        Err(mut intrinsic_failures) => {
            failures.append(&mut intrinsic_failures);
            Err(failure_error(call, arg_types, failures))
        }
    }
}

/// Record a successful resolution on the call node.
///
/// The result type is always written back in unwrapped form.
fn finish(call: &mut CallExpr, matched: OverloadMatch) -> Type {
    let result = TypeRef::wrap(matched.return_type).unwrap();
    call.resolve_to(matched.func, result.clone());
    result
}

/// Build the terminal error for a call no candidate satisfied.
fn failure_error(call: &CallExpr, arg_types: &[Type], failures: Vec<CandidateFailure>) -> TypeError {
    let args = arg_types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    if let Some(target) = &call.cast_return {
        return TypeError::CastTypeMismatch {
            name: call.name.clone(),
            args,
            target: target.to_string(),
            reasons: failures,
            span: call.span,
        };
    }

    // A lone candidate that failed only on repeated-variable consistency is
    // the more specific diagnostic.
    if let [CandidateFailure {
        reason: RejectReason::InconsistentBinding { var, first, second },
        ..
    }] = failures.as_slice()
    {
        return TypeError::AmbiguousBinding {
            name: call.name.clone(),
            var: var.clone(),
            first: first.clone(),
            second: second.clone(),
            span: call.span,
        };
    }

    TypeError::NoMatchingOverload {
        name: call.name.clone(),
        args,
        reasons: failures,
        span: call.span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_core::ast::{Expr, LiteralExpr, LiteralKind};
    use shade_core::{AddressSpace, FuncDecl, Param, Span};

    fn typed_literal(kind: LiteralKind, ty: Type) -> Expr {
        Expr::Literal(LiteralExpr {
            kind,
            ty: Some(ty),
            span: Span::default(),
        })
    }

    fn uint_arg(v: u32) -> Expr {
        typed_literal(LiteralKind::Uint(v), Type::Uint)
    }

    fn array_ref_arg() -> Expr {
        // Stand-in for a variable holding arrayRef<thread,int>; the checker
        // hands lvalues over as implicit references.
        typed_literal(
            LiteralKind::Null,
            Type::ImplicitRef(Box::new(Type::array_ref(AddressSpace::Thread, Type::Int))),
        )
    }

    fn declared_f(program: &mut Program) -> Vec<TypeHash> {
        let int_f = program.add_function(FuncDecl::user(
            "f",
            vec![Param::new("x", Type::Int), Param::new("y", Type::Int)],
            Type::Int,
            vec![],
            Span::default(),
        ));
        let float_f = program.add_function(FuncDecl::user(
            "f",
            vec![Param::new("x", Type::Float), Param::new("y", Type::Float)],
            Type::Float,
            vec![],
            Span::default(),
        ));
        vec![int_f, float_f]
    }

    #[test]
    fn ordinary_resolution_binds_the_call() {
        let mut program = Program::new();
        let candidates = declared_f(&mut program);

        let mut call = CallExpr::new(
            "f",
            vec![
                typed_literal(LiteralKind::Int(1), Type::Int),
                typed_literal(LiteralKind::Int(2), Type::Int),
            ],
            Span::default(),
        );
        let ty = resolve_call(&mut call, &candidates, &mut program).unwrap();
        assert_eq!(ty, Type::Int);
        assert_eq!(call.func, Some(candidates[0]));
        assert_eq!(call.ty, Some(Type::Int));
    }

    #[test]
    fn arguments_are_unwrapped_before_matching() {
        let mut program = Program::new();
        let candidates = declared_f(&mut program);

        // Both arguments arrive as lvalues (implicit references).
        let lvalue_int = typed_literal(
            LiteralKind::Int(0),
            Type::ImplicitRef(Box::new(Type::Int)),
        );
        let mut call = CallExpr::new(
            "f",
            vec![lvalue_int.clone(), lvalue_int],
            Span::default(),
        );
        let ty = resolve_call(&mut call, &candidates, &mut program).unwrap();
        assert_eq!(ty, Type::Int);
    }

    #[test]
    fn unknown_name_fails_with_one_reason_per_candidate() {
        let mut program = Program::new();
        let candidates = declared_f(&mut program);

        let mut call = CallExpr::new(
            "f",
            vec![typed_literal(LiteralKind::Bool(true), Type::Bool)],
            Span::new(2, 3, 1),
        );
        let err = resolve_call(&mut call, &candidates, &mut program).unwrap_err();
        match err {
            TypeError::NoMatchingOverload { name, reasons, span, .. } => {
                assert_eq!(name, "f");
                assert_eq!(reasons.len(), 2);
                assert_eq!(span, Span::new(2, 3, 1));
            }
            other => panic!("expected NoMatchingOverload, got: {other:?}"),
        }
        assert!(!call.is_resolved());
    }

    #[test]
    fn empty_overload_set_fails_with_zero_reasons() {
        let mut program = Program::new();
        let mut call = CallExpr::new(
            "undeclared",
            vec![typed_literal(LiteralKind::Int(1), Type::Int)],
            Span::default(),
        );
        let err = resolve_call(&mut call, &[], &mut program).unwrap_err();
        match err {
            TypeError::NoMatchingOverload { reasons, .. } => assert!(reasons.is_empty()),
            other => panic!("expected NoMatchingOverload, got: {other:?}"),
        }
    }

    #[test]
    fn intrinsic_synthesis_registers_and_memoizes() {
        let mut program = Program::new();
        let before = program.function_count();

        let mut first = CallExpr::new(
            intrinsics::OPERATOR_INDEX,
            vec![array_ref_arg(), uint_arg(0)],
            Span::default(),
        );
        let ty = resolve_call(&mut first, &[], &mut program).unwrap();
        assert_eq!(ty, Type::ptr(AddressSpace::Thread, Type::Int));
        assert_eq!(program.function_count(), before + 1);

        // A second structurally identical call site reuses the entry.
        let mut second = CallExpr::new(
            intrinsics::OPERATOR_INDEX,
            vec![array_ref_arg(), uint_arg(7)],
            Span::new(9, 1, 1),
        );
        resolve_call(&mut second, &[], &mut program).unwrap();
        assert_eq!(program.function_count(), before + 1);
        assert_eq!(first.func, second.func);
    }

    #[test]
    fn intrinsic_shape_violation_is_reported_distinctly() {
        let mut program = Program::new();
        let mut call = CallExpr::new(
            intrinsics::OPERATOR_INDEX,
            vec![
                typed_literal(LiteralKind::Int(1), Type::Int),
                uint_arg(0),
            ],
            Span::default(),
        );
        let err = resolve_call(&mut call, &[], &mut program).unwrap_err();
        assert!(matches!(err, TypeError::InvalidIntrinsicOperand { .. }));
        // Nothing was registered for the failed shape.
        assert_eq!(program.function_count(), 0);
    }

    #[test]
    fn lone_inconsistent_binding_is_ambiguous_binding() {
        let mut program = Program::new();
        let f = program.add_function(
            FuncDecl::user(
                "pair",
                vec![
                    Param::new("a", Type::var("T")),
                    Param::new("b", Type::var("T")),
                ],
                Type::var("T"),
                vec![],
                Span::default(),
            )
            .with_type_params(vec!["T".to_string()]),
        );

        let mut call = CallExpr::new(
            "pair",
            vec![
                typed_literal(LiteralKind::Int(1), Type::Int),
                typed_literal(LiteralKind::Float(1.0), Type::Float),
            ],
            Span::default(),
        );
        let err = resolve_call(&mut call, &[f], &mut program).unwrap_err();
        match err {
            TypeError::AmbiguousBinding { var, first, second, .. } => {
                assert_eq!(var, "T");
                assert_eq!(first, "int");
                assert_eq!(second, "float");
            }
            other => panic!("expected AmbiguousBinding, got: {other:?}"),
        }
    }

    #[test]
    fn cast_failure_has_cast_shape() {
        let mut program = Program::new();
        let candidates = declared_f(&mut program);

        let mut call = CallExpr::new(
            "f",
            vec![
                typed_literal(LiteralKind::Int(1), Type::Int),
                typed_literal(LiteralKind::Int(2), Type::Int),
            ],
            Span::default(),
        );
        call.cast_return = Some(Type::Bool);
        let err = resolve_call(&mut call, &candidates, &mut program).unwrap_err();
        match err {
            TypeError::CastTypeMismatch { target, reasons, .. } => {
                assert_eq!(target, "bool");
                assert_eq!(reasons.len(), 2);
            }
            other => panic!("expected CastTypeMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn cast_success_constrains_resolution() {
        let mut program = Program::new();
        let candidates = declared_f(&mut program);

        let mut call = CallExpr::new(
            "f",
            vec![
                typed_literal(LiteralKind::Int(1), Type::Int),
                typed_literal(LiteralKind::Int(2), Type::Int),
            ],
            Span::default(),
        );
        call.cast_return = Some(Type::Int);
        let ty = resolve_call(&mut call, &candidates, &mut program).unwrap();
        assert_eq!(ty, Type::Int);
    }
}
