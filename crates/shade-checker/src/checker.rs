//! The semantic checking pass.
//!
//! A [`VisitMut`] pass that types every expression bottom-up and drives the
//! call resolver at each call site. Literals type directly; variable reads
//! are lvalues and type as implicit references, which the type-reference
//! layer unwraps at call boundaries.
//!
//! The pass driver checks one declaration at a time: an error inside a
//! function body is terminal for that function, is recorded, and analysis
//! continues with the next declaration so one run surfaces as many real
//! errors as it can.

use shade_core::ast::{
    CallExpr, CommaExpr, LiteralExpr, LiteralKind, ReturnStmt, VarDeclStmt, VariableExpr,
};
use shade_core::visit::{self, VisitMut};
use shade_core::{FuncDecl, Program, Type, TypeError, TypeHash};

use crate::resolver::resolve_call;
use crate::type_ref::TypeRef;

/// The semantic checker for one compilation unit.
pub struct Checker<'a> {
    program: &'a mut Program,
    current_return: Option<Type>,
    errors: Vec<TypeError>,
}

impl<'a> Checker<'a> {
    /// Create a checker over a program's function table.
    pub fn new(program: &'a mut Program) -> Self {
        Self {
            program,
            current_return: None,
            errors: Vec::new(),
        }
    }

    /// Check every declaration, collecting one error per failing one.
    pub fn check_functions(&mut self, funcs: &mut [FuncDecl]) {
        for func in funcs {
            self.current_return = Some(func.return_type.clone());
            if let Err(err) = self.visit_func(func) {
                self.errors.push(err);
            }
        }
        self.current_return = None;
    }

    /// The errors collected so far.
    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    /// Consume the checker, yielding its errors.
    pub fn into_errors(self) -> Vec<TypeError> {
        self.errors
    }
}

/// Register declarations into the program and check their bodies.
///
/// Convenience driver for the common whole-unit flow; returns every error
/// found, empty on a clean unit.
pub fn check_functions(funcs: &mut [FuncDecl], program: &mut Program) -> Vec<TypeError> {
    register_functions(funcs, program);
    let mut checker = Checker::new(program);
    checker.check_functions(funcs);
    checker.into_errors()
}

/// Make declarations visible to name lookup before their bodies are
/// checked, so mutual recursion and forward calls resolve.
pub fn register_functions(funcs: &[FuncDecl], program: &mut Program) -> Vec<TypeHash> {
    funcs
        .iter()
        .map(|func| program.add_function(func.clone()))
        .collect()
}

impl VisitMut for Checker<'_> {
    fn visit_literal(&mut self, expr: &mut LiteralExpr) -> Result<(), TypeError> {
        let ty = match expr.kind {
            LiteralKind::Int(_) => Type::Int,
            LiteralKind::Uint(_) => Type::Uint,
            LiteralKind::Bool(_) => Type::Bool,
            LiteralKind::Float(_) => Type::Float,
            LiteralKind::Double(_) => Type::Double,
            LiteralKind::Null => Type::Null,
        };
        expr.ty = Some(ty);
        Ok(())
    }

    fn visit_variable(&mut self, expr: &mut VariableExpr) -> Result<(), TypeError> {
        // Variable reads are lvalues: held through an implicit reference.
        expr.ty = Some(
            TypeRef::wrap(Type::ImplicitRef(Box::new(expr.declared.clone())))
                .ty()
                .clone(),
        );
        Ok(())
    }

    fn visit_call(&mut self, expr: &mut CallExpr) -> Result<(), TypeError> {
        visit::walk_call(self, expr)?;
        let candidates = self.program.overloads(&expr.name).to_vec();
        resolve_call(expr, &candidates, self.program)?;
        Ok(())
    }

    fn visit_comma(&mut self, expr: &mut CommaExpr) -> Result<(), TypeError> {
        visit::walk_comma(self, expr)?;
        let last = expr
            .list
            .last()
            .and_then(|e| e.ty().cloned())
            .unwrap_or_else(|| panic!("comma expression with no typed operand"));
        expr.ty = Some(last);
        Ok(())
    }

    fn visit_var_decl(&mut self, stmt: &mut VarDeclStmt) -> Result<(), TypeError> {
        visit::walk_var_decl(self, stmt)?;
        if let Some(init) = &stmt.init {
            let init_ty = TypeRef::wrap(init.ty().cloned().expect("initializer not typed")).unwrap();
            if init_ty != stmt.declared {
                return Err(TypeError::TypeMismatch {
                    message: format!(
                        "cannot initialize '{}' of type '{}' with '{}'",
                        stmt.name, stmt.declared, init_ty
                    ),
                    span: stmt.span,
                });
            }
        }
        Ok(())
    }

    fn visit_return(&mut self, stmt: &mut ReturnStmt) -> Result<(), TypeError> {
        visit::walk_return(self, stmt)?;
        let expected = self
            .current_return
            .clone()
            .expect("return statement outside a function");
        match &stmt.value {
            Some(value) => {
                let got = TypeRef::wrap(value.ty().cloned().expect("return value not typed"))
                    .unwrap();
                if got != expected {
                    return Err(TypeError::TypeMismatch {
                        message: format!("cannot return '{got}' from a function returning '{expected}'"),
                        span: stmt.span,
                    });
                }
            }
            None => {
                if expected != Type::Void {
                    return Err(TypeError::TypeMismatch {
                        message: format!("missing return value in a function returning '{expected}'"),
                        span: stmt.span,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_core::ast::{Expr, ExprStmt, Stmt};
    use shade_core::{Param, Span};

    fn lit(kind: LiteralKind) -> Expr {
        Expr::Literal(LiteralExpr {
            kind,
            ty: None,
            span: Span::default(),
        })
    }

    fn var(name: &str, declared: Type) -> Expr {
        Expr::Variable(VariableExpr {
            name: name.to_string(),
            declared,
            ty: None,
            span: Span::default(),
        })
    }

    fn expr_stmt(expr: Expr) -> Stmt {
        Stmt::Expr(ExprStmt {
            expr,
            span: Span::default(),
        })
    }

    fn user_func(name: &str, ret: Type, stmts: Vec<Stmt>) -> FuncDecl {
        FuncDecl::user(name, vec![], ret, stmts, Span::default())
    }

    #[test]
    fn literals_type_directly() {
        let mut program = Program::new();
        let mut expr = lit(LiteralKind::Uint(3));
        Checker::new(&mut program).visit_expr(&mut expr).unwrap();
        assert_eq!(expr.ty(), Some(&Type::Uint));
    }

    #[test]
    fn variables_type_as_implicit_references() {
        let mut program = Program::new();
        let mut expr = var("x", Type::Float);
        Checker::new(&mut program).visit_expr(&mut expr).unwrap();
        assert_eq!(
            expr.ty(),
            Some(&Type::ImplicitRef(Box::new(Type::Float)))
        );
    }

    #[test]
    fn comma_takes_the_last_operand_type() {
        let mut program = Program::new();
        let mut expr = Expr::Comma(CommaExpr {
            list: vec![lit(LiteralKind::Int(1)), lit(LiteralKind::Bool(true))],
            ty: None,
            span: Span::default(),
        });
        Checker::new(&mut program).visit_expr(&mut expr).unwrap();
        assert_eq!(expr.ty(), Some(&Type::Bool));
    }

    #[test]
    fn call_in_function_body_resolves() {
        let mut program = Program::new();
        program.add_function(FuncDecl::user(
            "double_it",
            vec![Param::new("x", Type::Int)],
            Type::Int,
            vec![],
            Span::default(),
        ));

        let call = Expr::Call(CallExpr::new(
            "double_it",
            vec![lit(LiteralKind::Int(21))],
            Span::default(),
        ));
        let mut funcs = vec![user_func("main", Type::Void, vec![expr_stmt(call)])];
        let errors = check_functions(&mut funcs, &mut program);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");

        let Stmt::Expr(stmt) = &funcs[0].body_stmts()[0] else {
            unreachable!()
        };
        let Expr::Call(resolved) = &stmt.expr else {
            unreachable!()
        };
        assert!(resolved.is_resolved());
        assert_eq!(resolved.ty, Some(Type::Int));
    }

    #[test]
    fn errors_are_collected_per_declaration() {
        let mut program = Program::new();
        // Two bad functions, one good; the pass reports both failures and
        // still checks the good one.
        let bad_call = |name: &str| {
            user_func(
                name,
                Type::Void,
                vec![expr_stmt(Expr::Call(CallExpr::new(
                    "missing",
                    vec![],
                    Span::default(),
                )))],
            )
        };
        let good = user_func(
            "good",
            Type::Void,
            vec![expr_stmt(lit(LiteralKind::Int(1)))],
        );
        let mut funcs = vec![bad_call("first"), good, bad_call("second")];

        let errors = check_functions(&mut funcs, &mut program);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, TypeError::NoMatchingOverload { .. })));
        // The good function's literal was still typed.
        let Stmt::Expr(stmt) = &funcs[1].body_stmts()[0] else {
            unreachable!()
        };
        assert_eq!(stmt.expr.ty(), Some(&Type::Int));
    }

    #[test]
    fn var_decl_initializer_must_match() {
        let mut program = Program::new();
        let mut funcs = vec![user_func(
            "main",
            Type::Void,
            vec![Stmt::VarDecl(VarDeclStmt {
                name: "x".to_string(),
                declared: Type::Int,
                init: Some(lit(LiteralKind::Bool(true))),
                span: Span::new(4, 1, 1),
            })],
        )];
        let errors = check_functions(&mut funcs, &mut program);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TypeError::TypeMismatch { .. }));
    }

    #[test]
    fn return_type_must_match() {
        let mut program = Program::new();
        let mut funcs = vec![user_func(
            "answer",
            Type::Int,
            vec![Stmt::Return(ReturnStmt {
                value: Some(lit(LiteralKind::Float(1.0))),
                span: Span::default(),
            })],
        )];
        let errors = check_functions(&mut funcs, &mut program);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TypeError::TypeMismatch { .. }));
    }

    #[test]
    fn lvalue_arguments_resolve_through_unwrap() {
        let mut program = Program::new();
        program.add_function(FuncDecl::user(
            "inc",
            vec![Param::new("x", Type::Uint)],
            Type::Uint,
            vec![],
            Span::default(),
        ));

        let call = Expr::Call(CallExpr::new(
            "inc",
            vec![var("counter", Type::Uint)],
            Span::default(),
        ));
        let mut funcs = vec![user_func("main", Type::Void, vec![expr_stmt(call)])];
        let errors = check_functions(&mut funcs, &mut program);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }
}
