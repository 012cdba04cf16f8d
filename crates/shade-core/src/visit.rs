//! The traversal framework for semantic passes.
//!
//! [`VisitMut`] exposes one method per node kind. Every method defaults to
//! the matching `walk_*` function, which visits exactly that node's children
//! in a fixed order; concrete passes override only the kinds they care
//! about and call back into `walk_*` (or the child dispatch methods) rather
//! than re-implementing traversal. Adding a node kind means touching this
//! module once, not every pass.
//!
//! The framework holds no state and never swallows errors: a failing
//! semantic action propagates straight up through the `visit_*` stack.

use crate::ast::{
    BlockStmt, CallExpr, CommaExpr, Expr, ExprStmt, LiteralExpr, ReturnStmt, Stmt, VarDeclStmt,
    VariableExpr,
};
use crate::func::{FuncBody, FuncDecl};
use crate::TypeError;

/// Mutable AST visitor with default traversal.
pub trait VisitMut {
    /// Dispatch on an expression's kind.
    fn visit_expr(&mut self, expr: &mut Expr) -> Result<(), TypeError> {
        walk_expr(self, expr)
    }

    /// Visit a literal. Leaf by default.
    fn visit_literal(&mut self, expr: &mut LiteralExpr) -> Result<(), TypeError> {
        let _ = expr;
        Ok(())
    }

    /// Visit a variable reference. Leaf by default.
    fn visit_variable(&mut self, expr: &mut VariableExpr) -> Result<(), TypeError> {
        let _ = expr;
        Ok(())
    }

    /// Visit a call expression.
    fn visit_call(&mut self, expr: &mut CallExpr) -> Result<(), TypeError> {
        walk_call(self, expr)
    }

    /// Visit a comma sequence.
    fn visit_comma(&mut self, expr: &mut CommaExpr) -> Result<(), TypeError> {
        walk_comma(self, expr)
    }

    /// Dispatch on a statement's kind.
    fn visit_stmt(&mut self, stmt: &mut Stmt) -> Result<(), TypeError> {
        walk_stmt(self, stmt)
    }

    /// Visit a block.
    fn visit_block(&mut self, stmt: &mut BlockStmt) -> Result<(), TypeError> {
        walk_block(self, stmt)
    }

    /// Visit an expression statement.
    fn visit_expr_stmt(&mut self, stmt: &mut ExprStmt) -> Result<(), TypeError> {
        walk_expr_stmt(self, stmt)
    }

    /// Visit a variable declaration.
    fn visit_var_decl(&mut self, stmt: &mut VarDeclStmt) -> Result<(), TypeError> {
        walk_var_decl(self, stmt)
    }

    /// Visit a return statement.
    fn visit_return(&mut self, stmt: &mut ReturnStmt) -> Result<(), TypeError> {
        walk_return(self, stmt)
    }

    /// Visit a function declaration.
    fn visit_func(&mut self, func: &mut FuncDecl) -> Result<(), TypeError> {
        walk_func(self, func)
    }
}

/// Dispatch an expression to its kind's visit method.
pub fn walk_expr<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) -> Result<(), TypeError> {
    match expr {
        Expr::Literal(e) => v.visit_literal(e),
        Expr::Variable(e) => v.visit_variable(e),
        Expr::Call(e) => v.visit_call(e),
        Expr::Comma(e) => v.visit_comma(e),
    }
}

/// Walk a call's children: arguments in order. Type arguments and the cast
/// target are types, not nodes; they are read by the pass, not traversed.
pub fn walk_call<V: VisitMut + ?Sized>(v: &mut V, expr: &mut CallExpr) -> Result<(), TypeError> {
    for arg in &mut expr.arguments {
        v.visit_expr(arg)?;
    }
    Ok(())
}

/// Walk a comma sequence's children in evaluation order.
pub fn walk_comma<V: VisitMut + ?Sized>(v: &mut V, expr: &mut CommaExpr) -> Result<(), TypeError> {
    for item in &mut expr.list {
        v.visit_expr(item)?;
    }
    Ok(())
}

/// Dispatch a statement to its kind's visit method.
pub fn walk_stmt<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) -> Result<(), TypeError> {
    match stmt {
        Stmt::Block(s) => v.visit_block(s),
        Stmt::Expr(s) => v.visit_expr_stmt(s),
        Stmt::VarDecl(s) => v.visit_var_decl(s),
        Stmt::Return(s) => v.visit_return(s),
    }
}

/// Walk a block's statements in order.
pub fn walk_block<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut BlockStmt) -> Result<(), TypeError> {
    for s in &mut stmt.stmts {
        v.visit_stmt(s)?;
    }
    Ok(())
}

/// Walk an expression statement's expression.
pub fn walk_expr_stmt<V: VisitMut + ?Sized>(
    v: &mut V,
    stmt: &mut ExprStmt,
) -> Result<(), TypeError> {
    v.visit_expr(&mut stmt.expr)
}

/// Walk a variable declaration's initializer, if present.
pub fn walk_var_decl<V: VisitMut + ?Sized>(
    v: &mut V,
    stmt: &mut VarDeclStmt,
) -> Result<(), TypeError> {
    if let Some(init) = &mut stmt.init {
        v.visit_expr(init)?;
    }
    Ok(())
}

/// Walk a return statement's value, if present.
pub fn walk_return<V: VisitMut + ?Sized>(
    v: &mut V,
    stmt: &mut ReturnStmt,
) -> Result<(), TypeError> {
    if let Some(value) = &mut stmt.value {
        v.visit_expr(value)?;
    }
    Ok(())
}

/// Walk a user function's body statements; native bodies have no children.
pub fn walk_func<V: VisitMut + ?Sized>(v: &mut V, func: &mut FuncDecl) -> Result<(), TypeError> {
    if let FuncBody::User(stmts) = &mut func.body {
        for s in stmts {
            v.visit_stmt(s)?;
        }
    }
    Ok(())
}
