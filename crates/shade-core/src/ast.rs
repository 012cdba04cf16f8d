//! Expression and statement AST nodes.
//!
//! Nodes arrive from an external parser with spans attached and type slots
//! empty. Semantic analysis fills each expression's `ty` slot exactly once;
//! a second write is a programmer error and asserts. After resolution a
//! [`CallExpr`] additionally holds the [`TypeHash`] of the function it
//! resolved to: a back-reference into the program's function table, never
//! used to mutate the function.

use crate::{Span, Type, TypeHash};

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(LiteralExpr),
    /// Variable reference, already bound to its declared type by name
    /// resolution
    Variable(VariableExpr),
    /// Function call (also covers operator and cast syntax)
    Call(CallExpr),
    /// Comma sequence; the value is the last expression's
    Comma(CommaExpr),
}

impl Expr {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Variable(e) => e.span,
            Self::Call(e) => e.span,
            Self::Comma(e) => e.span,
        }
    }

    /// The resolved type, if analysis has reached this node.
    pub fn ty(&self) -> Option<&Type> {
        match self {
            Self::Literal(e) => e.ty.as_ref(),
            Self::Variable(e) => e.ty.as_ref(),
            Self::Call(e) => e.ty.as_ref(),
            Self::Comma(e) => e.ty.as_ref(),
        }
    }

    /// Fill the resolved-type slot. Asserts that it was empty.
    pub fn set_ty(&mut self, ty: Type) {
        let slot = match self {
            Self::Literal(e) => &mut e.ty,
            Self::Variable(e) => &mut e.ty,
            Self::Call(e) => &mut e.ty,
            Self::Comma(e) => &mut e.ty,
        };
        assert!(slot.is_none(), "expression type resolved twice");
        *slot = Some(ty);
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    /// The literal kind
    pub kind: LiteralKind,
    /// Resolved type slot
    pub ty: Option<Type>,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind {
    /// Integer literal
    Int(i32),
    /// Unsigned integer literal
    Uint(u32),
    /// Boolean literal
    Bool(bool),
    /// Float literal
    Float(f32),
    /// Double literal
    Double(f64),
    /// Null literal
    Null,
}

/// A variable reference.
///
/// Scope lookup happens outside this core; the parser/name-resolver hands
/// us the declared type directly.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    /// The variable name
    pub name: String,
    /// The declared type, supplied by name resolution
    pub declared: Type,
    /// Resolved type slot
    pub ty: Option<Type>,
    /// Source location
    pub span: Span,
}

/// A function call.
///
/// State machine: Unresolved -> Resolved, or Unresolved -> Failed(terminal).
/// Resolution is attempted exactly once per node; `func` and `ty` are either
/// both set (Resolved) or both empty forever (the error aborted analysis of
/// the enclosing declaration).
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// The name being called
    pub name: String,
    /// Explicit type arguments, if any
    pub type_arguments: Vec<Type>,
    /// Arguments, in order
    pub arguments: Vec<Expr>,
    /// Explicit cast target type, for cast syntax
    pub cast_return: Option<Type>,
    /// The resolved function, by table hash
    pub func: Option<TypeHash>,
    /// Resolved type slot
    pub ty: Option<Type>,
    /// Source location
    pub span: Span,
}

impl CallExpr {
    /// Construct an unresolved call.
    pub fn new(name: impl Into<String>, arguments: Vec<Expr>, span: Span) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
            arguments,
            cast_return: None,
            func: None,
            ty: None,
            span,
        }
    }

    /// Whether resolution has completed on this node.
    pub fn is_resolved(&self) -> bool {
        self.func.is_some()
    }

    /// Record the outcome of resolution. Asserts the node was unresolved.
    pub fn resolve_to(&mut self, func: TypeHash, result: Type) {
        assert!(
            self.func.is_none() && self.ty.is_none(),
            "call expression resolved twice"
        );
        self.func = Some(func);
        self.ty = Some(result);
    }
}

/// A comma sequence expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CommaExpr {
    /// The expressions, in evaluation order; never empty
    pub list: Vec<Expr>,
    /// Resolved type slot
    pub ty: Option<Type>,
    /// Source location
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Braced statement list
    Block(BlockStmt),
    /// Expression statement
    Expr(ExprStmt),
    /// Local variable declaration
    VarDecl(VarDeclStmt),
    /// Return statement
    Return(ReturnStmt),
}

impl Stmt {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Block(s) => s.span,
            Self::Expr(s) => s.span,
            Self::VarDecl(s) => s.span,
            Self::Return(s) => s.span,
        }
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    /// The statements, in order
    pub stmts: Vec<Stmt>,
    /// Source location
    pub span: Span,
}

/// An expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    /// The expression
    pub expr: Expr,
    /// Source location
    pub span: Span,
}

/// A local variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    /// The variable name
    pub name: String,
    /// The declared type
    pub declared: Type,
    /// Optional initializer
    pub init: Option<Expr>,
    /// Source location
    pub span: Span,
}

/// A return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// The returned value, if any
    pub value: Option<Expr>,
    /// Source location
    pub span: Span,
}
