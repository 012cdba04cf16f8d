//! Function declarations.
//!
//! A [`FuncDecl`] is either user-defined (a statement body checked by the
//! semantic pass) or native (a closure attached at synthesis or builtin
//! registration time). Identity is structural: name plus parameter types,
//! folded into a [`TypeHash`].

use crate::ast::Stmt;
use crate::{NativeImpl, Span, Type, TypeHash};

/// One function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter name.
    pub name: String,
    /// The declared type, possibly containing type variables.
    pub ty: Type,
}

impl Param {
    /// Construct a parameter.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// The body of a function: user statements or a native closure.
#[derive(Debug, Clone)]
pub enum FuncBody {
    /// A user-defined body of statements.
    User(Vec<Stmt>),
    /// A built-in or synthesized implementation.
    Native(NativeImpl),
}

/// A function declaration.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// The function name (may be an operator name for intrinsics).
    pub name: String,
    /// Names of the signature's type variables, in declaration order.
    pub type_params: Vec<String>,
    /// Ordered parameter list.
    pub params: Vec<Param>,
    /// Declared return type, possibly containing type variables.
    pub return_type: Type,
    /// The body.
    pub body: FuncBody,
    /// Where the function was declared; synthesized functions reuse the
    /// call site that first demanded them.
    pub span: Span,
}

impl FuncDecl {
    /// Construct a user-defined function.
    pub fn user(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        stmts: Vec<Stmt>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            body: FuncBody::User(stmts),
            span,
        }
    }

    /// Construct a native function.
    pub fn native(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        implementation: NativeImpl,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            body: FuncBody::Native(implementation),
            span,
        }
    }

    /// Attach generic type parameters.
    pub fn with_type_params(mut self, type_params: Vec<String>) -> Self {
        self.type_params = type_params;
        self
    }

    /// The user body's statements; empty for native functions.
    pub fn body_stmts(&self) -> &[Stmt] {
        match &self.body {
            FuncBody::User(stmts) => stmts,
            FuncBody::Native(_) => &[],
        }
    }

    /// Whether this function carries a native implementation.
    pub fn is_native(&self) -> bool {
        matches!(self.body, FuncBody::Native(_))
    }

    /// The native implementation, if any.
    pub fn native_impl(&self) -> Option<&NativeImpl> {
        match &self.body {
            FuncBody::Native(imp) => Some(imp),
            FuncBody::User(_) => None,
        }
    }

    /// Structural identity: hash over name and parameter types.
    pub fn func_hash(&self) -> TypeHash {
        let param_hashes: Vec<TypeHash> = self.params.iter().map(|p| p.ty.type_hash()).collect();
        TypeHash::from_function(&self.name, &param_hashes)
    }

    /// Printed signature for diagnostics, e.g. `bool f(int,float)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.ty.to_string()).collect();
        if self.type_params.is_empty() {
            format!("{} {}({})", self.return_type, self.name, params.join(","))
        } else {
            format!(
                "{} {}<{}>({})",
                self.return_type,
                self.name,
                self.type_params.join(","),
                params.join(",")
            )
        }
    }
}
