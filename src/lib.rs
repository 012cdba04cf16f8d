//! Call-expression resolution for a statically typed shading language.
//!
//! This facade re-exports the two layers of the system:
//!
//! * [`core`] holds the data model: types, the AST, function declarations,
//!   the program's function table, and the traversal framework.
//! * [`checker`] holds the semantic pass: the checker itself, the call
//!   resolver, overload selection, unification, and intrinsic synthesis.
//!
//! The common entry point is [`checker::check_functions`], which registers
//! a unit's declarations and types every expression in their bodies,
//! binding each call to a function in the program table.
//!
//! ```
//! use shade::core::ast::{CallExpr, Expr, ExprStmt, LiteralExpr, LiteralKind, Stmt};
//! use shade::core::{FuncDecl, Param, Program, Span, Type};
//! use shade::checker::check_functions;
//!
//! let mut program = Program::new();
//! program.add_function(FuncDecl::user(
//!     "square",
//!     vec![Param::new("x", Type::Int)],
//!     Type::Int,
//!     vec![],
//!     Span::default(),
//! ));
//!
//! let call = Expr::Call(CallExpr::new(
//!     "square",
//!     vec![Expr::Literal(LiteralExpr {
//!         kind: LiteralKind::Int(7),
//!         ty: None,
//!         span: Span::default(),
//!     })],
//!     Span::default(),
//! ));
//! let mut funcs = vec![FuncDecl::user(
//!     "main",
//!     vec![],
//!     Type::Void,
//!     vec![Stmt::Expr(ExprStmt { expr: call, span: Span::default() })],
//!     Span::default(),
//! )];
//!
//! let errors = check_functions(&mut funcs, &mut program);
//! assert!(errors.is_empty());
//! ```

pub use shade_checker as checker;
pub use shade_core as core;

pub use shade_checker::{check_functions, Checker};
pub use shade_core::{Program, TrapError, Type, TypeError};
