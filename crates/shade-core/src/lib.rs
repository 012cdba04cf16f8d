//! Core data model for the shading-language front end.
//!
//! This crate holds everything the semantic pass operates on: source spans,
//! the structural type model, deterministic identity hashes, the AST and
//! its traversal framework, function declarations, the program-wide
//! function table, and the runtime value plumbing native implementations
//! use. The resolution and synthesis logic lives in `shade-checker`.

pub mod ast;
mod error;
mod func;
mod native_fn;
mod program;
mod span;
mod type_hash;
mod types;
mod value;
pub mod visit;

pub use error::{CandidateFailure, RejectReason, TrapError, TypeError};
pub use func::{FuncBody, FuncDecl, Param};
pub use native_fn::{NativeCallable, NativeImpl};
pub use program::Program;
pub use span::Span;
pub use type_hash::TypeHash;
pub use types::{AddressSpace, Type, TypeFlags};
pub use value::{Address, ArrayRefValue, Memory, Value};
