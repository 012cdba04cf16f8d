//! Semantic analysis for the shading language: the checking pass, call
//! resolution, overload selection, and native intrinsic synthesis.
//!
//! The public surface is [`Checker`] and [`check_functions`] for whole-unit
//! analysis, with the lower layers ([`resolve_call`], [`resolve_overload`],
//! the unifier and the intrinsic synthesizer) exposed for embedders that
//! drive resolution directly.

mod checker;
mod intrinsics;
mod overload;
mod resolver;
mod type_ref;
mod unify;

pub use checker::{check_functions, register_functions, Checker};
pub use intrinsics::{
    is_intrinsic_name, synthesize, OPERATOR_EQUALS, OPERATOR_INDEX, OPERATOR_LENGTH,
};
pub use overload::{resolve_overload, OverloadMatch};
pub use resolver::resolve_call;
pub use type_ref::TypeRef;
pub use unify::{substitute, unify, Bindings, UnifyError};
