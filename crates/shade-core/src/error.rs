//! Error types for semantic analysis and native execution.
//!
//! Two separate families:
//!
//! - [`TypeError`]: compile-time failures raised during call resolution.
//!   These are terminal for the call expression that raised them; the pass
//!   driver collects them and keeps checking sibling declarations.
//! - [`TrapError`]: runtime failures raised by the native implementations
//!   of synthesized intrinsics (null dereference, out-of-bounds index).
//!
//! Internal invariant violations (a call reaching later stages unresolved,
//! a resolved-type slot written twice) are assertions, not error values.

use thiserror::Error;

use crate::Span;

/// Why a specific overload candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Candidate parameter count differs from the call's argument count.
    #[error("expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Number of parameters the candidate declares.
        expected: usize,
        /// Number of arguments at the call site.
        got: usize,
    },

    /// A parameter failed to unify with the concrete argument type.
    #[error("parameter {index} expects '{expected}', got '{got}'")]
    ParameterMismatch {
        /// Zero-based parameter position.
        index: usize,
        /// The candidate's declared parameter type.
        expected: String,
        /// The concrete argument type at the call site.
        got: String,
    },

    /// The same type variable would bind to two different concrete types.
    #[error("type variable '{var}' bound to both '{first}' and '{second}'")]
    InconsistentBinding {
        /// The type variable's name.
        var: String,
        /// The first binding.
        first: String,
        /// The conflicting binding.
        second: String,
    },

    /// The candidate's return type failed to unify with an explicit cast
    /// target.
    #[error("return type '{declared}' does not match cast target '{target}'")]
    ReturnMismatch {
        /// The candidate's declared return type.
        declared: String,
        /// The cast's target type.
        target: String,
    },

    /// The return type still contains a type variable the arguments never
    /// bound.
    #[error("return type variable '{var}' is not bound by any argument")]
    UnboundReturnVariable {
        /// The unbound variable's name.
        var: String,
    },
}

/// One rejected candidate, with its printed signature and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
    /// The candidate's printed signature.
    pub signature: String,
    /// Why it was rejected.
    pub reason: RejectReason,
}

impl std::fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "candidate '{}': {}", self.signature, self.reason)
    }
}

/// Render an aggregated rejection list for a diagnostic message.
fn render_failures(failures: &[CandidateFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for failure in failures {
        out.push_str("\n  ");
        out.push_str(&failure.to_string());
    }
    out
}

/// Errors raised while resolving call expressions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// No candidate (declared or synthesized) unified with the call.
    ///
    /// Carries one rejection reason per considered candidate, zero when the
    /// overload set was empty.
    #[error("at {span}: no matching overload for '{name}({args})'{}", render_failures(reasons))]
    NoMatchingOverload {
        /// The name being called.
        name: String,
        /// The concrete argument types, comma-separated.
        args: String,
        /// Per-candidate rejection reasons, in declaration order.
        reasons: Vec<CandidateFailure>,
        /// Where the call occurred.
        span: Span,
    },

    /// A lone candidate matched except for an inconsistently bound type
    /// variable across parameter positions.
    #[error(
        "at {span}: ambiguous binding in call to '{name}': type variable '{var}' bound to both '{first}' and '{second}'"
    )]
    AmbiguousBinding {
        /// The name being called.
        name: String,
        /// The type variable's name.
        var: String,
        /// The first binding.
        first: String,
        /// The conflicting binding.
        second: String,
        /// Where the call occurred.
        span: Span,
    },

    /// An intrinsic operator was invoked with the wrong argument shape.
    ///
    /// More specific than [`TypeError::NoMatchingOverload`]: the name is a
    /// known intrinsic, but its operand precondition was violated.
    #[error("at {span}: invalid operands to '{operator}': {message}")]
    InvalidIntrinsicOperand {
        /// The intrinsic operator name.
        operator: String,
        /// What was wrong with the operand shape.
        message: String,
        /// Where the call occurred.
        span: Span,
    },

    /// An explicit cast's target type unified with no candidate's return
    /// type.
    #[error("at {span}: cannot cast '{name}({args})' to '{target}'{}", render_failures(reasons))]
    CastTypeMismatch {
        /// The name being called.
        name: String,
        /// The concrete argument types, comma-separated.
        args: String,
        /// The cast's target type.
        target: String,
        /// Per-candidate rejection reasons, in declaration order.
        reasons: Vec<CandidateFailure>,
        /// Where the call occurred.
        span: Span,
    },

    /// A type mismatch outside of call resolution (initializers, returns).
    #[error("at {span}: {message}")]
    TypeMismatch {
        /// Description of the mismatch.
        message: String,
        /// Where the mismatch occurred.
        span: Span,
    },

    /// Internal invariant violation surfaced as an error rather than a
    /// panic, for the few places a caller can plausibly recover.
    #[error("internal error: {message}")]
    Internal {
        /// The error message.
        message: String,
    },
}

impl TypeError {
    /// The source location this error points at, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            TypeError::NoMatchingOverload { span, .. }
            | TypeError::AmbiguousBinding { span, .. }
            | TypeError::InvalidIntrinsicOperand { span, .. }
            | TypeError::CastTypeMismatch { span, .. }
            | TypeError::TypeMismatch { span, .. } => Some(*span),
            TypeError::Internal { .. } => None,
        }
    }
}

/// Runtime traps raised by native intrinsic implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrapError {
    /// Indexing through a null array reference.
    #[error("at {span}: null dereference")]
    NullDereference {
        /// Where the faulting call was resolved.
        span: Span,
    },

    /// Index outside the array reference's bound.
    #[error("at {span}: array index {index} is out of bounds of length {length}")]
    OutOfBounds {
        /// The runtime index value.
        index: u32,
        /// The reference's bound.
        length: u32,
        /// Where the faulting call was resolved.
        span: Span,
    },

    /// A native implementation received a value of the wrong kind.
    ///
    /// This indicates a mismatch between resolution and execution and is a
    /// caller bug, but native closures cannot panic across the host boundary.
    #[error("at {span}: invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong.
        message: String,
        /// Where the faulting call was resolved.
        span: Span,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matching_overload_lists_every_candidate() {
        let err = TypeError::NoMatchingOverload {
            name: "f".to_string(),
            args: "int, float".to_string(),
            reasons: vec![
                CandidateFailure {
                    signature: "f(int)".to_string(),
                    reason: RejectReason::ArityMismatch {
                        expected: 1,
                        got: 2,
                    },
                },
                CandidateFailure {
                    signature: "f(int,int)".to_string(),
                    reason: RejectReason::ParameterMismatch {
                        index: 1,
                        expected: "int".to_string(),
                        got: "float".to_string(),
                    },
                },
            ],
            span: Span::new(3, 7, 1),
        };
        let text = err.to_string();
        assert!(text.starts_with("at 3:7: no matching overload for 'f(int, float)'"));
        assert!(text.contains("candidate 'f(int)': expects 1 argument(s), got 2"));
        assert!(text.contains("candidate 'f(int,int)': parameter 1 expects 'int', got 'float'"));
    }

    #[test]
    fn empty_overload_set_renders_bare() {
        let err = TypeError::NoMatchingOverload {
            name: "g".to_string(),
            args: "uint".to_string(),
            reasons: vec![],
            span: Span::new(1, 1, 1),
        };
        assert_eq!(err.to_string(), "at 1:1: no matching overload for 'g(uint)'");
    }

    #[test]
    fn trap_error_messages() {
        let trap = TrapError::OutOfBounds {
            index: 9,
            length: 5,
            span: Span::new(2, 4, 1),
        };
        assert_eq!(
            trap.to_string(),
            "at 2:4: array index 9 is out of bounds of length 5"
        );
    }
}
