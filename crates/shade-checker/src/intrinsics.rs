//! On-demand synthesis of native operator functions.
//!
//! Indexing (`operator&[]`), length query (`operator.length`), and
//! reference equality (`operator==`) cannot be declared in user-level
//! syntax over every type they apply to. When ordinary overload resolution
//! finds no candidate for one of these names, the synthesizer manufactures
//! a concrete declaration for the argument types at hand, with a native
//! implementation attached.
//!
//! Each operator checks its own operand-shape precondition and reports a
//! violation as [`TypeError::InvalidIntrinsicOperand`], which is more
//! actionable than a generic no-overload failure. Memoization of the
//! synthesized declarations lives in the program's function table; this
//! module only builds them.

use shade_core::{
    AddressSpace, FuncDecl, NativeImpl, Param, Span, TrapError, Type, TypeError, Value,
};

/// Indexing-address-of operator name.
pub const OPERATOR_INDEX: &str = "operator&[]";
/// Length-query operator name.
pub const OPERATOR_LENGTH: &str = "operator.length";
/// Equality operator name.
pub const OPERATOR_EQUALS: &str = "operator==";

/// Whether a call name belongs to the closed intrinsic-operator set.
pub fn is_intrinsic_name(name: &str) -> bool {
    matches!(name, OPERATOR_INDEX | OPERATOR_LENGTH | OPERATOR_EQUALS)
}

/// Synthesize a native function for an intrinsic operator over concrete
/// argument types.
///
/// The span is the call site demanding the synthesis; it becomes the
/// declaration's origin and feeds trap messages.
pub fn synthesize(name: &str, arg_types: &[Type], span: Span) -> Result<FuncDecl, TypeError> {
    match name {
        OPERATOR_INDEX => synthesize_index(arg_types, span),
        OPERATOR_LENGTH => synthesize_length(arg_types, span),
        OPERATOR_EQUALS => synthesize_equals(arg_types, span),
        _ => panic!("'{name}' is not an intrinsic operator"),
    }
}

fn shape_error(operator: &str, message: impl Into<String>, span: Span) -> TypeError {
    TypeError::InvalidIntrinsicOperand {
        operator: operator.to_string(),
        message: message.into(),
        span,
    }
}

/// `T* space operator&[](T[] space, uint)`: compute the address of an
/// element through a bounded array reference.
fn synthesize_index(arg_types: &[Type], span: Span) -> Result<FuncDecl, TypeError> {
    if arg_types.len() != 2 {
        return Err(shape_error(
            OPERATOR_INDEX,
            format!("expected 2 operands, got {}", arg_types.len()),
            span,
        ));
    }
    let (space, elem) = match &arg_types[0] {
        Type::ArrayRef { space, elem } => (*space, elem.as_ref().clone()),
        other => {
            return Err(shape_error(
                OPERATOR_INDEX,
                format!("'{other}' is not an array reference"),
                span,
            ));
        }
    };
    if arg_types[1] != Type::Uint {
        return Err(shape_error(
            OPERATOR_INDEX,
            format!("index must be 'uint', got '{}'", arg_types[1]),
            span,
        ));
    }

    let elem_size = elem.size();
    let implementation = NativeImpl::new(move |args, memory, call_span| {
        let reference = args[0].as_array_ref().ok_or_else(|| bad_value(call_span))?;
        let Some(reference) = reference else {
            return Err(TrapError::NullDereference { span: call_span });
        };
        let index = args[1].as_uint().ok_or_else(|| bad_value(call_span))?;
        if index >= reference.length {
            return Err(TrapError::OutOfBounds {
                index,
                length: reference.length,
                span: call_span,
            });
        }
        let address = memory.element_address(space, reference.base, index, elem_size);
        Ok(Value::Ptr(Some(address)))
    });

    Ok(FuncDecl::native(
        OPERATOR_INDEX,
        vec![
            Param::new("ref", arg_types[0].clone()),
            Param::new("index", Type::Uint),
        ],
        Type::ptr(space, elem),
        implementation,
        span,
    ))
}

/// `uint operator.length(x)`: compile-time constant for fixed-size arrays,
/// runtime bound lookup for array references. A null array reference has
/// length zero rather than trapping.
fn synthesize_length(arg_types: &[Type], span: Span) -> Result<FuncDecl, TypeError> {
    if arg_types.len() != 1 {
        return Err(shape_error(
            OPERATOR_LENGTH,
            format!("expected 1 operand, got {}", arg_types.len()),
            span,
        ));
    }
    let implementation = match &arg_types[0] {
        Type::Array { len, .. } => {
            // Static length: the closure ignores its runtime argument.
            let len = *len;
            NativeImpl::new(move |_args, _memory, _call_span| Ok(Value::Uint(len)))
        }
        Type::ArrayRef { space, .. } => {
            let space = *space;
            NativeImpl::new(move |args, memory, call_span| {
                let reference = args[0].as_array_ref().ok_or_else(|| bad_value(call_span))?;
                match reference {
                    None => Ok(Value::Uint(0)),
                    Some(reference) => Ok(Value::Uint(memory.length_of(space, reference.base))),
                }
            })
        }
        other => {
            return Err(shape_error(
                OPERATOR_LENGTH,
                format!("'{other}' has no length"),
                span,
            ));
        }
    };

    Ok(FuncDecl::native(
        OPERATOR_LENGTH,
        vec![Param::new("x", arg_types[0].clone())],
        Type::Uint,
        implementation,
        span,
    ))
}

/// Pointer type both-null equality falls back to; arbitrary but fixed,
/// since no further type information is observable.
fn default_null_type() -> Type {
    Type::ptr(AddressSpace::Thread, Type::Int)
}

/// `bool operator==(ref, ref)`: reference/null equality.
///
/// Each side must be a reference shape or the null literal. Two concrete
/// reference types must be the same type; a null side takes the other
/// side's type.
fn synthesize_equals(arg_types: &[Type], span: Span) -> Result<FuncDecl, TypeError> {
    if arg_types.len() != 2 {
        return Err(shape_error(
            OPERATOR_EQUALS,
            format!("expected 2 operands, got {}", arg_types.len()),
            span,
        ));
    }
    for ty in arg_types {
        if !ty.is_reference() && *ty != Type::Null {
            return Err(shape_error(
                OPERATOR_EQUALS,
                format!("'{ty}' is neither a reference type nor null"),
                span,
            ));
        }
    }
    let unified = match (&arg_types[0], &arg_types[1]) {
        (Type::Null, Type::Null) => default_null_type(),
        (Type::Null, concrete) => concrete.clone(),
        (concrete, Type::Null) => concrete.clone(),
        (left, right) if left == right => left.clone(),
        (left, right) => {
            return Err(shape_error(
                OPERATOR_EQUALS,
                format!("mismatched reference types '{left}' and '{right}'"),
                span,
            ));
        }
    };

    let implementation = NativeImpl::new(move |args, _memory, call_span| {
        // "No address" on both sides is true null equality.
        match (&args[0], &args[1]) {
            (Value::Ptr(a), Value::Ptr(b)) => Ok(Value::Bool(a == b)),
            (Value::ArrayRef(a), Value::ArrayRef(b)) => {
                Ok(Value::Bool(a.map(|r| r.base) == b.map(|r| r.base)))
            }
            _ => Err(bad_value(call_span)),
        }
    });

    Ok(FuncDecl::native(
        OPERATOR_EQUALS,
        vec![
            Param::new("left", unified.clone()),
            Param::new("right", unified),
        ],
        Type::Bool,
        implementation,
        span,
    ))
}

fn bad_value(span: Span) -> TrapError {
    TrapError::InvalidArgument {
        message: "value does not match the synthesized signature".to_string(),
        span,
    }
}
