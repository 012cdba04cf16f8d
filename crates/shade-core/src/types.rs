//! The shading-language type model.
//!
//! Types here are fully structural: two `array<int,5>` values built in
//! different places compare equal, and [`Type::type_hash`] hashes the
//! canonical printed form so structural equality and hash identity agree.
//!
//! The model is deliberately closed. Scalars, fixed-size arrays, array
//! references (a base address plus a bound, tagged with an address space),
//! pointers, the null literal's type, unbound type variables from generic
//! signatures, and the implicit-reference wrapper the type-reference layer
//! uses for lvalues.

use std::fmt::{self, Display, Formatter};

use bitflags::bitflags;

use crate::TypeHash;

/// Memory region tag carried by pointers and array references.
///
/// Indexing and length intrinsics synthesize per-address-space
/// implementations, so the space is part of the type, not a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    /// Function-local memory.
    Thread,
    /// Workgroup-shared memory.
    Threadgroup,
    /// Device-visible buffers.
    Device,
    /// Read-only constant memory.
    Constant,
}

impl Display for AddressSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpace::Thread => write!(f, "thread"),
            AddressSpace::Threadgroup => write!(f, "threadgroup"),
            AddressSpace::Device => write!(f, "device"),
            AddressSpace::Constant => write!(f, "constant"),
        }
    }
}

bitflags! {
    /// Predicate flags for scalar types.
    ///
    /// These answer the questions resolution and synthesis ask of a scalar:
    /// is it primitive, is it integral, is it signed, is it numeric at all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeFlags: u8 {
        const PRIMITIVE = 1 << 0;
        const INT       = 1 << 1;
        const SIGNED    = 1 << 2;
        const NUMBER    = 1 << 3;
    }
}

/// A shading-language type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// The unit type of statements and procedures.
    Void,
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 32-bit unsigned integer.
    Uint,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Fixed-size array with a static length.
    Array {
        /// Element type.
        elem: Box<Type>,
        /// Static element count.
        len: u32,
    },
    /// Bounded array reference: base address plus runtime length.
    ArrayRef {
        /// Memory region of the referenced storage.
        space: AddressSpace,
        /// Element type.
        elem: Box<Type>,
    },
    /// Pointer into an address space.
    Ptr {
        /// Memory region the pointer targets.
        space: AddressSpace,
        /// Pointee type.
        elem: Box<Type>,
    },
    /// The type of the `null` literal before it unifies with a pointer type.
    Null,
    /// An unbound type variable from a generic signature.
    Var(String),
    /// A value held through an implicit reference (an lvalue).
    ///
    /// Never nested; the type-reference layer collapses on wrap.
    ImplicitRef(Box<Type>),
}

impl Type {
    /// Convenience constructor for pointer types.
    pub fn ptr(space: AddressSpace, elem: Type) -> Type {
        Type::Ptr {
            space,
            elem: Box::new(elem),
        }
    }

    /// Convenience constructor for array-reference types.
    pub fn array_ref(space: AddressSpace, elem: Type) -> Type {
        Type::ArrayRef {
            space,
            elem: Box::new(elem),
        }
    }

    /// Convenience constructor for fixed-size array types.
    pub fn array(elem: Type, len: u32) -> Type {
        Type::Array {
            elem: Box::new(elem),
            len,
        }
    }

    /// Convenience constructor for type variables.
    pub fn var(name: impl Into<String>) -> Type {
        Type::Var(name.into())
    }

    /// Predicate flags for this type. Non-scalars carry no flags.
    pub fn flags(&self) -> TypeFlags {
        match self {
            Type::Bool => TypeFlags::PRIMITIVE,
            Type::Int => TypeFlags::PRIMITIVE | TypeFlags::INT | TypeFlags::SIGNED | TypeFlags::NUMBER,
            Type::Uint => TypeFlags::PRIMITIVE | TypeFlags::INT | TypeFlags::NUMBER,
            Type::Float | Type::Double => {
                TypeFlags::PRIMITIVE | TypeFlags::SIGNED | TypeFlags::NUMBER
            }
            _ => TypeFlags::empty(),
        }
    }

    /// Size in abstract locations, used for element address arithmetic.
    ///
    /// Scalars occupy one location; arrays are `len * elem.size()`. Pointers
    /// and array references have their own fixed footprints.
    pub fn size(&self) -> u32 {
        match self {
            Type::Void => 0,
            Type::Bool | Type::Int | Type::Uint | Type::Float | Type::Double => 1,
            Type::Array { elem, len } => elem.size() * len,
            Type::Ptr { .. } => 1,
            Type::ArrayRef { .. } => 2,
            Type::Null => 1,
            Type::Var(name) => panic!("size of unbound type variable '{name}'"),
            Type::ImplicitRef(inner) => inner.size(),
        }
    }

    /// Whether this type contains any unbound type variable.
    pub fn contains_var(&self) -> bool {
        match self {
            Type::Var(_) => true,
            Type::Array { elem, .. }
            | Type::ArrayRef { elem, .. }
            | Type::Ptr { elem, .. }
            | Type::ImplicitRef(elem) => elem.contains_var(),
            _ => false,
        }
    }

    /// Whether this is a reference shape (`ptr` or array reference) for the
    /// purposes of reference equality.
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Ptr { .. } | Type::ArrayRef { .. })
    }

    /// Structural identity hash, computed over the canonical printed form.
    pub fn type_hash(&self) -> TypeHash {
        TypeHash::from_name(&self.to_string())
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Uint => write!(f, "uint"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Array { elem, len } => write!(f, "array<{elem},{len}>"),
            Type::ArrayRef { space, elem } => write!(f, "arrayRef<{space},{elem}>"),
            Type::Ptr { space, elem } => write!(f, "ptr<{space},{elem}>"),
            Type::Null => write!(f, "null"),
            Type::Var(name) => write!(f, "{name}"),
            Type::ImplicitRef(inner) => write!(f, "&{inner}"),
        }
    }
}
