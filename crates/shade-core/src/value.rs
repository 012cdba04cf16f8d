//! Runtime values and the memory accessor seam.
//!
//! Native intrinsic implementations operate on [`Value`]s and delegate all
//! address arithmetic to a [`Memory`] implementation supplied by the host.
//! This crate never implements the memory model itself; interpreters and
//! test harnesses do.

use crate::AddressSpace;

/// An abstract address into some address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub u64);

impl Address {
    /// Offset this address by a number of locations.
    #[inline]
    pub fn plus(self, offset: u64) -> Address {
        Address(self.0 + offset)
    }
}

/// A bounded array reference: base address plus element count.
///
/// The bound travels with the handle so indexing can be checked without a
/// memory round trip; the runtime length query still goes through
/// [`Memory::length_of`] so address-space-specific accessors stay possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRefValue {
    /// Base address of element 0.
    pub base: Address,
    /// Number of elements.
    pub length: u32,
}

/// A runtime value flowing through native implementations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// The unit value.
    Void,
    /// Boolean.
    Bool(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 32-bit unsigned integer.
    Uint(u32),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Pointer; `None` is null.
    Ptr(Option<Address>),
    /// Array reference; `None` is null.
    ArrayRef(Option<ArrayRefValue>),
}

impl Value {
    /// Extract a `uint`, if this value is one.
    #[inline]
    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a pointer payload, if this value is a pointer.
    #[inline]
    pub fn as_ptr(&self) -> Option<Option<Address>> {
        match self {
            Value::Ptr(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an array-reference payload, if this value is one.
    #[inline]
    pub fn as_array_ref(&self) -> Option<Option<ArrayRefValue>> {
        match self {
            Value::ArrayRef(v) => Some(*v),
            _ => None,
        }
    }
}

/// Host-supplied memory accessor for synthesized intrinsics.
///
/// One implementation per execution environment. Address arithmetic and
/// bound lookup are address-space-specific concerns of the host; the
/// synthesizer only decides *when* to call them.
pub trait Memory {
    /// Compute the address of `base[index]` given the element footprint.
    fn element_address(
        &self,
        space: AddressSpace,
        base: Address,
        index: u32,
        elem_size: u32,
    ) -> Address;

    /// The element count backing an array reference's storage.
    fn length_of(&self, space: AddressSpace, base: Address) -> u32;
}
