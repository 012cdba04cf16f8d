//! Deterministic structural identity hashes.
//!
//! A [`TypeHash`] identifies a type, a declared function overload, or a
//! synthesized intrinsic instance. It is computed from the canonical printed
//! form of the inputs, so the same signature always produces the same hash
//! regardless of declaration order. Function hashes fold parameter types in
//! order-sensitive fashion, which is what distinguishes `f(int, float)` from
//! `f(float, int)`.

use std::fmt;

use xxhash_rust::xxh64::xxh64;

/// Domain-separation constants so a type named `f` can never collide with a
/// function named `f` or an intrinsic instance keyed on `f`.
mod hash_constants {
    pub const TYPE: u64 = 0x7d5a_92e4_1bc3_08f6;
    pub const FUNCTION: u64 = 0x3fa8_60d1_c794_e25b;
    pub const OPERATOR: u64 = 0xb216_f9c0_4e8d_73a5;
    pub const SEP: u64 = 0x9e37_79b9_7f4a_7c15;

    /// Per-position markers mixed into parameter folding.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x0123_4567_89ab_cdef,
        0x89ab_cdef_0123_4567,
        0xfedc_ba98_7654_3210,
        0x4567_89ab_cdef_0123,
        0xcdef_0123_4567_89ab,
        0x3210_fedc_ba98_7654,
        0xba98_7654_3210_fedc,
        0x7654_3210_fedc_ba98,
    ];
}

/// A deterministic 64-bit hash identifying a type or function overload.
///
/// The same input always produces the same hash, so hashes can be computed
/// before the thing they name exists in any table. This is what makes the
/// intrinsic memoization key stable across call sites.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a canonical type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a function hash from name and parameter type hashes.
    ///
    /// Different parameter types produce different hashes, which is how
    /// overloads of the same name stay distinct. Parameter order matters.
    #[inline]
    pub fn from_function(name: &str, param_hashes: &[TypeHash]) -> Self {
        TypeHash(fold_params(
            hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0),
            param_hashes,
        ))
    }

    /// Create an intrinsic-instance key from operator name and concrete
    /// argument type hashes.
    ///
    /// Uses a separate domain constant so an intrinsic instance for
    /// `operator==` can never collide with a user function named `operator==`
    /// over the same types.
    #[inline]
    pub fn from_operator(name: &str, arg_hashes: &[TypeHash]) -> Self {
        TypeHash(fold_params(
            hash_constants::OPERATOR ^ xxh64(name.as_bytes(), 0),
            arg_hashes,
        ))
    }
}

/// Fold parameter hashes into an accumulator, order-sensitively.
#[inline]
fn fold_params(mut hash: u64, params: &[TypeHash]) -> u64 {
    for (i, param) in params.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps the fold non-commutative, unlike plain XOR
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}
