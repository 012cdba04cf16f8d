//! The program's function table.
//!
//! Central storage for every function visible to a compilation unit:
//! user declarations, built-in operators, and intrinsics synthesized on
//! demand during call resolution. Lookup is O(1) by [`TypeHash`]; the
//! per-name index preserves declaration order, which is what makes
//! first-satisfying-candidate overload selection deterministic.
//!
//! The table is append-only for the life of a compilation unit and is
//! always passed by `&mut`, never ambient state, so intrinsic synthesis
//! stays testable in isolation. Single-threaded analysis needs no locking;
//! callers that parallelize across compilation units must serialize access
//! themselves.

use rustc_hash::FxHashMap;

use crate::func::{FuncDecl, Param};
use crate::{NativeImpl, Span, TrapError, Type, TypeHash, Value};

/// Function table plus intrinsic memoization cache.
#[derive(Debug, Default)]
pub struct Program {
    /// All functions, by structural hash.
    functions: FxHashMap<TypeHash, FuncDecl>,

    /// Name index preserving declaration order, for overload-set lookup.
    by_name: FxHashMap<String, Vec<TypeHash>>,

    /// Memo cache: intrinsic instance key -> function hash.
    /// For a fixed key, synthesis runs at most once per compilation.
    intrinsic_cache: FxHashMap<TypeHash, TypeHash>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a program seeded with the built-in primitive operators.
    ///
    /// Declares `bool operator==(T,T)` for each scalar type, the way the
    /// standard-library prologue would. Reference equality is *not* seeded;
    /// it is synthesized on demand for pointer shapes.
    pub fn with_builtins() -> Self {
        let mut program = Self::new();
        for ty in [Type::Int, Type::Uint, Type::Bool, Type::Float, Type::Double] {
            program.add_function(scalar_equals(ty));
        }
        program
    }

    /// Add a function, returning its structural hash.
    ///
    /// A structurally identical declaration is already the same overload;
    /// the first registration wins and its hash is returned.
    pub fn add_function(&mut self, func: FuncDecl) -> TypeHash {
        let hash = func.func_hash();
        if self.functions.contains_key(&hash) {
            return hash;
        }
        self.by_name
            .entry(func.name.clone())
            .or_default()
            .push(hash);
        self.functions.insert(hash, func);
        hash
    }

    /// Look up a function by hash.
    pub fn get_function(&self, hash: TypeHash) -> Option<&FuncDecl> {
        self.functions.get(&hash)
    }

    /// The overload set for a name, in declaration order.
    pub fn overloads(&self, name: &str) -> &[TypeHash] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check the intrinsic memo cache for a synthesized instance.
    pub fn cached_intrinsic(&self, key: TypeHash) -> Option<TypeHash> {
        self.intrinsic_cache.get(&key).copied()
    }

    /// Register a freshly synthesized intrinsic under its memo key.
    ///
    /// Callers must check [`Program::cached_intrinsic`] first; inserting an
    /// already-cached key is a programmer error.
    pub fn insert_intrinsic(&mut self, key: TypeHash, func: FuncDecl) -> TypeHash {
        assert!(
            !self.intrinsic_cache.contains_key(&key),
            "intrinsic synthesized twice for the same key"
        );
        let hash = self.add_function(func);
        self.intrinsic_cache.insert(key, hash);
        hash
    }

    /// Number of functions in the table.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

/// Build the built-in `bool operator==(T,T)` for a scalar type.
fn scalar_equals(ty: Type) -> FuncDecl {
    let implementation = NativeImpl::new(move |args, _memory, span| {
        match (&args[0], &args[1]) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a == b)),
            (Value::Uint(a), Value::Uint(b)) => Ok(Value::Bool(a == b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Bool(a == b)),
            (Value::Double(a), Value::Double(b)) => Ok(Value::Bool(a == b)),
            _ => Err(TrapError::InvalidArgument {
                message: "operator== expects two scalars of the same type".to_string(),
                span,
            }),
        }
    });
    FuncDecl::native(
        "operator==",
        vec![Param::new("left", ty.clone()), Param::new("right", ty)],
        Type::Bool,
        implementation,
        Span::default(),
    )
}
