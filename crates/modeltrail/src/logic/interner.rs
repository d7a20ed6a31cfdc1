//! Names of variables and function symbols
//!
//! Terms refer to symbols by dense `u32` handles. Variables are the
//! constants a simplifier may eliminate and the trail may define; function
//! symbols name built-in operators (`+`, `>`, `and`, ...) as well as
//! uninterpreted functions, and the evaluator decides which it understands.
//! The two namespaces are separate, so `f` can be both a variable and a
//! function.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Handle of a variable name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

/// Handle of a function symbol name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) u32);

impl VariableId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl FunctionId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// One namespace: handles are positions in insertion order.
#[derive(Debug, Clone, Default)]
struct Symbols(IndexSet<Box<str>>);

impl Symbols {
    fn intern(&mut self, name: &str) -> u32 {
        let index = match self.0.get_index_of(name) {
            Some(index) => index,
            None => self.0.insert_full(name.into()).0,
        };
        index as u32
    }

    // Handles only come from `intern`, so the index is in range.
    fn name(&self, handle: u32) -> &str {
        &self.0[handle as usize]
    }

    fn lookup(&self, name: &str) -> Option<u32> {
        self.0.get_index_of(name).map(|i| i as u32)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Symbol tables for one simplification problem.
///
/// Shared by the [`TermStore`](super::TermStore), the trail's displays, the
/// evaluator and the JSON views; never global.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    variables: Symbols,
    functions: Symbols,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for variable `name`, allocating one on first use
    pub fn intern_variable(&mut self, name: &str) -> VariableId {
        VariableId(self.variables.intern(name))
    }

    pub fn resolve_variable(&self, id: VariableId) -> &str {
        self.variables.name(id.0)
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        self.variables.lookup(name).is_some()
    }

    /// Handle for `name` if it was interned as a variable
    pub fn get_variable(&self, name: &str) -> Option<VariableId> {
        self.variables.lookup(name).map(VariableId)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Handle for function symbol `name`, allocating one on first use
    pub fn intern_function(&mut self, name: &str) -> FunctionId {
        FunctionId(self.functions.intern(name))
    }

    pub fn resolve_function(&self, id: FunctionId) -> &str {
        self.functions.name(id.0)
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.lookup(name).is_some()
    }

    pub fn get_function(&self, name: &str) -> Option<FunctionId> {
        self.functions.lookup(name).map(FunctionId)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// IDs serialize as bare u32; json.rs resolves names through the interner.

impl Serialize for VariableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(VariableId)
    }
}

impl Serialize for FunctionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FunctionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(FunctionId)
    }
}
