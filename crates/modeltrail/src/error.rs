//! Error types for modeltrail

use crate::logic::VariableId;
use thiserror::Error;

/// Contract failures reported by the trail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrailError {
    /// Two active entries define the same variable
    #[error("variable {var} is defined by two active trail entries ({older} and {newer})")]
    DuplicateDefinition {
        var: VariableId,
        older: usize,
        newer: usize,
    },

    #[error("cannot pop {requested} scope(s): only {open} open")]
    ScopeUnderflow { requested: usize, open: usize },
}

/// Failures while evaluating terms against a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable {0} has no value in the model")]
    Unassigned(String),

    #[error("function {0} is uninterpreted")]
    Uninterpreted(String),

    #[error("{op}: expected {expected} argument(s), got {got}")]
    Arity {
        op: String,
        expected: usize,
        got: usize,
    },

    #[error("{op}: expected {expected} operand")]
    SortMismatch { op: String, expected: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {0}")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, TrailError>;
