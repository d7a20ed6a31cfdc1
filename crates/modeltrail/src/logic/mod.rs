//! Formula representation used by the trail
//!
//! This module provides the terms, justifications, and free-variable
//! collection the trail is built on.

pub mod dependency;
pub mod dependent_expr;
pub mod free_vars;
pub mod interner;
pub mod term;

pub use dependency::{AssumptionId, Dependency};
pub use dependent_expr::{DependentExpr, DependentExprDisplay};
pub use free_vars::{collect_free_vars, free_vars, occurs, VarSet};
pub use interner::{FunctionId, Interner, VariableId};
pub use term::{TermDisplay, TermId, TermNode, TermStore};
