//! modeltrail: model reconstruction for formula simplification
//!
//! A simplifier that eliminates variables and drops formulas records each
//! step on a [`Trail`]. New formulas entering the working set are replayed
//! through the trail, which rewrites them with rigid substitutions and
//! invalidates loose ones whose variables reappear. Once simplification is
//! done, [`Trail::model_converter`] composes the active steps into a
//! [`ModelConverter`] that extends a model of the simplified formulas to a
//! model of the original ones.

pub mod config;
pub mod error;
pub mod json;
pub mod logic;
pub mod model;
pub mod model_converter;
pub mod substitution;
pub mod trail;

pub use config::TrailConfig;
pub use error::{EvalError, Result, TrailError};
pub use logic::{
    free_vars, AssumptionId, Dependency, DependentExpr, FunctionId, Interner, TermId, TermNode,
    TermStore, VarSet, VariableId,
};
pub use model::{Evaluator, Model, Value};
pub use model_converter::ModelConverter;
pub use substitution::{Binding, Replacer, Substitution};
pub use trail::{EntryKind, Trail, TrailEntry, TrailStats};
