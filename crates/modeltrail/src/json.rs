//! JSON serialization types for trails and model converters
//!
//! Names are resolved through the interner so the output is readable
//! without the in-memory symbol tables.

use crate::logic::{Dependency, DependentExpr, Interner, TermId, TermNode, TermStore};
use crate::model::{Model, Value};
use crate::model_converter::ModelConverter;
use crate::trail::{EntryKind, Trail, TrailEntry, TrailStats};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON representation of a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Int { value: i64 },
    Bool { value: bool },
    Function { name: String, args: Vec<TermJson> },
}

impl TermJson {
    pub fn from_term(store: &TermStore, term: TermId, interner: &Interner) -> Self {
        match store.node(term) {
            TermNode::Var(v) => TermJson::Variable {
                name: interner.resolve_variable(*v).to_string(),
            },
            TermNode::Int(n) => TermJson::Int { value: *n },
            TermNode::Bool(b) => TermJson::Bool { value: *b },
            TermNode::App(func, args) => TermJson::Function {
                name: interner.resolve_function(*func).to_string(),
                args: args
                    .iter()
                    .map(|&a| TermJson::from_term(store, a, interner))
                    .collect(),
            },
        }
    }
}

/// JSON representation of a formula with its justification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentExprJson {
    pub formula: TermJson,
    #[serde(skip_serializing_if = "Dependency::is_empty", default)]
    pub dep: Dependency,
}

impl DependentExprJson {
    pub fn from_expr(store: &TermStore, d: &DependentExpr, interner: &Interner) -> Self {
        DependentExprJson {
            formula: TermJson::from_term(store, d.formula, interner),
            dep: d.dep.clone(),
        }
    }
}

/// JSON representation of one variable definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionJson {
    pub var: String,
    pub def: TermJson,
    #[serde(skip_serializing_if = "Dependency::is_empty", default)]
    pub dep: Dependency,
}

/// JSON representation of a trail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrailEntryJson {
    Substitution {
        active: bool,
        rigid: bool,
        definitions: Vec<DefinitionJson>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        removed: Vec<DependentExprJson>,
    },
    Removal {
        active: bool,
        vars: Vec<String>,
        removed: Vec<DependentExprJson>,
    },
    Hide {
        active: bool,
        var: String,
    },
}

impl TrailEntryJson {
    pub fn from_entry(store: &TermStore, entry: &TrailEntry, interner: &Interner) -> Self {
        let removed = || -> Vec<DependentExprJson> {
            entry
                .removed()
                .iter()
                .map(|d| DependentExprJson::from_expr(store, d, interner))
                .collect()
        };
        match &entry.kind {
            EntryKind::Substitution { subst, rigid, .. } => TrailEntryJson::Substitution {
                active: entry.is_active(),
                rigid: *rigid,
                definitions: subst
                    .iter()
                    .map(|(var, binding)| DefinitionJson {
                        var: interner.resolve_variable(var).to_string(),
                        def: TermJson::from_term(store, binding.def, interner),
                        dep: binding.dep.clone(),
                    })
                    .collect(),
                removed: removed(),
            },
            EntryKind::Removal { vars, .. } => TrailEntryJson::Removal {
                active: entry.is_active(),
                vars: vars
                    .iter()
                    .map(|&v| interner.resolve_variable(v).to_string())
                    .collect(),
                removed: removed(),
            },
            EntryKind::Hide { var } => TrailEntryJson::Hide {
                active: entry.is_active(),
                var: interner.resolve_variable(*var).to_string(),
            },
        }
    }
}

/// JSON representation of a whole trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailJson {
    pub entries: Vec<TrailEntryJson>,
    pub stats: TrailStats,
}

impl TrailJson {
    pub fn from_trail(store: &TermStore, trail: &Trail, interner: &Interner) -> Self {
        TrailJson {
            entries: trail
                .entries()
                .iter()
                .map(|e| TrailEntryJson::from_entry(store, e, interner))
                .collect(),
            stats: *trail.stats(),
        }
    }

    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON representation of a model converter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConverterJson {
    pub definitions: Vec<DefinitionJson>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub hidden: Vec<String>,
}

impl ModelConverterJson {
    pub fn from_converter(store: &TermStore, mc: &ModelConverter, interner: &Interner) -> Self {
        ModelConverterJson {
            definitions: mc
                .iter()
                .map(|(var, def, dep)| DefinitionJson {
                    var: interner.resolve_variable(var).to_string(),
                    def: TermJson::from_term(store, def, interner),
                    dep: dep.clone(),
                })
                .collect(),
            hidden: mc
                .hidden()
                .iter()
                .map(|&v| interner.resolve_variable(v).to_string())
                .collect(),
        }
    }
}

/// JSON representation of a model: variable name to value
pub type ModelJson = IndexMap<String, Value>;

pub fn model_to_json(model: &Model, interner: &Interner) -> ModelJson {
    model
        .iter()
        .map(|(var, value)| (interner.resolve_variable(var).to_string(), value))
        .collect()
}
