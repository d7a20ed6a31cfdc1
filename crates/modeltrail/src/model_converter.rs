//! Back-substitution from simplified models to models of the original formulas

use crate::config::TrailConfig;
use crate::error::EvalError;
use crate::logic::{Dependency, Interner, TermId, TermStore, VariableId};
use crate::model::{Evaluator, Model};
use crate::substitution::Substitution;
use std::fmt;

/// A composed, fully resolved substitution.
///
/// Definitions are kept in the order they were installed: the newest trail
/// step comes first, and every later definition has already been resolved
/// against the ones before it.
#[derive(Debug, Clone, Default)]
pub struct ModelConverter {
    subst: Substitution,
    hidden: Vec<VariableId>,
    config: TrailConfig,
}

impl ModelConverter {
    pub(crate) fn new(subst: Substitution, hidden: Vec<VariableId>, config: TrailConfig) -> Self {
        ModelConverter {
            subst,
            hidden,
            config,
        }
    }

    pub fn substitution(&self) -> &Substitution {
        &self.subst
    }

    /// Original-space term replacing `var`
    pub fn definition(&self, var: VariableId) -> Option<TermId> {
        self.subst.definition(var)
    }

    pub fn dependency(&self, var: VariableId) -> Dependency {
        self.subst.dependency_of(var)
    }

    /// Variables removed from reconstructed models
    pub fn hidden(&self) -> &[VariableId] {
        &self.hidden
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, TermId, &Dependency)> + '_ {
        self.subst.iter().map(|(v, b)| (v, b.def, &b.dep))
    }

    /// Number of definitions; hidden variables are not counted
    pub fn len(&self) -> usize {
        self.subst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extend a model of the simplified formulas to a model of the original ones.
    ///
    /// Each definition is evaluated in installation order against the model
    /// under construction, so a definition may read any value assigned
    /// before it.
    pub fn apply(
        &self,
        store: &TermStore,
        interner: &Interner,
        model: &Model,
    ) -> Result<Model, EvalError> {
        let evaluator = Evaluator::new(store, interner).with_completion(self.config.model_completion);
        let mut result = model.clone();
        for (var, binding) in self.subst.iter() {
            let value = evaluator.eval(&mut result, binding.def)?;
            tracing::trace!(var = interner.resolve_variable(var), %value, "reconstructed");
            result.assign(var, value);
        }
        if !self.config.keep_hidden {
            for &var in &self.hidden {
                result.remove(var);
            }
        }
        Ok(result)
    }

    pub fn display<'a>(&'a self, store: &'a TermStore, interner: &'a Interner) -> ModelConverterDisplay<'a> {
        ModelConverterDisplay {
            converter: self,
            store,
            interner,
        }
    }
}

/// Prints one `v := definition` line per variable, then hidden variables
pub struct ModelConverterDisplay<'a> {
    converter: &'a ModelConverter,
    store: &'a TermStore,
    interner: &'a Interner,
}

impl<'a> fmt::Display for ModelConverterDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (var, def, _) in self.converter.iter() {
            writeln!(
                f,
                "{} := {}",
                self.interner.resolve_variable(var),
                self.store.display(def, self.interner)
            )?;
        }
        for &var in &self.converter.hidden {
            writeln!(f, "hide {}", self.interner.resolve_variable(var))?;
        }
        Ok(())
    }
}
