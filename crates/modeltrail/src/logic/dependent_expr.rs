//! Formulas paired with their justification

use super::dependency::Dependency;
use super::interner::Interner;
use super::term::{TermId, TermStore};
use std::fmt;

/// A formula known to hold because of `dep`.
///
/// Cloning shares the underlying term and justification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependentExpr {
    pub formula: TermId,
    pub dep: Dependency,
}

impl DependentExpr {
    pub fn new(formula: TermId, dep: Dependency) -> Self {
        DependentExpr { formula, dep }
    }

    /// A formula that holds unconditionally
    pub fn fact(formula: TermId) -> Self {
        DependentExpr {
            formula,
            dep: Dependency::none(),
        }
    }

    pub fn display<'a>(&'a self, store: &'a TermStore, interner: &'a Interner) -> DependentExprDisplay<'a> {
        DependentExprDisplay {
            expr: self,
            store,
            interner,
        }
    }
}

pub struct DependentExprDisplay<'a> {
    expr: &'a DependentExpr,
    store: &'a TermStore,
    interner: &'a Interner,
}

impl<'a> fmt::Display for DependentExprDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.store.display(self.expr.formula, self.interner))?;
        if !self.expr.dep.is_empty() {
            write!(f, " <- {}", self.expr.dep)?;
        }
        Ok(())
    }
}
