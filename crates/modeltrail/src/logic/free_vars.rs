//! Free-variable collection over shared term DAGs

use super::interner::VariableId;
use super::term::{TermId, TermNode, TermStore};
use std::collections::HashSet;

/// A set of variables
pub type VarSet = HashSet<VariableId>;

/// Add every variable occurring in `term` to `vars`.
///
/// Shared sub-terms are visited once.
pub fn collect_free_vars(store: &TermStore, term: TermId, vars: &mut VarSet) {
    let mut visited = HashSet::new();
    let mut todo = vec![term];
    while let Some(t) = todo.pop() {
        if !visited.insert(t) {
            continue;
        }
        match store.node(t) {
            TermNode::Var(v) => {
                vars.insert(*v);
            }
            TermNode::Int(_) | TermNode::Bool(_) => {}
            TermNode::App(_, args) => todo.extend(args.iter().copied()),
        }
    }
}

/// The set of variables occurring in `term`
pub fn free_vars(store: &TermStore, term: TermId) -> VarSet {
    let mut vars = VarSet::new();
    collect_free_vars(store, term, &mut vars);
    vars
}

/// Check whether `var` occurs in `term`
pub fn occurs(store: &TermStore, var: VariableId, term: TermId) -> bool {
    free_vars(store, term).contains(&var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Interner;

    #[test]
    fn test_ground_term_has_no_free_vars() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let plus = interner.intern_function("+");
        let one = store.int(1);
        let two = store.int(2);
        let sum = store.app(plus, vec![one, two]);

        assert!(free_vars(&store, sum).is_empty());
    }

    #[test]
    fn test_collects_through_shared_subterms() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let y = interner.intern_variable("y");
        let f = interner.intern_function("f");

        let tx = store.var(x);
        let ty = store.var(y);
        let fx = store.app(f, vec![tx]);
        let t = store.app(f, vec![fx, fx, ty]);

        let vars = free_vars(&store, t);
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&x));
        assert!(vars.contains(&y));
        assert!(occurs(&store, x, fx));
        assert!(!occurs(&store, y, fx));
    }

    #[test]
    fn test_collect_accumulates() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let y = interner.intern_variable("y");
        let tx = store.var(x);
        let ty = store.var(y);

        let mut vars = VarSet::new();
        collect_free_vars(&store, tx, &mut vars);
        collect_free_vars(&store, ty, &mut vars);
        assert_eq!(vars.len(), 2);
    }
}
