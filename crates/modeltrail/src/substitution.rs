//! Variable substitutions with justifications

use crate::logic::{
    Dependency, DependentExpr, Interner, TermId, TermNode, TermStore, VarSet, VariableId,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Definition of an eliminated variable and the reason it is valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub def: TermId,
    pub dep: Dependency,
}

/// A substitution mapping variables to (definition, justification) pairs.
///
/// Iteration follows insertion order. Inserting a variable that is already
/// mapped overwrites its binding in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<VariableId, Binding>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// A substitution with a single binding
    pub fn single(var: VariableId, def: TermId, dep: Dependency) -> Self {
        let mut subst = Substitution::new();
        subst.insert(var, def, dep);
        subst
    }

    /// Add a variable -> definition mapping, returning the previous binding
    pub fn insert(&mut self, var: VariableId, def: TermId, dep: Dependency) -> Option<Binding> {
        self.map.insert(var, Binding { def, dep })
    }

    pub fn get(&self, var: VariableId) -> Option<&Binding> {
        self.map.get(&var)
    }

    /// Definition bound to `var`, if any
    pub fn definition(&self, var: VariableId) -> Option<TermId> {
        self.map.get(&var).map(|b| b.def)
    }

    /// Justification of the binding for `var` (null when unbound)
    pub fn dependency_of(&self, var: VariableId) -> Dependency {
        self.map
            .get(&var)
            .map(|b| b.dep.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, var: VariableId) -> bool {
        self.map.contains_key(&var)
    }

    /// Check whether any substituted variable is in `vars`
    pub fn intersects(&self, vars: &VarSet) -> bool {
        self.map.keys().any(|v| vars.contains(v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &Binding)> + '_ {
        self.map.iter().map(|(v, b)| (*v, b))
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.map.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Apply this substitution to a term with a one-shot [`Replacer`]
    pub fn apply(&self, store: &mut TermStore, term: TermId) -> (TermId, Dependency) {
        Replacer::new(self).apply(store, term)
    }

    pub fn display<'a>(&'a self, store: &'a TermStore, interner: &'a Interner) -> SubstitutionDisplay<'a> {
        SubstitutionDisplay {
            subst: self,
            store,
            interner,
        }
    }
}

/// Rewrites terms by replacing every occurrence of a mapped variable with
/// its definition.
///
/// Definitions are inserted as-is and are not rewritten again. Results are
/// memoized per node, so a replacer must not outlive changes to the
/// substitution it was built from (the borrow enforces this).
pub struct Replacer<'s> {
    subst: &'s Substitution,
    cache: HashMap<TermId, (TermId, Dependency)>,
}

impl<'s> Replacer<'s> {
    pub fn new(subst: &'s Substitution) -> Self {
        Replacer {
            subst,
            cache: HashMap::new(),
        }
    }

    /// Rewrite `term`, returning the new term and the join of the
    /// justifications of all bindings that were used.
    pub fn apply(&mut self, store: &mut TermStore, term: TermId) -> (TermId, Dependency) {
        if self.subst.is_empty() {
            return (term, Dependency::none());
        }
        // Post-order walk with an explicit stack; `true` marks a node whose
        // arguments are already rewritten.
        let mut stack = vec![(term, false)];
        while let Some((t, expanded)) = stack.pop() {
            if self.cache.contains_key(&t) {
                continue;
            }
            let result = match store.node(t).clone() {
                TermNode::Var(v) => match self.subst.get(v) {
                    Some(binding) => (binding.def, binding.dep.clone()),
                    None => (t, Dependency::none()),
                },
                TermNode::Int(_) | TermNode::Bool(_) => (t, Dependency::none()),
                TermNode::App(func, args) => {
                    if !expanded {
                        stack.push((t, true));
                        for &arg in args.iter().rev() {
                            if !self.cache.contains_key(&arg) {
                                stack.push((arg, false));
                            }
                        }
                        continue;
                    }
                    let mut dep = Dependency::none();
                    let mut new_args = Vec::with_capacity(args.len());
                    for arg in &args {
                        let (new_arg, arg_dep) = &self.cache[arg];
                        dep = Dependency::join(&dep, arg_dep);
                        new_args.push(*new_arg);
                    }
                    if new_args == args {
                        (t, dep)
                    } else {
                        (store.app(func, new_args), dep)
                    }
                }
            };
            self.cache.insert(t, result);
        }
        self.cache[&term].clone()
    }

    /// Rewrite a dependent formula, joining the rewrite's justification with
    /// the formula's own.
    pub fn apply_dependent(&mut self, store: &mut TermStore, d: &DependentExpr) -> DependentExpr {
        let (formula, dep) = self.apply(store, d.formula);
        DependentExpr::new(formula, Dependency::join(&d.dep, &dep))
    }
}

pub struct SubstitutionDisplay<'a> {
    subst: &'a Substitution,
    store: &'a TermStore,
    interner: &'a Interner,
}

impl<'a> fmt::Display for SubstitutionDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (var, binding)) in self.subst.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{} -> {}",
                self.interner.resolve_variable(var),
                self.store.display(binding.def, self.interner)
            )?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::AssumptionId;

    struct Ctx {
        interner: Interner,
        store: TermStore,
    }

    impl Ctx {
        fn new() -> Self {
            Ctx {
                interner: Interner::new(),
                store: TermStore::new(),
            }
        }

        fn var(&mut self, name: &str) -> (VariableId, TermId) {
            let id = self.interner.intern_variable(name);
            (id, self.store.var(id))
        }

        fn app(&mut self, name: &str, args: Vec<TermId>) -> TermId {
            let f = self.interner.intern_function(name);
            self.store.app(f, args)
        }
    }

    #[test]
    fn test_insert_overwrites() {
        let mut ctx = Ctx::new();
        let (x, _) = ctx.var("x");
        let one = ctx.store.int(1);
        let two = ctx.store.int(2);

        let mut subst = Substitution::new();
        assert!(subst.insert(x, one, Dependency::none()).is_none());
        let old = subst.insert(x, two, Dependency::none());

        assert_eq!(old.map(|b| b.def), Some(one));
        assert_eq!(subst.len(), 1);
        assert_eq!(subst.definition(x), Some(two));
    }

    #[test]
    fn test_apply_replaces_all_occurrences() {
        let mut ctx = Ctx::new();
        let (x, tx) = ctx.var("x");
        let (_, ta) = ctx.var("a");
        let one = ctx.store.int(1);
        let a1 = ctx.app("+", vec![ta, one]);
        let t = ctx.app("*", vec![tx, tx]);

        let dep = Dependency::leaf(AssumptionId(7));
        let subst = Substitution::single(x, a1, dep.clone());
        let (result, used) = subst.apply(&mut ctx.store, t);

        let expected = ctx.app("*", vec![a1, a1]);
        assert_eq!(result, expected);
        assert_eq!(used, dep);
    }

    #[test]
    fn test_apply_deeply_nested_term() {
        let mut ctx = Ctx::new();
        let (x, tx) = ctx.var("x");
        let one = ctx.store.int(1);
        let not = ctx.interner.intern_function("not");
        let mut t = tx;
        let mut expected = one;
        for _ in 0..200_000 {
            t = ctx.store.app(not, vec![t]);
            expected = ctx.store.app(not, vec![expected]);
        }

        let dep = Dependency::leaf(AssumptionId(2));
        let subst = Substitution::single(x, one, dep.clone());
        let (result, used) = subst.apply(&mut ctx.store, t);
        assert_eq!(result, expected);
        assert_eq!(used, dep);
    }

    #[test]
    fn test_unmapped_variables_pass_through() {
        let mut ctx = Ctx::new();
        let (x, _) = ctx.var("x");
        let (_, ty) = ctx.var("y");
        let zero = ctx.store.int(0);
        let t = ctx.app(">", vec![ty, zero]);

        let subst = Substitution::single(x, zero, Dependency::leaf(AssumptionId(1)));
        let (result, used) = subst.apply(&mut ctx.store, t);

        assert_eq!(result, t);
        assert!(used.is_empty());
    }

    #[test]
    fn test_definitions_are_not_rewritten_again() {
        let mut ctx = Ctx::new();
        let (x, tx) = ctx.var("x");
        let (y, ty) = ctx.var("y");
        let two = ctx.store.int(2);

        let mut subst = Substitution::new();
        subst.insert(x, ty, Dependency::none());
        subst.insert(y, two, Dependency::none());

        let (result, _) = subst.apply(&mut ctx.store, tx);
        assert_eq!(result, ty);
    }

    #[test]
    fn test_dependency_joins_only_used_bindings() {
        let mut ctx = Ctx::new();
        let (x, tx) = ctx.var("x");
        let (y, _) = ctx.var("y");
        let (z, tz) = ctx.var("z");
        let one = ctx.store.int(1);
        let t = ctx.app("+", vec![tx, tz]);

        let mut subst = Substitution::new();
        subst.insert(x, one, Dependency::leaf(AssumptionId(1)));
        subst.insert(y, one, Dependency::leaf(AssumptionId(2)));
        subst.insert(z, one, Dependency::leaf(AssumptionId(3)));

        let (_, used) = subst.apply(&mut ctx.store, t);
        let ids: Vec<_> = used.assumptions().map(|a| a.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_apply_dependent_joins_formula_dependency() {
        let mut ctx = Ctx::new();
        let (x, tx) = ctx.var("x");
        let zero = ctx.store.int(0);
        let f = ctx.app(">", vec![tx, zero]);

        let subst = Substitution::single(x, zero, Dependency::leaf(AssumptionId(2)));
        let d = DependentExpr::new(f, Dependency::leaf(AssumptionId(1)));
        let rewritten = Replacer::new(&subst).apply_dependent(&mut ctx.store, &d);

        let expected = ctx.app(">", vec![zero, zero]);
        assert_eq!(rewritten.formula, expected);
        assert!(rewritten.dep.contains(AssumptionId(1)));
        assert!(rewritten.dep.contains(AssumptionId(2)));
    }

    #[test]
    fn test_intersects_and_dependency_of() {
        let mut ctx = Ctx::new();
        let (x, _) = ctx.var("x");
        let (y, _) = ctx.var("y");
        let one = ctx.store.int(1);
        let subst = Substitution::single(x, one, Dependency::leaf(AssumptionId(5)));

        assert!(subst.intersects(&VarSet::from([x, y])));
        assert!(!subst.intersects(&VarSet::from([y])));
        assert!(subst.dependency_of(x).contains(AssumptionId(5)));
        assert!(subst.dependency_of(y).is_empty());
    }

    #[test]
    fn test_display() {
        let mut ctx = Ctx::new();
        let (x, _) = ctx.var("x");
        let (_, ta) = ctx.var("a");
        let one = ctx.store.int(1);
        let a1 = ctx.app("+", vec![ta, one]);
        let subst = Substitution::single(x, a1, Dependency::none());

        assert_eq!(
            subst.display(&ctx.store, &ctx.interner).to_string(),
            "[x -> (+ a 1)]"
        );
    }
}
