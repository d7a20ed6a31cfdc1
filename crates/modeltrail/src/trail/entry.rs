//! Trail entries: one recorded simplification step each

use crate::logic::{DependentExpr, Interner, TermStore, VarSet, VariableId};
use crate::substitution::Substitution;
use std::fmt;

/// What a trail entry records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Variables eliminated by substitution.
    ///
    /// A rigid step stays valid whatever reappears later. A loose step is
    /// only sound while its variables stay out of the working set; `removed`
    /// holds the formulas that go back in when it is invalidated.
    Substitution {
        subst: Substitution,
        rigid: bool,
        removed: Vec<DependentExpr>,
    },
    /// Formulas dropped because `vars` became unconstrained
    Removal {
        vars: Vec<VariableId>,
        removed: Vec<DependentExpr>,
    },
    /// A variable introduced by simplification, dropped from reconstructed models
    Hide { var: VariableId },
}

/// A recorded simplification step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailEntry {
    pub(crate) active: bool,
    pub kind: EntryKind,
}

impl TrailEntry {
    pub fn new(kind: EntryKind) -> Self {
        TrailEntry { active: true, kind }
    }

    pub fn rigid(subst: Substitution) -> Self {
        Self::new(EntryKind::Substitution {
            subst,
            rigid: true,
            removed: Vec::new(),
        })
    }

    pub fn loose(subst: Substitution, removed: Vec<DependentExpr>) -> Self {
        Self::new(EntryKind::Substitution {
            subst,
            rigid: false,
            removed,
        })
    }

    pub fn removal(vars: Vec<VariableId>, removed: Vec<DependentExpr>) -> Self {
        Self::new(EntryKind::Removal { vars, removed })
    }

    pub fn hide(var: VariableId) -> Self {
        Self::new(EntryKind::Hide { var })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_rigid(&self) -> bool {
        matches!(self.kind, EntryKind::Substitution { rigid: true, .. })
    }

    /// Entries that must be invalidated when their variables reappear
    pub fn is_loose(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::Substitution { rigid: false, .. } | EntryKind::Removal { .. }
        )
    }

    pub fn substitution(&self) -> Option<&Substitution> {
        match &self.kind {
            EntryKind::Substitution { subst, .. } => Some(subst),
            _ => None,
        }
    }

    pub fn removed(&self) -> &[DependentExpr] {
        match &self.kind {
            EntryKind::Substitution { removed, .. } | EntryKind::Removal { removed, .. } => removed,
            EntryKind::Hide { .. } => &[],
        }
    }

    /// Check whether this entry eliminated any variable in `vars`.
    ///
    /// Hide entries never intersect: they do not constrain the working set.
    pub fn intersects(&self, vars: &VarSet) -> bool {
        match &self.kind {
            EntryKind::Substitution { subst, .. } => subst.intersects(vars),
            EntryKind::Removal { vars: eliminated, .. } => eliminated.iter().any(|v| vars.contains(v)),
            EntryKind::Hide { .. } => false,
        }
    }

    pub fn display<'a>(&'a self, store: &'a TermStore, interner: &'a Interner) -> TrailEntryDisplay<'a> {
        TrailEntryDisplay {
            entry: self,
            store,
            interner,
        }
    }
}

pub struct TrailEntryDisplay<'a> {
    entry: &'a TrailEntry,
    store: &'a TermStore,
    interner: &'a Interner,
}

impl<'a> fmt::Display for TrailEntryDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.entry.active {
            write!(f, "(inactive) ")?;
        }
        match &self.entry.kind {
            EntryKind::Substitution { subst, rigid, .. } => {
                let tag = if *rigid { "rigid" } else { "loose" };
                write!(f, "{} {}", tag, subst.display(self.store, self.interner))?;
            }
            EntryKind::Removal { vars, .. } => {
                write!(f, "removal [")?;
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.interner.resolve_variable(*v))?;
                }
                write!(f, "]")?;
            }
            EntryKind::Hide { var } => {
                write!(f, "hide {}", self.interner.resolve_variable(*var))?;
            }
        }
        let removed = self.entry.removed();
        if !removed.is_empty() {
            write!(f, " removed:")?;
            for d in removed {
                write!(f, " {}", self.store.display(d.formula, self.interner))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Dependency;

    #[test]
    fn test_kinds() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let five = store.int(5);
        let subst = Substitution::single(x, five, Dependency::none());

        let rigid = TrailEntry::rigid(subst.clone());
        assert!(rigid.is_rigid() && !rigid.is_loose() && rigid.is_active());

        let loose = TrailEntry::loose(subst, vec![]);
        assert!(loose.is_loose() && !loose.is_rigid());

        let removal = TrailEntry::removal(vec![x], vec![]);
        assert!(removal.is_loose());
        assert!(removal.substitution().is_none());

        let hide = TrailEntry::hide(x);
        assert!(!hide.is_loose() && !hide.is_rigid());
    }

    #[test]
    fn test_intersects() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let y = interner.intern_variable("y");
        let five = store.int(5);

        let entry = TrailEntry::loose(Substitution::single(x, five, Dependency::none()), vec![]);
        assert!(entry.intersects(&VarSet::from([x])));
        assert!(!entry.intersects(&VarSet::from([y])));

        let removal = TrailEntry::removal(vec![y], vec![]);
        assert!(removal.intersects(&VarSet::from([x, y])));

        assert!(!TrailEntry::hide(x).intersects(&VarSet::from([x])));
    }

    #[test]
    fn test_display() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let y = interner.intern_variable("y");
        let lt = interner.intern_function("<");
        let ty = store.var(y);
        let five = store.int(5);
        let ten = store.int(10);
        let y_lt_10 = store.app(lt, vec![ty, ten]);

        let entry = TrailEntry::loose(
            Substitution::single(y, five, Dependency::none()),
            vec![DependentExpr::fact(y_lt_10)],
        );
        assert_eq!(
            entry.display(&store, &interner).to_string(),
            "loose [y -> 5] removed: (< y 10)"
        );
    }
}
