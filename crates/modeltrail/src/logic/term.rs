//! Hash-consed terms
//!
//! Terms live in a [`TermStore`] arena and are referred to by [`TermId`]
//! handles. Structurally equal nodes are interned once, so comparing two
//! `TermId`s is the same as comparing the terms they denote. Nodes are never
//! mutated or removed; rewriting builds new nodes that share the old children.

use super::interner::{FunctionId, Interner, VariableId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node in a [`TermStore`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermId(pub(crate) u32);

impl TermId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A term node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermNode {
    Var(VariableId),
    Int(i64),
    Bool(bool),
    App(FunctionId, Vec<TermId>),
}

/// Arena of interned term nodes
#[derive(Debug, Clone, Default)]
pub struct TermStore {
    nodes: IndexSet<TermNode>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a node, returning the existing handle if it is already present
    pub fn intern(&mut self, node: TermNode) -> TermId {
        let (index, _) = self.nodes.insert_full(node);
        TermId(index as u32)
    }

    pub fn var(&mut self, var: VariableId) -> TermId {
        self.intern(TermNode::Var(var))
    }

    pub fn int(&mut self, value: i64) -> TermId {
        self.intern(TermNode::Int(value))
    }

    pub fn bool(&mut self, value: bool) -> TermId {
        self.intern(TermNode::Bool(value))
    }

    pub fn app(&mut self, func: FunctionId, args: Vec<TermId>) -> TermId {
        self.intern(TermNode::App(func, args))
    }

    /// Look up the node behind a handle.
    ///
    /// Handles are only produced by this store, so an unknown handle is a
    /// caller bug and panics.
    pub fn node(&self, id: TermId) -> &TermNode {
        self.nodes
            .get_index(id.0 as usize)
            .unwrap_or_else(|| panic!("term {} does not belong to this store", id.0))
    }

    /// Get the handle of an already-interned node without creating it
    pub fn find(&self, node: &TermNode) -> Option<TermId> {
        self.nodes.get_index_of(node).map(|i| TermId(i as u32))
    }

    /// The variable a term consists of, if it is a bare variable
    pub fn as_var(&self, id: TermId) -> Option<VariableId> {
        match self.node(id) {
            TermNode::Var(v) => Some(*v),
            _ => None,
        }
    }

    /// Children of an application node (empty for leaves)
    pub fn args(&self, id: TermId) -> &[TermId] {
        match self.node(id) {
            TermNode::App(_, args) => args,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Format a term with an interner for name resolution
    pub fn display<'a>(&'a self, id: TermId, interner: &'a Interner) -> TermDisplay<'a> {
        TermDisplay {
            store: self,
            term: id,
            interner,
        }
    }
}

/// Display wrapper for a term that resolves names through the interner.
///
/// Applications print in prefix form, e.g. `(> (+ a 1) 0)`.
pub struct TermDisplay<'a> {
    store: &'a TermStore,
    term: TermId,
    interner: &'a Interner,
}

enum Piece {
    Term(TermId),
    Space,
    Close,
}

impl<'a> fmt::Display for TermDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Term(self.term)];
        while let Some(piece) = stack.pop() {
            let term = match piece {
                Piece::Term(t) => t,
                Piece::Space => {
                    write!(f, " ")?;
                    continue;
                }
                Piece::Close => {
                    write!(f, ")")?;
                    continue;
                }
            };
            match self.store.node(term) {
                TermNode::Var(v) => write!(f, "{}", self.interner.resolve_variable(*v))?,
                TermNode::Int(n) => write!(f, "{}", n)?,
                TermNode::Bool(b) => write!(f, "{}", b)?,
                TermNode::App(func, args) => {
                    let name = self.interner.resolve_function(*func);
                    if args.is_empty() {
                        write!(f, "{}", name)?;
                        continue;
                    }
                    write!(f, "({}", name)?;
                    stack.push(Piece::Close);
                    for &arg in args.iter().rev() {
                        stack.push(Piece::Term(arg));
                        stack.push(Piece::Space);
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consing_shares_nodes() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let plus = interner.intern_function("+");

        let x1 = store.var(x);
        let x2 = store.var(x);
        assert_eq!(x1, x2);

        let one = store.int(1);
        let s1 = store.app(plus, vec![x1, one]);
        let s2 = store.app(plus, vec![x2, one]);
        assert_eq!(s1, s2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_argument_order_matters() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let minus = interner.intern_function("-");

        let tx = store.var(x);
        let one = store.int(1);
        let a = store.app(minus, vec![tx, one]);
        let b = store.app(minus, vec![one, tx]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_find_does_not_create() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");

        assert!(store.find(&TermNode::Var(x)).is_none());
        let tx = store.var(x);
        assert_eq!(store.find(&TermNode::Var(x)), Some(tx));
        assert_eq!(store.as_var(tx), Some(x));
    }

    #[test]
    fn test_display_prefix_form() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let a = interner.intern_variable("a");
        let plus = interner.intern_function("+");
        let gt = interner.intern_function(">");

        let ta = store.var(a);
        let one = store.int(1);
        let zero = store.int(0);
        let sum = store.app(plus, vec![ta, one]);
        let cmp = store.app(gt, vec![sum, zero]);

        assert_eq!(store.display(cmp, &interner).to_string(), "(> (+ a 1) 0)");
    }

    #[test]
    fn test_display_deeply_nested() {
        let mut interner = Interner::new();
        let mut store = TermStore::new();
        let x = interner.intern_variable("x");
        let not = interner.intern_function("not");
        let tru = store.bool(true);

        let mut t = store.var(x);
        for _ in 0..200_000 {
            t = store.app(not, vec![t]);
        }
        let text = store.display(t, &interner).to_string();
        assert!(text.starts_with("(not (not "));
        assert_eq!(text.matches(')').count(), 200_000);

        let pair = store.app(not, vec![tru, t]);
        assert!(store.display(pair, &interner).to_string().starts_with("(not true (not"));
    }
}
