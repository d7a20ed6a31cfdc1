//! Justifications: the assumptions a derived formula depends on

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Identifier of an assumption (e.g. a tracked input formula)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssumptionId(pub u32);

/// An immutable, shared set of assumptions.
///
/// The empty set and the null justification are the same value, so
/// `join(a, Dependency::none()) == a` holds trivially.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Dependency(Option<Arc<BTreeSet<AssumptionId>>>);

impl Dependency {
    /// The null justification
    pub fn none() -> Self {
        Dependency(None)
    }

    /// A justification consisting of a single assumption
    pub fn leaf(id: AssumptionId) -> Self {
        Dependency(Some(Arc::new(BTreeSet::from([id]))))
    }

    pub fn from_assumptions<I: IntoIterator<Item = AssumptionId>>(ids: I) -> Self {
        let set: BTreeSet<_> = ids.into_iter().collect();
        if set.is_empty() {
            Dependency(None)
        } else {
            Dependency(Some(Arc::new(set)))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn contains(&self, id: AssumptionId) -> bool {
        self.0.as_ref().is_some_and(|s| s.contains(&id))
    }

    /// Assumptions in ascending order
    pub fn assumptions(&self) -> impl Iterator<Item = AssumptionId> + '_ {
        self.0.iter().flat_map(|s| s.iter().copied())
    }

    /// Union of two justifications.
    ///
    /// Shares the larger operand's storage when the other one adds nothing.
    pub fn join(a: &Dependency, b: &Dependency) -> Dependency {
        match (&a.0, &b.0) {
            (None, _) => b.clone(),
            (_, None) => a.clone(),
            (Some(x), Some(y)) => {
                if Arc::ptr_eq(x, y) || y.is_subset(x) {
                    a.clone()
                } else if x.is_subset(y) {
                    b.clone()
                } else {
                    Dependency(Some(Arc::new(x.union(y).copied().collect())))
                }
            }
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.assumptions().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "a{}", id.0)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Dependency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.assumptions())
    }
}

impl<'de> Deserialize<'de> for Dependency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<AssumptionId>::deserialize(deserializer).map(Dependency::from_assumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(ids: &[u32]) -> Dependency {
        Dependency::from_assumptions(ids.iter().map(|&i| AssumptionId(i)))
    }

    #[test]
    fn test_join_with_none_is_identity() {
        let a = dep(&[1, 2]);
        assert_eq!(Dependency::join(&a, &Dependency::none()), a);
        assert_eq!(Dependency::join(&Dependency::none(), &a), a);
    }

    #[test]
    fn test_join_is_union() {
        let a = dep(&[1, 3]);
        let b = dep(&[2, 3]);
        let ab = Dependency::join(&a, &b);
        assert_eq!(ab, dep(&[1, 2, 3]));
        assert_eq!(ab, Dependency::join(&b, &a));
    }

    #[test]
    fn test_join_is_idempotent() {
        let a = dep(&[4]);
        assert_eq!(Dependency::join(&a, &a), a);
    }

    #[test]
    fn test_empty_set_is_none() {
        assert!(dep(&[]).is_empty());
        assert_eq!(dep(&[]), Dependency::none());
        assert!(!Dependency::leaf(AssumptionId(0)).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(dep(&[2, 0]).to_string(), "{a0, a2}");
        assert_eq!(Dependency::none().to_string(), "{}");
    }
}
