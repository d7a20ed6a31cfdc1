//! Model reconstruction trail
//!
//! The trail records every simplification step applied to a formula set so
//! that a model of the simplified formulas can later be turned into a model
//! of the original ones.
//!
//! ## Entries
//!
//! - **Rigid substitutions** stay valid whatever happens later. Formulas
//!   replayed through the trail are rewritten by them.
//! - **Loose substitutions** and **removals** are only sound while the
//!   variables they eliminated stay out of the working set. If a replayed
//!   formula mentions one of those variables, the entry is deactivated and
//!   the formulas it removed are handed back.
//! - **Hide** entries mark auxiliary variables to drop from final models.
//!
//! Entries are never physically removed except by popping the scope they were
//! appended in. Deactivation goes through the undo log, so `pop` restores it.

pub mod entry;
pub mod scope;
pub mod stats;


pub use entry::{EntryKind, TrailEntry, TrailEntryDisplay};
pub use scope::{Undo, UndoLog};
pub use stats::TrailStats;

use crate::config::TrailConfig;
use crate::error::{Result, TrailError};
use crate::logic::{
    collect_free_vars, free_vars, Dependency, DependentExpr, Interner, TermStore, VariableId,
};
use crate::model_converter::ModelConverter;
use crate::substitution::{Replacer, Substitution};
use std::collections::HashMap;
use std::fmt;

/// Chronological, backtrackable log of simplification steps
#[derive(Debug, Clone, Default)]
pub struct Trail {
    entries: Vec<TrailEntry>,
    undo: UndoLog,
    config: TrailConfig,
    stats: TrailStats,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrailConfig) -> Self {
        Trail {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn stats(&self) -> &TrailStats {
        &self.stats
    }

    // === Recording steps ===

    /// Record a new simplification step
    pub fn append(&mut self, entry: TrailEntry) {
        self.undo.record(Undo::Append);
        self.entries.push(entry);
    }

    pub fn add_rigid(&mut self, subst: Substitution) {
        self.append(TrailEntry::rigid(subst));
    }

    pub fn add_loose(&mut self, subst: Substitution, removed: Vec<DependentExpr>) {
        self.append(TrailEntry::loose(subst, removed));
    }

    pub fn add_removal(&mut self, vars: Vec<VariableId>, removed: Vec<DependentExpr>) {
        self.append(TrailEntry::removal(vars, removed));
    }

    pub fn hide(&mut self, var: VariableId) {
        self.append(TrailEntry::hide(var));
    }

    // === Scopes ===

    pub fn push(&mut self) {
        self.undo.push();
        tracing::trace!(level = self.undo.scope_level(), "trail push");
    }

    /// Close `num_scopes` scopes, reversing every deactivation and append
    /// made inside them.
    pub fn pop(&mut self, num_scopes: usize) -> Result<()> {
        for undo in self.undo.pop(num_scopes)? {
            match undo {
                Undo::Deactivate { entry, was_active } => self.entries[entry].active = was_active,
                Undo::Append => {
                    self.entries.pop();
                }
            }
        }
        tracing::trace!(level = self.undo.scope_level(), entries = self.entries.len(), "trail pop");
        Ok(())
    }

    pub fn scope_level(&self) -> usize {
        self.undo.scope_level()
    }

    // === Queries ===

    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that are still active
    pub fn active_len(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    fn deactivate(&mut self, index: usize) {
        let entry = &mut self.entries[index];
        self.undo.record(Undo::Deactivate {
            entry: index,
            was_active: entry.active,
        });
        entry.active = false;
        self.stats.deactivated += 1;
    }

    // === Replay ===

    /// Integrate a new formula into the working set.
    ///
    /// Returns the formulas the caller must keep: `d` itself (rewritten by
    /// rigid entries) followed by formulas handed back by invalidated loose
    /// entries.
    pub fn replay(&mut self, store: &mut TermStore, d: DependentExpr) -> Vec<DependentExpr> {
        let mut added = Vec::new();
        self.replay_into(store, d, &mut added);
        added
    }

    /// Like [`Trail::replay`], appending to `added`.
    ///
    /// Entries are visited once, oldest first. Variables of handed-back
    /// formulas are only seen by entries later in the walk. Every element
    /// of `added`, including ones present before the call, is rewritten by
    /// the rigid entries that intersect.
    pub fn replay_into(
        &mut self,
        store: &mut TermStore,
        d: DependentExpr,
        added: &mut Vec<DependentExpr>,
    ) {
        self.stats.replays += 1;
        let mut vars = free_vars(store, d.formula);
        added.push(d);

        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            if !entry.active || !entry.intersects(&vars) {
                continue;
            }

            if entry.is_loose() {
                let removed = entry.removed().to_vec();
                for r in &removed {
                    collect_free_vars(store, r.formula, &mut vars);
                }
                tracing::debug!(entry = index, readded = removed.len(), "deactivating loose entry");
                self.stats.readded += removed.len();
                added.extend(removed);
                self.deactivate(index);
                continue;
            }

            if let Some(subst) = entry.substitution() {
                let mut replacer = Replacer::new(subst);
                for d in added.iter_mut() {
                    *d = replacer.apply_dependent(store, d);
                }
                self.stats.rigid_rewrites += 1;
            }
        }
    }

    // === Model conversion ===

    /// Compose the active substitutions into one back-substitution.
    ///
    /// Entries are walked newest first. Each definition is resolved against
    /// everything installed so far, so no definition in the result mentions a
    /// variable the result defines. A variable defined by two active entries
    /// is a trail construction bug and aborts with
    /// [`TrailError::DuplicateDefinition`].
    pub fn model_converter(&self, store: &mut TermStore) -> Result<ModelConverter> {
        let mut resolved = Substitution::new();
        let mut defined_at: HashMap<VariableId, usize> = HashMap::new();
        let mut hidden = Vec::new();

        for (index, entry) in self.entries.iter().enumerate().rev() {
            if !entry.active {
                continue;
            }
            let subst = match &entry.kind {
                EntryKind::Substitution { subst, .. } => subst,
                EntryKind::Hide { var } => {
                    hidden.push(*var);
                    continue;
                }
                EntryKind::Removal { .. } => continue,
            };

            // Against an empty accumulator the replacer returns definitions verbatim.
            let mut bindings = Vec::with_capacity(subst.len());
            {
                let mut replacer = Replacer::new(&resolved);
                for (var, binding) in subst.iter() {
                    let (def, dep) = replacer.apply(store, binding.def);
                    bindings.push((var, def, Dependency::join(&binding.dep, &dep)));
                }
            }

            for (var, def, dep) in bindings {
                if let Some(&newer) = defined_at.get(&var) {
                    return Err(TrailError::DuplicateDefinition {
                        var,
                        older: index,
                        newer,
                    });
                }
                defined_at.insert(var, index);
                resolved.insert(var, def, dep);
            }
        }

        tracing::debug!(
            definitions = resolved.len(),
            hidden = hidden.len(),
            "built model converter"
        );
        Ok(ModelConverter::new(resolved, hidden, self.config))
    }

    pub fn display<'a>(&'a self, store: &'a TermStore, interner: &'a Interner) -> TrailDisplay<'a> {
        TrailDisplay {
            trail: self,
            store,
            interner,
        }
    }
}

/// One line per entry, oldest first
pub struct TrailDisplay<'a> {
    trail: &'a Trail,
    store: &'a TermStore,
    interner: &'a Interner,
}

impl<'a> fmt::Display for TrailDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.trail.entries.iter().enumerate() {
            writeln!(f, "{}: {}", i, entry.display(self.store, self.interner))?;
        }
        Ok(())
    }
}
