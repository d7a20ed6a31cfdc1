//! Counters collected while replaying formulas through the trail

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailStats {
    /// Calls to `replay`
    pub replays: usize,
    /// Removed formulas returned to the working set
    pub readded: usize,
    /// Loose entries invalidated
    pub deactivated: usize,
    /// Rigid substitutions applied to replayed formulas
    pub rigid_rewrites: usize,
}
