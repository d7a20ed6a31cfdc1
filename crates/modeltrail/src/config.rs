//! Trail configuration types.

/// Configuration for a model reconstruction trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailConfig {
    /// Give unassigned variables a default value (`false` or `0`, by
    /// position) when evaluating definitions instead of failing
    pub model_completion: bool,
    /// Keep variables introduced by simplification (hidden entries) in
    /// reconstructed models
    pub keep_hidden: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailConfig {
            model_completion: true,
            keep_hidden: false,
        }
    }
}
