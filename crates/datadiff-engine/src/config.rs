use serde::{Deserialize, Serialize};

/// The sequence alignment algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Classic longest-common-subsequence alignment.
    #[default]
    Lcs,
    /// Myers' O(ND) algorithm.
    Myers,
    /// Patience diff.
    Patience,
}

/// Configuration for the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Number of unchanged items kept around each change, and the number of
    /// equal entries shown for mappings and sets.
    pub context: usize,
    /// Maximum nesting depth for recursive diffing and surrogate
    /// construction.
    pub max_depth: usize,
    /// Algorithm used to align sequences and lines.
    pub algorithm: Alignment,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context: 3,
            max_depth: 128,
            algorithm: Alignment::Lcs,
        }
    }
}

impl DiffConfig {
    /// Replace the context size.
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    /// Replace the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the alignment algorithm.
    pub fn with_algorithm(mut self, algorithm: Alignment) -> Self {
        self.algorithm = algorithm;
        self
    }
}
