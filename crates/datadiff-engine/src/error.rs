//! Error types for the diff engine.

/// Errors that can occur while building a diff.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The two values have incompatible runtime types.
    #[error("types differ: a={left_type} b={right_type}; values are {left} and {right}")]
    TypeMismatch {
        left_type: String,
        right_type: String,
        left: String,
        right: String,
    },

    /// No diff strategy applies to this type (including single-line strings).
    #[error("diff not implemented for {0}")]
    NotImplementedForType(String),

    /// An element has no stable equality surrogate.
    #[error("not a hashable type (and it needs to be, for its parent diff): {0}")]
    Unhashable(String),

    /// The values nest deeper than the configured limit.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

/// Convenience alias for engine results.
pub type Result<T, E = DiffError> = std::result::Result<T, E>;
