use thiserror::Error;

/// A failed equality assertion. The message is either the caller's, a
/// rendered diff (prefixed with a newline), or `<first> != <second>`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    pub message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
