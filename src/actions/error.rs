//! Action failure types.

use thiserror::Error;

/// Failure reported by (or caught around) an action callback.
///
/// These never propagate out of the interpreter; they are logged and
/// reported through [`InvokeOutcome`](super::InvokeOutcome).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    /// The callback returned an error
    #[error("Action failed: {0}")]
    Failed(String),

    /// The callback panicked
    #[error("Action panicked: {0}")]
    Panicked(String),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
