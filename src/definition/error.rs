//! Load-time definition errors.

use crate::core::StimulusParseError;
use thiserror::Error;

/// A single problem found while validating a machine definition.
///
/// Validation collects every violation in one pass rather than stopping at
/// the first.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionViolation {
    #[error("machine '{machine}' has no states")]
    NoStates { machine: String },

    #[error("machine '{machine}' has no start state. Call .start(id) before .build()")]
    MissingStart { machine: String },

    #[error("machine '{machine}' starts in unknown state '{start}'")]
    UnknownStart { machine: String, start: String },

    #[error("machine '{machine}' declares state '{state}' more than once")]
    DuplicateState { machine: String, state: String },

    #[error("machine '{machine}', state '{state}': transition targets unknown state '{target}'")]
    DanglingTarget {
        machine: String,
        state: String,
        target: String,
    },

    #[error("machine '{machine}', state '{state}': bad stimulus '{text}': {error}")]
    BadStimulus {
        machine: String,
        state: String,
        text: String,
        error: StimulusParseError,
    },

    #[error("machine '{machine}', state '{state}': transition '{transition}' has no stimuli")]
    NoStimuli {
        machine: String,
        state: String,
        transition: String,
    },

    #[error(
        "machine '{machine}', state '{state}': transition #{index} must set exactly one of 'to' or 'action'"
    )]
    AmbiguousTransition {
        machine: String,
        state: String,
        index: usize,
    },

    #[error("machine '{machine}', state '{state}': unknown sub-machine '{sub_machine}'")]
    UnknownSubMachine {
        machine: String,
        state: String,
        sub_machine: String,
    },

    #[error("cyclic sub-machine reference: {}", .cycle.join(" -> "))]
    CyclicSubMachine { cycle: Vec<String> },

    #[error("machine '{machine}' nests {depth} levels deep (limit {max})")]
    TooDeep {
        machine: String,
        depth: usize,
        max: usize,
    },

    #[error("root machine '{root}' is not defined")]
    UnknownRoot { root: String },
}

/// Errors that prevent a definition from being loaded.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid machine definition ({} violation(s)): {}", .violations.len(), join(.violations))]
    Invalid { violations: Vec<DefinitionViolation> },

    #[error("malformed definition document: {0}")]
    Json(#[from] serde_json::Error),
}

impl DefinitionError {
    /// The violations, if this is a validation failure.
    pub fn violations(&self) -> &[DefinitionViolation] {
        match self {
            Self::Invalid { violations } => violations,
            Self::Json(_) => &[],
        }
    }
}

fn join(violations: &[DefinitionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
