//! Accumulating validation of machine drafts.
//!
//! Uses Stillwater's `Validation` so every problem in a definition is
//! reported at once instead of one per load attempt.

use super::builder::{MachineBuilder, TransitionBuilder};
use super::error::DefinitionViolation;
use super::machine::TransitionKind;
use crate::core::ControlStimulus;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of one validation check.
pub(crate) type Check = Validation<(), NonEmptyVec<DefinitionViolation>>;

/// Stimuli of one transition, parsed.
pub(crate) type ParsedStimuli = Vec<ControlStimulus>;

pub(crate) fn require<F>(ok: bool, violation: F) -> Check
where
    F: FnOnce() -> DefinitionViolation,
{
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Combine checks, keeping ALL failures.
pub(crate) fn combine(checks: Vec<Check>) -> Result<(), Vec<DefinitionViolation>> {
    if checks.is_empty() {
        return Ok(());
    }
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

/// Validate a machine draft and parse its stimuli.
///
/// On success returns, per state and per transition, the parsed stimuli in
/// declaration order.
pub(crate) fn validate_machine(
    draft: &MachineBuilder,
    max_depth: usize,
) -> Result<Vec<Vec<ParsedStimuli>>, Vec<DefinitionViolation>> {
    let machine = draft.name.as_str();
    let ids: BTreeSet<&str> = draft.states.iter().map(|s| s.id.as_str()).collect();
    let mut checks = Vec::new();

    checks.push(require(!draft.states.is_empty(), || {
        DefinitionViolation::NoStates {
            machine: machine.to_string(),
        }
    }));

    match &draft.start {
        None => checks.push(Validation::fail(DefinitionViolation::MissingStart {
            machine: machine.to_string(),
        })),
        Some(start) if !draft.states.is_empty() => {
            checks.push(require(ids.contains(start.as_str()), || {
                DefinitionViolation::UnknownStart {
                    machine: machine.to_string(),
                    start: start.clone(),
                }
            }))
        }
        Some(_) => {}
    }

    checks.extend(duplicate_states(draft));

    let mut parsed = Vec::with_capacity(draft.states.len());
    for state in &draft.states {
        let mut per_state = Vec::with_capacity(state.transitions.len());
        for transition in &state.transitions {
            let (stimuli, stimulus_checks) = parse_stimuli(machine, &state.id, transition);
            checks.extend(stimulus_checks);
            checks.push(transition_target(machine, &state.id, transition, &ids));
            per_state.push(stimuli);
        }
        parsed.push(per_state);
    }

    let depth = 1 + draft
        .states
        .iter()
        .flat_map(|s| s.sub_machines.iter())
        .map(|m| m.depth())
        .max()
        .unwrap_or(0);
    checks.push(require(depth <= max_depth, || DefinitionViolation::TooDeep {
        machine: machine.to_string(),
        depth,
        max: max_depth,
    }));

    combine(checks).map(|()| parsed)
}

fn duplicate_states(draft: &MachineBuilder) -> Vec<Check> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut checks = Vec::new();
    for state in &draft.states {
        let id = state.id.as_str();
        if !seen.insert(id) && reported.insert(id) {
            checks.push(Validation::fail(DefinitionViolation::DuplicateState {
                machine: draft.name.clone(),
                state: id.to_string(),
            }));
        }
    }
    checks
}

fn parse_stimuli(
    machine: &str,
    state: &str,
    transition: &TransitionBuilder,
) -> (ParsedStimuli, Vec<Check>) {
    let mut checks = vec![require(!transition.stimuli.is_empty(), || {
        DefinitionViolation::NoStimuli {
            machine: machine.to_string(),
            state: state.to_string(),
            transition: transition.key(),
        }
    })];

    let mut parsed = Vec::with_capacity(transition.stimuli.len());
    for text in &transition.stimuli {
        match text.parse::<ControlStimulus>() {
            Ok(stimulus) => parsed.push(stimulus),
            Err(error) => checks.push(Validation::fail(DefinitionViolation::BadStimulus {
                machine: machine.to_string(),
                state: state.to_string(),
                text: text.clone(),
                error,
            })),
        }
    }
    (parsed, checks)
}

fn transition_target(
    machine: &str,
    state: &str,
    transition: &TransitionBuilder,
    ids: &BTreeSet<&str>,
) -> Check {
    match &transition.kind {
        TransitionKind::Arrow { target, .. } => require(ids.contains(target.as_str()), || {
            DefinitionViolation::DanglingTarget {
                machine: machine.to_string(),
                state: state.to_string(),
                target: target.clone(),
            }
        }),
        TransitionKind::Action { .. } => Validation::success(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_accumulates_all_failures() {
        let checks = vec![
            require(false, || DefinitionViolation::NoStates {
                machine: "a".into(),
            }),
            require(true, || DefinitionViolation::NoStates {
                machine: "b".into(),
            }),
            require(false, || DefinitionViolation::UnknownRoot { root: "c".into() }),
        ];

        let violations = combine(checks).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .any(|v| matches!(v, DefinitionViolation::NoStates { .. })));
        assert!(violations
            .iter()
            .any(|v| matches!(v, DefinitionViolation::UnknownRoot { .. })));
    }

    #[test]
    fn combine_succeeds_when_all_pass() {
        let checks = vec![
            require(true, || DefinitionViolation::UnknownRoot { root: "x".into() }),
            Validation::success(()),
        ];
        assert!(combine(checks).is_ok());
        assert!(combine(Vec::new()).is_ok());
    }
}
