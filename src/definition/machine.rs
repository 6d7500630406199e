//! Immutable machine definition records.
//!
//! Definitions are produced by [`MachineBuilder`](super::MachineBuilder) or
//! [`DefinitionSet`](super::DefinitionSet), both of which validate them, so
//! every value of these types is well formed: the start state exists, every
//! arrow target resolves, and sub-machine nesting is finite.

use crate::core::{ControlStimulus, HintMode, TransitionHint};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Identifier of a state within one machine definition.
pub type StateId = String;

/// Dotted name of a registered action, e.g. `cam.rotate.run`.
pub type ActionName = String;

/// What a transition does when it fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Mode change to another state of the same machine.
    Arrow {
        target: StateId,
        /// Extra actions fired between the exit and enter actions.
        also: Vec<ActionName>,
    },
    /// Fire an action without leaving the state (self-loop).
    Action {
        action: ActionName,
        /// Extra actions fired right after `action`.
        also: Vec<ActionName>,
    },
}

/// One entry in a state's ordered transition list.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub(crate) kind: TransitionKind,
    pub(crate) stimuli: Vec<ControlStimulus>,
    pub(crate) hint: TransitionHint,
    /// Resolved index of the arrow target in the owning definition.
    pub(crate) target_index: Option<usize>,
}

impl Transition {
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    /// Target state id, `None` for bare-action transitions.
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            TransitionKind::Arrow { target, .. } => Some(target),
            TransitionKind::Action { .. } => None,
        }
    }

    pub fn stimuli(&self) -> &[ControlStimulus] {
        &self.stimuli
    }

    pub fn hint(&self) -> &TransitionHint {
        &self.hint
    }

    /// Check whether any of this transition's patterns matches the stimulus.
    pub fn matches(&self, stimulus: &ControlStimulus) -> bool {
        self.stimuli.iter().any(|pattern| pattern.matches(stimulus))
    }

    /// Key as written in the source format: `-> target` or the action name.
    pub fn key(&self) -> String {
        match &self.kind {
            TransitionKind::Arrow { target, .. } => format!("-> {target}"),
            TransitionKind::Action { action, .. } => action.clone(),
        }
    }
}

/// One state of a machine.
#[derive(Clone, Debug)]
pub struct State {
    pub(crate) id: StateId,
    pub(crate) enter: Vec<ActionName>,
    pub(crate) exit: Vec<ActionName>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) sub_machines: Vec<Arc<MachineDefinition>>,
    pub(crate) hint_mode: HintMode,
    pub(crate) description: Option<String>,
}

impl State {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn enter_actions(&self) -> &[ActionName] {
        &self.enter
    }

    pub fn exit_actions(&self) -> &[ActionName] {
        &self.exit
    }

    /// Transitions in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Machines instantiated fresh every time this state is entered.
    pub fn sub_machines(&self) -> &[Arc<MachineDefinition>] {
        &self.sub_machines
    }

    pub fn hint_mode(&self) -> &HintMode {
        &self.hint_mode
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// First transition, in declaration order, matching the stimulus.
    pub fn find_transition(&self, stimulus: &ControlStimulus) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.matches(stimulus))
    }
}

/// Declarative description of one state machine.
///
/// Shared through `Arc` and never mutated after construction.
#[derive(Debug)]
pub struct MachineDefinition {
    pub(crate) name: String,
    pub(crate) start: usize,
    pub(crate) states: Vec<State>,
}

impl MachineDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_id(&self) -> &str {
        &self.states[self.start].id
    }

    pub fn start_state(&self) -> &State {
        &self.states[self.start]
    }

    pub(crate) fn start_index(&self) -> usize {
        self.start
    }

    /// States in declaration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub(crate) fn state_at(&self, index: usize) -> &State {
        &self.states[index]
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.state(id).is_some()
    }

    /// Nesting depth: 1 for a machine without sub-machines.
    pub fn depth(&self) -> usize {
        1 + self
            .states
            .iter()
            .flat_map(|s| s.sub_machines.iter())
            .map(|m| m.depth())
            .max()
            .unwrap_or(0)
    }

    /// Every action name referenced by this machine and its sub-machines.
    pub fn action_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_actions(&mut names);
        names
    }

    fn collect_actions<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        for state in &self.states {
            names.extend(state.enter.iter().map(String::as_str));
            names.extend(state.exit.iter().map(String::as_str));
            for transition in &state.transitions {
                match &transition.kind {
                    TransitionKind::Arrow { also, .. } => {
                        names.extend(also.iter().map(String::as_str))
                    }
                    TransitionKind::Action { action, also } => {
                        names.insert(action.as_str());
                        names.extend(also.iter().map(String::as_str));
                    }
                }
            }
            for sub in &state.sub_machines {
                sub.collect_actions(names);
            }
        }
    }
}
