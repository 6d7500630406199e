//! Fluent builders for machine definitions.
//!
//! Sub-machines are attached as already-built `Arc<MachineDefinition>`
//! values, so a definition built this way can never reference itself.
//!
//! # Example
//!
//! ```rust
//! use modeset::definition::{MachineBuilder, StateBuilder, TransitionBuilder};
//!
//! let camera = MachineBuilder::new("camera")
//!     .start("idle_cam")
//!     .state(
//!         StateBuilder::new("idle_cam").transition(
//!             TransitionBuilder::to("rotate")
//!                 .on("mouse3:down")
//!                 .label("View", "Rotate"),
//!         ),
//!     )
//!     .state(
//!         StateBuilder::new("rotate")
//!             .enter("cam.rotate.init")
//!             .exit("cam.rotate.finalize")
//!             .fire("cam.rotate.run", ["mousemove"])
//!             .goto("idle_cam", ["mouse3:up"]),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(camera.start_id(), "idle_cam");
//! assert_eq!(camera.depth(), 1);
//! ```

use super::error::DefinitionError;
use super::machine::{ActionName, MachineDefinition, State, StateId, Transition, TransitionKind};
use super::validation;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::core::{Hint, HintMode, TransitionHint};
use std::sync::Arc;

/// Builder for one transition.
#[derive(Clone, Debug)]
pub struct TransitionBuilder {
    pub(crate) kind: TransitionKind,
    pub(crate) stimuli: Vec<String>,
    pub(crate) hint: TransitionHint,
}

impl TransitionBuilder {
    /// Arrow transition to another state of the same machine.
    pub fn to(target: impl Into<StateId>) -> Self {
        Self::with_kind(TransitionKind::Arrow {
            target: target.into(),
            also: Vec::new(),
        })
    }

    /// Bare-action transition firing `action` without leaving the state.
    pub fn action(action: impl Into<ActionName>) -> Self {
        Self::with_kind(TransitionKind::Action {
            action: action.into(),
            also: Vec::new(),
        })
    }

    fn with_kind(kind: TransitionKind) -> Self {
        Self {
            kind,
            stimuli: Vec::new(),
            hint: TransitionHint::default(),
        }
    }

    /// Add a triggering stimulus in canonical text form.
    pub fn on(mut self, stimulus: impl Into<String>) -> Self {
        self.stimuli.push(stimulus.into());
        self
    }

    /// Add several triggering stimuli.
    pub fn on_any<I, T>(mut self, stimuli: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.stimuli.extend(stimuli.into_iter().map(Into::into));
        self
    }

    /// Fire an extra action. Arrows fire it between exit and enter, bare
    /// actions right after their own action.
    pub fn also(mut self, action: impl Into<ActionName>) -> Self {
        match &mut self.kind {
            TransitionKind::Arrow { also, .. } | TransitionKind::Action { also, .. } => {
                also.push(action.into())
            }
        }
        self
    }

    /// Two-part control label, e.g. `("Actions", "Delete")`.
    pub fn label(mut self, category: impl Into<String>, action: impl Into<String>) -> Self {
        self.hint.label = Some((category.into(), action.into()));
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.hint.help_text = Some(text.into());
        self
    }

    pub(crate) fn key(&self) -> String {
        match &self.kind {
            TransitionKind::Arrow { target, .. } => format!("-> {target}"),
            TransitionKind::Action { action, .. } => action.clone(),
        }
    }
}

/// Builder for one state.
#[derive(Clone, Debug)]
pub struct StateBuilder {
    pub(crate) id: StateId,
    pub(crate) enter: Vec<ActionName>,
    pub(crate) exit: Vec<ActionName>,
    pub(crate) transitions: Vec<TransitionBuilder>,
    pub(crate) sub_machines: Vec<Arc<MachineDefinition>>,
    pub(crate) hint_mode: HintMode,
    pub(crate) description: Option<String>,
}

impl StateBuilder {
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            enter: Vec::new(),
            exit: Vec::new(),
            transitions: Vec::new(),
            sub_machines: Vec::new(),
            hint_mode: HintMode::Inherit,
            description: None,
        }
    }

    /// Append an action fired when the state is entered.
    pub fn enter(mut self, action: impl Into<ActionName>) -> Self {
        self.enter.push(action.into());
        self
    }

    /// Append an action fired when the state is left.
    pub fn exit(mut self, action: impl Into<ActionName>) -> Self {
        self.exit.push(action.into());
        self
    }

    /// Append a transition. Declaration order is matching order.
    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Shorthand for an unlabelled arrow transition.
    pub fn goto<I, T>(self, target: impl Into<StateId>, stimuli: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.transition(TransitionBuilder::to(target).on_any(stimuli))
    }

    /// Shorthand for an unlabelled bare-action transition.
    pub fn fire<I, T>(self, action: impl Into<ActionName>, stimuli: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.transition(TransitionBuilder::action(action).on_any(stimuli))
    }

    /// Instantiate `machine` every time this state is entered.
    pub fn sub_machine(mut self, machine: Arc<MachineDefinition>) -> Self {
        self.sub_machines.push(machine);
        self
    }

    pub fn hint_mode(mut self, mode: HintMode) -> Self {
        self.hint_mode = mode;
        self
    }

    /// Suppress the hint panel while this state is the displaying context.
    pub fn no_hint(self) -> Self {
        self.hint_mode(HintMode::None)
    }

    pub fn hint(self, hint: Hint) -> Self {
        self.hint_mode(HintMode::Show(hint))
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

/// Builder for a whole machine definition.
#[derive(Clone, Debug)]
pub struct MachineBuilder {
    pub(crate) name: String,
    pub(crate) start: Option<StateId>,
    pub(crate) states: Vec<StateBuilder>,
    max_depth: usize,
}

impl MachineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            states: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the start state (required).
    pub fn start(mut self, id: impl Into<StateId>) -> Self {
        self.start = Some(id.into());
        self
    }

    pub fn state(mut self, state: StateBuilder) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder>) -> Self {
        self.states.extend(states);
        self
    }

    /// Refuse machines whose sub-machine nesting exceeds `depth`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Validate and build the definition.
    ///
    /// Every violation is reported at once in
    /// [`DefinitionError::Invalid`].
    pub fn build(self) -> Result<Arc<MachineDefinition>, DefinitionError> {
        let parsed = validation::validate_machine(&self, self.max_depth)
            .map_err(|violations| DefinitionError::Invalid { violations })?;

        let index_of = |id: &str| self.states.iter().position(|s| s.id == id);
        // validated above: start and every target resolve
        let start = self.start.as_deref().and_then(index_of).unwrap_or(0);

        let states = self
            .states
            .iter()
            .zip(parsed)
            .map(|(state, stimuli)| State {
                id: state.id.clone(),
                enter: state.enter.clone(),
                exit: state.exit.clone(),
                transitions: state
                    .transitions
                    .iter()
                    .zip(stimuli)
                    .map(|(transition, stimuli)| Transition {
                        target_index: transition_target(&transition.kind).and_then(index_of),
                        kind: transition.kind.clone(),
                        stimuli,
                        hint: transition.hint.clone(),
                    })
                    .collect(),
                sub_machines: state.sub_machines.clone(),
                hint_mode: state.hint_mode.clone(),
                description: state.description.clone(),
            })
            .collect();

        Ok(Arc::new(MachineDefinition {
            name: self.name,
            start,
            states,
        }))
    }
}

fn transition_target(kind: &TransitionKind) -> Option<&str> {
    match kind {
        TransitionKind::Arrow { target, .. } => Some(target),
        TransitionKind::Action { .. } => None,
    }
}
