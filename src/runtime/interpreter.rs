//! Stimulus dispatch over the instance tree.

use super::instance::MachineInstance;
use super::projector;
use crate::actions::ActionRegistry;
use crate::config::Config;
use crate::core::{ControlStimulus, HintSink, HintView, ModeChange, ModeHistory};
use crate::definition::{MachineDefinition, TransitionKind};
use crate::input::{HitTest, Normalizer, RawEvent};
use chrono::Utc;
use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, trace};

/// What a dispatch did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No active context had a matching transition
    Dropped,
    /// A bare-action transition fired; no state changed
    Fired {
        machine: String,
        state: String,
        action: String,
    },
    /// An arrow transition moved one instance
    Moved {
        machine: String,
        from: String,
        to: String,
    },
}

/// Snapshot of one active context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveState {
    /// Nesting depth, 0 for the root
    pub depth: usize,
    pub machine: String,
    pub state: String,
}

/// Transition chosen for a stimulus, located without borrowing the tree.
struct Selected {
    path: Vec<usize>,
    definition: Arc<MachineDefinition>,
    state: usize,
    transition: usize,
}

/// Runs a root machine and its sub-machine tree.
///
/// The interpreter exclusively owns the instance tree. Each call to
/// [`dispatch`](Self::dispatch) runs to completion: it selects at most one
/// transition, fires its actions, and emits the hint view.
///
/// # Example
///
/// ```rust
/// use modeset::actions::ActionRegistry;
/// use modeset::core::ControlStimulus;
/// use modeset::definition::{MachineBuilder, StateBuilder};
/// use modeset::runtime::{DispatchOutcome, Interpreter};
/// use std::sync::Arc;
///
/// let root = MachineBuilder::new("modeler")
///     .start("idle")
///     .state(StateBuilder::new("idle").goto("panic", ["esc:down"]))
///     .state(StateBuilder::new("panic").goto("idle", ["esc:up"]))
///     .build()
///     .unwrap();
///
/// let mut interpreter = Interpreter::start(root, Arc::new(ActionRegistry::new()));
/// let esc: ControlStimulus = "esc:down".parse().unwrap();
///
/// assert!(matches!(interpreter.dispatch(&esc), DispatchOutcome::Moved { .. }));
/// assert_eq!(interpreter.current_state("modeler"), Some("panic"));
/// ```
pub struct Interpreter {
    root: MachineInstance,
    registry: Arc<ActionRegistry>,
    normalizer: Normalizer,
    history: ModeHistory,
    hint: HintView,
    sink: Option<Box<dyn HintSink>>,
}

impl Interpreter {
    /// Instantiate `root` at its start state with default configuration.
    pub fn start(root: Arc<MachineDefinition>, registry: Arc<ActionRegistry>) -> Self {
        Self::with_config(root, registry, &Config::default())
    }

    pub fn with_config(
        root: Arc<MachineDefinition>,
        registry: Arc<ActionRegistry>,
        config: &Config,
    ) -> Self {
        let span = debug_span!("start", machine = root.name());
        let _entered = span.enter();

        let root = MachineInstance::start(root, &registry);
        let mut interpreter = Self {
            root,
            registry,
            normalizer: Normalizer::new(),
            history: ModeHistory::with_capacity(config.history_capacity),
            hint: HintView::default(),
            sink: None,
        };
        interpreter.refresh_hint();
        interpreter
    }

    /// Attach the hint sink. It immediately receives the current view.
    pub fn with_sink(mut self, sink: impl HintSink + 'static) -> Self {
        let mut sink: Box<dyn HintSink> = Box::new(sink);
        sink.show(&self.hint);
        self.sink = Some(sink);
        self
    }

    /// Replace the normalizer used by [`feed`](Self::feed).
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Normalize a raw host event and dispatch it.
    ///
    /// Events that carry no stimulus are dropped without dispatching.
    pub fn feed(&mut self, event: &RawEvent, hit: Option<HitTest>) -> DispatchOutcome {
        match self.normalizer.normalize(event, hit) {
            Some(stimulus) => self.dispatch(&stimulus),
            None => {
                trace!(?event, "raw event carries no stimulus");
                DispatchOutcome::Dropped
            }
        }
    }

    /// Deliver one stimulus.
    ///
    /// Contexts are tried most nested first; the first matching transition
    /// in the first context that has one fires. Unmatched stimuli change
    /// nothing.
    pub fn dispatch(&mut self, stimulus: &ControlStimulus) -> DispatchOutcome {
        let span = debug_span!("dispatch", %stimulus);
        let _entered = span.enter();

        let outcome = match self.select(stimulus) {
            Some(selected) => self.apply(selected, stimulus),
            None => {
                trace!("no active context matched, dropped");
                DispatchOutcome::Dropped
            }
        };

        if let Some(sink) = self.sink.as_mut() {
            sink.show(&self.hint);
        }
        outcome
    }

    fn select(&self, stimulus: &ControlStimulus) -> Option<Selected> {
        let mut contexts = self.root.walk();
        // stable: equal depths keep pre-order
        contexts.sort_by_key(|(path, _)| Reverse(path.len()));

        contexts.into_iter().find_map(|(path, instance)| {
            let state = instance.current_state();
            let transition = state
                .transitions()
                .iter()
                .position(|t| t.matches(stimulus))?;
            Some(Selected {
                path,
                definition: Arc::clone(instance.definition()),
                state: instance.current_index(),
                transition,
            })
        })
    }

    fn apply(&mut self, selected: Selected, stimulus: &ControlStimulus) -> DispatchOutcome {
        let definition = &selected.definition;
        let state = definition.state_at(selected.state);
        let transition = &state.transitions()[selected.transition];

        match transition.kind() {
            TransitionKind::Action { action, also } => {
                debug!(machine = definition.name(), state = state.id(), action = %action, "bare action");
                self.registry.invoke(action);
                for extra in also {
                    self.registry.invoke(extra);
                }
                DispatchOutcome::Fired {
                    machine: definition.name().to_string(),
                    state: state.id().to_string(),
                    action: action.clone(),
                }
            }
            TransitionKind::Arrow { also, .. } => {
                // arrow targets are resolved when the definition is built
                let Some(target) = transition.target_index else {
                    return DispatchOutcome::Dropped;
                };
                let Some(instance) = self.root.descendant_mut(&selected.path) else {
                    return DispatchOutcome::Dropped;
                };
                instance.transition_to(target, also, &self.registry);

                let from = state.id().to_string();
                let to = definition.state_at(target).id().to_string();
                debug!(machine = definition.name(), from = %from, to = %to, "mode change");

                self.history.record(ModeChange {
                    machine: definition.name().to_string(),
                    depth: selected.path.len(),
                    from: from.clone(),
                    to: to.clone(),
                    stimulus: stimulus.to_string(),
                    timestamp: Utc::now(),
                });
                self.refresh_hint();

                DispatchOutcome::Moved {
                    machine: definition.name().to_string(),
                    from,
                    to,
                }
            }
        }
    }

    fn refresh_hint(&mut self) {
        let mut contexts = self.root.walk();
        contexts.sort_by_key(|(path, _)| path.len());
        let states: Vec<_> = contexts
            .iter()
            .map(|(_, instance)| instance.current_state())
            .collect();
        self.hint = projector::project(&states);
    }

    /// Current view of the hint panel.
    pub fn hint(&self) -> &HintView {
        &self.hint
    }

    pub fn history(&self) -> &ModeHistory {
        &self.history
    }

    pub fn root(&self) -> &MachineInstance {
        &self.root
    }

    pub fn registry(&self) -> &Arc<ActionRegistry> {
        &self.registry
    }

    /// Every active context in pre-order (parents before children, siblings
    /// in declaration order).
    pub fn active_states(&self) -> Vec<ActiveState> {
        self.root
            .walk()
            .into_iter()
            .map(|(path, instance)| ActiveState {
                depth: path.len(),
                machine: instance.name().to_string(),
                state: instance.current_id().to_string(),
            })
            .collect()
    }

    /// Current state of the first active instance of `machine`, in
    /// pre-order.
    pub fn current_state(&self, machine: &str) -> Option<&str> {
        self.root
            .walk()
            .into_iter()
            .find(|(_, instance)| instance.name() == machine)
            .map(|(_, instance)| instance.current_id())
    }

    /// Tear down the whole tree, firing every active exit action deepest
    /// first.
    pub fn stop(mut self) {
        let _span = debug_span!("stop", machine = self.root.name()).entered();
        self.root.leave(&self.registry);
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("active", &self.active_states())
            .field("registry", &self.registry)
            .field("history", &self.history.len())
            .field("hint", &self.hint)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
