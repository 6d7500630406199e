//! Live machine instances.

use crate::actions::ActionRegistry;
use crate::definition::{ActionName, MachineDefinition, State};
use std::sync::Arc;

/// One activation of a machine definition.
///
/// Instances form a tree owned by the
/// [`Interpreter`](super::Interpreter): the children are the sub-machines
/// of the current state, created when that state is entered and torn down
/// when it is left. Only the runtime can change an instance.
#[derive(Debug)]
pub struct MachineInstance {
    definition: Arc<MachineDefinition>,
    current: usize,
    children: Vec<MachineInstance>,
}

impl MachineInstance {
    /// Create an instance at the start state, fire its enter actions, then
    /// build its sub-machines outside-in.
    pub(crate) fn start(definition: Arc<MachineDefinition>, registry: &ActionRegistry) -> Self {
        let mut instance = Self {
            current: definition.start_index(),
            definition,
            children: Vec::new(),
        };
        instance.enter_current(registry);
        instance
    }

    pub fn definition(&self) -> &Arc<MachineDefinition> {
        &self.definition
    }

    /// Name of the machine definition.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn current_state(&self) -> &State {
        self.definition.state_at(self.current)
    }

    pub fn current_id(&self) -> &str {
        self.current_state().id()
    }

    /// Sub-machine instances of the current state, in declaration order.
    pub fn children(&self) -> &[MachineInstance] {
        &self.children
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current
    }

    /// Follow a path of child indices from this instance.
    pub fn descendant(&self, path: &[usize]) -> Option<&MachineInstance> {
        path.iter()
            .try_fold(self, |instance, &index| instance.children.get(index))
    }

    pub(crate) fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut MachineInstance> {
        path.iter()
            .try_fold(self, |instance, &index| instance.children.get_mut(index))
    }

    /// Every instance of the tree with its child-index path, in pre-order.
    pub(crate) fn walk(&self) -> Vec<(Vec<usize>, &MachineInstance)> {
        let mut out = Vec::new();
        self.walk_into(&mut Vec::new(), &mut out);
        out
    }

    fn walk_into<'a>(&'a self, path: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, &'a Self)>) {
        out.push((path.clone(), self));
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            child.walk_into(path, out);
            path.pop();
        }
    }

    /// Arrow transition: leave the current state, fire `also`, enter
    /// `target`. A target equal to the current state is left and re-entered.
    pub(crate) fn transition_to(
        &mut self,
        target: usize,
        also: &[ActionName],
        registry: &ActionRegistry,
    ) {
        self.leave(registry);
        for action in also {
            registry.invoke(action);
        }
        self.current = target;
        self.enter_current(registry);
    }

    /// Tear down every descendant (post-order, siblings in declaration
    /// order), then fire the current state's exit actions.
    pub(crate) fn leave(&mut self, registry: &ActionRegistry) {
        for mut child in self.children.drain(..) {
            child.leave(registry);
        }
        for action in self.current_state().exit_actions() {
            registry.invoke(action);
        }
    }

    fn enter_current(&mut self, registry: &ActionRegistry) {
        let definition = Arc::clone(&self.definition);
        let state = definition.state_at(self.current);
        for action in state.enter_actions() {
            registry.invoke(action);
        }
        self.children = state
            .sub_machines()
            .iter()
            .map(|sub| Self::start(Arc::clone(sub), registry))
            .collect();
    }
}
