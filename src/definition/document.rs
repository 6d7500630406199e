//! JSON definition documents.
//!
//! A document names every machine and lets states reference sub-machines by
//! name, so one machine (a camera controller, say) can be shared by many
//! states. Loading resolves the names, rejects cycles, and validates every
//! machine before anything can be instantiated.
//!
//! ```json
//! {
//!   "root": "modeler",
//!   "machines": {
//!     "modeler": {
//!       "start": "idle",
//!       "states": {
//!         "idle":  { "transitions": [ { "to": "panic", "on": ["esc:down"] } ] },
//!         "panic": { "transitions": [ { "to": "idle",  "on": ["esc:up"] } ] }
//!       }
//!     }
//!   }
//! }
//! ```

use super::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
use super::error::{DefinitionError, DefinitionViolation};
use super::machine::MachineDefinition;
use crate::config::Config;
use crate::core::{HintMode, Label};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Top-level document: a root machine name and every machine by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionDocument {
    pub root: String,
    pub machines: BTreeMap<String, MachineDoc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDoc {
    pub start: String,
    pub states: BTreeMap<String, StateDoc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDoc {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enter: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exit: Vec<String>,
    /// Names of machines instantiated when the state is entered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_machines: Vec<String>,
    #[serde(default)]
    pub hint: HintMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Matched in the order written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<TransitionDoc>,
}

/// Exactly one of `to` and `action` must be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub also: Vec<String>,
    #[serde(default)]
    pub on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Validated, resolved set of machine definitions.
#[derive(Clone, Debug)]
pub struct DefinitionSet {
    root: Arc<MachineDefinition>,
    machines: BTreeMap<String, Arc<MachineDefinition>>,
}

impl DefinitionSet {
    /// Parse and load a JSON document with default limits.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Self::from_json_with_config(json, &Config::default())
    }

    pub fn from_json_with_config(json: &str, config: &Config) -> Result<Self, DefinitionError> {
        let document: DefinitionDocument = serde_json::from_str(json)?;
        Self::from_document(&document, config)
    }

    /// Resolve and validate every machine of a document.
    ///
    /// All violations across all machines are reported together.
    pub fn from_document(
        document: &DefinitionDocument,
        config: &Config,
    ) -> Result<Self, DefinitionError> {
        let mut resolver = Resolver {
            docs: &document.machines,
            max_depth: config.max_depth,
            built: BTreeMap::new(),
            failed: BTreeSet::new(),
            visiting: Vec::new(),
            violations: Vec::new(),
        };

        for name in document.machines.keys() {
            resolver.resolve(name);
        }

        let root = resolver.built.get(&document.root).cloned();
        if !document.machines.contains_key(&document.root) {
            resolver.violations.push(DefinitionViolation::UnknownRoot {
                root: document.root.clone(),
            });
        }

        match root {
            Some(root) if resolver.violations.is_empty() => Ok(Self {
                root,
                machines: resolver.built,
            }),
            _ => Err(DefinitionError::Invalid {
                violations: resolver.violations,
            }),
        }
    }

    /// The machine the interpreter starts.
    pub fn root(&self) -> &Arc<MachineDefinition> {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&Arc<MachineDefinition>> {
        self.machines.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.machines.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

/// Depth-first builder that resolves sub-machine names bottom-up.
struct Resolver<'a> {
    docs: &'a BTreeMap<String, MachineDoc>,
    max_depth: usize,
    built: BTreeMap<String, Arc<MachineDefinition>>,
    failed: BTreeSet<String>,
    visiting: Vec<String>,
    violations: Vec<DefinitionViolation>,
}

impl Resolver<'_> {
    fn resolve(&mut self, name: &str) -> Option<Arc<MachineDefinition>> {
        if let Some(machine) = self.built.get(name) {
            return Some(Arc::clone(machine));
        }
        if self.failed.contains(name) {
            return None;
        }
        if let Some(pos) = self.visiting.iter().position(|v| v == name) {
            let mut cycle = self.visiting[pos..].to_vec();
            cycle.push(name.to_string());
            self.violations
                .push(DefinitionViolation::CyclicSubMachine { cycle });
            return None;
        }
        let doc = self.docs.get(name)?;

        self.visiting.push(name.to_string());
        let builder = self.machine_builder(name, doc);
        self.visiting.pop();

        let result = builder.and_then(|builder| match builder.build() {
            Ok(machine) => Some(machine),
            Err(error) => {
                self.violations.extend(error.violations().iter().cloned());
                None
            }
        });

        match &result {
            Some(machine) => {
                self.built.insert(name.to_string(), Arc::clone(machine));
            }
            None => {
                self.failed.insert(name.to_string());
            }
        }
        result
    }

    /// Translate a document machine, resolving its sub-machines first.
    /// Returns `None` if any sub-machine failed to resolve.
    fn machine_builder(&mut self, name: &str, doc: &MachineDoc) -> Option<MachineBuilder> {
        let mut ok = true;
        let mut builder = MachineBuilder::new(name)
            .start(doc.start.as_str())
            .max_depth(self.max_depth);

        for (state_id, state_doc) in &doc.states {
            let mut state = StateBuilder::new(state_id.as_str()).hint_mode(state_doc.hint.clone());
            if let Some(description) = &state_doc.description {
                state = state.description(description.as_str());
            }
            for action in &state_doc.enter {
                state = state.enter(action.as_str());
            }
            for action in &state_doc.exit {
                state = state.exit(action.as_str());
            }

            for sub_name in &state_doc.sub_machines {
                if !self.docs.contains_key(sub_name) {
                    self.violations.push(DefinitionViolation::UnknownSubMachine {
                        machine: name.to_string(),
                        state: state_id.clone(),
                        sub_machine: sub_name.clone(),
                    });
                    ok = false;
                    continue;
                }
                match self.resolve(sub_name) {
                    Some(sub) => state = state.sub_machine(sub),
                    None => ok = false,
                }
            }

            for (index, transition_doc) in state_doc.transitions.iter().enumerate() {
                let base = match (&transition_doc.to, &transition_doc.action) {
                    (Some(target), None) => TransitionBuilder::to(target.as_str()),
                    (None, Some(action)) => TransitionBuilder::action(action.as_str()),
                    _ => {
                        self.violations
                            .push(DefinitionViolation::AmbiguousTransition {
                                machine: name.to_string(),
                                state: state_id.clone(),
                                index,
                            });
                        ok = false;
                        continue;
                    }
                };
                let mut transition = transition_doc
                    .also
                    .iter()
                    .fold(base, |t, a| t.also(a.as_str()))
                    .on_any(transition_doc.on.iter().map(String::as_str));
                if let Some((category, action)) = &transition_doc.label {
                    transition = transition.label(category.as_str(), action.as_str());
                }
                if let Some(help) = &transition_doc.help {
                    transition = transition.help(help.as_str());
                }
                state = state.transition(transition);
            }

            builder = builder.state(state);
        }

        ok.then_some(builder)
    }
}
