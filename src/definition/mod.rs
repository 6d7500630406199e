//! Machine definitions: immutable, validated descriptions of state machines.
//!
//! Definitions are built either in code with [`MachineBuilder`] or loaded
//! from a JSON [`DefinitionDocument`] through [`DefinitionSet`]. Both paths
//! validate everything up front, so the runtime never meets a dangling
//! target or an unknown start state.

mod builder;
mod document;
mod error;
mod machine;
mod validation;

pub use builder::{MachineBuilder, StateBuilder, TransitionBuilder};
pub use document::{DefinitionDocument, DefinitionSet, MachineDoc, StateDoc, TransitionDoc};
pub use error::{DefinitionError, DefinitionViolation};
pub use machine::{ActionName, MachineDefinition, State, StateId, Transition, TransitionKind};
