//! The running state tree.
//!
//! - [`Interpreter`]: owns the instance tree, dispatches stimuli, records
//!   history and emits hints
//! - [`MachineInstance`]: one live activation of a machine definition
//! - [`project`]: computes the hint view from the active contexts

mod instance;
mod interpreter;
mod projector;

pub use instance::MachineInstance;
pub use interpreter::{ActiveState, DispatchOutcome, Interpreter};
pub use projector::project;
