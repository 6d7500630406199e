//! Named action callbacks.
//!
//! Machine definitions refer to host functionality (geometry edits, camera
//! moves, rendering toggles) only by dotted names such as
//! `vertex.translate.run`. The host registers a callback per name in an
//! [`ActionRegistry`]; the interpreter calls [`ActionRegistry::invoke`] and
//! nothing else.
//!
//! Invocation never fails from the caller's point of view: unknown names are
//! ignored, and errors or panics raised by a callback are logged and
//! swallowed so a faulty action cannot corrupt the machine state.

mod error;
mod registry;

pub use error::ActionError;
pub use registry::{ActionFn, ActionRegistry, InvokeOutcome};
