//! Flat name -> callback lookup table.

use super::error::ActionError;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Type alias for stored action callbacks.
pub type ActionFn = Arc<dyn Fn() -> Result<(), ActionError> + Send + Sync>;

/// What happened when an action name was invoked.
#[derive(Clone, Debug, PartialEq)]
pub enum InvokeOutcome {
    /// The callback ran to completion
    Completed,
    /// No callback is registered under this name
    Missing,
    /// The callback failed or panicked; the failure was swallowed
    Failed(ActionError),
}

/// Registry of host callbacks keyed by dotted action name.
///
/// Registration happens at setup time, before the interpreter starts. The
/// registry is then shared read-only (typically behind an `Arc`).
///
/// # Example
///
/// ```rust
/// use modeset::actions::{ActionRegistry, InvokeOutcome};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let zooms = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&zooms);
///
/// let mut registry = ActionRegistry::new();
/// registry.register("cam.zoom.increase", move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert_eq!(registry.invoke("cam.zoom.increase"), InvokeOutcome::Completed);
/// assert_eq!(registry.invoke("cam.zoom.unknown"), InvokeOutcome::Missing);
/// assert_eq!(zooms.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, ActionFn>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible callback, replacing any previous one with the
    /// same name.
    pub fn register<F>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.insert(
            name.into(),
            Arc::new(move || {
                action();
                Ok(())
            }),
        );
        self
    }

    /// Register a callback that may report a failure.
    pub fn register_fallible<F, E>(&mut self, name: impl Into<String>, action: F) -> &mut Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.actions.insert(
            name.into(),
            Arc::new(move || action().map_err(|e| ActionError::Failed(e.to_string()))),
        );
        self
    }

    /// Remove a callback. Returns whether one was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.actions.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the callback registered under `name`.
    ///
    /// Unknown names are a no-op. Errors and panics are caught, logged and
    /// returned as [`InvokeOutcome::Failed`]; nothing propagates.
    pub fn invoke(&self, name: &str) -> InvokeOutcome {
        let Some(action) = self.actions.get(name) else {
            tracing::trace!(action = name, "no callback registered, ignoring");
            return InvokeOutcome::Missing;
        };

        let result = catch_unwind(AssertUnwindSafe(|| action()))
            .unwrap_or_else(|payload| Err(ActionError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(()) => InvokeOutcome::Completed,
            Err(error) => {
                tracing::warn!(action = name, error = %error, "action failed, continuing");
                InvokeOutcome::Failed(error)
            }
        }
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
