//! Mode change history.
//!
//! Keeps a bounded, ordered record of the arrow transitions the interpreter
//! has taken. Useful for diagnostics and for asserting behavior in tests;
//! the interpreter never reads it back to make decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single mode change.
///
/// # Example
///
/// ```rust
/// use modeset::core::ModeChange;
/// use chrono::Utc;
///
/// let change = ModeChange {
///     machine: "camera".to_string(),
///     depth: 2,
///     from: "idle_cam".to_string(),
///     to: "rotate".to_string(),
///     stimulus: "mouse3:down".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(change.machine, "camera");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeChange {
    /// Name of the machine definition whose instance moved
    pub machine: String,
    /// Nesting depth of that instance (root is 0)
    pub depth: usize,
    /// State id being left
    pub from: String,
    /// State id being entered
    pub to: String,
    /// Canonical text of the stimulus that caused it
    pub stimulus: String,
    /// When the change completed
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of mode changes.
///
/// Once `capacity` entries are stored, recording a new change drops the
/// oldest one.
///
/// # Example
///
/// ```rust
/// use modeset::core::{ModeChange, ModeHistory};
/// use chrono::Utc;
///
/// let mut history = ModeHistory::with_capacity(8);
///
/// for (from, to) in [("viewedit", "zoom"), ("zoom", "viewedit")] {
///     history.record(ModeChange {
///         machine: "main".to_string(),
///         depth: 1,
///         from: from.to_string(),
///         to: to.to_string(),
///         stimulus: "z:down".to_string(),
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.path_of("main"), vec!["viewedit", "zoom", "viewedit"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModeHistory {
    capacity: usize,
    changes: VecDeque<ModeChange>,
}

impl Default for ModeHistory {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_HISTORY_CAPACITY)
    }
}

impl ModeHistory {
    /// Create an empty history keeping at most `capacity` changes.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            changes: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Append a change, evicting the oldest entry when full.
    pub fn record(&mut self, change: ModeChange) {
        if self.capacity == 0 {
            return;
        }
        while self.changes.len() >= self.capacity {
            self.changes.pop_front();
        }
        self.changes.push_back(change);
    }

    /// All retained changes, oldest first.
    pub fn changes(&self) -> impl Iterator<Item = &ModeChange> + '_ {
        self.changes.iter()
    }

    /// Most recent change, if any.
    pub fn last(&self) -> Option<&ModeChange> {
        self.changes.back()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget every retained change.
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// States traversed by every instance of one machine definition.
    ///
    /// Returns the `from` state of that machine's first retained change,
    /// then the `to` state of each of its changes.
    pub fn path_of(&self, machine: &str) -> Vec<&str> {
        let mut path = Vec::new();
        let mut changes = self.changes.iter().filter(|c| c.machine == machine);
        if let Some(first) = changes.next() {
            path.push(first.from.as_str());
            path.push(first.to.as_str());
        }
        for change in changes {
            path.push(change.to.as_str());
        }
        path
    }

    /// Time between the oldest and newest retained change.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.changes.front()?, self.changes.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(machine: &str, from: &str, to: &str) -> ModeChange {
        ModeChange {
            machine: machine.to_string(),
            depth: 0,
            from: from.to_string(),
            to: to.to_string(),
            stimulus: "esc:down".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = ModeHistory::with_capacity(4);
        assert!(history.is_empty());
        assert!(history.path_of("root").is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_appends_in_order() {
        let mut history = ModeHistory::with_capacity(4);
        history.record(change("root", "idle", "panic"));
        history.record(change("root", "panic", "idle"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.last().map(|c| c.to.as_str()), Some("idle"));
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = ModeHistory::with_capacity(2);
        history.record(change("root", "a", "b"));
        history.record(change("root", "b", "c"));
        history.record(change("root", "c", "d"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.path_of("root"), vec!["b", "c", "d"]);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = ModeHistory::with_capacity(0);
        history.record(change("root", "a", "b"));
        assert!(history.is_empty());
    }

    #[test]
    fn path_of_filters_by_machine() {
        let mut history = ModeHistory::with_capacity(8);
        history.record(change("main", "viewedit", "zoom"));
        history.record(change("camera", "idle_cam", "rotate"));
        history.record(change("main", "zoom", "viewedit"));

        assert_eq!(history.path_of("main"), vec!["viewedit", "zoom", "viewedit"]);
        assert_eq!(history.path_of("camera"), vec!["idle_cam", "rotate"]);
        assert!(history.path_of("render").is_empty());
    }

    #[test]
    fn duration_measures_retained_span() {
        let mut history = ModeHistory::with_capacity(8);
        history.record(change("root", "a", "b"));
        std::thread::sleep(std::time::Duration::from_millis(10));
        history.record(change("root", "b", "a"));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut history = ModeHistory::with_capacity(8);
        history.record(change("root", "a", "b"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 8);
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = ModeHistory::with_capacity(8);
        history.record(change("root", "a", "b"));

        let json = serde_json::to_string(&history).unwrap();
        let back: ModeHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.capacity(), 8);
    }
}
