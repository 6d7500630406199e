//! Interaction hint types.
//!
//! States declare how they want the hint panel to look through a
//! [`HintMode`]; transitions may carry a [`TransitionHint`] describing the
//! control that triggers them. The projector in [`crate::runtime`] turns the
//! active state tree into a [`HintView`] for the host UI.

use serde::{Deserialize, Serialize};

/// Two-part label shown for a control, e.g. `("Camera", "Rotate")`.
pub type Label = (String, String);

/// Literal hint content of a state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl Hint {
    pub fn text(help_text: impl Into<String>) -> Self {
        Self {
            label: None,
            help_text: Some(help_text.into()),
        }
    }

    pub fn labelled(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: Some((category.into(), action.into())),
            help_text: None,
        }
    }
}

/// How a state participates in hint display.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintMode {
    /// Show whatever the nearest non-inheriting ancestor shows.
    #[default]
    Inherit,
    /// Suppress the hint panel, even if an ancestor has a hint.
    None,
    /// Show this literal hint.
    Show(Hint),
}

impl HintMode {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }
}

/// Help metadata attached to a transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl TransitionHint {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.help_text.is_none()
    }
}

/// One entry of the control panel: a labelled transition that is currently
/// reachable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlHint {
    pub label: Label,
    pub help_text: Option<String>,
    /// Canonical text of the stimuli that trigger it.
    pub stimuli: Vec<String>,
}

/// What the hint sink receives after every dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintView {
    pub label: Option<Label>,
    pub help_text: Option<String>,
    /// Long-form description of the displaying state, if it has one.
    pub description: Option<String>,
    pub controls: Vec<ControlHint>,
}

impl HintView {
    /// True when nothing should be displayed.
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.help_text.is_none()
            && self.description.is_none()
            && self.controls.is_empty()
    }
}

/// Receiver of projected hints (the host UI).
pub trait HintSink {
    fn show(&mut self, view: &HintView);
}

impl<F> HintSink for F
where
    F: FnMut(&HintView),
{
    fn show(&mut self, view: &HintView) {
        self(view)
    }
}
