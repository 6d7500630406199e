//! Hint projection over the active contexts.

use crate::core::{ControlHint, HintMode, HintView};
use crate::definition::State;

/// Compute the hint view from the current states of the active contexts,
/// listed outermost first.
///
/// The innermost context whose hint mode is not `Inherit` decides what is
/// shown: `None` suppresses the panel entirely, `Show` supplies the label
/// and help text. Controls are the labelled transitions of every active
/// context, outermost first, in declaration order.
pub fn project(contexts: &[&State]) -> HintView {
    let displaying = contexts
        .iter()
        .rev()
        .map(|state| state.hint_mode())
        .find(|mode| !mode.is_inherit());

    let (label, help_text) = match displaying {
        Some(HintMode::None) => return HintView::default(),
        Some(HintMode::Show(hint)) => (hint.label.clone(), hint.help_text.clone()),
        Some(HintMode::Inherit) | None => (None, None),
    };

    let description = contexts
        .iter()
        .rev()
        .find_map(|state| state.description())
        .map(str::to_string);

    let controls = contexts
        .iter()
        .flat_map(|state| state.transitions())
        .filter_map(|transition| {
            let hint = transition.hint();
            Some(ControlHint {
                label: hint.label.clone()?,
                help_text: hint.help_text.clone(),
                stimuli: transition.stimuli().iter().map(ToString::to_string).collect(),
            })
        })
        .collect();

    HintView {
        label,
        help_text,
        description,
        controls,
    }
}
