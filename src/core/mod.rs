//! Core value types shared by every part of the interpreter.
//!
//! This module contains plain data with no side effects:
//! - Canonical control stimuli and their text form
//! - Hint modes and projected hint views
//! - Bounded mode change history

mod hint;
mod history;
mod stimulus;

pub use hint::{ControlHint, Hint, HintMode, HintSink, HintView, Label, TransitionHint};
pub use history::{ModeChange, ModeHistory};
pub use stimulus::{
    ControlStimulus, Device, Modifier, Phase, SpatialQualifier, StimulusParseError, DOUBLE_CLICK,
    POINTER_MOVE, SCROLL,
};
