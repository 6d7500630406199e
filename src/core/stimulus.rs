//! Canonical control stimuli.
//!
//! A [`ControlStimulus`] is the normalized description of one input
//! occurrence: which device produced it, which button/key/command, the press
//! phase, the held modifiers and the spatial context under the pointer.
//! Stimuli are plain values compared by structural equality; they have a
//! canonical text form used by machine definitions:
//!
//! ```text
//! [modifier "+"]* input [":" phase] [" on " qualifier]
//! ```
//!
//! # Example
//!
//! ```rust
//! use modeset::core::{ControlStimulus, Device, Phase, SpatialQualifier};
//!
//! let stimulus: ControlStimulus = "mouse1:down on vertex".parse().unwrap();
//! assert_eq!(stimulus.device, Device::Pointer);
//! assert_eq!(stimulus.phase, Some(Phase::Down));
//! assert_eq!(stimulus.qualifier, Some(SpatialQualifier::Vertex));
//! assert_eq!(stimulus.to_string(), "mouse1:down on vertex");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Input name of pointer motion events.
pub const POINTER_MOVE: &str = "mousemove";

/// Input name of pointer double-click events.
pub const DOUBLE_CLICK: &str = "dblclick";

/// Input name of wheel events.
pub const SCROLL: &str = "scroll";

/// Device class that produced a stimulus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Device {
    Pointer,
    Key,
    Scroll,
    /// Named stimulus issued by the host application (menu entries, toolbar
    /// buttons), e.g. `toggleHand`.
    Command,
}

/// Press phase. For [`Device::Scroll`] this is the wheel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Down,
    Up,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

/// Modifier key held while the stimulus occurred.
///
/// The derived ordering is the canonical rendering order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ctrl => "ctrl",
            Self::Shift => "shift",
            Self::Alt => "alt",
            Self::Meta => "meta",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text {
            "ctrl" | "control" => Some(Self::Ctrl),
            "shift" => Some(Self::Shift),
            "alt" | "option" => Some(Self::Alt),
            "meta" | "cmd" | "super" => Some(Self::Meta),
            _ => None,
        }
    }
}

/// What 3D entity (if any) the pointer is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpatialQualifier {
    Vertex,
    Segment,
    Ring,
    /// Over the scene, but on no entity.
    Background,
    /// Off the previously hovered entity.
    Out,
}

impl SpatialQualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Segment => "segment",
            Self::Ring => "ring",
            Self::Background => "background",
            Self::Out => "out",
        }
    }
}

impl FromStr for SpatialQualifier {
    type Err = StimulusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" => Ok(Self::Vertex),
            "segment" => Ok(Self::Segment),
            "ring" => Ok(Self::Ring),
            "background" => Ok(Self::Background),
            "out" => Ok(Self::Out),
            other => Err(StimulusParseError::UnknownQualifier(other.to_string())),
        }
    }
}

/// Errors produced when parsing the canonical text form of a stimulus.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StimulusParseError {
    #[error("Empty stimulus")]
    Empty,

    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("Unknown phase '{0}' (expected 'down' or 'up')")]
    UnknownPhase(String),

    #[error("Unknown spatial qualifier '{0}'")]
    UnknownQualifier(String),

    #[error("Input '{0}' requires a ':down' or ':up' phase")]
    MissingPhase(String),

    #[error("Input '{0}' does not take a phase")]
    UnexpectedPhase(String),
}

/// One canonical input occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ControlStimulus {
    pub device: Device,
    /// Button, key or command name (`mouse1`, `mousemove`, `z`, `toggleHand`).
    pub input: String,
    pub phase: Option<Phase>,
    pub modifiers: BTreeSet<Modifier>,
    pub qualifier: Option<SpatialQualifier>,
}

impl ControlStimulus {
    /// Pointer button press or release, e.g. `mouse1:down`.
    pub fn button(button: u8, phase: Phase) -> Self {
        Self::bare(Device::Pointer, format!("mouse{button}"), Some(phase))
    }

    /// Pointer motion.
    pub fn pointer_move() -> Self {
        Self::bare(Device::Pointer, POINTER_MOVE.to_string(), None)
    }

    /// Pointer double-click.
    pub fn double_click() -> Self {
        Self::bare(Device::Pointer, DOUBLE_CLICK.to_string(), None)
    }

    /// Wheel motion; `Phase::Up` scrolls up.
    pub fn scroll(direction: Phase) -> Self {
        Self::bare(Device::Scroll, SCROLL.to_string(), Some(direction))
    }

    /// Keyboard key press or release.
    pub fn key(key: impl Into<String>, phase: Phase) -> Self {
        Self::bare(Device::Key, key.into().to_lowercase(), Some(phase))
    }

    /// Named host command.
    pub fn command(name: impl Into<String>) -> Self {
        Self::bare(Device::Command, name.into(), None)
    }

    fn bare(device: Device, input: String, phase: Option<Phase>) -> Self {
        Self {
            device,
            input,
            phase,
            modifiers: BTreeSet::new(),
            qualifier: None,
        }
    }

    /// Add a held modifier.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Attach the spatial context.
    pub fn on(mut self, qualifier: SpatialQualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Check whether this stimulus, used as a transition pattern, matches an
    /// incoming stimulus.
    ///
    /// Everything but the qualifier must be equal. A pattern without a
    /// qualifier matches in any spatial context.
    pub fn matches(&self, incoming: &ControlStimulus) -> bool {
        self.device == incoming.device
            && self.phase == incoming.phase
            && self.input == incoming.input
            && self.modifiers == incoming.modifiers
            && self
                .qualifier
                .map_or(true, |q| incoming.qualifier == Some(q))
    }

    fn infer_device(input: &str, phase: Option<Phase>) -> Result<Device, StimulusParseError> {
        let is_button = input
            .strip_prefix("mouse")
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));

        if is_button || input == SCROLL {
            if phase.is_none() {
                return Err(StimulusParseError::MissingPhase(input.to_string()));
            }
            return Ok(if is_button {
                Device::Pointer
            } else {
                Device::Scroll
            });
        }

        if input == POINTER_MOVE || input == DOUBLE_CLICK {
            if phase.is_some() {
                return Err(StimulusParseError::UnexpectedPhase(input.to_string()));
            }
            return Ok(Device::Pointer);
        }

        Ok(if phase.is_some() {
            Device::Key
        } else {
            Device::Command
        })
    }
}

impl FromStr for ControlStimulus {
    type Err = StimulusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StimulusParseError::Empty);
        }

        let (head, qualifier) = match s.split_once(" on ") {
            Some((head, q)) => (head.trim(), Some(q.trim().parse::<SpatialQualifier>()?)),
            None => (s, None),
        };

        let (chord, phase) = match head.rsplit_once(':') {
            Some((chord, phase)) => {
                let phase = match phase {
                    "down" => Phase::Down,
                    "up" => Phase::Up,
                    other => return Err(StimulusParseError::UnknownPhase(other.to_string())),
                };
                (chord, Some(phase))
            }
            None => (head, None),
        };

        // the plus key is spelled `plus`, so the last segment is always the input
        let mut parts: Vec<&str> = chord.split('+').collect();
        let input = parts.pop().unwrap_or_default().trim();
        if input.is_empty() {
            return Err(StimulusParseError::Empty);
        }
        // phased inputs are key and button names; command names keep their case
        let input = if phase.is_some() {
            input.to_lowercase()
        } else {
            input.to_string()
        };

        let mut modifiers = BTreeSet::new();
        for part in parts {
            let part = part.trim().to_ascii_lowercase();
            let modifier =
                Modifier::parse(&part).ok_or(StimulusParseError::UnknownModifier(part))?;
            modifiers.insert(modifier);
        }

        let device = Self::infer_device(&input, phase)?;

        Ok(Self {
            device,
            input,
            phase,
            modifiers,
            qualifier,
        })
    }
}

impl fmt::Display for ControlStimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        f.write_str(&self.input)?;
        if let Some(phase) = self.phase {
            write!(f, ":{}", phase.as_str())?;
        }
        if let Some(qualifier) = self.qualifier {
            write!(f, " on {}", qualifier.as_str())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ControlStimulus {
    type Error = StimulusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ControlStimulus> for String {
    fn from(value: ControlStimulus) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ControlStimulus {
        text.parse().unwrap()
    }

    #[test]
    fn parses_pointer_button_with_qualifier() {
        let s = parse("mouse3:up on segment");

        assert_eq!(s.device, Device::Pointer);
        assert_eq!(s.input, "mouse3");
        assert_eq!(s.phase, Some(Phase::Up));
        assert_eq!(s.qualifier, Some(SpatialQualifier::Segment));
        assert!(s.modifiers.is_empty());
    }

    #[test]
    fn infers_devices() {
        assert_eq!(parse("mousemove").device, Device::Pointer);
        assert_eq!(parse("dblclick").device, Device::Pointer);
        assert_eq!(parse("scroll:up").device, Device::Scroll);
        assert_eq!(parse("esc:down").device, Device::Key);
        assert_eq!(parse("toggleHand").device, Device::Command);
        assert_eq!(parse("escape_modeler").device, Device::Command);
    }

    #[test]
    fn modifiers_render_in_canonical_order() {
        let a = parse("shift+ctrl+z:down");
        let b = parse("ctrl+shift+z:down");

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "ctrl+shift+z:down");
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!("".parse::<ControlStimulus>(), Err(StimulusParseError::Empty));
        assert_eq!(
            "mouse1".parse::<ControlStimulus>(),
            Err(StimulusParseError::MissingPhase("mouse1".into()))
        );
        assert_eq!(
            "mousemove:down".parse::<ControlStimulus>(),
            Err(StimulusParseError::UnexpectedPhase("mousemove".into()))
        );
        assert_eq!(
            "z:sideways".parse::<ControlStimulus>(),
            Err(StimulusParseError::UnknownPhase("sideways".into()))
        );
        assert_eq!(
            "hyper+z:down".parse::<ControlStimulus>(),
            Err(StimulusParseError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            "mouse1:down on moon".parse::<ControlStimulus>(),
            Err(StimulusParseError::UnknownQualifier("moon".into()))
        );
    }

    #[test]
    fn phased_inputs_are_case_insensitive() {
        assert_eq!(parse("Esc:down"), parse("esc:down"));
        assert_eq!(parse("CTRL+Z:up"), parse("ctrl+z:up"));
        assert_eq!(parse("Mouse1:down"), ControlStimulus::button(1, Phase::Down));
        assert_eq!(ControlStimulus::key("Del", Phase::Up).to_string(), "del:up");
        assert_eq!(parse("showHand").to_string(), "showHand");
    }

    #[test]
    fn plus_key_is_spelled_out() {
        assert_eq!(
            parse("ctrl+plus:down"),
            ControlStimulus::key("plus", Phase::Down).with_modifier(Modifier::Ctrl)
        );
        assert_eq!("+:down".parse::<ControlStimulus>(), Err(StimulusParseError::Empty));
    }

    #[test]
    fn unqualified_pattern_matches_any_context() {
        let pattern = parse("mousemove");

        assert!(pattern.matches(&parse("mousemove")));
        assert!(pattern.matches(&parse("mousemove on vertex")));
        assert!(!pattern.matches(&parse("dblclick")));
    }

    #[test]
    fn qualified_pattern_requires_same_context() {
        let pattern = parse("mousemove on vertex");

        assert!(pattern.matches(&parse("mousemove on vertex")));
        assert!(!pattern.matches(&parse("mousemove on ring")));
        assert!(!pattern.matches(&parse("mousemove")));
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let pattern = parse("ctrl+z:down");

        assert!(pattern.matches(&parse("ctrl+z:down")));
        assert!(!pattern.matches(&parse("z:down")));
        assert!(!pattern.matches(&parse("ctrl+shift+z:down")));
    }

    #[test]
    fn constructors_agree_with_parser() {
        assert_eq!(ControlStimulus::button(1, Phase::Down), parse("mouse1:down"));
        assert_eq!(ControlStimulus::scroll(Phase::Up), parse("scroll:up"));
        assert_eq!(
            ControlStimulus::key("z", Phase::Down).with_modifier(Modifier::Ctrl),
            parse("ctrl+z:down")
        );
        assert_eq!(
            ControlStimulus::pointer_move().on(SpatialQualifier::Out),
            parse("mousemove on out")
        );
        assert_eq!(ControlStimulus::command("showHand"), parse("showHand"));
    }

    #[test]
    fn serializes_as_canonical_string() {
        let s = parse("shift+x:down");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"shift+x:down\"");

        let back: ControlStimulus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
