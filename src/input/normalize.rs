//! Conversion of raw host events into canonical stimuli.

use crate::core::{ControlStimulus, Modifier, Phase, SpatialQualifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of the host's spatial hit-test at the pointer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitTest {
    Vertex,
    Segment,
    Ring,
    /// Pointer is over the scene but on no entity.
    Background,
    /// Pointer has just left the entity it was hovering.
    LeftEntity,
}

impl From<HitTest> for SpatialQualifier {
    fn from(hit: HitTest) -> Self {
        match hit {
            HitTest::Vertex => Self::Vertex,
            HitTest::Segment => Self::Segment,
            HitTest::Ring => Self::Ring,
            HitTest::Background => Self::Background,
            HitTest::LeftEntity => Self::Out,
        }
    }
}

/// Modifier keys held during a raw event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierKeys {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ModifierKeys {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    fn held(self) -> impl Iterator<Item = Modifier> {
        [
            (self.ctrl, Modifier::Ctrl),
            (self.shift, Modifier::Shift),
            (self.alt, Modifier::Alt),
            (self.meta, Modifier::Meta),
        ]
        .into_iter()
        .filter_map(|(held, modifier)| held.then_some(modifier))
    }
}

/// Raw event payload, as delivered by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    /// Pointer button press or release (1 = primary, 3 = secondary).
    Button { button: u8, pressed: bool },
    /// Pointer motion.
    Move,
    /// Pointer double-click.
    DoubleClick,
    /// Wheel motion; negative `delta_y` scrolls up.
    Wheel { delta_y: f64 },
    /// Keyboard key press or release, using the host's key name.
    Key { key: String, pressed: bool },
    /// Named host command (toolbar, menu).
    Command(String),
}

/// One raw input occurrence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub input: RawInput,
    #[serde(default)]
    pub modifiers: ModifierKeys,
}

impl RawEvent {
    pub fn new(input: RawInput) -> Self {
        Self {
            input,
            modifiers: ModifierKeys::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Pure converter from raw events to [`ControlStimulus`] tokens.
///
/// Key names are lowercased and passed through an alias table so that the
/// host's naming (`Escape`, `Delete`, `" "`, `+`) lines up with the names
/// used in machine definitions (`esc`, `del`, `space`, `plus`).
#[derive(Clone, Debug)]
pub struct Normalizer {
    key_aliases: BTreeMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        let key_aliases = [
            ("escape", "esc"),
            ("delete", "del"),
            ("backspace", "del"),
            (" ", "space"),
            ("spacebar", "space"),
            ("control", "ctrl"),
            ("+", "plus"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self { key_aliases }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an additional host key name (matched case-insensitively) onto a
    /// definition key name.
    pub fn with_alias(mut self, host_key: &str, key: &str) -> Self {
        self.key_aliases
            .insert(host_key.to_lowercase(), key.to_lowercase());
        self
    }

    /// Canonical name for a host key.
    pub fn key_name(&self, key: &str) -> String {
        // " " must survive for the space alias
        let lowered = if key.trim().is_empty() {
            key.to_string()
        } else {
            key.trim().to_lowercase()
        };
        self.key_aliases
            .get(&lowered)
            .cloned()
            .unwrap_or(lowered)
    }

    /// Convert one raw event.
    ///
    /// Returns `None` for events that carry no stimulus (zero wheel delta,
    /// empty key or command names). The hit-test result is attached to
    /// pointer and wheel stimuli only.
    pub fn normalize(&self, event: &RawEvent, hit: Option<HitTest>) -> Option<ControlStimulus> {
        let qualifier = hit.map(SpatialQualifier::from);

        let mut stimulus = match &event.input {
            RawInput::Button { button, pressed } => {
                ControlStimulus::button(*button, phase_of(*pressed))
            }
            RawInput::Move => ControlStimulus::pointer_move(),
            RawInput::DoubleClick => ControlStimulus::double_click(),
            RawInput::Wheel { delta_y } => {
                if *delta_y < 0.0 {
                    ControlStimulus::scroll(Phase::Up)
                } else if *delta_y > 0.0 {
                    ControlStimulus::scroll(Phase::Down)
                } else {
                    return None;
                }
            }
            RawInput::Key { key, pressed } => {
                let name = self.key_name(key);
                if name.is_empty() {
                    return None;
                }
                let own = modifier_for_key(&name);
                let mut stimulus = ControlStimulus::key(name, phase_of(*pressed));
                stimulus.modifiers = event
                    .modifiers
                    .held()
                    .filter(|m| Some(*m) != own)
                    .collect();
                return Some(stimulus);
            }
            RawInput::Command(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                return Some(ControlStimulus::command(name));
            }
        };

        stimulus.modifiers = event.modifiers.held().collect();
        stimulus.qualifier = qualifier;
        Some(stimulus)
    }
}

fn phase_of(pressed: bool) -> Phase {
    if pressed {
        Phase::Down
    } else {
        Phase::Up
    }
}

fn modifier_for_key(name: &str) -> Option<Modifier> {
    match name {
        "ctrl" => Some(Modifier::Ctrl),
        "shift" => Some(Modifier::Shift),
        "alt" => Some(Modifier::Alt),
        "meta" => Some(Modifier::Meta),
        _ => None,
    }
}
