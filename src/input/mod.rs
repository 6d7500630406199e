//! Raw input normalization.
//!
//! The host delivers raw pointer, keyboard, wheel and command events along
//! with the result of its spatial hit-test. [`Normalizer`] is the only
//! consumer of that raw shape: it turns each event into a canonical
//! [`ControlStimulus`](crate::core::ControlStimulus) or drops it.

mod normalize;

pub use normalize::{HitTest, ModifierKeys, Normalizer, RawEvent, RawInput};
