//! Modeset: a hierarchical, composable state machine interpreter for
//! direct-manipulation design tools.
//!
//! Tool behavior is written as declarative machine definitions: states with
//! enter/exit actions, transitions keyed by control stimuli
//! (`mouse1:down on vertex`, `ctrl+z:down`, `esc:down`), and sub-machines
//! that run concurrently while their owning state is active. The interpreter
//! owns the live instance tree, dispatches each stimulus to the most nested
//! context that wants it, and keeps enter/exit actions paired so continuous
//! effects are always stopped.
//!
//! # Core Concepts
//!
//! - **Stimulus**: a canonical input token, see [`core::ControlStimulus`]
//! - **Definition**: validated, immutable machines, see [`definition`]
//! - **Actions**: host callbacks looked up by name, see [`actions`]
//! - **Interpreter**: dispatch, teardown/rebuild and hints, see [`runtime`]
//!
//! # Example
//!
//! ```rust
//! use modeset::actions::ActionRegistry;
//! use modeset::core::HintView;
//! use modeset::definition::{MachineBuilder, StateBuilder, TransitionBuilder};
//! use modeset::input::{HitTest, RawEvent, RawInput};
//! use modeset::runtime::Interpreter;
//! use std::sync::Arc;
//!
//! let camera = MachineBuilder::new("camera")
//!     .start("idle_cam")
//!     .state(StateBuilder::new("idle_cam").transition(
//!         TransitionBuilder::to("rotate").on("mouse3:down").label("View", "Rotate"),
//!     ))
//!     .state(
//!         StateBuilder::new("rotate")
//!             .enter("cam.rotate.init")
//!             .exit("cam.rotate.finalize")
//!             .fire("cam.rotate.run", ["mousemove"])
//!             .goto("idle_cam", ["mouse3:up"])
//!             .no_hint(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let modeler = MachineBuilder::new("modeler")
//!     .start("idle_modeler")
//!     .state(
//!         StateBuilder::new("idle_modeler")
//!             .sub_machine(camera)
//!             .goto("panic_escape_plan", ["esc:down"]),
//!     )
//!     .state(StateBuilder::new("panic_escape_plan").goto("idle_modeler", ["esc:up"]))
//!     .build()
//!     .unwrap();
//!
//! let mut registry = ActionRegistry::new();
//! registry.register("cam.rotate.init", || println!("start rotating"));
//! registry.register("cam.rotate.finalize", || println!("stop rotating"));
//!
//! let mut interpreter = Interpreter::start(modeler, Arc::new(registry))
//!     .with_sink(|view: &HintView| println!("{} controls", view.controls.len()));
//!
//! let press = RawEvent::new(RawInput::Button { button: 3, pressed: true });
//! interpreter.feed(&press, Some(HitTest::Background));
//! assert_eq!(interpreter.current_state("camera"), Some("rotate"));
//!
//! let escape = RawEvent::new(RawInput::Key { key: "Escape".into(), pressed: true });
//! interpreter.feed(&escape, None);
//! assert_eq!(interpreter.current_state("modeler"), Some("panic_escape_plan"));
//! assert_eq!(interpreter.current_state("camera"), None);
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod definition;
pub mod input;
pub mod observability;
pub mod presets;
pub mod runtime;

// Re-export commonly used types
pub use actions::ActionRegistry;
pub use config::Config;
pub use core::{ControlStimulus, HintMode, HintSink, HintView};
pub use definition::{DefinitionError, DefinitionSet, MachineBuilder, MachineDefinition};
pub use runtime::{DispatchOutcome, Interpreter};
