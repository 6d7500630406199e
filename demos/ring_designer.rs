//! Ring Designer
//!
//! This example drives the bundled ring designer machine set with a short
//! script of raw input events and prints every action and hint change.
//!
//! Key concepts:
//! - Loading a machine set from the bundled JSON preset
//! - Registering host callbacks by action name
//! - Feeding raw events with hit-test results
//! - Escaping from a nested mode in one keystroke
//!
//! Run with: cargo run --example ring_designer
//! Set RUST_LOG=modeset=debug to see dispatch traces.

use modeset::actions::ActionRegistry;
use modeset::config::Config;
use modeset::core::HintView;
use modeset::input::{HitTest, ModifierKeys, RawEvent, RawInput};
use modeset::observability::init_tracing;
use modeset::presets;
use modeset::runtime::Interpreter;
use std::sync::Arc;

fn button(button: u8, pressed: bool) -> RawEvent {
    RawEvent::new(RawInput::Button { button, pressed })
}

fn key(key: &str, pressed: bool) -> RawEvent {
    RawEvent::new(RawInput::Key {
        key: key.to_string(),
        pressed,
    })
}

fn print_hint(view: &HintView) {
    if view.is_empty() {
        println!("    [hint] (hidden)");
        return;
    }
    if let Some(text) = &view.help_text {
        println!("    [hint] {text}");
    }
    for control in &view.controls {
        println!(
            "    [hint]   {} / {}: {}",
            control.label.0,
            control.label.1,
            control.stimuli.join(", ")
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    init_tracing(&config);

    println!("=== Ring Designer Example ===\n");

    let set = presets::ring_designer_with_config(&config)?;
    println!("Loaded {} machines, root '{}'", set.len(), set.root().name());

    let mut registry = ActionRegistry::new();
    for name in presets::ring_designer_actions()? {
        let label = name.clone();
        registry.register(name, move || println!("  -> {label}"));
    }

    let mut interpreter = Interpreter::with_config(Arc::clone(set.root()), Arc::new(registry), &config)
        .with_sink(|view: &HintView| print_hint(view));

    let script = [
        ("hover a vertex", RawEvent::new(RawInput::Move), Some(HitTest::Vertex)),
        ("start rotating", button(3, true), Some(HitTest::Vertex)),
        ("drag", RawEvent::new(RawInput::Move), Some(HitTest::Background)),
        ("press escape", key("Escape", true), None),
        ("release escape", key("Escape", false), None),
        (
            "undo",
            key("z", true).with_modifiers(ModifierKeys {
                ctrl: true,
                ..ModifierKeys::NONE
            }),
            None,
        ),
    ];

    for (step, event, hit) in script {
        println!("\n{step}:");
        let outcome = interpreter.feed(&event, hit);
        println!("  {outcome:?}");
    }

    println!("\nActive states:");
    for state in interpreter.active_states() {
        println!("  {}{}: {}", "  ".repeat(state.depth), state.machine, state.state);
    }

    println!("\nMode changes:");
    for change in interpreter.history().changes() {
        println!("  {} {} -> {} on {}", change.machine, change.from, change.to, change.stimulus);
    }

    interpreter.stop();
    Ok(())
}
