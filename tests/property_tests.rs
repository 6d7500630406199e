//! Property-based tests for stimuli and dispatch.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use modeset::actions::ActionRegistry;
use modeset::core::{ControlStimulus, Modifier, Phase, SpatialQualifier};
use modeset::definition::{MachineBuilder, MachineDefinition, StateBuilder};
use modeset::presets;
use modeset::runtime::{DispatchOutcome, Interpreter};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn phase() -> impl Strategy<Value = Phase> {
    prop_oneof![Just(Phase::Down), Just(Phase::Up)]
}

fn qualifier() -> impl Strategy<Value = Option<SpatialQualifier>> {
    prop::option::of(prop_oneof![
        Just(SpatialQualifier::Vertex),
        Just(SpatialQualifier::Segment),
        Just(SpatialQualifier::Ring),
        Just(SpatialQualifier::Background),
        Just(SpatialQualifier::Out),
    ])
}

fn modifiers() -> impl Strategy<Value = Vec<Modifier>> {
    prop::sample::subsequence(
        vec![Modifier::Ctrl, Modifier::Shift, Modifier::Alt, Modifier::Meta],
        0..=4,
    )
}

prop_compose! {
    fn pointer_stimulus()(
        kind in 0..4u8,
        button in 1..6u8,
        phase in phase(),
        qualifier in qualifier(),
    ) -> ControlStimulus {
        let stimulus = match kind {
            0 => ControlStimulus::button(button, phase),
            1 => ControlStimulus::pointer_move(),
            2 => ControlStimulus::double_click(),
            _ => ControlStimulus::scroll(phase),
        };
        match qualifier {
            Some(q) => stimulus.on(q),
            None => stimulus,
        }
    }
}

prop_compose! {
    fn key_stimulus()(key in "[a-z]", phase in phase()) -> ControlStimulus {
        ControlStimulus::key(key, phase)
    }
}

fn command_stimulus() -> impl Strategy<Value = ControlStimulus> {
    "[a-z][a-zA-Z_]{2,10}"
        .prop_filter("reserved input names", |name| {
            !["scroll", "mousemove", "dblclick"].contains(&name.as_str())
        })
        .prop_map(ControlStimulus::command)
}

fn arbitrary_stimulus() -> impl Strategy<Value = ControlStimulus> {
    (
        prop_oneof![pointer_stimulus(), key_stimulus(), command_stimulus()],
        modifiers(),
    )
        .prop_map(|(stimulus, modifiers)| {
            modifiers
                .into_iter()
                .fold(stimulus, |s, m| s.with_modifier(m))
        })
}

/// Tokens the test machine and the ring designer react to, plus noise.
fn token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "mouse1:down",
        "mouse1:up",
        "mouse3:down",
        "mouse3:up",
        "mousemove",
        "mousemove on vertex",
        "mousemove on segment",
        "mousemove on ring",
        "mousemove on background",
        "mousemove on out",
        "mouse1:down on vertex",
        "mouse1:down on background",
        "dblclick",
        "scroll:up",
        "scroll:down",
        "z:down",
        "z:up",
        "d:down",
        "d:up",
        "f:down",
        "f:up",
        "r:down",
        "r:up",
        "a:down",
        "a:up",
        "s:down",
        "ctrl+z:down",
        "q:down",
    ])
}

fn layered() -> Arc<MachineDefinition> {
    let camera = MachineBuilder::new("camera")
        .start("idle_cam")
        .state(
            StateBuilder::new("idle_cam")
                .enter("enter:camera.idle_cam")
                .exit("exit:camera.idle_cam")
                .goto("rotate", ["mouse3:down"]),
        )
        .state(
            StateBuilder::new("rotate")
                .enter("enter:camera.rotate")
                .exit("exit:camera.rotate")
                .fire("run:camera.rotate", ["mousemove"])
                .goto("idle_cam", ["mouse3:up"]),
        )
        .build()
        .unwrap();

    let main = MachineBuilder::new("main")
        .start("viewedit")
        .state(
            StateBuilder::new("viewedit")
                .enter("enter:main.viewedit")
                .exit("exit:main.viewedit")
                .sub_machine(Arc::clone(&camera))
                .goto("zoom", ["z:down"])
                .goto("vertex", ["mousemove on vertex"]),
        )
        .state(
            StateBuilder::new("zoom")
                .enter("enter:main.zoom")
                .exit("exit:main.zoom")
                .sub_machine(Arc::clone(&camera))
                .fire("run:main.zoom", ["scroll:up", "scroll:down"])
                .goto("viewedit", ["z:up"]),
        )
        .state(
            StateBuilder::new("vertex")
                .enter("enter:main.vertex")
                .exit("exit:main.vertex")
                .sub_machine(camera)
                .goto("viewedit", ["mousemove on background"])
                .goto("vertex", ["dblclick"]),
        )
        .build()
        .unwrap();

    MachineBuilder::new("root")
        .start("idle")
        .state(
            StateBuilder::new("idle")
                .enter("enter:root.idle")
                .exit("exit:root.idle")
                .sub_machine(main)
                .goto("panic", ["esc:down"]),
        )
        .state(
            StateBuilder::new("panic")
                .enter("enter:root.panic")
                .exit("exit:root.panic")
                .goto("idle", ["esc:up"]),
        )
        .build()
        .unwrap()
}

fn recording(machine: &MachineDefinition) -> (Arc<ActionRegistry>, Log) {
    let log: Log = Arc::default();
    let mut registry = ActionRegistry::new();
    for name in machine.action_names() {
        let log = Arc::clone(&log);
        let entry = name.to_string();
        registry.register(name, move || log.lock().unwrap().push(entry.clone()));
    }
    (Arc::new(registry), log)
}

fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

proptest! {
    #[test]
    fn stimulus_text_round_trips(stimulus in arbitrary_stimulus()) {
        let text = stimulus.to_string();
        let parsed: ControlStimulus = text.parse().unwrap();
        prop_assert_eq!(&parsed, &stimulus);
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn patterns_match_themselves(stimulus in arbitrary_stimulus()) {
        prop_assert!(stimulus.matches(&stimulus));
    }

    #[test]
    fn every_instance_has_one_valid_state(tokens in prop::collection::vec(token(), 0..40)) {
        let definition = modeset::presets::ring_designer().unwrap().root().clone();
        let mut interpreter = Interpreter::start(definition, Arc::new(ActionRegistry::new()));

        for token in tokens {
            interpreter.dispatch(&token.parse().unwrap());
            for (_, instance) in walk(interpreter.root()) {
                prop_assert!(instance.definition().contains_state(instance.current_id()));
            }
        }
    }

    #[test]
    fn exits_precede_enters(tokens in prop::collection::vec(token(), 0..40)) {
        let definition = layered();
        let (registry, log) = recording(&definition);
        let mut interpreter = Interpreter::start(definition, registry);
        take(&log);

        for token in tokens {
            let outcome = interpreter.dispatch(&token.parse().unwrap());
            let fired = take(&log);

            match outcome {
                DispatchOutcome::Moved { .. } => {
                    let first_enter = fired.iter().position(|a| a.starts_with("enter:"));
                    let last_exit = fired.iter().rposition(|a| a.starts_with("exit:"));
                    prop_assert!(first_enter.is_some());
                    prop_assert!(last_exit.is_some());
                    prop_assert!(last_exit < first_enter, "order was {:?}", fired);
                }
                DispatchOutcome::Fired { action, .. } => prop_assert_eq!(fired, vec![action]),
                DispatchOutcome::Dropped => prop_assert!(fired.is_empty()),
            }
        }
    }

    #[test]
    fn unmatched_stimuli_are_no_ops(
        tokens in prop::collection::vec(token(), 0..20),
        noise in "[g-k]",
    ) {
        let definition = layered();
        let (registry, log) = recording(&definition);
        let mut interpreter = Interpreter::start(definition, registry);

        for token in tokens {
            interpreter.dispatch(&token.parse().unwrap());
        }
        take(&log);
        let before = interpreter.active_states();
        let history = interpreter.history().len();

        let outcome = interpreter.dispatch(&ControlStimulus::key(noise, Phase::Down));

        prop_assert_eq!(outcome, DispatchOutcome::Dropped);
        prop_assert_eq!(interpreter.active_states(), before);
        prop_assert_eq!(interpreter.history().len(), history);
        prop_assert!(take(&log).is_empty());
    }

    #[test]
    fn escape_always_recovers(tokens in prop::collection::vec(token(), 0..40)) {
        let set = presets::ring_designer().unwrap();
        let fresh = Interpreter::start(Arc::clone(set.root()), Arc::new(ActionRegistry::new()));
        let mut interpreter =
            Interpreter::start(Arc::clone(set.root()), Arc::new(ActionRegistry::new()));

        for token in tokens {
            interpreter.dispatch(&token.parse().unwrap());
        }

        interpreter.dispatch(&"esc:down".parse().unwrap());
        prop_assert_eq!(interpreter.current_state("modeler"), Some("panic_escape_plan"));
        prop_assert_eq!(interpreter.active_states().len(), 1);

        interpreter.dispatch(&"esc:up".parse().unwrap());
        prop_assert_eq!(interpreter.active_states(), fresh.active_states());
    }
}

fn walk(root: &modeset::runtime::MachineInstance) -> Vec<(usize, &modeset::runtime::MachineInstance)> {
    let mut out = vec![(0, root)];
    let mut index = 0;
    while index < out.len() {
        let (depth, instance) = out[index];
        out.extend(instance.children().iter().map(|child| (depth + 1, child)));
        index += 1;
    }
    out
}
