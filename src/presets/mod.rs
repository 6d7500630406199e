//! Bundled machine sets.
//!
//! The ring designer set drives a 3D ring modeling tool: a root `modeler`
//! machine with an escape-hatch state, and concurrent sub-machines for
//! rendering, one-key toggles, style editing and undo/redo. Style editing
//! nests camera control, vertex/segment/ring modifiers, vertex addition,
//! merging and articulation.

use crate::config::Config;
use crate::definition::{DefinitionError, DefinitionSet};
use std::collections::BTreeSet;

/// Source document of the ring designer set.
pub const RING_DESIGNER_JSON: &str = include_str!("ring_designer.json");

/// Load the ring designer machine set with default limits.
///
/// # Example
///
/// ```rust
/// use modeset::presets;
///
/// let set = presets::ring_designer().unwrap();
/// assert_eq!(set.root().name(), "modeler");
/// assert_eq!(set.root().start_id(), "idle_modeler");
/// ```
pub fn ring_designer() -> Result<DefinitionSet, DefinitionError> {
    DefinitionSet::from_json(RING_DESIGNER_JSON)
}

pub fn ring_designer_with_config(config: &Config) -> Result<DefinitionSet, DefinitionError> {
    DefinitionSet::from_json_with_config(RING_DESIGNER_JSON, config)
}

/// Every action name the ring designer set references, sorted.
///
/// Hosts use it to check their registry coverage.
pub fn ring_designer_actions() -> Result<BTreeSet<String>, DefinitionError> {
    let set = ring_designer()?;
    Ok(set
        .root()
        .action_names()
        .into_iter()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_designer_loads() {
        let set = ring_designer().unwrap();

        assert_eq!(set.len(), 13);
        assert_eq!(set.root().depth(), 4);
        for name in ["camera", "style_main", "hierarchy_move", "merge_vertices"] {
            assert!(set.get(name).is_some(), "missing machine {name}");
        }
    }

    #[test]
    fn camera_is_shared_between_modes() {
        let set = ring_designer().unwrap();
        let main = set.get("style_main").unwrap();
        let camera = set.get("camera").unwrap();

        for mode in ["viewedit", "zoom", "vertex_modifier", "segment_modifier", "ring_modifier"] {
            let state = main.state(mode).unwrap();
            assert!(
                state
                    .sub_machines()
                    .iter()
                    .any(|sub| std::sync::Arc::ptr_eq(sub, camera)),
                "{mode} does not run the camera"
            );
        }
    }

    #[test]
    fn action_list_covers_nested_machines() {
        let actions = ring_designer_actions().unwrap();

        assert_eq!(actions.len(), 63);
        for name in [
            "cam.rotate.init",
            "cam.rotate.finalize",
            "step.prev",
            "hierarchy.rotate.run",
            "vertex.merge",
        ] {
            assert!(actions.contains(name), "missing action {name}");
        }
    }

    #[test]
    fn tight_depth_limit_rejects_the_set() {
        let config = Config {
            max_depth: 3,
            ..Config::default()
        };
        assert!(ring_designer_with_config(&config).is_err());
    }
}
