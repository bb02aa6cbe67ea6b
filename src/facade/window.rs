//! Window-driven bay width floors
//!
//! A bay carrying an enabled window must be at least as wide as the window
//! (the larger of the definition's intrinsic width and the user's minimum)
//! plus its padding on both sides.

use crate::config::EngineConfig;
use crate::model::{Bay, BaySize, BuildingConfig, WindowLibrary};

/// Minimum bay width required by the bay's window, or `None` without an enabled window.
///
/// A missing definition contributes no intrinsic width; the user minimum and
/// padding still apply.
pub fn required_bay_width(bay: &Bay, library: &WindowLibrary, config: &EngineConfig) -> Option<f64> {
    let window = bay.active_window()?;

    let definition_width = window
        .def_id
        .as_deref()
        .and_then(|id| library.width_of(id))
        .unwrap_or(0.0);
    let window_width = definition_width.max(window.width.min);
    let padding = window.padding.left.max(0.0) + window.padding.right.max(0.0);

    Some(
        (window_width + padding)
            .max(config.absolute_min_width)
            .min(config.absolute_max_width),
    )
}

/// Raise the bay's own size fields to the window floor. Returns whether anything changed.
pub fn enforce_bay_size(bay: &mut Bay, library: &WindowLibrary, config: &EngineConfig) -> bool {
    let Some(required) = required_bay_width(bay, library, config) else {
        return false;
    };

    let changed = match &mut bay.size {
        BaySize::Fixed { width } => {
            if *width < required {
                *width = required;
                true
            } else {
                false
            }
        }
        BaySize::Range { min, max } => {
            let mut changed = false;
            if *min < required {
                *min = required;
                changed = true;
            }
            if let Some(upper) = max {
                if *upper < *min {
                    *upper = *min;
                    changed = true;
                }
            }
            changed
        }
    };

    if changed {
        tracing::debug!(bay = %bay.id, required, "bay size raised to window floor");
    }
    changed
}

/// Re-enforce the window floor on every bay, in every facade of every layer,
/// whose enabled window references `def_id`. Returns the number of bays changed.
pub fn on_definition_width_changed(building: &mut BuildingConfig, def_id: &str) -> usize {
    let BuildingConfig {
        engine,
        windows,
        layers,
    } = building;

    let mut changed = 0;
    for layer in layers.iter_mut() {
        for facade in layer.facades.values_mut() {
            for bay in facade.bays.iter_mut() {
                let references = bay
                    .active_window()
                    .is_some_and(|w| w.def_id.as_deref() == Some(def_id));
                if references && enforce_bay_size(bay, windows, engine) {
                    changed += 1;
                }
            }
        }
    }

    tracing::debug!(def_id, changed, "window definition sweep finished");
    changed
}
