//! Editor commands on bays, groups and face locks
//!
//! Every command either applies completely or is rejected with an [`EditError`]
//! (logged as a warning) and leaves the building untouched. Linked bays are
//! read-only views of their source, so per-bay setters refuse them. Structural
//! changes re-run group validation; window changes re-run the window floor.
//!
//! Commands that can change a face minimum run on a copy of the building and
//! are refused with [`EditError::FaceTooNarrow`] when they would push a face
//! minimum above the current edge length of that face. The facade-level
//! primitives in [`groups`](super::groups), [`links`](super::links) and
//! [`locks`](super::locks) do not know about footprints and skip that check.

use crate::error::{reject, EditError};
use crate::model::{
    Bay, BayId, BaySize, BuildingConfig, ExpandPreference, FaceId, Facade, GroupId, LayerId,
    RepeatMax, TextureFlow, WindowSpec,
};

use super::groups::{on_bay_deleted, on_bays_reordered, revalidate_groups, set_group_repeat};
use super::links::{ensure_editable, set_link, unlink_slaves};
use super::locks::set_face_lock;
use super::resolver::FacadeResolver;
use super::window::{enforce_bay_size, on_definition_width_changed};

/// Address of one facade: a face on a floor layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacadeKey {
    pub layer: LayerId,
    pub face: FaceId,
}

impl FacadeKey {
    pub fn new(layer: impl Into<LayerId>, face: FaceId) -> Self {
        Self {
            layer: layer.into(),
            face,
        }
    }
}

fn facade_mut<'b>(building: &'b mut BuildingConfig, key: &FacadeKey) -> Result<&'b mut Facade, EditError> {
    match building.facade_mut(&key.layer, key.face) {
        Ok(facade) => Ok(facade),
        Err(err) => reject(err),
    }
}

fn check_width(value: f64) -> Result<(), EditError> {
    if !value.is_finite() || value <= 0.0 {
        return reject(EditError::invalid_width(value, "width must be a positive number"));
    }
    Ok(())
}

fn check_size(size: &BaySize) -> Result<(), EditError> {
    match *size {
        BaySize::Fixed { width } => check_width(width),
        BaySize::Range { min, max } => {
            check_width(min)?;
            match max {
                Some(max) if !max.is_finite() || max < min => reject(EditError::invalid_width(
                    max,
                    "range maximum must not be below its minimum",
                )),
                _ => Ok(()),
            }
        }
    }
}

/// Run `edit` on a copy of the building and keep the copy only when no face
/// minimum was raised above its edge length
fn commit_checked<T>(
    building: &mut BuildingConfig,
    edit: impl FnOnce(&mut BuildingConfig) -> Result<T, EditError>,
) -> Result<T, EditError> {
    let mut trial = building.clone();
    let value = edit(&mut trial)?;
    check_face_widths(building, &trial)?;
    *building = trial;
    Ok(value)
}

/// Compare face minimums before and after an edit against the footprints.
///
/// Only faces whose minimum went up count; a face that was already too short
/// before the edit does not block unrelated changes.
fn check_face_widths(before: &BuildingConfig, after: &BuildingConfig) -> Result<(), EditError> {
    let old = FacadeResolver::for_building(before);
    let new = FacadeResolver::for_building(after);
    let tolerance = after.engine.min_length_tolerance;

    for layer in &after.layers {
        let minimums = new.face_minimums(layer);
        let previous = before.layer(&layer.id).map(|l| old.face_minimums(l));
        for face in FaceId::ALL {
            let length = layer.footprint.edge_length(face);
            let minimum = minimums.get(face);
            let raised = previous.map_or(true, |p| minimum > p.get(face));
            if raised && length + tolerance < minimum {
                return reject(EditError::FaceTooNarrow {
                    layer: layer.id.clone(),
                    face,
                    length,
                    minimum,
                });
            }
        }
    }
    Ok(())
}

/// Apply `edit` to an unlinked bay, then re-enforce its window floor when `window_changed`
fn edit_bay(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    window_changed: bool,
    edit: impl FnOnce(&mut Bay),
) -> Result<(), EditError> {
    let hops = building.engine.max_link_hops;
    let BuildingConfig {
        engine,
        windows,
        layers,
    } = building;

    let floor = match layers.iter_mut().find(|l| l.id == key.layer) {
        Some(floor) => floor,
        None => return reject(EditError::UnknownLayer(key.layer.clone())),
    };
    let facade = match floor.facade_mut(key.face) {
        Some(facade) => facade,
        None => {
            return reject(EditError::UnknownFacade {
                layer: key.layer.clone(),
                face: key.face,
            })
        }
    };
    ensure_editable(facade, bay, hops)?;

    if let Some(target) = facade.bay_mut(bay) {
        edit(target);
        if window_changed {
            enforce_bay_size(target, windows, engine);
        }
    }
    Ok(())
}

/// Insert a bay at `index` (appended when `None` or past the end)
pub fn add_bay(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    index: Option<usize>,
    mut bay: Bay,
) -> Result<(), EditError> {
    check_size(&bay.size)?;
    enforce_bay_size(&mut bay, &building.windows, &building.engine);

    commit_checked(building, |b| {
        let facade = facade_mut(b, key)?;
        if facade.contains_bay(&bay.id) {
            return reject(EditError::DuplicateBay(bay.id));
        }
        if let Some(source) = &bay.link_from {
            if !facade.contains_bay(source) {
                return reject(EditError::UnknownBay(source.clone()));
            }
        }

        let at = index.unwrap_or(facade.bays.len()).min(facade.bays.len());
        tracing::debug!(bay = %bay.id, index = at, "bay added");
        facade.bays.insert(at, bay);
        revalidate_groups(facade);
        Ok(())
    })
}

/// Move a bay to a new position in facade order
pub fn move_bay(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    to_index: usize,
) -> Result<(), EditError> {
    let facade = facade_mut(building, key)?;
    let Some(from) = facade.index_of(bay) else {
        return reject(EditError::UnknownBay(bay.clone()));
    };

    let moved = facade.bays.remove(from);
    let to = to_index.min(facade.bays.len());
    facade.bays.insert(to, moved);
    tracing::debug!(bay = %bay, from, to, "bay moved");
    on_bays_reordered(facade);
    Ok(())
}

/// Remove a bay. Bays linked to it become independent; its groups are revalidated.
///
/// A former slave falls back to its own size, which may be wider than the
/// bay it mirrored.
pub fn delete_bay(building: &mut BuildingConfig, key: &FacadeKey, bay: &BayId) -> Result<Bay, EditError> {
    commit_checked(building, |b| {
        let facade = facade_mut(b, key)?;
        let Some(index) = facade.index_of(bay) else {
            return reject(EditError::UnknownBay(bay.clone()));
        };

        let removed = facade.bays.remove(index);
        unlink_slaves(facade, bay);
        on_bay_deleted(facade, bay);
        tracing::debug!(bay = %bay, "bay deleted");
        Ok(removed)
    })
}

/// Link `bay` to mirror `master`, or clear the link
pub fn link_bay(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    master: Option<&BayId>,
) -> Result<(), EditError> {
    let hops = building.engine.max_link_hops;
    commit_checked(building, |b| {
        let facade = facade_mut(b, key)?;
        set_link(facade, bay, master, hops)
    })
}

/// Set the repeat bounds of a group on a facade
pub fn set_repeat_bounds(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    group: &GroupId,
    min: u32,
    max: RepeatMax,
) -> Result<(), EditError> {
    commit_checked(building, |b| {
        let facade = facade_mut(b, key)?;
        set_group_repeat(facade, group, min, max)
    })
}

/// Lock `face` of a layer to mirror `master`, or unlock it with `None`
pub fn lock_face(
    building: &mut BuildingConfig,
    layer: &LayerId,
    face: FaceId,
    master: Option<FaceId>,
) -> Result<(), EditError> {
    let hops = building.engine.max_lock_hops;
    commit_checked(building, |b| {
        let Some(floor) = b.layer_mut(layer) else {
            return reject(EditError::UnknownLayer(layer.clone()));
        };
        set_face_lock(&mut floor.locks, face, master, hops)
    })
}

pub fn set_bay_size(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    size: BaySize,
) -> Result<(), EditError> {
    check_size(&size)?;
    commit_checked(building, |b| edit_bay(b, key, bay, true, |target| target.size = size))
}

pub fn set_window_enabled(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    enabled: bool,
) -> Result<(), EditError> {
    commit_checked(building, |b| {
        edit_bay(b, key, bay, true, |target| {
            target.window.get_or_insert_with(WindowSpec::default).enabled = enabled;
        })
    })
}

/// Point the bay's window at a library definition, or detach it with `None`
pub fn set_window_definition(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    def_id: Option<&str>,
) -> Result<(), EditError> {
    if let Some(id) = def_id {
        if building.windows.get(id).is_none() {
            return reject(EditError::UnknownWindowDefinition(id.to_string()));
        }
    }
    let def_id = def_id.map(str::to_string);
    commit_checked(building, |b| {
        edit_bay(b, key, bay, true, |target| {
            target.window.get_or_insert_with(WindowSpec::default).def_id = def_id;
        })
    })
}

/// Set the user's window width range
pub fn set_window_width(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    min: f64,
    max: Option<f64>,
) -> Result<(), EditError> {
    if !min.is_finite() || min < 0.0 {
        return reject(EditError::invalid_width(min, "window minimum must be non-negative"));
    }
    if let Some(max) = max {
        if !max.is_finite() || max < min {
            return reject(EditError::invalid_width(
                max,
                "window maximum must not be below its minimum",
            ));
        }
    }
    commit_checked(building, |b| {
        edit_bay(b, key, bay, true, |target| {
            let window = target.window.get_or_insert_with(WindowSpec::default);
            window.width.min = min;
            window.width.max = max;
        })
    })
}

/// Set window padding. Negative values clamp to zero; linked padding copies `left` to both sides.
pub fn set_window_padding(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    left: f64,
    right: f64,
) -> Result<(), EditError> {
    if !left.is_finite() || !right.is_finite() {
        return reject(EditError::invalid_width(
            if left.is_finite() { right } else { left },
            "padding must be finite",
        ));
    }
    commit_checked(building, |b| {
        edit_bay(b, key, bay, true, |target| {
            let padding = &mut target.window.get_or_insert_with(WindowSpec::default).padding;
            padding.left = left.max(0.0);
            padding.right = if padding.linked {
                padding.left
            } else {
                right.max(0.0)
            };
        })
    })
}

pub fn set_wall_material(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    material: Option<String>,
) -> Result<(), EditError> {
    edit_bay(building, key, bay, false, |b| b.wall_material_override = material)
}

/// Set wall depth offsets; linked depth copies `left` to both sides
pub fn set_bay_depth(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    left: f64,
    right: f64,
) -> Result<(), EditError> {
    if !left.is_finite() || !right.is_finite() {
        return reject(EditError::invalid_width(
            if left.is_finite() { right } else { left },
            "depth must be finite",
        ));
    }
    edit_bay(building, key, bay, false, |b| {
        b.depth.left = left;
        b.depth.right = if b.depth.linked { left } else { right };
    })
}

pub fn set_expand_preference(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    preference: ExpandPreference,
) -> Result<(), EditError> {
    edit_bay(building, key, bay, false, |b| b.expand_preference = preference)
}

pub fn set_texture_flow(
    building: &mut BuildingConfig,
    key: &FacadeKey,
    bay: &BayId,
    flow: TextureFlow,
) -> Result<(), EditError> {
    edit_bay(building, key, bay, false, |b| b.texture_flow = flow)
}

/// Change a shared window definition's intrinsic width and re-enforce every bay using it.
/// Returns the number of bays whose size changed.
///
/// Every layer is checked before the new width is kept.
pub fn set_definition_width(
    building: &mut BuildingConfig,
    def_id: &str,
    width: f64,
) -> Result<usize, EditError> {
    check_width(width)?;
    commit_checked(building, |b| {
        match b.windows.get_mut(def_id) {
            Some(definition) => definition.settings.width = width,
            None => return reject(EditError::UnknownWindowDefinition(def_id.to_string())),
        }
        Ok(on_definition_width_changed(b, def_id))
    })
}
