//! Minimum width resolution
//!
//! Turns bays, links, groups and windows into one number per face: the
//! shortest footprint edge that can still host the face's facade. The resolver
//! only reads the building, so it can be queried as often as needed.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::model::{BayId, BuildingConfig, FaceId, Facade, FloorLayer, LayerId, WindowLibrary};

use super::groups::extra_repeat_width;
use super::locks::resolve_master_face;
use super::window::required_bay_width;

/// Resolved minimum width of every face of a layer, indexed by [`FaceId::index`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMinimums(pub [f64; 4]);

impl FaceMinimums {
    /// The same minimum on every face
    pub fn uniform(width: f64) -> Self {
        Self([width; 4])
    }

    pub fn get(&self, face: FaceId) -> f64 {
        self.0[face.index()]
    }
}

/// Read-only view answering "how wide must this bay / face be"
#[derive(Debug, Clone, Copy)]
pub struct FacadeResolver<'a> {
    windows: &'a WindowLibrary,
    config: &'a EngineConfig,
}

impl<'a> FacadeResolver<'a> {
    pub fn new(windows: &'a WindowLibrary, config: &'a EngineConfig) -> Self {
        Self { windows, config }
    }

    /// Resolver over a building's own window library and engine config
    pub fn for_building(building: &'a BuildingConfig) -> Self {
        Self::new(&building.windows, &building.engine)
    }

    /// Minimum width of one bay.
    ///
    /// Linked bays take their source's size. Every bay visited on the way
    /// raises the result to its own window floor. A repeated bay (only
    /// possible with malformed links) contributes the absolute minimum in
    /// place of a size, so only the window floors seen so far still apply.
    pub fn resolve_bay_minimum(&self, facade: &Facade, bay: &BayId) -> f64 {
        let floor = self.config.absolute_min_width;
        let mut visited: HashSet<&BayId> = HashSet::new();
        let mut window_floor: f64 = 0.0;
        let mut current = match facade.bay(bay) {
            Some(b) => b,
            None => return floor,
        };

        let base = loop {
            if !visited.insert(&current.id) || visited.len() > self.config.max_link_hops + 1 {
                tracing::warn!(bay = %bay, "link cycle while resolving bay minimum");
                return window_floor.max(floor);
            }
            window_floor = window_floor
                .max(required_bay_width(current, self.windows, self.config).unwrap_or(0.0));

            match current.link_from.as_ref().and_then(|source| facade.bay(source)) {
                Some(source) => current = source,
                None => break current.size.minimum(),
            }
        };

        base.max(window_floor).max(floor)
    }

    /// Members' own minimums summed, the width of one repeat of the group
    pub fn group_unit_width(&self, facade: &Facade, members: &[BayId]) -> f64 {
        members
            .iter()
            .map(|id| self.resolve_bay_minimum(facade, id))
            .sum()
    }

    /// Minimum width of a facade: every bay once, plus one unit per extra group repeat
    pub fn facade_minimum(&self, facade: &Facade) -> f64 {
        let bays: f64 = facade
            .bays
            .iter()
            .map(|b| self.resolve_bay_minimum(facade, &b.id))
            .sum();
        let repeats: f64 = facade
            .groups
            .iter()
            .map(|g| extra_repeat_width(g, self.group_unit_width(facade, &g.bays)))
            .sum();
        (bays + repeats).max(self.config.absolute_min_width)
    }

    /// Minimum edge length of `face` on `layer`, following face locks to the authoritative facade
    pub fn resolve_face_minimum(&self, layer: &FloorLayer, face: FaceId) -> f64 {
        let master = resolve_master_face(&layer.locks, face, self.config.max_lock_hops);
        match layer.facade(master) {
            Some(facade) => self.facade_minimum(facade),
            None => self.config.absolute_min_width,
        }
    }

    /// Minimums of all four faces of a layer
    pub fn face_minimums(&self, layer: &FloorLayer) -> FaceMinimums {
        FaceMinimums(FaceId::ALL.map(|face| self.resolve_face_minimum(layer, face)))
    }
}

/// Minimum edge length of a face, by layer id. Unknown layers resolve to the absolute minimum.
pub fn resolve_face_minimum_width(building: &BuildingConfig, layer: &LayerId, face: FaceId) -> f64 {
    match building.layer(layer) {
        Some(floor) => FacadeResolver::for_building(building).resolve_face_minimum(floor, face),
        None => building.engine.absolute_min_width,
    }
}
