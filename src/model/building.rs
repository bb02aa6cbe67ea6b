//! Facades, floor layers, and the building configuration that owns them

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::{ConfigError, EditError};
use crate::facade::links::find_link_cycle;
use crate::facade::locks::find_lock_cycle;
use crate::facade::FacadeResolver;
use crate::footprint::FootprintLoop;

use super::bay::{Bay, BayGroup, RepeatBounds, RepeatMax};
use super::types::{BayId, FaceId, GroupId, LayerId};

/// Intrinsic settings of a shared window definition
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WindowSettings {
    pub width: f64,
    pub height: f64,
}

/// A window type from the shared library, referenced by bays through `def_id`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub settings: WindowSettings,
}

/// Registry of window definitions keyed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowLibrary {
    definitions: BTreeMap<String, WindowDefinition>,
}

impl WindowLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a definition
    pub fn insert(&mut self, definition: WindowDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &str) -> Option<&WindowDefinition> {
        self.definitions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut WindowDefinition> {
        self.definitions.get_mut(id)
    }

    /// Intrinsic width of a definition, if it exists
    pub fn width_of(&self, id: &str) -> Option<f64> {
        self.get(id).map(|d| d.settings.width)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowDefinition> {
        self.definitions.values()
    }
}

/// Bays and groups of one (floor layer, face) pair
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Facade {
    #[serde(default)]
    pub bays: Vec<Bay>,
    #[serde(default)]
    pub groups: Vec<BayGroup>,
}

impl Facade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a facade from bays, without groups
    pub fn with_bays(bays: Vec<Bay>) -> Self {
        Self {
            bays,
            groups: Vec::new(),
        }
    }

    pub fn bay(&self, id: &BayId) -> Option<&Bay> {
        self.bays.iter().find(|b| &b.id == id)
    }

    pub fn bay_mut(&mut self, id: &BayId) -> Option<&mut Bay> {
        self.bays.iter_mut().find(|b| &b.id == id)
    }

    /// Position of a bay in facade order
    pub fn index_of(&self, id: &BayId) -> Option<usize> {
        self.bays.iter().position(|b| &b.id == id)
    }

    pub fn contains_bay(&self, id: &BayId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn group(&self, id: &GroupId) -> Option<&BayGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn group_mut(&mut self, id: &GroupId) -> Option<&mut BayGroup> {
        self.groups.iter_mut().find(|g| &g.id == id)
    }

    /// The group a bay belongs to, if any
    pub fn group_of(&self, bay: &BayId) -> Option<&BayGroup> {
        self.groups.iter().find(|g| g.contains(bay))
    }
}

/// Per-layer mapping of a face to the face whose configuration it mirrors
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FaceLockMap {
    locks: BTreeMap<FaceId, FaceId>,
}

impl FaceLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The face `face` is directly locked to
    pub fn master_of(&self, face: FaceId) -> Option<FaceId> {
        self.locks.get(&face).copied()
    }

    pub(crate) fn set(&mut self, face: FaceId, master: Option<FaceId>) {
        match master {
            Some(master) => self.locks.insert(face, master),
            None => self.locks.remove(&face),
        };
    }
}

/// One storey of the building: its footprint, facades, and face locks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FloorLayer {
    pub id: LayerId,
    pub footprint: FootprintLoop,
    #[serde(default)]
    pub facades: BTreeMap<FaceId, Facade>,
    #[serde(default)]
    pub locks: FaceLockMap,
}

impl FloorLayer {
    /// Create a layer with empty facades on all four faces
    pub fn new(id: impl Into<LayerId>, footprint: FootprintLoop) -> Self {
        Self {
            id: id.into(),
            footprint,
            facades: FaceId::ALL.iter().map(|f| (*f, Facade::new())).collect(),
            locks: FaceLockMap::new(),
        }
    }

    pub fn facade(&self, face: FaceId) -> Option<&Facade> {
        self.facades.get(&face)
    }

    pub fn facade_mut(&mut self, face: FaceId) -> Option<&mut Facade> {
        self.facades.get_mut(&face)
    }

    /// Replace the facade on a face
    pub fn set_facade(&mut self, face: FaceId, facade: Facade) {
        self.facades.insert(face, facade);
    }
}

/// The single, explicitly owned building configuration every editor works on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingConfig {
    pub engine: EngineConfig,
    pub windows: WindowLibrary,
    pub layers: Vec<FloorLayer>,
}

#[derive(Deserialize)]
struct TomlBuilding {
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    windows: Vec<WindowDefinition>,
    #[serde(default)]
    layers: Vec<FloorLayer>,
}

impl BuildingConfig {
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            windows: WindowLibrary::new(),
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: FloorLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_window(mut self, definition: WindowDefinition) -> Self {
        self.windows.insert(definition);
        self
    }

    pub fn layer(&self, id: &LayerId) -> Option<&FloorLayer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn layer_mut(&mut self, id: &LayerId) -> Option<&mut FloorLayer> {
        self.layers.iter_mut().find(|l| &l.id == id)
    }

    /// Look up a layer, reporting a missing one as an edit error
    pub fn require_layer(&self, id: &LayerId) -> Result<&FloorLayer, EditError> {
        self.layer(id)
            .ok_or_else(|| EditError::UnknownLayer(id.clone()))
    }

    /// Mutable access to the facade of a (layer, face) pair
    pub fn facade_mut(&mut self, layer: &LayerId, face: FaceId) -> Result<&mut Facade, EditError> {
        let floor = self
            .layer_mut(layer)
            .ok_or_else(|| EditError::UnknownLayer(layer.clone()))?;
        floor.facade_mut(face).ok_or(EditError::UnknownFacade {
            layer: layer.clone(),
            face,
        })
    }

    /// Load a building fixture from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a building fixture from a TOML string.
    ///
    /// Groups are normalized with the same rules as interactive edits. A
    /// fixture is rejected when it holds duplicate ids, broken links or locks,
    /// invalid repeat bounds, or a footprint that is not a valid outline for
    /// the minimums its own facades resolve to.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlBuilding = toml::from_str(content)?;

        let mut building = BuildingConfig::new(parsed.engine);
        for definition in parsed.windows {
            if building.windows.get(&definition.id).is_some() {
                return Err(ConfigError::invalid(format!(
                    "duplicate window definition '{}'",
                    definition.id
                )));
            }
            building.windows.insert(definition);
        }

        let mut layer_ids = HashSet::new();
        for mut layer in parsed.layers {
            if !layer_ids.insert(layer.id.clone()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate floor layer '{}'",
                    layer.id
                )));
            }
            if !layer.footprint.is_finite() {
                return Err(ConfigError::invalid(format!(
                    "footprint of layer '{}' has non-finite coordinates",
                    layer.id
                )));
            }
            for face in FaceId::ALL {
                let facade = layer.facades.entry(face).or_default();
                check_facade(facade, &layer.id, face)?;
                crate::facade::groups::revalidate_groups(facade);
            }
            check_locks(&layer)?;

            let minimums =
                FacadeResolver::new(&building.windows, &building.engine).face_minimums(&layer);
            if let Err(defect) = layer.footprint.check(&minimums, &building.engine) {
                return Err(ConfigError::invalid(format!(
                    "footprint of layer '{}' is invalid: {}",
                    layer.id, defect
                )));
            }
            building.layers.push(layer);
        }

        Ok(building)
    }
}

fn check_facade(facade: &Facade, layer: &LayerId, face: FaceId) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for bay in &facade.bays {
        if !seen.insert(bay.id.clone()) {
            return Err(ConfigError::invalid(format!(
                "duplicate bay id '{}' on layer '{}' face {}",
                bay.id, layer, face
            )));
        }
    }

    for bay in &facade.bays {
        match &bay.link_from {
            Some(source) if source == &bay.id => {
                return Err(ConfigError::invalid(format!(
                    "bay '{}' on layer '{}' face {} links to itself",
                    bay.id, layer, face
                )))
            }
            Some(source) if !facade.contains_bay(source) => {
                return Err(ConfigError::invalid(format!(
                    "bay '{}' on layer '{}' face {} links to unknown bay '{}'",
                    bay.id, layer, face, source
                )))
            }
            _ => {}
        }
    }
    if let Some(bay) = find_link_cycle(facade) {
        return Err(ConfigError::invalid(format!(
            "bay links on layer '{}' face {} form a cycle through '{}'",
            layer, face, bay
        )));
    }

    for group in &facade.groups {
        let RepeatBounds { min, max } = group.repeat;
        if min < 1 {
            return Err(ConfigError::invalid(format!(
                "group '{}' on layer '{}' face {} must repeat at least once",
                group.id, layer, face
            )));
        }
        if let RepeatMax::Count(max) = max {
            if max < min {
                return Err(ConfigError::invalid(format!(
                    "group '{}' on layer '{}' face {} has maximum repeats {} below minimum {}",
                    group.id, layer, face, max, min
                )));
            }
        }
    }
    Ok(())
}

fn check_locks(layer: &FloorLayer) -> Result<(), ConfigError> {
    for face in FaceId::ALL {
        if layer.locks.master_of(face) == Some(face) {
            return Err(ConfigError::invalid(format!(
                "face {} of layer '{}' is locked to itself",
                face, layer.id
            )));
        }
    }
    if let Some(face) = find_lock_cycle(&layer.locks) {
        return Err(ConfigError::invalid(format!(
            "face locks of layer '{}' form a cycle through face {}",
            layer.id, face
        )));
    }
    Ok(())
}
