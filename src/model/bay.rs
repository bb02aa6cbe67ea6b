//! Bays, bay groups and window specs

use serde::Deserialize;

use super::types::{BayId, GroupId};

/// How a bay declares its width
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BaySize {
    /// Exactly `width` meters
    Fixed { width: f64 },
    /// At least `min` meters, at most `max` (unbounded when `None`)
    Range {
        min: f64,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl BaySize {
    /// The smallest width this size admits on its own
    pub fn minimum(&self) -> f64 {
        match *self {
            BaySize::Fixed { width } => width,
            BaySize::Range { min, .. } => min,
        }
    }
}

impl Default for BaySize {
    fn default() -> Self {
        BaySize::Range {
            min: 1.0,
            max: None,
        }
    }
}

/// What the downstream layout does with slack along the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandPreference {
    #[default]
    NoRepeat,
    PreferRepeat,
    PreferExpand,
}

/// How the wall texture continues across bay boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFlow {
    #[default]
    Continuous,
    Restart,
}

/// Wall depth offsets of a bay. When `linked`, `right` mirrors `left`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BayDepth {
    pub left: f64,
    pub right: f64,
    pub linked: bool,
}

/// User-side window width range
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WindowWidth {
    pub min: f64,
    pub max: Option<f64>,
}

/// Wall padding on both sides of a window. When `linked`, `right` mirrors `left`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WindowPadding {
    pub left: f64,
    pub right: f64,
    pub linked: bool,
}

/// A window attached to a bay
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WindowSpec {
    pub enabled: bool,
    pub def_id: Option<String>,
    pub width: WindowWidth,
    pub padding: WindowPadding,
}

/// A width partition along a facade
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bay {
    pub id: BayId,
    #[serde(default)]
    pub size: BaySize,
    /// The bay this one mirrors. Always a chain root after a successful `set_link`.
    #[serde(default)]
    pub link_from: Option<BayId>,
    #[serde(default)]
    pub expand_preference: ExpandPreference,
    #[serde(default)]
    pub texture_flow: TextureFlow,
    #[serde(default)]
    pub depth: BayDepth,
    #[serde(default)]
    pub wall_material_override: Option<String>,
    #[serde(default)]
    pub window: Option<WindowSpec>,
}

impl Bay {
    /// Create an unlinked bay with the given size and no window
    pub fn new(id: impl Into<BayId>, size: BaySize) -> Self {
        Self {
            id: id.into(),
            size,
            link_from: None,
            expand_preference: ExpandPreference::default(),
            texture_flow: TextureFlow::default(),
            depth: BayDepth::default(),
            wall_material_override: None,
            window: None,
        }
    }

    /// Fixed-width bay
    pub fn fixed(id: impl Into<BayId>, width: f64) -> Self {
        Self::new(id, BaySize::Fixed { width })
    }

    /// Range bay with an optional upper bound
    pub fn range(id: impl Into<BayId>, min: f64, max: Option<f64>) -> Self {
        Self::new(id, BaySize::Range { min, max })
    }

    pub fn with_window(mut self, window: WindowSpec) -> Self {
        self.window = Some(window);
        self
    }

    pub fn is_linked(&self) -> bool {
        self.link_from.is_some()
    }

    /// The attached window, if present and enabled
    pub fn active_window(&self) -> Option<&WindowSpec> {
        self.window.as_ref().filter(|w| w.enabled)
    }
}

/// Upper repeat bound of a bay group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RepeatMaxRepr")]
pub enum RepeatMax {
    Count(u32),
    /// As many repeats as the facade width allows
    #[default]
    Auto,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepeatMaxRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<RepeatMaxRepr> for RepeatMax {
    type Error = String;

    fn try_from(repr: RepeatMaxRepr) -> Result<Self, Self::Error> {
        match repr {
            RepeatMaxRepr::Count(n) => Ok(RepeatMax::Count(n)),
            RepeatMaxRepr::Keyword(word) if word == "auto" => Ok(RepeatMax::Auto),
            RepeatMaxRepr::Keyword(word) => Err(format!(
                "expected a repeat count or \"auto\", found \"{}\"",
                word
            )),
        }
    }
}

/// Repeat-count bounds of a bay group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RepeatBounds {
    #[serde(default = "default_min_repeats")]
    pub min: u32,
    #[serde(default)]
    pub max: RepeatMax,
}

fn default_min_repeats() -> u32 {
    1
}

impl Default for RepeatBounds {
    fn default() -> Self {
        Self {
            min: 1,
            max: RepeatMax::Auto,
        }
    }
}

/// A contiguous run of bays repeated as a unit
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BayGroup {
    pub id: GroupId,
    /// Members in facade order
    pub bays: Vec<BayId>,
    #[serde(default)]
    pub repeat: RepeatBounds,
}

impl BayGroup {
    pub fn contains(&self, bay: &BayId) -> bool {
        self.bays.contains(bay)
    }
}
