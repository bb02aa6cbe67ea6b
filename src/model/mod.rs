//! In-memory building model
//!
//! Everything the editor mutates lives in one [`BuildingConfig`] that callers own
//! and pass by reference. There is no module-level state.

mod bay;
mod building;
mod types;

pub use bay::{
    Bay, BayDepth, BayGroup, BaySize, ExpandPreference, RepeatBounds, RepeatMax, TextureFlow,
    WindowPadding, WindowSpec, WindowWidth,
};
pub use building::{
    BuildingConfig, FaceLockMap, Facade, FloorLayer, WindowDefinition, WindowLibrary,
    WindowSettings,
};
pub use types::{BayId, FaceId, GroupId, LayerId, Point2};
