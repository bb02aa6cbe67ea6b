//! Facade Layout - constraint-preserving footprint and facade bay editing
//!
//! This library keeps a building's 4-sided footprint and its per-face bay
//! layout consistent while the user edits them. The facade model answers
//! "how wide must this face be", and the footprint editor never commits an
//! outline that violates those minimums or stops being a simple polygon.
//!
//! # Example
//!
//! ```rust
//! use std::time::Instant;
//!
//! use facade_layout::footprint::{DragHandle, DragModifiers, FootprintEditor, FootprintLoop};
//! use facade_layout::model::{Bay, BuildingConfig, FaceId, Facade, FloorLayer, Point2};
//!
//! let mut layer = FloorLayer::new("ground", FootprintLoop::rectangle(4.0, 6.0));
//! layer.set_facade(
//!     FaceId::A,
//!     Facade::with_bays(vec![Bay::range("a1", 1.0, None), Bay::range("a2", 2.0, None)]),
//! );
//! let mut building = BuildingConfig::default().with_layer(layer);
//!
//! let mut editor = FootprintEditor::new("ground", &building.engine);
//! editor
//!     .begin_drag(&building, DragHandle::Edge(FaceId::B), Point2::new(4.0, 3.0))
//!     .unwrap();
//! // Try to pull face B inwards until face A would be 2.5 m wide.
//! editor.update_drag(&mut building, Point2::new(2.5, 3.0), DragModifiers::free(), Instant::now());
//! editor.end_drag();
//!
//! let width = building.layers[0].footprint.edge_length(FaceId::A);
//! assert!((width - 3.0).abs() < 1e-4);
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod footprint;
pub mod model;
pub mod report;

pub use config::EngineConfig;
pub use error::{ConfigError, EditError};
pub use facade::{resolve_face_minimum_width, FacadeKey, FacadeResolver, FaceMinimums};
pub use footprint::{FootprintEditor, FootprintLoop};
pub use model::BuildingConfig;
pub use report::{layout_report, LayoutReport};
