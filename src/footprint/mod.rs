//! Footprint polygon editing
//!
//! The footprint of a floor layer is edited by dragging a vertex or a whole
//! edge. The editor consults the facade resolver for per-face minimum widths
//! and never commits a loop that is self-intersecting, degenerate, or shorter
//! than a face's minimum.

pub mod editor;
pub mod geometry;
pub mod pick;
pub mod snap;
pub mod throttle;

pub use editor::{
    DragRejection, DragSession, DragStatus, DragStep, EditorState, FootprintEditor, RebuildRequest,
};
pub use geometry::{clamp_towards, segments_intersect, Clamp, FaceFrame, FootprintLoop, LoopDefect};
pub use pick::{pick_handle, DragHandle, ScreenPoint, ScreenProjector};
pub use snap::{AngleSnap, AxisConstraint, DragModifiers};
pub use throttle::RebuildThrottle;
