//! Vertex drag helpers: axis constraint and right-angle snapping
//!
//! ## Right-angle snap
//!
//! Every point on the circle whose diameter is the segment between a vertex's
//! two neighbours sees that segment at a right angle (Thales). Snapping moves
//! the candidate radially onto that circle, and only when it is already close.

use crate::config::EngineConfig;
use crate::model::Point2;

/// Axis behaviour of a vertex drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisConstraint {
    #[default]
    Free,
    /// Slide along whichever adjacent edge direction is closer to the pointer
    AlongAdjacentEdge,
}

/// Angle snapping of a vertex drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleSnap {
    #[default]
    Off,
    RightAngle,
}

/// Modifier state for one drag update, supplied by the host's input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragModifiers {
    pub axis: AxisConstraint,
    pub snap: AngleSnap,
}

impl DragModifiers {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, axis: AxisConstraint) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_snap(mut self, snap: AngleSnap) -> Self {
        self.snap = snap;
        self
    }
}

/// Distance from `point` to the infinite line through `origin` along unit `direction`
fn distance_to_line(point: Point2, origin: Point2, direction: Point2) -> f64 {
    (point - origin).cross(direction).abs()
}

/// Restrict `delta` to the adjacent edge direction closest to the pointer.
///
/// `origin` is the vertex at drag start, `tangents` the unit directions towards
/// its two neighbours. Missing tangents leave the delta unchanged.
pub fn constrain_to_edge(origin: Point2, delta: Point2, tangents: [Option<Point2>; 2]) -> Point2 {
    let pointer = origin + delta;
    let closest = tangents
        .iter()
        .flatten()
        .map(|&dir| (distance_to_line(pointer, origin, dir), dir))
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match closest {
        Some((_, dir)) => dir * delta.dot(dir),
        None => delta,
    }
}

/// Try to snap `candidate` so that the corner between neighbours `a` and `b` is a right angle.
///
/// `previous` is the vertex position before this drag step; it scales the
/// acceptance threshold. Returns `None` when no snap applies.
pub fn snap_right_angle(
    candidate: Point2,
    previous: Point2,
    a: Point2,
    b: Point2,
    config: &EngineConfig,
) -> Option<Point2> {
    let center = a.midpoint(b);
    let radius = a.distance(b) / 2.0;
    if radius <= config.edge_epsilon {
        return None;
    }

    let direction = (candidate - center).normalized()?;
    let snapped = center + direction * radius;

    let span = previous
        .distance(a)
        .min(previous.distance(b))
        .min(a.distance(b));
    let threshold = config.snap_threshold(span);

    if snapped.distance(candidate) <= threshold {
        Some(snapped)
    } else {
        None
    }
}
