//! Hover detection in screen space

use crate::config::EngineConfig;
use crate::model::{FaceId, Point2};

use super::geometry::FootprintLoop;

/// A position on screen, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Maps footprint points to screen space; implemented by the host camera
pub trait ScreenProjector {
    /// Screen position of a footprint point, `None` when it is behind the camera
    fn project(&self, point: Point2) -> Option<ScreenPoint>;
}

impl<F> ScreenProjector for F
where
    F: Fn(Point2) -> Option<ScreenPoint>,
{
    fn project(&self, point: Point2) -> Option<ScreenPoint> {
        self(point)
    }
}

/// Something on the footprint that can be dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    /// Footprint point by index
    Vertex(usize),
    /// A whole face edge
    Edge(FaceId),
}

fn distance_to_segment(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance(ScreenPoint::new(a.x + abx * t, a.y + aby * t))
}

/// Pick the handle under the pointer: the nearest vertex within the vertex
/// radius, else the nearest edge within the edge radius, else nothing.
pub fn pick_handle(
    footprint: &FootprintLoop,
    projector: &impl ScreenProjector,
    pointer: ScreenPoint,
    config: &EngineConfig,
) -> Option<DragHandle> {
    let projected: [Option<ScreenPoint>; 4] = footprint.points.map(|p| projector.project(p));

    let vertex = projected
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|p| (i, p.distance(pointer))))
        .filter(|(_, d)| *d <= config.vertex_pick_radius_px)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((index, _)) = vertex {
        return Some(DragHandle::Vertex(index));
    }

    FaceId::ALL
        .iter()
        .filter_map(|&face| {
            let a = projected[face.index()]?;
            let b = projected[(face.index() + 1) % 4]?;
            Some((face, distance_to_segment(pointer, a, b)))
        })
        .filter(|(_, d)| *d <= config.edge_pick_radius_px)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(face, _)| DragHandle::Edge(face))
}
