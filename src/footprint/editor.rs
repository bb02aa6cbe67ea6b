//! Interactive footprint editing
//!
//! [`FootprintEditor`] runs one gesture at a time through
//! `Idle -> Hovering -> Dragging -> Idle`. Each drag update builds a target
//! loop from the loop captured at drag start plus the total pointer
//! displacement, then commits it if valid or the furthest valid loop between
//! the last committed loop and the target otherwise. The layer's footprint is
//! therefore valid after every call.

use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::{reject, EditError};
use crate::facade::{FaceMinimums, FacadeResolver};
use crate::model::{BuildingConfig, FaceId, LayerId, Point2};

use super::geometry::{clamp_towards, FootprintLoop, LoopDefect};
use super::pick::{pick_handle, DragHandle, ScreenPoint, ScreenProjector};
use super::snap::{constrain_to_edge, snap_right_angle, AngleSnap, AxisConstraint, DragModifiers};
use super::throttle::RebuildThrottle;

/// Geometry captured when a drag begins
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragFrame {
    Edge {
        face: FaceId,
        /// `None` when the edge had no length at drag start
        normal: Option<Point2>,
    },
    Vertex {
        index: usize,
        /// Unit directions towards the previous and next vertex
        tangents: [Option<Point2>; 2],
    },
}

/// An active drag gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub handle: DragHandle,
    pub start_loop: FootprintLoop,
    pub start_hit: Point2,
    frame: DragFrame,
    commits: usize,
}

impl DragSession {
    /// Number of updates that changed the footprint so far
    pub fn commits(&self) -> usize {
        self.commits
    }
}

/// Gesture state of the editor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Hovering(DragHandle),
    Dragging(DragSession),
}

/// Why a drag update was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragRejection {
    NotDragging,
    UnknownLayer,
    /// The last committed loop no longer satisfies the constraints
    StartInvalid(LoopDefect),
}

/// What a drag update did to the footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragStatus {
    /// The target loop was valid and committed as-is
    Committed,
    /// The target was invalid; the loop moved a fraction `t` of the way towards it
    Clamped { t: f64 },
    /// Nothing changed
    Unchanged,
    Rejected(DragRejection),
}

/// Outcome of one `update_drag` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub status: DragStatus,
    /// Whether the host should rebuild downstream geometry now
    pub rebuild: bool,
}

impl DragStep {
    fn quiet(status: DragStatus) -> Self {
        Self {
            status,
            rebuild: false,
        }
    }

    pub fn moved(&self) -> bool {
        matches!(
            self.status,
            DragStatus::Committed | DragStatus::Clamped { .. }
        )
    }
}

/// Final rebuild request emitted when a drag ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildRequest {
    pub layer: LayerId,
    /// Whether the footprint changed during the drag
    pub changed: bool,
    /// Whether the last commit's rebuild was still held back by the throttle
    pub coalesced: bool,
}

/// Drag-driven editor for one floor layer's footprint
#[derive(Debug, Clone)]
pub struct FootprintEditor {
    layer: LayerId,
    state: EditorState,
    throttle: RebuildThrottle,
}

impl FootprintEditor {
    pub fn new(layer: impl Into<LayerId>, config: &EngineConfig) -> Self {
        Self {
            layer: layer.into(),
            state: EditorState::Idle,
            throttle: RebuildThrottle::new(config.rebuild_interval()),
        }
    }

    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, EditorState::Dragging(_))
    }

    /// Update hover state from the pointer. While dragging the hover target is frozen.
    pub fn hover(
        &mut self,
        building: &BuildingConfig,
        projector: &impl ScreenProjector,
        pointer: ScreenPoint,
    ) -> Option<DragHandle> {
        if let EditorState::Dragging(session) = &self.state {
            return Some(session.handle);
        }

        let handle = building
            .layer(&self.layer)
            .and_then(|layer| pick_handle(&layer.footprint, projector, pointer, &building.engine));
        self.state = match handle {
            Some(handle) => EditorState::Hovering(handle),
            None => EditorState::Idle,
        };
        handle
    }

    /// Start dragging `handle` from the world point `start_hit`.
    ///
    /// A drag already in progress is finished first.
    pub fn begin_drag(
        &mut self,
        building: &BuildingConfig,
        handle: DragHandle,
        start_hit: Point2,
    ) -> Result<(), EditError> {
        let Some(layer) = building.layer(&self.layer) else {
            return reject(EditError::UnknownLayer(self.layer.clone()));
        };
        if self.is_dragging() {
            self.end_drag();
        }

        let start_loop = layer.footprint;
        let (handle, frame) = match handle {
            DragHandle::Edge(face) => (
                handle,
                DragFrame::Edge {
                    face,
                    normal: start_loop.face_frame(face).map(|f| f.outward_normal),
                },
            ),
            DragHandle::Vertex(index) => {
                let index = index % 4;
                let vertex = start_loop.point(index);
                let tangents = [
                    (start_loop.point(index + 3) - vertex).normalized(),
                    (start_loop.point(index + 1) - vertex).normalized(),
                ];
                (DragHandle::Vertex(index), DragFrame::Vertex { index, tangents })
            }
        };

        tracing::debug!(layer = %self.layer, handle = ?handle, "drag started");
        self.state = EditorState::Dragging(DragSession {
            handle,
            start_loop,
            start_hit,
            frame,
            commits: 0,
        });
        Ok(())
    }

    /// Move the drag to the world point `hit`.
    ///
    /// `now` drives rebuild rate limiting; the footprint update itself is
    /// never deferred.
    pub fn update_drag(
        &mut self,
        building: &mut BuildingConfig,
        hit: Point2,
        modifiers: DragModifiers,
        now: Instant,
    ) -> DragStep {
        let EditorState::Dragging(session) = &mut self.state else {
            return DragStep::quiet(DragStatus::Rejected(DragRejection::NotDragging));
        };

        let (current, minimums) = match building.layer(&self.layer) {
            Some(layer) => (
                layer.footprint,
                FacadeResolver::for_building(building).face_minimums(layer),
            ),
            None => {
                tracing::warn!(layer = %self.layer, "drag update on missing layer");
                return DragStep::quiet(DragStatus::Rejected(DragRejection::UnknownLayer));
            }
        };
        let config = &building.engine;

        if let Err(defect) = current.check(&minimums, config) {
            tracing::warn!(layer = %self.layer, %defect, "drag update rejected: committed loop is invalid");
            return DragStep::quiet(DragStatus::Rejected(DragRejection::StartInvalid(defect)));
        }

        let target = build_target(session, &current, hit, modifiers, config);
        if target == current {
            return DragStep::quiet(DragStatus::Unchanged);
        }

        let clamp = clamp_towards(&current, &target, config.bisection_iterations, |candidate| {
            candidate.is_valid(&minimums, config)
        });
        if clamp.t <= 0.0 {
            tracing::debug!(layer = %self.layer, "drag blocked at constraint boundary");
            return DragStep::quiet(DragStatus::Unchanged);
        }

        let status = if clamp.t >= 1.0 {
            DragStatus::Committed
        } else {
            tracing::debug!(layer = %self.layer, t = clamp.t, "drag clamped");
            DragStatus::Clamped { t: clamp.t }
        };

        session.commits += 1;
        if let Some(layer) = building.layer_mut(&self.layer) {
            layer.footprint = clamp.footprint;
        }
        DragStep {
            status,
            rebuild: self.throttle.request(now),
        }
    }

    /// Finish the drag at the last committed loop and request a final rebuild
    pub fn end_drag(&mut self) -> Option<RebuildRequest> {
        let EditorState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let coalesced = self.throttle.flush();
        tracing::debug!(layer = %self.layer, commits = session.commits, coalesced, "drag finished");
        Some(RebuildRequest {
            layer: self.layer.clone(),
            changed: session.commits > 0,
            coalesced,
        })
    }

    /// Pointer cancelled or left the surface; the last committed loop stays
    pub fn cancel_drag(&mut self) -> Option<RebuildRequest> {
        self.end_drag()
    }

    /// Faces whose lengths the current drag changes, for measurement labels
    pub fn active_guides(&self) -> Vec<FaceId> {
        let EditorState::Dragging(session) = &self.state else {
            return Vec::new();
        };
        match session.frame {
            DragFrame::Edge { face, .. } => vec![face.prev(), face, face.next()],
            DragFrame::Vertex { index, .. } => {
                let outgoing = FaceId::from_index(index);
                vec![outgoing.prev(), outgoing]
            }
        }
    }
}

/// Target loop for a drag: the drag-start loop displaced by the total pointer motion
fn build_target(
    session: &DragSession,
    current: &FootprintLoop,
    hit: Point2,
    modifiers: DragModifiers,
    config: &EngineConfig,
) -> FootprintLoop {
    let start = session.start_loop;
    let delta = hit - session.start_hit;
    let mut target = start;

    match session.frame {
        DragFrame::Edge { face, normal } => {
            let Some(normal) = normal else {
                return *current;
            };
            let offset = normal * delta.dot(normal);
            let i = face.index();
            target.points[i] = start.point(i) + offset;
            target.points[(i + 1) % 4] = start.point(i + 1) + offset;
        }
        DragFrame::Vertex { index, tangents } => {
            let origin = start.point(index);
            let delta = match modifiers.axis {
                AxisConstraint::Free => delta,
                AxisConstraint::AlongAdjacentEdge => constrain_to_edge(origin, delta, tangents),
            };
            let mut candidate = origin + delta;
            if modifiers.snap == AngleSnap::RightAngle {
                let previous = current.point(index);
                let a = start.point(index + 3);
                let b = start.point(index + 1);
                if let Some(snapped) = snap_right_angle(candidate, previous, a, b, config) {
                    candidate = snapped;
                }
            }
            target.points[index] = candidate;
        }
    }
    target
}
