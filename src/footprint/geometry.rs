//! Footprint polygon geometry and validity
//!
//! A footprint is a closed quadrilateral on the (x, z) plane. Edge `i` runs
//! from point `i` to point `i + 1 mod 4` and carries face `i` (A..D).
//!
//! ## Validity
//!
//! A loop is valid when all coordinates are finite, every edge has non-zero
//! length, the two pairs of opposite edges do not touch or cross (for a
//! quadrilateral those are the only pairs that can intersect without sharing
//! a vertex), the signed area is away from zero, and every edge is at least as
//! long as its face's resolved minimum width.

use std::fmt;

use serde::Deserialize;

use crate::config::EngineConfig;
use crate::facade::FaceMinimums;
use crate::model::{FaceId, Point2};

/// The 4-point outline of a floor layer
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[Point2; 4]")]
pub struct FootprintLoop {
    pub points: [Point2; 4],
}

impl From<[Point2; 4]> for FootprintLoop {
    fn from(points: [Point2; 4]) -> Self {
        Self { points }
    }
}

/// Unit tangent and outward normal of one footprint edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    pub tangent: Point2,
    pub outward_normal: Point2,
}

/// Why a footprint loop is not valid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopDefect {
    NonFinite,
    DegenerateEdge(FaceId),
    SelfIntersecting,
    ZeroArea,
    BelowMinimum {
        face: FaceId,
        length: f64,
        minimum: f64,
    },
}

impl fmt::Display for LoopDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopDefect::NonFinite => write!(f, "non-finite coordinates"),
            LoopDefect::DegenerateEdge(face) => write!(f, "face {} has zero length", face),
            LoopDefect::SelfIntersecting => write!(f, "outline intersects itself"),
            LoopDefect::ZeroArea => write!(f, "outline has no area"),
            LoopDefect::BelowMinimum {
                face,
                length,
                minimum,
            } => write!(
                f,
                "face {} is {:.3} m, below its {:.3} m minimum",
                face, length, minimum
            ),
        }
    }
}

impl FootprintLoop {
    pub fn new(points: [Point2; 4]) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle with one corner at the origin; face A runs along +x
    pub fn rectangle(width: f64, depth: f64) -> Self {
        Self::new([
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, depth),
            Point2::new(0.0, depth),
        ])
    }

    pub fn point(&self, index: usize) -> Point2 {
        self.points[index % 4]
    }

    /// Start and end point of a face's edge
    pub fn edge(&self, face: FaceId) -> (Point2, Point2) {
        let i = face.index();
        (self.point(i), self.point(i + 1))
    }

    pub fn edge_length(&self, face: FaceId) -> f64 {
        let (a, b) = self.edge(face);
        a.distance(b)
    }

    pub fn edge_lengths(&self) -> [f64; 4] {
        FaceId::ALL.map(|face| self.edge_length(face))
    }

    /// Shoelace area; positive when the loop winds counter-clockwise in (x, z)
    pub fn signed_area(&self) -> f64 {
        let mut twice = 0.0;
        for i in 0..4 {
            twice += self.point(i).cross(self.point(i + 1));
        }
        twice / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    /// Whether neither pair of opposite edges touches or crosses
    pub fn is_simple(&self) -> bool {
        let (a0, a1) = self.edge(FaceId::A);
        let (c0, c1) = self.edge(FaceId::C);
        let (b0, b1) = self.edge(FaceId::B);
        let (d0, d1) = self.edge(FaceId::D);
        !segments_intersect(a0, a1, c0, c1) && !segments_intersect(b0, b1, d0, d1)
    }

    /// Tangent/outward-normal frame of a face, `None` for a zero-length edge
    pub fn face_frame(&self, face: FaceId) -> Option<FaceFrame> {
        let (a, b) = self.edge(face);
        let tangent = (b - a).normalized()?;
        // Outward is to the right of travel for counter-clockwise loops.
        let right = Point2::new(tangent.z, -tangent.x);
        let outward_normal = if self.signed_area() >= 0.0 {
            right
        } else {
            right * -1.0
        };
        Some(FaceFrame {
            tangent,
            outward_normal,
        })
    }

    /// Point-wise interpolation towards `other`
    pub fn lerp(&self, other: &FootprintLoop, t: f64) -> FootprintLoop {
        FootprintLoop::new([0, 1, 2, 3].map(|i| self.points[i].lerp(other.points[i], t)))
    }

    /// Largest point displacement between two loops
    pub fn max_deviation(&self, other: &FootprintLoop) -> f64 {
        (0..4)
            .map(|i| self.points[i].distance(other.points[i]))
            .fold(0.0, f64::max)
    }

    /// Check shape validity only (no per-face minimums)
    pub fn check_shape(&self, config: &EngineConfig) -> Result<(), LoopDefect> {
        if !self.is_finite() {
            return Err(LoopDefect::NonFinite);
        }
        for face in FaceId::ALL {
            if self.edge_length(face) <= config.edge_epsilon {
                return Err(LoopDefect::DegenerateEdge(face));
            }
        }
        if !self.is_simple() {
            return Err(LoopDefect::SelfIntersecting);
        }
        if self.signed_area().abs() <= config.area_epsilon {
            return Err(LoopDefect::ZeroArea);
        }
        Ok(())
    }

    /// Full validity: shape plus every face at least as long as its minimum
    pub fn check(&self, minimums: &FaceMinimums, config: &EngineConfig) -> Result<(), LoopDefect> {
        self.check_shape(config)?;
        for face in FaceId::ALL {
            let length = self.edge_length(face);
            let minimum = minimums.get(face);
            if length + config.min_length_tolerance < minimum {
                return Err(LoopDefect::BelowMinimum {
                    face,
                    length,
                    minimum,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self, minimums: &FaceMinimums, config: &EngineConfig) -> bool {
        self.check(minimums, config).is_ok()
    }
}

fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).cross(c - a)
}

/// `p` lies in the bounding box of segment `a`-`b` (used for collinear cases)
fn within_box(a: Point2, b: Point2, p: Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.z >= a.z.min(b.z) && p.z <= a.z.max(b.z)
}

/// Whether segments `a`-`b` and `c`-`d` share any point, touching included
pub fn segments_intersect(a: Point2, b: Point2, c: Point2, d: Point2) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    let straddles = |p: f64, q: f64| (p > 0.0 && q < 0.0) || (p < 0.0 && q > 0.0);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1 == 0.0 && within_box(c, d, a))
        || (d2 == 0.0 && within_box(c, d, b))
        || (d3 == 0.0 && within_box(a, b, c))
        || (d4 == 0.0 && within_box(a, b, d))
}

/// Result of clamping a target loop against a validity predicate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp {
    pub footprint: FootprintLoop,
    /// Interpolation parameter reached, 1.0 when the target itself was valid
    pub t: f64,
}

/// Move from `from` towards `to` as far as `is_valid` allows.
///
/// `from` is assumed valid. If `to` is valid it is returned as-is; otherwise
/// a bisection over `lerp(from, to, t)` keeps the largest valid `t` found.
pub fn clamp_towards(
    from: &FootprintLoop,
    to: &FootprintLoop,
    iterations: u32,
    is_valid: impl Fn(&FootprintLoop) -> bool,
) -> Clamp {
    if is_valid(to) {
        return Clamp {
            footprint: *to,
            t: 1.0,
        };
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..iterations {
        let mid = (lo + hi) / 2.0;
        if is_valid(&from.lerp(to, mid)) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    tracing::trace!(t = lo, iterations, "bisection clamp finished");

    let footprint = if lo > 0.0 { from.lerp(to, lo) } else { *from };
    Clamp { footprint, t: lo }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_rectangle_lengths_and_area() {
        let r = FootprintLoop::rectangle(10.0, 6.0);
        assert_eq!(r.edge_lengths(), [10.0, 6.0, 10.0, 6.0]);
        assert_eq!(r.signed_area(), 60.0);
        assert!(r.is_simple());
    }

    #[test]
    fn test_outward_normals() {
        let r = FootprintLoop::rectangle(10.0, 6.0);
        let a = r.face_frame(FaceId::A).unwrap();
        assert_eq!(a.outward_normal, Point2::new(0.0, -1.0));
        let b = r.face_frame(FaceId::B).unwrap();
        assert_eq!(b.outward_normal, Point2::new(1.0, -0.0));

        let mut reversed = r;
        reversed.points.reverse();
        let n = reversed.face_frame(FaceId::A).unwrap().outward_normal;
        assert!(n.z > 0.5, "expected +z outward normal, got {:?}", n);
    }

    #[test]
    fn test_bow_tie_is_not_simple() {
        let bow_tie = FootprintLoop::new([
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        ]);
        assert!(!bow_tie.is_simple());
        assert_eq!(bow_tie.check_shape(&config()), Err(LoopDefect::SelfIntersecting));
    }

    #[test]
    fn test_touching_counts_as_intersection() {
        assert!(segments_intersect(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 3.0),
        ));
        assert!(!segments_intersect(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(2.0, 1.0),
        ));
    }

    #[test]
    fn test_degenerate_edge_detected() {
        let collapsed = FootprintLoop::new([
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]);
        assert_eq!(
            collapsed.check_shape(&config()),
            Err(LoopDefect::DegenerateEdge(FaceId::A))
        );
    }

    #[test]
    fn test_non_finite_detected() {
        let mut r = FootprintLoop::rectangle(4.0, 4.0);
        r.points[2].x = f64::NAN;
        assert_eq!(r.check_shape(&config()), Err(LoopDefect::NonFinite));
    }

    #[test]
    fn test_minimum_check() {
        let r = FootprintLoop::rectangle(4.0, 2.0);
        assert!(r.is_valid(&FaceMinimums::uniform(2.0), &config()));
        assert!(matches!(
            r.check(&FaceMinimums::uniform(3.0), &config()),
            Err(LoopDefect::BelowMinimum {
                face: FaceId::B,
                ..
            })
        ));
    }

    #[test]
    fn test_clamp_of_valid_loop_is_identity() {
        let r = FootprintLoop::rectangle(8.0, 5.0);
        let minimums = FaceMinimums::uniform(1.0);
        let clamp = clamp_towards(&r, &r, 22, |l| l.is_valid(&minimums, &config()));
        assert_eq!(clamp.t, 1.0);
        assert!(clamp.footprint.max_deviation(&r) < 1e-12);
    }

    #[test]
    fn test_clamp_stops_at_boundary() {
        let from = FootprintLoop::rectangle(8.0, 5.0);
        let to = FootprintLoop::rectangle(8.0, 1.0);
        let minimums = FaceMinimums([1.0, 3.0, 1.0, 3.0]);
        let clamp = clamp_towards(&from, &to, 22, |l| l.is_valid(&minimums, &config()));
        let depth = clamp.footprint.edge_length(FaceId::B);
        assert!(depth >= 3.0 && depth < 3.0 + 1e-5, "depth {}", depth);
    }

    #[test]
    fn test_clamp_with_no_valid_step_stays_put() {
        let from = FootprintLoop::rectangle(3.0, 3.0);
        let to = FootprintLoop::rectangle(1.0, 3.0);
        let minimums = FaceMinimums::uniform(3.0);
        let clamp = clamp_towards(&from, &to, 22, |l| l.is_valid(&minimums, &config()));
        assert_eq!(clamp.t, 0.0);
        assert_eq!(clamp.footprint, from);
    }
}
