//! Configuration for the layout engine

use std::time::Duration;

use serde::Deserialize;

/// Tunable constants shared by the facade resolver and the footprint editor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Floor applied to every resolved bay and face width (meters)
    pub absolute_min_width: f64,

    /// Ceiling for window-driven bay widths (meters)
    pub absolute_max_width: f64,

    /// Maximum number of `link_from` hops followed before giving up
    pub max_link_hops: usize,

    /// Maximum number of face-lock hops followed before giving up
    pub max_lock_hops: usize,

    /// Minimum |signed area| of a valid footprint (square meters)
    pub area_epsilon: f64,

    /// Minimum length of a footprint edge (meters)
    pub edge_epsilon: f64,

    /// Slack allowed when comparing an edge length to its resolved minimum
    pub min_length_tolerance: f64,

    /// Iterations of the bisection clamp
    pub bisection_iterations: u32,

    /// Screen-space radius for picking a vertex handle (pixels)
    pub vertex_pick_radius_px: f64,

    /// Screen-space radius for picking an edge handle (pixels)
    pub edge_pick_radius_px: f64,

    /// Right-angle snap threshold as a fraction of the shortest local span
    pub snap_threshold_factor: f64,

    /// Lower bound of the right-angle snap threshold (meters)
    pub snap_threshold_min: f64,

    /// Upper bound of the right-angle snap threshold (meters)
    pub snap_threshold_max: f64,

    /// Downstream rebuild frequency while dragging (Hz)
    pub rebuild_rate_hz: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            absolute_min_width: 1.0,
            absolute_max_width: 30.0,
            max_link_hops: 32,
            max_lock_hops: 4,
            area_epsilon: 1e-4,
            edge_epsilon: 1e-6,
            min_length_tolerance: 1e-9,
            bisection_iterations: 22,
            vertex_pick_radius_px: 12.0,
            edge_pick_radius_px: 8.0,
            snap_threshold_factor: 0.16,
            snap_threshold_min: 0.2,
            snap_threshold_max: 2.0,
            rebuild_rate_hz: 4.0,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute minimum bay/face width
    pub fn with_absolute_min_width(mut self, width: f64) -> Self {
        self.absolute_min_width = width;
        self
    }

    /// Set the absolute maximum window-driven bay width
    pub fn with_absolute_max_width(mut self, width: f64) -> Self {
        self.absolute_max_width = width;
        self
    }

    /// Set the number of bisection iterations used when clamping drags
    pub fn with_bisection_iterations(mut self, iterations: u32) -> Self {
        self.bisection_iterations = iterations;
        self
    }

    /// Set the vertex and edge pick radii
    pub fn with_pick_radii(mut self, vertex_px: f64, edge_px: f64) -> Self {
        self.vertex_pick_radius_px = vertex_px;
        self.edge_pick_radius_px = edge_px;
        self
    }

    /// Set the rebuild frequency used while dragging
    pub fn with_rebuild_rate(mut self, hz: f64) -> Self {
        self.rebuild_rate_hz = hz;
        self
    }

    /// Minimum time between two downstream rebuilds while dragging.
    ///
    /// A non-positive rate disables rate limiting.
    pub fn rebuild_interval(&self) -> Duration {
        if self.rebuild_rate_hz > 0.0 && self.rebuild_rate_hz.is_finite() {
            Duration::from_secs_f64(1.0 / self.rebuild_rate_hz)
        } else {
            Duration::ZERO
        }
    }

    /// Adaptive right-angle snap threshold for the given local span
    pub fn snap_threshold(&self, shortest_span: f64) -> f64 {
        (shortest_span * self.snap_threshold_factor)
            .clamp(self.snap_threshold_min, self.snap_threshold_max)
    }
}
