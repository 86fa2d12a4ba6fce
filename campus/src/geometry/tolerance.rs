// Centralized tolerances for hit testing and degenerate geometry

use serde::{Deserialize, Serialize};

pub const EPS_LEN: f32 = 1e-6; // zero-length segment threshold

// Screen-space pick radii (px); divided by the zoom factor before use
pub const NODE_PICK_PX: f32 = 15.0;
pub const EDGE_PICK_PX: f32 = 5.0;
pub const VERTEX_PICK_PX: f32 = 5.0;

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.max(0.0).min(1.0)
}

/// Pixel tolerances used by the interactive layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Radius for snapping to a node.
    pub node_px: f32,
    /// Distance to a road or building contour.
    pub edge_px: f32,
    /// Per-axis distance to a scratch polygon vertex.
    pub vertex_px: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            node_px: NODE_PICK_PX,
            edge_px: EDGE_PICK_PX,
            vertex_px: VERTEX_PICK_PX,
        }
    }
}

impl Tolerances {
    /// Model-space tolerances for the given zoom factor.
    pub fn at_scale(&self, scale: f32) -> Tolerances {
        let s = if scale > EPS_LEN { scale } else { 1.0 };
        Tolerances {
            node_px: self.node_px / s,
            edge_px: self.edge_px / s,
            vertex_px: self.vertex_px / s,
        }
    }
}
