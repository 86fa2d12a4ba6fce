//! Predicates over closed polygons used for building placement and picking.
//!
//! A polygon is an ordered vertex list treated as a closed loop: edge `i`
//! runs from vertex `i` to vertex `(i + 1) % n`. Every tolerance is supplied
//! by the caller in model units.

use std::f32::consts::PI;

use super::math::distance_to_segment;
use crate::algorithms::winding::point_in_polygon_evenodd;
use crate::model::Vec2;

/// Vertex count used when a circle is modeled as a polygon.
pub const CIRCLE_SEGMENTS: usize = 32;

fn segments(polygon: &[Vec2]) -> impl Iterator<Item = (usize, Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (i, polygon[i], polygon[(i + 1) % n]))
}

pub fn is_on_contour(polygon: &[Vec2], p: Vec2, eps: f32) -> bool {
    pick_segment(polygon, p, eps).is_some()
}

/// Fill containment (even-odd).
pub fn contains(polygon: &[Vec2], p: Vec2) -> bool {
    point_in_polygon_evenodd(p, polygon)
}

pub fn contains_or_on_contour(polygon: &[Vec2], p: Vec2, eps: f32) -> bool {
    contains(polygon, p) || is_on_contour(polygon, p, eps)
}

/// First vertex within `eps` of `p` on both axes.
pub fn pick_vertex(polygon: &[Vec2], p: Vec2, eps: f32) -> Option<usize> {
    polygon
        .iter()
        .position(|v| (v.x - p.x).abs() < eps && (v.y - p.y).abs() < eps)
}

/// First edge whose distance to `p` is under `eps`.
pub fn pick_segment(polygon: &[Vec2], p: Vec2, eps: f32) -> Option<usize> {
    segments(polygon)
        .find(|&(_, a, b)| distance_to_segment(p, a, b) < eps)
        .map(|(i, _, _)| i)
}

/// Regular `n`-gon inscribed in the circle of `radius` around `center`.
pub fn approximate_polygon(center: Vec2, radius: f32, n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f32 / n as f32;
            Vec2 {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect()
}

/// Axis-aligned rectangle spanned by two opposite corners, clockwise in screen space.
pub fn rectangle_from_corners(a: Vec2, b: Vec2) -> Vec<Vec2> {
    let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
    let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));
    vec![
        Vec2 { x: x1, y: y1 },
        Vec2 { x: x2, y: y1 },
        Vec2 { x: x2, y: y2 },
        Vec2 { x: x1, y: y2 },
    ]
}

/// Split edge `segment` by inserting `p` right after its start vertex.
/// Returns false when `segment` is out of range.
pub fn insert_vertex(polygon: &mut Vec<Vec2>, segment: usize, p: Vec2) -> bool {
    if segment >= polygon.len() {
        return false;
    }
    polygon.insert(segment + 1, p);
    true
}
