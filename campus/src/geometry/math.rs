use super::tolerance::{clamp01, EPS_LEN};
use crate::model::Vec2;

/// Squared distance from `p` to segment `a-b` and the clamped projection parameter.
pub fn seg_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let t = if vv > EPS_LEN * EPS_LEN { clamp01((wx*vx + wy*vy) / vv) } else { 0.0 };
    let projx = a.x + t * vx; let projy = a.y + t * vy;
    let dx = p.x - projx; let dy = p.y - projy;
    (dx*dx + dy*dy, t)
}

pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let (d2, _) = seg_distance_sq(p, a, b);
    d2.sqrt()
}

#[inline]
pub fn distance_sq(a: Vec2, b: Vec2) -> f32 {
    let dx = b.x - a.x; let dy = b.y - a.y;
    dx*dx + dy*dy
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    distance_sq(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 { Vec2::new(x, y) }

    #[test]
    fn perpendicular_inside_segment() {
        let d = distance_to_segment(v(5.0, 3.0), v(0.0, 0.0), v(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn clamps_to_endpoints() {
        // beyond b: nearest point is b itself, not the infinite line
        let d = distance_to_segment(v(13.0, 4.0), v(0.0, 0.0), v(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
        let (_, t) = seg_distance_sq(v(-4.0, 1.0), v(0.0, 0.0), v(10.0, 0.0));
        assert_eq!(t, 0.0);
    }

    #[test]
    fn zero_length_segment_is_point_distance() {
        let d = distance_to_segment(v(3.0, 4.0), v(0.0, 0.0), v(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
