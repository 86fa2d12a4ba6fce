//! Crossing number calculation for point-in-polygon testing.
//!
//! Casts a horizontal ray from the point towards +x and counts how many
//! polygon edges it crosses. Building outlines are edited freely and may
//! self-intersect, so fill containment uses the even-odd rule.

use crate::model::Vec2;

/// Number of polygon edges crossed by the ray from `p` going right.
pub fn crossing_number(p: Vec2, polygon: &[Vec2]) -> u32 {
    if polygon.len() < 3 {
        return 0;
    }

    let mut crossings = 0u32;
    let n = polygon.len();

    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        // Half-open rule on y so a vertex on the ray is counted once
        let y_crosses = (p1.y <= p.y && p2.y > p.y) || (p2.y <= p.y && p1.y > p.y);

        if y_crosses {
            let t = (p.y - p1.y) / (p2.y - p1.y);
            let x_intersect = p1.x + t * (p2.x - p1.x);

            if p.x < x_intersect {
                crossings += 1;
            }
        }
    }

    crossings
}

/// Check if a point is inside a polygon using the even-odd rule.
#[inline]
pub fn point_in_polygon_evenodd(p: Vec2, polygon: &[Vec2]) -> bool {
    crossing_number(p, polygon) % 2 == 1
}
